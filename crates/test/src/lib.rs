//! Chain constants and transaction fixtures for scenarios run against a dev node.
//!
//! The dev chain pre-funds a single well-known account. Scenarios sign plain value transfers
//! from it; nothing here is meant for anything but a throwaway chain.

use alloy_consensus::{SignableTransaction, TxEnvelope, TxLegacy};
use alloy_eips::eip2718::Encodable2718;
use alloy_network::TxSigner;
use alloy_primitives::{Address, B256, Bytes, TxKind, U256, address, b256};
use alloy_signer_local::PrivateKeySigner;
use color_eyre::eyre::Result;
use sealkit_rpc::RpcClient;

pub const CHAIN_ID: u64 = 161;

pub const GENESIS_ACCOUNT: Address = address!("f24ff3a9cf04c71dbc94d0b566f7a27b94566cac");
pub const GENESIS_ACCOUNT_PRIVATE_KEY: B256 =
    b256!("5fb92d6e98884f76de468fa3f6278f8807c48bebc13595d45af5bdc4da702133");
/// 100_000 units of the native token.
pub const GENESIS_ACCOUNT_BALANCE: U256 = U256::from_limbs([0x02c7_e14a_f680_0000, 0x152d, 0, 0]);

/// Receiver used by transfer scenarios.
pub const TEST_ACCOUNT: Address = address!("1111111111111111111111111111111111111111");

pub const GAS_PRICE: u128 = 1_000_000_000; // 1 gwei
pub const GAS_LIMIT: u64 = 0x100000;
/// Above the chain's existential deposit.
pub const TRANSFER_VALUE: u64 = 0x200;

pub fn genesis_signer() -> Result<PrivateKeySigner> {
    Ok(PrivateKeySigner::from_bytes(&GENESIS_ACCOUNT_PRIVATE_KEY)?)
}

pub fn make_transfer_tx(nonce: u64, to: Address, value: U256) -> TxLegacy {
    TxLegacy {
        chain_id: Some(CHAIN_ID),
        nonce,
        gas_price: GAS_PRICE,
        gas_limit: GAS_LIMIT,
        to: TxKind::Call(to),
        value,
        input: Bytes::default(),
    }
}

/// EIP-155 signed transfer, encoded for `eth_sendRawTransaction`.
pub async fn make_signed_transfer(
    signer: &PrivateKeySigner,
    nonce: u64,
    to: Address,
    value: U256,
) -> Result<Bytes> {
    let mut tx = make_transfer_tx(nonce, to, value);

    let signature = signer.sign_transaction(&mut tx).await?;
    let envelope: TxEnvelope = tx.into_signed(signature).into();
    Ok(envelope.encoded_2718().into())
}

/// Signs and submits a transfer of [`TRANSFER_VALUE`] to [`TEST_ACCOUNT`], returning its hash.
pub async fn send_transfer(client: &RpcClient, signer: &PrivateKeySigner, nonce: u64) -> Result<B256> {
    let raw = make_signed_transfer(signer, nonce, TEST_ACCOUNT, U256::from(TRANSFER_VALUE)).await?;
    Ok(client.eth().send_raw_transaction(raw).await?)
}

#[cfg(test)]
mod tests {
    use alloy_eips::eip2718::Decodable2718;

    use super::*;

    #[test]
    fn genesis_key_controls_genesis_account() {
        assert_eq!(genesis_signer().unwrap().address(), GENESIS_ACCOUNT);
    }

    #[test]
    fn genesis_balance_is_one_hundred_thousand_units() {
        let unit = U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(GENESIS_ACCOUNT_BALANCE, U256::from(100_000u64) * unit);
    }

    #[tokio::test]
    async fn signed_transfer_is_a_legacy_envelope_for_the_dev_chain() {
        let signer = genesis_signer().unwrap();
        let raw =
            make_signed_transfer(&signer, 3, TEST_ACCOUNT, U256::from(TRANSFER_VALUE)).await.unwrap();

        let envelope = TxEnvelope::decode_2718(&mut raw.as_ref()).unwrap();
        let TxEnvelope::Legacy(signed) = envelope else {
            panic!("expected a legacy transaction");
        };
        assert_eq!(signed.tx().nonce, 3);
        assert_eq!(signed.tx().chain_id, Some(CHAIN_ID));
        assert_eq!(signed.tx().to, TxKind::Call(TEST_ACCOUNT));
    }
}
