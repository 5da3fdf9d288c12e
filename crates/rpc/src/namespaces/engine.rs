// crates/rpc/src/namespaces/engine.rs

use alloy_primitives::B256;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::param;
use crate::{client::RpcClient, error::RpcResult, transport::JsonRpcResponse};

pub const ENGINE_CREATE_BLOCK: &str = "engine_createBlock";
pub const ENGINE_FINALIZE_BLOCK: &str = "engine_finalizeBlock";

/// Block returned by `engine_createBlock`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedBlock {
    pub hash: B256,
    #[serde(default)]
    pub aux: ImportedAux,
}

/// Import flags the node reports alongside a sealed block.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportedAux {
    pub header_only: bool,
    pub clear_justification_requests: bool,
    pub needs_justification: bool,
    pub bad_justification: bool,
    pub is_new_best: bool,
}

/// Manual-seal controls.
#[derive(Clone, Copy, Debug)]
pub struct EngineClient<'a> {
    client: &'a RpcClient,
}

impl<'a> EngineClient<'a> {
    pub(crate) fn new(client: &'a RpcClient) -> Self {
        Self { client }
    }

    /// Asks the node to seal a block and returns the whole envelope. The node may answer with
    /// a `null` result or an error when nothing was sealed, so callers must check it.
    pub async fn create_block(
        &self,
        create_empty: bool,
        finalize: bool,
        parent_hash: Option<B256>,
    ) -> RpcResult<JsonRpcResponse> {
        self.client
            .send(
                ENGINE_CREATE_BLOCK,
                vec![param(create_empty)?, param(finalize)?, param(parent_hash)?],
            )
            .await
    }

    /// Finalizes a block sealed earlier without finality.
    pub async fn finalize_block(&self, hash: B256, justification: Option<Value>) -> RpcResult<bool> {
        self.client.request(ENGINE_FINALIZE_BLOCK, vec![param(hash)?, param(justification)?]).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::transport::{
        JsonRpcError,
        mock::{MockReply, MockTransport},
    };

    #[tokio::test]
    async fn create_block_sends_documented_parameter_shape() {
        let transport = Arc::new(MockTransport::new());
        let client = RpcClient::from_transport(transport.clone());
        let hash = B256::repeat_byte(0xab);
        transport
            .push_result(
                ENGINE_CREATE_BLOCK,
                json!({"hash": hash, "aux": {"header_only": false, "clear_justification_requests": false, "needs_justification": false, "bad_justification": false, "is_new_best": true}}),
            )
            .await;

        let response = client.engine().create_block(true, false, None).await.unwrap();
        let block: CreatedBlock = serde_json::from_value(response.into_result().unwrap()).unwrap();

        assert_eq!(block.hash, hash);
        assert!(block.aux.is_new_best);
        let requests = transport.requests().await;
        assert_eq!(requests[0].params, vec![json!(true), json!(false), Value::Null]);
    }

    #[tokio::test]
    async fn create_block_keeps_error_envelope() {
        let transport = Arc::new(MockTransport::new());
        let client = RpcClient::from_transport(transport.clone());
        transport
            .push(ENGINE_CREATE_BLOCK, MockReply::Error(JsonRpcError::new(-32603, "no block")))
            .await;

        let response = client.engine().create_block(true, true, None).await.unwrap();
        assert_eq!(response.error.unwrap().message, "no block");
    }

    #[tokio::test]
    async fn finalize_block_passes_hash_and_null_justification() {
        let transport = Arc::new(MockTransport::new());
        let client = RpcClient::from_transport(transport.clone());
        transport.push_result(ENGINE_FINALIZE_BLOCK, json!(true)).await;

        let hash = B256::repeat_byte(1);
        assert!(client.engine().finalize_block(hash, None).await.unwrap());
        assert_eq!(transport.requests().await[0].params, vec![json!(hash), Value::Null]);
    }
}
