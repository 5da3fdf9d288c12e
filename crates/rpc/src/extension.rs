//! Composition of the base client with extra RPC namespaces.

use std::{collections::BTreeMap, ops::Deref};

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    client::RpcClient,
    error::{RpcError, RpcResult},
    namespaces::{
        EXTENDED_NAMESPACES, debug, debug::DebugClient, trace, trace::TraceClient, txpool,
        txpool::TxpoolClient,
    },
    transport::JsonRpcResponse,
};

/// One named operation inside a namespace.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MethodSpec {
    /// Name the operation is exposed under, e.g. `traceTransaction`.
    pub name: &'static str,
    /// JSON-RPC method it forwards to, e.g. `debug_traceTransaction`.
    pub call: &'static str,
    /// Number of positional parameters the RPC method takes.
    pub params: usize,
}

impl MethodSpec {
    /// Lays caller arguments out as positional params.
    ///
    /// Missing trailing positions up to the declared arity are sent as `null`. Extra arguments
    /// are passed through untouched; the node reports the mismatch.
    pub fn params(&self, mut args: Vec<Value>) -> Vec<Value> {
        if args.len() < self.params {
            args.resize(self.params, Value::Null);
        }
        args
    }
}

/// A named group of methods installed under `property`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NamespaceDescriptor {
    pub property: &'static str,
    pub methods: &'static [MethodSpec],
}

impl NamespaceDescriptor {
    pub fn method(&self, name: &str) -> Option<&'static MethodSpec> {
        self.methods.iter().find(|m| m.name == name)
    }
}

/// The base client plus zero or more installed namespaces.
///
/// Extending never touches the network and never changes the value it was called on: it
/// returns a new client sharing the same transport. Namespaces are keyed by property, so
/// installing disjoint namespaces in any order yields equal clients, and installing a property
/// twice keeps the later descriptor.
#[derive(Clone, Debug)]
pub struct ExtendedClient {
    base: RpcClient,
    namespaces: BTreeMap<&'static str, NamespaceDescriptor>,
}

impl ExtendedClient {
    pub fn new(base: RpcClient) -> Self {
        Self { base, namespaces: BTreeMap::new() }
    }

    /// The base client with `trace`, `debug` and `txpool` installed.
    pub fn with_tracing(base: RpcClient) -> Self {
        Self::new(base).extend_all(EXTENDED_NAMESPACES)
    }

    #[must_use]
    pub fn extend(&self, descriptor: NamespaceDescriptor) -> Self {
        let mut namespaces = self.namespaces.clone();
        namespaces.insert(descriptor.property, descriptor);
        Self { base: self.base.clone(), namespaces }
    }

    #[must_use]
    pub fn extend_all(&self, descriptors: impl IntoIterator<Item = NamespaceDescriptor>) -> Self {
        descriptors.into_iter().fold(self.clone(), |client, descriptor| client.extend(descriptor))
    }

    pub fn base(&self) -> &RpcClient {
        &self.base
    }

    /// Installed descriptors, ordered by property.
    pub fn descriptors(&self) -> Vec<NamespaceDescriptor> {
        self.namespaces.values().copied().collect()
    }

    pub fn has_namespace(&self, property: &str) -> bool {
        self.namespaces.contains_key(property)
    }

    /// Dynamic access to an installed namespace by property.
    pub fn namespace(&self, property: &str) -> Option<Namespace<'_>> {
        self.namespaces
            .get(property)
            .map(|descriptor| Namespace { client: &self.base, descriptor: *descriptor })
    }

    pub fn trace(&self) -> Option<TraceClient<'_>> {
        self.installed(trace::NAMESPACE).then(|| TraceClient::new(&self.base))
    }

    pub fn debug(&self) -> Option<DebugClient<'_>> {
        self.installed(debug::NAMESPACE).then(|| DebugClient::new(&self.base))
    }

    pub fn txpool(&self) -> Option<TxpoolClient<'_>> {
        self.installed(txpool::NAMESPACE).then(|| TxpoolClient::new(&self.base))
    }

    fn installed(&self, descriptor: NamespaceDescriptor) -> bool {
        self.namespaces.get(descriptor.property) == Some(&descriptor)
    }
}

impl Deref for ExtendedClient {
    type Target = RpcClient;

    fn deref(&self) -> &Self::Target {
        &self.base
    }
}

impl PartialEq for ExtendedClient {
    /// Two clients are equivalent when they expose the same namespaces. The transport is a
    /// shared handle and does not take part.
    fn eq(&self, other: &Self) -> bool {
        self.namespaces == other.namespaces
    }
}

/// An installed namespace, resolved against the base client.
#[derive(Clone, Copy, Debug)]
pub struct Namespace<'a> {
    client: &'a RpcClient,
    descriptor: NamespaceDescriptor,
}

impl<'a> Namespace<'a> {
    pub fn descriptor(&self) -> NamespaceDescriptor {
        self.descriptor
    }

    /// Forwards `name` to its RPC method and returns the raw envelope, like
    /// [`RpcClient::send`].
    pub async fn send(&self, name: &str, args: Vec<Value>) -> RpcResult<JsonRpcResponse> {
        let spec = self.spec(name)?;
        self.client.send(spec.call, spec.params(args)).await
    }

    /// Forwards `name` and decodes the result, like [`RpcClient::request`].
    pub async fn call<R: DeserializeOwned>(&self, name: &str, args: Vec<Value>) -> RpcResult<R> {
        let spec = self.spec(name)?;
        self.client.request(spec.call, spec.params(args)).await
    }

    fn spec(&self, name: &str) -> RpcResult<&'static MethodSpec> {
        self.descriptor.method(name).ok_or_else(|| RpcError::UnknownMethod {
            namespace: self.descriptor.property.to_string(),
            name: name.to_string(),
        })
    }
}
