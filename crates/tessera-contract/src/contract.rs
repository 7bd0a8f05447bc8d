//! Contract interface with selector dispatch

use std::collections::BTreeMap;

use bytes::Bytes;
use tessera_abi::{Method, Registry, Value};
use tessera_primitives::{Address, MethodId, PrimitiveError};
use tracing::debug;

use crate::call::ContractCall;
use crate::error::{ContractError, ContractResult};

/// Contract helper for encoding, decoding and routing function calls
#[derive(Debug, Clone)]
pub struct Contract {
    /// Contract address
    address: Address,
    /// Methods keyed by selector
    functions: BTreeMap<MethodId, Method>,
}

impl Contract {
    /// Create a contract helper without methods
    pub fn new(address: Address) -> Self {
        Self {
            address,
            functions: BTreeMap::new(),
        }
    }

    /// Get the contract address
    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Add a method; a method with the same selector is replaced
    pub fn with_function(mut self, method: Method) -> Self {
        self.functions.insert(method.id(), method);
        self
    }

    /// Methods in selector order
    pub fn functions(&self) -> impl Iterator<Item = &Method> {
        self.functions.values()
    }

    /// Get a method by name; overloads resolve to the lowest selector
    pub fn function(&self, name: &str) -> Option<&Method> {
        self.functions.values().find(|m| m.name() == name)
    }

    /// Get a method by selector
    pub fn method(&self, id: &MethodId) -> Option<&Method> {
        self.functions.get(id)
    }

    fn require(&self, name: &str) -> ContractResult<&Method> {
        self.function(name)
            .ok_or_else(|| ContractError::UnknownFunction(name.to_string()))
    }

    /// Encode a function call
    pub fn encode_call(&self, function_name: &str, args: &[Value]) -> ContractResult<Bytes> {
        let data = self.require(function_name)?.encode_call(args)?;
        Ok(Bytes::from(data))
    }

    /// Encode a function call addressed to this contract
    pub fn call(&self, function_name: &str, args: &[Value]) -> ContractResult<ContractCall> {
        Ok(ContractCall::new(
            self.address,
            self.encode_call(function_name, args)?,
        ))
    }

    /// Decode function output
    pub fn decode_output(&self, function_name: &str, data: &[u8]) -> ContractResult<Vec<Value>> {
        Ok(self.require(function_name)?.decode_output(data)?)
    }

    /// Route call data to the method owning its selector and decode the arguments
    pub fn dispatch(&self, calldata: &[u8]) -> ContractResult<(&Method, Vec<Value>)> {
        let id = MethodId::from_input(calldata).map_err(PrimitiveError::from)?;
        let method = self.functions.get(&id).ok_or_else(|| {
            debug!(contract = %self.address, selector = %id, "no method for selector");
            ContractError::UnknownSelector(id)
        })?;
        debug!(contract = %self.address, method = method.signature(), "dispatching call");
        let args = method.decode_call(calldata)?;
        Ok((method, args))
    }
}

/// Consuming builder for contract interfaces
#[derive(Debug)]
pub struct ContractBuilder {
    address: Address,
    registry: Registry,
    functions: Vec<Method>,
}

impl ContractBuilder {
    /// Create a new contract builder using the standard registry
    pub fn new(address: Address) -> Self {
        Self {
            address,
            registry: Registry::default(),
            functions: Vec::new(),
        }
    }

    /// Resolve descriptors through a custom registry
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Add a method from its signature and output list,
    /// e.g. `("transfer(address,uint256)", "bool")`
    pub fn function(mut self, signature: &str, outputs: &str) -> ContractResult<Self> {
        let method = Method::parse(&self.registry, signature, outputs)?;
        self.functions.push(method);
        Ok(self)
    }

    /// Add an already built method
    pub fn method(mut self, method: Method) -> Self {
        self.functions.push(method);
        self
    }

    /// Build the contract
    pub fn build(self) -> Contract {
        self.functions
            .into_iter()
            .fold(Contract::new(self.address), Contract::with_function)
    }
}
