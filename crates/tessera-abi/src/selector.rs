//! Method selectors and method definitions

use std::fmt;

use tessera_crypto::keccak256;
use tessera_primitives::MethodId;

use crate::error::{AbiError, AbiResult};
use crate::params::ParameterList;
use crate::registry::Registry;
use crate::types::Type;
use crate::value::Value;

/// First four bytes of `keccak256(signature)`; the signature is hashed as given
pub fn function_selector(signature: &str) -> MethodId {
    let hash = keccak256(signature.as_bytes());
    let mut selector = [0u8; MethodId::LEN];
    selector.copy_from_slice(&hash.as_bytes()[..MethodId::LEN]);
    MethodId::from_bytes(selector)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Split `name(args)` into its name and argument list
fn split_signature(signature: &str) -> AbiResult<(&str, &str)> {
    let malformed = || AbiError::MalformedDescriptor(signature.to_string());
    let (name, rest) = signature.split_once('(').ok_or_else(malformed)?;
    let args = rest.strip_suffix(')').ok_or_else(malformed)?;
    if !is_identifier(name) || args.contains(['(', ')']) {
        return Err(malformed());
    }
    Ok((name, args))
}

/// Canonical method signature together with its selector
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodSelector {
    signature: String,
    id: MethodId,
}

impl MethodSelector {
    /// Selector of `name(t1,t2,...)` over the canonical names of `types`
    pub fn from(name: &str, types: &[Type]) -> AbiResult<Self> {
        if !is_identifier(name) {
            return Err(AbiError::MalformedDescriptor(name.to_string()));
        }
        let args: Vec<String> = types.iter().map(Type::canonical_name).collect();
        let signature = format!("{}({})", name, args.join(","));
        let id = function_selector(&signature);
        Ok(Self { signature, id })
    }

    /// Parse and canonicalize a signature such as `transfer(address,uint)`
    pub fn from_signature(signature: &str) -> AbiResult<Self> {
        let (name, args) = split_signature(signature)?;
        let params = ParameterList::from_signature(Registry::standard(), args)?;
        Self::from(name, params.types())
    }

    /// Canonical signature
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Method name
    pub fn name(&self) -> &str {
        self.signature
            .split_once('(')
            .map_or(self.signature.as_str(), |(name, _)| name)
    }

    /// 4-byte selector
    pub fn id(&self) -> MethodId {
        self.id
    }
}

impl fmt::Display for MethodSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.signature)
    }
}

/// A callable contract method: selector, inputs and outputs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Method {
    selector: MethodSelector,
    inputs: ParameterList,
    outputs: ParameterList,
}

impl Method {
    /// Create a method from resolved parameter lists
    pub fn new(name: &str, inputs: ParameterList, outputs: ParameterList) -> AbiResult<Self> {
        let selector = MethodSelector::from(name, inputs.types())?;
        Ok(Self {
            selector,
            inputs,
            outputs,
        })
    }

    /// Parse `name(inputs)` plus a comma-separated output list
    pub fn parse(registry: &Registry, signature: &str, outputs: &str) -> AbiResult<Self> {
        let (name, args) = split_signature(signature)?;
        let inputs = ParameterList::from_signature(registry, args)?;
        let outputs = ParameterList::from_signature(registry, outputs)?;
        Self::new(name, inputs, outputs)
    }

    /// Method name
    pub fn name(&self) -> &str {
        self.selector.name()
    }

    /// Canonical signature
    pub fn signature(&self) -> &str {
        self.selector.signature()
    }

    /// Selector
    pub fn id(&self) -> MethodId {
        self.selector.id()
    }

    /// Input parameters
    pub fn inputs(&self) -> &ParameterList {
        &self.inputs
    }

    /// Output parameters
    pub fn outputs(&self) -> &ParameterList {
        &self.outputs
    }

    /// Call data: selector followed by the encoded arguments
    pub fn encode_call(&self, args: &[Value]) -> AbiResult<Vec<u8>> {
        let encoded = self.inputs.encode(args)?;
        let mut data = Vec::with_capacity(MethodId::LEN + encoded.len());
        data.extend_from_slice(self.id().as_bytes());
        data.extend(encoded);
        Ok(data)
    }

    /// Decode call data produced for this method
    pub fn decode_call(&self, calldata: &[u8]) -> AbiResult<Vec<Value>> {
        let found = MethodId::from_input(calldata).map_err(|_| AbiError::TruncatedBuffer {
            needed: MethodId::LEN,
            available: calldata.len(),
        })?;
        if found != self.id() {
            return Err(AbiError::SelectorMismatch {
                expected: self.id(),
                found,
            });
        }
        self.inputs.decode(&calldata[MethodId::LEN..])
    }

    /// Decode return data
    pub fn decode_output(&self, data: &[u8]) -> AbiResult<Vec<Value>> {
        self.outputs.decode(data)
    }
}
