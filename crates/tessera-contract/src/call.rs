//! Contract call payloads and the JSON `eth_call` request

use std::fmt;

use bytes::Bytes;
use serde::Serialize;
use tessera_primitives::{Address, MethodId, U256};

use crate::error::ContractResult;

/// Call data bound to a target contract
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractCall {
    to: Address,
    data: Bytes,
}

impl ContractCall {
    /// Create a call to `to` with the given call data
    pub fn new(to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            to,
            data: data.into(),
        }
    }

    /// Target contract
    pub fn to(&self) -> &Address {
        &self.to
    }

    /// Call data (selector followed by arguments)
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Selector at the start of the call data, if present
    pub fn method_id(&self) -> Option<MethodId> {
        MethodId::from_input(&self.data).ok()
    }

    /// `eth_call` request for this call
    pub fn to_request(&self) -> CallRequest {
        CallRequest {
            to: Some(self.to),
            data: Some(self.data.clone()),
            ..Default::default()
        }
    }

    /// JSON `eth_call` object
    pub fn to_json(&self) -> ContractResult<serde_json::Value> {
        Ok(serde_json::to_value(self.to_request())?)
    }
}

impl Serialize for ContractCall {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_request().serialize(serializer)
    }
}

/// Call request for eth_call and eth_estimateGas
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallRequest {
    /// Sender address
    pub from: Option<Address>,
    /// Recipient address
    pub to: Option<Address>,
    /// Gas limit
    pub gas: Option<u64>,
    /// Gas price
    pub gas_price: Option<u128>,
    /// Value to transfer
    pub value: Option<U256>,
    /// Input data
    pub data: Option<Bytes>,
}

impl Serialize for CallRequest {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;

        let count = [
            self.from.is_some(),
            self.to.is_some(),
            self.gas.is_some(),
            self.gas_price.is_some(),
            self.value.is_some(),
            self.data.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();

        let mut map = serializer.serialize_map(Some(count))?;

        if let Some(from) = &self.from {
            map.serialize_entry("from", &from.to_hex())?;
        }
        if let Some(to) = &self.to {
            map.serialize_entry("to", &to.to_hex())?;
        }
        if let Some(gas) = &self.gas {
            map.serialize_entry("gas", &format!("0x{:x}", gas))?;
        }
        if let Some(gas_price) = &self.gas_price {
            map.serialize_entry("gasPrice", &format!("0x{:x}", gas_price))?;
        }
        if let Some(value) = &self.value {
            // Quantities have no leading zeros
            map.serialize_entry("value", &format!("0x{:x}", value))?;
        }
        if let Some(data) = &self.data {
            map.serialize_entry("data", &format!("0x{}", hex::encode(data)))?;
        }

        map.end()
    }
}

/// A read-only call together with the decoder for its return data
#[derive(Clone)]
pub struct ContractReadCall<T> {
    call: ContractCall,
    processor: fn(&[u8]) -> ContractResult<T>,
}

impl<T> ContractReadCall<T> {
    /// Pair a call with its result processor
    pub fn new(call: ContractCall, processor: fn(&[u8]) -> ContractResult<T>) -> Self {
        Self { call, processor }
    }

    /// Underlying call
    pub fn call(&self) -> &ContractCall {
        &self.call
    }

    /// Decode the data returned by `eth_call`
    pub fn process_result(&self, result: &[u8]) -> ContractResult<T> {
        (self.processor)(result)
    }
}

impl<T> fmt::Debug for ContractReadCall<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractReadCall")
            .field("call", &self.call)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_request_serialize() {
        let req = CallRequest {
            to: Some(Address::ZERO),
            data: Some(Bytes::from(vec![0x01, 0x02])),
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["to"], "0x0000000000000000000000000000000000000000");
        assert_eq!(json["data"], "0x0102");
        assert!(json.get("from").is_none());
    }

    #[test]
    fn test_call_request_quantities() {
        let req = CallRequest {
            gas: Some(21000),
            value: Some(U256::from(1000)),
            ..Default::default()
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["gas"], "0x5208");
        assert_eq!(json["value"], "0x3e8");

        let zero = CallRequest {
            value: Some(U256::zero()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&zero).unwrap()["value"], "0x0");
    }

    #[test]
    fn test_contract_call_json() {
        let to = Address::from_bytes([0x11; 20]);
        let call = ContractCall::new(to, vec![0x18, 0x16, 0x0d, 0xdd]);
        assert_eq!(call.method_id(), Some(MethodId::from_bytes([0x18, 0x16, 0x0d, 0xdd])));

        let json = call.to_json().unwrap();
        assert_eq!(json["to"], to.to_hex());
        assert_eq!(json["data"], "0x18160ddd");
        assert_eq!(json.as_object().unwrap().len(), 2);
        assert_eq!(serde_json::to_value(&call).unwrap(), json);
    }

    #[test]
    fn test_read_call_processor() {
        fn first_byte(data: &[u8]) -> ContractResult<u8> {
            Ok(data.first().copied().unwrap_or_default())
        }

        let read = ContractReadCall::new(ContractCall::new(Address::ZERO, Bytes::new()), first_byte);
        assert_eq!(read.process_result(&[7, 8]).unwrap(), 7);
        assert!(format!("{:?}", read).contains("ContractReadCall"));
        assert_eq!(read.call().method_id(), None);
    }
}
