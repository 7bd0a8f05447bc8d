//! ERC-20 token standard: methods, typed calls, events and a token wrapper

use std::sync::OnceLock;

use bytes::Bytes;
use tessera_abi::{AbiError, Method, ParameterList, Registry, Value, WORD_SIZE};
use tessera_crypto::keccak256;
use tessera_primitives::{Address, EventId, MethodId, PrimitiveError, H256, U256};
use tracing::debug;

use crate::call::{ContractCall, ContractReadCall};
use crate::contract::Contract;
use crate::error::{ContractError, ContractResult};

/// ERC-20 methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Erc20Method {
    /// `totalSupply()`
    TotalSupply,
    /// `balanceOf(address)`
    BalanceOf,
    /// `transfer(address,uint256)`
    Transfer,
    /// `transferFrom(address,address,uint256)`
    TransferFrom,
    /// `approve(address,uint256)`
    Approve,
    /// `allowance(address,address)`
    Allowance,
    /// `name()`, optional in the standard
    Name,
    /// `symbol()`, optional in the standard
    Symbol,
    /// `decimals()`, optional in the standard
    Decimals,
}

impl Erc20Method {
    /// All methods
    pub const ALL: [Erc20Method; 9] = [
        Erc20Method::TotalSupply,
        Erc20Method::BalanceOf,
        Erc20Method::Transfer,
        Erc20Method::TransferFrom,
        Erc20Method::Approve,
        Erc20Method::Allowance,
        Erc20Method::Name,
        Erc20Method::Symbol,
        Erc20Method::Decimals,
    ];

    /// Canonical signature
    pub fn signature(self) -> &'static str {
        match self {
            Erc20Method::TotalSupply => "totalSupply()",
            Erc20Method::BalanceOf => "balanceOf(address)",
            Erc20Method::Transfer => "transfer(address,uint256)",
            Erc20Method::TransferFrom => "transferFrom(address,address,uint256)",
            Erc20Method::Approve => "approve(address,uint256)",
            Erc20Method::Allowance => "allowance(address,address)",
            Erc20Method::Name => "name()",
            Erc20Method::Symbol => "symbol()",
            Erc20Method::Decimals => "decimals()",
        }
    }

    /// Return types
    pub fn outputs(self) -> &'static str {
        match self {
            Erc20Method::TotalSupply | Erc20Method::BalanceOf | Erc20Method::Allowance => "uint256",
            Erc20Method::Transfer | Erc20Method::TransferFrom | Erc20Method::Approve => "bool",
            Erc20Method::Name | Erc20Method::Symbol => "string",
            Erc20Method::Decimals => "uint8",
        }
    }

    /// Method name
    pub fn name(self) -> &'static str {
        let signature = self.signature();
        signature.split_once('(').map_or(signature, |(name, _)| name)
    }

    /// Parsed method definition, built once per process
    pub fn method(self) -> ContractResult<&'static Method> {
        static METHODS: OnceLock<Vec<(Erc20Method, Method)>> = OnceLock::new();
        METHODS
            .get_or_init(|| {
                Self::ALL
                    .iter()
                    .filter_map(|m| {
                        Method::parse(Registry::standard(), m.signature(), m.outputs())
                            .inspect_err(|e| {
                                debug!(signature = m.signature(), error = %e, "ERC-20 method skipped");
                            })
                            .ok()
                            .map(|method| (*m, method))
                    })
                    .collect()
            })
            .iter()
            .find(|(m, _)| *m == self)
            .map(|(_, method)| method)
            .ok_or_else(|| ContractError::UnknownFunction(self.signature().to_string()))
    }

    /// Selector
    pub fn id(self) -> ContractResult<MethodId> {
        Ok(self.method()?.id())
    }

    /// Method owning a selector
    pub fn from_id(id: &MethodId) -> Option<Erc20Method> {
        Self::ALL
            .into_iter()
            .find(|m| m.id().ok() == Some(*id))
    }
}

/// Contract interface with every ERC-20 method
pub fn erc20(address: Address) -> ContractResult<Contract> {
    Erc20Method::ALL
        .iter()
        .try_fold(Contract::new(address), |contract, m| -> ContractResult<Contract> {
            Ok(contract.with_function(m.method()?.clone()))
        })
}

fn address_at(values: &[Value], index: usize) -> ContractResult<Address> {
    values
        .get(index)
        .and_then(Value::as_address)
        .copied()
        .ok_or_else(|| ContractError::UnexpectedValue(format!("argument {} is not an address", index)))
}

fn uint_at(values: &[Value], index: usize) -> ContractResult<U256> {
    values
        .get(index)
        .and_then(Value::as_uint)
        .copied()
        .ok_or_else(|| ContractError::UnexpectedValue(format!("argument {} is not a uint", index)))
}

/// Typed ERC-20 call
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Erc20Call {
    /// `totalSupply()`
    TotalSupply,
    /// `balanceOf(owner)`
    BalanceOf {
        /// Account queried
        owner: Address,
    },
    /// `transfer(to, value)`
    Transfer {
        /// Recipient
        to: Address,
        /// Amount in base units
        value: U256,
    },
    /// `transferFrom(from, to, value)`
    TransferFrom {
        /// Token owner
        from: Address,
        /// Recipient
        to: Address,
        /// Amount in base units
        value: U256,
    },
    /// `approve(spender, value)`
    Approve {
        /// Account allowed to spend
        spender: Address,
        /// Allowance in base units
        value: U256,
    },
    /// `allowance(owner, spender)`
    Allowance {
        /// Token owner
        owner: Address,
        /// Account allowed to spend
        spender: Address,
    },
    /// `name()`
    Name,
    /// `symbol()`
    Symbol,
    /// `decimals()`
    Decimals,
}

impl Erc20Call {
    /// Method of this call
    pub fn method(&self) -> Erc20Method {
        match self {
            Erc20Call::TotalSupply => Erc20Method::TotalSupply,
            Erc20Call::BalanceOf { .. } => Erc20Method::BalanceOf,
            Erc20Call::Transfer { .. } => Erc20Method::Transfer,
            Erc20Call::TransferFrom { .. } => Erc20Method::TransferFrom,
            Erc20Call::Approve { .. } => Erc20Method::Approve,
            Erc20Call::Allowance { .. } => Erc20Method::Allowance,
            Erc20Call::Name => Erc20Method::Name,
            Erc20Call::Symbol => Erc20Method::Symbol,
            Erc20Call::Decimals => Erc20Method::Decimals,
        }
    }

    /// Arguments in declaration order
    pub fn args(&self) -> Vec<Value> {
        match self {
            Erc20Call::TotalSupply | Erc20Call::Name | Erc20Call::Symbol | Erc20Call::Decimals => {
                vec![]
            }
            Erc20Call::BalanceOf { owner } => vec![Value::Address(*owner)],
            Erc20Call::Transfer { to, value } => vec![Value::Address(*to), Value::Uint(*value)],
            Erc20Call::TransferFrom { from, to, value } => vec![
                Value::Address(*from),
                Value::Address(*to),
                Value::Uint(*value),
            ],
            Erc20Call::Approve { spender, value } => {
                vec![Value::Address(*spender), Value::Uint(*value)]
            }
            Erc20Call::Allowance { owner, spender } => {
                vec![Value::Address(*owner), Value::Address(*spender)]
            }
        }
    }

    /// Call data
    pub fn encode(&self) -> ContractResult<Bytes> {
        let data = self.method().method()?.encode_call(&self.args())?;
        Ok(Bytes::from(data))
    }

    /// Parse call data of any ERC-20 method
    pub fn decode(calldata: &[u8]) -> ContractResult<Self> {
        let id = MethodId::from_input(calldata).map_err(PrimitiveError::from)?;
        let method = Erc20Method::from_id(&id).ok_or(ContractError::UnknownSelector(id))?;
        let args = method.method()?.decode_call(calldata)?;

        Ok(match method {
            Erc20Method::TotalSupply => Erc20Call::TotalSupply,
            Erc20Method::Name => Erc20Call::Name,
            Erc20Method::Symbol => Erc20Call::Symbol,
            Erc20Method::Decimals => Erc20Call::Decimals,
            Erc20Method::BalanceOf => Erc20Call::BalanceOf {
                owner: address_at(&args, 0)?,
            },
            Erc20Method::Transfer => Erc20Call::Transfer {
                to: address_at(&args, 0)?,
                value: uint_at(&args, 1)?,
            },
            Erc20Method::TransferFrom => Erc20Call::TransferFrom {
                from: address_at(&args, 0)?,
                to: address_at(&args, 1)?,
                value: uint_at(&args, 2)?,
            },
            Erc20Method::Approve => Erc20Call::Approve {
                spender: address_at(&args, 0)?,
                value: uint_at(&args, 1)?,
            },
            Erc20Method::Allowance => Erc20Call::Allowance {
                owner: address_at(&args, 0)?,
                spender: address_at(&args, 1)?,
            },
        })
    }
}

/// ERC-20 log event
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Erc20Event {
    /// `Transfer(address indexed from, address indexed to, uint256 value)`
    Transfer {
        /// Sender
        from: Address,
        /// Recipient
        to: Address,
        /// Amount in base units
        value: U256,
    },
    /// `Approval(address indexed owner, address indexed spender, uint256 value)`
    Approval {
        /// Token owner
        owner: Address,
        /// Account allowed to spend
        spender: Address,
        /// Allowance in base units
        value: U256,
    },
}

impl Erc20Event {
    /// Signature of the transfer event
    pub const TRANSFER_SIGNATURE: &'static str = "Transfer(address,address,uint256)";
    /// Signature of the approval event
    pub const APPROVAL_SIGNATURE: &'static str = "Approval(address,address,uint256)";

    /// Topic of the transfer event
    pub fn transfer_id() -> EventId {
        keccak256(Self::TRANSFER_SIGNATURE.as_bytes())
    }

    /// Topic of the approval event
    pub fn approval_id() -> EventId {
        keccak256(Self::APPROVAL_SIGNATURE.as_bytes())
    }

    /// First topic of this event
    pub fn event_id(&self) -> EventId {
        match self {
            Erc20Event::Transfer { .. } => Self::transfer_id(),
            Erc20Event::Approval { .. } => Self::approval_id(),
        }
    }

    /// Log topics: event id followed by the two indexed addresses
    pub fn topics(&self) -> [H256; 3] {
        let (a, b) = match self {
            Erc20Event::Transfer { from, to, .. } => (from, to),
            Erc20Event::Approval { owner, spender, .. } => (owner, spender),
        };
        [self.event_id(), H256::from_address(a), H256::from_address(b)]
    }

    /// Log data: the non-indexed amount
    pub fn data(&self) -> ContractResult<Vec<u8>> {
        let value = match self {
            Erc20Event::Transfer { value, .. } | Erc20Event::Approval { value, .. } => *value,
        };
        Ok(amount_params()?.encode(&[Value::Uint(value)])?)
    }

    /// Decode a log entry.
    ///
    /// Returns `Ok(None)` for logs that are not ERC-20 events: anything other
    /// than three topics with data, or an unknown first topic.
    pub fn decode(topics: &[H256], data: &[u8]) -> ContractResult<Option<Self>> {
        let [id, a, b] = topics else {
            return Ok(None);
        };
        if data.is_empty() {
            return Ok(None);
        }
        let is_transfer = *id == Self::transfer_id();
        if !is_transfer && *id != Self::approval_id() {
            return Ok(None);
        }

        let values = amount_params()?.decode(data)?;
        let value = uint_at(&values, 0)?;
        let (a, b) = (topic_address(a), topic_address(b));
        Ok(Some(if is_transfer {
            Erc20Event::Transfer { from: a, to: b, value }
        } else {
            Erc20Event::Approval {
                owner: a,
                spender: b,
                value,
            }
        }))
    }
}

fn amount_params() -> ContractResult<ParameterList> {
    Ok(ParameterList::from_signature(Registry::standard(), "uint256")?)
}

/// Low 20 bytes of an indexed address topic
fn topic_address(topic: &H256) -> Address {
    let mut bytes = [0u8; Address::LEN];
    bytes.copy_from_slice(&topic.as_bytes()[H256::LEN - Address::LEN..]);
    Address::from_bytes(bytes)
}

fn first_output(method: Erc20Method, data: &[u8]) -> ContractResult<Value> {
    method
        .method()?
        .decode_output(data)?
        .into_iter()
        .next()
        .ok_or_else(|| ContractError::InvalidResult(format!("{} returned nothing", method.name())))
}

fn uint_result(method: Erc20Method, data: &[u8]) -> ContractResult<U256> {
    match first_output(method, data)? {
        Value::Uint(value) => Ok(value),
        other => Err(ContractError::InvalidResult(format!("expected uint, got {}", other))),
    }
}

fn total_supply_result(data: &[u8]) -> ContractResult<U256> {
    uint_result(Erc20Method::TotalSupply, data)
}

fn balance_result(data: &[u8]) -> ContractResult<U256> {
    uint_result(Erc20Method::BalanceOf, data)
}

fn allowance_result(data: &[u8]) -> ContractResult<U256> {
    uint_result(Erc20Method::Allowance, data)
}

fn decimals_result(data: &[u8]) -> ContractResult<u8> {
    let value = uint_result(Erc20Method::Decimals, data)?;
    // uint8 decoding already bounds the value
    Ok(value.low_u32() as u8)
}

/// Some early tokens return `bytes32` instead of `string`
fn string_result(data: &[u8]) -> ContractResult<String> {
    if data.is_empty() {
        return Err(ContractError::InvalidResult("empty value".to_string()));
    }
    if data.len() > 2 * WORD_SIZE {
        return match first_output(Erc20Method::Name, data)? {
            Value::String(s) => Ok(s),
            other => Err(ContractError::InvalidResult(format!("expected string, got {}", other))),
        };
    }
    let len = data.iter().position(|b| *b == 0).unwrap_or(data.len());
    if len == 0 {
        return Err(ContractError::InvalidResult("zero length value".to_string()));
    }
    Ok(String::from_utf8(data[..len].to_vec()).map_err(AbiError::from)?)
}

/// ERC-20 token bound to a contract address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Erc20Token {
    contract: Address,
}

impl Erc20Token {
    /// Token at `contract`
    pub fn new(contract: Address) -> Self {
        Self { contract }
    }

    /// Token contract address
    pub fn contract(&self) -> &Address {
        &self.contract
    }

    fn call(&self, call: Erc20Call) -> ContractResult<ContractCall> {
        Ok(ContractCall::new(self.contract, call.encode()?))
    }

    fn read<T>(&self, call: Erc20Call, processor: fn(&[u8]) -> ContractResult<T>) -> ContractResult<ContractReadCall<T>> {
        Ok(ContractReadCall::new(self.call(call)?, processor))
    }

    /// `name()`
    pub fn read_name(&self) -> ContractResult<ContractReadCall<String>> {
        self.read(Erc20Call::Name, string_result)
    }

    /// `symbol()`
    pub fn read_symbol(&self) -> ContractResult<ContractReadCall<String>> {
        self.read(Erc20Call::Symbol, string_result)
    }

    /// `decimals()`
    pub fn read_decimals(&self) -> ContractResult<ContractReadCall<u8>> {
        self.read(Erc20Call::Decimals, decimals_result)
    }

    /// `totalSupply()`
    pub fn read_total_supply(&self) -> ContractResult<ContractReadCall<U256>> {
        self.read(Erc20Call::TotalSupply, total_supply_result)
    }

    /// `balanceOf(owner)`
    pub fn read_balance_of(&self, owner: Address) -> ContractResult<ContractReadCall<U256>> {
        self.read(Erc20Call::BalanceOf { owner }, balance_result)
    }

    /// `allowance(owner, spender)`
    pub fn read_allowance(
        &self,
        owner: Address,
        spender: Address,
    ) -> ContractResult<ContractReadCall<U256>> {
        self.read(Erc20Call::Allowance { owner, spender }, allowance_result)
    }

    /// `transfer(to, value)`
    pub fn execute_transfer(&self, to: Address, value: U256) -> ContractResult<ContractCall> {
        self.call(Erc20Call::Transfer { to, value })
    }

    /// `transferFrom(from, to, value)`
    pub fn execute_transfer_from(
        &self,
        from: Address,
        to: Address,
        value: U256,
    ) -> ContractResult<ContractCall> {
        self.call(Erc20Call::TransferFrom { from, to, value })
    }

    /// `approve(spender, value)`
    pub fn execute_approve(&self, spender: Address, value: U256) -> ContractResult<ContractCall> {
        self.call(Erc20Call::Approve { spender, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_selectors() {
        let expected = [
            (Erc20Method::TotalSupply, "0x18160ddd"),
            (Erc20Method::BalanceOf, "0x70a08231"),
            (Erc20Method::Transfer, "0xa9059cbb"),
            (Erc20Method::TransferFrom, "0x23b872dd"),
            (Erc20Method::Approve, "0x095ea7b3"),
            (Erc20Method::Allowance, "0xdd62ed3e"),
            (Erc20Method::Name, "0x06fdde03"),
            (Erc20Method::Symbol, "0x95d89b41"),
            (Erc20Method::Decimals, "0x313ce567"),
        ];
        for (method, id) in expected {
            assert_eq!(method.id().unwrap().to_hex(), id, "{}", method.name());
            assert_eq!(Erc20Method::from_id(&method.id().unwrap()), Some(method));
        }
    }

    #[test]
    fn test_every_method_cached() {
        for method in Erc20Method::ALL {
            let parsed = method.method().unwrap();
            assert_eq!(parsed.signature(), method.signature());
            assert_eq!(parsed.outputs().to_signature(), method.outputs());
        }
    }

    #[test]
    fn test_erc20_interface() {
        let contract = erc20(Address::ZERO).unwrap();
        for method in Erc20Method::ALL {
            assert!(contract.function(method.name()).is_some(), "{}", method.name());
        }
    }

    #[test]
    fn test_call_roundtrip() {
        let call = Erc20Call::TransferFrom {
            from: Address::from_bytes([1; 20]),
            to: Address::from_bytes([2; 20]),
            value: U256::from(5000),
        };
        let data = call.encode().unwrap();
        assert_eq!(data.len(), 4 + 96);
        assert_eq!(Erc20Call::decode(&data).unwrap(), call);
    }

    #[test]
    fn test_decode_unknown_selector() {
        assert!(matches!(
            Erc20Call::decode(&[0xde, 0xad, 0xbe, 0xef]),
            Err(ContractError::UnknownSelector(_))
        ));
    }

    #[test]
    fn test_event_topics() {
        assert_eq!(
            Erc20Event::transfer_id().to_hex(),
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
        assert_eq!(
            Erc20Event::approval_id().to_hex(),
            "0x8c5be1e5ebec7d5bd14f71427d1e84f3dd0314c0f7b2291e5b200ac8c7c3b925"
        );
    }

    #[test]
    fn test_event_roundtrip() {
        let event = Erc20Event::Approval {
            owner: Address::from_bytes([3; 20]),
            spender: Address::from_bytes([4; 20]),
            value: U256::MAX,
        };
        let topics = event.topics();
        let data = event.data().unwrap();
        assert_eq!(Erc20Event::decode(&topics, &data).unwrap(), Some(event));
    }

    #[test]
    fn test_event_not_erc20() {
        let topics = [Erc20Event::transfer_id(), H256::ZERO];
        assert_eq!(Erc20Event::decode(&topics, &[0u8; 32]).unwrap(), None);

        let topics = [H256::ZERO, H256::ZERO, H256::ZERO];
        assert_eq!(Erc20Event::decode(&topics, &[0u8; 32]).unwrap(), None);

        let topics = [Erc20Event::transfer_id(), H256::ZERO, H256::ZERO];
        assert_eq!(Erc20Event::decode(&topics, &[]).unwrap(), None);
        assert!(Erc20Event::decode(&topics, &[0u8; 16]).is_err());
    }

    #[test]
    fn test_string_result_standard() {
        let encoded = ParameterList::from_signature(Registry::standard(), "string")
            .unwrap()
            .encode(&[Value::string("Tether USD")])
            .unwrap();
        assert_eq!(string_result(&encoded).unwrap(), "Tether USD");
    }

    #[test]
    fn test_string_result_bytes32() {
        let mut data = [0u8; 32];
        data[..3].copy_from_slice(b"MKR");
        assert_eq!(string_result(&data).unwrap(), "MKR");
        assert!(string_result(&[0u8; 32]).is_err());
        assert!(string_result(&[]).is_err());
    }

    #[test]
    fn test_decimals_result() {
        let mut data = [0u8; 32];
        data[31] = 18;
        assert_eq!(decimals_result(&data).unwrap(), 18);
        data[30] = 1;
        assert!(decimals_result(&data).is_err());
    }
}
