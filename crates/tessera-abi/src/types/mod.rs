//! ABI type system.
//!
//! Every type is either [`StaticType`] (fixed width, encoded in place in the
//! head of a parameter list) or [`DynamicType`] (variable width, referenced
//! from the head by a one-word offset and stored in the tail). [`Type`] is the
//! closed union of both, and callers match on it wherever layout differs.

mod array;
mod bytes;
mod decimal;
mod numeric;
mod simple;

use std::fmt;

pub use array::{ArrayType, DynamicArrayType};
pub use bytes::{DynamicBytesType, StringType};
pub use decimal::{FixedType, UFixedType};
pub use numeric::{BoolType, IntType, UIntType, STANDARD_BITS};
pub use simple::{AddressType, FixedBytesType, FunctionType};

use crate::error::{AbiError, AbiResult};
use crate::value::Value;
use crate::word::WORD_SIZE;

/// Any ABI type
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// Fixed width, lives in the head
    Static(StaticType),
    /// Variable width, lives in the tail
    Dynamic(DynamicType),
}

/// Type whose encoded width does not depend on the value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StaticType {
    /// `uintN`
    UInt(UIntType),
    /// `intN`
    Int(IntType),
    /// `bool`
    Bool(BoolType),
    /// `address`
    Address(AddressType),
    /// `function`
    Function(FunctionType),
    /// `bytesN`
    FixedBytes(FixedBytesType),
    /// `fixedMxN`
    Fixed(FixedType),
    /// `ufixedMxN`
    UFixed(UFixedType),
    /// `T[K]`
    Array(ArrayType),
}

/// Type whose encoded width depends on the value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DynamicType {
    /// `bytes`
    Bytes(DynamicBytesType),
    /// `string`
    String(StringType),
    /// `T[]`
    Array(DynamicArrayType),
}

impl Type {
    /// Canonical descriptor, e.g. `uint256` rather than `uint`
    pub fn canonical_name(&self) -> String {
        match self {
            Type::Static(t) => t.canonical_name(),
            Type::Dynamic(t) => t.canonical_name(),
        }
    }

    /// Check if this type is dynamic (variable length)
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Type::Dynamic(_))
    }

    /// Bytes this type occupies in the head of a parameter list
    pub fn head_size(&self) -> usize {
        match self {
            Type::Static(t) => t.fixed_size(),
            Type::Dynamic(_) => WORD_SIZE,
        }
    }

    /// Encode a value of this type
    pub fn encode(&self, value: &Value) -> AbiResult<Vec<u8>> {
        match self {
            Type::Static(t) => t.encode(value),
            Type::Dynamic(t) => t.encode(value),
        }
    }

    /// Decode a value from exactly its own encoding
    pub fn decode(&self, data: &[u8]) -> AbiResult<Value> {
        match self {
            Type::Static(t) => t.decode(data),
            Type::Dynamic(t) => t.decode(data),
        }
    }

    /// The static variant, or `InvalidElementType` for dynamic types
    pub fn into_static(self) -> AbiResult<StaticType> {
        match self {
            Type::Static(t) => Ok(t),
            Type::Dynamic(t) => Err(AbiError::InvalidElementType(t.canonical_name())),
        }
    }
}

impl StaticType {
    /// Canonical descriptor
    pub fn canonical_name(&self) -> String {
        match self {
            StaticType::UInt(t) => t.canonical_name(),
            StaticType::Int(t) => t.canonical_name(),
            StaticType::Bool(_) => BoolType::NAME.to_string(),
            StaticType::Address(_) => AddressType::NAME.to_string(),
            StaticType::Function(_) => FunctionType::NAME.to_string(),
            StaticType::FixedBytes(t) => t.canonical_name(),
            StaticType::Fixed(t) => t.canonical_name(),
            StaticType::UFixed(t) => t.canonical_name(),
            StaticType::Array(t) => t.canonical_name(),
        }
    }

    /// Encoded width in bytes
    pub fn fixed_size(&self) -> usize {
        match self {
            StaticType::Array(t) => t.fixed_size(),
            _ => WORD_SIZE,
        }
    }

    /// Encode a value into exactly [`fixed_size`](Self::fixed_size) bytes
    pub fn encode(&self, value: &Value) -> AbiResult<Vec<u8>> {
        let word = match (self, value) {
            (StaticType::Array(t), value) => return t.encode(value),
            (StaticType::UInt(t), Value::Uint(v)) => t.encode_word(v)?,
            (StaticType::Int(t), Value::Int(v)) => t.encode_word(v)?,
            (StaticType::Bool(t), Value::Bool(v)) => t.encode_word(*v),
            (StaticType::Address(t), Value::Address(v)) => t.encode_word(v),
            (StaticType::Function(t), Value::Function(v)) => t.encode_word(v),
            (StaticType::FixedBytes(t), Value::FixedBytes(v)) => t.encode_word(v)?,
            (StaticType::Fixed(t), Value::Fixed(v)) => t.encode_word(v)?,
            (StaticType::UFixed(t), Value::Fixed(v)) => t.encode_word(v)?,
            (ty, value) => return Err(mismatch(&ty.canonical_name(), value)),
        };
        Ok(word.to_vec())
    }

    /// Decode exactly [`fixed_size`](Self::fixed_size) bytes
    pub fn decode(&self, data: &[u8]) -> AbiResult<Value> {
        match self {
            StaticType::Array(t) => t.decode(data),
            StaticType::UInt(t) => t.decode_word(as_word(data)?).map(Value::Uint),
            StaticType::Int(t) => t.decode_word(as_word(data)?).map(Value::Int),
            StaticType::Bool(t) => t.decode_word(as_word(data)?).map(Value::Bool),
            StaticType::Address(t) => Ok(Value::Address(t.decode_word(as_word(data)?))),
            StaticType::Function(t) => t.decode_word(as_word(data)?).map(Value::Function),
            StaticType::FixedBytes(t) => Ok(Value::FixedBytes(t.decode_word(as_word(data)?))),
            StaticType::Fixed(t) => t.decode_word(as_word(data)?).map(Value::Fixed),
            StaticType::UFixed(t) => t.decode_word(as_word(data)?).map(Value::Fixed),
        }
    }
}

/// View a scalar encoding as one word
fn as_word(data: &[u8]) -> AbiResult<&[u8; WORD_SIZE]> {
    data.try_into().map_err(|_| {
        if data.len() < WORD_SIZE {
            AbiError::TruncatedBuffer {
                needed: WORD_SIZE,
                available: data.len(),
            }
        } else {
            AbiError::LengthMismatch {
                expected: WORD_SIZE,
                actual: data.len(),
            }
        }
    })
}

impl DynamicType {
    /// Canonical descriptor
    pub fn canonical_name(&self) -> String {
        match self {
            DynamicType::Bytes(_) => DynamicBytesType::NAME.to_string(),
            DynamicType::String(_) => StringType::NAME.to_string(),
            DynamicType::Array(t) => t.canonical_name(),
        }
    }

    /// Encode a value into its self-delimiting tail payload
    pub fn encode(&self, value: &Value) -> AbiResult<Vec<u8>> {
        match (self, value) {
            (DynamicType::Bytes(t), Value::Bytes(v)) => Ok(t.encode(v)),
            (DynamicType::String(t), Value::String(v)) => Ok(t.encode(v)),
            (DynamicType::Array(t), value) => t.encode(value),
            (ty, value) => Err(mismatch(&ty.canonical_name(), value)),
        }
    }

    /// Decode a tail payload; the buffer must hold exactly one payload
    pub fn decode(&self, data: &[u8]) -> AbiResult<Value> {
        match self {
            DynamicType::Bytes(t) => t.decode(data).map(Value::Bytes),
            DynamicType::String(t) => t.decode(data).map(Value::String),
            DynamicType::Array(t) => t.decode(data),
        }
    }
}

pub(crate) fn mismatch(expected: &str, value: &Value) -> AbiError {
    AbiError::TypeMismatch {
        expected: expected.to_string(),
        found: value.kind().to_string(),
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

impl fmt::Display for StaticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

impl fmt::Display for DynamicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.canonical_name())
    }
}

impl From<StaticType> for Type {
    fn from(t: StaticType) -> Self {
        Type::Static(t)
    }
}

impl From<DynamicType> for Type {
    fn from(t: DynamicType) -> Self {
        Type::Dynamic(t)
    }
}
