//! Fixed-length (`T[K]`) and variable-length (`T[]`) arrays of static elements

use crate::error::{AbiError, AbiResult};
use crate::types::{mismatch, StaticType};
use crate::value::Value;
use crate::word::{expect_len, length_word, read_length, WORD_SIZE};

/// `T[K]`: K static elements laid out back to back
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayType {
    element: Box<StaticType>,
    len: usize,
    size: usize,
}

impl ArrayType {
    /// Create `element[len]`; `len` must be positive
    pub fn new(element: StaticType, len: usize) -> AbiResult<Self> {
        if len == 0 {
            return Err(AbiError::MalformedDescriptor(format!("{}[0]", element)));
        }
        let size = element
            .fixed_size()
            .checked_mul(len)
            .ok_or_else(|| AbiError::LengthOverflow(len.into()))?;
        Ok(Self {
            element: Box::new(element),
            len,
            size,
        })
    }

    /// Element type
    pub fn element(&self) -> &StaticType {
        &self.element
    }

    /// Element count
    pub fn len(&self) -> usize {
        self.len
    }

    /// Encoded width: element width times count
    pub fn fixed_size(&self) -> usize {
        self.size
    }

    /// Canonical descriptor, e.g. `uint256[3]`
    pub fn canonical_name(&self) -> String {
        format!("{}[{}]", self.element.canonical_name(), self.len)
    }

    /// Encode exactly `len` elements
    pub fn encode(&self, value: &Value) -> AbiResult<Vec<u8>> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(mismatch(&self.canonical_name(), other)),
        };
        if items.len() != self.len {
            return Err(AbiError::LengthMismatch {
                expected: self.len,
                actual: items.len(),
            });
        }
        let mut buf = Vec::new();
        for item in items {
            buf.extend(self.element.encode(item)?);
        }
        Ok(buf)
    }

    /// Decode exactly [`fixed_size`](Self::fixed_size) bytes
    pub fn decode(&self, data: &[u8]) -> AbiResult<Value> {
        expect_len(data, self.size)?;
        data.chunks_exact(self.element.fixed_size())
            .map(|chunk| self.element.decode(chunk))
            .collect::<AbiResult<Vec<_>>>()
            .map(Value::Array)
    }
}

/// `T[]`: a length word followed by that many static elements
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DynamicArrayType {
    element: Box<StaticType>,
}

impl DynamicArrayType {
    /// Create `element[]`
    pub fn new(element: StaticType) -> Self {
        Self {
            element: Box::new(element),
        }
    }

    /// Element type
    pub fn element(&self) -> &StaticType {
        &self.element
    }

    /// Canonical descriptor, e.g. `address[]`
    pub fn canonical_name(&self) -> String {
        format!("{}[]", self.element.canonical_name())
    }

    /// Encode the length word and the elements; an empty array is one zero word
    pub fn encode(&self, value: &Value) -> AbiResult<Vec<u8>> {
        let items = match value {
            Value::Array(items) => items,
            other => return Err(mismatch(&self.canonical_name(), other)),
        };
        let mut buf = length_word(items.len()).to_vec();
        for item in items {
            buf.extend(self.element.encode(item)?);
        }
        Ok(buf)
    }

    /// Decode a buffer holding exactly one encoded array
    pub fn decode(&self, data: &[u8]) -> AbiResult<Value> {
        let count = read_length(data)?;
        let payload = self.payload_len(count)?;
        let remaining = data.len() - WORD_SIZE;
        if remaining != payload {
            return Err(AbiError::LengthMismatch {
                expected: payload,
                actual: remaining,
            });
        }
        self.decode_elements(&data[WORD_SIZE..], count).map(Value::Array)
    }

    /// Decode an encoded array at the start of `data`, ignoring trailing bytes.
    ///
    /// Returns the elements and the number of bytes consumed.
    pub fn decode_prefix(&self, data: &[u8]) -> AbiResult<(Vec<Value>, usize)> {
        let count = read_length(data)?;
        let payload = self.payload_len(count)?;
        let consumed = payload
            .checked_add(WORD_SIZE)
            .ok_or_else(|| AbiError::LengthOverflow(count.into()))?;
        if data.len() < consumed {
            return Err(AbiError::TruncatedBuffer {
                needed: consumed,
                available: data.len(),
            });
        }
        let items = self.decode_elements(&data[WORD_SIZE..consumed], count)?;
        Ok((items, consumed))
    }

    fn payload_len(&self, count: usize) -> AbiResult<usize> {
        count
            .checked_mul(self.element.fixed_size())
            .ok_or_else(|| AbiError::LengthOverflow(count.into()))
    }

    fn decode_elements(&self, payload: &[u8], count: usize) -> AbiResult<Vec<Value>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        payload
            .chunks_exact(self.element.fixed_size())
            .map(|chunk| self.element.decode(chunk))
            .collect()
    }
}
