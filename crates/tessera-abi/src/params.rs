//! Head/tail encoding of argument lists.
//!
//! Static arguments are written in place into the head. Each dynamic argument
//! takes one word in the head holding the byte offset of its payload, and the
//! payloads follow the head in argument order.

use tessera_primitives::U256;
use tracing::debug;

use crate::error::{AbiError, AbiResult};
use crate::registry::Registry;
use crate::types::Type;
use crate::value::Value;
use crate::word::{length_word, word_to_usize, WORD_SIZE};

/// Ordered list of argument types
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ParameterList {
    types: Vec<Type>,
    head_size: usize,
}

impl ParameterList {
    /// Create from resolved types
    pub fn new(types: Vec<Type>) -> Self {
        let head_size = types
            .iter()
            .map(Type::head_size)
            .fold(0, usize::saturating_add);
        Self { types, head_size }
    }

    /// Parse a comma-separated descriptor list such as `uint256,address[]`.
    ///
    /// The empty string is the empty list.
    pub fn from_signature(registry: &Registry, signature: &str) -> AbiResult<Self> {
        if signature.is_empty() {
            return Ok(Self::default());
        }
        let types = signature
            .split(',')
            .map(|descriptor| {
                if descriptor.is_empty() {
                    Err(AbiError::MalformedDescriptor(signature.to_string()))
                } else {
                    registry.search(descriptor)
                }
            })
            .collect::<AbiResult<Vec<_>>>()?;
        Ok(Self::new(types))
    }

    /// Argument types
    pub fn types(&self) -> &[Type] {
        &self.types
    }

    /// Number of arguments
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if there are no arguments
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Bytes taken by the head
    pub fn head_size(&self) -> usize {
        self.head_size
    }

    /// Canonical names of the argument types
    pub fn canonical_names(&self) -> Vec<String> {
        self.types.iter().map(Type::canonical_name).collect()
    }

    /// Canonical comma-separated form, as used in method signatures
    pub fn to_signature(&self) -> String {
        self.canonical_names().join(",")
    }

    /// Encode one value per argument
    pub fn encode(&self, values: &[Value]) -> AbiResult<Vec<u8>> {
        if values.len() != self.types.len() {
            return Err(AbiError::LengthMismatch {
                expected: self.types.len(),
                actual: values.len(),
            });
        }

        // Buffers grow with the values; the declared head size may be unbounded
        let mut head = Vec::new();
        let mut tail = Vec::new();

        for (ty, value) in self.types.iter().zip(values) {
            match ty {
                Type::Static(t) => head.extend(t.encode(value)?),
                Type::Dynamic(t) => {
                    // Offset from the start of the buffer to this payload
                    let offset = self
                        .head_size
                        .checked_add(tail.len())
                        .ok_or_else(|| AbiError::LengthOverflow(U256::from(tail.len())))?;
                    head.extend_from_slice(&length_word(offset));
                    tail.extend(t.encode(value)?);
                }
            }
        }

        head.extend(tail);
        Ok(head)
    }

    /// Decode a buffer holding exactly one encoded argument list
    pub fn decode(&self, data: &[u8]) -> AbiResult<Vec<Value>> {
        self.decode_inner(data).inspect_err(|e| {
            debug!(
                params = %self.to_signature(),
                len = data.len(),
                error = %e,
                "parameter list decode failed"
            );
        })
    }

    fn decode_inner(&self, data: &[u8]) -> AbiResult<Vec<Value>> {
        if data.len() < self.head_size {
            return Err(AbiError::TruncatedBuffer {
                needed: self.head_size,
                available: data.len(),
            });
        }

        // Byte range of every argument; dynamic ones are filled in below
        let mut spans = Vec::with_capacity(self.types.len());
        let mut slots = Vec::new();
        let mut pos = 0;
        for (index, ty) in self.types.iter().enumerate() {
            let size = ty.head_size();
            if ty.is_dynamic() {
                slots.push((index, pos));
            }
            spans.push(pos..pos + size);
            pos += size;
        }

        // Payloads are contiguous and ordered, so each one ends where the next begins
        let mut upper = data.len();
        for (index, pos) in slots.into_iter().rev() {
            let word = &data[pos..pos + WORD_SIZE];
            let offset = match word_to_usize(word) {
                Ok(offset) if offset >= self.head_size && offset < upper => offset,
                Ok(offset) => return Err(self.invalid_offset(offset.into(), upper)),
                Err(offset) => return Err(self.invalid_offset(offset, upper)),
            };
            spans[index] = offset..upper;
            upper = offset;
        }

        if upper != self.head_size {
            return Err(AbiError::EncodingIncomplete {
                boundary: upper,
                head_size: self.head_size,
            });
        }

        self.types
            .iter()
            .zip(spans)
            .map(|(ty, span)| ty.decode(&data[span]))
            .collect()
    }

    fn invalid_offset(&self, offset: U256, upper: usize) -> AbiError {
        AbiError::InvalidOffset {
            offset,
            lower: self.head_size,
            upper,
        }
    }
}

impl From<Vec<Type>> for ParameterList {
    fn from(types: Vec<Type>) -> Self {
        Self::new(types)
    }
}
