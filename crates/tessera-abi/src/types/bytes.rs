//! Dynamic `bytes` and `string`

use crate::error::{AbiError, AbiResult};
use crate::word::{length_word, padded_len, read_length, WORD_SIZE};

/// Length word, then the bytes zero-padded to a word boundary
fn encode_padded(data: &[u8]) -> Vec<u8> {
    let padded = data.len().next_multiple_of(WORD_SIZE);
    let mut buf = Vec::with_capacity(WORD_SIZE + padded);
    buf.extend_from_slice(&length_word(data.len()));
    buf.extend_from_slice(data);
    buf.resize(WORD_SIZE + padded, 0);
    buf
}

/// Inverse of [`encode_padded`]; the buffer must be exactly one payload
fn decode_padded(data: &[u8]) -> AbiResult<&[u8]> {
    let len = read_length(data)?;
    let padded = padded_len(len)?;
    let remaining = data.len() - WORD_SIZE;
    if remaining != padded {
        return Err(AbiError::LengthMismatch {
            expected: padded,
            actual: remaining,
        });
    }
    Ok(&data[WORD_SIZE..WORD_SIZE + len])
}

/// `bytes`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DynamicBytesType;

impl DynamicBytesType {
    /// Canonical descriptor
    pub const NAME: &'static str = "bytes";

    /// Encode length-prefixed and right-padded
    pub fn encode(&self, value: &[u8]) -> Vec<u8> {
        encode_padded(value)
    }

    /// Decode one payload; padding is not inspected
    pub fn decode(&self, data: &[u8]) -> AbiResult<Vec<u8>> {
        decode_padded(data).map(<[u8]>::to_vec)
    }
}

/// `string`, UTF-8 encoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StringType;

impl StringType {
    /// Canonical descriptor
    pub const NAME: &'static str = "string";

    /// Encode the UTF-8 bytes like `bytes`
    pub fn encode(&self, value: &str) -> Vec<u8> {
        encode_padded(value.as_bytes())
    }

    /// Decode one payload and validate UTF-8
    pub fn decode(&self, data: &[u8]) -> AbiResult<String> {
        let bytes = decode_padded(data)?;
        Ok(String::from_utf8(bytes.to_vec())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_encoding() {
        let encoded = DynamicBytesType.encode(&[0xaa, 0xbb]);
        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded[31], 2);
        assert_eq!(&encoded[32..34], &[0xaa, 0xbb]);
        assert!(encoded[34..].iter().all(|b| *b == 0));
        assert_eq!(DynamicBytesType.decode(&encoded).unwrap(), vec![0xaa, 0xbb]);
    }

    #[test]
    fn test_empty_bytes() {
        let encoded = DynamicBytesType.encode(&[]);
        assert_eq!(encoded, vec![0u8; 32]);
        assert_eq!(DynamicBytesType.decode(&encoded).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn test_word_aligned_bytes_have_no_padding() {
        let encoded = DynamicBytesType.encode(&[7u8; 32]);
        assert_eq!(encoded.len(), 64);
    }

    #[test]
    fn test_bytes_trailing_data_rejected() {
        let mut encoded = DynamicBytesType.encode(&[1, 2, 3]);
        encoded.extend_from_slice(&[0u8; 32]);
        assert_eq!(
            DynamicBytesType.decode(&encoded),
            Err(AbiError::LengthMismatch { expected: 32, actual: 64 })
        );
    }

    #[test]
    fn test_bytes_truncated_payload() {
        let encoded = DynamicBytesType.encode(&[1u8; 40]);
        assert!(matches!(
            DynamicBytesType.decode(&encoded[..64]),
            Err(AbiError::LengthMismatch { expected: 64, actual: 32 })
        ));
    }

    #[test]
    fn test_string_roundtrip() {
        let encoded = StringType.encode("dave");
        assert_eq!(encoded.len(), 64);
        assert_eq!(&encoded[32..36], b"dave");
        assert_eq!(StringType.decode(&encoded).unwrap(), "dave");
    }

    #[test]
    fn test_string_invalid_utf8() {
        let encoded = DynamicBytesType.encode(&[0xff, 0xfe]);
        assert!(matches!(
            StringType.decode(&encoded),
            Err(AbiError::InvalidUtf8(_))
        ));
    }
}
