//! Word-level helpers shared by the codecs

use tessera_primitives::U256;

use crate::error::{AbiError, AbiResult};

/// Size of one ABI word in bytes
pub const WORD_SIZE: usize = 32;

/// Convert U256 to a 32-byte big-endian word
pub(crate) fn uint_word(value: &U256) -> [u8; WORD_SIZE] {
    let mut bytes = [0u8; WORD_SIZE];
    value.to_big_endian(&mut bytes);
    bytes
}

/// Encode a length or offset as an unsigned word
pub(crate) fn length_word(len: usize) -> [u8; WORD_SIZE] {
    uint_word(&U256::from(len))
}

/// Read the leading length word of `data`
pub(crate) fn read_length(data: &[u8]) -> AbiResult<usize> {
    if data.len() < WORD_SIZE {
        return Err(AbiError::TruncatedBuffer {
            needed: WORD_SIZE,
            available: data.len(),
        });
    }
    word_to_usize(&data[..WORD_SIZE]).map_err(AbiError::LengthOverflow)
}

/// Interpret a word as a machine-sized unsigned integer.
/// Returns the full value as the error when it does not fit.
pub(crate) fn word_to_usize(word: &[u8]) -> Result<usize, U256> {
    let value = U256::from_big_endian(word);
    if value > U256::from(usize::MAX) {
        return Err(value);
    }
    Ok(value.as_usize())
}

/// Round `len` up to the next word boundary
pub(crate) fn padded_len(len: usize) -> AbiResult<usize> {
    len.checked_next_multiple_of(WORD_SIZE)
        .ok_or_else(|| AbiError::LengthOverflow(U256::from(len)))
}

/// Require `data` to hold exactly `expected` bytes
pub(crate) fn expect_len(data: &[u8], expected: usize) -> AbiResult<()> {
    if data.len() < expected {
        return Err(AbiError::TruncatedBuffer {
            needed: expected,
            available: data.len(),
        });
    }
    if data.len() > expected {
        return Err(AbiError::LengthMismatch {
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length_word() {
        let word = length_word(0x0120);
        assert_eq!(word[30], 0x01);
        assert_eq!(word[31], 0x20);
        assert!(word[..30].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_read_length_truncated() {
        assert_eq!(
            read_length(&[0u8; 31]),
            Err(AbiError::TruncatedBuffer { needed: 32, available: 31 })
        );
    }

    #[test]
    fn test_read_length_overflow() {
        let word = [0xffu8; 32];
        assert!(matches!(read_length(&word), Err(AbiError::LengthOverflow(_))));
    }

    #[test]
    fn test_padded_len() {
        assert_eq!(padded_len(0).unwrap(), 0);
        assert_eq!(padded_len(1).unwrap(), 32);
        assert_eq!(padded_len(32).unwrap(), 32);
        assert_eq!(padded_len(33).unwrap(), 64);
        assert!(padded_len(usize::MAX).is_err());
    }

    #[test]
    fn test_expect_len() {
        assert!(expect_len(&[0u8; 32], 32).is_ok());
        assert!(matches!(
            expect_len(&[0u8; 16], 32),
            Err(AbiError::TruncatedBuffer { .. })
        ));
        assert!(matches!(
            expect_len(&[0u8; 64], 32),
            Err(AbiError::LengthMismatch { expected: 32, actual: 64 })
        ));
    }
}
