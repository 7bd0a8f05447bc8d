//! Integer and boolean types

use tessera_primitives::U256;

use crate::error::{AbiError, AbiResult};
use crate::value::I256;
use crate::word::{uint_word, WORD_SIZE};

/// Bit widths with shared, precomputed instances
pub const STANDARD_BITS: [usize; 6] = [8, 16, 32, 64, 128, 256];

/// `2^bits - 1`, computed at compile time for the standard table
pub(crate) const fn low_mask(bits: usize) -> U256 {
    let mut limbs = [0u64; 4];
    let mut i = 0;
    while i < 4 {
        let lo = i * 64;
        if bits >= lo + 64 {
            limbs[i] = u64::MAX;
        } else if bits > lo {
            limbs[i] = (1u64 << (bits - lo)) - 1;
        }
        i += 1;
    }
    U256(limbs)
}

pub(crate) fn check_bits(kind: &'static str, bits: usize) -> AbiResult<()> {
    if bits == 0 || bits > 256 || bits % 8 != 0 {
        return Err(AbiError::InvalidBitWidth { kind, bits });
    }
    Ok(())
}

/// Unsigned integer type, `[0, 2^bits)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UIntType {
    bits: usize,
    max: U256,
}

const STANDARD_UINTS: [UIntType; 6] = [
    UIntType::standard(8),
    UIntType::standard(16),
    UIntType::standard(32),
    UIntType::standard(64),
    UIntType::standard(128),
    UIntType::standard(256),
];

impl UIntType {
    /// `uint8`
    pub const UINT8: UIntType = STANDARD_UINTS[0];
    /// `uint256`, the default width
    pub const UINT256: UIntType = STANDARD_UINTS[5];

    const fn standard(bits: usize) -> Self {
        Self {
            bits,
            max: low_mask(bits),
        }
    }

    /// Type of the given width; standard widths come from the shared table
    pub fn new(bits: usize) -> AbiResult<Self> {
        if let Some(cached) = STANDARD_UINTS.iter().find(|t| t.bits == bits) {
            return Ok(*cached);
        }
        check_bits("uint", bits)?;
        Ok(Self::standard(bits))
    }

    /// Bit width
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Smallest accepted value
    pub fn min_value(&self) -> U256 {
        U256::zero()
    }

    /// Largest accepted value (inclusive)
    pub fn max_value(&self) -> U256 {
        self.max
    }

    /// Canonical descriptor
    pub fn canonical_name(&self) -> String {
        format!("uint{}", self.bits)
    }

    /// Encode as a right-aligned big-endian word
    pub fn encode_word(&self, value: &U256) -> AbiResult<[u8; WORD_SIZE]> {
        if *value > self.max {
            return Err(AbiError::ValueOutOfRange {
                ty: self.canonical_name(),
                value: value.to_string(),
            });
        }
        Ok(uint_word(value))
    }

    /// Decode a word, rejecting bits above the type width
    pub fn decode_word(&self, word: &[u8; WORD_SIZE]) -> AbiResult<U256> {
        let value = U256::from_big_endian(word);
        if value > self.max {
            return Err(AbiError::ValueOutOfRange {
                ty: self.canonical_name(),
                value: value.to_string(),
            });
        }
        Ok(value)
    }
}

impl Default for UIntType {
    fn default() -> Self {
        Self::UINT256
    }
}

/// Signed integer type, `[-2^(bits-1), 2^(bits-1))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IntType {
    bits: usize,
    max_positive: U256,
}

const STANDARD_INTS: [IntType; 6] = [
    IntType::standard(8),
    IntType::standard(16),
    IntType::standard(32),
    IntType::standard(64),
    IntType::standard(128),
    IntType::standard(256),
];

impl IntType {
    /// `int8`
    pub const INT8: IntType = STANDARD_INTS[0];
    /// `int256`, the default width
    pub const INT256: IntType = STANDARD_INTS[5];

    const fn standard(bits: usize) -> Self {
        Self {
            bits,
            max_positive: low_mask(bits - 1),
        }
    }

    /// Type of the given width; standard widths come from the shared table
    pub fn new(bits: usize) -> AbiResult<Self> {
        if let Some(cached) = STANDARD_INTS.iter().find(|t| t.bits == bits) {
            return Ok(*cached);
        }
        check_bits("int", bits)?;
        Ok(Self::standard(bits))
    }

    /// Bit width
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Smallest accepted value, `-2^(bits-1)`
    pub fn min_value(&self) -> I256 {
        I256::new(self.max_positive + U256::one(), true)
    }

    /// Largest accepted value, `2^(bits-1) - 1`
    pub fn max_value(&self) -> I256 {
        I256::new(self.max_positive, false)
    }

    /// Check the value against the type bounds
    pub fn is_valid(&self, value: &I256) -> bool {
        *value >= self.min_value() && *value <= self.max_value()
    }

    /// Canonical descriptor
    pub fn canonical_name(&self) -> String {
        format!("int{}", self.bits)
    }

    /// Encode as a sign-extended two's-complement word
    pub fn encode_word(&self, value: &I256) -> AbiResult<[u8; WORD_SIZE]> {
        if !self.is_valid(value) {
            return Err(self.out_of_range(value));
        }
        value.to_word().ok_or_else(|| self.out_of_range(value))
    }

    /// Decode a word, rejecting words that are not a sign extension of `bits`
    pub fn decode_word(&self, word: &[u8; WORD_SIZE]) -> AbiResult<I256> {
        let value = I256::from_word(word);
        if !self.is_valid(&value) {
            return Err(self.out_of_range(&value));
        }
        Ok(value)
    }

    fn out_of_range(&self, value: &I256) -> AbiError {
        AbiError::ValueOutOfRange {
            ty: self.canonical_name(),
            value: value.to_string(),
        }
    }
}

impl Default for IntType {
    fn default() -> Self {
        Self::INT256
    }
}

/// Boolean, encoded as a one-word unsigned 0 or 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BoolType;

impl BoolType {
    /// Canonical descriptor
    pub const NAME: &'static str = "bool";

    /// Encode as word `0` or `1`
    pub fn encode_word(&self, value: bool) -> [u8; WORD_SIZE] {
        let mut buf = [0u8; WORD_SIZE];
        buf[WORD_SIZE - 1] = u8::from(value);
        buf
    }

    /// Decode a word; anything other than 0 or 1 is out of range
    pub fn decode_word(&self, word: &[u8; WORD_SIZE]) -> AbiResult<bool> {
        let value = U256::from_big_endian(word);
        if value > U256::one() {
            return Err(AbiError::ValueOutOfRange {
                ty: Self::NAME.to_string(),
                value: value.to_string(),
            });
        }
        Ok(value == U256::one())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uint8_range() {
        let t = UIntType::UINT8;
        assert!(t.encode_word(&U256::from(255)).is_ok());
        assert!(matches!(
            t.encode_word(&U256::from(256)),
            Err(AbiError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_uint_standard_widths_are_cached() {
        for bits in STANDARD_BITS {
            let t = UIntType::new(bits).unwrap();
            assert_eq!(t.bits(), bits);
            assert_eq!(t.max_value(), U256::MAX >> (256 - bits));
        }
    }

    #[test]
    fn test_uint_custom_width() {
        let t = UIntType::new(24).unwrap();
        assert_eq!(t.max_value(), U256::from(0xff_ffffu64));
        assert_eq!(t.canonical_name(), "uint24");
    }

    #[test]
    fn test_invalid_widths() {
        for bits in [0usize, 7, 12, 264] {
            assert_eq!(
                UIntType::new(bits),
                Err(AbiError::InvalidBitWidth { kind: "uint", bits })
            );
            assert_eq!(
                IntType::new(bits),
                Err(AbiError::InvalidBitWidth { kind: "int", bits })
            );
        }
    }

    #[test]
    fn test_uint_decode_rejects_excess_bits() {
        let mut word = [0u8; 32];
        word[30] = 1;
        assert!(UIntType::UINT8.decode_word(&word).is_err());
        assert_eq!(
            UIntType::new(16).unwrap().decode_word(&word).unwrap(),
            U256::from(256)
        );
    }

    #[test]
    fn test_int8_range() {
        let t = IntType::INT8;
        assert!(t.encode_word(&I256::from(-128i64)).is_ok());
        assert!(t.encode_word(&I256::from(127i64)).is_ok());
        assert!(t.encode_word(&I256::from(-129i64)).is_err());
        assert!(t.encode_word(&I256::from(128i64)).is_err());
    }

    #[test]
    fn test_int_sign_extension() {
        let word = IntType::INT8.encode_word(&I256::from(-2i64)).unwrap();
        assert_eq!(word[0], 0xff);
        assert_eq!(word[31], 0xfe);
        assert_eq!(IntType::INT8.decode_word(&word).unwrap(), I256::from(-2i64));
    }

    #[test]
    fn test_int_decode_rejects_broken_sign_extension() {
        // 0x00..0080 is +128, outside int8
        let mut word = [0u8; 32];
        word[31] = 0x80;
        assert!(IntType::INT8.decode_word(&word).is_err());
        assert!(IntType::new(16).unwrap().decode_word(&word).is_ok());
    }

    #[test]
    fn test_int256_bounds() {
        let t = IntType::INT256;
        assert!(t.encode_word(&t.min_value()).is_ok());
        assert!(t.encode_word(&t.max_value()).is_ok());
        let word = t.encode_word(&t.min_value()).unwrap();
        assert_eq!(t.decode_word(&word).unwrap(), t.min_value());
    }

    #[test]
    fn test_bool_words() {
        let t = BoolType;
        assert_eq!(t.encode_word(true)[31], 1);
        assert_eq!(t.encode_word(false), [0u8; 32]);

        let mut two = [0u8; 32];
        two[31] = 2;
        assert!(t.decode_word(&two).is_err());
    }
}
