//! Binary fixed-point types (`fixedMxN`, `ufixedMxN`)
//!
//! A value is carried as an integer scaled by `2^N` and encoded through the
//! integer type of width `M + N`.

use crate::error::{AbiError, AbiResult};
use crate::types::numeric::{IntType, UIntType};
use crate::value::{FixedPoint, I256};
use crate::word::WORD_SIZE;

fn check_decimal_bits(kind: &'static str, m: usize, n: usize) -> AbiResult<()> {
    for bits in [m, n] {
        if bits == 0 || bits % 8 != 0 {
            return Err(AbiError::InvalidBitWidth { kind, bits });
        }
    }
    if m + n > 256 {
        return Err(AbiError::InvalidBitWidth { kind, bits: m + n });
    }
    Ok(())
}

fn check_scale(ty: String, n: usize, value: &FixedPoint) -> AbiResult<()> {
    if value.frac_bits() != n {
        return Err(AbiError::TypeMismatch {
            expected: ty,
            found: format!("fixed with {} fractional bits", value.frac_bits()),
        });
    }
    Ok(())
}

/// Signed fixed-point, `fixedMxN`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedType {
    m: usize,
    n: usize,
    int: IntType,
}

impl FixedType {
    /// `fixedMxN` with `M` integer and `N` fractional bits
    pub fn new(m: usize, n: usize) -> AbiResult<Self> {
        check_decimal_bits("fixed", m, n)?;
        Ok(Self {
            m,
            n,
            int: IntType::new(m + n)?,
        })
    }

    /// Integer bits
    pub fn m_bits(&self) -> usize {
        self.m
    }

    /// Fractional bits
    pub fn n_bits(&self) -> usize {
        self.n
    }

    /// Smallest accepted value
    pub fn min_value(&self) -> FixedPoint {
        FixedPoint::from_raw(self.int.min_value(), self.n)
    }

    /// Largest accepted value
    pub fn max_value(&self) -> FixedPoint {
        FixedPoint::from_raw(self.int.max_value(), self.n)
    }

    /// Canonical descriptor
    pub fn canonical_name(&self) -> String {
        format!("fixed{}x{}", self.m, self.n)
    }

    /// Encode the scaled integer; the value must carry exactly `N` fractional bits
    pub fn encode_word(&self, value: &FixedPoint) -> AbiResult<[u8; WORD_SIZE]> {
        check_scale(self.canonical_name(), self.n, value)?;
        self.int
            .encode_word(value.raw())
            .map_err(|_| self.out_of_range(value))
    }

    /// Decode the scaled integer
    pub fn decode_word(&self, word: &[u8; WORD_SIZE]) -> AbiResult<FixedPoint> {
        let raw = self.int.decode_word(word)?;
        Ok(FixedPoint::from_raw(raw, self.n))
    }

    fn out_of_range(&self, value: &FixedPoint) -> AbiError {
        AbiError::ValueOutOfRange {
            ty: self.canonical_name(),
            value: value.to_string(),
        }
    }
}

impl Default for FixedType {
    fn default() -> Self {
        Self {
            m: 128,
            n: 128,
            int: IntType::INT256,
        }
    }
}

/// Unsigned fixed-point, `ufixedMxN`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UFixedType {
    m: usize,
    n: usize,
    uint: UIntType,
}

impl UFixedType {
    /// `ufixedMxN` with `M` integer and `N` fractional bits
    pub fn new(m: usize, n: usize) -> AbiResult<Self> {
        check_decimal_bits("ufixed", m, n)?;
        Ok(Self {
            m,
            n,
            uint: UIntType::new(m + n)?,
        })
    }

    /// Integer bits
    pub fn m_bits(&self) -> usize {
        self.m
    }

    /// Fractional bits
    pub fn n_bits(&self) -> usize {
        self.n
    }

    /// Smallest accepted value (zero)
    pub fn min_value(&self) -> FixedPoint {
        FixedPoint::from_raw(I256::ZERO, self.n)
    }

    /// Largest accepted value
    pub fn max_value(&self) -> FixedPoint {
        FixedPoint::from_raw(I256::from(self.uint.max_value()), self.n)
    }

    /// Canonical descriptor
    pub fn canonical_name(&self) -> String {
        format!("ufixed{}x{}", self.m, self.n)
    }

    /// Encode the scaled integer; negative values are out of range
    pub fn encode_word(&self, value: &FixedPoint) -> AbiResult<[u8; WORD_SIZE]> {
        check_scale(self.canonical_name(), self.n, value)?;
        if value.raw().is_negative() {
            return Err(self.out_of_range(value));
        }
        self.uint
            .encode_word(&value.raw().abs())
            .map_err(|_| self.out_of_range(value))
    }

    /// Decode the scaled integer
    pub fn decode_word(&self, word: &[u8; WORD_SIZE]) -> AbiResult<FixedPoint> {
        let raw = self.uint.decode_word(word)?;
        Ok(FixedPoint::from_raw(I256::from(raw), self.n))
    }

    fn out_of_range(&self, value: &FixedPoint) -> AbiError {
        AbiError::ValueOutOfRange {
            ty: self.canonical_name(),
            value: value.to_string(),
        }
    }
}

impl Default for UFixedType {
    fn default() -> Self {
        Self {
            m: 128,
            n: 128,
            uint: UIntType::UINT256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_primitives::U256;

    #[test]
    fn test_defaults() {
        assert_eq!(FixedType::default(), FixedType::new(128, 128).unwrap());
        assert_eq!(UFixedType::default(), UFixedType::new(128, 128).unwrap());
        assert_eq!(FixedType::default().canonical_name(), "fixed128x128");
    }

    #[test]
    fn test_invalid_widths() {
        assert!(FixedType::new(0, 8).is_err());
        assert!(FixedType::new(8, 12).is_err());
        assert_eq!(
            UFixedType::new(200, 64),
            Err(AbiError::InvalidBitWidth { kind: "ufixed", bits: 264 })
        );
    }

    #[test]
    fn test_fixed_encode_scaled() {
        let t = FixedType::new(8, 8).unwrap();
        let value = FixedPoint::from_f64(-1.5, 8).unwrap();
        let word = t.encode_word(&value).unwrap();
        // -384 in two's complement
        assert_eq!(&word[30..], &[0xfe, 0x80]);
        assert!(word[..30].iter().all(|b| *b == 0xff));
        assert_eq!(t.decode_word(&word).unwrap(), value);
    }

    #[test]
    fn test_fixed_bounds() {
        let t = FixedType::new(8, 8).unwrap();
        assert!(t.encode_word(&t.max_value()).is_ok());
        assert!(t.encode_word(&t.min_value()).is_ok());

        let too_big = FixedPoint::from_f64(128.0, 8).unwrap();
        assert!(matches!(
            t.encode_word(&too_big),
            Err(AbiError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_scale_mismatch() {
        let t = FixedType::new(8, 8).unwrap();
        let value = FixedPoint::from_f64(1.0, 16).unwrap();
        assert!(matches!(
            t.encode_word(&value),
            Err(AbiError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_ufixed_rejects_negative() {
        let t = UFixedType::new(8, 8).unwrap();
        let value = FixedPoint::from_f64(-0.5, 8).unwrap();
        assert!(matches!(
            t.encode_word(&value),
            Err(AbiError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_ufixed_roundtrip() {
        let t = UFixedType::new(16, 16).unwrap();
        let value = FixedPoint::from_f64(3.25, 16).unwrap();
        let word = t.encode_word(&value).unwrap();
        assert_eq!(U256::from_big_endian(&word), U256::from(3 * 65536 + 16384));
        assert_eq!(t.decode_word(&word).unwrap(), value);
    }
}
