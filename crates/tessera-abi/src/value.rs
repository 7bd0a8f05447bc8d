//! ABI value definitions

use std::cmp::Ordering;
use std::fmt;

use tessera_primitives::{Address, FunctionRef, H256, U256};

use crate::word::WORD_SIZE;

/// A value carried through an ABI type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Unsigned integer (8-256 bits)
    Uint(U256),
    /// Signed integer (8-256 bits)
    Int(I256),
    /// Boolean
    Bool(bool),
    /// Address (20 bytes)
    Address(Address),
    /// Function reference (24 bytes)
    Function(FunctionRef),
    /// Fixed-size bytes (1-32)
    FixedBytes(Vec<u8>),
    /// Binary fixed-point decimal
    Fixed(FixedPoint),
    /// Dynamic bytes
    Bytes(Vec<u8>),
    /// UTF-8 string
    String(String),
    /// Fixed-size or dynamic array
    Array(Vec<Value>),
}

impl Value {
    /// Create a uint value from u128
    pub fn uint(value: u128) -> Self {
        Value::Uint(U256::from(value))
    }

    /// Create an int value from i128
    pub fn int(value: i128) -> Self {
        Value::Int(I256::from(value))
    }

    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// Create a bytes32 value
    pub fn bytes32(data: H256) -> Self {
        Value::FixedBytes(data.as_bytes().to_vec())
    }

    /// Short name of the variant, used in mismatch errors
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Uint(_) => "uint",
            Value::Int(_) => "int",
            Value::Bool(_) => "bool",
            Value::Address(_) => "address",
            Value::Function(_) => "function",
            Value::FixedBytes(_) => "fixed bytes",
            Value::Fixed(_) => "fixed",
            Value::Bytes(_) => "bytes",
            Value::String(_) => "string",
            Value::Array(_) => "array",
        }
    }

    /// Unsigned integer payload
    pub fn as_uint(&self) -> Option<&U256> {
        match self {
            Value::Uint(v) => Some(v),
            _ => None,
        }
    }

    /// Signed integer payload
    pub fn as_int(&self) -> Option<&I256> {
        match self {
            Value::Int(v) => Some(v),
            _ => None,
        }
    }

    /// Boolean payload
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Address payload
    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Value::Address(v) => Some(v),
            _ => None,
        }
    }

    /// String payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    /// Byte payload of `bytes` and `bytesN` values
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) | Value::FixedBytes(v) => Some(v),
            _ => None,
        }
    }

    /// Array elements
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Uint(v) => write!(f, "{}", v),
            Value::Int(v) => write!(f, "{}", v),
            Value::Bool(v) => write!(f, "{}", v),
            Value::Address(v) => write!(f, "{}", v),
            Value::Function(v) => write!(f, "{}", v),
            Value::FixedBytes(v) | Value::Bytes(v) => write!(f, "0x{}", hex::encode(v)),
            Value::Fixed(v) => write!(f, "{}", v),
            Value::String(v) => write!(f, "{:?}", v),
            Value::Array(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl From<U256> for Value {
    fn from(v: U256) -> Self {
        Value::Uint(v)
    }
}

impl From<I256> for Value {
    fn from(v: I256) -> Self {
        Value::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<Address> for Value {
    fn from(v: Address) -> Self {
        Value::Address(v)
    }
}

impl From<FunctionRef> for Value {
    fn from(v: FunctionRef) -> Self {
        Value::Function(v)
    }
}

impl From<FixedPoint> for Value {
    fn from(v: FixedPoint) -> Self {
        Value::Fixed(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<Vec<Value>> for Value {
    fn from(v: Vec<Value>) -> Self {
        Value::Array(v)
    }
}

/// Signed 256-bit integer in sign-magnitude form.
///
/// Zero is never negative. Magnitudes up to `2^256 - 1` are representable,
/// but only `[-2^255, 2^255)` has a two's-complement word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct I256 {
    abs: U256,
    negative: bool,
}

impl I256 {
    /// Zero
    pub const ZERO: I256 = I256 {
        abs: U256([0; 4]),
        negative: false,
    };

    /// Create from magnitude and sign
    pub fn new(abs: U256, negative: bool) -> Self {
        Self {
            abs,
            negative: negative && !abs.is_zero(),
        }
    }

    /// Create from i128
    pub fn from_i128(value: i128) -> Self {
        Self::new(U256::from(value.unsigned_abs()), value < 0)
    }

    /// Magnitude
    pub fn abs(&self) -> U256 {
        self.abs
    }

    /// Sign
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    /// Check if zero
    pub fn is_zero(&self) -> bool {
        self.abs.is_zero()
    }

    /// Two's-complement word, or `None` outside `[-2^255, 2^255)`
    pub fn to_word(&self) -> Option<[u8; WORD_SIZE]> {
        let sign_bit = U256::one() << 255;
        let twos = if self.negative {
            if self.abs > sign_bit {
                return None;
            }
            (!self.abs).overflowing_add(U256::one()).0
        } else {
            if self.abs >= sign_bit {
                return None;
            }
            self.abs
        };
        let mut bytes = [0u8; WORD_SIZE];
        twos.to_big_endian(&mut bytes);
        Some(bytes)
    }

    /// Read a two's-complement word
    pub fn from_word(word: &[u8; WORD_SIZE]) -> Self {
        let raw = U256::from_big_endian(word);
        if word[0] & 0x80 == 0 {
            return Self::new(raw, false);
        }
        // magnitude = !raw + 1; for -2^255 this is 2^255 itself
        Self::new((!raw).overflowing_add(U256::one()).0, true)
    }
}

impl From<i128> for I256 {
    fn from(value: i128) -> Self {
        Self::from_i128(value)
    }
}

impl From<i64> for I256 {
    fn from(value: i64) -> Self {
        Self::from_i128(value as i128)
    }
}

impl From<U256> for I256 {
    fn from(value: U256) -> Self {
        Self::new(value, false)
    }
}

impl Ord for I256 {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.negative, other.negative) {
            (false, false) => self.abs.cmp(&other.abs),
            (true, true) => other.abs.cmp(&self.abs),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
        }
    }
}

impl PartialOrd for I256 {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for I256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            write!(f, "-{}", self.abs)
        } else {
            write!(f, "{}", self.abs)
        }
    }
}

/// Binary fixed-point number: `raw / 2^frac_bits`.
///
/// Kept exact so that decoding an encoded value gives back the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedPoint {
    raw: I256,
    frac_bits: usize,
}

impl FixedPoint {
    /// Create from the scaled integer
    pub fn from_raw(raw: I256, frac_bits: usize) -> Self {
        Self { raw, frac_bits }
    }

    /// Nearest representable value to `value`, ties away from zero.
    ///
    /// Returns `None` for NaN, infinities and magnitudes beyond 256 bits.
    pub fn from_f64(value: f64, frac_bits: usize) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let (mantissa, exponent, negative) = decompose(value);
        let shift = exponent as i64 + frac_bits as i64;
        let abs = if shift >= 0 {
            let shift = shift as usize;
            let width = 64 - mantissa.leading_zeros() as usize;
            if mantissa != 0 && width + shift > 256 {
                return None;
            }
            U256::from(mantissa) << shift
        } else {
            let shift = shift.unsigned_abs() as usize;
            if shift > 64 {
                U256::zero()
            } else {
                let kept = if shift == 64 { 0 } else { mantissa >> shift };
                let half = (mantissa >> (shift - 1)) & 1;
                U256::from(kept) + U256::from(half)
            }
        };
        Some(Self::from_raw(I256::new(abs, negative), frac_bits))
    }

    /// Scaled integer
    pub fn raw(&self) -> &I256 {
        &self.raw
    }

    /// Number of fractional bits
    pub fn frac_bits(&self) -> usize {
        self.frac_bits
    }

    /// Approximate value as f64
    pub fn to_f64(&self) -> f64 {
        let limbs = self.raw.abs().0;
        let magnitude = limbs
            .iter()
            .rev()
            .fold(0f64, |acc, limb| acc * 18_446_744_073_709_551_616.0 + *limb as f64);
        let scaled = magnitude * 2f64.powi(-(self.frac_bits as i32));
        if self.raw.is_negative() {
            -scaled
        } else {
            scaled
        }
    }
}

impl fmt::Display for FixedPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

/// Split a finite f64 into `mantissa * 2^exponent`
fn decompose(value: f64) -> (u64, i32, bool) {
    let bits = value.to_bits();
    let negative = bits >> 63 == 1;
    let biased = ((bits >> 52) & 0x7ff) as i32;
    let fraction = bits & 0x000f_ffff_ffff_ffff;
    let mantissa = if biased == 0 {
        fraction << 1
    } else {
        fraction | 0x0010_0000_0000_0000
    };
    (mantissa, biased - 1075, negative)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_i256_from_i128() {
        let positive = I256::from_i128(100);
        assert!(!positive.is_negative());
        assert_eq!(positive.abs(), U256::from(100));

        let negative = I256::from_i128(-100);
        assert!(negative.is_negative());
        assert_eq!(negative.abs(), U256::from(100));

        assert!(I256::from_i128(0).is_zero());
    }

    #[test]
    fn test_i256_negative_zero_is_normalized() {
        assert_eq!(I256::new(U256::zero(), true), I256::ZERO);
    }

    #[test]
    fn test_i256_minus_one_word() {
        let word = I256::from_i128(-1).to_word().unwrap();
        assert_eq!(word, [0xff; 32]);
        assert_eq!(I256::from_word(&word), I256::from_i128(-1));
    }

    #[test]
    fn test_i256_extremes() {
        let sign_bit = U256::one() << 255;
        let min = I256::new(sign_bit, true);
        let word = min.to_word().unwrap();
        assert_eq!(word[0], 0x80);
        assert_eq!(I256::from_word(&word), min);

        assert!(I256::new(sign_bit, false).to_word().is_none());
        assert!(I256::new(sign_bit + U256::one(), true).to_word().is_none());
    }

    #[test]
    fn test_i256_ordering() {
        let values = [-5i128, -1, 0, 1, 7];
        for pair in values.windows(2) {
            assert!(I256::from(pair[0]) < I256::from(pair[1]));
        }
    }

    #[test]
    fn test_fixed_point_from_f64() {
        let fp = FixedPoint::from_f64(1.5, 8).unwrap();
        assert_eq!(fp.raw(), &I256::from_i128(384));
        assert_eq!(fp.to_f64(), 1.5);

        let neg = FixedPoint::from_f64(-0.25, 8).unwrap();
        assert_eq!(neg.raw(), &I256::from_i128(-64));
    }

    #[test]
    fn test_fixed_point_rounds_half_away_from_zero() {
        // 0.5 / 2^8 sits exactly between 0 and 1 ulp at 8 fractional bits
        let tiny = 0.5f64 / 256.0;
        assert_eq!(FixedPoint::from_f64(tiny, 8).unwrap().raw(), &I256::from_i128(1));
        assert_eq!(FixedPoint::from_f64(-tiny, 8).unwrap().raw(), &I256::from_i128(-1));
    }

    #[test]
    fn test_fixed_point_rejects_non_finite() {
        assert!(FixedPoint::from_f64(f64::NAN, 8).is_none());
        assert!(FixedPoint::from_f64(f64::INFINITY, 8).is_none());
    }

    #[test]
    fn test_value_accessors() {
        let value = Value::uint(7);
        assert_eq!(value.as_uint(), Some(&U256::from(7)));
        assert_eq!(value.as_bool(), None);
        assert_eq!(value.kind(), "uint");
        assert_eq!(Value::from("dave").as_str(), Some("dave"));
    }

    #[test]
    fn test_value_display() {
        let value = Value::Array(vec![Value::int(-3), Value::Bytes(vec![0xbe, 0xef])]);
        assert_eq!(value.to_string(), "[-3, 0xbeef]");
        assert_eq!(Value::string("hi").to_string(), "\"hi\"");
    }
}
