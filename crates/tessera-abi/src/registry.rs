//! Type descriptor resolution.
//!
//! A [`Registry`] is an ordered list of matchers. Each matcher either claims a
//! descriptor (returning a type or a [`MalformedDescriptor`] error) or passes
//! with `Ok(None)`; the first claim wins. Array matchers come first and
//! resolve their element descriptor through the same registry, so
//! `uint8[2][]` becomes a dynamic array of `uint8[2]`.
//!
//! [`MalformedDescriptor`]: AbiError::MalformedDescriptor

use std::sync::OnceLock;

use tracing::trace;

use crate::error::{AbiError, AbiResult};
use crate::types::{
    AddressType, ArrayType, BoolType, DynamicArrayType, DynamicBytesType, DynamicType,
    FixedBytesType, FixedType, FunctionType, IntType, StaticType, StringType, Type, UFixedType,
    UIntType,
};

/// Deepest array nesting a descriptor may carry, e.g. `uint8[2][]` has depth 2
pub const MAX_ARRAY_DEPTH: usize = 32;

/// Matcher signature: claim a descriptor or pass
pub type Matcher = fn(&Registry, &str) -> AbiResult<Option<Type>>;

/// Ordered, immutable set of descriptor matchers
#[derive(Debug, Clone)]
pub struct Registry {
    matchers: Vec<Matcher>,
}

impl Registry {
    /// Registry without any matchers
    pub fn empty() -> Self {
        Self {
            matchers: Vec::new(),
        }
    }

    /// Process-wide registry with the standard matchers
    pub fn standard() -> &'static Registry {
        static STANDARD: OnceLock<Registry> = OnceLock::new();
        STANDARD.get_or_init(Registry::default)
    }

    /// New registry with `matcher` tried after the existing ones
    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matchers.push(matcher);
        self
    }

    /// Number of matchers
    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// Check if the registry has no matchers
    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    /// Resolve a descriptor such as `uint`, `bytes32` or `address[4][]`
    pub fn search(&self, descriptor: &str) -> AbiResult<Type> {
        if descriptor.is_empty() {
            return Err(AbiError::MalformedDescriptor(String::new()));
        }
        // Array matchers recurse once per suffix
        if descriptor.bytes().filter(|b| *b == b'[').count() > MAX_ARRAY_DEPTH {
            return Err(AbiError::MalformedDescriptor(descriptor.to_string()));
        }
        for matcher in &self.matchers {
            if let Some(ty) = matcher(self, descriptor)? {
                trace!(descriptor, resolved = %ty, "type resolved");
                return Ok(ty);
            }
        }
        Err(AbiError::UnknownType(descriptor.to_string()))
    }
}

impl Default for Registry {
    fn default() -> Self {
        [
            matchers::dynamic_array as Matcher,
            matchers::fixed_array,
            matchers::uint,
            matchers::int,
            matchers::address,
            matchers::bool,
            matchers::ufixed,
            matchers::fixed,
            matchers::function,
            matchers::bytes,
            matchers::fixed_bytes,
            matchers::string,
        ]
        .into_iter()
        .fold(Registry::empty(), Registry::with_matcher)
    }
}

/// The standard matchers, usable as building blocks for custom registries
pub mod matchers {
    use super::*;

    fn malformed(descriptor: &str) -> AbiError {
        AbiError::MalformedDescriptor(descriptor.to_string())
    }

    /// Parse a non-empty run of ASCII digits
    fn digits(s: &str, descriptor: &str) -> AbiResult<usize> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed(descriptor));
        }
        s.parse().map_err(|_| malformed(descriptor))
    }

    /// Optional bit-width suffix after a type prefix
    fn width(rest: &str, default: usize, descriptor: &str) -> AbiResult<usize> {
        if rest.is_empty() {
            Ok(default)
        } else {
            digits(rest, descriptor)
        }
    }

    /// `T[]`
    pub fn dynamic_array(registry: &Registry, descriptor: &str) -> AbiResult<Option<Type>> {
        let Some(inner) = descriptor.strip_suffix("[]") else {
            return Ok(None);
        };
        let element = registry.search(inner)?.into_static()?;
        Ok(Some(Type::Dynamic(DynamicType::Array(DynamicArrayType::new(
            element,
        )))))
    }

    /// `T[K]`
    pub fn fixed_array(registry: &Registry, descriptor: &str) -> AbiResult<Option<Type>> {
        let Some(open_rest) = descriptor.strip_suffix(']') else {
            return Ok(None);
        };
        let Some(open) = open_rest.rfind('[') else {
            return Err(malformed(descriptor));
        };
        let len = digits(&open_rest[open + 1..], descriptor)?;
        if len == 0 {
            return Err(malformed(descriptor));
        }
        let element = registry.search(&open_rest[..open])?.into_static()?;
        Ok(Some(Type::Static(StaticType::Array(ArrayType::new(
            element, len,
        )?))))
    }

    /// `uint`, `uintN`
    pub fn uint(_: &Registry, descriptor: &str) -> AbiResult<Option<Type>> {
        let Some(rest) = descriptor.strip_prefix("uint") else {
            return Ok(None);
        };
        let bits = width(rest, 256, descriptor)?;
        let ty = UIntType::new(bits).map_err(|_| malformed(descriptor))?;
        Ok(Some(Type::Static(StaticType::UInt(ty))))
    }

    /// `int`, `intN`
    pub fn int(_: &Registry, descriptor: &str) -> AbiResult<Option<Type>> {
        let Some(rest) = descriptor.strip_prefix("int") else {
            return Ok(None);
        };
        let bits = width(rest, 256, descriptor)?;
        let ty = IntType::new(bits).map_err(|_| malformed(descriptor))?;
        Ok(Some(Type::Static(StaticType::Int(ty))))
    }

    /// `address`
    pub fn address(_: &Registry, descriptor: &str) -> AbiResult<Option<Type>> {
        Ok((descriptor == AddressType::NAME).then_some(Type::Static(StaticType::Address(AddressType))))
    }

    /// `bool`
    pub fn bool(_: &Registry, descriptor: &str) -> AbiResult<Option<Type>> {
        Ok((descriptor == BoolType::NAME).then_some(Type::Static(StaticType::Bool(BoolType))))
    }

    /// `MxN` after a decimal prefix, both parts required when present
    fn decimal_bits(rest: &str, descriptor: &str) -> AbiResult<Option<(usize, usize)>> {
        if rest.is_empty() {
            return Ok(None);
        }
        let (m, n) = rest.split_once('x').ok_or_else(|| malformed(descriptor))?;
        Ok(Some((digits(m, descriptor)?, digits(n, descriptor)?)))
    }

    /// `ufixed`, `ufixedMxN`
    pub fn ufixed(_: &Registry, descriptor: &str) -> AbiResult<Option<Type>> {
        let Some(rest) = descriptor.strip_prefix("ufixed") else {
            return Ok(None);
        };
        let ty = match decimal_bits(rest, descriptor)? {
            None => UFixedType::default(),
            Some((m, n)) => UFixedType::new(m, n).map_err(|_| malformed(descriptor))?,
        };
        Ok(Some(Type::Static(StaticType::UFixed(ty))))
    }

    /// `fixed`, `fixedMxN`
    pub fn fixed(_: &Registry, descriptor: &str) -> AbiResult<Option<Type>> {
        let Some(rest) = descriptor.strip_prefix("fixed") else {
            return Ok(None);
        };
        let ty = match decimal_bits(rest, descriptor)? {
            None => FixedType::default(),
            Some((m, n)) => FixedType::new(m, n).map_err(|_| malformed(descriptor))?,
        };
        Ok(Some(Type::Static(StaticType::Fixed(ty))))
    }

    /// `function`
    pub fn function(_: &Registry, descriptor: &str) -> AbiResult<Option<Type>> {
        Ok((descriptor == FunctionType::NAME)
            .then_some(Type::Static(StaticType::Function(FunctionType))))
    }

    /// `bytes` (dynamic), exact match only
    pub fn bytes(_: &Registry, descriptor: &str) -> AbiResult<Option<Type>> {
        Ok((descriptor == DynamicBytesType::NAME)
            .then_some(Type::Dynamic(DynamicType::Bytes(DynamicBytesType))))
    }

    /// `bytesK` and the `byte` alias for `bytes1`
    pub fn fixed_bytes(_: &Registry, descriptor: &str) -> AbiResult<Option<Type>> {
        let len = if descriptor == "byte" {
            1
        } else if let Some(rest) = descriptor.strip_prefix("bytes") {
            digits(rest, descriptor)?
        } else {
            return Ok(None);
        };
        let ty = FixedBytesType::new(len).map_err(|_| malformed(descriptor))?;
        Ok(Some(Type::Static(StaticType::FixedBytes(ty))))
    }

    /// `string`
    pub fn string(_: &Registry, descriptor: &str) -> AbiResult<Option<Type>> {
        Ok((descriptor == StringType::NAME).then_some(Type::Dynamic(DynamicType::String(StringType))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search(descriptor: &str) -> AbiResult<Type> {
        Registry::standard().search(descriptor)
    }

    #[test]
    fn test_defaults_normalize() {
        assert_eq!(search("uint").unwrap().canonical_name(), "uint256");
        assert_eq!(search("int").unwrap().canonical_name(), "int256");
        assert_eq!(search("fixed").unwrap().canonical_name(), "fixed128x128");
        assert_eq!(search("ufixed").unwrap().canonical_name(), "ufixed128x128");
        assert_eq!(search("byte").unwrap().canonical_name(), "bytes1");
    }

    #[test]
    fn test_scalar_descriptors() {
        for name in ["uint8", "int128", "address", "bool", "function", "bytes", "bytes32", "string", "fixed64x64"] {
            assert_eq!(search(name).unwrap().canonical_name(), name);
        }
    }

    #[test]
    fn test_leading_zero_width() {
        assert_eq!(search("uint08").unwrap().canonical_name(), "uint8");
    }

    #[test]
    fn test_arrays_apply_right_to_left() {
        let ty = search("uint8[2][]").unwrap();
        match &ty {
            Type::Dynamic(DynamicType::Array(t)) => {
                assert_eq!(t.element().canonical_name(), "uint8[2]");
            }
            other => panic!("unexpected type {other}"),
        }
        assert_eq!(ty.canonical_name(), "uint8[2][]");
        assert_eq!(search("bool[3][4]").unwrap().head_size(), 12 * 32);
    }

    #[test]
    fn test_malformed_descriptors() {
        for name in ["", "uint7", "uint300", "uintx", "int+8", "bytes0", "bytes33", "bytesx", "fixed8", "fixed8x", "ufixed200x64", "uint[0]", "uint[x]", "uint]"] {
            assert!(
                matches!(search(name), Err(AbiError::MalformedDescriptor(_))),
                "{name} should be malformed"
            );
        }
    }

    #[test]
    fn test_array_depth_limit() {
        let deepest = format!("uint8{}", "[1]".repeat(MAX_ARRAY_DEPTH));
        assert_eq!(search(&deepest).unwrap().head_size(), 32);

        let too_deep = format!("uint8{}", "[1]".repeat(MAX_ARRAY_DEPTH + 1));
        assert!(matches!(search(&too_deep), Err(AbiError::MalformedDescriptor(_))));

        let hostile = format!("uint8{}", "[]".repeat(20_000));
        assert!(matches!(search(&hostile), Err(AbiError::MalformedDescriptor(_))));
    }

    #[test]
    fn test_unknown_descriptors() {
        assert_eq!(search("foo"), Err(AbiError::UnknownType("foo".to_string())));
        assert_eq!(search(" uint"), Err(AbiError::UnknownType(" uint".to_string())));
        assert_eq!(search("foo[]"), Err(AbiError::UnknownType("foo".to_string())));
    }

    #[test]
    fn test_dynamic_elements_rejected() {
        assert_eq!(
            search("string[]"),
            Err(AbiError::InvalidElementType("string".to_string()))
        );
        assert_eq!(
            search("bytes[2]"),
            Err(AbiError::InvalidElementType("bytes".to_string()))
        );
        assert_eq!(
            search("uint8[][]"),
            Err(AbiError::InvalidElementType("uint8[]".to_string()))
        );
    }

    #[test]
    fn test_custom_registry() {
        fn uint_alias(_: &Registry, d: &str) -> AbiResult<Option<Type>> {
            Ok((d == "u256").then_some(Type::Static(StaticType::UInt(UIntType::UINT256))))
        }

        let registry = Registry::empty()
            .with_matcher(matchers::dynamic_array)
            .with_matcher(uint_alias);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.search("u256[]").unwrap().canonical_name(), "uint256[]");
        assert!(matches!(
            registry.search("uint256"),
            Err(AbiError::UnknownType(_))
        ));
        assert!(Registry::empty().is_empty());
    }

    #[test]
    fn test_standard_is_shared() {
        assert!(std::ptr::eq(Registry::standard(), Registry::standard()));
        assert_eq!(Registry::standard().len(), Registry::default().len());
    }
}
