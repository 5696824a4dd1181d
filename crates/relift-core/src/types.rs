//! Compact type lattice for signature modeling.
//!
//! Just enough structure to describe parameter and return types at a
//! call boundary: void, sized integers and floats, pointers, and a
//! width-only placeholder for values whose interpretation is not yet
//! known. Full type inference lives elsewhere.

use std::fmt;

/// A basic value type.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Type {
    /// Not yet inferred.
    Unknown,

    /// Void.
    Void,

    /// Boolean.
    Bool,

    /// Integer with size and signedness.
    Int {
        size: u8,     // 1, 2, 4, 8 bytes
        signed: bool, // signed or unsigned
    },

    /// Floating-point type.
    Float {
        size: u8, // 4 (float), 8 (double), 16 (long double)
    },

    /// Pointer to another type.
    Pointer(Box<Type>),

    /// A value of known width and unknown interpretation.
    Size { size: u8 },
}

impl Type {
    /// Creates an integer type.
    pub fn int(size: u8, signed: bool) -> Self {
        Self::Int { size, signed }
    }

    /// Creates an unsigned integer type.
    pub fn uint(size: u8) -> Self {
        Self::Int {
            size,
            signed: false,
        }
    }

    /// Creates a signed integer type.
    pub fn sint(size: u8) -> Self {
        Self::Int { size, signed: true }
    }

    /// Creates a floating-point type.
    pub fn float(size: u8) -> Self {
        Self::Float { size }
    }

    /// Creates a double-precision float.
    pub fn f64() -> Self {
        Self::Float { size: 8 }
    }

    /// Creates a pointer type.
    pub fn ptr(pointee: Type) -> Self {
        Self::Pointer(Box::new(pointee))
    }

    /// Creates a width-only type of `size` bytes.
    pub fn sized(size: u8) -> Self {
        Self::Size { size }
    }

    /// Returns true if this type is void.
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Void)
    }

    /// Returns true if this type is an integer.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::Int { .. })
    }

    /// Returns true if this type is a floating-point type.
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float { .. })
    }

    /// Returns true if this type is a pointer.
    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::Pointer(_))
    }

    /// Returns the size in bytes, if known.
    pub fn size(&self) -> Option<u8> {
        match self {
            Self::Unknown | Self::Void => None,
            Self::Bool => Some(1),
            Self::Int { size, .. } => Some(*size),
            Self::Float { size } => Some(*size),
            Self::Pointer(_) => Some(4), // 32-bit targets
            Self::Size { size } => Some(*size),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Unknown => write!(f, "unknown"),
            Type::Void => write!(f, "void"),
            Type::Bool => write!(f, "bool"),
            Type::Int { size, signed } => {
                let prefix = if *signed { "int" } else { "uint" };
                write!(f, "{}{}", prefix, size * 8)
            }
            Type::Float { size } => match size {
                4 => write!(f, "float"),
                8 => write!(f, "double"),
                _ => write!(f, "float{}", size * 8),
            },
            Type::Pointer(inner) => write!(f, "{}*", inner),
            Type::Size { size } => write!(f, "size{}", size * 8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates() {
        assert!(Type::Void.is_void());
        assert!(Type::f64().is_float());
        assert!(Type::sint(4).is_integer());
        assert!(Type::ptr(Type::uint(1)).is_pointer());
        assert!(!Type::sized(4).is_integer());
    }

    #[test]
    fn sizes() {
        assert_eq!(Type::sint(4).size(), Some(4));
        assert_eq!(Type::sized(4).size(), Some(4));
        assert_eq!(Type::ptr(Type::Void).size(), Some(4));
        assert_eq!(Type::Void.size(), None);
    }

    #[test]
    fn display() {
        assert_eq!(Type::sint(4).to_string(), "int32");
        assert_eq!(Type::uint(2).to_string(), "uint16");
        assert_eq!(Type::float(4).to_string(), "float");
        assert_eq!(Type::f64().to_string(), "double");
        assert_eq!(Type::sized(4).to_string(), "size32");
        assert_eq!(Type::ptr(Type::sint(1)).to_string(), "int8*");
    }
}
