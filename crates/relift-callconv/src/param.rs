//! Parameters and returns.

use relift_core::{Expr, Type};
use std::fmt;

/// A formal parameter: a type, a name, and the location the value
/// occupies at the call boundary.
///
/// Equality deliberately ignores the name and the bound hint. Two
/// parameters are the same parameter iff their types and locations
/// agree, so renaming never changes whether an incoming location
/// matches.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    pub ty: Type,
    pub name: String,
    pub location: Expr,
    /// Name of the parameter bounding this one when it is a
    /// variable-length array, if any.
    pub bound_max: Option<String>,
}

impl Parameter {
    /// Creates a parameter with no bound hint.
    pub fn new(ty: Type, name: impl Into<String>, location: Expr) -> Self {
        Self {
            ty,
            name: name.into(),
            location,
            bound_max: None,
        }
    }
}

impl PartialEq for Parameter {
    fn eq(&self, other: &Self) -> bool {
        // Names and bound hints are labels, not identity.
        self.ty == other.ty && self.location == other.location
    }
}

impl Eq for Parameter {}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.ty, self.name, self.location)
    }
}

/// A return: a type and the location the value comes back in.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Return {
    pub ty: Type,
    pub location: Expr,
}

impl Return {
    /// Creates a return.
    pub fn new(ty: Type, location: Expr) -> Self {
        Self { ty, location }
    }
}

impl fmt::Display for Return {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.location)
    }
}
