//! Collaborator interfaces: procedure evidence and assignment facts.

use relift_core::{Expr, Machine, Platform, Type};
use std::fmt;

/// An assignment-shaped fact about one location.
///
/// `rhs: None` marks an implicit definition: the location is defined but
/// its value is unknown, as for registers a call may clobber. With a
/// `rhs` it is an ordinary `lhs := rhs` statement.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    pub ty: Type,
    pub lhs: Expr,
    pub rhs: Option<Expr>,
}

impl Assignment {
    /// An implicit definition with no type information.
    pub fn implicit(lhs: Expr) -> Self {
        Self {
            ty: Type::Void,
            lhs,
            rhs: None,
        }
    }

    /// An implicit definition carrying a type.
    pub fn implicit_typed(ty: Type, lhs: Expr) -> Self {
        Self { ty, lhs, rhs: None }
    }

    /// An ordinary assignment `lhs := rhs`.
    pub fn assign(lhs: Expr, rhs: Expr) -> Self {
        Self {
            ty: Type::Void,
            lhs,
            rhs: Some(rhs),
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rhs {
            Some(rhs) => write!(f, "{} := {}", self.lhs, rhs),
            None => write!(f, "{} := -", self.lhs),
        }
    }
}

/// Evidence about one analyzed procedure, as the signature model needs
/// it. The analysis driver's procedure type implements this; tests use a
/// small in-memory fake.
pub trait ProcedureFacts {
    /// Procedure name, for diagnostics.
    fn name(&self) -> &str;

    /// CPU family of the loaded binary.
    fn machine(&self) -> Machine;

    /// Front-end platform classification.
    fn platform(&self) -> Platform;

    /// True when the binary is a Win32 PE image.
    fn is_win32(&self) -> bool {
        false
    }

    /// The value proven to occupy `location` on every return path, if
    /// the prover established one.
    fn proven_value(&self, location: &Expr) -> Option<Expr>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        let implicit = Assignment::implicit(Expr::reg(25));
        assert_eq!(implicit.to_string(), "r25 := -");

        let retire = Assignment::assign(
            Expr::reg(28),
            Expr::add(Expr::reg(28), Expr::int(4)),
        );
        assert_eq!(retire.to_string(), "r28 := r28 + 4");
    }

    #[test]
    fn equality_covers_type_and_both_sides() {
        let a = Assignment::implicit(Expr::reg(24));
        let b = Assignment::implicit(Expr::reg(24));
        let c = Assignment::implicit_typed(Type::sized(4), Expr::reg(24));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
