//! Symbolic location expressions.
//!
//! A small tree describing where a value lives at a call boundary:
//! registers, memory addressed off a register, address-of, and
//! subscripted references pinning a value to its defining statement.
//! Signature code only builds, compares, and inspects these trees;
//! simplification and dataflow live elsewhere.

use std::fmt;

/// Binary operators appearing in location expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinOp {
    Add,
    Sub,
    Mul,
}

impl BinOp {
    /// Returns the operator string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
        }
    }
}

/// A symbolic location expression.
///
/// Equality and ordering are structural: two expressions denote the same
/// location iff they are equal trees. The derived total order carries no
/// semantic weight; it exists so collections of locations can be sorted
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Expr {
    /// A register in the front end's numbering scheme (`r24`).
    Reg(u16),
    /// An integer constant.
    Int(i64),
    /// Memory addressed by the inner expression (`m[r28 + 4]`).
    Mem(Box<Expr>),
    /// The address of a location (`a[m[r14 + 8]]`).
    AddrOf(Box<Expr>),
    /// A binary operator node.
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// A location pinned to the statement that defined it. `def: None`
    /// marks the value the location held on entry to the procedure,
    /// written `r28{-}`.
    Subscript { base: Box<Expr>, def: Option<u32> },
    /// The program counter.
    Pc,
    /// Matches any subexpression when used in a pattern.
    Wild,
}

impl Expr {
    /// A register by id.
    pub fn reg(id: u16) -> Self {
        Self::Reg(id)
    }

    /// An integer constant.
    pub fn int(value: i64) -> Self {
        Self::Int(value)
    }

    /// A memory access at `addr`.
    pub fn mem(addr: Expr) -> Self {
        Self::Mem(Box::new(addr))
    }

    /// The address of `inner`.
    pub fn addr_of(inner: Expr) -> Self {
        Self::AddrOf(Box::new(inner))
    }

    /// A binary operator node.
    pub fn binop(op: BinOp, lhs: Expr, rhs: Expr) -> Self {
        Self::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// `lhs + rhs`.
    pub fn add(lhs: Expr, rhs: Expr) -> Self {
        Self::binop(BinOp::Add, lhs, rhs)
    }

    /// `lhs - rhs`.
    pub fn sub(lhs: Expr, rhs: Expr) -> Self {
        Self::binop(BinOp::Sub, lhs, rhs)
    }

    /// `base` subscripted with the statement that defined it.
    pub fn subscripted(base: Expr, def: u32) -> Self {
        Self::Subscript {
            base: Box::new(base),
            def: Some(def),
        }
    }

    /// `base` subscripted with the implicit entry definition (`base{-}`).
    pub fn entry(base: Expr) -> Self {
        Self::Subscript {
            base: Box::new(base),
            def: None,
        }
    }

    /// True when this is a register.
    pub fn is_reg(&self) -> bool {
        matches!(self, Self::Reg(_))
    }

    /// The register id, when this is a register.
    pub fn reg_id(&self) -> Option<u16> {
        match self {
            Self::Reg(id) => Some(*id),
            _ => None,
        }
    }

    /// True when this is exactly register `id`.
    pub fn is_reg_n(&self, id: u16) -> bool {
        matches!(self, Self::Reg(r) if *r == id)
    }

    /// True when this is a memory access.
    pub fn is_mem(&self) -> bool {
        matches!(self, Self::Mem(_))
    }

    /// The address operand, when this is a memory access.
    pub fn mem_addr(&self) -> Option<&Expr> {
        match self {
            Self::Mem(addr) => Some(addr),
            _ => None,
        }
    }

    /// The constant value, when this is an integer constant.
    pub fn int_value(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// True when this is a subscripted reference.
    pub fn is_subscript(&self) -> bool {
        matches!(self, Self::Subscript { .. })
    }

    /// True when this is a reference to a location's value at procedure
    /// entry (`e{-}`).
    pub fn is_entry_ref(&self) -> bool {
        matches!(self, Self::Subscript { def: None, .. })
    }

    /// The underlying location with any subscripts peeled off.
    pub fn strip_subscripts(&self) -> &Expr {
        let mut e = self;
        while let Self::Subscript { base, .. } = e {
            e = base;
        }
        e
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reg(id) => write!(f, "r{}", id),
            Self::Int(value) => write!(f, "{}", value),
            Self::Mem(addr) => write!(f, "m[{}]", addr),
            Self::AddrOf(inner) => write!(f, "a[{}]", inner),
            Self::Binary { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op.as_str(), rhs),
            Self::Subscript { base, def: Some(n) } => write!(f, "{}{{{}}}", base, n),
            Self::Subscript { base, def: None } => write!(f, "{}{{-}}", base),
            Self::Pc => write!(f, "%pc"),
            Self::Wild => write!(f, "<any>"),
        }
    }
}
