//! # relift-core
//!
//! Core abstractions for the relift decompiler. This crate defines the
//! symbolic location expressions, the compact type lattice, and the
//! machine and platform tags that the analysis crates share.

pub mod expr;
pub mod machine;
pub mod register;
pub mod types;

pub use expr::{BinOp, Expr};
pub use machine::{CallConv, Machine, Platform};
pub use types::Type;
