//! # relift-callconv
//!
//! Calling-convention and procedure-signature model for machine-code
//! decompilation.
//!
//! The crate models what a decompiler knows about a procedure's
//! interface across 32-bit x86 (including the Win32 pascal and
//! thiscall variants), SPARC V8, PowerPC, MIPS o32, and ST20:
//!
//! - [`Signature`] carries a procedure's name, typed parameters and
//!   returns, and its calling convention, with one-shot promotion from
//!   generic to concrete driven by [`ProcedureFacts`].
//! - [`Convention`] is the closed set of supported conventions and
//!   their policy tables: placement formulas, preserved registers,
//!   proven exit facts, stack direction.
//! - [`compare`] sorts recovered returns and arguments into ABI order;
//!   [`locals`] decides stack-frame locality; [`early`] answers
//!   machine-keyed ABI queries before any signature exists.

pub mod compare;
pub mod convention;
pub mod early;
pub mod error;
pub mod facts;
pub mod locals;
pub mod param;
pub mod promote;
pub mod signature;

pub use convention::Convention;
pub use error::{Error, Result};
pub use facts::{Assignment, ProcedureFacts};
pub use param::{Parameter, Return};
pub use promote::PROMOTION_ORDER;
pub use signature::Signature;
