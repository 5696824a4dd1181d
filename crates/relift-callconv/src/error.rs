//! Error types for relift-callconv.

use relift_core::{CallConv, Machine, Platform};
use thiserror::Error;

/// Signature-model error type.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The signature has not committed to a convention with a stack
    /// register. Recoverable: callers fall back to the machine-keyed
    /// table in [`crate::early`].
    #[error("stack register is not defined for this signature")]
    StackRegisterUndefined,

    /// No signature variant exists for this platform and convention.
    #[error("no signature for calling convention {convention} on {platform}")]
    UnrecognizedConvention {
        platform: Platform,
        convention: CallConv,
    },

    /// A parameter needed a location but the signature has no placement
    /// rule to synthesize one.
    #[error("no location for parameter {name:?} and no convention to derive one")]
    MissingParameterEvidence { name: String },

    /// A by-name or by-location parameter update referenced a parameter
    /// the signature does not have. Non-fatal; callers log and continue.
    #[error("no parameter known as {reference}")]
    UnknownParameterReference { reference: String },

    /// A return needed a default register but the signature has no
    /// convention to supply one.
    #[error("no default return location for this signature")]
    MissingReturnLocation,

    /// The machine-keyed ABI table has no entry for this machine.
    #[error("no ABI knowledge for machine {machine}")]
    UnsupportedMachine { machine: Machine },
}

/// Convenience alias for fallible signature operations.
pub type Result<T> = std::result::Result<T, Error>;
