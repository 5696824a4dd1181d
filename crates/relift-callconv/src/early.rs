//! Machine-keyed ABI facts for early analysis.
//!
//! Decoding starts before any procedure has a signature, let alone a
//! promoted one, yet the front end already needs a few ABI facts: where
//! the first argument lives, what a return epilogue looks like, which
//! registers a call clobbers. This table answers those queries from the
//! machine tag alone. A few constants repeat the convention tables;
//! this surface is consulted before any [`crate::Signature`] exists.

use crate::convention::Convention;
use crate::error::{Error, Result};
use crate::facts::Assignment;
use relift_core::register::{mips, pentium, ppc, sparc, st20};
use relift_core::{Expr, Machine};

/// The stack-pointer register id for `machine`.
pub fn stack_register_id(machine: Machine) -> Result<u16> {
    match machine {
        Machine::Pentium => Ok(pentium::ESP),
        Machine::Sparc => Ok(sparc::SP),
        Machine::Ppc => Ok(ppc::SP),
        Machine::Mips => Ok(mips::SP),
        Machine::St20 => Ok(st20::SP),
        Machine::Hppa | Machine::Palm => Err(Error::StackRegisterUndefined),
    }
}

/// Where the first argument of an ordinary call lives.
///
/// On Pentium this is the stack slot as seen at the start of the
/// callee, before the return address is accounted for; it is not the
/// caller-side location the placement formula produces.
pub fn first_argument_location(machine: Machine) -> Result<Expr> {
    match machine {
        Machine::Sparc => Ok(Expr::reg(sparc::O0)),
        Machine::Pentium => Ok(Expr::mem(Expr::reg(pentium::ESP))),
        Machine::St20 => Ok(Expr::mem(Expr::add(
            Expr::reg(st20::SP),
            Expr::int(4),
        ))),
        _ => Err(Error::UnsupportedMachine { machine }),
    }
}

/// The register an ordinary integer return comes back in, when the
/// machine has one worth assuming this early.
pub fn default_return_location(machine: Machine) -> Option<Expr> {
    match machine {
        Machine::Sparc => Some(Expr::reg(sparc::O0)),
        Machine::Pentium => Some(Expr::reg(pentium::EAX)),
        Machine::St20 => Some(Expr::reg(st20::A)),
        _ => None,
    }
}

/// Appends the registers any call on `machine` may define, regardless
/// of signature. Does nothing when `defs` is already populated.
pub fn abi_caller_saved_defines(machine: Machine, defs: &mut Vec<Assignment>) {
    if !defs.is_empty() {
        return;
    }
    match machine {
        Machine::Pentium => {
            defs.push(Assignment::implicit(Expr::reg(pentium::EAX)));
            defs.push(Assignment::implicit(Expr::reg(pentium::ECX)));
            defs.push(Assignment::implicit(Expr::reg(pentium::EDX)));
        }
        Machine::Sparc => {
            for r in sparc::O0..=sparc::O5 {
                defs.push(Assignment::implicit(Expr::reg(r)));
            }
            defs.push(Assignment::implicit(Expr::reg(sparc::G1)));
        }
        Machine::Ppc => {
            for r in 3..=12 {
                defs.push(Assignment::implicit(Expr::reg(r)));
            }
        }
        Machine::St20 => {
            defs.push(Assignment::implicit(Expr::reg(st20::A)));
            defs.push(Assignment::implicit(Expr::reg(st20::B)));
            defs.push(Assignment::implicit(Expr::reg(st20::C)));
        }
        Machine::Mips | Machine::Hppa | Machine::Palm => {}
    }
}

/// The conventional location of argument `n` before promotion has run.
pub fn early_parameter_location(machine: Machine, n: usize) -> Result<Expr> {
    let conv = match machine {
        Machine::Sparc => Convention::SparcStdC,
        Machine::Pentium => Convention::PentiumStdC,
        Machine::St20 => Convention::St20StdC,
        _ => return Err(Error::UnsupportedMachine { machine }),
    };
    match conv.argument_slot(n) {
        Some(e) => Ok(e),
        None => Err(Error::UnsupportedMachine { machine }),
    }
}

/// The canonical return epilogue on `machine`, as assignments. Empty
/// when returns need no stack fixup the front end must recognize
/// (SPARC returns restore a register window instead).
pub fn standard_return_sequence(machine: Machine) -> Vec<Assignment> {
    match machine {
        Machine::Pentium => vec![
            Assignment::assign(Expr::Pc, Expr::mem(Expr::reg(pentium::ESP))),
            Assignment::assign(
                Expr::reg(pentium::ESP),
                Expr::add(Expr::reg(pentium::ESP), Expr::int(4)),
            ),
        ],
        Machine::St20 => vec![
            Assignment::assign(Expr::Pc, Expr::mem(Expr::reg(st20::SP))),
            Assignment::assign(
                Expr::reg(st20::SP),
                Expr::add(Expr::reg(st20::SP), Expr::int(16)),
            ),
        ],
        _ => Vec::new(),
    }
}
