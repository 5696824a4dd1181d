//! Promotion of generic signatures to concrete conventions.
//!
//! A signature binds to a convention at most once. Candidates are tried
//! in a fixed order and the first whose qualification test accepts the
//! procedure wins; a procedure nothing accepts stays generic and can
//! try again once more facts have been proven.

use crate::convention::Convention;
use crate::facts::ProcedureFacts;
use crate::signature::Signature;
use log::{debug, trace};
use relift_core::register::pentium;
use relift_core::{Expr, Platform};

/// Candidate conventions in qualification order. The thiscall, MIPS,
/// and SPARC library variants are never promoted to; they must be
/// requested explicitly.
pub const PROMOTION_ORDER: &[Convention] = &[
    Convention::Win32,
    Convention::PentiumStdC,
    Convention::SparcStdC,
    Convention::PpcStdC,
    Convention::St20StdC,
];

impl Signature {
    /// Commits this signature to the first convention that qualifies
    /// for `proc`.
    ///
    /// An already-promoted signature comes back unchanged. On success
    /// the convention tag changes and the unknown flag clears; every
    /// parameter, return, and preference carries over untouched.
    pub fn promote(self, proc: &impl ProcedureFacts) -> Signature {
        if self.is_promoted() {
            return self;
        }
        for &candidate in PROMOTION_ORDER {
            if qualifies(proc, candidate) {
                debug!("promoting {} to {}", proc.name(), candidate);
                let mut sig = self.into_convention(candidate);
                sig.set_unknown(false);
                return sig;
            }
        }
        trace!("no convention qualified for {}", proc.name());
        self
    }
}

fn qualifies(proc: &impl ProcedureFacts, candidate: Convention) -> bool {
    match candidate {
        Convention::Win32 => win32_qualifies(proc),
        // The C conventions qualify on platform classification alone.
        // Weak on purpose: the proofs that would pin down cdecl for
        // certain are rarely all available this early.
        _ => candidate.platform() == Some(proc.platform()),
    }
}

/// Pascal callees pop their own arguments, so a Win32 procedure must
/// prove both halves of the epilogue: the return target is the saved
/// slot, and the stack pointer retires exactly that slot.
fn win32_qualifies(proc: &impl ProcedureFacts) -> bool {
    if proc.platform() != Platform::Pentium || !proc.is_win32() {
        return false;
    }
    trace!("considering win32 promotion for {}", proc.name());
    let Some(pc) = proc.proven_value(&Expr::Pc) else {
        return false;
    };
    if pc != Expr::mem(Expr::reg(pentium::ESP)) {
        return false;
    }
    trace!("{}: proven pc = m[r28]", proc.name());
    let Some(sp) = proc.proven_value(&Expr::reg(pentium::ESP)) else {
        return false;
    };
    if sp != Expr::add(Expr::reg(pentium::ESP), Expr::int(4)) {
        return false;
    }
    trace!("{}: proven r28 = r28 + 4", proc.name());
    true
}
