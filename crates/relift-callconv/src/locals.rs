//! Stack-locality predicates.
//!
//! Naming recovered variables needs to know whether a memory access
//! stays inside the procedure's own frame. Which side of the stack
//! pointer the frame sits on is a convention property: the x86 family
//! keeps locals at negative offsets, the stack-grows-up conventions at
//! positive ones, and SPARC caps the positive side at `sp + 92`, where
//! the register-window save area ends and incoming parameters begin.

use crate::convention::Convention;
use crate::early;
use crate::signature::Signature;
use relift_core::{BinOp, Expr, Machine};

impl Signature {
    /// The stack register the locality predicates use: the committed
    /// convention's, else the machine's.
    pub fn effective_stack_register(&self, machine: Machine) -> Option<u16> {
        self.stack_register()
            .ok()
            .or_else(|| early::stack_register_id(machine).ok())
    }

    /// True when `e` reads a slot in this procedure's own stack frame.
    pub fn is_stack_local(&self, machine: Machine, e: &Expr) -> bool {
        // A subscripted location is still the same slot.
        if let Expr::Subscript { base, .. } = e {
            return self.is_stack_local(machine, base);
        }
        match e.mem_addr() {
            Some(addr) => self.is_addr_of_stack_local(machine, addr),
            None => false,
        }
    }

    /// True when `e` computes the address of an in-frame slot: the
    /// stack pointer itself, an offset from it on the frame's side, or
    /// the address of something already known to be a local.
    pub fn is_addr_of_stack_local(&self, machine: Machine, e: &Expr) -> bool {
        if let Expr::AddrOf(inner) = e {
            return self.is_stack_local(machine, inner);
        }
        let Some(sp) = self.effective_stack_register(machine) else {
            return false;
        };
        match e {
            Expr::Binary { op, lhs, rhs } if matches!(op, BinOp::Add | BinOp::Sub) => {
                if !is_stack_pointer(lhs, sp) {
                    return false;
                }
                let Some(k) = rhs.int_value() else {
                    return false;
                };
                let k = if matches!(op, BinOp::Sub) { -k } else { k };
                match self.convention() {
                    // Everything below the incoming-parameter area
                    // counts, whatever its sign.
                    Convention::SparcStdC | Convention::SparcLibStdC => k < 92,
                    _ if self.local_offsets_negative() => k < 0,
                    _ => k > 0,
                }
            }
            _ => is_stack_pointer(e, sp),
        }
    }
}

// Bare `sp` or `sp{-}`; a subscript naming a real definition is some
// other value that happens to live in the stack register.
fn is_stack_pointer(e: &Expr, sp: u16) -> bool {
    match e {
        Expr::Subscript { base, def: None } => base.is_reg_n(sp),
        _ => e.is_reg_n(sp),
    }
}
