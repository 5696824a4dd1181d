//! Ordering of recovered returns and arguments into ABI order.
//!
//! Dataflow hands back defines and uses in whatever order collection
//! produced them; these comparators sort the facts the way the
//! convention lists them, preferred return registers first and stacked
//! arguments by offset. Each comparator is a total order: ties inside a
//! tier fall back to the structural order on expressions, so sorting is
//! deterministic.

use crate::convention::Convention;
use crate::facts::Assignment;
use crate::signature::Signature;
use relift_core::{BinOp, Expr};
use std::cmp::Ordering;

impl Signature {
    /// Orders two collected return facts by this convention's
    /// preference, keyed on the defined location.
    pub fn return_compare(&self, a: &Assignment, b: &Assignment) -> Ordering {
        match self.convention() {
            Convention::PentiumStdC => pentium_return_order(&a.lhs, &b.lhs),
            Convention::SparcStdC | Convention::SparcLibStdC => {
                sparc_return_order(&a.lhs, &b.lhs)
            }
            _ => a.lhs.cmp(&b.lhs),
        }
    }

    /// Orders two collected argument facts by this convention's
    /// placement, keyed on the defined location.
    pub fn argument_compare(&self, a: &Assignment, b: &Assignment) -> Ordering {
        match self.convention() {
            Convention::PentiumStdC => pentium_argument_order(&a.lhs, &b.lhs),
            Convention::SparcStdC | Convention::SparcLibStdC => {
                sparc_argument_order(&a.lhs, &b.lhs)
            }
            _ => a.lhs.cmp(&b.lhs),
        }
    }
}

/// The constant offset of a stack slot `m[sp + K]` or `m[sp - K]`
/// (negated), looking through subscripts on the stack pointer. Plain
/// `m[sp]` and anything else is not a stack slot.
pub fn stack_offset(e: &Expr, sp: u16) -> Option<i64> {
    let addr = e.mem_addr()?;
    let Expr::Binary { op, lhs, rhs } = addr else {
        return None;
    };
    if !lhs.strip_subscripts().is_reg_n(sp) {
        return None;
    }
    let k = rhs.int_value()?;
    match op {
        BinOp::Add => Some(k),
        BinOp::Sub => Some(-k),
        BinOp::Mul => None,
    }
}

fn pentium_return_order(la: &Expr, lb: &Expr) -> Ordering {
    pentium_return_rank(la)
        .cmp(&pentium_return_rank(lb))
        .then_with(|| la.cmp(lb))
}

// %eax outranks everything, then the float return slot.
fn pentium_return_rank(e: &Expr) -> u8 {
    if e.is_reg_n(24) {
        0
    } else if e.is_reg_n(30) {
        1
    } else {
        2
    }
}

fn sparc_return_order(la: &Expr, lb: &Expr) -> Ordering {
    sparc_return_rank(la)
        .cmp(&sparc_return_rank(lb))
        .then_with(|| la.cmp(lb))
}

// %o0, then the float returns, then the aggregate pointer slot.
fn sparc_return_rank(e: &Expr) -> u8 {
    if e.is_reg_n(8) {
        0
    } else if e.is_reg_n(32) {
        1
    } else if e.is_reg_n(64) {
        2
    } else if is_sparc_aggregate_slot(e) {
        3
    } else {
        4
    }
}

// `m[r14 + 64]`, tolerating a subscript on the stack pointer.
fn is_sparc_aggregate_slot(e: &Expr) -> bool {
    let Some(addr) = e.mem_addr() else {
        return false;
    };
    let Expr::Binary {
        op: BinOp::Add,
        lhs,
        rhs,
    } = addr
    else {
        return false;
    };
    lhs.strip_subscripts().is_reg_n(14) && rhs.int_value() == Some(64)
}

fn pentium_argument_order(la: &Expr, lb: &Expr) -> Ordering {
    match (stack_offset(la, 28), stack_offset(lb, 28)) {
        (Some(ka), Some(kb)) => ka.cmp(&kb).then_with(|| la.cmp(lb)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => la.cmp(lb),
    }
}

fn sparc_argument_order(la: &Expr, lb: &Expr) -> Ordering {
    // %o0..%o5 first, in register order.
    match (argument_register(la), argument_register(lb)) {
        (Some(ra), Some(rb)) => return ra.cmp(&rb).then_with(|| la.cmp(lb)),
        (Some(_), None) => return Ordering::Less,
        (None, Some(_)) => return Ordering::Greater,
        (None, None) => {}
    }
    // Then frame-relative stack slots, by offset.
    match (stack_offset(la, 30), stack_offset(lb, 30)) {
        (Some(ka), Some(kb)) => ka.cmp(&kb).then_with(|| la.cmp(lb)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => la.cmp(lb),
    }
}

fn argument_register(e: &Expr) -> Option<u16> {
    e.reg_id().filter(|r| (8..=13).contains(r))
}
