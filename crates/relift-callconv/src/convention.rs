//! Calling-convention policy tables.
//!
//! Every convention the signature model understands is a variant of
//! [`Convention`], and every per-architecture behavior is a `match` over
//! that closed set. Adding a convention means extending each table here,
//! which is the point: the tables must stay mutually consistent, and a
//! missed arm is a compile error rather than a silently inherited
//! default.
//!
//! # Conventions
//!
//! ## Win32 (stdcall / pascal)
//! - Arguments on the stack at `m[r28 + 4(n+1)]`; callee pops
//! - Return: `r24` (`%eax`), `r32` (`%st0`) for floats
//! - Callee-saved: `%ebp %ebx %esi %edi` and their partial views
//!
//! ## Win32 thiscall
//! - `this` in `r25` (`%ecx`), remaining arguments on the stack; callee
//!   pops the stack arguments only
//!
//! ## Pentium cdecl
//! - Same placement as Win32, but the caller pops; the callee only
//!   retires the return address
//!
//! ## SPARC V8 C
//! - Arguments in `%o0..%o5` (`r8..r13`), then `m[r14 + 92 + ...]`
//! - Return: `%o0`; the windowed registers survive calls
//! - Library variant: `%g2..%g4` additionally survive
//!
//! ## PowerPC SysV
//! - Arguments in `r3..r10`, then `m[r1 + 8 + ...]`; return `r3`
//!
//! ## MIPS o32
//! - Arguments in `r4..r7` over a 16-byte home area, then the stack;
//!   return `r2`, floats in `$f0`
//!
//! ## ST20
//! - Arguments in workspace slots `m[r3 + 4(n+1)]`; return in `Areg`

use crate::error::{Error, Result};
use relift_core::register::{mips, pentium, ppc, sparc, st20};
use relift_core::{CallConv, Expr, Platform, Type};
use std::fmt;

/// The closed set of calling conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Convention {
    /// No convention committed yet. Placement queries fail until the
    /// signature is promoted.
    #[default]
    Generic,
    /// User-declared convention; only the stack register is known, and
    /// only once it has been set.
    Custom { sp: Option<u16> },
    /// Windows stdcall/pascal on 32-bit x86.
    Win32,
    /// Windows thiscall: pascal with `this` in `%ecx`.
    Win32ThisCall,
    /// cdecl on 32-bit x86.
    PentiumStdC,
    /// SPARC V8 C convention.
    SparcStdC,
    /// SPARC with library-call guarantees (`%g2..%g4` survive).
    SparcLibStdC,
    /// PowerPC SysV C convention.
    PpcStdC,
    /// MIPS o32 C convention.
    MipsStdC,
    /// ST20 C convention.
    St20StdC,
}

const PENTIUM_PRESERVED: &[u16] = &[
    pentium::EBP,
    pentium::EBX,
    pentium::ESI,
    pentium::EDI,
    pentium::BX,
    pentium::BP,
    pentium::SI,
    pentium::DI,
    pentium::BL,
    pentium::BH,
];

const PENTIUM_PROVEN: &[u16] = &[pentium::EBX, pentium::EBP, pentium::ESI, pentium::EDI];

const SPARC_PRESERVED: &[u16] = &[
    sparc::SP,
    sparc::I0,
    sparc::I1,
    sparc::I2,
    sparc::I3,
    sparc::I4,
    sparc::I5,
    sparc::I6,
    sparc::I7,
];

const SPARC_LIB_PRESERVED: &[u16] = &[
    sparc::SP,
    sparc::I0,
    sparc::I1,
    sparc::I2,
    sparc::I3,
    sparc::I4,
    sparc::I5,
    sparc::I6,
    sparc::I7,
    sparc::G2,
    sparc::G3,
    sparc::G4,
];

const PPC_PRESERVED: &[u16] = &[ppc::SP];

// s0..s7 plus the stack and frame pointers
const MIPS_PRESERVED: &[u16] = &[16, 17, 18, 19, 20, 21, 22, 23, mips::SP, mips::FP];

const MIPS_PROVEN: &[u16] = &[mips::SP];

const ST20_PRESERVED: &[u16] = &[st20::A, st20::B, st20::C, st20::SP];

impl Convention {
    /// The platform this convention belongs to. `None` for the generic
    /// and custom variants, which are not tied to a platform.
    pub fn platform(&self) -> Option<Platform> {
        match self {
            Self::Generic | Self::Custom { .. } => None,
            Self::Win32 | Self::Win32ThisCall | Self::PentiumStdC => Some(Platform::Pentium),
            Self::SparcStdC | Self::SparcLibStdC => Some(Platform::Sparc),
            Self::PpcStdC => Some(Platform::Ppc),
            Self::MipsStdC => Some(Platform::Mips),
            Self::St20StdC => Some(Platform::St20),
        }
    }

    /// The source-level calling convention this variant implements.
    pub fn call_conv(&self) -> Option<CallConv> {
        match self {
            Self::Generic | Self::Custom { .. } => None,
            Self::Win32 => Some(CallConv::Pascal),
            Self::Win32ThisCall => Some(CallConv::ThisCall),
            Self::PentiumStdC
            | Self::SparcStdC
            | Self::SparcLibStdC
            | Self::PpcStdC
            | Self::MipsStdC
            | Self::St20StdC => Some(CallConv::C),
        }
    }

    /// A short label for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Custom { .. } => "custom",
            Self::Win32 => "win32",
            Self::Win32ThisCall => "win32-thiscall",
            Self::PentiumStdC => "pentium-stdc",
            Self::SparcStdC => "sparc-stdc",
            Self::SparcLibStdC => "sparc-lib-stdc",
            Self::PpcStdC => "ppc-stdc",
            Self::MipsStdC => "mips-stdc",
            Self::St20StdC => "st20-stdc",
        }
    }

    /// True for every variant except [`Convention::Generic`]. A promoted
    /// signature never promotes again.
    pub fn is_promoted(&self) -> bool {
        !matches!(self, Self::Generic)
    }

    /// The stack-pointer register id.
    ///
    /// Fails with [`Error::StackRegisterUndefined`] on the generic
    /// variant and on a custom variant whose register has not been set.
    pub fn stack_register(&self) -> Result<u16> {
        match self {
            Self::Generic | Self::Custom { sp: None } => Err(Error::StackRegisterUndefined),
            Self::Custom { sp: Some(sp) } => Ok(*sp),
            Self::Win32 | Self::Win32ThisCall | Self::PentiumStdC => Ok(pentium::ESP),
            Self::SparcStdC | Self::SparcLibStdC => Ok(sparc::SP),
            Self::PpcStdC => Ok(ppc::SP),
            Self::MipsStdC => Ok(mips::SP),
            Self::St20StdC => Ok(st20::SP),
        }
    }

    /// True when locals live below the stack pointer, at negative
    /// offsets. The stack-growing-up conventions keep locals at positive
    /// offsets instead.
    pub fn local_offsets_negative(&self) -> bool {
        match self {
            Self::Generic
            | Self::Custom { .. }
            | Self::Win32
            | Self::Win32ThisCall
            | Self::PentiumStdC => true,
            Self::SparcStdC
            | Self::SparcLibStdC
            | Self::PpcStdC
            | Self::MipsStdC
            | Self::St20StdC => false,
        }
    }

    /// Registers the callee must leave intact.
    pub fn preserved_registers(&self) -> &'static [u16] {
        match self {
            Self::Generic | Self::Custom { .. } => &[],
            Self::Win32 | Self::Win32ThisCall | Self::PentiumStdC => PENTIUM_PRESERVED,
            Self::SparcStdC => SPARC_PRESERVED,
            Self::SparcLibStdC => SPARC_LIB_PRESERVED,
            Self::PpcStdC => PPC_PRESERVED,
            Self::MipsStdC => MIPS_PRESERVED,
            Self::St20StdC => ST20_PRESERVED,
        }
    }

    /// Registers proven to hold their entry value on every return, not
    /// counting the stack pointer (whose exit value may involve
    /// arithmetic handled by the signature).
    pub fn proven_identity_registers(&self) -> &'static [u16] {
        match self {
            Self::Generic | Self::Custom { .. } => &[],
            Self::Win32 | Self::Win32ThisCall | Self::PentiumStdC => PENTIUM_PROVEN,
            Self::SparcStdC => SPARC_PRESERVED,
            Self::SparcLibStdC => SPARC_LIB_PRESERVED,
            Self::PpcStdC => PPC_PRESERVED,
            Self::MipsStdC => MIPS_PROVEN,
            Self::St20StdC => ST20_PRESERVED,
        }
    }

    /// The conventional location of argument `n`, counted from zero.
    ///
    /// This is the raw placement formula; it knows nothing about
    /// parameters the signature already has. `None` when the convention
    /// has no placement rule.
    pub fn argument_slot(&self, n: usize) -> Option<Expr> {
        let k = n as i64;
        match self {
            Self::Generic | Self::Custom { .. } => None,
            Self::Win32 | Self::PentiumStdC => Some(Expr::mem(Expr::add(
                Expr::reg(pentium::ESP),
                Expr::int((k + 1) * 4),
            ))),
            Self::Win32ThisCall => Some(if n == 0 {
                Expr::reg(pentium::ECX)
            } else {
                Expr::mem(Expr::add(Expr::reg(pentium::ESP), Expr::int(k * 4)))
            }),
            Self::SparcStdC | Self::SparcLibStdC => Some(if n < 6 {
                Expr::reg(sparc::O0 + n as u16)
            } else {
                Expr::mem(Expr::add(
                    Expr::reg(sparc::SP),
                    Expr::int(92 + (k - 6) * 4),
                ))
            }),
            Self::PpcStdC => Some(if n < 8 {
                Expr::reg(3 + n as u16)
            } else {
                Expr::mem(Expr::add(Expr::reg(ppc::SP), Expr::int(8 + (k - 8) * 4)))
            }),
            Self::MipsStdC => Some(if n < 4 {
                Expr::reg(mips::A0 + n as u16)
            } else {
                Expr::mem(Expr::add(
                    Expr::reg(mips::SP),
                    Expr::int(16 + (k - 4) * 4),
                ))
            }),
            Self::St20StdC => Some(Expr::mem(Expr::add(
                Expr::reg(st20::SP),
                Expr::int((k + 1) * 4),
            ))),
        }
    }

    /// The register a value of type `ty` comes back in when no location
    /// was given. `None` when the convention has no default.
    pub fn default_return_location(&self, ty: &Type) -> Option<Expr> {
        match self {
            Self::Generic | Self::Custom { .. } => None,
            Self::Win32 | Self::Win32ThisCall | Self::PentiumStdC => Some(if ty.is_float() {
                Expr::reg(pentium::ST0)
            } else {
                Expr::reg(pentium::EAX)
            }),
            Self::SparcStdC | Self::SparcLibStdC => Some(Expr::reg(sparc::O0)),
            Self::PpcStdC => Some(Expr::reg(3)),
            Self::MipsStdC => Some(if ty.is_float() {
                Expr::reg(mips::F0)
            } else {
                Expr::reg(mips::V0)
            }),
            Self::St20StdC => Some(Expr::reg(st20::A)),
        }
    }

    /// A pattern matching any stack location of this convention:
    /// `m[sp - <any>]`, or `m[sp + <any>]` where the stack grows up.
    pub fn stack_wildcard(&self) -> Option<Expr> {
        let sp = self.stack_register().ok()?;
        let inner = match self {
            Self::SparcStdC | Self::SparcLibStdC => Expr::add(Expr::reg(sp), Expr::Wild),
            _ => Expr::sub(Expr::reg(sp), Expr::Wild),
        };
        Some(Expr::mem(inner))
    }
}

impl fmt::Display for Convention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_registers() {
        assert_eq!(Convention::Win32.stack_register(), Ok(28));
        assert_eq!(Convention::PentiumStdC.stack_register(), Ok(28));
        assert_eq!(Convention::SparcStdC.stack_register(), Ok(14));
        assert_eq!(Convention::PpcStdC.stack_register(), Ok(1));
        assert_eq!(Convention::MipsStdC.stack_register(), Ok(29));
        assert_eq!(Convention::St20StdC.stack_register(), Ok(3));
        assert_eq!(
            Convention::Generic.stack_register(),
            Err(Error::StackRegisterUndefined)
        );
        assert_eq!(
            Convention::Custom { sp: None }.stack_register(),
            Err(Error::StackRegisterUndefined)
        );
        assert_eq!(Convention::Custom { sp: Some(7) }.stack_register(), Ok(7));
    }

    #[test]
    fn pentium_arguments_walk_the_stack() {
        let conv = Convention::PentiumStdC;
        for (n, off) in [(0usize, 4i64), (1, 8), (2, 12)] {
            let want = Expr::mem(Expr::add(Expr::reg(28), Expr::int(off)));
            assert_eq!(conv.argument_slot(n), Some(want));
        }
    }

    #[test]
    fn thiscall_first_argument_is_ecx() {
        let conv = Convention::Win32ThisCall;
        assert_eq!(conv.argument_slot(0), Some(Expr::reg(25)));
        assert_eq!(
            conv.argument_slot(1),
            Some(Expr::mem(Expr::add(Expr::reg(28), Expr::int(4))))
        );
        assert_eq!(
            conv.argument_slot(3),
            Some(Expr::mem(Expr::add(Expr::reg(28), Expr::int(12))))
        );
    }

    #[test]
    fn sparc_arguments_spill_after_six() {
        let conv = Convention::SparcStdC;
        assert_eq!(conv.argument_slot(0), Some(Expr::reg(8)));
        assert_eq!(conv.argument_slot(5), Some(Expr::reg(13)));
        assert_eq!(
            conv.argument_slot(6),
            Some(Expr::mem(Expr::add(Expr::reg(14), Expr::int(92))))
        );
        assert_eq!(
            conv.argument_slot(8),
            Some(Expr::mem(Expr::add(Expr::reg(14), Expr::int(100))))
        );
    }

    #[test]
    fn ppc_arguments_spill_after_eight() {
        let conv = Convention::PpcStdC;
        assert_eq!(conv.argument_slot(7), Some(Expr::reg(10)));
        assert_eq!(
            conv.argument_slot(8),
            Some(Expr::mem(Expr::add(Expr::reg(1), Expr::int(8))))
        );
    }

    #[test]
    fn mips_arguments_spill_past_the_home_area() {
        let conv = Convention::MipsStdC;
        assert_eq!(conv.argument_slot(0), Some(Expr::reg(4)));
        assert_eq!(conv.argument_slot(3), Some(Expr::reg(7)));
        assert_eq!(
            conv.argument_slot(4),
            Some(Expr::mem(Expr::add(Expr::reg(29), Expr::int(16))))
        );
    }

    #[test]
    fn st20_arguments_use_workspace_slots() {
        let conv = Convention::St20StdC;
        assert_eq!(
            conv.argument_slot(0),
            Some(Expr::mem(Expr::add(Expr::reg(3), Expr::int(4))))
        );
        assert_eq!(
            conv.argument_slot(2),
            Some(Expr::mem(Expr::add(Expr::reg(3), Expr::int(12))))
        );
    }

    #[test]
    fn generic_has_no_placement_rule() {
        assert_eq!(Convention::Generic.argument_slot(0), None);
        assert_eq!(Convention::Custom { sp: Some(28) }.argument_slot(0), None);
    }

    #[test]
    fn default_returns_distinguish_floats_on_pentium_and_mips() {
        let int = Type::sint(4);
        let dbl = Type::f64();
        assert_eq!(
            Convention::Win32.default_return_location(&int),
            Some(Expr::reg(24))
        );
        assert_eq!(
            Convention::Win32.default_return_location(&dbl),
            Some(Expr::reg(32))
        );
        assert_eq!(
            Convention::MipsStdC.default_return_location(&int),
            Some(Expr::reg(2))
        );
        assert_eq!(
            Convention::MipsStdC.default_return_location(&dbl),
            Some(Expr::reg(32))
        );
        assert_eq!(
            Convention::SparcStdC.default_return_location(&dbl),
            Some(Expr::reg(8))
        );
        assert_eq!(
            Convention::St20StdC.default_return_location(&int),
            Some(Expr::reg(0))
        );
        assert_eq!(Convention::Generic.default_return_location(&int), None);
    }

    #[test]
    fn preserved_sets_match_proven_identities() {
        // Outside the pentium family, whatever is proven to survive is
        // also reported preserved.
        for conv in [
            Convention::SparcStdC,
            Convention::SparcLibStdC,
            Convention::PpcStdC,
            Convention::St20StdC,
        ] {
            assert_eq!(conv.preserved_registers(), conv.proven_identity_registers());
        }
        // Pentium preserves partial register views that the prover never
        // names directly.
        for r in Convention::PentiumStdC.proven_identity_registers() {
            assert!(Convention::PentiumStdC.preserved_registers().contains(r));
        }
    }

    #[test]
    fn sparc_library_variant_adds_the_surviving_globals() {
        let base = Convention::SparcStdC.preserved_registers();
        let lib = Convention::SparcLibStdC.preserved_registers();
        for r in base {
            assert!(lib.contains(r));
        }
        for g in [2, 3, 4] {
            assert!(!base.contains(&g));
            assert!(lib.contains(&g));
        }
    }

    #[test]
    fn stack_wildcards_follow_stack_direction() {
        assert_eq!(
            Convention::PentiumStdC.stack_wildcard(),
            Some(Expr::mem(Expr::sub(Expr::reg(28), Expr::Wild)))
        );
        assert_eq!(
            Convention::SparcStdC.stack_wildcard(),
            Some(Expr::mem(Expr::add(Expr::reg(14), Expr::Wild)))
        );
        assert_eq!(Convention::Generic.stack_wildcard(), None);
    }

    #[test]
    fn platform_and_convention_tags() {
        assert_eq!(Convention::Win32.platform(), Some(Platform::Pentium));
        assert_eq!(Convention::Win32.call_conv(), Some(CallConv::Pascal));
        assert_eq!(
            Convention::Win32ThisCall.call_conv(),
            Some(CallConv::ThisCall)
        );
        assert_eq!(Convention::SparcLibStdC.platform(), Some(Platform::Sparc));
        assert_eq!(Convention::MipsStdC.call_conv(), Some(CallConv::C));
        assert_eq!(Convention::Generic.platform(), None);
        assert_eq!(Convention::Custom { sp: None }.call_conv(), None);
    }

    #[test]
    fn only_generic_is_unpromoted() {
        assert!(!Convention::Generic.is_promoted());
        assert!(Convention::Custom { sp: None }.is_promoted());
        assert!(Convention::Win32.is_promoted());
        assert!(Convention::MipsStdC.is_promoted());
    }
}
