//! Machine, platform, and calling-convention tags.
//!
//! Two coarse classifications travel with every loaded binary: the CPU
//! family reported by the loader ([`Machine`]) and the front end that
//! decoded the image ([`Platform`]). They usually agree but come from
//! different subsystems, so both are kept.

use std::fmt;

/// CPU family of a loaded binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Machine {
    /// 32-bit x86
    Pentium,
    /// SPARC V8
    Sparc,
    /// PowerPC 32-bit
    Ppc,
    /// MIPS (o32)
    Mips,
    /// ST20 transputer
    St20,
    /// HP PA-RISC
    Hppa,
    /// Palm OS m68k images
    Palm,
}

impl Machine {
    /// Returns the name of this machine.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pentium => "pentium",
            Self::Sparc => "sparc",
            Self::Ppc => "ppc",
            Self::Mips => "mips",
            Self::St20 => "st20",
            Self::Hppa => "hppa",
            Self::Palm => "palm",
        }
    }
}

impl fmt::Display for Machine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Front-end platform classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Platform {
    Pentium,
    Sparc,
    M68k,
    Parisc,
    Ppc,
    Mips,
    St20,
}

impl Platform {
    /// Returns the name of this platform.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Pentium => "pentium",
            Self::Sparc => "sparc",
            Self::M68k => "m68k",
            Self::Parisc => "parisc",
            Self::Ppc => "ppc",
            Self::Mips => "mips",
            Self::St20 => "st20",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Source-level calling convention requested for a procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallConv {
    /// Caller cleans up (cdecl).
    C,
    /// Callee cleans up (stdcall on Windows).
    Pascal,
    /// Pascal with `this` in a register.
    ThisCall,
}

impl CallConv {
    /// Returns the name of this convention.
    pub fn name(&self) -> &'static str {
        match self {
            Self::C => "stdc",
            Self::Pascal => "pascal",
            Self::ThisCall => "thiscall",
        }
    }
}

impl fmt::Display for CallConv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
