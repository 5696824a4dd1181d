//! Register ids in the front end's numbering scheme.
//!
//! Ids follow the semantic register files the instruction decoders use,
//! so a location expression `r24` on Pentium always means `%eax`. Each
//! module covers one machine.

// Pentium register IDs
pub mod pentium {
    // 16-bit views
    pub const AX: u16 = 0;
    pub const CX: u16 = 1;
    pub const DX: u16 = 2;
    pub const BX: u16 = 3;
    pub const SP: u16 = 4;
    pub const BP: u16 = 5;
    pub const SI: u16 = 6;
    pub const DI: u16 = 7;

    // 8-bit views
    pub const AL: u16 = 8;
    pub const CL: u16 = 9;
    pub const DL: u16 = 10;
    pub const BL: u16 = 11;
    pub const AH: u16 = 12;
    pub const CH: u16 = 13;
    pub const DH: u16 = 14;
    pub const BH: u16 = 15;

    // 32-bit registers
    pub const EAX: u16 = 24;
    pub const ECX: u16 = 25;
    pub const EDX: u16 = 26;
    pub const EBX: u16 = 27;
    pub const ESP: u16 = 28;
    pub const EBP: u16 = 29;
    pub const ESI: u16 = 30;
    pub const EDI: u16 = 31;

    // x87 stack top, the float return location
    pub const ST0: u16 = 32;
}

// SPARC register IDs
pub mod sparc {
    // Globals %g0..%g7
    pub const G0: u16 = 0;
    pub const G1: u16 = 1;
    pub const G2: u16 = 2;
    pub const G3: u16 = 3;
    pub const G4: u16 = 4;
    pub const G5: u16 = 5;
    pub const G6: u16 = 6;
    pub const G7: u16 = 7;

    // Outs %o0..%o7; %o6 is the stack pointer
    pub const O0: u16 = 8;
    pub const O1: u16 = 9;
    pub const O2: u16 = 10;
    pub const O3: u16 = 11;
    pub const O4: u16 = 12;
    pub const O5: u16 = 13;
    pub const O6: u16 = 14;
    pub const O7: u16 = 15;
    pub const SP: u16 = 14;

    // Locals %l0..%l7
    pub const L0: u16 = 16;
    pub const L7: u16 = 23;

    // Ins %i0..%i7; %i6 is the frame pointer
    pub const I0: u16 = 24;
    pub const I1: u16 = 25;
    pub const I2: u16 = 26;
    pub const I3: u16 = 27;
    pub const I4: u16 = 28;
    pub const I5: u16 = 29;
    pub const I6: u16 = 30;
    pub const I7: u16 = 31;
    pub const FP: u16 = 30;

    // Float returns: %f0 single, %f0:f1 double
    pub const F0: u16 = 32;
    pub const F0TO1: u16 = 64;
}

// PowerPC register IDs: plain r0..r31, r1 is the stack pointer and
// r3..r10 carry arguments
pub mod ppc {
    pub const SP: u16 = 1;
}

// MIPS o32 register IDs
pub mod mips {
    pub const ZERO: u16 = 0;
    pub const V0: u16 = 2; // return value
    pub const V1: u16 = 3;
    pub const A0: u16 = 4; // first argument
    pub const A1: u16 = 5;
    pub const A2: u16 = 6;
    pub const A3: u16 = 7;
    pub const T0: u16 = 8;
    pub const T7: u16 = 15;
    pub const S0: u16 = 16; // first callee-saved
    pub const S7: u16 = 23;
    pub const T8: u16 = 24;
    pub const T9: u16 = 25;
    pub const GP: u16 = 28;
    pub const SP: u16 = 29;
    pub const FP: u16 = 30;
    pub const RA: u16 = 31;
    pub const F0: u16 = 32; // float return value
}

// ST20 register IDs: the three-deep evaluation stack plus the workspace
// pointer
pub mod st20 {
    pub const A: u16 = 0;
    pub const B: u16 = 1;
    pub const C: u16 = 2;
    pub const SP: u16 = 3;
}
