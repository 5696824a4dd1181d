//! Procedure signatures.
//!
//! A [`Signature`] collects everything the decompiler knows about a
//! procedure's interface: its name, typed parameters with their storage
//! locations, return locations, and the calling convention that
//! explains them. Signatures start life generic, accumulate parameters
//! and returns as analysis discovers them, and commit to a convention
//! at most once (see [`Signature::promote`]).
//!
//! Concrete constructors seed the convention's stack pointer as a
//! void-typed first return, so exit-state reasoning can refer to it
//! before any real return is recovered. The promotion path never adds
//! one; a signature under analysis already tracks whatever it found.

use crate::convention::Convention;
use crate::error::{Error, Result};
use crate::facts::Assignment;
use crate::param::{Parameter, Return};
use log::{debug, warn};
use relift_core::register::{mips, pentium, sparc};
use relift_core::{CallConv, Expr, Platform, Type};
use std::fmt;

/// A procedure's interface under recovery.
///
/// Equality compares parameters and returns pairwise and nothing else:
/// two signatures with the same shapes in the same locations are the
/// same interface no matter what anything is called.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Signature {
    name: String,
    convention: Convention,
    params: Vec<Parameter>,
    returns: Vec<Return>,
    /// Legacy single-return slot, for front ends that learn the return
    /// type before any return location exists.
    rettype: Type,
    ellipsis: bool,
    unknown: bool,
    forced: bool,
    preferred_name: Option<String>,
    preferred_return: Option<Type>,
    preferred_params: Vec<usize>,
}

impl Signature {
    /// Creates a generic signature: no convention, no placement rules.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            convention: Convention::Generic,
            params: Vec::new(),
            returns: Vec::new(),
            rettype: Type::Void,
            ellipsis: false,
            unknown: true,
            forced: false,
            preferred_name: None,
            preferred_return: None,
            preferred_params: Vec::new(),
        }
    }

    /// Creates a custom-convention signature. It knows nothing until
    /// [`Signature::set_stack_register`] is called.
    pub fn custom(name: impl Into<String>) -> Self {
        let mut sig = Self::new(name);
        sig.convention = Convention::Custom { sp: None };
        sig
    }

    /// Creates a signature committed to `convention`, seeding the
    /// convention's stack pointer as the first (void-typed) return.
    pub fn concrete(convention: Convention, name: impl Into<String>) -> Self {
        let mut sig = Self::new(name);
        sig.convention = convention;
        if let Ok(sp) = convention.stack_register() {
            sig.returns.push(Return::new(Type::Void, Expr::reg(sp)));
        }
        sig
    }

    /// Builds the signature for a platform and source-level calling
    /// convention, as detected by the front end.
    ///
    /// Only the combinations a front end actually reports are mapped;
    /// anything else is [`Error::UnrecognizedConvention`]. The MIPS and
    /// SPARC library variants are constructed directly with
    /// [`Signature::concrete`].
    pub fn instantiate(platform: Platform, convention: CallConv, name: &str) -> Result<Self> {
        debug!(
            "instantiating {} signature for {}: {}",
            convention, platform, name
        );
        let variant = match (platform, convention) {
            (Platform::Pentium, CallConv::Pascal) => Convention::Win32,
            (Platform::Pentium, CallConv::ThisCall) => Convention::Win32ThisCall,
            (Platform::Pentium, CallConv::C) => Convention::PentiumStdC,
            (Platform::Sparc, CallConv::C) => Convention::SparcStdC,
            (Platform::Ppc, CallConv::C) => Convention::PpcStdC,
            (Platform::St20, CallConv::C) => Convention::St20StdC,
            _ => {
                return Err(Error::UnrecognizedConvention {
                    platform,
                    convention,
                })
            }
        };
        Ok(Self::concrete(variant, name))
    }

    /// Swaps the convention tag, keeping every other field. Promotion
    /// uses this; it deliberately does not seed a stack-pointer return.
    pub(crate) fn into_convention(mut self, convention: Convention) -> Self {
        self.convention = convention;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn convention(&self) -> Convention {
        self.convention
    }

    /// True once the signature has committed to any convention.
    pub fn is_promoted(&self) -> bool {
        self.convention.is_promoted()
    }

    /// True while the parameters have been neither recovered nor
    /// declared.
    pub fn is_unknown(&self) -> bool {
        self.unknown
    }

    pub fn set_unknown(&mut self, unknown: bool) {
        self.unknown = unknown;
    }

    /// True when the signature was forced by the user and analysis must
    /// not reshape it.
    pub fn is_forced(&self) -> bool {
        self.forced
    }

    pub fn set_forced(&mut self, forced: bool) {
        self.forced = forced;
    }

    pub fn has_ellipsis(&self) -> bool {
        self.ellipsis
    }

    pub fn set_ellipsis(&mut self, ellipsis: bool) {
        self.ellipsis = ellipsis;
    }

    pub fn preferred_name(&self) -> Option<&str> {
        self.preferred_name.as_deref()
    }

    pub fn set_preferred_name(&mut self, name: impl Into<String>) {
        self.preferred_name = Some(name.into());
    }

    pub fn preferred_return(&self) -> Option<&Type> {
        self.preferred_return.as_ref()
    }

    pub fn set_preferred_return(&mut self, ty: Type) {
        self.preferred_return = Some(ty);
    }

    pub fn preferred_params(&self) -> &[usize] {
        &self.preferred_params
    }

    pub fn set_preferred_params(&mut self, params: Vec<usize>) {
        self.preferred_params = params;
    }

    /// Declares the stack register of a custom-convention signature and
    /// seeds the matching stack-pointer return, like the concrete
    /// constructors do. No effect on other variants, whose stack
    /// register is fixed.
    pub fn set_stack_register(&mut self, sp: u16) {
        if let Convention::Custom { sp: slot } = &mut self.convention {
            *slot = Some(sp);
            self.returns.push(Return::new(Type::Void, Expr::reg(sp)));
        }
    }

    pub fn stack_register(&self) -> Result<u16> {
        self.convention.stack_register()
    }

    pub fn local_offsets_negative(&self) -> bool {
        self.convention.local_offsets_negative()
    }

    /// A pattern matching any stack location of this convention.
    pub fn stack_wildcard(&self) -> Option<Expr> {
        self.convention.stack_wildcard()
    }

    // ---- parameters -----------------------------------------------

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn num_params(&self) -> usize {
        self.params.len()
    }

    pub fn param_name(&self, n: usize) -> Option<&str> {
        self.params.get(n).map(|p| p.name.as_str())
    }

    pub fn param_type(&self, n: usize) -> Option<&Type> {
        self.params.get(n).map(|p| &p.ty)
    }

    pub fn param_location(&self, n: usize) -> Option<&Expr> {
        self.params.get(n).map(|p| &p.location)
    }

    pub fn param_bound_max(&self, n: usize) -> Option<&str> {
        self.params.get(n).and_then(|p| p.bound_max.as_deref())
    }

    pub fn set_param_type(&mut self, n: usize, ty: Type) {
        self.params[n].ty = ty;
    }

    pub fn set_param_name(&mut self, n: usize, name: impl Into<String>) {
        self.params[n].name = name.into();
    }

    pub fn set_param_location(&mut self, n: usize, location: Expr) {
        self.params[n].location = location;
    }

    pub fn set_param_bound_max(&mut self, n: usize, bound: Option<&str>) {
        self.params[n].bound_max = bound.map(str::to_string);
    }

    /// Retypes the parameter called `name`.
    ///
    /// A miss is reported and leaves the signature unchanged; the name
    /// usually comes from a header file that may not match this binary.
    pub fn set_param_type_named(&mut self, name: &str, ty: Type) -> Result<()> {
        match self.find_param_named(name) {
            Some(n) => {
                self.params[n].ty = ty;
                Ok(())
            }
            None => {
                warn!("no parameter named {} in {}", name, self.name);
                Err(Error::UnknownParameterReference {
                    reference: name.to_string(),
                })
            }
        }
    }

    /// Retypes the parameter stored at `location`. Misses behave like
    /// [`Signature::set_param_type_named`].
    pub fn set_param_type_at(&mut self, location: &Expr, ty: Type) -> Result<()> {
        match self.find_param(location) {
            Some(n) => {
                self.params[n].ty = ty;
                Ok(())
            }
            None => {
                warn!("no parameter at {} in {}", location, self.name);
                Err(Error::UnknownParameterReference {
                    reference: location.to_string(),
                })
            }
        }
    }

    /// Index of the parameter stored at `location`.
    pub fn find_param(&self, location: &Expr) -> Option<usize> {
        self.params.iter().position(|p| p.location == *location)
    }

    /// Index of the parameter called `name`.
    pub fn find_param_named(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == name)
    }

    /// Renames a parameter. False when no parameter is called `old`.
    pub fn rename_param(&mut self, old: &str, new: &str) -> bool {
        match self.find_param_named(old) {
            Some(n) => {
                self.params[n].name = new.to_string();
                true
            }
            None => false,
        }
    }

    /// Appends a parameter.
    ///
    /// A missing name is synthesized as `param<N>`, skipping names
    /// already taken. A missing location comes from the convention's
    /// placement rule, which only a promoted signature has; asking a
    /// generic signature to place a parameter is
    /// [`Error::MissingParameterEvidence`].
    pub fn add_parameter(
        &mut self,
        ty: Type,
        name: Option<&str>,
        location: Option<Expr>,
        bound_max: Option<&str>,
    ) -> Result<()> {
        let name = match name {
            Some(name) => name.to_string(),
            None => self.fresh_param_name(),
        };
        let location = match location {
            Some(e) => e,
            None => match self.next_argument_slot() {
                Some(e) => e,
                None => return Err(Error::MissingParameterEvidence { name }),
            },
        };
        let mut param = Parameter::new(ty, name, location);
        param.bound_max = bound_max.map(str::to_string);
        self.params.push(param);
        Ok(())
    }

    fn fresh_param_name(&self) -> String {
        let mut n = self.params.len() + 1;
        let mut name = format!("param{}", n);
        while self.find_param_named(&name).is_some() {
            n += 1;
            name = format!("param{}", n);
        }
        name
    }

    /// Truncates or pads the parameter list to exactly `n` entries.
    /// Padding appends void-typed placeholder parameters and can fail
    /// like [`Signature::add_parameter`].
    pub fn set_num_params(&mut self, n: usize) -> Result<()> {
        if n < self.params.len() {
            self.params.truncate(n);
            return Ok(());
        }
        while self.params.len() < n {
            self.add_parameter(Type::Void, None, None, None)?;
        }
        Ok(())
    }

    /// Removes and returns parameter `n`.
    pub fn remove_parameter(&mut self, n: usize) -> Parameter {
        self.params.remove(n)
    }

    /// Removes the parameter stored at `location`, if there is one.
    pub fn remove_parameter_by_location(&mut self, location: &Expr) -> Option<Parameter> {
        let n = self.find_param(location)?;
        Some(self.params.remove(n))
    }

    /// The location of argument `n`.
    ///
    /// An existing parameter answers its stored location; past the end,
    /// the convention's placement rule takes over.
    pub fn argument_location(&self, n: usize) -> Result<Expr> {
        if let Some(p) = self.params.get(n) {
            return Ok(p.location.clone());
        }
        match self.convention.argument_slot(self.slot_index(n)) {
            Some(e) => Ok(e),
            None => Err(Error::MissingParameterEvidence {
                name: format!("param{}", n + 1),
            }),
        }
    }

    fn next_argument_slot(&self) -> Option<Expr> {
        self.convention.argument_slot(self.slot_index(self.params.len()))
    }

    // On the callee-pops x86 variants and ST20, a recovered signature
    // may carry the stack pointer itself as parameter zero; the
    // placement formulas count arguments past it.
    fn slot_index(&self, n: usize) -> usize {
        if !matches!(
            self.convention,
            Convention::Win32
                | Convention::Win32ThisCall
                | Convention::PentiumStdC
                | Convention::St20StdC
        ) {
            return n;
        }
        let Ok(sp) = self.convention.stack_register() else {
            return n;
        };
        if self.params.first().is_some_and(|p| p.location.is_reg_n(sp)) {
            n.saturating_sub(1)
        } else {
            n
        }
    }

    // ---- returns --------------------------------------------------

    pub fn returns(&self) -> &[Return] {
        &self.returns
    }

    pub fn num_returns(&self) -> usize {
        self.returns.len()
    }

    /// Appends a return. Void returns are dropped; a missing location
    /// takes the convention's default return register for `ty`, and a
    /// generic signature has none to give.
    pub fn add_return(&mut self, ty: Type, location: Option<Expr>) -> Result<()> {
        if ty.is_void() {
            return Ok(());
        }
        let location = match location {
            Some(e) => e,
            None => self
                .convention
                .default_return_location(&ty)
                .ok_or(Error::MissingReturnLocation)?,
        };
        self.returns.push(Return::new(ty, location));
        Ok(())
    }

    /// Removes the return at `location`. False when there is none.
    pub fn remove_return(&mut self, location: &Expr) -> bool {
        match self.find_return(location) {
            Some(n) => {
                self.returns.remove(n);
                true
            }
            None => false,
        }
    }

    /// Index of the return at `location`.
    pub fn find_return(&self, location: &Expr) -> Option<usize> {
        self.returns.iter().position(|r| r.location == *location)
    }

    /// Retypes return `n`. Out-of-range indices are ignored.
    pub fn set_return_type(&mut self, n: usize, ty: Type) {
        if let Some(r) = self.returns.get_mut(n) {
            r.ty = ty;
        }
    }

    /// The type recorded for the return at `location`, if any.
    pub fn type_for(&self, location: &Expr) -> Option<&Type> {
        self.returns
            .iter()
            .find(|r| r.location == *location)
            .map(|r| &r.ty)
    }

    /// The legacy single-return type slot.
    pub fn ret_type(&self) -> &Type {
        &self.rettype
    }

    pub fn set_ret_type(&mut self, ty: Type) {
        self.rettype = ty;
    }

    // ---- ABI facts ------------------------------------------------

    /// True when the convention guarantees the callee leaves `e`
    /// intact.
    pub fn is_preserved(&self, e: &Expr) -> bool {
        e.reg_id()
            .is_some_and(|r| self.convention.preserved_registers().contains(&r))
    }

    /// The value `left` is guaranteed to hold on exit, when the
    /// convention proves one.
    ///
    /// Callee-saved registers map to themselves. On the callee-pops x86
    /// variants the stack pointer's exit value reflects the pop: pascal
    /// retires the return address plus every stack argument, thiscall
    /// the stack arguments only (`this` travels in `r25`). A leading
    /// stack-pointer parameter is not an argument and does not count.
    pub fn proven_value(&self, left: &Expr) -> Option<Expr> {
        let r = left.reg_id()?;
        match self.convention {
            Convention::Win32 if r == pentium::ESP => {
                let n = self.stacked_param_count() as i64;
                Some(Expr::add(Expr::reg(pentium::ESP), Expr::int(4 + 4 * n)))
            }
            Convention::Win32ThisCall if r == pentium::ESP => {
                let n = self.stacked_param_count() as i64;
                Some(Expr::add(Expr::reg(pentium::ESP), Expr::int(4 * n)))
            }
            Convention::PentiumStdC if r == pentium::ESP => {
                Some(Expr::add(Expr::reg(pentium::ESP), Expr::int(4)))
            }
            _ => {
                if self.convention.proven_identity_registers().contains(&r) {
                    Some(Expr::reg(r))
                } else {
                    None
                }
            }
        }
    }

    fn stacked_param_count(&self) -> usize {
        let n = self.params.len();
        if self
            .params
            .first()
            .is_some_and(|p| p.location.is_reg_n(pentium::ESP))
        {
            n - 1
        } else {
            n
        }
    }

    /// Appends the locations a library call with this convention may
    /// define. Does nothing when `defs` is already populated, so
    /// repeated calls cannot duplicate the set.
    ///
    /// On the x86 variants the return register's define carries the
    /// first real return's type when one is known (the stack-pointer
    /// return does not count), else a plain 32-bit size.
    pub fn library_defines(&self, defs: &mut Vec<Assignment>) {
        if !defs.is_empty() {
            return;
        }
        match self.convention {
            Convention::Win32 | Convention::Win32ThisCall | Convention::PentiumStdC => {
                let ty = match self.returns.get(1) {
                    Some(r) => r.ty.clone(),
                    None => Type::sized(4),
                };
                defs.push(Assignment::implicit_typed(ty, Expr::reg(pentium::EAX)));
                defs.push(Assignment::implicit(Expr::reg(pentium::ECX)));
                defs.push(Assignment::implicit(Expr::reg(pentium::EDX)));
                defs.push(Assignment::implicit(Expr::reg(pentium::ESP)));
            }
            Convention::SparcStdC | Convention::SparcLibStdC => {
                for r in sparc::O0..=sparc::O7 {
                    defs.push(Assignment::implicit(Expr::reg(r)));
                }
            }
            Convention::PpcStdC => {
                for r in 3..=12 {
                    defs.push(Assignment::implicit(Expr::reg(r)));
                }
            }
            Convention::MipsStdC => {
                for r in mips::V0..=mips::T7 {
                    defs.push(Assignment::implicit(Expr::reg(r)));
                }
                defs.push(Assignment::implicit(Expr::reg(mips::T8)));
                defs.push(Assignment::implicit(Expr::reg(mips::T9)));
            }
            Convention::Generic | Convention::Custom { .. } | Convention::St20StdC => {}
        }
    }
}

impl PartialEq for Signature {
    // Pairwise parameters and returns; names, flags, and the convention
    // tag do not take part.
    fn eq(&self, other: &Self) -> bool {
        self.params == other.params && self.returns == other.returns
    }
}

impl Eq for Signature {}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.forced {
            f.write_str("*forced* ")?;
        }
        if !self.returns.is_empty() {
            f.write_str("{ ")?;
            for (i, r) in self.returns.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", r)?;
            }
            f.write_str(" } ")?;
        }
        write!(f, "{}(", self.name)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", p)?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_slot(offset: i64) -> Expr {
        Expr::mem(Expr::add(Expr::reg(28), Expr::int(offset)))
    }

    #[test]
    fn equality_ignores_names() {
        let mut a = Signature::concrete(Convention::PentiumStdC, "proc1");
        let mut b = Signature::concrete(Convention::PentiumStdC, "proc2");
        a.add_parameter(Type::sint(4), Some("count"), None, None)
            .unwrap();
        b.add_parameter(Type::sint(4), Some("n"), None, None)
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn equality_is_order_sensitive() {
        let mut a = Signature::new("p");
        let mut b = Signature::new("p");
        a.add_parameter(Type::sint(4), None, Some(stack_slot(4)), None)
            .unwrap();
        a.add_parameter(Type::ptr(Type::sint(1)), None, Some(stack_slot(8)), None)
            .unwrap();
        b.add_parameter(Type::ptr(Type::sint(1)), None, Some(stack_slot(4)), None)
            .unwrap();
        b.add_parameter(Type::sint(4), None, Some(stack_slot(8)), None)
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn clones_do_not_share_structure() {
        let mut orig = Signature::concrete(Convention::PentiumStdC, "p");
        orig.add_parameter(Type::sint(4), Some("x"), None, None)
            .unwrap();
        let mut copy = orig.clone();
        copy.set_param_type(0, Type::f64());
        copy.set_param_location(0, Expr::reg(26));
        assert_eq!(orig.param_type(0), Some(&Type::sint(4)));
        assert_eq!(orig.param_location(0), Some(&stack_slot(4)));
    }

    #[test]
    fn bound_max_mutation_is_local_to_the_clone() {
        let mut orig = Signature::concrete(Convention::PentiumStdC, "read");
        orig.add_parameter(Type::ptr(Type::sint(1)), Some("buf"), None, None)
            .unwrap();
        let mut copy = orig.clone();
        copy.set_param_bound_max(0, Some("len"));
        assert_eq!(copy.param_bound_max(0), Some("len"));
        assert_eq!(orig.param_bound_max(0), None);
    }

    #[test]
    fn parameters_place_themselves_on_the_stack() {
        let mut sig = Signature::concrete(Convention::PentiumStdC, "p");
        for _ in 0..3 {
            sig.add_parameter(Type::sint(4), None, None, None).unwrap();
        }
        assert_eq!(sig.param_location(0), Some(&stack_slot(4)));
        assert_eq!(sig.param_location(1), Some(&stack_slot(8)));
        assert_eq!(sig.param_location(2), Some(&stack_slot(12)));
    }

    #[test]
    fn argument_location_prefers_stored_locations() {
        let mut sig = Signature::concrete(Convention::PentiumStdC, "p");
        sig.add_parameter(Type::sint(4), Some("odd"), Some(Expr::reg(26)), None)
            .unwrap();
        assert_eq!(sig.argument_location(0), Ok(Expr::reg(26)));
        // Past the end, the placement formula answers.
        assert_eq!(sig.argument_location(1), Ok(stack_slot(8)));
    }

    #[test]
    fn leading_stack_pointer_parameter_shifts_placement() {
        let mut sig = Signature::concrete(Convention::PentiumStdC, "p");
        sig.add_parameter(Type::ptr(Type::Void), Some("sp"), Some(Expr::reg(28)), None)
            .unwrap();
        // The next real argument is still the first stack slot.
        sig.add_parameter(Type::sint(4), None, None, None).unwrap();
        assert_eq!(sig.param_location(1), Some(&stack_slot(4)));
        assert_eq!(sig.argument_location(2), Ok(stack_slot(8)));
    }

    #[test]
    fn generic_signatures_cannot_place_parameters() {
        let mut sig = Signature::new("p");
        let err = sig.add_parameter(Type::sint(4), None, None, None);
        assert_eq!(
            err,
            Err(Error::MissingParameterEvidence {
                name: "param1".to_string()
            })
        );
        assert_eq!(sig.num_params(), 0);
        // An explicit location always works.
        sig.add_parameter(Type::sint(4), None, Some(Expr::reg(8)), None)
            .unwrap();
        assert_eq!(sig.num_params(), 1);
    }

    #[test]
    fn synthesized_names_skip_collisions() {
        let mut sig = Signature::concrete(Convention::PentiumStdC, "p");
        sig.add_parameter(Type::sint(4), Some("param2"), None, None)
            .unwrap();
        sig.add_parameter(Type::sint(4), None, None, None).unwrap();
        sig.add_parameter(Type::sint(4), None, None, None).unwrap();
        assert_eq!(sig.param_name(0), Some("param2"));
        assert_eq!(sig.param_name(1), Some("param3"));
        assert_eq!(sig.param_name(2), Some("param4"));
    }

    #[test]
    fn set_num_params_truncates_and_pads() {
        let mut sig = Signature::concrete(Convention::PentiumStdC, "p");
        for _ in 0..3 {
            sig.add_parameter(Type::sint(4), None, None, None).unwrap();
        }
        sig.set_num_params(1).unwrap();
        assert_eq!(sig.num_params(), 1);
        sig.set_num_params(3).unwrap();
        assert_eq!(sig.num_params(), 3);
        assert_eq!(sig.param_location(2), Some(&stack_slot(12)));
        assert_eq!(sig.param_type(2), Some(&Type::Void));

        let mut generic = Signature::new("g");
        assert!(generic.set_num_params(2).is_err());
    }

    #[test]
    fn find_rename_remove() {
        let mut sig = Signature::concrete(Convention::PentiumStdC, "p");
        sig.add_parameter(Type::sint(4), Some("fd"), None, None)
            .unwrap();
        sig.add_parameter(Type::ptr(Type::Void), Some("buf"), None, None)
            .unwrap();

        assert_eq!(sig.find_param_named("buf"), Some(1));
        assert_eq!(sig.find_param(&stack_slot(4)), Some(0));
        assert_eq!(sig.find_param(&stack_slot(16)), None);

        assert!(sig.rename_param("fd", "handle"));
        assert!(!sig.rename_param("fd", "again"));
        assert_eq!(sig.param_name(0), Some("handle"));

        let removed = sig.remove_parameter_by_location(&stack_slot(8));
        assert_eq!(removed.map(|p| p.name), Some("buf".to_string()));
        assert_eq!(sig.num_params(), 1);
        assert!(sig.remove_parameter_by_location(&stack_slot(8)).is_none());

        let first = sig.remove_parameter(0);
        assert_eq!(first.name, "handle");
        assert_eq!(sig.num_params(), 0);
    }

    #[test]
    fn unknown_parameter_reference_leaves_signature_unchanged() {
        let mut sig = Signature::concrete(Convention::PentiumStdC, "p");
        sig.add_parameter(Type::sint(4), Some("x"), None, None)
            .unwrap();
        let before = sig.clone();

        let by_name = sig.set_param_type_named("y", Type::f64());
        assert_eq!(
            by_name,
            Err(Error::UnknownParameterReference {
                reference: "y".to_string()
            })
        );
        let by_loc = sig.set_param_type_at(&Expr::reg(24), Type::f64());
        assert!(by_loc.is_err());
        assert_eq!(sig, before);
        assert_eq!(sig.param_type(0), Some(&Type::sint(4)));

        sig.set_param_type_named("x", Type::f64()).unwrap();
        assert_eq!(sig.param_type(0), Some(&Type::f64()));
    }

    #[test]
    fn concrete_constructors_seed_the_stack_pointer_return() {
        for (conv, sp) in [
            (Convention::Win32, 28),
            (Convention::Win32ThisCall, 28),
            (Convention::PentiumStdC, 28),
            (Convention::SparcStdC, 14),
            (Convention::SparcLibStdC, 14),
            (Convention::PpcStdC, 1),
            (Convention::MipsStdC, 29),
            (Convention::St20StdC, 3),
        ] {
            let sig = Signature::concrete(conv, "p");
            assert_eq!(sig.returns(), &[Return::new(Type::Void, Expr::reg(sp))]);
        }
        assert!(Signature::new("p").returns().is_empty());
        assert!(Signature::custom("p").returns().is_empty());
    }

    #[test]
    fn custom_signatures_learn_their_stack_register() {
        let mut sig = Signature::custom("p");
        assert_eq!(sig.stack_register(), Err(Error::StackRegisterUndefined));
        sig.set_stack_register(7);
        assert_eq!(sig.stack_register(), Ok(7));
        assert_eq!(sig.returns(), &[Return::new(Type::Void, Expr::reg(7))]);

        // Fixed-convention signatures ignore the call.
        let mut win = Signature::concrete(Convention::Win32, "w");
        win.set_stack_register(5);
        assert_eq!(win.stack_register(), Ok(28));
        assert_eq!(win.num_returns(), 1);
    }

    #[test]
    fn add_return_defaults_and_void_filter() {
        let mut sig = Signature::concrete(Convention::PentiumStdC, "p");
        sig.add_return(Type::Void, None).unwrap();
        assert_eq!(sig.num_returns(), 1); // just the seeded stack pointer

        sig.add_return(Type::sint(4), None).unwrap();
        assert_eq!(sig.returns()[1], Return::new(Type::sint(4), Expr::reg(24)));
        sig.add_return(Type::f64(), None).unwrap();
        assert_eq!(sig.returns()[2], Return::new(Type::f64(), Expr::reg(32)));

        let mut generic = Signature::new("g");
        assert_eq!(
            generic.add_return(Type::sint(4), None),
            Err(Error::MissingReturnLocation)
        );
        generic.add_return(Type::sint(4), Some(Expr::reg(8))).unwrap();
        assert_eq!(generic.num_returns(), 1);
    }

    #[test]
    fn returns_can_be_found_retyped_and_removed() {
        let mut sig = Signature::concrete(Convention::SparcStdC, "p");
        sig.add_return(Type::uint(4), None).unwrap();
        assert_eq!(sig.find_return(&Expr::reg(8)), Some(1));
        assert_eq!(sig.type_for(&Expr::reg(8)), Some(&Type::uint(4)));
        assert_eq!(sig.type_for(&Expr::reg(9)), None);

        sig.set_return_type(1, Type::ptr(Type::Void));
        assert_eq!(sig.type_for(&Expr::reg(8)), Some(&Type::ptr(Type::Void)));
        sig.set_return_type(5, Type::f64()); // out of range, ignored
        assert_eq!(sig.num_returns(), 2);

        assert!(sig.remove_return(&Expr::reg(8)));
        assert!(!sig.remove_return(&Expr::reg(8)));
        assert_eq!(sig.num_returns(), 1);
    }

    #[test]
    fn legacy_return_type_slot() {
        let mut sig = Signature::new("p");
        assert_eq!(sig.ret_type(), &Type::Void);
        sig.set_ret_type(Type::ptr(Type::sint(1)));
        assert_eq!(sig.ret_type(), &Type::ptr(Type::sint(1)));
    }

    #[test]
    fn pascal_callees_pop_their_arguments() {
        let mut sig = Signature::concrete(Convention::Win32, "p");
        assert_eq!(
            sig.proven_value(&Expr::reg(28)),
            Some(Expr::add(Expr::reg(28), Expr::int(4)))
        );
        sig.add_parameter(Type::sint(4), None, None, None).unwrap();
        sig.add_parameter(Type::sint(4), None, None, None).unwrap();
        assert_eq!(
            sig.proven_value(&Expr::reg(28)),
            Some(Expr::add(Expr::reg(28), Expr::int(12)))
        );
    }

    #[test]
    fn leading_stack_pointer_parameter_is_not_popped() {
        let mut sig = Signature::concrete(Convention::Win32, "p");
        sig.add_parameter(Type::ptr(Type::Void), Some("sp"), Some(Expr::reg(28)), None)
            .unwrap();
        sig.add_parameter(Type::sint(4), None, None, None).unwrap();
        // One real argument: retire the return address plus four bytes.
        assert_eq!(
            sig.proven_value(&Expr::reg(28)),
            Some(Expr::add(Expr::reg(28), Expr::int(8)))
        );
    }

    #[test]
    fn thiscall_callees_leave_this_alone() {
        let mut sig = Signature::concrete(Convention::Win32ThisCall, "p");
        sig.add_parameter(Type::ptr(Type::Void), Some("this"), None, None)
            .unwrap();
        sig.add_parameter(Type::sint(4), None, None, None).unwrap();
        sig.add_parameter(Type::sint(4), None, None, None).unwrap();
        assert_eq!(sig.param_location(0), Some(&Expr::reg(25)));
        // Three parameters, two on the stack, plus the return address.
        assert_eq!(
            sig.proven_value(&Expr::reg(28)),
            Some(Expr::add(Expr::reg(28), Expr::int(12)))
        );
    }

    #[test]
    fn cdecl_callees_pop_only_the_return_address() {
        let mut sig = Signature::concrete(Convention::PentiumStdC, "p");
        sig.add_parameter(Type::sint(4), None, None, None).unwrap();
        sig.add_parameter(Type::sint(4), None, None, None).unwrap();
        assert_eq!(
            sig.proven_value(&Expr::reg(28)),
            Some(Expr::add(Expr::reg(28), Expr::int(4)))
        );
    }

    #[test]
    fn proven_identities_and_preservation() {
        let sig = Signature::concrete(Convention::PentiumStdC, "p");
        assert_eq!(sig.proven_value(&Expr::reg(27)), Some(Expr::reg(27)));
        assert_eq!(sig.proven_value(&Expr::reg(24)), None);
        assert!(sig.is_preserved(&Expr::reg(29)));
        assert!(sig.is_preserved(&Expr::reg(11))); // %bl, a partial view
        assert!(!sig.is_preserved(&Expr::reg(24)));
        assert!(!sig.is_preserved(&Expr::mem(Expr::reg(28))));

        let generic = Signature::new("g");
        assert_eq!(generic.proven_value(&Expr::reg(28)), None);
        assert!(!generic.is_preserved(&Expr::reg(29)));

        let sparc = Signature::concrete(Convention::SparcLibStdC, "l");
        assert_eq!(sparc.proven_value(&Expr::reg(2)), Some(Expr::reg(2)));
        assert_eq!(sparc.proven_value(&Expr::reg(8)), None);
    }

    #[test]
    fn library_defines_appends_once() {
        let sig = Signature::concrete(Convention::PentiumStdC, "p");
        let mut defs = Vec::new();
        sig.library_defines(&mut defs);
        assert_eq!(defs.len(), 4);
        assert_eq!(defs[0].lhs, Expr::reg(24));
        assert_eq!(defs[0].ty, Type::sized(4));
        sig.library_defines(&mut defs);
        assert_eq!(defs.len(), 4);
    }

    #[test]
    fn library_defines_follow_the_known_return_type() {
        let mut sig = Signature::concrete(Convention::Win32, "p");
        sig.add_return(Type::ptr(Type::sint(1)), None).unwrap();
        let mut defs = Vec::new();
        sig.library_defines(&mut defs);
        assert_eq!(defs[0].ty, Type::ptr(Type::sint(1)));
    }

    #[test]
    fn library_defines_per_convention() {
        let cases = [
            (Convention::SparcStdC, 8),
            (Convention::SparcLibStdC, 8),
            (Convention::PpcStdC, 10),
            (Convention::MipsStdC, 16),
            (Convention::St20StdC, 0),
            (Convention::Generic, 0),
        ];
        for (conv, count) in cases {
            let sig = Signature::concrete(conv, "p");
            let mut defs = Vec::new();
            sig.library_defines(&mut defs);
            assert_eq!(defs.len(), count, "{}", conv);
        }
    }

    #[test]
    fn instantiate_maps_platform_and_convention() {
        let cases = [
            (Platform::Pentium, CallConv::Pascal, Convention::Win32),
            (
                Platform::Pentium,
                CallConv::ThisCall,
                Convention::Win32ThisCall,
            ),
            (Platform::Pentium, CallConv::C, Convention::PentiumStdC),
            (Platform::Sparc, CallConv::C, Convention::SparcStdC),
            (Platform::Ppc, CallConv::C, Convention::PpcStdC),
            (Platform::St20, CallConv::C, Convention::St20StdC),
        ];
        for (platform, cc, conv) in cases {
            let sig = Signature::instantiate(platform, cc, "p").unwrap();
            assert_eq!(sig.convention(), conv);
        }
        assert_eq!(
            Signature::instantiate(Platform::Sparc, CallConv::Pascal, "p"),
            Err(Error::UnrecognizedConvention {
                platform: Platform::Sparc,
                convention: CallConv::Pascal,
            })
        );
        assert!(Signature::instantiate(Platform::Mips, CallConv::C, "p").is_err());
    }

    #[test]
    fn display_reads_like_a_declaration() {
        let mut sig = Signature::concrete(Convention::PentiumStdC, "strlen");
        sig.add_parameter(Type::ptr(Type::sint(1)), Some("s"), None, None)
            .unwrap();
        sig.add_return(Type::sint(4), None).unwrap();
        assert_eq!(
            sig.to_string(),
            "{ void r28, int32 r24 } strlen(int8* s m[r28 + 4])"
        );
        sig.set_forced(true);
        assert!(sig.to_string().starts_with("*forced* "));

        let bare = Signature::new("entry");
        assert_eq!(bare.to_string(), "entry()");
    }
}
