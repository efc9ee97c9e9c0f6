//! Lexical scoping: variable/constant bindings, visible type names, type
//! parameters in scope, function overload sets, per-type prototype members,
//! and the narrowing overlay the flow-sensitive pass pushes and pops.

use std::collections::HashMap;

use crate::checker::error::{RedeclaredBinding, TypeCheckError};
use crate::checker::types::{FunctionType, Type};

#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub ty: Type,
    pub mutable: bool,
}

/// One lexical frame: a block, function body, module top level, or a
/// narrowing overlay pushed for the duration of an `if`/`&&` branch.
#[derive(Clone, Debug, Default)]
struct Frame {
    bindings: HashMap<String, Binding>,
    types: HashMap<String, Type>,
    type_parameters: HashMap<String, Type>,
    /// Narrowings keyed by dotted path (`"x"`, `"x.kind"`). A frame pushed
    /// for an `if` consequent holds the positive narrowing; the matching
    /// frame for the alternate (or the fallthrough after the `if`, absent
    /// an `else`) holds the complement. See `checker::narrowing`.
    narrowings: HashMap<String, Type>,
}

/// The scope stack plus the two global side-tables that outlive any single
/// frame: per-(type, member-name) prototype methods/properties, and named
/// function overload sets (TS allows several `function f(...)` signatures
/// before the implementation).
#[derive(Clone, Debug, Default)]
pub struct Environment {
    frames: Vec<Frame>,
    prototypes: HashMap<String, HashMap<String, Type>>,
    overloads: HashMap<String, Vec<FunctionType>>,
    /// Declared type-parameter names, in declaration order, for every
    /// generic class/interface/type alias registered so far. Keyed by the
    /// generic's own name so `checker::annotation::substitute` can turn
    /// `Name<Arg>` into a name-keyed substitution instead of guessing from
    /// a positional naming convention.
    generic_params: HashMap<String, Vec<String>>,
    /// `class name -> its immediate superclass name`, for walking the
    /// ancestor chain during `protected`-member access checks after
    /// `extends` has flattened inherited properties into a flat
    /// `properties` vec when a class extends another.
    class_parents: HashMap<String, String>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            frames: vec![Frame::default()],
            ..Default::default()
        }
    }

    pub fn enter_scope(&mut self) {
        self.frames.push(Frame::default());
    }

    pub fn exit_scope(&mut self) {
        self.frames.pop();
        debug_assert!(!self.frames.is_empty(), "popped the root frame");
    }

    /// Run `f` inside a fresh child frame, always popping it afterwards even
    /// if `f` returns an error.
    pub fn with_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        self.enter_scope();
        let result = f(self);
        self.exit_scope();
        result
    }

    pub fn declare_binding(
        &mut self,
        name: impl Into<String>,
        ty: Type,
        mutable: bool,
    ) -> Result<(), RedeclaredBinding> {
        let name = name.into();
        let frame = self.frames.last_mut().expect("root frame always present");
        if frame.bindings.contains_key(&name) {
            return Err(RedeclaredBinding { name });
        }
        frame.bindings.insert(name, Binding { ty, mutable });
        Ok(())
    }

    /// Overwrite an existing binding's type in whichever frame declared it,
    /// used after narrowing-free reassignment (`let x = 1; x = 2;` keeps
    /// the declared type but a `var` redeclaration-by-assignment pattern in
    /// some dialects widens it). Checked callers should prefer pushing a
    /// narrowing instead when the change should be scoped to one branch.
    pub fn update_binding(&mut self, name: &str, ty: Type) {
        for frame in self.frames.iter_mut().rev() {
            if let Some(binding) = frame.bindings.get_mut(name) {
                binding.ty = ty;
                return;
            }
        }
    }

    pub fn lookup_binding(&self, name: &str) -> Option<&Binding> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.bindings.get(name))
    }

    /// The type of `name` as currently narrowed, if any narrowing for the
    /// bare identifier path is in scope, else its declared binding type.
    pub fn resolve(&self, name: &str) -> Option<Type> {
        if let Some(narrowed) = self.lookup_narrowing(name) {
            return Some(narrowed);
        }
        self.lookup_binding(name).map(|b| b.ty.clone())
    }

    pub fn declare_type(&mut self, name: impl Into<String>, ty: Type) {
        self.frames
            .last_mut()
            .expect("root frame always present")
            .types
            .insert(name.into(), ty);
    }

    pub fn lookup_type(&self, name: &str) -> Option<Type> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.types.get(name).cloned())
    }

    pub fn declare_type_parameter(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.frames
            .last_mut()
            .expect("root frame always present")
            .type_parameters
            .insert(name.clone(), Type::TypeParameter(name));
    }

    pub fn is_type_parameter(&self, name: &str) -> bool {
        self.frames
            .iter()
            .rev()
            .any(|frame| frame.type_parameters.contains_key(name))
    }

    /// Push a fresh frame carrying only narrowings (used for `if`/`&&`
    /// branches, which must not introduce a new lexical block for plain
    /// bindings).
    pub fn push_narrowings(&mut self, narrowings: HashMap<String, Type>) {
        self.frames.push(Frame {
            narrowings,
            ..Default::default()
        });
    }

    pub fn pop_narrowings(&mut self) {
        self.exit_scope();
    }

    pub fn lookup_narrowing(&self, path: &str) -> Option<Type> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.narrowings.get(path).cloned())
    }

    pub fn register_prototype_member(
        &mut self,
        type_name: impl Into<String>,
        member_name: impl Into<String>,
        ty: Type,
    ) {
        self.prototypes
            .entry(type_name.into())
            .or_default()
            .insert(member_name.into(), ty);
    }

    pub fn prototype_member(&self, type_name: &str, member_name: &str) -> Option<Type> {
        self.prototypes
            .get(type_name)
            .and_then(|members| members.get(member_name))
            .cloned()
    }

    pub fn register_overload(&mut self, name: impl Into<String>, signature: FunctionType) {
        self.overloads.entry(name.into()).or_default().push(signature);
    }

    pub fn overloads(&self, name: &str) -> &[FunctionType] {
        self.overloads.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Remove a pending overload set once it's been merged into a single
    /// `Type::Object` with multiple call signatures, so a later redeclared
    /// name doesn't accumulate stale signatures from an earlier function.
    pub fn take_overloads(&mut self, name: &str) -> Vec<FunctionType> {
        self.overloads.remove(name).unwrap_or_default()
    }

    pub fn declare_generic_params(&mut self, name: impl Into<String>, params: Vec<String>) {
        self.generic_params.insert(name.into(), params);
    }

    pub fn generic_params(&self, name: &str) -> &[String] {
        self.generic_params.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn declare_superclass(&mut self, class: impl Into<String>, parent: impl Into<String>) {
        self.class_parents.insert(class.into(), parent.into());
    }

    /// Whether `ancestor` is `class` itself or any superclass reachable by
    /// walking `class_parents`. Used for `protected` access: a member
    /// declared on `ancestor` is visible from a method body checked in the
    /// context of `class` when this holds.
    pub fn class_is_or_extends(&self, class: &str, ancestor: &str) -> bool {
        let mut current = class.to_string();
        for _ in 0..256 {
            if current == ancestor {
                return true;
            }
            match self.class_parents.get(&current) {
                Some(parent) => current = parent.clone(),
                None => return false,
            }
        }
        false
    }
}

/// Convenience: turn a declared-binding lookup miss into the standard
/// diagnostic, since nearly every identifier-resolution site wants this.
pub fn undefined_variable(name: &str, span: &crate::span::Span) -> TypeCheckError {
    TypeCheckError::UndefinedVariable(
        crate::checker::error::UndefinedVariable { name: name.to_string() },
        span.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shadowing_in_nested_scope() {
        let mut env = Environment::new();
        env.declare_binding("x", Type::Number, false).unwrap();
        env.with_scope(|env| {
            env.declare_binding("x", Type::String, false).unwrap();
            assert_eq!(env.resolve("x"), Some(Type::String));
        });
        assert_eq!(env.resolve("x"), Some(Type::Number));
    }

    #[test]
    fn redeclaration_in_same_frame_errors() {
        let mut env = Environment::new();
        env.declare_binding("x", Type::Number, false).unwrap();
        assert!(env.declare_binding("x", Type::String, false).is_err());
    }

    #[test]
    fn narrowing_overlay_shadows_declared_type() {
        let mut env = Environment::new();
        env.declare_binding("x", Type::union(vec![Type::Number, Type::String]), true)
            .unwrap();
        let mut narrowings = HashMap::new();
        narrowings.insert("x".to_string(), Type::Number);
        env.push_narrowings(narrowings);
        assert_eq!(env.resolve("x"), Some(Type::Number));
        env.pop_narrowings();
        assert_eq!(
            env.resolve("x"),
            Some(Type::union(vec![Type::Number, Type::String]))
        );
    }
}
