//! The checking context threaded through every `check`/`infer` call: the
//! live `Environment`, accumulated diagnostics, the recursion guard, and the
//! knobs a host embedding this crate can tune via `CheckerOptions`.

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, trace};

use crate::checker::environment::Environment;
use crate::checker::error::{Diagnostic, RecursionLimitExceeded, TypeCheckError};
use crate::checker::types::Type;
use crate::module_loader::ModuleExports;
use crate::span::Span;

/// The per-expression-node annotation attached while walking
/// `ast::Expression<()>` into `ast::Expression<ExprInfo>`. The slot starts
/// empty and is filled in by whichever checking rule first infers (or is
/// given, contextually) this node's type; `Rc<RefCell<_>>` lets a node's
/// type be refined after the fact (e.g. a `let` binding's initializer is
/// checked before the declared annotation is known to widen it) without
/// threading a second pass over the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprInfo {
    pub type_id: Rc<RefCell<Option<Type>>>,
}

impl ExprInfo {
    pub fn new(ty: Type) -> Self {
        ExprInfo {
            type_id: Rc::new(RefCell::new(Some(ty))),
        }
    }

    pub fn empty() -> Self {
        ExprInfo {
            type_id: Rc::new(RefCell::new(None)),
        }
    }

    pub fn get(&self) -> Option<Type> {
        self.type_id.borrow().clone()
    }

    pub fn set(&self, ty: Type) {
        *self.type_id.borrow_mut() = Some(ty);
    }
}

/// Host-tunable knobs. `Default` matches what a standalone invocation of
/// this crate wants; embedders (an LSP, a build tool) override individual
/// fields.
#[derive(Debug, Clone)]
pub struct CheckerOptions {
    /// Stop at the first error instead of collecting as many diagnostics as
    /// possible. Off by default: IDE- and CLI-style consumers both want the
    /// full diagnostic list for one pass over a file.
    pub fail_fast: bool,
    /// Upper bound on nested generic instantiation / recursive type alias
    /// expansion depth, guarding against adversarial or accidentally
    /// infinite recursive types.
    pub max_type_depth: usize,
    /// Treat any implicit `any` (an untyped parameter with no inferable
    /// contextual type) as an error rather than silently typing it `any`.
    pub no_implicit_any: bool,
    /// Disallow reading a possibly-`null`/`undefined` value without a prior
    /// narrowing or non-null assertion.
    pub strict_null_checks: bool,
    /// This program's own module specifier, passed as `importing_module` to
    /// `module_loader::ModuleLoader::resolve` for every `import` it
    /// contains. A standalone snippet with no enclosing module graph can
    /// leave this as the default.
    pub module_name: String,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        CheckerOptions {
            fail_fast: false,
            max_type_depth: 256,
            no_implicit_any: false,
            strict_null_checks: true,
            module_name: String::new(),
        }
    }
}

/// Depth counter guarding recursive type-level work (generic instantiation,
/// alias expansion, structural comparison of self-referential types).
/// Cloned cheaply; every clone shares the same ceiling but tracks its own
/// current depth so sibling branches of a comparison don't interfere.
#[derive(Debug, Clone)]
pub struct RecursionGuard {
    depth: usize,
    limit: usize,
}

impl RecursionGuard {
    pub fn new(limit: usize) -> Self {
        RecursionGuard { depth: 0, limit }
    }

    pub fn enter(&self, span: &Span) -> Result<Self, TypeCheckError> {
        let depth = self.depth + 1;
        if depth > self.limit {
            return Err(TypeCheckError::RecursionLimitExceeded(
                RecursionLimitExceeded { limit: self.limit },
                span.clone(),
            ));
        }
        Ok(RecursionGuard {
            depth,
            limit: self.limit,
        })
    }
}

pub struct TypeContext {
    pub env: Environment,
    diagnostics: Vec<Diagnostic>,
    pub options: CheckerOptions,
    pub recursion: RecursionGuard,
    modules: std::collections::HashMap<String, ModuleExports>,
}

impl TypeContext {
    pub fn new(options: CheckerOptions) -> Self {
        let recursion = RecursionGuard::new(options.max_type_depth);
        TypeContext {
            env: Environment::new(),
            diagnostics: Vec::new(),
            options,
            recursion,
            modules: std::collections::HashMap::new(),
        }
    }

    /// Record an error. Returns `Err` when `fail_fast` is set, so call
    /// sites that want early-exit semantics can just propagate with `?`;
    /// call sites doing best-effort recovery can ignore the `Result` and
    /// keep walking with a placeholder `Type::Unknown`.
    pub fn report(&mut self, error: TypeCheckError) -> Result<(), TypeCheckError> {
        trace!("diagnostic: {error}");
        self.diagnostics.push(Diagnostic::from(&error));
        if self.options.fail_fast {
            return Err(error);
        }
        Ok(())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn register_module(&mut self, name: impl Into<String>, exports: ModuleExports) {
        let name = name.into();
        debug!("registered module '{name}' with {} exports", exports.len());
        self.modules.insert(name, exports);
    }

    pub fn module(&self, name: &str) -> Option<&ModuleExports> {
        self.modules.get(name)
    }

    /// Bind a name as a value in
    /// the outermost scope. Thin alias over `Environment::declare_binding`
    /// kept at this layer so a `BuiltinInitializer` never needs to reach
    /// past `TypeContext` into `Environment` directly.
    pub fn define_global(&mut self, name: impl Into<String>, ty: Type) {
        let _ = self.env.declare_binding(name, ty, false);
    }

    /// Register a named type alias in the global scope.
    pub fn define_type_alias(&mut self, name: impl Into<String>, ty: Type) {
        self.env.declare_type(name, ty);
    }

    /// Look up a previously-defined
    /// type alias or global value's type by name.
    pub fn get_type(&self, name: &str) -> Option<Type> {
        self.env.lookup_type(name).or_else(|| self.env.resolve(name))
    }

    /// Register a prototype member for a primitive wrapper type.
    pub fn set_primitive_prototype(&mut self, kind: &str, members: crate::checker::types::ObjectType) {
        for prop in members.properties {
            self.env.register_prototype_member(kind, prop.name, prop.ty);
        }
    }
}

impl Default for TypeContext {
    fn default() -> Self {
        TypeContext::new(CheckerOptions::default())
    }
}
