//! Type checking: turns an `ast::Program<()>` into a checked
//! `ast::Program<context::ExprInfo>` plus a list of diagnostics.
//!
//! The pipeline mirrors two passes: [`typed_ast::shallow_check_program`]
//! registers every top-level class/interface/type-alias/function signature
//! first (so forward references between them resolve), then
//! [`typed_ast::check_program`] walks every statement in source order doing
//! bottom-up inference, top-down contextual typing against declared
//! annotations, and flow-sensitive narrowing as it goes.

pub mod annotation;
pub mod assignability;
pub mod class;
pub mod context;
pub mod environment;
pub mod error;
pub mod function;
pub mod narrowing;
pub mod typed_ast;
pub mod types;

use crate::ast::statement::{ExportDeclaration, Statement};
use crate::ast::Program;
use crate::builtins::{BuiltinInitializer, StandardLibrary};
use crate::module_loader::ModuleLoader;
use context::{CheckerOptions, ExprInfo, TypeContext};
use error::Diagnostic;

/// Check a whole program, returning the typed tree alongside every
/// diagnostic collected (empty `diagnostics` means the program is
/// well-typed). Never returns `Err` unless `options.fail_fast` is set and a
/// diagnostic was reported early.
pub fn check_program(
    program: Program<()>,
    options: CheckerOptions,
    modules: &dyn ModuleLoader,
) -> (Program<ExprInfo>, Vec<Diagnostic>) {
    let mut ctx = TypeContext::new(options);
    StandardLibrary.install(&mut ctx);
    resolve_imports(&program, modules, &mut ctx);

    let checked = typed_ast::check_program(program, &mut ctx);
    let diagnostics = ctx.into_diagnostics();
    (checked, diagnostics)
}

/// Consult the host's `ModuleLoader` once per distinct `import` specifier
/// before checking starts, caching each result in `TypeContext`. Import
/// statements are re-visited during the shallow and full passes, but only
/// ever to bind names from this already-resolved cache — the loader itself
/// is never called mid-traversal, so it can't observe partially-checked
/// state and a CLI driving a whole project can check a dependency graph
/// leaf-first without this crate caring about the order.
fn resolve_imports(program: &Program<()>, modules: &dyn ModuleLoader, ctx: &mut TypeContext) {
    for statement in &program.statements {
        resolve_imports_in_statement(statement, modules, ctx);
    }
}

fn resolve_imports_in_statement(statement: &Statement<()>, modules: &dyn ModuleLoader, ctx: &mut TypeContext) {
    match statement {
        Statement::Import(decl, _) => {
            if ctx.module(&decl.module).is_none() {
                if let Some(exports) = modules.resolve(&decl.module, &ctx.options.module_name) {
                    ctx.register_module(decl.module.clone(), exports);
                }
            }
        }
        Statement::Export(ExportDeclaration::Declaration(inner, _)) => {
            resolve_imports_in_statement(inner, modules, ctx)
        }
        _ => {}
    }
}
