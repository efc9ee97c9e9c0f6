//! `import`/`export` statements. Resolving a module *specifier* to its
//! exports is entirely the host's job (`module_loader::ModuleLoader`);
//! by the time this module runs, `checker::check_program` has already
//! walked every `import` once and cached whatever the loader returned in
//! `TypeContext`'s module table (see `checker::mod::resolve_imports`).
//! This module only binds the imported names into the environment and
//! validates `export` forms against it.

use crate::ast::statement::{ExportDeclaration, ImportDeclaration, Statement};
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::environment::undefined_variable;
use crate::checker::error::{ModuleNotFound, TypeCheckError, UndefinedExport};
use crate::checker::types::{ObjectKind, ObjectType, PropertyType, PropertyVisibility, Type};
use crate::span::Span;

/// Bind every name this import introduces into the current scope. Imported
/// bindings are never reassignable (`mutable: false`), and — mirroring how
/// a class or interface declaration binds the same name as both a value
/// and a type (`checker::environment`'s declaration-merging note) — every
/// named/default import is also registered as a type name, so `import {
/// Shape } from "./shapes"` lets `Shape` appear in an annotation position
/// too.
pub fn shallow_check_import(decl: &ImportDeclaration, ctx: &mut TypeContext) {
    let Some(exports) = ctx.module(&decl.module).cloned() else {
        let _ = ctx.report(TypeCheckError::ModuleNotFound(
            ModuleNotFound { module: decl.module.clone() },
            decl.span.clone(),
        ));
        bind_as_any(decl, ctx);
        return;
    };

    if let Some(local) = &decl.default {
        bind_import(local, exports.get("default"), "default", decl, ctx);
    }

    if let Some(namespace) = &decl.namespace {
        let namespace_ty = Type::Object(ObjectType {
            kind: ObjectKind::Anonymous,
            type_arguments: vec![],
            properties: exports
                .iter()
                .map(|(name, ty)| PropertyType {
                    name: name.clone(),
                    ty: ty.clone(),
                    optional: false,
                    readonly: true,
                    visibility: PropertyVisibility::Public,
                    is_static: false,
                    declaring_class: None,
                })
                .collect(),
            call_signatures: vec![],
            construct_signatures: vec![],
            index_signature: None,
        });
        let _ = ctx.env.declare_binding(namespace.clone(), namespace_ty, false);
    }

    for specifier in &decl.named {
        bind_import(&specifier.local, exports.get(&specifier.imported), &specifier.imported, decl, ctx);
    }
}

fn bind_import(
    local: &str,
    exported: Option<&Type>,
    exported_name: &str,
    decl: &ImportDeclaration,
    ctx: &mut TypeContext,
) {
    match exported {
        Some(ty) => {
            let _ = ctx.env.declare_binding(local.to_string(), ty.clone(), false);
            ctx.env.declare_type(local.to_string(), ty.clone());
        }
        None => {
            let _ = ctx.report(TypeCheckError::UndefinedExport(
                UndefinedExport {
                    name: exported_name.to_string(),
                    module: decl.module.clone(),
                },
                decl.span.clone(),
            ));
            let _ = ctx.env.declare_binding(local.to_string(), Type::Any, false);
        }
    }
}

/// A module that failed to resolve at all still introduces every name the
/// import asked for, typed `any`, so the rest of the file doesn't cascade
/// into spurious "undefined name" diagnostics on top of the one
/// `ModuleNotFound` already reported.
fn bind_as_any(decl: &ImportDeclaration, ctx: &mut TypeContext) {
    if let Some(local) = &decl.default {
        let _ = ctx.env.declare_binding(local.clone(), Type::Any, false);
    }
    if let Some(namespace) = &decl.namespace {
        let _ = ctx.env.declare_binding(namespace.clone(), Type::Any, false);
    }
    for specifier in &decl.named {
        let _ = ctx.env.declare_binding(specifier.local.clone(), Type::Any, false);
    }
}

/// The full pass re-runs the same binding logic (idempotent: re-declaring
/// into the same frame with the same type is harmless, and a module whose
/// exports changed between passes never happens since the loader is
/// consulted exactly once per specifier) so a `let`/`const` earlier in the
/// file that shadowed an import in the shallow pass is correctly restored.
pub fn check_import(decl: ImportDeclaration, span: Span, ctx: &mut TypeContext) -> Statement<ExprInfo> {
    shallow_check_import(&decl, ctx);
    Statement::Import(decl, span)
}

pub fn check_export(
    export: ExportDeclaration<()>,
    ctx: &mut TypeContext,
) -> Statement<ExprInfo> {
    match export {
        ExportDeclaration::Declaration(inner, span) => {
            let checked = super::check_statement(*inner, ctx);
            Statement::Export(ExportDeclaration::Declaration(Box::new(checked), span))
        }
        ExportDeclaration::Default(expr, span) => {
            let checked = super::super::expression::infer_expression(expr, ctx);
            Statement::Export(ExportDeclaration::Default(checked, span))
        }
        ExportDeclaration::Named(specifiers, span) => {
            for specifier in &specifiers {
                if ctx.env.resolve(&specifier.local).is_none()
                    && ctx.env.lookup_type(&specifier.local).is_none()
                {
                    let _ = ctx.report(undefined_variable(&specifier.local, &span));
                }
            }
            Statement::Export(ExportDeclaration::Named(specifiers, span))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::context::CheckerOptions;
    use crate::ast::statement::ImportSpecifier;
    use crate::module_loader::ModuleExports;

    fn ctx_with_module() -> TypeContext {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        let mut exports = ModuleExports::new();
        exports.insert("value".to_string(), Type::Number);
        ctx.register_module("./a", exports);
        ctx
    }

    #[test]
    fn named_import_binds_exported_type() {
        let mut ctx = ctx_with_module();
        let decl = ImportDeclaration {
            module: "./a".to_string(),
            default: None,
            namespace: None,
            named: vec![ImportSpecifier {
                imported: "value".to_string(),
                local: "value".to_string(),
                is_type_only: false,
            }],
            is_type_only: false,
            span: Span::default(),
        };
        shallow_check_import(&decl, &mut ctx);
        assert_eq!(ctx.env.resolve("value"), Some(Type::Number));
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn missing_module_reports_module_not_found() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        let decl = ImportDeclaration {
            module: "./missing".to_string(),
            default: None,
            namespace: None,
            named: vec![ImportSpecifier {
                imported: "value".to_string(),
                local: "value".to_string(),
                is_type_only: false,
            }],
            is_type_only: false,
            span: Span::default(),
        };
        shallow_check_import(&decl, &mut ctx);
        assert_eq!(ctx.diagnostics().len(), 1);
        assert_eq!(ctx.diagnostics()[0].error_code, "TS2307");
        assert_eq!(ctx.env.resolve("value"), Some(Type::Any));
    }

    #[test]
    fn missing_named_export_reports_undefined_export() {
        let mut ctx = ctx_with_module();
        let decl = ImportDeclaration {
            module: "./a".to_string(),
            default: None,
            namespace: None,
            named: vec![ImportSpecifier {
                imported: "missing".to_string(),
                local: "missing".to_string(),
                is_type_only: false,
            }],
            is_type_only: false,
            span: Span::default(),
        };
        shallow_check_import(&decl, &mut ctx);
        assert_eq!(ctx.diagnostics().len(), 1);
        assert_eq!(ctx.diagnostics()[0].error_code, "TS2305");
    }
}
