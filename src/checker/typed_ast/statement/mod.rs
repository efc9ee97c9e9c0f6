//! Dispatch over every `Statement<()>` variant. Split by family the same
//! way `typed_ast::expression` is: `declaration` owns `let`/`interface`/
//! `type`, `control` owns branches/loops/`try`/`switch`, `class_decl` and
//! `function_decl` wrap the class and function pipelines, `import_decl`
//! resolves `import`/`export`.

pub mod class_decl;
pub mod control;
pub mod declaration;
pub mod function_decl;
pub mod import_decl;

use crate::ast::statement::{ExportDeclaration, Statement};
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::types::{ObjectKind, ObjectType, Type};

/// Round 1 of the shallow pass: an empty placeholder for every class and
/// interface name, declared only if nothing already claimed it, so a
/// forward reference from another top-level shape resolves to an (empty,
/// until round 3 rebuilds it) object instead of `UndefinedType`.
pub fn declare_placeholder(statement: &Statement<()>, ctx: &mut TypeContext) {
    match statement {
        Statement::ClassDeclaration(decl) => {
            if ctx.env.lookup_type(&decl.name).is_none() {
                ctx.env.declare_type(
                    decl.name.clone(),
                    Type::Object(ObjectType::empty(ObjectKind::Class(decl.name.clone()))),
                );
            }
        }
        Statement::InterfaceDeclaration(decl) => {
            if ctx.env.lookup_type(&decl.name).is_none() {
                ctx.env.declare_type(
                    decl.name.clone(),
                    Type::Object(ObjectType::empty(ObjectKind::Interface(decl.name.clone()))),
                );
            }
        }
        Statement::Export(ExportDeclaration::Declaration(inner, _)) => {
            declare_placeholder(inner, ctx);
        }
        _ => {}
    }
}

/// Round 2 of the shallow pass: bind every top-level import regardless of
/// where it sits in the file, so a declaration checked earlier in round 3
/// can still reference an imported name.
pub fn bind_imports(statement: &Statement<()>, ctx: &mut TypeContext) {
    match statement {
        Statement::Import(decl, _) => import_decl::shallow_check_import(decl, ctx),
        Statement::Export(ExportDeclaration::Declaration(inner, _)) => bind_imports(inner, ctx),
        _ => {}
    }
}

/// Round 3 of the shallow pass: the real signature for every declaration.
pub fn shallow_check_statement(statement: &Statement<()>, ctx: &mut TypeContext) {
    match statement {
        Statement::FunctionDeclaration(decl) => {
            function_decl::shallow_check_function_declaration(decl, ctx)
        }
        Statement::ClassDeclaration(decl) => class_decl::shallow_check(decl, ctx),
        Statement::InterfaceDeclaration(decl) => declaration::shallow_check_interface(decl, ctx),
        Statement::TypeAliasDeclaration(decl) => declaration::shallow_check_type_alias(decl, ctx),
        Statement::Export(ExportDeclaration::Declaration(inner, _)) => {
            shallow_check_statement(inner, ctx)
        }
        _ => {}
    }
}

pub fn check_statement(statement: Statement<()>, ctx: &mut TypeContext) -> Statement<ExprInfo> {
    match statement {
        Statement::Expression(expr, span) => {
            Statement::Expression(super::expression::infer_expression(expr, ctx), span)
        }
        Statement::VariableDeclaration(decl) => {
            Statement::VariableDeclaration(declaration::check_variable_declaration(decl, ctx))
        }
        Statement::FunctionDeclaration(decl) => {
            Statement::FunctionDeclaration(function_decl::check_function_declaration(decl, ctx))
        }
        Statement::ClassDeclaration(decl) => Statement::ClassDeclaration(class_decl::check(decl, ctx)),
        Statement::InterfaceDeclaration(decl) => {
            Statement::InterfaceDeclaration(declaration::check_interface(decl, ctx))
        }
        Statement::TypeAliasDeclaration(decl) => {
            Statement::TypeAliasDeclaration(declaration::check_type_alias(decl, ctx))
        }
        Statement::Return(expr, span) => control::check_return(expr, span, ctx),
        Statement::If(s) => Statement::If(control::check_if(s, ctx)),
        Statement::While(s) => Statement::While(control::check_while(s, ctx)),
        Statement::DoWhile(s) => Statement::DoWhile(control::check_do_while(s, ctx)),
        Statement::For(s) => Statement::For(control::check_for(s, ctx)),
        Statement::ForOf(s) => Statement::ForOf(control::check_for_of(s, ctx)),
        Statement::ForIn(s) => Statement::ForIn(control::check_for_in(s, ctx)),
        Statement::Block(statements, span) => control::check_block(statements, span, ctx),
        Statement::Break(label, span) => Statement::Break(label, span),
        Statement::Continue(label, span) => Statement::Continue(label, span),
        Statement::Throw(expr, span) => {
            Statement::Throw(super::expression::infer_expression(expr, ctx), span)
        }
        Statement::Try(s) => Statement::Try(control::check_try(s, ctx)),
        Statement::Switch(s) => Statement::Switch(control::check_switch(s, ctx)),
        Statement::Import(decl, span) => import_decl::check_import(decl, span, ctx),
        Statement::Export(export) => import_decl::check_export(export, ctx),
        Statement::Empty(span) => Statement::Empty(span),
    }
}

/// Whether this already-checked statement always transfers control away, so
/// a block can flag whatever follows it as unreachable. A `Block` counts if
/// any statement inside it does, since the ones before it run unconditionally
/// in sequence; an `if` only counts when both arms do.
pub(crate) fn always_terminates(stmt: &Statement<ExprInfo>) -> bool {
    match stmt {
        Statement::Return(..) | Statement::Throw(..) | Statement::Break(..) | Statement::Continue(..) => {
            true
        }
        Statement::If(s) => match &s.alternate {
            Some(alt) => always_terminates(&s.consequent) && always_terminates(alt),
            None => false,
        },
        Statement::Block(statements, _) => statements.iter().any(always_terminates),
        _ => false,
    }
}
