//! Shared fixture builders for the integration tests in this directory.
//!
//! There is no parser in this crate, so every test builds its `ast::Program`
//! by hand. These helpers exist only to keep the individual scenario tests
//! (one per worked example scenario) readable; they are not part of the
//! crate's public surface.

#![allow(dead_code)]

use tsc::ast::expression::*;
use tsc::ast::statement::*;
use tsc::ast::type_annotation::{AnnotatedParameter, AnnotatedProperty, LiteralAnnotation, TypeAnnotation};
use tsc::ast::Program;
use tsc::checker::context::{CheckerOptions, ExprInfo};
use tsc::checker::error::Diagnostic;
use tsc::module_loader::NullModuleLoader;
use tsc::span::Span;

pub fn sp() -> Span {
    Span::default()
}

pub fn ident(name: &str) -> Expression<()> {
    Expression::Identifier(Identifier::new(name, (), sp()))
}

pub fn num(n: f64) -> Expression<()> {
    Expression::NumberLiteral(n, (), sp())
}

pub fn string_lit(s: &str) -> Expression<()> {
    Expression::StringLiteral(s.to_string(), (), sp())
}

pub fn bool_lit(b: bool) -> Expression<()> {
    Expression::BooleanLiteral(b, (), sp())
}

pub fn ty_named(name: &str) -> TypeAnnotation {
    TypeAnnotation::Named(name.to_string(), sp())
}

pub fn ty_string_lit(s: &str) -> TypeAnnotation {
    TypeAnnotation::Literal(LiteralAnnotation::String(s.to_string()), sp())
}

pub fn ty_union(members: Vec<TypeAnnotation>) -> TypeAnnotation {
    TypeAnnotation::Union(members, sp())
}

pub fn ty_object(props: Vec<(&str, TypeAnnotation)>) -> TypeAnnotation {
    TypeAnnotation::ObjectLiteral(
        props
            .into_iter()
            .map(|(name, annotation)| AnnotatedProperty {
                name: name.to_string(),
                annotation,
                optional: false,
                readonly: false,
            })
            .collect(),
        sp(),
    )
}

pub fn param(name: &str, annotation: TypeAnnotation) -> Parameter<()> {
    Parameter {
        name: name.to_string(),
        annotation: Some(annotation),
        default: None,
        optional: false,
        is_rest: false,
        property_modifiers: None,
        span: sp(),
    }
}

pub fn annotated_param(name: &str, annotation: TypeAnnotation) -> AnnotatedParameter {
    AnnotatedParameter {
        name: name.to_string(),
        annotation: Some(annotation),
        optional: false,
        is_rest: false,
    }
}

pub fn let_decl(name: &str, annotation: Option<TypeAnnotation>, init: Expression<()>) -> Statement<()> {
    Statement::VariableDeclaration(VariableDeclaration {
        kind: VariableKind::Let,
        declarations: vec![VariableDeclarator {
            binding: BindingTarget::Identifier(name.to_string()),
            annotation,
            initializer: Some(init),
            span: sp(),
        }],
        span: sp(),
    })
}

pub fn const_decl(name: &str, annotation: Option<TypeAnnotation>, init: Expression<()>) -> Statement<()> {
    Statement::VariableDeclaration(VariableDeclaration {
        kind: VariableKind::Const,
        declarations: vec![VariableDeclarator {
            binding: BindingTarget::Identifier(name.to_string()),
            annotation,
            initializer: Some(init),
            span: sp(),
        }],
        span: sp(),
    })
}

pub fn expr_stmt(e: Expression<()>) -> Statement<()> {
    Statement::Expression(e, sp())
}

pub fn block(stmts: Vec<Statement<()>>) -> Statement<()> {
    Statement::Block(stmts, sp())
}

pub fn if_stmt(test: Expression<()>, consequent: Statement<()>, alternate: Option<Statement<()>>) -> Statement<()> {
    Statement::If(IfStatement {
        test,
        consequent: Box::new(consequent),
        alternate: alternate.map(Box::new),
        span: sp(),
    })
}

pub fn binary(left: Expression<()>, op: BinaryOperator, right: Expression<()>) -> Expression<()> {
    Expression::Binary(BinaryExpression {
        left: Box::new(left),
        operator: op,
        right: Box::new(right),
        info: (),
        span: sp(),
    })
}

pub fn member(object: Expression<()>, property: &str) -> Expression<()> {
    Expression::Member(MemberExpression {
        object: Box::new(object),
        property: property.to_string(),
        optional: false,
        info: (),
        span: sp(),
    })
}

pub fn call(callee: Expression<()>, args: Vec<Expression<()>>) -> Expression<()> {
    Expression::Call(CallExpression {
        callee: Box::new(callee),
        type_arguments: vec![],
        arguments: args,
        optional: false,
        info: (),
        span: sp(),
    })
}

pub fn func_decl(
    name: &str,
    parameters: Vec<Parameter<()>>,
    return_type: Option<TypeAnnotation>,
    body: Option<FunctionBody<()>>,
) -> Statement<()> {
    Statement::FunctionDeclaration(FunctionDeclaration {
        name: name.to_string(),
        type_parameters: vec![],
        parameters,
        return_type,
        body,
        is_generator: false,
        is_async: false,
        span: sp(),
    })
}

pub fn ret(e: Expression<()>) -> Statement<()> {
    Statement::Return(Some(e), sp())
}

/// Run the whole program through `check_program` with default options and
/// no module graph (no test here imports anything external).
pub fn check(program: Program<()>) -> (Program<ExprInfo>, Vec<Diagnostic>) {
    tsc::check_program(program, CheckerOptions::default(), &NullModuleLoader)
}

pub fn program(statements: Vec<Statement<()>>) -> Program<()> {
    Program { statements }
}

/// Pull the computed type off a checked top-level `Statement::Expression`.
pub fn expr_type(stmt: &Statement<ExprInfo>) -> Option<tsc::checker::types::Type> {
    match stmt {
        Statement::Expression(e, _) => e.info().get(),
        _ => None,
    }
}
