use super::Expression;
use crate::ast::statement::{MemberModifiers, Statement};
use crate::ast::type_annotation::TypeAnnotation;
use crate::span::Span;

/// A single formal parameter, shared by function declarations, function
/// expressions, arrow functions and methods.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter<T> {
    pub name: String,
    pub annotation: Option<TypeAnnotation>,
    pub default: Option<Expression<T>>,
    pub optional: bool,
    pub is_rest: bool,
    /// `Some` only on a constructor parameter written with an access
    /// modifier (`constructor(private x: number)`), TS's parameter-property
    /// shorthand: the checker synthesizes an instance field from it
    /// with no matching `ClassMember::Property`.
    pub property_modifiers: Option<MemberModifiers>,
    pub span: Span,
}

/// Either a `{ ... }` block or, for arrows, a single implicitly-returned
/// expression (`x => x + 1`).
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody<T> {
    Block(Vec<Statement<T>>),
    Expression(Box<Expression<T>>),
}

/// `function name?(params): Ret { ... }` used as an expression (including
/// anonymous function expressions).
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpression<T> {
    pub name: Option<String>,
    pub type_parameters: Vec<String>,
    pub parameters: Vec<Parameter<T>>,
    pub return_type: Option<TypeAnnotation>,
    pub body: FunctionBody<T>,
    pub is_generator: bool,
    pub is_async: bool,
    pub info: T,
    pub span: Span,
}

/// `(params): Ret => body`. Arrows never rebind `this`/`super`/`arguments`;
/// the checker resolves those against the lexically enclosing function, per
/// rather than the call site.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrowFunction<T> {
    pub type_parameters: Vec<String>,
    pub parameters: Vec<Parameter<T>>,
    pub return_type: Option<TypeAnnotation>,
    pub body: FunctionBody<T>,
    pub is_async: bool,
    pub info: T,
    pub span: Span,
}
