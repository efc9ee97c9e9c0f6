use super::declaration::TypeParameter;
use crate::ast::expression::{FunctionBody, Parameter};
use crate::span::Span;

/// `function name<T>(params): Ret { ... }` as a top-level/block statement.
/// Overloads are represented as multiple consecutive `FunctionDeclaration`s
/// sharing a name, the last carrying the implementation body and the rest
/// `body: None`; see `checker::function` for how these are merged into one
/// overload set.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDeclaration<T> {
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Parameter<T>>,
    pub return_type: Option<crate::ast::type_annotation::TypeAnnotation>,
    pub body: Option<FunctionBody<T>>,
    pub is_generator: bool,
    pub is_async: bool,
    pub span: Span,
}
