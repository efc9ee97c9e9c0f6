use super::Expression;
use crate::span::Span;

/// `obj.prop` / `obj?.prop`. The property name is syntactic; resolving it
/// against `obj`'s static type happens in `checker::typed_ast::expression`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression<T> {
    pub object: Box<Expression<T>>,
    pub property: String,
    pub optional: bool,
    pub info: T,
    pub span: Span,
}

/// `obj[expr]` / `obj?.[expr]`. Unlike `MemberExpression`, the key is itself
/// an expression, so the checker only knows its static narrowing (literal
/// string/number, or a wider `string`/`number`) rather than a fixed name.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression<T> {
    pub object: Box<Expression<T>>,
    pub index: Box<Expression<T>>,
    pub optional: bool,
    pub info: T,
    pub span: Span,
}
