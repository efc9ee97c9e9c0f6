use super::Expression;
use crate::ast::type_annotation::TypeAnnotation;
use crate::span::Span;

/// `expr as T` (and the legacy `<T>expr` prefix form, which the parser
/// normalizes to the same node). The checker only permits `as` between
/// types that overlap in at least one direction; see
/// `checker::assignability::is_assertable`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAssertionExpression<T> {
    pub expression: Box<Expression<T>>,
    pub target_type: TypeAnnotation,
    /// `expr!`, the non-null assertion, reuses this node with
    /// `target_type` left at the narrowed-non-nullish type of `expression`
    /// and `is_non_null` set instead of a written annotation.
    pub is_non_null: bool,
    pub info: T,
    pub span: Span,
}
