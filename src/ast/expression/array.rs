use super::Expression;
use crate::span::Span;

/// `[a, b, ...c]`. Elements may themselves be `Expression::Spread`, which the
/// checker unpacks into the tuple/array element type.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral<T> {
    pub elements: Vec<Expression<T>>,
    pub info: T,
    pub span: Span,
}
