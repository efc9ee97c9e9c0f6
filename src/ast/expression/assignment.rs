use super::Expression;
use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentOperator {
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModuloAssign,
    ExponentAssign,
    AndAssign,
    OrAssign,
    NullishAssign,
    BitwiseAndAssign,
    BitwiseOrAssign,
    BitwiseXorAssign,
}

/// `target OP= value`. `target` must be an identifier, member expression or
/// index expression; destructuring-assignment targets are represented as an
/// `ObjectLiteral`/`ArrayLiteral` on the left, matched structurally by the
/// checker rather than given a dedicated pattern node.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentExpression<T> {
    pub target: Box<Expression<T>>,
    pub operator: AssignmentOperator,
    pub value: Box<Expression<T>>,
    pub info: T,
    pub span: Span,
}
