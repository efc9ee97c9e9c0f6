use super::Expression;
use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Exponent,
    Equal,
    StrictEqual,
    NotEqual,
    StrictNotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    In,
    InstanceOf,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    ShiftLeft,
    ShiftRight,
    UnsignedShiftRight,
}

/// `left OP right`. Precedence is the parser's concern; by the time the
/// checker sees this node the tree is already shaped correctly.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression<T> {
    pub left: Box<Expression<T>>,
    pub operator: BinaryOperator,
    pub right: Box<Expression<T>>,
    pub info: T,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
    NullishCoalesce,
}

/// `left && right`, `left || right`, `left ?? right`. Kept distinct from
/// `BinaryExpression` because narrowing treats these specially: the
/// right-hand operand of `&&`/`||` is checked under the narrowing the
/// left-hand operand implies.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpression<T> {
    pub left: Box<Expression<T>>,
    pub operator: LogicalOperator,
    pub right: Box<Expression<T>>,
    pub info: T,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
    LogicalNot,
    BitwiseNot,
    Typeof,
    Void,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression<T> {
    pub operator: UnaryOperator,
    pub argument: Box<Expression<T>>,
    pub info: T,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOperator {
    Increment,
    Decrement,
}

/// `++x`, `x--`, etc. The argument must be an assignable reference
/// (identifier or member expression); the checker rejects anything else.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateExpression<T> {
    pub operator: UpdateOperator,
    pub argument: Box<Expression<T>>,
    pub prefix: bool,
    pub info: T,
    pub span: Span,
}
