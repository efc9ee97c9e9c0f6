use super::Expression;
use crate::span::Span;

/// `{ a, b: 1, [c]: 2, ...rest }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLiteral<T> {
    pub properties: Vec<ObjectProperty<T>>,
    pub info: T,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ObjectProperty<T> {
    /// `key: value` or the `key` shorthand for `key: key`.
    KeyValue {
        key: PropertyKey,
        value: Expression<T>,
        span: Span,
    },
    /// `[expr]: value`. The key's static type must be `string | number` for
    /// the property to contribute a known member; anything wider makes the
    /// whole object an index-signature type instead of a shape with named
    /// members.
    Computed {
        key: Expression<T>,
        value: Expression<T>,
        span: Span,
    },
    /// `...expr`, spreading another object's own enumerable properties in.
    Spread { argument: Expression<T>, span: Span },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    Identifier(String),
    StringLiteral(String),
    NumberLiteral(f64),
}
