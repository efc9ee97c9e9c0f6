//! Syntax for type annotations, as the parser would hand them to us.
//!
//! This mirrors a plain `TypeName` shape, widened from a handful of bare
//! variants to the richer annotation grammar this dialect's type system
//! needs (unions, intersections, literal types, generics).
//! `TypeAnnotation` is pure syntax; `checker::annotation` turns it into a
//! `checker::types::Type`.

use crate::span::Span;

#[derive(Debug, Clone, PartialEq)]
pub enum TypeAnnotation {
    /// A bare name: a primitive keyword (`string`, `number`, ...), a type
    /// alias, an interface/class name, or a type parameter.
    Named(String, Span),
    /// `Name<Arg, Arg, ...>`
    Generic(String, Vec<TypeAnnotation>, Span),
    /// `"literal"` / `42` / `true` / `null` / `undefined`
    Literal(LiteralAnnotation, Span),
    /// `T[]`
    Array(Box<TypeAnnotation>, Span),
    /// `[A, B, C]`
    Tuple(Vec<TypeAnnotation>, Span),
    /// `A | B | C`
    Union(Vec<TypeAnnotation>, Span),
    /// `A & B & C`
    Intersection(Vec<TypeAnnotation>, Span),
    /// `(a: A, b?: B, ...c: C[]) => R`
    Function {
        parameters: Vec<AnnotatedParameter>,
        return_type: Box<TypeAnnotation>,
        span: Span,
    },
    /// `x is T`, the return annotation of a user-defined type guard.
    TypePredicate {
        parameter_name: String,
        narrowed_type: Box<TypeAnnotation>,
        span: Span,
    },
    /// `{ a: string, b?: number, readonly c: boolean }`: an inline object
    /// type literal, most commonly seen as a union member of a type alias
    /// (a discriminated union) or as a parameter/property annotation that
    /// doesn't warrant a named `interface`.
    ObjectLiteral(Vec<AnnotatedProperty>, Span),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedProperty {
    pub name: String,
    pub annotation: TypeAnnotation,
    pub optional: bool,
    pub readonly: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedParameter {
    pub name: String,
    pub annotation: Option<TypeAnnotation>,
    pub optional: bool,
    pub is_rest: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralAnnotation {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
}

impl TypeAnnotation {
    pub fn span(&self) -> Span {
        match self {
            TypeAnnotation::Named(_, s)
            | TypeAnnotation::Generic(_, _, s)
            | TypeAnnotation::Literal(_, s)
            | TypeAnnotation::Array(_, s)
            | TypeAnnotation::Tuple(_, s)
            | TypeAnnotation::Union(_, s)
            | TypeAnnotation::Intersection(_, s)
            | TypeAnnotation::ObjectLiteral(_, s) => s.clone(),
            TypeAnnotation::Function { span, .. } => span.clone(),
            TypeAnnotation::TypePredicate { span, .. } => span.clone(),
        }
    }
}
