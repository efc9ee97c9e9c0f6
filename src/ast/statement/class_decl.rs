use super::declaration::TypeParameter;
use crate::ast::expression::{Expression, FunctionBody, Parameter};
use crate::ast::type_annotation::TypeAnnotation;
use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
    Protected,
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility::Public
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemberModifiers {
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_readonly: bool,
    pub is_abstract: bool,
    pub is_override: bool,
}

/// `class Name<T> extends Base<A> implements I, J { ... }`. Checked in two
/// passes: a shallow pass that records every member's
/// declared type before any method body is checked (so methods can call
/// each other and reference properties declared later in the class body),
/// then a full pass that checks bodies, constructor-initialization order
/// and `extends`/`implements` compatibility.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDeclaration<T> {
    pub name: String,
    pub type_parameters: Vec<TypeParameter>,
    pub extends: Option<TypeAnnotation>,
    pub implements: Vec<TypeAnnotation>,
    pub is_abstract: bool,
    pub members: Vec<ClassMember<T>>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember<T> {
    Property {
        name: String,
        annotation: Option<TypeAnnotation>,
        initializer: Option<Expression<T>>,
        optional: bool,
        modifiers: MemberModifiers,
        span: Span,
    },
    Method {
        name: String,
        type_parameters: Vec<TypeParameter>,
        parameters: Vec<Parameter<T>>,
        return_type: Option<TypeAnnotation>,
        body: Option<FunctionBody<T>>,
        modifiers: MemberModifiers,
        span: Span,
    },
    Constructor {
        parameters: Vec<Parameter<T>>,
        body: Option<FunctionBody<T>>,
        modifiers: MemberModifiers,
        span: Span,
    },
    Getter {
        name: String,
        return_type: Option<TypeAnnotation>,
        body: FunctionBody<T>,
        modifiers: MemberModifiers,
        span: Span,
    },
    Setter {
        name: String,
        parameter: Parameter<T>,
        body: FunctionBody<T>,
        modifiers: MemberModifiers,
        span: Span,
    },
    Index {
        key_name: String,
        key_type: TypeAnnotation,
        value_type: TypeAnnotation,
        span: Span,
    },
}
