//! The semantic type representation used throughout inference and
//! assignability checking.
//!
//! Variants intentionally mirror the surface grammar `ast::type_annotation`
//! describes, plus the handful of types that only ever appear as *computed*
//! types (literal types narrowed down from a wider declared type, `never` as
//! the empty union, `unknown`/`any` as the two universal types).

use std::fmt::{self, Debug, Display};

/// Canonical semantic type. Two `Type`s are the same type iff
/// [`Type::is_identical`] says so; plain `==` (derived `PartialEq`) is
/// stricter structural equality used only for narrowing-map bookkeeping,
/// not for assignability.
#[derive(Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Type {
    /// Escape hatch: assignable to and from everything, narrowing disabled.
    Any,
    /// Top type: everything is assignable *to* `unknown`, nothing is
    /// assignable *from* it without a narrowing or assertion.
    Unknown,
    /// Bottom type: the empty union, assignable to everything, inhabited by
    /// nothing. Produced by narrowing away every member of a union, and by
    /// functions that always throw or loop.
    Never,
    Void,
    Null,
    Undefined,
    Number,
    String,
    Boolean,
    NumberLiteral(f64),
    StringLiteral(String),
    BooleanLiteral(bool),
    Array(Box<Type>),
    Tuple(Vec<TupleElement>),
    Object(ObjectType),
    Function(FunctionType),
    /// Normalized: flattened one level, deduplicated, at least two members.
    /// A union that normalizes to zero or one member collapses to `Never`
    /// or that member instead of ever being constructed.
    Union(Vec<Type>),
    /// Normalized the same way as `Union`.
    Intersection(Vec<Type>),
    /// An unresolved reference to a generic's own type parameter, valid
    /// only inside that generic's body/signature.
    TypeParameter(String),
}

#[derive(Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TupleElement {
    pub ty: Type,
    pub optional: bool,
    pub is_rest: bool,
}

#[derive(Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ObjectKind {
    /// An object literal type / type-literal annotation, e.g. `{ a: 1 }`.
    Anonymous,
    /// A named `interface`. Interfaces are always compared structurally,
    /// the name is carried only for display and declaration merging.
    Interface(String),
    /// A named `class`. Classes with any `private`/`protected` member
    /// compare nominally against other `Class` types of the same name;
    /// see `checker::assignability`.
    Class(String),
}

#[derive(Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ObjectType {
    pub kind: ObjectKind,
    pub type_arguments: Vec<Type>,
    pub properties: Vec<PropertyType>,
    pub call_signatures: Vec<FunctionType>,
    pub construct_signatures: Vec<FunctionType>,
    pub index_signature: Option<Box<IndexSignature>>,
}

impl ObjectType {
    pub fn empty(kind: ObjectKind) -> Self {
        ObjectType {
            kind,
            type_arguments: Vec::new(),
            properties: Vec::new(),
            call_signatures: Vec::new(),
            construct_signatures: Vec::new(),
            index_signature: None,
        }
    }

    pub fn find_property(&self, name: &str) -> Option<&PropertyType> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn name(&self) -> Option<&str> {
        match &self.kind {
            ObjectKind::Anonymous => None,
            ObjectKind::Interface(n) | ObjectKind::Class(n) => Some(n.as_str()),
        }
    }

    pub fn has_nominal_members(&self) -> bool {
        self.properties
            .iter()
            .any(|p| !matches!(p.visibility, PropertyVisibility::Public))
    }
}

#[derive(Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PropertyType {
    pub name: String,
    pub ty: Type,
    pub optional: bool,
    pub readonly: bool,
    pub visibility: PropertyVisibility,
    pub is_static: bool,
    /// Name of the class whose own declaration introduced this member, for
    /// `private`/`protected` members; `None` for
    /// `public` members and for properties that don't originate from a
    /// class body (object literals, interfaces, module exports).
    pub declaring_class: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PropertyVisibility {
    Public,
    Protected,
    Private,
}

#[derive(Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IndexSignature {
    pub key_type: IndexKeyType,
    pub value_type: Type,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum IndexKeyType {
    String,
    Number,
}

#[derive(Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FunctionType {
    pub type_parameters: Vec<TypeParameterDecl>,
    pub parameters: Vec<ParameterType>,
    pub return_type: Box<Type>,
    /// The `this` type a method/standalone function was declared with, if
    /// it has an explicit `this` parameter (TS's `function f(this: T, ...)`)
    /// or is a class method (`this` bound to the declaring class).
    pub this_type: Option<Box<Type>>,
    /// Set for functions declared with a `x is T` return annotation; the
    /// narrowing engine consults this when the function is called as a
    /// guard in condition position.
    pub type_predicate: Option<TypePredicate>,
}

#[derive(Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypePredicate {
    pub parameter_index: usize,
    pub narrowed_type: Type,
}

#[derive(Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TypeParameterDecl {
    pub name: String,
    pub constraint: Option<Type>,
    pub default: Option<Type>,
}

#[derive(Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParameterType {
    pub name: String,
    pub ty: Type,
    pub optional: bool,
    pub is_rest: bool,
}

impl Type {
    pub fn is_nullish(&self) -> bool {
        matches!(self, Type::Null | Type::Undefined)
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Type::Number
                | Type::String
                | Type::Boolean
                | Type::NumberLiteral(_)
                | Type::StringLiteral(_)
                | Type::BooleanLiteral(_)
                | Type::Null
                | Type::Undefined
                | Type::Void
        )
    }

    /// The non-literal primitive a literal type widens to when no narrower
    /// context is available (declaring `let x = "a"` widens `"a"` to
    /// `string`; `const x = "a"` keeps the literal). Returns `self` for
    /// every other type.
    pub fn widen(&self) -> Type {
        match self {
            Type::NumberLiteral(_) => Type::Number,
            Type::StringLiteral(_) => Type::String,
            Type::BooleanLiteral(_) => Type::Boolean,
            other => other.clone(),
        }
    }

    /// Build a normalized union: flatten nested unions, drop duplicate and
    /// `never` members, collapse to the single member (or `never`) when
    /// fewer than two remain, and absorb into `any`/`unknown` when present.
    pub fn union(members: Vec<Type>) -> Type {
        let mut flat = Vec::new();
        for m in members {
            match m {
                Type::Union(inner) => flat.extend(inner),
                Type::Never => {}
                other => flat.push(other),
            }
        }
        if flat.iter().any(|t| matches!(t, Type::Any)) {
            return Type::Any;
        }
        let mut deduped: Vec<Type> = Vec::new();
        for t in flat {
            if !deduped.iter().any(|existing| existing.is_identical(&t)) {
                deduped.push(t);
            }
        }
        match deduped.len() {
            0 => Type::Never,
            1 => deduped.into_iter().next().unwrap(),
            _ => Type::Union(deduped),
        }
    }

    pub fn intersection(members: Vec<Type>) -> Type {
        let mut flat = Vec::new();
        for m in members {
            match m {
                Type::Intersection(inner) => flat.extend(inner),
                other => flat.push(other),
            }
        }
        if flat.iter().any(|t| matches!(t, Type::Never)) {
            return Type::Never;
        }
        let mut deduped: Vec<Type> = Vec::new();
        for t in flat {
            if !deduped.iter().any(|existing| existing.is_identical(&t)) {
                deduped.push(t);
            }
        }
        match deduped.len() {
            0 => Type::Unknown,
            1 => deduped.into_iter().next().unwrap(),
            _ => Type::Intersection(deduped),
        }
    }

    pub fn union_members(&self) -> Vec<&Type> {
        match self {
            Type::Union(members) => members.iter().collect(),
            other => vec![other],
        }
    }

    /// Structural identity used for union/intersection deduplication and
    /// narrowing-map lookups. Distinct from assignability: two identical
    /// types are always mutually assignable, but mutual assignability
    /// doesn't imply identity (e.g. an interface and an equivalent object
    /// literal type are mutually assignable but not identical here, because
    /// their `ObjectKind` differs).
    pub fn is_identical(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Any, Type::Any)
            | (Type::Unknown, Type::Unknown)
            | (Type::Never, Type::Never)
            | (Type::Void, Type::Void)
            | (Type::Null, Type::Null)
            | (Type::Undefined, Type::Undefined)
            | (Type::Number, Type::Number)
            | (Type::String, Type::String)
            | (Type::Boolean, Type::Boolean) => true,
            (Type::NumberLiteral(a), Type::NumberLiteral(b)) => a == b,
            (Type::StringLiteral(a), Type::StringLiteral(b)) => a == b,
            (Type::BooleanLiteral(a), Type::BooleanLiteral(b)) => a == b,
            (Type::Array(a), Type::Array(b)) => a.is_identical(b),
            (Type::Tuple(a), Type::Tuple(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|(l, r)| {
                        l.optional == r.optional && l.is_rest == r.is_rest && l.ty.is_identical(&r.ty)
                    })
            }
            (Type::TypeParameter(a), Type::TypeParameter(b)) => a == b,
            (Type::Object(a), Type::Object(b)) => {
                a.name() == b.name()
                    && a.properties.len() == b.properties.len()
                    && a.properties.iter().all(|lp| {
                        b.find_property(&lp.name)
                            .is_some_and(|rp| lp.optional == rp.optional && lp.ty.is_identical(&rp.ty))
                    })
            }
            (Type::Function(a), Type::Function(b)) => {
                a.parameters.len() == b.parameters.len()
                    && a.parameters
                        .iter()
                        .zip(&b.parameters)
                        .all(|(l, r)| l.ty.is_identical(&r.ty) && l.optional == r.optional)
                    && a.return_type.is_identical(&b.return_type)
            }
            (Type::Union(a), Type::Union(b)) | (Type::Intersection(a), Type::Intersection(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .all(|l| b.iter().any(|r| l.is_identical(r)))
            }
            _ => false,
        }
    }
}

impl Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Any => write!(f, "any"),
            Type::Unknown => write!(f, "unknown"),
            Type::Never => write!(f, "never"),
            Type::Void => write!(f, "void"),
            Type::Null => write!(f, "null"),
            Type::Undefined => write!(f, "undefined"),
            Type::Number => write!(f, "number"),
            Type::String => write!(f, "string"),
            Type::Boolean => write!(f, "boolean"),
            Type::NumberLiteral(n) => write!(f, "{n}"),
            Type::StringLiteral(s) => write!(f, "\"{s}\""),
            Type::BooleanLiteral(b) => write!(f, "{b}"),
            Type::Array(el) => write!(f, "{el}[]"),
            Type::Tuple(elements) => {
                write!(f, "[")?;
                for (i, el) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", el.ty)?;
                    if el.is_rest {
                        write!(f, "...")?;
                    } else if el.optional {
                        write!(f, "?")?;
                    }
                }
                write!(f, "]")
            }
            Type::Object(obj) => match obj.name() {
                Some(name) => write!(f, "{name}"),
                None => {
                    write!(f, "{{ ")?;
                    for (i, p) in obj.properties.iter().enumerate() {
                        if i > 0 {
                            write!(f, "; ")?;
                        }
                        write!(f, "{}{}: {}", p.name, if p.optional { "?" } else { "" }, p.ty)?;
                    }
                    write!(f, " }}")
                }
            },
            Type::Function(func) => {
                write!(f, "(")?;
                for (i, p) in func.parameters.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}{}: {}", p.name, if p.optional { "?" } else { "" }, p.ty)?;
                }
                write!(f, ") => {}", func.return_type)
            }
            Type::Union(members) => {
                let rendered: Vec<String> = members.iter().map(|t| t.to_string()).collect();
                write!(f, "{}", rendered.join(" | "))
            }
            Type::Intersection(members) => {
                let rendered: Vec<String> = members.iter().map(|t| t.to_string()).collect();
                write!(f, "{}", rendered.join(" & "))
            }
            Type::TypeParameter(name) => write!(f, "{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_flattens_and_dedupes() {
        let t = Type::union(vec![
            Type::Union(vec![Type::Number, Type::String]),
            Type::String,
            Type::Never,
        ]);
        assert_eq!(t, Type::Union(vec![Type::Number, Type::String]));
    }

    #[test]
    fn union_of_one_collapses() {
        let t = Type::union(vec![Type::Number, Type::Never]);
        assert_eq!(t, Type::Number);
    }

    #[test]
    fn union_absorbs_any() {
        let t = Type::union(vec![Type::Number, Type::Any]);
        assert_eq!(t, Type::Any);
    }

    #[test]
    fn widen_literal_types() {
        assert_eq!(Type::StringLiteral("a".into()).widen(), Type::String);
        assert_eq!(Type::NumberLiteral(1.0).widen(), Type::Number);
        assert_eq!(Type::Boolean.widen(), Type::Boolean);
    }

    #[test]
    fn display_renders_readable_signatures() {
        let func = Type::Function(FunctionType {
            type_parameters: vec![],
            parameters: vec![ParameterType {
                name: "x".into(),
                ty: Type::Number,
                optional: false,
                is_rest: false,
            }],
            return_type: Box::new(Type::String),
            this_type: None,
            type_predicate: None,
        });
        assert_eq!(func.to_string(), "(x: number) => string");
    }
}
