//! Diagnostics. Every failure the checker can report is a `TypeCheckError`
//! carrying a `Span`; `Diagnostic` is the serializable, display-ready form
//! handed back to a caller once checking finishes.

use std::error::Error;
use std::fmt::{self, Display};

use crate::checker::types::Type;
use crate::span::Span;

#[derive(Clone, Debug, PartialEq)]
pub enum TypeCheckError {
    TypeMismatch(TypeMismatch, Span),
    UndefinedVariable(UndefinedVariable, Span),
    UndefinedType(UndefinedType, Span),
    UndefinedProperty(UndefinedProperty, Span),
    NotCallable(NotCallable, Span),
    NotIndexable(NotIndexable, Span),
    WrongArgumentCount(WrongArgumentCount, Span),
    NoMatchingOverload(NoMatchingOverload, Span),
    ImmutableReassign(ImmutableReassign, Span),
    RedeclaredBinding(RedeclaredBinding, Span),
    InvalidAssertion(InvalidAssertion, Span),
    PossiblyNullish(PossiblyNullish, Span),
    AbstractInstantiation(AbstractInstantiation, Span),
    MissingOverrideBody(MissingOverrideBody, Span),
    CyclicTypeDefinition(CyclicTypeDefinition, Span),
    UnreachableCode(UnreachableCode, Span),
    RecursionLimitExceeded(RecursionLimitExceeded, Span),
    ModuleNotFound(ModuleNotFound, Span),
    UndefinedExport(UndefinedExport, Span),
    PrivateMemberAccess(PrivateMemberAccess, Span),
    ProtectedMemberAccess(ProtectedMemberAccess, Span),
    InvalidOperator(InvalidOperator, Span),
}

impl TypeCheckError {
    pub fn span(&self) -> Span {
        match self {
            TypeCheckError::TypeMismatch(_, s)
            | TypeCheckError::UndefinedVariable(_, s)
            | TypeCheckError::UndefinedType(_, s)
            | TypeCheckError::UndefinedProperty(_, s)
            | TypeCheckError::NotCallable(_, s)
            | TypeCheckError::NotIndexable(_, s)
            | TypeCheckError::WrongArgumentCount(_, s)
            | TypeCheckError::NoMatchingOverload(_, s)
            | TypeCheckError::ImmutableReassign(_, s)
            | TypeCheckError::RedeclaredBinding(_, s)
            | TypeCheckError::InvalidAssertion(_, s)
            | TypeCheckError::PossiblyNullish(_, s)
            | TypeCheckError::AbstractInstantiation(_, s)
            | TypeCheckError::MissingOverrideBody(_, s)
            | TypeCheckError::CyclicTypeDefinition(_, s)
            | TypeCheckError::UnreachableCode(_, s)
            | TypeCheckError::RecursionLimitExceeded(_, s)
            | TypeCheckError::ModuleNotFound(_, s)
            | TypeCheckError::UndefinedExport(_, s)
            | TypeCheckError::PrivateMemberAccess(_, s)
            | TypeCheckError::ProtectedMemberAccess(_, s)
            | TypeCheckError::InvalidOperator(_, s) => s.clone(),
        }
    }

    /// The TS-style opaque code callers can filter/suppress on, reused
    /// verbatim from the dialect's diagnostic catalogue for readability.
    pub fn code(&self) -> &'static str {
        match self {
            TypeCheckError::TypeMismatch(..) => "TS2322",
            TypeCheckError::UndefinedVariable(..) => "TS2304",
            TypeCheckError::UndefinedType(..) => "TS2304",
            TypeCheckError::UndefinedProperty(..) => "TS2339",
            TypeCheckError::NotCallable(..) => "TS2349",
            TypeCheckError::NotIndexable(..) => "TS7053",
            TypeCheckError::WrongArgumentCount(..) => "TS2554",
            TypeCheckError::NoMatchingOverload(..) => "TS2769",
            TypeCheckError::ImmutableReassign(..) => "TS2588",
            TypeCheckError::RedeclaredBinding(..) => "TS2451",
            TypeCheckError::InvalidAssertion(..) => "TS2352",
            TypeCheckError::PossiblyNullish(..) => "TS2532",
            TypeCheckError::AbstractInstantiation(..) => "TS2511",
            TypeCheckError::MissingOverrideBody(..) => "TS2391",
            TypeCheckError::CyclicTypeDefinition(..) => "TS2456",
            TypeCheckError::UnreachableCode(..) => "TS7027",
            TypeCheckError::RecursionLimitExceeded(..) => "TS2589",
            TypeCheckError::ModuleNotFound(..) => "TS2307",
            TypeCheckError::UndefinedExport(..) => "TS2305",
            TypeCheckError::PrivateMemberAccess(..) => "TS2341",
            TypeCheckError::ProtectedMemberAccess(..) => "TS2445",
            TypeCheckError::InvalidOperator(..) => "TS2365",
        }
    }

    fn message(&self) -> Box<dyn Error> {
        match self {
            TypeCheckError::TypeMismatch(e, _) => Box::new(e.clone()),
            TypeCheckError::UndefinedVariable(e, _) => Box::new(e.clone()),
            TypeCheckError::UndefinedType(e, _) => Box::new(e.clone()),
            TypeCheckError::UndefinedProperty(e, _) => Box::new(e.clone()),
            TypeCheckError::NotCallable(e, _) => Box::new(e.clone()),
            TypeCheckError::NotIndexable(e, _) => Box::new(e.clone()),
            TypeCheckError::WrongArgumentCount(e, _) => Box::new(e.clone()),
            TypeCheckError::NoMatchingOverload(e, _) => Box::new(e.clone()),
            TypeCheckError::ImmutableReassign(e, _) => Box::new(e.clone()),
            TypeCheckError::RedeclaredBinding(e, _) => Box::new(e.clone()),
            TypeCheckError::InvalidAssertion(e, _) => Box::new(e.clone()),
            TypeCheckError::PossiblyNullish(e, _) => Box::new(e.clone()),
            TypeCheckError::AbstractInstantiation(e, _) => Box::new(e.clone()),
            TypeCheckError::MissingOverrideBody(e, _) => Box::new(e.clone()),
            TypeCheckError::CyclicTypeDefinition(e, _) => Box::new(e.clone()),
            TypeCheckError::UnreachableCode(e, _) => Box::new(e.clone()),
            TypeCheckError::RecursionLimitExceeded(e, _) => Box::new(e.clone()),
            TypeCheckError::ModuleNotFound(e, _) => Box::new(e.clone()),
            TypeCheckError::UndefinedExport(e, _) => Box::new(e.clone()),
            TypeCheckError::PrivateMemberAccess(e, _) => Box::new(e.clone()),
            TypeCheckError::ProtectedMemberAccess(e, _) => Box::new(e.clone()),
            TypeCheckError::InvalidOperator(e, _) => Box::new(e.clone()),
        }
    }
}

impl Display for TypeCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.span().to_string(self.message()).as_str())
    }
}

impl Error for TypeCheckError {}

/// Turn a single error into the serializable `Diagnostic` shape; checking
/// never stops at the first error (see `checker::context::CheckerOptions`),
/// so callers collect a `Vec<Diagnostic>` rather than getting a `Result`.
impl From<&TypeCheckError> for Diagnostic {
    fn from(err: &TypeCheckError) -> Self {
        Diagnostic {
            position: err.span().start,
            message: err.message().to_string(),
            error_code: err.code(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Diagnostic {
    pub position: crate::span::Position,
    pub message: String,
    pub error_code: &'static str,
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.position, self.error_code, self.message)
    }
}

macro_rules! error_struct {
    ($name:ident { $($field:ident : $ty:ty),* $(,)? }, $fmt:expr) => {
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name {
            $(pub $field: $ty),*
        }

        impl Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                #[allow(unused)]
                let $name { $($field),* } = self;
                write!(f, $fmt)
            }
        }

        impl Error for $name {}
    };
}

error_struct!(
    TypeMismatch { expected: Type, actual: Type },
    "type '{actual}' is not assignable to type '{expected}'"
);

error_struct!(
    UndefinedVariable { name: String },
    "cannot find name '{name}'"
);

error_struct!(
    UndefinedType { name: String },
    "cannot find type '{name}'"
);

error_struct!(
    UndefinedProperty { property: String, on: Type },
    "property '{property}' does not exist on type '{on}'"
);

error_struct!(
    NotCallable { ty: Type },
    "type '{ty}' is not callable"
);

error_struct!(
    NotIndexable { ty: Type },
    "type '{ty}' has no index signature"
);

error_struct!(
    WrongArgumentCount { expected: String, actual: usize },
    "expected {expected} arguments, but got {actual}"
);

error_struct!(
    NoMatchingOverload { callee: String },
    "no overload of '{callee}' matches this call"
);

error_struct!(
    ImmutableReassign { name: String },
    "cannot assign to '{name}' because it is a constant"
);

error_struct!(
    RedeclaredBinding { name: String },
    "cannot redeclare block-scoped variable '{name}'"
);

error_struct!(
    InvalidAssertion { from: Type, to: Type },
    "conversion of type '{from}' to type '{to}' may be a mistake because neither type sufficiently overlaps with the other"
);

error_struct!(
    PossiblyNullish { ty: Type },
    "object is possibly '{ty}'"
);

error_struct!(
    AbstractInstantiation { name: String },
    "cannot create an instance of an abstract class '{name}'"
);

error_struct!(
    MissingOverrideBody { name: String },
    "method '{name}' must have a body"
);

error_struct!(
    CyclicTypeDefinition { name: String },
    "type alias '{name}' circularly references itself"
);

error_struct!(
    UnreachableCode {},
    "unreachable code detected"
);

error_struct!(
    RecursionLimitExceeded { limit: usize },
    "type instantiation is excessively deep and possibly infinite (limit {limit})"
);

error_struct!(
    ModuleNotFound { module: String },
    "cannot find module '{module}'"
);

error_struct!(
    UndefinedExport { name: String, module: String },
    "module '{module}' has no exported member '{name}'"
);

error_struct!(
    PrivateMemberAccess { property: String, class: String },
    "property '{property}' is private and only accessible within class '{class}'"
);

error_struct!(
    ProtectedMemberAccess { property: String, class: String },
    "property '{property}' is protected and only accessible within class '{class}' and its subclasses"
);

error_struct!(
    InvalidOperator { operator: String, left: Type, right: Type },
    "operator '{operator}' cannot be applied to types '{left}' and '{right}'"
);
