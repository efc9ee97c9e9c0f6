use crate::span::Span;

/// A bound name. `Identifier` is also how the checker looks up the ambient
/// `arguments` object and `this`-positioned generics; there is nothing
/// special about its shape, only about how `checker::environment` resolves
/// it.
#[derive(Debug, Clone, PartialEq)]
pub struct Identifier<T> {
    pub name: String,
    pub info: T,
    pub span: Span,
}

impl<T> Identifier<T> {
    pub fn new(name: impl Into<String>, info: T, span: Span) -> Self {
        Identifier {
            name: name.into(),
            info,
            span,
        }
    }
}
