//! Leaf expressions: identifiers, `this`/`super`, primitive literals, and
//! template literals. Everything here either looks a name up in the
//! environment or hands back a fixed literal type; none of it recurses
//! into contextual typing.

use crate::ast::expression::{Expression, Identifier, TemplateLiteral};
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::environment::undefined_variable;
use crate::checker::types::Type;

pub fn check_identifier(id: Identifier<()>, ctx: &mut TypeContext) -> Identifier<ExprInfo> {
    let ty = match ctx.env.resolve(&id.name) {
        Some(ty) => ty,
        None => {
            let _ = ctx.report(undefined_variable(&id.name, &id.span));
            Type::Any
        }
    };
    Identifier {
        name: id.name,
        info: ExprInfo::new(ty),
        span: id.span,
    }
}

pub fn check_this(ctx: &mut TypeContext) -> Type {
    ctx.env.resolve("this").unwrap_or(Type::Any)
}

pub fn check_super(ctx: &mut TypeContext) -> Type {
    ctx.env.resolve("super").unwrap_or(Type::Any)
}

pub fn check_template_literal(
    template: TemplateLiteral<()>,
    ctx: &mut TypeContext,
) -> TemplateLiteral<ExprInfo> {
    let mut parts = Vec::with_capacity(template.parts.len());
    for part in template.parts {
        parts.push(super::infer_expression(part, ctx));
    }
    TemplateLiteral {
        quasis: template.quasis,
        parts,
        info: ExprInfo::new(Type::String),
        span: template.span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::context::CheckerOptions;
    use crate::span::Span;

    #[test]
    fn unbound_identifier_reports_and_falls_back_to_any() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        let id = Identifier::new("missing", (), Span::default());
        let checked = check_identifier(id, &mut ctx);
        assert_eq!(checked.info.get(), Some(Type::Any));
        assert_eq!(ctx.diagnostics().len(), 1);
    }

    #[test]
    fn bound_identifier_resolves_declared_type() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        ctx.env.declare_binding("x", Type::Number, false).unwrap();
        let id = Identifier::new("x", (), Span::default());
        let checked = check_identifier(id, &mut ctx);
        assert_eq!(checked.info.get(), Some(Type::Number));
    }

    #[test]
    fn template_literal_is_always_string() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        let template = TemplateLiteral {
            quasis: vec!["a".into(), "b".into()],
            parts: vec![Expression::NumberLiteral(1.0, (), Span::default())],
            info: (),
            span: Span::default(),
        };
        let checked = check_template_literal(template, &mut ctx);
        assert_eq!(checked.info.get(), Some(Type::String));
    }
}
