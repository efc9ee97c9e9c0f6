//! Ternaries, `as`/non-null assertions, and the expression-position nodes
//! that just pass through to a child: `(...)`  and a bare spread used
//! outside an array literal or call argument list.

use crate::ast::expression::{ConditionalExpression, Expression, SpreadElement, TypeAssertionExpression};
use crate::checker::annotation::resolve_annotation;
use crate::checker::assignability::is_assertable;
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::error::{InvalidAssertion, TypeCheckError};
use crate::checker::narrowing;
use crate::checker::types::Type;

pub fn check_conditional_expression(
    conditional: ConditionalExpression<()>,
    ctx: &mut TypeContext,
) -> ConditionalExpression<ExprInfo> {
    let span = conditional.span.clone();
    let test = super::infer_expression(*conditional.test, ctx);
    let guards = narrowing::narrow_condition(&test, ctx);

    let positive_overlay = super::operators::build_overlay(&guards.positive, true, ctx);
    ctx.env.push_narrowings(positive_overlay);
    let consequent = super::infer_expression(*conditional.consequent, ctx);
    ctx.env.pop_narrowings();

    let negative_overlay = super::operators::build_overlay(&guards.negative, false, ctx);
    ctx.env.push_narrowings(negative_overlay);
    let alternate = super::infer_expression(*conditional.alternate, ctx);
    ctx.env.pop_narrowings();

    let consequent_ty = consequent.info().get().unwrap_or(Type::Any);
    let alternate_ty = alternate.info().get().unwrap_or(Type::Any);
    let result_ty = Type::union(vec![consequent_ty, alternate_ty]);

    ConditionalExpression {
        test: Box::new(test),
        consequent: Box::new(consequent),
        alternate: Box::new(alternate),
        info: ExprInfo::new(result_ty),
        span,
    }
}

pub fn check_type_assertion(
    assertion: TypeAssertionExpression<()>,
    ctx: &mut TypeContext,
) -> TypeAssertionExpression<ExprInfo> {
    let span = assertion.span.clone();
    let expression = super::infer_expression(*assertion.expression, ctx);
    let source_ty = expression.info().get().unwrap_or(Type::Any);

    let result_ty = if assertion.is_non_null {
        Type::union(
            source_ty
                .union_members()
                .into_iter()
                .filter(|m| !m.is_nullish())
                .cloned()
                .collect(),
        )
    } else {
        match resolve_annotation(&assertion.target_type, ctx) {
            Ok(target_ty) => {
                if !is_assertable(&source_ty, &target_ty) {
                    let _ = ctx.report(TypeCheckError::InvalidAssertion(
                        InvalidAssertion {
                            from: source_ty.clone(),
                            to: target_ty.clone(),
                        },
                        span.clone(),
                    ));
                }
                target_ty
            }
            Err(err) => {
                let _ = ctx.report(err);
                Type::Any
            }
        }
    };

    TypeAssertionExpression {
        expression: Box::new(expression),
        target_type: assertion.target_type,
        is_non_null: assertion.is_non_null,
        info: ExprInfo::new(result_ty),
        span,
    }
}

pub fn check_spread_element(
    spread: SpreadElement<()>,
    ctx: &mut TypeContext,
) -> SpreadElement<ExprInfo> {
    let span = spread.span.clone();
    let argument = super::infer_expression(*spread.argument, ctx);
    let ty = argument.info().get().unwrap_or(Type::Any);
    SpreadElement {
        argument: Box::new(argument),
        info: ExprInfo::new(ty),
        span,
    }
}

pub fn check_parenthesized(
    inner: Expression<()>,
    ctx: &mut TypeContext,
) -> Expression<ExprInfo> {
    super::infer_expression(inner, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::context::CheckerOptions;
    use crate::span::Span;

    #[test]
    fn ternary_unions_both_branches() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        let conditional = ConditionalExpression {
            test: Box::new(Expression::BooleanLiteral(true, (), Span::default())),
            consequent: Box::new(Expression::NumberLiteral(1.0, (), Span::default())),
            alternate: Box::new(Expression::StringLiteral("x".into(), (), Span::default())),
            info: (),
            span: Span::default(),
        };
        let checked = check_conditional_expression(conditional, &mut ctx);
        assert_eq!(
            checked.info.get(),
            Some(Type::union(vec![Type::NumberLiteral(1.0), Type::StringLiteral("x".into())]))
        );
    }
}
