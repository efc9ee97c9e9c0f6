//! Dispatch over every `Expression<()>` variant. Each leaf
//! module owns one family of node; this file just routes to them and owns
//! the two entry points every other module calls back into:
//! `infer_expression` (bottom-up, no expected type) and
//! `check_expression_contextual` (propagates an expected type into array/
//! object literals and parentheses, following the "contextual typing"
//! rule — everything else infers regardless of context).

pub mod array;
pub mod assignment;
pub mod call;
pub mod conditional;
pub mod destructure;
pub mod function_like;
pub mod literal;
pub mod member;
pub mod object;
pub mod operators;

use crate::ast::expression::Expression;
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::types::Type;

pub fn infer_expression(expr: Expression<()>, ctx: &mut TypeContext) -> Expression<ExprInfo> {
    match expr {
        Expression::Identifier(id) => Expression::Identifier(literal::check_identifier(id, ctx)),
        Expression::This(_, span) => {
            let ty = literal::check_this(ctx);
            Expression::This(ExprInfo::new(ty), span)
        }
        Expression::Super(_, span) => {
            let ty = literal::check_super(ctx);
            Expression::Super(ExprInfo::new(ty), span)
        }
        Expression::NumberLiteral(n, _, span) => {
            Expression::NumberLiteral(n, ExprInfo::new(Type::NumberLiteral(n)), span)
        }
        Expression::StringLiteral(s, _, span) => {
            let ty = Type::StringLiteral(s.clone());
            Expression::StringLiteral(s, ExprInfo::new(ty), span)
        }
        Expression::BooleanLiteral(b, _, span) => {
            Expression::BooleanLiteral(b, ExprInfo::new(Type::BooleanLiteral(b)), span)
        }
        Expression::NullLiteral(_, span) => Expression::NullLiteral(ExprInfo::new(Type::Null), span),
        Expression::UndefinedLiteral(_, span) => {
            Expression::UndefinedLiteral(ExprInfo::new(Type::Undefined), span)
        }
        Expression::TemplateLiteral(t) => {
            Expression::TemplateLiteral(literal::check_template_literal(t, ctx))
        }
        Expression::ArrayLiteral(a) => Expression::ArrayLiteral(array::check_array_literal(a, None, ctx)),
        Expression::ObjectLiteral(o) => {
            Expression::ObjectLiteral(object::check_object_literal(o, None, ctx))
        }
        Expression::Function(f) => Expression::Function(function_like::check_function_expression(f, ctx)),
        Expression::Arrow(a) => Expression::Arrow(function_like::check_arrow_function(a, ctx)),
        Expression::Unary(u) => Expression::Unary(operators::check_unary_expression(u, ctx)),
        Expression::Update(u) => Expression::Update(operators::check_update_expression(u, ctx)),
        Expression::Binary(b) => Expression::Binary(operators::check_binary_expression(b, ctx)),
        Expression::Logical(l) => Expression::Logical(operators::check_logical_expression(l, ctx)),
        Expression::Member(m) => Expression::Member(member::check_member_expression(m, ctx)),
        Expression::Index(i) => Expression::Index(member::check_index_expression(i, ctx)),
        Expression::Call(c) => Expression::Call(call::check_call_expression(c, ctx)),
        Expression::New(n) => Expression::New(call::check_new_expression(n, ctx)),
        Expression::Assignment(a) => {
            Expression::Assignment(assignment::check_assignment_expression(a, ctx))
        }
        Expression::Conditional(c) => {
            Expression::Conditional(conditional::check_conditional_expression(c, ctx))
        }
        Expression::TypeAssertion(t) => {
            Expression::TypeAssertion(conditional::check_type_assertion(t, ctx))
        }
        Expression::Spread(s) => Expression::Spread(conditional::check_spread_element(s, ctx)),
        Expression::Parenthesized(inner, _, span) => {
            let checked = conditional::check_parenthesized(*inner, ctx);
            let ty = checked.info().get().unwrap_or(Type::Any);
            Expression::Parenthesized(Box::new(checked), ExprInfo::new(ty), span)
        }
    }
}

/// Like `infer_expression`, but an expected type flows into array/object
/// literals (and through parentheses) so their elements/properties are
/// checked against the right slot instead of widened ad hoc.
pub fn check_expression_contextual(
    expr: Expression<()>,
    expected: &Type,
    ctx: &mut TypeContext,
) -> Expression<ExprInfo> {
    match expr {
        Expression::ArrayLiteral(a) => {
            Expression::ArrayLiteral(array::check_array_literal(a, Some(expected), ctx))
        }
        Expression::ObjectLiteral(o) => {
            Expression::ObjectLiteral(object::check_object_literal(o, Some(expected), ctx))
        }
        Expression::Parenthesized(inner, _, span) => {
            let checked = check_expression_contextual(*inner, expected, ctx);
            let ty = checked.info().get().unwrap_or(Type::Any);
            Expression::Parenthesized(Box::new(checked), ExprInfo::new(ty), span)
        }
        other => infer_expression(other, ctx),
    }
}
