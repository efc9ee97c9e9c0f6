//! Binary, logical and unary operators, including `typeof` and the
//! narrowed-`&&`/`||` right-hand-side checking a flow-sensitive checker needs.

use crate::ast::expression::{
    BinaryExpression, BinaryOperator, LogicalExpression, LogicalOperator, UnaryExpression,
    UnaryOperator, UpdateExpression,
};
use crate::checker::assignability::is_assignable;
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::error::{InvalidOperator, TypeCheckError};
use crate::checker::narrowing;
use crate::checker::types::Type;

fn numeric_like(ty: &Type) -> bool {
    matches!(ty, Type::Any) || is_assignable(ty, &Type::Number)
}

fn string_like(ty: &Type) -> bool {
    matches!(ty, Type::Any) || is_assignable(ty, &Type::String)
}

fn operator_symbol(op: BinaryOperator) -> &'static str {
    match op {
        BinaryOperator::Add => "+",
        BinaryOperator::Subtract => "-",
        BinaryOperator::Multiply => "*",
        BinaryOperator::Divide => "/",
        BinaryOperator::Modulo => "%",
        BinaryOperator::Exponent => "**",
        BinaryOperator::BitwiseAnd => "&",
        BinaryOperator::BitwiseOr => "|",
        BinaryOperator::BitwiseXor => "^",
        BinaryOperator::ShiftLeft => "<<",
        BinaryOperator::ShiftRight => ">>",
        BinaryOperator::UnsignedShiftRight => ">>>",
        _ => "?",
    }
}

fn report_invalid_operator(
    operator: BinaryOperator,
    left: &Type,
    right: &Type,
    span: &crate::span::Span,
    ctx: &mut TypeContext,
) {
    let _ = ctx.report(TypeCheckError::InvalidOperator(
        InvalidOperator {
            operator: operator_symbol(operator).to_string(),
            left: left.clone(),
            right: right.clone(),
        },
        span.clone(),
    ));
}

pub fn check_binary_expression(
    binary: BinaryExpression<()>,
    ctx: &mut TypeContext,
) -> BinaryExpression<ExprInfo> {
    let span = binary.span.clone();
    let left = super::infer_expression(*binary.left, ctx);
    let right = super::infer_expression(*binary.right, ctx);
    let left_ty = left.info().get().unwrap_or(Type::Any);
    let right_ty = right.info().get().unwrap_or(Type::Any);

    let result_ty = match binary.operator {
        BinaryOperator::Add => {
            let either_string = matches!(left_ty, Type::String | Type::StringLiteral(_))
                || matches!(right_ty, Type::String | Type::StringLiteral(_));
            if either_string {
                if (string_like(&left_ty) || numeric_like(&left_ty))
                    && (string_like(&right_ty) || numeric_like(&right_ty))
                {
                    Type::String
                } else {
                    report_invalid_operator(binary.operator, &left_ty, &right_ty, &span, ctx);
                    Type::Any
                }
            } else if numeric_like(&left_ty) && numeric_like(&right_ty) {
                Type::Number
            } else {
                report_invalid_operator(binary.operator, &left_ty, &right_ty, &span, ctx);
                Type::Any
            }
        }
        BinaryOperator::Subtract
        | BinaryOperator::Multiply
        | BinaryOperator::Divide
        | BinaryOperator::Modulo
        | BinaryOperator::Exponent
        | BinaryOperator::BitwiseAnd
        | BinaryOperator::BitwiseOr
        | BinaryOperator::BitwiseXor
        | BinaryOperator::ShiftLeft
        | BinaryOperator::ShiftRight
        | BinaryOperator::UnsignedShiftRight => {
            if numeric_like(&left_ty) && numeric_like(&right_ty) {
                Type::Number
            } else {
                report_invalid_operator(binary.operator, &left_ty, &right_ty, &span, ctx);
                Type::Number
            }
        }
        BinaryOperator::Equal
        | BinaryOperator::NotEqual
        | BinaryOperator::StrictEqual
        | BinaryOperator::StrictNotEqual => {
            if matches!(binary.operator, BinaryOperator::StrictEqual | BinaryOperator::StrictNotEqual)
                && !comparable(&left_ty, &right_ty)
            {
                let _ = ctx.report(TypeCheckError::TypeMismatch(
                    crate::checker::error::TypeMismatch {
                        expected: left_ty.clone(),
                        actual: right_ty.clone(),
                    },
                    span.clone(),
                ));
            }
            Type::Boolean
        }
        BinaryOperator::LessThan
        | BinaryOperator::LessThanOrEqual
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterThanOrEqual => Type::Boolean,
        BinaryOperator::In | BinaryOperator::InstanceOf => Type::Boolean,
    };

    BinaryExpression {
        left: Box::new(left),
        operator: binary.operator,
        right: Box::new(right),
        info: ExprInfo::new(result_ty),
        span,
    }
}

/// Two types "compare" if either is `any`/`unknown`, they overlap in a
/// union, or they're otherwise assignable in some direction. `typeof`
/// string-literal comparisons are always admitted regardless (see
/// DESIGN.md #2).
fn comparable(a: &Type, b: &Type) -> bool {
    matches!(a, Type::Any | Type::Unknown) || matches!(b, Type::Any | Type::Unknown) || is_assignable(a, b) || is_assignable(b, a)
}

pub fn check_logical_expression(
    logical: LogicalExpression<()>,
    ctx: &mut TypeContext,
) -> LogicalExpression<ExprInfo> {
    let span = logical.span.clone();
    let left = super::infer_expression(*logical.left, ctx);
    let left_ty = left.info().get().unwrap_or(Type::Any);

    let guards = narrowing::narrow_condition(&left, ctx);

    let (right, result_ty) = match logical.operator {
        LogicalOperator::And => {
            let overlay = build_overlay(&guards.positive, true, ctx);
            ctx.env.push_narrowings(overlay);
            let right = super::infer_expression(*logical.right, ctx);
            ctx.env.pop_narrowings();
            let right_ty = right.info().get().unwrap_or(Type::Any);
            (right, Type::union(vec![narrowed_falsy(&left_ty), right_ty]))
        }
        LogicalOperator::Or => {
            let overlay = build_overlay(&guards.negative, false, ctx);
            ctx.env.push_narrowings(overlay);
            let right = super::infer_expression(*logical.right, ctx);
            ctx.env.pop_narrowings();
            let right_ty = right.info().get().unwrap_or(Type::Any);
            (right, Type::union(vec![narrowed_truthy(&left_ty), right_ty]))
        }
        LogicalOperator::NullishCoalesce => {
            let right = super::infer_expression(*logical.right, ctx);
            let right_ty = right.info().get().unwrap_or(Type::Any);
            let non_nullish: Vec<Type> = left_ty
                .union_members()
                .into_iter()
                .filter(|m| !m.is_nullish())
                .cloned()
                .collect();
            (right, Type::union(vec![Type::union(non_nullish), right_ty]))
        }
    };

    LogicalExpression {
        left: Box::new(left),
        operator: logical.operator,
        right: Box::new(right),
        info: ExprInfo::new(result_ty),
        span,
    }
}

fn narrowed_falsy(ty: &Type) -> Type {
    ty.clone()
}

fn narrowed_truthy(ty: &Type) -> Type {
    Type::union(
        ty.union_members()
            .into_iter()
            .filter(|m| !m.is_nullish())
            .cloned()
            .collect(),
    )
}

/// `positive` is `true` when `map` is a guard's `positive` side (e.g. the
/// `if`'s consequent), `false` for its `negative`/complement side (the
/// `else`, or code falling through a terminating `if`). Threaded into
/// `apply_narrowing` so a discriminant map entry narrows each branch to the
/// opposite union members instead of filtering both branches the same way.
pub(crate) fn build_overlay(
    map: &std::collections::HashMap<String, Type>,
    positive: bool,
    ctx: &TypeContext,
) -> std::collections::HashMap<String, Type> {
    let mut overlay = std::collections::HashMap::new();
    for (path, narrowed) in map {
        let declared = ctx.env.lookup_narrowing(path).unwrap_or_else(|| {
            // Only bare-identifier paths have a binding to widen from;
            // dotted member paths fall back to the narrowed type itself.
            if !path.contains('.') {
                ctx.env.resolve(path).unwrap_or(Type::Unknown)
            } else {
                Type::Unknown
            }
        });
        overlay.insert(path.clone(), narrowing::apply_narrowing(&declared, narrowed, positive));
    }
    overlay
}

pub fn check_unary_expression(
    unary: UnaryExpression<()>,
    ctx: &mut TypeContext,
) -> UnaryExpression<ExprInfo> {
    let span = unary.span.clone();

    if unary.operator == UnaryOperator::Typeof {
        let argument = super::infer_expression(*unary.argument, ctx);
        let arg_ty = argument.info().get().unwrap_or(Type::Any);
        let result_ty = typeof_result(&arg_ty);
        return UnaryExpression {
            operator: unary.operator,
            argument: Box::new(argument),
            info: ExprInfo::new(result_ty),
            span,
        };
    }

    let argument = super::infer_expression(*unary.argument, ctx);
    let result_ty = match unary.operator {
        UnaryOperator::Plus | UnaryOperator::Minus | UnaryOperator::BitwiseNot => Type::Number,
        UnaryOperator::LogicalNot => Type::Boolean,
        UnaryOperator::Void => Type::Undefined,
        UnaryOperator::Typeof => unreachable!("handled above"),
    };

    UnaryExpression {
        operator: unary.operator,
        argument: Box::new(argument),
        info: ExprInfo::new(result_ty),
        span,
    }
}

/// `typeof x`: if the static type is precise, return the exact tag as a
/// literal string type so an equality-narrowed `if` can discriminate on
/// it; otherwise fall back to the full union of tags.
fn typeof_result(ty: &Type) -> Type {
    let tag = match ty {
        Type::String | Type::StringLiteral(_) => Some("string"),
        Type::Number | Type::NumberLiteral(_) => Some("number"),
        Type::Boolean | Type::BooleanLiteral(_) => Some("boolean"),
        Type::Undefined => Some("undefined"),
        Type::Function(_) => Some("function"),
        Type::Object(obj) if !obj.call_signatures.is_empty() => Some("function"),
        Type::Object(_) | Type::Array(_) | Type::Tuple(_) | Type::Null => Some("object"),
        _ => None,
    };
    match tag {
        Some(tag) => Type::StringLiteral(tag.to_string()),
        None => Type::union(vec![
            Type::StringLiteral("string".into()),
            Type::StringLiteral("number".into()),
            Type::StringLiteral("boolean".into()),
            Type::StringLiteral("undefined".into()),
            Type::StringLiteral("object".into()),
            Type::StringLiteral("function".into()),
            Type::StringLiteral("symbol".into()),
            Type::StringLiteral("bigint".into()),
        ]),
    }
}

pub fn check_update_expression(
    update: UpdateExpression<()>,
    ctx: &mut TypeContext,
) -> UpdateExpression<ExprInfo> {
    let span = update.span.clone();
    let argument = super::infer_expression(*update.argument, ctx);
    let arg_ty = argument.info().get().unwrap_or(Type::Any);
    if !numeric_like(&arg_ty) {
        let _ = ctx.report(TypeCheckError::TypeMismatch(
            crate::checker::error::TypeMismatch {
                expected: Type::Number,
                actual: arg_ty.clone(),
            },
            span.clone(),
        ));
    }
    UpdateExpression {
        operator: update.operator,
        argument: Box::new(argument),
        prefix: update.prefix,
        info: ExprInfo::new(Type::Number),
        span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expression::Identifier;
    use crate::checker::context::CheckerOptions;
    use crate::span::Span;

    #[test]
    fn typeof_on_precise_type_is_a_literal_string() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        ctx.env.declare_binding("x", Type::Number, false).unwrap();
        let unary = UnaryExpression {
            operator: UnaryOperator::Typeof,
            argument: Box::new(ident_expr("x")),
            info: (),
            span: Span::default(),
        };
        let checked = check_unary_expression(unary, &mut ctx);
        assert_eq!(checked.info.get(), Some(Type::StringLiteral("number".into())));
    }

    fn ident_expr(name: &str) -> crate::ast::expression::Expression<()> {
        crate::ast::expression::Expression::Identifier(Identifier::new(name, (), Span::default()))
    }

    #[test]
    fn addition_of_strings_is_string() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        let binary = BinaryExpression {
            left: Box::new(crate::ast::expression::Expression::StringLiteral(
                "a".into(),
                (),
                Span::default(),
            )),
            operator: BinaryOperator::Add,
            right: Box::new(crate::ast::expression::Expression::StringLiteral(
                "b".into(),
                (),
                Span::default(),
            )),
            info: (),
            span: Span::default(),
        };
        let checked = check_binary_expression(binary, &mut ctx);
        assert_eq!(checked.info.get(), Some(Type::String));
    }
}
