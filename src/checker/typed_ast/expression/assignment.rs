//! `target OP= value`. Three target shapes: identifier, member/index
//! access, and (for `=` only) an array/object literal destructuring
//! pattern. Compound operators are desugared semantically
//! (not syntactically) to the underlying binary op's operand constraint,
//! then the result is checked back against the target's type.

use crate::ast::expression::{AssignmentExpression, AssignmentOperator, Expression};
use crate::checker::assignability::is_assignable;
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::error::{ImmutableReassign, TypeCheckError, TypeMismatch};
use crate::checker::narrowing;
use crate::checker::types::{ObjectKind, Type};

use super::destructure::check_assignment_pattern;

pub fn check_assignment_expression(
    assignment: AssignmentExpression<()>,
    ctx: &mut TypeContext,
) -> AssignmentExpression<ExprInfo> {
    let span = assignment.span.clone();
    let operator = assignment.operator;

    if operator == AssignmentOperator::Assign
        && matches!(*assignment.target, Expression::ArrayLiteral(_) | Expression::ObjectLiteral(_))
    {
        let value = super::infer_expression(*assignment.value, ctx);
        let value_ty = value.info().get().unwrap_or(Type::Any);
        let target = check_assignment_pattern(*assignment.target, &value_ty, ctx);
        return AssignmentExpression {
            target: Box::new(target),
            operator,
            value: Box::new(value),
            info: ExprInfo::new(value_ty),
            span,
        };
    }

    let target = check_target(*assignment.target, ctx);
    let target_ty = target.info().get().unwrap_or(Type::Any);
    let value = super::infer_expression(*assignment.value, ctx);
    let value_ty = value.info().get().unwrap_or(Type::Any);

    check_writable(&target, ctx, &span);

    let result_ty = match operator {
        AssignmentOperator::Assign => {
            if !is_assignable(&value_ty, &target_ty) {
                report_mismatch(target_ty.clone(), value_ty.clone(), &span, ctx);
            }
            value_ty.clone()
        }
        AssignmentOperator::AddAssign => {
            if !matches!(target_ty, Type::String) && !numeric_like(&target_ty) {
                report_mismatch(Type::union(vec![Type::Number, Type::String]), target_ty.clone(), &span, ctx);
            }
            target_ty.clone()
        }
        AssignmentOperator::SubtractAssign
        | AssignmentOperator::MultiplyAssign
        | AssignmentOperator::DivideAssign
        | AssignmentOperator::ModuloAssign
        | AssignmentOperator::ExponentAssign
        | AssignmentOperator::BitwiseAndAssign
        | AssignmentOperator::BitwiseOrAssign
        | AssignmentOperator::BitwiseXorAssign => {
            if !numeric_like(&target_ty) {
                report_mismatch(Type::Number, target_ty.clone(), &span, ctx);
            }
            if !numeric_like(&value_ty) {
                report_mismatch(Type::Number, value_ty.clone(), &span, ctx);
            }
            Type::Number
        }
        AssignmentOperator::AndAssign => narrowing::apply_narrowing(&target_ty, &value_ty, true),
        AssignmentOperator::OrAssign => {
            let non_nullish: Vec<Type> = target_ty
                .union_members()
                .into_iter()
                .filter(|m| !m.is_nullish())
                .cloned()
                .collect();
            Type::union(vec![Type::union(non_nullish), value_ty.clone()])
        }
        AssignmentOperator::NullishAssign => {
            let non_nullish: Vec<Type> = target_ty
                .union_members()
                .into_iter()
                .filter(|m| !m.is_nullish())
                .cloned()
                .collect();
            if !is_assignable(&value_ty, &target_ty) {
                report_mismatch(target_ty.clone(), value_ty.clone(), &span, ctx);
            }
            Type::union(vec![Type::union(non_nullish), value_ty.clone()])
        }
    };

    AssignmentExpression {
        target: Box::new(target),
        operator,
        value: Box::new(value),
        info: ExprInfo::new(result_ty),
        span,
    }
}

fn numeric_like(ty: &Type) -> bool {
    matches!(ty, Type::Any) || is_assignable(ty, &Type::Number)
}

fn check_target(target: Expression<()>, ctx: &mut TypeContext) -> Expression<ExprInfo> {
    super::infer_expression(target, ctx)
}

fn check_writable(target: &Expression<ExprInfo>, ctx: &mut TypeContext, span: &crate::span::Span) {
    match target {
        Expression::Identifier(id) => {
            if let Some(binding) = ctx.env.lookup_binding(&id.name) {
                if !binding.mutable {
                    let _ = ctx.report(TypeCheckError::ImmutableReassign(
                        ImmutableReassign { name: id.name.clone() },
                        span.clone(),
                    ));
                }
            }
        }
        Expression::Member(member) => {
            let object_ty = member.object.info().get().unwrap_or(Type::Any);
            let Type::Object(obj) = &object_ty else { return };
            let Some(prop) = obj.find_property(&member.property) else { return };
            if !prop.readonly {
                return;
            }
            let class_name = match &obj.kind {
                ObjectKind::Class(name) => name.clone(),
                _ => return,
            };
            if !super::member::is_readonly_write_allowed(&member.object, &class_name, ctx) {
                let _ = ctx.report(TypeCheckError::ImmutableReassign(
                    ImmutableReassign { name: member.property.clone() },
                    span.clone(),
                ));
            }
        }
        _ => {}
    }
}

fn report_mismatch(expected: Type, actual: Type, span: &crate::span::Span, ctx: &mut TypeContext) {
    let _ = ctx.report(TypeCheckError::TypeMismatch(
        TypeMismatch { expected, actual },
        span.clone(),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expression::Identifier;
    use crate::checker::context::CheckerOptions;
    use crate::span::Span;

    #[test]
    fn reassigning_const_reports_diagnostic() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        ctx.env.declare_binding("x", Type::Number, false).unwrap();
        let assignment = AssignmentExpression {
            target: Box::new(Expression::Identifier(Identifier::new("x", (), Span::default()))),
            operator: AssignmentOperator::Assign,
            value: Box::new(Expression::NumberLiteral(2.0, (), Span::default())),
            info: (),
            span: Span::default(),
        };
        check_assignment_expression(assignment, &mut ctx);
        assert_eq!(ctx.diagnostics().len(), 1);
    }

    #[test]
    fn reassigning_mutable_binding_with_matching_type_is_clean() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        ctx.env.declare_binding("x", Type::Number, true).unwrap();
        let assignment = AssignmentExpression {
            target: Box::new(Expression::Identifier(Identifier::new("x", (), Span::default()))),
            operator: AssignmentOperator::Assign,
            value: Box::new(Expression::NumberLiteral(2.0, (), Span::default())),
            info: (),
            span: Span::default(),
        };
        let checked = check_assignment_expression(assignment, &mut ctx);
        assert_eq!(checked.info.get(), Some(Type::Number));
        assert!(ctx.diagnostics().is_empty());
    }
}
