//! Array literal checking. Without a contextual type the
//! element type is the union of the (deeply-widened) element types;
//! against a tuple context the element count must match and each element
//! is checked contextually against its slot; against an array context
//! every element is checked against the element type.

use crate::ast::expression::{ArrayLiteral, Expression};
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::error::{TypeCheckError, TypeMismatch, WrongArgumentCount};
use crate::checker::types::{TupleElement, Type};

pub fn check_array_literal(
    array: ArrayLiteral<()>,
    context: Option<&Type>,
    ctx: &mut TypeContext,
) -> ArrayLiteral<ExprInfo> {
    match context {
        Some(Type::Tuple(elements)) => check_against_tuple(array, elements, ctx),
        Some(Type::Array(element_type)) => check_against_array(array, element_type, ctx),
        _ => check_without_context(array, ctx),
    }
}

fn check_without_context(array: ArrayLiteral<()>, ctx: &mut TypeContext) -> ArrayLiteral<ExprInfo> {
    let span = array.span.clone();
    let mut checked = Vec::with_capacity(array.elements.len());
    let mut element_types = Vec::new();
    for el in array.elements {
        let (checked_el, ty) = check_element(el, ctx);
        element_types.push(ty);
        checked.push(checked_el);
    }
    let element_type = if element_types.is_empty() {
        Type::Unknown
    } else {
        Type::union(element_types.into_iter().map(|t| deep_widen(&t)).collect())
    };
    ArrayLiteral {
        elements: checked,
        info: ExprInfo::new(Type::Array(Box::new(element_type))),
        span,
    }
}

fn check_against_array(
    array: ArrayLiteral<()>,
    element_type: &Type,
    ctx: &mut TypeContext,
) -> ArrayLiteral<ExprInfo> {
    let span = array.span.clone();
    let mut checked = Vec::with_capacity(array.elements.len());
    for el in array.elements {
        let checked_el = super::check_expression_contextual(el, element_type, ctx);
        checked.push(checked_el);
    }
    ArrayLiteral {
        elements: checked,
        info: ExprInfo::new(Type::Array(Box::new(element_type.clone()))),
        span,
    }
}

fn check_against_tuple(
    array: ArrayLiteral<()>,
    elements: &[TupleElement],
    ctx: &mut TypeContext,
) -> ArrayLiteral<ExprInfo> {
    let span = array.span.clone();
    if array.elements.len() != elements.len() {
        let _ = ctx.report(TypeCheckError::WrongArgumentCount(
            WrongArgumentCount {
                expected: elements.len().to_string(),
                actual: array.elements.len(),
            },
            span.clone(),
        ));
    }
    let mut checked = Vec::with_capacity(array.elements.len());
    for (i, el) in array.elements.into_iter().enumerate() {
        let checked_el = match elements.get(i) {
            Some(slot) => super::check_expression_contextual(el, &slot.ty, ctx),
            None => super::infer_expression(el, ctx),
        };
        checked.push(checked_el);
    }
    ArrayLiteral {
        elements: checked,
        info: ExprInfo::new(Type::Tuple(elements.to_vec())),
        span,
    }
}

fn check_element(el: Expression<()>, ctx: &mut TypeContext) -> (Expression<ExprInfo>, Type) {
    if let Expression::Spread(spread) = el {
        let checked_arg = super::infer_expression(*spread.argument, ctx);
        let ty = checked_arg.info().get().unwrap_or(Type::Any);
        let element_ty = match &ty {
            Type::Array(inner) => (**inner).clone(),
            Type::Tuple(elements) => Type::union(elements.iter().map(|e| e.ty.clone()).collect()),
            other => other.clone(),
        };
        let span = spread.span.clone();
        return (
            Expression::Spread(crate::ast::expression::SpreadElement {
                argument: Box::new(checked_arg),
                info: ExprInfo::new(element_ty.clone()),
                span,
            }),
            element_ty,
        );
    }
    let checked = super::infer_expression(el, ctx);
    let ty = checked.info().get().unwrap_or(Type::Any);
    (checked, ty)
}

fn deep_widen(ty: &Type) -> Type {
    match ty.widen() {
        Type::Object(mut obj) => {
            for prop in obj.properties.iter_mut() {
                prop.ty = prop.ty.widen();
            }
            Type::Object(obj)
        }
        other => other,
    }
}

/// Surfaced for the sake of a clean error path when a `TypeMismatch` would
/// otherwise need constructing inline at every call site above.
#[allow(dead_code)]
fn mismatch(expected: Type, actual: Type, span: crate::span::Span) -> TypeCheckError {
    TypeCheckError::TypeMismatch(TypeMismatch { expected, actual }, span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::context::CheckerOptions;
    use crate::span::Span;

    fn num(n: f64) -> Expression<()> {
        Expression::NumberLiteral(n, (), Span::default())
    }

    #[test]
    fn empty_array_without_context_is_unknown_element() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        let array = ArrayLiteral {
            elements: vec![],
            info: (),
            span: Span::default(),
        };
        let checked = check_array_literal(array, None, &mut ctx);
        assert_eq!(checked.info.get(), Some(Type::Array(Box::new(Type::Unknown))));
    }

    #[test]
    fn mixed_elements_widen_to_union() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        let array = ArrayLiteral {
            elements: vec![num(1.0), Expression::StringLiteral("a".into(), (), Span::default())],
            info: (),
            span: Span::default(),
        };
        let checked = check_array_literal(array, None, &mut ctx);
        assert_eq!(
            checked.info.get(),
            Some(Type::Array(Box::new(Type::union(vec![Type::Number, Type::String]))))
        );
    }

    #[test]
    fn tuple_context_checks_each_slot() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        let array = ArrayLiteral {
            elements: vec![num(1.0), Expression::StringLiteral("a".into(), (), Span::default())],
            info: (),
            span: Span::default(),
        };
        let tuple = vec![
            TupleElement { ty: Type::Number, optional: false, is_rest: false },
            TupleElement { ty: Type::String, optional: false, is_rest: false },
        ];
        let checked = check_array_literal(array, Some(&Type::Tuple(tuple.clone())), &mut ctx);
        assert_eq!(checked.info.get(), Some(Type::Tuple(tuple)));
        assert!(ctx.diagnostics().is_empty());
    }
}
