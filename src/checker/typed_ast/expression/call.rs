//! `callee(args)` / `new Callee(args)`. The common path is shared: resolve
//! the callee's type, pick a matching call/construct signature (the first
//! one that fits, left to right, matching TS's overload-resolution
//! contract), check each argument contextually against the chosen
//! signature's parameter type, and return its return type.

use crate::ast::expression::{CallExpression, Expression, NewExpression};
use crate::checker::assignability::is_assignable;
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::error::{NoMatchingOverload, NotCallable, TypeCheckError, WrongArgumentCount};
use crate::checker::types::{FunctionType, Type};

pub fn check_call_expression(
    call: CallExpression<()>,
    ctx: &mut TypeContext,
) -> CallExpression<ExprInfo> {
    let span = call.span.clone();
    let callee = super::infer_expression(*call.callee, ctx);
    let callee_ty = callee.info().get().unwrap_or(Type::Any);

    if call.optional && callee_ty.is_nullish() {
        let checked_args: Vec<_> = call
            .arguments
            .into_iter()
            .map(|a| super::infer_expression(a, ctx))
            .collect();
        return CallExpression {
            callee: Box::new(callee),
            type_arguments: call.type_arguments,
            arguments: checked_args,
            optional: call.optional,
            info: ExprInfo::new(Type::Undefined),
            span,
        };
    }

    let signatures = call_signatures_of(&callee_ty);
    if signatures.is_empty() && !matches!(callee_ty, Type::Any) {
        let _ = ctx.report(TypeCheckError::NotCallable(
            NotCallable { ty: callee_ty.clone() },
            span.clone(),
        ));
        let checked_args: Vec<_> = call
            .arguments
            .into_iter()
            .map(|a| super::infer_expression(a, ctx))
            .collect();
        return CallExpression {
            callee: Box::new(callee),
            type_arguments: call.type_arguments,
            arguments: checked_args,
            optional: call.optional,
            info: ExprInfo::new(Type::Any),
            span,
        };
    }

    if matches!(callee_ty, Type::Any) {
        let checked_args: Vec<_> = call
            .arguments
            .into_iter()
            .map(|a| super::infer_expression(a, ctx))
            .collect();
        return CallExpression {
            callee: Box::new(callee),
            type_arguments: call.type_arguments,
            arguments: checked_args,
            optional: call.optional,
            info: ExprInfo::new(Type::Any),
            span,
        };
    }

    let (checked_args, return_ty) =
        resolve_and_check_call(&signatures, call.arguments, callee_name(&callee), &span, ctx);

    CallExpression {
        callee: Box::new(callee),
        type_arguments: call.type_arguments,
        arguments: checked_args,
        optional: call.optional,
        info: ExprInfo::new(return_ty),
        span,
    }
}

pub fn check_new_expression(
    new_expr: NewExpression<()>,
    ctx: &mut TypeContext,
) -> NewExpression<ExprInfo> {
    let span = new_expr.span.clone();
    let callee = super::infer_expression(*new_expr.callee, ctx);
    let callee_ty = callee.info().get().unwrap_or(Type::Any);

    let signatures = construct_signatures_of(&callee_ty);
    if signatures.is_empty() {
        if !matches!(callee_ty, Type::Any) {
            let _ = ctx.report(TypeCheckError::NotCallable(
                NotCallable { ty: callee_ty.clone() },
                span.clone(),
            ));
        }
        let checked_args: Vec<_> = new_expr
            .arguments
            .into_iter()
            .map(|a| super::infer_expression(a, ctx))
            .collect();
        return NewExpression {
            callee: Box::new(callee),
            type_arguments: new_expr.type_arguments,
            arguments: checked_args,
            info: ExprInfo::new(Type::Any),
            span,
        };
    }

    let (checked_args, return_ty) =
        resolve_and_check_call(&signatures, new_expr.arguments, callee_name(&callee), &span, ctx);

    NewExpression {
        callee: Box::new(callee),
        type_arguments: new_expr.type_arguments,
        arguments: checked_args,
        info: ExprInfo::new(return_ty),
        span,
    }
}

fn callee_name(callee: &Expression<ExprInfo>) -> String {
    match callee {
        Expression::Identifier(id) => id.name.clone(),
        _ => "expression".to_string(),
    }
}

fn call_signatures_of(ty: &Type) -> Vec<FunctionType> {
    match ty {
        Type::Function(f) => vec![f.clone()],
        Type::Object(obj) => obj.call_signatures.clone(),
        _ => vec![],
    }
}

fn construct_signatures_of(ty: &Type) -> Vec<FunctionType> {
    match ty {
        Type::Object(obj) => obj.construct_signatures.clone(),
        _ => vec![],
    }
}

/// Pick the first signature (in declaration order) whose arity and
/// parameter types accept `arguments`, check the arguments against it, and
/// return `(checked_arguments, return_type)`. When nothing matches, every
/// argument is still checked (bottom-up, with no contextual hint) so the
/// tree stays fully annotated, and a single `NoMatchingOverload`/arity
/// diagnostic is reported.
fn resolve_and_check_call(
    signatures: &[FunctionType],
    arguments: Vec<Expression<()>>,
    callee_name: String,
    span: &crate::span::Span,
    ctx: &mut TypeContext,
) -> (Vec<Expression<ExprInfo>>, Type) {
    // Infer each argument once, bottom-up, so overload selection can use
    // its type without re-checking it per candidate signature.
    let mut inferred_args = Vec::with_capacity(arguments.len());
    for arg in arguments {
        inferred_args.push(super::infer_expression(arg, ctx));
    }
    let arg_types: Vec<Type> = inferred_args
        .iter()
        .map(|a| a.info().get().unwrap_or(Type::Any))
        .collect();

    // An overloaded binding's `call_signatures` is every declared overload
    // followed by the implementation signature; a call site
    // only ever picks among the *declared* overloads ("no
    // matching overload" wording), never the implementation's own,
    // typically wider, signature. A plain (non-overloaded) function has
    // exactly one signature, which is both its only overload and its
    // implementation, so it stays a candidate.
    let candidates = if signatures.len() > 1 {
        &signatures[..signatures.len() - 1]
    } else {
        signatures
    };

    let chosen = candidates
        .iter()
        .find(|sig| signature_matches(sig, &arg_types, &inferred_args));

    match chosen {
        Some(sig) => {
            check_arity_and_assignability(sig, &inferred_args, &arg_types, span, ctx);
            (inferred_args, (*sig.return_type).clone())
        }
        None => {
            if signatures.len() > 1 {
                let _ = ctx.report(TypeCheckError::NoMatchingOverload(
                    NoMatchingOverload { callee: callee_name },
                    span.clone(),
                ));
            } else if let Some(sig) = signatures.first() {
                check_arity_and_assignability(sig, &inferred_args, &arg_types, span, ctx);
            }
            let return_ty = signatures
                .first()
                .map(|s| (*s.return_type).clone())
                .unwrap_or(Type::Any);
            (inferred_args, return_ty)
        }
    }
}

fn signature_matches(
    sig: &FunctionType,
    arg_types: &[Type],
    args: &[Expression<ExprInfo>],
) -> bool {
    let required = sig.parameters.iter().filter(|p| !p.optional && !p.is_rest).count();
    let has_rest = sig.parameters.iter().any(|p| p.is_rest);
    if arg_types.len() < required {
        return false;
    }
    if !has_rest && arg_types.len() > sig.parameters.len() {
        return false;
    }
    for (i, param) in sig.parameters.iter().enumerate() {
        if param.is_rest {
            return arg_types[i..].iter().all(|a| is_assignable(a, &param.ty));
        }
        let Some(arg_ty) = arg_types.get(i) else {
            return param.optional;
        };
        if is_spread(args.get(i)) {
            continue;
        }
        if !is_assignable(arg_ty, &param.ty) {
            return false;
        }
    }
    true
}

fn is_spread(expr: Option<&Expression<ExprInfo>>) -> bool {
    matches!(expr, Some(Expression::Spread(_)))
}

fn check_arity_and_assignability(
    sig: &FunctionType,
    args: &[Expression<ExprInfo>],
    arg_types: &[Type],
    span: &crate::span::Span,
    ctx: &mut TypeContext,
) {
    let required = sig.parameters.iter().filter(|p| !p.optional && !p.is_rest).count();
    let has_rest = sig.parameters.iter().any(|p| p.is_rest);
    let has_spread_arg = args.iter().any(|a| matches!(a, Expression::Spread(_)));

    if arg_types.len() < required && !has_spread_arg {
        let _ = ctx.report(TypeCheckError::WrongArgumentCount(
            WrongArgumentCount {
                expected: required.to_string(),
                actual: arg_types.len(),
            },
            span.clone(),
        ));
        return;
    }
    if !has_rest && arg_types.len() > sig.parameters.len() && !has_spread_arg {
        let _ = ctx.report(TypeCheckError::WrongArgumentCount(
            WrongArgumentCount {
                expected: sig.parameters.len().to_string(),
                actual: arg_types.len(),
            },
            span.clone(),
        ));
        return;
    }

    for (i, param) in sig.parameters.iter().enumerate() {
        if param.is_rest {
            for arg_ty in &arg_types[i.min(arg_types.len())..] {
                if !is_assignable(arg_ty, &param.ty) {
                    report_mismatch(param.ty.clone(), arg_ty.clone(), span, ctx);
                }
            }
            break;
        }
        let Some(arg_ty) = arg_types.get(i) else { continue };
        if matches!(args.get(i), Some(Expression::Spread(_))) {
            continue;
        }
        if !is_assignable(arg_ty, &param.ty) {
            report_mismatch(param.ty.clone(), arg_ty.clone(), span, ctx);
        }
    }
}

fn report_mismatch(expected: Type, actual: Type, span: &crate::span::Span, ctx: &mut TypeContext) {
    let _ = ctx.report(TypeCheckError::TypeMismatch(
        crate::checker::error::TypeMismatch { expected, actual },
        span.clone(),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expression::Identifier;
    use crate::checker::context::CheckerOptions;
    use crate::checker::types::ParameterType;
    use crate::span::Span;

    fn simple_fn(param: Type, ret: Type) -> Type {
        Type::Function(FunctionType {
            type_parameters: vec![],
            parameters: vec![ParameterType {
                name: "x".into(),
                ty: param,
                optional: false,
                is_rest: false,
            }],
            return_type: Box::new(ret),
            this_type: None,
            type_predicate: None,
        })
    }

    #[test]
    fn calling_with_matching_argument_returns_declared_return_type() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        ctx.env
            .declare_binding("f", simple_fn(Type::Number, Type::String), false)
            .unwrap();
        let call = CallExpression {
            callee: Box::new(Expression::Identifier(Identifier::new("f", (), Span::default()))),
            type_arguments: vec![],
            arguments: vec![Expression::NumberLiteral(1.0, (), Span::default())],
            optional: false,
            info: (),
            span: Span::default(),
        };
        let checked = check_call_expression(call, &mut ctx);
        assert_eq!(checked.info.get(), Some(Type::String));
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn calling_non_callable_reports_diagnostic() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        ctx.env.declare_binding("f", Type::Number, false).unwrap();
        let call = CallExpression {
            callee: Box::new(Expression::Identifier(Identifier::new("f", (), Span::default()))),
            type_arguments: vec![],
            arguments: vec![],
            optional: false,
            info: (),
            span: Span::default(),
        };
        let checked = check_call_expression(call, &mut ctx);
        assert_eq!(checked.info.get(), Some(Type::Any));
        assert_eq!(ctx.diagnostics().len(), 1);
    }
}
