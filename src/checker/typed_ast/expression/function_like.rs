//! Function expressions and arrow functions, both delegating to the one
//! parameter/body-checking pipeline in `checker::function`.
//! An arrow never gets its own `this` binding; it inherits whatever `this`
//! is already in scope (or none, at module scope).

use crate::ast::expression::{ArrowFunction, FunctionExpression};
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::function::check_function_like;
use crate::checker::types::Type;

pub fn check_function_expression(
    func: FunctionExpression<()>,
    ctx: &mut TypeContext,
) -> FunctionExpression<ExprInfo> {
    let span = func.span.clone();
    let this_type = ctx.env.resolve("this");

    let checked = check_function_like(
        &func.type_parameters,
        func.parameters,
        func.return_type.clone(),
        Some(func.body),
        this_type,
        ctx,
    );

    FunctionExpression {
        name: func.name,
        type_parameters: func.type_parameters,
        parameters: checked.checked_parameters,
        return_type: func.return_type,
        body: checked.checked_body.expect("body was provided"),
        is_generator: func.is_generator,
        is_async: func.is_async,
        info: ExprInfo::new(Type::Function(checked.signature)),
        span,
    }
}

pub fn check_arrow_function(
    arrow: ArrowFunction<()>,
    ctx: &mut TypeContext,
) -> ArrowFunction<ExprInfo> {
    let span = arrow.span.clone();
    let this_type = ctx.env.resolve("this");

    let checked = check_function_like(
        &arrow.type_parameters,
        arrow.parameters,
        arrow.return_type.clone(),
        Some(arrow.body),
        this_type,
        ctx,
    );

    ArrowFunction {
        type_parameters: arrow.type_parameters,
        parameters: checked.checked_parameters,
        return_type: arrow.return_type,
        body: checked.checked_body.expect("body was provided"),
        is_async: arrow.is_async,
        info: ExprInfo::new(Type::Function(checked.signature)),
        span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expression::{Expression, FunctionBody, Parameter};
    use crate::ast::type_annotation::TypeAnnotation;
    use crate::checker::context::CheckerOptions;
    use crate::span::Span;

    #[test]
    fn arrow_with_annotated_params_and_expression_body_infers_return() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        let arrow = ArrowFunction {
            type_parameters: vec![],
            parameters: vec![Parameter {
                name: "x".into(),
                annotation: Some(TypeAnnotation::Named("number".into(), Span::default())),
                default: None,
                optional: false,
                is_rest: false,
                property_modifiers: None,
                span: Span::default(),
            }],
            return_type: None,
            body: FunctionBody::Expression(Box::new(Expression::Identifier(
                crate::ast::expression::Identifier::new("x", (), Span::default()),
            ))),
            is_async: false,
            info: (),
            span: Span::default(),
        };
        let checked = check_arrow_function(arrow, &mut ctx);
        let Some(Type::Function(f)) = checked.info.get() else {
            panic!("expected function type");
        };
        assert_eq!(*f.return_type, Type::Number);
    }
}
