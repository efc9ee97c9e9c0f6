//! Unified checking pipeline for function declarations, function
//! expressions, arrow functions and class methods: resolve the signature
//! (parameter/return annotations, defaulting unannotated parameters to the
//! contextual type when one is available, else `any`), bind parameters in
//! a fresh scope, and check the body against the declared or inferred
//! return type.

use crate::ast::expression::{FunctionBody, Parameter};
use crate::ast::statement::Statement;
use crate::checker::annotation::resolve_annotation;
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::types::{FunctionType, ParameterType, Type, TypeParameterDecl};

/// A parameter/return-type/body triple checked identically regardless of
/// which surface syntax (`function`, arrow, method) it came from.
pub struct CheckedSignature {
    pub signature: FunctionType,
    pub checked_parameters: Vec<Parameter<ExprInfo>>,
    pub checked_body: Option<FunctionBody<ExprInfo>>,
}

/// Resolve a signature from its annotations alone, without checking (or
/// even requiring) a body. Used by the shallow pass so a function
/// declaration can be forward-referenced before its own body is checked,
/// and to compute a TS overload declaration's signature directly (an
/// overload carries no body at all, only fully-annotated parameters and a
/// return type).
pub fn resolve_signature_only(
    type_parameter_names: &[String],
    parameters: &[Parameter<()>],
    return_type: Option<&crate::ast::type_annotation::TypeAnnotation>,
    ctx: &mut TypeContext,
) -> FunctionType {
    ctx.env.enter_scope();
    for name in type_parameter_names {
        ctx.env.declare_type_parameter(name.clone());
    }

    let parameter_types = parameters
        .iter()
        .map(|param| ParameterType {
            name: param.name.clone(),
            ty: param
                .annotation
                .as_ref()
                .and_then(|a| resolve_annotation(a, ctx).ok())
                .unwrap_or(Type::Any),
            optional: param.optional,
            is_rest: param.is_rest,
        })
        .collect();

    let return_ty = return_type
        .and_then(|a| resolve_annotation(a, ctx).ok())
        .unwrap_or(Type::Any);

    ctx.env.exit_scope();

    FunctionType {
        type_parameters: type_parameter_names
            .iter()
            .map(|name| TypeParameterDecl {
                name: name.clone(),
                constraint: None,
                default: None,
            })
            .collect(),
        parameters: parameter_types,
        return_type: Box::new(return_ty),
        this_type: None,
        type_predicate: None,
    }
}

pub fn check_function_like(
    type_parameter_names: &[String],
    parameters: Vec<Parameter<()>>,
    return_type: Option<crate::ast::type_annotation::TypeAnnotation>,
    body: Option<FunctionBody<()>>,
    this_type: Option<Type>,
    ctx: &mut TypeContext,
) -> CheckedSignature {
    ctx.env.enter_scope();
    for name in type_parameter_names {
        ctx.env.declare_type_parameter(name.clone());
    }
    if let Some(this_ty) = &this_type {
        let _ = ctx.env.declare_binding("this", this_ty.clone(), false);
    }

    let mut checked_parameters = Vec::with_capacity(parameters.len());
    let mut parameter_types = Vec::with_capacity(parameters.len());
    for param in parameters {
        let ty = match &param.annotation {
            Some(annotation) => resolve_annotation(annotation, ctx).unwrap_or(Type::Unknown),
            None => {
                if ctx.options.no_implicit_any {
                    Type::Unknown
                } else {
                    Type::Any
                }
            }
        };
        let _ = ctx
            .env
            .declare_binding(param.name.clone(), ty.clone(), true);
        parameter_types.push(ParameterType {
            name: param.name.clone(),
            ty: ty.clone(),
            optional: param.optional,
            is_rest: param.is_rest,
        });
        let default = param
            .default
            .map(|d| super::typed_ast::expression::infer_expression(d, ctx));
        checked_parameters.push(Parameter {
            name: param.name,
            annotation: param.annotation,
            default,
            optional: param.optional,
            is_rest: param.is_rest,
            property_modifiers: param.property_modifiers,
            span: param.span,
        });
    }

    let declared_return = return_type
        .as_ref()
        .map(|a| resolve_annotation(a, ctx).unwrap_or(Type::Unknown));

    let (checked_body, inferred_return) = match body {
        None => (None, declared_return.clone().unwrap_or(Type::Void)),
        Some(FunctionBody::Expression(expr)) => {
            let checked = super::typed_ast::expression::infer_expression(*expr, ctx);
            let ty = checked.info().get().unwrap_or(Type::Unknown);
            (Some(FunctionBody::Expression(Box::new(checked))), ty)
        }
        Some(FunctionBody::Block(statements)) => {
            let mut checked_statements = Vec::with_capacity(statements.len());
            for stmt in statements {
                checked_statements.push(super::typed_ast::statement::check_statement(stmt, ctx));
            }
            let mut return_types = Vec::new();
            for stmt in &checked_statements {
                collect_return_type(stmt, &mut return_types);
            }
            let ty = if return_types.is_empty() {
                Type::Void
            } else {
                Type::union(return_types)
            };
            (Some(FunctionBody::Block(checked_statements)), ty)
        }
    };

    ctx.env.exit_scope();

    let return_type = declared_return.unwrap_or(inferred_return);

    CheckedSignature {
        signature: FunctionType {
            type_parameters: type_parameter_names
                .iter()
                .map(|name| TypeParameterDecl {
                    name: name.clone(),
                    constraint: None,
                    default: None,
                })
                .collect(),
            parameters: parameter_types,
            return_type: Box::new(return_type),
            this_type: this_type.map(Box::new),
            type_predicate: None,
        },
        checked_parameters,
        checked_body,
    }
}

/// Scan for `return <expr>;` statements in the already-checked tree to
/// infer a return type when no annotation was written. Only looks at the
/// immediate block, not nested function bodies (those infer their own
/// return type independently when checked).
fn collect_return_type(stmt: &Statement<ExprInfo>, out: &mut Vec<Type>) {
    match stmt {
        Statement::Return(Some(expr), _) => {
            out.push(expr.info().get().unwrap_or(Type::Unknown));
        }
        Statement::Return(None, _) => out.push(Type::Void),
        Statement::If(s) => {
            collect_return_type(&s.consequent, out);
            if let Some(alt) = &s.alternate {
                collect_return_type(alt, out);
            }
        }
        Statement::Block(statements, _) => {
            for s in statements {
                collect_return_type(s, out);
            }
        }
        Statement::While(s) => collect_return_type(&s.body, out),
        Statement::For(s) => collect_return_type(&s.body, out),
        Statement::ForOf(s) => collect_return_type(&s.body, out),
        Statement::ForIn(s) => collect_return_type(&s.body, out),
        _ => {}
    }
}
