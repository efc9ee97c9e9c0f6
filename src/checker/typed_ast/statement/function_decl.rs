//! `function name(...) { ... }` declarations, including TS-style overload
//! sets: several consecutive declarations sharing a name, every one but the
//! last carrying `body: None`, collapsed into a single binding (see
//! §4.5 step 8, §3.2 "pending overload signatures").
//!
//! The shallow pass (round 3 of `typed_ast::shallow_check_program`) is
//! where the actual merge happens: it sees every top-level declaration in
//! source order before any body is checked, so by the time it reaches the
//! implementation it can drain every signature-only declaration seen so
//! far and bind one `Type::Object` with a `call_signatures` entry per
//! overload plus the implementation. The full pass only re-checks bodies
//! and refines the implementation's signature in place — it must not repeat
//! the merge, since the pending overload list was already drained.

use crate::ast::statement::FunctionDeclaration;
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::function::{check_function_like, resolve_signature_only};
use crate::checker::types::{FunctionType, ObjectKind, ObjectType, Type};

pub fn shallow_check_function_declaration(decl: &FunctionDeclaration<()>, ctx: &mut TypeContext) {
    let type_parameter_names: Vec<String> =
        decl.type_parameters.iter().map(|tp| tp.name.clone()).collect();
    let sig = resolve_signature_only(
        &type_parameter_names,
        &decl.parameters,
        decl.return_type.as_ref(),
        ctx,
    );

    if decl.body.is_none() {
        ctx.env.register_overload(decl.name.clone(), sig);
        return;
    }

    bind_completed_function(&decl.name, sig, ctx);
}

/// Drain whatever overload signatures have accumulated under `name` and
/// bind the final value: a bare `Type::Function` when there were none, or
/// an anonymous `Type::Object` carrying every overload followed by `sig`
/// (the implementation) as its `call_signatures`.
fn bind_completed_function(name: &str, sig: FunctionType, ctx: &mut TypeContext) {
    let pending = ctx.env.take_overloads(name);
    let final_ty = if pending.is_empty() {
        Type::Function(sig)
    } else {
        let mut call_signatures = pending;
        call_signatures.push(sig);
        Type::Object(ObjectType {
            call_signatures,
            ..ObjectType::empty(ObjectKind::Anonymous)
        })
    };
    if ctx
        .env
        .declare_binding(name.to_string(), final_ty.clone(), false)
        .is_err()
    {
        ctx.env.update_binding(name, final_ty);
    }
}

/// Replace the implementation's signature — the last call signature of an
/// overloaded binding, or the sole signature of a non-overloaded one —
/// with the fully body-checked version, so a return type inferred from
/// `return` statements (rather than declared) reaches call sites. The
/// shallow pass already established the right *shape* (plain function vs.
/// overloaded object); this only refines the one signature whose body was
/// actually checked.
fn refine_implementation_signature(name: &str, sig: FunctionType, ctx: &mut TypeContext) {
    match ctx.env.lookup_binding(name).map(|b| b.ty.clone()) {
        Some(Type::Object(mut obj)) if !obj.call_signatures.is_empty() => {
            let last = obj.call_signatures.len() - 1;
            obj.call_signatures[last] = sig;
            ctx.env.update_binding(name, Type::Object(obj));
        }
        _ => ctx.env.update_binding(name, Type::Function(sig)),
    }
}

pub fn check_function_declaration(
    decl: FunctionDeclaration<()>,
    ctx: &mut TypeContext,
) -> FunctionDeclaration<ExprInfo> {
    let type_parameter_names: Vec<String> =
        decl.type_parameters.iter().map(|tp| tp.name.clone()).collect();
    let has_body = decl.body.is_some();

    let checked = check_function_like(
        &type_parameter_names,
        decl.parameters,
        decl.return_type.clone(),
        decl.body,
        None,
        ctx,
    );

    if has_body {
        refine_implementation_signature(&decl.name, checked.signature.clone(), ctx);
    }

    FunctionDeclaration {
        name: decl.name,
        type_parameters: decl.type_parameters,
        parameters: checked.checked_parameters,
        return_type: decl.return_type,
        body: checked.checked_body,
        is_generator: decl.is_generator,
        is_async: decl.is_async,
        span: decl.span,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::context::CheckerOptions;
    use crate::checker::typed_ast::statement::shallow_check_statement;
    use crate::ast::expression::{FunctionBody, Identifier, Parameter};
    use crate::ast::statement::Statement;
    use crate::ast::type_annotation::TypeAnnotation;
    use crate::span::Span;

    fn ctx() -> TypeContext {
        TypeContext::new(CheckerOptions::default())
    }

    fn overload_sig(name: &str, param_ty: &str, ret_ty: &str) -> FunctionDeclaration<()> {
        FunctionDeclaration {
            name: name.to_string(),
            type_parameters: vec![],
            parameters: vec![Parameter {
                name: "x".into(),
                annotation: Some(TypeAnnotation::Named(param_ty.into(), Span::default())),
                default: None,
                optional: false,
                is_rest: false,
                property_modifiers: None,
                span: Span::default(),
            }],
            return_type: Some(TypeAnnotation::Named(ret_ty.into(), Span::default())),
            body: None,
            is_generator: false,
            is_async: false,
            span: Span::default(),
        }
    }

    #[test]
    fn overloads_merge_into_one_object_with_implementation_last() {
        let mut c = ctx();
        let string_overload = overload_sig("f", "string", "string");
        let number_overload = overload_sig("f", "number", "number");
        let mut implementation = overload_sig("f", "any", "any");
        implementation.body = Some(FunctionBody::Block(vec![Statement::Return(
            Some(crate::ast::expression::Expression::Identifier(Identifier::new(
                "x",
                (),
                Span::default(),
            ))),
            Span::default(),
        )]));

        shallow_check_statement(&Statement::FunctionDeclaration(string_overload), &mut c);
        shallow_check_statement(&Statement::FunctionDeclaration(number_overload), &mut c);
        shallow_check_statement(&Statement::FunctionDeclaration(implementation), &mut c);

        let Some(Type::Object(obj)) = c.env.resolve("f") else {
            panic!("expected an overloaded object type");
        };
        assert_eq!(obj.call_signatures.len(), 3);
        assert_eq!(obj.call_signatures[0].parameters[0].ty, Type::String);
        assert_eq!(obj.call_signatures[1].parameters[0].ty, Type::Number);
    }

    #[test]
    fn plain_function_binds_as_bare_function_type() {
        let mut c = ctx();
        let mut decl = overload_sig("g", "number", "number");
        decl.body = Some(FunctionBody::Block(vec![]));
        shallow_check_statement(&Statement::FunctionDeclaration(decl), &mut c);
        assert!(matches!(c.env.resolve("g"), Some(Type::Function(_))));
    }
}
