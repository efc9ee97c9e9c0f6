//! `let`/`const`/`var` declarations, `interface`, and `type` alias
//! statements.

use crate::ast::statement::{
    InterfaceDeclaration, InterfaceMember, TypeAliasDeclaration, VariableDeclaration,
    VariableDeclarator, VariableKind,
};
use crate::ast::type_annotation::TypeAnnotation;
use crate::checker::annotation::resolve_annotation;
use crate::checker::assignability::is_assignable;
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::error::{TypeCheckError, TypeMismatch};
use crate::checker::types::{
    FunctionType, IndexKeyType, IndexSignature, ObjectKind, ObjectType, ParameterType,
    PropertyType, PropertyVisibility, Type, TypeParameterDecl,
};
use crate::checker::typed_ast::expression::destructure;

fn annotation_name(annotation: &TypeAnnotation) -> Option<String> {
    match annotation {
        TypeAnnotation::Named(name, _) | TypeAnnotation::Generic(name, _, _) => Some(name.clone()),
        _ => None,
    }
}

fn upsert_property(props: &mut Vec<PropertyType>, new_prop: PropertyType) {
    if let Some(existing) = props.iter_mut().find(|p| p.name == new_prop.name) {
        *existing = new_prop;
    } else {
        props.push(new_prop);
    }
}

fn resolve_params(
    parameters: &[crate::ast::expression::Parameter<()>],
    ctx: &mut TypeContext,
) -> Vec<ParameterType> {
    parameters
        .iter()
        .map(|p| {
            let ty = match &p.annotation {
                Some(a) => resolve_annotation(a, ctx).unwrap_or(Type::Any),
                None => Type::Any,
            };
            ParameterType {
                name: p.name.clone(),
                ty,
                optional: p.optional,
                is_rest: p.is_rest,
            }
        })
        .collect()
}

pub fn check_variable_declaration(
    decl: VariableDeclaration<()>,
    ctx: &mut TypeContext,
) -> VariableDeclaration<ExprInfo> {
    let mutable = decl.kind != VariableKind::Const;
    let declarations = decl
        .declarations
        .into_iter()
        .map(|d| check_declarator(d, mutable, ctx))
        .collect();
    VariableDeclaration {
        kind: decl.kind,
        declarations,
        span: decl.span,
    }
}

fn check_declarator(
    declarator: VariableDeclarator<()>,
    mutable: bool,
    ctx: &mut TypeContext,
) -> VariableDeclarator<ExprInfo> {
    let span = declarator.span.clone();
    let declared = declarator.annotation.as_ref().and_then(|a| {
        resolve_annotation(a, ctx)
            .map_err(|e| {
                let _ = ctx.report(e);
            })
            .ok()
    });

    let initializer = declarator.initializer.map(|init| match &declared {
        Some(ty) => {
            crate::checker::typed_ast::expression::check_expression_contextual(init, ty, ctx)
        }
        None => crate::checker::typed_ast::expression::infer_expression(init, ctx),
    });

    let binding_ty = match (&declared, &initializer) {
        (Some(declared_ty), Some(init)) => {
            let actual = init.info().get().unwrap_or(Type::Any);
            if !is_assignable(&actual, declared_ty) {
                let _ = ctx.report(TypeCheckError::TypeMismatch(
                    TypeMismatch {
                        expected: declared_ty.clone(),
                        actual,
                    },
                    span.clone(),
                ));
            }
            declared_ty.clone()
        }
        (Some(declared_ty), None) => declared_ty.clone(),
        (None, Some(init)) => {
            let inferred = init.info().get().unwrap_or(Type::Any);
            // An annotation-free inference from a literal initializer widens
            // unless the binding can never be reassigned, so
            // `const x = "a"` keeps the literal type `"a"` but
            // `let x = "a"` widens to `string`.
            if mutable {
                inferred.widen()
            } else {
                inferred
            }
        }
        (None, None) => Type::Any,
    };

    destructure::declare_binding_target(&declarator.binding, &binding_ty, mutable, &span, ctx);

    VariableDeclarator {
        binding: declarator.binding,
        annotation: declarator.annotation,
        initializer,
        span,
    }
}

fn build_interface_type(iface: &InterfaceDeclaration, ctx: &mut TypeContext) -> ObjectType {
    let mut properties: Vec<PropertyType> = Vec::new();
    let mut call_signatures: Vec<FunctionType> = Vec::new();
    let mut index_signature = None;

    for parent in &iface.extends {
        if let Some(name) = annotation_name(parent) {
            if let Some(Type::Object(parent_obj)) = ctx.env.lookup_type(&name) {
                for prop in parent_obj.properties {
                    upsert_property(&mut properties, prop);
                }
                call_signatures.extend(parent_obj.call_signatures);
                if index_signature.is_none() {
                    index_signature = parent_obj.index_signature;
                }
            }
        }
    }

    for member in &iface.members {
        match member {
            InterfaceMember::Property {
                name,
                annotation,
                optional,
                readonly,
                ..
            } => {
                let ty = resolve_annotation(annotation, ctx).unwrap_or(Type::Any);
                upsert_property(
                    &mut properties,
                    PropertyType {
                        name: name.clone(),
                        ty,
                        optional: *optional,
                        readonly: *readonly,
                        visibility: PropertyVisibility::Public,
                        is_static: false,
                        declaring_class: None,
                    },
                );
            }
            InterfaceMember::Method {
                name,
                type_parameters,
                parameters,
                return_type,
                optional,
                ..
            } => {
                ctx.env.enter_scope();
                for tp in type_parameters {
                    ctx.env.declare_type_parameter(tp.name.clone());
                }
                let params = resolve_params(parameters, ctx);
                let ret = resolve_annotation(return_type, ctx).unwrap_or(Type::Any);
                ctx.env.exit_scope();
                let func_ty = Type::Function(FunctionType {
                    type_parameters: type_parameters
                        .iter()
                        .map(|tp| TypeParameterDecl {
                            name: tp.name.clone(),
                            constraint: None,
                            default: None,
                        })
                        .collect(),
                    parameters: params,
                    return_type: Box::new(ret),
                    this_type: None,
                    type_predicate: None,
                });
                upsert_property(
                    &mut properties,
                    PropertyType {
                        name: name.clone(),
                        ty: func_ty,
                        optional: *optional,
                        readonly: false,
                        visibility: PropertyVisibility::Public,
                        is_static: false,
                        declaring_class: None,
                    },
                );
            }
            InterfaceMember::Index {
                key_type,
                value_type,
                ..
            } => {
                let key = resolve_annotation(key_type, ctx).unwrap_or(Type::String);
                let value = resolve_annotation(value_type, ctx).unwrap_or(Type::Any);
                let key_kind = if matches!(key, Type::Number) {
                    IndexKeyType::Number
                } else {
                    IndexKeyType::String
                };
                index_signature = Some(Box::new(IndexSignature {
                    key_type: key_kind,
                    value_type: value,
                }));
            }
            InterfaceMember::Call {
                type_parameters,
                parameters,
                return_type,
                ..
            } => {
                ctx.env.enter_scope();
                for tp in type_parameters {
                    ctx.env.declare_type_parameter(tp.name.clone());
                }
                let params = resolve_params(parameters, ctx);
                let ret = resolve_annotation(return_type, ctx).unwrap_or(Type::Any);
                ctx.env.exit_scope();
                call_signatures.push(FunctionType {
                    type_parameters: type_parameters
                        .iter()
                        .map(|tp| TypeParameterDecl {
                            name: tp.name.clone(),
                            constraint: None,
                            default: None,
                        })
                        .collect(),
                    parameters: params,
                    return_type: Box::new(ret),
                    this_type: None,
                    type_predicate: None,
                });
            }
        }
    }

    ObjectType {
        kind: ObjectKind::Interface(iface.name.clone()),
        type_arguments: iface
            .type_parameters
            .iter()
            .map(|tp| Type::TypeParameter(tp.name.clone()))
            .collect(),
        properties,
        call_signatures,
        construct_signatures: vec![],
        index_signature,
    }
}

pub fn shallow_check_interface(iface: &InterfaceDeclaration, ctx: &mut TypeContext) {
    ctx.env.declare_generic_params(
        iface.name.clone(),
        iface.type_parameters.iter().map(|tp| tp.name.clone()).collect(),
    );
    ctx.env.enter_scope();
    for tp in &iface.type_parameters {
        ctx.env.declare_type_parameter(tp.name.clone());
    }
    let obj = build_interface_type(iface, ctx);
    ctx.env.exit_scope();
    ctx.env.declare_type(iface.name.clone(), Type::Object(obj));
}

/// Interfaces carry no body, and `Statement<T>` wraps `InterfaceDeclaration`
/// unchanged regardless of `T` (there's no per-node annotation to fill in),
/// so the "full" pass just rebuilds the shape once more, picking up any
/// forward reference that only became resolvable after the shallow pass.
pub fn check_interface(iface: InterfaceDeclaration, ctx: &mut TypeContext) -> InterfaceDeclaration {
    shallow_check_interface(&iface, ctx);
    iface
}

pub fn shallow_check_type_alias(alias: &TypeAliasDeclaration, ctx: &mut TypeContext) {
    ctx.env.declare_generic_params(
        alias.name.clone(),
        alias.type_parameters.iter().map(|tp| tp.name.clone()).collect(),
    );
    ctx.env.enter_scope();
    for tp in &alias.type_parameters {
        ctx.env.declare_type_parameter(tp.name.clone());
    }
    let resolved = resolve_annotation(&alias.annotation, ctx);
    ctx.env.exit_scope();
    match resolved {
        Ok(ty) => ctx.env.declare_type(alias.name.clone(), ty),
        Err(err) => {
            let _ = ctx.report(err);
            ctx.env.declare_type(alias.name.clone(), Type::Any);
        }
    }
}

pub fn check_type_alias(alias: TypeAliasDeclaration, ctx: &mut TypeContext) -> TypeAliasDeclaration {
    shallow_check_type_alias(&alias, ctx);
    alias
}
