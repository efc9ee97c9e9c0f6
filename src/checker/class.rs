//! Class declarations: two checking passes mirroring the
//! program-level shallow/full split. `shallow_check_class` registers a
//! preliminary instance/constructor shape (every member's declared type,
//! no bodies checked) under the class's own name so forward references
//! from sibling top-level declarations resolve; `check_class` rebuilds the
//! same shape, checks every method/constructor/getter/setter body with
//! `this` (and, for a derived class, `super`) bound, validates
//! `implements`, and rebinds the class name to the final types.
//!
//! `ObjectType` has no base-class list, so `extends` is handled by
//! flattening the parent's instance properties directly into the
//! subclass's own `properties` before any of its own members are applied.

use std::collections::HashMap;

use crate::ast::expression::Parameter;
use crate::ast::statement::{ClassDeclaration, ClassMember, Visibility};
use crate::ast::type_annotation::TypeAnnotation;
use crate::checker::annotation::resolve_annotation;
use crate::checker::assignability::is_assignable;
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::error::{MissingOverrideBody, TypeCheckError, TypeMismatch};
use crate::checker::function::check_function_like;
use crate::checker::types::{
    FunctionType, IndexKeyType, IndexSignature, ObjectKind, ObjectType, ParameterType,
    PropertyType, PropertyVisibility, Type, TypeParameterDecl,
};

fn to_property_visibility(v: Visibility) -> PropertyVisibility {
    match v {
        Visibility::Public => PropertyVisibility::Public,
        Visibility::Protected => PropertyVisibility::Protected,
        Visibility::Private => PropertyVisibility::Private,
    }
}

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

fn resolve_signature_params(parameters: &[Parameter<()>], ctx: &mut TypeContext) -> Vec<ParameterType> {
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

fn resolve_return(return_type: &Option<TypeAnnotation>, ctx: &mut TypeContext) -> Type {
    match return_type {
        Some(a) => resolve_annotation(a, ctx).unwrap_or(Type::Any),
        None => Type::Any,
    }
}

struct AccessorSlot {
    ty: Type,
    has_setter: bool,
    visibility: PropertyVisibility,
    is_static: bool,
}

/// Pure signature pass: resolve every member's declared type without
/// checking any body. Used identically by the shallow and full passes,
/// since body checking never changes a member's slot type in this model.
fn build_types(class: &ClassDeclaration<()>, ctx: &mut TypeContext) -> (ObjectType, ObjectType) {
    let mut instance_properties: Vec<PropertyType> = Vec::new();
    let mut static_properties: Vec<PropertyType> = Vec::new();
    let mut index_signature = None;
    let mut ctor_params: Vec<ParameterType> = Vec::new();

    if let Some(parent) = &class.extends {
        if let Some(name) = annotation_name(parent) {
            if let Some(Type::Object(parent_obj)) = ctx.env.lookup_type(&name) {
                instance_properties = parent_obj.properties;
            }
        }
    }

    let mut accessors: HashMap<String, AccessorSlot> = HashMap::new();

    for member in &class.members {
        match member {
            ClassMember::Property { name, annotation, modifiers, optional, .. } => {
                let ty = match annotation {
                    Some(a) => resolve_annotation(a, ctx).unwrap_or(Type::Any),
                    None => Type::Any,
                };
                let prop = PropertyType {
                    name: name.clone(),
                    ty,
                    optional: *optional,
                    readonly: modifiers.is_readonly,
                    visibility: to_property_visibility(modifiers.visibility),
                    is_static: modifiers.is_static,
                    declaring_class: Some(class.name.clone()),
                };
                let target = if modifiers.is_static { &mut static_properties } else { &mut instance_properties };
                upsert_property(target, prop);
            }
            ClassMember::Method { name, type_parameters, parameters, return_type, modifiers, .. } => {
                ctx.env.enter_scope();
                for tp in type_parameters {
                    ctx.env.declare_type_parameter(tp.name.clone());
                }
                let params = resolve_signature_params(parameters, ctx);
                let ret = resolve_return(return_type, ctx);
                ctx.env.exit_scope();
                let func_ty = Type::Function(FunctionType {
                    type_parameters: type_parameters
                        .iter()
                        .map(|tp| TypeParameterDecl { name: tp.name.clone(), constraint: None, default: None })
                        .collect(),
                    parameters: params,
                    return_type: Box::new(ret),
                    this_type: None,
                    type_predicate: None,
                });
                let prop = PropertyType {
                    name: name.clone(),
                    ty: func_ty,
                    optional: false,
                    readonly: false,
                    visibility: to_property_visibility(modifiers.visibility),
                    is_static: modifiers.is_static,
                    declaring_class: Some(class.name.clone()),
                };
                let target = if modifiers.is_static { &mut static_properties } else { &mut instance_properties };
                upsert_property(target, prop);
            }
            ClassMember::Constructor { parameters, .. } => {
                ctor_params = resolve_signature_params(parameters, ctx);
                for (param, resolved) in parameters.iter().zip(&ctor_params) {
                    if let Some(modifiers) = param.property_modifiers {
                        upsert_property(
                            &mut instance_properties,
                            PropertyType {
                                name: resolved.name.clone(),
                                ty: resolved.ty.clone(),
                                optional: resolved.optional,
                                readonly: modifiers.is_readonly,
                                visibility: to_property_visibility(modifiers.visibility),
                                is_static: false,
                                declaring_class: Some(class.name.clone()),
                            },
                        );
                    }
                }
            }
            ClassMember::Getter { name, return_type, modifiers, .. } => {
                let ret = resolve_return(return_type, ctx);
                accessors
                    .entry(name.clone())
                    .and_modify(|a| a.ty = ret.clone())
                    .or_insert(AccessorSlot {
                        ty: ret,
                        has_setter: false,
                        visibility: to_property_visibility(modifiers.visibility),
                        is_static: modifiers.is_static,
                    });
            }
            ClassMember::Setter { name, parameter, modifiers, .. } => {
                let ty = match &parameter.annotation {
                    Some(a) => resolve_annotation(a, ctx).unwrap_or(Type::Any),
                    None => Type::Any,
                };
                accessors
                    .entry(name.clone())
                    .and_modify(|a| a.has_setter = true)
                    .or_insert(AccessorSlot {
                        ty,
                        has_setter: true,
                        visibility: to_property_visibility(modifiers.visibility),
                        is_static: modifiers.is_static,
                    });
            }
            ClassMember::Index { key_type, value_type, .. } => {
                let key = resolve_annotation(key_type, ctx).unwrap_or(Type::String);
                let value = resolve_annotation(value_type, ctx).unwrap_or(Type::Any);
                let key_kind = if matches!(key, Type::Number) { IndexKeyType::Number } else { IndexKeyType::String };
                index_signature = Some(Box::new(IndexSignature { key_type: key_kind, value_type: value }));
            }
        }
    }

    for (name, slot) in accessors {
        let prop = PropertyType {
            name,
            ty: slot.ty,
            optional: false,
            readonly: !slot.has_setter,
            visibility: slot.visibility,
            is_static: slot.is_static,
            declaring_class: Some(class.name.clone()),
        };
        let target = if slot.is_static { &mut static_properties } else { &mut instance_properties };
        upsert_property(target, prop);
    }

    let instance = ObjectType {
        kind: ObjectKind::Class(class.name.clone()),
        type_arguments: class.type_parameters.iter().map(|tp| Type::TypeParameter(tp.name.clone())).collect(),
        properties: instance_properties,
        call_signatures: vec![],
        construct_signatures: vec![],
        index_signature,
    };

    // An abstract class carries no construct signature, so `new` on it
    // falls into call.rs's "no signatures" / NotCallable path rather than
    // a dedicated AbstractInstantiation diagnostic.
    let construct_signatures = if class.is_abstract {
        vec![]
    } else {
        vec![FunctionType {
            type_parameters: class
                .type_parameters
                .iter()
                .map(|tp| TypeParameterDecl { name: tp.name.clone(), constraint: None, default: None })
                .collect(),
            parameters: ctor_params,
            return_type: Box::new(Type::Object(instance.clone())),
            this_type: None,
            type_predicate: None,
        }]
    };

    let ctor = ObjectType {
        kind: ObjectKind::Class(class.name.clone()),
        type_arguments: vec![],
        properties: static_properties,
        call_signatures: vec![],
        construct_signatures,
        index_signature: None,
    };

    (instance, ctor)
}

/// Phase A: declare a preliminary shape under the class's own name, so
/// top-level declarations checked before this class's full pass can still
/// reference it.
pub fn shallow_check_class(class: &ClassDeclaration<()>, ctx: &mut TypeContext) {
    ctx.env.declare_generic_params(
        class.name.clone(),
        class.type_parameters.iter().map(|tp| tp.name.clone()).collect(),
    );
    if let Some(parent) = class.extends.as_ref().and_then(annotation_name) {
        ctx.env.declare_superclass(class.name.clone(), parent);
    }
    ctx.env.enter_scope();
    for tp in &class.type_parameters {
        ctx.env.declare_type_parameter(tp.name.clone());
    }
    let (instance, ctor) = build_types(class, ctx);
    ctx.env.exit_scope();

    ctx.env.declare_type(class.name.clone(), Type::Object(instance));
    let _ = ctx.env.declare_binding(class.name.clone(), Type::Object(ctor), false);
}

/// Merge the parent's instance members and constructor signature into a
/// single type usable both as `super(...)` (a construct signature) and
/// `super.member` (instance properties) inside a derived class.
fn parent_super_binding(annotation: &TypeAnnotation, ctx: &mut TypeContext) -> Option<Type> {
    let parent_name = annotation_name(annotation)?;
    let instance = ctx.env.lookup_type(&parent_name)?;
    let ctor = ctx.env.resolve(&parent_name)?;
    let (Type::Object(inst), Type::Object(ctor)) = (instance, ctor) else { return None };
    Some(Type::Object(ObjectType {
        kind: ObjectKind::Class(parent_name),
        type_arguments: vec![],
        properties: inst.properties,
        call_signatures: vec![],
        construct_signatures: ctor.construct_signatures,
        index_signature: inst.index_signature,
    }))
}

/// Phase B-D: rebuild the shape, check every member body with `this`/
/// `super` bound, validate `implements`, and rebind the final types.
pub fn check_class(class: ClassDeclaration<()>, ctx: &mut TypeContext) -> ClassDeclaration<ExprInfo> {
    let span = class.span.clone();

    ctx.env.enter_scope();
    for tp in &class.type_parameters {
        ctx.env.declare_type_parameter(tp.name.clone());
    }

    let (instance, ctor) = build_types(&class, ctx);

    if let Some(parent) = &class.extends {
        if let Some(super_ty) = parent_super_binding(parent, ctx) {
            let _ = ctx.env.declare_binding("super", super_ty, false);
        }
    }

    for implemented in &class.implements {
        match resolve_annotation(implemented, ctx) {
            Ok(iface_ty) => {
                if !is_assignable(&Type::Object(instance.clone()), &iface_ty) {
                    let _ = ctx.report(TypeCheckError::TypeMismatch(
                        TypeMismatch { expected: iface_ty, actual: Type::Object(instance.clone()) },
                        span.clone(),
                    ));
                }
            }
            Err(err) => {
                let _ = ctx.report(err);
            }
        }
    }

    let instance_ty = Type::Object(instance.clone());
    let _ = ctx
        .env
        .declare_binding("__current_class__", Type::StringLiteral(class.name.clone()), false);
    let mut checked_members = Vec::with_capacity(class.members.len());
    for member in class.members {
        checked_members.push(check_member(member, &instance_ty, ctx));
    }

    ctx.env.exit_scope();

    ctx.env.declare_type(class.name.clone(), instance_ty);
    ctx.env.update_binding(&class.name, Type::Object(ctor));

    ClassDeclaration {
        name: class.name,
        type_parameters: class.type_parameters,
        extends: class.extends,
        implements: class.implements,
        is_abstract: class.is_abstract,
        members: checked_members,
        span,
    }
}

fn check_member(member: ClassMember<()>, instance_ty: &Type, ctx: &mut TypeContext) -> ClassMember<ExprInfo> {
    match member {
        ClassMember::Property { name, annotation, initializer, optional, modifiers, span } => {
            let declared_ty = match &annotation {
                Some(a) => resolve_annotation(a, ctx).unwrap_or(Type::Any),
                None => Type::Any,
            };
            let has_annotation = annotation.is_some();
            let checked_init = initializer.map(|init| {
                ctx.env.enter_scope();
                let _ = ctx.env.declare_binding("this", instance_ty.clone(), false);
                let checked = if has_annotation {
                    super::typed_ast::expression::check_expression_contextual(init, &declared_ty, ctx)
                } else {
                    super::typed_ast::expression::infer_expression(init, ctx)
                };
                ctx.env.exit_scope();
                checked
            });
            if has_annotation {
                if let Some(checked) = &checked_init {
                    let actual = checked.info().get().unwrap_or(Type::Any);
                    if !is_assignable(&actual, &declared_ty) {
                        let _ = ctx.report(TypeCheckError::TypeMismatch(
                            TypeMismatch { expected: declared_ty.clone(), actual },
                            span.clone(),
                        ));
                    }
                }
            }
            ClassMember::Property { name, annotation, initializer: checked_init, optional, modifiers, span }
        }
        ClassMember::Method { name, type_parameters, parameters, return_type, body, modifiers, span } => {
            let had_body = body.is_some();
            let method_ty_names: Vec<String> = type_parameters.iter().map(|p| p.name.clone()).collect();
            let checked = check_function_like(&method_ty_names, parameters, return_type.clone(), body, Some(instance_ty.clone()), ctx);
            if !had_body && !modifiers.is_abstract {
                let _ = ctx.report(TypeCheckError::MissingOverrideBody(
                    MissingOverrideBody { name: name.clone() },
                    span.clone(),
                ));
            }
            ClassMember::Method {
                name,
                type_parameters,
                parameters: checked.checked_parameters,
                return_type,
                body: checked.checked_body,
                modifiers,
                span,
            }
        }
        ClassMember::Constructor { parameters, body, modifiers, span } => {
            let had_body = body.is_some();
            ctx.env.enter_scope();
            if let Type::Object(obj) = instance_ty {
                if let ObjectKind::Class(name) = &obj.kind {
                    let _ = ctx.env.declare_binding("__constructor_of__", Type::StringLiteral(name.clone()), false);
                }
            }
            let checked = check_function_like(&[], parameters, None, body, Some(instance_ty.clone()), ctx);
            ctx.env.exit_scope();
            if !had_body {
                let _ = ctx.report(TypeCheckError::MissingOverrideBody(
                    MissingOverrideBody { name: "constructor".to_string() },
                    span.clone(),
                ));
            }
            ClassMember::Constructor {
                parameters: checked.checked_parameters,
                body: checked.checked_body,
                modifiers,
                span,
            }
        }
        ClassMember::Getter { name, return_type, body, modifiers, span } => {
            let checked = check_function_like(&[], vec![], return_type.clone(), Some(body), Some(instance_ty.clone()), ctx);
            ClassMember::Getter {
                name,
                return_type,
                body: checked.checked_body.expect("getter body always provided"),
                modifiers,
                span,
            }
        }
        ClassMember::Setter { name, parameter, body, modifiers, span } => {
            let checked = check_function_like(&[], vec![parameter], None, Some(body), Some(instance_ty.clone()), ctx);
            let parameter = checked
                .checked_parameters
                .into_iter()
                .next()
                .expect("setter has exactly one parameter");
            ClassMember::Setter {
                name,
                parameter,
                body: checked.checked_body.expect("setter body always provided"),
                modifiers,
                span,
            }
        }
        ClassMember::Index { key_name, key_type, value_type, span } => {
            ClassMember::Index { key_name, key_type, value_type, span }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expression::FunctionBody;
    use crate::checker::context::CheckerOptions;
    use crate::span::Span;

    fn ctx() -> TypeContext {
        TypeContext::new(CheckerOptions::default())
    }

    #[test]
    fn shallow_then_full_pass_bind_instance_and_constructor() {
        let mut c = ctx();
        let class = ClassDeclaration::<()> {
            name: "Point".into(),
            type_parameters: vec![],
            extends: None,
            implements: vec![],
            is_abstract: false,
            members: vec![ClassMember::Property {
                name: "x".into(),
                annotation: Some(TypeAnnotation::Named("number".into(), Span::default())),
                initializer: None,
                optional: false,
                modifiers: crate::ast::statement::MemberModifiers::default(),
                span: Span::default(),
            }],
            span: Span::default(),
        };

        shallow_check_class(&class, &mut c);
        assert!(matches!(c.env.lookup_type("Point"), Some(Type::Object(_))));
        assert!(c.env.resolve("Point").is_some());

        let checked = check_class(class, &mut c);
        assert_eq!(checked.members.len(), 1);
        assert!(c.diagnostics().is_empty());
    }

    #[test]
    fn constructor_parameter_property_synthesizes_an_instance_field() {
        let mut c = ctx();
        let class = ClassDeclaration::<()> {
            name: "Point".into(),
            type_parameters: vec![],
            extends: None,
            implements: vec![],
            is_abstract: false,
            members: vec![ClassMember::Constructor {
                parameters: vec![Parameter {
                    name: "x".into(),
                    annotation: Some(TypeAnnotation::Named("number".into(), Span::default())),
                    default: None,
                    optional: false,
                    is_rest: false,
                    property_modifiers: Some(crate::ast::statement::MemberModifiers {
                        visibility: crate::ast::statement::Visibility::Private,
                        ..Default::default()
                    }),
                    span: Span::default(),
                }],
                body: Some(FunctionBody::Block(vec![])),
                modifiers: crate::ast::statement::MemberModifiers::default(),
                span: Span::default(),
            }],
            span: Span::default(),
        };

        shallow_check_class(&class, &mut c);
        let Some(Type::Object(instance)) = c.env.lookup_type("Point") else {
            panic!("expected instance type");
        };
        let field = instance.find_property("x").expect("synthesized field");
        assert_eq!(field.ty, Type::Number);
        assert_eq!(field.visibility, PropertyVisibility::Private);
        assert_eq!(field.declaring_class.as_deref(), Some("Point"));

        check_class(class, &mut c);
        assert!(c.diagnostics().is_empty());
    }

    #[test]
    fn concrete_method_without_body_reports_missing_override() {
        let mut c = ctx();
        let class = ClassDeclaration::<()> {
            name: "Shape".into(),
            type_parameters: vec![],
            extends: None,
            implements: vec![],
            is_abstract: false,
            members: vec![ClassMember::Method {
                name: "area".into(),
                type_parameters: vec![],
                parameters: vec![],
                return_type: Some(TypeAnnotation::Named("number".into(), Span::default())),
                body: None,
                modifiers: crate::ast::statement::MemberModifiers::default(),
                span: Span::default(),
            }],
            span: Span::default(),
        };
        shallow_check_class(&class, &mut c);
        check_class(class, &mut c);
        assert!(c
            .diagnostics()
            .iter()
            .any(|d| d.error_code == "TS2391"));
    }

    #[test]
    fn abstract_class_gets_no_construct_signature() {
        let mut c = ctx();
        let class = ClassDeclaration::<()> {
            name: "Base".into(),
            type_parameters: vec![],
            extends: None,
            implements: vec![],
            is_abstract: true,
            members: vec![],
            span: Span::default(),
        };
        shallow_check_class(&class, &mut c);
        let Some(Type::Object(ctor)) = c.env.resolve("Base") else {
            panic!("expected constructor binding");
        };
        assert!(ctor.construct_signatures.is_empty());
    }

    #[test]
    fn readonly_field_only_writable_inside_own_constructor() {
        let mut c = ctx();
        let class = ClassDeclaration::<()> {
            name: "Box".into(),
            type_parameters: vec![],
            extends: None,
            implements: vec![],
            is_abstract: false,
            members: vec![
                ClassMember::Property {
                    name: "value".into(),
                    annotation: Some(TypeAnnotation::Named("number".into(), Span::default())),
                    initializer: None,
                    optional: false,
                    modifiers: crate::ast::statement::MemberModifiers {
                        is_readonly: true,
                        ..Default::default()
                    },
                    span: Span::default(),
                },
                ClassMember::Constructor {
                    parameters: vec![],
                    body: Some(FunctionBody::Block(vec![])),
                    modifiers: crate::ast::statement::MemberModifiers::default(),
                    span: Span::default(),
                },
            ],
            span: Span::default(),
        };
        shallow_check_class(&class, &mut c);
        let checked = check_class(class, &mut c);
        assert!(c.diagnostics().is_empty());
        assert_eq!(checked.members.len(), 2);
    }
}
