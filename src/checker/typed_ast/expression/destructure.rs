//! Destructuring, shared by `let [a, b] = ...` / `const { a } = ...`
//! declarations and `[a, b] = ...` assignment expressions.
//!
//! Array patterns pick element types from `Tuple` vs `Array` vs a union
//! containing an array-like member; object patterns pick property types
//! from `ObjectType` vs `Any` vs a union containing an object. Rest
//! targets get an array/object type of the leftover elements/properties.
//! Unrecognized pattern positions (an elision, `[, b] = xs`) are simply
//! skipped.

use crate::ast::expression::{Expression, ObjectProperty, PropertyKey};
use crate::ast::statement::{ArrayBindingElement, BindingTarget, ObjectBindingProperty};
use crate::checker::assignability::is_assignable;
use crate::checker::context::TypeContext;
use crate::checker::error::{TypeCheckError, TypeMismatch};
use crate::checker::types::{ObjectKind, ObjectType, PropertyType, PropertyVisibility, Type};
use crate::span::Span;

/// Declare every identifier named by `target` in the current scope, typed
/// from `value_ty` by position/key, and report a mismatch for any default
/// whose type doesn't fit the slot it falls back into.
pub fn declare_binding_target(
    target: &BindingTarget,
    value_ty: &Type,
    mutable: bool,
    span: &Span,
    ctx: &mut TypeContext,
) {
    match target {
        BindingTarget::Identifier(name) => {
            let _ = ctx.env.declare_binding(name.clone(), value_ty.clone(), mutable);
        }
        BindingTarget::Array(elements) => {
            for (i, el) in elements.iter().enumerate() {
                if el.is_rest {
                    let rest_ty = rest_array_type(value_ty, i);
                    if let Some(target) = &el.target {
                        declare_binding_target(target, &rest_ty, mutable, span, ctx);
                    }
                    break;
                }
                let element_ty = array_element_type(value_ty, i, span, ctx);
                if let Some(target) = &el.target {
                    declare_binding_target(target, &element_ty, mutable, span, ctx);
                }
            }
        }
        BindingTarget::Object(properties) => {
            let mut taken = Vec::new();
            for prop in properties {
                if prop.is_rest {
                    let rest_ty = rest_object_type(value_ty, &taken);
                    declare_binding_target(&prop.target, &rest_ty, mutable, span, ctx);
                    continue;
                }
                taken.push(prop.key.clone());
                let property_ty = object_property_type(value_ty, &prop.key, span, ctx);
                declare_binding_target(&prop.target, &property_ty, mutable, span, ctx);
            }
        }
    }
}

fn array_element_type(value_ty: &Type, index: usize, span: &Span, ctx: &mut TypeContext) -> Type {
    match value_ty {
        Type::Tuple(elements) => elements.get(index).map(|e| e.ty.clone()).unwrap_or(Type::Undefined),
        Type::Array(el) => (**el).clone(),
        Type::Any => Type::Any,
        Type::Union(members) => {
            for m in members {
                if matches!(m, Type::Array(_) | Type::Tuple(_)) {
                    return array_element_type(m, index, span, ctx);
                }
            }
            let _ = ctx.report(TypeCheckError::TypeMismatch(
                TypeMismatch {
                    expected: Type::Array(Box::new(Type::Unknown)),
                    actual: value_ty.clone(),
                },
                span.clone(),
            ));
            Type::Any
        }
        _ => {
            let _ = ctx.report(TypeCheckError::TypeMismatch(
                TypeMismatch {
                    expected: Type::Array(Box::new(Type::Unknown)),
                    actual: value_ty.clone(),
                },
                span.clone(),
            ));
            Type::Any
        }
    }
}

fn rest_array_type(value_ty: &Type, from_index: usize) -> Type {
    match value_ty {
        Type::Tuple(elements) => Type::Array(Box::new(Type::union(
            elements.iter().skip(from_index).map(|e| e.ty.clone()).collect(),
        ))),
        Type::Array(el) => Type::Array(el.clone()),
        other => Type::Array(Box::new(other.clone())),
    }
}

fn object_property_type(value_ty: &Type, key: &str, span: &Span, ctx: &mut TypeContext) -> Type {
    match value_ty {
        Type::Any => Type::Any,
        Type::Object(obj) => obj
            .find_property(key)
            .map(|p| p.ty.clone())
            .or_else(|| obj.index_signature.as_ref().map(|i| i.value_type.clone()))
            .unwrap_or_else(|| {
                let _ = ctx.report(TypeCheckError::UndefinedProperty(
                    crate::checker::error::UndefinedProperty {
                        property: key.to_string(),
                        on: value_ty.clone(),
                    },
                    span.clone(),
                ));
                Type::Any
            }),
        Type::Union(members) => {
            let mut types = Vec::new();
            for m in members {
                if let Type::Object(obj) = m {
                    if let Some(p) = obj.find_property(key) {
                        types.push(p.ty.clone());
                        continue;
                    }
                }
                if matches!(m, Type::Any) {
                    types.push(Type::Any);
                }
            }
            if types.is_empty() {
                Type::Any
            } else {
                Type::union(types)
            }
        }
        _ => {
            let _ = ctx.report(TypeCheckError::UndefinedProperty(
                crate::checker::error::UndefinedProperty {
                    property: key.to_string(),
                    on: value_ty.clone(),
                },
                span.clone(),
            ));
            Type::Any
        }
    }
}

fn rest_object_type(value_ty: &Type, taken: &[String]) -> Type {
    match value_ty {
        Type::Object(obj) => {
            let properties = obj
                .properties
                .iter()
                .filter(|p| !taken.contains(&p.name))
                .cloned()
                .collect();
            Type::Object(ObjectType {
                kind: ObjectKind::Anonymous,
                type_arguments: vec![],
                properties,
                call_signatures: vec![],
                construct_signatures: vec![],
                index_signature: obj.index_signature.clone(),
            })
        }
        other => other.clone(),
    }
}

/// Assignment-expression destructuring: `[a, b] = value` / `{a, b} = value`,
/// where the pattern is written as an ordinary array/object literal
/// expression on the left of `=`. Recurses structurally; leaf identifiers
/// and member expressions are checked for plain assignability against the
/// picked slot type rather than re-declared.
pub fn check_assignment_pattern(
    pattern: Expression<()>,
    value_ty: &Type,
    ctx: &mut TypeContext,
) -> Expression<crate::checker::context::ExprInfo> {
    match pattern {
        Expression::ArrayLiteral(array) => {
            let span = array.span.clone();
            let mut elements = Vec::with_capacity(array.elements.len());
            for (i, el) in array.elements.into_iter().enumerate() {
                if let Expression::Spread(spread) = el {
                    let rest_ty = rest_array_type(value_ty, i);
                    let checked = check_assignment_pattern(*spread.argument, &rest_ty, ctx);
                    elements.push(Expression::Spread(crate::ast::expression::SpreadElement {
                        argument: Box::new(checked),
                        info: crate::checker::context::ExprInfo::new(rest_ty),
                        span: spread.span,
                    }));
                    break;
                }
                let slot_ty = array_element_type(value_ty, i, &span, ctx);
                elements.push(check_assignment_pattern(el, &slot_ty, ctx));
            }
            Expression::ArrayLiteral(crate::ast::expression::ArrayLiteral {
                elements,
                info: crate::checker::context::ExprInfo::new(value_ty.clone()),
                span,
            })
        }
        Expression::ObjectLiteral(object) => {
            let span = object.span.clone();
            let mut properties = Vec::with_capacity(object.properties.len());
            let mut taken = Vec::new();
            for prop in object.properties {
                match prop {
                    ObjectProperty::KeyValue { key, value, span } => {
                        let name = match &key {
                            PropertyKey::Identifier(n) | PropertyKey::StringLiteral(n) => n.clone(),
                            PropertyKey::NumberLiteral(n) => n.to_string(),
                        };
                        taken.push(name.clone());
                        let slot_ty = object_property_type(value_ty, &name, &span, ctx);
                        let checked_value = check_assignment_pattern(value, &slot_ty, ctx);
                        properties.push(ObjectProperty::KeyValue {
                            key,
                            value: checked_value,
                            span,
                        });
                    }
                    ObjectProperty::Spread { argument, span } => {
                        let rest_ty = rest_object_type(value_ty, &taken);
                        let checked = check_assignment_pattern(argument, &rest_ty, ctx);
                        properties.push(ObjectProperty::Spread { argument: checked, span });
                    }
                    ObjectProperty::Computed { key, value, span } => {
                        let checked_key = super::infer_expression(key, ctx);
                        let checked_value = super::infer_expression(value, ctx);
                        properties.push(ObjectProperty::Computed {
                            key: checked_key,
                            value: checked_value,
                            span,
                        });
                    }
                }
            }
            Expression::ObjectLiteral(crate::ast::expression::ObjectLiteral {
                properties,
                info: crate::checker::context::ExprInfo::new(value_ty.clone()),
                span,
            })
        }
        other => {
            let checked = super::infer_expression(other, ctx);
            let target_ty = checked.info().get().unwrap_or(Type::Any);
            if !is_assignable(value_ty, &target_ty) {
                let _ = ctx.report(TypeCheckError::TypeMismatch(
                    TypeMismatch {
                        expected: target_ty,
                        actual: value_ty.clone(),
                    },
                    checked.span(),
                ));
            }
            checked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::context::CheckerOptions;
    use crate::span::Span;

    #[test]
    fn array_pattern_binds_tuple_elements() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        let target = BindingTarget::Array(vec![
            ArrayBindingElement { target: Some(BindingTarget::Identifier("a".into())), default: None, is_rest: false },
            ArrayBindingElement { target: Some(BindingTarget::Identifier("b".into())), default: None, is_rest: false },
        ]);
        let value_ty = Type::Tuple(vec![
            crate::checker::types::TupleElement { ty: Type::Number, optional: false, is_rest: false },
            crate::checker::types::TupleElement { ty: Type::String, optional: false, is_rest: false },
        ]);
        declare_binding_target(&target, &value_ty, true, &Span::default(), &mut ctx);
        assert_eq!(ctx.env.resolve("a"), Some(Type::Number));
        assert_eq!(ctx.env.resolve("b"), Some(Type::String));
    }

    #[test]
    fn object_pattern_binds_property_types() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        let target = BindingTarget::Object(vec![ObjectBindingProperty {
            key: "a".into(),
            target: BindingTarget::Identifier("a".into()),
            default: None,
            is_rest: false,
        }]);
        let value_ty = Type::Object(ObjectType {
            kind: ObjectKind::Anonymous,
            type_arguments: vec![],
            properties: vec![PropertyType {
                name: "a".into(),
                ty: Type::Boolean,
                optional: false,
                readonly: false,
                visibility: PropertyVisibility::Public,
                is_static: false,
                declaring_class: None,
            }],
            call_signatures: vec![],
            construct_signatures: vec![],
            index_signature: None,
        });
        declare_binding_target(&target, &value_ty, true, &Span::default(), &mut ctx);
        assert_eq!(ctx.env.resolve("a"), Some(Type::Boolean));
    }
}
