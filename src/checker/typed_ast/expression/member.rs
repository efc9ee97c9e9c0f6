//! `obj.prop`, `obj?.prop`, `obj[expr]`, `obj?.[expr]`. Consults the
//! narrowing map for a dotted path before falling back to
//! `assignability::property_type_of`, and widens the result with
//! `| undefined` for an optional-chained access.

use crate::ast::expression::{Expression, IndexExpression, MemberExpression};
use crate::checker::assignability::property_type_of;
use crate::checker::context::{ExprInfo, TypeContext};
use crate::checker::error::{
    NotIndexable, PrivateMemberAccess, ProtectedMemberAccess, TypeCheckError, UndefinedProperty,
};
use crate::checker::narrowing::expr_path;
use crate::checker::types::{PropertyVisibility, Type};

pub fn check_member_expression(
    member: MemberExpression<()>,
    ctx: &mut TypeContext,
) -> MemberExpression<ExprInfo> {
    let span = member.span.clone();
    let object = super::infer_expression(*member.object, ctx);
    let object_ty = object.info().get().unwrap_or(Type::Any);

    if object_ty.is_nullish() && !member.optional {
        let _ = ctx.report(TypeCheckError::PossiblyNullish(
            crate::checker::error::PossiblyNullish { ty: object_ty.clone() },
            span.clone(),
        ));
    }

    let path = expr_path(&object).map(|base| format!("{base}.{}", member.property));
    let narrowed = path.as_deref().and_then(|p| ctx.env.lookup_narrowing(p));

    let resolved = narrowed.unwrap_or_else(|| {
        resolve_property(&object_ty, &member.property, &span, ctx)
    });

    let result_ty = if member.optional {
        if object_ty.is_nullish() {
            Type::Undefined
        } else {
            Type::union(vec![resolved, Type::Undefined])
        }
    } else {
        resolved
    };

    MemberExpression {
        object: Box::new(object),
        property: member.property,
        optional: member.optional,
        info: ExprInfo::new(result_ty),
        span,
    }
}

fn resolve_property(
    object_ty: &Type,
    property: &str,
    span: &crate::span::Span,
    ctx: &mut TypeContext,
) -> Type {
    match object_ty {
        Type::Any => Type::Any,
        Type::Null | Type::Undefined => Type::Undefined,
        Type::String => {
            if property == "length" {
                return Type::Number;
            }
            ctx.env
                .prototype_member("String", property)
                .unwrap_or(Type::Any)
        }
        Type::Array(_) => {
            if property == "length" {
                return Type::Number;
            }
            ctx.env
                .prototype_member("Array", property)
                .unwrap_or(Type::Any)
        }
        Type::Object(obj) => {
            if let Some(prop) = obj.find_property(property) {
                if let Some(owner) = &prop.declaring_class {
                    let accessor = ctx.env.resolve("__current_class__");
                    let accessor_name = match &accessor {
                        Some(Type::StringLiteral(name)) => Some(name.as_str()),
                        _ => None,
                    };
                    match prop.visibility {
                        PropertyVisibility::Private if accessor_name != Some(owner.as_str()) => {
                            let _ = ctx.report(TypeCheckError::PrivateMemberAccess(
                                PrivateMemberAccess {
                                    property: property.to_string(),
                                    class: owner.clone(),
                                },
                                span.clone(),
                            ));
                        }
                        PropertyVisibility::Protected
                            if !accessor_name
                                .is_some_and(|name| ctx.env.class_is_or_extends(name, owner)) =>
                        {
                            let _ = ctx.report(TypeCheckError::ProtectedMemberAccess(
                                ProtectedMemberAccess {
                                    property: property.to_string(),
                                    class: owner.clone(),
                                },
                                span.clone(),
                            ));
                        }
                        _ => {}
                    }
                }
                return prop.ty.clone();
            }
            if property == "prototype" && !obj.call_signatures.is_empty() {
                return Type::Any;
            }
            let prototype_kind = if !obj.call_signatures.is_empty() {
                "function"
            } else {
                "object"
            };
            if let Some(ty) = ctx.env.prototype_member(prototype_kind, property) {
                return ty;
            }
            if let Some(index) = &obj.index_signature {
                return index.value_type.clone();
            }
            let _ = ctx.report(TypeCheckError::UndefinedProperty(
                UndefinedProperty {
                    property: property.to_string(),
                    on: object_ty.clone(),
                },
                span.clone(),
            ));
            Type::Any
        }
        Type::Intersection(members) => {
            let mut results = Vec::new();
            for member in members {
                results.push(resolve_property(member, property, span, ctx));
            }
            Type::intersection(results)
        }
        Type::Union(members) => {
            let mut results = Vec::with_capacity(members.len());
            for member in members {
                results.push(resolve_property(member, property, span, ctx));
            }
            Type::union(results)
        }
        _ => {
            if let Some(ty) = property_type_of(object_ty, property) {
                return ty;
            }
            let _ = ctx.report(TypeCheckError::UndefinedProperty(
                UndefinedProperty {
                    property: property.to_string(),
                    on: object_ty.clone(),
                },
                span.clone(),
            ));
            Type::Any
        }
    }
}

pub fn check_index_expression(
    index: IndexExpression<()>,
    ctx: &mut TypeContext,
) -> IndexExpression<ExprInfo> {
    let span = index.span.clone();
    let object = super::infer_expression(*index.object, ctx);
    let object_ty = object.info().get().unwrap_or(Type::Any);
    let key = super::infer_expression(*index.index, ctx);
    let key_ty = key.info().get().unwrap_or(Type::Any);

    let resolved = match (&object_ty, &key_ty) {
        (Type::Any, _) => Type::Any,
        (Type::Array(el), Type::Number) | (Type::Array(el), Type::NumberLiteral(_)) => {
            (**el).clone()
        }
        (Type::Tuple(elements), Type::NumberLiteral(n)) => elements
            .get(*n as usize)
            .map(|e| e.ty.clone())
            .unwrap_or(Type::Undefined),
        (Type::String, Type::Number) | (Type::String, Type::NumberLiteral(_)) => Type::String,
        (Type::Object(obj), Type::StringLiteral(name)) => {
            if let Some(prop) = obj.find_property(name) {
                prop.ty.clone()
            } else if let Some(idx) = &obj.index_signature {
                idx.value_type.clone()
            } else {
                let _ = ctx.report(TypeCheckError::UndefinedProperty(
                    UndefinedProperty { property: name.clone(), on: object_ty.clone() },
                    span.clone(),
                ));
                Type::Any
            }
        }
        (Type::Object(obj), Type::String) | (Type::Object(obj), Type::Number) => obj
            .index_signature
            .as_ref()
            .map(|idx| idx.value_type.clone())
            .unwrap_or(Type::Any),
        (Type::Object(_), Type::Any) => Type::Any,
        _ => {
            let _ = ctx.report(TypeCheckError::NotIndexable(
                NotIndexable { ty: object_ty.clone() },
                span.clone(),
            ));
            Type::Any
        }
    };

    let result_ty = if index.optional {
        Type::union(vec![resolved, Type::Undefined])
    } else {
        resolved
    };

    IndexExpression {
        object: Box::new(object),
        index: Box::new(key),
        optional: index.optional,
        info: ExprInfo::new(result_ty),
        span,
    }
}

/// Whether a class member's `readonly` field may be assigned at this write
/// site: only true inside the defining class's own constructor, through a
/// bare `this.field` receiver.
pub fn is_readonly_write_allowed(
    object: &Expression<ExprInfo>,
    class_name: &str,
    ctx: &TypeContext,
) -> bool {
    if !matches!(object, Expression::This(..)) {
        return false;
    }
    ctx.env
        .resolve("__constructor_of__")
        .map(|ty| matches!(ty, Type::StringLiteral(ref name) if name == class_name))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::expression::Identifier;
    use crate::checker::context::CheckerOptions;
    use crate::span::Span;

    #[test]
    fn string_length_is_number() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        ctx.env.declare_binding("s", Type::String, false).unwrap();
        let member = MemberExpression {
            object: Box::new(Expression::Identifier(Identifier::new("s", (), Span::default()))),
            property: "length".into(),
            optional: false,
            info: (),
            span: Span::default(),
        };
        let checked = check_member_expression(member, &mut ctx);
        assert_eq!(checked.info.get(), Some(Type::Number));
    }

    fn class_with_one_member(
        class_name: &str,
        visibility: PropertyVisibility,
    ) -> Type {
        Type::Object(crate::checker::types::ObjectType {
            kind: crate::checker::types::ObjectKind::Class(class_name.into()),
            type_arguments: vec![],
            properties: vec![crate::checker::types::PropertyType {
                name: "secret".into(),
                ty: Type::Number,
                optional: false,
                readonly: false,
                visibility,
                is_static: false,
                declaring_class: Some(class_name.into()),
            }],
            call_signatures: vec![],
            construct_signatures: vec![],
            index_signature: None,
        })
    }

    fn member_access(object_binding: &str, property: &str) -> MemberExpression<()> {
        MemberExpression {
            object: Box::new(Expression::Identifier(Identifier::new(
                object_binding,
                (),
                Span::default(),
            ))),
            property: property.into(),
            optional: false,
            info: (),
            span: Span::default(),
        }
    }

    #[test]
    fn private_member_is_unreachable_outside_its_class() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        ctx.env
            .declare_binding("o", class_with_one_member("Account", PropertyVisibility::Private), false)
            .unwrap();
        check_member_expression(member_access("o", "secret"), &mut ctx);
        assert_eq!(ctx.diagnostics().len(), 1);
        assert_eq!(ctx.diagnostics()[0].error_code, "TS2341");
    }

    #[test]
    fn private_member_is_reachable_from_its_own_class() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        ctx.env
            .declare_binding("o", class_with_one_member("Account", PropertyVisibility::Private), false)
            .unwrap();
        ctx.env
            .declare_binding("__current_class__", Type::StringLiteral("Account".into()), false)
            .unwrap();
        check_member_expression(member_access("o", "secret"), &mut ctx);
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn protected_member_is_reachable_from_a_subclass() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        ctx.env.declare_superclass("Checking", "Account");
        ctx.env
            .declare_binding("o", class_with_one_member("Account", PropertyVisibility::Protected), false)
            .unwrap();
        ctx.env
            .declare_binding("__current_class__", Type::StringLiteral("Checking".into()), false)
            .unwrap();
        check_member_expression(member_access("o", "secret"), &mut ctx);
        assert!(ctx.diagnostics().is_empty());
    }

    #[test]
    fn protected_member_is_unreachable_from_an_unrelated_class() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        ctx.env
            .declare_binding("o", class_with_one_member("Account", PropertyVisibility::Protected), false)
            .unwrap();
        ctx.env
            .declare_binding("__current_class__", Type::StringLiteral("Wallet".into()), false)
            .unwrap();
        check_member_expression(member_access("o", "secret"), &mut ctx);
        assert_eq!(ctx.diagnostics().len(), 1);
        assert_eq!(ctx.diagnostics()[0].error_code, "TS2445");
    }

    #[test]
    fn optional_chain_result_includes_undefined() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        ctx.env
            .declare_binding("s", Type::union(vec![Type::String, Type::Undefined]), false)
            .unwrap();
        let member = MemberExpression {
            object: Box::new(Expression::Identifier(Identifier::new("s", (), Span::default()))),
            property: "length".into(),
            optional: true,
            info: (),
            span: Span::default(),
        };
        let checked = check_member_expression(member, &mut ctx);
        let Some(Type::Union(members)) = checked.info.get() else {
            panic!("expected union");
        };
        assert!(members.contains(&Type::Undefined));
    }
}
