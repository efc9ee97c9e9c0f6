//! Structural assignability: is a value of type `from` usable where a value
//! of type `to` is expected? This is the single predicate every other
//! checking rule (variable initializers, call arguments, return statements,
//! assignment expressions) is ultimately expressed in terms of.

use crate::checker::context::RecursionGuard;
use crate::checker::types::{ObjectKind, ObjectType, Type};

pub fn is_assignable(from: &Type, to: &Type) -> bool {
    is_assignable_guarded(from, to, &RecursionGuard::new(256))
}

fn is_assignable_guarded(from: &Type, to: &Type, guard: &RecursionGuard) -> bool {
    // Self-referential structural types (a class with a property of its own
    // type) would otherwise recurse forever; once the depth ceiling trips,
    // assume compatible rather than erroring out of an assignability check
    // that isn't the one reporting diagnostics directly.
    let Ok(guard) = guard.enter(&crate::span::Span::default()) else {
        return true;
    };

    match (from, to) {
        (_, Type::Any) | (Type::Any, _) => true,
        (_, Type::Unknown) => true,
        (Type::Never, _) => true,
        (_, Type::Never) => false,

        (Type::NumberLiteral(_), Type::Number) => true,
        (Type::StringLiteral(_), Type::String) => true,
        (Type::BooleanLiteral(_), Type::Boolean) => true,

        (Type::Number, Type::Number)
        | (Type::String, Type::String)
        | (Type::Boolean, Type::Boolean)
        | (Type::Void, Type::Void)
        | (Type::Null, Type::Null)
        | (Type::Undefined, Type::Undefined) => true,

        (Type::NumberLiteral(a), Type::NumberLiteral(b)) => a == b,
        (Type::StringLiteral(a), Type::StringLiteral(b)) => a == b,
        (Type::BooleanLiteral(a), Type::BooleanLiteral(b)) => a == b,

        (Type::TypeParameter(a), Type::TypeParameter(b)) => a == b,

        (Type::Array(a), Type::Array(b)) => is_assignable_guarded(a, b, &guard),

        (Type::Tuple(a), Type::Array(b)) => {
            a.iter().all(|el| is_assignable_guarded(&el.ty, b, &guard))
        }

        (Type::Tuple(a), Type::Tuple(b)) => {
            let required_b = b.iter().filter(|e| !e.optional && !e.is_rest).count();
            if a.len() < required_b {
                return false;
            }
            a.iter().zip(b).all(|(l, r)| {
                is_assignable_guarded(&l.ty, &r.ty, &guard) && (r.optional || !l.optional)
            })
        }

        (from, Type::Union(members)) => members
            .iter()
            .any(|member| is_assignable_guarded(from, member, &guard)),

        (Type::Union(members), to) => members
            .iter()
            .all(|member| is_assignable_guarded(member, to, &guard)),

        (from, Type::Intersection(members)) => members
            .iter()
            .all(|member| is_assignable_guarded(from, member, &guard)),

        (Type::Intersection(members), to) => members
            .iter()
            .any(|member| is_assignable_guarded(member, to, &guard)),

        (Type::Function(a), Type::Function(b)) => is_function_assignable(a, b, &guard),

        (Type::Object(a), Type::Object(b)) => is_object_assignable(a, b, &guard),

        // A single-signature function type also satisfies a callable
        // object type shape, and vice versa, matching TS's treatment of
        // functions as objects with a call signature.
        (Type::Function(a), Type::Object(b)) => {
            b.properties.is_empty()
                && b.call_signatures.len() == 1
                && is_function_assignable(a, &b.call_signatures[0], &guard)
        }
        (Type::Object(a), Type::Function(b)) => {
            a.call_signatures.len() == 1 && is_function_assignable(&a.call_signatures[0], b, &guard)
        }

        _ => false,
    }
}

fn is_function_assignable(
    from: &crate::checker::types::FunctionType,
    to: &crate::checker::types::FunctionType,
    guard: &RecursionGuard,
) -> bool {
    // Parameters are contravariant: `to` may supply fewer parameters than
    // `from` declares (callers are allowed to ignore trailing parameters),
    // and each parameter `from` expects must accept whatever `to` would
    // pass it, i.e. checked in reverse.
    if to.parameters.len() > from.parameters.len()
        && !from.parameters.iter().any(|p| p.is_rest)
    {
        return false;
    }
    for (i, to_param) in to.parameters.iter().enumerate() {
        let Some(from_param) = from.parameters.get(i).or_else(|| from.parameters.last()) else {
            return false;
        };
        if !is_assignable_guarded(&to_param.ty, &from_param.ty, guard) {
            return false;
        }
    }
    is_assignable_guarded(&from.return_type, &to.return_type, guard)
}

fn is_object_assignable(from: &ObjectType, to: &ObjectType, guard: &RecursionGuard) -> bool {
    if nominal_mismatch(from, to) {
        return false;
    }

    for required in &to.properties {
        let Some(actual) = from.find_property(&required.name) else {
            if required.optional {
                continue;
            }
            if let Some(index) = &to.index_signature {
                if is_assignable_guarded(&required.ty, &index.value_type, guard) {
                    continue;
                }
            }
            return false;
        };
        if actual.visibility != required.visibility {
            return false;
        }
        if !is_assignable_guarded(&actual.ty, &required.ty, guard) {
            return false;
        }
    }

    for sig in &to.call_signatures {
        if !from
            .call_signatures
            .iter()
            .any(|from_sig| is_function_assignable(from_sig, sig, guard))
        {
            return false;
        }
    }

    true
}

/// Two `Class` object types with any private/protected member are only
/// mutually assignable if they're literally the same declared class;
/// structural matching alone would let unrelated classes with identically
/// shaped private fields satisfy each other, which TS (and this dialect)
/// rejects.
fn nominal_mismatch(from: &ObjectType, to: &ObjectType) -> bool {
    let to_nominal = matches!(to.kind, ObjectKind::Class(_)) && to.has_nominal_members();
    if !to_nominal {
        return false;
    }
    match (&from.kind, &to.kind) {
        (ObjectKind::Class(a), ObjectKind::Class(b)) => a != b,
        _ => true,
    }
}

/// Property lookup used by member-expression checking: find `property`'s
/// type on `ty`, consulting declared properties, then index signatures.
/// Returns `None` (not an error) so callers can decide whether a missing
/// property is fatal or should fall back to a prototype lookup.
pub fn property_type_of(ty: &Type, property: &str) -> Option<Type> {
    match ty {
        Type::Object(obj) => obj
            .find_property(property)
            .map(|p| p.ty.clone())
            .or_else(|| {
                obj.index_signature
                    .as_ref()
                    .map(|index| index.value_type.clone())
            }),
        Type::Array(_) if property == "length" => Some(Type::Number),
        Type::Union(members) => {
            let types: Vec<Type> = members
                .iter()
                .filter_map(|member| property_type_of(member, property))
                .collect();
            if types.is_empty() {
                None
            } else {
                Some(Type::union(types))
            }
        }
        _ => None,
    }
}

/// Whether `expr as target` is legal: one direction of assignability must
/// hold (narrowing a wider declared type, or widening a narrower one).
/// Disjoint types (`string as number`) are rejected as a likely mistake.
pub fn is_assertable(from: &Type, to: &Type) -> bool {
    is_assignable(from, to) || is_assignable(to, from) || matches!(from, Type::Any) || matches!(to, Type::Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::types::{FunctionType, ParameterType, PropertyType, PropertyVisibility};

    #[test]
    fn literal_assignable_to_widened_primitive() {
        assert!(is_assignable(&Type::StringLiteral("a".into()), &Type::String));
        assert!(!is_assignable(&Type::String, &Type::StringLiteral("a".into())));
    }

    #[test]
    fn union_member_assignable_to_union() {
        let u = Type::union(vec![Type::Number, Type::String]);
        assert!(is_assignable(&Type::Number, &u));
        assert!(!is_assignable(&Type::Boolean, &u));
    }

    #[test]
    fn whole_union_assignable_only_if_every_member_is() {
        let u = Type::union(vec![Type::Number, Type::String]);
        assert!(!is_assignable(&u, &Type::Number));
        assert!(is_assignable(&u, &Type::union(vec![Type::Number, Type::String, Type::Boolean])));
    }

    #[test]
    fn excess_property_free_structural_match() {
        let wide = Type::Object(ObjectType {
            kind: ObjectKind::Anonymous,
            type_arguments: vec![],
            properties: vec![
                PropertyType { name: "a".into(), ty: Type::Number, optional: false, readonly: false, visibility: PropertyVisibility::Public, is_static: false, declaring_class: None },
                PropertyType { name: "b".into(), ty: Type::String, optional: false, readonly: false, visibility: PropertyVisibility::Public, is_static: false, declaring_class: None },
            ],
            call_signatures: vec![],
            construct_signatures: vec![],
            index_signature: None,
        });
        let narrow = Type::Object(ObjectType {
            kind: ObjectKind::Anonymous,
            type_arguments: vec![],
            properties: vec![
                PropertyType { name: "a".into(), ty: Type::Number, optional: false, readonly: false, visibility: PropertyVisibility::Public, is_static: false, declaring_class: None },
            ],
            call_signatures: vec![],
            construct_signatures: vec![],
            index_signature: None,
        });
        assert!(is_assignable(&wide, &narrow));
        assert!(!is_assignable(&narrow, &wide));
    }

    #[test]
    fn nominal_classes_with_private_members_dont_structurally_match() {
        let a = ObjectType {
            kind: ObjectKind::Class("A".into()),
            type_arguments: vec![],
            properties: vec![PropertyType {
                name: "secret".into(),
                ty: Type::Number,
                optional: false,
                readonly: false,
                visibility: PropertyVisibility::Private,
                is_static: false,
                declaring_class: Some("A".into()),
            }],
            call_signatures: vec![],
            construct_signatures: vec![],
            index_signature: None,
        };
        let mut b = a.clone();
        if let ObjectKind::Class(name) = &mut b.kind {
            *name = "B".into();
        }
        assert!(!is_assignable(&Type::Object(a.clone()), &Type::Object(b)));
        assert!(is_assignable(&Type::Object(a.clone()), &Type::Object(a)));
    }

    #[test]
    fn function_parameters_are_contravariant() {
        let accepts_number = Type::Function(FunctionType {
            type_parameters: vec![],
            parameters: vec![ParameterType { name: "x".into(), ty: Type::Number, optional: false, is_rest: false }],
            return_type: Box::new(Type::Void),
            this_type: None,
            type_predicate: None,
        });
        let accepts_union = Type::Function(FunctionType {
            type_parameters: vec![],
            parameters: vec![ParameterType { name: "x".into(), ty: Type::union(vec![Type::Number, Type::String]), optional: false, is_rest: false }],
            return_type: Box::new(Type::Void),
            this_type: None,
            type_predicate: None,
        });
        // a function accepting a wider parameter type is assignable where
        // one accepting a narrower type is expected
        assert!(is_assignable(&accepts_union, &accepts_number));
        assert!(!is_assignable(&accepts_number, &accepts_union));
    }
}
