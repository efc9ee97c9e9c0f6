//! Resolves the syntactic `ast::type_annotation::TypeAnnotation` the parser
//! hands us into a semantic `checker::types::Type`, looking up named types
//! and type parameters against the current `Environment`.

use crate::ast::type_annotation::{AnnotatedParameter, LiteralAnnotation, TypeAnnotation};
use crate::checker::context::TypeContext;
use crate::checker::error::{TypeCheckError, UndefinedType};
use crate::checker::types::{
    FunctionType, ObjectKind, ObjectType, ParameterType, PropertyType, PropertyVisibility,
    TupleElement, Type,
};

pub fn resolve_annotation(
    annotation: &TypeAnnotation,
    ctx: &mut TypeContext,
) -> Result<Type, TypeCheckError> {
    let guard = ctx.recursion.enter(&annotation.span())?;
    let previous = std::mem::replace(&mut ctx.recursion, guard);
    let result = resolve_annotation_inner(annotation, ctx);
    ctx.recursion = previous;
    result
}

fn resolve_annotation_inner(
    annotation: &TypeAnnotation,
    ctx: &mut TypeContext,
) -> Result<Type, TypeCheckError> {
    match annotation {
        TypeAnnotation::Named(name, span) => resolve_named(name, span, ctx),
        TypeAnnotation::Generic(name, args, span) => {
            let mut resolved_args = Vec::with_capacity(args.len());
            for arg in args {
                resolved_args.push(resolve_annotation(arg, ctx)?);
            }
            let base = resolve_named(name, span, ctx)?;
            let param_names = ctx.env.generic_params(name).to_vec();
            substitute_type_arguments(base, &param_names, &resolved_args)
        }
        TypeAnnotation::Literal(lit, _) => Ok(match lit {
            LiteralAnnotation::String(s) => Type::StringLiteral(s.clone()),
            LiteralAnnotation::Number(n) => Type::NumberLiteral(*n),
            LiteralAnnotation::Boolean(b) => Type::BooleanLiteral(*b),
            LiteralAnnotation::Null => Type::Null,
            LiteralAnnotation::Undefined => Type::Undefined,
        }),
        TypeAnnotation::Array(inner, _) => {
            Ok(Type::Array(Box::new(resolve_annotation(inner, ctx)?)))
        }
        TypeAnnotation::Tuple(elements, _) => {
            let mut resolved = Vec::with_capacity(elements.len());
            for el in elements {
                resolved.push(TupleElement {
                    ty: resolve_annotation(el, ctx)?,
                    optional: false,
                    is_rest: false,
                });
            }
            Ok(Type::Tuple(resolved))
        }
        TypeAnnotation::Union(members, _) => {
            let mut resolved = Vec::with_capacity(members.len());
            for m in members {
                resolved.push(resolve_annotation(m, ctx)?);
            }
            Ok(Type::union(resolved))
        }
        TypeAnnotation::Intersection(members, _) => {
            let mut resolved = Vec::with_capacity(members.len());
            for m in members {
                resolved.push(resolve_annotation(m, ctx)?);
            }
            Ok(Type::intersection(resolved))
        }
        TypeAnnotation::Function {
            parameters,
            return_type,
            ..
        } => {
            let params = resolve_parameters(parameters, ctx)?;
            let ret = resolve_annotation(return_type, ctx)?;
            Ok(Type::Function(FunctionType {
                type_parameters: vec![],
                parameters: params,
                return_type: Box::new(ret),
                this_type: None,
                type_predicate: None,
            }))
        }
        TypeAnnotation::TypePredicate {
            narrowed_type, ..
        } => {
            // A bare type-predicate annotation outside a function return
            // position has no parameter to narrow; resolve it to the
            // narrowed type's boolean test result. Function declarations
            // handle the parameter-index binding themselves by inspecting
            // this variant directly rather than calling through here.
            resolve_annotation(narrowed_type, ctx)?;
            Ok(Type::Boolean)
        }
        TypeAnnotation::ObjectLiteral(props, _) => {
            let mut properties = Vec::with_capacity(props.len());
            for prop in props {
                properties.push(PropertyType {
                    name: prop.name.clone(),
                    ty: resolve_annotation(&prop.annotation, ctx)?,
                    optional: prop.optional,
                    readonly: prop.readonly,
                    visibility: PropertyVisibility::Public,
                    is_static: false,
                    declaring_class: None,
                });
            }
            Ok(Type::Object(ObjectType {
                properties,
                ..ObjectType::empty(ObjectKind::Anonymous)
            }))
        }
    }
}

fn resolve_named(
    name: &str,
    span: &crate::span::Span,
    ctx: &mut TypeContext,
) -> Result<Type, TypeCheckError> {
    match name {
        "number" => return Ok(Type::Number),
        "string" => return Ok(Type::String),
        "boolean" => return Ok(Type::Boolean),
        "void" => return Ok(Type::Void),
        "null" => return Ok(Type::Null),
        "undefined" => return Ok(Type::Undefined),
        "any" => return Ok(Type::Any),
        "unknown" => return Ok(Type::Unknown),
        "never" => return Ok(Type::Never),
        _ => {}
    }

    if ctx.env.is_type_parameter(name) {
        return Ok(Type::TypeParameter(name.to_string()));
    }

    ctx.env.lookup_type(name).ok_or_else(|| {
        TypeCheckError::UndefinedType(
            UndefinedType {
                name: name.to_string(),
            },
            span.clone(),
        )
    })
}

fn resolve_parameters(
    parameters: &[AnnotatedParameter],
    ctx: &mut TypeContext,
) -> Result<Vec<ParameterType>, TypeCheckError> {
    let mut result = Vec::with_capacity(parameters.len());
    for p in parameters {
        let ty = match &p.annotation {
            Some(a) => resolve_annotation(a, ctx)?,
            None => Type::Any,
        };
        result.push(ParameterType {
            name: p.name.clone(),
            ty,
            optional: p.optional,
            is_rest: p.is_rest,
        });
    }
    Ok(result)
}

/// Replace `Type::TypeParameter` occurrences in `base` with the
/// corresponding argument, matched by the generic's declared parameter
/// name (`checker::environment::Environment::declare_generic_params`), not
/// by position in `base` itself: `base` was resolved with its own type
/// parameters left as `TypeParameter(name)` placeholders using their real
/// declared names, so the substitution map has to use those same names.
fn substitute_type_arguments(
    base: Type,
    param_names: &[String],
    args: &[Type],
) -> Result<Type, TypeCheckError> {
    if args.is_empty() || param_names.is_empty() {
        return Ok(base);
    }
    let map: std::collections::HashMap<&str, &Type> = param_names
        .iter()
        .map(String::as_str)
        .zip(args.iter())
        .collect();
    Ok(substitute(&base, &map))
}

fn substitute(ty: &Type, map: &std::collections::HashMap<&str, &Type>) -> Type {
    match ty {
        Type::TypeParameter(name) => map.get(name.as_str()).copied().cloned().unwrap_or_else(|| ty.clone()),
        Type::Array(inner) => Type::Array(Box::new(substitute(inner, map))),
        Type::Tuple(elements) => Type::Tuple(
            elements
                .iter()
                .map(|el| TupleElement {
                    ty: substitute(&el.ty, map),
                    optional: el.optional,
                    is_rest: el.is_rest,
                })
                .collect(),
        ),
        Type::Union(members) => Type::union(members.iter().map(|m| substitute(m, map)).collect()),
        Type::Intersection(members) => {
            Type::intersection(members.iter().map(|m| substitute(m, map)).collect())
        }
        Type::Object(obj) => {
            let mut obj = obj.clone();
            for prop in obj.properties.iter_mut() {
                prop.ty = substitute(&prop.ty, map);
            }
            Type::Object(obj)
        }
        Type::Function(f) => {
            let mut f = f.clone();
            f.return_type = Box::new(substitute(&f.return_type, map));
            for p in f.parameters.iter_mut() {
                p.ty = substitute(&p.ty, map);
            }
            Type::Function(f)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::context::CheckerOptions;
    use crate::span::Span;

    fn ctx() -> TypeContext {
        TypeContext::new(CheckerOptions::default())
    }

    #[test]
    fn resolves_primitive_names() {
        let mut c = ctx();
        let annotation = TypeAnnotation::Named("string".to_string(), Span::default());
        assert_eq!(resolve_annotation(&annotation, &mut c).unwrap(), Type::String);
    }

    #[test]
    fn undefined_named_type_errors() {
        let mut c = ctx();
        let annotation = TypeAnnotation::Named("Foo".to_string(), Span::default());
        assert!(resolve_annotation(&annotation, &mut c).is_err());
    }

    #[test]
    fn resolves_union_annotation() {
        let mut c = ctx();
        let annotation = TypeAnnotation::Union(
            vec![
                TypeAnnotation::Named("string".to_string(), Span::default()),
                TypeAnnotation::Named("number".to_string(), Span::default()),
            ],
            Span::default(),
        );
        let resolved = resolve_annotation(&annotation, &mut c).unwrap();
        assert_eq!(resolved, Type::union(vec![Type::String, Type::Number]));
    }

    #[test]
    fn resolves_inline_object_literal_annotation() {
        use crate::ast::type_annotation::AnnotatedProperty;

        let mut c = ctx();
        let annotation = TypeAnnotation::ObjectLiteral(
            vec![
                AnnotatedProperty {
                    name: "kind".to_string(),
                    annotation: TypeAnnotation::Literal(
                        LiteralAnnotation::String("circle".to_string()),
                        Span::default(),
                    ),
                    optional: false,
                    readonly: false,
                },
                AnnotatedProperty {
                    name: "r".to_string(),
                    annotation: TypeAnnotation::Named("number".to_string(), Span::default()),
                    optional: false,
                    readonly: false,
                },
            ],
            Span::default(),
        );
        let resolved = resolve_annotation(&annotation, &mut c).unwrap();
        let Type::Object(obj) = resolved else {
            panic!("expected an object type");
        };
        assert_eq!(obj.properties.len(), 2);
        assert_eq!(
            obj.find_property("kind").unwrap().ty,
            Type::StringLiteral("circle".to_string())
        );
    }
}
