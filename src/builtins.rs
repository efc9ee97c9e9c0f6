//! Ambient globals and primitive prototype members. Mirrors lib.d.ts in
//! miniature: enough of `Array.prototype`, `string`'s methods, `console`,
//! `Math`, `JSON` and `Object` for the scenarios this checker is exercised
//! against, registered once before a program is checked.

use log::debug;

use crate::checker::context::TypeContext;
use crate::checker::types::{FunctionType, ObjectKind, ObjectType, ParameterType, PropertyType, PropertyVisibility, Type};

fn func(params: Vec<(&str, Type)>, return_type: Type) -> Type {
    Type::Function(FunctionType {
        type_parameters: vec![],
        parameters: params
            .into_iter()
            .map(|(name, ty)| ParameterType {
                name: name.to_string(),
                ty,
                optional: false,
                is_rest: false,
            })
            .collect(),
        return_type: Box::new(return_type),
        this_type: None,
        type_predicate: None,
    })
}

fn public_property(name: &str, ty: Type) -> PropertyType {
    PropertyType {
        name: name.to_string(),
        ty,
        optional: false,
        readonly: false,
        visibility: PropertyVisibility::Public,
        is_static: false,
        declaring_class: None,
    }
}

/// Implemented by anything that seeds a `TypeContext` with ambient
/// declarations before a program is checked — the crate's own defaults
/// below, or a host supplying an additional `.d.ts`-equivalent surface
/// (DOM globals, a runtime's own builtins) on top of them.
pub trait BuiltinInitializer {
    fn install(&self, ctx: &mut TypeContext);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StandardLibrary;

impl BuiltinInitializer for StandardLibrary {
    fn install(&self, ctx: &mut TypeContext) {
        debug!("installing standard library globals");
        install_array_prototype(ctx);
        install_string_prototype(ctx);
        install_globals(ctx);
    }
}

fn install_array_prototype(ctx: &mut TypeContext) {
    let element = Type::TypeParameter("T".to_string());
    let array_of_t = Type::Array(Box::new(element.clone()));

    ctx.env.register_prototype_member(
        "Array",
        "push",
        func(vec![("item", element.clone())], Type::Number),
    );
    ctx.env
        .register_prototype_member("Array", "pop", func(vec![], Type::union(vec![element.clone(), Type::Undefined])));
    ctx.env.register_prototype_member(
        "Array",
        "map",
        func(
            vec![(
                "callback",
                func(vec![("item", element.clone())], Type::Unknown),
            )],
            Type::Array(Box::new(Type::Unknown)),
        ),
    );
    ctx.env.register_prototype_member(
        "Array",
        "filter",
        func(
            vec![("predicate", func(vec![("item", element.clone())], Type::Boolean))],
            array_of_t.clone(),
        ),
    );
    ctx.env.register_prototype_member(
        "Array",
        "includes",
        func(vec![("item", element.clone())], Type::Boolean),
    );
    ctx.env
        .register_prototype_member("Array", "length", Type::Number);
    ctx.env.register_prototype_member(
        "Array",
        "join",
        func(vec![("separator", Type::String)], Type::String),
    );
    ctx.env.register_prototype_member(
        "Array",
        "slice",
        func(vec![("start", Type::Number), ("end", Type::Number)], array_of_t),
    );
}

fn install_string_prototype(ctx: &mut TypeContext) {
    ctx.env
        .register_prototype_member("String", "length", Type::Number);
    ctx.env.register_prototype_member(
        "String",
        "charAt",
        func(vec![("index", Type::Number)], Type::String),
    );
    ctx.env.register_prototype_member(
        "String",
        "slice",
        func(vec![("start", Type::Number), ("end", Type::Number)], Type::String),
    );
    ctx.env.register_prototype_member(
        "String",
        "split",
        func(
            vec![("separator", Type::String)],
            Type::Array(Box::new(Type::String)),
        ),
    );
    ctx.env.register_prototype_member(
        "String",
        "toUpperCase",
        func(vec![], Type::String),
    );
    ctx.env.register_prototype_member(
        "String",
        "toLowerCase",
        func(vec![], Type::String),
    );
    ctx.env.register_prototype_member(
        "String",
        "includes",
        func(vec![("search", Type::String)], Type::Boolean),
    );
}

fn install_globals(ctx: &mut TypeContext) {
    let console_type = Type::Object(ObjectType {
        kind: ObjectKind::Interface("Console".to_string()),
        type_arguments: vec![],
        properties: vec![
            public_property("log", func(vec![("message", Type::Any)], Type::Void)),
            public_property("warn", func(vec![("message", Type::Any)], Type::Void)),
            public_property("error", func(vec![("message", Type::Any)], Type::Void)),
        ],
        call_signatures: vec![],
        construct_signatures: vec![],
        index_signature: None,
    });
    ctx.env.declare_binding("console", console_type, false).ok();

    let math_type = Type::Object(ObjectType {
        kind: ObjectKind::Interface("Math".to_string()),
        type_arguments: vec![],
        properties: vec![
            public_property("PI", Type::Number),
            public_property("floor", func(vec![("x", Type::Number)], Type::Number)),
            public_property("ceil", func(vec![("x", Type::Number)], Type::Number)),
            public_property("max", func(vec![("a", Type::Number), ("b", Type::Number)], Type::Number)),
            public_property("min", func(vec![("a", Type::Number), ("b", Type::Number)], Type::Number)),
            public_property("random", func(vec![], Type::Number)),
        ],
        call_signatures: vec![],
        construct_signatures: vec![],
        index_signature: None,
    });
    ctx.env.declare_binding("Math", math_type, false).ok();

    let json_type = Type::Object(ObjectType {
        kind: ObjectKind::Interface("JSON".to_string()),
        type_arguments: vec![],
        properties: vec![
            public_property("stringify", func(vec![("value", Type::Any)], Type::String)),
            public_property("parse", func(vec![("text", Type::String)], Type::Any)),
        ],
        call_signatures: vec![],
        construct_signatures: vec![],
        index_signature: None,
    });
    ctx.env.declare_binding("JSON", json_type, false).ok();

    ctx.env
        .declare_binding(
            "undefined",
            Type::Undefined,
            false,
        )
        .ok();
    ctx.env.declare_binding("NaN", Type::Number, false).ok();
    ctx.env.declare_binding("Infinity", Type::Number, false).ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::context::CheckerOptions;

    #[test]
    fn installs_console_and_array_prototype() {
        let mut ctx = TypeContext::new(CheckerOptions::default());
        StandardLibrary.install(&mut ctx);
        assert!(ctx.env.resolve("console").is_some());
        assert!(ctx.env.prototype_member("Array", "push").is_some());
        assert!(ctx.env.prototype_member("String", "toUpperCase").is_some());
    }
}
