//! `x.prop === literal` narrows not just the dotted path but the
//! declared type of `x` itself to the union members whose `prop` matches,
//! and that narrowing survives past a terminating `if` with no `else`
//! into the complement for the rest of the block.

mod support;

use support::*;
use tsc::ast::expression::{BinaryOperator, FunctionBody};

fn shape_type() -> tsc::ast::type_annotation::TypeAnnotation {
    ty_union(vec![
        ty_object(vec![("kind", ty_string_lit("circle")), ("r", ty_named("number"))]),
        ty_object(vec![("kind", ty_string_lit("square")), ("s", ty_named("number"))]),
    ])
}

#[test]
fn member_discriminant_narrows_the_base_inside_the_guard() {
    let prog = program(vec![func_decl(
        "area",
        vec![param("sh", shape_type())],
        None,
        Some(FunctionBody::Block(vec![if_stmt(
            binary(member(ident("sh"), "kind"), BinaryOperator::StrictEqual, string_lit("circle")),
            ret(member(ident("sh"), "r")),
            None,
        )])),
    )]);

    let (_, diagnostics) = check(prog);
    assert!(diagnostics.is_empty(), "expected no diagnostics, got {diagnostics:?}");
}

#[test]
fn member_discriminant_narrows_the_fallthrough_past_a_terminating_if() {
    let prog = program(vec![func_decl(
        "area",
        vec![param("sh", shape_type())],
        None,
        Some(FunctionBody::Block(vec![
            if_stmt(
                binary(member(ident("sh"), "kind"), BinaryOperator::StrictEqual, string_lit("circle")),
                ret(member(ident("sh"), "r")),
                None,
            ),
            ret(member(ident("sh"), "s")),
        ])),
    )]);

    let (_, diagnostics) = check(prog);
    assert!(diagnostics.is_empty(), "expected no diagnostics, got {diagnostics:?}");
}

#[test]
fn reading_the_other_members_field_inside_the_guard_still_fails() {
    let prog = program(vec![func_decl(
        "area",
        vec![param("sh", shape_type())],
        None,
        Some(FunctionBody::Block(vec![if_stmt(
            binary(member(ident("sh"), "kind"), BinaryOperator::StrictEqual, string_lit("circle")),
            ret(member(ident("sh"), "s")),
            None,
        )])),
    )]);

    let (_, diagnostics) = check(prog);
    assert_eq!(diagnostics.len(), 1, "expected one diagnostic, got {diagnostics:?}");
    assert_eq!(diagnostics[0].error_code, "TS2339");
}
