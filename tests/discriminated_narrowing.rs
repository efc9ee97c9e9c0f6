//! Narrowing a union-typed `let` through a strict equality guard, both
//! branches, plus the impossible-comparison diagnostic once the narrowed
//! variable leaves scope.

mod support;

use support::*;
use tsc::ast::expression::BinaryOperator;

#[test]
fn narrows_each_branch_to_its_literal_member() {
    let prog = program(vec![
        let_decl(
            "x",
            Some(ty_union(vec![ty_string_lit("foo"), ty_string_lit("bar")])),
            string_lit("foo"),
        ),
        if_stmt(
            binary(ident("x"), BinaryOperator::StrictEqual, string_lit("foo")),
            block(vec![const_decl("check_foo", Some(ty_string_lit("foo")), ident("x"))]),
            Some(block(vec![const_decl(
                "check_bar",
                Some(ty_string_lit("bar")),
                ident("x"),
            )])),
        ),
    ]);

    let (_, diagnostics) = check(prog);
    assert!(
        diagnostics.is_empty(),
        "expected no diagnostics, got {diagnostics:?}"
    );
}

#[test]
fn comparing_against_an_unrelated_literal_outside_the_guard_is_impossible() {
    let prog = program(vec![
        let_decl(
            "x",
            Some(ty_union(vec![ty_string_lit("foo"), ty_string_lit("bar")])),
            string_lit("foo"),
        ),
        expr_stmt(binary(ident("x"), BinaryOperator::StrictEqual, string_lit("baz"))),
    ]);

    let (_, diagnostics) = check(prog);
    assert_eq!(diagnostics.len(), 1, "expected one diagnostic, got {diagnostics:?}");
}
