//! Overload declarations collapse into one binding; a call site picks the
//! first matching declared signature, and an argument matching none of
//! them is a "no matching overload" diagnostic.

mod support;

use support::*;
use tsc::ast::expression::FunctionBody;
use tsc::checker::types::Type;

fn overloaded_identity_program(call_arg: tsc::ast::expression::Expression<()>) -> tsc::ast::Program<()> {
    program(vec![
        func_decl("f", vec![param("x", ty_named("string"))], Some(ty_named("string")), None),
        func_decl("f", vec![param("x", ty_named("number"))], Some(ty_named("number")), None),
        func_decl(
            "f",
            vec![param("x", ty_named("any"))],
            Some(ty_named("any")),
            Some(FunctionBody::Block(vec![ret(ident("x"))])),
        ),
        expr_stmt(call(ident("f"), vec![call_arg])),
    ])
}

#[test]
fn string_argument_selects_the_string_overload() {
    let (checked, diagnostics) = check(overloaded_identity_program(string_lit("a")));
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    assert_eq!(expr_type(checked.statements.last().unwrap()), Some(Type::String));
}

#[test]
fn number_argument_selects_the_number_overload() {
    let (checked, diagnostics) = check(overloaded_identity_program(num(1.0)));
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    assert_eq!(expr_type(checked.statements.last().unwrap()), Some(Type::Number));
}

#[test]
fn boolean_argument_matches_no_overload() {
    let (_, diagnostics) = check(overloaded_identity_program(bool_lit(true)));
    assert_eq!(diagnostics.len(), 1, "expected one diagnostic, got {diagnostics:?}");
    assert_eq!(diagnostics[0].error_code, "TS2769");
}
