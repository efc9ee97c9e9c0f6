//! Per-node-kind checking rules. Split into `expression` (bottom-up
//! inference, occasionally consulting a contextual expected type) and
//! `statement` (control flow, declarations, narrowing-overlay pushes around
//! branches and loops).

pub mod expression;
pub mod statement;

use crate::ast::Program;
use crate::checker::context::{ExprInfo, TypeContext};

/// Phase 1: register every top-level type/function/class signature before
/// checking any bodies, so mutually-referencing declarations (two classes
/// referencing each other, a function called before its declaration)
/// resolve regardless of source order. Three sub-passes, each covering the
/// whole program before the next starts:
///   1. an empty placeholder for every class/interface name, so a forward
///      reference from another top-level shape (not just `extends`, any
///      member whose type names it) resolves to *something* instead of
///      `UndefinedType` — the placeholder is empty until pass 3 rebuilds it,
///      a documented imprecision for genuinely cyclic shapes (DESIGN.md).
///   2. every top-level `import`, regardless of where it sits in the file,
///      so later passes can reference an imported name unconditionally.
///   3. the real shallow signature for every declaration.
pub fn shallow_check_program(program: &Program<()>, ctx: &mut TypeContext) {
    for statement in &program.statements {
        statement::declare_placeholder(statement, ctx);
    }
    for statement in &program.statements {
        statement::bind_imports(statement, ctx);
    }
    for statement in &program.statements {
        statement::shallow_check_statement(statement, ctx);
    }
}

/// Phase 2: check every statement in source order, producing the
/// annotated tree.
pub fn check_program(program: Program<()>, ctx: &mut TypeContext) -> Program<ExprInfo> {
    shallow_check_program(&program, ctx);

    let mut statements = Vec::with_capacity(program.statements.len());
    for statement in program.statements {
        statements.push(statement::check_statement(statement, ctx));
    }
    Program { statements }
}
