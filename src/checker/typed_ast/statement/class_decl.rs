//! Thin statement-level wrapper around `checker::class`, which owns the
//! actual two-phase class-checking pipeline. This module
//! only adapts that pipeline's `ClassDeclaration`-in/-out shape to the
//! `shallow_check_statement`/`check_statement` dispatch in `mod.rs`.

use crate::ast::statement::ClassDeclaration;
use crate::checker::class;
use crate::checker::context::{ExprInfo, TypeContext};

pub fn shallow_check(decl: &ClassDeclaration<()>, ctx: &mut TypeContext) {
    class::shallow_check_class(decl, ctx);
}

pub fn check(decl: ClassDeclaration<()>, ctx: &mut TypeContext) -> ClassDeclaration<ExprInfo> {
    class::check_class(decl, ctx)
}
