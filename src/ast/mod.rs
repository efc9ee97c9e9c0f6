//! AST node shapes, generic over a per-node annotation `T`. The upstream
//! parser produces `Program<()>`; `checker::check_program` walks it into
//! `Program<checker::context::ExprInfo>`, attaching a computed-type slot to
//! every expression node along the way.
//!
//! This crate never parses source text itself — these types are the
//! contract with whatever produced the tree (a hand-written test fixture,
//! or an external parser crate in a full pipeline).

pub mod expression;
pub mod statement;
pub mod type_annotation;

use self::statement::Statement;

/// A whole source file: an ordered list of top-level statements.
#[derive(Debug, Clone, PartialEq)]
pub struct Program<T> {
    pub statements: Vec<Statement<T>>,
}
