//! `tsc`: a static type checker for a TypeScript dialect.
//!
//! This crate owns exactly the three coupled subsystems that make a
//! structural type checker hard to get right: the type representation and
//! assignability engine, the scoped type environment (with declaration
//! merging, forward references and narrowing overlays), and the AST
//! traversal that infers and checks types while threading flow-sensitive
//! narrowing through branches and loops. Lexing, parsing, bytecode
//! compilation and module loading are external collaborators; see
//! [`module_loader`] for the seam where a host supplies the latter.
//!
//! The entry point is [`checker::check_program`].

pub mod ast;
pub mod builtins;
pub mod checker;
pub mod module_loader;
pub mod span;

pub use checker::check_program;
