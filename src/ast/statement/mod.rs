mod class_decl;
mod control;
mod declaration;
mod function_decl;
mod import_decl;

pub use self::class_decl::*;
pub use self::control::*;
pub use self::declaration::*;
pub use self::function_decl::*;
pub use self::import_decl::*;

use crate::ast::expression::Expression;
use crate::span::Span;

/// Every statement-shaped AST node, generic over the per-node annotation
/// `T`, the same annotation parameter `ast::expression::Expression<T>` uses.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement<T> {
    Expression(Expression<T>, Span),
    VariableDeclaration(VariableDeclaration<T>),
    FunctionDeclaration(FunctionDeclaration<T>),
    ClassDeclaration(ClassDeclaration<T>),
    InterfaceDeclaration(InterfaceDeclaration),
    TypeAliasDeclaration(TypeAliasDeclaration),
    Return(Option<Expression<T>>, Span),
    If(IfStatement<T>),
    While(WhileStatement<T>),
    DoWhile(DoWhileStatement<T>),
    For(ForStatement<T>),
    ForOf(ForOfStatement<T>),
    ForIn(ForInStatement<T>),
    Block(Vec<Statement<T>>, Span),
    Break(Option<String>, Span),
    Continue(Option<String>, Span),
    Throw(Expression<T>, Span),
    Try(TryStatement<T>),
    Switch(SwitchStatement<T>),
    Import(ImportDeclaration, Span),
    Export(ExportDeclaration<T>),
    Empty(Span),
}

impl<T> Statement<T> {
    pub fn span(&self) -> Span {
        match self {
            Statement::Expression(_, s) => s.clone(),
            Statement::VariableDeclaration(d) => d.span.clone(),
            Statement::FunctionDeclaration(d) => d.span.clone(),
            Statement::ClassDeclaration(d) => d.span.clone(),
            Statement::InterfaceDeclaration(d) => d.span.clone(),
            Statement::TypeAliasDeclaration(d) => d.span.clone(),
            Statement::Return(_, s) => s.clone(),
            Statement::If(s) => s.span.clone(),
            Statement::While(s) => s.span.clone(),
            Statement::DoWhile(s) => s.span.clone(),
            Statement::For(s) => s.span.clone(),
            Statement::ForOf(s) => s.span.clone(),
            Statement::ForIn(s) => s.span.clone(),
            Statement::Block(_, s) => s.clone(),
            Statement::Break(_, s) => s.clone(),
            Statement::Continue(_, s) => s.clone(),
            Statement::Throw(_, s) => s.clone(),
            Statement::Try(s) => s.span.clone(),
            Statement::Switch(s) => s.span.clone(),
            Statement::Import(_, s) => s.clone(),
            Statement::Export(e) => e.span(),
            Statement::Empty(s) => s.clone(),
        }
    }
}
