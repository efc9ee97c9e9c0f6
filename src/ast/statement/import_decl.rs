use super::Statement;
use crate::span::Span;

/// `import { a, b as c } from "module"`, `import * as ns from "module"`, or
/// `import def from "module"`. Resolving `"module"` against the host's
/// module graph is `module_loader`'s job; this node only records what was
/// written.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDeclaration {
    pub module: String,
    pub default: Option<String>,
    pub namespace: Option<String>,
    pub named: Vec<ImportSpecifier>,
    pub is_type_only: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpecifier {
    pub imported: String,
    pub local: String,
    pub is_type_only: bool,
}

/// `export <decl>`, `export default <expr>`, or `export { a, b as c }`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportDeclaration<T> {
    Declaration(Box<Statement<T>>, Span),
    Default(crate::ast::expression::Expression<T>, Span),
    Named(Vec<ExportSpecifier>, Span),
}

impl<T> ExportDeclaration<T> {
    pub fn span(&self) -> Span {
        match self {
            ExportDeclaration::Declaration(_, s) => s.clone(),
            ExportDeclaration::Default(_, s) => s.clone(),
            ExportDeclaration::Named(_, s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSpecifier {
    pub local: String,
    pub exported: String,
}
