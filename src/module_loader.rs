//! External module resolution. This crate never reads the filesystem or
//! resolves a module specifier by itself — a host embeds it and supplies a
//! `ModuleLoader` that knows how `"./foo"` or `"lodash"` maps to an already
//! type-checked set of exports.

use std::collections::HashMap;

use crate::checker::types::Type;

/// The exported names of an already-checked module, by name, to their
/// exported type. `"default"` is used for a default export, matching how
/// `ast::statement::ExportDeclaration::Default` is keyed once checked.
pub type ModuleExports = HashMap<String, Type>;

/// Implemented by the host embedding this crate. A CLI driving a whole
/// project resolves `specifier` to a file path and returns that file's
/// already-checked exports (checking a dependency graph leaf-first); a
/// single-file / REPL-style host can return `None` for everything and let
/// every import surface as `ModuleNotFound`.
pub trait ModuleLoader {
    fn resolve(&self, specifier: &str, importing_module: &str) -> Option<ModuleExports>;
}

/// A `ModuleLoader` that never resolves anything, useful for checking an
/// isolated snippet with no external imports.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullModuleLoader;

impl ModuleLoader for NullModuleLoader {
    fn resolve(&self, _specifier: &str, _importing_module: &str) -> Option<ModuleExports> {
        None
    }
}

/// A `ModuleLoader` backed by a fixed in-memory map, useful for tests and
/// for embedders that pre-resolve the whole module graph up front.
#[derive(Debug, Default, Clone)]
pub struct StaticModuleLoader {
    modules: HashMap<String, ModuleExports>,
}

impl StaticModuleLoader {
    pub fn new() -> Self {
        StaticModuleLoader::default()
    }

    pub fn with_module(mut self, specifier: impl Into<String>, exports: ModuleExports) -> Self {
        self.modules.insert(specifier.into(), exports);
        self
    }
}

impl ModuleLoader for StaticModuleLoader {
    fn resolve(&self, specifier: &str, _importing_module: &str) -> Option<ModuleExports> {
        self.modules.get(specifier).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_loader_resolves_registered_modules() {
        let mut exports = ModuleExports::new();
        exports.insert("value".to_string(), Type::Number);
        let loader = StaticModuleLoader::new().with_module("./a", exports);
        assert!(loader.resolve("./a", "main").is_some());
        assert!(loader.resolve("./missing", "main").is_none());
    }
}
