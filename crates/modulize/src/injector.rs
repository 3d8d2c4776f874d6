//! Per-file import injection
//!
//! The injector is the shared collaborator every rewrite pass goes through to
//! materialize a synthesized import and obtain a reference to it. Requests
//! are deduplicated by (specifier, exported name) within one file, so two
//! usages of the same component yield one import statement. Nothing here is
//! shared across files.

use std::hash::BuildHasherDefault;

use anyhow::{Result, bail};
use indexmap::IndexMap;
use rustc_hash::{FxHashSet, FxHasher};

use crate::{
    ast::{Expr, Module, Stmt},
    ast_builder,
};

type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

/// Dedup key: one synthesized import per (specifier, exported name).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ImportKey {
    specifier: String,
    kind: ImportKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ImportKind {
    Default,
    Named(String),
    SideEffect,
}

/// Collects synthesized imports for one file and splices them into the
/// module once traversal is done.
#[derive(Debug)]
pub struct ImportInjector {
    /// Insertion-ordered so injection order is deterministic for a fixed
    /// input. Values are the generated local names (None for side-effect
    /// imports, which bind nothing).
    entries: FxIndexMap<ImportKey, Option<String>>,
    used_names: FxHashSet<String>,
}

impl ImportInjector {
    /// Build an injector for a file; `module` supplies the identifier names
    /// already in use, which generated locals must avoid.
    pub fn new(module: &Module) -> Self {
        Self {
            entries: FxIndexMap::default(),
            used_names: collect_used_names(module),
        }
    }

    /// Synthesize (or reuse) `import <uid> from '<specifier>'` and return a
    /// reference to the bound name.
    pub fn inject_default(&mut self, name_hint: &str, specifier: &str) -> Result<Expr> {
        self.inject_value(name_hint, specifier, ImportKind::Default)
    }

    /// Synthesize (or reuse) `import { <imported> as <uid> } from
    /// '<specifier>'` and return a reference to the bound name.
    pub fn inject_named(&mut self, imported: &str, specifier: &str) -> Result<Expr> {
        self.inject_value(imported, specifier, ImportKind::Named(imported.to_owned()))
    }

    /// Synthesize `import '<specifier>'` once per file.
    pub fn inject_side_effect(&mut self, specifier: &str) -> Result<()> {
        if specifier.is_empty() {
            bail!("cannot inject an import with an empty specifier");
        }
        let key = ImportKey {
            specifier: specifier.to_owned(),
            kind: ImportKind::SideEffect,
        };
        self.entries.entry(key).or_insert(None);
        Ok(())
    }

    fn inject_value(&mut self, name_hint: &str, specifier: &str, kind: ImportKind) -> Result<Expr> {
        if specifier.is_empty() {
            bail!("cannot inject an import with an empty specifier");
        }
        let key = ImportKey {
            specifier: specifier.to_owned(),
            kind,
        };
        if let Some(Some(local)) = self.entries.get(&key) {
            return Ok(ast_builder::ident(local));
        }
        let local = self.generate_uid(name_hint);
        log::debug!("injecting import of '{specifier}' as {local}");
        self.entries.insert(key, Some(local.clone()));
        Ok(ast_builder::ident(&local))
    }

    /// Number of distinct imports synthesized so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prepend the synthesized declarations to the module, in insertion
    /// order. Consumes the injector; ids come from the module's allocator.
    pub fn apply(self, module: &mut Module) {
        let mut decls = Vec::with_capacity(self.entries.len());
        for (key, local) in &self.entries {
            let stmt = match (&key.kind, local) {
                (ImportKind::Default, Some(local)) => {
                    ast_builder::import_default(module.ids.fresh(), local, &key.specifier)
                }
                (ImportKind::Named(imported), Some(local)) => {
                    ast_builder::import_named(module.ids.fresh(), imported, local, &key.specifier)
                }
                _ => ast_builder::import_side_effect(module.ids.fresh(), &key.specifier),
            };
            decls.push(stmt);
        }
        module.body.splice(0..0, decls);
    }

    /// `_Name`, `_Name2`, ...: first candidate not colliding with a name
    /// already present in the file or generated earlier.
    fn generate_uid(&mut self, hint: &str) -> String {
        let base = format!("_{hint}");
        let mut candidate = base.clone();
        let mut n = 1u32;
        while self.used_names.contains(&candidate) {
            n += 1;
            candidate = format!("{base}{n}");
        }
        self.used_names.insert(candidate.clone());
        candidate
    }
}

/// Every identifier-like name appearing in the module, used to keep
/// generated locals collision-free.
fn collect_used_names(module: &Module) -> FxHashSet<String> {
    let mut names = FxHashSet::default();
    collect_stmts(&module.body, &mut names);
    names
}

fn collect_stmts(stmts: &[Stmt], names: &mut FxHashSet<String>) {
    for stmt in stmts {
        collect_stmt(stmt, names);
    }
}

fn collect_stmt(stmt: &Stmt, names: &mut FxHashSet<String>) {
    match stmt {
        Stmt::Import(decl) => {
            for specifier in &decl.specifiers {
                names.insert(specifier.local().to_owned());
            }
        }
        Stmt::Func(func) => {
            names.insert(func.name.clone());
            names.extend(func.params.iter().cloned());
            collect_stmts(&func.body, names);
        }
        Stmt::Class(class) => {
            names.insert(class.name.clone());
            if let Some(super_class) = &class.super_class {
                collect_expr(super_class, names);
            }
            for method in &class.methods {
                names.extend(method.params.iter().cloned());
                collect_stmts(&method.body, names);
            }
        }
        Stmt::Var(var) => {
            for declarator in &var.declarators {
                names.insert(declarator.name.clone());
                if let Some(init) = &declarator.init {
                    collect_expr(init, names);
                }
            }
        }
        Stmt::Return(ret) => {
            if let Some(argument) = &ret.argument {
                collect_expr(argument, names);
            }
        }
        Stmt::If(if_stmt) => {
            collect_expr(&if_stmt.test, names);
            collect_stmt(&if_stmt.consequent, names);
            if let Some(alternate) = &if_stmt.alternate {
                collect_stmt(alternate, names);
            }
        }
        Stmt::Block(block) => collect_stmts(&block.body, names),
        Stmt::Expr(stmt) => collect_expr(&stmt.expr, names),
        Stmt::Empty => {}
    }
}

fn collect_expr(expr: &Expr, names: &mut FxHashSet<String>) {
    match expr {
        Expr::Ident(ident) => {
            names.insert(ident.name.clone());
        }
        Expr::Lit(_) => {}
        Expr::Array(array) => {
            for element in &array.elements {
                collect_expr(element, names);
            }
        }
        Expr::Unary(unary) => collect_expr(&unary.argument, names),
        Expr::Binary(binary) => {
            collect_expr(&binary.left, names);
            collect_expr(&binary.right, names);
        }
        Expr::Cond(cond) => {
            collect_expr(&cond.test, names);
            collect_expr(&cond.consequent, names);
            collect_expr(&cond.alternate, names);
        }
        Expr::Assign(assign) => {
            collect_expr(&assign.target, names);
            collect_expr(&assign.value, names);
        }
        Expr::Call(call) => {
            collect_expr(&call.callee, names);
            for argument in &call.arguments {
                collect_expr(argument, names);
            }
        }
        Expr::New(new) => {
            collect_expr(&new.callee, names);
            for argument in &new.arguments {
                collect_expr(argument, names);
            }
        }
        Expr::Member(member) => collect_expr(&member.object, names),
        Expr::Paren(inner) => collect_expr(inner, names),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::{parser::parse_module, printer::print_module};

    use super::*;

    #[test]
    fn test_repeated_requests_reuse_one_import() {
        let mut module = parse_module("f();").expect("Failed to parse");
        let mut injector = ImportInjector::new(&module);

        let first = injector
            .inject_default("Button", "ui-lib/lib/button")
            .expect("inject failed");
        let second = injector
            .inject_default("Button", "ui-lib/lib/button")
            .expect("inject failed");
        assert_eq!(first, second);
        assert_eq!(injector.len(), 1);

        injector.apply(&mut module);
        assert_eq!(
            print_module(&module),
            "import _Button from 'ui-lib/lib/button';\nf();\n"
        );
    }

    #[test]
    fn test_uid_avoids_existing_names() {
        let module = parse_module("const _Button = 1;").expect("Failed to parse");
        let mut injector = ImportInjector::new(&module);
        let reference = injector
            .inject_default("Button", "ui-lib/lib/button")
            .expect("inject failed");
        assert_eq!(reference.as_ident(), Some("_Button2"));
    }

    #[test]
    fn test_named_and_side_effect_order_is_insertion_order() {
        let mut module = parse_module("g();").expect("Failed to parse");
        let mut injector = ImportInjector::new(&module);
        injector
            .inject_named("Icon", "ui-lib/lib/icon")
            .expect("inject failed");
        injector
            .inject_side_effect("ui-lib/lib/icon/style")
            .expect("inject failed");
        injector
            .inject_side_effect("ui-lib/lib/icon/style")
            .expect("inject failed");
        injector.apply(&mut module);
        assert_eq!(
            print_module(&module),
            "import { Icon as _Icon } from 'ui-lib/lib/icon';\nimport 'ui-lib/lib/icon/style';\ng();\n"
        );
    }

    #[test]
    fn test_empty_specifier_is_rejected() {
        let module = parse_module("").expect("Failed to parse");
        let mut injector = ImportInjector::new(&module);
        assert!(injector.inject_default("X", "").is_err());
    }
}
