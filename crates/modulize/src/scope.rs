//! Lexical scope stack for binding resolution during traversal
//!
//! Each frame holds the names hoisted for one lexical scope (module body,
//! function or method body, block). `resolve` walks from the innermost frame
//! outward, which is what lets the rewriter distinguish a reference to a
//! scanned import from a same-named local or parameter.

use rustc_hash::FxHashMap;

use crate::ast::{NodeId, Stmt};

/// What introduced a name into scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Bound by the import declaration with this node id.
    Import { decl: NodeId },
    /// Parameter, declarator, function or class name.
    Local,
}

#[derive(Debug, Default)]
pub struct ScopeStack {
    frames: Vec<FxHashMap<String, BindingKind>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the module scope, hoisting top-level declarations including
    /// import bindings.
    pub fn enter_module(&mut self, body: &[Stmt]) {
        self.frames.push(FxHashMap::default());
        self.hoist(body);
    }

    /// Enter a function or method scope: parameters plus hoisted body
    /// declarations.
    pub fn enter_function(&mut self, params: &[String], body: &[Stmt]) {
        self.frames.push(FxHashMap::default());
        for param in params {
            self.declare(param.clone(), BindingKind::Local);
        }
        self.hoist(body);
    }

    /// Enter a block scope (`{ ... }`, `if` branches).
    pub fn enter_block(&mut self, body: &[Stmt]) {
        self.frames.push(FxHashMap::default());
        self.hoist(body);
    }

    pub fn exit(&mut self) {
        self.frames.pop();
    }

    /// Innermost binding for `name`, if any.
    pub fn resolve(&self, name: &str) -> Option<BindingKind> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name).copied())
    }

    pub fn has_binding(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    fn declare(&mut self, name: String, kind: BindingKind) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(name, kind);
        }
    }

    /// Shallow hoist of the declarations a statement list introduces into the
    /// current frame. Nested function and block bodies get their own frames
    /// when the traversal reaches them.
    fn hoist(&mut self, body: &[Stmt]) {
        for stmt in body {
            match stmt {
                Stmt::Import(decl) => {
                    for specifier in &decl.specifiers {
                        self.declare(
                            specifier.local().to_owned(),
                            BindingKind::Import { decl: decl.node_id },
                        );
                    }
                }
                Stmt::Func(func) => self.declare(func.name.clone(), BindingKind::Local),
                Stmt::Class(class) => self.declare(class.name.clone(), BindingKind::Local),
                Stmt::Var(var) => {
                    for declarator in &var.declarators {
                        self.declare(declarator.name.clone(), BindingKind::Local);
                    }
                }
                _ => {}
            }
        }
    }
}
