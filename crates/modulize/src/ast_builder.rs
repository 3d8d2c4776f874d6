//! AST builder module for creating synthetic AST nodes
//!
//! Factory functions for nodes that don't originate from source files, used
//! by the import injector and by tests.

use crate::ast::{
    CallExpr, Expr, Ident, ImportDecl, ImportSpecifier, Lit, MemberExpr, NodeId, Stmt,
};

/// Create a default import: `import local from 'source'`
pub fn import_default(node_id: NodeId, local: &str, source: &str) -> Stmt {
    Stmt::Import(ImportDecl {
        node_id,
        specifiers: vec![ImportSpecifier::Default {
            local: local.to_owned(),
        }],
        source: source.to_owned(),
    })
}

/// Create a named import with alias: `import { imported as local } from 'source'`
pub fn import_named(node_id: NodeId, imported: &str, local: &str, source: &str) -> Stmt {
    Stmt::Import(ImportDecl {
        node_id,
        specifiers: vec![ImportSpecifier::Named {
            imported: imported.to_owned(),
            local: local.to_owned(),
        }],
        source: source.to_owned(),
    })
}

/// Create a side-effect import: `import 'source'`
pub fn import_side_effect(node_id: NodeId, source: &str) -> Stmt {
    Stmt::Import(ImportDecl {
        node_id,
        specifiers: Vec::new(),
        source: source.to_owned(),
    })
}

/// Create a name expression: `name`
pub fn ident(name: &str) -> Expr {
    Expr::Ident(Ident {
        name: name.to_owned(),
    })
}

/// Create a member expression: `obj.prop`
pub fn member(obj: Expr, prop: &str) -> Expr {
    Expr::Member(MemberExpr {
        object: Box::new(obj),
        property: prop.to_owned(),
    })
}

/// Create a function call: `callee(arg1, arg2, ...)`
pub fn call(callee: Expr, arguments: Vec<Expr>) -> Expr {
    Expr::Call(CallExpr {
        callee: Box::new(callee),
        arguments,
    })
}

/// Create a string literal: `'value'`
pub fn string(value: &str) -> Expr {
    Expr::Lit(Lit::Str(value.to_owned()))
}
