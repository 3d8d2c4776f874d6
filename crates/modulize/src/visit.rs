//! Host traversal engine
//!
//! Walks one module in document order, outer shapes before inner ones, and
//! dispatches typed callbacks to every registered pass at the positions the
//! rewriters care about. The traversal owns scope entry/exit; passes observe
//! the current scope through the shared [`FileContext`]. After the walk each
//! pass gets a distinct end-of-program callback.

use anyhow::Result;
use rustc_hash::FxHashSet;

use crate::{
    ast::{CallExpr, ClassDecl, CondExpr, Expr, ImportDecl, Module, NodeId, ReturnStmt, Stmt},
    injector::ImportInjector,
    scope::ScopeStack,
};

/// Per-file host state shared by all passes over one traversal: the scope
/// stack, the import injector, and the ids of declarations already detached
/// from the tree (the stale-node guard consults this).
#[derive(Debug)]
pub struct FileContext {
    pub scopes: ScopeStack,
    pub injector: ImportInjector,
    detached: FxHashSet<NodeId>,
}

impl FileContext {
    pub fn new(module: &Module) -> Self {
        Self {
            scopes: ScopeStack::new(),
            injector: ImportInjector::new(module),
            detached: FxHashSet::default(),
        }
    }

    /// Record that a declaration has been physically removed from the tree.
    pub fn mark_detached(&mut self, id: NodeId) {
        self.detached.insert(id);
    }

    pub fn is_detached(&self, id: NodeId) -> bool {
        self.detached.contains(&id)
    }
}

/// A transform pass. Callbacks default to no-ops; implementations override
/// the positions they care about. Any error aborts the file's traversal.
pub trait Pass {
    fn import_declaration(&mut self, _decl: &ImportDecl, _cx: &mut FileContext) -> Result<()> {
        Ok(())
    }

    fn call_expression(&mut self, _call: &mut CallExpr, _cx: &mut FileContext) -> Result<()> {
        Ok(())
    }

    fn conditional_expression(&mut self, _cond: &mut CondExpr, _cx: &mut FileContext) -> Result<()> {
        Ok(())
    }

    fn return_statement(&mut self, _ret: &mut ReturnStmt, _cx: &mut FileContext) -> Result<()> {
        Ok(())
    }

    fn class_declaration(&mut self, _class: &mut ClassDecl, _cx: &mut FileContext) -> Result<()> {
        Ok(())
    }

    /// Runs once per file after traversal completes.
    fn program_exit(&mut self, _module: &mut Module, _cx: &mut FileContext) -> Result<()> {
        Ok(())
    }
}

/// Run one document-order traversal over `module`, dispatching to `passes`
/// in registration order at each position, then fire `program_exit` for each
/// pass.
pub fn traverse(
    module: &mut Module,
    passes: &mut [&mut dyn Pass],
    cx: &mut FileContext,
) -> Result<()> {
    cx.scopes.enter_module(&module.body);
    let walked = walk_stmts(&mut module.body, passes, cx);
    cx.scopes.exit();
    walked?;
    for pass in passes.iter_mut() {
        pass.program_exit(module, cx)?;
    }
    Ok(())
}

fn walk_stmts(
    stmts: &mut [Stmt],
    passes: &mut [&mut dyn Pass],
    cx: &mut FileContext,
) -> Result<()> {
    for stmt in stmts {
        walk_stmt(stmt, passes, cx)?;
    }
    Ok(())
}

fn walk_stmt(stmt: &mut Stmt, passes: &mut [&mut dyn Pass], cx: &mut FileContext) -> Result<()> {
    match stmt {
        Stmt::Import(decl) => {
            for pass in passes.iter_mut() {
                pass.import_declaration(decl, cx)?;
            }
        }
        Stmt::Func(func) => {
            cx.scopes.enter_function(&func.params, &func.body);
            let walked = walk_stmts(&mut func.body, passes, cx);
            cx.scopes.exit();
            walked?;
        }
        Stmt::Class(class) => {
            for pass in passes.iter_mut() {
                pass.class_declaration(class, cx)?;
            }
            if let Some(super_class) = &mut class.super_class {
                walk_expr(super_class, passes, cx)?;
            }
            for method in &mut class.methods {
                cx.scopes.enter_function(&method.params, &method.body);
                let walked = walk_stmts(&mut method.body, passes, cx);
                cx.scopes.exit();
                walked?;
            }
        }
        Stmt::Var(var) => {
            for declarator in &mut var.declarators {
                if let Some(init) = &mut declarator.init {
                    walk_expr(init, passes, cx)?;
                }
            }
        }
        Stmt::Return(ret) => {
            for pass in passes.iter_mut() {
                pass.return_statement(ret, cx)?;
            }
            if let Some(argument) = &mut ret.argument {
                walk_expr(argument, passes, cx)?;
            }
        }
        Stmt::If(if_stmt) => {
            walk_expr(&mut if_stmt.test, passes, cx)?;
            walk_stmt(&mut if_stmt.consequent, passes, cx)?;
            if let Some(alternate) = &mut if_stmt.alternate {
                walk_stmt(alternate, passes, cx)?;
            }
        }
        Stmt::Block(block) => {
            cx.scopes.enter_block(&block.body);
            let walked = walk_stmts(&mut block.body, passes, cx);
            cx.scopes.exit();
            walked?;
        }
        Stmt::Expr(stmt) => walk_expr(&mut stmt.expr, passes, cx)?,
        Stmt::Empty => {}
    }
    Ok(())
}

fn walk_expr(expr: &mut Expr, passes: &mut [&mut dyn Pass], cx: &mut FileContext) -> Result<()> {
    match expr {
        Expr::Call(call) => {
            for pass in passes.iter_mut() {
                pass.call_expression(call, cx)?;
            }
            walk_expr(&mut call.callee, passes, cx)?;
            for argument in &mut call.arguments {
                walk_expr(argument, passes, cx)?;
            }
        }
        Expr::Cond(cond) => {
            for pass in passes.iter_mut() {
                pass.conditional_expression(cond, cx)?;
            }
            walk_expr(&mut cond.test, passes, cx)?;
            walk_expr(&mut cond.consequent, passes, cx)?;
            walk_expr(&mut cond.alternate, passes, cx)?;
        }
        Expr::New(new) => {
            walk_expr(&mut new.callee, passes, cx)?;
            for argument in &mut new.arguments {
                walk_expr(argument, passes, cx)?;
            }
        }
        Expr::Member(member) => walk_expr(&mut member.object, passes, cx)?,
        Expr::Unary(unary) => walk_expr(&mut unary.argument, passes, cx)?,
        Expr::Binary(binary) => {
            walk_expr(&mut binary.left, passes, cx)?;
            walk_expr(&mut binary.right, passes, cx)?;
        }
        Expr::Assign(assign) => {
            walk_expr(&mut assign.target, passes, cx)?;
            walk_expr(&mut assign.value, passes, cx)?;
        }
        Expr::Array(array) => {
            for element in &mut array.elements {
                walk_expr(element, passes, cx)?;
            }
        }
        Expr::Paren(inner) => walk_expr(inner, passes, cx)?,
        Expr::Ident(_) | Expr::Lit(_) => {}
    }
    Ok(())
}
