//! AST definitions for the supported JavaScript subset
//!
//! The tree is deliberately small: it covers the statement and expression
//! forms the rewriter needs to observe (imports, the four rewrite positions)
//! plus enough surrounding syntax to host them in realistic source files.

use std::fmt;

/// Stable identity for an import declaration.
///
/// Removal bookkeeping keys on this id, never on node addresses, so the
/// "already removed" question stays answerable after the statement has been
/// detached from the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Monotonic allocator for [`NodeId`]s, owned by the module it indexes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeIdGen {
    next: u32,
}

impl NodeIdGen {
    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// A parsed source file: the statement list plus the id allocator that
/// numbered its import declarations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Module {
    pub body: Vec<Stmt>,
    pub ids: NodeIdGen,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Import(ImportDecl),
    Func(FuncDecl),
    Class(ClassDecl),
    Var(VarDecl),
    Return(ReturnStmt),
    If(IfStmt),
    Block(BlockStmt),
    Expr(ExprStmt),
    Empty,
}

/// An import declaration: `import <specifiers> from '<source>'` or a bare
/// side-effect `import '<source>'`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub node_id: NodeId,
    pub specifiers: Vec<ImportSpecifier>,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportSpecifier {
    /// `import { imported as local }` (local == imported when no alias)
    Named { imported: String, local: String },
    /// `import local`
    Default { local: String },
    /// `import * as local`
    Namespace { local: String },
}

impl ImportSpecifier {
    /// The name this specifier binds in the importing file.
    pub fn local(&self) -> &str {
        match self {
            ImportSpecifier::Named { local, .. }
            | ImportSpecifier::Default { local }
            | ImportSpecifier::Namespace { local } => local,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    pub super_class: Option<Expr>,
    pub methods: Vec<MethodDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDef {
    pub name: String,
    pub params: Vec<String>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub kind: VarKind,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarKind::Var => write!(f, "var"),
            VarKind::Let => write!(f, "let"),
            VarKind::Const => write!(f, "const"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Declarator {
    pub name: String,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub argument: Option<Expr>,
}

/// `if (test) consequent [else alternate]`; branches are usually blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub test: Expr,
    pub consequent: Box<Stmt>,
    pub alternate: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BlockStmt {
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    Lit(Lit),
    Array(ArrayLit),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    Cond(CondExpr),
    Assign(AssignExpr),
    Call(CallExpr),
    New(NewExpr),
    Member(MemberExpr),
    Paren(Box<Expr>),
}

impl Expr {
    /// Identifier name if the expression is a bare identifier reference.
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Expr::Ident(ident) => Some(&ident.name),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Lit {
    Str(String),
    Num(f64),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLit {
    pub elements: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub argument: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
            UnaryOp::Neg => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub left: Box<Expr>,
    pub right: Box<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    StrictEq,
    StrictNotEq,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Binding power for the precedence-climbing parser; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::StrictEq | BinaryOp::StrictNotEq | BinaryOp::Eq | BinaryOp::NotEq => 3,
            BinaryOp::Lt | BinaryOp::Gt | BinaryOp::LtEq | BinaryOp::GtEq => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div => 6,
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            BinaryOp::Or => "||",
            BinaryOp::And => "&&",
            BinaryOp::StrictEq => "===",
            BinaryOp::StrictNotEq => "!==",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Gt => ">",
            BinaryOp::LtEq => "<=",
            BinaryOp::GtEq => ">=",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        };
        write!(f, "{op}")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CondExpr {
    pub test: Box<Expr>,
    pub consequent: Box<Expr>,
    pub alternate: Box<Expr>,
}

/// Plain `target = value` assignment; compound operators are out of scope.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub target: Box<Expr>,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewExpr {
    pub callee: Box<Expr>,
    pub arguments: Vec<Expr>,
}

/// Static member access `object.property`; computed access is out of scope.
#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpr {
    pub object: Box<Expr>,
    pub property: String,
}
