//! Lexer and recursive-descent parser for the supported JavaScript subset
//!
//! The grammar covers every import form plus the statement and expression
//! shapes the rewriter inspects. Semicolons are optional where JavaScript
//! permits; `//` and `/* */` comments are skipped. Parse errors carry the
//! line and column of the offending token.

use anyhow::{Result, bail};

use crate::ast::{
    ArrayLit, AssignExpr, BinaryExpr, BinaryOp, BlockStmt, CallExpr, ClassDecl, CondExpr,
    Declarator, Expr, ExprStmt, FuncDecl, Ident, IfStmt, ImportDecl, ImportSpecifier, Lit,
    MemberExpr, MethodDef, Module, NewExpr, NodeIdGen, ReturnStmt, Stmt, UnaryExpr, UnaryOp,
    VarDecl, VarKind,
};

/// Parse a complete source file.
pub fn parse_module(source: &str) -> Result<Module> {
    let tokens = Lexer::new(source).tokenize()?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        ids: NodeIdGen::default(),
    };
    let mut body = Vec::new();
    while !parser.at_eof() {
        body.push(parser.parse_stmt()?);
    }
    Ok(Module {
        body,
        ids: parser.ids,
    })
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Ident(String),
    Str(String),
    Num(f64),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semi,
    Dot,
    Colon,
    Question,
    Star,
    Assign,
    OrOr,
    AndAnd,
    StrictEq,
    StrictNotEq,
    EqEq,
    NotEq,
    LtEq,
    GtEq,
    Lt,
    Gt,
    Plus,
    Minus,
    Slash,
    Bang,
    Eof,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("`{name}`"),
            TokenKind::Str(_) => "string literal".to_owned(),
            TokenKind::Num(_) => "number literal".to_owned(),
            TokenKind::Eof => "end of input".to_owned(),
            other => format!("{other:?}"),
        }
    }
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    line: u32,
    col: u32,
}

struct Lexer<'a> {
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: u32,
    col: u32,
}

impl<'a> Lexer<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            col: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.chars.peek() == Some(&expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            let (line, col) = (self.line, self.col);
            let Some(c) = self.bump() else {
                tokens.push(Token {
                    kind: TokenKind::Eof,
                    line,
                    col,
                });
                return Ok(tokens);
            };
            let kind = match c {
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                ',' => TokenKind::Comma,
                ';' => TokenKind::Semi,
                '.' => TokenKind::Dot,
                ':' => TokenKind::Colon,
                '?' => TokenKind::Question,
                '*' => TokenKind::Star,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '/' => TokenKind::Slash,
                '=' => {
                    if self.eat('=') {
                        if self.eat('=') {
                            TokenKind::StrictEq
                        } else {
                            TokenKind::EqEq
                        }
                    } else {
                        TokenKind::Assign
                    }
                }
                '!' => {
                    if self.eat('=') {
                        if self.eat('=') {
                            TokenKind::StrictNotEq
                        } else {
                            TokenKind::NotEq
                        }
                    } else {
                        TokenKind::Bang
                    }
                }
                '<' => {
                    if self.eat('=') {
                        TokenKind::LtEq
                    } else {
                        TokenKind::Lt
                    }
                }
                '>' => {
                    if self.eat('=') {
                        TokenKind::GtEq
                    } else {
                        TokenKind::Gt
                    }
                }
                '|' => {
                    if self.eat('|') {
                        TokenKind::OrOr
                    } else {
                        bail!("unexpected character `|` at {line}:{col}");
                    }
                }
                '&' => {
                    if self.eat('&') {
                        TokenKind::AndAnd
                    } else {
                        bail!("unexpected character `&` at {line}:{col}");
                    }
                }
                '\'' | '"' => self.lex_string(c, line, col)?,
                c if c.is_ascii_digit() => self.lex_number(c),
                c if is_ident_start(c) => self.lex_ident(c),
                other => bail!("unexpected character `{other}` at {line}:{col}"),
            };
            tokens.push(Token { kind, line, col });
        }
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    // Only consume when it actually starts a comment.
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    match lookahead.peek() {
                        Some('/') => {
                            while let Some(&c) = self.chars.peek() {
                                if c == '\n' {
                                    break;
                                }
                                self.bump();
                            }
                        }
                        Some('*') => {
                            let (line, col) = (self.line, self.col);
                            self.bump();
                            self.bump();
                            loop {
                                match self.bump() {
                                    Some('*') if self.eat('/') => break,
                                    Some(_) => {}
                                    None => bail!("unterminated comment at {line}:{col}"),
                                }
                            }
                        }
                        _ => return Ok(()),
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn lex_string(&mut self, quote: char, line: u32, col: u32) -> Result<TokenKind> {
        let mut value = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(TokenKind::Str(value)),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some(c) => value.push(c),
                    None => bail!("unterminated string at {line}:{col}"),
                },
                Some('\n') | None => bail!("unterminated string at {line}:{col}"),
                Some(c) => value.push(c),
            }
        }
    }

    fn lex_number(&mut self, first: char) -> TokenKind {
        let mut text = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        // The char set above guarantees a parseable number.
        TokenKind::Num(text.parse().unwrap_or(0.0))
    }

    fn lex_ident(&mut self, first: char) -> TokenKind {
        let mut name = String::from(first);
        while let Some(&c) = self.chars.peek() {
            if is_ident_continue(c) {
                name.push(c);
                self.bump();
            } else {
                break;
            }
        }
        TokenKind::Ident(name)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    ids: NodeIdGen,
}

impl Parser {
    fn current(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn at_eof(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if !matches!(token.kind, TokenKind::Eof) {
            self.pos += 1;
        }
        token
    }

    fn check(&self, kind: &TokenKind) -> bool {
        self.current().kind == *kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind) -> Result<Token> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let token = self.current();
            bail!(
                "expected {} but found {} at {}:{}",
                kind.describe(),
                token.kind.describe(),
                token.line,
                token.col
            )
        }
    }

    /// True when the current token is the identifier `word` (keywords are
    /// contextual in this subset).
    fn at_keyword(&self, word: &str) -> bool {
        matches!(&self.current().kind, TokenKind::Ident(name) if name == word)
    }

    fn eat_keyword(&mut self, word: &str) -> bool {
        if self.at_keyword(word) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect_keyword(&mut self, word: &str) -> Result<()> {
        if self.eat_keyword(word) {
            Ok(())
        } else {
            let token = self.current();
            bail!(
                "expected `{word}` but found {} at {}:{}",
                token.kind.describe(),
                token.line,
                token.col
            )
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match &self.current().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            other => {
                let (line, col) = (self.current().line, self.current().col);
                bail!(
                    "expected identifier but found {} at {line}:{col}",
                    other.describe()
                )
            }
        }
    }

    fn expect_string(&mut self) -> Result<String> {
        match &self.current().kind {
            TokenKind::Str(value) => {
                let value = value.clone();
                self.advance();
                Ok(value)
            }
            other => {
                let (line, col) = (self.current().line, self.current().col);
                bail!(
                    "expected string literal but found {} at {line}:{col}",
                    other.describe()
                )
            }
        }
    }

    fn eat_semi(&mut self) {
        self.eat(&TokenKind::Semi);
    }

    fn parse_stmt(&mut self) -> Result<Stmt> {
        if self.at_keyword("import") {
            return self.parse_import();
        }
        if self.at_keyword("function") {
            return self.parse_function().map(Stmt::Func);
        }
        if self.at_keyword("class") {
            return self.parse_class();
        }
        if self.at_keyword("var") || self.at_keyword("let") || self.at_keyword("const") {
            return self.parse_var();
        }
        if self.at_keyword("return") {
            return self.parse_return();
        }
        if self.at_keyword("if") {
            return self.parse_if();
        }
        if self.check(&TokenKind::LBrace) {
            return self.parse_block().map(Stmt::Block);
        }
        if self.eat(&TokenKind::Semi) {
            return Ok(Stmt::Empty);
        }
        let expr = self.parse_expr()?;
        self.eat_semi();
        Ok(Stmt::Expr(ExprStmt { expr }))
    }

    fn parse_import(&mut self) -> Result<Stmt> {
        self.expect_keyword("import")?;
        let node_id = self.ids.fresh();

        // Bare side-effect form: import 'source'
        if let TokenKind::Str(_) = self.current().kind {
            let source = self.expect_string()?;
            self.eat_semi();
            return Ok(Stmt::Import(ImportDecl {
                node_id,
                specifiers: Vec::new(),
                source,
            }));
        }

        let mut specifiers = Vec::new();
        if let TokenKind::Ident(_) = self.current().kind {
            let local = self.expect_ident()?;
            specifiers.push(ImportSpecifier::Default { local });
            if self.eat(&TokenKind::Comma) {
                self.parse_non_default_specifiers(&mut specifiers)?;
            }
        } else {
            self.parse_non_default_specifiers(&mut specifiers)?;
        }

        self.expect_keyword("from")?;
        let source = self.expect_string()?;
        self.eat_semi();
        Ok(Stmt::Import(ImportDecl {
            node_id,
            specifiers,
            source,
        }))
    }

    fn parse_non_default_specifiers(
        &mut self,
        specifiers: &mut Vec<ImportSpecifier>,
    ) -> Result<()> {
        if self.eat(&TokenKind::Star) {
            self.expect_keyword("as")?;
            let local = self.expect_ident()?;
            specifiers.push(ImportSpecifier::Namespace { local });
            return Ok(());
        }
        self.expect(&TokenKind::LBrace)?;
        while !self.eat(&TokenKind::RBrace) {
            let imported = self.expect_ident()?;
            let local = if self.eat_keyword("as") {
                self.expect_ident()?
            } else {
                imported.clone()
            };
            specifiers.push(ImportSpecifier::Named { imported, local });
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBrace)?;
                break;
            }
        }
        Ok(())
    }

    fn parse_function(&mut self) -> Result<FuncDecl> {
        self.expect_keyword("function")?;
        let name = self.expect_ident()?;
        let params = self.parse_params()?;
        let body = self.parse_block()?.body;
        Ok(FuncDecl { name, params, body })
    }

    fn parse_params(&mut self) -> Result<Vec<String>> {
        self.expect(&TokenKind::LParen)?;
        let mut params = Vec::new();
        while !self.eat(&TokenKind::RParen) {
            params.push(self.expect_ident()?);
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RParen)?;
                break;
            }
        }
        Ok(params)
    }

    fn parse_class(&mut self) -> Result<Stmt> {
        self.expect_keyword("class")?;
        let name = self.expect_ident()?;
        let super_class = if self.eat_keyword("extends") {
            Some(self.parse_lhs_expr()?)
        } else {
            None
        };
        self.expect(&TokenKind::LBrace)?;
        let mut methods = Vec::new();
        while !self.eat(&TokenKind::RBrace) {
            if self.eat(&TokenKind::Semi) {
                continue;
            }
            let method_name = self.expect_ident()?;
            let params = self.parse_params()?;
            let body = self.parse_block()?.body;
            methods.push(MethodDef {
                name: method_name,
                params,
                body,
            });
        }
        Ok(Stmt::Class(ClassDecl {
            name,
            super_class,
            methods,
        }))
    }

    fn parse_var(&mut self) -> Result<Stmt> {
        let kind = if self.eat_keyword("var") {
            VarKind::Var
        } else if self.eat_keyword("let") {
            VarKind::Let
        } else {
            self.expect_keyword("const")?;
            VarKind::Const
        };
        let mut declarators = Vec::new();
        loop {
            let name = self.expect_ident()?;
            let init = if self.eat(&TokenKind::Assign) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            declarators.push(Declarator { name, init });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.eat_semi();
        Ok(Stmt::Var(VarDecl { kind, declarators }))
    }

    fn parse_return(&mut self) -> Result<Stmt> {
        self.expect_keyword("return")?;
        let argument = if self.check(&TokenKind::Semi)
            || self.check(&TokenKind::RBrace)
            || self.at_eof()
        {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.eat_semi();
        Ok(Stmt::Return(ReturnStmt { argument }))
    }

    fn parse_if(&mut self) -> Result<Stmt> {
        self.expect_keyword("if")?;
        self.expect(&TokenKind::LParen)?;
        let test = self.parse_expr()?;
        self.expect(&TokenKind::RParen)?;
        let consequent = Box::new(self.parse_stmt()?);
        let alternate = if self.eat_keyword("else") {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        Ok(Stmt::If(IfStmt {
            test,
            consequent,
            alternate,
        }))
    }

    fn parse_block(&mut self) -> Result<BlockStmt> {
        self.expect(&TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !self.eat(&TokenKind::RBrace) {
            body.push(self.parse_stmt()?);
        }
        Ok(BlockStmt { body })
    }

    fn parse_expr(&mut self) -> Result<Expr> {
        let left = self.parse_cond()?;
        if !self.eat(&TokenKind::Assign) {
            return Ok(left);
        }
        if !matches!(left, Expr::Ident(_) | Expr::Member(_)) {
            let token = self.current();
            bail!(
                "invalid assignment target at {}:{}",
                token.line,
                token.col
            );
        }
        let value = self.parse_expr()?;
        Ok(Expr::Assign(AssignExpr {
            target: Box::new(left),
            value: Box::new(value),
        }))
    }

    fn parse_cond(&mut self) -> Result<Expr> {
        let test = self.parse_binary(0)?;
        if !self.eat(&TokenKind::Question) {
            return Ok(test);
        }
        let consequent = self.parse_cond()?;
        self.expect(&TokenKind::Colon)?;
        let alternate = self.parse_cond()?;
        Ok(Expr::Cond(CondExpr {
            test: Box::new(test),
            consequent: Box::new(consequent),
            alternate: Box::new(alternate),
        }))
    }

    fn binary_op(&self) -> Option<BinaryOp> {
        match self.current().kind {
            TokenKind::OrOr => Some(BinaryOp::Or),
            TokenKind::AndAnd => Some(BinaryOp::And),
            TokenKind::StrictEq => Some(BinaryOp::StrictEq),
            TokenKind::StrictNotEq => Some(BinaryOp::StrictNotEq),
            TokenKind::EqEq => Some(BinaryOp::Eq),
            TokenKind::NotEq => Some(BinaryOp::NotEq),
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::LtEq => Some(BinaryOp::LtEq),
            TokenKind::GtEq => Some(BinaryOp::GtEq),
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            _ => None,
        }
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.binary_op() {
            let prec = op.precedence();
            if prec <= min_prec {
                break;
            }
            self.advance();
            let right = self.parse_binary(prec)?;
            left = Expr::Binary(BinaryExpr {
                op,
                left: Box::new(left),
                right: Box::new(right),
            });
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr> {
        let op = match self.current().kind {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Neg),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let argument = self.parse_unary()?;
            return Ok(Expr::Unary(UnaryExpr {
                op,
                argument: Box::new(argument),
            }));
        }
        self.parse_lhs_expr()
    }

    /// Member/call chains over a primary expression, including `new`.
    fn parse_lhs_expr(&mut self) -> Result<Expr> {
        let mut expr = if self.at_keyword("new") {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        loop {
            if self.eat(&TokenKind::Dot) {
                let property = self.expect_ident()?;
                expr = Expr::Member(MemberExpr {
                    object: Box::new(expr),
                    property,
                });
            } else if self.check(&TokenKind::LParen) {
                let arguments = self.parse_arguments()?;
                expr = Expr::Call(CallExpr {
                    callee: Box::new(expr),
                    arguments,
                });
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_new(&mut self) -> Result<Expr> {
        self.expect_keyword("new")?;
        // The callee is a member chain; the first argument list belongs to
        // the `new` expression itself.
        let mut callee = self.parse_primary()?;
        while self.eat(&TokenKind::Dot) {
            let property = self.expect_ident()?;
            callee = Expr::Member(MemberExpr {
                object: Box::new(callee),
                property,
            });
        }
        let arguments = if self.check(&TokenKind::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(Expr::New(NewExpr {
            callee: Box::new(callee),
            arguments,
        }))
    }

    fn parse_arguments(&mut self) -> Result<Vec<Expr>> {
        self.expect(&TokenKind::LParen)?;
        let mut arguments = Vec::new();
        while !self.eat(&TokenKind::RParen) {
            arguments.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RParen)?;
                break;
            }
        }
        Ok(arguments)
    }

    fn parse_primary(&mut self) -> Result<Expr> {
        if self.eat(&TokenKind::LParen) {
            let inner = self.parse_expr()?;
            self.expect(&TokenKind::RParen)?;
            return Ok(Expr::Paren(Box::new(inner)));
        }
        if self.eat(&TokenKind::LBracket) {
            let mut elements = Vec::new();
            while !self.eat(&TokenKind::RBracket) {
                elements.push(self.parse_expr()?);
                if !self.eat(&TokenKind::Comma) {
                    self.expect(&TokenKind::RBracket)?;
                    break;
                }
            }
            return Ok(Expr::Array(ArrayLit { elements }));
        }
        match self.current().kind.clone() {
            TokenKind::Str(value) => {
                self.advance();
                Ok(Expr::Lit(Lit::Str(value)))
            }
            TokenKind::Num(value) => {
                self.advance();
                Ok(Expr::Lit(Lit::Num(value)))
            }
            TokenKind::Ident(name) => {
                self.advance();
                match name.as_str() {
                    "true" => Ok(Expr::Lit(Lit::Bool(true))),
                    "false" => Ok(Expr::Lit(Lit::Bool(false))),
                    "null" => Ok(Expr::Lit(Lit::Null)),
                    _ => Ok(Expr::Ident(Ident { name })),
                }
            }
            other => {
                let (line, col) = (self.current().line, self.current().col);
                bail!(
                    "expected expression but found {} at {line}:{col}",
                    other.describe()
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_import() {
        let module = parse_module("import { Button, Icon as MyIcon } from 'ui-lib';")
            .expect("Failed to parse");
        assert_eq!(module.body.len(), 1);
        match &module.body[0] {
            Stmt::Import(decl) => {
                assert_eq!(decl.source, "ui-lib");
                assert_eq!(
                    decl.specifiers,
                    vec![
                        ImportSpecifier::Named {
                            imported: "Button".to_owned(),
                            local: "Button".to_owned(),
                        },
                        ImportSpecifier::Named {
                            imported: "Icon".to_owned(),
                            local: "MyIcon".to_owned(),
                        },
                    ]
                );
            }
            other => panic!("Expected import, got {other:?}"),
        }
    }

    #[test]
    fn test_default_and_namespace_imports() {
        let module = parse_module("import UI, { Button } from 'ui-lib'\nimport * as All from 'other-lib'")
            .expect("Failed to parse");
        match &module.body[0] {
            Stmt::Import(decl) => {
                assert!(matches!(
                    &decl.specifiers[0],
                    ImportSpecifier::Default { local } if local == "UI"
                ));
                assert!(matches!(
                    &decl.specifiers[1],
                    ImportSpecifier::Named { imported, .. } if imported == "Button"
                ));
            }
            other => panic!("Expected import, got {other:?}"),
        }
        match &module.body[1] {
            Stmt::Import(decl) => {
                assert!(matches!(
                    &decl.specifiers[0],
                    ImportSpecifier::Namespace { local } if local == "All"
                ));
            }
            other => panic!("Expected import, got {other:?}"),
        }
    }

    #[test]
    fn test_side_effect_import() {
        let module = parse_module("import 'ui-lib/lib/button/style';").expect("Failed to parse");
        match &module.body[0] {
            Stmt::Import(decl) => {
                assert!(decl.specifiers.is_empty());
                assert_eq!(decl.source, "ui-lib/lib/button/style");
            }
            other => panic!("Expected import, got {other:?}"),
        }
    }

    #[test]
    fn test_import_node_ids_are_distinct() {
        let module = parse_module("import { A } from 'a'\nimport { B } from 'b'")
            .expect("Failed to parse");
        let ids: Vec<_> = module
            .body
            .iter()
            .filter_map(|stmt| match stmt {
                Stmt::Import(decl) => Some(decl.node_id),
                _ => None,
            })
            .collect();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
    }

    #[test]
    fn test_function_with_return() {
        let module = parse_module("function f(a, b) { return a; }").expect("Failed to parse");
        match &module.body[0] {
            Stmt::Func(func) => {
                assert_eq!(func.name, "f");
                assert_eq!(func.params, vec!["a".to_owned(), "b".to_owned()]);
                assert!(matches!(
                    &func.body[0],
                    Stmt::Return(ret) if ret.argument.as_ref().and_then(Expr::as_ident) == Some("a")
                ));
            }
            other => panic!("Expected function, got {other:?}"),
        }
    }

    #[test]
    fn test_class_with_heritage_and_method() {
        let module = parse_module("class App extends Component { render() { return null; } }")
            .expect("Failed to parse");
        match &module.body[0] {
            Stmt::Class(class) => {
                assert_eq!(class.name, "App");
                assert_eq!(
                    class.super_class.as_ref().and_then(Expr::as_ident),
                    Some("Component")
                );
                assert_eq!(class.methods.len(), 1);
                assert_eq!(class.methods[0].name, "render");
            }
            other => panic!("Expected class, got {other:?}"),
        }
    }

    #[test]
    fn test_conditional_expression() {
        let module = parse_module("var x = ok ? Button : Icon;").expect("Failed to parse");
        match &module.body[0] {
            Stmt::Var(var) => match var.declarators[0].init.as_ref() {
                Some(Expr::Cond(cond)) => {
                    assert_eq!(cond.test.as_ident(), Some("ok"));
                    assert_eq!(cond.consequent.as_ident(), Some("Button"));
                    assert_eq!(cond.alternate.as_ident(), Some("Icon"));
                }
                other => panic!("Expected conditional initializer, got {other:?}"),
            },
            other => panic!("Expected var declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_binary_precedence() {
        let module = parse_module("a + b * c === d;").expect("Failed to parse");
        match &module.body[0] {
            Stmt::Expr(stmt) => match &stmt.expr {
                Expr::Binary(eq) => {
                    assert_eq!(eq.op, BinaryOp::StrictEq);
                    match &*eq.left {
                        Expr::Binary(add) => {
                            assert_eq!(add.op, BinaryOp::Add);
                            assert!(matches!(
                                &*add.right,
                                Expr::Binary(mul) if mul.op == BinaryOp::Mul
                            ));
                        }
                        other => panic!("Expected addition on the left, got {other:?}"),
                    }
                }
                other => panic!("Expected binary expression, got {other:?}"),
            },
            other => panic!("Expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_new_expression_keeps_arguments_separate() {
        let module = parse_module("new Button(label).render();").expect("Failed to parse");
        match &module.body[0] {
            Stmt::Expr(stmt) => match &stmt.expr {
                Expr::Call(call) => match &*call.callee {
                    Expr::Member(member) => {
                        assert_eq!(member.property, "render");
                        assert!(matches!(
                            &*member.object,
                            Expr::New(new) if new.arguments.len() == 1
                        ));
                    }
                    other => panic!("Expected member callee, got {other:?}"),
                },
                other => panic!("Expected call, got {other:?}"),
            },
            other => panic!("Expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_assignment_expression() {
        let module = parse_module("exports.Button = Button;").expect("Failed to parse");
        match &module.body[0] {
            Stmt::Expr(stmt) => match &stmt.expr {
                Expr::Assign(assign) => {
                    assert!(matches!(
                        &*assign.target,
                        Expr::Member(member) if member.property == "Button"
                    ));
                    assert_eq!(assign.value.as_ident(), Some("Button"));
                }
                other => panic!("Expected assignment, got {other:?}"),
            },
            other => panic!("Expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn test_comments_are_skipped() {
        let module = parse_module("// leading\nvar x = 1; /* inline */ var y = 2;")
            .expect("Failed to parse");
        assert_eq!(module.body.len(), 2);
    }

    #[test]
    fn test_parse_error_reports_position() {
        let err = parse_module("import { Button from 'ui-lib';").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("1:"), "missing position in: {message}");
    }
}
