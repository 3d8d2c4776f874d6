//! Deterministic source emission for the supported JavaScript subset
//!
//! Fixed conventions: two-space indentation, single-quoted strings,
//! semicolons, one statement per line. The same tree always prints to the
//! same text, which is what makes snapshot assertions on transform output
//! meaningful.

use crate::ast::{Expr, ImportSpecifier, Lit, Module, Stmt};

/// Print a module back to source text. Output always ends with a newline
/// unless the module is empty.
pub fn print_module(module: &Module) -> String {
    let mut printer = Printer {
        out: String::new(),
        indent: 0,
    };
    for stmt in &module.body {
        printer.print_stmt(stmt);
    }
    printer.out
}

struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.out.push_str("  ");
        }
    }

    fn print_stmt(&mut self, stmt: &Stmt) {
        self.write_indent();
        match stmt {
            Stmt::Import(decl) => {
                if decl.specifiers.is_empty() {
                    self.out.push_str("import ");
                } else {
                    self.out.push_str("import ");
                    self.print_specifiers(&decl.specifiers);
                    self.out.push_str(" from ");
                }
                self.print_str_lit(&decl.source);
                self.out.push_str(";\n");
            }
            Stmt::Func(func) => {
                self.out.push_str("function ");
                self.out.push_str(&func.name);
                self.out.push('(');
                self.out.push_str(&func.params.join(", "));
                self.out.push_str(") {\n");
                self.print_body(&func.body);
                self.write_indent();
                self.out.push_str("}\n");
            }
            Stmt::Class(class) => {
                self.out.push_str("class ");
                self.out.push_str(&class.name);
                if let Some(super_class) = &class.super_class {
                    self.out.push_str(" extends ");
                    self.print_expr(super_class);
                }
                self.out.push_str(" {\n");
                self.indent += 1;
                for method in &class.methods {
                    self.write_indent();
                    self.out.push_str(&method.name);
                    self.out.push('(');
                    self.out.push_str(&method.params.join(", "));
                    self.out.push_str(") {\n");
                    self.print_body(&method.body);
                    self.write_indent();
                    self.out.push_str("}\n");
                }
                self.indent -= 1;
                self.write_indent();
                self.out.push_str("}\n");
            }
            Stmt::Var(var) => {
                self.out.push_str(&var.kind.to_string());
                self.out.push(' ');
                for (i, declarator) in var.declarators.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(&declarator.name);
                    if let Some(init) = &declarator.init {
                        self.out.push_str(" = ");
                        self.print_expr(init);
                    }
                }
                self.out.push_str(";\n");
            }
            Stmt::Return(ret) => {
                match &ret.argument {
                    Some(argument) => {
                        self.out.push_str("return ");
                        self.print_expr(argument);
                    }
                    None => self.out.push_str("return"),
                }
                self.out.push_str(";\n");
            }
            Stmt::If(if_stmt) => self.print_if(if_stmt),
            Stmt::Block(block) => {
                self.out.push_str("{\n");
                self.print_body(&block.body);
                self.write_indent();
                self.out.push_str("}\n");
            }
            Stmt::Expr(stmt) => {
                self.print_expr(&stmt.expr);
                self.out.push_str(";\n");
            }
            Stmt::Empty => self.out.push_str(";\n"),
        }
    }

    /// `if` chain with the cursor already positioned; block branches stay on
    /// the header line, single statements go indented on the next line.
    fn print_if(&mut self, if_stmt: &crate::ast::IfStmt) {
        self.out.push_str("if (");
        self.print_expr(&if_stmt.test);
        self.out.push(')');
        let cons_is_block = matches!(&*if_stmt.consequent, Stmt::Block(_));
        match &*if_stmt.consequent {
            Stmt::Block(block) => {
                self.out.push_str(" {\n");
                self.print_body(&block.body);
                self.write_indent();
                self.out.push('}');
            }
            other => {
                self.out.push('\n');
                self.indent += 1;
                self.print_stmt(other);
                self.indent -= 1;
            }
        }
        match &if_stmt.alternate {
            None => {
                if cons_is_block {
                    self.out.push('\n');
                }
            }
            Some(alternate) => {
                if cons_is_block {
                    self.out.push_str(" else");
                } else {
                    self.write_indent();
                    self.out.push_str("else");
                }
                match &**alternate {
                    Stmt::If(nested) => {
                        self.out.push(' ');
                        self.print_if(nested);
                    }
                    Stmt::Block(block) => {
                        self.out.push_str(" {\n");
                        self.print_body(&block.body);
                        self.write_indent();
                        self.out.push_str("}\n");
                    }
                    other => {
                        self.out.push('\n');
                        self.indent += 1;
                        self.print_stmt(other);
                        self.indent -= 1;
                    }
                }
            }
        }
    }

    fn print_body(&mut self, body: &[Stmt]) {
        self.indent += 1;
        for stmt in body {
            self.print_stmt(stmt);
        }
        self.indent -= 1;
    }

    fn print_specifiers(&mut self, specifiers: &[ImportSpecifier]) {
        let mut named = Vec::new();
        let mut first = true;
        for specifier in specifiers {
            match specifier {
                ImportSpecifier::Default { local } => {
                    if !first {
                        self.out.push_str(", ");
                    }
                    self.out.push_str(local);
                    first = false;
                }
                ImportSpecifier::Namespace { local } => {
                    if !first {
                        self.out.push_str(", ");
                    }
                    self.out.push_str("* as ");
                    self.out.push_str(local);
                    first = false;
                }
                ImportSpecifier::Named { imported, local } => {
                    if imported == local {
                        named.push(imported.clone());
                    } else {
                        named.push(format!("{imported} as {local}"));
                    }
                }
            }
        }
        if !named.is_empty() {
            if !first {
                self.out.push_str(", ");
            }
            self.out.push_str("{ ");
            self.out.push_str(&named.join(", "));
            self.out.push_str(" }");
        }
    }

    fn print_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => self.out.push_str(&ident.name),
            Expr::Lit(lit) => self.print_lit(lit),
            Expr::Array(array) => {
                self.out.push('[');
                for (i, element) in array.elements.iter().enumerate() {
                    if i > 0 {
                        self.out.push_str(", ");
                    }
                    self.print_expr(element);
                }
                self.out.push(']');
            }
            Expr::Unary(unary) => {
                self.out.push_str(&unary.op.to_string());
                self.print_expr(&unary.argument);
            }
            Expr::Binary(binary) => {
                self.print_expr(&binary.left);
                self.out.push(' ');
                self.out.push_str(&binary.op.to_string());
                self.out.push(' ');
                self.print_expr(&binary.right);
            }
            Expr::Cond(cond) => {
                self.print_expr(&cond.test);
                self.out.push_str(" ? ");
                self.print_expr(&cond.consequent);
                self.out.push_str(" : ");
                self.print_expr(&cond.alternate);
            }
            Expr::Assign(assign) => {
                self.print_expr(&assign.target);
                self.out.push_str(" = ");
                self.print_expr(&assign.value);
            }
            Expr::Call(call) => {
                self.print_expr(&call.callee);
                self.print_arguments(&call.arguments);
            }
            Expr::New(new) => {
                self.out.push_str("new ");
                self.print_expr(&new.callee);
                self.print_arguments(&new.arguments);
            }
            Expr::Member(member) => {
                self.print_expr(&member.object);
                self.out.push('.');
                self.out.push_str(&member.property);
            }
            Expr::Paren(inner) => {
                self.out.push('(');
                self.print_expr(inner);
                self.out.push(')');
            }
        }
    }

    fn print_arguments(&mut self, arguments: &[Expr]) {
        self.out.push('(');
        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.print_expr(argument);
        }
        self.out.push(')');
    }

    fn print_lit(&mut self, lit: &Lit) {
        match lit {
            Lit::Str(value) => self.print_str_lit(value),
            Lit::Num(value) => {
                if value.fract() == 0.0 && value.is_finite() && value.abs() < 1e15 {
                    self.out.push_str(&format!("{}", *value as i64));
                } else {
                    self.out.push_str(&format!("{value}"));
                }
            }
            Lit::Bool(true) => self.out.push_str("true"),
            Lit::Bool(false) => self.out.push_str("false"),
            Lit::Null => self.out.push_str("null"),
        }
    }

    fn print_str_lit(&mut self, value: &str) {
        self.out.push('\'');
        for c in value.chars() {
            match c {
                '\'' => self.out.push_str("\\'"),
                '\\' => self.out.push_str("\\\\"),
                '\n' => self.out.push_str("\\n"),
                other => self.out.push(other),
            }
        }
        self.out.push('\'');
    }
}
