//! Turns a program back into source text.
//!
//! Expressions are fully parenthesised. When a symbol arena is supplied,
//! every resolved identifier is followed by its type, e.g. `x(int)`.

use crate::symbols::symbols::SymbolArena;

use super::{
    ast::{Block, Decl, FnDecl, Id, Program, StructDecl, VarDecl},
    expressions::{Assign, Call, Expr},
    statements::Stmt,
    types::TypeNode,
};

const INDENT: &str = "    ";

pub fn unparse(program: &Program, symbols: Option<&SymbolArena>) -> String {
    let mut unparser = Unparser {
        out: String::new(),
        symbols,
    };

    for decl in &program.decls {
        unparser.decl(decl, 0);
    }

    unparser.out
}

struct Unparser<'a> {
    out: String,
    symbols: Option<&'a SymbolArena>,
}

impl Unparser<'_> {
    fn indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push_str(INDENT);
        }
    }

    fn id(&mut self, id: &Id) {
        self.out.push_str(&id.name);
        if let (Some(symbols), Some(symbol)) = (self.symbols, id.symbol) {
            self.out.push_str(&format!("({})", symbols.type_of(symbol)));
        }
    }

    fn type_node(&mut self, ty: &TypeNode) {
        match ty {
            TypeNode::Struct(id) => {
                self.out.push_str("struct ");
                self.id(id);
            }
            other => self.out.push_str(&other.to_string()),
        }
    }

    fn decl(&mut self, decl: &Decl, level: usize) {
        match decl {
            Decl::Var(var) => self.var_decl(var, level),
            Decl::Fn(function) => self.fn_decl(function, level),
            Decl::Struct(structure) => self.struct_decl(structure, level),
        }
    }

    fn var_decl(&mut self, decl: &VarDecl, level: usize) {
        self.indent(level);
        self.type_node(&decl.ty);
        self.out.push(' ');
        self.id(&decl.id);
        self.out.push_str(";\n");
    }

    fn fn_decl(&mut self, decl: &FnDecl, level: usize) {
        self.indent(level);
        self.type_node(&decl.return_type);
        self.out.push(' ');
        self.id(&decl.id);
        self.out.push('(');
        for (i, formal) in decl.formals.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.type_node(&formal.ty);
            self.out.push(' ');
            self.id(&formal.id);
        }
        self.out.push_str(") {\n");
        self.block(&decl.body, level + 1);
        self.indent(level);
        self.out.push_str("}\n\n");
    }

    fn struct_decl(&mut self, decl: &StructDecl, level: usize) {
        self.indent(level);
        self.out.push_str("struct ");
        self.id(&decl.id);
        self.out.push_str(" {\n");
        for field in &decl.fields {
            self.var_decl(field, level + 1);
        }
        self.indent(level);
        self.out.push_str("};\n\n");
    }

    fn block(&mut self, block: &Block, level: usize) {
        for decl in &block.decls {
            self.var_decl(decl, level);
        }
        for stmt in &block.stmts {
            self.stmt(stmt, level);
        }
    }

    fn braced(&mut self, block: &Block, level: usize) {
        self.out.push_str(" {\n");
        self.block(block, level + 1);
        self.indent(level);
        self.out.push('}');
    }

    fn stmt(&mut self, stmt: &Stmt, level: usize) {
        self.indent(level);
        match stmt {
            Stmt::Assign(assign) => {
                self.assign(assign);
                self.out.push(';');
            }
            Stmt::PostInc(loc) => {
                self.expr(loc);
                self.out.push_str("++;");
            }
            Stmt::PostDec(loc) => {
                self.expr(loc);
                self.out.push_str("--;");
            }
            Stmt::Read(loc) => {
                self.out.push_str("cin >> ");
                self.expr(loc);
                self.out.push(';');
            }
            Stmt::Write(expr) => {
                self.out.push_str("cout << ");
                self.expr(expr);
                self.out.push(';');
            }
            Stmt::If { cond, then_block } => {
                self.out.push_str("if (");
                self.expr(cond);
                self.out.push(')');
                self.braced(then_block, level);
            }
            Stmt::IfElse {
                cond,
                then_block,
                else_block,
            } => {
                self.out.push_str("if (");
                self.expr(cond);
                self.out.push(')');
                self.braced(then_block, level);
                self.out.push_str(" else");
                self.braced(else_block, level);
            }
            Stmt::While { cond, body } => {
                self.out.push_str("while (");
                self.expr(cond);
                self.out.push(')');
                self.braced(body, level);
            }
            Stmt::Call(call) => {
                self.call(call);
                self.out.push(';');
            }
            Stmt::Return { value, .. } => {
                self.out.push_str("return");
                if let Some(value) = value {
                    self.out.push(' ');
                    self.expr(value);
                }
                self.out.push(';');
            }
        }
        self.out.push('\n');
    }

    fn assign(&mut self, assign: &Assign) {
        self.expr(&assign.lhs);
        self.out.push_str(" = ");
        self.expr(&assign.rhs);
    }

    fn call(&mut self, call: &Call) {
        self.id(&call.callee);
        self.out.push('(');
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(arg);
        }
        self.out.push(')');
    }

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::IntLit { value, .. } => self.out.push_str(&value.to_string()),
            Expr::StrLit { value, .. } => {
                self.out.push('"');
                self.out.push_str(value);
                self.out.push('"');
            }
            Expr::True(_) => self.out.push_str("true"),
            Expr::False(_) => self.out.push_str("false"),
            Expr::Id(id) => self.id(id),
            Expr::DotAccess(dot) => {
                self.expr(&dot.loc);
                self.out.push('.');
                self.id(&dot.field);
            }
            Expr::Assign(assign) => {
                self.out.push('(');
                self.assign(assign);
                self.out.push(')');
            }
            Expr::Call(call) => self.call(call),
            Expr::Unary { op, operand } => {
                self.out.push('(');
                self.out.push_str(op.symbol());
                self.expr(operand);
                self.out.push(')');
            }
            Expr::Binary { op, left, right } => {
                self.out.push('(');
                self.expr(left);
                self.out.push_str(&format!(" {} ", op.symbol()));
                self.expr(right);
                self.out.push(')');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{compile_source, lexer::lexer::tokenize, parser::parser::parse, errors::diagnostics::Diagnostics};

    use super::unparse;

    fn parse_source(source: &str) -> crate::ast::ast::Program {
        let mut diagnostics = Diagnostics::new();
        let tokens = tokenize(source, &mut diagnostics);
        parse(tokens).unwrap()
    }

    #[test]
    fn test_unparse_round_trips_layout() {
        let source = "int x;\n\
                      struct Point {\n    int x;\n    int y;\n};\n\n\
                      void main() {\n    struct Point p;\n    p.x = (1 + (2 * 3));\n    if ((x < 3)) {\n        cout << \"small\\n\";\n    } else {\n        x--;\n    }\n}\n\n";
        let program = parse_source(source);
        assert_eq!(unparse(&program, None), source);
    }

    #[test]
    fn test_unparse_annotates_resolved_identifiers() {
        let output = compile_source("int f(int a, bool b) { return a; }\nvoid main() { int y; y = f(1, true); }").unwrap();
        let program = output.program.unwrap();
        let text = unparse(&program, Some(&output.symbols));

        assert!(text.contains("int f(int,bool->int)(int a(int), bool b(bool)) {"));
        assert!(text.contains("return a(int);"));
        assert!(text.contains("y(int) = f(int,bool->int)(1, true);"));
    }
}
