//! Unit tests for the parser module.
//!
//! This module contains tests for parsing the language constructs including:
//! - Global, struct and function declarations
//! - Expressions and their precedence
//! - Statements and blocks
//! - Syntax errors

use super::parser::parse;
use crate::{
    ast::{
        ast::{Decl, Program},
        expressions::{BinaryOp, Expr, UnaryOp},
        statements::Stmt,
        types::TypeNode,
    },
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorImpl},
    },
    lexer::lexer::tokenize,
    Position,
};

fn parse_source(source: &str) -> Result<Program, Error> {
    let mut diagnostics = Diagnostics::new();
    let tokens = tokenize(source, &mut diagnostics);
    assert!(diagnostics.is_empty(), "unexpected lexical errors: {}", diagnostics);
    parse(tokens)
}

fn parse_ok(source: &str) -> Program {
    match parse_source(source) {
        Ok(program) => program,
        Err(error) => panic!("failed to parse {:?}: {}", source, error),
    }
}

/// Parses `source` as the body of `void main()` and returns its statements.
fn parse_body(body: &str) -> Vec<Stmt> {
    let program = parse_ok(&format!("void main() {{ {} }}", body));
    match program.decls.into_iter().next() {
        Some(Decl::Fn(decl)) => decl.body.stmts,
        _ => panic!("expected a function"),
    }
}

fn parse_write_expr(expr: &str) -> Expr {
    match parse_body(&format!("cout << {};", expr)).pop() {
        Some(Stmt::Write(expr)) => expr,
        other => panic!("expected a write statement, got {:?}", other),
    }
}

#[test]
fn test_parse_empty_program() {
    let program = parse_ok("");
    assert!(program.decls.is_empty());
}

#[test]
fn test_parse_global_declarations() {
    let program = parse_ok("int x; bool y; void z;");
    assert_eq!(program.decls.len(), 3);

    let Decl::Var(decl) = &program.decls[0] else {
        panic!("expected a variable");
    };
    assert_eq!(decl.ty, TypeNode::Int);
    assert_eq!(decl.id.name, "x");
    assert_eq!(decl.id.position, Position(1, 5));

    // `void` variables are syntactically fine and rejected later
    assert!(matches!(&program.decls[2], Decl::Var(decl) if decl.ty == TypeNode::Void));
}

#[test]
fn test_parse_struct_declaration() {
    let program = parse_ok("struct Point { int x; int y; };");

    let Decl::Struct(decl) = &program.decls[0] else {
        panic!("expected a struct");
    };
    assert_eq!(decl.id.name, "Point");
    assert_eq!(decl.fields.len(), 2);
    assert_eq!(decl.fields[1].id.name, "y");
}

#[test]
fn test_parse_struct_variable() {
    let program = parse_ok("struct Point { int x; }; struct Point p;");

    let Decl::Var(decl) = &program.decls[1] else {
        panic!("expected a variable");
    };
    let TypeNode::Struct(name) = &decl.ty else {
        panic!("expected a struct type");
    };
    assert_eq!(name.name, "Point");
    assert_eq!(name.position, Position(1, 33));
}

#[test]
fn test_parse_empty_struct_is_an_error() {
    assert!(parse_source("struct Empty { };").is_err());
}

#[test]
fn test_parse_function_declaration() {
    let program = parse_ok("int add(int a, bool b) { int c; c = a; return c; }");

    let Decl::Fn(decl) = &program.decls[0] else {
        panic!("expected a function");
    };
    assert_eq!(decl.id.name, "add");
    assert_eq!(decl.return_type, TypeNode::Int);
    assert_eq!(decl.formals.len(), 2);
    assert_eq!(decl.formals[1].ty, TypeNode::Bool);
    assert_eq!(decl.body.decls.len(), 1);
    assert_eq!(decl.body.stmts.len(), 2);
}

#[test]
fn test_parse_struct_parameter_is_an_error() {
    let source = "struct P { int x; }; void f(struct P p) { }";
    assert!(parse_source(source).is_err());
}

#[test]
fn test_parse_declarations_after_statements_is_an_error() {
    assert!(parse_source("void main() { x = 1; int y; }").is_err());
}

#[test]
fn test_parse_statements() {
    let stmts = parse_body(
        "x = 1; x++; x--; cin >> x; cout << \"hi\"; f(1, 2); \
         if (x) { } if (x) { } else { } while (x) { } return;",
    );

    assert!(matches!(stmts[0], Stmt::Assign(_)));
    assert!(matches!(stmts[1], Stmt::PostInc(Expr::Id(_))));
    assert!(matches!(stmts[2], Stmt::PostDec(Expr::Id(_))));
    assert!(matches!(stmts[3], Stmt::Read(Expr::Id(_))));
    assert!(matches!(stmts[4], Stmt::Write(Expr::StrLit { .. })));
    assert!(matches!(&stmts[5], Stmt::Call(call) if call.args.len() == 2));
    assert!(matches!(stmts[6], Stmt::If { .. }));
    assert!(matches!(stmts[7], Stmt::IfElse { .. }));
    assert!(matches!(stmts[8], Stmt::While { .. }));
    assert!(matches!(stmts[9], Stmt::Return { value: None, .. }));
}

#[test]
fn test_parse_return_position() {
    let stmts = parse_body("return 1;");
    let Some(Stmt::Return { value, position }) = stmts.first() else {
        panic!("expected a return");
    };
    assert!(matches!(value, Some(Expr::IntLit { value: 1, .. })));
    assert_eq!(*position, Position(1, 15));
}

#[test]
fn test_parse_precedence() {
    // 1 + (2 * 3)
    let expr = parse_write_expr("1 + 2 * 3");
    let Expr::Binary { op, right, .. } = expr else {
        panic!("expected a binary expression");
    };
    assert_eq!(op, BinaryOp::Plus);
    assert!(matches!(*right, Expr::Binary { op: BinaryOp::Times, .. }));

    // (a < b) || (c && d)
    let expr = parse_write_expr("a < b || c && d");
    let Expr::Binary { op, left, right } = expr else {
        panic!("expected a binary expression");
    };
    assert_eq!(op, BinaryOp::Or);
    assert!(matches!(*left, Expr::Binary { op: BinaryOp::Less, .. }));
    assert!(matches!(*right, Expr::Binary { op: BinaryOp::And, .. }));
}

#[test]
fn test_parse_left_associative() {
    // (1 - 2) - 3
    let expr = parse_write_expr("1 - 2 - 3");
    let Expr::Binary { left, right, .. } = expr else {
        panic!("expected a binary expression");
    };
    assert!(matches!(*left, Expr::Binary { op: BinaryOp::Minus, .. }));
    assert!(matches!(*right, Expr::IntLit { value: 3, .. }));
}

#[test]
fn test_parse_unary_binds_tightest() {
    // (-a) * b
    let expr = parse_write_expr("-a * b");
    let Expr::Binary { op, left, .. } = expr else {
        panic!("expected a binary expression");
    };
    assert_eq!(op, BinaryOp::Times);
    assert!(matches!(*left, Expr::Unary { op: UnaryOp::Negate, .. }));

    let expr = parse_write_expr("!!t");
    let Expr::Unary { op, operand } = expr else {
        panic!("expected a unary expression");
    };
    assert_eq!(op, UnaryOp::Not);
    assert!(matches!(*operand, Expr::Unary { op: UnaryOp::Not, .. }));
}

#[test]
fn test_parse_grouping() {
    let expr = parse_write_expr("(1 + 2) * 3");
    let Expr::Binary { op, left, .. } = expr else {
        panic!("expected a binary expression");
    };
    assert_eq!(op, BinaryOp::Times);
    assert!(matches!(*left, Expr::Binary { op: BinaryOp::Plus, .. }));
}

#[test]
fn test_parse_chained_comparison_is_an_error() {
    assert!(parse_source("void main() { cout << a < b < c; }").is_err());
    assert!(parse_source("void main() { cout << a == b == c; }").is_err());
}

#[test]
fn test_parse_assignment_is_right_associative() {
    let stmts = parse_body("a = b = 3;");
    let Some(Stmt::Assign(assign)) = stmts.first() else {
        panic!("expected an assignment");
    };
    assert!(matches!(*assign.lhs, Expr::Id(ref id) if id.name == "a"));
    assert!(matches!(*assign.rhs, Expr::Assign(_)));
}

#[test]
fn test_parse_assignment_to_non_location_is_an_error() {
    assert!(parse_source("void main() { 1 = 2; }").is_err());
    assert!(parse_source("void main() { a + b = 2; }").is_err());
}

#[test]
fn test_parse_chained_dot_access() {
    let stmts = parse_body("a.b.c = 1;");
    let Some(Stmt::Assign(assign)) = stmts.first() else {
        panic!("expected an assignment");
    };
    let Expr::DotAccess(outer) = assign.lhs.as_ref() else {
        panic!("expected a dot access");
    };
    assert_eq!(outer.field.name, "c");
    let Expr::DotAccess(inner) = outer.loc.as_ref() else {
        panic!("expected a nested dot access");
    };
    assert_eq!(inner.field.name, "b");
    assert!(matches!(*inner.loc, Expr::Id(ref id) if id.name == "a"));
}

#[test]
fn test_parse_call_arguments() {
    let expr = parse_write_expr("f(1 + 2, g(), x.y)");
    let Expr::Call(call) = expr else {
        panic!("expected a call");
    };
    assert_eq!(call.callee.name, "f");
    assert_eq!(call.args.len(), 3);
    assert!(matches!(call.args[1], Expr::Call(_)));
    assert!(matches!(call.args[2], Expr::DotAccess(_)));
}

#[test]
fn test_parse_expression_statement_must_have_effect() {
    let error = parse_source("void main() { x + 1; }").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::UnexpectedTokenDetailed { .. }
    ));
    assert_eq!(*error.get_position(), Position(1, 15));
}

#[test]
fn test_parse_missing_semicolon() {
    let error = parse_source("int x").unwrap_err();
    assert!(matches!(
        error.get_internal_error(),
        ErrorImpl::UnexpectedToken { token } if token == "EOF"
    ));
}

#[test]
fn test_parse_unexpected_token_position() {
    let error = parse_source("int x;\nint = 3;").unwrap_err();
    assert_eq!(*error.get_position(), Position(2, 5));
}

#[test]
fn test_parse_unterminated_block() {
    assert!(parse_source("void main() { x = 1;").is_err());
}
