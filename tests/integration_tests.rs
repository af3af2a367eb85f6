//! Integration tests for end-to-end compilation.
//!
//! These tests verify that the complete pipeline works from source text
//! through tokenization, parsing, name analysis and type checking down to
//! MIPS assembly.

use cimple::{
    ast::{
        ast::{Decl, FnDecl, Program},
        expressions::Expr,
        statements::Stmt,
        unparse::unparse,
    },
    check_source,
    compiler::instructions::Opcode,
    compile_source, display_error,
    symbols::symbols::{Storage, SymbolArena},
    CompileOutput, Position,
};

fn compile(source: &str) -> CompileOutput {
    compile_source(source).expect("no internal error")
}

fn check(source: &str) -> CompileOutput {
    check_source(source).expect("no internal error")
}

fn function<'a>(program: &'a Program, name: &str) -> &'a FnDecl {
    program
        .decls
        .iter()
        .find_map(|decl| match decl {
            Decl::Fn(function) if function.id.name == name => Some(function),
            _ => None,
        })
        .expect("function should exist")
}

fn field_offset(symbols: &SymbolArena, expr: &Expr) -> i32 {
    let Expr::DotAccess(dot) = expr else {
        panic!("expected a dot-access, got {:?}", expr);
    };
    match symbols.get(dot.field.symbol.expect("field is linked")).storage() {
        Some(Storage::Field(offset)) => offset,
        other => panic!("expected a field, got {:?}", other),
    }
}

#[test]
fn test_multiply_declared_stops_before_code_generation() {
    let output = compile("int x; int x; void main() { }");

    assert_eq!(output.diagnostics.messages(), vec!["Multiply declared identifier"]);
    assert_eq!(*output.diagnostics.iter().next().unwrap().get_position(), Position(1, 12));
    assert!(output.assembly.is_none());
}

#[test]
fn test_empty_main_compiles() {
    let output = compile("void main() { }");

    assert!(output.succeeded());
    assert!(output.diagnostics.is_empty());
    let assembly = output.assembly.unwrap();
    assert!(assembly.labels().contains(&"__start"));
    assert_eq!(assembly.count(Opcode::Jr), 0);
    assert!(assembly.to_string().ends_with("\tli\t$v0, 10\t\t# exit\n\tsyscall\n"));
}

#[test]
fn test_assignment_mismatch_does_not_cascade() {
    let output = compile("bool b; void main() { b = 3; b = b && true; cout << b; }");

    assert_eq!(output.diagnostics.messages(), vec!["Type mismatch"]);
    assert_eq!(*output.diagnostics.iter().next().unwrap().get_position(), Position(1, 23));
    assert!(output.assembly.is_none());
}

#[test]
fn test_short_circuit_condition() {
    let output = compile("void main() { int x; int y; if (x > 0 && y < 10) { x = 1; } }");
    let assembly = output.assembly.unwrap();

    // main and __start, then/done for the if, one for `&&`, and the
    // return label
    assert_eq!(assembly.labels().len(), 2 + 3 + 1);
    assert_eq!(assembly.count(Opcode::Bgt), 1);
    assert_eq!(assembly.count(Opcode::Blt), 1);

    let lines = assembly.lines();
    let left = lines
        .iter()
        .position(|line| line.opcode() == Some(Opcode::Bgt))
        .unwrap();
    let right = lines
        .iter()
        .position(|line| line.opcode() == Some(Opcode::Blt))
        .unwrap();
    // The false exit of `x > 0` jumps past the whole condition
    assert_eq!(lines[left + 1].target(), lines[right + 1].target());
}

#[test]
fn test_struct_field_resolution() {
    let output = compile(
        "struct Point { int x; int y; };
        struct Point p;
        void main() { p.y = 5; p.x = p.y; }",
    );
    assert!(output.succeeded());

    let program = output.program.as_ref().unwrap();
    let Decl::Struct(point) = &program.decls[0] else {
        panic!("expected a struct declaration");
    };
    let point_def = output.symbols.get(point.id.symbol.unwrap()).struct_id();
    assert_eq!(output.symbols.get_struct(point_def.unwrap()).size, 8);

    let main = function(program, "main");
    let Stmt::Assign(first) = &main.body.stmts[0] else {
        panic!("expected an assignment");
    };
    let Expr::DotAccess(dot) = first.lhs.as_ref() else {
        panic!("expected a dot-access");
    };
    assert_eq!(dot.struct_def, point_def);
    assert_eq!(field_offset(&output.symbols, &first.lhs), 4);

    let Stmt::Assign(second) = &main.body.stmts[1] else {
        panic!("expected an assignment");
    };
    assert_eq!(field_offset(&output.symbols, &second.lhs), 0);
    assert_eq!(field_offset(&output.symbols, &second.rhs), 4);
}

#[test]
fn test_chained_field_resolution() {
    let output = compile(
        "struct C { int pad; int c; };
        struct B { bool flag; struct C b; };
        void main() { struct B a; a.b.c = 1; cout << a.b.c; }",
    );
    assert!(output.succeeded(), "{}", output.diagnostics);

    let program = output.program.as_ref().unwrap();
    let main = function(program, "main");
    let Stmt::Assign(assign) = &main.body.stmts[0] else {
        panic!("expected an assignment");
    };
    let Expr::DotAccess(outer) = assign.lhs.as_ref() else {
        panic!("expected a dot-access");
    };

    assert_eq!(field_offset(&output.symbols, &assign.lhs), 4);
    assert_eq!(field_offset(&output.symbols, &outer.loc), 4);

    let Expr::DotAccess(inner) = outer.loc.as_ref() else {
        panic!("expected a nested dot-access");
    };
    let c_def = output.symbols.get(inner.field.symbol.unwrap()).struct_id();
    assert!(c_def.is_some());
    assert_eq!(outer.struct_def, c_def);
}

#[test]
fn test_dot_access_errors() {
    let output = compile(
        "struct P { int x; };
        int n;
        void main() { struct P p; n.x = 1; p.z = 2; }",
    );

    assert_eq!(
        output.diagnostics.messages(),
        vec!["Dot-access of non-struct type", "Invalid struct field name"]
    );
}

#[test]
fn test_errors_are_reported_in_source_order() {
    let output = check(
        "void v;
        int f(int a) { return a; }
        void main() { g(); f(true); if (1) { } }",
    );

    assert_eq!(
        output.diagnostics.messages(),
        vec!["Non-function declared void", "Undeclared identifier"]
    );

    // Type errors only show up once names resolve
    let output = check(
        "int f(int a) { return a; }
        void main() { f(true); if (1) { } }",
    );
    assert_eq!(
        output.diagnostics.messages(),
        vec![
            "Type of actual does not match type of formal",
            "Non-bool expression used as an if condition",
        ]
    );
}

#[test]
fn test_missing_main() {
    let output = compile("int main; void f() { }");
    assert_eq!(output.diagnostics.messages(), vec!["No main function"]);
    assert_eq!(*output.diagnostics.iter().next().unwrap().get_position(), Position::null());
}

#[test]
fn test_syntax_error_has_no_program() {
    let output = compile("void main() { x = ; }");

    assert!(!output.succeeded());
    assert!(output.program.is_none());
    assert!(output.assembly.is_none());
}

#[test]
fn test_lexical_warnings_do_not_stop_compilation() {
    let output = compile("void main() { int x; x = 99999999999; cout << x; }");

    assert!(output.succeeded());
    assert_eq!(output.diagnostics.warning_count(), 1);
    assert!(output.assembly.is_some());
}

#[test]
fn test_check_source_skips_code_generation() {
    let output = check("void main() { cout << 1; }");
    assert!(output.succeeded());
    assert!(output.assembly.is_none());
    assert!(output.program.is_some());
}

#[test]
fn test_full_program() {
    let source = r#"
int count;

struct Pair {
    int first;
    int second;
};

int sum(int a, int b) {
    return a + b;
}

bool positive(int n) {
    return n > 0;
}

void show(struct Pair p) {
    cout << p.first;
}

void main() {
    struct Pair pair;
    int i;
    cin >> pair.first;
    pair.second = sum(pair.first, 10);
    i = 0;
    while (i < pair.second && positive(i + 1)) {
        if (!(i == 3)) {
            cout << i;
        } else {
            cout << "three\n";
        }
        i++;
        count++;
    }
    cout << sum(count, -1);
}
"#;
    let output = compile(source);
    assert!(!output.succeeded(), "struct parameters are not allowed");
    assert_eq!(output.diagnostics.messages(), vec!["syntax error: unexpected token `struct`, parameters must be int, bool or void"]);

    let output = compile(&source.replace(
        "void show(struct Pair p) {\n    cout << p.first;\n}\n",
        "",
    ));
    assert!(output.succeeded(), "{}", output.diagnostics);

    let assembly = output.assembly.unwrap();
    let text = assembly.to_string();
    for label in ["_count:", "main:", "_sum:", "_positive:"] {
        assert!(text.contains(label), "missing {}", label);
    }
    assert!(text.contains(".asciiz \"three\\n\""));
    assert_eq!(assembly.count(Opcode::Jal), 3);
    assert_eq!(assembly.count(Opcode::Jr), 2);

    let labels = assembly.labels();
    for line in assembly.lines() {
        if let Some(target) = line.target() {
            assert!(labels.contains(&target), "undefined label {}", target);
        }
    }
}

#[test]
fn test_compilations_are_independent() {
    let first = compile("int x; void main() { cout << \"a\"; }");
    let broken = compile("void main() { y = 1; }");
    let second = compile("int x; void main() { cout << \"a\"; }");

    assert!(!broken.succeeded());
    assert_eq!(first.assembly, second.assembly);
    assert!(second.diagnostics.is_empty());
}

#[test]
fn test_unparse_annotates_types() {
    let output = compile("int f(int a) { return a; } void main() { int x; x = f(2); }");
    let program = output.program.as_ref().unwrap();

    let annotated = unparse(program, Some(&output.symbols));
    assert!(annotated.contains("int f(int->int)(int a(int)) {"));
    assert!(annotated.contains("x(int) = f(int->int)(2);"));

    let plain = unparse(program, None);
    assert!(plain.contains("    x = f(2);"));
}

#[test]
fn test_display_error_renders_source_line() {
    let source = "void main() {\n    int x;\n    x = true;\n}\n";
    let output = compile(source);
    let error = output.diagnostics.iter().next().unwrap();

    let rendered = display_error(error, source);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "3:5 ***ERROR*** Type mismatch");
    assert_eq!(lines[2], "3 |     x = true;");
}
