#![allow(clippy::module_inception)]

use std::fmt::Display;

use tracing::debug;

use crate::{
    ast::ast::Program,
    compiler::{compiler::compile, instructions::Assembly},
    context::Context,
    errors::{
        diagnostics::Diagnostics,
        errors::{Error, ErrorTip, InternalError},
    },
    lexer::lexer::tokenize,
    name_analysis::name_analysis::analyze_names,
    parser::parser::parse,
    symbols::{symbol_table::SymbolTable, symbols::SymbolArena},
    type_checker::type_checker::type_check,
};

pub mod ast;
pub mod compiler;
pub mod context;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod name_analysis;
pub mod parser;
pub mod symbols;
pub mod type_checker;

extern crate regex;

/// A 1-based line and column in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position(pub u32, pub u32);

impl Position {
    /// The position used for diagnostics that belong to no source location.
    pub fn null() -> Self {
        Position(0, 0)
    }

    pub fn line(&self) -> u32 {
        self.0
    }

    pub fn column(&self) -> u32 {
        self.1
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.0, self.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Everything one run over a source file produced.
#[derive(Debug, Default)]
pub struct CompileOutput {
    pub diagnostics: Diagnostics,
    /// The annotated program, present whenever parsing succeeded.
    pub program: Option<Program>,
    pub symbols: SymbolArena,
    /// Present only when every pass ran without a fatal diagnostic.
    pub assembly: Option<Assembly>,
}

impl CompileOutput {
    pub fn succeeded(&self) -> bool {
        !self.diagnostics.has_errors()
    }
}

/// Runs name analysis and type checking over a parsed program.
///
/// Type checking is skipped when name analysis (or anything before it)
/// recorded a fatal diagnostic. Returns whether the program is free of
/// fatal diagnostics afterwards.
pub fn analyze_ast(
    program: &mut Program,
    table: &mut SymbolTable,
    context: &mut Context,
) -> Result<bool, InternalError> {
    analyze_names(program, table, context)?;
    if context.diagnostics.has_errors() {
        debug!(
            errors = context.diagnostics.error_count(),
            "skipping type checking"
        );
        return Ok(false);
    }

    type_check(program, context)?;
    Ok(!context.diagnostics.has_errors())
}

/// Runs all three semantic passes over a parsed program.
///
/// Returns `Ok(None)` when a fatal diagnostic stopped the pipeline before
/// code generation, and `Err` only for internal invariant violations.
pub fn compile_ast(
    program: &mut Program,
    table: &mut SymbolTable,
    context: &mut Context,
) -> Result<Option<Assembly>, InternalError> {
    if !analyze_ast(program, table, context)? {
        debug!("skipping code generation");
        return Ok(None);
    }

    compile(program, &context.symbols).map(Some)
}

/// Lexes, parses and compiles a whole source file.
pub fn compile_source(source: &str) -> Result<CompileOutput, InternalError> {
    run_pipeline(source, true)
}

/// Same as [`compile_source`] but stops after semantic analysis.
pub fn check_source(source: &str) -> Result<CompileOutput, InternalError> {
    run_pipeline(source, false)
}

fn run_pipeline(source: &str, generate_code: bool) -> Result<CompileOutput, InternalError> {
    let mut context = Context::new();
    let tokens = tokenize(source, &mut context.diagnostics);
    debug!(tokens = tokens.len(), "tokenized");

    let mut program = match parse(tokens) {
        Ok(program) => program,
        Err(error) => {
            context.diagnostics.push(error);
            return Ok(CompileOutput {
                diagnostics: context.diagnostics,
                symbols: context.symbols,
                ..Default::default()
            });
        }
    };
    debug!(decls = program.decls.len(), "parsed");

    let mut table = SymbolTable::new();
    let assembly = if generate_code {
        compile_ast(&mut program, &mut table, &mut context)?
    } else {
        analyze_ast(&mut program, &mut table, &mut context)?;
        None
    };

    Ok(CompileOutput {
        diagnostics: context.diagnostics,
        program: Some(program),
        symbols: context.symbols,
        assembly,
    })
}

/// Returns the text of the given 1-based line, if it exists.
pub fn get_line_at_position(source: &str, line: u32) -> Option<&str> {
    if line == 0 {
        return None;
    }

    source.lines().nth(line as usize - 1)
}

/// Renders a diagnostic together with the offending source line.
///
/// ```text
/// 3:5 ***ERROR*** Undeclared identifier
///   |
/// 3 |     y = 4;
///   |     ^ identifier `y` is not declared in any enclosing scope
/// ```
pub fn display_error(error: &Error, source: &str) -> String {
    let mut rendered = error.to_string();
    let position = error.get_position();

    let Some(line_text) = get_line_at_position(source, position.line()) else {
        return rendered;
    };

    let line_string = position.line().to_string();
    let padding = line_string.len() + 2;
    let arrows = position.column().max(1) as usize;

    rendered.push('\n');
    rendered.push_str(&format!("{:>padding$}\n", "|"));
    rendered.push_str(&format!("{} | {}\n", line_string, line_text.trim_end()));
    rendered.push_str(&format!("{:>padding$} {:>arrows$}", "|", "^"));

    if let ErrorTip::Suggestion(tip) = error.get_tip() {
        rendered.push(' ');
        rendered.push_str(&tip);
    }

    rendered
}
