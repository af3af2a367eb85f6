//! Main code generation module.
//!
//! This module contains the core Compiler structure and drives code
//! generation from the resolved, type checked AST to MIPS assembly. It
//! owns the state of one generation run: the output, the label counter and
//! the string literal cache.

use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::{
    ast::ast::{Decl, FnDecl, Program, VarDecl},
    errors::errors::InternalError,
    symbols::symbols::{SymbolArena, WORD_SIZE},
};

use super::{
    instructions::{Assembly, Line, Opcode, Operand, Register},
    stmt::gen_block,
};

/// The function whose body is being generated.
#[derive(Debug, Clone)]
pub struct FunctionFrame {
    /// Where `return` statements branch to.
    pub return_label: String,
}

/// The main compiler structure that holds the state of the compilation
/// process.
///
/// A fresh compiler is created for every program, so labels and string
/// literals never leak between compilations.
pub struct Compiler<'a> {
    /// Symbols linked onto the AST by name analysis
    pub symbols: &'a SymbolArena,
    /// Generated lines so far
    pub assembly: Assembly,
    /// Counter behind every internal label
    label_counter: usize,
    /// Labels of the string literals emitted so far, by literal text
    string_labels: FxHashMap<String, String>,
    /// Set while a function body is generated
    pub frame: Option<FunctionFrame>,
}

impl<'a> Compiler<'a> {
    pub fn new(symbols: &'a SymbolArena) -> Self {
        Compiler {
            symbols,
            assembly: Assembly::new(),
            label_counter: 0,
            string_labels: FxHashMap::default(),
            frame: None,
        }
    }

    /// Returns a label that has never been returned before.
    pub fn next_label(&mut self) -> String {
        let label = format!(".L{}", self.label_counter);
        self.label_counter += 1;
        trace!(%label, "allocated label");
        label
    }

    pub fn emit(&mut self, opcode: Opcode, operands: Vec<Operand>) {
        self.assembly.push(Line::Instruction {
            opcode,
            operands,
            comment: None,
        });
    }

    pub fn emit_commented(&mut self, opcode: Opcode, operands: Vec<Operand>, comment: &str) {
        self.assembly.push(Line::Instruction {
            opcode,
            operands,
            comment: Some(comment.to_string()),
        });
    }

    pub fn emit_label(&mut self, name: &str) {
        self.assembly.push(Line::Label {
            name: name.to_string(),
            comment: None,
        });
    }

    pub fn emit_directive(&mut self, name: &str, arg: Option<&str>) {
        self.assembly.push(Line::Directive {
            name: name.to_string(),
            arg: arg.map(str::to_string),
        });
    }

    pub fn emit_data(&mut self, label: &str, directive: &str, arg: &str) {
        self.assembly.push(Line::Data {
            label: label.to_string(),
            directive: directive.to_string(),
            arg: arg.to_string(),
        });
    }

    pub fn push(&mut self, register: Register) {
        self.emit_commented(
            Opcode::Sw,
            vec![register.into(), Operand::Indexed(0, Register::Sp)],
            "PUSH",
        );
        self.emit(
            Opcode::Subu,
            vec![Register::Sp.into(), Register::Sp.into(), WORD_SIZE.into()],
        );
    }

    pub fn pop(&mut self, register: Register) {
        self.emit_commented(
            Opcode::Lw,
            vec![register.into(), Operand::Indexed(WORD_SIZE, Register::Sp)],
            "POP",
        );
        self.emit(
            Opcode::Addu,
            vec![Register::Sp.into(), Register::Sp.into(), WORD_SIZE.into()],
        );
    }

    /// `b label`
    pub fn branch(&mut self, label: &str) {
        self.emit(Opcode::B, vec![label.into()]);
    }

    /// The label of a string literal, emitting the literal on first use.
    pub fn string_label(&mut self, value: &str) -> String {
        if let Some(label) = self.string_labels.get(value) {
            return label.clone();
        }

        let label = self.next_label();
        self.emit_directive("data", None);
        self.emit_data(&label, "asciiz", &format!("\"{}\"", value));
        self.emit_directive("text", None);
        self.string_labels.insert(value.to_string(), label.clone());
        label
    }

    fn gen_global(&mut self, decl: &VarDecl) -> Result<(), InternalError> {
        let size = self.symbols.size_of(decl.id.symbol()?);
        self.emit_directive("data", None);
        self.emit_directive("align", Some("2"));
        self.emit_data(&global_label(&decl.id.name), "space", &size.to_string());
        Ok(())
    }

    fn gen_function(&mut self, decl: &FnDecl) -> Result<(), InternalError> {
        let formals = decl.formals.len() as i32;
        let is_main = decl.id.name == "main";

        self.emit_directive("text", None);
        if is_main {
            self.emit_directive("globl", Some("main"));
            self.emit_label("main");
            self.emit_label("__start");
        } else {
            self.emit_label(&function_label(&decl.id.name));
        }

        // Prologue: the caller has pushed the arguments
        self.push(Register::Ra);
        self.push(Register::Fp);
        self.emit(
            Opcode::Addu,
            vec![
                Register::Fp.into(),
                Register::Sp.into(),
                (2 * WORD_SIZE + WORD_SIZE * formals).into(),
            ],
        );
        if decl.frame_size > 0 {
            self.emit_commented(
                Opcode::Subu,
                vec![Register::Sp.into(), Register::Sp.into(), decl.frame_size.into()],
                "locals",
            );
        }

        let return_label = self.next_label();
        self.frame = Some(FunctionFrame {
            return_label: return_label.clone(),
        });
        gen_block(self, &decl.body)?;
        self.frame = None;

        // Epilogue
        self.assembly.push(Line::Label {
            name: return_label,
            comment: Some(format!("return from {}", decl.id.name)),
        });
        self.emit(
            Opcode::Lw,
            vec![Register::Ra.into(), Operand::Indexed(-WORD_SIZE * formals, Register::Fp)],
        );
        self.emit(Opcode::Move, vec![Register::T0.into(), Register::Fp.into()]);
        self.emit(
            Opcode::Lw,
            vec![
                Register::Fp.into(),
                Operand::Indexed(-WORD_SIZE * formals - WORD_SIZE, Register::Fp),
            ],
        );
        self.emit(Opcode::Move, vec![Register::Sp.into(), Register::T0.into()]);

        if is_main {
            self.emit_commented(Opcode::Li, vec![Register::V0.into(), 10.into()], "exit");
            self.emit(Opcode::Syscall, vec![]);
        } else {
            self.emit(Opcode::Jr, vec![Register::Ra.into()]);
        }

        Ok(())
    }
}

/// The static storage label of a global variable.
pub fn global_label(name: &str) -> String {
    format!("_{}", name)
}

/// The entry label of a function.
pub fn function_label(name: &str) -> String {
    if name == "main" {
        String::from("main")
    } else {
        format!("_{}", name)
    }
}

/// Generates MIPS assembly for a program.
///
/// Must only run on a program that passed name analysis and type checking
/// without errors.
pub fn compile(program: &Program, symbols: &SymbolArena) -> Result<Assembly, InternalError> {
    let mut compiler = Compiler::new(symbols);

    for decl in &program.decls {
        match decl {
            Decl::Var(decl) => compiler.gen_global(decl)?,
            Decl::Fn(decl) => compiler.gen_function(decl)?,
            Decl::Struct(_) => {}
        }
    }

    debug!(
        lines = compiler.assembly.len(),
        labels = compiler.label_counter,
        strings = compiler.string_labels.len(),
        "code generation finished"
    );
    Ok(compiler.assembly)
}
