//! Typed MIPS assembly.
//!
//! The code generator builds a list of [`Line`]s instead of text so tests
//! can look at opcodes, operands and labels directly. `Display` renders
//! SPIM assembler syntax.

use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Register {
    Fp,
    Sp,
    Ra,
    V0,
    A0,
    T0,
    T1,
    Zero,
}

impl Display for Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Register::Fp => "$fp",
            Register::Sp => "$sp",
            Register::Ra => "$ra",
            Register::V0 => "$v0",
            Register::A0 => "$a0",
            Register::T0 => "$t0",
            Register::T1 => "$t1",
            Register::Zero => "$zero",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Add,
    Sub,
    Mul,
    Div,
    Seq,
    Sne,
    Slt,
    Sgt,
    Sle,
    Sge,
    Xori,
    Addu,
    Subu,
    Li,
    La,
    Lw,
    Sw,
    Move,
    B,
    Beq,
    Bne,
    Blt,
    Bgt,
    Ble,
    Bge,
    Jal,
    Jr,
    Syscall,
}

impl Opcode {
    pub fn is_branch(&self) -> bool {
        matches!(
            self,
            Opcode::B
                | Opcode::Beq
                | Opcode::Bne
                | Opcode::Blt
                | Opcode::Bgt
                | Opcode::Ble
                | Opcode::Bge
        )
    }
}

impl Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mnemonic = match self {
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Seq => "seq",
            Opcode::Sne => "sne",
            Opcode::Slt => "slt",
            Opcode::Sgt => "sgt",
            Opcode::Sle => "sle",
            Opcode::Sge => "sge",
            Opcode::Xori => "xori",
            Opcode::Addu => "addu",
            Opcode::Subu => "subu",
            Opcode::Li => "li",
            Opcode::La => "la",
            Opcode::Lw => "lw",
            Opcode::Sw => "sw",
            Opcode::Move => "move",
            Opcode::B => "b",
            Opcode::Beq => "beq",
            Opcode::Bne => "bne",
            Opcode::Blt => "blt",
            Opcode::Bgt => "bgt",
            Opcode::Ble => "ble",
            Opcode::Bge => "bge",
            Opcode::Jal => "jal",
            Opcode::Jr => "jr",
            Opcode::Syscall => "syscall",
        };
        write!(f, "{}", mnemonic)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Reg(Register),
    Imm(i32),
    Label(String),
    /// `offset(register)`
    Indexed(i32, Register),
}

impl Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operand::Reg(register) => write!(f, "{}", register),
            Operand::Imm(value) => write!(f, "{}", value),
            Operand::Label(label) => write!(f, "{}", label),
            Operand::Indexed(offset, register) => write!(f, "{}({})", offset, register),
        }
    }
}

impl From<Register> for Operand {
    fn from(register: Register) -> Self {
        Operand::Reg(register)
    }
}

impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Operand::Imm(value)
    }
}

impl From<&str> for Operand {
    fn from(label: &str) -> Self {
        Operand::Label(label.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Instruction {
        opcode: Opcode,
        operands: Vec<Operand>,
        comment: Option<String>,
    },
    Label {
        name: String,
        comment: Option<String>,
    },
    /// `.text`, `.data`, `.align 2`, `.globl main`
    Directive { name: String, arg: Option<String> },
    /// A labelled piece of static data, such as `_x: .space 4`.
    Data {
        label: String,
        directive: String,
        arg: String,
    },
    Comment(String),
}

impl Line {
    pub fn opcode(&self) -> Option<Opcode> {
        match self {
            Line::Instruction { opcode, .. } => Some(*opcode),
            _ => None,
        }
    }

    /// The label a branch or jump goes to.
    pub fn target(&self) -> Option<&str> {
        match self {
            Line::Instruction {
                opcode, operands, ..
            } if opcode.is_branch() || *opcode == Opcode::Jal => match operands.last() {
                Some(Operand::Label(label)) => Some(label),
                _ => None,
            },
            _ => None,
        }
    }
}

impl Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Line::Instruction {
                opcode,
                operands,
                comment,
            } => {
                write!(f, "\t{}", opcode)?;
                if !operands.is_empty() {
                    let operands = operands
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join(", ");
                    write!(f, "\t{}", operands)?;
                }
                if let Some(comment) = comment {
                    write!(f, "\t\t# {}", comment)?;
                }
                Ok(())
            }
            Line::Label { name, comment } => {
                write!(f, "{}:", name)?;
                if let Some(comment) = comment {
                    write!(f, "\t\t# {}", comment)?;
                }
                Ok(())
            }
            Line::Directive { name, arg } => match arg {
                Some(arg) => write!(f, "\t.{} {}", name, arg),
                None => write!(f, "\t.{}", name),
            },
            Line::Data {
                label,
                directive,
                arg,
            } => write!(f, "{}:\t.{} {}", label, directive, arg),
            Line::Comment(text) => write!(f, "\t# {}", text),
        }
    }
}

/// A generated program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    lines: Vec<Line>,
}

impl Assembly {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: Line) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Every label defined in the program, in order.
    pub fn labels(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|line| match line {
                Line::Label { name, .. } => Some(name.as_str()),
                Line::Data { label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, opcode: Opcode) -> usize {
        self.lines
            .iter()
            .filter(|line| line.opcode() == Some(opcode))
            .count()
    }
}

impl Display for Assembly {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lines() {
        let push = Line::Instruction {
            opcode: Opcode::Sw,
            operands: vec![Register::Ra.into(), Operand::Indexed(0, Register::Sp)],
            comment: Some(String::from("PUSH")),
        };
        assert_eq!(push.to_string(), "\tsw\t$ra, 0($sp)\t\t# PUSH");

        let syscall = Line::Instruction {
            opcode: Opcode::Syscall,
            operands: vec![],
            comment: None,
        };
        assert_eq!(syscall.to_string(), "\tsyscall");

        let data = Line::Data {
            label: String::from("_x"),
            directive: String::from("space"),
            arg: String::from("4"),
        };
        assert_eq!(data.to_string(), "_x:\t.space 4");

        let directive = Line::Directive {
            name: String::from("globl"),
            arg: Some(String::from("main")),
        };
        assert_eq!(directive.to_string(), "\t.globl main");
    }

    #[test]
    fn test_branch_target() {
        let branch = Line::Instruction {
            opcode: Opcode::Beq,
            operands: vec![Register::T0.into(), Register::Zero.into(), ".L3".into()],
            comment: None,
        };
        assert_eq!(branch.target(), Some(".L3"));

        let load = Line::Instruction {
            opcode: Opcode::La,
            operands: vec![Register::T0.into(), "_x".into()],
            comment: None,
        };
        assert_eq!(load.target(), None);
    }
}
