//! Code generation module for the compiler.
//!
//! This module contains the MIPS code generator, the last pass. It turns
//! the resolved and type checked AST into a stack machine program for the
//! SPIM simulator. It handles:
//!
//! - Static storage for globals and string literals
//! - Function prologues and epilogues around each body
//! - Expressions, each leaving one word on the stack
//! - Jump code for conditions and short-circuit operators

pub mod compiler;
pub mod expr;
pub mod instructions;
pub mod stmt;
