//! Error types and error handling for the compiler.
//!
//! This module defines the error types used throughout the compilation
//! process. It includes:
//!
//! - Diagnostics about the user's program, with source positions
//! - Errors returned by symbol table operations
//! - Internal errors that abort a compilation outright
//! - The accumulator that collects diagnostics across all passes

pub mod diagnostics;
pub mod errors;

#[cfg(test)]
mod tests;
