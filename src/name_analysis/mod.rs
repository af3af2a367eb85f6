//! Name analysis module.
//!
//! The first semantic pass. It walks the AST once in source order and:
//!
//! - Binds every declaration in the symbol table, scope by scope
//! - Links every identifier use to its symbol
//! - Resolves struct field accesses against each struct's private fields
//! - Assigns frame offsets to formals and locals, and field offsets to
//!   struct members
//! - Checks that the program has a `main` function without parameters
//!
//! User errors are recorded as diagnostics and the walk continues.

pub mod name_analysis;
