//! Type checking module.
//!
//! The second semantic pass. It runs over the program after name analysis
//! has linked every identifier, and:
//!
//! - Computes the type of every expression bottom-up
//! - Checks operator operands, assignments and call arguments
//! - Checks conditions, `cin`/`cout` operands and return values against
//!   the enclosing function
//!
//! An ill-typed expression gets the `Error` type, which silences every
//! check above it so that one mistake is reported once.

pub mod type_checker;
pub mod types;
