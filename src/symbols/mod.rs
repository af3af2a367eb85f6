//! Symbols and scoped symbol tables.
//!
//! - `symbols`: symbol kinds, storage locations and the arena owning them
//! - `symbol_table`: the scope stack used by name analysis and by every
//!   struct definition for its private fields

pub mod symbol_table;
pub mod symbols;
