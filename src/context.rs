//! Per-compilation state shared by the semantic passes.

use crate::{errors::diagnostics::Diagnostics, symbols::symbols::SymbolArena};

/// State owned by a single compilation.
///
/// Every pass receives the context explicitly, so two compilations never
/// share symbols or diagnostics.
#[derive(Debug, Default)]
pub struct Context {
    pub symbols: SymbolArena,
    pub diagnostics: Diagnostics,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }
}
