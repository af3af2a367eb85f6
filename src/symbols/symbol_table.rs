use rustc_hash::FxHashMap;
use tracing::trace;

use crate::errors::errors::SymbolTableError;

use super::symbols::SymbolId;

type Scope = FxHashMap<String, SymbolId>;

/// A stack of scopes mapping names to symbols.
///
/// Shadowing is allowed across scopes and lookups always resolve to the
/// innermost binding. Only the innermost scope is ever mutated.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    scopes: Vec<Scope>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    /// Creates a table holding a single, outermost scope.
    pub fn new() -> Self {
        SymbolTable {
            scopes: vec![Scope::default()],
        }
    }

    /// Creates a table with no scopes at all.
    pub fn empty() -> Self {
        SymbolTable { scopes: vec![] }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn add_declaration(&mut self, name: &str, symbol: SymbolId) -> Result<(), SymbolTableError> {
        if name.is_empty() {
            return Err(SymbolTableError::NullArgument);
        }

        let scope = self
            .scopes
            .last_mut()
            .ok_or(SymbolTableError::EmptyScopeStack)?;

        if scope.contains_key(name) {
            return Err(SymbolTableError::DuplicateName {
                name: name.to_string(),
            });
        }

        scope.insert(name.to_string(), symbol);
        Ok(())
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::default());
        trace!(depth = self.scopes.len(), "entered scope");
    }

    pub fn exit_scope(&mut self) -> Result<(), SymbolTableError> {
        self.scopes
            .pop()
            .ok_or(SymbolTableError::EmptyScopeStack)?;
        trace!(depth = self.scopes.len(), "exited scope");
        Ok(())
    }

    /// Searches the innermost scope only.
    pub fn lookup_local(&self, name: &str) -> Option<SymbolId> {
        self.scopes.last()?.get(name).copied()
    }

    /// Searches every scope from the innermost outwards.
    pub fn lookup_global(&self, name: &str) -> Option<SymbolId> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).copied())
    }
}
