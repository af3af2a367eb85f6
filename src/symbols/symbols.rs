//! Symbols and the arena that owns them.
//!
//! Symbols outlive the declarations that create them and are referenced from
//! many AST nodes, so they live in a [`SymbolArena`] and are addressed by
//! [`SymbolId`]. Struct definitions, each with a private field table, live in
//! the same arena under [`StructId`].

use crate::type_checker::types::Type;

use super::symbol_table::SymbolTable;

pub const WORD_SIZE: i32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StructId(usize);

/// Where a variable lives at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// Static storage labelled with the variable's name.
    Global,
    /// Signed byte offset from the frame pointer.
    Local(i32),
    /// Byte offset from the base of the enclosing struct.
    Field(i32),
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Variable {
        ty: Type,
        storage: Storage,
        /// The definition of a struct-typed variable.
        struct_def: Option<StructId>,
    },
    Function {
        formals: Vec<Type>,
        return_type: Type,
    },
    StructDef(StructId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
}

impl Symbol {
    pub fn variable(name: &str, ty: Type, storage: Storage, struct_def: Option<StructId>) -> Self {
        Symbol {
            name: name.to_string(),
            kind: SymbolKind::Variable {
                ty,
                storage,
                struct_def,
            },
        }
    }

    pub fn function(name: &str, return_type: Type) -> Self {
        Symbol {
            name: name.to_string(),
            kind: SymbolKind::Function {
                formals: vec![],
                return_type,
            },
        }
    }

    pub fn struct_def(name: &str, id: StructId) -> Self {
        Symbol {
            name: name.to_string(),
            kind: SymbolKind::StructDef(id),
        }
    }

    /// The struct definition reached through this symbol: either the
    /// definition itself or the type of a struct variable.
    pub fn struct_id(&self) -> Option<StructId> {
        match &self.kind {
            SymbolKind::Variable { struct_def, .. } => *struct_def,
            SymbolKind::StructDef(id) => Some(*id),
            SymbolKind::Function { .. } => None,
        }
    }

    pub fn storage(&self) -> Option<Storage> {
        match &self.kind {
            SymbolKind::Variable { storage, .. } => Some(*storage),
            _ => None,
        }
    }
}

/// A struct definition together with its private field scope.
#[derive(Debug, Clone)]
pub struct StructDef {
    pub name: String,
    pub fields: SymbolTable,
    /// Total size of all fields in bytes.
    pub size: i32,
}

#[derive(Debug, Default)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
    structs: Vec<StructDef>,
}

impl SymbolArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, symbol: Symbol) -> SymbolId {
        self.symbols.push(symbol);
        SymbolId(self.symbols.len() - 1)
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0]
    }

    pub fn alloc_struct(&mut self, def: StructDef) -> StructId {
        self.structs.push(def);
        StructId(self.structs.len() - 1)
    }

    pub fn get_struct(&self, id: StructId) -> &StructDef {
        &self.structs[id.0]
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Size in bytes of a variable of the given symbol's type.
    pub fn size_of(&self, id: SymbolId) -> i32 {
        match self.get(id).struct_id() {
            Some(def) => self.get_struct(def).size,
            None => WORD_SIZE,
        }
    }

    pub fn type_of(&self, id: SymbolId) -> Type {
        let symbol = self.get(id);
        match &symbol.kind {
            SymbolKind::Variable { ty, .. } => ty.clone(),
            SymbolKind::Function {
                formals,
                return_type,
            } => Type::Function(formals.clone(), Box::new(return_type.clone())),
            SymbolKind::StructDef(_) => Type::StructDef(symbol.name.clone()),
        }
    }
}
