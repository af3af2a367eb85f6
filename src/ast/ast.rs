use crate::{errors::errors::InternalError, symbols::symbols::SymbolId, Position};

use super::{statements::Stmt, types::TypeNode};

/// An identifier occurrence.
///
/// Name analysis fills in `symbol` for every identifier it resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct Id {
    pub name: String,
    pub position: Position,
    pub symbol: Option<SymbolId>,
}

impl Id {
    pub fn new(name: &str, position: Position) -> Self {
        Id {
            name: name.to_string(),
            position,
            symbol: None,
        }
    }

    pub fn link(&mut self, symbol: SymbolId) {
        self.symbol = Some(symbol);
    }

    /// The linked symbol. Every pass after name analysis relies on it.
    pub fn symbol(&self) -> Result<SymbolId, InternalError> {
        self.symbol.ok_or_else(|| InternalError::UnlinkedIdentifier {
            name: self.name.clone(),
            position: self.position,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub decls: Vec<Decl>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Var(VarDecl),
    Fn(FnDecl),
    Struct(StructDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub ty: TypeNode,
    pub id: Id,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Formal {
    pub ty: TypeNode,
    pub id: Id,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FnDecl {
    pub return_type: TypeNode,
    pub id: Id,
    pub formals: Vec<Formal>,
    pub body: Block,
    /// Bytes of local storage the body needs, set by name analysis.
    pub frame_size: i32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructDecl {
    pub id: Id,
    pub fields: Vec<VarDecl>,
}

/// Local declarations followed by statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub decls: Vec<VarDecl>,
    pub stmts: Vec<Stmt>,
}
