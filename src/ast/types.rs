//! Type annotations as written in the source.
//!
//! These are resolved into [`Type`] values by name analysis. A struct
//! annotation keeps the identifier naming the struct so it can be linked
//! to the definition and reported on.

use std::fmt::Display;

use crate::type_checker::types::Type;

use super::ast::Id;

#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Int,
    Bool,
    Void,
    Struct(Id),
}

impl TypeNode {
    pub fn is_void(&self) -> bool {
        matches!(self, TypeNode::Void)
    }

    pub fn to_type(&self) -> Type {
        match self {
            TypeNode::Int => Type::Int,
            TypeNode::Bool => Type::Bool,
            TypeNode::Void => Type::Void,
            TypeNode::Struct(id) => Type::Struct(id.name.clone()),
        }
    }
}

impl Display for TypeNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeNode::Int => write!(f, "int"),
            TypeNode::Bool => write!(f, "bool"),
            TypeNode::Void => write!(f, "void"),
            TypeNode::Struct(id) => write!(f, "struct {}", id.name),
        }
    }
}
