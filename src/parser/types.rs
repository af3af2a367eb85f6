//! Type parsing implementation.
//!
//! Handles the type annotations of declarations:
//!
//! - Primitive types (`int`, `bool`, `void`)
//! - Struct types (`struct Name`)
//!
//! Like expressions, types are dispatched on their first token through a
//! lookup table.

use std::collections::HashMap;

use crate::{
    ast::{ast::Id, types::TypeNode},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::parser::Parser;

/// Type alias for type handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeNode, Error>;

/// Type alias for type lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Initializes the type parsing lookup table.
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Int, parse_primitive_type);
    parser.type_nud(TokenKind::Bool, parse_primitive_type);
    parser.type_nud(TokenKind::Void, parse_primitive_type);
    parser.type_nud(TokenKind::Struct, parse_struct_type);
}

pub fn parse_primitive_type(parser: &mut Parser) -> Result<TypeNode, Error> {
    match parser.advance().kind {
        TokenKind::Int => Ok(TypeNode::Int),
        TokenKind::Bool => Ok(TypeNode::Bool),
        _ => Ok(TypeNode::Void),
    }
}

pub fn parse_struct_type(parser: &mut Parser) -> Result<TypeNode, Error> {
    parser.expect(TokenKind::Struct)?;
    let name = parser.expect(TokenKind::Identifier)?;

    Ok(TypeNode::Struct(Id::new(&name.value, name.span.start)))
}

pub fn parse_type(parser: &mut Parser) -> Result<TypeNode, Error> {
    let token_kind = parser.current_token_kind();
    match parser.get_type_nud_lookup().get(&token_kind).copied() {
        Some(handler) => handler(parser),
        None => Err(parser.unexpected_detailed("expected a type")),
    }
}
