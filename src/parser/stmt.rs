use crate::{
    ast::{
        ast::{Block, Decl, FnDecl, Formal, Id, StructDecl, VarDecl},
        expressions::Expr,
        statements::Stmt,
        types::TypeNode,
    },
    errors::errors::Error,
    lexer::tokens::TokenKind,
    parser::{expr::parse_expr, lookups::BindingPower},
};

use super::{parser::Parser, types::parse_type};

fn parse_id(parser: &mut Parser) -> Result<Id, Error> {
    let token = parser.expect(TokenKind::Identifier)?;
    Ok(Id::new(&token.value, token.span.start))
}

/// Whether the upcoming tokens start a variable declaration.
fn at_var_decl(parser: &Parser) -> bool {
    let kind = parser.current_token_kind();
    kind.is_type_keyword()
        || (kind == TokenKind::Struct
            && parser.peek_kind(1) == TokenKind::Identifier
            && parser.peek_kind(2) == TokenKind::Identifier)
}

pub fn parse_decl(parser: &mut Parser) -> Result<Decl, Error> {
    if parser.current_token_kind() == TokenKind::Struct && parser.peek_kind(2) == TokenKind::OpenCurly {
        return Ok(Decl::Struct(parse_struct_decl(parser)?));
    }

    let ty = parse_type(parser)?;
    let id = parse_id(parser)?;

    if parser.current_token_kind() == TokenKind::OpenParen {
        if let TypeNode::Struct(_) = ty {
            return Err(parser.unexpected_detailed("functions cannot return a struct"));
        }
        return Ok(Decl::Fn(parse_fn_decl(parser, ty, id)?));
    }

    parser.expect(TokenKind::Semicolon)?;
    Ok(Decl::Var(VarDecl { ty, id }))
}

pub fn parse_var_decl(parser: &mut Parser) -> Result<VarDecl, Error> {
    let ty = parse_type(parser)?;
    let id = parse_id(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(VarDecl { ty, id })
}

pub fn parse_struct_decl(parser: &mut Parser) -> Result<StructDecl, Error> {
    parser.expect(TokenKind::Struct)?;
    let id = parse_id(parser)?;
    parser.expect(TokenKind::OpenCurly)?;

    let mut fields = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !at_var_decl(parser) {
            return Err(parser.unexpected_detailed("expected a field declaration"));
        }
        fields.push(parse_var_decl(parser)?);
    }

    if fields.is_empty() {
        return Err(parser.unexpected_detailed("a struct needs at least one field"));
    }

    parser.expect(TokenKind::CloseCurly)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(StructDecl { id, fields })
}

pub fn parse_fn_decl(parser: &mut Parser, return_type: TypeNode, id: Id) -> Result<FnDecl, Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut formals = Vec::new();
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            if !parser.current_token_kind().is_type_keyword() {
                return Err(parser.unexpected_detailed("parameters must be int, bool or void"));
            }
            let ty = parse_type(parser)?;
            let id = parse_id(parser)?;
            formals.push(Formal { ty, id });

            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    let body = parse_block(parser)?;

    Ok(FnDecl {
        return_type,
        id,
        formals,
        body,
        frame_size: 0,
    })
}

pub fn parse_block(parser: &mut Parser) -> Result<Block, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut decls = Vec::new();
    while at_var_decl(parser) {
        decls.push(parse_var_decl(parser)?);
    }

    let mut stmts = Vec::new();
    while parser.current_token_kind() != TokenKind::CloseCurly {
        if !parser.has_tokens() {
            return Err(parser.unexpected());
        }
        stmts.push(parse_stmt(parser)?);
    }

    parser.expect(TokenKind::CloseCurly)?;

    Ok(Block { decls, stmts })
}

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    if let Some(handler) = parser.get_stmt_lookup().get(&parser.current_token_kind()).copied() {
        return handler(parser);
    }

    let start = parser.current_token().clone();
    let expr = parse_expr(parser, BindingPower::Default)?;

    let stmt = match (parser.current_token_kind(), expr) {
        (TokenKind::PlusPlus, loc) if loc.is_loc() => {
            parser.advance();
            Stmt::PostInc(loc)
        }
        (TokenKind::MinusMinus, loc) if loc.is_loc() => {
            parser.advance();
            Stmt::PostDec(loc)
        }
        (_, Expr::Assign(assign)) => Stmt::Assign(assign),
        (_, Expr::Call(call)) => Stmt::Call(call),
        _ => {
            return Err(Error::new(
                crate::errors::errors::ErrorImpl::UnexpectedTokenDetailed {
                    token: start.value,
                    message: String::from("expected an assignment, call, `++` or `--` statement"),
                },
                start.span.start,
            ))
        }
    };

    parser.expect(TokenKind::Semicolon)?;
    Ok(stmt)
}

fn parse_loc(parser: &mut Parser) -> Result<Expr, Error> {
    let loc = parse_expr(parser, BindingPower::Assignment)?;
    if !loc.is_loc() {
        return Err(parser.unexpected_detailed("expected a variable or field"));
    }
    Ok(loc)
}

pub fn parse_read_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();
    parser.expect(TokenKind::ReadOp)?;
    let loc = parse_loc(parser)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Read(loc))
}

pub fn parse_write_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();
    parser.expect(TokenKind::WriteOp)?;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Write(expr))
}

fn parse_condition(parser: &mut Parser) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenParen)?;
    let cond = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;
    Ok(cond)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    let cond = parse_condition(parser)?;
    let then_block = parse_block(parser)?;

    if parser.current_token_kind() != TokenKind::Else {
        return Ok(Stmt::If { cond, then_block });
    }

    parser.advance();
    let else_block = parse_block(parser)?;

    Ok(Stmt::IfElse {
        cond,
        then_block,
        else_block,
    })
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    parser.advance();

    let cond = parse_condition(parser)?;
    let body = parse_block(parser)?;

    Ok(Stmt::While { cond, body })
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let position = parser.advance().span.start;

    let value = if parser.current_token_kind() != TokenKind::Semicolon {
        Some(parse_expr(parser, BindingPower::Default)?)
    } else {
        None
    };

    parser.expect(TokenKind::Semicolon)?;

    Ok(Stmt::Return { value, position })
}
