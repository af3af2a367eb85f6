use crate::{
    ast::{
        ast::Id,
        expressions::{Assign, BinaryOp, Call, DotAccess, Expr, UnaryOp},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::BindingPower, parser::Parser};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let Some(nud) = parser.get_nud_lookup().get(&token_kind).copied() else {
        return Err(parser.unexpected());
    };

    let mut left = nud(parser)?;

    // While the current token binds tighter than the caller, keep extending lhs
    while parser.current_bp() > bp {
        let token_kind = parser.current_token_kind();
        let Some(led) = parser.get_led_lookup().get(&token_kind).copied() else {
            return Err(parser.unexpected());
        };

        let token_bp = parser.current_bp();
        left = led(parser, left, token_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance();
    let position = token.span.start;

    match token.kind {
        TokenKind::Number => match token.value.parse() {
            Ok(value) => Ok(Expr::IntLit { value, position }),
            Err(_) => Err(Error::new(
                ErrorImpl::NumberParseError { token: token.value },
                position,
            )),
        },
        TokenKind::String => Ok(Expr::StrLit {
            value: token.value,
            position,
        }),
        TokenKind::True => Ok(Expr::True(position)),
        TokenKind::False => Ok(Expr::False(position)),
        TokenKind::Identifier => Ok(Expr::Id(Id::new(&token.value, position))),
        _ => Err(Error::new(
            ErrorImpl::UnexpectedToken { token: token.value },
            position,
        )),
    }
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    let op = match kind {
        TokenKind::Plus => BinaryOp::Plus,
        TokenKind::Dash => BinaryOp::Minus,
        TokenKind::Star => BinaryOp::Times,
        TokenKind::Slash => BinaryOp::Divide,
        TokenKind::And => BinaryOp::And,
        TokenKind::Or => BinaryOp::Or,
        TokenKind::Equals => BinaryOp::Equals,
        TokenKind::NotEquals => BinaryOp::NotEquals,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::LessEquals => BinaryOp::LessEquals,
        TokenKind::GreaterEquals => BinaryOp::GreaterEquals,
        _ => return None,
    };
    Some(op)
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let Some(op) = binary_op(parser.current_token_kind()) else {
        return Err(parser.unexpected());
    };
    parser.advance();

    let right = parse_expr(parser, bp)?;

    // Comparisons do not chain
    if bp == BindingPower::Relational && parser.current_bp() == BindingPower::Relational {
        return Err(parser.unexpected_detailed("comparison operators cannot be chained"));
    }

    Ok(Expr::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance();
    let op = if operator_token.kind == TokenKind::Not {
        UnaryOp::Not
    } else {
        UnaryOp::Negate
    };

    let operand = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Unary {
        op,
        operand: Box::new(operand),
    })
}

pub fn parse_assignment_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    if !left.is_loc() {
        return Err(parser.unexpected_detailed("only a variable or field can be assigned to"));
    }
    parser.advance();

    // Right associative: `a = b = c` assigns `c` to `b` first
    let rhs = parse_expr(parser, BindingPower::Default)?;

    Ok(Expr::Assign(Assign {
        lhs: Box::new(left),
        rhs: Box::new(rhs),
    }))
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    parser.advance();
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(expr)
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let Expr::Id(callee) = left else {
        return Err(parser.unexpected_detailed("only a function name can be called"));
    };
    parser.advance();

    let mut args = vec![];
    if parser.current_token_kind() != TokenKind::CloseParen {
        loop {
            args.push(parse_expr(parser, BindingPower::Default)?);
            if parser.current_token_kind() != TokenKind::Comma {
                break;
            }
            parser.advance();
        }
    }

    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Call(Call { callee, args }))
}

pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    if !left.is_loc() {
        return Err(parser.unexpected_detailed("only a variable or field has fields"));
    }
    parser.advance();

    let field = parser.expect(TokenKind::Identifier)?;

    Ok(Expr::DotAccess(DotAccess {
        loc: Box::new(left),
        field: Id::new(&field.value, field.span.start),
        struct_def: None,
    }))
}
