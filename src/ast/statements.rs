use crate::Position;

use super::{
    ast::Block,
    expressions::{Assign, Call, Expr},
};

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Assign(Assign),
    PostInc(Expr),
    PostDec(Expr),
    /// `cin >> loc;`
    Read(Expr),
    /// `cout << exp;`
    Write(Expr),
    If {
        cond: Expr,
        then_block: Block,
    },
    IfElse {
        cond: Expr,
        then_block: Block,
        else_block: Block,
    },
    While {
        cond: Expr,
        body: Block,
    },
    Call(Call),
    Return {
        value: Option<Expr>,
        position: Position,
    },
}
