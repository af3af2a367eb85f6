use crate::{symbols::symbols::StructId, Position};

use super::ast::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Plus,
    Minus,
    Times,
    Divide,
    And,
    Or,
    Equals,
    NotEquals,
    Less,
    Greater,
    LessEquals,
    GreaterEquals,
}

impl BinaryOp {
    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            BinaryOp::Plus | BinaryOp::Minus | BinaryOp::Times | BinaryOp::Divide
        )
    }

    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOp::And | BinaryOp::Or)
    }

    pub fn is_equality(&self) -> bool {
        matches!(self, BinaryOp::Equals | BinaryOp::NotEquals)
    }

    pub fn is_relational(&self) -> bool {
        matches!(
            self,
            BinaryOp::Less | BinaryOp::Greater | BinaryOp::LessEquals | BinaryOp::GreaterEquals
        )
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Plus => "+",
            BinaryOp::Minus => "-",
            BinaryOp::Times => "*",
            BinaryOp::Divide => "/",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Equals => "==",
            BinaryOp::NotEquals => "!=",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEquals => "<=",
            BinaryOp::GreaterEquals => ">=",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Negate,
}

impl UnaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
        }
    }
}

/// `loc.field`
#[derive(Debug, Clone, PartialEq)]
pub struct DotAccess {
    pub loc: Box<Expr>,
    pub field: Id,
    /// The struct definition whose fields `field` was resolved against.
    pub struct_def: Option<StructId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub callee: Id,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    IntLit { value: i32, position: Position },
    /// The literal's text between the quotes, escapes left as written.
    StrLit { value: String, position: Position },
    True(Position),
    False(Position),
    Id(Id),
    DotAccess(DotAccess),
    Assign(Assign),
    Call(Call),
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    /// The position diagnostics about this expression are reported at.
    pub fn position(&self) -> Position {
        match self {
            Expr::IntLit { position, .. } | Expr::StrLit { position, .. } => *position,
            Expr::True(position) | Expr::False(position) => *position,
            Expr::Id(id) => id.position,
            Expr::DotAccess(dot) => dot.field.position,
            Expr::Assign(assign) => assign.lhs.position(),
            Expr::Call(call) => call.callee.position,
            Expr::Unary { operand, .. } => operand.position(),
            Expr::Binary { left, .. } => left.position(),
        }
    }

    /// Whether the expression names a storage location.
    pub fn is_loc(&self) -> bool {
        matches!(self, Expr::Id(_) | Expr::DotAccess(_))
    }
}
