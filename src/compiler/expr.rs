use crate::{
    ast::{
        ast::Id,
        expressions::{Assign, BinaryOp, Call, Expr, UnaryOp},
    },
    errors::errors::InternalError,
    symbols::symbols::Storage,
};

use super::{
    compiler::{function_label, global_label, Compiler},
    instructions::{Opcode, Operand, Register},
};

/// Storage of the variable an identifier is linked to.
fn storage_of(compiler: &Compiler, id: &Id) -> Result<Storage, InternalError> {
    compiler
        .symbols
        .get(id.symbol()?)
        .storage()
        .ok_or_else(|| InternalError::UnexpectedSymbolKind {
            name: id.name.clone(),
            expected: "variable",
        })
}

/// Operand addressing a variable or parameter.
fn variable_operand(compiler: &Compiler, id: &Id) -> Result<Operand, InternalError> {
    match storage_of(compiler, id)? {
        Storage::Global => Ok(Operand::Label(global_label(&id.name))),
        Storage::Local(offset) => Ok(Operand::Indexed(offset, Register::Fp)),
        Storage::Field(_) => Err(InternalError::UnexpectedSymbolKind {
            name: id.name.clone(),
            expected: "variable",
        }),
    }
}

/// Leaves the address of a location in `$t0`.
///
/// A field's address is its struct's address plus the field offset, so a
/// chain like `a.b.c` adds one offset per link.
pub fn gen_address(compiler: &mut Compiler, loc: &Expr) -> Result<(), InternalError> {
    match loc {
        Expr::Id(id) => {
            let operand = variable_operand(compiler, id)?;
            compiler.emit(Opcode::La, vec![Register::T0.into(), operand]);
        }
        Expr::DotAccess(dot) => {
            gen_address(compiler, &dot.loc)?;
            let Storage::Field(offset) = storage_of(compiler, &dot.field)? else {
                return Err(InternalError::UnexpectedSymbolKind {
                    name: dot.field.name.clone(),
                    expected: "struct field",
                });
            };
            if offset != 0 {
                compiler.emit(
                    Opcode::Addu,
                    vec![Register::T0.into(), Register::T0.into(), offset.into()],
                );
            }
        }
        other => {
            return Err(InternalError::NotALocation {
                position: other.position(),
            })
        }
    }
    Ok(())
}

/// Generates code that pushes the value of `expr`.
///
/// Every expression leaves exactly one word on the stack.
pub fn gen_expression(compiler: &mut Compiler, expr: &Expr) -> Result<(), InternalError> {
    match expr {
        Expr::IntLit { value, .. } => {
            compiler.emit(Opcode::Li, vec![Register::T0.into(), (*value).into()]);
            compiler.push(Register::T0);
        }
        Expr::StrLit { value, .. } => {
            let label = compiler.string_label(value);
            compiler.emit(Opcode::La, vec![Register::T0.into(), Operand::Label(label)]);
            compiler.push(Register::T0);
        }
        Expr::True(_) | Expr::False(_) => {
            let value = i32::from(matches!(expr, Expr::True(_)));
            compiler.emit(Opcode::Li, vec![Register::T0.into(), value.into()]);
            compiler.push(Register::T0);
        }
        Expr::Id(id) => {
            let operand = variable_operand(compiler, id)?;
            compiler.emit(Opcode::Lw, vec![Register::T0.into(), operand]);
            compiler.push(Register::T0);
        }
        Expr::DotAccess(_) => {
            gen_address(compiler, expr)?;
            compiler.emit(
                Opcode::Lw,
                vec![Register::T0.into(), Operand::Indexed(0, Register::T0)],
            );
            compiler.push(Register::T0);
        }
        Expr::Assign(assign) => gen_assign(compiler, assign)?,
        Expr::Call(call) => {
            gen_call(compiler, call)?;
            compiler.push(Register::V0);
        }
        Expr::Unary { op, operand } => {
            gen_expression(compiler, operand)?;
            compiler.pop(Register::T0);
            match op {
                UnaryOp::Negate => compiler.emit(
                    Opcode::Sub,
                    vec![Register::T0.into(), Register::Zero.into(), Register::T0.into()],
                ),
                UnaryOp::Not => compiler.emit(
                    Opcode::Xori,
                    vec![Register::T0.into(), Register::T0.into(), 1.into()],
                ),
            }
            compiler.push(Register::T0);
        }
        Expr::Binary { op, left, right } => {
            let Some(opcode) = value_opcode(*op) else {
                return gen_short_circuit(compiler, *op, left, right);
            };
            gen_expression(compiler, left)?;
            gen_expression(compiler, right)?;
            compiler.pop(Register::T1);
            compiler.pop(Register::T0);
            compiler.emit(
                opcode,
                vec![Register::T0.into(), Register::T0.into(), Register::T1.into()],
            );
            compiler.push(Register::T0);
        }
    }
    Ok(())
}

/// The instruction computing a strict binary operator, `None` for the
/// short-circuit ones.
fn value_opcode(op: BinaryOp) -> Option<Opcode> {
    let opcode = match op {
        BinaryOp::Plus => Opcode::Add,
        BinaryOp::Minus => Opcode::Sub,
        BinaryOp::Times => Opcode::Mul,
        BinaryOp::Divide => Opcode::Div,
        BinaryOp::Equals => Opcode::Seq,
        BinaryOp::NotEquals => Opcode::Sne,
        BinaryOp::Less => Opcode::Slt,
        BinaryOp::Greater => Opcode::Sgt,
        BinaryOp::LessEquals => Opcode::Sle,
        BinaryOp::GreaterEquals => Opcode::Sge,
        BinaryOp::And | BinaryOp::Or => return None,
    };
    Some(opcode)
}

fn branch_opcode(op: BinaryOp) -> Option<Opcode> {
    match op {
        BinaryOp::Equals => Some(Opcode::Beq),
        BinaryOp::NotEquals => Some(Opcode::Bne),
        BinaryOp::Less => Some(Opcode::Blt),
        BinaryOp::Greater => Some(Opcode::Bgt),
        BinaryOp::LessEquals => Some(Opcode::Ble),
        BinaryOp::GreaterEquals => Some(Opcode::Bge),
        _ => None,
    }
}

/// The value of `&&` or `||`. The right operand only runs when the left
/// one does not decide the result.
fn gen_short_circuit(compiler: &mut Compiler, op: BinaryOp, left: &Expr, right: &Expr) -> Result<(), InternalError> {
    let done = compiler.next_label();
    let skip = if op == BinaryOp::And {
        Opcode::Beq
    } else {
        Opcode::Bne
    };

    gen_expression(compiler, left)?;
    // The left value stays on the stack as the result when it decides
    compiler.emit(
        Opcode::Lw,
        vec![Register::T0.into(), Operand::Indexed(4, Register::Sp)],
    );
    compiler.emit(
        skip,
        vec![Register::T0.into(), Register::Zero.into(), done.as_str().into()],
    );
    compiler.pop(Register::T0);
    gen_expression(compiler, right)?;
    compiler.emit_label(&done);

    Ok(())
}

/// Stores the right side into the left and leaves the stored value on the
/// stack.
pub fn gen_assign(compiler: &mut Compiler, assign: &Assign) -> Result<(), InternalError> {
    gen_expression(compiler, &assign.rhs)?;
    gen_address(compiler, &assign.lhs)?;
    compiler.emit(
        Opcode::Lw,
        vec![Register::T1.into(), Operand::Indexed(4, Register::Sp)],
    );
    compiler.emit(
        Opcode::Sw,
        vec![Register::T1.into(), Operand::Indexed(0, Register::T0)],
    );
    Ok(())
}

/// Calls a function, leaving its result in `$v0`.
///
/// Arguments are pushed in order; the callee's epilogue pops them.
pub fn gen_call(compiler: &mut Compiler, call: &Call) -> Result<(), InternalError> {
    for arg in &call.args {
        gen_expression(compiler, arg)?;
    }
    compiler.emit(
        Opcode::Jal,
        vec![Operand::Label(function_label(&call.callee.name))],
    );
    Ok(())
}

/// Generates code that branches to `true_label` when `expr` holds and to
/// `false_label` otherwise, without pushing a value where avoidable.
pub fn gen_jump_code(
    compiler: &mut Compiler,
    expr: &Expr,
    true_label: &str,
    false_label: &str,
) -> Result<(), InternalError> {
    match expr {
        Expr::True(_) => compiler.branch(true_label),
        Expr::False(_) => compiler.branch(false_label),
        Expr::Unary {
            op: UnaryOp::Not,
            operand,
        } => gen_jump_code(compiler, operand, false_label, true_label)?,
        Expr::Binary {
            op: BinaryOp::And,
            left,
            right,
        } => {
            let right_label = compiler.next_label();
            gen_jump_code(compiler, left, &right_label, false_label)?;
            compiler.emit_label(&right_label);
            gen_jump_code(compiler, right, true_label, false_label)?;
        }
        Expr::Binary {
            op: BinaryOp::Or,
            left,
            right,
        } => {
            let right_label = compiler.next_label();
            gen_jump_code(compiler, left, true_label, &right_label)?;
            compiler.emit_label(&right_label);
            gen_jump_code(compiler, right, true_label, false_label)?;
        }
        Expr::Binary { op, left, right } if branch_opcode(*op).is_some() => {
            gen_expression(compiler, left)?;
            gen_expression(compiler, right)?;
            compiler.pop(Register::T1);
            compiler.pop(Register::T0);
            if let Some(opcode) = branch_opcode(*op) {
                compiler.emit(
                    opcode,
                    vec![Register::T0.into(), Register::T1.into(), true_label.into()],
                );
            }
            compiler.branch(false_label);
        }
        _ => {
            gen_expression(compiler, expr)?;
            compiler.pop(Register::T0);
            compiler.emit(
                Opcode::Beq,
                vec![Register::T0.into(), Register::Zero.into(), false_label.into()],
            );
            compiler.branch(true_label);
        }
    }
    Ok(())
}
