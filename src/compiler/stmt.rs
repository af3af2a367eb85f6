use crate::{
    ast::{
        ast::Block,
        expressions::Expr,
        statements::Stmt,
    },
    errors::errors::InternalError,
};

use super::{
    compiler::Compiler,
    expr::{gen_address, gen_assign, gen_call, gen_expression, gen_jump_code},
    instructions::{Opcode, Operand, Register},
};

const SYSCALL_PRINT_INT: i32 = 1;
const SYSCALL_PRINT_STRING: i32 = 4;
const SYSCALL_READ_INT: i32 = 5;

/// Generates the statements of a block. Local storage was already reserved
/// by the function prologue.
pub fn gen_block(compiler: &mut Compiler, block: &Block) -> Result<(), InternalError> {
    for stmt in &block.stmts {
        gen_statement(compiler, stmt)?;
    }
    Ok(())
}

/// Generates code for a statement. Statements leave the stack as they
/// found it.
pub fn gen_statement(compiler: &mut Compiler, stmt: &Stmt) -> Result<(), InternalError> {
    match stmt {
        Stmt::Assign(assign) => {
            gen_assign(compiler, assign)?;
            compiler.pop(Register::T0);
        }
        Stmt::PostInc(loc) => gen_step(compiler, loc, Opcode::Add)?,
        Stmt::PostDec(loc) => gen_step(compiler, loc, Opcode::Sub)?,
        Stmt::Read(loc) => {
            compiler.emit(
                Opcode::Li,
                vec![Register::V0.into(), SYSCALL_READ_INT.into()],
            );
            compiler.emit(Opcode::Syscall, vec![]);
            gen_address(compiler, loc)?;
            compiler.emit(
                Opcode::Sw,
                vec![Register::V0.into(), Operand::Indexed(0, Register::T0)],
            );
        }
        Stmt::Write(expr) => {
            let service = if matches!(expr, Expr::StrLit { .. }) {
                SYSCALL_PRINT_STRING
            } else {
                SYSCALL_PRINT_INT
            };
            gen_expression(compiler, expr)?;
            compiler.pop(Register::A0);
            compiler.emit(Opcode::Li, vec![Register::V0.into(), service.into()]);
            compiler.emit(Opcode::Syscall, vec![]);
        }
        Stmt::If { cond, then_block } => {
            let then_label = compiler.next_label();
            let done = compiler.next_label();

            gen_jump_code(compiler, cond, &then_label, &done)?;
            compiler.emit_label(&then_label);
            gen_block(compiler, then_block)?;
            compiler.emit_label(&done);
        }
        Stmt::IfElse {
            cond,
            then_block,
            else_block,
        } => {
            let then_label = compiler.next_label();
            let else_label = compiler.next_label();
            let done = compiler.next_label();

            gen_jump_code(compiler, cond, &then_label, &else_label)?;
            compiler.emit_label(&then_label);
            gen_block(compiler, then_block)?;
            compiler.branch(&done);
            compiler.emit_label(&else_label);
            gen_block(compiler, else_block)?;
            compiler.emit_label(&done);
        }
        Stmt::While { cond, body } => {
            let test = compiler.next_label();
            let body_label = compiler.next_label();
            let done = compiler.next_label();

            compiler.emit_label(&test);
            gen_jump_code(compiler, cond, &body_label, &done)?;
            compiler.emit_label(&body_label);
            gen_block(compiler, body)?;
            compiler.branch(&test);
            compiler.emit_label(&done);
        }
        Stmt::Call(call) => gen_call(compiler, call)?,
        Stmt::Return { value, position } => {
            let return_label = compiler
                .frame
                .as_ref()
                .map(|frame| frame.return_label.clone())
                .ok_or(InternalError::ReturnOutsideFunction {
                    position: *position,
                })?;

            if let Some(value) = value {
                gen_expression(compiler, value)?;
                compiler.pop(Register::V0);
            }
            compiler.branch(&return_label);
        }
    }
    Ok(())
}

/// `loc++` and `loc--`: a read-modify-write through the location's
/// address.
fn gen_step(compiler: &mut Compiler, loc: &Expr, opcode: Opcode) -> Result<(), InternalError> {
    gen_address(compiler, loc)?;
    compiler.emit(
        Opcode::Lw,
        vec![Register::T1.into(), Operand::Indexed(0, Register::T0)],
    );
    compiler.emit(
        opcode,
        vec![Register::T1.into(), Register::T1.into(), 1.into()],
    );
    compiler.emit(
        Opcode::Sw,
        vec![Register::T1.into(), Operand::Indexed(0, Register::T0)],
    );
    Ok(())
}
