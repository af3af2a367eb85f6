use tracing::debug;

use crate::{
    ast::{
        ast::{Block, Decl, FnDecl, Program},
        expressions::{Assign, BinaryOp, Call, Expr, UnaryOp},
        statements::Stmt,
    },
    context::Context,
    errors::errors::{ErrorImpl, InternalError},
    Position,
};

use super::types::Type;

/// Which statement an operand check is made for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IoKind {
    Read,
    Write,
}

/// Walks a resolved program and checks the type of every expression and
/// statement.
///
/// The checker never touches the symbol table. Every type it needs comes
/// from the symbols that name analysis linked onto the identifiers.
pub struct TypeChecker<'a> {
    context: &'a mut Context,
    /// Declared return type of the function being checked.
    return_type: Option<Type>,
}

/// Type checks `program`, recording diagnostics in `context`.
///
/// Must only run after name analysis finished without errors. An
/// identifier without a linked symbol is reported as an internal error.
pub fn type_check(program: &Program, context: &mut Context) -> Result<(), InternalError> {
    let errors_before = context.diagnostics.error_count();
    let mut checker = TypeChecker::new(context);

    for decl in &program.decls {
        if let Decl::Fn(decl) = decl {
            checker.check_fn_decl(decl)?;
        }
    }

    debug!(
        errors = checker.context.diagnostics.error_count() - errors_before,
        "type checking finished"
    );
    Ok(())
}

impl<'a> TypeChecker<'a> {
    pub fn new(context: &'a mut Context) -> Self {
        TypeChecker {
            context,
            return_type: None,
        }
    }

    fn error(&mut self, error: ErrorImpl, position: Position) {
        self.context.diagnostics.fatal(error, position);
    }

    pub fn check_fn_decl(&mut self, decl: &FnDecl) -> Result<(), InternalError> {
        self.return_type = Some(decl.return_type.to_type());
        let result = self.check_block(&decl.body);
        self.return_type = None;
        result
    }

    fn check_block(&mut self, block: &Block) -> Result<(), InternalError> {
        for stmt in &block.stmts {
            self.check_stmt(stmt)?;
        }
        Ok(())
    }

    pub fn check_stmt(&mut self, stmt: &Stmt) -> Result<(), InternalError> {
        match stmt {
            Stmt::Assign(assign) => {
                self.check_assign(assign)?;
            }
            Stmt::PostInc(loc) | Stmt::PostDec(loc) => {
                let ty = self.check_expr(loc)?;
                if !ty.is_error() && !ty.is_int() {
                    self.error(ErrorImpl::ArithmeticNonNumeric, loc.position());
                }
            }
            Stmt::Read(loc) => {
                let ty = self.check_expr(loc)?;
                self.check_io_operand(&ty, IoKind::Read, loc.position());
            }
            Stmt::Write(expr) => {
                let ty = self.check_expr(expr)?;
                self.check_io_operand(&ty, IoKind::Write, expr.position());
            }
            Stmt::If { cond, then_block } => {
                self.check_condition(cond, ErrorImpl::NonBoolIfCondition)?;
                self.check_block(then_block)?;
            }
            Stmt::IfElse {
                cond,
                then_block,
                else_block,
            } => {
                self.check_condition(cond, ErrorImpl::NonBoolIfCondition)?;
                self.check_block(then_block)?;
                self.check_block(else_block)?;
            }
            Stmt::While { cond, body } => {
                self.check_condition(cond, ErrorImpl::NonBoolWhileCondition)?;
                self.check_block(body)?;
            }
            Stmt::Call(call) => {
                self.check_call(call)?;
            }
            Stmt::Return { value, position } => self.check_return(value.as_ref(), *position)?,
        }
        Ok(())
    }

    fn check_condition(&mut self, cond: &Expr, error: ErrorImpl) -> Result<(), InternalError> {
        let ty = self.check_expr(cond)?;
        if !ty.is_error() && !ty.is_bool() {
            self.error(error, cond.position());
        }
        Ok(())
    }

    /// Functions, struct names and struct variables can be neither read
    /// nor written, and a void value cannot be written.
    fn check_io_operand(&mut self, ty: &Type, kind: IoKind, position: Position) {
        let error = match (ty, kind) {
            (Type::Function(..), IoKind::Read) => ErrorImpl::ReadFunction,
            (Type::Function(..), IoKind::Write) => ErrorImpl::WriteFunction,
            (Type::StructDef(_), IoKind::Read) => ErrorImpl::ReadStructName,
            (Type::StructDef(_), IoKind::Write) => ErrorImpl::WriteStructName,
            (Type::Struct(_), IoKind::Read) => ErrorImpl::ReadStructVariable,
            (Type::Struct(_), IoKind::Write) => ErrorImpl::WriteStructVariable,
            (Type::Void, IoKind::Write) => ErrorImpl::WriteVoid,
            _ => return,
        };
        self.error(error, position);
    }

    fn check_return(&mut self, value: Option<&Expr>, position: Position) -> Result<(), InternalError> {
        let return_type = self
            .return_type
            .clone()
            .ok_or(InternalError::ReturnOutsideFunction { position })?;

        match value {
            Some(value) => {
                let ty = self.check_expr(value)?;
                if return_type.is_void() {
                    self.error(ErrorImpl::ReturnValueInVoid, value.position());
                } else if !ty.compatible(&return_type) {
                    self.error(
                        ErrorImpl::BadReturnValue {
                            expected: return_type.to_string(),
                            received: ty.to_string(),
                        },
                        value.position(),
                    );
                }
            }
            // Reported without a source location
            None if !return_type.is_void() => {
                self.error(ErrorImpl::MissingReturnValue, Position::null());
            }
            None => {}
        }
        Ok(())
    }

    /// Computes the type of an expression, reporting what is wrong with it.
    ///
    /// An expression whose type cannot be determined has type `Error`, and
    /// no enclosing expression reports anything further about it.
    pub fn check_expr(&mut self, expr: &Expr) -> Result<Type, InternalError> {
        let ty = match expr {
            Expr::IntLit { .. } => Type::Int,
            Expr::StrLit { .. } => Type::String,
            Expr::True(_) | Expr::False(_) => Type::Bool,
            Expr::Id(id) => self.context.symbols.type_of(id.symbol()?),
            Expr::DotAccess(dot) => self.context.symbols.type_of(dot.field.symbol()?),
            Expr::Assign(assign) => self.check_assign(assign)?,
            Expr::Call(call) => self.check_call(call)?,
            Expr::Unary { op, operand } => self.check_unary(*op, operand)?,
            Expr::Binary { op, left, right } => self.check_binary(*op, left, right)?,
        };
        Ok(ty)
    }

    fn check_unary(&mut self, op: UnaryOp, operand: &Expr) -> Result<Type, InternalError> {
        let ty = self.check_expr(operand)?;
        if ty.is_error() {
            return Ok(Type::Error);
        }

        let (expected, error) = match op {
            UnaryOp::Negate => (Type::Int, ErrorImpl::ArithmeticNonNumeric),
            UnaryOp::Not => (Type::Bool, ErrorImpl::LogicalNonBool),
        };
        if ty != expected {
            self.error(error, operand.position());
            return Ok(Type::Error);
        }
        Ok(expected)
    }

    /// Checks each operand of an arithmetic, logical or relational operator
    /// separately, so both sides may be reported.
    fn check_operands(
        &mut self,
        left: (&Expr, Type),
        right: (&Expr, Type),
        expected: Type,
        error: ErrorImpl,
    ) -> bool {
        let mut ok = true;
        for (expr, ty) in [left, right] {
            if ty.is_error() {
                ok = false;
            } else if ty != expected {
                self.error(error.clone(), expr.position());
                ok = false;
            }
        }
        ok
    }

    fn check_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Type, InternalError> {
        let left_ty = self.check_expr(left)?;
        let right_ty = self.check_expr(right)?;

        if op.is_equality() {
            return Ok(self.check_equality(left, left_ty, right_ty));
        }

        let (operand, result, error) = if op.is_arithmetic() {
            (Type::Int, Type::Int, ErrorImpl::ArithmeticNonNumeric)
        } else if op.is_logical() {
            (Type::Bool, Type::Bool, ErrorImpl::LogicalNonBool)
        } else {
            (Type::Int, Type::Bool, ErrorImpl::RelationalNonNumeric)
        };

        if self.check_operands((left, left_ty), (right, right_ty), operand, error) {
            Ok(result)
        } else {
            Ok(Type::Error)
        }
    }

    /// `==` and `!=` accept any two operands of the same type except
    /// functions, struct names, struct variables and void call results.
    fn check_equality(&mut self, left: &Expr, left_ty: Type, right_ty: Type) -> Type {
        if left_ty.is_error() || right_ty.is_error() {
            return Type::Error;
        }

        let error = if left_ty.is_void() && right_ty.is_void() {
            ErrorImpl::EqualityVoidFunctions
        } else if left_ty.is_function() && right_ty.is_function() {
            ErrorImpl::EqualityFunctions
        } else if left_ty.is_struct_def() && right_ty.is_struct_def() {
            ErrorImpl::EqualityStructNames
        } else if left_ty.is_struct() && right_ty.is_struct() {
            ErrorImpl::EqualityStructVariables
        } else if left_ty != right_ty {
            ErrorImpl::TypeMismatch {
                expected: left_ty.to_string(),
                received: right_ty.to_string(),
            }
        } else {
            return Type::Bool;
        };

        self.error(error, left.position());
        Type::Error
    }

    /// The type of an assignment is the type of its left side.
    ///
    /// A plain mismatch keeps that type so later uses are not reported
    /// again; assigning functions or structs wholesale yields `Error`.
    pub fn check_assign(&mut self, assign: &Assign) -> Result<Type, InternalError> {
        let lhs = self.check_expr(&assign.lhs)?;
        let rhs = self.check_expr(&assign.rhs)?;
        let position = assign.lhs.position();

        if lhs.is_error() || rhs.is_error() {
            return Ok(Type::Error);
        }

        let forbidden = if lhs.is_function() && rhs.is_function() {
            Some(ErrorImpl::FunctionAssignment)
        } else if lhs.is_struct_def() && rhs.is_struct_def() {
            Some(ErrorImpl::StructNameAssignment)
        } else if lhs.is_struct() && rhs.is_struct() {
            Some(ErrorImpl::StructVariableAssignment)
        } else {
            None
        };

        if let Some(error) = forbidden {
            self.error(error, position);
            return Ok(Type::Error);
        }

        if lhs != rhs {
            self.error(
                ErrorImpl::TypeMismatch {
                    expected: lhs.to_string(),
                    received: rhs.to_string(),
                },
                position,
            );
        }
        Ok(lhs)
    }

    /// The type of a call is the callee's return type, whatever is wrong
    /// with the arguments.
    pub fn check_call(&mut self, call: &Call) -> Result<Type, InternalError> {
        let callee = self.context.symbols.type_of(call.callee.symbol()?);
        let Type::Function(formals, return_type) = callee else {
            self.error(ErrorImpl::CallNonFunction, call.callee.position);
            for arg in &call.args {
                self.check_expr(arg)?;
            }
            return Ok(Type::Error);
        };

        let mut actuals = Vec::with_capacity(call.args.len());
        for arg in &call.args {
            actuals.push(self.check_expr(arg)?);
        }

        if actuals.len() != formals.len() {
            self.error(
                ErrorImpl::WrongArgumentCount {
                    expected: formals.len(),
                    received: actuals.len(),
                },
                call.callee.position,
            );
            return Ok(*return_type);
        }

        for ((arg, actual), formal) in call.args.iter().zip(&actuals).zip(&formals) {
            if !actual.compatible(formal) {
                self.error(
                    ErrorImpl::ArgumentTypeMismatch {
                        expected: formal.to_string(),
                        received: actual.to_string(),
                    },
                    arg.position(),
                );
            }
        }

        Ok(*return_type)
    }
}
