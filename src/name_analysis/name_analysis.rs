use tracing::{debug, trace};

use crate::{
    ast::{
        ast::{Block, Decl, FnDecl, Id, Program, StructDecl, VarDecl},
        expressions::{DotAccess, Expr},
        statements::Stmt,
        types::TypeNode,
    },
    context::Context,
    errors::errors::{ErrorImpl, InternalError},
    symbols::{
        symbol_table::SymbolTable,
        symbols::{Storage, StructDef, StructId, Symbol, SymbolId, SymbolKind, WORD_SIZE},
    },
    Position,
};

/// Where the next variable declaration gets its storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Allocation {
    Global,
    /// Frame offsets, growing downward from `next`.
    Frame { next: i32 },
    /// Field offsets, growing upward from `next`.
    Struct { next: i32 },
}

impl Allocation {
    fn allocate(&mut self, size: i32) -> Storage {
        match self {
            Allocation::Global => Storage::Global,
            Allocation::Frame { next } => {
                // The base of a multi-word variable is its lowest address
                let base = *next - size + WORD_SIZE;
                *next -= size;
                Storage::Local(base)
            }
            Allocation::Struct { next } => {
                let offset = *next;
                *next += size;
                Storage::Field(offset)
            }
        }
    }
}

/// What a location expression turned out to denote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocResolution {
    Struct(StructId),
    NonStruct,
    /// Already reported.
    Failed,
}

/// Offset of the first local in a frame with `formals` parameters.
///
/// The return address and the saved frame pointer sit between the
/// parameters and the locals.
pub fn first_local_offset(formals: usize) -> i32 {
    -WORD_SIZE * formals as i32 - 2 * WORD_SIZE
}

struct NameAnalyzer<'a> {
    table: &'a mut SymbolTable,
    context: &'a mut Context,
}

/// Resolves every name in `program`.
///
/// `table` must hold the (empty) global scope; symbols are allocated in the
/// context's arena and linked onto the AST. Returns `Err` only when the
/// symbol table's own invariants break.
pub fn analyze_names(
    program: &mut Program,
    table: &mut SymbolTable,
    context: &mut Context,
) -> Result<(), InternalError> {
    let errors_before = context.diagnostics.error_count();
    let mut analyzer = NameAnalyzer { table, context };

    for decl in &mut program.decls {
        analyzer.analyze_decl(decl)?;
    }
    analyzer.check_main();

    debug!(
        symbols = analyzer.context.symbols.len(),
        errors = analyzer.context.diagnostics.error_count() - errors_before,
        "name analysis finished"
    );
    Ok(())
}

impl<'a> NameAnalyzer<'a> {
    fn error(&mut self, error: ErrorImpl, position: Position) {
        self.context.diagnostics.fatal(error, position);
    }

    fn analyze_decl(&mut self, decl: &mut Decl) -> Result<(), InternalError> {
        match decl {
            Decl::Var(decl) => self.declare_variable(decl, &mut Allocation::Global, None),
            Decl::Fn(decl) => self.analyze_fn_decl(decl),
            Decl::Struct(decl) => self.analyze_struct_decl(decl),
        }
    }

    /// Looks up the struct named by a type annotation in the enclosing scopes.
    fn resolve_struct_type(&mut self, name: &mut Id) -> Option<StructId> {
        let def = self
            .table
            .lookup_global(&name.name)
            .and_then(|symbol| match self.context.symbols.get(symbol).kind {
                SymbolKind::StructDef(def) => Some((symbol, def)),
                _ => None,
            });

        match def {
            Some((symbol, def)) => {
                name.link(symbol);
                Some(def)
            }
            None => {
                self.error(
                    ErrorImpl::InvalidStructType {
                        name: name.name.clone(),
                    },
                    name.position,
                );
                None
            }
        }
    }

    /// Declares a variable in the current scope, or in `fields` when one is
    /// given.
    ///
    /// Struct types are always looked up in the enclosing scopes, so a
    /// struct's fields can use any struct declared before it.
    fn declare_variable(
        &mut self,
        decl: &mut VarDecl,
        allocation: &mut Allocation,
        fields: Option<&mut SymbolTable>,
    ) -> Result<(), InternalError> {
        let mut bad_decl = false;

        if decl.ty.is_void() {
            self.error(
                ErrorImpl::NonFunctionVoid {
                    name: decl.id.name.clone(),
                },
                decl.id.position,
            );
            bad_decl = true;
        }

        let mut struct_def = None;
        if let TypeNode::Struct(name) = &mut decl.ty {
            struct_def = self.resolve_struct_type(name);
            bad_decl |= struct_def.is_none();
        }

        let duplicate = match &fields {
            Some(fields) => fields.lookup_local(&decl.id.name),
            None => self.table.lookup_local(&decl.id.name),
        };
        if duplicate.is_some() {
            self.error(
                ErrorImpl::MultiplyDeclared {
                    name: decl.id.name.clone(),
                },
                decl.id.position,
            );
            bad_decl = true;
        }

        if bad_decl {
            return Ok(());
        }

        let size = match struct_def {
            Some(def) => self.context.symbols.get_struct(def).size,
            None => WORD_SIZE,
        };
        let storage = allocation.allocate(size);
        let symbol = self.context.symbols.alloc(Symbol::variable(
            &decl.id.name,
            decl.ty.to_type(),
            storage,
            struct_def,
        ));
        trace!(name = %decl.id.name, ?storage, "declared variable");

        match fields {
            Some(fields) => fields.add_declaration(&decl.id.name, symbol)?,
            None => self.table.add_declaration(&decl.id.name, symbol)?,
        }
        decl.id.link(symbol);

        Ok(())
    }

    fn analyze_fn_decl(&mut self, decl: &mut FnDecl) -> Result<(), InternalError> {
        let function = if self.table.lookup_local(&decl.id.name).is_some() {
            self.error(
                ErrorImpl::MultiplyDeclared {
                    name: decl.id.name.clone(),
                },
                decl.id.position,
            );
            None
        } else {
            let symbol = self
                .context
                .symbols
                .alloc(Symbol::function(&decl.id.name, decl.return_type.to_type()));
            self.table.add_declaration(&decl.id.name, symbol)?;
            decl.id.link(symbol);
            Some(symbol)
        };

        // Formals and top-level locals share this one scope
        self.table.enter_scope();

        let mut formal_types = Vec::with_capacity(decl.formals.len());
        for (index, formal) in decl.formals.iter_mut().enumerate() {
            formal_types.push(formal.ty.to_type());

            let mut bad_formal = false;
            if formal.ty.is_void() {
                self.error(
                    ErrorImpl::NonFunctionVoid {
                        name: formal.id.name.clone(),
                    },
                    formal.id.position,
                );
                bad_formal = true;
            }
            if self.table.lookup_local(&formal.id.name).is_some() {
                self.error(
                    ErrorImpl::MultiplyDeclared {
                        name: formal.id.name.clone(),
                    },
                    formal.id.position,
                );
                bad_formal = true;
            }
            if bad_formal {
                continue;
            }

            let storage = Storage::Local(-WORD_SIZE * index as i32);
            let symbol = self.context.symbols.alloc(Symbol::variable(
                &formal.id.name,
                formal.ty.to_type(),
                storage,
                None,
            ));
            self.table.add_declaration(&formal.id.name, symbol)?;
            formal.id.link(symbol);
        }

        if let Some(function) = function {
            if let SymbolKind::Function { formals, .. } = &mut self.context.symbols.get_mut(function).kind {
                *formals = formal_types;
            }
        }

        let start = first_local_offset(decl.formals.len());
        let mut allocation = Allocation::Frame { next: start };
        self.analyze_block_contents(&mut decl.body, &mut allocation)?;

        self.table.exit_scope()?;

        if let Allocation::Frame { next } = allocation {
            decl.frame_size = start - next;
        }
        trace!(name = %decl.id.name, frame_size = decl.frame_size, "analyzed function");

        Ok(())
    }

    fn analyze_struct_decl(&mut self, decl: &mut StructDecl) -> Result<(), InternalError> {
        let duplicate = self.table.lookup_local(&decl.id.name).is_some();
        if duplicate {
            self.error(
                ErrorImpl::MultiplyDeclared {
                    name: decl.id.name.clone(),
                },
                decl.id.position,
            );
        }

        let mut fields = SymbolTable::new();
        let mut allocation = Allocation::Struct { next: 0 };
        for field in &mut decl.fields {
            self.declare_variable(field, &mut allocation, Some(&mut fields))?;
        }

        if duplicate {
            return Ok(());
        }

        let size = match allocation {
            Allocation::Struct { next } => next,
            _ => 0,
        };
        let def = self.context.symbols.alloc_struct(StructDef {
            name: decl.id.name.clone(),
            fields,
            size,
        });
        let symbol = self
            .context
            .symbols
            .alloc(Symbol::struct_def(&decl.id.name, def));
        self.table.add_declaration(&decl.id.name, symbol)?;
        decl.id.link(symbol);
        trace!(name = %decl.id.name, size, "declared struct");

        Ok(())
    }

    /// Declarations and statements of a block, in the current scope.
    fn analyze_block_contents(&mut self, block: &mut Block, allocation: &mut Allocation) -> Result<(), InternalError> {
        for decl in &mut block.decls {
            self.declare_variable(decl, allocation, None)?;
        }
        for stmt in &mut block.stmts {
            self.analyze_stmt(stmt, allocation)?;
        }
        Ok(())
    }

    /// A nested block in its own scope. Its locals continue the enclosing
    /// function's frame.
    fn analyze_nested_block(&mut self, block: &mut Block, allocation: &mut Allocation) -> Result<(), InternalError> {
        self.table.enter_scope();
        self.analyze_block_contents(block, allocation)?;
        self.table.exit_scope()?;
        Ok(())
    }

    fn analyze_stmt(&mut self, stmt: &mut Stmt, allocation: &mut Allocation) -> Result<(), InternalError> {
        match stmt {
            Stmt::Assign(assign) => {
                self.analyze_expr(&mut assign.lhs)?;
                self.analyze_expr(&mut assign.rhs)
            }
            Stmt::PostInc(loc) | Stmt::PostDec(loc) | Stmt::Read(loc) => self.analyze_expr(loc),
            Stmt::Write(expr) => self.analyze_expr(expr),
            Stmt::If { cond, then_block } => {
                self.analyze_expr(cond)?;
                self.analyze_nested_block(then_block, allocation)
            }
            Stmt::IfElse {
                cond,
                then_block,
                else_block,
            } => {
                self.analyze_expr(cond)?;
                self.analyze_nested_block(then_block, allocation)?;
                self.analyze_nested_block(else_block, allocation)
            }
            Stmt::While { cond, body } => {
                self.analyze_expr(cond)?;
                self.analyze_nested_block(body, allocation)
            }
            Stmt::Call(call) => {
                self.resolve_id(&mut call.callee);
                for arg in &mut call.args {
                    self.analyze_expr(arg)?;
                }
                Ok(())
            }
            Stmt::Return { value, .. } => match value {
                Some(value) => self.analyze_expr(value),
                None => Ok(()),
            },
        }
    }

    fn analyze_expr(&mut self, expr: &mut Expr) -> Result<(), InternalError> {
        match expr {
            Expr::IntLit { .. } | Expr::StrLit { .. } | Expr::True(_) | Expr::False(_) => {}
            Expr::Id(id) => {
                self.resolve_id(id);
            }
            Expr::DotAccess(dot) => {
                self.resolve_dot_access(dot)?;
            }
            Expr::Assign(assign) => {
                self.analyze_expr(&mut assign.lhs)?;
                self.analyze_expr(&mut assign.rhs)?;
            }
            Expr::Call(call) => {
                self.resolve_id(&mut call.callee);
                for arg in &mut call.args {
                    self.analyze_expr(arg)?;
                }
            }
            Expr::Unary { operand, .. } => self.analyze_expr(operand)?,
            Expr::Binary { left, right, .. } => {
                self.analyze_expr(left)?;
                self.analyze_expr(right)?;
            }
        }
        Ok(())
    }

    /// Links a use of a name to its innermost declaration.
    fn resolve_id(&mut self, id: &mut Id) -> Option<SymbolId> {
        match self.table.lookup_global(&id.name) {
            Some(symbol) => {
                id.link(symbol);
                Some(symbol)
            }
            None => {
                self.error(ErrorImpl::Undeclared { name: id.name.clone() }, id.position);
                None
            }
        }
    }

    fn resolve_loc(&mut self, loc: &mut Expr) -> Result<LocResolution, InternalError> {
        match loc {
            Expr::Id(id) => Ok(match self.resolve_id(id) {
                Some(symbol) => match self.context.symbols.get(symbol).kind {
                    SymbolKind::Variable {
                        struct_def: Some(def),
                        ..
                    } => LocResolution::Struct(def),
                    _ => LocResolution::NonStruct,
                },
                None => LocResolution::Failed,
            }),
            Expr::DotAccess(dot) => self.resolve_dot_access(dot),
            other => Err(InternalError::NotALocation {
                position: other.position(),
            }),
        }
    }

    /// Resolves `loc.field` against the private fields of `loc`'s struct.
    ///
    /// The result describes the field itself, so that an enclosing access
    /// in a chain like `a.b.c` searches the right struct.
    fn resolve_dot_access(&mut self, dot: &mut DotAccess) -> Result<LocResolution, InternalError> {
        let def = match self.resolve_loc(&mut dot.loc)? {
            LocResolution::Struct(def) => def,
            LocResolution::NonStruct => {
                self.error(ErrorImpl::DotAccessNonStruct, dot.loc.position());
                return Ok(LocResolution::Failed);
            }
            LocResolution::Failed => return Ok(LocResolution::Failed),
        };

        let Some(field) = self
            .context
            .symbols
            .get_struct(def)
            .fields
            .lookup_local(&dot.field.name)
        else {
            self.error(
                ErrorImpl::InvalidStructField {
                    name: dot.field.name.clone(),
                },
                dot.field.position,
            );
            return Ok(LocResolution::Failed);
        };

        dot.field.link(field);
        dot.struct_def = Some(def);

        Ok(match self.context.symbols.get(field).kind {
            SymbolKind::Variable {
                struct_def: Some(inner),
                ..
            } => LocResolution::Struct(inner),
            _ => LocResolution::NonStruct,
        })
    }

    fn check_main(&mut self) {
        let has_main = self
            .table
            .lookup_global("main")
            .map(|symbol| {
                matches!(
                    &self.context.symbols.get(symbol).kind,
                    SymbolKind::Function { formals, .. } if formals.is_empty()
                )
            })
            .unwrap_or(false);

        if !has_main {
            self.error(ErrorImpl::NoMain, Position::null());
        }
    }
}
