/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Program, declarations, blocks and identifiers
/// - expressions: Expression nodes and operators
/// - statements: Statement nodes
/// - types: Type annotations as written in the source
/// - unparse: Pretty-printing of a (possibly annotated) program
pub mod ast;
pub mod expressions;
pub mod statements;
pub mod types;
pub mod unparse;
