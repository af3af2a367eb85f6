use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "***ERROR***"),
            Severity::Warning => write!(f, "***WARNING***"),
        }
    }
}

/// A diagnostic about the user's program.
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
    severity: Severity,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
            severity: Severity::Error,
        }
    }

    pub fn warning(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
            severity: Severity::Warning,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn get_severity(&self) -> Severity {
        self.severity
    }

    pub fn get_internal_error(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::IllegalCharacter { .. } => "IllegalCharacter",
            ErrorImpl::UnterminatedString => "UnterminatedString",
            ErrorImpl::BadEscapedString => "BadEscapedString",
            ErrorImpl::UnterminatedBadEscapedString => "UnterminatedBadEscapedString",
            ErrorImpl::IntegerTooLarge { .. } => "IntegerTooLarge",
            ErrorImpl::UnexpectedToken { .. } => "UnexpectedToken",
            ErrorImpl::UnexpectedTokenDetailed { .. } => "UnexpectedTokenDetailed",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::MultiplyDeclared { .. } => "MultiplyDeclared",
            ErrorImpl::Undeclared { .. } => "Undeclared",
            ErrorImpl::NonFunctionVoid { .. } => "NonFunctionVoid",
            ErrorImpl::InvalidStructType { .. } => "InvalidStructType",
            ErrorImpl::DotAccessNonStruct => "DotAccessNonStruct",
            ErrorImpl::InvalidStructField { .. } => "InvalidStructField",
            ErrorImpl::NoMain => "NoMain",
            ErrorImpl::ArithmeticNonNumeric => "ArithmeticNonNumeric",
            ErrorImpl::LogicalNonBool => "LogicalNonBool",
            ErrorImpl::RelationalNonNumeric => "RelationalNonNumeric",
            ErrorImpl::EqualityVoidFunctions => "EqualityVoidFunctions",
            ErrorImpl::EqualityFunctions => "EqualityFunctions",
            ErrorImpl::EqualityStructNames => "EqualityStructNames",
            ErrorImpl::EqualityStructVariables => "EqualityStructVariables",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::FunctionAssignment => "FunctionAssignment",
            ErrorImpl::StructNameAssignment => "StructNameAssignment",
            ErrorImpl::StructVariableAssignment => "StructVariableAssignment",
            ErrorImpl::CallNonFunction => "CallNonFunction",
            ErrorImpl::WrongArgumentCount { .. } => "WrongArgumentCount",
            ErrorImpl::ArgumentTypeMismatch { .. } => "ArgumentTypeMismatch",
            ErrorImpl::ReadFunction => "ReadFunction",
            ErrorImpl::ReadStructName => "ReadStructName",
            ErrorImpl::ReadStructVariable => "ReadStructVariable",
            ErrorImpl::WriteFunction => "WriteFunction",
            ErrorImpl::WriteStructName => "WriteStructName",
            ErrorImpl::WriteStructVariable => "WriteStructVariable",
            ErrorImpl::WriteVoid => "WriteVoid",
            ErrorImpl::NonBoolIfCondition => "NonBoolIfCondition",
            ErrorImpl::NonBoolWhileCondition => "NonBoolWhileCondition",
            ErrorImpl::ReturnValueInVoid => "ReturnValueInVoid",
            ErrorImpl::BadReturnValue { .. } => "BadReturnValue",
            ErrorImpl::MissingReturnValue => "MissingReturnValue",
        }
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::IllegalCharacter { .. }
            | ErrorImpl::UnterminatedString
            | ErrorImpl::UnterminatedBadEscapedString => ErrorTip::None,
            ErrorImpl::BadEscapedString => ErrorTip::Suggestion(String::from(
                "valid escapes are \\n, \\t, \\', \\\" and \\\\",
            )),
            ErrorImpl::IntegerTooLarge { literal } => ErrorTip::Suggestion(format!(
                "`{}` does not fit in a 32-bit integer",
                literal
            )),
            ErrorImpl::UnexpectedToken { .. } => ErrorTip::None,
            ErrorImpl::UnexpectedTokenDetailed { message, .. } => {
                ErrorTip::Suggestion(message.clone())
            }
            ErrorImpl::NumberParseError { token } => {
                ErrorTip::Suggestion(format!("Invalid number: `{}`", token))
            }
            ErrorImpl::MultiplyDeclared { name } => ErrorTip::Suggestion(format!(
                "`{}` is already declared in this scope",
                name
            )),
            ErrorImpl::Undeclared { name } => ErrorTip::Suggestion(format!(
                "identifier `{}` is not declared in any enclosing scope",
                name
            )),
            ErrorImpl::NonFunctionVoid { name } => ErrorTip::Suggestion(format!(
                "only functions may be declared void, `{}` is not a function",
                name
            )),
            ErrorImpl::InvalidStructType { name } => {
                ErrorTip::Suggestion(format!("`{}` does not name a struct", name))
            }
            ErrorImpl::DotAccessNonStruct => ErrorTip::None,
            ErrorImpl::InvalidStructField { name } => {
                ErrorTip::Suggestion(format!("the struct has no field named `{}`", name))
            }
            ErrorImpl::NoMain => ErrorTip::Suggestion(String::from(
                "declare a function `main` that takes no parameters",
            )),
            ErrorImpl::TypeMismatch { expected, received } => ErrorTip::Suggestion(format!(
                "Expected type `{}`, received `{}`",
                expected, received
            )),
            ErrorImpl::WrongArgumentCount { expected, received } => ErrorTip::Suggestion(
                format!("Expected {} arguments, received {}", expected, received),
            ),
            ErrorImpl::ArgumentTypeMismatch { expected, received } => {
                ErrorTip::Suggestion(format!(
                    "Expected argument type `{}`, received `{}`",
                    expected, received
                ))
            }
            ErrorImpl::BadReturnValue { expected, received } => ErrorTip::Suggestion(format!(
                "Expected return type `{}`, received `{}`",
                expected, received
            )),
            _ => ErrorTip::None,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.position, self.severity, self.internal_error
        )
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ErrorImpl {
    // Lexical
    #[error("Illegal character ignored: {character}")]
    IllegalCharacter { character: char },
    #[error("Unterminated string literal ignored")]
    UnterminatedString,
    #[error("String literal with bad escaped character ignored")]
    BadEscapedString,
    #[error("Unterminated string literal with bad escaped character ignored")]
    UnterminatedBadEscapedString,
    #[error("Integer literal too large; using max value")]
    IntegerTooLarge { literal: String },

    // Syntax
    #[error("syntax error: unexpected token `{token}`")]
    UnexpectedToken { token: String },
    #[error("syntax error: unexpected token `{token}`, {message}")]
    UnexpectedTokenDetailed { token: String, message: String },
    #[error("syntax error: invalid integer literal `{token}`")]
    NumberParseError { token: String },

    // Name analysis
    #[error("Multiply declared identifier")]
    MultiplyDeclared { name: String },
    #[error("Undeclared identifier")]
    Undeclared { name: String },
    #[error("Non-function declared void")]
    NonFunctionVoid { name: String },
    #[error("Invalid name of struct type")]
    InvalidStructType { name: String },
    #[error("Dot-access of non-struct type")]
    DotAccessNonStruct,
    #[error("Invalid struct field name")]
    InvalidStructField { name: String },
    #[error("No main function")]
    NoMain,

    // Type checking
    #[error("Arithmetic operator applied to non-numeric operand")]
    ArithmeticNonNumeric,
    #[error("Logical operator applied to non-bool operand")]
    LogicalNonBool,
    #[error("Relational operator applied to non-numeric operand")]
    RelationalNonNumeric,
    #[error("Equality operator applied to void functions")]
    EqualityVoidFunctions,
    #[error("Equality operator applied to functions")]
    EqualityFunctions,
    #[error("Equality operator applied to struct names")]
    EqualityStructNames,
    #[error("Equality operator applied to struct variables")]
    EqualityStructVariables,
    #[error("Type mismatch")]
    TypeMismatch { expected: String, received: String },
    #[error("Function assignment")]
    FunctionAssignment,
    #[error("Struct name assignment")]
    StructNameAssignment,
    #[error("Struct variable assignment")]
    StructVariableAssignment,
    #[error("Attempt to call a non-function")]
    CallNonFunction,
    #[error("Function call with wrong number of args")]
    WrongArgumentCount { expected: usize, received: usize },
    #[error("Type of actual does not match type of formal")]
    ArgumentTypeMismatch { expected: String, received: String },
    #[error("Attempt to read a function")]
    ReadFunction,
    #[error("Attempt to read a struct name")]
    ReadStructName,
    #[error("Attempt to read a struct variable")]
    ReadStructVariable,
    #[error("Attempt to write a function")]
    WriteFunction,
    #[error("Attempt to write a struct name")]
    WriteStructName,
    #[error("Attempt to write a struct variable")]
    WriteStructVariable,
    #[error("Attempt to write void")]
    WriteVoid,
    #[error("Non-bool expression used as an if condition")]
    NonBoolIfCondition,
    #[error("Non-bool expression used as a while condition")]
    NonBoolWhileCondition,
    #[error("Return with a value in a void function")]
    ReturnValueInVoid,
    #[error("Bad return value")]
    BadReturnValue { expected: String, received: String },
    #[error("Missing return value")]
    MissingReturnValue,
}

/// Failures of the symbol table's own operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SymbolTableError {
    #[error("symbol name must not be empty")]
    NullArgument,
    #[error("scope stack is empty")]
    EmptyScopeStack,
    #[error("name {name:?} is already declared in the innermost scope")]
    DuplicateName { name: String },
}

/// A broken invariant inside the compiler itself.
///
/// These abort the compilation instead of being reported as diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    #[error("symbol table invariant violated: {0}")]
    SymbolTable(#[from] SymbolTableError),
    #[error("identifier {name:?} at {position} was never linked to a symbol")]
    UnlinkedIdentifier { name: String, position: Position },
    #[error("symbol {name:?} is not a {expected}")]
    UnexpectedSymbolKind { name: String, expected: &'static str },
    #[error("expression at {position} is not a location")]
    NotALocation { position: Position },
    #[error("return statement at {position} outside of a function")]
    ReturnOutsideFunction { position: Position },
}
