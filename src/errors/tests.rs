//! Unit tests for error handling.
//!
//! This module contains tests for error types and error reporting.

use crate::errors::diagnostics::Diagnostics;
use crate::errors::errors::{Error, ErrorImpl, ErrorTip, InternalError, Severity, SymbolTableError};
use crate::Position;

#[test]
fn test_error_creation() {
    let error = Error::new(
        ErrorImpl::IllegalCharacter { character: '@' },
        Position(1, 10),
    );

    assert_eq!(error.get_error_name(), "IllegalCharacter");
    assert_eq!(error.get_severity(), Severity::Error);
}

#[test]
fn test_error_position() {
    let error = Error::new(
        ErrorImpl::Undeclared {
            name: "x".to_string(),
        },
        Position(4, 2),
    );

    assert_eq!(error.get_position().line(), 4);
    assert_eq!(error.get_position().column(), 2);
}

#[test]
fn test_error_display_format() {
    let error = Error::new(
        ErrorImpl::MultiplyDeclared {
            name: "x".to_string(),
        },
        Position(2, 5),
    );

    assert_eq!(error.to_string(), "2:5 ***ERROR*** Multiply declared identifier");
}

#[test]
fn test_warning_display_format() {
    let error = Error::warning(
        ErrorImpl::IntegerTooLarge {
            literal: "99999999999".to_string(),
        },
        Position(7, 13),
    );

    assert!(!error.is_fatal());
    assert_eq!(
        error.to_string(),
        "7:13 ***WARNING*** Integer literal too large; using max value"
    );
}

#[test]
fn test_no_main_at_null_position() {
    let error = Error::new(ErrorImpl::NoMain, Position::null());
    assert_eq!(error.to_string(), "0:0 ***ERROR*** No main function");
}

#[test]
fn test_type_mismatch_message_hides_types() {
    let error = Error::new(
        ErrorImpl::TypeMismatch {
            expected: "bool".to_string(),
            received: "int".to_string(),
        },
        Position(3, 1),
    );

    assert_eq!(error.get_error_name(), "TypeMismatch");
    assert_eq!(error.to_string(), "3:1 ***ERROR*** Type mismatch");
    assert_eq!(error.get_tip().to_string(), "Expected type `bool`, received `int`");
}

#[test]
fn test_error_tip_none() {
    let error = Error::new(ErrorImpl::DotAccessNonStruct, Position(1, 1));
    assert!(matches!(error.get_tip(), ErrorTip::None));
}

#[test]
fn test_error_tip_suggestion() {
    let error = Error::new(
        ErrorImpl::WrongArgumentCount {
            expected: 2,
            received: 3,
        },
        Position(1, 1),
    );

    match error.get_tip() {
        ErrorTip::Suggestion(tip) => assert_eq!(tip, "Expected 2 arguments, received 3"),
        _ => panic!("Expected suggestion tip"),
    }
}

#[test]
fn test_error_tip_display() {
    let tip = ErrorTip::Suggestion("Try this instead".to_string());
    assert_eq!(tip.to_string(), "Try this instead");

    let tip = ErrorTip::None;
    assert_eq!(tip.to_string(), "");
}

#[test]
fn test_diagnostics_counts() {
    let mut diagnostics = Diagnostics::new();
    assert!(!diagnostics.has_errors());

    diagnostics.warn(
        ErrorImpl::IntegerTooLarge {
            literal: "4294967296".to_string(),
        },
        Position(1, 9),
    );
    assert!(!diagnostics.has_errors());
    assert_eq!(diagnostics.warning_count(), 1);

    diagnostics.fatal(ErrorImpl::NoMain, Position::null());
    assert!(diagnostics.has_errors());
    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(diagnostics.len(), 2);
}

#[test]
fn test_diagnostics_display_keeps_report_order() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.fatal(
        ErrorImpl::Undeclared {
            name: "b".to_string(),
        },
        Position(5, 3),
    );
    diagnostics.fatal(
        ErrorImpl::Undeclared {
            name: "a".to_string(),
        },
        Position(2, 3),
    );

    assert_eq!(
        diagnostics.to_string(),
        "5:3 ***ERROR*** Undeclared identifier\n2:3 ***ERROR*** Undeclared identifier\n"
    );
}

#[test]
fn test_internal_error_from_symbol_table_error() {
    let error: InternalError = SymbolTableError::EmptyScopeStack.into();
    assert_eq!(
        error.to_string(),
        "symbol table invariant violated: scope stack is empty"
    );
}
