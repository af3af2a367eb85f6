//! The closed set of types computed by the semantic passes.

use std::fmt::Display;

/// A type value.
///
/// `Error` never appears as a declared type. It is the result of an
/// ill-typed expression and is compatible with every other type, which
/// stops one root cause from producing a chain of diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Bool,
    Void,
    String,
    /// A variable of the named struct type.
    Struct(String),
    /// The name of a struct definition used as an expression.
    StructDef(String),
    Function(Vec<Type>, Box<Type>),
    Error,
}

impl Type {
    pub fn is_int(&self) -> bool {
        matches!(self, Type::Int)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Type::Bool)
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Void)
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Type::Struct(_))
    }

    pub fn is_struct_def(&self) -> bool {
        matches!(self, Type::StructDef(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self, Type::Function(..))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    /// Structural equality, except that `Error` matches anything.
    pub fn compatible(&self, other: &Type) -> bool {
        self.is_error() || other.is_error() || self == other
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::Bool => write!(f, "bool"),
            Type::Void => write!(f, "void"),
            Type::String => write!(f, "String"),
            Type::Struct(name) => write!(f, "{}", name),
            Type::StructDef(_) => write!(f, "struct"),
            Type::Function(formals, return_type) => {
                let formals = formals
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "{}->{}", formals, return_type)
            }
            Type::Error => write!(f, "error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Type;

    #[test]
    fn test_error_is_compatible_with_everything() {
        for ty in [
            Type::Int,
            Type::Bool,
            Type::Void,
            Type::String,
            Type::Struct("Point".to_string()),
            Type::Function(vec![], Box::new(Type::Void)),
        ] {
            assert!(Type::Error.compatible(&ty));
            assert!(ty.compatible(&Type::Error));
        }
    }

    #[test]
    fn test_declared_types_compare_structurally() {
        assert!(Type::Int.compatible(&Type::Int));
        assert!(!Type::Int.compatible(&Type::Bool));
        assert!(Type::Struct("A".to_string()).compatible(&Type::Struct("A".to_string())));
        assert!(!Type::Struct("A".to_string()).compatible(&Type::Struct("B".to_string())));
    }

    #[test]
    fn test_display() {
        let function = Type::Function(vec![Type::Int, Type::Bool], Box::new(Type::Void));
        assert_eq!(function.to_string(), "int,bool->void");
        assert_eq!(
            Type::Function(vec![], Box::new(Type::Int)).to_string(),
            "->int"
        );
        assert_eq!(Type::StructDef("Point".to_string()).to_string(), "struct");
        assert_eq!(Type::Struct("Point".to_string()).to_string(), "Point");
    }
}
