//! Error types for code generation.

use thiserror::Error;

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Document parsing error.
    #[error("schema parse error: {0}")]
    Parse(#[from] ironcsdl_schema::ParseError),

    /// Type model resolution error.
    #[error("schema error: {0}")]
    Schema(#[from] ironcsdl_schema::SchemaError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Type that is neither a struct, an enumeration nor a known empty shape.
    #[error("unrecognized shape for type '{name}'")]
    UnrecognizedShape {
        /// Qualified type name.
        name: String,
    },

    /// Code generation error.
    #[error("generation error: {message}")]
    Generation {
        /// Error message.
        message: String,
    },
}

impl CodegenError {
    /// Creates a generation error with the given message.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    /// Creates an unrecognized shape error for a type.
    pub fn unrecognized(name: impl Into<String>) -> Self {
        Self::UnrecognizedShape { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_message() {
        let err = CodegenError::unrecognized("Widget.Widget");
        assert_eq!(err.to_string(), "unrecognized shape for type 'Widget.Widget'");
    }

    #[test]
    fn test_from_schema_error() {
        let err: CodegenError = ironcsdl_schema::SchemaError::circular(&[], "A.B").into();
        assert!(matches!(err, CodegenError::Schema(_)));
    }
}
