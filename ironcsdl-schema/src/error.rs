//! Error types for document loading and type model resolution.

use thiserror::Error;

/// Error type for document parsing operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// XML parsing error.
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Malformed attribute syntax.
    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    /// Missing required attribute.
    #[error("missing required attribute '{attribute}' on element '{element}'")]
    MissingAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
    },

    /// Invalid attribute value.
    #[error("invalid value '{value}' for attribute '{attribute}' on element '{element}'")]
    InvalidAttribute {
        /// Element name.
        element: String,
        /// Attribute name.
        attribute: String,
        /// Invalid value.
        value: String,
    },

    /// Invalid document structure.
    #[error("invalid document structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Document archive error.
    #[error("ZIP archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Error inside a named document.
    #[error("in document '{document}': {source}")]
    Document {
        /// Document name (file stem).
        document: String,
        /// Underlying error.
        #[source]
        source: Box<ParseError>,
    },
}

/// Error type for type model resolution.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Circular base type chain.
    #[error("circular base type chain detected: {path}")]
    CircularReference {
        /// Chain of qualified names, ending with the repeated one.
        path: String,
    },
}

impl ParseError {
    /// Creates a missing attribute error.
    pub fn missing_attr(element: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute: attribute.into(),
        }
    }

    /// Creates an invalid attribute error.
    pub fn invalid_attr(
        element: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::InvalidAttribute {
            element: element.into(),
            attribute: attribute.into(),
            value: value.into(),
        }
    }

    /// Creates an invalid structure error.
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }

    /// Wraps this error with the name of the document it occurred in.
    #[must_use]
    pub fn in_document(self, document: impl Into<String>) -> Self {
        Self::Document {
            document: document.into(),
            source: Box::new(self),
        }
    }
}

impl SchemaError {
    /// Creates a circular reference error from the visited chain.
    pub fn circular(chain: &[String], repeated: &str) -> Self {
        let mut path = chain.join(" -> ");
        if !path.is_empty() {
            path.push_str(" -> ");
        }
        path.push_str(repeated);
        Self::CircularReference { path }
    }
}
