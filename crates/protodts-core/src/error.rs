//! Error types for the protodts-core library.
//!
//! Generation failures abort the whole pass: no variant here is ever
//! turned into a partially filled response.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for protodts operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all protodts operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// A message declares a nested type that is not a synthetic map entry
    #[error("unsupported nested type '{nested}' in message '{message}': only map entries may be nested")]
    UnsupportedNestedType {
        /// Name of the enclosing message
        message: String,
        /// Name of the rejected nested type
        nested: String,
    },

    /// A map-entry type does not carry exactly a key and a value field
    #[error("map entry '{entry}' in message '{message}' has {field_count} fields, expected 2")]
    MalformedMapEntry {
        /// Name of the enclosing message
        message: String,
        /// Name of the map-entry type
        entry: String,
        /// Number of fields actually declared
        field_count: usize,
    },

    /// A field points at a oneof declaration that does not exist
    #[error("field '{field}' in message '{message}' references oneof #{index}, but only {declared} are declared")]
    InvalidOneofIndex {
        /// Name of the enclosing message
        message: String,
        /// Name of the offending field
        field: String,
        /// The referenced oneof index
        index: i32,
        /// Number of oneof declarations in the message
        declared: usize,
    },

    /// Malformed plugin parameter
    #[error("invalid plugin parameter '{parameter}': {details}")]
    InvalidParameter {
        /// The offending `key=value` pair
        parameter: String,
        /// Detailed description of the issue
        details: String,
    },

    /// Failed to decode a descriptor set or plugin request
    #[error("failed to decode descriptors: {0}")]
    DescriptorDecode(#[from] prost::DecodeError),

    /// Failed to read input file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create output directory
    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreate {
        /// Path to the directory that failed to create
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Path traversal attempt detected (security error)
    #[error("path traversal detected: '{path}' would escape output directory")]
    PathTraversal {
        /// The suspicious path
        path: PathBuf,
    },

    /// Formatting into the output buffer failed
    #[error("failed to render declaration: {0}")]
    Render(#[from] std::fmt::Error),
}

impl Error {
    /// Creates a new unsupported nested type error
    pub fn unsupported_nested_type(message: impl Into<String>, nested: impl Into<String>) -> Self {
        Self::UnsupportedNestedType {
            message: message.into(),
            nested: nested.into(),
        }
    }

    /// Creates a new malformed map entry error
    pub fn malformed_map_entry(
        message: impl Into<String>,
        entry: impl Into<String>,
        field_count: usize,
    ) -> Self {
        Self::MalformedMapEntry {
            message: message.into(),
            entry: entry.into(),
            field_count,
        }
    }

    /// Creates a new invalid oneof index error
    pub fn invalid_oneof_index(
        message: impl Into<String>,
        field: impl Into<String>,
        index: i32,
        declared: usize,
    ) -> Self {
        Self::InvalidOneofIndex {
            message: message.into(),
            field: field.into(),
            index,
            declared,
        }
    }

    /// Creates a new invalid parameter error
    pub fn invalid_parameter(parameter: impl Into<String>, details: impl Into<String>) -> Self {
        Self::InvalidParameter {
            parameter: parameter.into(),
            details: details.into(),
        }
    }

    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory creation error
    pub fn directory_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a new path traversal error
    pub fn path_traversal(path: impl Into<PathBuf>) -> Self {
        Self::PathTraversal { path: path.into() }
    }

    /// Returns true if the input schema itself is the cause of the failure
    ///
    /// Schema errors are deterministic: re-running on the same descriptors
    /// fails the same way.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedNestedType { .. }
                | Self::MalformedMapEntry { .. }
                | Self::InvalidOneofIndex { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::unsupported_nested_type("Outer", "Inner");
        assert!(err.to_string().contains("unsupported nested type"));
        assert!(err.to_string().contains("'Inner'"));
        assert!(err.to_string().contains("'Outer'"));

        let err = Error::path_traversal("../etc/passwd");
        assert!(err.to_string().contains("path traversal"));
    }

    #[test]
    fn test_is_schema_error() {
        assert!(Error::unsupported_nested_type("A", "B").is_schema_error());
        assert!(Error::malformed_map_entry("A", "BEntry", 1).is_schema_error());
        assert!(Error::invalid_oneof_index("A", "f", 3, 1).is_schema_error());
        assert!(!Error::invalid_parameter("x=y", "unknown key").is_schema_error());
        assert!(!Error::path_traversal("/test").is_schema_error());
    }

    #[test]
    fn test_render_error_from_fmt() {
        let err: Error = std::fmt::Error.into();
        assert!(matches!(err, Error::Render(_)));
        assert!(!err.is_schema_error());
    }
}
