//! Error types for pixel art import

use std::path::PathBuf;

/// Failure compiling a naming template
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    /// `{name}` where `name` is not a substitution key allowed in this template
    #[error("unknown key '{key}' at position {position}")]
    UnknownKey { key: String, position: usize },

    /// `{` without a matching `}`
    #[error("unclosed '{{' at position {position}")]
    UnclosedBrace { position: usize },

    /// Single `}` outside of a substitution
    #[error("single '}}' encountered at position {position}")]
    UnmatchedCloseBrace { position: usize },

    /// `{}` or `{:spec}`
    #[error("empty substitution at position {position} (positional fields are not supported)")]
    EmptyKey { position: usize },

    /// Format spec after `:` that cannot be parsed
    #[error("invalid format spec '{spec}' for key '{key}'")]
    InvalidFormatSpec { key: String, spec: String },
}

/// Errors that abort an import
///
/// Auto-scale failures are deliberately absent: they are reported as warnings
/// and the import continues with the original buffer.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// Channel count outside {1, 3, 4}
    #[error("cannot handle image with {channels} channels (expected 1, 3 or 4)")]
    UnsupportedFormat { channels: u32 },

    /// A naming template failed to compile
    #[error("format error in {field}: {source}")]
    Template {
        field: &'static str,
        #[source]
        source: TemplateError,
    },

    /// Unrecognized geometry strategy selector
    #[error("illegal import_as value: {0:?} (expected CUBES or MERGED_MESH)")]
    IllegalMode(String),

    /// Decoded sample buffer does not match the reported dimensions
    #[error("sample buffer holds {actual} values, expected {expected} ({width}x{height}x{channels})")]
    SampleCount {
        width: u32,
        height: u32,
        channels: u32,
        expected: usize,
        actual: usize,
    },

    /// The image source failed to decode the file
    #[error("failed to decode image {path:?}: {message}")]
    Decode { path: PathBuf, message: String },
}

impl ImportError {
    /// Wrap a template error with the name of the option it came from
    pub fn template(field: &'static str, source: TemplateError) -> Self {
        ImportError::Template { field, source }
    }
}
