//! Error types for the lyrical-rs library.
//!
//! Every failure in a feature extraction run is fatal: the batch is assumed to
//! be cheap to rerun, so errors carry enough structure (tool name, sidecar
//! name, row index) to explain what broke and propagate straight to `main`.

use std::io;

use thiserror::Error;

/// Main result type for lyrical operations.
pub type Result<T> = std::result::Result<T, LyricalError>;

/// Error type for all lyrical operations.
#[derive(Error, Debug)]
pub enum LyricalError {
    /// I/O related errors (document reads, sidecar reads, side output writes)
    #[error("I/O error: {message}")]
    Io {
        /// Human-readable error message
        message: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Error description
        message: String,
        /// Configuration field that caused the error
        field: Option<String>,
    },

    /// Malformed numeric or textual input
    #[error("Parse error in {source_name}: {message}")]
    Parse {
        /// File or stream being parsed
        source_name: String,
        /// Error description
        message: String,
        /// One-based line number (if available)
        line: Option<usize>,
    },

    /// Validation errors for extracted data
    #[error("Validation error: {message}")]
    Validation {
        /// Error description
        message: String,
        /// Feature or input that failed validation
        field: Option<String>,
        /// Expected value or format
        expected: Option<String>,
        /// Actual value received
        actual: Option<String>,
    },

    /// An external analysis tool could not be run or produced unusable output
    #[error("External tool '{tool}' failed: {message}")]
    ExternalTool {
        /// Configured tool name (readability, spelling, tagger)
        tool: String,
        /// Error description
        message: String,
        /// Exit status, when the process ran to completion
        status: Option<i32>,
    },

    /// A sidecar matrix does not line up with the documents being processed
    #[error("Alignment error in sidecar '{sidecar}': {message}")]
    Alignment {
        /// Declared feature name of the sidecar
        sidecar: String,
        /// Error description
        message: String,
        /// Zero-based row index at which the mismatch was detected
        row: usize,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error description
        message: String,
        /// Data type being serialized
        data_type: Option<String>,
        /// Underlying serialization error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal {
        /// Error description
        message: String,
    },
}

impl LyricalError {
    /// Create a new I/O error with context
    pub fn io(message: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a new configuration error with field context
    pub fn config_field(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a new parse error
    pub fn parse(source_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.into(),
            line: None,
        }
    }

    /// Create a new parse error pointing at a line
    pub fn parse_at_line(
        source_name: impl Into<String>,
        message: impl Into<String>,
        line: usize,
    ) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            message: message.into(),
            line: Some(line),
        }
    }

    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
            expected: None,
            actual: None,
        }
    }

    /// Create a validation error describing an expected/actual mismatch
    pub fn validation_mismatch(
        message: impl Into<String>,
        field: impl Into<String>,
        expected: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
            expected: Some(expected.to_string()),
            actual: Some(actual.to_string()),
        }
    }

    /// Create a new external tool error
    pub fn external_tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create an external tool error for a process that exited unsuccessfully
    pub fn external_tool_status(
        tool: impl Into<String>,
        message: impl Into<String>,
        status: Option<i32>,
    ) -> Self {
        Self::ExternalTool {
            tool: tool.into(),
            message: message.into(),
            status,
        }
    }

    /// Create a new alignment error
    pub fn alignment(sidecar: impl Into<String>, message: impl Into<String>, row: usize) -> Self {
        Self::Alignment {
            sidecar: sidecar.into(),
            message: message.into(),
            row,
        }
    }

    /// Create a new internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Prefix the message of an I/O or parse error with context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        if let Self::Io { message, .. } | Self::Parse { message, .. } = &mut self {
            *message = format!("{}: {}", context.into(), message);
        }
        self
    }
}

impl From<io::Error> for LyricalError {
    fn from(err: io::Error) -> Self {
        let message = err.to_string();
        Self::io(message, err)
    }
}

impl From<serde_yaml::Error> for LyricalError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Serialization {
            message: format!("YAML serialization failed: {err}"),
            data_type: Some("YAML".to_string()),
            source: Some(Box::new(err)),
        }
    }
}

/// Result extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<LyricalError>,
{
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LyricalError::config_field("Invalid configuration", "sidecars");
        assert!(matches!(err, LyricalError::Config { field: Some(_), .. }));

        let err = LyricalError::parse("topics10.dat", "bad cell");
        assert!(matches!(err, LyricalError::Parse { line: None, .. }));
    }

    #[test]
    fn test_alignment_error_display() {
        let err = LyricalError::alignment(
            "Topic membership probabilities (10 topics)",
            "sidecar exhausted",
            3,
        );
        let display = err.to_string();
        assert!(display.contains("Alignment error"));
        assert!(display.contains("10 topics"));

        if let LyricalError::Alignment { row, .. } = err {
            assert_eq!(row, 3);
        } else {
            panic!("Expected Alignment error");
        }
    }

    #[test]
    fn test_external_tool_status() {
        let err = LyricalError::external_tool_status("spelling", "exited unsuccessfully", Some(2));

        if let LyricalError::ExternalTool { tool, status, .. } = &err {
            assert_eq!(tool, "spelling");
            assert_eq!(*status, Some(2));
        } else {
            panic!("Expected ExternalTool error");
        }
        assert!(err.to_string().contains("'spelling'"));
    }

    #[test]
    fn test_validation_mismatch() {
        let err = LyricalError::validation_mismatch("wrong width", "Letter frequencies", 26, 25);

        if let LyricalError::Validation {
            field,
            expected,
            actual,
            ..
        } = err
        {
            assert_eq!(field.as_deref(), Some("Letter frequencies"));
            assert_eq!(expected.as_deref(), Some("26"));
            assert_eq!(actual.as_deref(), Some("25"));
        } else {
            panic!("Expected Validation error");
        }
    }

    #[test]
    fn test_with_context_prefixes_io_message() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = LyricalError::io("read failed", io_err).with_context("song.txt");

        if let LyricalError::Io { message, .. } = err {
            assert_eq!(message, "song.txt: read failed");
        } else {
            panic!("Expected Io error");
        }
    }

    #[test]
    fn test_with_context_leaves_other_errors() {
        let err = LyricalError::internal("Something went wrong").with_context("ignored");

        if let LyricalError::Internal { message } = err {
            assert_eq!(message, "Something went wrong");
        } else {
            panic!("Expected Internal error");
        }
    }

    #[test]
    fn test_result_extension() {
        let result: std::result::Result<i32, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "File not found",
        ));

        match result.with_context(|| "Failed to read song.txt".to_string()) {
            Err(LyricalError::Io { message, .. }) => {
                assert_eq!(message, "Failed to read song.txt: File not found");
            }
            other => panic!("Expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<i32>("invalid: yaml: content").unwrap_err();
        let err: LyricalError = yaml_err.into();

        if let LyricalError::Serialization { data_type, .. } = err {
            assert_eq!(data_type, Some("YAML".to_string()));
        } else {
            panic!("Expected Serialization error");
        }
    }
}
