//! Error types for the enigma library.

use thiserror::Error;

/// Errors produced by the enigma library.
///
/// Two kinds matter to callers: configuration errors (the machine
/// description is malformed or inconsistent) and bounds errors (a setting
/// string or index does not fit the machine). Neither is recovered
/// internally; both abort the operation that detected them.
#[derive(Debug, Error)]
pub enum EnigmaError {
    /// Malformed alphabet, permutation, rotor description, settings line,
    /// or a rotor stack that does not match the machine's slots and pawls.
    #[error("{0}")]
    Config(String),
    /// A setting string does not have one symbol per signal rotor.
    #[error("{what} has {actual} symbols, expected {expected}")]
    WrongLength {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// An index lies outside `[0, size)`.
    #[error("index {index} out of range for alphabet of size {size}")]
    IndexOutOfRange { index: usize, size: usize },
    /// Reading configuration or messages, or writing results, failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, EnigmaError>;

impl EnigmaError {
    /// Builds a [`EnigmaError::Config`] from any message.
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        EnigmaError::Config(msg.into())
    }

    /// Returns `true` for configuration errors.
    pub fn is_config(&self) -> bool {
        matches!(self, EnigmaError::Config(_))
    }

    /// Returns `true` for bounds errors (wrong setting length, bad index).
    pub fn is_bounds(&self) -> bool {
        matches!(
            self,
            EnigmaError::WrongLength { .. } | EnigmaError::IndexOutOfRange { .. }
        )
    }

    /// Prefixes a configuration error with the input line it came from.
    ///
    /// Other kinds already carry enough context and pass through unchanged.
    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            EnigmaError::Config(msg) => EnigmaError::Config(format!("line {line}: {msg}")),
            other => other,
        }
    }
}
