//! Error types for decoding, loading and parameter control.

use std::path::PathBuf;
use thiserror::Error;

use crate::params::ParameterName;

/// Errors raised while decoding a binary STL byte stream.
///
/// Decoding is all-or-nothing: whenever one of these is returned no mesh
/// is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The fixed-size prelude (header or triangle count) is incomplete.
    #[error("invalid STL: {reason}")]
    Format {
        /// What was missing.
        reason: &'static str,
    },

    /// The declared triangle count needs more bytes than the stream holds.
    #[error("truncated STL: triangle {triangle} could not be fully read")]
    Truncated {
        /// Zero-based index of the first triangle that could not be read.
        triangle: u32,
    },

    /// A record carries a nonzero attribute byte count and the decoder was
    /// configured to reject them.
    #[error("unsupported attribute payload of {count} bytes on triangle {triangle}")]
    UnsupportedAttributes {
        /// Zero-based triangle index.
        triangle: u32,
        /// The declared attribute byte count.
        count: u16,
    },

    /// The triangle's vertex indices would not fit in a `u32`.
    #[error("triangle {triangle} exceeds the u32 vertex index range")]
    IndexOverflow {
        /// Zero-based index of the first triangle that could not be indexed.
        triangle: u32,
    },
}

/// Errors raised while loading an STL file from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Errors raised by parameter updates. All of them are recoverable and
/// leave the parameter state untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("{parameter} value {value} is outside [0.0, 1.0]")]
    OutOfRange { parameter: ParameterName, value: f64 },

    #[error("unknown color: {0:?}")]
    UnknownColor(String),

    #[error("unknown parameter: {0:?}")]
    UnknownParameter(String),

    #[error("level {level} is not a valid step for {parameter}")]
    InvalidLevel { parameter: ParameterName, level: usize },

    #[error("{label:?} is not a step of {parameter}")]
    InvalidLabel { parameter: ParameterName, label: String },

    #[error("{parameter} does not accept a value of this kind")]
    KindMismatch { parameter: ParameterName },
}

/// Errors raised while reading viewer configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(#[from] ParameterError),
}
