//! Common types and utilities shared across Roost crates.
//!
//! This crate defines the shared error taxonomy and observability helpers
//! used throughout the Roost workspace. It is intentionally lightweight so
//! that every crate can depend on it without pulling in the rendering or
//! configuration stacks.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`RoostError`] and [`Result`]: Shared error handling
//! - [`LogFormat`]: Encoding used for structured logs
//!
//! # Examples
//!
//! Classifying a failure:
//!
//! ```rust
//! use roost_common::RoostError;
//!
//! let err = RoostError::MissingId;
//! assert!(!err.is_fatal());
//! assert_eq!(err.to_string(), "missing id");
//! ```
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub mod observability;

/// Output encoding for structured logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Error types used across the Roost tools.
#[derive(thiserror::Error, Debug)]
pub enum RoostError {
    /// An input file could not be read.
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing an output file or directory failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed or serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The dataset had an unexpected overall shape.
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A record had no usable `id`.
    #[error("missing id")]
    MissingId,

    /// A record could not be turned into a page.
    #[error("Render error: {0}")]
    Render(String),

    /// The sitemap writer failed.
    #[error("XML error: {0}")]
    Xml(String),

    /// A base URL did not parse as an absolute URL.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl RoostError {
    /// Attach a path to a failed read of an input file.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Attach a path to an I/O failure.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error aborts a whole command rather than a single record.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::MissingId | Self::Render(_))
    }
}

/// Convenient alias for results that use [`RoostError`].
pub type Result<T> = std::result::Result<T, RoostError>;
