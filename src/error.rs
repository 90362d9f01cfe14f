use std::{fmt, io};

use http::status::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Error as JsonError;
use thiserror::Error;
use url::ParseError as UrlParseError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum CanopyError {
    #[error("State store error: {0}")]
    Store(String),
    #[error("File System error: {0}")]
    Io(String),
    #[error("Item Not Found: {0}")]
    NotFound(String),
    #[error("You do not have permission to access this resource")]
    PermissionDenied,
    #[error("(De)Serialization error: {0}")]
    Serialization(String),
}

impl CanopyError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CanopyError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CanopyError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CanopyError::NotFound(_) => StatusCode::NOT_FOUND,
            CanopyError::PermissionDenied => StatusCode::FORBIDDEN,
            CanopyError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<toml::de::Error> for CanopyError {
    fn from(src: toml::de::Error) -> CanopyError {
        CanopyError::Serialization(format!("Toml deserialization error: {src}"))
    }
}

impl From<toml::ser::Error> for CanopyError {
    fn from(src: toml::ser::Error) -> CanopyError {
        CanopyError::Serialization(format!("Toml serialization error: {src}"))
    }
}

impl From<JsonError> for CanopyError {
    fn from(src: JsonError) -> CanopyError {
        CanopyError::Serialization(format!("JSON (de)serialization error: {src}"))
    }
}

impl From<UrlParseError> for CanopyError {
    fn from(src: UrlParseError) -> CanopyError {
        CanopyError::Serialization(format!("Invalid URL: {src}"))
    }
}

impl From<io::Error> for CanopyError {
    fn from(x: io::Error) -> Self {
        match x.kind() {
            io::ErrorKind::NotFound => CanopyError::NotFound(format!("{x}")),
            io::ErrorKind::PermissionDenied => CanopyError::PermissionDenied,
            _ => CanopyError::Io(format!("IOError: {}", x.kind())),
        }
    }
}

impl From<fmt::Error> for CanopyError {
    fn from(x: fmt::Error) -> Self {
        CanopyError::Serialization(format!("{x}"))
    }
}

/// Non-fatal diagnostics accumulated while building or mutating a tree.
///
/// Warnings never abort a request. They are aggregated per call and returned
/// alongside the snapshot so the caller can surface them; no exception-style
/// control flow crosses component boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
pub enum TreeWarning {
    /// A record path contained an empty segment (consecutive, leading, or
    /// trailing slashes). The record is skipped; the build continues.
    #[error("malformed path '{path}': empty segment")]
    MalformedPath { path: String },
    /// A leaf path and a structural path clashed. The leaf wins; the
    /// structural subtree (or the colliding record) is discarded.
    #[error("path collision at '{path}': leaf wins over structural node")]
    PathCollision { path: String },
    /// A mutation action referenced a path absent from the rebuilt tree.
    /// The action is a no-op.
    #[error("path '{path}' not present in the current tree")]
    PathNotFound { path: String },
}

impl TreeWarning {
    /// The path the warning refers to.
    pub fn path(&self) -> &str {
        match self {
            TreeWarning::MalformedPath { path } => path,
            TreeWarning::PathCollision { path } => path,
            TreeWarning::PathNotFound { path } => path,
        }
    }
}
