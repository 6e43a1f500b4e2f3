//! Error types for the interface generator

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::codegen::render::ArtifactKind;

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Generator errors. Every variant aborts the whole run.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(
        "Symbol collision: interfaces {first} ({}) and {second} ({}) both map to symbol {symbol}",
        first_path.display(),
        second_path.display()
    )]
    Collision {
        symbol: String,
        first: String,
        first_path: PathBuf,
        second: String,
        second_path: PathBuf,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Check failed: {kind} ({})", path.display())]
    CheckMismatch { path: PathBuf, kind: MismatchKind },

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),
}

impl Error {
    /// Unified diff attached to a stale artifact report, if any
    pub fn diff(&self) -> Option<&str> {
        match self {
            Error::CheckMismatch {
                kind: MismatchKind::Stale { diff, .. },
                ..
            } => Some(diff),
            _ => None,
        }
    }
}

/// Malformed or semantically invalid interface document
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{}: {location} is not a JSON object", path.display())]
    NotAnObject { path: PathBuf, location: String },

    #[error("{}: missing field `{field}`", path.display())]
    MissingField { path: PathBuf, field: String },

    #[error("{}: field `{field}` must be {expected}", path.display())]
    WrongType {
        path: PathBuf,
        field: String,
        expected: &'static str,
    },

    #[error("{}: field `{field}` has unknown value {value}", path.display())]
    UnknownValue {
        path: PathBuf,
        field: String,
        value: String,
    },

    #[error("{}: interface declares no mappings", path.display())]
    EmptyMappings { path: PathBuf },

    #[error("{}: field `{field}` value {value:?} {reason}", path.display())]
    Malformed {
        path: PathBuf,
        field: String,
        value: String,
        reason: &'static str,
    },

    #[error("Failed to list schema directory {}: {source}", path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Why a check-mode comparison failed
#[derive(Debug)]
pub enum MismatchKind {
    /// The output directory does not exist
    MissingDirectory,
    /// The artifact file does not exist
    MissingArtifact(ArtifactKind),
    /// The artifact could not be read
    Unreadable(ArtifactKind, std::io::Error),
    /// The artifact differs from the freshly rendered text
    Stale { artifact: ArtifactKind, diff: String },
}

impl fmt::Display for MismatchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MismatchKind::MissingDirectory => write!(f, "non existent output directory"),
            MismatchKind::MissingArtifact(artifact) => write!(f, "{} does not exist", artifact),
            MismatchKind::Unreadable(artifact, e) => {
                write!(f, "{} could not be read: {}", artifact, e)
            }
            MismatchKind::Stale { artifact, .. } => write!(f, "{} is not up to date", artifact),
        }
    }
}
