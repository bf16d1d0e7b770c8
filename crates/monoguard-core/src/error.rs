//! Error taxonomy for monoguard operations.
//!
//! Nothing here is retried; every error surfaces at the CLI boundary. The
//! dry-run variants (`ConsistencyViolation`, `RegistrationDrift`) are
//! expected CI gating signals rather than bugs, and their messages name the
//! non-dry-run command that converges the repository.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes surfaced in JSON output.
pub mod codes {
    pub const MANIFEST_MISMATCH: &str = "MANIFEST_MISMATCH";
    pub const MANIFEST_READ_FAILED: &str = "MANIFEST_READ_FAILED";
    pub const MANIFEST_PARSE_FAILED: &str = "MANIFEST_PARSE_FAILED";
    pub const MANIFEST_INVALID: &str = "MANIFEST_INVALID";
    pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
    pub const CONSISTENCY_VIOLATION: &str = "CONSISTENCY_VIOLATION";
    pub const REGISTRATION_DRIFT: &str = "REGISTRATION_DRIFT";
    pub const UNKNOWN_PACKAGE: &str = "UNKNOWN_PACKAGE";
    pub const COLLABORATOR_FAILED: &str = "COLLABORATOR_FAILED";
    pub const IO_ERROR: &str = "IO_ERROR";
}

/// Which direction a package's manifest has drifted from real usage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftKind {
    /// Declared in the manifest but never used.
    Extraneous,
    /// Used in sources but not declared.
    Missing,
}

impl fmt::Display for DriftKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Extraneous => f.write_str("extraneous"),
            Self::Missing => f.write_str("missing"),
        }
    }
}

/// Core error type for monoguard operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("manifest name '{declared}' does not match path-derived name '{derived}' at {path}")]
    ManifestMismatch {
        declared: String,
        derived: String,
        path: PathBuf,
    },

    #[error("failed to read manifest at {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest at {path}: {source}")]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid manifest at {path}: {message}")]
    ManifestInvalid { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("package {package} has {kind} dependencies; run \"monoguard deps\" to update")]
    ConsistencyViolation { package: String, kind: DriftKind },

    #[error("plugins not registered with the hub package: {}; run \"monoguard cli-deps\" to update", missing.join(", "))]
    RegistrationDrift { missing: Vec<String> },

    #[error("package {0} not found in the dependency graph")]
    UnknownPackage(String),

    #[error("{tool} invocation failed: {message}")]
    Collaborator { tool: &'static str, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a collaborator failure for the named external tool.
    pub fn collaborator(tool: &'static str, message: impl Into<String>) -> Self {
        Self::Collaborator {
            tool,
            message: message.into(),
        }
    }

    /// Stable code for this error, used in JSON output.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ManifestMismatch { .. } => codes::MANIFEST_MISMATCH,
            Self::ManifestRead { .. } => codes::MANIFEST_READ_FAILED,
            Self::ManifestParse { .. } => codes::MANIFEST_PARSE_FAILED,
            Self::ManifestInvalid { .. } => codes::MANIFEST_INVALID,
            Self::Config(_) => codes::CONFIG_INVALID,
            Self::ConsistencyViolation { .. } => codes::CONSISTENCY_VIOLATION,
            Self::RegistrationDrift { .. } => codes::REGISTRATION_DRIFT,
            Self::UnknownPackage(_) => codes::UNKNOWN_PACKAGE,
            Self::Collaborator { .. } => codes::COLLABORATOR_FAILED,
            Self::Io(_) => codes::IO_ERROR,
        }
    }
}
