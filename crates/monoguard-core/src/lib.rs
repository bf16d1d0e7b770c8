#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

//! Core engine for monoguard: manifest scanning, internal dependency
//! graphing, transitive closures, file-set resolution, drift checking, and
//! manifest reconciliation for multi-package repositories.

pub mod check;
pub mod config;
pub mod error;
pub mod files;
pub mod graph;
pub mod manifest;
pub mod pm;
pub mod reconcile;
pub mod registrar;
pub mod scan;
pub mod usage;

pub use check::{check_consistency, CheckOutcome};
pub use config::{Config, RepoConfig};
pub use error::{codes, DriftKind, Error};
pub use files::{resolve_file_set, FileLister, WalkdirLister, TEST_FILE_MARKER};
pub use graph::{ClosureSet, DependencyGraph};
pub use manifest::{Manifest, MANIFEST_FILE};
pub use pm::{NpmPackageManager, PackageManager};
pub use reconcile::ManifestReconciler;
pub use registrar::{register_plugins, IMPORT_MANIFEST_PATH};
pub use scan::{scan_packages, Package, PackageSet};
pub use usage::{
    classify, parse_depcheck_output, DepcheckDetector, FixDecision, UsageDetector, UsageFinding,
};
