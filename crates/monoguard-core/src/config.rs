//! Runtime and repository configuration.
//!
//! `RepoConfig` is read once per run from the root package.json: an optional
//! `"monoguard"` object carries repo policy, with the internal namespace
//! falling back to the scope of the root `"name"` field.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::manifest::MANIFEST_FILE;

/// Runtime configuration for the monoguard CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Current working directory, treated as the repository root.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            json_logs: false,
            verbosity: 0,
        }
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }
}

/// Repository-level policy, loaded from the root package.json.
#[derive(Debug, Clone)]
pub struct RepoConfig {
    /// Repository root directory.
    pub root: PathBuf,

    /// Scope prefix identifying internal packages (e.g. `@acme`).
    pub namespace: String,

    /// Directory under the root holding internal packages.
    pub packages_dir: String,

    /// Hub package whose manifest must reference every plugin package.
    pub hub: String,

    /// Dependency names never auto-installed (e.g. types-only packages).
    pub ignore_packages: Vec<String>,

    /// Usage-site suffixes whose findings are dropped (style-only consumers).
    pub ignore_usage_suffixes: Vec<String>,
}

/// Shape of the optional `"monoguard"` object in the root package.json.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRepoConfig {
    namespace: Option<String>,
    packages_dir: Option<String>,
    hub: Option<String>,
    #[serde(default)]
    ignore_packages: Vec<String>,
    ignore_usage_suffixes: Option<Vec<String>>,
}

impl RepoConfig {
    /// Load repository policy from `<root>/package.json`.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let manifest_path = root.join(MANIFEST_FILE);
        let content = std::fs::read_to_string(&manifest_path).map_err(|e| Error::ManifestRead {
            path: manifest_path.clone(),
            source: e,
        })?;
        let doc: serde_json::Value =
            serde_json::from_str(&content).map_err(|e| Error::ManifestParse {
                path: manifest_path.clone(),
                source: e,
            })?;

        let raw = match doc.get("monoguard") {
            Some(value) => serde_json::from_value::<RawRepoConfig>(value.clone())
                .map_err(|e| Error::Config(format!("invalid \"monoguard\" config object: {e}")))?,
            None => RawRepoConfig::default(),
        };

        let namespace = match raw.namespace {
            Some(ns) => ns,
            None => scope_of(doc.get("name").and_then(serde_json::Value::as_str)).ok_or_else(
                || {
                    Error::Config(
                        "no \"monoguard.namespace\" configured and the root package name has no scope"
                            .to_string(),
                    )
                },
            )?,
        };

        let hub = raw.hub.unwrap_or_else(|| format!("{namespace}/cli"));

        Ok(Self {
            root: root.to_path_buf(),
            namespace,
            packages_dir: raw.packages_dir.unwrap_or_else(|| "packages".to_string()),
            hub,
            ignore_packages: raw.ignore_packages,
            ignore_usage_suffixes: raw
                .ignore_usage_suffixes
                .unwrap_or_else(|| vec![".scss".to_string()]),
        })
    }

    /// Absolute path of the packages directory.
    #[must_use]
    pub fn packages_root(&self) -> PathBuf {
        self.root.join(&self.packages_dir)
    }

    /// Name prefix identifying plugin siblings of the hub package.
    #[must_use]
    pub fn plugin_prefix(&self) -> String {
        format!("{}-", self.hub)
    }

    /// Whether a dependency name belongs to the internal namespace.
    #[must_use]
    pub fn is_internal(&self, name: &str) -> bool {
        name.starts_with(&self.namespace)
    }
}

/// Extract the scope from a scoped package name (`@acme/monorepo` → `@acme`).
fn scope_of(name: Option<&str>) -> Option<String> {
    let name = name?;
    if !name.starts_with('@') {
        return None;
    }
    name.split('/').next().map(String::from)
}
