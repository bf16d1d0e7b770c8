//! Usage-detector collaborator and drift classification.
//!
//! The detector reports, for one package, which declared dependencies are
//! never used and which used names are undeclared (with their usage sites).
//! Classification applies the configured exclusion policy before splitting
//! the remainder into internal and external names.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;

use crate::config::RepoConfig;
use crate::error::Error;

/// Declared-vs-used drift for one package. Produced once per run per
/// package and consumed immediately.
#[derive(Debug, Clone, Default)]
pub struct UsageFinding {
    /// Declared in the manifest but never used, in report order.
    pub extraneous: Vec<String>,
    /// Used in sources but not declared; name → usage sites.
    pub missing: BTreeMap<String, Vec<String>>,
}

impl UsageFinding {
    /// Whether the package has no drift at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.extraneous.is_empty() && self.missing.is_empty()
    }
}

/// Classification of one missing dependency name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixDecision {
    /// Namespace-prefixed: merged into the manifest with a wildcard.
    Internal,
    /// Anything else: installed through the package manager.
    External,
    /// Excluded by policy; never acted on.
    Ignored,
}

/// Classify a missing name under the configured exclusion policy.
///
/// A name is ignored when any usage site carries an ignored suffix (a
/// style-only consumer) or the name itself is deny-listed.
#[must_use]
pub fn classify(name: &str, usage_sites: &[String], config: &RepoConfig) -> FixDecision {
    let style_only = usage_sites.iter().any(|site| {
        config
            .ignore_usage_suffixes
            .iter()
            .any(|suffix| site.ends_with(suffix.as_str()))
    });
    if style_only || config.ignore_packages.iter().any(|p| p == name) {
        return FixDecision::Ignored;
    }
    if config.is_internal(name) {
        FixDecision::Internal
    } else {
        FixDecision::External
    }
}

/// Usage-detector collaborator. `Sync` so per-package invocations can fan
/// out; each call is read-only and independent.
pub trait UsageDetector: Sync {
    fn analyze(&self, pkg_dir: &Path) -> Result<UsageFinding, Error>;
}

/// Production detector: spawns `npx depcheck --json` for one package.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepcheckDetector;

impl UsageDetector for DepcheckDetector {
    fn analyze(&self, pkg_dir: &Path) -> Result<UsageFinding, Error> {
        let output = Command::new("npx")
            .arg("depcheck")
            .arg(pkg_dir)
            .arg("--json")
            .output()
            .map_err(|e| Error::collaborator("depcheck", format!("failed to spawn npx: {e}")))?;

        // depcheck exits non-zero when it finds issues; success is judged
        // by parseable JSON on stdout, not by the exit status.
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_depcheck_output(&stdout)
    }
}

/// Parse depcheck's `--json` output into a `UsageFinding`.
///
/// Only production `dependencies` count as extraneous; unused dev
/// dependencies are left alone.
pub fn parse_depcheck_output(raw: &str) -> Result<UsageFinding, Error> {
    let doc: Value = serde_json::from_str(raw)
        .map_err(|e| Error::collaborator("depcheck", format!("unparseable output: {e}")))?;

    let extraneous = doc
        .get("dependencies")
        .and_then(Value::as_array)
        .map(|unused| {
            unused
                .iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default();

    let mut missing = BTreeMap::new();
    if let Some(report) = doc.get("missing").and_then(Value::as_object) {
        for (name, sites) in report {
            let sites = sites
                .as_array()
                .map(|list| {
                    list.iter()
                        .filter_map(Value::as_str)
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_default();
            missing.insert(name.clone(), sites);
        }
    }

    Ok(UsageFinding {
        extraneous,
        missing,
    })
}
