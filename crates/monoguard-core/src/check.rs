//! Repository-wide consistency checking.
//!
//! For every package the usage detector reports declared-vs-used drift; the
//! checker classifies it under the exclusion policy and either gates (dry
//! run) or delegates fixes to the reconciler. Detector calls are read-only
//! and fan out concurrently, joining at a barrier before any decision;
//! every mutation afterwards is strictly sequential in scan order.

use rayon::prelude::*;
use tracing::info;

use crate::config::RepoConfig;
use crate::error::{DriftKind, Error};
use crate::pm::PackageManager;
use crate::reconcile::ManifestReconciler;
use crate::scan::{Package, PackageSet};
use crate::usage::{classify, FixDecision, UsageDetector, UsageFinding};

/// Outcome of a full consistency pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOutcome {
    /// Whether any manifest or dependency-tree mutation was performed.
    pub changed: bool,
}

/// Missing names split by fix decision, each list in ascending name order.
#[derive(Debug, Default)]
struct MissingSplit {
    internal: Vec<String>,
    external: Vec<String>,
}

fn partition_missing(finding: &UsageFinding, config: &RepoConfig) -> MissingSplit {
    let mut split = MissingSplit::default();
    for (name, sites) in &finding.missing {
        match classify(name, sites, config) {
            FixDecision::Internal => split.internal.push(name.clone()),
            FixDecision::External => split.external.push(name.clone()),
            FixDecision::Ignored => {}
        }
    }
    split
}

/// Check every package's declared dependencies against real usage.
///
/// With `dry_run` the first offending package aborts the run with
/// `ConsistencyViolation` before any mutation anywhere. Otherwise each
/// offending package is reconciled in scan order, and one final
/// whole-repository install converges the lockfile when anything changed.
pub fn check_consistency(
    packages: &PackageSet,
    config: &RepoConfig,
    detector: &dyn UsageDetector,
    pm: &dyn PackageManager,
    dry_run: bool,
) -> Result<CheckOutcome, Error> {
    let pkgs: Vec<&Package> = packages.iter().collect();

    // Detector calls share no mutable state; fan out and join here before
    // any decision is made.
    let findings: Vec<UsageFinding> = pkgs
        .par_iter()
        .map(|pkg| detector.analyze(&pkg.dir))
        .collect::<Result<_, _>>()?;

    let reconciler = ManifestReconciler::new(pm);
    let mut changed = false;

    for (pkg, finding) in pkgs.iter().zip(&findings) {
        if !finding.extraneous.is_empty() {
            if dry_run {
                return Err(Error::ConsistencyViolation {
                    package: pkg.name().to_string(),
                    kind: DriftKind::Extraneous,
                });
            }
            reconciler.remove_extraneous(pkg, &finding.extraneous)?;
            changed = true;
        }

        let missing = partition_missing(finding, config);
        if !missing.internal.is_empty() || !missing.external.is_empty() {
            if dry_run {
                return Err(Error::ConsistencyViolation {
                    package: pkg.name().to_string(),
                    kind: DriftKind::Missing,
                });
            }
            if reconciler.add_missing_internal(pkg, &missing.internal)? {
                changed = true;
            }
            if reconciler.add_missing_external(pkg, &missing.external)? {
                changed = true;
            }
        }
    }

    if changed {
        info!("manifests changed; converging with a final install");
        pm.install_all()?;
    } else {
        info!("all package manifests are consistent");
    }

    Ok(CheckOutcome { changed })
}
