//! `monoguard deps` command implementation.
//!
//! Iterates over all packages and makes sure their declared dependencies
//! match what their sources actually import.

use miette::Result;
use monoguard_core::{
    check_consistency, scan_packages, DepcheckDetector, NpmPackageManager, RepoConfig,
};
use std::path::Path;
use tracing::info;

/// Run the deps command.
pub fn run(cwd: &Path, dry_run: bool, json: bool) -> Result<()> {
    let repo = match RepoConfig::load(cwd) {
        Ok(repo) => repo,
        Err(e) => super::fail(&e, json),
    };
    let packages = match scan_packages(&repo) {
        Ok(packages) => packages,
        Err(e) => super::fail(&e, json),
    };
    info!(count = packages.len(), dry_run, "checking package consistency");

    let detector = DepcheckDetector;
    let pm = NpmPackageManager::new(repo.root.clone());

    match check_consistency(&packages, &repo, &detector, &pm, dry_run) {
        Ok(outcome) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "ok": true,
                        "changed": outcome.changed,
                        "packages": packages.len()
                    })
                );
            } else if outcome.changed {
                println!("Repository converged.");
            } else {
                println!("All package manifests are consistent.");
            }
            Ok(())
        }
        Err(e) => super::fail(&e, json),
    }
}
