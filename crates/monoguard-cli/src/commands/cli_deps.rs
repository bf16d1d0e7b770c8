//! `monoguard cli-deps` command implementation.
//!
//! Makes sure every cli plugin package is registered with the hub package,
//! regenerating the hub's import manifest when drift is found.

use miette::Result;
use monoguard_core::{
    register_plugins, scan_packages, DepcheckDetector, NpmPackageManager, RepoConfig,
};
use std::path::Path;
use tracing::info;

/// Run the cli-deps command.
pub fn run(cwd: &Path, dry_run: bool, json: bool) -> Result<()> {
    let repo = match RepoConfig::load(cwd) {
        Ok(repo) => repo,
        Err(e) => super::fail(&e, json),
    };
    let packages = match scan_packages(&repo) {
        Ok(packages) => packages,
        Err(e) => super::fail(&e, json),
    };
    info!(hub = %repo.hub, dry_run, "checking plugin registration");

    let detector = DepcheckDetector;
    let pm = NpmPackageManager::new(repo.root.clone());

    match register_plugins(&packages, &repo, &detector, &pm, dry_run) {
        Ok(outcome) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "ok": true,
                        "changed": outcome.changed,
                        "hub": repo.hub
                    })
                );
            } else if outcome.changed {
                println!("Hub package updated.");
            } else {
                println!("Hub package is up to date.");
            }
            Ok(())
        }
        Err(e) => super::fail(&e, json),
    }
}
