//! `monoguard packages` command implementation.
//!
//! List the internal packages discovered under the repository root.

use miette::Result;
use monoguard_core::{scan_packages, RepoConfig};
use std::path::Path;

/// Run the packages command.
pub fn run(cwd: &Path, json: bool) -> Result<()> {
    let repo = match RepoConfig::load(cwd) {
        Ok(repo) => repo,
        Err(e) => super::fail(&e, json),
    };
    let packages = match scan_packages(&repo) {
        Ok(packages) => packages,
        Err(e) => super::fail(&e, json),
    };

    if json {
        let pkg_list: Vec<_> = packages
            .iter()
            .map(|pkg| {
                serde_json::json!({
                    "name": pkg.name(),
                    "version": pkg.manifest.version(),
                    "path": pkg.rel_dir.to_string_lossy()
                })
            })
            .collect();

        println!(
            "{}",
            serde_json::json!({
                "ok": true,
                "namespace": repo.namespace,
                "packages": pkg_list
            })
        );
    } else {
        println!("Namespace: {}", repo.namespace);
        println!();
        println!("Packages ({}):", packages.len());
        for pkg in packages.iter() {
            match pkg.manifest.version() {
                Some(version) => println!("  {} @ {}", pkg.name(), version),
                None => println!("  {}", pkg.name()),
            }
            println!("    {}", pkg.rel_dir.display());
        }
    }

    Ok(())
}
