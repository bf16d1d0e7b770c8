//! `monoguard compute-deps-for-package` command implementation.
//!
//! Resolves the minimal local file set a package needs to build standalone
//! and prints it as one space-joined line on stdout, for consumption by
//! scoped CI checkouts.

use miette::Result;
use monoguard_core::{resolve_file_set, scan_packages, DependencyGraph, RepoConfig, WalkdirLister};
use std::path::Path;

/// Run the compute-deps-for-package command.
pub fn run(cwd: &Path, package_name: &str, json: bool) -> Result<()> {
    let repo = match RepoConfig::load(cwd) {
        Ok(repo) => repo,
        Err(e) => super::fail(&e, json),
    };
    let packages = match scan_packages(&repo) {
        Ok(packages) => packages,
        Err(e) => super::fail(&e, json),
    };

    let graph = DependencyGraph::build(&packages, &repo);
    let closures = graph.closures();

    match resolve_file_set(package_name, &packages, &closures, &WalkdirLister) {
        Ok(files) => {
            // Resolution order is unspecified; sort for stable output.
            let mut out: Vec<String> = files.iter().map(|p| slash_join(p)).collect();
            out.sort_unstable();

            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "ok": true,
                        "package": package_name,
                        "files": out
                    })
                );
            } else {
                println!("{}", out.join(" "));
            }
            Ok(())
        }
        Err(e) => super::fail(&e, json),
    }
}

/// Render a path with `/` separators regardless of platform.
fn slash_join(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
