//! Package-manager collaborator.
//!
//! A narrow interface over install/uninstall so the reconciler never spawns
//! processes directly; tests substitute a recording fake to assert exact
//! invocation sequences. All calls run to completion or fail outright —
//! no retries, no timeouts.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::Error;

/// Package-manager operations, scoped to one workspace per call except for
/// the final whole-repository convergence install.
pub trait PackageManager {
    /// Install named dependencies into one workspace.
    fn install(&self, workspace: &Path, names: &[String]) -> Result<(), Error>;

    /// Uninstall named dependencies from one workspace.
    fn uninstall(&self, workspace: &Path, names: &[String]) -> Result<(), Error>;

    /// Whole-repository install, converging the lockfile.
    fn install_all(&self) -> Result<(), Error>;
}

/// npm-backed implementation, invoked from the repository root with
/// inherited stdio so npm's own progress output stays visible.
#[derive(Debug, Clone)]
pub struct NpmPackageManager {
    root: PathBuf,
}

impl NpmPackageManager {
    /// Create a package manager rooted at the repository.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn run(&self, args: &[&str]) -> Result<(), Error> {
        let status = Command::new("npm")
            .args(args)
            .current_dir(&self.root)
            .status()
            .map_err(|e| Error::collaborator("npm", format!("failed to spawn npm: {e}")))?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::collaborator(
                "npm",
                format!(
                    "npm {} exited with {status}",
                    args.first().copied().unwrap_or_default()
                ),
            ))
        }
    }
}

impl PackageManager for NpmPackageManager {
    fn install(&self, workspace: &Path, names: &[String]) -> Result<(), Error> {
        let ws = workspace.to_string_lossy();
        let mut args = vec!["install", "--workspace", ws.as_ref()];
        args.extend(names.iter().map(String::as_str));
        self.run(&args)
    }

    fn uninstall(&self, workspace: &Path, names: &[String]) -> Result<(), Error> {
        let ws = workspace.to_string_lossy();
        let mut args = vec!["uninstall", "--workspace", ws.as_ref()];
        args.extend(names.iter().map(String::as_str));
        self.run(&args)
    }

    fn install_all(&self) -> Result<(), Error> {
        self.run(&["install"])
    }
}
