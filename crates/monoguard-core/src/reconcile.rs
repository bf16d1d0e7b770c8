//! Manifest reconciliation.
//!
//! Applies the fixes decided by the consistency checker, one package at a
//! time: uninstalls extraneous dependencies, merges missing internal names
//! into the manifest with a wildcard constraint, installs missing external
//! names. Every corrective action is logged before and after it runs.

use tracing::info;

use crate::error::Error;
use crate::manifest::Manifest;
use crate::pm::PackageManager;
use crate::scan::Package;

/// Applies corrective actions through the package-manager collaborator and
/// direct manifest rewrites. All operations are strictly sequential.
pub struct ManifestReconciler<'a> {
    pm: &'a dyn PackageManager,
}

impl<'a> ManifestReconciler<'a> {
    #[must_use]
    pub fn new(pm: &'a dyn PackageManager) -> Self {
        Self { pm }
    }

    /// Uninstall extraneous dependencies, scoped to the package workspace.
    pub fn remove_extraneous(&self, pkg: &Package, names: &[String]) -> Result<(), Error> {
        info!(
            package = pkg.name(),
            dependencies = ?names,
            "removing extraneous dependencies"
        );
        self.pm.uninstall(&pkg.rel_dir, names)?;
        info!(package = pkg.name(), "removed extraneous dependencies");
        Ok(())
    }

    /// Merge internal names into the manifest with the wildcard constraint
    /// and rewrite the file in full. Returns whether anything was written.
    pub fn add_missing_internal(&self, pkg: &Package, names: &[String]) -> Result<bool, Error> {
        if names.is_empty() {
            info!(package = pkg.name(), "no missing internal dependencies");
            return Ok(false);
        }
        info!(
            package = pkg.name(),
            dependencies = ?names,
            "adding internal dependency names to manifest"
        );
        // Re-read from disk: a preceding uninstall may have edited the file
        // since the scan.
        let mut manifest = Manifest::read(pkg.manifest.path())?;
        for name in names {
            manifest.insert_dependency(name, "*");
        }
        manifest.write()?;
        info!(package = pkg.name(), "added internal dependency names to manifest");
        Ok(true)
    }

    /// Install missing external names, scoped to the package workspace.
    /// Returns whether anything was installed.
    pub fn add_missing_external(&self, pkg: &Package, names: &[String]) -> Result<bool, Error> {
        if names.is_empty() {
            info!(package = pkg.name(), "no missing external dependencies");
            return Ok(false);
        }
        info!(
            package = pkg.name(),
            dependencies = ?names,
            "installing missing external dependencies"
        );
        self.pm.install(&pkg.rel_dir, names)?;
        info!(package = pkg.name(), "installed missing external dependencies");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepoConfig;
    use crate::manifest::MANIFEST_FILE;
    use crate::scan::scan_packages;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::tempdir;

    /// Recording fake: captures every invocation, touches nothing.
    #[derive(Default)]
    struct RecordingPm {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingPm {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl PackageManager for RecordingPm {
        fn install(&self, workspace: &Path, names: &[String]) -> Result<(), Error> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("install {} {}", workspace.display(), names.join(",")));
            Ok(())
        }

        fn uninstall(&self, workspace: &Path, names: &[String]) -> Result<(), Error> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("uninstall {} {}", workspace.display(), names.join(",")));
            Ok(())
        }

        fn install_all(&self) -> Result<(), Error> {
            self.calls.lock().unwrap().push("install-all".to_string());
            Ok(())
        }
    }

    fn test_config(root: &Path) -> RepoConfig {
        RepoConfig {
            root: root.to_path_buf(),
            namespace: "@acme".to_string(),
            packages_dir: "packages".to_string(),
            hub: "@acme/cli".to_string(),
            ignore_packages: Vec::new(),
            ignore_usage_suffixes: vec![".scss".to_string()],
        }
    }

    fn add_package(root: &Path, name: &str, manifest: &str) -> PathBuf {
        let dir = root.join("packages").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE), manifest).unwrap();
        dir
    }

    #[test]
    fn test_remove_extraneous_delegates_scoped_uninstall() {
        let root = tempdir().unwrap();
        add_package(root.path(), "@acme/x", r#"{"name": "@acme/x"}"#);
        let packages = scan_packages(&test_config(root.path())).unwrap();
        let pkg = packages.get("@acme/x").unwrap();

        let pm = RecordingPm::default();
        ManifestReconciler::new(&pm)
            .remove_extraneous(pkg, &["left-pad".to_string()])
            .unwrap();

        assert_eq!(pm.calls(), vec!["uninstall packages/@acme/x left-pad"]);
    }

    #[test]
    fn test_add_missing_internal_writes_wildcard_sorted() {
        let root = tempdir().unwrap();
        let dir = add_package(
            root.path(),
            "@acme/x",
            r#"{"name": "@acme/x", "dependencies": {"zebra": "^1.0.0"}}"#,
        );
        let packages = scan_packages(&test_config(root.path())).unwrap();
        let pkg = packages.get("@acme/x").unwrap();

        let pm = RecordingPm::default();
        let changed = ManifestReconciler::new(&pm)
            .add_missing_internal(pkg, &["@acme/y".to_string()])
            .unwrap();
        assert!(changed);
        assert!(pm.calls().is_empty(), "internal adds never touch npm");

        let raw = fs::read_to_string(dir.join(MANIFEST_FILE)).unwrap();
        let doc: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(doc["dependencies"]["@acme/y"], "*");
        assert!(raw.find("@acme/y").unwrap() < raw.find("zebra").unwrap());
    }

    #[test]
    fn test_add_missing_external_delegates_scoped_install() {
        let root = tempdir().unwrap();
        add_package(root.path(), "@acme/x", r#"{"name": "@acme/x"}"#);
        let packages = scan_packages(&test_config(root.path())).unwrap();
        let pkg = packages.get("@acme/x").unwrap();

        let pm = RecordingPm::default();
        let changed = ManifestReconciler::new(&pm)
            .add_missing_external(pkg, &["lodash".to_string(), "left-pad".to_string()])
            .unwrap();
        assert!(changed);
        assert_eq!(
            pm.calls(),
            vec!["install packages/@acme/x lodash,left-pad"]
        );
    }

    #[test]
    fn test_empty_name_lists_do_nothing() {
        let root = tempdir().unwrap();
        add_package(root.path(), "@acme/x", r#"{"name": "@acme/x"}"#);
        let packages = scan_packages(&test_config(root.path())).unwrap();
        let pkg = packages.get("@acme/x").unwrap();

        let pm = RecordingPm::default();
        let reconciler = ManifestReconciler::new(&pm);
        assert!(!reconciler.add_missing_internal(pkg, &[]).unwrap());
        assert!(!reconciler.add_missing_external(pkg, &[]).unwrap());
        assert!(pm.calls().is_empty());
    }
}
