//! Plugin registration for the hub package.
//!
//! The hub package must declare every sibling plugin package (names under
//! `<hub>-`) so that importing the hub pulls in all plugins. Drift is
//! healed by regenerating the hub's import manifest in full and running a
//! fix-mode consistency pass, which installs the newly referenced names
//! into the hub's manifest.

use tracing::info;

use crate::check::{check_consistency, CheckOutcome};
use crate::config::RepoConfig;
use crate::error::Error;
use crate::pm::PackageManager;
use crate::scan::PackageSet;
use crate::usage::UsageDetector;
use monoguard_util::fs::atomic_write;

/// Generated import-manifest file, relative to the hub package directory.
/// Fully regenerated on every healing run, never merged.
pub const IMPORT_MANIFEST_PATH: &str = "src/manifest.ts";

/// Ensure the hub package references every plugin sibling.
pub fn register_plugins(
    packages: &PackageSet,
    config: &RepoConfig,
    detector: &dyn UsageDetector,
    pm: &dyn PackageManager,
    dry_run: bool,
) -> Result<CheckOutcome, Error> {
    let prefix = config.plugin_prefix();
    let mut siblings: Vec<&str> = packages
        .iter()
        .map(|pkg| pkg.name())
        .filter(|name| name.starts_with(&prefix))
        .collect();
    siblings.sort_unstable();
    info!(hub = %config.hub, plugins = ?siblings, "located plugin packages");

    let hub = packages
        .get(&config.hub)
        .ok_or_else(|| Error::UnknownPackage(config.hub.clone()))?;

    let missing: Vec<&str> = siblings
        .iter()
        .filter(|name| !hub.manifest.declares(name))
        .copied()
        .collect();

    if missing.is_empty() {
        info!(hub = %config.hub, "hub package is up to date");
        return Ok(CheckOutcome::default());
    }

    if dry_run {
        return Err(Error::RegistrationDrift {
            missing: missing.iter().map(ToString::to_string).collect(),
        });
    }

    let mut contents = String::new();
    for name in &siblings {
        contents.push_str(&format!("import '{name}';\n"));
    }
    let manifest_path = hub.dir.join(IMPORT_MANIFEST_PATH);
    info!(path = %manifest_path.display(), "regenerating plugin import manifest");
    atomic_write(&manifest_path, contents.as_bytes())?;
    info!("wrote plugin import manifest; checking consistency to install new imports");

    check_consistency(packages, config, detector, pm, false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::MANIFEST_FILE;
    use crate::scan::scan_packages;
    use crate::usage::UsageFinding;
    use monoguard_util::hash::file_hash;
    use std::collections::BTreeSet;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;
    use tempfile::tempdir;

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

    fn add_package(root: &Path, name: &str, deps: &[&str]) -> PathBuf {
        let dir = root.join("packages").join(name);
        fs::create_dir_all(dir.join("src")).unwrap();
        let deps_obj: serde_json::Map<String, serde_json::Value> = deps
            .iter()
            .map(|d| ((*d).to_string(), serde_json::json!("*")))
            .collect();
        let manifest = serde_json::json!({ "name": name, "dependencies": deps_obj });
        fs::write(
            dir.join(MANIFEST_FILE),
            serde_json::to_string_pretty(&manifest).unwrap(),
        )
        .unwrap();
        dir
    }

    /// Detector fake deriving the hub's missing imports from the generated
    /// import manifest, the way depcheck would see them.
    struct ImportManifestDetector;

    impl UsageDetector for ImportManifestDetector {
        fn analyze(&self, pkg_dir: &Path) -> Result<UsageFinding, Error> {
            let mut finding = UsageFinding::default();
            let Ok(generated) = fs::read_to_string(pkg_dir.join(IMPORT_MANIFEST_PATH)) else {
                return Ok(finding);
            };
            let declared = declared_deps(pkg_dir);
            for line in generated.lines() {
                let Some(name) = line
                    .strip_prefix("import '")
                    .and_then(|rest| rest.strip_suffix("';"))
                else {
                    continue;
                };
                if !declared.contains(name) {
                    finding
                        .missing
                        .insert(name.to_string(), vec!["src/manifest.ts".to_string()]);
                }
            }
            Ok(finding)
        }
    }

    fn declared_deps(pkg_dir: &Path) -> BTreeSet<String> {
        let doc: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(pkg_dir.join(MANIFEST_FILE)).unwrap(),
        )
        .unwrap();
        doc["dependencies"]
            .as_object()
            .map(|deps| deps.keys().cloned().collect())
            .unwrap_or_default()
    }

    #[derive(Default)]
    struct RecordingPm {
        calls: Mutex<Vec<String>>,
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

    fn plugin_fixture(root: &Path) -> (RepoConfig, PathBuf) {
        let hub_dir = add_package(root, "@acme/cli", &["@acme/cli-p1", "@acme/cli-p3"]);
        add_package(root, "@acme/cli-p1", &[]);
        add_package(root, "@acme/cli-p2", &[]);
        add_package(root, "@acme/cli-p3", &[]);
        (test_config(root), hub_dir)
    }

    #[test]
    fn test_registration_regenerates_manifest_and_fills_hub() {
        let root = tempdir().unwrap();
        let (config, hub_dir) = plugin_fixture(root.path());
        let packages = scan_packages(&config).unwrap();

        let pm = RecordingPm::default();
        let outcome =
            register_plugins(&packages, &config, &ImportManifestDetector, &pm, false).unwrap();
        assert!(outcome.changed);

        let generated = fs::read_to_string(hub_dir.join(IMPORT_MANIFEST_PATH)).unwrap();
        assert_eq!(
            generated,
            "import '@acme/cli-p1';\nimport '@acme/cli-p2';\nimport '@acme/cli-p3';\n"
        );

        // The missing plugin landed in the hub manifest with a wildcard.
        let doc: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(hub_dir.join(MANIFEST_FILE)).unwrap(),
        )
        .unwrap();
        assert_eq!(doc["dependencies"]["@acme/cli-p2"], "*");
        assert_eq!(doc["dependencies"]["@acme/cli-p1"], "*");
    }

    #[test]
    fn test_dry_run_drift_fails_without_writes() {
        let root = tempdir().unwrap();
        let (config, hub_dir) = plugin_fixture(root.path());
        let packages = scan_packages(&config).unwrap();

        let hub_hash = file_hash(&hub_dir.join(MANIFEST_FILE)).unwrap();
        let pm = RecordingPm::default();
        let err =
            register_plugins(&packages, &config, &ImportManifestDetector, &pm, true).unwrap_err();

        match err {
            Error::RegistrationDrift { missing } => {
                assert_eq!(missing, vec!["@acme/cli-p2".to_string()]);
            }
            other => panic!("expected RegistrationDrift, got {other:?}"),
        }
        assert!(!hub_dir.join(IMPORT_MANIFEST_PATH).exists());
        assert_eq!(hub_hash, file_hash(&hub_dir.join(MANIFEST_FILE)).unwrap());
        assert!(pm.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_up_to_date_hub_is_a_no_op() {
        let root = tempdir().unwrap();
        add_package(
            root.path(),
            "@acme/cli",
            &["@acme/cli-p1", "@acme/cli-p2", "@acme/cli-p3"],
        );
        add_package(root.path(), "@acme/cli-p1", &[]);
        add_package(root.path(), "@acme/cli-p2", &[]);
        add_package(root.path(), "@acme/cli-p3", &[]);
        let config = test_config(root.path());
        let packages = scan_packages(&config).unwrap();

        let pm = RecordingPm::default();
        let outcome =
            register_plugins(&packages, &config, &ImportManifestDetector, &pm, false).unwrap();
        assert!(!outcome.changed);
        assert!(pm.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_missing_hub_package_is_fatal() {
        let root = tempdir().unwrap();
        add_package(root.path(), "@acme/cli-p1", &[]);
        let config = test_config(root.path());
        let packages = scan_packages(&config).unwrap();

        let pm = RecordingPm::default();
        let err =
            register_plugins(&packages, &config, &ImportManifestDetector, &pm, false).unwrap_err();
        assert!(matches!(err, Error::UnknownPackage(_)));
    }

    #[test]
    fn test_hub_itself_is_not_a_sibling() {
        // A hub depending on all plugins plus itself-adjacent names must not
        // be asked to import itself.
        let root = tempdir().unwrap();
        add_package(root.path(), "@acme/cli", &["@acme/cli-p1"]);
        add_package(root.path(), "@acme/cli-p1", &[]);
        let config = test_config(root.path());
        let packages = scan_packages(&config).unwrap();

        let pm = RecordingPm::default();
        let outcome =
            register_plugins(&packages, &config, &ImportManifestDetector, &pm, false).unwrap();
        assert!(!outcome.changed);
    }
}
