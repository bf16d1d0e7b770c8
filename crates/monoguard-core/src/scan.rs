//! Manifest discovery across the repository.
//!
//! Scans `<packages-dir>/**/package.json`, skipping anything under a
//! dependency-installation subtree. Manifest reads are independent and fan
//! out on rayon, joining at a barrier before the set is assembled. Every
//! manifest is collocation-checked: the declared name must equal the
//! directory path relative to the packages root.

use rayon::prelude::*;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::RepoConfig;
use crate::error::Error;
use crate::manifest::{Manifest, MANIFEST_FILE};
use monoguard_util::fs::DEP_TREE_DIR;

/// A discovered internal package.
#[derive(Debug, Clone)]
pub struct Package {
    /// Parsed manifest.
    pub manifest: Manifest,
    /// Absolute path to the package directory.
    pub dir: PathBuf,
    /// Root-relative package directory (e.g. `packages/@acme/logger`), the
    /// workspace path handed to the package manager.
    pub rel_dir: PathBuf,
}

impl Package {
    /// Package name, as declared and collocation-checked.
    #[must_use]
    pub fn name(&self) -> &str {
        self.manifest.name()
    }
}

/// The scanned set of internal packages, ordered by name.
///
/// Name order is the deterministic "scan order" used everywhere a
/// per-package sequence matters (dry-run short-circuiting, fix sequencing).
#[derive(Debug, Clone, Default)]
pub struct PackageSet {
    packages: BTreeMap<String, Package>,
}

impl PackageSet {
    /// Look up a package by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Package> {
        self.packages.get(name)
    }

    /// Whether a package with this name was scanned.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Iterate packages in scan order.
    pub fn iter(&self) -> impl Iterator<Item = &Package> {
        self.packages.values()
    }

    /// Number of scanned packages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Whether the scan found no packages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

/// Discover every internal package manifest under the repository root.
pub fn scan_packages(config: &RepoConfig) -> Result<PackageSet, Error> {
    let pattern = config
        .packages_root()
        .join("**")
        .join(MANIFEST_FILE)
        .to_string_lossy()
        .into_owned();

    let mut paths = Vec::new();
    for entry in glob::glob(&pattern)
        .map_err(|e| Error::Config(format!("invalid discovery pattern '{pattern}': {e}")))?
    {
        let path = entry.map_err(glob::GlobError::into_error)?;
        if path.components().any(|c| c.as_os_str() == DEP_TREE_DIR) {
            continue;
        }
        paths.push(path);
    }

    // Reads are independent; fan out and join before assembling the set.
    let scanned: Vec<Package> = paths
        .par_iter()
        .map(|path| read_package(config, path))
        .collect::<Result<_, _>>()?;

    let mut packages = BTreeMap::new();
    for pkg in scanned {
        packages.insert(pkg.name().to_string(), pkg);
    }

    Ok(PackageSet { packages })
}

fn read_package(config: &RepoConfig, manifest_path: &Path) -> Result<Package, Error> {
    let manifest = Manifest::read(manifest_path)?;
    let dir = manifest_path
        .parent()
        .unwrap_or(Path::new("."))
        .to_path_buf();

    let derived = derived_name(config, &dir)?;
    if manifest.name() != derived {
        return Err(Error::ManifestMismatch {
            declared: manifest.name().to_string(),
            derived,
            path: manifest_path.to_path_buf(),
        });
    }

    let rel_dir = dir
        .strip_prefix(&config.root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| dir.clone());

    Ok(Package {
        manifest,
        dir,
        rel_dir,
    })
}

/// Derive the expected package name from a directory under the packages root.
fn derived_name(config: &RepoConfig, dir: &Path) -> Result<String, Error> {
    let rel = dir.strip_prefix(config.packages_root()).map_err(|_| {
        Error::Config(format!(
            "package directory {} is outside the packages root",
            dir.display()
        ))
    })?;
    Ok(rel
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/"))
}
