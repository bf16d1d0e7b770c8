//! File-set resolution for scoped builds.
//!
//! Given a package and the computed closures, enumerates the minimal set of
//! repository-relative files needed to build or execute that package
//! standalone: its own files plus those of every transitive internal
//! dependency, with test files excluded. No unrelated package's files are
//! included and no required file is omitted. Output order is unspecified;
//! callers needing determinism sort explicitly.

use std::io;
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::graph::ClosureSet;
use crate::scan::PackageSet;

/// Marker identifying test files, excluded from every resolved file set.
pub const TEST_FILE_MARKER: &str = ".spec.";

/// Filesystem-listing collaborator: recursively lists the files of one
/// package directory, excluding its dependency-installation subtree.
/// Returned paths are relative to the package directory.
pub trait FileLister {
    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;
}

/// Production lister backed by walkdir.
#[derive(Debug, Default)]
pub struct WalkdirLister;

impl FileLister for WalkdirLister {
    fn list_files(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        monoguard_util::fs::list_package_files(dir)
    }
}

/// Resolve the file set of `name` plus its transitive closure.
pub fn resolve_file_set(
    name: &str,
    packages: &PackageSet,
    closures: &ClosureSet,
    lister: &dyn FileLister,
) -> Result<Vec<PathBuf>, Error> {
    let closure = closures
        .get(name)
        .ok_or_else(|| Error::UnknownPackage(name.to_string()))?;

    let mut wanted: Vec<&str> = vec![name];
    wanted.extend(closure.iter().map(String::as_str));

    let mut files = Vec::new();
    for member in wanted {
        // A declared-but-absent internal dependency has no directory to list.
        let Some(pkg) = packages.get(member) else {
            continue;
        };
        for file in lister.list_files(&pkg.dir)? {
            if file.to_string_lossy().contains(TEST_FILE_MARKER) {
                continue;
            }
            files.push(pkg.rel_dir.join(file));
        }
    }

    Ok(files)
}
