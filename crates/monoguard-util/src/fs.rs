use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory name of a package's dependency-installation subtree. Never
/// scanned, listed, or counted as package content.
pub const DEP_TREE_DIR: &str = "node_modules";

/// Recursively list the files of one package directory, pruning the
/// dependency-installation subtree.
///
/// Returned paths are relative to `dir`. Directories themselves are not
/// included. Order follows directory traversal and is unspecified.
pub fn list_package_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .into_iter()
        .filter_entry(|e| e.file_name() != DEP_TREE_DIR);

    for entry in walker {
        let entry = entry.map_err(io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(dir)
            .map_err(io::Error::other)?
            .to_path_buf();
        files.push(rel);
    }

    Ok(files)
}

/// Write a file in full via a temp file and rename.
///
/// A crash mid-write leaves either the old contents or the new contents on
/// disk, never a half-written file.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path.parent().unwrap_or(Path::new("."));
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("file");
    let tmp = parent.join(format!(".{file_name}.monoguard.tmp"));

    {
        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }

    match fs::rename(&tmp, path) {
        Ok(()) => Ok(()),
        Err(e) => {
            let _ = fs::remove_file(&tmp);
            Err(e)
        }
    }
}
