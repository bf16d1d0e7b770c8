use std::io;
use std::path::Path;

/// Hex-encoded BLAKE3 digest of a byte slice.
#[must_use]
pub fn content_hash(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Hex-encoded BLAKE3 digest of a file's contents.
///
/// Tests use this to assert that dry runs leave every manifest untouched.
pub fn file_hash(path: &Path) -> io::Result<String> {
    Ok(content_hash(&std::fs::read(path)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_content_hash_stable() {
        assert_eq!(content_hash(b"{}"), content_hash(b"{}"));
        assert_ne!(content_hash(b"{}"), content_hash(b"{ }"));
    }

    #[test]
    fn test_file_hash_matches_content_hash() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{\"name\":\"@acme/a\"}").unwrap();
        file.flush().unwrap();

        assert_eq!(
            file_hash(file.path()).unwrap(),
            content_hash(b"{\"name\":\"@acme/a\"}")
        );
    }

    #[test]
    fn test_file_hash_missing_file() {
        assert!(file_hash(Path::new("/nonexistent/manifest.json")).is_err());
    }
}
