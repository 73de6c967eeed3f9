//! Streaming SHA-256 content digests.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, SweeperError};

/// Bytes read per chunk; files are never loaded whole.
const CHUNK_SIZE: usize = 16 * 1024;

/// Compute the hex-encoded SHA-256 digest of a file's contents.
pub fn hash_file(path: &Path) -> Result<String> {
    let read_err = |source| SweeperError::Read {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::open(path).map_err(read_err)?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; CHUNK_SIZE];

    loop {
        let n = match file.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(read_err(e)),
        };
        hasher.update(&buffer[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_identical_content_identical_digest() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a"), b"same bytes").unwrap();
        fs::write(tmp.path().join("b"), b"same bytes").unwrap();

        let a = hash_file(&tmp.path().join("a")).unwrap();
        let b = hash_file(&tmp.path().join("b")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_content_different_digest() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a"), b"one").unwrap();
        fs::write(tmp.path().join("b"), b"two").unwrap();

        let a = hash_file(&tmp.path().join("a")).unwrap();
        let b = hash_file(&tmp.path().join("b")).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_known_digest_of_empty_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("empty"), b"").unwrap();

        assert_eq!(
            hash_file(&tmp.path().join("empty")).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_multi_chunk_file() {
        let tmp = TempDir::new().unwrap();
        let data = vec![7u8; CHUNK_SIZE * 3 + 17];
        fs::write(tmp.path().join("big"), &data).unwrap();

        let digest = hash_file(&tmp.path().join("big")).unwrap();
        assert_eq!(digest.len(), 64);
        assert_eq!(digest, format!("{:x}", Sha256::digest(&data)));
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let tmp = TempDir::new().unwrap();
        let result = hash_file(&tmp.path().join("missing"));
        assert!(matches!(result, Err(SweeperError::Read { .. })));
    }
}
