use std::path::Path;
use walkdir::WalkDir;

use crate::error::{Result, SweeperError};

/// Sum the sizes of every non-directory entry beneath `path`.
///
/// Directories contribute nothing. Any unreadable entry fails the whole
/// measurement so callers never act on a partial total.
pub fn dir_size(path: &Path) -> Result<u64> {
    let mut total = 0u64;

    for entry in WalkDir::new(path) {
        let entry = entry.map_err(|source| SweeperError::SizeProbe {
            path: path.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_dir() {
            continue;
        }

        let metadata = entry.metadata().map_err(|source| SweeperError::SizeProbe {
            path: path.to_path_buf(),
            source,
        })?;
        total += metadata.len();
    }

    Ok(total)
}

/// Format size in human-readable format, always with two decimals.
pub fn format_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    format!("{:.2} {}", size, UNITS[unit_idx])
}

/// Parse a size string like "1GB" into bytes
pub fn parse_size(s: &str) -> Option<u64> {
    let s = s.trim().to_uppercase();

    let (num_str, unit) = if let Some(n) = s.strip_suffix("TB") {
        (n, 1024u64.pow(4))
    } else if let Some(n) = s.strip_suffix("GB") {
        (n, 1024u64.pow(3))
    } else if let Some(n) = s.strip_suffix("MB") {
        (n, 1024u64.pow(2))
    } else if let Some(n) = s.strip_suffix("KB") {
        (n, 1024u64)
    } else if let Some(n) = s.strip_suffix('B') {
        (n, 1u64)
    } else {
        (s.as_str(), 1u64)
    };

    num_str
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| (n * unit as f64) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_format_size_zero() {
        assert_eq!(format_size(0), "0.00 B");
    }

    #[test]
    fn test_format_size_bytes() {
        assert_eq!(format_size(1), "1.00 B");
        assert_eq!(format_size(1023), "1023.00 B");
    }

    #[test]
    fn test_format_size_kilobytes() {
        assert_eq!(format_size(1024), "1.00 KB");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(1024 * 150), "150.00 KB");
    }

    #[test]
    fn test_format_size_megabytes() {
        assert_eq!(format_size(1048576), "1.00 MB");
        assert_eq!(format_size(1048576 * 5), "5.00 MB");
    }

    #[test]
    fn test_format_size_terabytes_is_largest_unit() {
        assert_eq!(format_size(1099511627776), "1.00 TB");
        assert_eq!(format_size(1099511627776 * 2048), "2048.00 TB");
    }

    #[test]
    fn test_parse_size_plain_number() {
        assert_eq!(parse_size("1024"), Some(1024));
        assert_eq!(parse_size("0"), Some(0));
    }

    #[test]
    fn test_parse_size_with_units() {
        assert_eq!(parse_size("1KB"), Some(1024));
        assert_eq!(parse_size("1 KB"), Some(1024));
        assert_eq!(parse_size("1MB"), Some(1048576));
        assert_eq!(parse_size("1GB"), Some(1073741824));
        assert_eq!(parse_size("1TB"), Some(1099511627776));
        assert_eq!(parse_size("100B"), Some(100));
    }

    #[test]
    fn test_parse_size_decimal_and_case() {
        assert_eq!(parse_size("1.5GB"), Some(1610612736));
        assert_eq!(parse_size("1kb"), Some(1024));
    }

    #[test]
    fn test_parse_size_invalid() {
        assert_eq!(parse_size("invalid"), None);
        assert_eq!(parse_size("abc KB"), None);
        assert_eq!(parse_size("-5"), None);
    }

    #[test]
    fn test_dir_size_sums_nested_files() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("a/b")).unwrap();
        fs::write(tmp.path().join("top.bin"), vec![0u8; 100]).unwrap();
        fs::write(tmp.path().join("a/mid.bin"), vec![0u8; 200]).unwrap();
        fs::write(tmp.path().join("a/b/deep.bin"), vec![0u8; 300]).unwrap();

        assert_eq!(dir_size(tmp.path()).unwrap(), 600);
    }

    #[test]
    fn test_dir_size_empty_dir() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(dir_size(tmp.path()).unwrap(), 0);
    }

    #[test]
    fn test_dir_size_missing_path_fails() {
        let tmp = TempDir::new().unwrap();
        let result = dir_size(&tmp.path().join("missing"));
        assert!(matches!(result, Err(SweeperError::SizeProbe { .. })));
    }
}
