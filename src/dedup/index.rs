use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::PathBuf;

use super::record::FileRecord;

/// How a scanned file relates to what the index has already seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// First file with this digest; retained and never deleted.
    Original,
    /// Same digest and size as a retained original.
    Duplicate { original: PathBuf },
    /// Same digest but a different size. Treated as a false positive:
    /// neither retained nor reported.
    Collision { original: PathBuf },
}

/// Digest -> first-seen file for one scan.
#[derive(Debug, Default)]
pub struct DedupIndex {
    originals: HashMap<String, FileRecord>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify `record`, retaining it if its digest is new.
    pub fn classify(&mut self, record: &FileRecord) -> Classification {
        match self.originals.entry(record.digest().to_string()) {
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Classification::Original
            }
            Entry::Occupied(slot) => {
                let original = slot.get();
                if original.size() == record.size() {
                    Classification::Duplicate {
                        original: original.path().to_path_buf(),
                    }
                } else {
                    Classification::Collision {
                        original: original.path().to_path_buf(),
                    }
                }
            }
        }
    }

    /// The retained original for `digest`, if any.
    pub fn original(&self, digest: &str) -> Option<&FileRecord> {
        self.originals.get(digest)
    }

    /// Number of retained originals.
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn record(path: &str, size: u64, digest: &str) -> FileRecord {
        FileRecord::new(path, path, size, "Unknown", digest)
    }

    #[test]
    fn test_first_file_is_original() {
        let mut index = DedupIndex::new();
        assert_eq!(index.classify(&record("/a", 10, "d1")), Classification::Original);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_same_digest_same_size_is_duplicate() {
        let mut index = DedupIndex::new();
        index.classify(&record("/a", 10, "d1"));

        assert_eq!(
            index.classify(&record("/b", 10, "d1")),
            Classification::Duplicate {
                original: PathBuf::from("/a")
            }
        );
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_original_is_first_visited() {
        let mut index = DedupIndex::new();
        index.classify(&record("/a", 10, "d1"));
        index.classify(&record("/b", 10, "d1"));
        index.classify(&record("/c", 10, "d1"));

        assert_eq!(index.original("d1").unwrap().path(), Path::new("/a"));
    }

    #[test]
    fn test_size_mismatch_is_collision_and_not_retained() {
        let mut index = DedupIndex::new();
        index.classify(&record("/a", 10, "d1"));

        assert_eq!(
            index.classify(&record("/b", 11, "d1")),
            Classification::Collision {
                original: PathBuf::from("/a")
            }
        );
        // The colliding file never replaces the original
        assert_eq!(index.original("d1").unwrap().path(), Path::new("/a"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_distinct_digests_are_all_originals() {
        let mut index = DedupIndex::new();
        for (i, digest) in ["d1", "d2", "d3"].iter().enumerate() {
            let path = format!("/f{}", i);
            assert_eq!(
                index.classify(&record(&path, 10, digest)),
                Classification::Original
            );
        }
        assert_eq!(index.len(), 3);
    }
}
