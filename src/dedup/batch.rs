use super::record::FileRecord;

/// Duplicates shown per confirmation prompt unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 15;

/// Duplicates handed to the deleter together, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateBatch {
    files: Vec<FileRecord>,
}

impl DuplicateBatch {
    pub fn new(files: Vec<FileRecord>) -> Self {
        Self { files }
    }

    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Bytes reclaimed if every file in the batch is removed.
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(FileRecord::size).sum()
    }
}

/// Accumulates duplicates and cuts a batch whenever the cap is reached.
#[derive(Debug)]
pub struct BatchCollector {
    capacity: usize,
    pending: Vec<FileRecord>,
}

impl BatchCollector {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            pending: Vec::with_capacity(capacity),
        }
    }

    /// Add a duplicate. Returns a full batch when this push reaches the cap.
    pub fn push(&mut self, record: FileRecord) -> Option<DuplicateBatch> {
        self.pending.push(record);
        if self.pending.len() >= self.capacity {
            let files = std::mem::replace(&mut self.pending, Vec::with_capacity(self.capacity));
            Some(DuplicateBatch::new(files))
        } else {
            None
        }
    }

    /// Hand over whatever is left, if anything.
    pub fn finish(self) -> Option<DuplicateBatch> {
        if self.pending.is_empty() {
            None
        } else {
            Some(DuplicateBatch::new(self.pending))
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
