/// A single write applied as part of an atomic RocksDB batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Put operation
    Put {
        /// Physical key
        key: Vec<u8>,
        /// Encoded value
        value: Vec<u8>,
    },
    /// Delete operation
    Delete {
        /// Physical key
        key: Vec<u8>,
    },
}

impl BatchOperation {
    /// Physical key touched by this operation
    pub fn key(&self) -> &[u8] {
        match self {
            BatchOperation::Put { key, .. } | BatchOperation::Delete { key } => key,
        }
    }
}
