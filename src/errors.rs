use thiserror::Error;

/// Errors that can arise while interacting with the player data store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around bincode serialization and deserialization errors.
    #[error("serialization error: {0}")]
    Bincode(#[from] bincode::Error),

    /// Wrapper around IO errors (export files, directory creation, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Returned when fetching a record that is not present.
    #[error("record not found: {0}")]
    NotFound(String),

    /// Returned when deserializing a record with an unexpected schema version.
    #[error("schema mismatch for {entity}: expected {expected}, got {found}")]
    SchemaMismatch {
        entity: &'static str,
        expected: u8,
        found: u8,
    },

    /// Export/import file stem that would escape the data directory.
    #[error("invalid file name: {0}")]
    InvalidFileName(String),

    /// A CSV row that could not be turned into a player record.
    #[error("malformed csv at line {line}: {reason}")]
    MalformedCsv { line: usize, reason: String },
}
