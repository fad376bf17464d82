//! Snapshot encoding errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Could not encode registry snapshot: {0}")]
    SerializationFailed(String),

    #[error("Could not decode registry snapshot: {0}")]
    DeserializationFailed(String),

    /// Snapshot was produced by a different format version
    #[error("Snapshot format version {found} is not supported (expected {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
}
