use crate::errors::SnapshotError;

/// Persistence backend for encoded engine snapshots.
pub trait ISnapshotStore: Send + Sync {
    /// Replace the stored snapshot with `bytes`.
    fn save(&self, bytes: &[u8]) -> Result<(), SnapshotError>;

    /// Load the stored snapshot. `SnapshotError::Missing` if nothing was saved.
    fn load(&self) -> Result<Vec<u8>, SnapshotError>;
}
