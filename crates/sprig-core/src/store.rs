use std::path::Path;

use crate::error::AppError;
use crate::models::ValidatedProfile;
use crate::traits::ProfileStore;

/// Canonical JSON for a profile: two-space indentation, fixed key order.
pub fn serialize(profile: &ValidatedProfile) -> Result<Vec<u8>, AppError> {
    Ok(serde_json::to_vec_pretty(profile)?)
}

/// Writes results to the local filesystem, replacing existing files.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStore;

impl ProfileStore for FsStore {
    async fn write(&self, bytes: &[u8], path: &Path) -> Result<(), AppError> {
        tokio::fs::write(path, bytes)
            .await
            .map_err(|source| AppError::WriteError {
                path: path.to_path_buf(),
                source,
            })
    }
}
