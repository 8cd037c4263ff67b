use std::{
    io::Error,
    path::{Path, PathBuf},
};

use crate::types::TrackDescriptor;

#[derive(Debug)]
pub enum SnapshotError {
    IoError(Error),
    SerdeError(serde_json::Error),
}

impl From<Error> for SnapshotError {
    fn from(err: Error) -> Self {
        SnapshotError::IoError(err)
    }
}

pub struct SnapshotManager {
    tracks: Vec<TrackDescriptor>,
}

impl SnapshotManager {
    pub fn new(tracks: Vec<TrackDescriptor>) -> Self {
        Self { tracks }
    }

    pub async fn persist(&self, output_dir: &Path) -> Result<PathBuf, SnapshotError> {
        async_fs::create_dir_all(output_dir)
            .await
            .map_err(|e| SnapshotError::IoError(e))?;

        let path = output_dir.join("resolved-tracks.json");
        let json = serde_json::to_string_pretty(&self.tracks)
            .map_err(|e| SnapshotError::SerdeError(e))?;
        async_fs::write(&path, json)
            .await
            .map_err(|e| SnapshotError::IoError(e))?;

        Ok(path)
    }
}
