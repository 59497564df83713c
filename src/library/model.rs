use std::path::PathBuf;

/// Catalog identifier of a track.
pub type TrackId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Track {
    pub id: TrackId,
    pub path: PathBuf,
    pub title: String,
    /// Duration in milliseconds.
    pub duration_ms: u64,
}

impl Track {
    pub fn new(
        id: TrackId,
        path: impl Into<PathBuf>,
        title: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id,
            path: path.into(),
            title: title.into(),
            duration_ms,
        }
    }
}
