//! The catalog seam: the persistent index of known tracks.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::error::CatalogError;

use super::model::{Track, TrackId};

/// Queryable store of track records.
///
/// Implementations own their concurrency; every method takes `&self`.
pub trait Catalog {
    fn lookup(&self, id: TrackId) -> Option<Track>;

    /// Delete every row whose id is in `ids`, as a single request.
    fn delete_by_ids(&self, ids: &[TrackId]) -> Result<(), CatalogError>;
}

/// In-process catalog backed by an ordered map.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    rows: Mutex<BTreeMap<TrackId, Track>>,
}

impl MemoryCatalog {
    pub fn new(tracks: impl IntoIterator<Item = Track>) -> Self {
        Self {
            rows: Mutex::new(tracks.into_iter().map(|t| (t.id, t)).collect()),
        }
    }

    pub fn insert(&self, track: Track) {
        if let Ok(mut rows) = self.rows.lock() {
            rows.insert(track.id, track);
        }
    }

    pub fn len(&self) -> usize {
        self.rows.lock().map(|rows| rows.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Catalog for MemoryCatalog {
    fn lookup(&self, id: TrackId) -> Option<Track> {
        self.rows.lock().ok()?.get(&id).cloned()
    }

    fn delete_by_ids(&self, ids: &[TrackId]) -> Result<(), CatalogError> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|e| CatalogError::Unavailable(e.to_string()))?;
        for id in ids {
            rows.remove(id);
        }
        Ok(())
    }
}
