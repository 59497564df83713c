//! The playback queue seam and an in-process queue.
//!
//! Deleting tracks must also drop them from whatever is queued. The queue
//! keeps a `position` pointing at the current entry, which has to stay on
//! the same track (or its successor) while entries around it disappear.

use std::sync::{Arc, Mutex};

use crate::library::{Track, TrackId};

/// Ordered, mutable list of enqueued tracks.
pub trait PlaybackQueue {
    /// Remove every occurrence of `track`. Removing a track that is not
    /// queued is a no-op.
    fn remove(&self, track: &Track);
}

#[derive(Debug, Clone, Default)]
pub struct PlayingQueue {
    pub tracks: Vec<Track>,
    /// Index of the current entry.
    pub position: usize,
}

impl PlayingQueue {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self {
            tracks,
            position: 0,
        }
    }

    pub fn current(&self) -> Option<&Track> {
        self.tracks.get(self.position)
    }

    pub fn remove_id(&mut self, id: TrackId) {
        remove_in_place(&mut self.tracks, &mut self.position, id);
    }
}

pub(crate) fn remove_in_place(queue: &mut Vec<Track>, position: &mut usize, id: TrackId) {
    // Entries before the current one shift it left.
    let before = queue
        .iter()
        .take(*position)
        .filter(|t| t.id == id)
        .count();
    queue.retain(|t| t.id != id);
    *position -= before;
    if *position >= queue.len() {
        *position = queue.len().saturating_sub(1);
    }
}

/// Thread-safe handle to a [`PlayingQueue`] shared with the player.
#[derive(Debug, Clone, Default)]
pub struct SharedQueue(Arc<Mutex<PlayingQueue>>);

impl SharedQueue {
    pub fn new(queue: PlayingQueue) -> Self {
        Self(Arc::new(Mutex::new(queue)))
    }

    pub fn snapshot(&self) -> PlayingQueue {
        self.0
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl PlaybackQueue for SharedQueue {
    fn remove(&self, track: &Track) {
        let mut q = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        q.remove_id(track.id);
    }
}
