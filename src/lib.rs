//! Library maintenance core for a music player.
//!
//! Two independent operations live here:
//! - [`BatchDeleter::delete_tracks`] removes tracks from the playback queue,
//!   the catalog and the filesystem in query-sized batches.
//! - [`LyricsResolver::resolve`] finds lyrics for a track, preferring
//!   synchronized text from the embedded tag or a sidecar file.
//!
//! Every collaborator (catalog, queue, file deleter, tag reader,
//! synchronization predicate) is passed in explicitly.

pub mod config;
pub mod error;
pub mod library;
pub mod lyrics;
pub mod queue;
pub mod storage;

pub use crate::config::Settings;
pub use error::{CatalogError, ConfigError, FileDeleteError, TagError};
pub use library::{
    BatchDeleter, BatchFailure, Catalog, DeletionProgress, DeletionReport, FileFailure,
    MemoryCatalog, Track, TrackId,
};
pub use lyrics::{
    AudioTagReader, LoftyTagReader, LrcTimestamps, Lyrics, LyricsResolver, LyricsSource,
    SyncPredicate,
};
pub use queue::{PlaybackQueue, PlayingQueue, SharedQueue};
pub use storage::{FileDeleter, LocalFileDeleter, StorageHandle};
