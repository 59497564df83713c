//! Lyrics lookup for local audio files.
//!
//! Sources, in order of preference:
//! 1. The embedded lyrics tag, when it is synchronized.
//! 2. The first synchronized sidecar file next to the audio file.
//! 3. The last plain sidecar file seen, then the embedded tag as-is.
//!
//! Sidecars are matched by name (the audio file stem or the track title)
//! and restricted to the audio file's own directory.

mod resolve;
mod sync;
mod tag;

use std::path::PathBuf;

pub use resolve::LyricsResolver;
pub use sync::{LrcTimestamps, SyncPredicate};
pub use tag::{AudioTagReader, LoftyTagReader};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LyricsSource {
    Embedded,
    Sidecar(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lyrics {
    pub text: String,
    /// Whether `text` carries per-line timestamps.
    pub synchronized: bool,
    pub source: LyricsSource,
}

#[cfg(test)]
mod tests;
