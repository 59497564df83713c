//! Batched removal of tracks from the queue, the catalog and the disk.
//!
//! The catalog accepts deletions as a single `<id_column> IN (...)` request
//! whose rendered length is capped (`deletion.max_query_bytes`). Tracks are
//! therefore processed in consecutive batches sized from that byte budget.
//! Each batch commits fully before the next one starts; nothing is rolled
//! back.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::DeletionSettings;
use crate::error::{CatalogError, FileDeleteError};
use crate::queue::PlaybackQueue;
use crate::storage::{FileDeleter, StorageHandle};

use super::catalog::Catalog;
use super::display::song_count_string;
use super::model::{Track, TrackId};

/// Rendered width of the widest id, `i64::MIN`.
pub const MAX_ID_WIDTH: usize = 20;

/// Number of ids that always fit in one selection clause.
///
/// Never less than one: a budget too small for a single id still yields
/// single-track batches.
pub fn batch_capacity(max_query_bytes: usize, id_column: &str) -> usize {
    // "<col> IN (" + ")"
    let overhead = id_column.len() + 6;
    // n ids take n * width + (n - 1) commas.
    let per_id = MAX_ID_WIDTH + 1;
    ((max_query_bytes.saturating_sub(overhead) + 1) / per_id).max(1)
}

/// Byte length of [`selection_clause`] for `ids`, without rendering it.
pub fn selection_clause_len(id_column: &str, ids: &[TrackId]) -> usize {
    let digits: usize = ids.iter().map(|&id| id_width(id)).sum();
    id_column.len() + 6 + digits + ids.len().saturating_sub(1)
}

fn id_width(id: TrackId) -> usize {
    let sign = usize::from(id < 0);
    sign + id.unsigned_abs().checked_ilog10().map_or(1, |d| d as usize + 1)
}

/// Render the selection clause sent to the catalog for `ids`.
pub fn selection_clause(id_column: &str, ids: &[TrackId]) -> String {
    let list: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    format!("{id_column} IN ({})", list.join(","))
}

#[derive(Debug)]
pub struct FileFailure {
    pub id: TrackId,
    pub path: PathBuf,
    pub error: FileDeleteError,
}

/// A batch whose catalog deletion failed. Its files were left in place.
#[derive(Debug)]
pub struct BatchFailure {
    pub index: usize,
    pub ids: Vec<TrackId>,
    pub error: CatalogError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeletionProgress {
    /// Zero-based index of the batch just finished.
    pub batch: usize,
    pub batches: usize,
    /// Tracks handled so far, across all finished batches.
    pub processed: usize,
    pub total: usize,
}

/// Outcome of one [`BatchDeleter::delete_tracks`] call.
#[derive(Debug, Default)]
pub struct DeletionReport {
    pub requested: usize,
    pub removed_from_catalog: usize,
    pub files_deleted: usize,
    /// Requested tracks the catalog no longer knew about.
    pub missing: usize,
    pub file_failures: Vec<FileFailure>,
    pub failed_batches: Vec<BatchFailure>,
    /// Set when the cancel flag stopped the run between batches.
    pub cancelled: bool,
}

impl DeletionReport {
    pub fn is_clean(&self) -> bool {
        self.file_failures.is_empty() && self.failed_batches.is_empty() && !self.cancelled
    }
}

impl fmt::Display for DeletionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Deleted {}", song_count_string(self.removed_from_catalog))?;
        if !self.file_failures.is_empty() {
            write!(f, ", {} could not be removed from disk", self.file_failures.len())?;
        }
        if !self.failed_batches.is_empty() {
            write!(f, ", {} batches failed", self.failed_batches.len())?;
        }
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}

pub struct BatchDeleter<'a> {
    catalog: &'a dyn Catalog,
    queue: &'a dyn PlaybackQueue,
    files: &'a dyn FileDeleter,
    id_column: String,
    capacity: usize,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> BatchDeleter<'a> {
    pub fn new(
        catalog: &'a dyn Catalog,
        queue: &'a dyn PlaybackQueue,
        files: &'a dyn FileDeleter,
        settings: &DeletionSettings,
    ) -> Self {
        Self {
            catalog,
            queue,
            files,
            id_column: settings.id_column.clone(),
            capacity: batch_capacity(settings.max_query_bytes, &settings.id_column),
            cancel: None,
        }
    }

    /// Stop before the next batch once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: &'a AtomicBool) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn batch_capacity(&self) -> usize {
        self.capacity
    }

    /// Split `tracks` into the consecutive batches `delete_tracks` will issue.
    pub fn batches<'t>(&self, tracks: &'t [Track]) -> std::slice::Chunks<'t, Track> {
        tracks.chunks(self.capacity)
    }

    /// Delete `tracks` batch by batch.
    ///
    /// `handles[i]` belongs to `tracks[i]`; a shorter (or missing) list just
    /// means the remaining tracks have no handle. Failures never abort the
    /// run, they are collected into the returned report.
    pub fn delete_tracks(
        &self,
        tracks: &[Track],
        handles: Option<&[StorageHandle]>,
        mut on_progress: Option<&mut dyn FnMut(DeletionProgress)>,
    ) -> DeletionReport {
        let mut report = DeletionReport {
            requested: tracks.len(),
            ..DeletionReport::default()
        };
        if tracks.is_empty() {
            return report;
        }

        let batches = tracks.len().div_ceil(self.capacity);
        let mut processed = 0;
        // Each catalog row is removed and counted once, even if listed twice.
        let mut seen: HashSet<TrackId> = HashSet::with_capacity(tracks.len());

        for (index, batch) in self.batches(tracks).enumerate() {
            if self.cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
                tracing::info!(batch = index, batches, "deletion cancelled");
                report.cancelled = true;
                break;
            }

            let start = index * self.capacity;
            self.delete_batch(index, start, batch, handles, &mut seen, &mut report);
            processed += batch.len();

            if let Some(cb) = on_progress.as_mut() {
                cb(DeletionProgress {
                    batch: index,
                    batches,
                    processed,
                    total: tracks.len(),
                });
            }
        }

        tracing::info!(
            requested = report.requested,
            removed = report.removed_from_catalog,
            files_deleted = report.files_deleted,
            missing = report.missing,
            file_failures = report.file_failures.len(),
            failed_batches = report.failed_batches.len(),
            "track deletion finished"
        );
        report
    }

    fn delete_batch(
        &self,
        index: usize,
        start: usize,
        batch: &[Track],
        handles: Option<&[StorageHandle]>,
        seen: &mut HashSet<TrackId>,
        report: &mut DeletionReport,
    ) {
        let mut ids: Vec<TrackId> = Vec::with_capacity(batch.len());
        // Rows still in the catalog, paired with their position in the input.
        let mut present: Vec<(usize, Track)> = Vec::with_capacity(batch.len());
        for (offset, track) in batch.iter().enumerate() {
            if !seen.insert(track.id) {
                continue;
            }
            ids.push(track.id);
            match self.catalog.lookup(track.id) {
                Some(row) => present.push((start + offset, row)),
                None => report.missing += 1,
            }
        }
        if ids.is_empty() {
            return;
        }
        tracing::debug!(
            batch = index,
            size = ids.len(),
            clause_bytes = selection_clause_len(&self.id_column, &ids),
            "deleting batch"
        );

        for track in batch {
            self.queue.remove(track);
        }

        if let Err(error) = self.catalog.delete_by_ids(&ids) {
            tracing::warn!(
                batch = index,
                size = ids.len(),
                error = %error,
                "catalog deletion failed"
            );
            report.failed_batches.push(BatchFailure { index, ids, error });
            return;
        }
        report.removed_from_catalog += present.len();

        for (position, row) in present {
            let handle = handles.and_then(|h| h.get(position));
            match self.files.delete(&row.path, handle) {
                Ok(()) => report.files_deleted += 1,
                Err(error) => {
                    tracing::warn!(
                        id = row.id,
                        path = %row.path.display(),
                        error = %error,
                        "file deletion failed"
                    );
                    report.file_failures.push(FileFailure {
                        id: row.id,
                        path: row.path,
                        error,
                    });
                }
            }
        }
    }
}
