//! Library module: track records, the catalog seam and batched deletion.
//!
//! `delete` holds the deletion pipeline, `display` the formatting glue used
//! when reporting results to the user.

mod catalog;
mod delete;
pub mod display;
mod model;

pub use catalog::{Catalog, MemoryCatalog};
pub use delete::{
    BatchDeleter, BatchFailure, DeletionProgress, DeletionReport, FileFailure, MAX_ID_WIDTH,
    batch_capacity, selection_clause, selection_clause_len,
};
pub use model::{Track, TrackId};
