use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    #[error("catalog rejected deletion of {ids} ids: {reason}")]
    Rejected { ids: usize, reason: String },
}

#[derive(Error, Debug)]
pub enum FileDeleteError {
    #[error("failed to delete {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no access to {path} and no usable storage handle")]
    NoAccess { path: PathBuf },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration parse error: {0}")]
    Parse(#[from] ::config::ConfigError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum TagError {
    #[error("failed to read tags: {0}")]
    Lofty(#[from] lofty::error::LoftyError),

    #[error("failed to read tags: {0}")]
    Other(String),
}
