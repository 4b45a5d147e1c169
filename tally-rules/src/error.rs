use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persisting category store to {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("unknown category '{0}' (add it with add_category first)")]
    UnknownCategory(String),
    #[error("keyword is empty after trimming")]
    EmptyKeyword,
    #[error("category '{0}' is reserved and cannot hold keywords")]
    ReservedCategory(String),
    #[error("serializing category store: {0}")]
    Serialize(#[from] serde_json::Error),
}
