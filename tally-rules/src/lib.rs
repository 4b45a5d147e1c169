//! tally-rules: keyword-based category store and deterministic categorizer

pub mod categorizer;
pub mod error;
pub mod store;

pub use categorizer::{categorize, match_category, recategorize};
pub use error::StoreError;
pub use store::CategoryStore;
