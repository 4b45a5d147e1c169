//! Category Store: the user-maintained mapping of category name to keywords.
//!
//! Persisted as a single JSON object document, written wholesale on save:
//!
//! ```json
//! {
//!   "Shopping": ["AMAZON", "STORE"],
//!   "Streaming": ["NETFLIX"],
//!   "Uncategorized": []
//! }
//! ```
//!
//! Category order is significant (first matching category wins) and is kept
//! exactly as it appears in the document.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::fs;
use std::path::Path;
use tally_core::UNCATEGORIZED;
use tracing::{debug, info, warn};

use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
struct CategoryEntry {
    name: String,
    /// Uppercase, unique, highest priority first
    keywords: Vec<String>,
}

/// Ordered category -> keyword mapping.
///
/// The reserved "Uncategorized" entry always exists and never holds keywords.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStore {
    entries: Vec<CategoryEntry>,
}

impl Default for CategoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Keywords as stored: trimmed and uppercased
fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().to_uppercase()
}

impl CategoryStore {
    /// Cold-start store: only "Uncategorized"
    pub fn new() -> Self {
        Self {
            entries: vec![CategoryEntry {
                name: UNCATEGORIZED.to_string(),
                keywords: Vec::new(),
            }],
        }
    }

    /// Built-in rule set for users who want a head start
    pub fn starter() -> Self {
        let rules: [(&str, &[&str]); 5] = [
            ("Shopping", &["amazon", "store", "retail"]),
            ("Transportation", &["uber", "taxi", "fuel", "gas"]),
            ("Food & Dining", &["grocery", "restaurant", "cafe"]),
            ("Entertainment", &["netflix", "movie", "concert"]),
            ("Utilities", &["electric", "water", "internet", "phone"]),
        ];

        let entries = rules
            .iter()
            .map(|(name, keywords)| CategoryEntry {
                name: name.to_string(),
                keywords: keywords.iter().map(|k| normalize_keyword(k)).collect(),
            })
            .collect();
        Self::from_entries(entries)
    }

    /// Build a store from raw entries, restoring the store invariants:
    /// keywords normalized and deduplicated, empty keywords dropped, and the
    /// reserved category present with no keywords.
    fn from_entries(raw: Vec<CategoryEntry>) -> Self {
        let mut store = Self { entries: Vec::with_capacity(raw.len() + 1) };

        for entry in raw {
            let name = entry.name.trim();
            if name.is_empty() {
                continue;
            }
            store.add_category(name);
            if name == UNCATEGORIZED {
                if !entry.keywords.is_empty() {
                    warn!(count = entry.keywords.len(), "ignoring keywords stored under the fallback category");
                }
                continue;
            }
            for keyword in &entry.keywords {
                // Category was just inserted and is not reserved; only empty keywords fail.
                if let Err(e) = store.add_keyword(name, keyword) {
                    debug!(category = name, error = %e, "skipping stored keyword");
                }
            }
        }

        if !store.contains(UNCATEGORIZED) {
            store.entries.push(CategoryEntry {
                name: UNCATEGORIZED.to_string(),
                keywords: Vec::new(),
            });
        }
        store
    }

    /// Load the store from `path`.
    ///
    /// A missing or unreadable document is a cold start: the result is a
    /// fresh store holding only "Uncategorized".
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no category store yet, starting empty");
            return Self::new();
        }

        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "category store unreadable, starting empty");
                return Self::new();
            }
        };

        match serde_json::from_str::<CategoryStore>(&text) {
            Ok(store) => {
                info!(path = %path.display(), categories = store.category_count(), "category store loaded");
                store
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "category store malformed, starting empty");
                Self::new()
            }
        }
    }

    /// Overwrite the document at `path` with the full mapping.
    ///
    /// The document is written next to the target and renamed into place, so
    /// a failed save leaves the previous document intact.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), StoreError> {
        let path = path.as_ref();
        let persistence = |source| StoreError::Persistence {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(persistence)?;
        }

        let json = serde_json::to_string_pretty(self)?;
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        fs::write(&tmp, json).map_err(persistence)?;
        if let Err(e) = fs::rename(&tmp, path) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                debug!(path = %path.display(), error = %cleanup, "temp file not removed");
            }
            return Err(persistence(e));
        }

        debug!(path = %path.display(), categories = self.category_count(), "category store saved");
        Ok(())
    }

    /// Insert `name` with no keywords. Existing categories are left alone.
    pub fn add_category(&mut self, name: &str) -> &mut Self {
        let name = name.trim();
        if !name.is_empty() && !self.contains(name) {
            self.entries.push(CategoryEntry {
                name: name.to_string(),
                keywords: Vec::new(),
            });
        }
        self
    }

    /// Append `keyword` (trimmed, uppercased) to `category` at the lowest
    /// priority. Returns `Ok(false)` when the category already has it.
    pub fn add_keyword(&mut self, category: &str, keyword: &str) -> Result<bool, StoreError> {
        let category = category.trim();
        if category == UNCATEGORIZED {
            return Err(StoreError::ReservedCategory(category.to_string()));
        }

        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.name == category)
            .ok_or_else(|| StoreError::UnknownCategory(category.to_string()))?;

        let keyword = normalize_keyword(keyword);
        if keyword.is_empty() {
            return Err(StoreError::EmptyKeyword);
        }
        if entry.keywords.contains(&keyword) {
            return Ok(false);
        }
        entry.keywords.push(keyword);
        Ok(true)
    }

    /// Keywords of `category`, highest priority first
    pub fn lookup(&self, category: &str) -> Option<&[String]> {
        self.entry(category).map(|e| e.keywords.as_slice())
    }

    pub fn contains(&self, category: &str) -> bool {
        self.entry(category).is_some()
    }

    /// Category names are matched trimmed, the way `add_category` stores them
    fn entry(&self, category: &str) -> Option<&CategoryEntry> {
        let category = category.trim();
        self.entries.iter().find(|e| e.name == category)
    }

    /// Category names in match order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// (category, keywords) pairs in match order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|e| (e.name.as_str(), e.keywords.as_slice()))
    }

    /// Number of categories, "Uncategorized" included
    pub fn category_count(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for CategoryStore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.name, &entry.keywords)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryStore {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct StoreVisitor;

        impl<'de> Visitor<'de> for StoreVisitor {
            type Value = CategoryStore;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category name to keyword list")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut raw: Vec<CategoryEntry> = Vec::new();
                while let Some((name, keywords)) = access.next_entry::<String, Vec<String>>()? {
                    // Repeated keys: last one wins, position of the first is kept.
                    match raw.iter_mut().find(|e| e.name == name) {
                        Some(existing) => existing.keywords = keywords,
                        None => raw.push(CategoryEntry { name, keywords }),
                    }
                }
                Ok(CategoryStore::from_entries(raw))
            }
        }

        deserializer.deserialize_map(StoreVisitor)
    }
}
