use crate::models::ClassProperty;
use std::collections::HashMap;

/// Cached outcome of a type lookup
#[derive(Debug, Clone, PartialEq)]
pub enum CachedResolution {
    /// Lookup ran and found nothing usable
    Failure,
    /// Lookup produced a property tree
    Success(Vec<ClassProperty>),
}

struct CacheEntry {
    fingerprint: blake3::Hash,
    resolution: CachedResolution,
    definition_text: Option<String>,
}

/// Session cache for type resolutions.
///
/// Keyed by `(originating file, type name)` and fingerprinted by the origin
/// file's content, so an entry written against an older buffer can never be
/// served after the text changes. Failures are cached alongside successes:
/// re-searching the whole workspace for a type that does not exist is the
/// expensive case this cache exists to prevent.
pub struct ResolutionCache {
    entries: HashMap<String, CacheEntry>,
}

impl ResolutionCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    fn key(file: &str, type_name: &str) -> String {
        format!("{}::{}", file, type_name)
    }

    /// Looks up a cached resolution, verifying the origin fingerprint
    pub fn get(&self, file: &str, type_name: &str, origin_text: &str) -> Option<&CachedResolution> {
        let entry = self.entries.get(&Self::key(file, type_name))?;
        if entry.fingerprint != blake3::hash(origin_text.as_bytes()) {
            return None;
        }
        Some(&entry.resolution)
    }

    /// Cached raw definition text for a type, when resolution succeeded
    pub fn definition_text(&self, file: &str, type_name: &str, origin_text: &str) -> Option<&str> {
        let entry = self.entries.get(&Self::key(file, type_name))?;
        if entry.fingerprint != blake3::hash(origin_text.as_bytes()) {
            return None;
        }
        entry.definition_text.as_deref()
    }

    /// Records a resolution outcome for `(file, type_name)`
    pub fn insert(
        &mut self,
        file: &str,
        type_name: &str,
        origin_text: &str,
        resolution: CachedResolution,
        definition_text: Option<String>,
    ) {
        self.entries.insert(
            Self::key(file, type_name),
            CacheEntry {
                fingerprint: blake3::hash(origin_text.as_bytes()),
                resolution,
                definition_text,
            },
        );
    }

    /// Drops every entry originating from `file` (file-save events)
    pub fn invalidate_file(&mut self, file: &str) {
        let prefix = format!("{}::", file);
        self.entries.retain(|key, _| !key.starts_with(&prefix));
    }

    /// Drops `type_name` from every file it was cached under (manual
    /// re-resolution of a single type)
    pub fn invalidate_type(&mut self, type_name: &str) {
        let suffix = format!("::{}", type_name);
        self.entries.retain(|key, _| !key.ends_with(&suffix));
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drops everything
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ResolutionCache {
    fn default() -> Self {
        Self::new()
    }
}
