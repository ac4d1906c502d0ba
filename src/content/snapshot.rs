//! Snapshots of resolved content, for change detection between builds

use indexmap::IndexMap;

use super::Entry;

/// Calculate a hash for content
pub fn hash_content(content: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Digest of every entry, keyed by collection then slug
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    collections: IndexMap<String, IndexMap<String, String>>,
}

impl Snapshot {
    /// Record the digests of resolved collections
    pub fn capture(resolved: &IndexMap<String, Vec<Entry>>) -> Self {
        let collections = resolved
            .iter()
            .map(|(name, entries)| {
                let digests = entries
                    .iter()
                    .map(|e| (e.id.clone(), e.digest.clone()))
                    .collect();
                (name.clone(), digests)
            })
            .collect();
        Self { collections }
    }

    /// Total number of entries
    pub fn len(&self) -> usize {
        self.collections.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// What changed going from `self` to `newer`
    pub fn diff(&self, newer: &Snapshot) -> ChangeSet {
        let mut changes = ChangeSet::default();

        for (collection, entries) in &newer.collections {
            let before = self.collections.get(collection);
            for (slug, digest) in entries {
                let key = format!("{}/{}", collection, slug);
                match before.and_then(|b| b.get(slug)) {
                    None => changes.added.push(key),
                    Some(old) if old != digest => changes.changed.push(key),
                    Some(_) => {}
                }
            }
        }

        for (collection, entries) in &self.collections {
            let after = newer.collections.get(collection);
            for slug in entries.keys() {
                if after.map_or(true, |a| !a.contains_key(slug)) {
                    changes.removed.push(format!("{}/{}", collection, slug));
                }
            }
        }

        changes
    }
}

/// Change detection result, as `collection/slug` keys
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    pub added: Vec<String>,
    pub changed: Vec<String>,
    pub removed: Vec<String>,
}

impl ChangeSet {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.changed.is_empty() || !self.removed.is_empty()
    }

    /// Get summary of changes for logging
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.added.is_empty() {
            parts.push(format!("{} added", self.added.len()));
        }
        if !self.changed.is_empty() {
            parts.push(format!("{} changed", self.changed.len()));
        }
        if !self.removed.is_empty() {
            parts.push(format!("{} removed", self.removed.len()));
        }

        if parts.is_empty() {
            "no changes".to_string()
        } else {
            parts.join(", ")
        }
    }
}
