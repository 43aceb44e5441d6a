//! Resource registry: maps store paths to manifest entries.

use std::collections::{HashMap, HashSet};

/// A registered package resource.
#[derive(Debug, Clone)]
pub struct ManifestEntry {
    pub id: String,
    /// `None` means the resource's bytes are supplied elsewhere; no body is
    /// written for the entry, but it still appears in the manifest.
    pub content: Option<Vec<u8>>,
    /// Manifest `properties` attribute (`cover`, `nav`, `svg`, ...).
    pub properties: Option<String>,
}

/// Insertion-ordered map from store path to [`ManifestEntry`].
///
/// Registration is insert-if-absent: registering a path that already exists
/// returns the stored id and never touches the stored content. This is the
/// deduplication mechanism that lets several spine nodes reference one
/// physical resource.
#[derive(Debug, Default)]
pub struct ResourceRegistry {
    entries: Vec<(String, ManifestEntry)>,
    index: HashMap<String, usize>,
    ids: IdAllocator,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource and return its id.
    ///
    /// `id: None` allocates the next free auto-generated id. Explicit ids are
    /// recorded so the allocator never hands out a colliding value; an
    /// explicit id that is already taken gets a numeric suffix, so callers
    /// must use the returned id, not the one they asked for.
    pub fn register(
        &mut self,
        path: &str,
        content: Option<Vec<u8>>,
        id: Option<&str>,
        properties: Option<&str>,
    ) -> String {
        if let Some(&slot) = self.index.get(path) {
            return self.entries[slot].1.id.clone();
        }

        let id = match id {
            Some(id) => self.ids.claim(id),
            None => self.ids.allocate(),
        };
        self.index.insert(path.to_string(), self.entries.len());
        self.entries.push((
            path.to_string(),
            ManifestEntry {
                id: id.clone(),
                content,
                properties: properties.map(str::to_string),
            },
        ));
        id
    }

    /// Iterate entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ManifestEntry)> {
        self.entries.iter().map(|(path, entry)| (path.as_str(), entry))
    }

    pub fn get(&self, path: &str) -> Option<&ManifestEntry> {
        self.index.get(path).map(|&slot| &self.entries[slot].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Allocates `id1`, `id2`, ... while skipping any value already consumed by
/// an explicitly assigned id.
#[derive(Debug, Default)]
struct IdAllocator {
    next: u32,
    used: HashSet<String>,
}

impl IdAllocator {
    fn claim(&mut self, id: &str) -> String {
        if self.used.insert(id.to_string()) {
            return id.to_string();
        }
        // Same explicit id requested for a second resource (e.g. media files
        // sharing a base name in different subdirectories)
        let mut n = 2;
        loop {
            let candidate = format!("{id}-{n}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }

    fn allocate(&mut self) -> String {
        loop {
            self.next += 1;
            let id = format!("id{}", self.next);
            if self.used.insert(id.clone()) {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_allocates_sequential_ids() {
        let mut registry = ResourceRegistry::new();
        assert_eq!(registry.register("a.xhtml", Some(vec![1]), None, None), "id1");
        assert_eq!(registry.register("b.xhtml", Some(vec![2]), None, None), "id2");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_same_path_is_idempotent() {
        let mut registry = ResourceRegistry::new();
        let first = registry.register("a.xhtml", Some(b"first".to_vec()), None, None);
        let second = registry.register("a.xhtml", Some(b"second".to_vec()), None, None);
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
        // First content wins
        let entry = registry.get("a.xhtml").expect("registered");
        assert_eq!(entry.content.as_deref(), Some(b"first".as_slice()));
    }

    #[test]
    fn test_explicit_id_and_properties() {
        let mut registry = ResourceRegistry::new();
        let id = registry.register("cover.jpg", Some(vec![]), Some("cover"), Some("cover"));
        assert_eq!(id, "cover");
        let entry = registry.get("cover.jpg").expect("registered");
        assert_eq!(entry.properties.as_deref(), Some("cover"));
    }

    #[test]
    fn test_allocator_skips_explicitly_claimed_ids() {
        let mut registry = ResourceRegistry::new();
        registry.register("x", Some(vec![]), Some("id2"), None);
        assert_eq!(registry.register("a", Some(vec![]), None, None), "id1");
        // id2 is taken, so the counter skips it
        assert_eq!(registry.register("b", Some(vec![]), None, None), "id3");
        assert_eq!(registry.register("c", Some(vec![]), None, None), "id4");
    }

    #[test]
    fn test_colliding_explicit_ids_are_disambiguated() {
        let mut registry = ResourceRegistry::new();
        let first = registry.register("media/a/pic.png", Some(vec![]), Some("pic.png"), None);
        let second = registry.register("media/b/pic.png", Some(vec![]), Some("pic.png"), None);
        let third = registry.register("media/c/pic.png", Some(vec![]), Some("pic.png"), None);
        assert_eq!(first, "pic.png");
        assert_eq!(second, "pic.png-2");
        assert_eq!(third, "pic.png-3");
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_absent_content_is_preserved() {
        let mut registry = ResourceRegistry::new();
        registry.register("nav.xhtml", None, Some("nav"), Some("nav"));
        let entry = registry.get("nav.xhtml").expect("registered");
        assert!(entry.content.is_none());
    }
}
