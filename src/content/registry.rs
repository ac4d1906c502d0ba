//! Content registry - the fixed set of collections a site exposes

use indexmap::IndexMap;

use super::collections::{BLOG, DEVELOPER_DOCS};
use super::entry::{sort_docs, sort_posts_newest_first};
use super::error::{ContentError, Result};
use super::{BlogPost, Collection, DevDoc, Entry, ResolveOptions};

/// Collections by name. Built once; there is no way to add or replace a
/// collection afterwards.
#[derive(Debug, Clone)]
pub struct ContentRegistry {
    collections: IndexMap<String, Collection>,
    options: ResolveOptions,
}

impl ContentRegistry {
    /// Build a registry, rejecting duplicate collection names
    pub fn new<I>(options: ResolveOptions, collections: I) -> Result<Self>
    where
        I: IntoIterator<Item = Collection>,
    {
        let mut map = IndexMap::new();
        for collection in collections {
            let name = collection.name().to_string();
            if map.contains_key(&name) {
                return Err(ContentError::DuplicateCollection(name));
            }
            map.insert(name, collection);
        }

        Ok(Self {
            collections: map,
            options,
        })
    }

    pub fn options(&self) -> &ResolveOptions {
        &self.options
    }

    /// Look up a collection by name
    pub fn get_collection(&self, name: &str) -> Result<&Collection> {
        self.collections
            .get(name)
            .ok_or_else(|| ContentError::CollectionNotFound(name.to_string()))
    }

    /// Collections in definition order
    pub fn collections(&self) -> impl Iterator<Item = &Collection> {
        self.collections.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Resolve one collection
    pub fn resolve(&self, name: &str) -> Result<Vec<Entry>> {
        self.get_collection(name)?.resolve(&self.options)
    }

    /// Resolve every collection, stopping at the first failure
    pub fn resolve_all(&self) -> Result<IndexMap<String, Vec<Entry>>> {
        self.collections
            .iter()
            .map(|(name, collection)| Ok((name.clone(), collection.resolve(&self.options)?)))
            .collect()
    }

    /// A single entry by collection and slug
    pub fn get_entry(&self, name: &str, slug: &str) -> Result<Entry> {
        self.resolve(name)?
            .into_iter()
            .find(|e| e.id == slug)
            .ok_or_else(|| ContentError::EntryNotFound {
                collection: name.to_string(),
                slug: slug.to_string(),
            })
    }

    /// Blog posts, newest first
    pub fn blog_posts(&self) -> Result<Vec<BlogPost>> {
        let mut posts = self
            .resolve(BLOG)?
            .iter()
            .map(BlogPost::try_from)
            .collect::<Result<Vec<_>>>()?;
        sort_posts_newest_first(&mut posts);
        Ok(posts)
    }

    /// Developer docs in reading order
    pub fn developer_docs(&self) -> Result<Vec<DevDoc>> {
        let mut docs = self
            .resolve(DEVELOPER_DOCS)?
            .iter()
            .map(DevDoc::try_from)
            .collect::<Result<Vec<_>>>()?;
        sort_docs(&mut docs);
        Ok(docs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{define_collection, FieldType, GlobLoader, Schema};

    fn collection(name: &str) -> Collection {
        define_collection(
            name,
            GlobLoader::new("unused", "**/*.md"),
            Schema::new().required("title", FieldType::String),
        )
    }

    #[test]
    fn test_lookup_and_order() {
        let registry =
            ContentRegistry::new(ResolveOptions::default(), vec![collection("b"), collection("a")])
                .unwrap();
        assert_eq!(registry.get_collection("a").unwrap().name(), "a");
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_collection_not_found() {
        let registry =
            ContentRegistry::new(ResolveOptions::default(), vec![collection("a")]).unwrap();
        assert!(matches!(
            registry.get_collection("missing"),
            Err(ContentError::CollectionNotFound(name)) if name == "missing"
        ));
        assert!(matches!(
            registry.resolve("missing"),
            Err(ContentError::CollectionNotFound(_))
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let result = ContentRegistry::new(
            ResolveOptions::default(),
            vec![collection("blog"), collection("blog")],
        );
        assert!(matches!(result, Err(ContentError::DuplicateCollection(name)) if name == "blog"));
    }
}
