//! Collections - a source location plus a schema

use chrono_tz::Tz;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use super::error::{ContentError, Result};
use super::loader::{GlobLoader, SourceFile};
use super::markdown::extract_headings;
use super::snapshot::hash_content;
use super::{Entry, FrontMatter, Schema, ValidationContext};

/// Settings shared by every resolution pass
#[derive(Debug, Clone)]
pub struct ResolveOptions {
    /// Root for `/`-prefixed image references
    pub public_dir: PathBuf,
    /// Zone for date strings without an offset
    pub timezone: Tz,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            public_dir: PathBuf::from("public"),
            timezone: Tz::UTC,
        }
    }
}

/// A named set of documents sharing a loader and a schema
#[derive(Debug, Clone)]
pub struct Collection {
    name: String,
    loader: GlobLoader,
    schema: Schema,
}

/// Define a collection. Nothing touches the filesystem until it is resolved.
pub fn define_collection(name: &str, loader: GlobLoader, schema: Schema) -> Collection {
    Collection {
        name: name.to_string(),
        loader,
        schema,
    }
}

impl Collection {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn loader(&self) -> &GlobLoader {
        &self.loader
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Discover the collection's files and yield one entry per file, parsed
    /// and validated as the iterator advances. Calling this again starts a
    /// fresh pass.
    pub fn entries<'a>(&'a self, options: &'a ResolveOptions) -> Result<Entries<'a>> {
        let files = self.loader.discover()?;
        Ok(Entries {
            collection: self,
            options,
            files: files.into_iter(),
        })
    }

    /// Resolve every entry, failing on the first invalid document
    pub fn resolve(&self, options: &ResolveOptions) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for entry in self.entries(options)? {
            let entry = entry?;
            if let Some(first) = seen.insert(entry.id.clone(), entry.file_path.clone()) {
                return Err(ContentError::DuplicateSlug {
                    collection: self.name.clone(),
                    slug: entry.id,
                    first,
                    second: entry.file_path,
                });
            }
            entries.push(entry);
        }

        tracing::debug!("{}: resolved {} entries", self.name, entries.len());
        Ok(entries)
    }

    /// Validate every document and report all failures instead of stopping
    /// at the first. Discovery errors are still returned directly.
    pub fn check(&self, options: &ResolveOptions) -> Result<CheckReport> {
        let mut report = CheckReport {
            collection: self.name.clone(),
            checked: 0,
            failures: Vec::new(),
        };
        let mut seen: HashMap<String, PathBuf> = HashMap::new();

        for entry in self.entries(options)? {
            report.checked += 1;
            match entry {
                Ok(entry) => {
                    if let Some(first) = seen.insert(entry.id.clone(), entry.file_path.clone()) {
                        report.failures.push(ContentError::DuplicateSlug {
                            collection: self.name.clone(),
                            slug: entry.id,
                            first,
                            second: entry.file_path,
                        });
                    }
                }
                Err(e) => report.failures.push(e),
            }
        }

        Ok(report)
    }

    fn load_entry(&self, file: &SourceFile, options: &ResolveOptions) -> Result<Entry> {
        let raw = fs::read_to_string(&file.path).map_err(|e| ContentError::io(&file.path, e))?;

        let (front_matter, body) =
            FrontMatter::parse(&raw).map_err(|source| ContentError::FrontMatter {
                path: file.path.clone(),
                source,
            })?;

        let ctx = ValidationContext {
            document: &file.path,
            public_dir: &options.public_dir,
            timezone: options.timezone,
        };
        let data = self
            .schema
            .validate(&front_matter, &ctx)
            .into_result()
            .map_err(|errors| ContentError::SchemaValidation {
                collection: self.name.clone(),
                path: file.path.clone(),
                errors,
            })?;

        let id = front_matter
            .get("slug")
            .and_then(|v| v.as_str())
            .map(|s| s.trim_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slug_from_path(&file.relative));

        tracing::debug!("{}: loaded {} as `{}`", self.name, file.relative, id);

        Ok(Entry {
            id,
            collection: self.name.clone(),
            file_path: PathBuf::from(&file.relative),
            data,
            body: body.to_string(),
            headings: extract_headings(body),
            digest: hash_content(&raw),
        })
    }
}

/// Lazy pass over a collection's entries
pub struct Entries<'a> {
    collection: &'a Collection,
    options: &'a ResolveOptions,
    files: std::vec::IntoIter<SourceFile>,
}

impl Iterator for Entries<'_> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        let file = self.files.next()?;
        Some(self.collection.load_entry(&file, self.options))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.files.size_hint()
    }
}

/// Every failing document of a collection
#[derive(Debug)]
pub struct CheckReport {
    pub collection: String,
    /// Number of documents inspected
    pub checked: usize,
    pub failures: Vec<ContentError>,
}

impl CheckReport {
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Derive a slug from a relative path: extension dropped, each segment
/// slugified, a trailing `index` segment folded into its directory
pub fn slug_from_path(relative: &str) -> String {
    let without_ext = match relative.rsplit_once('.') {
        Some((stem, ext)) if !ext.contains('/') && !stem.is_empty() && !stem.ends_with('/') => stem,
        _ => relative,
    };

    let slug = without_ext
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(slug::slugify)
        .collect::<Vec<_>>()
        .join("/");

    match slug.strip_suffix("/index") {
        Some(parent) if !parent.is_empty() => parent.to_string(),
        _ => slug,
    }
}
