//! folio-rs: schema-validated content collections for a personal site
//!
//! This crate loads markdown and MDX documents from a site's content
//! directory, checks their front-matter against per-collection schemas, and
//! exposes the validated entries by collection name and slug.

pub mod commands;
pub mod config;
pub mod content;

use anyhow::Result;
use std::path::{Path, PathBuf};

use content::{collections, ContentRegistry, ResolveOptions};

/// The main application: a site root, its configuration and its collections
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Parent of the collection directories
    pub content_dir: PathBuf,
    /// Static files directory
    pub public_dir: PathBuf,
    /// Collections, fixed for the life of the process
    pub registry: ContentRegistry,
}

impl Folio {
    /// Create a new Folio instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config = config::SiteConfig::load_or_default(&base_dir)?;

        let content_dir = base_dir.join(&config.content_dir);
        let public_dir = base_dir.join(&config.public_dir);

        let options = ResolveOptions {
            public_dir: public_dir.clone(),
            timezone: config.timezone()?,
        };
        let registry = collections::site_registry(&content_dir, options)?;

        Ok(Self {
            config,
            base_dir,
            content_dir,
            public_dir,
            registry,
        })
    }

    /// Path of the configuration file, whether or not it exists
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(config::CONFIG_FILE)
    }

    /// Check one collection, or all of them, and fail if any document is invalid
    pub fn check(&self, collection: Option<&str>) -> Result<()> {
        commands::check::run(self, collection)
    }

    /// Create a new document, in the default collection unless one is named
    pub fn new_entry(
        &self,
        title: &str,
        collection: Option<&str>,
        path: Option<&str>,
    ) -> Result<PathBuf> {
        let collection = collection.unwrap_or(&self.config.default_collection);
        tracing::info!("Creating new {} entry with title: {}", collection, title);
        commands::new::create_entry(self, title, collection, path)
    }
}
