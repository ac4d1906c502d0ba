//! Content module - collections, front-matter, schemas and validated entries

mod collection;
pub mod collections;
pub mod date;
mod entry;
mod error;
mod frontmatter;
mod image;
pub mod loader;
mod markdown;
mod registry;
mod schema;
pub mod snapshot;

pub use collection::{
    define_collection, slug_from_path, CheckReport, Collection, Entries, ResolveOptions,
};
pub use entry::{sort_docs, sort_posts_newest_first, BlogPost, DevDoc, Entry};
pub use error::{ContentError, Result};
pub use frontmatter::{FrontMatter, FrontMatterError, FrontMatterFormat};
pub use image::ImageRef;
pub use loader::{GlobLoader, SourceFile};
pub use markdown::{extract_headings, Heading};
pub use registry::ContentRegistry;
pub use schema::{
    Data, Field, FieldError, FieldErrorKind, FieldType, FieldValue, Schema, Validation,
    ValidationContext,
};
pub use snapshot::{ChangeSet, Snapshot};
