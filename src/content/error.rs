//! Content errors

use std::path::PathBuf;
use thiserror::Error;

use super::{FieldError, FrontMatterError};

pub type Result<T> = std::result::Result<T, ContentError>;

/// Everything that can go wrong while defining or resolving collections
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("{collection}: {} failed schema validation: {}", .path.display(), join_errors(.errors))]
    SchemaValidation {
        collection: String,
        path: PathBuf,
        errors: Vec<FieldError>,
    },

    #[error("collection not found: {0}")]
    CollectionNotFound(String),

    #[error("cannot read {}: {source}", .path.display())]
    DiscoveryIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", .path.display())]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: FrontMatterError,
    },

    #[error("invalid pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("collection `{0}` is defined twice")]
    DuplicateCollection(String),

    #[error(
        "{collection}: slug `{slug}` is produced by both {} and {}",
        .first.display(),
        .second.display()
    )]
    DuplicateSlug {
        collection: String,
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("no entry `{slug}` in collection `{collection}`")]
    EntryNotFound { collection: String, slug: String },

    #[error("{collection}/{slug} has no `{field}` field")]
    RecordShape {
        collection: String,
        slug: String,
        field: &'static str,
    },
}

impl ContentError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DiscoveryIo {
            path: path.into(),
            source,
        }
    }
}

fn join_errors(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
