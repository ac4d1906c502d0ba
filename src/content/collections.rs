//! The site's collections: blog posts and developer docs

use std::path::Path;

use super::error::Result;
use super::{
    define_collection, Collection, ContentRegistry, FieldType, FieldValue, GlobLoader,
    ResolveOptions, Schema,
};

pub const BLOG: &str = "blog";
pub const DEVELOPER_DOCS: &str = "developerDocs";

/// Directory names under the content root
pub const BLOG_DIR: &str = "blog";
pub const DEVELOPER_DOCS_DIR: &str = "development-docs";

/// Markdown and MDX, at any depth
pub const MARKDOWN_PATTERN: &str = "**/*.{md,mdx}";

/// Docs without an explicit `order` sort after everything else
pub const DEFAULT_DOC_ORDER: f64 = 99.0;

pub fn blog_schema() -> Schema {
    Schema::new()
        .required("title", FieldType::String)
        .required("description", FieldType::String)
        .required("pubDate", FieldType::Date)
        .optional("updatedDate", FieldType::Date)
        .optional("heroImage", FieldType::Image)
}

pub fn developer_docs_schema() -> Schema {
    Schema::new()
        .required("title", FieldType::String)
        .optional("description", FieldType::String)
        .optional_with_default(
            "order",
            FieldType::Number,
            FieldValue::Number(DEFAULT_DOC_ORDER),
        )
}

pub fn blog(content_dir: &Path) -> Collection {
    define_collection(
        BLOG,
        GlobLoader::new(content_dir.join(BLOG_DIR), MARKDOWN_PATTERN),
        blog_schema(),
    )
}

pub fn developer_docs(content_dir: &Path) -> Collection {
    define_collection(
        DEVELOPER_DOCS,
        GlobLoader::new(content_dir.join(DEVELOPER_DOCS_DIR), MARKDOWN_PATTERN),
        developer_docs_schema(),
    )
}

/// Registry holding both site collections, rooted at `content_dir`
pub fn site_registry(content_dir: &Path, options: ResolveOptions) -> Result<ContentRegistry> {
    ContentRegistry::new(options, [blog(content_dir), developer_docs(content_dir)])
}
