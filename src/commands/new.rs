//! Create a new blog post or doc page

use anyhow::Result;
use chrono::Utc;
use std::fs;
use std::path::PathBuf;

use crate::content::collections::{BLOG, DEVELOPER_DOCS};
use crate::Folio;

/// Create a new document in `collection` with front-matter that passes its
/// schema. Returns the path of the new file.
pub fn create_entry(
    folio: &Folio,
    title: &str,
    collection: &str,
    path: Option<&str>,
) -> Result<PathBuf> {
    let now = Utc::now().with_timezone(&folio.config.timezone()?);
    let definition = folio.registry.get_collection(collection)?;
    let target_dir = definition.loader().base().to_path_buf();

    // Generate filename
    let filename = if let Some(p) = path {
        format!("{}.md", p)
    } else {
        let slug = slug::slugify(title);

        folio
            .config
            .new_post_name
            .replace(":title", &slug)
            .replace(":year", &now.format("%Y").to_string())
            .replace(":month", &now.format("%m").to_string())
            .replace(":day", &now.format("%d").to_string())
    };

    if !definition.loader().matches(&filename)? {
        anyhow::bail!(
            "{} would not be picked up by the {} pattern {}",
            filename,
            collection,
            definition.loader().pattern()
        );
    }

    let file_path = target_dir.join(&filename);
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    // Load scaffold template
    let scaffold_path = folio
        .base_dir
        .join("scaffolds")
        .join(format!("{}.md", collection));
    let scaffold_content = if scaffold_path.exists() {
        fs::read_to_string(&scaffold_path)?
    } else {
        default_scaffold(collection).to_string()
    };

    let quoted_title = serde_yaml::to_string(title)?;
    let content = scaffold_content
        .replace("{{ title }}", quoted_title.trim_end())
        .replace("{{ date }}", &now.format("%Y-%m-%d").to_string());

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;

    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

fn default_scaffold(collection: &str) -> &'static str {
    match collection {
        BLOG => "---\ntitle: {{ title }}\ndescription: ''\npubDate: {{ date }}\n---\n",
        DEVELOPER_DOCS => "---\ntitle: {{ title }}\ndescription: ''\n---\n",
        _ => "---\ntitle: {{ title }}\n---\n",
    }
}
