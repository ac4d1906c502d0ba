//! List site content

use anyhow::Result;

use crate::content::collections::{BLOG, DEVELOPER_DOCS};
use crate::Folio;

/// List the entries of a collection
pub fn run(folio: &Folio, collection: &str, json: bool) -> Result<()> {
    if json {
        let entries = folio.registry.resolve(collection)?;
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    match collection {
        BLOG => {
            let posts = folio.registry.blog_posts()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}]",
                    post.pub_date.format("%Y-%m-%d"),
                    post.title,
                    post.slug
                );
            }
        }
        DEVELOPER_DOCS => {
            let docs = folio.registry.developer_docs()?;
            println!("Docs ({}):", docs.len());
            for doc in docs {
                println!("  {:>3} {} [{}]", doc.order, doc.title, doc.slug);
            }
        }
        other => {
            let entries = folio.registry.resolve(other)?;
            println!("{} ({}):", other, entries.len());
            for entry in entries {
                println!("  {} [{}]", entry.id, entry.file_path.display());
            }
        }
    }

    Ok(())
}
