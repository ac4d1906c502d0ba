//! Print a single entry

use anyhow::Result;

use crate::Folio;

/// Print one entry as JSON
pub fn run(folio: &Folio, collection: &str, slug: &str) -> Result<()> {
    let entry = folio.registry.get_entry(collection, slug)?;
    println!("{}", serde_json::to_string_pretty(&entry)?);
    Ok(())
}
