//! Validate every document in the site's collections

use anyhow::Result;
use std::path::Path;

use crate::content::{Collection, ContentError};
use crate::Folio;

/// Check one collection, or all of them, printing every invalid document
pub fn run(folio: &Folio, collection: Option<&str>) -> Result<()> {
    let start = std::time::Instant::now();

    let collections: Vec<&Collection> = match collection {
        Some(name) => vec![folio.registry.get_collection(name)?],
        None => folio.registry.collections().collect(),
    };

    let mut checked = 0;
    let mut invalid = 0;

    for collection in collections {
        let report = collection.check(folio.registry.options())?;
        checked += report.checked;

        if report.is_ok() {
            println!("{}: {} entries ok", report.collection, report.checked);
            continue;
        }

        println!(
            "{}: {} of {} entries invalid",
            report.collection,
            report.failures.len(),
            report.checked
        );
        for failure in &report.failures {
            print_failure(&folio.base_dir, failure);
        }
        invalid += report.failures.len();
    }

    tracing::info!(
        "Checked {} entries in {:.2}s",
        checked,
        start.elapsed().as_secs_f64()
    );

    if invalid > 0 {
        anyhow::bail!("{} invalid entries, fix the files above", invalid);
    }

    Ok(())
}

fn print_failure(base_dir: &Path, failure: &ContentError) {
    match failure {
        ContentError::SchemaValidation { path, errors, .. } => {
            println!("  {}", path.strip_prefix(base_dir).unwrap_or(path).display());
            for error in errors {
                println!("    {}", error);
            }
        }
        other => println!("  {}", other),
    }
}
