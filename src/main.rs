//! CLI entry point for folio-rs

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "folio-rs")]
#[command(version)]
#[command(about = "Schema-validated content collections for a markdown site", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate every document against its collection schema
    Check {
        /// Only check this collection
        #[arg(short = 'C', long)]
        collection: Option<String>,
    },

    /// List the entries of a collection
    #[command(alias = "ls")]
    List {
        /// Collection name (defaults to the configured default collection)
        collection: Option<String>,

        /// Print entries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a single entry as JSON
    Show {
        /// Collection name
        collection: String,

        /// Entry slug
        slug: String,
    },

    /// Create a new document
    New {
        /// Title of the new document
        title: String,

        /// Collection to create it in
        #[arg(short = 'C', long)]
        collection: Option<String>,

        /// File path relative to the collection base, without extension
        #[arg(short, long)]
        path: Option<String>,
    },

    /// Re-resolve collections whenever their sources change
    #[command(alias = "w")]
    Watch,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "folio_rs=debug,info"
    } else {
        "folio_rs=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Check { collection } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio.check(collection.as_deref())?;
        }

        Commands::List { collection, json } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let collection = collection.unwrap_or_else(|| folio.config.default_collection.clone());
            folio_rs::commands::list::run(&folio, &collection, json)?;
        }

        Commands::Show { collection, slug } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::show::run(&folio, &collection, &slug)?;
        }

        Commands::New {
            title,
            collection,
            path,
        } => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            let file = folio.new_entry(&title, collection.as_deref(), path.as_deref())?;
            println!("Created: {:?}", file);
        }

        Commands::Watch => {
            let folio = folio_rs::Folio::new(&base_dir)?;
            folio_rs::commands::watch::run(folio).await?;
        }

        Commands::Version => {
            println!("folio-rs version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
