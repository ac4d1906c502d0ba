//! Re-resolve collections whenever their sources change

use anyhow::Result;
use notify_debouncer_mini::new_debouncer;
use notify_debouncer_mini::notify::{self, RecursiveMode, Watcher};
use std::path::Path;
use std::time::Duration;

use crate::config::CONFIG_FILE;
use crate::content::Snapshot;
use crate::Folio;

/// Watch the content directory and config file until interrupted
pub async fn run(folio: Folio) -> Result<()> {
    tokio::task::spawn_blocking(move || watch_blocking(folio)).await?
}

fn watch_blocking(mut folio: Folio) -> Result<()> {
    if !folio.content_dir.exists() {
        anyhow::bail!("Content directory {:?} does not exist", folio.content_dir);
    }

    let mut snapshot = resolve_snapshot(&folio).unwrap_or_default();

    let (tx, rx) = std::sync::mpsc::channel();

    // Create debouncer to avoid multiple rapid re-resolves
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    debouncer
        .watcher()
        .watch(&folio.content_dir, RecursiveMode::Recursive)?;
    tracing::debug!("Watching: {:?}", folio.content_dir);

    let config_path = folio.config_path();
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<_> = events.iter().filter(|e| is_relevant(&e.path)).collect();
                if relevant.is_empty() {
                    continue;
                }

                let config_changed = relevant.iter().any(|e| e.path.ends_with(CONFIG_FILE));
                if config_changed {
                    match Folio::new(&folio.base_dir) {
                        Ok(reloaded) => {
                            tracing::info!("Config changed, reloaded {:?}", config_path);
                            if reloaded.content_dir != folio.content_dir {
                                if let Err(e) = switch_content_dir(
                                    debouncer.watcher(),
                                    &folio.content_dir,
                                    &reloaded.content_dir,
                                ) {
                                    tracing::error!(
                                        "Failed to watch {:?}: {}",
                                        reloaded.content_dir,
                                        e
                                    );
                                }
                            }
                            folio = reloaded;
                        }
                        Err(e) => {
                            tracing::error!("Failed to reload config: {}", e);
                            continue;
                        }
                    }
                }

                if let Some(next) = resolve_snapshot(&folio) {
                    let changes = snapshot.diff(&next);
                    if changes.has_changes() {
                        tracing::info!("Content updated: {}", changes.summary());
                        for key in changes.added.iter().chain(&changes.changed) {
                            tracing::debug!("  updated {}", key);
                        }
                        for key in &changes.removed {
                            tracing::debug!("  removed {}", key);
                        }
                    }
                    snapshot = next;
                }
            }
            Ok(Err(e)) => {
                tracing::warn!("Watch error: {:?}", e);
            }
            Err(_) => break,
        }
    }

    Ok(())
}

/// Move the recursive watch from the old content directory to the new one
fn switch_content_dir<W: Watcher + ?Sized>(
    watcher: &mut W,
    old: &Path,
    new: &Path,
) -> notify::Result<()> {
    if let Err(e) = watcher.unwatch(old) {
        tracing::debug!("Unwatch {:?}: {}", old, e);
    }
    watcher.watch(new, RecursiveMode::Recursive)?;
    tracing::info!("Now watching {:?}", new);
    Ok(())
}

/// Resolve everything, logging rather than returning a validation failure so
/// the watch loop keeps running until the author fixes the file
fn resolve_snapshot(folio: &Folio) -> Option<Snapshot> {
    match folio.registry.resolve_all() {
        Ok(resolved) => {
            let snapshot = Snapshot::capture(&resolved);
            tracing::info!("Resolved {} entries", snapshot.len());
            Some(snapshot)
        }
        Err(e) => {
            tracing::error!("{}", e);
            None
        }
    }
}

/// Skip editor droppings and VCS internals
fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.contains("node_modules")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}
