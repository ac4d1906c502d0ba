//! Glob loader - discovers a collection's source files

use glob::{MatchOptions, Pattern};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::error::{ContentError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// A discovered source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Full path on disk
    pub path: PathBuf,
    /// Path relative to the loader base, `/`-separated
    pub relative: String,
}

/// Finds files under a base directory that match a glob pattern
#[derive(Debug, Clone)]
pub struct GlobLoader {
    base: PathBuf,
    pattern: String,
}

impl GlobLoader {
    /// Create a loader. The pattern is compiled on first discovery.
    pub fn new<P: Into<PathBuf>>(base: P, pattern: &str) -> Self {
        Self {
            base: base.into(),
            pattern: pattern.to_string(),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Whether a `/`-separated relative path matches the pattern
    pub fn matches(&self, relative: &str) -> Result<bool> {
        let patterns = self.compile()?;
        Ok(patterns.iter().any(|p| p.matches_with(relative, MATCH_OPTIONS)))
    }

    /// Walk the base directory and return every matching file, sorted by
    /// relative path
    pub fn discover(&self) -> Result<Vec<SourceFile>> {
        let patterns = self.compile()?;

        let metadata = fs::metadata(&self.base).map_err(|e| ContentError::io(&self.base, e))?;
        if !metadata.is_dir() {
            return Err(ContentError::io(
                &self.base,
                io::Error::other("not a directory"),
            ));
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(&self.base)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| self.base.clone());
                ContentError::io(path, io::Error::from(e))
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.base) else {
                continue;
            };
            let relative = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            if patterns.iter().any(|p| p.matches_with(&relative, MATCH_OPTIONS)) {
                files.push(SourceFile {
                    path: entry.path().to_path_buf(),
                    relative,
                });
            }
        }

        files.sort_by(|a, b| a.relative.cmp(&b.relative));
        tracing::debug!(
            "Discovered {} files under {:?} matching {}",
            files.len(),
            self.base,
            self.pattern
        );

        Ok(files)
    }

    fn compile(&self) -> Result<Vec<Pattern>> {
        expand_braces(&self.pattern)
            .into_iter()
            .map(|p| {
                Pattern::new(&p).map_err(|source| ContentError::InvalidPattern {
                    pattern: self.pattern.clone(),
                    source,
                })
            })
            .collect()
    }
}

/// Expand `{a,b}` alternatives, which `glob` does not understand
fn expand_braces(pattern: &str) -> Vec<String> {
    let Some(open) = pattern.find('{') else {
        return vec![pattern.to_string()];
    };

    let mut depth = 0usize;
    let mut close = None;
    for (i, c) in pattern[open..].char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(open + i);
                    break;
                }
            }
            _ => {}
        }
    }
    let Some(close) = close else {
        return vec![pattern.to_string()];
    };

    let prefix = &pattern[..open];
    let body = &pattern[open + 1..close];
    let suffix = &pattern[close + 1..];

    // Split on commas that are not inside a nested group
    let mut alternatives = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                alternatives.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    alternatives.push(&body[start..]);

    alternatives
        .into_iter()
        .flat_map(|alt| expand_braces(&format!("{}{}{}", prefix, alt, suffix)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, relative: &str) {
        let path = dir.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "---\ntitle: x\n---\n").unwrap();
    }

    #[test]
    fn test_expand_braces() {
        assert_eq!(expand_braces("**/*.{md,mdx}"), vec!["**/*.md", "**/*.mdx"]);
        assert_eq!(
            expand_braces("{a,b}/*.{md,txt}"),
            vec!["a/*.md", "a/*.txt", "b/*.md", "b/*.txt"]
        );
        assert_eq!(expand_braces("{x,{y,z}}"), vec!["x", "y", "z"]);
        assert_eq!(expand_braces("plain/*.md"), vec!["plain/*.md"]);
    }

    #[test]
    fn test_discover_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "b.md");
        touch(dir.path(), "a.mdx");
        touch(dir.path(), "guide/index.md");
        touch(dir.path(), "a/z.md");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), ".hidden.md");

        let loader = GlobLoader::new(dir.path(), "**/*.{md,mdx}");
        let files = loader.discover().unwrap();
        let relative: Vec<_> = files.iter().map(|f| f.relative.as_str()).collect();

        assert_eq!(relative, vec!["a.mdx", "a/z.md", "b.md", "guide/index.md"]);
        assert!(files.iter().all(|f| f.path.starts_with(dir.path())));
    }

    #[test]
    fn test_single_star_stays_in_directory() {
        let loader = GlobLoader::new("unused", "*.md");
        assert!(loader.matches("top.md").unwrap());
        assert!(!loader.matches("nested/deep.md").unwrap());
    }

    #[test]
    fn test_missing_base_is_discovery_error() {
        let dir = TempDir::new().unwrap();
        let loader = GlobLoader::new(dir.path().join("missing"), "**/*.md");
        assert!(matches!(
            loader.discover(),
            Err(ContentError::DiscoveryIo { .. })
        ));
    }

    #[test]
    fn test_invalid_pattern() {
        let loader = GlobLoader::new("unused", "[unclosed");
        assert!(matches!(
            loader.matches("x"),
            Err(ContentError::InvalidPattern { .. })
        ));
    }
}
