//! Image references in front-matter

use serde::Serialize;
use std::path::{Path, PathBuf};

/// An image named by a document, resolved against the document's location
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ImageRef {
    /// A file on disk
    Local { src: String, path: PathBuf },
    /// An absolute http(s) URL, left untouched
    Remote { src: String },
}

impl ImageRef {
    /// Resolve `src` as written in `document`.
    ///
    /// `/`-prefixed sources live under `public_dir`; everything else that is
    /// not a URL is relative to the document's directory. Local images must
    /// exist; the missing path is returned otherwise.
    pub fn resolve(src: &str, document: &Path, public_dir: &Path) -> Result<Self, PathBuf> {
        if src.starts_with("http://") || src.starts_with("https://") {
            return Ok(ImageRef::Remote {
                src: src.to_string(),
            });
        }

        let path = match src.strip_prefix('/') {
            Some(rest) => public_dir.join(rest),
            None => document
                .parent()
                .map(|dir| dir.join(src))
                .unwrap_or_else(|| PathBuf::from(src)),
        };

        if !path.is_file() {
            return Err(path);
        }

        Ok(ImageRef::Local {
            src: src.to_string(),
            path,
        })
    }

    /// The reference exactly as the author wrote it
    pub fn src(&self) -> &str {
        match self {
            ImageRef::Local { src, .. } | ImageRef::Remote { src } => src,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_relative_to_document() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("blog/img")).unwrap();
        fs::write(dir.path().join("blog/img/hero.png"), b"png").unwrap();
        let doc = dir.path().join("blog/post.md");

        let image = ImageRef::resolve("./img/hero.png", &doc, dir.path()).unwrap();
        assert_eq!(image.src(), "./img/hero.png");
        match image {
            ImageRef::Local { path, .. } => assert!(path.is_file()),
            other => panic!("expected local image, got {:?}", other),
        }
    }

    #[test]
    fn test_public_dir_and_missing() {
        let dir = TempDir::new().unwrap();
        let public = dir.path().join("public");
        fs::create_dir_all(&public).unwrap();
        fs::write(public.join("logo.svg"), b"<svg/>").unwrap();
        let doc = dir.path().join("blog/post.md");

        assert!(ImageRef::resolve("/logo.svg", &doc, &public).is_ok());
        let missing = ImageRef::resolve("nope.png", &doc, &public).unwrap_err();
        assert_eq!(missing, dir.path().join("blog/nope.png"));
    }

    #[test]
    fn test_remote_is_kept() {
        let image = ImageRef::resolve(
            "https://cdn.example.com/a.png",
            Path::new("x.md"),
            Path::new("public"),
        )
        .unwrap();
        assert_eq!(
            image,
            ImageRef::Remote {
                src: "https://cdn.example.com/a.png".into()
            }
        );
    }
}
