//! Content entries and the typed records built from them

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

use super::error::{ContentError, Result};
use super::{Data, Heading, ImageRef};

/// A validated document from a collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    /// Slug, unique within the collection
    pub id: String,

    /// Name of the owning collection
    pub collection: String,

    /// Source path relative to the collection base
    pub file_path: PathBuf,

    /// Validated front-matter
    pub data: Data,

    /// Raw body after the front-matter block
    pub body: String,

    /// Headings in the body, in order
    pub headings: Vec<Heading>,

    /// Hash of the raw source file
    pub digest: String,
}

impl Entry {
    pub fn slug(&self) -> &str {
        &self.id
    }

    fn shape_error(&self, field: &'static str) -> ContentError {
        ContentError::RecordShape {
            collection: self.collection.clone(),
            slug: self.id.clone(),
            field,
        }
    }

    fn required_str(&self, field: &'static str) -> Result<String> {
        self.data
            .get_str(field)
            .map(str::to_string)
            .ok_or_else(|| self.shape_error(field))
    }
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub pub_date: DateTime<Utc>,
    pub updated_date: Option<DateTime<Utc>>,
    pub hero_image: Option<ImageRef>,
}

impl TryFrom<&Entry> for BlogPost {
    type Error = ContentError;

    fn try_from(entry: &Entry) -> Result<Self> {
        Ok(Self {
            slug: entry.id.clone(),
            title: entry.required_str("title")?,
            description: entry.required_str("description")?,
            pub_date: entry
                .data
                .get_date("pubDate")
                .ok_or_else(|| entry.shape_error("pubDate"))?,
            updated_date: entry.data.get_date("updatedDate"),
            hero_image: entry.data.get_image("heroImage").cloned(),
        })
    }
}

impl BlogPost {
    /// The later of the publication and update dates
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.updated_date
            .map_or(self.pub_date, |updated| updated.max(self.pub_date))
    }
}

/// A developer documentation page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DevDoc {
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub order: f64,
}

impl TryFrom<&Entry> for DevDoc {
    type Error = ContentError;

    fn try_from(entry: &Entry) -> Result<Self> {
        Ok(Self {
            slug: entry.id.clone(),
            title: entry.required_str("title")?,
            description: entry.data.get_str("description").map(str::to_string),
            order: entry
                .data
                .get_number("order")
                .ok_or_else(|| entry.shape_error("order"))?,
        })
    }
}

/// Sort posts by publication date, newest first
pub fn sort_posts_newest_first(posts: &mut [BlogPost]) {
    posts.sort_by(|a, b| {
        b.pub_date
            .cmp(&a.pub_date)
            .then_with(|| a.slug.cmp(&b.slug))
    });
}

/// Sort docs by `order`, so unordered pages (99) come last
pub fn sort_docs(docs: &mut [DevDoc]) {
    docs.sort_by(|a, b| {
        a.order
            .total_cmp(&b.order)
            .then_with(|| a.title.cmp(&b.title))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(slug: &str, day: u32) -> BlogPost {
        BlogPost {
            slug: slug.into(),
            title: slug.to_uppercase(),
            description: "d".into(),
            pub_date: Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            updated_date: None,
            hero_image: None,
        }
    }

    fn doc(title: &str, order: f64) -> DevDoc {
        DevDoc {
            slug: title.to_lowercase(),
            title: title.into(),
            description: None,
            order,
        }
    }

    #[test]
    fn test_sort_posts_newest_first() {
        let mut posts = vec![
            post("old", 1),
            post("new", 20),
            post("mid-b", 10),
            post("mid-a", 10),
        ];
        sort_posts_newest_first(&mut posts);
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "mid-a", "mid-b", "old"]);
    }

    #[test]
    fn test_sort_docs_unordered_last() {
        let mut docs = vec![
            doc("Zeta", 99.0),
            doc("Setup", 2.0),
            doc("Intro", 1.0),
            doc("Alpha", 99.0),
        ];
        sort_docs(&mut docs);
        let titles: Vec<_> = docs.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["Intro", "Setup", "Alpha", "Zeta"]);
    }

    #[test]
    fn test_last_modified() {
        let mut p = post("a", 5);
        assert_eq!(p.last_modified(), p.pub_date);
        let later = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
        p.updated_date = Some(later);
        assert_eq!(p.last_modified(), later);
    }

    #[test]
    fn test_wrong_shape_is_reported() {
        let entry = Entry {
            id: "intro".into(),
            collection: "developerDocs".into(),
            file_path: PathBuf::from("intro.md"),
            data: Data::default(),
            body: String::new(),
            headings: Vec::new(),
            digest: String::new(),
        };
        let err = BlogPost::try_from(&entry).unwrap_err();
        assert!(matches!(err, ContentError::RecordShape { field: "title", .. }));
    }
}
