//! Front-matter parsing
//!
//! Splits a document into its loosely-typed front-matter map and the body
//! that follows. Typing happens later, against a collection [`Schema`].
//!
//! [`Schema`]: super::Schema

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde_yaml::Value;
use thiserror::Error;

lazy_static! {
    /// A `key:` line, where the key is a plain identifier and not a URL scheme
    static ref YAML_KEY_LINE: Regex =
        Regex::new(r"^([A-Za-z0-9_-]+):(\s|$)").expect("valid front-matter key regex");
}

/// Front-matter syntax errors
#[derive(Error, Debug)]
pub enum FrontMatterError {
    #[error("YAML front-matter: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML front-matter: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON front-matter: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unterminated {0} front-matter block")]
    Unterminated(&'static str),

    #[error("front-matter must be a key/value mapping")]
    NotAMapping,
}

/// Which syntax a front-matter block was written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrontMatterFormat {
    Yaml,
    Toml,
    Json,
}

/// Raw front-matter of a document: string keys, untyped values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    fields: IndexMap<String, Value>,
    format: Option<FrontMatterFormat>,
}

impl FrontMatter {
    /// Build front-matter from already-parsed fields
    pub fn from_fields(fields: IndexMap<String, Value>) -> Self {
        Self {
            fields,
            format: None,
        }
    }

    /// Parse front-matter from content string
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        if content.starts_with("---") {
            return Self::parse_yaml(content);
        }

        if content.starts_with("+++") {
            return Self::parse_toml(content);
        }

        if content.starts_with(";;;") || content.starts_with('{') {
            return Self::parse_json(content);
        }

        Ok((FrontMatter::default(), content))
    }

    /// Look up a raw value. An empty `key:` comes back as `Value::Null`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Keys in document order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn format(&self) -> Option<FrontMatterFormat> {
        self.format
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn parse_yaml(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let rest = content[3..].trim_start_matches(['\n', '\r']);

        let Some(end_pos) = find_closing_fence(rest, "---") else {
            // A lone thematic break, not front-matter
            return Ok((FrontMatter::default(), content));
        };

        let yaml_content = &rest[..end_pos];
        let remaining = skip_fence(&rest[end_pos..], "---");

        if yaml_content.trim().is_empty() {
            return Ok((FrontMatter::with_format(FrontMatterFormat::Yaml), remaining));
        }

        // `---` is also markdown for a horizontal rule; prose between two of
        // them is body text, not metadata
        let has_yaml_structure = yaml_content.lines().any(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return false;
            }
            YAML_KEY_LINE
                .captures(trimmed)
                .map(|caps| !matches!(&caps[1], "http" | "https" | "ftp"))
                .unwrap_or(false)
        });

        if !has_yaml_structure {
            return Ok((FrontMatter::default(), content));
        }

        let value: Value = serde_yaml::from_str(yaml_content)?;
        let fields = match value {
            Value::Mapping(mapping) => mapping_to_fields(mapping)?,
            Value::Null => IndexMap::new(),
            _ => return Err(FrontMatterError::NotAMapping),
        };

        Ok((
            FrontMatter {
                fields,
                format: Some(FrontMatterFormat::Yaml),
            },
            remaining,
        ))
    }

    fn parse_toml(content: &str) -> Result<(Self, &str), FrontMatterError> {
        let rest = content[3..].trim_start_matches(['\n', '\r']);

        let end_pos =
            find_closing_fence(rest, "+++").ok_or(FrontMatterError::Unterminated("TOML"))?;
        let toml_content = &rest[..end_pos];
        let remaining = skip_fence(&rest[end_pos..], "+++");

        let table: toml::Table = toml::from_str(toml_content)?;
        let fields = table
            .into_iter()
            .map(|(key, value)| (key, toml_to_yaml(value)))
            .collect();

        Ok((
            FrontMatter {
                fields,
                format: Some(FrontMatterFormat::Toml),
            },
            remaining,
        ))
    }

    fn parse_json(content: &str) -> Result<(Self, &str), FrontMatterError> {
        // JSON front-matter fenced with ;;;
        if let Some(rest) = content.strip_prefix(";;;") {
            let end_pos = rest.find(";;;").ok_or(FrontMatterError::Unterminated("JSON"))?;
            let json_content = rest[..end_pos].trim();
            let remaining = rest[end_pos + 3..].trim_start_matches(['\n', '\r']);

            // The fenced form may omit the outer braces
            let fields = if json_content.starts_with('{') {
                serde_json::from_str(json_content)?
            } else {
                serde_json::from_str(&format!("{{{}}}", json_content))?
            };

            return Ok((
                FrontMatter {
                    fields,
                    format: Some(FrontMatterFormat::Json),
                },
                remaining,
            ));
        }

        // A bare JSON object at the start of the file
        let end_pos = find_object_end(content).ok_or(FrontMatterError::Unterminated("JSON"))?;
        let json_content = &content[..end_pos];
        let remaining = content[end_pos..].trim_start_matches(['\n', '\r']);

        let fields = serde_json::from_str(json_content)?;

        Ok((
            FrontMatter {
                fields,
                format: Some(FrontMatterFormat::Json),
            },
            remaining,
        ))
    }

    fn with_format(format: FrontMatterFormat) -> Self {
        Self {
            fields: IndexMap::new(),
            format: Some(format),
        }
    }
}

/// Position of a fence line (`\n---`) closing a block that starts at `rest`
fn find_closing_fence(rest: &str, fence: &str) -> Option<usize> {
    if rest.starts_with(fence) {
        return Some(0);
    }
    rest.find(&format!("\n{}", fence)).map(|pos| pos + 1)
}

/// Drop the fence itself and the line break after it
fn skip_fence<'a>(rest: &'a str, fence: &str) -> &'a str {
    rest[fence.len()..].trim_start_matches(['\n', '\r'])
}

/// Byte offset just past the `}` matching the opening brace, ignoring braces
/// inside string literals
fn find_object_end(content: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in content.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

fn mapping_to_fields(
    mapping: serde_yaml::Mapping,
) -> Result<IndexMap<String, Value>, FrontMatterError> {
    mapping
        .into_iter()
        .map(|(key, value)| match key {
            Value::String(key) => Ok((key, value)),
            _ => Err(FrontMatterError::NotAMapping),
        })
        .collect()
}

fn toml_to_yaml(value: toml::Value) -> Value {
    match value {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => Value::Number(f.into()),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(items) => Value::Sequence(items.into_iter().map(toml_to_yaml).collect()),
        toml::Value::Table(table) => Value::Mapping(
            table
                .into_iter()
                .map(|(k, v)| (Value::String(k), toml_to_yaml(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
pubDate: 2024-01-15
order: 3
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.format(), Some(FrontMatterFormat::Yaml));
        assert_eq!(fm.get("title"), Some(&Value::String("Hello World".into())));
        assert_eq!(fm.get("pubDate"), Some(&Value::String("2024-01-15".into())));
        assert_eq!(fm.get("order").and_then(Value::as_i64), Some(3));
        assert_eq!(fm.keys().collect::<Vec<_>>(), vec!["title", "pubDate", "order"]);
        assert!(remaining.starts_with("This is the content."));
    }

    #[test]
    fn test_empty_key_reads_as_null() {
        let content = "---\ntitle: A\nupdatedDate:\n---\nbody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.get("updatedDate"), Some(&Value::Null));
        assert!(fm.get("heroImage").is_none());
        assert_eq!(remaining, "body");
    }

    #[test]
    fn test_parse_toml_frontmatter() {
        let content =
            "+++\ntitle = \"Toml Post\"\norder = 2\npubDate = 2024-01-05\n+++\nBody text\n";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.format(), Some(FrontMatterFormat::Toml));
        assert_eq!(fm.get("title"), Some(&Value::String("Toml Post".into())));
        assert_eq!(fm.get("order").and_then(Value::as_i64), Some(2));
        assert_eq!(fm.get("pubDate"), Some(&Value::String("2024-01-05".into())));
        assert_eq!(remaining, "Body text\n");
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = r#"{"title": "Test Post", "note": "has } brace"}

This is content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.format(), Some(FrontMatterFormat::Json));
        assert_eq!(fm.get("title"), Some(&Value::String("Test Post".into())));
        assert!(remaining.contains("This is content."));
    }

    #[test]
    fn test_parse_fenced_json_frontmatter() {
        let content = ";;;\n\"title\": \"Fenced\"\n;;;\nBody";
        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.get("title"), Some(&Value::String("Fenced".into())));
        assert_eq!(remaining, "Body");
    }

    #[test]
    fn test_no_frontmatter() {
        let (fm, remaining) = FrontMatter::parse("# Just a heading\n").unwrap();
        assert!(fm.is_empty());
        assert_eq!(fm.format(), None);
        assert_eq!(remaining, "# Just a heading\n");
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let content = "---\ntitle: [unclosed\n---\nbody";
        assert!(matches!(
            FrontMatter::parse(content),
            Err(FrontMatterError::Yaml(_))
        ));
    }

    #[test]
    fn test_unterminated_toml_is_an_error() {
        let content = "+++\ntitle = \"x\"\n";
        assert!(matches!(
            FrontMatter::parse(content),
            Err(FrontMatterError::Unterminated("TOML"))
        ));
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        let content = r#"
---

Some random text with markdown lists:
- Item 1
- Item 2

---
More content here.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert!(fm.is_empty());
        assert!(remaining.contains("Some random text"));
    }

    #[test]
    fn test_content_with_url_not_yaml() {
        let content = r#"
---

Check out https://example.com/path and http://test.com

---
More content.
"#;

        let (fm, remaining) = FrontMatter::parse(content).unwrap();
        assert!(fm.is_empty());
        assert!(remaining.contains("https://example.com"));
    }

    #[test]
    fn test_bom_is_ignored() {
        let content = "\u{feff}---\ntitle: Bom\n---\n";
        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.get("title"), Some(&Value::String("Bom".into())));
    }
}
