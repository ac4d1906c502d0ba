//! Collection schemas and front-matter validation
//!
//! A [`Schema`] is an ordered list of typed fields. Validating front-matter
//! against it is all-or-nothing: every field is checked independently, and
//! the document is [`Validation::Valid`] only if none of them failed.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::date::coerce_date;
use super::{FrontMatter, ImageRef};

/// Type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Number,
    /// Coerced from strings and epoch milliseconds
    Date,
    /// Path or URL, resolved relative to the document
    Image,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Image => "image",
        }
    }
}

/// A validated field value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Number(f64),
    Date(DateTime<Utc>),
    Image(ImageRef),
}

/// Validated front-matter, in schema field order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Data(IndexMap<String, FieldValue>);

impl Data {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.0.get(field)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        match self.0.get(field)? {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn get_number(&self, field: &str) -> Option<f64> {
        match self.0.get(field)? {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn get_date(&self, field: &str) -> Option<DateTime<Utc>> {
        match self.0.get(field)? {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn get_image(&self, field: &str) -> Option<&ImageRef> {
        match self.0.get(field)? {
            FieldValue::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A single declared field
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
    pub required: bool,
    /// Filled in when the field is absent
    pub default: Option<FieldValue>,
}

/// Why one field failed validation
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldErrorKind {
    #[error("required field is missing")]
    Missing,

    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("`{0}` is not a valid date")]
    InvalidDate(String),

    #[error("image not found at {}", .0.display())]
    ImageNotFound(PathBuf),
}

/// A failed field, by name
#[derive(Error, Debug, Clone, PartialEq)]
#[error("`{field}`: {kind}")]
pub struct FieldError {
    pub field: String,
    pub kind: FieldErrorKind,
}

/// Outcome of validating one document
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    Valid(Data),
    Invalid(Vec<FieldError>),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Validation::Valid(_))
    }

    pub fn into_result(self) -> Result<Data, Vec<FieldError>> {
        match self {
            Validation::Valid(data) => Ok(data),
            Validation::Invalid(errors) => Err(errors),
        }
    }
}

/// Where the document being validated lives, for resolving relative values
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// Full path of the document
    pub document: &'a Path,
    /// Root for `/`-prefixed image references
    pub public_dir: &'a Path,
    /// Zone for date strings that carry no offset
    pub timezone: Tz,
}

/// Declarative front-matter schema
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field that must be present
    pub fn required(self, name: &str, ty: FieldType) -> Self {
        self.field(name, ty, true, None)
    }

    /// Declare a field that may be absent
    pub fn optional(self, name: &str, ty: FieldType) -> Self {
        self.field(name, ty, false, None)
    }

    /// Declare an optional field that takes `default` when absent
    pub fn optional_with_default(self, name: &str, ty: FieldType, default: FieldValue) -> Self {
        self.field(name, ty, false, Some(default))
    }

    fn field(
        mut self,
        name: &str,
        ty: FieldType,
        required: bool,
        default: Option<FieldValue>,
    ) -> Self {
        self.fields.push(Field {
            name: name.to_string(),
            ty,
            required,
            default,
        });
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Validate raw front-matter, collecting every failing field
    pub fn validate(&self, front_matter: &FrontMatter, ctx: &ValidationContext<'_>) -> Validation {
        let mut data = IndexMap::with_capacity(self.fields.len());
        let mut errors = Vec::new();

        for field in &self.fields {
            // A null required field is missing; a null optional one is mistyped
            let raw = match front_matter.get(&field.name) {
                Some(Value::Null) if field.required => None,
                raw => raw,
            };
            let Some(raw) = raw else {
                if let Some(default) = &field.default {
                    data.insert(field.name.clone(), default.clone());
                } else if field.required {
                    errors.push(FieldError {
                        field: field.name.clone(),
                        kind: FieldErrorKind::Missing,
                    });
                }
                continue;
            };

            match check_value(field.ty, raw, ctx) {
                Ok(value) => {
                    data.insert(field.name.clone(), value);
                }
                Err(kind) => errors.push(FieldError {
                    field: field.name.clone(),
                    kind,
                }),
            }
        }

        for key in front_matter.keys() {
            if !self.fields.iter().any(|f| f.name == key) {
                tracing::debug!(
                    "{}: stripping undeclared key `{}`",
                    ctx.document.display(),
                    key
                );
            }
        }

        if errors.is_empty() {
            Validation::Valid(Data(data))
        } else {
            Validation::Invalid(errors)
        }
    }
}

fn check_value(
    ty: FieldType,
    raw: &Value,
    ctx: &ValidationContext<'_>,
) -> Result<FieldValue, FieldErrorKind> {
    let wrong_type = || FieldErrorKind::WrongType {
        expected: ty.name(),
        found: type_name(raw),
    };

    match ty {
        FieldType::String => raw
            .as_str()
            .map(|s| FieldValue::String(s.to_string()))
            .ok_or_else(wrong_type),
        FieldType::Number => match raw.as_f64() {
            Some(n) if n.is_nan() => Err(FieldErrorKind::WrongType {
                expected: "number",
                found: "NaN",
            }),
            Some(n) => Ok(FieldValue::Number(n)),
            None => Err(wrong_type()),
        },
        FieldType::Date => {
            let shown = match raw {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => return Err(wrong_type()),
            };
            coerce_date(raw, ctx.timezone)
                .map(FieldValue::Date)
                .ok_or(FieldErrorKind::InvalidDate(shown))
        }
        FieldType::Image => {
            let src = raw.as_str().ok_or_else(wrong_type)?;
            ImageRef::resolve(src, ctx.document, ctx.public_dir)
                .map(FieldValue::Image)
                .map_err(FieldErrorKind::ImageNotFound)
        }
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "array",
        Value::Mapping(_) => "object",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post_schema() -> Schema {
        Schema::new()
            .required("title", FieldType::String)
            .required("pubDate", FieldType::Date)
            .optional("summary", FieldType::String)
            .optional_with_default("weight", FieldType::Number, FieldValue::Number(99.0))
    }

    fn ctx() -> ValidationContext<'static> {
        ValidationContext {
            document: Path::new("content/post.md"),
            public_dir: Path::new("public"),
            timezone: Tz::UTC,
        }
    }

    fn front_matter(yaml: &str) -> FrontMatter {
        FrontMatter::from_fields(serde_yaml::from_str(yaml).unwrap())
    }

    #[test]
    fn test_valid_document() {
        let fm = front_matter("title: Hello\npubDate: 2024-01-05\n");
        let data = post_schema().validate(&fm, &ctx()).into_result().unwrap();

        assert_eq!(data.get_str("title"), Some("Hello"));
        assert_eq!(
            data.get_date("pubDate"),
            Some(Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap())
        );
        assert_eq!(data.get("summary"), None);
        assert_eq!(data.get_number("weight"), Some(99.0));
        assert_eq!(
            data.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["title", "pubDate", "weight"]
        );
    }

    #[test]
    fn test_explicit_value_beats_default() {
        let fm = front_matter("title: Hello\npubDate: 2024-01-05\nweight: 3\n");
        let data = post_schema().validate(&fm, &ctx()).into_result().unwrap();
        assert_eq!(data.get_number("weight"), Some(3.0));
    }

    #[test]
    fn test_collects_every_failure() {
        let fm = front_matter("summary: 42\nweight: \"3\"\n");
        let errors = post_schema().validate(&fm, &ctx()).into_result().unwrap_err();

        assert_eq!(
            errors,
            vec![
                FieldError {
                    field: "title".into(),
                    kind: FieldErrorKind::Missing
                },
                FieldError {
                    field: "pubDate".into(),
                    kind: FieldErrorKind::Missing
                },
                FieldError {
                    field: "summary".into(),
                    kind: FieldErrorKind::WrongType {
                        expected: "string",
                        found: "number"
                    }
                },
                FieldError {
                    field: "weight".into(),
                    kind: FieldErrorKind::WrongType {
                        expected: "number",
                        found: "string"
                    }
                },
            ]
        );
    }

    #[test]
    fn test_invalid_date() {
        let fm = front_matter("title: Hello\npubDate: someday\n");
        let validation = post_schema().validate(&fm, &ctx());
        assert!(!validation.is_valid());
        let errors = validation.into_result().unwrap_err();
        assert_eq!(errors[0].kind, FieldErrorKind::InvalidDate("someday".into()));
        assert_eq!(errors[0].to_string(), "`pubDate`: `someday` is not a valid date");
    }

    #[test]
    fn test_undeclared_keys_are_stripped() {
        let fm = front_matter("title: Hello\npubDate: 2024-01-05\ndraft: true\n");
        let data = post_schema().validate(&fm, &ctx()).into_result().unwrap();
        assert!(data.get("draft").is_none());
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_null_optional_is_wrong_type() {
        let fm = front_matter("title: Hello\npubDate: 2024-01-05\nsummary: ~\n");
        let errors = post_schema().validate(&fm, &ctx()).into_result().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "summary");
        assert_eq!(
            errors[0].kind,
            FieldErrorKind::WrongType {
                expected: "string",
                found: "null"
            }
        );
    }

    #[test]
    fn test_null_required_is_missing() {
        let fm = front_matter("title:\npubDate: 2024-01-05\n");
        let errors = post_schema().validate(&fm, &ctx()).into_result().unwrap_err();
        assert_eq!(errors[0].field, "title");
        assert_eq!(errors[0].kind, FieldErrorKind::Missing);
    }
}
