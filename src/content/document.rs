//! Conversion between typed records and store documents.
//!
//! Documents are JSON objects with preserved key order, using the camelCase
//! field names the admin tool writes (`createdAt`, `coverImage`, ...).

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::content::{Post, Project, RecordId};

pub type Document = Map<String, Value>;

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const CATEGORY: &str = "category";
pub const GITHUB: &str = "github";
pub const LIVE: &str = "live";
pub const IMAGE: &str = "image";
pub const SKILLS: &str = "skills";
pub const EXCERPT: &str = "excerpt";
pub const CONTENT: &str = "content";
pub const COVER_IMAGE: &str = "coverImage";
pub const AUTHOR: &str = "author";
pub const AUTHOR_IMAGE: &str = "authorImage";
pub const TAGS: &str = "tags";
pub const PUBLISHED: &str = "published";
pub const CREATED_AT: &str = "createdAt";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum RecordError {
    #[error("required field `{field}` is missing")]
    MissingField { field: &'static str },
    #[error("field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

impl RecordError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        RecordError::InvalidField { field, reason: reason.into() }
    }
}

impl Project {
    pub fn from_document(id: RecordId, doc: &Document) -> Result<Project, RecordError> {
        Ok(Project {
            id,
            title: required_title(doc)?,
            description: required_str(doc, DESCRIPTION)?,
            category: required_str(doc, CATEGORY)?,
            github: optional_str(doc, GITHUB)?,
            live: optional_str(doc, LIVE)?,
            image: required_str(doc, IMAGE)?,
            skills: string_list(doc, SKILLS)?,
            created_at: timestamp(doc, CREATED_AT)?,
        })
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(TITLE.into(), Value::from(self.title.as_str()));
        doc.insert(DESCRIPTION.into(), Value::from(self.description.as_str()));
        doc.insert(GITHUB.into(), Value::from(self.github.clone().unwrap_or_default()));
        doc.insert(LIVE.into(), Value::from(self.live.clone().unwrap_or_default()));
        doc.insert(IMAGE.into(), Value::from(self.image.as_str()));
        doc.insert(SKILLS.into(), Value::from(self.skills.clone()));
        doc.insert(CATEGORY.into(), Value::from(self.category.as_str()));
        doc.insert(CREATED_AT.into(), timestamp_value(&self.created_at));
        doc
    }
}

impl Post {
    pub fn from_document(id: RecordId, doc: &Document) -> Result<Post, RecordError> {
        Ok(Post {
            id,
            title: required_title(doc)?,
            excerpt: required_str(doc, EXCERPT)?,
            content: required_str(doc, CONTENT)?,
            cover_image: optional_str(doc, COVER_IMAGE)?,
            author: required_str(doc, AUTHOR)?,
            author_image: optional_str(doc, AUTHOR_IMAGE)?,
            tags: string_list(doc, TAGS)?,
            published: required_bool(doc, PUBLISHED)?,
            created_at: timestamp(doc, CREATED_AT)?,
        })
    }

    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert(TITLE.into(), Value::from(self.title.as_str()));
        doc.insert(EXCERPT.into(), Value::from(self.excerpt.as_str()));
        doc.insert(CONTENT.into(), Value::from(self.content.as_str()));
        doc.insert(COVER_IMAGE.into(), Value::from(self.cover_image.clone().unwrap_or_default()));
        doc.insert(TAGS.into(), Value::from(self.tags.clone()));
        doc.insert(PUBLISHED.into(), Value::from(self.published));
        doc.insert(AUTHOR.into(), Value::from(self.author.as_str()));
        if let Some(ref author_image) = self.author_image {
            doc.insert(AUTHOR_IMAGE.into(), Value::from(author_image.as_str()));
        }
        doc.insert(CREATED_AT.into(), timestamp_value(&self.created_at));
        doc
    }
}

pub fn timestamp_value(date_time: &DateTime<Utc>) -> Value {
    Value::from(date_time.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Parses a stored timestamp. Also used by the stores to order query results.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let text = value.as_str()?;
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn required_title(doc: &Document) -> Result<String, RecordError> {
    let title = required_str(doc, TITLE)?;
    if title.trim().is_empty() {
        return Err(RecordError::invalid(TITLE, "must not be empty"));
    }
    Ok(title)
}

fn required_str(doc: &Document, field: &'static str) -> Result<String, RecordError> {
    match doc.get(field) {
        None | Some(Value::Null) => Err(RecordError::MissingField { field }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(RecordError::invalid(field, format!("expected text, found {}", other))),
    }
}

// The admin tool stores "" when no value was given
fn optional_str(doc: &Document, field: &'static str) -> Result<Option<String>, RecordError> {
    match doc.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(RecordError::invalid(field, format!("expected text, found {}", other))),
    }
}

fn required_bool(doc: &Document, field: &'static str) -> Result<bool, RecordError> {
    match doc.get(field) {
        None | Some(Value::Null) => Err(RecordError::MissingField { field }),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(RecordError::invalid(field, format!("expected a boolean, found {}", other))),
    }
}

fn string_list(doc: &Document, field: &'static str) -> Result<Vec<String>, RecordError> {
    let items = match doc.get(field) {
        None | Some(Value::Null) => return Err(RecordError::MissingField { field }),
        Some(Value::Array(items)) => items,
        Some(other) => return Err(RecordError::invalid(field, format!("expected a list, found {}", other))),
    };

    items.iter()
        .map(|item| match item {
            Value::String(s) => Ok(s.clone()),
            other => Err(RecordError::invalid(field, format!("expected text items, found {}", other))),
        })
        .collect()
}

fn timestamp(doc: &Document, field: &'static str) -> Result<DateTime<Utc>, RecordError> {
    let value = match doc.get(field) {
        None | Some(Value::Null) => return Err(RecordError::MissingField { field }),
        Some(value) => value,
    };
    parse_timestamp(value)
        .ok_or_else(|| RecordError::invalid(field, format!("expected an RFC 3339 timestamp, found {}", value)))
}
