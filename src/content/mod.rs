use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod content_renderer;
pub mod document;

#[derive(Debug, Clone, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Projects,
    Blog,
}

impl Collection {
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Projects => "projects",
            Collection::Blog => "blog",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "projects" => Ok(Collection::Projects),
            "blog" => Ok(Collection::Blog),
            other => Err(format!("Unknown collection {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub id: RecordId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub github: Option<String>,
    pub live: Option<String>,
    pub image: String,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub id: RecordId,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub cover_image: Option<String>,
    pub author: String,
    pub author_image: Option<String>,
    pub tags: Vec<String>,
    pub published: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ContentRecord {
    Project(Project),
    Post(Post),
}

impl ContentRecord {
    pub fn id(&self) -> &RecordId {
        match self {
            ContentRecord::Project(project) => &project.id,
            ContentRecord::Post(post) => &post.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ContentRecord::Project(project) => project.title.as_str(),
            ContentRecord::Post(post) => post.title.as_str(),
        }
    }

    pub fn created_at(&self) -> &DateTime<Utc> {
        match self {
            ContentRecord::Project(project) => &project.created_at,
            ContentRecord::Post(post) => &post.created_at,
        }
    }

    pub fn collection(&self) -> Collection {
        match self {
            ContentRecord::Project(_) => Collection::Projects,
            ContentRecord::Post(_) => Collection::Blog,
        }
    }
}

impl Display for ContentRecord {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} title={} created_at={}",
               self.collection(),
               self.id(),
               self.title(),
               self.created_at().to_rfc3339(),
        )
    }
}
