//! Content management for the site owner: unfiltered listings and CRUD over
//! both collections.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use spdlog::info;
use thiserror::Error;

use crate::content::content_renderer::{AdminRow, ContentRenderer};
use crate::content::document::CREATED_AT;
use crate::content::{Collection, ContentRecord, Post, Project, RecordId};
use crate::filter_engine::normalize_category;
use crate::load_coordinator::{decode_post, decode_project, LoadCoordinator, LoadError};
use crate::store::{ContentStore, Direction, Query, StoreError};
use crate::text_utils::split_list;

lazy_static! {
    static ref URL_RE: Regex = Regex::new(r"^https?://\S+$").unwrap();
}

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error(transparent)]
    Load(#[from] LoadError),
}

impl From<StoreError> for AdminError {
    fn from(err: StoreError) -> Self {
        AdminError::Load(err.into())
    }
}

fn invalid(field: &'static str, reason: &str) -> AdminError {
    AdminError::Invalid { field, reason: reason.to_string() }
}

/// Form fields for a project. `skills` is a comma-separated list.
#[derive(Debug, Clone, Default)]
pub struct ProjectInput {
    pub title: String,
    pub description: String,
    pub category: String,
    pub github: Option<String>,
    pub live: Option<String>,
    pub image: Option<String>,
    pub skills: String,
}

/// Form fields for a post. `tags` is a comma-separated list.
#[derive(Debug, Clone, Default)]
pub struct PostInput {
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub tags: String,
    pub published: bool,
    pub cover_image: Option<String>,
    pub author: Option<String>,
    pub author_image: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(field: &'static str, value: &str) -> Result<String, AdminError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid(field, "must not be empty"));
    }
    Ok(value.to_string())
}

fn url(field: &'static str, value: &Option<String>) -> Result<Option<String>, AdminError> {
    match non_empty(value) {
        Some(url) if !URL_RE.is_match(&url) => Err(invalid(field, "must be an http(s) URL")),
        other => Ok(other),
    }
}

pub struct AdminService {
    store: Arc<dyn ContentStore>,
    loader: LoadCoordinator,
    renderer: ContentRenderer,
    default_author: String,
}

impl AdminService {
    pub fn new(store: Arc<dyn ContentStore>, default_author: &str) -> Self {
        AdminService {
            loader: LoadCoordinator::new(store.clone()),
            renderer: ContentRenderer::default(),
            default_author: default_author.to_string(),
            store,
        }
    }

    /// Every project, newest first.
    pub async fn list_projects(&self) -> Result<Vec<AdminRow>, AdminError> {
        let query = Query::collection(Collection::Projects).order_by(CREATED_AT, Direction::Descending);
        let docs = self.store.query(&query).await?;
        docs.iter()
            .map(|doc| -> Result<AdminRow, AdminError> {
                let project = decode_project(doc)?;
                Ok(self.renderer.render_admin_summary(&ContentRecord::Project(project)))
            })
            .collect()
    }

    /// Every post, drafts included, newest first.
    pub async fn list_posts(&self) -> Result<Vec<AdminRow>, AdminError> {
        let query = Query::collection(Collection::Blog).order_by(CREATED_AT, Direction::Descending);
        let docs = self.store.query(&query).await?;
        docs.iter()
            .map(|doc| -> Result<AdminRow, AdminError> {
                let post = decode_post(doc)?;
                Ok(self.renderer.render_admin_summary(&ContentRecord::Post(post)))
            })
            .collect()
    }

    pub async fn find(&self, collection: Collection, id: &RecordId) -> Result<ContentRecord, AdminError> {
        Ok(self.loader.load_one(collection, id).await?)
    }

    pub async fn create_project(&self, input: &ProjectInput) -> Result<RecordId, AdminError> {
        let image = url("image", &input.image)?
            .ok_or_else(|| invalid("image", "is required for a new project"))?;
        let project = self.project_from(RecordId(String::new()), input, image, Utc::now())?;

        let id = self.store.create(Collection::Projects, project.to_document()).await?;
        info!("Created project {} ({})", id, project.title);
        Ok(id)
    }

    /// Keeps the identifier, the creation time and, unless a new one is
    /// given, the image.
    pub async fn update_project(&self, id: &RecordId, input: &ProjectInput) -> Result<(), AdminError> {
        let current = match self.find(Collection::Projects, id).await? {
            ContentRecord::Project(project) => project,
            ContentRecord::Post(_) => return Err(LoadError::NotFound { collection: Collection::Projects, id: id.clone() }.into()),
        };
        let image = url("image", &input.image)?.unwrap_or(current.image);
        let project = self.project_from(id.clone(), input, image, current.created_at)?;

        let mut changes = project.to_document();
        changes.remove(CREATED_AT);
        self.store.update(Collection::Projects, id, changes).await?;
        info!("Updated project {}", id);
        Ok(())
    }

    pub async fn create_post(&self, input: &PostInput) -> Result<RecordId, AdminError> {
        let post = self.post_from(RecordId(String::new()), input, None, Utc::now())?;

        let id = self.store.create(Collection::Blog, post.to_document()).await?;
        info!("Created post {} ({}, published={})", id, post.title, post.published);
        Ok(id)
    }

    pub async fn update_post(&self, id: &RecordId, input: &PostInput) -> Result<(), AdminError> {
        let current = self.loader.load_post(id).await?;
        let post = self.post_from(id.clone(), input, Some(&current), current.created_at)?;

        let mut changes = post.to_document();
        changes.remove(CREATED_AT);
        self.store.update(Collection::Blog, id, changes).await?;
        info!("Updated post {}", id);
        Ok(())
    }

    pub async fn delete(&self, collection: Collection, id: &RecordId) -> Result<(), AdminError> {
        self.store.delete(collection, id).await?;
        info!("Deleted {} record {}", collection, id);
        Ok(())
    }

    fn project_from(&self, id: RecordId, input: &ProjectInput, image: String, created_at: DateTime<Utc>) -> Result<Project, AdminError> {
        Ok(Project {
            id,
            title: required("title", &input.title)?,
            description: input.description.trim().to_string(),
            category: normalize_category(&required("category", &input.category)?),
            github: url("github", &input.github)?,
            live: url("live", &input.live)?,
            image,
            skills: split_list(&input.skills),
            created_at,
        })
    }

    fn post_from(&self, id: RecordId, input: &PostInput, current: Option<&Post>, created_at: DateTime<Utc>) -> Result<Post, AdminError> {
        let cover_image = match url("cover_image", &input.cover_image)? {
            Some(image) => Some(image),
            None => current.and_then(|p| p.cover_image.clone()),
        };
        let author_image = match url("author_image", &input.author_image)? {
            Some(image) => Some(image),
            None => current.and_then(|p| p.author_image.clone()),
        };
        let author = non_empty(&input.author)
            .or_else(|| current.map(|p| p.author.clone()))
            .unwrap_or_else(|| self.default_author.clone());

        Ok(Post {
            id,
            title: required("title", &input.title)?,
            excerpt: input.excerpt.trim().to_string(),
            content: input.content.clone(),
            cover_image,
            author,
            author_image,
            tags: split_list(&input.tags),
            published: input.published,
            created_at,
        })
    }
}
