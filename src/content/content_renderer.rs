use serde::Serialize;

use crate::content::{Collection, ContentRecord, Post, Project, RecordId};
use crate::text_utils::{compute_read_time, format_date, read_time_label, slugify};

pub const DEFAULT_COVER_IMAGE: &str = "/public/images/head-shot.jpg";
pub const DEFAULT_AUTHOR_IMAGE: &str = "/public/images/default-avatar.jpg";

#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    pub default_cover_image: String,
    pub default_author_image: String,
}

impl Default for RenderSettings {
    fn default() -> Self {
        RenderSettings {
            default_cover_image: DEFAULT_COVER_IMAGE.to_string(),
            default_author_image: DEFAULT_AUTHOR_IMAGE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    GitHub,
    LiveDemo,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectLink {
    pub kind: LinkKind,
    pub label: &'static str,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectCard {
    pub id: RecordId,
    pub title: String,
    pub image: String,
    pub skills: Vec<String>,
    pub description: String,
    pub category: String,
    pub links: Vec<ProjectLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostPreview {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    pub date: String,
    pub read_minutes: u32,
    pub read_time: String,
    pub excerpt: String,
    pub tags: Vec<String>,
    pub cover_image: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Summary {
    Project(ProjectCard),
    Post(PostPreview),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detail {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    pub author_image: String,
    pub date: String,
    pub read_minutes: u32,
    pub read_time: String,
    pub body: String,
    pub tags: Vec<String>,
    pub slug: String,
}

/// One row of the admin listings: drafts included, with edit/delete keyed by id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdminRow {
    pub collection: Collection,
    pub id: RecordId,
    pub title: String,
    pub text: String,
    pub badge: String,
}

/// Maps records to display structures. Derived fields are computed on every
/// call and the records are never touched.
#[derive(Debug, Clone, Default)]
pub struct ContentRenderer {
    settings: RenderSettings,
}

impl ContentRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        ContentRenderer { settings }
    }

    pub fn render_summary(&self, record: &ContentRecord) -> Summary {
        match record {
            ContentRecord::Project(project) => Summary::Project(self.project_card(project)),
            ContentRecord::Post(post) => Summary::Post(self.post_preview(post)),
        }
    }

    pub fn project_card(&self, project: &Project) -> ProjectCard {
        let mut links = vec![];
        if let Some(ref github) = project.github {
            links.push(ProjectLink {
                kind: LinkKind::GitHub,
                label: "GitHub",
                url: github.clone(),
            });
        }
        if let Some(ref live) = project.live {
            links.push(ProjectLink {
                kind: LinkKind::LiveDemo,
                label: "Live Demo",
                url: live.clone(),
            });
        }

        ProjectCard {
            id: project.id.clone(),
            title: project.title.clone(),
            image: project.image.clone(),
            skills: project.skills.clone(),
            description: project.description.clone(),
            category: project.category.clone(),
            links,
        }
    }

    pub fn post_preview(&self, post: &Post) -> PostPreview {
        let read_minutes = compute_read_time(&post.content);
        PostPreview {
            id: post.id.clone(),
            title: post.title.clone(),
            author: post.author.clone(),
            date: format_date(&post.created_at),
            read_minutes,
            read_time: read_time_label(read_minutes),
            excerpt: post.excerpt.clone(),
            tags: post.tags.clone(),
            cover_image: post.cover_image.clone()
                .unwrap_or_else(|| self.settings.default_cover_image.clone()),
            href: format!("/blog/{}", post.id),
        }
    }

    pub fn render_detail(&self, post: &Post) -> Detail {
        let read_minutes = compute_read_time(&post.content);
        Detail {
            id: post.id.clone(),
            title: post.title.clone(),
            author: post.author.clone(),
            author_image: post.author_image.clone()
                .unwrap_or_else(|| self.settings.default_author_image.clone()),
            date: format_date(&post.created_at),
            read_minutes,
            read_time: read_time_label(read_minutes),
            body: post.content.clone(),
            tags: post.tags.clone(),
            slug: slugify(&post.title, &post.created_at),
        }
    }

    pub fn render_admin_summary(&self, record: &ContentRecord) -> AdminRow {
        let (text, badge) = match record {
            ContentRecord::Project(project) => {
                (project.description.clone(), format!("Category: {}", project.category))
            }
            ContentRecord::Post(post) => {
                let status = if post.published { "Published" } else { "Draft" };
                (post.excerpt.clone(), format!("Status: {}", status))
            }
        };

        AdminRow {
            collection: record.collection(),
            id: record.id().clone(),
            title: record.title().to_string(),
            text,
            badge,
        }
    }
}
