use std::sync::Arc;

use crate::content::document::Document;
use crate::content::{Collection, RecordId};
use crate::store::memory_store::MemoryStore;

pub const PROJECT_DOC: &str = r##"{
    "title": "Weather dashboard",
    "description": "Forecasts for the next seven days, rendered on the server.",
    "github": "https://github.com/jpaul/weather",
    "live": "",
    "image": "https://storage.example.com/projects/weather.png",
    "skills": ["Rust", "HTML", "CSS"],
    "category": "web",
    "createdAt": "2024-03-01T09:30:00.000Z"
}"##;

pub const MOBILE_PROJECT_DOC: &str = r##"{
    "title": "Habit tracker",
    "description": "A small offline-first habit tracker.",
    "github": "",
    "live": "https://habits.example.com",
    "image": "https://storage.example.com/projects/habits.png",
    "skills": ["Kotlin"],
    "category": "mobile",
    "createdAt": "2024-04-11T18:00:00.000Z"
}"##;

pub const PUBLISHED_POST_DOC: &str = r##"{
    "title": "Hello World",
    "excerpt": "First post on the new site.",
    "content": "<p>Welcome to my <strong>new</strong> blog.</p>",
    "coverImage": "",
    "tags": ["Intro", "Rust"],
    "published": true,
    "author": "Juma Paul",
    "createdAt": "2024-05-01T10:00:00.000Z"
}"##;

pub const DRAFT_POST_DOC: &str = r##"{
    "title": "Work in progress",
    "excerpt": "Not ready yet.",
    "content": "<p>Draft</p>",
    "coverImage": "https://storage.example.com/blog/draft.png",
    "tags": [],
    "published": false,
    "author": "Juma Paul",
    "createdAt": "2024-06-01T10:00:00.000Z"
}"##;

pub const OLDER_POST_DOC: &str = r##"{
    "title": "Setting up my Dev Box",
    "excerpt": "Tools I use every day.",
    "content": "<p>Editor, terminal and a lot of coffee.</p>",
    "coverImage": "https://storage.example.com/blog/devbox.png",
    "authorImage": "https://storage.example.com/blog/me.png",
    "tags": ["Tools"],
    "published": true,
    "author": "Juma Paul",
    "createdAt": "2024-01-15T08:00:00.000Z"
}"##;

pub fn document(json: &str) -> Document {
    serde_json::from_str(json).unwrap()
}

/// Two projects (`p1` web, `p2` mobile) and three posts: `a` published,
/// `b` draft and newest, `c` published and oldest.
pub fn seeded_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::from_documents(vec![
        (Collection::Projects, RecordId::from("p1"), document(PROJECT_DOC)),
        (Collection::Projects, RecordId::from("p2"), document(MOBILE_PROJECT_DOC)),
        (Collection::Blog, RecordId::from("c"), document(OLDER_POST_DOC)),
        (Collection::Blog, RecordId::from("a"), document(PUBLISHED_POST_DOC)),
        (Collection::Blog, RecordId::from("b"), document(DRAFT_POST_DOC)),
    ]))
}

pub fn words(count: usize) -> String {
    vec!["word"; count].join(" ")
}
