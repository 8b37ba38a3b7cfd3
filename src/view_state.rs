//! Which region of the page is visible and which navigation link is active.

use crate::content::{Post, RecordId};
use crate::text_utils::slugify;

pub const DEFAULT_HEADER_BUFFER: f64 = 150.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SectionOffset {
    pub id: String,
    pub top: f64,
}

impl SectionOffset {
    pub fn new(id: &str, top: f64) -> Self {
        SectionOffset {
            id: id.to_string(),
            top,
        }
    }
}

/// Picks the last section, in document order, whose top is at or above
/// `scroll_y + buffer`. Falls back to the first section when none is.
pub fn compute_active_section(scroll_y: f64, offsets: &[SectionOffset], buffer: f64) -> Option<&str> {
    let position = scroll_y + buffer;
    let first = offsets.first()?;
    let active = offsets.iter()
        .rev()
        .find(|section| section.top <= position)
        .unwrap_or(first);
    Some(active.id.as_str())
}

/// Tracks the active navigation link. Offsets change only on resize; scroll
/// events are coalesced and applied once per display frame.
#[derive(Debug, Clone)]
pub struct NavTracker {
    offsets: Vec<SectionOffset>,
    buffer: f64,
    scroll_y: f64,
    pending: bool,
    active: Option<String>,
}

impl NavTracker {
    pub fn new(offsets: Vec<SectionOffset>, buffer: f64) -> Self {
        let active = compute_active_section(0.0, &offsets, buffer).map(|s| s.to_string());
        NavTracker {
            offsets,
            buffer,
            scroll_y: 0.0,
            pending: false,
            active,
        }
    }

    pub fn on_scroll(&mut self, scroll_y: f64) {
        self.scroll_y = scroll_y;
        self.pending = true;
    }

    pub fn on_resize(&mut self, offsets: Vec<SectionOffset>) {
        self.offsets = offsets;
        self.pending = true;
    }

    /// Recomputes the highlight if anything changed since the last frame.
    /// Returns true when the active section moved.
    pub fn on_frame(&mut self) -> bool {
        if !self.pending {
            return false;
        }
        self.pending = false;

        let active = compute_active_section(self.scroll_y, &self.offsets, self.buffer).map(|s| s.to_string());
        if active == self.active {
            return false;
        }
        self.active = active;
        true
    }

    pub fn active_section(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn offsets(&self) -> &[SectionOffset] {
        &self.offsets
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    ListView,
    DetailView(RecordId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrollRequest {
    Top,
    IntoView { section: String, smooth: bool },
}

/// Owns the list/detail switch. The visibility of both roots is derived
/// from the single state value, so they can never be shown together.
#[derive(Debug, Clone)]
pub struct ViewController {
    state: ViewState,
    location: Option<String>,
    scroll_request: Option<ScrollRequest>,
    list_section: String,
}

impl ViewController {
    pub fn new(list_section: &str) -> Self {
        ViewController {
            state: ViewState::ListView,
            location: None,
            scroll_request: None,
            list_section: list_section.to_string(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn list_root_visible(&self) -> bool {
        self.state == ViewState::ListView
    }

    pub fn detail_root_visible(&self) -> bool {
        !self.list_root_visible()
    }

    pub fn enter_detail_view(&mut self, post: &Post) {
        self.state = ViewState::DetailView(post.id.clone());
        self.location = Some(format!("blog/{}", slugify(&post.title, &post.created_at)));
        self.scroll_request = Some(ScrollRequest::Top);
    }

    pub fn exit_detail_view(&mut self) {
        self.close_detail();
        self.scroll_request = Some(ScrollRequest::IntoView {
            section: self.list_section.clone(),
            smooth: true,
        });
    }

    /// A navigation link was followed while the post was open: back to the
    /// list, letting the link do the scrolling.
    pub fn close_for_navigation(&mut self) {
        if self.detail_root_visible() {
            self.close_detail();
            self.scroll_request = None;
        }
    }

    fn close_detail(&mut self) {
        self.state = ViewState::ListView;
        self.location = None;
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn scroll_request(&self) -> Option<&ScrollRequest> {
        self.scroll_request.as_ref()
    }
}
