//! The public page as a single state value: events change the state, and
//! `page()` turns the state into a view model for whatever display draws it.

use std::sync::Arc;

use spdlog::{info, warn};

use crate::content::content_renderer::{ContentRenderer, Detail, PostPreview, ProjectCard, RenderSettings};
use crate::content::{Post, Project, RecordId};
use crate::filter_engine::{CategoryFilter, EmptyState, FilterButton, FilterEngine};
use crate::load_coordinator::{Listing, LoadCoordinator, LoadError};
use crate::store::ContentStore;
use crate::view_state::{NavTracker, ScrollRequest, SectionOffset, ViewController, ViewState, DEFAULT_HEADER_BUFFER};

pub const BLOG_SECTION: &str = "blog";

#[derive(Debug, Clone, PartialEq)]
pub struct NavSection {
    pub id: String,
    pub label: String,
}

impl NavSection {
    pub fn new(id: &str, label: &str) -> Self {
        NavSection {
            id: id.to_string(),
            label: label.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    pub owner_name: String,
    pub sections: Vec<NavSection>,
    pub header_buffer: f64,
    pub categories: Vec<String>,
    pub render: RenderSettings,
    pub activity_start_year: Option<i32>,
    pub copyright_year: i32,
}

impl SiteSettings {
    pub fn default_sections() -> Vec<NavSection> {
        vec![
            NavSection::new("home", "Home"),
            NavSection::new("about", "About"),
            NavSection::new("projects", "Projects"),
            NavSection::new(BLOG_SECTION, "Blog"),
            NavSection::new("contact", "Contact"),
        ]
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        SiteSettings {
            owner_name: String::new(),
            sections: Self::default_sections(),
            header_buffer: DEFAULT_HEADER_BUFFER,
            categories: vec!["web".to_string(), "mobile".to_string(), "other".to_string()],
            render: RenderSettings::default(),
            activity_start_year: None,
            copyright_year: crate::text_utils::current_year(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiEvent {
    Scroll { scroll_y: f64 },
    Resize { offsets: Vec<SectionOffset> },
    FrameTick,
    FilterSelected(CategoryFilter),
    BackToList,
    NavLinkClicked { section: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct NavLinkView {
    pub id: String,
    pub label: String,
    pub href: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub card: ProjectCard,
    pub visible: bool,
}

/// Everything a display needs to draw the page, derived from the state.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView {
    pub owner_name: String,
    pub copyright_year: i32,
    pub copyright_years: String,
    pub nav_links: Vec<NavLinkView>,
    pub header_buffer: f64,
    pub list_root_visible: bool,
    pub detail_root_visible: bool,
    pub filter_buttons: Vec<FilterButton>,
    pub project_cards: Vec<CardView>,
    pub empty_state: Option<EmptyState>,
    pub projects_error: Option<String>,
    pub post_previews: Vec<PostPreview>,
    pub posts_error: Option<String>,
    pub detail: Option<Detail>,
    pub location: Option<String>,
    pub scroll: Option<ScrollRequest>,
    pub notices: Vec<String>,
}

pub struct SiteController {
    loader: LoadCoordinator,
    renderer: ContentRenderer,
    settings: SiteSettings,
    view: ViewController,
    nav: NavTracker,
    filter: FilterEngine,
    posts: Listing<Post>,
    projects: Listing<Project>,
    detail: Option<Detail>,
    notices: Vec<String>,
}

impl SiteController {
    pub fn new(store: Arc<dyn ContentStore>, settings: SiteSettings) -> Self {
        // Until the display reports a layout, every section sits at the top
        // and only the first one qualifies as active
        let offsets = settings.sections.first()
            .map(|section| vec![SectionOffset::new(&section.id, 0.0)])
            .unwrap_or_default();

        SiteController {
            loader: LoadCoordinator::new(store),
            renderer: ContentRenderer::new(settings.render.clone()),
            view: ViewController::new(BLOG_SECTION),
            nav: NavTracker::new(offsets, settings.header_buffer),
            filter: FilterEngine::new(),
            posts: Listing::new("blog posts"),
            projects: Listing::new("projects"),
            detail: None,
            notices: vec![],
            settings,
        }
    }

    /// Page load: both listings, one after the other.
    pub async fn load_all(&mut self) {
        self.load_public_posts().await;
        self.load_public_projects().await;
    }

    pub async fn load_public_posts(&mut self) -> &[Post] {
        let result = self.loader.fetch_public_posts().await;
        self.apply_posts(result)
    }

    pub fn apply_posts(&mut self, result: Result<Vec<Post>, LoadError>) -> &[Post] {
        self.posts.apply(result)
    }

    pub async fn load_public_projects(&mut self) -> &[Project] {
        let result = self.loader.fetch_public_projects().await;
        self.apply_projects(result)
    }

    pub fn apply_projects(&mut self, result: Result<Vec<Project>, LoadError>) -> &[Project] {
        let loaded = result.is_ok();
        self.projects.apply(result);
        if loaded {
            let cards = self.projects.items()
                .iter()
                .map(|project| self.renderer.project_card(project))
                .collect();
            self.filter.mount(cards);
        }
        self.projects.items()
    }

    /// Switches to the post only once it has been fetched. On failure the
    /// list stays on screen and a notice says why.
    pub async fn open_post(&mut self, id: &RecordId) -> Result<(), LoadError> {
        match self.loader.load_post(id).await {
            Ok(post) => {
                info!("Showing post {}", id);
                self.detail = Some(self.renderer.render_detail(&post));
                self.view.enter_detail_view(&post);
                Ok(())
            }
            Err(e) => {
                warn!("Could not open post {}: {}", id, e);
                let notice = match e {
                    LoadError::NotFound { .. } => "That post could not be found.".to_string(),
                    LoadError::StoreUnavailable(_) => "The post could not be loaded. Please try again later.".to_string(),
                    LoadError::MalformedRecord { .. } => "The post is damaged and cannot be shown.".to_string(),
                };
                self.notices.push(notice);
                Err(e)
            }
        }
    }

    pub fn dispatch(&mut self, event: UiEvent) {
        match event {
            UiEvent::Scroll { scroll_y } => self.nav.on_scroll(scroll_y),
            UiEvent::Resize { offsets } => self.nav.on_resize(offsets),
            UiEvent::FrameTick => {
                self.nav.on_frame();
            }
            UiEvent::FilterSelected(category) => {
                self.filter.set_active_category(category);
            }
            UiEvent::BackToList => {
                self.view.exit_detail_view();
                self.detail = None;
            }
            UiEvent::NavLinkClicked { section: _ } => {
                self.view.close_for_navigation();
                if self.view.list_root_visible() {
                    self.detail = None;
                }
            }
        }
    }

    pub fn view_state(&self) -> &ViewState {
        self.view.state()
    }

    pub fn filter(&self) -> &FilterEngine {
        &self.filter
    }

    pub fn nav(&self) -> &NavTracker {
        &self.nav
    }

    pub fn posts(&self) -> &Listing<Post> {
        &self.posts
    }

    pub fn projects(&self) -> &Listing<Project> {
        &self.projects
    }

    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    fn copyright_years(&self) -> String {
        let year = self.settings.copyright_year;
        match self.settings.activity_start_year {
            Some(start) if start < year => format!("{}-{}", start, year),
            _ => year.to_string(),
        }
    }

    pub fn page(&self) -> PageView {
        let active_section = self.nav.active_section();
        let nav_links = self.settings.sections.iter()
            .map(|section| NavLinkView {
                id: section.id.clone(),
                label: section.label.clone(),
                href: format!("/#{}", section.id),
                active: active_section == Some(section.id.as_str()),
            })
            .collect();

        let project_cards = self.filter.cards()
            .iter()
            .map(|c| CardView { card: c.card.clone(), visible: c.visible })
            .collect();

        // A failed first load shows the error instead of the placeholder
        let projects_error = self.projects.error().map(|e| e.to_string());
        let empty_state = match projects_error {
            Some(_) if self.projects.items().is_empty() => None,
            _ => self.filter.empty_state().cloned(),
        };

        let post_previews = self.posts.items()
            .iter()
            .map(|post| self.renderer.post_preview(post))
            .collect();

        PageView {
            owner_name: self.settings.owner_name.clone(),
            copyright_year: self.settings.copyright_year,
            copyright_years: self.copyright_years(),
            nav_links,
            header_buffer: self.settings.header_buffer,
            list_root_visible: self.view.list_root_visible(),
            detail_root_visible: self.view.detail_root_visible(),
            filter_buttons: self.filter.buttons(&self.settings.categories),
            project_cards,
            empty_state,
            projects_error,
            post_previews,
            posts_error: self.posts.error().map(|e| e.to_string()),
            detail: if self.view.detail_root_visible() { self.detail.clone() } else { None },
            location: self.view.location().map(|l| l.to_string()),
            scroll: self.view.scroll_request().cloned(),
            notices: self.notices.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_data::seeded_store;

    use super::*;

    async fn loaded_site() -> SiteController {
        let mut site = SiteController::new(seeded_store(), SiteSettings::default());
        site.load_all().await;
        site
    }

    #[tokio::test]
    async fn test_page_load() {
        let site = loaded_site().await;
        let page = site.page();

        assert!(page.list_root_visible);
        assert!(!page.detail_root_visible);
        assert!(page.detail.is_none());
        assert_eq!(page.post_previews.len(), 2);
        assert_eq!(page.project_cards.len(), 2);
        assert!(page.project_cards.iter().all(|c| c.visible));
        assert!(page.empty_state.is_none());

        let active: Vec<_> = page.nav_links.iter().filter(|l| l.active).map(|l| l.id.as_str()).collect();
        assert_eq!(active, ["home"]);
    }

    #[tokio::test]
    async fn test_open_post_switches_view() {
        let mut site = loaded_site().await;
        site.open_post(&RecordId::from("a")).await.unwrap();

        let page = site.page();
        assert!(!page.list_root_visible);
        assert!(page.detail_root_visible);
        assert_eq!(page.detail.as_ref().map(|d| d.title.as_str()), Some("Hello World"));
        assert_eq!(page.location.as_deref(), Some("blog/hello-world-2024-05-01"));
        assert_eq!(page.scroll, Some(ScrollRequest::Top));

        site.dispatch(UiEvent::BackToList);
        let page = site.page();
        assert!(page.list_root_visible);
        assert!(!page.detail_root_visible);
        assert!(page.detail.is_none());
    }

    #[tokio::test]
    async fn test_missing_post_keeps_list_view() {
        let mut site = loaded_site().await;
        let res = site.open_post(&RecordId::from("missing-id")).await;

        assert!(matches!(res, Err(LoadError::NotFound { .. })));
        assert_eq!(site.view_state(), &ViewState::ListView);
        assert_eq!(site.notices(), ["That post could not be found."]);
        assert!(site.page().list_root_visible);
    }

    #[tokio::test]
    async fn test_filter_events() {
        let mut site = loaded_site().await;

        site.dispatch(UiEvent::FilterSelected(CategoryFilter::parse("mobile")));
        let page = site.page();
        let visible: Vec<_> = page.project_cards.iter().filter(|c| c.visible).map(|c| c.card.id.0.as_str()).collect();
        assert_eq!(visible, ["p2"]);

        site.dispatch(UiEvent::FilterSelected(CategoryFilter::parse("other")));
        site.dispatch(UiEvent::FilterSelected(CategoryFilter::parse("games")));
        assert!(site.page().empty_state.is_some());

        site.dispatch(UiEvent::FilterSelected(CategoryFilter::All));
        let page = site.page();
        assert!(page.empty_state.is_none());
        assert!(page.project_cards.iter().all(|c| c.visible));
    }

    #[tokio::test]
    async fn test_scroll_highlight_waits_for_frame() {
        let mut site = loaded_site().await;
        site.dispatch(UiEvent::Resize {
            offsets: vec![
                SectionOffset::new("home", 0.0),
                SectionOffset::new("about", 800.0),
                SectionOffset::new("projects", 1600.0),
            ],
        });
        site.dispatch(UiEvent::Scroll { scroll_y: 1500.0 });
        assert_eq!(site.nav().active_section(), Some("home"));

        site.dispatch(UiEvent::FrameTick);
        let page = site.page();
        let active: Vec<_> = page.nav_links.iter().filter(|l| l.active).map(|l| l.id.as_str()).collect();
        assert_eq!(active, ["projects"]);
    }

    #[test]
    fn test_copyright_years() {
        let settings = SiteSettings {
            activity_start_year: Some(2019),
            copyright_year: 2024,
            ..SiteSettings::default()
        };
        let site = SiteController::new(seeded_store(), settings);
        assert_eq!(site.page().copyright_years, "2019-2024");

        let site = SiteController::new(seeded_store(), SiteSettings { copyright_year: 2024, ..SiteSettings::default() });
        assert_eq!(site.page().copyright_years, "2024");
    }

    #[tokio::test]
    async fn test_nav_link_closes_post() {
        let mut site = loaded_site().await;
        site.open_post(&RecordId::from("a")).await.unwrap();
        site.dispatch(UiEvent::NavLinkClicked { section: "about".to_string() });

        let page = site.page();
        assert!(page.list_root_visible);
        assert!(page.scroll.is_none());
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_listing() {
        let mut site = loaded_site().await;
        site.apply_posts(Err(LoadError::StoreUnavailable("offline".to_string())));
        site.apply_projects(Err(LoadError::StoreUnavailable("offline".to_string())));

        let page = site.page();
        assert_eq!(page.post_previews.len(), 2);
        assert_eq!(page.posts_error.as_deref(), Some("Could not load blog posts."));
        assert_eq!(page.project_cards.len(), 2);
        assert_eq!(page.projects_error.as_deref(), Some("Could not load projects."));
    }

    #[tokio::test]
    async fn test_failed_first_load_shows_error_not_placeholder() {
        let mut site = SiteController::new(seeded_store(), SiteSettings::default());
        site.apply_projects(Err(LoadError::StoreUnavailable("offline".to_string())));

        let page = site.page();
        assert!(page.project_cards.is_empty());
        assert!(page.empty_state.is_none());
        assert_eq!(page.projects_error.as_deref(), Some("Could not load projects."));
    }
}
