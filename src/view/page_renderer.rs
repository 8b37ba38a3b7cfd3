use std::io;
use std::io::ErrorKind;

use ramhorns::Template;

use crate::content::content_renderer::{LinkKind, ProjectCard};
use crate::query_string::category_query;
use crate::site_controller::PageView;
use crate::view_state::ScrollRequest;

#[derive(ramhorns::Content)]
struct ViewText<'a> {
    text: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewTag<'a> {
    tag: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewNavLink<'a> {
    id: &'a str,
    label: &'a str,
    href: &'a str,
    active: bool,
}

#[derive(ramhorns::Content)]
struct ViewFilterButton<'a> {
    category: &'a str,
    query: String,
    label: &'a str,
    active: bool,
}

#[derive(ramhorns::Content)]
struct ViewLink<'a> {
    kind: &'a str,
    label: &'a str,
    url: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewCard<'a> {
    id: &'a str,
    title: &'a str,
    image: &'a str,
    description: &'a str,
    category: &'a str,
    visible: bool,
    skills: Vec<ViewTag<'a>>,
    links: Vec<ViewLink<'a>>,
}

#[derive(ramhorns::Content)]
struct ViewEmptyState<'a> {
    title: &'a str,
    hint: &'a str,
}

#[derive(ramhorns::Content)]
struct ViewPreview<'a> {
    id: &'a str,
    title: &'a str,
    author: &'a str,
    date: &'a str,
    read_time: &'a str,
    excerpt: &'a str,
    cover_image: &'a str,
    href: &'a str,
    tags: Vec<ViewTag<'a>>,
}

#[derive(ramhorns::Content)]
struct ViewDetail<'a> {
    id: &'a str,
    title: &'a str,
    author: &'a str,
    author_image: &'a str,
    date: &'a str,
    read_time: &'a str,
    body: &'a str,
    slug: &'a str,
    tags: Vec<ViewTag<'a>>,
}

#[derive(ramhorns::Content)]
struct ViewPage<'a> {
    owner_name: &'a str,
    copyright_years: &'a str,
    nav_links: Vec<ViewNavLink<'a>>,
    header_buffer: String,
    list_root_visible: bool,
    detail_root_visible: bool,
    filter_buttons: Vec<ViewFilterButton<'a>>,
    project_cards: Vec<ViewCard<'a>>,
    empty_state: Option<ViewEmptyState<'a>>,
    projects_error: Option<ViewText<'a>>,
    post_previews: Vec<ViewPreview<'a>>,
    posts_error: Option<ViewText<'a>>,
    detail: Option<ViewDetail<'a>>,
    location: Option<ViewText<'a>>,
    scroll_to: Option<ViewText<'a>>,
    notices: Vec<ViewText<'a>>,
}

fn tags(items: &[String]) -> Vec<ViewTag<'_>> {
    items.iter().map(|t| ViewTag { tag: t.as_str() }).collect()
}

fn text(value: Option<&str>) -> Option<ViewText<'_>> {
    value.map(|text| ViewText { text })
}

fn card(card: &ProjectCard, visible: bool) -> ViewCard<'_> {
    let links = card.links.iter()
        .map(|link| ViewLink {
            kind: match link.kind {
                LinkKind::GitHub => "github",
                LinkKind::LiveDemo => "live-demo",
            },
            label: link.label,
            url: link.url.as_str(),
        })
        .collect();

    ViewCard {
        id: card.id.0.as_str(),
        title: card.title.as_str(),
        image: card.image.as_str(),
        description: card.description.as_str(),
        category: card.category.as_str(),
        visible,
        skills: tags(&card.skills),
        links,
    }
}

/// Draws a `PageView` through a mustache template. The template decides the
/// markup; everything it can show comes from the view model.
pub struct PageRenderer<'a> {
    pub template: Template<'a>,
}

impl PageRenderer<'_> {
    pub fn new(page_tpl_src: &str) -> io::Result<PageRenderer> {
        let template = match Template::new(page_tpl_src) {
            Ok(x) => x,
            Err(e) => {
                return Err(io::Error::new(ErrorKind::InvalidInput, format!("Error parsing page template: {}", e)));
            }
        };

        Ok(PageRenderer {
            template,
        })
    }

    pub fn render(&self, page: &PageView) -> String {
        let scroll_to = match page.scroll {
            Some(ScrollRequest::Top) => Some("top"),
            Some(ScrollRequest::IntoView { ref section, .. }) => Some(section.as_str()),
            None => None,
        };

        self.template.render(&ViewPage {
            owner_name: page.owner_name.as_str(),
            copyright_years: page.copyright_years.as_str(),
            nav_links: page.nav_links.iter()
                .map(|l| ViewNavLink {
                    id: l.id.as_str(),
                    label: l.label.as_str(),
                    href: l.href.as_str(),
                    active: l.active,
                })
                .collect(),
            header_buffer: page.header_buffer.to_string(),
            list_root_visible: page.list_root_visible,
            detail_root_visible: page.detail_root_visible,
            filter_buttons: page.filter_buttons.iter()
                .map(|b| ViewFilterButton {
                    category: b.category.as_str(),
                    query: category_query(&b.category),
                    label: b.label.as_str(),
                    active: b.active,
                })
                .collect(),
            project_cards: page.project_cards.iter().map(|c| card(&c.card, c.visible)).collect(),
            empty_state: page.empty_state.as_ref().map(|e| ViewEmptyState {
                title: e.lines[0],
                hint: e.lines[1],
            }),
            projects_error: text(page.projects_error.as_deref()),
            post_previews: page.post_previews.iter()
                .map(|p| ViewPreview {
                    id: p.id.0.as_str(),
                    title: p.title.as_str(),
                    author: p.author.as_str(),
                    date: p.date.as_str(),
                    read_time: p.read_time.as_str(),
                    excerpt: p.excerpt.as_str(),
                    cover_image: p.cover_image.as_str(),
                    href: p.href.as_str(),
                    tags: tags(&p.tags),
                })
                .collect(),
            posts_error: text(page.posts_error.as_deref()),
            detail: page.detail.as_ref().map(|d| ViewDetail {
                id: d.id.0.as_str(),
                title: d.title.as_str(),
                author: d.author.as_str(),
                author_image: d.author_image.as_str(),
                date: d.date.as_str(),
                read_time: d.read_time.as_str(),
                body: d.body.as_str(),
                slug: d.slug.as_str(),
                tags: tags(&d.tags),
            }),
            location: text(page.location.as_deref()),
            scroll_to: text(scroll_to),
            notices: page.notices.iter().map(|n| ViewText { text: n.as_str() }).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::content::RecordId;
    use crate::filter_engine::{CategoryFilter, FilterButton};
    use crate::load_coordinator::LoadError;
    use crate::site_controller::{SiteController, SiteSettings, UiEvent};
    use crate::test_data::seeded_store;

    use super::*;

    const SITE_TPL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res/template/site.tpl"));
    const SITE_JS: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/res/public/site.js"));

    fn site_page() -> PageView {
        SiteController::new(seeded_store(), SiteSettings::default()).page()
    }

    async fn loaded_site() -> SiteController {
        let settings = SiteSettings {
            owner_name: "Juma Paul".to_string(),
            ..SiteSettings::default()
        };
        let mut site = SiteController::new(seeded_store(), settings);
        site.load_all().await;
        site
    }

    #[test]
    fn test_unbalanced_sections_are_rejected() {
        let err = PageRenderer::new("{{/nav_links}}").err().unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(PageRenderer::new("{{#detail}}{{title}}{{/nav_links}}").is_err());
        assert!(PageRenderer::new("{{#detail}}{{title}}{{/detail}}").is_ok());
    }

    #[tokio::test]
    async fn test_nav_and_filters() {
        let mut site = loaded_site().await;
        site.dispatch(UiEvent::FilterSelected(CategoryFilter::parse("web")));

        let renderer = PageRenderer::new(
            "{{#nav_links}}{{id}}{{#active}}*{{/active}} {{/nav_links}}|\
             {{#filter_buttons}}{{label}}{{#active}}*{{/active}} {{/filter_buttons}}|\
             {{#project_cards}}{{#visible}}{{title}};{{/visible}}{{/project_cards}}"
        ).unwrap();

        assert_eq!(
            renderer.render(&site.page()),
            "home* about projects blog contact |All Web* Mobile Other |Weather dashboard;"
        );
    }

    #[tokio::test]
    async fn test_list_and_detail_are_exclusive() {
        let mut site = loaded_site().await;
        let renderer = PageRenderer::new(
            "{{#list_root_visible}}list{{/list_root_visible}}\
             {{#detail_root_visible}}detail:{{#detail}}{{title}}{{/detail}}{{/detail_root_visible}}"
        ).unwrap();

        assert_eq!(renderer.render(&site.page()), "list");
        site.open_post(&RecordId::from("a")).await.unwrap();
        assert_eq!(renderer.render(&site.page()), "detail:Hello World");
    }

    #[tokio::test]
    async fn test_body_is_not_escaped_but_titles_are() {
        let mut site = loaded_site().await;
        site.open_post(&RecordId::from("a")).await.unwrap();

        let renderer = PageRenderer::new("{{#detail}}{{{body}}}{{/detail}}").unwrap();
        assert_eq!(renderer.render(&site.page()), "<p>Welcome to my <strong>new</strong> blog.</p>");

        let renderer = PageRenderer::new("{{#detail}}{{body}}{{/detail}}").unwrap();
        assert!(renderer.render(&site.page()).starts_with("&lt;p&gt;"));
    }

    #[tokio::test]
    async fn test_errors_and_empty_state() {
        let mut site = loaded_site().await;
        let renderer = PageRenderer::new(
            "{{#projects_error}}{{text}}{{/projects_error}}\
             {{#empty_state}}{{title}} {{hint}}{{/empty_state}}"
        ).unwrap();

        site.dispatch(UiEvent::FilterSelected(CategoryFilter::parse("games")));
        assert_eq!(renderer.render(&site.page()), "No projects in this category yet. Check back soon!");

        site.apply_projects(Err(LoadError::StoreUnavailable("offline".to_string())));
        assert!(renderer.render(&site.page()).starts_with("Could not load projects."));
    }

    #[tokio::test]
    async fn test_site_template() {
        let mut site = loaded_site().await;
        let renderer = PageRenderer::new(SITE_TPL).unwrap();

        let html = renderer.render(&site.page());
        assert!(html.contains("Juma Paul"));
        assert!(html.contains("Hello World"));
        assert!(html.contains("Weather dashboard"));
        assert!(html.contains(r#"href="/blog/a""#));
        assert!(!html.contains("Work in progress"));

        assert!(html.contains(r#"href="/?category=mobile#projects""#));
        assert!(html.contains(r#"data-header-buffer="150""#));
        assert!(html.contains(r#"<script src="/public/site.js" defer></script>"#));
        assert!(!html.contains("data-location"));

        site.open_post(&RecordId::from("a")).await.unwrap();
        let html = renderer.render(&site.page());
        assert!(html.contains("<strong>new</strong>"));
        assert!(html.contains(r#"data-location="blog/hello-world-2024-05-01""#));
        assert!(html.contains(r#"data-scroll-to="top""#));
    }

    #[test]
    fn test_filter_link_is_encoded() {
        let page = PageView {
            filter_buttons: vec![FilterButton {
                category: "r&d".to_string(),
                label: "R&d".to_string(),
                active: false,
            }],
            ..site_page()
        };
        let renderer = PageRenderer::new("{{#filter_buttons}}/?{{query}}|{{label}}{{/filter_buttons}}").unwrap();
        assert_eq!(renderer.render(&page), "/?category=r%26d|R&amp;d");
    }

    #[test]
    fn test_site_script_applies_location() {
        assert!(SITE_JS.contains("body.dataset.location"));
        assert!(SITE_JS.contains(r##"history.replaceState(null, "", "#" + body.dataset.location)"##));
        assert!(SITE_JS.contains("body.dataset.scrollTo"));
        assert!(SITE_JS.contains("body.dataset.headerBuffer"));
        assert!(SITE_JS.contains("requestAnimationFrame"));
    }
}
