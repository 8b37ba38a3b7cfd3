use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::{fs, io};

use ntex::http::StatusCode;
use ntex::web;
use ntex::web::HttpRequest;
use ntex_files::NamedFile;
use serde::Serialize;
use spdlog::{error, info};

use crate::config::Config;
use crate::content::content_renderer::ContentRenderer;
use crate::content::RecordId;
use crate::load_coordinator::{LoadCoordinator, LoadError};
use crate::query_string::QueryString;
use crate::site_controller::{PageView, SiteController, SiteSettings, UiEvent};
use crate::store::{open_store, ContentStore};
use crate::view::page_renderer::PageRenderer;

pub const SITE_TEMPLATE: &str = "site.tpl";

pub struct AppState {
    store: Arc<dyn ContentStore>,
    settings: SiteSettings,
    template_dir: PathBuf,
    public_dir: PathBuf,
}

impl AppState {
    pub fn new(store: Arc<dyn ContentStore>, settings: SiteSettings, template_dir: PathBuf, public_dir: PathBuf) -> Self {
        AppState { store, settings, template_dir, public_dir }
    }

    /// Every request starts from a fresh page, as a browser does on load.
    fn site(&self) -> SiteController {
        SiteController::new(self.store.clone(), self.settings.clone())
    }

    fn loader(&self) -> LoadCoordinator {
        LoadCoordinator::new(self.store.clone())
    }

    fn renderer(&self) -> ContentRenderer {
        ContentRenderer::new(self.settings.render.clone())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

pub fn status_for(err: &LoadError) -> StatusCode {
    match err {
        LoadError::NotFound { .. } => StatusCode::NOT_FOUND,
        LoadError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        LoadError::MalformedRecord { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn render_page(template_dir: &Path, page: &PageView) -> io::Result<String> {
    let template_src = fs::read_to_string(template_dir.join(SITE_TEMPLATE))?;
    let renderer = PageRenderer::new(&template_src)?;
    Ok(renderer.render(page))
}

fn html_response(status: StatusCode, rendered: io::Result<String>) -> web::HttpResponse {
    match rendered {
        Ok(body) => web::HttpResponse::build(status)
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            error!("Error rendering page: {}", e);
            web::HttpResponse::InternalServerError()
                .body(format!("Error rendering page: {}", e))
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, value: &T) -> web::HttpResponse {
    match serde_json::to_string(value) {
        Ok(body) => web::HttpResponse::build(status)
            .content_type("application/json")
            .body(body),
        Err(e) => web::HttpResponse::InternalServerError()
            .body(format!("Error serializing response: {}", e)),
    }
}

fn json_error(err: &LoadError) -> web::HttpResponse {
    json_response(status_for(err), &ErrorBody { error: err.to_string() })
}

pub async fn index_page(state: &AppState, query: Option<&str>) -> PageView {
    let mut site = state.site();
    site.load_all().await;

    if let Some(category) = query.and_then(|q| QueryString::from(q).get_category()) {
        site.dispatch(UiEvent::FilterSelected(category));
    }
    site.page()
}

/// The page with the post open, or the list with a notice when the post
/// cannot be shown.
pub async fn post_page(state: &AppState, id: &RecordId) -> (StatusCode, PageView) {
    let mut site = state.site();
    site.load_all().await;

    let status = match site.open_post(id).await {
        Ok(()) => StatusCode::OK,
        Err(e) => status_for(&e),
    };
    (status, site.page())
}

#[web::get("/")]
async fn index(req: HttpRequest, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let page = index_page(&state, req.uri().query()).await;
    html_response(StatusCode::OK, render_page(&state.template_dir, &page))
}

#[web::get("/blog/{id}")]
async fn view_post(path: web::types::Path<String>, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let id = RecordId(path.into_inner());
    let (status, page) = post_page(&state, &id).await;
    html_response(status, render_page(&state.template_dir, &page))
}

#[web::get("/api/posts")]
async fn api_posts(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let renderer = state.renderer();
    match state.loader().fetch_public_posts().await {
        Ok(posts) => {
            let previews: Vec<_> = posts.iter().map(|p| renderer.post_preview(p)).collect();
            json_response(StatusCode::OK, &previews)
        }
        Err(e) => {
            error!("Error loading blog posts: {}", e);
            json_error(&e)
        }
    }
}

#[web::get("/api/posts/{id}")]
async fn api_post(path: web::types::Path<String>, state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let id = RecordId(path.into_inner());
    match state.loader().load_post(&id).await {
        Ok(post) => json_response(StatusCode::OK, &state.renderer().render_detail(&post)),
        Err(e) => {
            error!("Error loading post {}: {}", id, e);
            json_error(&e)
        }
    }
}

#[web::get("/api/projects")]
async fn api_projects(state: web::types::State<Arc<AppState>>) -> web::HttpResponse {
    let renderer = state.renderer();
    match state.loader().fetch_public_projects().await {
        Ok(projects) => {
            let cards: Vec<_> = projects.iter().map(|p| renderer.project_card(p)).collect();
            json_response(StatusCode::OK, &cards)
        }
        Err(e) => {
            error!("Error loading projects: {}", e);
            json_error(&e)
        }
    }
}

#[web::get("/public/{file_name}")]
async fn public_files(path: web::types::Path<String>, state: web::types::State<Arc<AppState>>) -> Result<NamedFile, web::Error> {
    if path.contains("..") {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    let file_path = state.public_dir.join(path.into_inner());
    Ok(NamedFile::open(file_path)?)
}

#[web::get("/public/images/{file_name}")]
async fn public_images(path: web::types::Path<String>, state: web::types::State<Arc<AppState>>) -> Result<NamedFile, web::Error> {
    if path.contains("..") {
        return Err(web::error::ErrorUnauthorized("Access forbidden").into());
    }

    let file_path = state.public_dir.join("images").join(path.into_inner());
    Ok(NamedFile::open(file_path)?)
}

pub async fn server_run(config: Config) -> io::Result<()> {
    let store = open_store(&config.store)?;
    let settings = config.site_settings();

    let template_path = config.paths.template_dir.join(SITE_TEMPLATE);
    if !template_path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("Site template not found: {}", template_path.display())));
    }

    info!("Serving templates from {}", config.paths.template_dir.display());
    info!("Serving public files from {}", config.paths.public_dir.display());

    let bind_addr = config.server.address.clone();
    let bind_port = config.server.port;
    let app_state = Arc::new(AppState::new(
        store,
        settings,
        config.paths.template_dir,
        config.paths.public_dir,
    ));

    web::HttpServer::new(move || {
        web::App::new()
            .state(app_state.clone())
            .service(index)
            .service(view_post)
            .service(api_posts)
            .service(api_post)
            .service(api_projects)
            .service(public_files)
            .service(public_images)
    })
        .bind((bind_addr, bind_port))?
        .run()
        .await
}
