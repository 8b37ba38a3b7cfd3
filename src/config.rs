use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;

use crate::content::content_renderer::{RenderSettings, DEFAULT_AUTHOR_IMAGE, DEFAULT_COVER_IMAGE};
use crate::filter_engine::normalize_category;
use crate::site_controller::SiteSettings;
use crate::text_utils::current_year;
use crate::view_state::DEFAULT_HEADER_BUFFER;

pub const CFG_FILE_NAME: &str = "folio.toml";

#[derive(Deserialize, Debug)]
pub struct Personal {
    pub name: String,
    pub author: Option<String>,
    pub activity_start_year: Option<i32>,
}

#[derive(Deserialize, Debug)]
pub struct Paths {
    pub template_dir: PathBuf,
    pub public_dir: PathBuf,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreKind {
    Memory,
    #[default]
    JsonFile,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct StoreConfig {
    #[serde(default)]
    pub kind: StoreKind,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug)]
pub struct Site {
    pub header_buffer: Option<f64>,
    pub categories: Option<Vec<String>>,
    pub default_cover_image: Option<String>,
    pub default_author_image: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct Server {
    pub address: String,
    pub port: u16,
}

#[derive(Deserialize, Debug)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug)]
pub struct Config {
    pub personal: Personal,
    pub paths: Paths,
    #[serde(default)]
    pub store: StoreConfig,
    pub site: Option<Site>,
    pub server: Server,
    pub log: Option<Log>,
}

impl Config {
    /// Name used for new posts when the admin does not give one.
    pub fn default_author(&self) -> String {
        match self.personal.author {
            Some(ref author) if !author.trim().is_empty() => author.clone(),
            _ => crate::util::os_helper::default_author(),
        }
    }

    pub fn site_settings(&self) -> SiteSettings {
        let mut settings = SiteSettings {
            owner_name: self.personal.name.clone(),
            activity_start_year: self.personal.activity_start_year,
            copyright_year: current_year(),
            ..SiteSettings::default()
        };

        if let Some(ref site) = self.site {
            settings.header_buffer = site.header_buffer.unwrap_or(DEFAULT_HEADER_BUFFER);
            if let Some(ref categories) = site.categories {
                settings.categories = categories.iter()
                    .map(|c| normalize_category(c))
                    .filter(|c| !c.is_empty())
                    .collect();
            }
            settings.render = RenderSettings {
                default_cover_image: site.default_cover_image.clone()
                    .unwrap_or_else(|| DEFAULT_COVER_IMAGE.to_string()),
                default_author_image: site.default_author_image.clone()
                    .unwrap_or_else(|| DEFAULT_AUTHOR_IMAGE.to_string()),
            };
        }
        settings
    }
}

fn parse_path(path: PathBuf) -> io::Result<PathBuf> {
    if !path.starts_with("${exe_dir}") {
        return Ok(path);
    }

    let cur_exe = env::current_exe()?;
    let exe_dir = cur_exe.parent()
        .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "Executable has no parent directory"))?;
    let str_path = path.to_string_lossy();
    Ok(PathBuf::from(str_path.replace("${exe_dir}", &exe_dir.to_string_lossy())))
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    cfg.paths = Paths {
        template_dir: parse_path(cfg.paths.template_dir)?,
        public_dir: parse_path(cfg.paths.public_dir)?,
    };
    if let Some(location) = cfg.store.location.take() {
        cfg.store.location = Some(parse_path(location)?);
    }

    if cfg.store.kind == StoreKind::JsonFile && cfg.store.location.is_none() {
        return Err(io::Error::new(
            ErrorKind::InvalidData, "Store kind json_file requires store.location"));
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &Path) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };
    parse_config(&cfg_content)
}

/// Looks for the configuration next to the executable, then in the current
/// directory, then in the user config directory.
pub fn find_config_path() -> Option<PathBuf> {
    let mut candidates = vec![];
    if let Some(exe_dir) = env::current_exe().ok().and_then(|p| p.parent().map(Path::to_path_buf)) {
        candidates.push(exe_dir.join(CFG_FILE_NAME));
    }
    if let Ok(cur_dir) = env::current_dir() {
        candidates.push(cur_dir.join(CFG_FILE_NAME));
    }
    if let Some(cfg_dir) = dirs::config_dir() {
        candidates.push(cfg_dir.join("folio").join(CFG_FILE_NAME));
    }

    candidates.into_iter().find(|path| path.exists())
}
