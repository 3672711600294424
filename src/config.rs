use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::AppError;

#[derive(Deserialize, Clone, Debug)]
pub struct Config {
    pub port: u16,
    /// Connection URL, `postgres://...` or `sqlite://...`.
    pub database: String,
    #[serde(default = "default_media_root")]
    pub media_root: PathBuf,
    #[serde(default)]
    pub superuser: Option<SuperuserConfig>,
}

/// Account created on first start when no user with that name exists.
#[derive(Deserialize, Clone, Debug)]
pub struct SuperuserConfig {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub email: String,
}

fn default_media_root() -> PathBuf {
    PathBuf::from("media")
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, AppError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            AppError::Config(format!("cannot open {}: {}", path.display(), err))
        })?;
        Config::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Config, AppError> {
        serde_json::from_str(contents)
            .map_err(|err| AppError::Config(format!("malformed configuration: {}", err)))
    }
}
