use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::api::{DEFAULT_API_URL, DEFAULT_TIMEOUT};
use crate::cli::GlobalArgs;

pub const DB_FILE_NAME: &str = "pokemon.db";

/// Resolved runtime settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub db_path: PathBuf,
    pub api_url: String,
    pub timeout: Duration,
}

impl Settings {
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let db_path = match &args.db {
            Some(path) => path.clone(),
            None => default_db_path()?,
        };

        Ok(Self {
            db_path,
            api_url: args.api_url.clone(),
            timeout: Duration::from_secs(args.timeout_secs),
        })
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DB_FILE_NAME),
            api_url: DEFAULT_API_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// `pokemon.db` in the platform data directory, or the working directory
/// when no home directory can be determined
pub fn default_db_path() -> Result<PathBuf> {
    let Some(proj_dirs) = ProjectDirs::from("", "", "pokedex-to-sqlite") else {
        return Ok(PathBuf::from(DB_FILE_NAME));
    };

    let data_dir = proj_dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join(DB_FILE_NAME))
}
