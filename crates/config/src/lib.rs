//! Layered configuration for magpie.
//!
//! Values are resolved in three layers, later layers winning:
//!
//! 1. hard-coded defaults ([`Config::default`]),
//! 2. a TOML file (explicit path, `./magpie.toml`, or the platform config
//!    directory),
//! 3. `MAGPIE_*` environment variables, nested keys separated by `__`
//!    (e.g. `MAGPIE_HTTP__TIMEOUT_SECS=60`).
//!
//! The defaults keep everything relative to the working directory: database
//! `images.db`, download folder `downloaded_images`, worldwide region,
//! safe search off.

pub mod error;

use crate::error::{ErrorKind, Result};
use directories::ProjectDirs;
use exn::ResultExt;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use magpie_search::SafeSearch;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "magpie.toml";
const ENV_PREFIX: &str = "MAGPIE_";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// SQLite database file holding image records and tags
    pub database: PathBuf,
    /// Directory downloaded images are written into
    pub downloads: PathBuf,
    pub search: SearchSettings,
    pub http: HttpSettings,
}

/// Search-provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchSettings {
    /// Provider region code (`wt-wt` = worldwide)
    pub region: String,
    pub safesearch: SafeSearch,
}

/// Outbound HTTP settings, shared by search and download requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSettings {
    /// Per-request timeout. There is no cancellation mechanism beyond this:
    /// a stuck request blocks the whole (sequential) run.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from("images.db"),
            downloads: PathBuf::from("downloaded_images"),
            search: SearchSettings {
                region: "wt-wt".to_string(),
                safesearch: SafeSearch::Off,
            },
            http: HttpSettings {
                timeout_secs: 30,
                user_agent: concat!("magpie/", env!("CARGO_PKG_VERSION")).to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration, optionally from an explicit file path.
    ///
    /// Without an explicit path, `./magpie.toml` is tried first, then the
    /// platform config directory (e.g. `~/.config/magpie/magpie.toml`).
    /// A missing file is fine; defaults plus environment still apply.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(explicit) => explicit.to_path_buf(),
            None => Self::default_file_location(),
        };
        tracing::debug!(file = %file.display(), "loading configuration");
        let config: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .or_raise(|| ErrorKind::Invalid)?;
        config.validate()
    }

    fn default_file_location() -> PathBuf {
        let local = PathBuf::from(CONFIG_FILE);
        if local.exists() {
            return local;
        }
        ProjectDirs::from("", "", "magpie")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE))
            .unwrap_or(local)
    }

    fn validate(self) -> Result<Self> {
        if self.http.timeout_secs == 0 {
            exn::bail!(ErrorKind::Unusable("http.timeout_secs must be non-zero"));
        }
        if self.search.region.is_empty() {
            exn::bail!(ErrorKind::Unusable("search.region must not be empty"));
        }
        Ok(self)
    }
}
