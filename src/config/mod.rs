//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{num::NonZeroU32, path::PathBuf, str::FromStr};

use chrono_tz::Tz;
use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::application::store::{DEFAULT_AUTHOR, DEFAULT_IMAGE_URL, PostDefaults};
use crate::domain::posts::DEFAULT_CHARS_PER_MINUTE;

mod cli;

pub use cli::{
    CliArgs, Command, CreateArgs, GlobalOverrides, ListArgs, OpenArgs, OutputFormat, ShareArgs,
    ShowArgs, ThemeArgs,
};

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "myblog";
const DEFAULT_DATA_FILE: &str = "myblog-data.json";
const DEFAULT_BASE_URL: &str = "http://localhost:3000/";
const DEFAULT_TIMEZONE: &str = "Asia/Ho_Chi_Minh";

#[derive(Debug, Clone)]
pub struct Settings {
    pub storage: StorageSettings,
    pub site: SiteSettings,
    pub posts: PostSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct StorageSettings {
    pub path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct SiteSettings {
    /// Base that share links are built on.
    pub base_url: Url,
    pub timezone: Tz,
}

#[derive(Debug, Clone)]
pub struct PostSettings {
    pub default_author: String,
    pub default_image_url: String,
    pub chars_per_minute: NonZeroU32,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

impl Settings {
    /// Defaults handed to the post store when it completes a draft.
    pub fn post_defaults(&self) -> PostDefaults {
        PostDefaults {
            author: self.posts.default_author.clone(),
            image_url: self.posts.default_image_url.clone(),
            chars_per_minute: self.posts.chars_per_minute,
            timezone: self.site.timezone,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = cli.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(Environment::with_prefix("MYBLOG").separator("__"));

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(&cli.overrides);

    Settings::from_raw(raw)
}

/// Resolve configuration using the supplied CLI arguments, returning both for downstream use.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    storage: RawStorageSettings,
    site: RawSiteSettings,
    posts: RawPostSettings,
    logging: RawLoggingSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &GlobalOverrides) {
        if let Some(path) = overrides.data_file.as_ref() {
            self.storage.path = Some(path.clone());
        }
        if let Some(base_url) = overrides.base_url.as_ref() {
            self.site.base_url = Some(base_url.clone());
        }
        if let Some(timezone) = overrides.timezone.as_ref() {
            self.site.timezone = Some(timezone.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            storage,
            site,
            posts,
            logging,
        } = raw;

        let storage = build_storage_settings(storage)?;
        let site = build_site_settings(site)?;
        let posts = build_post_settings(posts)?;
        let logging = build_logging_settings(logging)?;

        Ok(Self {
            storage,
            site,
            posts,
            logging,
        })
    }
}

fn build_storage_settings(storage: RawStorageSettings) -> Result<StorageSettings, LoadError> {
    let path = storage
        .path
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE));
    if path.as_os_str().is_empty() {
        return Err(LoadError::invalid("storage.path", "must not be empty"));
    }
    Ok(StorageSettings { path })
}

fn build_site_settings(site: RawSiteSettings) -> Result<SiteSettings, LoadError> {
    let raw_url = non_blank(site.base_url).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
    let base_url = Url::parse(&raw_url)
        .map_err(|err| LoadError::invalid("site.base_url", format!("failed to parse: {err}")))?;
    if base_url.cannot_be_a_base() {
        return Err(LoadError::invalid(
            "site.base_url",
            format!("`{raw_url}` cannot carry a query string"),
        ));
    }

    let raw_timezone = non_blank(site.timezone).unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
    let timezone = raw_timezone
        .parse::<Tz>()
        .map_err(|err| LoadError::invalid("site.timezone", format!("failed to parse: {err}")))?;

    Ok(SiteSettings { base_url, timezone })
}

fn build_post_settings(posts: RawPostSettings) -> Result<PostSettings, LoadError> {
    let default_author =
        non_blank(posts.default_author).unwrap_or_else(|| DEFAULT_AUTHOR.to_string());
    let default_image_url =
        non_blank(posts.default_image_url).unwrap_or_else(|| DEFAULT_IMAGE_URL.to_string());
    let chars_per_minute = non_zero_u32(
        posts
            .chars_per_minute
            .unwrap_or(u64::from(DEFAULT_CHARS_PER_MINUTE)),
        "posts.chars_per_minute",
    )?;

    Ok(PostSettings {
        default_author,
        default_image_url,
        chars_per_minute,
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawStorageSettings {
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSiteSettings {
    base_url: Option<String>,
    timezone: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawPostSettings {
    default_author: Option<String>,
    default_image_url: Option<String>,
    chars_per_minute: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn non_zero_u32(value: u64, key: &'static str) -> Result<NonZeroU32, LoadError> {
    if value == 0 {
        return Err(LoadError::invalid(key, "must be greater than zero"));
    }
    let value_u32: u32 = value
        .try_into()
        .map_err(|_| LoadError::invalid(key, "value exceeds supported range for u32"))?;
    NonZeroU32::new(value_u32).ok_or_else(|| LoadError::invalid(key, "must be greater than zero"))
}
