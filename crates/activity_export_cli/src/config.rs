//! Configuration file support for activity-export.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `ACTIVITY_EXPORT_`, e.g., `ACTIVITY_EXPORT_DATABASE_URL`)
//! 3. Config file (~/.config/activity-export/config.toml or ./activity-export.toml)
//! 4. Built-in defaults
//!
//! The database URL defaults to `sqlite://~/.local/state/activity-export/activity-export.db`
//! on Linux (using the XDG state directory) if not explicitly configured.
//!
//! Example config file:
//! ```toml
//! [database]
//! url = "postgres://localhost/ideas"
//!
//! [mail]
//! from = "reports@example.com"
//!
//! [smtp]
//! host = "smtp.example.com"
//! port = 587
//! username = "reports"
//! password = "..."  # or use ACTIVITY_EXPORT_SMTP_PASSWORD env var
//! security = "starttls"  # none | starttls | tls
//!
//! [export]
//! output = "user_activity_export.xlsx"
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

const APP_NAME: &str = "activity-export";
const ENV_PREFIX: &str = "ACTIVITY_EXPORT";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Sender settings.
    pub mail: MailConfig,
    /// SMTP relay settings.
    pub smtp: SmtpConfig,
    /// Export output settings.
    pub export: ExportConfig,
}

/// Database configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Database connection URL.
    /// Supports sqlite:// and postgres:// schemes.
    pub url: Option<String>,
}

/// Sender settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MailConfig {
    /// Address the export email is sent from.
    pub from: String,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            from: activity_export::export::DEFAULT_FROM.to_string(),
        }
    }
}

/// SMTP relay settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    /// Can also be set via ACTIVITY_EXPORT_SMTP_PASSWORD.
    pub password: Option<String>,
    /// One of `none`, `starttls`, `tls`.
    pub security: String,
}

impl Default for SmtpConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 25,
            username: None,
            password: None,
            security: "none".to_string(),
        }
    }
}

/// Export output settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Where the workbook is written. Relative paths resolve against the
    /// current directory.
    pub output: Option<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output: Some(PathBuf::from(activity_export::report::DEFAULT_FILENAME)),
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/activity-export/config.toml)
    /// 3. Local config file (./activity-export.toml)
    /// 4. Environment variables with ACTIVITY_EXPORT_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        if let Some(xdg_config) = Self::default_config_path()
            && xdg_config.exists()
        {
            tracing::debug!("Loading config from {:?}", xdg_config);
            builder = builder.add_source(
                File::from(xdg_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        let local_config = PathBuf::from(format!("{APP_NAME}.toml"));
        if local_config.exists() {
            tracing::debug!("Loading config from ./{APP_NAME}.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // e.g., ACTIVITY_EXPORT_DATABASE_URL -> database.url
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the database URL, falling back to the default state directory path.
    ///
    /// The `mode=rwc` parameter enables read-write access and creates the file if it doesn't exist.
    pub fn database_url(&self) -> Option<String> {
        self.database.url.clone().or_else(|| {
            Self::default_state_dir().map(|state_dir| {
                let db_path = state_dir.join(format!("{APP_NAME}.db"));
                format!("sqlite://{}?mode=rwc", db_path.display())
            })
        })
    }

    /// SMTP settings for the library mailer.
    #[cfg(feature = "smtp")]
    pub fn smtp_settings(&self) -> Result<activity_export::mail::SmtpSettings, String> {
        Ok(activity_export::mail::SmtpSettings {
            host: self.smtp.host.clone(),
            port: self.smtp.port,
            username: self.smtp.username.clone(),
            password: self.smtp.password.clone(),
            security: self.smtp.security.parse()?,
        })
    }

    /// Get the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get the default state directory path.
    ///
    /// On Linux, this is `$XDG_STATE_HOME/activity-export` or `~/.local/state/activity-export`.
    /// On macOS/Windows, falls back to the data directory.
    pub fn default_state_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| {
            dirs.state_dir()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| dirs.data_dir().to_path_buf())
        })
    }
}
