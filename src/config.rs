//! Configuration for the session zone and CLI output.
//!
//! ```toml
//! [session]
//! timezone = "local"   # "utc", "+05:30", "Europe/Paris", ...
//!
//! [output]
//! format = "table"     # or "json"
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::decoder::Decoder;
use crate::error::{ConvertError, ConvertResult};
use crate::zone::SessionZone;

/// File looked up in the working directory.
pub const LOCAL_CONFIG: &str = "flakecast.toml";

/// Environment variable overriding `session.timezone`.
pub const TIMEZONE_ENV: &str = "FLAKECAST_TIMEZONE";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub session: SessionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub timezone: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timezone: "local".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Config {
    pub fn from_toml(content: &str) -> ConvertResult<Self> {
        toml::from_str(content).map_err(|e| ConvertError::Config(e.to_string()))
    }

    pub fn from_file(path: &Path) -> ConvertResult<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| ConvertError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load from `path` if given, else the first existing default location,
    /// else defaults. Environment overrides apply last.
    pub fn load(path: Option<&Path>) -> ConvertResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match default_paths().into_iter().find(|p| p.is_file()) {
                Some(found) => {
                    tracing::debug!("Loading config from {}", found.display());
                    Self::from_file(&found)?
                }
                None => Self::default(),
            },
        };
        Ok(config.with_env(std::env::var(TIMEZONE_ENV).ok()))
    }

    /// Apply a timezone override, as read from [`TIMEZONE_ENV`].
    pub fn with_env(mut self, timezone: Option<String>) -> Self {
        if let Some(tz) = timezone.filter(|tz| !tz.trim().is_empty()) {
            self.session.timezone = tz;
        }
        self
    }

    pub fn session_zone(&self) -> ConvertResult<SessionZone> {
        self.session.timezone.parse()
    }

    pub fn decoder(&self) -> ConvertResult<Decoder> {
        Ok(Decoder::new(self.session_zone()?))
    }
}

/// `./flakecast.toml`, then `<config dir>/flakecast/config.toml`.
pub fn default_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
    if let Some(dir) = dirs::config_dir() {
        paths.push(dir.join("flakecast").join("config.toml"));
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.session_zone().unwrap(), SessionZone::Local);
        assert_eq!(config.output.format, OutputFormat::Table);
    }

    #[test]
    fn test_full_file() {
        let config = Config::from_toml(
            r#"
            [session]
            timezone = "-03:00"

            [output]
            format = "json"
            "#,
        )
        .unwrap();
        assert_eq!(
            config.session_zone().unwrap(),
            SessionZone::Fixed(FixedOffset::west_opt(3 * 3600).unwrap())
        );
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_named_timezone() {
        let config = Config::from_toml("[session]\ntimezone = \"Asia/Tokyo\"").unwrap();
        assert_eq!(
            config.decoder().unwrap().zone(),
            SessionZone::Named(chrono_tz::Asia::Tokyo)
        );
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(matches!(
            Config::from_toml("[session]\nzone = \"utc\""),
            Err(ConvertError::Config(_))
        ));
    }

    #[test]
    fn test_bad_timezone_surfaces_on_use() {
        let config = Config::from_toml("[session]\ntimezone = \"Mars/Olympus\"").unwrap();
        assert!(matches!(config.decoder(), Err(ConvertError::Config(_))));
    }

    #[test]
    fn test_env_override() {
        let config = Config::default().with_env(Some("utc".into()));
        assert_eq!(config.session_zone().unwrap(), SessionZone::utc());
        let config = Config::default().with_env(Some("  ".into()));
        assert_eq!(config.session.timezone, "local");
    }

    #[test]
    fn test_missing_explicit_file_is_io_error() {
        let err = Config::load(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(matches!(err, ConvertError::Io(_)));
    }

    #[test]
    fn test_default_paths_start_local() {
        assert_eq!(default_paths()[0], PathBuf::from(LOCAL_CONFIG));
    }
}
