use std::{env, path::PathBuf};

use crate::error::ConfigError;

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `CADENZA__`), and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CADENZA")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Load and validate settings, falling back to defaults on any failure.
    ///
    /// Configuration is optional; a broken file must not stop the host.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(s) => match s.validate() {
                Ok(()) => s,
                Err(e) => {
                    tracing::warn!(error = %e, "invalid config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(error = %e, "failed to load config, using defaults");
                Self::default()
            }
        }
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.deletion.max_query_bytes == 0 {
            return Err(ConfigError::Invalid(
                "deletion.max_query_bytes must be >= 1".to_string(),
            ));
        }
        if self.deletion.id_column.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "deletion.id_column must not be empty".to_string(),
            ));
        }
        for (key, ext) in [
            ("lyrics.synced_extension", &self.lyrics.synced_extension),
            ("lyrics.plain_extension", &self.lyrics.plain_extension),
        ] {
            if ext.trim().trim_start_matches('.').is_empty() {
                return Err(ConfigError::Invalid(format!("{key} must not be empty")));
            }
        }
        Ok(())
    }
}

/// `CADENZA_CONFIG_PATH` when set, else [`default_config_path`].
pub fn resolve_config_path() -> Option<PathBuf> {
    env::var_os("CADENZA_CONFIG_PATH")
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// `cadenza/config.toml` under `$XDG_CONFIG_HOME`, or `~/.config`.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(config_home.join("cadenza").join("config.toml"))
}
