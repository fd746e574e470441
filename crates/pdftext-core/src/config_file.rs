use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub batch: Option<BatchConfig>,
    pub display: Option<DisplayConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchConfig {
    pub overwrite: Option<bool>,
    pub sort: Option<bool>,
    pub fail_on_error: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub progress: Option<bool>,
    pub color: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// A `tracing` level name or filter directive, e.g. `"info"` or `"pdftext_core=debug"`.
    pub level: Option<String>,
}

impl ConfigFile {
    pub fn overwrite(&self) -> Option<bool> {
        self.batch.as_ref().and_then(|b| b.overwrite)
    }

    pub fn sort(&self) -> Option<bool> {
        self.batch.as_ref().and_then(|b| b.sort)
    }

    pub fn fail_on_error(&self) -> Option<bool> {
        self.batch.as_ref().and_then(|b| b.fail_on_error)
    }

    pub fn progress(&self) -> Option<bool> {
        self.display.as_ref().and_then(|d| d.progress)
    }

    pub fn color(&self) -> Option<bool> {
        self.display.as_ref().and_then(|d| d.color)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }
}

/// Platform config directory path: `<config_dir>/pdftext/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pdftext").join("config.toml"))
}

/// A config file that exists but could not be used. Its settings are ignored.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("ignoring unreadable config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("ignoring unparseable config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Load config by cascading CWD `.pdftext.toml` over platform config.
/// CWD values override platform values.
///
/// Broken files are skipped and returned alongside the config so the caller
/// can report them once logging is set up.
pub fn load_config() -> (ConfigFile, Vec<ConfigError>) {
    load_cascade(config_path().as_deref(), Path::new(".pdftext.toml"))
}

/// Load `overlay` over `base`, collecting errors for files that exist but
/// cannot be read or parsed.
pub fn load_cascade(base: Option<&Path>, overlay: &Path) -> (ConfigFile, Vec<ConfigError>) {
    let mut errors = Vec::new();
    let mut load = |path: &Path| match load_from_path(path) {
        Ok(config) => config,
        Err(e) => {
            errors.push(e);
            None
        }
    };

    let platform = match base {
        Some(path) => load(path),
        None => None,
    };
    let cwd = load(overlay);

    let config = match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    };
    (config, errors)
}

/// Load a config from a specific path. Returns `Ok(None)` if the file doesn't
/// exist.
pub fn load_from_path(path: &Path) -> Result<Option<ConfigFile>, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    toml::from_str(&content)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        batch: Some(BatchConfig {
            overwrite: overlay.overwrite().or_else(|| base.overwrite()),
            sort: overlay.sort().or_else(|| base.sort()),
            fail_on_error: overlay.fail_on_error().or_else(|| base.fail_on_error()),
        }),
        display: Some(DisplayConfig {
            progress: overlay.progress().or_else(|| base.progress()),
            color: overlay.color().or_else(|| base.color()),
        }),
        logging: Some(LoggingConfig {
            level: overlay
                .log_level()
                .or_else(|| base.log_level())
                .map(str::to_string),
        }),
    }
}
