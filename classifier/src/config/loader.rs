use crate::config::error::{ConfigError, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the working directory and config directory.
pub const CONFIG_FILE_NAME: &str = "irb-prescreen.toml";

/// Environment variable prefix, e.g. `IRB_PRESCREEN_OUTPUT__FORMAT=json`.
pub const ENV_PREFIX: &str = "IRB_PRESCREEN";

/// Root configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenConfig {
    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub review: ReviewConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Validate the merged configuration against the embedded schema
    #[serde(default = "default_true")]
    pub schema_validation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// How results are rendered by the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[serde(default = "default_true")]
    pub pretty: bool,

    #[serde(default = "default_true")]
    pub show_flags: bool,

    #[serde(default = "default_true")]
    pub show_recommendations: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Results below this confidence (0.0-1.0) are marked for staff consultation
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_true() -> bool {
    true
}
fn default_confidence_threshold() -> f32 {
    0.8
}
fn default_log_filter() -> String {
    "warn".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            pretty: default_true(),
            show_flags: default_true(),
            show_recommendations: default_true(),
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            output: OutputConfig::default(),
            review: ReviewConfig::default(),
            logging: LoggingConfig::default(),
            schema_validation: default_true(),
        }
    }
}

/// Configuration loader with layered merging support
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Use an explicit configuration file. A missing file is an error.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Merge defaults, the config file, and `IRB_PRESCREEN_*` variables,
    /// then validate the result.
    pub fn load(&self) -> Result<ScreenConfig> {
        let mut builder = Config::builder();

        let defaults_json = serde_json::to_string(&ScreenConfig::default())?;
        builder = builder.add_source(File::from_str(&defaults_json, config::FileFormat::Json));

        if let Some(path) = &self.config_path {
            let metadata = match std::fs::metadata(path) {
                Ok(metadata) => metadata,
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                    return Err(ConfigError::FileNotFound(path.clone()));
                }
                Err(err) => return Err(err.into()),
            };
            if metadata.is_dir() {
                return Err(ConfigError::IoError(std::io::Error::new(
                    std::io::ErrorKind::IsADirectory,
                    format!("{} is a directory", path.display()),
                )));
            }
            tracing::debug!(path = %path.display(), "Loading configuration file");
            builder = builder.add_source(File::from(path.as_path()));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let screen_config: ScreenConfig = builder.build()?.try_deserialize()?;

        if screen_config.schema_validation {
            let validator = crate::config::validator::SchemaValidator::new()?;
            validator.validate(&screen_config)?;
        } else {
            tracing::warn!("Configuration schema validation is disabled");
        }

        Ok(screen_config)
    }

    /// Locate a config file in the standard locations:
    /// 1. `./irb-prescreen.toml`
    /// 2. `<config dir>/irb-prescreen/config.toml`
    /// 3. `~/.irb-prescreen.toml`
    pub fn find_config_file() -> Option<PathBuf> {
        let cwd_config = PathBuf::from(".").join(CONFIG_FILE_NAME);
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let candidate = config_dir.join("irb-prescreen").join("config.toml");
            if candidate.exists() {
                return Some(candidate);
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            let candidate = home_dir.join(format!(".{CONFIG_FILE_NAME}"));
            if candidate.exists() {
                return Some(candidate);
            }
        }

        None
    }

    /// Load configuration from the first default location found, or from
    /// defaults and environment alone.
    pub fn load_default() -> Result<ScreenConfig> {
        match Self::find_config_file() {
            Some(path) => ConfigLoader::new().with_file(path).load(),
            None => {
                tracing::debug!("No configuration file found; using defaults");
                ConfigLoader::new().load()
            }
        }
    }
}
