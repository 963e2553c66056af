use config::{Config, Environment, File};
use once_cell::sync::OnceCell;
use std::env;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

pub mod env_vars;
pub mod models;
pub use models::*;

use env_vars::{config_dir, config_path_to_env_var, get_config_prefix, CONFIG_SEPARATOR};

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("failed to load configuration: {0}")]
    Source(#[from] config::ConfigError),
    #[error("invalid value for {path} (override with {env_var}): {message}")]
    Invalid {
        path: String,
        env_var: String,
        message: String,
    },
}

/// Loads the layered configuration.
///
/// Sources, later ones winning: built-in defaults, `<dir>/default.*`,
/// `<dir>/<RUN_ENV>.*`, then `FITBOOK__SECTION__KEY` environment variables.
pub fn load_config() -> Result<AppConfig, ConfigLoadError> {
    ensure_dotenv_loaded();

    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "debug".to_string());
    let prefix = get_config_prefix();
    let dir = config_dir();

    let default_path = format!("{}/default", dir);
    let env_path = format!("{}/{}", dir, run_env);
    debug!("Loading config from {} and {}", default_path, env_path);

    let defaults = AppConfig::default();
    let builder = Config::builder()
        .set_default("server.host", defaults.server.host)?
        .set_default("server.port", i64::from(defaults.server.port))?
        .set_default("database.url", defaults.database.url)?
        .set_default("booking.default_timezone", defaults.booking.default_timezone)?
        .set_default("booking.seed_on_startup", defaults.booking.seed_on_startup)?
        .set_default("logging.level", defaults.logging.level)?
        .add_source(File::with_name(&default_path).required(false))
        .add_source(File::with_name(&env_path).required(false))
        .add_source(
            Environment::with_prefix(&prefix)
                .prefix_separator(CONFIG_SEPARATOR)
                .separator(CONFIG_SEPARATOR)
                .try_parsing(true),
        );

    let config: AppConfig = builder.build()?.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

impl AppConfig {
    /// Rejects values that would only fail later at request time.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        if chrono_tz::Tz::from_str(&self.booking.default_timezone).is_err() {
            return Err(invalid(
                "booking.default_timezone",
                format!("unknown IANA timezone '{}'", self.booking.default_timezone),
            ));
        }
        if self.database.url.trim().is_empty() {
            return Err(invalid("database.url", "must not be empty".to_string()));
        }
        Ok(())
    }
}

fn invalid(path: &str, message: String) -> ConfigLoadError {
    ConfigLoadError::Invalid {
        path: path.to_string(),
        env_var: config_path_to_env_var(path),
        message,
    }
}

static INIT_DOTENV: OnceCell<()> = OnceCell::new();

/// Ensures that the dotenv file is loaded into the environment variables.
///
/// `DOTENV_OVERRIDE` names an alternative file; otherwise `.env` is tried.
/// A missing file is not an error. Returns the path that was tried.
pub fn ensure_dotenv_loaded() -> String {
    let dotenv_path = std::env::var("DOTENV_OVERRIDE").unwrap_or_else(|_| ".env".to_string());

    INIT_DOTENV.get_or_init(|| {
        dotenv::from_filename(&dotenv_path).ok();
    });

    dotenv_path
}
