//! Environment variable handling for the Fitbook application.
//!
//! Configuration values can be overridden by environment variables that follow
//! a fixed naming pattern. This module owns that pattern so the loader and any
//! error messages agree on it.

use std::env;

/// The default prefix for configuration environment variables
pub const DEFAULT_PREFIX: &str = "FITBOOK";

/// The separator for configuration environment variables
pub const CONFIG_SEPARATOR: &str = "__";

/// Environment variable naming the directory that holds the config files
pub const CONFIG_DIR_VAR: &str = "FITBOOK_CONFIG_DIR";

/// Get the prefix for configuration environment variables
pub fn get_config_prefix() -> String {
    env::var("PREFIX").unwrap_or_else(|_| DEFAULT_PREFIX.to_string())
}

/// Convert a configuration path to an environment variable name
///
/// # Arguments
///
/// * `path` - The configuration path (e.g., "server.host")
///
/// # Returns
///
/// The environment variable name (e.g., "FITBOOK__SERVER__HOST")
pub fn config_path_to_env_var(path: &str) -> String {
    let prefix = get_config_prefix();
    let path = path.replace('.', CONFIG_SEPARATOR);
    format!("{}{}{}", prefix, CONFIG_SEPARATOR, path).to_uppercase()
}

/// Get an environment variable for a configuration path
pub fn get_config_env_var(path: &str) -> Option<String> {
    let env_var = config_path_to_env_var(path);
    env::var(&env_var).ok()
}

/// The directory the layered config files are read from.
pub fn config_dir() -> String {
    env::var(CONFIG_DIR_VAR).unwrap_or_else(|_| "config".to_string())
}
