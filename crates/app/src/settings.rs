use config::builder::{ConfigBuilder, DefaultState};
use config::{Config, Environment, File, Map};
use std::path::PathBuf;
use vigil_core::config::{AppConfig, ConfigError};

// Env var naming the TOML file
pub const CONFIG_PATH_VAR: &str = "VIGIL_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/vigil.toml";
pub const ENV_PREFIX: &str = "VIGIL";

/// # Summary
/// Loads and validates the application configuration.
///
/// # Logic
/// 1. Optional TOML file at `$VIGIL_CONFIG`, else `config/vigil.toml`.
/// 2. `VIGIL_*` environment variables on top, `__` separating nested keys
///    (`VIGIL_TELEGRAM__BOT_TOKEN` → `telegram.bot_token`).
/// 3. Deserialize into `AppConfig`, then `AppConfig::validate`.
///
/// # Returns
/// * `Result<AppConfig, ConfigError>` - `Load` for unreadable sources, `Invalid` for unusable values.
pub fn load() -> Result<AppConfig, ConfigError> {
    let path = std::env::var(CONFIG_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
    let builder = Config::builder()
        .add_source(File::from(path.as_path()).required(false))
        .add_source(environment(None));
    finish(builder)
}

/// Environment source; `vars` replaces the process environment when given.
fn environment(vars: Option<Map<String, String>>) -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
        .source(vars)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<AppConfig, ConfigError> {
    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;
    let app: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;
    app.validate()?;
    Ok(app)
}
