use crate::app_config::AppConfig;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The core parsing/validation logic, decoupled from the actual environment
/// so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("PROPSCAN_LOG_LEVEL", "info");
    let rightmove_rate_limit_ms = parse_u64("PROPSCAN_RIGHTMOVE_RATE_LIMIT_MS", "500")?;
    let tfl_rate_limit_ms = parse_u64("PROPSCAN_TFL_RATE_LIMIT_MS", "130")?;
    let request_timeout_secs = parse_u64("PROPSCAN_REQUEST_TIMEOUT_SECS", "10")?;
    let max_retries = parse_u32("PROPSCAN_MAX_RETRIES", "3")?;
    let max_concurrent_targets = parse_usize("PROPSCAN_MAX_CONCURRENT_TARGETS", "0")?;
    let user_agent = or_default("PROPSCAN_USER_AGENT", "propscan/0.1 (property-analysis)");
    let tfl_app_id = lookup("TFL_APP_ID").ok();
    let tfl_app_key = lookup("TFL_APP_KEY").ok();

    Ok(AppConfig {
        log_level,
        rightmove_rate_limit_ms,
        tfl_rate_limit_ms,
        request_timeout_secs,
        max_retries,
        max_concurrent_targets,
        user_agent,
        tfl_app_id,
        tfl_app_key,
    })
}
