use crate::app_config::{AppConfig, Environment, RouteStrategy};
use crate::ConfigError;

/// Highest zoom level the default OpenStreetMap tile server serves.
const MAX_MAP_ZOOM: u8 = 19;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a map.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_bool = |var: &str, default: &str| -> Result<bool, ConfigError> {
        match or_default(var, default).trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(invalid(var, format!("'{other}' is not a boolean"))),
        }
    };

    let env = parse_environment(&or_default("STOREFINDER_ENV", "development"))?;
    let log_level = or_default("STOREFINDER_LOG_LEVEL", env.default_log_level());
    let catalog_path = lookup("STOREFINDER_CATALOG_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let high_accuracy = parse_bool("STOREFINDER_HIGH_ACCURACY", "false")?;
    let max_age_ms = parse_u64("STOREFINDER_MAX_AGE_MS", "10000")?;
    let position_timeout_ms = parse_u64("STOREFINDER_POSITION_TIMEOUT_MS", "5000")?;

    let route_strategy = or_default("STOREFINDER_ROUTE_STRATEGY", "straight")
        .parse::<RouteStrategy>()
        .map_err(|reason| invalid("STOREFINDER_ROUTE_STRATEGY", reason))?;
    let routing_base_url = or_default(
        "STOREFINDER_ROUTING_BASE_URL",
        "https://router.project-osrm.org",
    );
    let routing_timeout_secs = parse_u64("STOREFINDER_ROUTING_TIMEOUT_SECS", "10")?;
    let directions_base_url = or_default(
        "STOREFINDER_DIRECTIONS_BASE_URL",
        "https://www.google.com/maps/dir/?api=1",
    );
    let tile_url = or_default(
        "STOREFINDER_TILE_URL",
        "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
    );

    let parse_zoom = |var: &str, default: &str| -> Result<u8, ConfigError> {
        let zoom = or_default(var, default)
            .parse::<u8>()
            .map_err(|e| invalid(var, e.to_string()))?;
        if zoom > MAX_MAP_ZOOM {
            return Err(invalid(
                var,
                format!("{zoom} exceeds maximum zoom {MAX_MAP_ZOOM}"),
            ));
        }
        Ok(zoom)
    };
    let map_zoom = parse_zoom("STOREFINDER_MAP_ZOOM", "13")?;
    let live_map_zoom = parse_zoom("STOREFINDER_LIVE_MAP_ZOOM", "15")?;

    let user_agent = or_default("STOREFINDER_USER_AGENT", "storefinder/0.1");

    Ok(AppConfig {
        env,
        log_level,
        catalog_path,
        high_accuracy,
        max_age_ms,
        position_timeout_ms,
        route_strategy,
        routing_base_url,
        routing_timeout_secs,
        directions_base_url,
        tile_url,
        map_zoom,
        live_map_zoom,
        user_agent,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "STOREFINDER_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
