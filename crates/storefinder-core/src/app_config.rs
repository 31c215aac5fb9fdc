use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl Environment {
    /// Log filter used when `STOREFINDER_LOG_LEVEL` is unset.
    ///
    /// Test and production runs only surface warnings and errors on stderr.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        match self {
            Environment::Development => "info",
            Environment::Test | Environment::Production => "warn",
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// How the display draws the path from the user to the nearest store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RouteStrategy {
    /// A single straight segment between the two points.
    #[default]
    StraightLine,
    /// Road geometry fetched from an external routing service.
    RoutingService,
}

impl std::fmt::Display for RouteStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteStrategy::StraightLine => write!(f, "straight"),
            RouteStrategy::RoutingService => write!(f, "service"),
        }
    }
}

impl std::str::FromStr for RouteStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "straight" | "line" => Ok(RouteStrategy::StraightLine),
            "service" | "routed" => Ok(RouteStrategy::RoutingService),
            other => Err(format!(
                "unknown route strategy '{other}'; expected 'straight' or 'service'"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// `None` means the built-in catalog.
    pub catalog_path: Option<PathBuf>,
    pub high_accuracy: bool,
    pub max_age_ms: u64,
    pub position_timeout_ms: u64,
    pub route_strategy: RouteStrategy,
    pub routing_base_url: String,
    pub routing_timeout_secs: u64,
    pub directions_base_url: String,
    pub tile_url: String,
    pub map_zoom: u8,
    /// Zoom for the live tracking view, which follows the user more closely.
    pub live_map_zoom: u8,
    pub user_agent: String,
}
