use storefinder_core::{AppConfig, RouteStrategy};

/// Rendering settings for the map.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    /// Leaflet tile URL template.
    pub tile_url: String,
    pub zoom: u8,
    pub route_strategy: RouteStrategy,
    pub route_color: String,
    pub directions_base_url: String,
    /// Whether the view follows a live stream rather than a single read.
    pub live: bool,
}

impl DisplayConfig {
    /// The live view uses `live_map_zoom`; a one-shot view uses `map_zoom`.
    #[must_use]
    pub fn from_app_config(config: &AppConfig, live: bool) -> Self {
        Self {
            tile_url: config.tile_url.clone(),
            zoom: if live {
                config.live_map_zoom
            } else {
                config.map_zoom
            },
            route_strategy: config.route_strategy,
            route_color: "red".to_string(),
            directions_base_url: config.directions_base_url.clone(),
            live,
        }
    }

    /// Popup text for the user's own marker.
    #[must_use]
    pub fn origin_label(&self) -> &'static str {
        if self.live {
            "You are here (live)"
        } else {
            "You are here"
        }
    }

    #[must_use]
    pub fn heading(&self) -> &'static str {
        if self.live {
            "Live Location Tracker"
        } else {
            "Your Current Location"
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            tile_url: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            zoom: 13,
            route_strategy: RouteStrategy::StraightLine,
            route_color: "red".to_string(),
            directions_base_url: "https://www.google.com/maps/dir/?api=1".to_string(),
            live: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_flag_switches_labels() {
        let live = DisplayConfig {
            live: true,
            ..DisplayConfig::default()
        };
        assert_eq!(DisplayConfig::default().heading(), "Your Current Location");
        assert_eq!(live.heading(), "Live Location Tracker");
        assert_eq!(live.origin_label(), "You are here (live)");
    }

    #[test]
    fn live_view_uses_live_zoom() {
        let config = AppConfig {
            env: storefinder_core::Environment::Test,
            log_level: "warn".to_string(),
            catalog_path: None,
            high_accuracy: false,
            max_age_ms: 10_000,
            position_timeout_ms: 5_000,
            route_strategy: RouteStrategy::RoutingService,
            routing_base_url: "https://router.example.com".to_string(),
            routing_timeout_secs: 10,
            directions_base_url: "https://maps.example.com/dir/?api=1".to_string(),
            tile_url: "https://tiles.example.com/{z}/{x}/{y}.png".to_string(),
            map_zoom: 13,
            live_map_zoom: 15,
            user_agent: "storefinder-test/0.1".to_string(),
        };
        assert_eq!(DisplayConfig::from_app_config(&config, false).zoom, 13);
        let live = DisplayConfig::from_app_config(&config, true);
        assert_eq!(live.zoom, 15);
        assert_eq!(live.route_strategy, RouteStrategy::RoutingService);
    }
}
