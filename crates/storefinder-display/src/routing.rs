//! HTTP client for an OSRM-compatible routing service.
//!
//! Only used for drawing: the route geometry replaces the straight segment
//! on the map. Any failure is returned to the caller, which falls back to
//! the straight line. Requests are never retried.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use storefinder_core::{AppConfig, Coordinate};

use crate::error::DisplayError;

/// A road route between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub path: Vec<Coordinate>,
    pub distance_km: f64,
    pub duration_s: f64,
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters.
    distance: f64,
    /// Seconds.
    duration: f64,
    geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    /// GeoJSON order: `[lng, lat]`.
    coordinates: Vec<[f64; 2]>,
}

pub struct RoutingClient {
    client: Client,
    base_url: String,
}

impl RoutingClient {
    /// Creates a `RoutingClient` with a request timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`DisplayError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute http(s) URL, or [`DisplayError::Http`] if the underlying
    /// `reqwest::Client` cannot be constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, DisplayError> {
        let parsed = reqwest::Url::parse(base_url).map_err(|e| DisplayError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(DisplayError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// # Errors
    ///
    /// Same as [`RoutingClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, DisplayError> {
        Self::new(
            &config.routing_base_url,
            config.routing_timeout_secs,
            &config.user_agent,
        )
    }

    /// Fetch a driving route from `origin` to `destination`.
    ///
    /// # Errors
    ///
    /// - [`DisplayError::Http`]: network or TLS failure.
    /// - [`DisplayError::UnexpectedStatus`]: any non-2xx response.
    /// - [`DisplayError::Deserialize`]: the body is not an OSRM response.
    /// - [`DisplayError::NoRoute`]: the service returned no route.
    pub async fn fetch_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Route, DisplayError> {
        let url = self.route_url(origin, destination);
        tracing::debug!(url = %url, "requesting route");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;
        let status = response.status();

        // OSRM reports "no route" as 400 with a JSON body; read it before judging status.
        let body = response.text().await?;
        let parsed = serde_json::from_str::<OsrmResponse>(&body);

        if !status.is_success() {
            if let Ok(OsrmResponse { code, message, .. }) = parsed {
                if code == "NoRoute" {
                    return Err(DisplayError::NoRoute(message.unwrap_or(code)));
                }
            }
            return Err(DisplayError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }

        let parsed = parsed.map_err(|e| DisplayError::Deserialize {
            context: format!("route response from {url}"),
            source: e,
        })?;

        if parsed.code != "Ok" {
            return Err(DisplayError::NoRoute(
                parsed.message.unwrap_or(parsed.code),
            ));
        }

        let route = parsed
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| DisplayError::NoRoute("response contained no routes".to_string()))?;

        let path: Vec<Coordinate> = route
            .geometry
            .coordinates
            .into_iter()
            .map(|[lng, lat]| Coordinate { lat, lng })
            .collect();

        if path.len() < 2 {
            return Err(DisplayError::NoRoute(format!(
                "route geometry has {} point(s)",
                path.len()
            )));
        }

        Ok(Route {
            path,
            distance_km: route.distance / 1000.0,
            duration_s: route.duration,
        })
    }

    fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/route/v1/driving/{},{};{},{}?overview=full&geometries=geojson",
            self.base_url, origin.lng, origin.lat, destination.lng, destination.lat
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_url_uses_lng_lat_order() {
        let client = RoutingClient::new("https://router.example.com/", 5, "test").unwrap();
        let url = client.route_url(
            Coordinate {
                lat: 12.9716,
                lng: 77.5946,
            },
            Coordinate {
                lat: 12.9352,
                lng: 77.6146,
            },
        );
        assert_eq!(
            url,
            "https://router.example.com/route/v1/driving/77.5946,12.9716;77.6146,12.9352?overview=full&geometries=geojson"
        );
    }

    #[test]
    fn rejects_relative_base_url() {
        assert!(matches!(
            RoutingClient::new("router.example.com", 5, "test"),
            Err(DisplayError::InvalidBaseUrl { .. })
        ));
    }

    #[test]
    fn rejects_non_http_scheme() {
        assert!(matches!(
            RoutingClient::new("ftp://router.example.com", 5, "test"),
            Err(DisplayError::InvalidBaseUrl { .. })
        ));
    }
}
