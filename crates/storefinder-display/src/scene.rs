//! Map scene model: everything the page needs to draw, with no drawing code.

use serde::Serialize;
use storefinder_core::{haversine_km, Catalog, Coordinate, RankedStore, RouteStrategy};
use storefinder_position::Snapshot;

use crate::html::escape_html;
use crate::link::directions_url;
use crate::{DisplayConfig, RoutingClient};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    Origin,
    Store,
    NearestStore,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: Coordinate,
    pub title: String,
    /// Popup body, already HTML-escaped.
    pub popup_html: String,
    /// Distance from the origin; `None` on the origin marker itself.
    pub distance_km: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteSource {
    StraightLine,
    RoutingService,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOverlay {
    pub source: RouteSource,
    pub path: Vec<Coordinate>,
    pub color: String,
    pub distance_km: f64,
    /// Travel time, known only for service routes.
    pub duration_s: Option<f64>,
}

impl RouteOverlay {
    #[must_use]
    pub fn straight(origin: Coordinate, destination: Coordinate, color: &str) -> Self {
        Self {
            source: RouteSource::StraightLine,
            path: vec![origin, destination],
            color: color.to_owned(),
            distance_km: haversine_km(origin, destination),
            duration_s: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapScene {
    pub center: Coordinate,
    pub zoom: u8,
    pub tile_url: String,
    /// Origin marker first, then one marker per store in catalog order.
    pub markers: Vec<Marker>,
    pub nearest: Option<RankedStore>,
    pub route: Option<RouteOverlay>,
    pub directions_url: Option<String>,
}

/// Lay out the scene for one snapshot.
///
/// The route, when there is a nearest store, starts as a straight segment;
/// [`MapScene::apply_route_strategy`] replaces it according to
/// `config.route_strategy`.
#[must_use]
pub fn build_scene(snapshot: &Snapshot, catalog: &Catalog, config: &DisplayConfig) -> MapScene {
    let origin = snapshot.origin;
    let nearest_name = snapshot.nearest.as_ref().map(|n| n.store.name.as_str());

    let mut markers = Vec::with_capacity(catalog.len() + 1);
    markers.push(Marker {
        kind: MarkerKind::Origin,
        position: origin,
        title: config.origin_label().to_string(),
        popup_html: escape_html(config.origin_label()),
        distance_km: None,
    });

    markers.extend(catalog.iter().map(|store| {
        let kind = if Some(store.name.as_str()) == nearest_name {
            MarkerKind::NearestStore
        } else {
            MarkerKind::Store
        };
        Marker {
            kind,
            position: store.coordinate,
            title: store.name.clone(),
            popup_html: format!(
                "<strong>{}</strong><br>{}",
                escape_html(&store.name),
                escape_html(&store.address)
            ),
            distance_km: Some(haversine_km(origin, store.coordinate)),
        }
    }));

    let route = snapshot.nearest.as_ref().map(|nearest| {
        RouteOverlay::straight(origin, nearest.store.coordinate, &config.route_color)
    });

    let directions = snapshot.nearest.as_ref().map(|nearest| {
        directions_url(
            &config.directions_base_url,
            origin,
            nearest.store.coordinate,
        )
    });

    MapScene {
        center: origin,
        zoom: config.zoom,
        tile_url: config.tile_url.clone(),
        markers,
        nearest: snapshot.nearest.clone(),
        route,
        directions_url: directions,
    }
}

/// Choose the route overlay for `origin` → `destination` under `strategy`.
///
/// With [`RouteStrategy::RoutingService`] the road geometry is fetched from
/// `router`; if there is no router or the request fails, the straight
/// segment is used instead.
pub async fn plan_route(
    strategy: RouteStrategy,
    origin: Coordinate,
    destination: Coordinate,
    router: Option<&RoutingClient>,
    color: &str,
) -> RouteOverlay {
    let router = match (strategy, router) {
        (RouteStrategy::RoutingService, Some(router)) => router,
        (RouteStrategy::RoutingService, None) => {
            tracing::warn!("routing service requested but not configured; drawing straight line");
            return RouteOverlay::straight(origin, destination, color);
        }
        (RouteStrategy::StraightLine, _) => {
            return RouteOverlay::straight(origin, destination, color);
        }
    };

    match router.fetch_route(origin, destination).await {
        Ok(route) => RouteOverlay {
            source: RouteSource::RoutingService,
            path: route.path,
            color: color.to_owned(),
            distance_km: route.distance_km,
            duration_s: Some(route.duration_s),
        },
        Err(err) => {
            tracing::warn!(error = %err, "routing service failed; drawing straight line");
            RouteOverlay::straight(origin, destination, color)
        }
    }
}

impl MapScene {
    /// Re-plan the route overlay with `config.route_strategy` and
    /// `config.route_color`. No-op without a nearest store.
    pub async fn apply_route_strategy(
        &mut self,
        config: &DisplayConfig,
        router: Option<&RoutingClient>,
    ) {
        let Some(nearest) = &self.nearest else {
            return;
        };
        let destination = nearest.store.coordinate;
        let route = plan_route(
            config.route_strategy,
            self.center,
            destination,
            router,
            &config.route_color,
        )
        .await;
        self.route = Some(route);
    }
}
