//! Display surface for storefinder.
//!
//! Turns a resolved [`storefinder_position::Snapshot`] into something a user
//! can look at: a [`MapScene`] (markers, popups and a route overlay), a
//! standalone Leaflet page, a directions deep link, or plain status lines.

pub mod config;
pub mod error;
pub mod html;
pub mod link;
pub mod routing;
pub mod scene;
pub mod status;

pub use config::DisplayConfig;
pub use error::DisplayError;
pub use html::render_html;
pub use link::directions_url;
pub use routing::{Route, RoutingClient};
pub use scene::{build_scene, plan_route, MapScene, Marker, MarkerKind, RouteOverlay, RouteSource};
pub use status::status_lines;
