//! Standalone Leaflet page for a [`MapScene`].

use std::fmt::Write as _;

use crate::{DisplayError, MapScene};

const LEAFLET_VERSION: &str = "1.9.4";

/// Escape text for use in HTML content or a quoted attribute.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render `scene` as a self-contained HTML document.
///
/// `heading` and `status` are shown above the map as plain text.
///
/// # Errors
///
/// Returns [`DisplayError::Serialize`] if the scene cannot be encoded.
pub fn render_html(
    scene: &MapScene,
    heading: &str,
    status: &[String],
) -> Result<String, DisplayError> {
    // Markup characters only occur inside JSON strings, where the \u escapes
    // are equivalent and cannot end the script block.
    let scene_json = serde_json::to_string(scene)
        .map_err(DisplayError::Serialize)?
        .replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026");

    let mut status_html = String::new();
    for line in status {
        // Writing to a String cannot fail.
        let _ = writeln!(status_html, "      <p>{}</p>", escape_html(line));
    }

    let directions_html = scene
        .directions_url
        .as_deref()
        .map(|url| {
            format!(
                "      <p><a href=\"{}\" target=\"_blank\" rel=\"noopener\">Open directions</a></p>\n",
                escape_html(url)
            )
        })
        .unwrap_or_default();

    let heading = escape_html(heading);

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{heading}</title>
    <link rel="stylesheet" href="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.css">
    <script src="https://unpkg.com/leaflet@{LEAFLET_VERSION}/dist/leaflet.js"></script>
    <style>
      body {{ font-family: sans-serif; margin: 1rem; background: #f3f4f6; }}
      #map {{ height: 500px; width: 100%; border-radius: 0.5rem; }}
    </style>
  </head>
  <body>
    <h1>{heading}</h1>
    <div class="status">
{status_html}{directions_html}    </div>
    <div id="map"></div>
    <script>
      const scene = {scene_json};
      const map = L.map("map").setView([scene.center.lat, scene.center.lng], scene.zoom);
      L.tileLayer(scene.tile_url, {{
        attribution: "&copy; OpenStreetMap contributors",
      }}).addTo(map);
      for (const marker of scene.markers) {{
        L.marker([marker.position.lat, marker.position.lng], {{ title: marker.title }})
          .addTo(map)
          .bindPopup(marker.popup_html);
      }}
      if (scene.route) {{
        L.polyline(scene.route.path.map((p) => [p.lat, p.lng]), {{ color: scene.route.color }})
          .addTo(map);
      }}
    </script>
  </body>
</html>
"#
    ))
}

#[cfg(test)]
mod tests {
    use storefinder_core::{Catalog, Coordinate, Store};
    use storefinder_position::{PositionFix, Snapshot};

    use super::*;
    use crate::{build_scene, DisplayConfig};

    fn scene() -> MapScene {
        let catalog = Catalog::new(vec![Store::new(
            "Tom & Jerry's",
            "</script><script>alert(1)</script>",
            Coordinate {
                lat: 12.9352,
                lng: 77.6146,
            },
        )])
        .unwrap();
        let fix = PositionFix::new(Coordinate {
            lat: 12.9716,
            lng: 77.5946,
        });
        let snapshot = Snapshot::resolve(&fix, &catalog).unwrap();
        build_scene(&snapshot, &catalog, &DisplayConfig::default())
    }

    #[test]
    fn escape_html_handles_all_special_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn page_embeds_scene_and_status() {
        let status = ["Latitude: 12.9716".to_string()];
        let html = render_html(&scene(), "Your Current Location", &status).unwrap();
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h1>Your Current Location</h1>"));
        assert!(html.contains("<p>Latitude: 12.9716</p>"));
        assert!(html.contains("leaflet@1.9.4"));
        assert!(html.contains("L.polyline"));
        assert!(html.contains("Open directions"));
    }

    #[test]
    fn store_text_cannot_break_out_of_script() {
        let html = render_html(&scene(), "t", &[]).unwrap();
        assert_eq!(html.matches("</script>").count(), 2);
        assert!(!html.contains("<script>alert(1)"));
    }
}
