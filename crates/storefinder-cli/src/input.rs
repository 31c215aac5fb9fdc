//! Position lines read by `watch`: `lat,lng` with an optional third
//! `accuracy_m` field. Blank lines and `#` comments are skipped.

use storefinder_core::Coordinate;
use storefinder_position::{PositionError, PositionFeed, PositionFix};

pub(crate) fn parse_line(line: &str) -> Option<anyhow::Result<PositionFix>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    Some(parse_fix(line))
}

fn parse_fix(line: &str) -> anyhow::Result<PositionFix> {
    let mut fields = line.split(',').map(str::trim);
    let (Some(lat), Some(lng)) = (fields.next(), fields.next()) else {
        anyhow::bail!("expected 'lat,lng', got '{line}'");
    };
    let accuracy = fields.next();
    if fields.next().is_some() {
        anyhow::bail!("too many fields in '{line}'");
    }

    let lat: f64 = lat.parse().map_err(|_| anyhow::anyhow!("bad latitude '{lat}'"))?;
    let lng: f64 = lng.parse().map_err(|_| anyhow::anyhow!("bad longitude '{lng}'"))?;
    let fix = PositionFix::new(Coordinate::new(lat, lng)?);

    match accuracy {
        Some(raw) => {
            let meters: f64 = raw
                .parse()
                .map_err(|_| anyhow::anyhow!("bad accuracy '{raw}'"))?;
            Ok(fix.with_accuracy(meters))
        }
        None => Ok(fix),
    }
}

/// Push one stdin line into `feed`. Unparseable lines are reported to
/// subscribers as an unavailable position.
pub(crate) fn feed_line(feed: &PositionFeed, line: &str) {
    match parse_line(line) {
        None => {}
        Some(Ok(fix)) => feed.push(fix),
        Some(Err(err)) => {
            tracing::warn!(line, error = %err, "ignoring invalid position line");
            feed.fail(PositionError::Unavailable(err.to_string()));
        }
    }
}
