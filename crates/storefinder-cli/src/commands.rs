//! Command handlers. Results go to stdout; diagnostics go through `tracing`.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;
use storefinder_core::{rank, resolve, AppConfig, Catalog, Coordinate, RouteStrategy};
use storefinder_display::{
    build_scene, directions_url, render_html, status_lines, DisplayConfig, RoutingClient,
};
use storefinder_position::{
    locate_once, track, FixedProvider, LocationState, PositionFeed, PositionOptions,
};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::input;

/// Resolve `origin` once through a fixed provider.
///
/// A failed read is an error here; there is nothing else to show.
async fn locate(
    config: &AppConfig,
    catalog: &Catalog,
    origin: Coordinate,
    live: bool,
) -> anyhow::Result<LocationState> {
    let options = PositionOptions::from_app_config(config, live);
    let state = locate_once(&FixedProvider::new(origin), catalog, &options).await;
    if let Some(message) = state.error() {
        anyhow::bail!("{message}");
    }
    Ok(state)
}

pub(crate) async fn run_nearest(
    config: &AppConfig,
    catalog: &Catalog,
    origin: Coordinate,
    json: bool,
) -> anyhow::Result<()> {
    let state = locate(config, catalog, origin, false).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
        return Ok(());
    }

    for line in status_lines(&state) {
        println!("{line}");
    }
    if state.snapshot().is_some_and(|s| s.nearest.is_none()) {
        println!("No stores in catalog.");
    }
    Ok(())
}

pub(crate) fn run_stores(
    catalog: &Catalog,
    origin: Option<Coordinate>,
    json: bool,
) -> anyhow::Result<()> {
    let Some(origin) = origin else {
        if json {
            println!("{}", serde_json::to_string_pretty(catalog.stores())?);
        } else {
            for store in catalog {
                println!("{}: {} ({})", store.name, store.address, store.coordinate);
            }
        }
        return Ok(());
    };

    let ranked = rank(origin, catalog.stores())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
    } else {
        for (i, entry) in ranked.iter().enumerate() {
            println!(
                "{:>2}. {} ({:.2} km): {}",
                i + 1,
                entry.store.name,
                entry.distance_km,
                entry.store.address
            );
        }
    }
    Ok(())
}

fn print_state(state: &LocationState, json: bool) {
    if json {
        match serde_json::to_string(state) {
            Ok(line) => println!("{line}"),
            Err(err) => tracing::error!(error = %err, "failed to encode location state"),
        }
    } else {
        println!("{}", status_lines(state).join(" | "));
    }
}

/// Feed stdin lines into a live tracker until EOF or ctrl-c.
///
/// On EOF every line already read is still resolved and printed before
/// returning. On ctrl-c the watch is cancelled at once.
pub(crate) async fn run_watch(
    config: &AppConfig,
    catalog: Arc<Catalog>,
    json: bool,
) -> anyhow::Result<()> {
    let feed = PositionFeed::new();
    let options = PositionOptions::from_app_config(config, true);
    let subscription = track(&feed.provider(), catalog, &options, move |state| {
        print_state(state, json);
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let interrupted = loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read stdin")? else {
                    break false;
                };
                input::feed_line(&feed, &line);
            }
            result = &mut ctrl_c => {
                result.context("failed to listen for ctrl-c")?;
                break true;
            }
        }
    };

    if interrupted {
        tracing::info!("interrupted; stopping watch");
        subscription.cancel();
    } else {
        // Closing the feed lets the tracker drain what was already pushed.
        drop(feed);
        subscription.wait().await;
    }
    Ok(())
}

pub(crate) async fn run_render(
    config: &AppConfig,
    catalog: &Catalog,
    origin: Coordinate,
    strategy: RouteStrategy,
    live: bool,
    out: Option<&Path>,
) -> anyhow::Result<()> {
    let display = DisplayConfig {
        route_strategy: strategy,
        ..DisplayConfig::from_app_config(config, live)
    };

    let state = locate(config, catalog, origin, live).await?;
    let snapshot = state
        .snapshot()
        .context("position resolved without a snapshot")?;

    let mut scene = build_scene(snapshot, catalog, &display);
    if display.route_strategy == RouteStrategy::RoutingService {
        let router = RoutingClient::from_app_config(config)
            .context("failed to build routing client")?;
        scene.apply_route_strategy(&display, Some(&router)).await;
    }

    let html = render_html(&scene, display.heading(), &status_lines(&state))?;
    match out {
        Some(path) => {
            tokio::fs::write(path, html)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), route = %strategy, "map written");
        }
        None => print!("{html}"),
    }
    Ok(())
}

pub(crate) fn run_link(
    config: &AppConfig,
    catalog: &Catalog,
    origin: Coordinate,
) -> anyhow::Result<()> {
    let nearest = resolve(origin, catalog.stores())?.context("catalog has no stores")?;
    println!(
        "{}",
        directions_url(
            &config.directions_base_url,
            origin,
            nearest.store.coordinate
        )
    );
    Ok(())
}
