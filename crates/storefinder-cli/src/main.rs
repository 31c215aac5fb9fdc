mod commands;
mod input;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use storefinder_core::{Catalog, Coordinate, RouteStrategy};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "storefinder")]
#[command(about = "Find the nearest store to a position")]
struct Cli {
    /// Store catalog YAML file; overrides `STOREFINDER_CATALOG_PATH`.
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Args)]
struct PointArgs {
    /// Latitude in decimal degrees.
    #[arg(long, allow_negative_numbers = true)]
    lat: f64,
    /// Longitude in decimal degrees.
    #[arg(long, allow_negative_numbers = true)]
    lng: f64,
}

impl PointArgs {
    fn coordinate(self) -> anyhow::Result<Coordinate> {
        Ok(Coordinate::new(self.lat, self.lng)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RouteArg {
    Straight,
    Service,
}

impl From<RouteArg> for RouteStrategy {
    fn from(arg: RouteArg) -> Self {
        match arg {
            RouteArg::Straight => RouteStrategy::StraightLine,
            RouteArg::Service => RouteStrategy::RoutingService,
        }
    }
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Resolve the nearest store for one position.
    Nearest {
        #[command(flatten)]
        point: PointArgs,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the store catalog.
    Stores {
        /// Rank the stores by distance from this latitude (requires --lng).
        #[arg(long, requires = "lng", allow_negative_numbers = true)]
        lat: Option<f64>,
        #[arg(long, requires = "lat", allow_negative_numbers = true)]
        lng: Option<f64>,
        #[arg(long)]
        json: bool,
    },
    /// Track `lat,lng` lines from stdin and print each new state.
    Watch {
        /// Print each state as a JSON line.
        #[arg(long)]
        json: bool,
    },
    /// Write a standalone HTML map for one position.
    Render {
        #[command(flatten)]
        point: PointArgs,
        /// Output file; stdout when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
        /// Route strategy; defaults to `STOREFINDER_ROUTE_STRATEGY`.
        #[arg(long, value_enum)]
        route: Option<RouteArg>,
        /// Label the map as a live view.
        #[arg(long)]
        live: bool,
    },
    /// Print a directions link to the nearest store.
    Link {
        #[command(flatten)]
        point: PointArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = storefinder_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let catalog = Arc::new(load_catalog(
        cli.catalog.as_deref(),
        config.catalog_path.as_deref(),
    )?);
    tracing::debug!(stores = catalog.len(), env = %config.env, "catalog loaded");

    match cli.command {
        Commands::Nearest { point, json } => {
            commands::run_nearest(&config, &catalog, point.coordinate()?, json).await?;
        }
        Commands::Stores { lat, lng, json } => {
            let origin = match (lat, lng) {
                (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)?),
                _ => None,
            };
            commands::run_stores(&catalog, origin, json)?;
        }
        Commands::Watch { json } => commands::run_watch(&config, catalog, json).await?,
        Commands::Render {
            point,
            out,
            route,
            live,
        } => {
            let strategy = route.map_or(config.route_strategy, RouteStrategy::from);
            commands::run_render(
                &config,
                &catalog,
                point.coordinate()?,
                strategy,
                live,
                out.as_deref(),
            )
            .await?;
        }
        Commands::Link { point } => commands::run_link(&config, &catalog, point.coordinate()?)?,
    }

    Ok(())
}

/// `--catalog` wins over `STOREFINDER_CATALOG_PATH`; with neither, the
/// built-in catalog is used.
fn load_catalog(flag: Option<&Path>, configured: Option<&Path>) -> anyhow::Result<Catalog> {
    let catalog = match flag.or(configured) {
        Some(path) => storefinder_core::load_catalog(path)?,
        None => Catalog::builtin()?,
    };
    Ok(catalog)
}
