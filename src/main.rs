use std::path::PathBuf;

use clap::Parser;
use patrol_router::config::PipelineConfig;
use patrol_router::haversine::{HaversineDirections, HaversineMatrix};
use patrol_router::location::LocationSet;
use patrol_router::ors::OrsClient;
use patrol_router::pipeline::{GroupOutcome, PipelineReport, RoutePipeline};
use patrol_router::store::RouteStore;
use patrol_router::traits::{DirectionsProvider, DistanceMatrixProvider};
use tracing::{error, info, warn};

/// Compute patrol routes for every configured group.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON run configuration; every field is optional.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Location file (array of {name, latitude, longitude, group}).
    #[arg(short, long)]
    locations: Option<PathBuf>,

    /// Directory that receives FullRoutes/ and CondensedRoutes/.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Estimate travel times from straight-line distance instead of calling the routing service.
    #[arg(long)]
    offline: bool,

    /// Process groups one after another.
    #[arg(long)]
    sequential: bool,

    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    dotenvy::dotenv().ok();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(locations) = cli.locations {
        config.locations_path = locations;
    }
    if let Some(output) = cli.output {
        config.output_dir = output;
    }
    config.offline |= cli.offline;
    config.concurrent &= !cli.sequential;
    let config = config.with_env_api_key();

    let locations = LocationSet::from_json_file(&config.locations_path)?;
    info!(
        locations = locations.len(),
        groups = ?config.groups,
        offline = config.offline,
        "starting route finder"
    );

    let report = if config.offline {
        run(
            &config,
            &locations,
            HaversineMatrix::default(),
            HaversineDirections::default(),
        )?
    } else {
        if config.provider.api_key.is_none() {
            warn!("no API key configured, requests will likely be rejected");
        }
        let client = OrsClient::new(config.provider.clone())?;
        run(&config, &locations, &client, &client)?
    };

    for group in &report.groups {
        match &group.outcome {
            GroupOutcome::Success(route) => info!(
                group = group.group,
                stops = route.condensed.len(),
                unresolved = route.unresolved.len(),
                duration_secs = route.total_duration(),
                geometry_points = route.geometry.as_ref().map_or(0, |g| g.len()),
                "route written"
            ),
            GroupOutcome::Failure(err) => error!(group = group.group, error = %err, "route failed"),
        }
    }

    let failed = report.failed().count();
    if failed > 0 {
        anyhow::bail!("{} of {} groups failed", failed, report.groups.len());
    }

    Ok(())
}

fn run<M, D>(
    config: &PipelineConfig,
    locations: &LocationSet,
    matrix_provider: M,
    directions: D,
) -> Result<PipelineReport, anyhow::Error>
where
    M: DistanceMatrixProvider + Sync,
    D: DirectionsProvider + Sync,
{
    let pipeline = RoutePipeline::new(
        locations,
        matrix_provider,
        directions,
        RouteStore::new(&config.output_dir),
        config.pipeline_options(),
    )?;
    Ok(pipeline.run())
}
