use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use traffic_sim::simulation::{HubId, SimConfig, SimWorld};

#[derive(Parser)]
#[command(name = "traffic_sim")]
#[command(about = "Headless traffic simulation over a rectangle map")]
struct Cli {
    /// Map document written by the map editor
    #[arg(default_value = "maps/demo.json")]
    map: PathBuf,

    /// Number of simulation ticks to run
    #[arg(long, default_value = "1000")]
    ticks: u32,

    /// Time delta per tick in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    delta: f32,

    /// Seed the random number generator for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Only spawn the cars requested with --spawn
    #[arg(long)]
    no_auto_spawn: bool,

    /// Spawn a car between two hubs on the first tick, as FROM:TO
    #[arg(long = "spawn", value_parser = parse_spawn)]
    spawns: Vec<(HubId, HubId)>,

    /// Print the map and state every simulated second
    #[arg(long)]
    map_view: bool,
}

fn parse_spawn(value: &str) -> Result<(HubId, HubId), String> {
    let (from, to) = value
        .split_once(':')
        .ok_or_else(|| format!("expected FROM:TO, got '{}'", value))?;
    let from = from
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid hub id '{}': {}", from, e))?;
    let to = to
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid hub id '{}': {}", to, e))?;
    Ok((HubId(from), HubId(to)))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,traffic_sim=info"),
    )
    .init();

    let cli = Cli::parse();
    run_headless(&cli)
}

/// Run the simulation in headless mode (no graphics)
fn run_headless(cli: &Cli) -> Result<()> {
    anyhow::ensure!(
        cli.delta.is_finite() && cli.delta > 0.0,
        "--delta must be a positive number of seconds"
    );

    let config = SimConfig {
        auto_spawn: !cli.no_auto_spawn,
        seed: cli.seed,
        ..SimConfig::default()
    };
    let mut world = SimWorld::from_path(&cli.map, config)
        .with_context(|| format!("failed to load map {}", cli.map.display()))?;

    info!(
        "Running {} ticks of {:.4}s on {}",
        cli.ticks,
        cli.delta,
        cli.map.display()
    );

    for &(from, to) in &cli.spawns {
        world.request_spawn(from, to);
    }

    // Calculate how many ticks equal 1 second of simulation time
    let ticks_per_second = (1.0 / cli.delta).ceil().max(1.0) as u32;

    if cli.map_view {
        world.print_summary();
        world.draw_map(10.0);
    }

    for tick in 1..=cli.ticks {
        world.tick(cli.delta).context("simulation tick failed")?;

        if cli.map_view && tick % ticks_per_second == 0 {
            println!("--- After tick {} ({:.1}s simulated time) ---", tick, world.time);
            world.print_summary();
            world.draw_map(10.0);
        }
    }

    log_stats(&world);
    Ok(())
}

/// Log final statistics
fn log_stats(world: &SimWorld) {
    let stats = &world.stats;
    info!("=== SIMULATION COMPLETE ===");
    info!("Simulated time: {:.2}s", stats.elapsed_time);
    info!("Total cars spawned: {}", stats.total_cars_spawned);
    info!("Total cars completed: {}", stats.total_cars_completed);
    info!("Rejected spawns: {}", stats.rejected_spawns);
    info!("Active cars: {}", world.cars.len());
    info!("Total nodes: {}", world.road_network.node_count());
    info!("Total edges: {}", world.road_network.edge_count());
    info!("Success rate: {:.1}%", stats.success_rate());
}
