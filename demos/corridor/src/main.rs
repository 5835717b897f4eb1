//! corridor — two partitions joined by a portal.
//!
//! Partition 1 holds region `E0S0`, a one-tile-wide corridor along row 10.
//! A hauler walks east towards the portal at the corridor's end while a
//! filler walks west against it; the filler steps aside when they meet.
//! The hauler then hands off into partition 2 (`E1S0`) and carries on to the
//! middle of that region.
//!
//! ```text
//! cargo run -p corridor -- [config.json]
//! RUST_LOG=shardwalk=debug cargo run -p corridor
//! ```
//!
//! The optional argument is a JSON `SimConfig`; missing fields take their
//! defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sw_agent::AgentRecord;
use sw_core::{AgentId, PartitionId, RegionId, Role, SimConfig, Tick, TilePos};
use sw_handoff::ShardBus;
use sw_output::{CsvWriter, StepOutputObserver};
use sw_sim::{Order, Partition, PartitionBuilder, StepObserver};
use sw_spatial::{GridRouter, PortalTarget, RegionMap, RegionMapBuilder, Terrain, WorldMap};

// ── Constants ─────────────────────────────────────────────────────────────────

const WEST_ID: PartitionId = PartitionId(1);
const EAST_ID: PartitionId = PartitionId(2);

const WEST: RegionId = RegionId::new(0, 0);
const EAST: RegionId = RegionId::new(1, 0);

const PORTAL: TilePos = TilePos { region: WEST, x: 49, y: 10 };
const EXIT:   TilePos = TilePos { region: EAST, x: 0, y: 10 };

const HAULER: AgentId = AgentId(1);
const FILLER: AgentId = AgentId(2);

const DEFAULT_TICKS:        u64 = 80;
const DEFAULT_OUTPUT_TICKS: u64 = 10;

// ── World ─────────────────────────────────────────────────────────────────────

fn west_world() -> Result<WorldMap> {
    let corridor = RegionMapBuilder::new(WEST)
        .fill(0, 9, 49, 9, Terrain::Wall)
        .fill(0, 11, 49, 11, Terrain::Wall)
        .fill(30, 10, 33, 10, Terrain::Swamp)
        .build();
    let mut world = WorldMap::new().with_region(corridor)?;
    world.add_portal(PORTAL, PortalTarget { partition: EAST_ID, exit: EXIT })?;
    Ok(world)
}

fn east_world() -> Result<WorldMap> {
    Ok(WorldMap::new().with_region(RegionMap::plain(EAST))?)
}

fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig {
            total_ticks:           DEFAULT_TICKS,
            output_interval_ticks: DEFAULT_OUTPUT_TICKS,
            ..SimConfig::default()
        });
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: SimConfig = serde_json::from_str(&text)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}

// ── Orders ────────────────────────────────────────────────────────────────────

fn west_orders(p: &Partition<GridRouter>) -> impl FnMut(Tick, &AgentRecord) -> Order + use<> {
    let options = p.default_options().with_range(0);
    move |_, record| {
        let destination = match record.id {
            HAULER => PORTAL,
            FILLER => TilePos::new(WEST, 2, 10),
            _ => return Order::Hold,
        };
        Order::MoveTo { destination, options: options.clone() }
    }
}

fn east_orders(p: &Partition<GridRouter>) -> impl FnMut(Tick, &AgentRecord) -> Order + use<> {
    let options = p.default_options();
    move |_, _| Order::MoveTo { destination: TilePos::new(EAST, 25, 25), options: options.clone() }
}

fn output_observer(dir: &Path) -> Result<StepOutputObserver<CsvWriter>> {
    let writer = CsvWriter::new(dir).with_context(|| format!("opening output in {}", dir.display()))?;
    Ok(StepOutputObserver::new(writer))
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = load_config(config_path.as_deref())?;
    info!(
        ticks = config.total_ticks,
        output_interval = config.output_interval_ticks,
        "corridor.start"
    );

    let mut west = PartitionBuilder::new(WEST_ID, config.clone(), west_world()?, GridRouter)
        .agent(AgentRecord::new(HAULER, Role::Hauler, TilePos::new(WEST, 5, 10)).carrying(true))
        .agent(AgentRecord::new(FILLER, Role::Filler, TilePos::new(WEST, 20, 10)))
        .build()?;
    let mut east = PartitionBuilder::new(EAST_ID, config.clone(), east_world()?, GridRouter).build()?;

    let out_dir = Path::new("output/corridor");
    let mut west_obs = output_observer(&out_dir.join("p1"))?;
    let mut east_obs = output_observer(&out_dir.join("p2"))?;

    let mut west_ctl = west_orders(&west);
    let mut east_ctl = east_orders(&east);
    let mut bus = ShardBus::new();

    let t0 = Instant::now();
    let mut tally: BTreeMap<&'static str, usize> = BTreeMap::new();
    while west.tick() < config.end_tick() {
        let west_report = west.run_step(&mut bus, &mut west_ctl, &mut west_obs)?;
        let east_report = east.run_step(&mut bus, &mut east_ctl, &mut east_obs)?;
        for (_, outcome) in west_report.outcomes.iter().chain(&east_report.outcomes) {
            *tally.entry(outcome.as_str()).or_default() += 1;
        }
    }
    west_obs.on_run_end(WEST_ID, west.tick());
    east_obs.on_run_end(EAST_ID, east.tick());

    for (id, obs) in [(WEST_ID, &mut west_obs), (EAST_ID, &mut east_obs)] {
        if let Some(e) = obs.take_error() {
            eprintln!("output error in {id}: {e}");
        }
    }

    println!("Simulation complete in {:.3} s", t0.elapsed().as_secs_f64());
    for (outcome, count) in &tally {
        println!("  {outcome:<20}: {count}");
    }
    println!(
        "  {:<20}: {} entries, {} hits, {} misses",
        "route cache (p1)",
        west.engine.routes.len(),
        west.engine.routes.hits(),
        west.engine.routes.misses()
    );
    println!();

    println!("{:<12} {:<12} {:<16}", "Agent", "Partition", "Position");
    println!("{}", "-".repeat(40));
    for p in [&west, &east] {
        for record in p.agents.iter() {
            println!("{:<12} {:<12} {:<16}", record.id.0, p.id.0, record.position.to_string());
        }
    }

    Ok(())
}
