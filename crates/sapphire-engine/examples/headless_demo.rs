//! Headless demo -- seed the demo level, drive it frame by frame, and print
//! the grid as text.
//!
//! Run with:
//!   cargo run --example headless_demo -p sapphire-engine -- [ticks] [seed]
//!
//! Set `RUST_LOG=sapphire_engine=debug` to see per-tick summaries.

use anyhow::Context;
use sapphire_engine::prelude::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let ticks: u64 = match args.next() {
        Some(arg) => arg.parse().context("ticks must be a non-negative integer")?,
        None => 60,
    };
    let seed: u64 = match args.next() {
        Some(arg) => arg.parse().context("seed must be a non-negative integer")?,
        None => 0,
    };

    let level = LevelConfig {
        seed,
        ..Default::default()
    };
    let config = SimConfig::default();

    let mut world = World::new();
    let placed = seed_demo_level(&mut world, &level)?;
    println!("seeded {placed} pieces (seed {seed})\n{}", world.render_ascii());

    let mut sim = Simulation::new(world, config.clone());
    let mut clock = FrameClock::new(&config);
    let mut totals = TickReport::default();
    while sim.tick_count() < ticks {
        if let Some(report) = clock.advance(&mut sim) {
            totals.moves += report.moves;
            totals.crushes += report.crushes;
            totals.unbags += report.unbags;
        }
    }

    println!("{}", sim.world().render_ascii());
    println!(
        "{} ticks ({:.1}s simulated): {} moves, {} crushes, {} bags burst, {} pieces left",
        sim.tick_count(),
        sim.sim_time(),
        totals.moves,
        totals.crushes,
        totals.unbags,
        sim.world().len()
    );
    println!("state hash {}", sim.state_hash());
    Ok(())
}
