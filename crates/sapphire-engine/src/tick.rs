//! The tick scheduler.
//!
//! One call to [`step`] advances the world by one discrete tick:
//!
//! 1. Snapshot every occupied cell in ascending `(row, column)` order.
//! 2. Record each piece's snapshot cell as its `previous_position`.
//! 3. Visit the snapshot's handles in order and run each piece's behavior
//!    exactly once. Pieces deleted before their turn are skipped; pieces
//!    created during the tick wait for the next one.
//!
//! Everything a piece's behavior triggers (moves, messages, crushes) finishes
//! before the next piece is visited. With the bottom row visited first, a
//! stacked column of fallers drops together.
//!
//! [`Simulation`] wraps a [`World`] with a tick counter and the last
//! [`TickReport`]; [`FrameClock`] turns a per-frame driver into ticks plus an
//! interpolation fraction.
//!
//! # Example
//!
//! ```
//! use sapphire_engine::prelude::*;
//!
//! let mut world = World::new();
//! world.add(Position::new(0, 0), EntityKind::Wall);
//! let stone = world.add(Position::new(3, 0), EntityKind::Stone).unwrap();
//!
//! let mut sim = Simulation::new(world, SimConfig::default());
//! sim.run_ticks(3);
//! assert_eq!(sim.world().position_of(stone), Some(Position::new(1, 0)));
//! ```

use std::collections::HashSet;
use std::time::{Duration, Instant};

use sapphire_grid::prelude::EntityId;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::behavior;
use crate::view::{digest, EntityView};
use crate::world::World;
use crate::EngineError;

// ---------------------------------------------------------------------------
// SimConfig
// ---------------------------------------------------------------------------

/// Timing for the tick loop and the frame clock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Seconds of wall time per tick. Must be positive and finite.
    pub fixed_dt: f64,
    /// Render frames per tick. Must be non-zero.
    pub frames_per_tick: u32,
}

impl Default for SimConfig {
    /// Ten frames at 60 Hz per tick.
    fn default() -> Self {
        Self {
            fixed_dt: 10.0 / 60.0,
            frames_per_tick: 10,
        }
    }
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.fixed_dt > 0.0 && self.fixed_dt.is_finite()) {
            return Err(EngineError::InvalidConfig(format!(
                "fixed_dt must be positive and finite, got {}",
                self.fixed_dt
            )));
        }
        if self.frames_per_tick == 0 {
            return Err(EngineError::InvalidConfig(
                "frames_per_tick must be non-zero".to_owned(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// TickReport
// ---------------------------------------------------------------------------

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// 1-based number of this tick (0 if no tick has run).
    pub tick: u64,
    /// Pieces whose behavior ran.
    pub ticked: usize,
    /// Snapshot entries whose piece was deleted before its turn.
    pub skipped: usize,
    pub moves: u32,
    pub crushes: u32,
    pub unbags: u32,
    /// Wall-clock time spent in the tick.
    pub elapsed: Duration,
}

// ---------------------------------------------------------------------------
// step
// ---------------------------------------------------------------------------

/// Advance `world` by one tick. `tick` is only used to label the report.
pub fn step(world: &mut World, tick: u64) -> TickReport {
    let start = Instant::now();
    world.take_tally();

    let snapshot = world.grid().snapshot();
    for &(cell, id) in &snapshot {
        if let Some(entity) = world.entity_mut(id) {
            entity.previous_position = cell;
        }
    }
    let order: Vec<EntityId> = snapshot.into_iter().map(|(_, id)| id).collect();

    let mut visited: HashSet<EntityId> = HashSet::with_capacity(order.len());
    let mut skipped = 0;
    for id in order {
        if !world.contains(id) {
            skipped += 1;
            continue;
        }
        if !visited.insert(id) {
            continue;
        }
        behavior::tick_entity(world, id);
    }

    let tally = world.take_tally();
    let report = TickReport {
        tick,
        ticked: visited.len(),
        skipped,
        moves: tally.moves,
        crushes: tally.crushes,
        unbags: tally.unbags,
        elapsed: start.elapsed(),
    };
    debug!(
        tick,
        ticked = report.ticked,
        skipped,
        moves = report.moves,
        crushes = report.crushes,
        unbags = report.unbags,
        "tick complete"
    );
    report
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// A world plus the bookkeeping of the tick loop driving it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    config: SimConfig,
    tick_counter: u64,
    last_report: TickReport,
}

impl Simulation {
    /// # Panics
    ///
    /// Panics if `config` fails [`SimConfig::validate`].
    pub fn new(world: World, config: SimConfig) -> Self {
        if let Err(e) = config.validate() {
            panic!("{e}");
        }
        Self {
            world,
            config,
            tick_counter: 0,
            last_report: TickReport::default(),
        }
    }

    /// Run one tick and return its report.
    pub fn tick(&mut self) -> TickReport {
        self.tick_counter += 1;
        self.last_report = step(&mut self.world, self.tick_counter);
        self.last_report
    }

    /// Run `count` ticks. Returns the total number of behavior runs.
    pub fn run_ticks(&mut self, count: u64) -> u64 {
        (0..count).map(|_| self.tick().ticked as u64).sum()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_counter
    }

    /// `tick_count * fixed_dt`, in seconds.
    pub fn sim_time(&self) -> f64 {
        self.tick_counter as f64 * self.config.fixed_dt
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn last_report(&self) -> &TickReport {
        &self.last_report
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access, for seeding and tests. Behaviors never need it.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn into_world(self) -> World {
        self.world
    }

    /// BLAKE3 digest of the world's views together with the tick counter.
    pub fn state_hash(&self) -> String {
        #[derive(Serialize)]
        struct Hashable<'a> {
            tick_counter: u64,
            views: &'a [EntityView],
        }
        let views = self.world.views();
        digest(&Hashable {
            tick_counter: self.tick_counter,
            views: &views,
        })
    }
}

// ---------------------------------------------------------------------------
// FrameClock
// ---------------------------------------------------------------------------

/// Runs one tick every `frames_per_tick` frames.
///
/// Between ticks, [`FrameClock::fraction`] says how far the renderer should
/// have interpolated from `previous_position` toward `position`.
#[derive(Debug, Clone)]
pub struct FrameClock {
    frames_per_tick: u32,
    frame: u32,
}

impl FrameClock {
    /// Create a clock at frame zero.
    ///
    /// # Panics
    ///
    /// Panics if `config` fails [`SimConfig::validate`], as [`Simulation::new`] does.
    pub fn new(config: &SimConfig) -> Self {
        if let Err(e) = config.validate() {
            panic!("{e}");
        }
        Self {
            frames_per_tick: config.frames_per_tick,
            frame: 0,
        }
    }

    /// Count one frame, ticking `sim` when a full tick's worth has passed.
    pub fn advance(&mut self, sim: &mut Simulation) -> Option<TickReport> {
        self.frame += 1;
        if self.frame < self.frames_per_tick {
            return None;
        }
        self.frame = 0;
        Some(sim.tick())
    }

    /// Interpolation fraction in `[0, 1)`.
    pub fn fraction(&self) -> f64 {
        self.frame as f64 / self.frames_per_tick as f64
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
