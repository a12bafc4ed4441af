//! Seeded demo level.
//!
//! Lays out a wall floor, scatters earth, and stacks a column of random
//! stones, bags, and sapphires above the floor. Placement is best-effort:
//! pieces that land on an occupied cell are dropped. The same
//! [`LevelConfig`] always produces the same level.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use sapphire_grid::prelude::Position;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::entity::EntityKind;
use crate::world::World;
use crate::EngineError;

/// Shape of the demo level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    pub seed: u64,
    /// Row the wall floor sits on.
    pub floor_row: i32,
    /// Leftmost floor column.
    pub floor_start_column: i32,
    pub floor_width: u32,
    /// Earth pieces to attempt. Each lands at a random cell in
    /// `[0, earth_max_row] x [0, earth_max_column]`.
    pub earth_count: u32,
    pub earth_max_row: i32,
    pub earth_max_column: i32,
    /// Bottom cell of the falling column.
    pub column_base: Position,
    pub column_height: u32,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            floor_row: 0,
            floor_start_column: -20,
            floor_width: 40,
            earth_count: 30,
            earth_max_row: 20,
            earth_max_column: 20,
            column_base: Position::new(6, 8),
            column_height: 30,
        }
    }
}

impl LevelConfig {
    /// Reject negative scatter bounds and floor or column spans that would
    /// run past the `i32` coordinate range.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.earth_max_row < 0 || self.earth_max_column < 0 {
            return Err(EngineError::InvalidConfig(format!(
                "earth scatter bounds must be non-negative, got ({}, {})",
                self.earth_max_row, self.earth_max_column
            )));
        }
        check_span("floor", self.floor_start_column, self.floor_width)?;
        check_span("column", self.column_base.row, self.column_height)?;
        Ok(())
    }

    /// Parse and validate a JSON level description. Missing fields take
    /// defaults.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

/// `len` cells starting at `start` must all have an `i32` coordinate.
fn check_span(what: &str, start: i32, len: u32) -> Result<(), EngineError> {
    let Some(last_offset) = len.checked_sub(1) else {
        return Ok(());
    };
    i32::try_from(last_offset)
        .ok()
        .and_then(|offset| start.checked_add(offset))
        .map(|_| ())
        .ok_or_else(|| {
            EngineError::InvalidConfig(format!(
                "{what} of {len} cells starting at {start} leaves the i32 coordinate range"
            ))
        })
}

/// Column pieces are drawn uniformly from these.
const COLUMN_KINDS: [EntityKind; 3] = [EntityKind::Stone, EntityKind::Bag, EntityKind::Sapphire];

/// Populate `world` from `config`. Returns how many pieces were placed.
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfig`] without touching `world` if
/// `config` fails [`LevelConfig::validate`].
pub fn seed_demo_level(world: &mut World, config: &LevelConfig) -> Result<usize, EngineError> {
    config.validate()?;
    let mut rng = Pcg64::seed_from_u64(config.seed);
    let before = world.len();

    for i in 0..config.floor_width {
        let column = config.floor_start_column + i as i32;
        world.add(Position::new(config.floor_row, column), EntityKind::Wall);
    }

    for _ in 0..config.earth_count {
        let row = rng.gen_range(0..=config.earth_max_row.max(0));
        let column = rng.gen_range(0..=config.earth_max_column.max(0));
        world.add(Position::new(row, column), EntityKind::Earth);
    }

    for i in 0..config.column_height {
        let kind = COLUMN_KINDS[rng.gen_range(0..COLUMN_KINDS.len())];
        let cell = Position::new(config.column_base.row + i as i32, config.column_base.column);
        world.add(cell, kind);
    }

    let placed = world.len() - before;
    info!(seed = config.seed, placed, "demo level seeded");
    Ok(placed)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
