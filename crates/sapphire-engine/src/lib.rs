//! Sapphire Engine -- falling-block puzzle physics on a sparse grid.
//!
//! Builds on [`sapphire_grid`] to run a Boulder Dash style simulation:
//! stones, gems, bags, and earth occupy cells and interact once per tick
//! through gravity, crushing, and adjacency rules.
//!
//! - [`entity`] -- the closed set of piece kinds and their state.
//! - [`world`] -- the [`World`](world::World): grid + arena, add / move /
//!   delete / try_move.
//! - [`message`] -- collision messages and the per-kind handler table.
//! - [`behavior`] -- falling, crushing, unbagging, earth adjacency.
//! - [`tick`] -- the deterministic scheduler and the [`Simulation`](tick::Simulation)
//!   loop around it.
//! - [`view`] / [`observer`] -- what the renderer polls and is told.
//! - [`level`] -- a seeded demo level.
//!
//! # Quick Start
//!
//! ```
//! use sapphire_engine::prelude::*;
//!
//! let mut world = World::new();
//! world.add(Position::new(0, 0), EntityKind::Wall);
//! world.add(Position::new(1, 0), EntityKind::Sapphire);
//! let stone = world.add(Position::new(3, 0), EntityKind::Stone).unwrap();
//!
//! let mut sim = Simulation::new(world, SimConfig::default());
//! sim.run_ticks(2);
//!
//! // The stone fell a cell, then crushed the sapphire and took its place.
//! assert_eq!(sim.world().position_of(stone), Some(Position::new(1, 0)));
//! assert_eq!(sim.world().len(), 2);
//! ```

#![deny(unsafe_code)]

pub mod behavior;
pub mod entity;
pub mod level;
pub mod message;
pub mod observer;
pub mod tick;
pub mod view;
pub mod world;

/// Re-export the grid crate for convenience.
pub use sapphire_grid;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors from loading engine configuration.
///
/// Simulation itself has no error surface: collisions are booleans and grid
/// invariant violations panic.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("malformed configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use sapphire_grid::prelude::*;

    pub use crate::behavior::earth::adjacency_at;
    pub use crate::entity::{Body, Capabilities, EarthMask, Entity, EntityKind, FallState};
    pub use crate::level::{seed_demo_level, LevelConfig};
    pub use crate::message::{Message, MovedToHandler};
    pub use crate::observer::WorldObserver;
    pub use crate::tick::{step, FrameClock, SimConfig, Simulation, TickReport};
    pub use crate::view::EntityView;
    pub use crate::world::World;
    pub use crate::EngineError;
}
