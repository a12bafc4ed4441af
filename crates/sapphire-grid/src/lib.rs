//! Sapphire Grid -- geometry, entity handles, and the sparse occupancy map.
//!
//! This crate holds the parts of the falling-block simulation that know
//! nothing about game rules: [`Position`](geometry::Position) and
//! [`Direction`](geometry::Direction), generational
//! [`EntityId`](entity::EntityId)s, and the [`Grid`](grid::Grid) that
//! guarantees at most one piece per cell.
//!
//! # Quick Start
//!
//! ```
//! use sapphire_grid::prelude::*;
//!
//! let mut ids = EntityAllocator::new();
//! let mut grid = Grid::new();
//!
//! let stone = ids.allocate();
//! assert!(grid.place(Position::new(3, 0), stone));
//!
//! let below = Position::new(3, 0).neighbor(Direction::Down);
//! grid.relocate(stone, below).unwrap();
//! assert_eq!(grid.get(below), Some(stone));
//! ```

#![deny(unsafe_code)]

pub mod entity;
pub mod geometry;
pub mod grid;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Rejected grid operations. Every variant is detected before any mutation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The destination cell already holds a piece.
    #[error("cell {position} is already occupied by {occupant}")]
    Occupied {
        position: geometry::Position,
        occupant: entity::EntityId,
    },

    /// Nothing occupies the cell.
    #[error("cell {position} is empty")]
    Vacant { position: geometry::Position },

    /// The handle is not on the grid (deleted, or never placed).
    #[error("entity {entity} is not on the grid")]
    StaleEntity { entity: entity::EntityId },
}

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::entity::{EntityAllocator, EntityId};
    pub use crate::geometry::{Direction, Position};
    pub use crate::grid::Grid;
    pub use crate::GridError;
}

// ---------------------------------------------------------------------------
// Integration Tests
// ---------------------------------------------------------------------------
