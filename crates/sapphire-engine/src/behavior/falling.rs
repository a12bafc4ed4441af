//! Gravity.
//!
//! Each tick a faller tries to drop one cell. If it cannot:
//!
//! - a piece that fell last tick lands and does nothing else this tick;
//! - a piece already at rest on a non-flat piece slides left, or failing
//!   that right, provided both the side cell and the cell below it are empty.

use sapphire_grid::prelude::{Direction, EntityId};
use tracing::trace;

use crate::entity::FallState;
use crate::world::World;

/// Lateral slide precedence.
const SLIDE_ORDER: [Direction; 2] = [Direction::Left, Direction::Right];

pub(crate) fn tick(world: &mut World, id: EntityId) {
    if world.try_move(id, Direction::Down) {
        set_fall_state(world, id, FallState::Falling);
        return;
    }

    let Some(state) = world.entity(id).and_then(|e| e.fall_state()) else {
        return;
    };
    if state.is_falling() {
        trace!(entity = %id, "landed");
        set_fall_state(world, id, FallState::Resting);
        return;
    }

    slide(world, id);
}

fn slide(world: &mut World, id: EntityId) {
    let Some(here) = world.position_of(id) else {
        return;
    };
    let on_rounded = world
        .get(here.down())
        .is_some_and(|below| !below.capabilities().is_flat);
    if !on_rounded {
        return;
    }

    for direction in SLIDE_ORDER {
        let side = here.neighbor(direction);
        if world.is_vacant(side) && world.is_vacant(side.down()) && world.try_move(id, direction) {
            trace!(entity = %id, %direction, "slid off rounded piece");
            break;
        }
    }
}

fn set_fall_state(world: &mut World, id: EntityId, state: FallState) {
    if let Some(fall) = world.entity_mut(id).and_then(|e| e.body.fall_state_mut()) {
        *fall = state;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
