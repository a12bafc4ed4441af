//! Collision handlers for pieces that react to a falling stone.
//!
//! Both handlers share the same trigger: the mover is a crusher that fell on
//! the previous tick. A sapphire is destroyed and the stone takes its cell;
//! a bag bursts into an emerald in place and the stone stays where it is.

use sapphire_grid::prelude::{Direction, EntityId};
use tracing::trace;

use crate::entity::Body;
use crate::world::World;

/// Handler for crushable kinds.
pub(crate) fn crushable_moved_to(
    world: &mut World,
    recipient: EntityId,
    mover: EntityId,
    _direction: Direction,
) -> bool {
    if !world.is_crushing(mover) {
        return false;
    }
    let Some(cell) = world.position_of(recipient) else {
        return false;
    };
    world.delete(cell);
    world.tally.crushes += 1;
    trace!(%mover, crushed = %recipient, %cell, "crushed");
    true
}

/// Handler for bags. Always blocks the mover.
pub(crate) fn bag_moved_to(
    world: &mut World,
    recipient: EntityId,
    mover: EntityId,
    _direction: Direction,
) -> bool {
    if !world.is_crushing(mover) {
        return false;
    }
    let Some(cell) = world.position_of(recipient) else {
        return false;
    };
    world.delete(cell);
    let emerald = world.add(cell, Body::unbagged_emerald());
    world.tally.unbags += 1;
    trace!(%mover, bag = %recipient, ?emerald, %cell, "bag burst");
    false
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
