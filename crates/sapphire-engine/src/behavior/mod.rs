//! Per-kind tick behaviors and collision handlers.
//!
//! - [`falling`] -- gravity, landing, and sliding off rounded pieces.
//! - [`crush`] -- what sapphires and bags do when a falling stone hits them.
//! - [`earth`] -- the adjacency mask earth keeps for its sprite.

pub mod crush;
pub mod earth;
pub mod falling;

use sapphire_grid::prelude::EntityId;

use crate::entity::{Body, EntityKind};
use crate::world::World;

/// Run one tick of `id`'s behavior. Does nothing if `id` is gone.
pub(crate) fn tick_entity(world: &mut World, id: EntityId) {
    let Some(kind) = world.entity(id).map(|e| e.kind()) else {
        return;
    };

    // The burst cue lasts exactly one tick.
    if kind == EntityKind::Emerald {
        if let Some(Body::Emerald { unbagging, .. }) = world.entity_mut(id).map(|e| &mut e.body) {
            *unbagging = false;
        }
    }

    if kind.has_earth_join_behavior() {
        earth::tick(world, id);
    }
    if kind.has_falling_behavior() {
        falling::tick(world, id);
    }
}
