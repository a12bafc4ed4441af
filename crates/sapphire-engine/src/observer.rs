//! Lifecycle hook for whatever draws the world.
//!
//! The world calls an installed [`WorldObserver`] whenever a piece appears or
//! disappears, so a renderer can attach or release its visual. Nothing else
//! is pushed: positions, fall state, and masks are polled between ticks
//! (see [`crate::view`]).

use crate::entity::Entity;

/// Notified when pieces enter or leave the world.
pub trait WorldObserver {
    /// `entity` has just been placed.
    fn entity_added(&mut self, _entity: &Entity) {}

    /// `entity` has just been removed. It is no longer reachable through the
    /// world.
    fn entity_deleted(&mut self, _entity: &Entity) {}
}
