//! Collision messages and their per-kind handlers.
//!
//! When a piece tries to step into an occupied cell, the occupant is sent a
//! [`Message::MovedTo`] and decides whether the mover may proceed. Kinds opt
//! in through [`EntityKind::moved_to_handler`]; a kind without a handler
//! leaves the message unanswered, which the mover treats as blocked.

use sapphire_grid::prelude::{Direction, EntityId};

use crate::behavior;
use crate::entity::EntityKind;
use crate::world::World;

/// Events one piece can deliver to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// `mover` is trying to step into the recipient's cell going `direction`.
    MovedTo { mover: EntityId, direction: Direction },
}

/// Answer to [`Message::MovedTo`]: `true` if the mover may take the cell.
///
/// A handler that answers `true` must have vacated the cell.
pub type MovedToHandler =
    fn(world: &mut World, recipient: EntityId, mover: EntityId, direction: Direction) -> bool;

impl EntityKind {
    /// Handler table for [`Message::MovedTo`].
    pub fn moved_to_handler(self) -> Option<MovedToHandler> {
        match self {
            EntityKind::Sapphire => Some(behavior::crush::crushable_moved_to),
            EntityKind::Bag => Some(behavior::crush::bag_moved_to),
            EntityKind::Wall
            | EntityKind::Stone
            | EntityKind::Emerald
            | EntityKind::Earth
            | EntityKind::Player => None,
        }
    }
}

impl World {
    /// Deliver `message` to `recipient`.
    ///
    /// Returns `None` if the recipient is gone or its kind has no handler
    /// for the message; that is not an error.
    pub fn send(&mut self, recipient: EntityId, message: Message) -> Option<bool> {
        let kind = self.entity(recipient)?.kind();
        match message {
            Message::MovedTo { mover, direction } => {
                let handler = kind.moved_to_handler()?;
                Some(handler(self, recipient, mover, direction))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
