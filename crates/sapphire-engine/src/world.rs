//! The [`World`]: grid occupancy plus the arena of live pieces.
//!
//! The world owns every [`Entity`] and is the only place pieces are created,
//! moved, or destroyed. It keeps three things in lock-step: the
//! [`Grid`](sapphire_grid::grid::Grid) (cell -> handle), the entity arena
//! (handle -> piece), and the handle allocator.
//!
//! # Failure modes
//!
//! - [`World::add`] onto an occupied cell is ignored (best-effort placement
//!   for level seeding).
//! - [`World::move_entity`] into an occupied cell and [`World::delete`] of an
//!   empty cell are bugs in a behavior and panic.
//! - A blocked [`World::try_move`] is an ordinary `false`.

use std::collections::HashMap;
use std::fmt;

use sapphire_grid::prelude::{Direction, EntityAllocator, EntityId, Grid, Position};

use crate::entity::{Body, Entity};
use crate::message::Message;
use crate::observer::WorldObserver;

// ---------------------------------------------------------------------------
// TickTally
// ---------------------------------------------------------------------------

/// Event counts accumulated while behaviors run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TickTally {
    pub moves: u32,
    pub crushes: u32,
    pub unbags: u32,
}

// ---------------------------------------------------------------------------
// World
// ---------------------------------------------------------------------------

/// All pieces in play and the cells they occupy.
#[derive(Default)]
pub struct World {
    grid: Grid,
    ids: EntityAllocator,
    entities: HashMap<EntityId, Entity>,
    observer: Option<Box<dyn WorldObserver>>,
    pub(crate) tally: TickTally,
}

impl World {
    /// An empty world with no observer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the lifecycle observer, returning the previous one.
    pub fn set_observer(
        &mut self,
        observer: Box<dyn WorldObserver>,
    ) -> Option<Box<dyn WorldObserver>> {
        self.observer.replace(observer)
    }

    pub fn clear_observer(&mut self) -> Option<Box<dyn WorldObserver>> {
        self.observer.take()
    }

    // -- lifecycle ----------------------------------------------------------

    /// Place a new piece at `position` if the cell is empty.
    ///
    /// Returns the new handle, or `None` if the cell was occupied (nothing is
    /// created in that case). Both `position` and `previous_position` start
    /// at `position`.
    pub fn add(&mut self, position: Position, body: impl Into<Body>) -> Option<EntityId> {
        if !self.grid.is_vacant(position) {
            tracing::debug!(%position, "add ignored: cell occupied");
            return None;
        }
        let id = self.ids.allocate();
        self.grid.place(position, id);
        self.entities
            .insert(id, Entity::new(id, position, body.into()));

        if let Some(observer) = self.observer.as_deref_mut() {
            observer.entity_added(&self.entities[&id]);
        }
        Some(id)
    }

    /// Move `entity` to `to`. `previous_position` is left alone.
    ///
    /// # Panics
    ///
    /// Panics if `to` is occupied or `entity` is not in the world. Callers
    /// inside the simulation go through [`World::try_move`], which checks
    /// first.
    pub fn move_entity(&mut self, entity: EntityId, to: Position) {
        if let Err(e) = self.grid.relocate(entity, to) {
            panic!("move_entity({entity}, {to}) violates grid invariant: {e}");
        }
        if let Some(piece) = self.entities.get_mut(&entity) {
            piece.position = to;
        }
        self.tally.moves += 1;
    }

    /// Remove the piece at `position` and hand it back.
    ///
    /// The returned value is detached: its handle is stale and the world no
    /// longer knows about it.
    ///
    /// # Panics
    ///
    /// Panics if `position` is empty.
    pub fn delete(&mut self, position: Position) -> Entity {
        let id = match self.grid.remove(position) {
            Ok(id) => id,
            Err(e) => panic!("delete({position}) violates grid invariant: {e}"),
        };
        self.ids.release(id);
        let Some(entity) = self.entities.remove(&id) else {
            panic!("grid held {id} at {position} but the arena did not");
        };
        if let Some(observer) = self.observer.as_deref_mut() {
            observer.entity_deleted(&entity);
        }
        entity
    }

    /// Try to step `entity` one cell in `direction`.
    ///
    /// An empty target is taken immediately. An occupied target gets a
    /// [`Message::MovedTo`]; the occupant's answer decides, and no answer
    /// means blocked. Returns whether the move happened.
    pub fn try_move(&mut self, entity: EntityId, direction: Direction) -> bool {
        let Some(from) = self.position_of(entity) else {
            return false;
        };
        let target = from.neighbor(direction);
        let proceed = match self.grid.get(target) {
            None => true,
            Some(occupant) => self
                .send(
                    occupant,
                    Message::MovedTo {
                        mover: entity,
                        direction,
                    },
                )
                .unwrap_or(false),
        };
        if proceed {
            self.move_entity(entity, target);
        }
        proceed
    }

    // -- queries ------------------------------------------------------------

    /// The piece at `position`, if any.
    pub fn get(&self, position: Position) -> Option<&Entity> {
        self.grid.get(position).and_then(|id| self.entities.get(&id))
    }

    /// The piece behind `id`, or `None` if the handle is stale.
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub(crate) fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// `true` if `id` names a live piece.
    pub fn contains(&self, id: EntityId) -> bool {
        self.ids.is_live(id)
    }

    /// Where the piece behind `id` sits, if it is live.
    pub fn position_of(&self, id: EntityId) -> Option<Position> {
        self.grid.position_of(id)
    }

    /// `true` if no piece occupies `position`.
    #[inline]
    pub fn is_vacant(&self, position: Position) -> bool {
        self.grid.is_vacant(position)
    }

    /// `true` if `mover` is a crusher that fell on the previous tick.
    pub fn is_crushing(&self, mover: EntityId) -> bool {
        self.entity(mover)
            .is_some_and(|e| e.capabilities().is_crusher && e.is_falling())
    }

    /// Read-only access to the occupancy grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of live pieces.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// `true` if no pieces are live.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Live pieces in ascending `(row, column)` order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.grid.iter().filter_map(|(_, id)| self.entities.get(&id))
    }

    /// Grid, arena, and allocator all describe the same set of pieces, and
    /// every piece's recorded position matches its cell.
    pub fn is_consistent(&self) -> bool {
        self.grid.is_consistent()
            && self.grid.len() == self.entities.len()
            && self.ids.live_count() == self.entities.len()
            && self.grid.iter().all(|(p, id)| {
                self.entities
                    .get(&id)
                    .is_some_and(|e| e.id == id && e.position == p)
            })
    }

    pub(crate) fn take_tally(&mut self) -> TickTally {
        std::mem::take(&mut self.tally)
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.entities.len())
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
