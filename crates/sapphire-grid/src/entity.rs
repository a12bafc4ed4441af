//! Stable handles for game pieces.
//!
//! Every piece placed on the grid is addressed by an [`EntityId`]: a slot
//! index plus a generation counter. Deleting a piece bumps the generation of
//! its slot, so a handle kept past the delete never resolves to whatever
//! piece reuses the slot later.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

// ---------------------------------------------------------------------------
// EntityId
// ---------------------------------------------------------------------------

/// Generational handle: `[generation: u32 | slot: u32]`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Pack a slot index and generation into a handle.
    #[inline]
    pub fn new(slot: u32, generation: u32) -> Self {
        Self((generation as u64) << 32 | slot as u64)
    }

    /// Arena slot this handle points at.
    #[inline]
    pub fn slot(self) -> u32 {
        self.0 as u32
    }

    /// Generation of the slot at the time this handle was issued.
    #[inline]
    pub fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// The packed `u64` form, generation in the high bits.
    #[inline]
    pub fn to_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}v{})", self.slot(), self.generation())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.slot(), self.generation())
    }
}

// ---------------------------------------------------------------------------
// EntityAllocator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
struct SlotState {
    generation: u32,
    live: bool,
}

/// Hands out [`EntityId`]s and tracks which are still live.
///
/// Released slots are reused oldest-first.
#[derive(Debug, Default)]
pub struct EntityAllocator {
    slots: Vec<SlotState>,
    released: VecDeque<u32>,
}

impl EntityAllocator {
    /// An allocator with no slots issued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out a handle, reusing a released slot when one is available.
    pub fn allocate(&mut self) -> EntityId {
        match self.released.pop_front() {
            Some(slot) => {
                let state = &mut self.slots[slot as usize];
                state.live = true;
                EntityId::new(slot, state.generation)
            }
            None => {
                let slot = self.slots.len() as u32;
                self.slots.push(SlotState {
                    generation: 0,
                    live: true,
                });
                EntityId::new(slot, 0)
            }
        }
    }

    /// Retire `id`. Returns `false` if it was already stale.
    pub fn release(&mut self, id: EntityId) -> bool {
        if !self.is_live(id) {
            return false;
        }
        let state = &mut self.slots[id.slot() as usize];
        state.live = false;
        state.generation = state.generation.wrapping_add(1);
        self.released.push_back(id.slot());
        true
    }

    pub fn is_live(&self, id: EntityId) -> bool {
        self.slots
            .get(id.slot() as usize)
            .is_some_and(|s| s.live && s.generation == id.generation())
    }

    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.live).count()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_handles_are_distinct() {
        let mut alloc = EntityAllocator::new();
        let a = alloc.allocate();
        let b = alloc.allocate();
        assert_ne!(a, b);
        assert_eq!(alloc.live_count(), 2);
    }

    #[test]
    fn released_handle_goes_stale_and_slot_is_reused() {
        let mut alloc = EntityAllocator::new();
        let stone = alloc.allocate();
        assert!(alloc.release(stone));
        assert!(!alloc.is_live(stone));

        let emerald = alloc.allocate();
        assert_eq!(emerald.slot(), stone.slot());
        assert_eq!(emerald.generation(), stone.generation() + 1);
        assert!(!alloc.is_live(stone), "old handle must not see the new piece");
        assert!(alloc.is_live(emerald));
    }

    #[test]
    fn double_release_is_rejected() {
        let mut alloc = EntityAllocator::new();
        let id = alloc.allocate();
        assert!(alloc.release(id));
        assert!(!alloc.release(id));
        assert_eq!(alloc.live_count(), 0);
    }

    #[test]
    fn unknown_slot_is_not_live() {
        let alloc = EntityAllocator::new();
        assert!(!alloc.is_live(EntityId::new(12, 0)));
    }

    #[test]
    fn raw_packing() {
        let id = EntityId::new(42, 7);
        assert_eq!(id.slot(), 42);
        assert_eq!(id.generation(), 7);
        assert_eq!(id.to_raw(), (7u64 << 32) | 42);
    }
}
