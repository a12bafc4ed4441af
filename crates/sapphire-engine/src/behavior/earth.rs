//! Earth adjacency.
//!
//! Earth has no gameplay behavior of its own. Each tick it records which of
//! its neighbors are earth joiners so the renderer can pick one of sixteen
//! joined-edge sprites.

use sapphire_grid::prelude::{EntityId, Position};

use crate::entity::{Body, EarthMask};
use crate::world::World;

/// Mask of earth-joining neighbors around `at`. Empty cells do not join.
pub fn adjacency_at(world: &World, at: Position) -> EarthMask {
    [
        (at.down(), EarthMask::BELOW),
        (at.up(), EarthMask::ABOVE),
        (at.left(), EarthMask::LEFT),
        (at.right(), EarthMask::RIGHT),
    ]
    .into_iter()
    .filter(|&(p, _)| {
        world
            .get(p)
            .is_some_and(|e| e.capabilities().is_earth_joiner)
    })
    .fold(EarthMask::EMPTY, |mask, (_, bit)| mask.with(bit))
}

pub(crate) fn tick(world: &mut World, id: EntityId) {
    let Some(here) = world.position_of(id) else {
        return;
    };
    let mask = adjacency_at(world, here);
    if let Some(Body::Earth { adjacency }) = world.entity_mut(id).map(|e| &mut e.body) {
        *adjacency = mask;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityKind;

    #[test]
    fn isolated_earth_has_empty_mask() {
        let mut world = World::new();
        let earth = world.add(Position::new(0, 0), EntityKind::Earth).unwrap();
        tick(&mut world, earth);
        assert_eq!(world.entity(earth).unwrap().adjacency(), Some(EarthMask::EMPTY));
    }

    #[test]
    fn every_direction_sets_its_own_bit() {
        let cases = [
            (Position::new(-1, 0), 1),
            (Position::new(1, 0), 2),
            (Position::new(0, -1), 4),
            (Position::new(0, 1), 8),
        ];
        for (neighbor, bit) in cases {
            let mut world = World::new();
            world.add(neighbor, EntityKind::Wall);
            assert_eq!(adjacency_at(&world, Position::new(0, 0)).bits(), bit);
        }
    }

    #[test]
    fn non_joiners_are_ignored() {
        let mut world = World::new();
        for (r, c) in [(-1, 0), (1, 0), (0, -1), (0, 1)] {
            world.add(Position::new(r, c), EntityKind::Stone);
        }
        assert_eq!(adjacency_at(&world, Position::new(0, 0)), EarthMask::EMPTY);
    }

    #[test]
    fn surrounded_earth_has_full_mask() {
        let mut world = World::new();
        let earth = world.add(Position::new(0, 0), EntityKind::Earth).unwrap();
        world.add(Position::new(-1, 0), EntityKind::Wall);
        world.add(Position::new(1, 0), EntityKind::Earth);
        world.add(Position::new(0, -1), EntityKind::Earth);
        world.add(Position::new(0, 1), EntityKind::Wall);
        tick(&mut world, earth);
        assert_eq!(world.entity(earth).unwrap().adjacency().unwrap().bits(), 15);
    }
}
