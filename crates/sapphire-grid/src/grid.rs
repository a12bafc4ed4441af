//! The sparse occupancy map.
//!
//! A [`Grid`] maps each occupied [`Position`] to exactly one [`EntityId`] and
//! keeps a reverse index so a piece's cell can be found from its handle. A
//! missing key means the cell is empty; there are no bounds.
//!
//! The strict operations ([`Grid::relocate`], [`Grid::remove`]) validate
//! before touching either index, so a rejected call leaves the grid exactly as
//! it was. [`Grid::place`] is the lenient one: placing onto an occupied cell
//! is a no-op reported through its return value.

use std::collections::{BTreeMap, HashMap};

use crate::entity::EntityId;
use crate::geometry::Position;
use crate::GridError;

/// Exclusive position -> entity occupancy.
#[derive(Debug, Default, Clone)]
pub struct Grid {
    /// Ordered by `(row, column)` so iteration is snapshot order.
    cells: BTreeMap<Position, EntityId>,
    /// Reverse index, always the exact inverse of `cells`.
    positions: HashMap<EntityId, Position>,
}

impl Grid {
    /// An empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `entity` at `position` if the cell is empty.
    ///
    /// Returns `false` and changes nothing when the cell is already taken.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is already on the grid somewhere else.
    pub fn place(&mut self, position: Position, entity: EntityId) -> bool {
        assert!(
            !self.positions.contains_key(&entity),
            "entity {entity} is already placed at {:?}",
            self.positions.get(&entity)
        );
        if self.cells.contains_key(&position) {
            tracing::debug!(%position, %entity, "placement onto occupied cell ignored");
            return false;
        }
        self.cells.insert(position, entity);
        self.positions.insert(entity, position);
        true
    }

    /// Move `entity` to `to`. Returns the cell it left.
    ///
    /// # Errors
    ///
    /// - [`GridError::StaleEntity`] if `entity` is not on the grid.
    /// - [`GridError::Occupied`] if `to` already holds a piece (including
    ///   `entity` itself).
    pub fn relocate(&mut self, entity: EntityId, to: Position) -> Result<Position, GridError> {
        let from = *self
            .positions
            .get(&entity)
            .ok_or(GridError::StaleEntity { entity })?;
        if let Some(&occupant) = self.cells.get(&to) {
            return Err(GridError::Occupied {
                position: to,
                occupant,
            });
        }
        self.cells.remove(&from);
        self.cells.insert(to, entity);
        self.positions.insert(entity, to);
        Ok(from)
    }

    /// Clear `position` and return the handle that was there.
    ///
    /// # Errors
    ///
    /// [`GridError::Vacant`] if nothing occupies `position`.
    pub fn remove(&mut self, position: Position) -> Result<EntityId, GridError> {
        let entity = self
            .cells
            .remove(&position)
            .ok_or(GridError::Vacant { position })?;
        self.positions.remove(&entity);
        Ok(entity)
    }

    /// The occupant of `position`, if any.
    #[inline]
    pub fn get(&self, position: Position) -> Option<EntityId> {
        self.cells.get(&position).copied()
    }

    /// `true` if nothing occupies `position`.
    #[inline]
    pub fn is_vacant(&self, position: Position) -> bool {
        !self.cells.contains_key(&position)
    }

    /// Where `entity` currently sits, if it is on the grid.
    #[inline]
    pub fn position_of(&self, entity: EntityId) -> Option<Position> {
        self.positions.get(&entity).copied()
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// `true` if no cell is occupied.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Occupied cells in ascending `(row, column)` order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, EntityId)> + '_ {
        self.cells.iter().map(|(&p, &e)| (p, e))
    }

    /// A frozen copy of the occupied cells in ascending `(row, column)` order.
    pub fn snapshot(&self) -> Vec<(Position, EntityId)> {
        self.iter().collect()
    }

    /// Whether the forward and reverse indices agree.
    pub fn is_consistent(&self) -> bool {
        self.cells.len() == self.positions.len()
            && self
                .cells
                .iter()
                .all(|(p, e)| self.positions.get(e) == Some(p))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityAllocator;

    fn two_ids() -> (EntityId, EntityId) {
        let mut alloc = EntityAllocator::new();
        (alloc.allocate(), alloc.allocate())
    }

    #[test]
    fn place_on_empty_cell() {
        let (a, _) = two_ids();
        let mut grid = Grid::new();
        assert!(grid.place(Position::new(0, 0), a));
        assert_eq!(grid.get(Position::new(0, 0)), Some(a));
        assert_eq!(grid.position_of(a), Some(Position::new(0, 0)));
    }

    #[test]
    fn place_on_occupied_cell_is_ignored() {
        let (a, b) = two_ids();
        let mut grid = Grid::new();
        assert!(grid.place(Position::new(1, 1), a));
        assert!(!grid.place(Position::new(1, 1), b));
        assert_eq!(grid.get(Position::new(1, 1)), Some(a));
        assert_eq!(grid.position_of(b), None);
        assert_eq!(grid.len(), 1);
    }

    #[test]
    #[should_panic(expected = "already placed")]
    fn placing_same_entity_twice_panics() {
        let (a, _) = two_ids();
        let mut grid = Grid::new();
        grid.place(Position::new(0, 0), a);
        grid.place(Position::new(5, 5), a);
    }

    #[test]
    fn relocate_updates_both_indices() {
        let (a, _) = two_ids();
        let mut grid = Grid::new();
        grid.place(Position::new(2, 2), a);
        let from = grid.relocate(a, Position::new(1, 2)).unwrap();
        assert_eq!(from, Position::new(2, 2));
        assert!(grid.is_vacant(Position::new(2, 2)));
        assert_eq!(grid.get(Position::new(1, 2)), Some(a));
        assert!(grid.is_consistent());
    }

    #[test]
    fn relocate_into_occupied_cell_leaves_grid_untouched() {
        let (a, b) = two_ids();
        let mut grid = Grid::new();
        grid.place(Position::new(0, 0), a);
        grid.place(Position::new(0, 1), b);

        let err = grid.relocate(a, Position::new(0, 1)).unwrap_err();
        assert!(matches!(err, GridError::Occupied { occupant, .. } if occupant == b));
        assert_eq!(grid.get(Position::new(0, 0)), Some(a));
        assert_eq!(grid.get(Position::new(0, 1)), Some(b));
        assert!(grid.is_consistent());
    }

    #[test]
    fn relocate_unplaced_entity_is_stale() {
        let (a, _) = two_ids();
        let mut grid = Grid::new();
        let err = grid.relocate(a, Position::new(0, 0)).unwrap_err();
        assert!(matches!(err, GridError::StaleEntity { .. }));
    }

    #[test]
    fn remove_returns_occupant() {
        let (a, _) = two_ids();
        let mut grid = Grid::new();
        grid.place(Position::new(3, 4), a);
        assert_eq!(grid.remove(Position::new(3, 4)).unwrap(), a);
        assert!(grid.is_empty());
        assert_eq!(grid.position_of(a), None);
    }

    #[test]
    fn remove_from_empty_cell_fails() {
        let mut grid = Grid::new();
        let err = grid.remove(Position::new(9, 9)).unwrap_err();
        assert!(matches!(err, GridError::Vacant { position } if position == Position::new(9, 9)));
    }

    #[test]
    fn snapshot_is_sorted_by_row_then_column() {
        let mut alloc = EntityAllocator::new();
        let mut grid = Grid::new();
        for (r, c) in [(2, 0), (0, 3), (0, -1), (1, 1)] {
            grid.place(Position::new(r, c), alloc.allocate());
        }
        let cells: Vec<Position> = grid.snapshot().into_iter().map(|(p, _)| p).collect();
        assert_eq!(
            cells,
            vec![
                Position::new(0, -1),
                Position::new(0, 3),
                Position::new(1, 1),
                Position::new(2, 0),
            ]
        );
    }
}
