//! Grid coordinates and the four cardinal directions.
//!
//! The grid is unbounded: a [`Position`] is any `(row, column)` pair and
//! neighbor computation never fails. Rows grow upward, so [`Direction::Up`]
//! is `row + 1` and [`Direction::Down`] is `row - 1`. Coordinates wrap at
//! the `i32` limits: the cell below `i32::MIN` is `i32::MAX`.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A cell on the grid.
///
/// Ordering is lexicographic on `(row, column)`, which is the order the tick
/// scheduler visits occupied cells in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    /// Vertical coordinate. Larger is higher.
    pub row: i32,
    /// Horizontal coordinate. Larger is further right.
    pub column: i32,
}

impl Position {
    /// Construct a position from a row and a column.
    #[inline]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// The adjacent cell in `direction`, wrapping at the `i32` limits.
    #[inline]
    pub const fn neighbor(self, direction: Direction) -> Self {
        let (dr, dc) = direction.offset();
        Self {
            row: self.row.wrapping_add(dr),
            column: self.column.wrapping_add(dc),
        }
    }

    /// One row higher.
    #[inline]
    pub const fn up(self) -> Self {
        self.neighbor(Direction::Up)
    }

    /// One row lower.
    #[inline]
    pub const fn down(self) -> Self {
        self.neighbor(Direction::Down)
    }

    /// One column to the left.
    #[inline]
    pub const fn left(self) -> Self {
        self.neighbor(Direction::Left)
    }

    /// One column to the right.
    #[inline]
    pub const fn right(self) -> Self {
        self.neighbor(Direction::Right)
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, column): (i32, i32)) -> Self {
        Self { row, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// One of the four cardinal directions.
///
/// A direction is a pure mapping from a position to its neighbor; see
/// [`Direction::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// All four directions, in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// `(row, column)` delta for one step in this direction.
    #[inline]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Up => (1, 0),
            Direction::Down => (-1, 0),
        }
    }

    /// Map `position` to its neighbor in this direction.
    #[inline]
    pub const fn apply(self, position: Position) -> Position {
        position.neighbor(self)
    }

    /// The direction that undoes a step in this one.
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neighbors_follow_row_up_convention() {
        let p = Position::new(3, 7);
        assert_eq!(p.up(), Position::new(4, 7));
        assert_eq!(p.down(), Position::new(2, 7));
        assert_eq!(p.left(), Position::new(3, 6));
        assert_eq!(p.right(), Position::new(3, 8));
    }

    #[test]
    fn apply_matches_neighbor() {
        let p = Position::new(-2, 5);
        for dir in Direction::ALL {
            assert_eq!(dir.apply(p), p.neighbor(dir));
        }
    }

    #[test]
    fn opposite_steps_cancel() {
        let p = Position::new(0, 0);
        for dir in Direction::ALL {
            assert_eq!(p.neighbor(dir).neighbor(dir.opposite()), p);
        }
    }

    #[test]
    fn ordering_is_row_then_column() {
        let mut cells = vec![
            Position::new(1, 0),
            Position::new(0, 5),
            Position::new(0, -3),
            Position::new(-1, 9),
        ];
        cells.sort();
        assert_eq!(
            cells,
            vec![
                Position::new(-1, 9),
                Position::new(0, -3),
                Position::new(0, 5),
                Position::new(1, 0),
            ]
        );
    }

    #[test]
    fn neighbors_wrap_at_i32_limits() {
        let bottom = Position::new(i32::MIN, 0);
        assert_eq!(bottom.down(), Position::new(i32::MAX, 0));
        assert_eq!(bottom.down().up(), bottom);

        let corner = Position::new(0, i32::MAX);
        assert_eq!(corner.right(), Position::new(0, i32::MIN));
        assert_eq!(Position::new(0, i32::MIN).left(), corner);
    }

    #[test]
    fn no_bounds_at_extremes_of_small_grid() {
        // Negative coordinates are ordinary cells.
        let p = Position::new(-100, -100);
        assert_eq!(p.down().left(), Position::new(-101, -101));
    }
}
