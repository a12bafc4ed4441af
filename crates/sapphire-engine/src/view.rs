//! What a renderer polls between ticks, and a hash of it.
//!
//! [`EntityView`] flattens one piece into plain data: where it was at the
//! start of the tick, where it is now, and whichever transient fields its
//! kind carries. [`World::views`] lists them in snapshot order, and
//! [`World::state_hash`] digests that list so two runs can be compared.

use sapphire_grid::prelude::{EntityId, Position};
use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind};
use crate::world::World;

// ---------------------------------------------------------------------------
// EntityView
// ---------------------------------------------------------------------------

/// Render-facing copy of one piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Position,
    pub previous_position: Position,
    /// Present for kinds that fall.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub falling: Option<bool>,
    /// Present for emeralds.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub unbagging: Option<bool>,
    /// Present for earth: the 4-bit adjacency mask.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub adjacency: Option<u8>,
}

impl EntityView {
    /// `(row, column)` a fraction of the way from the previous to the
    /// current cell. `fraction` is clamped to `[0, 1]`.
    pub fn interpolated(&self, fraction: f64) -> (f64, f64) {
        let t = fraction.clamp(0.0, 1.0);
        let lerp = |a: i32, b: i32| {
            let (a, b) = (f64::from(a), f64::from(b));
            a + (b - a) * t
        };
        (
            lerp(self.previous_position.row, self.position.row),
            lerp(self.previous_position.column, self.position.column),
        )
    }

    /// Whether the piece changed cells during the last tick.
    pub fn moved(&self) -> bool {
        self.position != self.previous_position
    }
}

impl From<&Entity> for EntityView {
    fn from(entity: &Entity) -> Self {
        Self {
            id: entity.id(),
            kind: entity.kind(),
            position: entity.position(),
            previous_position: entity.previous_position(),
            falling: entity.fall_state().map(|f| f.is_falling()),
            unbagging: entity.unbagging(),
            adjacency: entity.adjacency().map(|m| m.bits()),
        }
    }
}

// ---------------------------------------------------------------------------
// World helpers
// ---------------------------------------------------------------------------

impl World {
    /// Views of every live piece in ascending `(row, column)` order.
    pub fn views(&self) -> Vec<EntityView> {
        self.iter().map(EntityView::from).collect()
    }

    /// BLAKE3 hex digest of [`World::views`].
    ///
    /// Two worlds with the same pieces, handles, positions, and transient
    /// state hash equal.
    pub fn state_hash(&self) -> String {
        digest(&self.views())
    }

    /// Text dump of the occupied bounding box, top row first.
    pub fn render_ascii(&self) -> String {
        let mut cells = self.grid().iter().map(|(p, _)| p);
        let Some(first) = cells.next() else {
            return String::new();
        };
        let (mut min_r, mut max_r, mut min_c, mut max_c) =
            (first.row, first.row, first.column, first.column);
        for p in cells {
            min_r = min_r.min(p.row);
            max_r = max_r.max(p.row);
            min_c = min_c.min(p.column);
            max_c = max_c.max(p.column);
        }

        let mut out = String::new();
        for row in (min_r..=max_r).rev() {
            for column in min_c..=max_c {
                let glyph = self
                    .get(Position::new(row, column))
                    .map_or(' ', |e| e.kind().glyph());
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

/// BLAKE3 hex digest of the canonical JSON encoding of `value`.
pub(crate) fn digest<T: Serialize + ?Sized>(value: &T) -> String {
    let bytes = serde_json::to_vec(value).expect("view data is always JSON-serializable");
    blake3::hash(&bytes).to_hex().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
