//! Game pieces: variants, capability flags, and per-variant state.
//!
//! The variant set is closed. Each [`EntityKind`] resolves to a fixed set of
//! [`Capabilities`] and to the behaviors it takes part in; the mutable state
//! those behaviors need lives in the matching [`Body`] variant.

use sapphire_grid::prelude::{EntityId, Position};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// EntityKind
// ---------------------------------------------------------------------------

/// Which kind of piece an entity is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Wall,
    Stone,
    Sapphire,
    Emerald,
    Earth,
    Bag,
    Player,
}

impl EntityKind {
    pub const ALL: [EntityKind; 7] = [
        EntityKind::Wall,
        EntityKind::Stone,
        EntityKind::Sapphire,
        EntityKind::Emerald,
        EntityKind::Earth,
        EntityKind::Bag,
        EntityKind::Player,
    ];

    pub const fn capabilities(self) -> Capabilities {
        match self {
            EntityKind::Wall | EntityKind::Earth => Capabilities {
                is_flat: true,
                is_crusher: false,
                is_earth_joiner: true,
            },
            EntityKind::Stone => Capabilities {
                is_flat: false,
                is_crusher: true,
                is_earth_joiner: false,
            },
            EntityKind::Sapphire | EntityKind::Emerald | EntityKind::Bag | EntityKind::Player => {
                Capabilities::NONE
            }
        }
    }

    /// Whether this kind falls under gravity and slides off rounded pieces.
    pub const fn has_falling_behavior(self) -> bool {
        matches!(
            self,
            EntityKind::Stone | EntityKind::Sapphire | EntityKind::Emerald | EntityKind::Bag
        )
    }

    /// Whether a falling crusher destroys this kind and takes its cell.
    pub const fn has_crushable_behavior(self) -> bool {
        matches!(self, EntityKind::Sapphire)
    }

    /// Whether this kind recomputes an earth adjacency mask every tick.
    pub const fn has_earth_join_behavior(self) -> bool {
        matches!(self, EntityKind::Earth)
    }

    /// Single-character glyph used by text dumps of the grid.
    pub const fn glyph(self) -> char {
        match self {
            EntityKind::Wall => '#',
            EntityKind::Stone => 'O',
            EntityKind::Sapphire => 'S',
            EntityKind::Emerald => 'E',
            EntityKind::Earth => '.',
            EntityKind::Bag => 'B',
            EntityKind::Player => '@',
        }
    }
}

// ---------------------------------------------------------------------------
// Capabilities
// ---------------------------------------------------------------------------

/// Fixed per-kind interaction flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Capabilities {
    /// Fallers resting on this piece do not slide off it.
    pub is_flat: bool,
    /// While falling, destroys crushable pieces it moves into.
    pub is_crusher: bool,
    /// Counts as a neighbor when earth computes its adjacency mask.
    pub is_earth_joiner: bool,
}

impl Capabilities {
    pub const NONE: Capabilities = Capabilities {
        is_flat: false,
        is_crusher: false,
        is_earth_joiner: false,
    };
}

// ---------------------------------------------------------------------------
// FallState
// ---------------------------------------------------------------------------

/// Whether a faller moved down on the previous tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum FallState {
    #[default]
    Resting,
    Falling,
}

impl FallState {
    #[inline]
    pub fn is_falling(self) -> bool {
        self == FallState::Falling
    }
}

// ---------------------------------------------------------------------------
// EarthMask
// ---------------------------------------------------------------------------

/// Which cardinal neighbors of an earth cell are earth joiners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct EarthMask(u8);

impl EarthMask {
    pub const BELOW: u8 = 1;
    pub const ABOVE: u8 = 2;
    pub const LEFT: u8 = 4;
    pub const RIGHT: u8 = 8;

    pub const EMPTY: EarthMask = EarthMask(0);

    /// Build a mask from raw bits; anything above the low nibble is dropped.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x0f)
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn contains(self, bit: u8) -> bool {
        self.0 & bit == bit
    }

    #[must_use]
    pub const fn with(self, bit: u8) -> Self {
        Self::from_bits(self.0 | bit)
    }
}

// ---------------------------------------------------------------------------
// Body
// ---------------------------------------------------------------------------

/// Variant-specific state. The variant determines the [`EntityKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Body {
    Wall,
    Stone(FallState),
    Sapphire(FallState),
    Emerald {
        fall: FallState,
        /// Set only on the tick a bag burst into this emerald.
        unbagging: bool,
    },
    Earth {
        adjacency: EarthMask,
    },
    Bag(FallState),
    Player,
}

impl Body {
    /// An emerald freshly released from a crushed bag.
    pub const fn unbagged_emerald() -> Self {
        Body::Emerald {
            fall: FallState::Resting,
            unbagging: true,
        }
    }

    pub const fn kind(&self) -> EntityKind {
        match self {
            Body::Wall => EntityKind::Wall,
            Body::Stone(_) => EntityKind::Stone,
            Body::Sapphire(_) => EntityKind::Sapphire,
            Body::Emerald { .. } => EntityKind::Emerald,
            Body::Earth { .. } => EntityKind::Earth,
            Body::Bag(_) => EntityKind::Bag,
            Body::Player => EntityKind::Player,
        }
    }

    /// Fall state, for kinds with falling behavior.
    pub const fn fall_state(&self) -> Option<FallState> {
        match *self {
            Body::Stone(fall) | Body::Sapphire(fall) | Body::Bag(fall) => Some(fall),
            Body::Emerald { fall, .. } => Some(fall),
            Body::Wall | Body::Earth { .. } | Body::Player => None,
        }
    }

    pub(crate) fn fall_state_mut(&mut self) -> Option<&mut FallState> {
        match self {
            Body::Stone(fall) | Body::Sapphire(fall) | Body::Bag(fall) => Some(fall),
            Body::Emerald { fall, .. } => Some(fall),
            Body::Wall | Body::Earth { .. } | Body::Player => None,
        }
    }
}

impl From<EntityKind> for Body {
    /// The at-rest starting state for a freshly placed piece.
    fn from(kind: EntityKind) -> Self {
        match kind {
            EntityKind::Wall => Body::Wall,
            EntityKind::Stone => Body::Stone(FallState::Resting),
            EntityKind::Sapphire => Body::Sapphire(FallState::Resting),
            EntityKind::Emerald => Body::Emerald {
                fall: FallState::Resting,
                unbagging: false,
            },
            EntityKind::Earth => Body::Earth {
                adjacency: EarthMask::EMPTY,
            },
            EntityKind::Bag => Body::Bag(FallState::Resting),
            EntityKind::Player => Body::Player,
        }
    }
}

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

/// One piece on the grid.
///
/// `position` always agrees with the grid while the entity is in the world.
/// `previous_position` is where the piece stood when the current tick
/// started, which is what renderers interpolate from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub(crate) id: EntityId,
    pub(crate) position: Position,
    pub(crate) previous_position: Position,
    pub(crate) body: Body,
}

impl Entity {
    pub(crate) fn new(id: EntityId, position: Position, body: Body) -> Self {
        Self {
            id,
            position,
            previous_position: position,
            body,
        }
    }

    #[inline]
    pub fn id(&self) -> EntityId {
        self.id
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn previous_position(&self) -> Position {
        self.previous_position
    }

    #[inline]
    pub fn body(&self) -> &Body {
        &self.body
    }

    #[inline]
    pub fn kind(&self) -> EntityKind {
        self.body.kind()
    }

    #[inline]
    pub fn capabilities(&self) -> Capabilities {
        self.kind().capabilities()
    }

    pub fn fall_state(&self) -> Option<FallState> {
        self.body.fall_state()
    }

    /// `true` only for fallers that moved down on the previous tick.
    pub fn is_falling(&self) -> bool {
        self.fall_state().is_some_and(FallState::is_falling)
    }

    /// Unbagging flag, for emeralds.
    pub fn unbagging(&self) -> Option<bool> {
        match self.body {
            Body::Emerald { unbagging, .. } => Some(unbagging),
            _ => None,
        }
    }

    /// Adjacency mask, for earth.
    pub fn adjacency(&self) -> Option<EarthMask> {
        match self.body {
            Body::Earth { adjacency } => Some(adjacency),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capability_table() {
        let wall = EntityKind::Wall.capabilities();
        assert!(wall.is_flat && wall.is_earth_joiner && !wall.is_crusher);

        let earth = EntityKind::Earth.capabilities();
        assert!(earth.is_flat && earth.is_earth_joiner);

        let stone = EntityKind::Stone.capabilities();
        assert!(stone.is_crusher && !stone.is_flat && !stone.is_earth_joiner);

        for kind in [
            EntityKind::Sapphire,
            EntityKind::Emerald,
            EntityKind::Bag,
            EntityKind::Player,
        ] {
            assert_eq!(kind.capabilities(), Capabilities::NONE, "{kind:?}");
        }
    }

    #[test]
    fn behavior_membership() {
        let fallers: Vec<_> = EntityKind::ALL
            .into_iter()
            .filter(|k| k.has_falling_behavior())
            .collect();
        assert_eq!(
            fallers,
            vec![
                EntityKind::Stone,
                EntityKind::Sapphire,
                EntityKind::Emerald,
                EntityKind::Bag
            ]
        );
        assert!(EntityKind::Sapphire.has_crushable_behavior());
        assert!(!EntityKind::Emerald.has_crushable_behavior());
        assert!(!EntityKind::Bag.has_crushable_behavior());
        assert!(EntityKind::Earth.has_earth_join_behavior());
    }

    #[test]
    fn body_kind_and_fall_state_agree_with_kind_table() {
        for kind in EntityKind::ALL {
            let body = Body::from(kind);
            assert_eq!(body.kind(), kind);
            assert_eq!(body.fall_state().is_some(), kind.has_falling_behavior());
            assert_eq!(body.fall_state(), body.fall_state().map(|_| FallState::Resting));
        }
    }

    #[test]
    fn unbagged_emerald_starts_flagged_and_resting() {
        let body = Body::unbagged_emerald();
        assert_eq!(body.kind(), EntityKind::Emerald);
        assert_eq!(
            body,
            Body::Emerald {
                fall: FallState::Resting,
                unbagging: true
            }
        );
    }

    #[test]
    fn earth_mask_bits() {
        let mask = EarthMask::EMPTY
            .with(EarthMask::BELOW)
            .with(EarthMask::LEFT);
        assert_eq!(mask.bits(), 5);
        assert!(mask.contains(EarthMask::LEFT));
        assert!(!mask.contains(EarthMask::RIGHT));
        assert_eq!(EarthMask::from_bits(0xff).bits(), 0x0f);
    }

    #[test]
    fn entity_accessors_expose_variant_fields() {
        let id = sapphire_grid::entity::EntityId::new(0, 0);
        let e = Entity::new(id, Position::new(1, 1), Body::unbagged_emerald());
        assert_eq!(e.previous_position(), e.position());
        assert_eq!(e.unbagging(), Some(true));
        assert_eq!(e.adjacency(), None);
        assert!(!e.is_falling());
    }
}
