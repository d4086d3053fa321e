//! Static layout of the three courtyard maps.
//!
//! Nothing here changes at runtime; mutable per-map state lives in
//! [`crate::world::World`] and [`crate::entities::Props`].

use crate::entities::ItemTag;
use crate::geometry::{AxisBox, Circle};
use crate::math::Vec2;
use crate::sprites::SpriteId;

/// One of the three horizontally adjacent play areas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapId {
    Left,
    Middle,
    Right,
}

impl MapId {
    pub const ALL: [MapId; 3] = [MapId::Left, MapId::Middle, MapId::Right];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Map entered by walking off the right edge.
    pub const fn right_neighbor(self) -> Option<MapId> {
        match self {
            MapId::Left => Some(MapId::Middle),
            MapId::Middle => Some(MapId::Right),
            MapId::Right => None,
        }
    }

    /// Map entered by walking off the left edge.
    pub const fn left_neighbor(self) -> Option<MapId> {
        match self {
            MapId::Left => None,
            MapId::Middle => Some(MapId::Left),
            MapId::Right => Some(MapId::Middle),
        }
    }

    pub const fn background(self) -> SpriteId {
        match self {
            MapId::Left => SpriteId::MapLeft,
            MapId::Middle => SpriteId::MapMiddle,
            MapId::Right => SpriteId::MapRight,
        }
    }
}

/// A zone that shows a hint when the player interacts inside it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HintZone {
    pub circle: Circle,
    pub text: &'static str,
}

impl HintZone {
    pub const fn new(center: Vec2, radius: f32, text: &'static str) -> Self {
        Self {
            circle: Circle::new(center, radius),
            text,
        }
    }
}

/// The four placement spots around the middle map's center.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pillar {
    Left,
    Top,
    Right,
    Bottom,
}

impl Pillar {
    pub const ALL: [Pillar; 4] = [Pillar::Left, Pillar::Top, Pillar::Right, Pillar::Bottom];

    pub const fn zone(self) -> Circle {
        let center = match self {
            Pillar::Left => Vec2::new(-3.5, 0.0),
            Pillar::Top => Vec2::new(0.0, 3.5),
            Pillar::Right => Vec2::new(3.5, 0.0),
            Pillar::Bottom => Vec2::new(0.0, -3.5),
        };
        Circle::new(center, 2.0)
    }

    /// The item this pillar accepts.
    pub const fn wants(self) -> ItemTag {
        match self {
            Pillar::Left => ItemTag::Apple,
            Pillar::Top => ItemTag::Rock,
            Pillar::Right => ItemTag::Coin,
            Pillar::Bottom => ItemTag::Crystal,
        }
    }

    pub const fn accepting(tag: ItemTag) -> Pillar {
        match tag {
            ItemTag::Apple => Pillar::Left,
            ItemTag::Rock => Pillar::Top,
            ItemTag::Coin => Pillar::Right,
            ItemTag::Crystal => Pillar::Bottom,
        }
    }

    /// Sprite and half-extent shown once the pillar is solved.
    pub const fn icon(self) -> (SpriteId, Vec2) {
        match self {
            Pillar::Left => (SpriteId::Apple, Vec2::new(0.75, 0.75)),
            Pillar::Top => (SpriteId::Rock, Vec2::new(0.75, 0.75)),
            Pillar::Right => (SpriteId::Coin, Vec2::new(0.5, 0.6)),
            Pillar::Bottom => (SpriteId::Crystal, Vec2::new(1.0, 0.5)),
        }
    }
}

/// Sprite placement that never moves.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fixture {
    pub at: Vec2,
    pub radius: Vec2,
}

impl Fixture {
    const fn new(at: Vec2, radius: Vec2) -> Self {
        Self { at, radius }
    }
}

pub const BACKGROUND: Fixture = Fixture::new(Vec2::ZERO, Vec2::new(16.0, 12.0));
pub const DOOR: Fixture = Fixture::new(Vec2::new(0.1, 8.75), Vec2::new(1.5, 2.5));
pub const SCALE: Fixture = Fixture::new(Vec2::new(-9.0, 2.0), Vec2::new(2.0, 1.5));
/// Grab zone on the scale pan.
pub const SCALE_PAN: Circle = Circle::new(Vec2::new(-7.0, 2.0), 1.0);
pub const TREE: Circle = Circle::new(Vec2::new(10.25, 4.75), 3.0);
pub const WORKBENCH: Circle = Circle::new(Vec2::new(12.25, -15.0), 8.0);
pub const HOLE: Circle = Circle::new(Vec2::new(7.0, -5.0), 0.5);
/// Bridge drawn over the gap on the left map.
pub const BRIDGE_SPAN: Fixture = Fixture::new(Vec2::new(-3.4, 2.0), Vec2::new(1.0, 0.7));
/// Bridge shown in the tool tray once built.
pub const BRIDGE_ICON: Fixture = Fixture::new(Vec2::new(-13.0, 11.0), Vec2::new(0.5, 0.35));
pub const PICKAXE_ICON: Fixture = Fixture::new(Vec2::new(-15.0, 11.0), Vec2::new(0.5, 0.5));
pub const KNIFE_ICON: Fixture = Fixture::new(Vec2::new(-11.5, 11.0), Vec2::new(0.5, 0.5));

/// Collision boxes and hint zones for every map.
#[derive(Clone, Debug)]
pub struct Level {
    collisions: [Vec<AxisBox>; 3],
    hints: [Vec<HintZone>; 3],
    bridge_gap: AxisBox,
}

impl Level {
    pub fn courtyard() -> Self {
        let boxed = |x: f32, y: f32, rx: f32, ry: f32| AxisBox::new(Vec2::new(x, y), Vec2::new(rx, ry));
        let castle_wall = boxed(0.0, 8.5, 32.0, 1.0);

        let left = vec![
            castle_wall,
            boxed(-14.8, 0.0, 1.0, 24.0),
            boxed(-8.1, 2.0, 2.0, 3.0),
            boxed(-11.0, 2.0, 0.5, 2.0),
            boxed(-12.0, 1.5, 0.8, 1.5),
            boxed(-4.5, 0.5, 0.25, 0.25),
            // tree trunk
            boxed(9.875, 8.25, 1.625, 4.0),
        ];
        let middle = vec![
            castle_wall,
            // workbench
            boxed(11.05, -11.0, 3.35, 2.0),
        ];
        let right = vec![
            castle_wall,
            boxed(15.5, 0.0, 1.0, 40.0),
            // rocks
            boxed(-0.55, 0.4, 0.9, 0.3),
            boxed(7.07, 3.25, 0.6, 0.45),
            boxed(3.5, -4.0, 0.6, 0.25),
        ];

        let left_hints = vec![
            HintZone {
                circle: TREE,
                text: "LOOK UP",
            },
            HintZone::new(Vec2::new(-5.0, 2.0), 2.0, "I LEFT WITHOUT A TRACE"),
        ];
        let middle_hints = vec![HintZone {
            circle: WORKBENCH,
            text: "FIND SOMETHING TO BUILD",
        }];
        let right_hints = vec![
            HintZone::new(Vec2::new(3.0, 13.5), 8.0, "IM ALWAYS RIGHT"),
            HintZone::new(SCALE.at, 3.0, "SETTLE ME DOWN"),
        ];

        Self {
            collisions: [left, middle, right],
            hints: [left_hints, middle_hints, right_hints],
            bridge_gap: boxed(-4.5, 2.0, 1.0, 1.5),
        }
    }

    /// Add a hint zone to a map; earlier zones take precedence.
    pub fn with_hint(mut self, map: MapId, zone: HintZone) -> Self {
        self.hints[map.index()].push(zone);
        self
    }

    pub fn collisions(&self, map: MapId) -> &[AxisBox] {
        &self.collisions[map.index()]
    }

    pub fn hints(&self, map: MapId) -> &[HintZone] {
        &self.hints[map.index()]
    }

    /// Blocker over the river gap, present on the left map until the bridge is built.
    pub fn bridge_gap(&self, map: MapId, bridge_built: bool) -> Option<&AxisBox> {
        (map == MapId::Left && !bridge_built).then_some(&self.bridge_gap)
    }
}

impl Default for Level {
    fn default() -> Self {
        Self::courtyard()
    }
}
