//! Mutable game objects: the player, loose items and scripted props.

use crate::crafting::Ingredients;
use crate::geometry::{AxisBox, Circle};
use crate::math::Vec2;
use crate::sprites::SpriteId;

/// Name carried by the items the pillars ask for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemTag {
    Apple,
    Crystal,
    Rock,
    Coin,
}

/// A collectible object lying on a map.
///
/// Consumed items stay in storage with a zero extent and zero pickup
/// radius so they are neither drawn nor picked up again.
#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    pub at: Vec2,
    pub radius: Vec2,
    pub sprite: SpriteId,
    pub pickup: Circle,
    pub contribution: Ingredients,
    pub tag: Option<ItemTag>,
}

impl Item {
    /// Item that can be picked up within `reach` of its position.
    pub fn new(sprite: SpriteId, at: Vec2, radius: Vec2, reach: f32) -> Self {
        Self {
            at,
            radius,
            sprite,
            pickup: Circle::new(at, reach),
            contribution: Ingredients::EMPTY,
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: ItemTag) -> Self {
        self.tag = Some(tag);
        self
    }

    pub fn with_contribution(mut self, contribution: Ingredients) -> Self {
        self.contribution = contribution;
        self
    }

    /// Move the pickup zone away from the item (used for fruit hanging out of reach).
    pub fn with_pickup(mut self, pickup: Circle) -> Self {
        self.pickup = pickup;
        self
    }

    pub fn hide(&mut self) {
        self.radius.x = 0.0;
        self.pickup.radius = 0.0;
    }

    pub fn is_hidden(&self) -> bool {
        self.radius.x == 0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Facing {
    Left,
    Right,
}

/// The player character.
///
/// The sign of `radius.x` encodes facing: positive faces left (the sprite's
/// native orientation), negative mirrors it to face right.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub at: Vec2,
    pub radius: Vec2,
    bounds: AxisBox,
}

impl Player {
    pub const START: Vec2 = Vec2::new(-1.0, -1.0);
    pub const RADIUS: Vec2 = Vec2::new(0.5, 1.0);

    pub fn new(at: Vec2) -> Self {
        Self {
            at,
            radius: Self::RADIUS,
            bounds: AxisBox::new(at, Self::RADIUS),
        }
    }

    pub fn facing(&self) -> Facing {
        if self.radius.x < 0.0 {
            Facing::Right
        } else {
            Facing::Left
        }
    }

    pub fn face(&mut self, facing: Facing) {
        let half_width = self.radius.x.abs();
        self.radius.x = match facing {
            Facing::Left => half_width,
            Facing::Right => -half_width,
        };
    }

    /// Half-width regardless of facing.
    pub fn half_width(&self) -> f32 {
        self.radius.x.abs()
    }

    pub fn bounds(&self) -> &AxisBox {
        &self.bounds
    }

    /// Box the player would occupy at `at`.
    pub fn bounds_at(&self, at: Vec2) -> AxisBox {
        AxisBox::new(at, self.radius)
    }

    pub fn move_to(&mut self, at: Vec2) {
        self.at = at;
        self.bounds = self.bounds_at(at);
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(Self::START)
    }
}

/// One-shot world interactions and the sprites they change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Props {
    pub hole_dug: bool,
    pub tree_harvested: bool,
    pub scale_taken: bool,
}

impl Props {
    pub fn scale_sprite(&self) -> SpriteId {
        if self.scale_taken {
            SpriteId::ScaleUnbalanced
        } else {
            SpriteId::Scale
        }
    }
}
