//! Turning game state into an ordered list of sprites to draw.

use crate::crafting::Recipe;
use crate::level::{self, Fixture, MapId, Pillar};
use crate::math::Vec2;
use crate::sprites::SpriteId;
use crate::state::GameState;
use crate::world::ItemHandle;

/// Where the hint line starts, in world units.
pub const HINT_ORIGIN: Vec2 = Vec2::new(-15.2, -11.2);
pub const WIN_ORIGIN: Vec2 = Vec2::new(-3.0, -8.0);
pub const WIN_TEXT: &str = "YOU WIN";
/// Half-extent of one text glyph; glyphs advance one unit apart.
pub const GLYPH_RADIUS: Vec2 = Vec2::new(0.5, 0.6);
/// Offset of a carried item above the player's center.
pub const CARRY_OFFSET: Vec2 = Vec2::new(0.0, 0.5);

/// One sprite to draw: which, how big, where, tinted and rotated how.
///
/// A negative `radius.x` mirrors the sprite horizontally.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpritePlacement {
    pub sprite: SpriteId,
    pub radius: Vec2,
    pub at: Vec2,
    pub tint: [u8; 4],
    /// Rotation in radians, counter-clockwise.
    pub angle: f32,
}

impl SpritePlacement {
    pub const WHITE: [u8; 4] = [0xff, 0xff, 0xff, 0xff];

    pub fn new(sprite: SpriteId, radius: Vec2, at: Vec2) -> Self {
        Self {
            sprite,
            radius,
            at,
            tint: Self::WHITE,
            angle: 0.0,
        }
    }
}

/// Back-to-front list of sprites for one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Presentation {
    placements: Vec<SpritePlacement>,
}

impl Presentation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn placements(&self) -> &[SpritePlacement] {
        &self.placements
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn contains(&self, sprite: SpriteId) -> bool {
        self.placements.iter().any(|p| p.sprite == sprite)
    }

    pub fn push(&mut self, placement: SpritePlacement) {
        self.placements.push(placement);
    }

    fn sprite(&mut self, sprite: SpriteId, radius: Vec2, at: Vec2) {
        self.push(SpritePlacement::new(sprite, radius, at));
    }

    fn fixture(&mut self, sprite: SpriteId, fixture: Fixture) {
        self.sprite(sprite, fixture.radius, fixture.at);
    }

    /// Lay out `text` as a row of glyphs starting at `at`.
    ///
    /// Characters without a glyph are skipped but still take up their slot.
    pub fn word(&mut self, text: &str, at: Vec2) {
        for (i, c) in text.chars().enumerate() {
            if let Some(glyph) = SpriteId::glyph(c) {
                self.sprite(glyph, GLYPH_RADIUS, Vec2::new(at.x + i as f32, at.y));
            }
        }
    }
}

/// Describe what the current state looks like, without changing it.
pub fn present(state: &GameState) -> Presentation {
    let mut out = Presentation::new();
    let map = state.map;

    out.fixture(map.background(), level::BACKGROUND);

    if map == MapId::Right {
        if state.props.hole_dug {
            let hole = level::HOLE;
            out.sprite(
                SpriteId::Hole,
                Vec2::new(hole.radius + 0.5, hole.radius + 0.2),
                hole.center,
            );
        }
        out.fixture(state.props.scale_sprite(), level::SCALE);
    }

    if state.has_tool(Recipe::Bridge) {
        if map == MapId::Left {
            out.fixture(SpriteId::Bridge, level::BRIDGE_SPAN);
        }
        out.fixture(SpriteId::Bridge, level::BRIDGE_ICON);
    }

    let player = &state.player;
    match state.carried_item() {
        Some(item) => {
            out.sprite(SpriteId::PlayerHolding, player.radius, player.at);
            out.sprite(item.sprite, item.radius, player.at + CARRY_OFFSET);
        }
        None => out.sprite(SpriteId::Player, player.radius, player.at),
    }

    if state.has_won() {
        out.word(WIN_TEXT, WIN_ORIGIN);
    } else if map == MapId::Middle {
        out.fixture(SpriteId::Door, level::DOOR);
    }

    for (id, item) in state.world.items(map).iter() {
        let carried = state.carried == Some(ItemHandle { map, id });
        if !carried && !item.is_hidden() {
            out.sprite(item.sprite, item.radius, item.at);
        }
    }

    if state.has_tool(Recipe::Pickaxe) {
        out.fixture(SpriteId::Pickaxe, level::PICKAXE_ICON);
    }
    if state.has_tool(Recipe::Knife) {
        out.fixture(SpriteId::LongKnife, level::KNIFE_ICON);
    }

    for pillar in [Pillar::Bottom, Pillar::Right, Pillar::Left, Pillar::Top] {
        if state.puzzle.is_solved(pillar) {
            let (sprite, radius) = pillar.icon();
            out.sprite(sprite, radius, pillar.zone().center);
        }
    }

    if state.hint.is_visible() {
        out.word(state.hint.text(), HINT_ORIGIN);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Facing;

    fn sprites(presentation: &Presentation) -> Vec<SpriteId> {
        presentation.placements().iter().map(|p| p.sprite).collect()
    }

    #[test]
    fn opening_frame_on_the_middle_map() {
        let state = GameState::default();
        let frame = present(&state);
        let ids = sprites(&frame);

        assert_eq!(ids[0], SpriteId::MapMiddle);
        assert_eq!(ids[1], SpriteId::Player);
        assert_eq!(ids[2], SpriteId::Door);
        assert_eq!(ids[3], SpriteId::Stick);
        // "PRESS C TO INTERACT" has no unknown characters.
        assert_eq!(ids.len(), 4 + "PRESS C TO INTERACT".len());
        assert_eq!(frame.placements()[4].at, HINT_ORIGIN);
        assert_eq!(frame.placements()[4].radius, GLYPH_RADIUS);
    }

    #[test]
    fn presenting_does_not_change_the_state() {
        let state = GameState::default();
        let before = format!("{state:?}");
        present(&state);
        present(&state);
        assert_eq!(before, format!("{state:?}"));
    }

    #[test]
    fn glyphs_advance_one_unit_and_skip_unknown_characters() {
        let mut frame = Presentation::new();
        frame.word("A!B", Vec2::new(1.0, 2.0));
        assert_eq!(sprites(&frame), vec![SpriteId::A, SpriteId::B]);
        assert_eq!(frame.placements()[1].at, Vec2::new(3.0, 2.0));
    }

    #[test]
    fn facing_right_mirrors_the_player_sprite() {
        let mut state = GameState::default();
        state.player.face(Facing::Right);
        let frame = present(&state);
        let player = frame.placements().iter().find(|p| p.sprite == SpriteId::Player).unwrap();
        assert_eq!(player.radius, Vec2::new(-0.5, 1.0));
    }

    #[test]
    fn carried_item_floats_above_the_player_and_leaves_the_floor() {
        let mut state = GameState::default();
        let stick = state.world.items(MapId::Middle).iter().next().map(|(id, _)| id).unwrap();
        state.carried = Some(ItemHandle {
            map: MapId::Middle,
            id: stick,
        });
        let frame = present(&state);
        let ids = sprites(&frame);
        assert!(!ids.contains(&SpriteId::Player));
        let holding = ids.iter().position(|&id| id == SpriteId::PlayerHolding).unwrap();
        assert_eq!(ids[holding + 1], SpriteId::Stick);
        assert_eq!(frame.placements()[holding + 1].at, state.player.at + CARRY_OFFSET);
        assert_eq!(ids.iter().filter(|&&id| id == SpriteId::Stick).count(), 1);
    }

    #[test]
    fn hint_disappears_once_suppressed() {
        let mut state = GameState::default();
        state.hint.dismiss();
        let frame = present(&state);
        assert!(!frame.contains(SpriteId::P));
    }

    #[test]
    fn tools_show_as_icons_everywhere() {
        let mut state = GameState::default();
        state.hint.dismiss();
        for recipe in Recipe::PRIORITY {
            state.workbench.deposit(recipe.required());
        }
        state.map = MapId::Right;
        let frame = present(&state);
        assert!(frame.contains(SpriteId::Pickaxe));
        assert!(frame.contains(SpriteId::LongKnife));
        let bridges = frame.placements().iter().filter(|p| p.sprite == SpriteId::Bridge);
        assert_eq!(bridges.count(), 1);

        state.map = MapId::Left;
        let bridges = present(&state)
            .placements()
            .iter()
            .filter(|p| p.sprite == SpriteId::Bridge)
            .count();
        assert_eq!(bridges, 2);
    }

    #[test]
    fn solved_pillars_show_on_every_map() {
        let mut state = GameState::default();
        state.puzzle.solve(Pillar::Top);
        let (sprite, radius) = Pillar::Top.icon();
        let icon = SpritePlacement::new(sprite, radius, Pillar::Top.zone().center);

        for map in [MapId::Left, MapId::Middle, MapId::Right] {
            state.map = map;
            assert!(present(&state).placements().contains(&icon), "no icon on {map:?}");
        }
    }

    #[test]
    fn right_map_shows_the_scale_and_the_dug_hole() {
        let mut state = GameState::default();
        state.map = MapId::Right;
        state.props.hole_dug = true;
        let frame = present(&state);
        assert_eq!(&sprites(&frame)[..3], &[SpriteId::MapRight, SpriteId::Hole, SpriteId::Scale]);
        assert_eq!(frame.placements()[1].radius, Vec2::new(1.0, 0.7));
    }

    #[test]
    fn win_replaces_the_door_with_text() {
        let mut state = GameState::default();
        state.hint.dismiss();
        for pillar in Pillar::ALL {
            state.puzzle.solve(pillar);
        }
        for recipe in Recipe::PRIORITY {
            state.workbench.deposit(recipe.required());
        }
        let frame = present(&state);
        assert!(!frame.contains(SpriteId::Door));
        let y = frame.placements().iter().find(|p| p.sprite == SpriteId::Y).unwrap();
        assert_eq!(y.at, WIN_ORIGIN);
        for (sprite, _) in Pillar::ALL.map(Pillar::icon) {
            assert!(frame.contains(sprite));
        }
    }
}
