//! The per-frame game update.
//!
//! [`step`] is the only place game state changes: it steers the player,
//! resolves the interaction cascade on a fresh press of the interact
//! action, moves the player against the current map's geometry, switches
//! maps at the camera edges and finally describes the frame to draw.

use crate::crafting::{Ingredients, Recipe};
use crate::entities::{Facing, Item, ItemTag};
use crate::hint;
use crate::input::{Action, FrameInput};
use crate::level::{self, MapId, Pillar};
use crate::math::Vec2;
use crate::presentation::{present, Presentation};
use crate::sprites::SpriteId;
use crate::state::GameState;
use crate::world::ItemHandle;

/// Player speed in world units per second, per axis.
pub const PLAYER_SPEED: Vec2 = Vec2::new(10.0, 8.5);
/// Lowest y the player's feet may reach.
pub const WORLD_FLOOR: f32 = -12.0;
/// Inset from the camera edge at which the player crosses to the next map.
pub const EDGE_MARGIN: f32 = 0.25;
/// Every n-th interaction that finds nothing shows the tool nudge.
pub const FALLBACK_PERIOD: u32 = 5;
/// Fallback hints start late so they only linger briefly.
const FALLBACK_TIMER: f32 = 8.0;
const DIG_FOUND_TIMER: f32 = 5.0;

/// What a press of the interact action ended up doing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Interaction {
    /// Dropped the carried item on the workbench, possibly finishing a tool.
    Deposited(Option<Recipe>),
    /// Set the carried item down on its pillar.
    Placed(Pillar),
    Dug,
    NeedTool,
    Harvested,
    TookFromScale,
    PickedUp(ItemHandle),
    /// Showed the hint of the zone the player stands in.
    ZoneHint,
    /// Nothing nearby; showed a generic hint.
    Fallback,
}

/// Advance the game by `dt` seconds and describe the resulting frame.
pub fn step(state: &mut GameState, input: &FrameInput, dt: f32) -> Presentation {
    state.hint.tick(dt);

    let displacement = steer(state, input, dt);

    if input.pressed(Action::Interact) {
        let outcome = interact(state);
        log::debug!("Interaction on {:?}: {outcome:?}", state.map);
    }

    advance(state, displacement);
    log::trace!("player at {} {}", state.player.at.x, state.player.at.y);

    present(state)
}

/// Turn held movement actions into this frame's desired displacement.
fn steer(state: &mut GameState, input: &FrameInput, dt: f32) -> Vec2 {
    let mut delta = Vec2::ZERO;

    if input.held(Action::Left) {
        delta.x -= PLAYER_SPEED.x * dt;
        state.player.face(Facing::Left);
    }
    if input.held(Action::Right) {
        delta.x += PLAYER_SPEED.x * dt;
        state.player.face(Facing::Right);
    }
    if input.held(Action::Up) {
        delta.y += PLAYER_SPEED.y * dt;
    }
    if input.held(Action::Down) {
        delta.y -= PLAYER_SPEED.y * dt;
    }

    delta
}

/// Move the player by `displacement`, cancelling it entirely on any collision.
///
/// There is no sliding: a blocked diagonal move stops both axes. The floor
/// only cancels the vertical part. Crossing the camera's side edge into an
/// adjacent map replaces the horizontal move with a teleport to the
/// mirrored edge of the new map.
pub fn advance(state: &mut GameState, mut displacement: Vec2) {
    let level = &state.level;
    let map = state.map;
    let prospective = state.player.bounds_at(state.player.at + displacement);

    let blocked = level
        .collisions(map)
        .iter()
        .chain(level.bridge_gap(map, state.workbench.has(Recipe::Bridge)))
        .any(|wall| wall.overlaps(&prospective));
    if blocked {
        displacement = Vec2::ZERO;
    }

    if prospective.min().y < WORLD_FLOOR {
        displacement.y = 0.0;
    }

    let mut at = state.player.at;
    // Edges are tested after collision, so a blocked move never changes maps.
    let moved = state.player.bounds_at(at + displacement);
    let edge = state.camera.radius.x - EDGE_MARGIN;
    let half_width = state.player.half_width();

    let crossing = if moved.max().x > edge {
        map.right_neighbor().map(|next| (next, -edge + half_width))
    } else if moved.min().x < -edge {
        map.left_neighbor().map(|next| (next, edge - half_width))
    } else {
        None
    };

    if let Some((next, x)) = crossing {
        log::info!("Leaving {map:?} for {next:?}");
        state.map = next;
        at.x = x;
        displacement.x = 0.0;
    }

    state.player.move_to(at + displacement);
}

/// Resolve one press of the interact action.
///
/// The checks run in a fixed priority order and stop at the first match:
/// workbench drop, pillar placement, world actions (dig, harvest, scale,
/// pickup) when empty-handed, the current zone's hint, then a fallback hint.
pub fn interact(state: &mut GameState) -> Interaction {
    state.interactions = state.interactions.wrapping_add(1);
    let at = state.player.at;

    if let Some(handle) = state.carried {
        if let Some(outcome) = drop_carried(state, handle, at) {
            return outcome;
        }
    } else if let Some(outcome) = use_surroundings(state, at) {
        return outcome;
    }

    let zone_hint = state
        .level
        .hints(state.map)
        .iter()
        .find(|zone| zone.circle.contains(at))
        .map(|zone| zone.text);
    if let Some(text) = zone_hint {
        state.hint.show(text, 0.0);
        return Interaction::ZoneHint;
    }

    let text = if state.interactions % FALLBACK_PERIOD == 0 {
        hint::MAKE_TOOLS
    } else {
        hint::FIND_MEANING
    };
    state.hint.show(text, FALLBACK_TIMER);
    Interaction::Fallback
}

fn drop_carried(state: &mut GameState, handle: ItemHandle, at: Vec2) -> Option<Interaction> {
    if state.map != MapId::Middle {
        return None;
    }

    let (contribution, tag) = state
        .world
        .get(handle)
        .map(|item| (item.contribution, item.tag))
        .unwrap_or((Ingredients::EMPTY, None));

    if level::WORKBENCH.contains(at) {
        let crafted = state.workbench.deposit(contribution);
        if let Some(recipe) = crafted {
            log::info!("Crafted {recipe:?}");
        }
        release(state, handle);
        return Some(Interaction::Deposited(crafted));
    }

    let pillar = Pillar::accepting(tag?);
    if !pillar.zone().contains(at) {
        return None;
    }
    state.puzzle.solve(pillar);
    release(state, handle);
    log::info!("Placed {:?} on the {pillar:?} pillar", pillar.wants());
    if state.has_won() {
        log::info!("All pillars filled: the courtyard is open");
    }
    Some(Interaction::Placed(pillar))
}

/// Empty-handed actions, in priority order.
fn use_surroundings(state: &mut GameState, at: Vec2) -> Option<Interaction> {
    if state.map == MapId::Right && !state.props.hole_dug && level::HOLE.contains(at) {
        if !state.has_tool(Recipe::Pickaxe) {
            state.hint.show(hint::NEED_TOOL, 0.0);
            return Some(Interaction::NeedTool);
        }
        let coin = Item::new(
            SpriteId::Coin,
            level::HOLE.center,
            Vec2::new(0.35, 0.4),
            level::HOLE.radius,
        )
        .with_tag(ItemTag::Coin);
        if state.world.spawn(MapId::Right, coin).is_some() {
            state.props.hole_dug = true;
            state.hint.show(hint::FOUND_SOMETHING, DIG_FOUND_TIMER);
            return Some(Interaction::Dug);
        }
    }

    if state.map == MapId::Left
        && state.has_tool(Recipe::Knife)
        && !state.props.tree_harvested
        && level::TREE.contains(at)
    {
        if let Some(apple) = state.apple {
            state.carried = Some(apple);
            state.props.tree_harvested = true;
            state.hint.show(hint::NICE_FIND, 0.0);
            return Some(Interaction::Harvested);
        }
    }

    if state.map == MapId::Right && !state.props.scale_taken && level::SCALE_PAN.contains(at) {
        let rock = Item::new(SpriteId::Rock, level::SCALE_PAN.center, Vec2::new(0.5, 0.5), 0.5)
            .with_tag(ItemTag::Rock);
        if let Some(handle) = state.world.spawn(MapId::Right, rock) {
            state.props.scale_taken = true;
            state.carried = Some(handle);
            return Some(Interaction::TookFromScale);
        }
    }

    let map = state.map;
    let found = state
        .world
        .items(map)
        .iter()
        .find(|(_, item)| item.pickup.contains(at))
        .map(|(id, _)| ItemHandle { map, id });
    let handle = found?;
    state.carried = Some(handle);
    state.hint.dismiss();
    Some(Interaction::PickedUp(handle))
}

/// Consume the carried item: hide it in storage and empty the player's hands.
fn release(state: &mut GameState, handle: ItemHandle) {
    if let Some(item) = state.world.get_mut(handle) {
        item.hide();
    }
    state.carried = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hint::HintState;
    use crate::input::ActionSet;
    use crate::level::HintZone;

    fn at(state: &mut GameState, map: MapId, x: f32, y: f32) {
        state.map = map;
        state.player.move_to(Vec2::new(x, y));
    }

    fn press_interact(state: &mut GameState) {
        step(state, &FrameInput::fresh(&[Action::Interact]), 0.0);
    }

    #[test]
    fn blocked_move_cancels_both_axes() {
        let mut state = GameState::default();
        // Just under the castle wall, whose bottom edge is y = 7.5.
        at(&mut state, MapId::Middle, 0.0, 6.4);
        step(&mut state, &FrameInput::fresh(&[Action::Up, Action::Left]), 0.1);
        assert_eq!(state.player.at, Vec2::new(0.0, 6.4));
        assert_eq!(state.player.facing(), Facing::Left);
    }

    #[test]
    fn free_move_commits_full_displacement() {
        let mut state = GameState::default();
        at(&mut state, MapId::Middle, -1.0, -1.0);
        step(&mut state, &FrameInput::fresh(&[Action::Right, Action::Up]), 0.1);
        let expected = Vec2::new(-1.0 + PLAYER_SPEED.x * 0.1, -1.0 + PLAYER_SPEED.y * 0.1);
        assert_eq!(state.player.at, expected);
        assert_eq!(state.player.bounds().center(), state.player.at);
        assert_eq!(state.player.facing(), Facing::Right);
    }

    #[test]
    fn floor_cancels_only_the_vertical_part() {
        let mut state = GameState::default();
        at(&mut state, MapId::Middle, -5.0, -10.95);
        step(&mut state, &FrameInput::fresh(&[Action::Down, Action::Left]), 0.1);
        assert_eq!(state.player.at, Vec2::new(-6.0, -10.95));
    }

    #[test]
    fn bridge_gap_blocks_until_the_bridge_is_built() {
        let mut state = GameState::default();
        at(&mut state, MapId::Left, -2.9, 2.0);
        step(&mut state, &FrameInput::fresh(&[Action::Left]), 0.02);
        assert_eq!(state.player.at.x, -2.9);

        state.workbench.deposit(Recipe::Bridge.required());
        step(&mut state, &FrameInput::fresh(&[Action::Left]), 0.02);
        assert!(state.player.at.x < -2.9);
    }

    #[test]
    fn walking_off_the_right_edge_of_the_middle_enters_the_right_map() {
        let mut state = GameState::default();
        let edge = state.camera.radius.x - EDGE_MARGIN;
        at(&mut state, MapId::Middle, edge - 0.5 - 0.01, -1.0);
        step(&mut state, &FrameInput::fresh(&[Action::Right]), 0.01);
        assert_eq!(state.map, MapId::Right);
        assert_eq!(
            state.player.at.x,
            -state.camera.radius.x + 0.25 + state.player.half_width()
        );
        assert_eq!(state.player.at.y, -1.0);
    }

    #[test]
    fn walking_off_the_right_edge_of_the_left_map_enters_the_middle() {
        let mut state = GameState::default();
        let edge = state.camera.radius.x - EDGE_MARGIN;
        at(&mut state, MapId::Left, edge - 0.5 - 0.01, -1.0);
        step(&mut state, &FrameInput::fresh(&[Action::Right, Action::Up]), 0.01);
        assert_eq!(state.map, MapId::Middle);
        assert_eq!(state.player.at.x, -edge + 0.5);
        // The vertical part of the move still applies.
        assert!(state.player.at.y > -1.0);
    }

    #[test]
    fn walking_off_the_left_edge_of_the_right_map_returns_to_the_middle() {
        let mut state = GameState::default();
        let edge = state.camera.radius.x - EDGE_MARGIN;
        at(&mut state, MapId::Right, -edge + 0.5 + 0.01, -1.0);
        step(&mut state, &FrameInput::fresh(&[Action::Left]), 0.01);
        assert_eq!(state.map, MapId::Middle);
        assert_eq!(state.player.at.x, edge - 0.5);
    }

    #[test]
    fn blocked_move_at_the_edge_stays_on_the_map() {
        let mut state = GameState::default();
        // Under the castle wall at the right edge of the middle map.
        at(&mut state, MapId::Middle, 15.24, 6.45);
        step(&mut state, &FrameInput::fresh(&[Action::Right, Action::Up]), 0.01);
        assert_eq!(state.map, MapId::Middle);
        assert_eq!(state.player.at, Vec2::new(15.24, 6.45));
    }

    #[test]
    fn outer_edges_do_not_wrap() {
        let mut state = GameState::default();
        let edge = state.camera.radius.x - EDGE_MARGIN;
        state.map = MapId::Right;
        state.player.move_to(Vec2::new(edge - 0.4, -1.0));
        advance(&mut state, Vec2::new(0.01, 0.0));
        assert_eq!(state.map, MapId::Right);

        state.map = MapId::Left;
        state.player.move_to(Vec2::new(-edge + 0.4, -1.0));
        advance(&mut state, Vec2::new(-0.01, 0.0));
        assert_eq!(state.map, MapId::Left);
    }

    #[test]
    fn interact_fires_once_per_press() {
        let mut state = GameState::default();
        at(&mut state, MapId::Middle, -1.0, -1.0);
        let held: ActionSet = [Action::Interact].into_iter().collect();
        step(&mut state, &FrameInput::new(held, ActionSet::default()), 0.0);
        step(&mut state, &FrameInput::new(held, held), 0.0);
        assert_eq!(state.interactions, 1);
    }

    #[test]
    fn picking_up_takes_the_first_item_in_reach_and_clears_the_hint() {
        let mut state = GameState::default();
        at(&mut state, MapId::Left, 0.0, 0.2);
        assert_eq!(interact(&mut state), Interaction::PickedUp(state.carried.unwrap()));
        assert_eq!(state.carried_item().unwrap().sprite, SpriteId::Boards);
        assert!(!state.hint.is_visible());
    }

    #[test]
    fn workbench_drop_consumes_the_item_and_crafts() {
        let mut state = GameState::default();
        state.workbench.deposit(Ingredients::ROPE);
        at(&mut state, MapId::Left, 0.0, 0.0);
        interact(&mut state);
        let boards = state.carried.unwrap();

        at(&mut state, MapId::Middle, 12.0, -8.5);
        assert_eq!(interact(&mut state), Interaction::Deposited(Some(Recipe::Bridge)));
        assert!(state.carried.is_none());
        assert!(state.world.get(boards).unwrap().is_hidden());
        assert!(state.has_tool(Recipe::Bridge));
    }

    #[test]
    fn untagged_item_away_from_the_bench_falls_through_to_hints() {
        let mut state = GameState::default();
        at(&mut state, MapId::Left, 0.0, 0.0);
        interact(&mut state);
        at(&mut state, MapId::Middle, -3.5, 0.0);
        assert_eq!(interact(&mut state), Interaction::Fallback);
        assert!(state.carried.is_some());
    }

    #[test]
    fn digging_needs_a_pickaxe_and_happens_once() {
        let mut state = GameState::default();
        at(&mut state, MapId::Right, 7.0, -5.0);
        assert_eq!(interact(&mut state), Interaction::NeedTool);
        assert_eq!(state.hint.text(), hint::NEED_TOOL);

        state.workbench.deposit(Recipe::Pickaxe.required());
        assert_eq!(interact(&mut state), Interaction::Dug);
        assert_eq!(state.hint, HintState::new(hint::FOUND_SOMETHING, 5.0));
        assert!(state.props.hole_dug);

        // The coin now sits in the hole, so the next press picks it up.
        match interact(&mut state) {
            Interaction::PickedUp(_) => {}
            other => panic!("expected pickup, got {other:?}"),
        }
        assert_eq!(state.carried_item().unwrap().tag, Some(ItemTag::Coin));
    }

    #[test]
    fn digging_with_a_full_map_leaves_the_hole_for_later() {
        let mut state = GameState::default();
        state.workbench.deposit(Recipe::Pickaxe.required());
        let filler = Item::new(SpriteId::Stick, Vec2::new(-14.0, 10.0), Vec2::new(0.5, 0.5), 0.1);
        while state.world.spawn(MapId::Right, filler.clone()).is_some() {}
        let items = state.world.items(MapId::Right).len();

        at(&mut state, MapId::Right, 7.0, -5.0);
        assert_ne!(interact(&mut state), Interaction::Dug);
        assert!(!state.props.hole_dug);
        assert_ne!(state.hint.text(), hint::FOUND_SOMETHING);
        assert_eq!(state.world.items(MapId::Right).len(), items);
    }

    #[test]
    fn harvesting_needs_the_knife() {
        let mut state = GameState::default();
        at(&mut state, MapId::Left, 10.0, 3.0);
        assert_eq!(interact(&mut state), Interaction::ZoneHint);
        assert_eq!(state.hint.text(), "LOOK UP");

        state.workbench.deposit(Recipe::Knife.required());
        assert_eq!(interact(&mut state), Interaction::Harvested);
        assert_eq!(state.carried, state.apple);
        assert_eq!(state.hint.text(), hint::NICE_FIND);
    }

    #[test]
    fn scale_gives_one_rock_and_tips_over() {
        let mut state = GameState::default();
        at(&mut state, MapId::Right, -7.0, 2.0);
        assert_eq!(interact(&mut state), Interaction::TookFromScale);
        assert_eq!(state.carried_item().unwrap().tag, Some(ItemTag::Rock));
        assert_eq!(state.props.scale_sprite(), SpriteId::ScaleUnbalanced);
    }

    #[test]
    fn tree_gives_up_its_apple_only_once() {
        let mut state = GameState::default();
        state.workbench.deposit(Recipe::Knife.required());
        at(&mut state, MapId::Left, 10.0, 3.0);
        assert_eq!(interact(&mut state), Interaction::Harvested);
        let left_items = state.world.items(MapId::Left).len();

        let pillar = Pillar::Left.zone().center;
        at(&mut state, MapId::Middle, pillar.x, pillar.y);
        assert_eq!(interact(&mut state), Interaction::Placed(Pillar::Left));

        at(&mut state, MapId::Left, 10.0, 3.0);
        assert_eq!(interact(&mut state), Interaction::ZoneHint);
        assert!(state.carried.is_none());
        assert_eq!(state.hint.text(), "LOOK UP");
        assert_eq!(state.world.items(MapId::Left).len(), left_items);
    }

    #[test]
    fn scale_gives_up_its_rock_only_once() {
        let mut state = GameState::default();
        at(&mut state, MapId::Right, -7.0, 2.0);
        assert_eq!(interact(&mut state), Interaction::TookFromScale);
        let right_items = state.world.items(MapId::Right).len();

        let pillar = Pillar::Top.zone().center;
        at(&mut state, MapId::Middle, pillar.x, pillar.y);
        assert_eq!(interact(&mut state), Interaction::Placed(Pillar::Top));

        at(&mut state, MapId::Right, -7.0, 2.0);
        assert_eq!(interact(&mut state), Interaction::ZoneHint);
        assert!(state.carried.is_none());
        assert_eq!(state.hint.text(), "SETTLE ME DOWN");
        assert_eq!(state.world.items(MapId::Right).len(), right_items);
        assert_eq!(state.props.scale_sprite(), SpriteId::ScaleUnbalanced);
    }

    #[test]
    fn rock_goes_on_the_top_pillar() {
        let mut state = GameState::default();
        at(&mut state, MapId::Right, -7.0, 2.0);
        interact(&mut state);
        let rock = state.carried.unwrap();

        at(&mut state, MapId::Middle, 0.0, 3.0);
        assert_eq!(interact(&mut state), Interaction::Placed(Pillar::Top));
        assert!(state.puzzle.is_solved(Pillar::Top));
        assert!(state.world.get(rock).unwrap().is_hidden());
    }

    #[test]
    fn placing_on_a_pillar_wins_over_an_overlapping_hint_zone() {
        let mut state = GameState::default();
        state.level = state.level.with_hint(
            MapId::Middle,
            HintZone::new(Vec2::new(0.0, 3.0), 4.0, "UNREACHABLE"),
        );
        at(&mut state, MapId::Right, -7.0, 2.0);
        interact(&mut state);

        at(&mut state, MapId::Middle, 0.0, 3.0);
        assert_eq!(interact(&mut state), Interaction::Placed(Pillar::Top));
        assert_ne!(state.hint.text(), "UNREACHABLE");

        assert_eq!(interact(&mut state), Interaction::ZoneHint);
        assert_eq!(state.hint.text(), "UNREACHABLE");
    }

    #[test]
    fn wrong_pillar_keeps_the_item() {
        let mut state = GameState::default();
        at(&mut state, MapId::Right, -7.0, 2.0);
        interact(&mut state);
        at(&mut state, MapId::Middle, 3.5, 0.0);
        assert_eq!(interact(&mut state), Interaction::Fallback);
        assert!(!state.puzzle.is_solved(Pillar::Right));
        assert!(state.carried.is_some());
    }

    #[test]
    fn fallback_rotates_every_fifth_press() {
        let mut state = GameState::default();
        at(&mut state, MapId::Middle, -8.0, 4.0);
        let texts: Vec<&str> = (0..10)
            .map(|_| {
                interact(&mut state);
                state.hint.text()
            })
            .collect();
        assert_eq!(texts[4], hint::MAKE_TOOLS);
        assert_eq!(texts[9], hint::MAKE_TOOLS);
        assert!(texts[..4].iter().all(|&text| text == hint::FIND_MEANING));
        assert_eq!(state.hint.timer(), 8.0);
    }

    #[test]
    fn hint_timer_advances_with_each_step() {
        let mut state = GameState::default();
        let timer = state.hint.timer();
        step(&mut state, &FrameInput::default(), 0.25);
        assert_eq!(state.hint.timer(), timer + 0.25);
    }
}
