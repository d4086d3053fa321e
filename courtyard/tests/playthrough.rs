use courtyard::crafting::Recipe;
use courtyard::level::Pillar;
use courtyard::sprites::SpriteData;
use courtyard::{
    step, Action, FrameInput, GameState, MapId, Presentation, QuadBatch, SpriteId, SpriteTable,
    Vec2,
};

fn visit(state: &mut GameState, map: MapId, x: f32, y: f32) {
    state.map = map;
    state.player.move_to(Vec2::new(x, y));
}

fn press(state: &mut GameState) -> Presentation {
    step(state, &FrameInput::fresh(&[Action::Interact]), 0.0)
}

fn carry_to_bench(state: &mut GameState, map: MapId, x: f32, y: f32) {
    visit(state, map, x, y);
    press(state);
    assert!(state.carried.is_some(), "nothing picked up at {map:?} ({x}, {y})");
    visit(state, MapId::Middle, 12.0, -8.5);
    press(state);
    assert!(state.carried.is_none());
}

fn carry_to_pillar(state: &mut GameState, pillar: Pillar) {
    let center = pillar.zone().center;
    visit(state, MapId::Middle, center.x, center.y);
    press(state);
    assert!(state.puzzle.is_solved(pillar), "{pillar:?} not solved");
}

#[test]
fn full_playthrough_reaches_the_win_screen() {
    let mut state = GameState::default();

    carry_to_bench(&mut state, MapId::Left, 0.0, 0.0);
    carry_to_bench(&mut state, MapId::Left, -6.0, -8.0);
    assert!(state.has_tool(Recipe::Bridge));

    carry_to_bench(&mut state, MapId::Left, -10.0, -9.0);
    carry_to_bench(&mut state, MapId::Right, -4.0, -9.0);
    assert!(state.has_tool(Recipe::Knife));

    carry_to_bench(&mut state, MapId::Right, 11.0, -9.0);
    carry_to_bench(&mut state, MapId::Middle, -9.0, -6.0);
    assert!(state.has_tool(Recipe::Pickaxe));

    // Dig up the coin, then pick it up.
    visit(&mut state, MapId::Right, 7.0, -5.0);
    press(&mut state);
    assert!(state.props.hole_dug);
    press(&mut state);
    carry_to_pillar(&mut state, Pillar::Right);

    visit(&mut state, MapId::Right, -7.0, 2.0);
    press(&mut state);
    carry_to_pillar(&mut state, Pillar::Top);

    visit(&mut state, MapId::Left, 10.0, 3.0);
    press(&mut state);
    carry_to_pillar(&mut state, Pillar::Left);

    visit(&mut state, MapId::Left, -6.0, 2.0);
    press(&mut state);
    carry_to_pillar(&mut state, Pillar::Bottom);

    assert!(state.has_won());
    let frame = step(&mut state, &FrameInput::default(), 0.0);
    assert!(!frame.contains(SpriteId::Door));
    assert!(frame.contains(SpriteId::W));
}

#[test]
fn walking_right_from_the_start_reaches_the_right_map() {
    let mut state = GameState::default();
    let held = FrameInput::fresh(&[Action::Right]);

    for _ in 0..100 {
        if state.map == MapId::Right {
            break;
        }
        step(&mut state, &held, 0.1);
    }

    assert_eq!(state.map, MapId::Right);
    assert_eq!(state.player.at.y, -1.0);
    assert!(state.player.at.x < -14.0);
}

#[test]
fn loaded_sprite_table_draws_every_placement() {
    let records = vec![
        SpriteData {
            min_uv: Vec2::ZERO,
            max_uv: Vec2::new(0.125, 0.125),
            center: Vec2::ZERO,
        };
        SpriteId::COUNT
    ];
    let mut bytes = Vec::new();
    SpriteTable::new(records).write_to(&mut bytes).unwrap();
    let table = SpriteTable::read_from(bytes.as_slice()).unwrap();
    assert!(table.is_complete());

    let mut state = GameState::default();
    let frame = step(&mut state, &FrameInput::default(), 1.0 / 60.0);
    let batch = QuadBatch::build(&frame, &table);
    assert_eq!(batch.quad_count(), frame.len());
}
