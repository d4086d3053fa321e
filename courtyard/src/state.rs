use crate::crafting::{Ingredients, Recipe, Workbench};
use crate::entities::{Item, ItemTag, Player, Props};
use crate::geometry::Circle;
use crate::hint::HintState;
use crate::level::{Level, MapId, Pillar};
use crate::math::{Camera2D, Vec2};
use crate::sprites::SpriteId;
use crate::world::{ItemHandle, World};

/// Which pillars hold their item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PuzzleFlags {
    solved: [bool; 4],
}

impl PuzzleFlags {
    pub fn is_solved(&self, pillar: Pillar) -> bool {
        self.solved[pillar as usize]
    }

    pub fn solve(&mut self, pillar: Pillar) {
        self.solved[pillar as usize] = true;
    }

    pub fn all_solved(&self) -> bool {
        self.solved.iter().all(|&solved| solved)
    }
}

/// Everything the simulation step reads and writes.
#[derive(Clone, Debug)]
pub struct GameState {
    pub camera: Camera2D,
    pub level: Level,
    pub map: MapId,
    pub player: Player,
    /// Item held above the player's head, if any.
    pub carried: Option<ItemHandle>,
    pub world: World,
    pub workbench: Workbench,
    pub puzzle: PuzzleFlags,
    pub props: Props,
    pub hint: HintState,
    /// The apple hanging in the tree; harvested rather than picked up.
    pub apple: Option<ItemHandle>,
    /// Interaction presses so far, used to rotate the fallback hints.
    pub interactions: u32,
}

impl GameState {
    /// Fresh game on the middle map.
    pub fn new(camera: Camera2D) -> Self {
        let mut world = World::new();
        let apple = populate(&mut world);

        Self {
            camera,
            level: Level::courtyard(),
            map: MapId::Middle,
            player: Player::default(),
            carried: None,
            world,
            workbench: Workbench::new(),
            puzzle: PuzzleFlags::default(),
            props: Props::default(),
            hint: HintState::default(),
            apple,
            interactions: 0,
        }
    }

    pub fn has_tool(&self, recipe: Recipe) -> bool {
        self.workbench.has(recipe)
    }

    /// Win needs every pillar filled and every tool crafted.
    pub fn has_won(&self) -> bool {
        self.puzzle.all_solved() && self.workbench.all_unlocked()
    }

    pub fn carried_item(&self) -> Option<&Item> {
        self.carried.and_then(|handle| self.world.get(handle))
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Camera2D::default())
    }
}

fn populate(world: &mut World) -> Option<ItemHandle> {
    let apple = world.spawn(
        MapId::Left,
        Item::new(SpriteId::Apple, Vec2::new(7.0, 10.25), Vec2::new(0.5, 0.5), 0.0)
            .with_pickup(Circle::new(Vec2::ZERO, 0.0))
            .with_tag(ItemTag::Apple),
    );

    let left = [
        Item::new(SpriteId::Crystal, Vec2::new(-6.0, 2.25), Vec2::new(0.35, 0.75), 0.75)
            .with_tag(ItemTag::Crystal),
        Item::new(SpriteId::Rope, Vec2::new(-6.0, -8.0), Vec2::new(0.7, 0.5), 0.75)
            .with_contribution(Ingredients::ROPE),
        Item::new(SpriteId::Boards, Vec2::ZERO, Vec2::new(0.7, 0.5), 0.75)
            .with_contribution(Ingredients::BOARDS),
        Item::new(SpriteId::Knife, Vec2::new(-10.0, -9.0), Vec2::new(0.5, 0.5), 0.75)
            .with_contribution(Ingredients::KNIFE_METAL),
    ];
    let middle = [
        Item::new(SpriteId::Stick, Vec2::new(-9.0, -6.0), Vec2::new(0.5, 0.5), 0.75)
            .with_contribution(Ingredients::STICK),
    ];
    let right = [
        Item::new(SpriteId::PickaxeHead, Vec2::new(11.0, -9.0), Vec2::new(0.5, 0.5), 0.75)
            .with_contribution(Ingredients::PICK_HEAD),
        Item::new(SpriteId::Rod, Vec2::new(-4.0, -9.0), Vec2::new(0.6, 0.4), 0.75)
            .with_contribution(Ingredients::ROD),
    ];

    for (map, items) in [
        (MapId::Left, &left[..]),
        (MapId::Middle, &middle[..]),
        (MapId::Right, &right[..]),
    ] {
        for item in items {
            world.spawn(map, item.clone());
        }
    }

    apple
}
