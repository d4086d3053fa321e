//! Workbench ingredients and the tools they unlock.

/// Set of crafting ingredients dropped on the workbench so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Ingredients(u8);

impl Ingredients {
    pub const EMPTY: Self = Self(0);
    pub const BOARDS: Self = Self(1 << 0);
    pub const ROPE: Self = Self(1 << 1);
    pub const PICK_HEAD: Self = Self(1 << 2);
    pub const STICK: Self = Self(1 << 3);
    pub const KNIFE_METAL: Self = Self(1 << 4);
    pub const ROD: Self = Self(1 << 5);

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Union of two ingredient sets.
    pub const fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn insert(&mut self, other: Self) {
        *self = self.with(other);
    }

    /// True when every ingredient in `required` is present; extra ingredients are ignored.
    pub const fn contains_all(self, required: Self) -> bool {
        self.0 & required.0 == required.0
    }
}

/// A tool built at the workbench.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Recipe {
    Bridge,
    Knife,
    Pickaxe,
}

impl Recipe {
    /// Evaluation order when an item is dropped on the workbench.
    pub const PRIORITY: [Recipe; 3] = [Recipe::Bridge, Recipe::Knife, Recipe::Pickaxe];

    pub const fn required(self) -> Ingredients {
        match self {
            Recipe::Bridge => Ingredients::BOARDS.with(Ingredients::ROPE),
            Recipe::Knife => Ingredients::KNIFE_METAL.with(Ingredients::ROD),
            Recipe::Pickaxe => Ingredients::PICK_HEAD.with(Ingredients::STICK),
        }
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

/// Ingredients on the bench plus the tools unlocked from them.
///
/// Both halves only grow: ingredients are never taken back and an unlocked
/// tool stays unlocked.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Workbench {
    ingredients: Ingredients,
    unlocked: [bool; 3],
}

impl Workbench {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, recipe: Recipe) -> bool {
        self.unlocked[recipe.slot()]
    }

    pub fn craftable(&self, recipe: Recipe) -> bool {
        self.ingredients.contains_all(recipe.required())
    }

    pub fn all_unlocked(&self) -> bool {
        self.unlocked.iter().all(|&unlocked| unlocked)
    }

    /// Drop an ingredient on the bench and unlock at most one newly
    /// satisfied recipe, in [`Recipe::PRIORITY`] order.
    pub fn deposit(&mut self, contribution: Ingredients) -> Option<Recipe> {
        self.ingredients.insert(contribution);

        let recipe = Recipe::PRIORITY
            .into_iter()
            .find(|&recipe| !self.has(recipe) && self.craftable(recipe))?;
        self.unlocked[recipe.slot()] = true;
        Some(recipe)
    }
}
