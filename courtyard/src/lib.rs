//! Courtyard - the simulation and rendering core of Escape The Courtyard.
//!
//! The game is a fixed three-screen world: walk between maps, pick up
//! items, craft tools at the workbench and set four items on their pillars.
//! [`simulation::step`] advances a [`GameState`] by one frame and returns a
//! [`Presentation`]; the [`render`] module turns that into GPU draws.

pub mod assets;
pub mod crafting;
pub mod engine;
pub mod entities;
pub mod geometry;
pub mod hint;
pub mod input;
pub mod level;
pub mod math;
pub mod presentation;
pub mod render;
pub mod simulation;
pub mod sprites;
pub mod state;
pub mod world;

pub use crate::assets::{AssetPaths, Assets, TextureImage};
pub use crate::engine::{Engine, EngineConfig, EngineContext, Game};
pub use crate::input::{Action, ActionSet, FrameInput, InputState};
pub use crate::level::MapId;
pub use crate::math::{Camera2D, Vec2};
pub use crate::presentation::{present, Presentation, SpritePlacement};
pub use crate::render::{Frame, QuadBatch, Renderer};
pub use crate::simulation::step;
pub use crate::sprites::{SpriteId, SpriteTable};
pub use crate::state::GameState;
pub use winit::keyboard::KeyCode;
