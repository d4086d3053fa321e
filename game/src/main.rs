use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use courtyard::render::CLEAR_COLOR;
use courtyard::{
    present, step, Action, ActionSet, AssetPaths, Assets, Camera2D, Engine, EngineConfig,
    EngineContext, FrameInput, Game, GameState, Presentation, QuadBatch, SpriteTable,
};
use env_logger::Env;

struct CourtyardGame {
    paths: AssetPaths,
    sprites: SpriteTable,
    state: GameState,
    /// Actions held last frame, for edge-detecting presses.
    previous: ActionSet,
    presentation: Presentation,
}

impl CourtyardGame {
    fn new(paths: AssetPaths) -> Self {
        let state = GameState::default();
        let presentation = present(&state);
        Self {
            paths,
            sprites: SpriteTable::default(),
            state,
            previous: ActionSet::default(),
            presentation,
        }
    }
}

impl Game for CourtyardGame {
    fn init(&mut self, ctx: &mut EngineContext) -> Result<()> {
        let assets = Assets::load(&self.paths)?;
        ctx.renderer()
            .load_atlas(&assets.atlas)
            .context("Failed to upload sprite atlas")?;
        self.sprites = assets.sprites;

        let (width, height) = ctx.renderer().surface_size();
        self.state = GameState::new(Camera2D::for_viewport(width, height));
        self.presentation = present(&self.state);
        Ok(())
    }

    fn update(&mut self, ctx: &mut EngineContext) -> Result<()> {
        let current = ctx.input().actions();
        if current.contains(Action::Quit) {
            log::info!("Quit requested");
            ctx.request_exit();
            return Ok(());
        }

        let (width, height) = ctx.renderer().surface_size();
        let input = FrameInput {
            current,
            previous: self.previous,
            pointer: ctx.input().pointer_ndc(width, height),
        };
        self.previous = current;

        let dt = ctx.delta_time().as_secs_f32();
        self.presentation = step(&mut self.state, &input, dt);
        Ok(())
    }

    fn draw(&mut self, ctx: &mut EngineContext) -> Result<()> {
        let batch = QuadBatch::build(&self.presentation, &self.sprites);
        let camera = self.state.camera;

        let renderer = ctx.renderer();
        let mut frame = renderer.begin_frame()?;
        renderer.clear(&mut frame, CLEAR_COLOR)?;
        renderer.draw_batch(&mut frame, &batch, &camera)?;
        renderer.end_frame(frame)
    }
}

fn run(paths: AssetPaths) -> Result<()> {
    let config = EngineConfig::default();
    Engine::with_config(config)
        .run(CourtyardGame::new(paths))
        .context("Escape The Courtyard stopped with an error")
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let paths = env::args_os()
        .nth(1)
        .map(AssetPaths::in_dir)
        .unwrap_or_default();
    log::info!(
        "Assets: {} and {}",
        paths.atlas.display(),
        paths.sprite_table.display()
    );

    match run(paths) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:?}");
            ExitCode::FAILURE
        }
    }
}
