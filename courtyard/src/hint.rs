//! On-screen hint text and its display timer.

pub const INTRO: &str = "PRESS C TO INTERACT";
pub const NEED_TOOL: &str = "YOU NEED A TOOL";
pub const FOUND_SOMETHING: &str = "YOU FOUND SOMETHING";
pub const NICE_FIND: &str = "NICE FIND";
pub const MAKE_TOOLS: &str = "MAKE SOME TOOLS";
pub const FIND_MEANING: &str = "FIND SOMETHING MEANINGFUL";

/// Current hint and how long it has been shown.
///
/// The timer counts up; the hint is visible while it is below
/// [`HintState::SUPPRESS_AFTER`]. Starting a hint at a non-zero timer
/// shortens (or, when negative, lengthens) its time on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct HintState {
    text: &'static str,
    timer: f32,
}

impl HintState {
    pub const SUPPRESS_AFTER: f32 = 10.0;
    /// Timer value that hides whatever hint is showing.
    pub const DISMISSED: f32 = 20.0;

    pub fn new(text: &'static str, timer: f32) -> Self {
        Self { text, timer }
    }

    pub fn text(&self) -> &'static str {
        self.text
    }

    pub fn timer(&self) -> f32 {
        self.timer
    }

    pub fn show(&mut self, text: &'static str, timer: f32) {
        log::debug!("Hint: {text}");
        self.text = text;
        self.timer = timer;
    }

    pub fn dismiss(&mut self) {
        self.timer = Self::DISMISSED;
    }

    pub fn tick(&mut self, dt: f32) {
        self.timer += dt;
    }

    pub fn is_visible(&self) -> bool {
        self.timer < Self::SUPPRESS_AFTER
    }
}

impl Default for HintState {
    /// The intro hint gets ten extra seconds on screen.
    fn default() -> Self {
        Self::new(INTRO, -10.0)
    }
}
