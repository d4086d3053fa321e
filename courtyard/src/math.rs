use glam::{Mat4, Vec2 as GlamVec2, Vec4};

/// 2D vector type used throughout the game, in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn to_glam(&self) -> GlamVec2 {
        GlamVec2::new(self.x, self.y)
    }

    /// Computes the distance between two points.
    pub fn distance(self, rhs: Self) -> f32 {
        (self - rhs).length()
    }

    /// Returns a vector with component-wise absolute values.
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }

    /// Creates a unit vector pointing in the given direction (angle in radians).
    pub fn from_angle(angle: f32) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Rotates the vector a quarter turn counter-clockwise.
    pub fn perp(self) -> Self {
        Self::new(-self.y, self.x)
    }
}

impl From<(f32, f32)> for Vec2 {
    fn from(value: (f32, f32)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

impl From<Vec2> for [f32; 2] {
    fn from(value: Vec2) -> Self {
        [value.x, value.y]
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::AddAssign for Vec2 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y)
    }
}

/// Fixed orthographic camera described by its center and half-extent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera2D {
    pub at: Vec2,
    pub radius: Vec2,
}

impl Camera2D {
    /// Vertical half-extent of the visible region in world units.
    pub const BASE_HALF_HEIGHT: f32 = 12.0;

    /// Camera centered on the origin whose half-width follows the window aspect ratio.
    pub fn for_viewport(width: u32, height: u32) -> Self {
        let half_height = Self::BASE_HALF_HEIGHT;
        let aspect = width as f32 / height.max(1) as f32;
        Self {
            at: Vec2::ZERO,
            radius: Vec2::new(half_height * aspect, half_height),
        }
    }

    /// Maps world space onto clip space: the visible region becomes [-1,1]².
    pub fn view_projection(&self) -> Mat4 {
        let scale = GlamVec2::ONE / self.radius.to_glam();
        let offset = scale * -self.at.to_glam();

        Mat4::from_cols(
            Vec4::new(scale.x, 0.0, 0.0, 0.0),
            Vec4::new(0.0, scale.y, 0.0, 0.0),
            Vec4::new(0.0, 0.0, 1.0, 0.0),
            Vec4::new(offset.x, offset.y, 0.0, 1.0),
        )
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self::for_viewport(640, 480)
    }
}
