use bytemuck::{Pod, Zeroable};

use crate::math::Vec2;
use crate::presentation::{Presentation, SpritePlacement};
use crate::sprites::{SpriteData, SpriteTable};

/// Vertex layout shared with `sprite.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 2],
    pub uv: [f32; 2],
    pub color: [u8; 4],
}

/// Vertices emitted per quad: four corners, with the first and last
/// doubled so consecutive quads join into one triangle strip through
/// degenerate triangles.
pub const VERTICES_PER_QUAD: usize = 6;

/// CPU-side vertex list for one frame, drawn as a single triangle strip.
#[derive(Clone, Debug, Default)]
pub struct QuadBatch {
    vertices: Vec<QuadVertex>,
}

impl QuadBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the batch for a frame. Placements whose sprite is missing from
    /// the table are skipped.
    pub fn build(presentation: &Presentation, sprites: &SpriteTable) -> Self {
        let mut batch = Self {
            vertices: Vec::with_capacity(presentation.len() * VERTICES_PER_QUAD),
        };
        for placement in presentation.placements() {
            match sprites.get(placement.sprite) {
                Some(sprite) => batch.push(sprite, placement),
                None => log::trace!("No sprite record for {:?}", placement.sprite),
            }
        }
        batch
    }

    /// Append one quad. A negative extent flips the quad along that axis.
    pub fn push(&mut self, sprite: &SpriteData, placement: &SpritePlacement) {
        let SpritePlacement {
            radius,
            at,
            tint,
            angle,
            ..
        } = *placement;
        let right = Vec2::from_angle(angle);
        let up = right.perp();
        let corner = |sx: f32, sy: f32, u: f32, v: f32| QuadVertex {
            position: (at + right * (sx * radius.x) + up * (sy * radius.y)).into(),
            uv: [u, v],
            color: tint,
        };

        let (min, max) = (sprite.min_uv, sprite.max_uv);
        let bottom_left = corner(-1.0, -1.0, min.x, min.y);
        let top_right = corner(1.0, 1.0, max.x, max.y);
        self.vertices.extend_from_slice(&[
            bottom_left,
            bottom_left,
            corner(-1.0, 1.0, min.x, max.y),
            corner(1.0, -1.0, max.x, min.y),
            top_right,
            top_right,
        ]);
    }

    pub fn vertices(&self) -> &[QuadVertex] {
        &self.vertices
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_QUAD
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
