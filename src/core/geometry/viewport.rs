//=========================================================================
// Viewport
//=========================================================================
//
// Orthographic camera used to map the cursor into world space.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;
use log::debug;

//=== Internal Dependencies ===============================================

use super::Aabb;

//=== Viewport ============================================================

/// Orthographic view: world-space centre and half height, plus the
/// window size in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: Vec2,
    pub half_height: f32,
    screen_size: Vec2,
}

impl Viewport {
    pub fn new(center: Vec2, half_height: f32, width: u32, height: u32) -> Self {
        Self {
            center,
            half_height,
            screen_size: Vec2::new(width.max(1) as f32, height.max(1) as f32),
        }
    }

    /// Updates the pixel size. Zero sizes (minimised window) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            debug!("Ignoring zero-sized viewport resize ({}x{})", width, height);
            return;
        }
        self.screen_size = Vec2::new(width as f32, height as f32);
    }

    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    pub fn half_width(&self) -> f32 {
        self.half_height * self.screen_size.x / self.screen_size.y
    }

    /// Maps a pixel position (top-left origin, y down) to world space (y up).
    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        let ndc = Vec2::new(
            screen.x / self.screen_size.x * 2.0 - 1.0,
            1.0 - screen.y / self.screen_size.y * 2.0,
        );
        self.center + ndc * Vec2::new(self.half_width(), self.half_height)
    }

    /// World-space rectangle currently on screen.
    pub fn visible_bounds(&self) -> Aabb {
        let half = Vec2::new(self.half_width(), self.half_height);
        Aabb::new(self.center - half, self.center + half)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(Vec2::ZERO, 5.0, 1280, 720)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
