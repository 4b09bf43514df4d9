use glam::{Mat4, Vec2};

/// Fixed overhead 2D camera. `zoom` is pixels per world unit, so the visible
/// world area follows the window size rather than stretching with it.
pub struct Camera {
    pub center: Vec2,
    pub zoom: f32,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            center: Vec2::ZERO,
            zoom: 64.0,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation((-self.center).extend(0.0))
    }

    /// Orthographic projection sized so one world unit spans `zoom` pixels.
    /// The near/far range brackets the draw layers used by `LocalTransform`.
    pub fn projection_matrix(&self, viewport: (u32, u32)) -> Mat4 {
        let half_w = viewport.0 as f32 / (2.0 * self.zoom);
        let half_h = viewport.1 as f32 / (2.0 * self.zoom);
        Mat4::orthographic_rh_gl(-half_w, half_w, -half_h, half_h, -1.0, 1.0)
    }

    /// Map a window-space point (origin top-left, y down) into world space
    /// (y up). Used once per tap to turn a gesture origin into a walk
    /// destination.
    pub fn screen_to_world(&self, screen: Vec2, viewport: (u32, u32)) -> Vec2 {
        let w = viewport.0 as f32;
        let h = viewport.1 as f32;
        self.center + Vec2::new(screen.x - w * 0.5, h * 0.5 - screen.y) / self.zoom
    }
}
