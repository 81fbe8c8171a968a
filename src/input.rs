// input.rs - Pointer and viewport inputs
//
// The 3D scene wants normalized device coordinates (y up); the page
// parallax wants a centered offset with y pointing down like CSS.

use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width: width.max(1) as f32, height: height.max(1) as f32 }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn pointer(&self, client_x: f32, client_y: f32) -> Pointer {
        let u = (client_x / self.width).clamp(0.0, 1.0);
        let v = (client_y / self.height).clamp(0.0, 1.0);
        Pointer {
            ndc: Vec2::new(u * 2.0 - 1.0, -(v * 2.0) + 1.0),
            centered: Vec2::new((u - 0.5) * 2.0, (v - 0.5) * 2.0),
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pointer {
    /// [-1, 1], y up.
    pub ndc: Vec2,
    /// [-1, 1], y down.
    pub centered: Vec2,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corners_map_to_unit_square() {
        let vp = Viewport::new(800, 600);

        let top_left = vp.pointer(0.0, 0.0);
        assert_eq!(top_left.ndc, Vec2::new(-1.0, 1.0));
        assert_eq!(top_left.centered, Vec2::new(-1.0, -1.0));

        let center = vp.pointer(400.0, 300.0);
        assert_eq!(center.ndc, Vec2::ZERO);
        assert_eq!(center.centered, Vec2::ZERO);
    }

    #[test]
    fn off_screen_pointer_is_clamped() {
        let p = Viewport::new(100, 100).pointer(-50.0, 500.0);
        assert_eq!(p.ndc, Vec2::new(-1.0, -1.0));
    }

    #[test]
    fn zero_sized_viewport_does_not_divide_by_zero() {
        let vp = Viewport::new(0, 0);
        assert_eq!(vp.aspect(), 1.0);
        assert!(vp.pointer(0.0, 0.0).ndc.is_finite());
    }
}
