// camera.rs - Camera descriptor, pointer-driven rig, lights
//
// The pointer only sets targets. The per-frame update eases the camera
// toward its target so the motion stays smooth at any frame rate.

use glam::{Vec2, Vec3};

use crate::color::Rgb;
use crate::config::{CameraConfig, FollowConfig, LightConfig};
use crate::frame::damp;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub look_at: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(cfg: &CameraConfig, aspect: f32) -> Self {
        Self {
            position: Vec3::from(cfg.position),
            look_at: Vec3::from(cfg.look_at),
            fov: cfg.fov,
            aspect,
            near: cfg.near,
            far: cfg.far,
        }
    }
}

pub struct CameraRig {
    follow: FollowConfig,
    target: Vec2,
}

impl CameraRig {
    pub fn new(cfg: &CameraConfig) -> Self {
        // a centered pointer until the first move event
        let mut rig = Self { follow: cfg.follow, target: Vec2::ZERO };
        rig.aim(Vec2::ZERO);
        rig
    }

    /// Map a pointer in NDC to the camera's target x/y.
    pub fn aim(&mut self, ndc: Vec2) {
        self.target = Vec2::new(
            ndc.x * self.follow.range_x,
            self.follow.base_y + ndc.y * self.follow.range_y,
        );
    }

    pub fn target(&self) -> Vec2 {
        self.target
    }

    pub fn update(&self, camera: &mut Camera, steps: f32) {
        let k = damp(self.follow.smoothing, steps);
        camera.position.x += (self.target.x - camera.position.x) * k;
        camera.position.y += (self.target.y - camera.position.y) * k;
    }
}

pub struct PointLight {
    pub color: Rgb,
    pub intensity: f32,
    pub distance: f32,
    pub position: Vec3,
    follow: Option<[f32; 2]>,
    base_y: f32,
}

impl PointLight {
    pub fn new(cfg: &LightConfig) -> Self {
        let p = cfg.point;
        Self {
            color: Rgb::from_hex(p.color),
            intensity: p.intensity,
            distance: p.distance,
            position: Vec3::from(p.position),
            follow: p.follow,
            base_y: p.position[1],
        }
    }

    /// The light snaps to the pointer; only the camera is smoothed.
    pub fn aim(&mut self, ndc: Vec2) {
        if let Some([rx, ry]) = self.follow {
            self.position.x = ndc.x * rx;
            self.position.y = self.base_y + ndc.y * ry;
        }
    }
}
