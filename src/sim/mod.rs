// sim/ - Decorative scene simulation
//
// One module per agent kind. The Scene owns all of them plus the camera,
// lights and the seeded RNG, and advances everything from a single tick.

mod bike;
mod camera;
mod particle;
mod pulse;
mod shape;

pub use bike::{trail_opacity, Bike, Bikes};
pub use camera::{Camera, CameraRig, PointLight};
pub use particle::Particles;
pub use pulse::{GridPulse, Sun, SunRing, Wave, Waves};
pub use shape::{Shape, Shapes};

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use tracing::{debug, info};

use crate::color::Rgb;
use crate::config::{shape_region, SceneConfig};
use crate::error::EngineResult;
use crate::frame::{frames, Tick};
use crate::input::{Pointer, Viewport};
use crate::world::{self, Bounds, Prop};

pub type SceneRng = Pcg64Mcg;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ambient {
    pub fog_color: Rgb,
    pub fog_near: f32,
    pub fog_far: f32,
    pub clear_color: Rgb,
    pub clear_alpha: f32,
    pub light_color: Rgb,
    pub light_intensity: f32,
}

/// Decorative scene: agents, camera, ambient parameters.
pub struct Scene {
    config: SceneConfig,
    viewport: Viewport,
    pointer: Pointer,
    bounds: Bounds,

    // Scene clock (advances `time_step` per reference frame)
    time: f32,

    pub camera: Camera,
    rig: CameraRig,
    pub light: PointLight,
    pub ambient: Ambient,

    // Agents
    pub grid: GridPulse,
    pub bikes: Option<Bikes>,
    pub shapes: Option<Shapes>,
    pub particles: Option<Particles>,
    pub waves: Option<Waves>,
    pub sun: Option<Sun>,

    // Static
    pub props: Vec<Prop>,

    rng: SceneRng,
}

impl Scene {
    pub fn new(config: SceneConfig, viewport: Viewport) -> EngineResult<Self> {
        config.validate()?;

        let mut rng = SceneRng::seed_from_u64(config.seed);

        // Spawn order is fixed so a seed always yields the same layout
        let mut props = world::floor_planes(&config.grid);
        if let Some(s) = &config.scenery {
            props.extend(world::mountains(s, &mut rng));
            props.extend(world::palm_trees(config.grid.size, s, &mut rng));
        }

        let bikes = config
            .bikes
            .as_ref()
            .map(|b| Bikes::spawn(b, Bounds::from(config.bike_region(b)), &mut rng));
        let shapes = config
            .shapes
            .as_ref()
            .map(|s| Shapes::spawn(s, Bounds::from(shape_region(s)), &mut rng));
        let particles = config
            .particles
            .as_ref()
            .map(|p| Particles::spawn(p, Bounds::from(p.extent), &mut rng));
        let waves = config.waves.as_ref().map(Waves::new);
        let sun = config.sun.as_ref().map(Sun::new);

        let ambient = Ambient {
            fog_color: Rgb::from_hex(config.ambient.fog_color),
            fog_near: config.ambient.fog_near,
            fog_far: config.ambient.fog_far,
            clear_color: Rgb::from_hex(config.ambient.clear_color),
            clear_alpha: config.ambient.clear_alpha,
            light_color: Rgb::from_hex(config.light.ambient_color),
            light_intensity: config.light.ambient_intensity,
        };

        let scene = Self {
            viewport,
            pointer: Pointer::default(),
            bounds: Bounds::from(config.bounds),
            time: 0.0,
            camera: Camera::new(&config.camera, viewport.aspect()),
            rig: CameraRig::new(&config.camera),
            light: PointLight::new(&config.light),
            ambient,
            grid: GridPulse::new(&config.grid),
            bikes,
            shapes,
            particles,
            waves,
            sun,
            props,
            rng,
            config,
        };

        info!(
            preset = ?scene.config.preset,
            seed = scene.config.seed,
            agents = scene.agent_count(),
            props = scene.props.len(),
            "scene ready"
        );
        Ok(scene)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn pointer(&self) -> Pointer {
        self.pointer
    }

    /// Region every agent is confined to.
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn agent_count(&self) -> usize {
        self.bikes.as_ref().map_or(0, Bikes::len)
            + self.shapes.as_ref().map_or(0, Shapes::len)
            + self.particles.as_ref().map_or(0, Particles::len)
            + self.waves.as_ref().map_or(0, |w| w.items.len())
            + self.sun.as_ref().map_or(0, |s| 1 + s.rings.len())
    }

    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) {
        self.pointer = self.viewport.pointer(client_x, client_y);
        self.rig.aim(self.pointer.ndc);
        self.light.aim(self.pointer.ndc);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.camera.aspect = self.viewport.aspect();
        debug!(width, height, "scene resized");
    }
}

impl Tick for Scene {
    fn tick(&mut self, dt: f32) {
        let dt = dt.max(0.0);
        let steps = frames(dt);
        self.time += self.config.time_step * steps;
        let t = self.time;

        self.grid.update(t);

        if let Some(b) = &mut self.bikes {
            b.update(steps, t, &mut self.rng);
        }
        if let Some(s) = &mut self.shapes {
            s.update(steps, t);
        }
        if let Some(p) = &mut self.particles {
            p.update(dt, steps, t, &mut self.rng);
        }
        if let Some(w) = &mut self.waves {
            w.update(t);
        }
        if let Some(s) = &mut self.sun {
            s.update(steps, t);
        }

        self.rig.update(&mut self.camera, steps);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;

    #[test]
    fn clock_runs_at_reference_rate() {
        let mut scene = Scene::new(SceneConfig::default(), Viewport::default()).unwrap();
        for _ in 0..60 {
            scene.tick(1.0 / 60.0);
        }
        assert!((scene.time() - 0.6).abs() < 1e-4);
    }

    #[test]
    fn zero_dt_changes_nothing() {
        let mut scene = Scene::new(SceneConfig::default(), Viewport::default()).unwrap();
        let before: Vec<_> = scene.bikes.as_ref().unwrap().items.iter().map(|b| b.position).collect();
        scene.tick(0.0);
        let after: Vec<_> = scene.bikes.as_ref().unwrap().items.iter().map(|b| b.position).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn presets_populate_their_own_agents() {
        let holo = Scene::new(SceneConfig::preset(Preset::HolographicFloor), Viewport::default()).unwrap();
        assert!(holo.bikes.is_some() && holo.waves.is_some() && holo.sun.is_some());
        assert!(holo.shapes.is_none());
        assert_eq!(holo.agent_count(), 8 + 50 + 3 + 6);

        let synth = Scene::new(SceneConfig::preset(Preset::Synthwave), Viewport::default()).unwrap();
        assert!(synth.shapes.is_some() && synth.bikes.is_none());
        assert!(synth.props.is_empty());
        assert_eq!(synth.agent_count(), 15 + 1000);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut scene = Scene::new(SceneConfig::default(), Viewport::new(800, 600)).unwrap();
        scene.resize(1000, 500);
        assert_eq!(scene.camera.aspect, 2.0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = SceneConfig::default();
        config.time_step = 0.0;
        assert!(Scene::new(config, Viewport::default()).is_err());
    }
}
