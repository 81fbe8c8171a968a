// animator.rs - Owned animation context
//
// One Animator per page. It owns the 3D scene, the page-element stage and
// the render backend, and is the only thing that talks to the backend:
// meshes are created in setup, refreshed every tick and released in
// teardown (or on drop).

use glam::Vec3;
use rand::SeedableRng;
use tracing::{error, info, warn};

use crate::color::Rgb;
use crate::config::SceneConfig;
use crate::error::{EngineError, EngineResult};
use crate::frame::Tick;
use crate::input::Viewport;
use crate::render::{ElementRecord, Instance, MeshDesc, MeshId, MeshKind, RenderBackend, Vertex, ViewRecord};
use crate::sim::{trail_opacity, Scene, SceneRng};
use crate::tween::{presets, ElementId, ElementKind, Stage};
use crate::world::{self, Prop, PropKind};

/// Mixed into the scene seed for page-effect randomness.
const PAGE_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

const SCANLINE_COLOR: u32 = 0x000000;
const SCANLINE_OPACITY: f32 = 0.4;
const SCANLINE_SIZE: [f32; 2] = [20.0, 0.2];
const WAVE_RADII: [f32; 2] = [1.0, 1.2];

/// What the animator needs from the page.
pub trait Host {
    fn has_element(&self, id: &str) -> bool;
    fn viewport(&self) -> Viewport;
}

struct SunMeshes {
    disc: MeshId,
    rings: Vec<MeshId>,
    scanlines: MeshId,
}

#[derive(Default)]
struct SceneMeshes {
    grid: Option<MeshId>,
    props: Vec<MeshId>,
    bikes: Vec<(MeshId, MeshId)>,
    shapes: Vec<MeshId>,
    particles: Option<MeshId>,
    waves: Vec<MeshId>,
    sun: Option<SunMeshes>,
}

impl SceneMeshes {
    fn create(scene: &Scene, backend: &mut impl RenderBackend) -> Self {
        let grid_cfg = &scene.config().grid;
        let grid_color = Rgb::from_hex(grid_cfg.color);
        let lines = world::grid_segments(grid_cfg)
            .into_iter()
            .flat_map(|(a, b)| [Vertex::new(a, grid_color, 1.0), Vertex::new(b, grid_color, 1.0)])
            .collect();

        let mut m = SceneMeshes {
            grid: Some(backend.create(MeshDesc::new(MeshKind::GridLines).vertices(lines))),
            ..Default::default()
        };

        for prop in &scene.props {
            let id = backend.create(prop_desc(prop));
            backend.update(
                id,
                Instance {
                    position: prop.position,
                    rotation: Vec3::new(0.0, prop.yaw, 0.0),
                    scale: prop.scale,
                    color: prop.color,
                    opacity: prop.opacity,
                    emissive: 0.0,
                },
            );
            m.props.push(id);
        }

        if let Some(bikes) = &scene.bikes {
            for _ in &bikes.items {
                let body = backend.create(MeshDesc::new(MeshKind::Bike));
                let trail = backend.create(MeshDesc::new(MeshKind::Trail));
                m.bikes.push((body, trail));
            }
        }

        if let Some(shapes) = &scene.shapes {
            for s in &shapes.items {
                m.shapes.push(backend.create(MeshDesc::new(s.kind.into()).wireframe(s.wireframe)));
            }
        }

        if let Some(p) = &scene.particles {
            m.particles = Some(backend.create(MeshDesc::new(MeshKind::Particles).params([p.size(), 0.0, 0.0, 0.0])));
        }

        if let Some(waves) = &scene.waves {
            let params = [WAVE_RADII[0], WAVE_RADII[1], 32.0, 0.0];
            for _ in &waves.items {
                m.waves.push(backend.create(MeshDesc::new(MeshKind::Wave).params(params)));
            }
        }

        if let Some(sun) = &scene.sun {
            let disc = backend.create(MeshDesc::new(MeshKind::SunDisc).params([sun.radius, 64.0, 0.0, 0.0]));
            let rings = sun
                .rings
                .iter()
                .map(|r| backend.create(MeshDesc::new(MeshKind::SunRing).params([r.radius, r.width, 64.0, 0.0])))
                .collect();

            let dark = Rgb::from_hex(SCANLINE_COLOR);
            let lines = sun
                .scanline_offsets()
                .map(|dy| Vertex::new(Vec3::new(0.0, dy, 0.1), dark, SCANLINE_OPACITY))
                .collect();
            let scanlines = backend.create(
                MeshDesc::new(MeshKind::Scanlines)
                    .params([SCANLINE_SIZE[0], SCANLINE_SIZE[1], 0.0, 0.0])
                    .vertices(lines),
            );
            m.sun = Some(SunMeshes { disc, rings, scanlines });
        }

        m
    }

    fn drain(&mut self) -> Vec<MeshId> {
        let mut ids: Vec<MeshId> = self.grid.take().into_iter().collect();
        ids.append(&mut self.props);
        ids.extend(self.bikes.drain(..).flat_map(|(a, b)| [a, b]));
        ids.append(&mut self.shapes);
        ids.extend(self.particles.take());
        ids.append(&mut self.waves);
        if let Some(sun) = self.sun.take() {
            ids.push(sun.disc);
            ids.extend(sun.rings);
            ids.push(sun.scanlines);
        }
        ids
    }
}

fn prop_desc(prop: &Prop) -> MeshDesc {
    // outline travels as a packed hex value, -1 for none
    let outline = prop.outline.map_or(-1.0, |c| c.to_hex() as f32);
    match prop.kind {
        PropKind::Floor { size } => MeshDesc::new(MeshKind::Floor).params([size, 0.0, 0.0, -1.0]),
        PropKind::Mountain { radius, height, segments } => {
            MeshDesc::new(MeshKind::Mountain).params([radius, height, segments as f32, outline])
        }
        PropKind::PalmTree { fronds } => MeshDesc::new(MeshKind::PalmTree).params([fronds as f32, 0.0, 0.0, outline]),
    }
}

pub struct Animator<B: RenderBackend> {
    scene: Scene,
    stage: Stage,
    backend: B,
    meshes: SceneMeshes,
    records: Vec<ElementRecord>,
    rng: SceneRng,
    live: bool,
    page_effects: bool,
}

impl<B: RenderBackend> Animator<B> {
    /// Build the scene and register its meshes. Fails, without touching
    /// the backend, when the host has no canvas with the configured id.
    pub fn setup(host: &impl Host, mut backend: B, config: SceneConfig) -> EngineResult<Self> {
        if !host.has_element(&config.canvas_id) {
            error!(canvas = %config.canvas_id, "canvas element not found, skipping scene");
            return Err(EngineError::missing(config.canvas_id));
        }

        let viewport = host.viewport();
        let stage = Stage::new(viewport, &config.parallax);
        let rng = SceneRng::seed_from_u64(config.seed ^ PAGE_SEED);
        let scene = Scene::new(config, viewport)?;

        backend.resize(viewport.width as u32, viewport.height as u32);
        let meshes = SceneMeshes::create(&scene, &mut backend);
        info!(canvas = %scene.config().canvas_id, meshes = backend.live_resources(), "animator ready");

        let mut animator = Self {
            scene,
            stage,
            backend,
            meshes,
            records: Vec::new(),
            rng,
            live: true,
            page_effects: false,
        };
        animator.sync();
        Ok(animator)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) {
        self.scene.pointer_move(client_x, client_y);
        self.stage.pointer(self.scene.pointer());
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.scene.resize(width, height);
        self.stage.resize(Viewport::new(width, height));
        self.backend.resize(width, height);
    }

    pub fn scroll(&mut self, scroll_y: f32) {
        self.stage.scroll(scroll_y);
    }

    /// Register a page element, optionally under a previously registered
    /// parent. An unknown parent is logged and ignored.
    pub fn register_element(&mut self, name: &str, kind: ElementKind, top: f32, height: f32, parent: Option<&str>) -> ElementId {
        match parent.map(|p| (p, self.stage.find(p))) {
            Some((_, Some(pid))) => self.stage.add_child(pid, name, kind, top, height),
            Some((p, None)) => {
                warn!(element = name, parent = p, "unknown parent element");
                self.stage.add_element(name, kind, top, height)
            }
            None => self.stage.add_element(name, kind, top, height),
        }
    }

    pub fn hover_enter(&mut self, name: &str) {
        match self.stage.find(name) {
            Some(id) => self.stage.hover_enter(id),
            None => warn!(element = name, "hover on unregistered element"),
        }
    }

    pub fn hover_leave(&mut self, name: &str) {
        match self.stage.find(name) {
            Some(id) => self.stage.hover_leave(id),
            None => warn!(element = name, "hover on unregistered element"),
        }
    }

    /// Entrance timeline, scroll reveals and background loops for every
    /// element registered so far. Only the first call has any effect.
    pub fn start_page_effects(&mut self) {
        if self.page_effects {
            warn!("page effects already started");
            return;
        }
        self.page_effects = true;

        presets::hero_entrance(&mut self.stage);
        presets::scroll_reveals(&mut self.stage);
        presets::background_loops(&mut self.stage, &mut self.rng);
        info!(elements = self.stage.len(), tweens = self.stage.active_tweens(), "page effects started");
    }

    /// Release every mesh. Safe to call more than once.
    pub fn teardown(&mut self) {
        if !self.live {
            return;
        }
        self.live = false;

        let ids = self.meshes.drain();
        let count = ids.len();
        for id in ids {
            self.backend.release(id);
        }
        info!(released = count, remaining = self.backend.live_resources(), "animator torn down");
    }

    fn sync(&mut self) {
        let scene = &self.scene;
        let m = &self.meshes;
        let b = &mut self.backend;

        b.begin_frame();

        if let Some(grid) = m.grid {
            b.update(grid, Instance { color: scene.grid.color, opacity: scene.grid.opacity, ..Instance::default() });
        }

        if let Some(bikes) = &scene.bikes {
            for (bike, &(body, trail)) in bikes.items.iter().zip(&m.bikes) {
                b.update(
                    body,
                    Instance {
                        position: bike.position,
                        // x carries wheel spin; the host applies it to the wheels only
                        rotation: Vec3::new(bike.wheel_spin, bike.yaw, 0.0),
                        color: bike.color,
                        emissive: bike.glow * 0.3,
                        ..Instance::default()
                    },
                );
                let n = bike.trail.len();
                let verts: Vec<Vertex> = bike
                    .trail
                    .iter()
                    .enumerate()
                    .map(|(i, &p)| Vertex::new(p, bike.color, trail_opacity(i, n)))
                    .collect();
                b.update_vertices(trail, &verts);
            }
        }

        if let Some(shapes) = &scene.shapes {
            for (s, &id) in shapes.items.iter().zip(&m.shapes) {
                b.update(
                    id,
                    Instance {
                        position: s.position,
                        rotation: s.rotation,
                        color: s.color,
                        opacity: shapes.opacity,
                        emissive: shapes.emissive,
                        ..Instance::default()
                    },
                );
            }
        }

        if let (Some(p), Some(id)) = (&scene.particles, m.particles) {
            let verts: Vec<Vertex> = (0..p.len())
                .map(|i| Vertex::new(Vec3::new(p.x[i], p.y[i], p.z[i]), p.color[i], p.opacity()))
                .collect();
            b.update_vertices(id, &verts);
            b.update(id, Instance { rotation: Vec3::new(0.0, p.yaw, 0.0), opacity: p.opacity(), ..Instance::default() });
        }

        if let Some(waves) = &scene.waves {
            for (w, &id) in waves.items.iter().zip(&m.waves) {
                b.update(
                    id,
                    Instance {
                        position: Vec3::new(0.0, waves.height, 0.0),
                        rotation: Vec3::new(-std::f32::consts::FRAC_PI_2, 0.0, 0.0),
                        scale: Vec3::new(w.scale, w.scale, 1.0),
                        color: w.color,
                        opacity: w.opacity,
                        emissive: 0.0,
                    },
                );
            }
        }

        if let (Some(sun), Some(sm)) = (&scene.sun, &m.sun) {
            let center = sun.center + Vec3::new(0.0, sun.offset_y, 0.0);
            b.update(sm.disc, Instance { position: center, color: sun.color, opacity: sun.opacity, ..Instance::default() });
            for (ring, &id) in sun.rings.iter().zip(&sm.rings) {
                b.update(
                    id,
                    Instance {
                        position: center,
                        rotation: Vec3::new(0.0, 0.0, ring.spin),
                        color: ring.color,
                        opacity: ring.opacity,
                        ..Instance::default()
                    },
                );
            }
            b.update(sm.scanlines, Instance { position: center, ..Instance::default() });
        }

        self.records.clear();
        self.records.extend(self.stage.records().map(|(id, v)| ElementRecord::new(id, v)));
        b.update_elements(&self.records);

        b.submit(&ViewRecord::from_scene(scene));
    }
}

impl<B: RenderBackend> Tick for Animator<B> {
    fn tick(&mut self, dt: f32) {
        if !self.live {
            return;
        }
        self.scene.tick(dt);
        self.stage.tick(dt);
        self.sync();
    }
}

impl<B: RenderBackend> Drop for Animator<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Preset;
    use crate::render::Encoder;

    struct Page {
        canvas: &'static str,
    }

    impl Host for Page {
        fn has_element(&self, id: &str) -> bool {
            id == self.canvas
        }

        fn viewport(&self) -> Viewport {
            Viewport::new(1280, 720)
        }
    }

    const HERO: Page = Page { canvas: "hero-3d-floor" };

    #[test]
    fn missing_canvas_is_an_error() {
        let mut enc = Encoder::new(1, 1);
        let config = SceneConfig::preset(Preset::Synthwave);
        let err = Animator::setup(&HERO, &mut enc, config).err().unwrap();
        assert!(matches!(err, EngineError::MissingElement(id) if id == "synthwave-canvas"));
        assert_eq!(enc.live_resources(), 0);
    }

    #[test]
    fn setup_registers_every_mesh() {
        let animator = Animator::setup(&HERO, Encoder::new(1, 1), SceneConfig::default()).unwrap();
        let scene = animator.scene();
        let expected = 1
            + scene.props.len()
            + 2 * scene.bikes.as_ref().unwrap().len()
            + 1
            + scene.waves.as_ref().unwrap().items.len()
            + 2
            + scene.sun.as_ref().unwrap().rings.len();
        assert_eq!(animator.backend().live_resources(), expected);
        assert_eq!(animator.backend().size(), (1280, 720));
        assert_eq!(animator.backend().meshes().len(), expected);
    }

    #[test]
    fn teardown_is_idempotent() {
        let mut enc = Encoder::new(1, 1);
        {
            let mut animator = Animator::setup(&HERO, &mut enc, SceneConfig::default()).unwrap();
            animator.tick(1.0 / 60.0);
            animator.teardown();
            assert!(!animator.is_live());
            animator.teardown();
            // ticking a dead animator is a no-op
            animator.tick(1.0 / 60.0);
        }
        assert_eq!(enc.live_resources(), 0);
    }

    #[test]
    fn trails_grow_each_frame() {
        let mut animator = Animator::setup(&HERO, Encoder::new(1, 1), SceneConfig::default()).unwrap();
        for _ in 0..10 {
            animator.tick(1.0 / 60.0);
        }
        let trails: Vec<_> = animator
            .backend()
            .meshes()
            .iter()
            .filter(|m| m.kind == MeshKind::Trail as u8 as f32)
            .map(|m| m.vertex_count)
            .collect();
        assert_eq!(trails.len(), 8);
        // spawn point plus one per frame
        assert!(trails.iter().all(|&n| n == 11.0));
    }

    #[test]
    fn page_effects_start_once() {
        let mut animator = Animator::setup(&HERO, Encoder::new(1, 1), SceneConfig::default()).unwrap();
        animator.register_element("about", ElementKind::Section, 1600.0, 600.0, None);
        animator.register_element("bg-shape-1", ElementKind::BgShape, 0.0, 80.0, None);

        animator.start_page_effects();
        let running = animator.stage().active_tweens();
        animator.start_page_effects();
        assert_eq!(animator.stage().active_tweens(), running);

        // one reveal for the section, not two
        animator.scroll(1200.0);
        assert_eq!(animator.stage().active_tweens(), running + 1);
    }

    #[test]
    fn elements_flow_to_backend() {
        let mut animator = Animator::setup(&HERO, Encoder::new(1, 1), SceneConfig::default()).unwrap();
        animator.register_element("nav-home", ElementKind::NavLink, 0.0, 20.0, None);
        animator.register_element("card", ElementKind::ProjectCard, 900.0, 300.0, None);
        animator.register_element("card-demo", ElementKind::ProjectLink, 1100.0, 20.0, Some("card"));
        animator.register_element("orphan", ElementKind::ProjectLink, 0.0, 20.0, Some("missing"));

        animator.hover_enter("nav-home");
        animator.hover_enter("not-registered");
        for _ in 0..30 {
            animator.tick(1.0 / 60.0);
        }

        let records = animator.backend().elements();
        assert_eq!(records.len(), 4);
        assert!((records[0].scale - 1.1).abs() < 1e-4);
        let card = animator.stage().find("card").unwrap();
        assert_eq!(animator.stage().children(card).len(), 1);
    }
}
