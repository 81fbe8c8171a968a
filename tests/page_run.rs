// End-to-end runs through the public API with the in-memory encoder.

use glam::{Quat, Vec3};
use synthwave_engine::render::RenderBackend;
use synthwave_engine::tween::Visual;
use synthwave_engine::{Animator, ElementKind, Encoder, EngineError, Host, Preset, SceneConfig, Tick, Viewport};

struct Page {
    canvas: String,
}

impl Host for Page {
    fn has_element(&self, id: &str) -> bool {
        id == self.canvas
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(1280, 720)
    }
}

fn page_for(config: &SceneConfig) -> Page {
    Page { canvas: config.canvas_id.clone() }
}

fn run<T: Tick>(target: &mut T, frames: usize) {
    for _ in 0..frames {
        target.tick(1.0 / 60.0);
    }
}

#[test]
fn agents_stay_in_bounds() {
    for preset in [Preset::HolographicFloor, Preset::Synthwave] {
        let config = SceneConfig::preset(preset);
        let page = page_for(&config);
        let mut animator = Animator::setup(&page, Encoder::new(1280, 720), config).unwrap();

        for frame in 0..1200 {
            // uneven frame times, including a stall
            let dt = if frame % 97 == 0 { 0.25 } else { 1.0 / 60.0 };
            animator.pointer_move((frame % 1280) as f32, (frame * 7 % 720) as f32);
            animator.tick(dt);

            let scene = animator.scene();
            let bounds = scene.bounds();
            if let Some(bikes) = &scene.bikes {
                for b in &bikes.items {
                    assert!(bikes.bounds().contains(b.position), "{preset:?} bike {:?}", b.position);
                }
            }
            if let Some(shapes) = &scene.shapes {
                for s in &shapes.items {
                    assert!(shapes.bounds().contains(s.position), "{preset:?} shape {:?}", s.position);
                    assert!(bounds.contains(s.position));
                }
            }
            if let Some(p) = &scene.particles {
                for i in 0..p.len() {
                    let pos = Vec3::new(p.x[i], p.y[i], p.z[i]);
                    assert!(p.bounds().contains(pos), "{preset:?} particle {pos:?}");
                    // the field is drawn spun by its yaw
                    let world = Quat::from_rotation_y(p.yaw) * pos;
                    assert!(bounds.contains(world), "{preset:?} frame {frame} particle {world:?}");
                }
            }
        }
    }
}

#[test]
fn same_seed_same_frames() {
    let frames = |seed: u64| {
        let mut config = SceneConfig::preset(Preset::Synthwave);
        config.seed = seed;
        let page = page_for(&config);
        let mut animator = Animator::setup(&page, Encoder::new(800, 600), config).unwrap();
        run(&mut animator, 300);
        let enc = animator.backend();
        (enc.meshes().to_vec(), enc.vertices().to_vec())
    };

    assert_eq!(frames(42), frames(42));
    assert_ne!(frames(42).0, frames(43).0);
}

#[test]
fn repeated_setup_does_not_leak_meshes() {
    let mut enc = Encoder::new(1280, 720);
    let config = SceneConfig::default();
    let page = page_for(&config);

    let mut created = None;
    for _ in 0..5 {
        let mut animator = Animator::setup(&page, &mut enc, config.clone()).unwrap();
        run(&mut animator, 10);
        let live = animator.backend().live_resources();
        assert_eq!(*created.get_or_insert(live), live);
        animator.teardown();
        assert_eq!(animator.backend().live_resources(), 0);
    }

    // dropping without an explicit teardown releases too
    {
        let _animator = Animator::setup(&page, &mut enc, config).unwrap();
    }
    assert_eq!(enc.live_resources(), 0);
}

#[test]
fn missing_canvas_leaves_backend_untouched() {
    let mut enc = Encoder::new(1280, 720);
    let page = Page { canvas: "somewhere-else".to_string() };
    let config = SceneConfig::default();
    let wanted = config.canvas_id.clone();

    let err = Animator::setup(&page, &mut enc, config).err().unwrap();
    assert!(matches!(err, EngineError::MissingElement(ref id) if *id == wanted));
    assert_eq!(enc.live_resources(), 0);
    assert!(enc.meshes().is_empty());
}

#[test]
fn hover_returns_to_rest() {
    let config = SceneConfig::default();
    let page = page_for(&config);
    let mut animator = Animator::setup(&page, Encoder::new(1280, 720), config).unwrap();

    let card = animator.register_element("card", ElementKind::ProjectCard, 900.0, 400.0, None);
    let link = animator.register_element("card-link", ElementKind::ProjectLink, 1200.0, 20.0, Some("card"));
    let nav = animator.register_element("nav-about", ElementKind::NavLink, 0.0, 20.0, None);

    for name in ["card", "nav-about"] {
        animator.hover_enter(name);
    }
    run(&mut animator, 20);
    let mid = animator.stage().element(card).unwrap().visual;
    assert!(mid.scale > 1.0 && mid.z > 0.0);

    for name in ["card", "nav-about"] {
        animator.hover_leave(name);
    }
    run(&mut animator, 60);

    let rest = Visual::default();
    for id in [card, link, nav] {
        let v = animator.stage().element(id).unwrap().visual;
        assert!((v.scale - rest.scale).abs() < 1e-5, "{v:?}");
        assert!((v.z - rest.z).abs() < 1e-4, "{v:?}");
        assert!((v.rotation_y - rest.rotation_y).abs() < 1e-4, "{v:?}");
        assert_eq!(v.color, rest.color);
    }
    assert_eq!(animator.stage().active_tweens(), 0);
}

#[test]
fn json_override_keeps_preset_defaults() {
    let json = r#"{ "preset": "synthwave", "seed": 9, "bikes": null }"#;
    let config = SceneConfig::from_json(json).unwrap();
    let base = SceneConfig::preset(Preset::Synthwave);

    assert_eq!(config.seed, 9);
    assert!(config.bikes.is_none());
    assert_eq!(config.sun, base.sun);
    assert_eq!(config.grid, base.grid);

    let again: SceneConfig = serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
    assert_eq!(again, config);
}
