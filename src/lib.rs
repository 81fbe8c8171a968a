use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

// ============================================================================
// SYNTHWAVE WORLD - Decorative page animator: 3D scene + element tweens
// ============================================================================

pub mod animator;
pub mod color;
pub mod config;
pub mod error;
pub mod frame;
pub mod input;
pub mod render;
pub mod sim;
pub mod tween;
pub mod world;

pub use animator::{Animator, Host};
pub use config::{Preset, SceneConfig};
pub use error::{EngineError, EngineResult};
pub use frame::{FrameClock, FrameLoop, Tick};
pub use input::{Pointer, Viewport};
pub use render::{Encoder, RenderBackend};
pub use sim::Scene;
pub use tween::{ElementKind, Stage};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console, js_name = error)]
    fn console_error(msg: &str);
}

fn report(err: &EngineError) {
    #[cfg(target_arch = "wasm32")]
    console_error(&format!("synthwave: {err}"));
    #[cfg(not(target_arch = "wasm32"))]
    let _ = err;
}

/// Page lookups through `document.getElementById`.
struct DomHost {
    width: u32,
    height: u32,
}

impl Host for DomHost {
    fn has_element(&self, id: &str) -> bool {
        let Ok(document) = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("document")) else {
            return false;
        };
        let Ok(lookup) = js_sys::Reflect::get(&document, &JsValue::from_str("getElementById")) else {
            return false;
        };
        let Ok(lookup) = lookup.dyn_into::<js_sys::Function>() else {
            return false;
        };
        lookup
            .call1(&document, &JsValue::from_str(id))
            .map(|el| !el.is_null() && !el.is_undefined())
            .unwrap_or(false)
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(self.width, self.height)
    }
}

#[wasm_bindgen]
pub struct SynthwaveWorld {
    animator: Animator<Encoder>,
    frames: FrameLoop,
}

#[wasm_bindgen]
impl SynthwaveWorld {
    /// `config_json` overrides the preset it names (holographic floor by
    /// default). Fails if the canvas is not on the page.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, w: u32, h: u32, config_json: Option<String>) -> Result<SynthwaveWorld, JsError> {
        let config = match config_json.as_deref() {
            Some(json) => SceneConfig::from_json(json),
            None => Ok(SceneConfig::default()),
        };
        let world = config
            .map(|mut c| {
                c.canvas_id = canvas_id.to_string();
                c
            })
            .and_then(|c| Animator::setup(&DomHost { width: w, height: h }, Encoder::new(w, h), c));

        match world {
            Ok(animator) => Ok(Self { animator, frames: FrameLoop::new() }),
            Err(err) => {
                report(&err);
                Err(err.into())
            }
        }
    }

    /// Advance by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.animator.tick(dt);
    }

    /// Advance from a requestAnimationFrame timestamp. Returns whether the
    /// host should request another frame.
    pub fn frame(&mut self, now_ms: f64) -> bool {
        self.frames.frame(&mut self.animator, now_ms)
    }

    pub fn stop(&mut self) {
        self.frames.stop();
    }

    pub fn resume(&mut self) {
        if self.animator.is_live() {
            self.frames.resume();
        }
    }

    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) {
        self.animator.pointer_move(client_x, client_y);
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        self.animator.resize(w, h);
    }

    pub fn scroll(&mut self, scroll_y: f32) {
        self.animator.scroll(scroll_y);
    }

    /// Register a DOM element for tweening. Returns its record index.
    pub fn register_element(&mut self, name: &str, kind: &str, top: f32, height: f32, parent: Option<String>) -> Result<u32, JsError> {
        let kind: ElementKind = kind.parse()?;
        let id = self.animator.register_element(name, kind, top, height, parent.as_deref());
        Ok(id.index() as u32)
    }

    pub fn hover_enter(&mut self, name: &str) {
        self.animator.hover_enter(name);
    }

    pub fn hover_leave(&mut self, name: &str) {
        self.animator.hover_leave(name);
    }

    pub fn start_page_effects(&mut self) {
        self.animator.start_page_effects();
    }

    /// Stop the loop and release every mesh.
    pub fn destroy(&mut self) {
        self.frames.stop();
        self.animator.teardown();
    }

    pub fn agent_count(&self) -> usize { self.animator.scene().agent_count() }
    pub fn time(&self) -> f32 { self.animator.scene().time() }

    pub fn meshes_ptr(&self) -> *const f32 { self.animator.backend().meshes_ptr() }
    pub fn meshes_len(&self) -> usize { self.animator.backend().meshes_len() }
    pub fn vertices_ptr(&self) -> *const f32 { self.animator.backend().vertices_ptr() }
    pub fn vertices_len(&self) -> usize { self.animator.backend().vertices_len() }
    pub fn view_ptr(&self) -> *const f32 { self.animator.backend().view_ptr() }
    pub fn view_len(&self) -> usize { self.animator.backend().view_len() }
    pub fn elements_ptr(&self) -> *const f32 { self.animator.backend().elements_ptr() }
    pub fn elements_len(&self) -> usize { self.animator.backend().elements_len() }
}
