// tween/ - Page element animation
//
// Property tweens, timelines, scroll triggers and pointer parallax for
// the DOM side of the page. Ticked from the same frame loop as the 3D
// scene.

mod ease;
mod hover;
mod parallax;
mod props;
mod scroll;
mod stage;
mod timeline;
#[allow(clippy::module_inception)]
mod tween;

pub mod presets;

pub use ease::Ease;
pub use hover::HoverEffect;
pub use parallax::{Parallax, ParallaxLayer};
pub use props::{Channel, Props, Visual};
pub use scroll::{Scrub, ScrollTrigger};
pub use stage::{Element, ElementId, ElementKind, Stage};
pub use timeline::{Position, Timeline};
pub use tween::{Repeat, Tween, TweenSpec};
