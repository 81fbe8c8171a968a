// presets.rs - The page's stock animations
//
// Everything here only looks elements up by kind, so a page that lacks
// some of them simply gets fewer tweens.

use rand::Rng;
use tracing::debug;

use super::ease::Ease;
use super::props::{Channel, Props};
use super::stage::{ElementKind, Stage};
use super::timeline::{Position, Timeline};
use super::tween::{Repeat, TweenSpec};

/// Overlap of each hero text line with the one before it.
const TEXT_OVERLAP: [f32; 3] = [0.0, -0.5, -0.4];

/// Load-time entrance: page fade, hero copy, CTA, shapes, particles.
pub fn hero_entrance(stage: &mut Stage) {
    let texts = stage.of_kind(ElementKind::HeroText);
    let cta = stage.of_kind(ElementKind::CtaButton);
    let shapes = stage.of_kind(ElementKind::HeroShape);
    let particles = stage.of_kind(ElementKind::HeroParticle);

    for &id in texts.iter().chain(&cta) {
        stage.set(id, Props::new().opacity(0.0).y(50.0));
    }
    for &id in &shapes {
        stage.set(id, Props::new().scale(0.0).rotation(0.0));
    }
    for &id in &particles {
        stage.set(id, Props::new().opacity(0.0));
    }

    let rise = Props::new().opacity(1.0).y(0.0);
    let mut tl = Timeline::new();
    for (i, &id) in texts.iter().enumerate() {
        let (duration, at) = match i {
            0 => (1.0, Position::AfterPrevious),
            _ => (0.8, Position::Offset(TEXT_OVERLAP.get(i).copied().unwrap_or(-0.4))),
        };
        tl = tl.add(&[id], TweenSpec::to(rise).duration(duration).ease(Ease::PowerOut(3)), at);
    }
    tl = tl
        .add(&cta, TweenSpec::to(rise).duration(0.8).ease(Ease::BackOut(1.7)), Position::Offset(-0.3))
        .add_staggered(
            &shapes,
            TweenSpec::to(Props::new().scale(1.0).rotation(360.0)).duration(1.5).ease(Ease::PowerOut(2)),
            0.2,
            Position::Offset(-1.0),
        )
        .add_staggered(&particles, TweenSpec::to(Props::new().opacity(1.0)), 0.1, Position::Offset(-1.0));

    debug!(duration = tl.duration(), "hero entrance");
    stage.play(tl);

    for id in stage.of_kind(ElementKind::Page) {
        let fade = TweenSpec::from_to(Props::new().opacity(0.0), Props::new().opacity(1.0));
        stage.to(id, fade.duration(0.5).ease(Ease::PowerOut(2)));
    }
}

/// Scroll-triggered reveals plus the hero shapes' scroll parallax.
pub fn scroll_reveals(stage: &mut Stage) {
    for id in stage.of_kind(ElementKind::Section) {
        let spec = TweenSpec::from_to(Props::new().opacity(0.0).y(100.0), Props::new().opacity(1.0).y(0.0));
        stage.reveal(id, spec.duration(1.0).ease(Ease::PowerOut(3)), 0.8);
    }

    for id in stage.of_kind(ElementKind::SkillTag) {
        let spec = TweenSpec::from_to(Props::new().scale(0.0).rotation(-180.0), Props::new().scale(1.0).rotation(0.0));
        stage.reveal(id, spec.duration(0.6).ease(Ease::BackOut(1.7)), 0.9);
    }

    for id in stage.of_kind(ElementKind::ProjectCard) {
        let spec = TweenSpec::from_to(
            Props::new().opacity(0.0).scale(0.8).rotation_y(-45.0),
            Props::new().opacity(1.0).scale(1.0).rotation_y(0.0),
        );
        stage.reveal(id, spec.duration(1.0).ease(Ease::PowerOut(3)), 0.85);
    }

    let hero = stage.of_kind(ElementKind::Hero).first().and_then(|&id| stage.element(id)).map(|h| (h.top, h.top + h.height));
    if let Some(range) = hero {
        for id in stage.of_kind(ElementKind::HeroShape) {
            stage.scrub(id, Channel::Y, -100.0, range);
        }
    }
}

/// Endless ambient motion for background and hero decorations.
pub fn background_loops(stage: &mut Stage, rng: &mut impl Rng) {
    let linear = |to: Props, secs: f32| TweenSpec::to(to).duration(secs).ease(Ease::Linear).repeat(Repeat::Forever);
    let height = stage.viewport().height;

    for (i, id) in stage.of_kind(ElementKind::BgShape).into_iter().enumerate() {
        let i = i as f32;
        stage.set(id, Props::new().opacity(0.8));
        stage.to(id, linear(Props::new().rotation(360.0), 15.0 + i * 2.0));
        let float = TweenSpec::to(Props::new().y(20.0))
            .relative()
            .duration(4.0 + i * 0.5)
            .ease(Ease::PowerInOut(2))
            .repeat(Repeat::Forever)
            .yoyo();
        stage.to(id, float);
    }

    for id in stage.of_kind(ElementKind::BgGrid) {
        stage.to(id, linear(Props::new().rotation(1.0), 60.0));
    }

    for (i, id) in stage.of_kind(ElementKind::BgParticle).into_iter().enumerate() {
        let x = stage.element(id).map_or(0.0, |e| e.visual.x) + rng.random_range(-50.0..=50.0);
        let to = Props::new().y(-height - 50.0).x(x).rotation(360.0);
        stage.to(id, linear(to, 10.0 + rng.random::<f32>() * 5.0).delay(i as f32 * 0.8));
    }

    for (i, id) in stage.of_kind(ElementKind::HeroShape).into_iter().enumerate() {
        stage.to(id, linear(Props::new().rotation(360.0), 10.0 + i as f32 * 2.0));
    }

    for id in stage.of_kind(ElementKind::GridOverlay) {
        let pulse = TweenSpec::to(Props::new().opacity(0.8))
            .duration(2.0)
            .ease(Ease::PowerInOut(2))
            .repeat(Repeat::Forever)
            .yoyo();
        stage.to(id, pulse);
    }

    for (i, id) in stage.of_kind(ElementKind::HeroParticle).into_iter().enumerate() {
        let rise = Props::new().y(-height - 100.0);
        stage.to(id, linear(rise, 8.0 + rng.random::<f32>() * 4.0).delay(i as f32 * 0.8));
    }
}
