// hover.rs - Hover micro-interactions per element kind

use super::ease::Ease;
use super::props::Props;
use super::stage::ElementKind;
use super::tween::TweenSpec;

const CYAN: u32 = 0x00ffff;
const WHITE: u32 = 0xffffff;

pub struct HoverEffect {
    pub spec: TweenSpec,
    /// Tween for child links, and the stagger between them.
    pub children: Option<(TweenSpec, f32)>,
}

impl HoverEffect {
    fn single(spec: TweenSpec) -> Self {
        Self { spec, children: None }
    }
}

pub fn enter(kind: ElementKind) -> Option<HoverEffect> {
    let quick = |to: Props| TweenSpec::to(to).duration(0.3).ease(Ease::PowerOut(2));

    let effect = match kind {
        ElementKind::NavLink => HoverEffect::single(quick(Props::new().scale(1.1).color(CYAN))),
        ElementKind::ProjectCard => HoverEffect {
            spec: TweenSpec::to(Props::new().scale(1.05).rotation_y(5.0).z(50.0))
                .duration(0.4)
                .ease(Ease::PowerOut(2)),
            children: Some((
                TweenSpec::to(Props::new().scale(1.1)).duration(0.3).ease(Ease::BackOut(1.7)),
                0.05,
            )),
        },
        ElementKind::SkillTag => HoverEffect::single(quick(Props::new().scale(1.2).rotation(5.0)).ease(Ease::BackOut(1.7))),
        ElementKind::CtaButton => HoverEffect::single(quick(Props::new().scale(1.1).glow(1.0))),
        _ => return None,
    };
    Some(effect)
}

pub fn leave(kind: ElementKind) -> Option<HoverEffect> {
    let quick = |to: Props| TweenSpec::to(to).duration(0.3).ease(Ease::PowerOut(2));

    let effect = match kind {
        ElementKind::NavLink => HoverEffect::single(quick(Props::new().scale(1.0).color(WHITE))),
        ElementKind::ProjectCard => HoverEffect {
            spec: TweenSpec::to(Props::new().scale(1.0).rotation_y(0.0).z(0.0))
                .duration(0.4)
                .ease(Ease::PowerOut(2)),
            children: Some((quick(Props::new().scale(1.0)), 0.0)),
        },
        ElementKind::SkillTag => HoverEffect::single(quick(Props::new().scale(1.0).rotation(0.0))),
        ElementKind::CtaButton => HoverEffect::single(quick(Props::new().scale(1.0).glow(0.0))),
        _ => return None,
    };
    Some(effect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_and_leave_touch_the_same_properties() {
        for kind in [ElementKind::NavLink, ElementKind::ProjectCard, ElementKind::SkillTag, ElementKind::CtaButton] {
            let on = enter(kind).unwrap();
            let off = leave(kind).unwrap();
            assert!(on.spec.to.without(&off.spec.to).is_empty(), "{kind:?}");
            assert_eq!(on.children.is_some(), off.children.is_some());
        }
    }

    #[test]
    fn non_interactive_kinds_have_no_hover() {
        assert!(enter(ElementKind::Section).is_none());
        assert!(leave(ElementKind::BgShape).is_none());
    }
}
