// props.rs - Animatable element properties
//
// A Visual is the full state of one page element as the host applies it.
// Props is a sparse subset of it: the values a tween moves toward.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    Opacity,
    Scale,
    X,
    Y,
    Z,
    Rotation,
    RotationY,
    Glow,
}

impl Channel {
    pub const ALL: [Channel; 8] = [
        Channel::Opacity,
        Channel::Scale,
        Channel::X,
        Channel::Y,
        Channel::Z,
        Channel::Rotation,
        Channel::RotationY,
        Channel::Glow,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Rendered state of one element. Rotations are in degrees, offsets in px.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Visual {
    pub opacity: f32,
    pub scale: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation: f32,
    pub rotation_y: f32,
    pub glow: f32,
    pub color: Rgb,
}

impl Default for Visual {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            scale: 1.0,
            x: 0.0,
            y: 0.0,
            z: 0.0,
            rotation: 0.0,
            rotation_y: 0.0,
            glow: 0.0,
            color: Rgb::WHITE,
        }
    }
}

impl Visual {
    pub fn get(&self, ch: Channel) -> f32 {
        match ch {
            Channel::Opacity => self.opacity,
            Channel::Scale => self.scale,
            Channel::X => self.x,
            Channel::Y => self.y,
            Channel::Z => self.z,
            Channel::Rotation => self.rotation,
            Channel::RotationY => self.rotation_y,
            Channel::Glow => self.glow,
        }
    }

    pub fn set(&mut self, ch: Channel, v: f32) {
        let slot = match ch {
            Channel::Opacity => &mut self.opacity,
            Channel::Scale => &mut self.scale,
            Channel::X => &mut self.x,
            Channel::Y => &mut self.y,
            Channel::Z => &mut self.z,
            Channel::Rotation => &mut self.rotation,
            Channel::RotationY => &mut self.rotation_y,
            Channel::Glow => &mut self.glow,
        };
        *slot = v;
    }
}

/// Sparse set of property values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Props {
    values: [Option<f32>; 8],
    color: Option<Rgb>,
}

impl Props {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opacity(self, v: f32) -> Self {
        self.with(Channel::Opacity, v)
    }

    pub fn scale(self, v: f32) -> Self {
        self.with(Channel::Scale, v)
    }

    pub fn x(self, v: f32) -> Self {
        self.with(Channel::X, v)
    }

    pub fn y(self, v: f32) -> Self {
        self.with(Channel::Y, v)
    }

    pub fn z(self, v: f32) -> Self {
        self.with(Channel::Z, v)
    }

    pub fn rotation(self, v: f32) -> Self {
        self.with(Channel::Rotation, v)
    }

    pub fn rotation_y(self, v: f32) -> Self {
        self.with(Channel::RotationY, v)
    }

    pub fn glow(self, v: f32) -> Self {
        self.with(Channel::Glow, v)
    }

    pub fn color(mut self, hex: u32) -> Self {
        self.color = Some(Rgb::from_hex(hex));
        self
    }

    pub fn with(mut self, ch: Channel, v: f32) -> Self {
        self.values[ch.index()] = Some(v);
        self
    }

    pub fn get(&self, ch: Channel) -> Option<f32> {
        self.values[ch.index()]
    }

    pub fn get_color(&self) -> Option<Rgb> {
        self.color
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.values.iter().all(Option::is_none)
    }

    /// Channels present, with their values.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, f32)> + '_ {
        Channel::ALL.into_iter().filter_map(|ch| self.get(ch).map(|v| (ch, v)))
    }

    /// True when both sets animate at least one common property.
    pub fn overlaps(&self, other: &Props) -> bool {
        (self.color.is_some() && other.color.is_some())
            || Channel::ALL.iter().any(|&ch| self.get(ch).is_some() && other.get(ch).is_some())
    }

    /// Copy of `self` with every property of `other` removed.
    pub fn without(&self, other: &Props) -> Props {
        let mut out = *self;
        for ch in Channel::ALL {
            if other.get(ch).is_some() {
                out.values[ch.index()] = None;
            }
        }
        if other.color.is_some() {
            out.color = None;
        }
        out
    }

    /// Values `visual` currently has for the properties in `self`.
    pub fn capture(&self, visual: &Visual) -> Props {
        let mut out = Props::new();
        for (ch, _) in self.iter() {
            out = out.with(ch, visual.get(ch));
        }
        out.color = self.color.map(|_| visual.color);
        out
    }

    /// `self + delta` per channel; color is taken from `delta` as is.
    pub fn offset(&self, delta: &Props) -> Props {
        let mut out = *delta;
        for (ch, d) in delta.iter() {
            out.values[ch.index()] = Some(self.get(ch).unwrap_or(0.0) + d);
        }
        out
    }

    pub fn apply(&self, visual: &mut Visual) {
        for (ch, v) in self.iter() {
            visual.set(ch, v);
        }
        if let Some(c) = self.color {
            visual.color = c;
        }
    }

    /// Write the blend of `from` and `to` at `t` into `visual`, for the
    /// properties of `to`.
    pub fn blend(from: &Props, to: &Props, t: f32, visual: &mut Visual) {
        for (ch, b) in to.iter() {
            let a = from.get(ch).unwrap_or(b);
            visual.set(ch, a * (1.0 - t) + b * t);
        }
        if let Some(b) = to.color {
            let a = from.color.unwrap_or(b);
            visual.color = a.lerp(b, t);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_and_strip() {
        let a = Props::new().scale(1.1).color(0x00ffff);
        let b = Props::new().scale(1.0).rotation(5.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&Props::new().opacity(1.0)));

        let stripped = a.without(&b);
        assert_eq!(stripped.get(Channel::Scale), None);
        assert_eq!(stripped.get_color(), Some(Rgb::from_hex(0x00ffff)));
        assert!(a.without(&a).is_empty());
    }

    #[test]
    fn capture_reads_only_requested_channels() {
        let mut v = Visual::default();
        v.y = 50.0;
        let got = Props::new().y(0.0).opacity(1.0).capture(&v);
        assert_eq!(got.get(Channel::Y), Some(50.0));
        assert_eq!(got.get(Channel::Opacity), Some(1.0));
        assert_eq!(got.get(Channel::Scale), None);
    }

    #[test]
    fn blend_ends_exactly_on_target() {
        let from = Props::new().scale(1.0).x(3.3).color(0xffffff);
        let to = Props::new().scale(1.1).x(-7.7).color(0x00ffff);
        let mut v = Visual::default();
        Props::blend(&from, &to, 1.0, &mut v);
        assert_eq!(v.scale, 1.1);
        assert_eq!(v.x, -7.7);
        assert_eq!(v.color, Rgb::from_hex(0x00ffff));
    }

    #[test]
    fn offset_adds_per_channel() {
        let base = Props::new().y(10.0);
        let moved = base.offset(&Props::new().y(20.0).x(5.0));
        assert_eq!(moved.get(Channel::Y), Some(30.0));
        assert_eq!(moved.get(Channel::X), Some(5.0));
    }
}
