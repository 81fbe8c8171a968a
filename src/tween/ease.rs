use serde::{Deserialize, Serialize};

/// Easing curves, named after the `power<N>.<dir>` family the page markup
/// uses. `Power(1)` is quadratic, `Power(2)` cubic and so on.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Ease {
    Linear,
    PowerIn(u8),
    PowerOut(u8),
    PowerInOut(u8),
    SineInOut,
    /// Overshoots the end by an amount controlled by the parameter.
    BackOut(f32),
}

impl Default for Ease {
    fn default() -> Self {
        Self::PowerOut(1)
    }
}

impl Ease {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::PowerIn(n) => t.powi(n as i32 + 1),
            Self::PowerOut(n) => 1.0 - (1.0 - t).powi(n as i32 + 1),
            Self::PowerInOut(n) => {
                let p = n as i32 + 1;
                if t < 0.5 {
                    2f32.powi(p - 1) * t.powi(p)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(p) / 2.0
                }
            }
            Self::SineInOut => -((std::f32::consts::PI * t).cos() - 1.0) / 2.0,
            Self::BackOut(s) => {
                let u = t - 1.0;
                1.0 + (s + 1.0) * u * u * u + s * u * u
            }
        }
    }

    /// Parse names like `none`, `power3.out`, `sine.inOut`, `back.out(1.7)`.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        if name == "none" || name == "linear" {
            return Some(Self::Linear);
        }

        let (family, dir) = name.split_once('.')?;
        if let Some(n) = family.strip_prefix("power") {
            let n: u8 = n.parse().ok().filter(|n| (1..=4).contains(n))?;
            return match dir {
                "in" => Some(Self::PowerIn(n)),
                "out" => Some(Self::PowerOut(n)),
                "inOut" => Some(Self::PowerInOut(n)),
                _ => None,
            };
        }

        match (family, dir) {
            ("sine", "inOut") => Some(Self::SineInOut),
            ("back", "out") => Some(Self::BackOut(1.70158)),
            ("back", d) => {
                let arg = d.strip_prefix("out(")?.strip_suffix(')')?;
                arg.parse().ok().map(Self::BackOut)
            }
            _ => None,
        }
    }
}
