// raster.rs - Top-down plan view of encoder output
//
// Reads the same mesh and vertex records the browser host reads and
// splats them onto the x/z plane. Good enough to eyeball agent motion,
// bounds and trails without a GPU.

use glam::{Vec2, Vec3};
use image::{Rgba, RgbaImage};
use synthwave_engine::color::Rgb;
use synthwave_engine::render::{Encoder, MeshKind, MeshRecord, Vertex};
use synthwave_engine::world::Bounds;

pub struct Plan {
    img: RgbaImage,
    min: Vec2,
    max: Vec2,
}

impl Plan {
    pub fn new(size: u32, bounds: Bounds, clear: Rgb) -> Self {
        let bg = Rgba([to_u8(clear.r), to_u8(clear.g), to_u8(clear.b), 255]);
        Self {
            img: RgbaImage::from_pixel(size, size, bg),
            min: Vec2::new(bounds.min.x, bounds.min.z),
            max: Vec2::new(bounds.max.x, bounds.max.z),
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.img
    }

    pub fn draw(&mut self, enc: &Encoder) {
        let verts = enc.vertices();
        for m in enc.meshes() {
            let start = m.vertex_offset as usize;
            let end = (start + m.vertex_count as usize).min(verts.len());
            let run = &verts[start.min(end)..end];
            let color = rgb(m.color);

            match MeshKind::from_code(m.kind) {
                Some(MeshKind::GridLines) => {
                    for pair in run.chunks_exact(2) {
                        self.line(pos(&pair[0]), pos(&pair[1]), rgb(pair[0].color), m.opacity * 0.35);
                    }
                }
                Some(MeshKind::Trail) => {
                    for pair in run.windows(2) {
                        self.line(pos(&pair[0]), pos(&pair[1]), rgb(pair[1].color), pair[1].opacity);
                    }
                }
                Some(MeshKind::Bike) => self.dot(Vec3::from(m.position), 3, color, 1.0),
                Some(MeshKind::Particles) => {
                    let (s, c) = m.rotation[1].sin_cos();
                    for v in run {
                        let p = pos(v);
                        // field yaw about the y axis
                        let r = Vec3::new(p.x * c + p.z * s, p.y, -p.x * s + p.z * c);
                        self.dot(r, 0, rgb(v.color), v.opacity);
                    }
                }
                Some(MeshKind::Wave) => {
                    let radius = m.params[1] * m.scale[0];
                    self.ring(Vec3::from(m.position), radius, color, m.opacity);
                }
                Some(k) if is_shape(k) => self.shape(m, color),
                _ => {}
            }
        }
    }

    fn shape(&mut self, m: &MeshRecord, color: Rgb) {
        let p = Vec3::from(m.position);
        if m.wireframe > 0.5 {
            self.ring(p, 1.5, color, m.opacity);
        } else {
            self.dot(p, 4, color, m.opacity);
        }
    }

    fn to_px(&self, p: Vec3) -> Option<(i64, i64)> {
        let span = self.max - self.min;
        if span.x <= 0.0 || span.y <= 0.0 {
            return None;
        }
        let u = (p.x - self.min.x) / span.x;
        let v = (p.z - self.min.y) / span.y;
        let (w, h) = self.img.dimensions();
        Some(((u * (w - 1) as f32).round() as i64, (v * (h - 1) as f32).round() as i64))
    }

    fn blend(&mut self, x: i64, y: i64, color: Rgb, alpha: f32) {
        let (w, h) = self.img.dimensions();
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            return;
        }
        let a = alpha.clamp(0.0, 1.0);
        let px = self.img.get_pixel_mut(x as u32, y as u32);
        for (ch, src) in px.0.iter_mut().zip([color.r, color.g, color.b]) {
            let dst = *ch as f32 / 255.0;
            *ch = to_u8(dst * (1.0 - a) + src * a);
        }
    }

    fn line(&mut self, a: Vec3, b: Vec3, color: Rgb, alpha: f32) {
        let (Some((x0, y0)), Some((x1, y1))) = (self.to_px(a), self.to_px(b)) else {
            return;
        };
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).max(1);
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = x0 as f32 + (x1 - x0) as f32 * t;
            let y = y0 as f32 + (y1 - y0) as f32 * t;
            self.blend(x.round() as i64, y.round() as i64, color, alpha);
        }
    }

    fn dot(&mut self, p: Vec3, radius: i64, color: Rgb, alpha: f32) {
        let Some((cx, cy)) = self.to_px(p) else {
            return;
        };
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dy * dy <= radius * radius {
                    self.blend(cx + dx, cy + dy, color, alpha);
                }
            }
        }
    }

    fn ring(&mut self, center: Vec3, radius: f32, color: Rgb, alpha: f32) {
        const SEGMENTS: usize = 48;
        let point = |i: usize| {
            let a = i as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
            center + Vec3::new(a.cos() * radius, 0.0, a.sin() * radius)
        };
        for i in 0..SEGMENTS {
            self.line(point(i), point(i + 1), color, alpha);
        }
    }
}

fn is_shape(kind: MeshKind) -> bool {
    matches!(
        kind,
        MeshKind::Box | MeshKind::Sphere | MeshKind::Cone | MeshKind::Octahedron | MeshKind::Tetrahedron
    )
}

fn pos(v: &Vertex) -> Vec3 {
    Vec3::from(v.position)
}

fn rgb(c: [f32; 3]) -> Rgb {
    Rgb::new(c[0], c[1], c[2])
}

fn to_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}
