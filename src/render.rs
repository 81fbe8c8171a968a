// render.rs - Render backend seam and the host buffer encoder
//
// The animator never draws. It registers meshes with a backend, pushes
// per-frame instance state, and submits a view. The Encoder backend packs
// all of it into flat f32 buffers the JS host reads through pointers:
//
//   meshes    MeshRecord per live mesh, ascending id
//   vertices  Vertex runs referenced by (vertex_offset, vertex_count)
//   view      one ViewRecord (camera, fog, lights, viewport, clock)
//   elements  ElementRecord per registered page element

use std::collections::BTreeMap;

use bytemuck::{cast_slice, Pod, Zeroable};
use glam::Vec3;
use tracing::{debug, warn};

use crate::color::Rgb;
use crate::config::ShapeKind;
use crate::sim::Scene;
use crate::tween::{ElementId, Visual};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

/// Geometry family; the host builds the actual primitive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum MeshKind {
    GridLines = 0,
    Floor = 1,
    Mountain = 2,
    PalmTree = 3,
    Bike = 4,
    Trail = 5,
    Box = 6,
    Sphere = 7,
    Cone = 8,
    Octahedron = 9,
    Tetrahedron = 10,
    Particles = 11,
    Wave = 12,
    SunDisc = 13,
    SunRing = 14,
    Scanlines = 15,
}

impl MeshKind {
    const ALL: [MeshKind; 16] = [
        MeshKind::GridLines,
        MeshKind::Floor,
        MeshKind::Mountain,
        MeshKind::PalmTree,
        MeshKind::Bike,
        MeshKind::Trail,
        MeshKind::Box,
        MeshKind::Sphere,
        MeshKind::Cone,
        MeshKind::Octahedron,
        MeshKind::Tetrahedron,
        MeshKind::Particles,
        MeshKind::Wave,
        MeshKind::SunDisc,
        MeshKind::SunRing,
        MeshKind::Scanlines,
    ];

    /// Inverse of the `kind` field of a [`MeshRecord`].
    pub fn from_code(code: f32) -> Option<Self> {
        Self::ALL.into_iter().find(|&k| k as u8 as f32 == code)
    }
}

impl From<ShapeKind> for MeshKind {
    fn from(kind: ShapeKind) -> Self {
        match kind {
            ShapeKind::Box => MeshKind::Box,
            ShapeKind::Sphere => MeshKind::Sphere,
            ShapeKind::Cone => MeshKind::Cone,
            ShapeKind::Octahedron => MeshKind::Octahedron,
            ShapeKind::Tetrahedron => MeshKind::Tetrahedron,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeshDesc {
    pub kind: MeshKind,
    pub wireframe: bool,
    /// Kind-specific sizes (radius, height, segments, ...).
    pub params: [f32; 4],
    /// Static geometry, if the kind needs explicit points.
    pub vertices: Vec<Vertex>,
}

impl MeshDesc {
    pub fn new(kind: MeshKind) -> Self {
        Self { kind, wireframe: false, params: [0.0; 4], vertices: Vec::new() }
    }

    pub fn wireframe(mut self, on: bool) -> Self {
        self.wireframe = on;
        self
    }

    pub fn params(mut self, params: [f32; 4]) -> Self {
        self.params = params;
        self
    }

    pub fn vertices(mut self, vertices: Vec<Vertex>) -> Self {
        self.vertices = vertices;
        self
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub opacity: f32,
}

impl Vertex {
    pub fn new(position: Vec3, color: Rgb, opacity: f32) -> Self {
        Self { position: position.to_array(), color: color.to_array(), opacity }
    }
}

/// Per-frame transform and material state of one mesh.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Instance {
    pub position: Vec3,
    /// Euler angles, radians.
    pub rotation: Vec3,
    pub scale: Vec3,
    pub color: Rgb,
    pub opacity: f32,
    pub emissive: f32,
}

impl Default for Instance {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
            color: Rgb::WHITE,
            opacity: 1.0,
            emissive: 0.0,
        }
    }
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct MeshRecord {
    pub id: f32,
    pub kind: f32,
    pub wireframe: f32,
    pub vertex_offset: f32,
    pub vertex_count: f32,
    pub params: [f32; 4],
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    pub color: [f32; 3],
    pub opacity: f32,
    pub emissive: f32,
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ViewRecord {
    pub camera_position: [f32; 3],
    pub look_at: [f32; 3],
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub fog_color: [f32; 3],
    pub fog_near: f32,
    pub fog_far: f32,
    pub clear_color: [f32; 3],
    pub clear_alpha: f32,
    pub ambient_color: [f32; 3],
    pub ambient_intensity: f32,
    pub light_color: [f32; 3],
    pub light_intensity: f32,
    pub light_distance: f32,
    pub light_position: [f32; 3],
    pub width: f32,
    pub height: f32,
    pub time: f32,
}

impl ViewRecord {
    pub fn from_scene(scene: &Scene) -> Self {
        let cam = &scene.camera;
        let amb = &scene.ambient;
        let vp = scene.viewport();
        Self {
            camera_position: cam.position.to_array(),
            look_at: cam.look_at.to_array(),
            fov: cam.fov,
            aspect: cam.aspect,
            near: cam.near,
            far: cam.far,
            fog_color: amb.fog_color.to_array(),
            fog_near: amb.fog_near,
            fog_far: amb.fog_far,
            clear_color: amb.clear_color.to_array(),
            clear_alpha: amb.clear_alpha,
            ambient_color: amb.light_color.to_array(),
            ambient_intensity: amb.light_intensity,
            light_color: scene.light.color.to_array(),
            light_intensity: scene.light.intensity,
            light_distance: scene.light.distance,
            light_position: scene.light.position.to_array(),
            width: vp.width,
            height: vp.height,
            time: scene.time(),
        }
    }
}

/// Page element state as the host applies it (CSS transform, color,
/// glow). Rotations in degrees.
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ElementRecord {
    pub id: f32,
    pub opacity: f32,
    pub scale: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation: f32,
    pub rotation_y: f32,
    pub glow: f32,
    pub color: [f32; 3],
}

impl ElementRecord {
    pub fn new(id: ElementId, v: &Visual) -> Self {
        Self {
            id: id.index() as f32,
            opacity: v.opacity,
            scale: v.scale,
            x: v.x,
            y: v.y,
            z: v.z,
            rotation: v.rotation,
            rotation_y: v.rotation_y,
            glow: v.glow,
            color: v.color.to_array(),
        }
    }
}

/// Something that can hold meshes and present a frame.
pub trait RenderBackend {
    fn create(&mut self, desc: MeshDesc) -> MeshId;

    fn update(&mut self, id: MeshId, instance: Instance);

    /// Replace the dynamic geometry of a mesh (trails, particle fields).
    fn update_vertices(&mut self, id: MeshId, vertices: &[Vertex]);

    fn begin_frame(&mut self) {}

    fn submit(&mut self, view: &ViewRecord);

    fn release(&mut self, id: MeshId);

    fn resize(&mut self, width: u32, height: u32);

    fn update_elements(&mut self, _elements: &[ElementRecord]) {}

    /// Meshes created and not yet released.
    fn live_resources(&self) -> usize;
}

impl<T: RenderBackend + ?Sized> RenderBackend for &mut T {
    fn create(&mut self, desc: MeshDesc) -> MeshId {
        (**self).create(desc)
    }

    fn update(&mut self, id: MeshId, instance: Instance) {
        (**self).update(id, instance)
    }

    fn update_vertices(&mut self, id: MeshId, vertices: &[Vertex]) {
        (**self).update_vertices(id, vertices)
    }

    fn begin_frame(&mut self) {
        (**self).begin_frame()
    }

    fn submit(&mut self, view: &ViewRecord) {
        (**self).submit(view)
    }

    fn release(&mut self, id: MeshId) {
        (**self).release(id)
    }

    fn resize(&mut self, width: u32, height: u32) {
        (**self).resize(width, height)
    }

    fn update_elements(&mut self, elements: &[ElementRecord]) {
        (**self).update_elements(elements)
    }

    fn live_resources(&self) -> usize {
        (**self).live_resources()
    }
}

struct Slot {
    desc: MeshDesc,
    instance: Instance,
    dynamic: Vec<Vertex>,
}

/// Flat-buffer backend read by the browser host.
#[derive(Default)]
pub struct Encoder {
    slots: BTreeMap<MeshId, Slot>,
    next_id: u32,

    meshes: Vec<MeshRecord>,
    vertices: Vec<Vertex>,
    view: ViewRecord,
    elements: Vec<ElementRecord>,

    width: u32,
    height: u32,
    frames: u64,
}

impl Encoder {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, ..Self::default() }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn meshes(&self) -> &[MeshRecord] {
        &self.meshes
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn view(&self) -> &ViewRecord {
        &self.view
    }

    pub fn elements(&self) -> &[ElementRecord] {
        &self.elements
    }

    pub fn meshes_ptr(&self) -> *const f32 {
        cast_slice::<MeshRecord, f32>(&self.meshes).as_ptr()
    }

    /// Length in f32s.
    pub fn meshes_len(&self) -> usize {
        self.meshes.len() * MESH_FLOATS
    }

    pub fn vertices_ptr(&self) -> *const f32 {
        cast_slice::<Vertex, f32>(&self.vertices).as_ptr()
    }

    pub fn vertices_len(&self) -> usize {
        self.vertices.len() * VERTEX_FLOATS
    }

    pub fn view_ptr(&self) -> *const f32 {
        cast_slice::<ViewRecord, f32>(std::slice::from_ref(&self.view)).as_ptr()
    }

    pub fn view_len(&self) -> usize {
        VIEW_FLOATS
    }

    pub fn elements_ptr(&self) -> *const f32 {
        cast_slice::<ElementRecord, f32>(&self.elements).as_ptr()
    }

    pub fn elements_len(&self) -> usize {
        self.elements.len() * ELEMENT_FLOATS
    }

    fn encode_meshes(&mut self) {
        self.meshes.clear();
        self.vertices.clear();

        for (id, slot) in &self.slots {
            let offset = self.vertices.len();
            self.vertices.extend_from_slice(&slot.desc.vertices);
            self.vertices.extend_from_slice(&slot.dynamic);
            let count = self.vertices.len() - offset;

            let i = &slot.instance;
            self.meshes.push(MeshRecord {
                id: id.0 as f32,
                kind: slot.desc.kind as u8 as f32,
                wireframe: if slot.desc.wireframe { 1.0 } else { 0.0 },
                vertex_offset: offset as f32,
                vertex_count: count as f32,
                params: slot.desc.params,
                position: i.position.to_array(),
                rotation: i.rotation.to_array(),
                scale: i.scale.to_array(),
                color: i.color.to_array(),
                opacity: i.opacity,
                emissive: i.emissive,
            });
        }
    }
}

pub const MESH_FLOATS: usize = std::mem::size_of::<MeshRecord>() / 4;
pub const VERTEX_FLOATS: usize = std::mem::size_of::<Vertex>() / 4;
pub const VIEW_FLOATS: usize = std::mem::size_of::<ViewRecord>() / 4;
pub const ELEMENT_FLOATS: usize = std::mem::size_of::<ElementRecord>() / 4;

impl RenderBackend for Encoder {
    fn create(&mut self, desc: MeshDesc) -> MeshId {
        let id = MeshId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.slots.insert(id, Slot { desc, instance: Instance::default(), dynamic: Vec::new() });
        id
    }

    fn update(&mut self, id: MeshId, instance: Instance) {
        match self.slots.get_mut(&id) {
            Some(slot) => slot.instance = instance,
            None => warn!(?id, "update on released mesh"),
        }
    }

    fn update_vertices(&mut self, id: MeshId, vertices: &[Vertex]) {
        match self.slots.get_mut(&id) {
            Some(slot) => {
                slot.dynamic.clear();
                slot.dynamic.extend_from_slice(vertices);
            }
            None => warn!(?id, "vertex update on released mesh"),
        }
    }

    fn begin_frame(&mut self) {
        self.frames += 1;
    }

    fn submit(&mut self, view: &ViewRecord) {
        self.view = *view;
        self.encode_meshes();
    }

    fn release(&mut self, id: MeshId) {
        if self.slots.remove(&id).is_none() {
            debug!(?id, "mesh already released");
        }
        if self.slots.is_empty() {
            self.meshes.clear();
            self.vertices.clear();
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn update_elements(&mut self, elements: &[ElementRecord]) {
        self.elements.clear();
        self.elements.extend_from_slice(elements);
    }

    fn live_resources(&self) -> usize {
        self.slots.len()
    }
}
