use crate::version::FormatVersion;

/// Byte width of the model name field in the header.
pub const MODEL_NAME_LEN: usize = 8;
/// Byte width of a sub-object name field.
pub const OBJECT_NAME_LEN: usize = 8;
/// Byte width of a material name field.
pub const MATERIAL_NAME_LEN: usize = 16;

/// 2D texture coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub u: f32,
    pub v: f32,
}

/// 3D point or direction. The codec only stores these; it owns no math.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// 4×4 transform, row-major.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4(pub [f32; 16]);

impl Mat4 {
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Polygon shading type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonKind {
    /// Textured: vertex-index triples carry a meaningful UV index.
    Textured = 0,
    /// Flat-colored: no UV indices are stored.
    Flat = 1,
}

/// Sub-object joint type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointType {
    Static = 0,
    /// Animatable: `joint_index` and `transform` are meaningful.
    Jointed = 1,
}

/// Material type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialKind {
    /// `name` is conventionally a texture filename.
    Texture = 0,
    /// `color` and `palette_index` are meaningful.
    Flat = 1,
}

/// One vertex of a polygon: indices into the shared vertex pools.
/// `uv_index` is meaningful only for textured polygons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VertexIndices {
    pub position_index: u32,
    pub normal_index: u32,
    pub uv_index: u32,
}

/// A polygon record. Variable length on disk: a fixed prefix followed by
/// `vertex_indices.len()` index triples (pairs for flat polygons).
#[derive(Debug, Clone, PartialEq)]
pub struct ModelPolygon {
    pub id: u16,
    /// Material-association key, matched against [`ModelMaterial::slot`].
    pub data: u16,
    pub kind: PolygonKind,
    /// Shade with per-vertex normals instead of the face normal.
    pub use_vertex_normals: bool,
    /// Index into [`ModelFile::face_normals`].
    pub normal_index: u16,
    pub vertex_indices: Vec<VertexIndices>,
}

/// A sub-object record. Child/sibling links are positional indices into
/// [`ModelFile::objects`] (-1 = none), forming a first-child/next-sibling
/// tree over the flat array. The raw indices are stored as parsed; tree
/// interpretation is layered on top (see the `hierarchy` module).
#[derive(Debug, Clone, PartialEq)]
pub struct ModelObject {
    pub name: String,
    pub joint_type: JointType,
    /// Index into an external skeleton definition, -1 if none.
    pub joint_index: i32,
    pub child_object_index: i32,
    pub sibling_object_index: i32,
    /// Meaningful only when `joint_type` is [`JointType::Jointed`].
    pub transform: Mat4,
    /// Contiguous range of [`ModelFile::vertex_positions`] owned by this object.
    pub vertex_start: u32,
    pub vertex_count: u32,
    /// Contiguous range of [`ModelFile::vhots`] owned by this object.
    pub vhot_start: u32,
    pub vhot_count: u32,
}

/// A named attachment point, partitioned per sub-object via
/// [`ModelObject::vhot_start`]/`vhot_count`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelVHot {
    /// Type tag; the display name is derived from it.
    pub id: i32,
    pub position: Vec3,
}

impl ModelVHot {
    /// Display name for UI layers.
    pub fn display_name(&self) -> String {
        format!("vhot {}", self.id)
    }
}

/// A material record. `transparency` and `self_illumination` are stored in
/// the auxiliary table present only at version >= 4; for older files they
/// default to 0.0 and are not written back.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMaterial {
    pub name: String,
    pub kind: MaterialKind,
    /// Grouping key referenced by polygons via [`ModelPolygon::data`].
    /// Not necessarily dense, contiguous, or orderly.
    pub slot: u8,
    /// RGBA, used only for flat-color materials.
    pub color: [u8; 4],
    /// Used only for flat-color materials in older formats.
    pub palette_index: u16,
    pub transparency: f32,
    pub self_illumination: f32,
}

impl ModelMaterial {
    /// Fallback for polygons whose `data` slot has no material record.
    pub fn default_for_slot(slot: u8) -> Self {
        Self {
            name: String::new(),
            kind: MaterialKind::Flat,
            slot,
            color: [0x80, 0x80, 0x80, 0xff],
            palette_index: 0,
            transparency: 0.0,
            self_illumination: 0.0,
        }
    }
}

/// The parsed model document. Created whole by [`ModelFile::parse`], mutated
/// in place by editing operations, re-serialized by [`ModelFile::write`].
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFile {
    /// Display-only identifier.
    pub name: String,
    pub version: FormatVersion,
    /// Bounding-sphere radius.
    pub radius: f32,
    pub center: Vec3,
    pub min_bounds: Vec3,
    pub max_bounds: Vec3,
    pub vertex_positions: Vec<Vec3>,
    pub vertex_normals: Vec<Vec3>,
    pub vertex_uvs: Vec<Vec2>,
    /// One per polygon, the flat-shading fallback.
    pub face_normals: Vec<Vec3>,
    pub polygons: Vec<ModelPolygon>,
    pub objects: Vec<ModelObject>,
    pub vhots: Vec<ModelVHot>,
    pub materials: Vec<ModelMaterial>,
}

impl ModelFile {
    /// Find the material for a polygon's `data` slot key. Slots are not
    /// guaranteed dense or unique-ordered; the first match wins. A missing
    /// slot is routine — callers fall back to
    /// [`ModelMaterial::default_for_slot`].
    pub fn material_for_slot(&self, slot: u8) -> Option<&ModelMaterial> {
        self.materials.iter().find(|m| m.slot == slot)
    }

    /// Index of the sub-object whose vertex range contains `position_index`.
    /// A polygon belongs to the object that owns its first vertex.
    pub fn object_for_position(&self, position_index: u32) -> Option<usize> {
        self.objects.iter().position(|o| {
            position_index >= o.vertex_start && position_index < o.vertex_start + o.vertex_count
        })
    }

    /// VHots belonging to the sub-object at `object_index`. A missing
    /// object or an edited-out-of-range vhot span yields an empty slice.
    pub fn vhots_for_object(&self, object_index: usize) -> &[ModelVHot] {
        let Some(obj) = self.objects.get(object_index) else {
            return &[];
        };
        let start = obj.vhot_start as usize;
        let end = start.saturating_add(obj.vhot_count as usize);
        self.vhots.get(start..end).unwrap_or(&[])
    }
}

impl PolygonKind {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Textured),
            1 => Some(Self::Flat),
            _ => None,
        }
    }
}

impl JointType {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Static),
            1 => Some(Self::Jointed),
            _ => None,
        }
    }
}

impl MaterialKind {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Texture),
            1 => Some(Self::Flat),
            _ => None,
        }
    }
}
