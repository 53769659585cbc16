//! Layer 2/3 reader: decodes the record tables behind a parsed header into
//! a whole [`ModelFile`], validating every cross-table index before the
//! model is handed to the caller. Reading is all-or-nothing — a corrupt
//! table fails the entire load.

use crate::cursor::Cursor;
use crate::error::{Error, Result};
use crate::header::{read_vec3, ModelHeader, TableEntry};
use crate::model::{
    JointType, Mat4, MaterialKind, ModelFile, ModelMaterial, ModelObject, ModelPolygon,
    ModelVHot, PolygonKind, Vec2, Vec3, VertexIndices, MATERIAL_NAME_LEN, OBJECT_NAME_LEN,
};
use crate::version::FormatVersion;

/// Fixed record sizes, shared with the writer so the two cannot drift.
pub(crate) const OBJECT_RECORD_LEN: usize = 101;
pub(crate) const MATERIAL_RECORD_LEN: usize = 24;
pub(crate) const MATERIAL_EXTRA_LEN: usize = 8;
pub(crate) const VHOT_RECORD_LEN: usize = 16;
pub(crate) const VEC3_LEN: usize = 12;
pub(crate) const VEC2_LEN: usize = 8;
pub(crate) const POLYGON_PREFIX_LEN: usize = 9;

impl ModelFile {
    /// Parse a model file from raw bytes.
    ///
    /// The header's table directory drives the read: each table is decoded
    /// at its declared offset with its declared count, with record layout
    /// selected once from the header's version field.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let header = ModelHeader::parse(data)?;
        let version = header.version;

        let objects = read_objects(data, header.objects)?;
        let mut materials = read_materials(data, header.materials)?;
        if let Some(extras) = header.material_extras {
            apply_material_extras(data, extras, &mut materials)?;
        }
        let vertex_positions =
            read_vec3_table(data, header.vertex_positions, "vertex_positions")?;
        let vertex_normals = read_vec3_table(data, header.vertex_normals, "vertex_normals")?;
        let vertex_uvs = read_uvs(data, header.vertex_uvs)?;
        let face_normals = read_vec3_table(data, header.face_normals, "face_normals")?;
        let vhots = read_vhots(data, header.vhots)?;
        let polygons = read_polygons(data, header.polygons, version)?;

        let model = ModelFile {
            name: header.name,
            version,
            radius: header.radius,
            center: header.center,
            min_bounds: header.min_bounds,
            max_bounds: header.max_bounds,
            vertex_positions,
            vertex_normals,
            vertex_uvs,
            face_normals,
            polygons,
            objects,
            vhots,
            materials,
        };
        validate(&model)?;
        Ok(model)
    }
}

fn table_cursor<'a>(
    data: &'a [u8],
    entry: TableEntry,
    table: &'static str,
    record_size: usize,
) -> Result<Cursor<'a>> {
    entry.check_fixed(table, record_size, data.len())?;
    let mut c = Cursor::new(data);
    c.seek(entry.offset as usize);
    Ok(c)
}

fn read_objects(data: &[u8], entry: TableEntry) -> Result<Vec<ModelObject>> {
    let mut c = table_cursor(data, entry, "objects", OBJECT_RECORD_LEN)?;
    let mut objects = Vec::with_capacity(entry.count as usize);
    for _ in 0..entry.count {
        let name = c.read_fixed_string(OBJECT_NAME_LEN)?;
        let joint_offset = c.position();
        let raw_joint_type = c.read_u8()?;
        let joint_type = JointType::from_u8(raw_joint_type).ok_or(Error::InvalidValue {
            field: "joint type",
            value: raw_joint_type as u32,
            offset: joint_offset,
        })?;
        let joint_index = c.read_i32()?;
        let child_object_index = c.read_i32()?;
        let sibling_object_index = c.read_i32()?;
        let mut transform = [0f32; 16];
        for cell in &mut transform {
            *cell = c.read_f32()?;
        }
        let vertex_start = c.read_u32()?;
        let vertex_count = c.read_u32()?;
        let vhot_start = c.read_u32()?;
        let vhot_count = c.read_u32()?;

        objects.push(ModelObject {
            name,
            joint_type,
            joint_index,
            child_object_index,
            sibling_object_index,
            transform: Mat4(transform),
            vertex_start,
            vertex_count,
            vhot_start,
            vhot_count,
        });
    }
    Ok(objects)
}

fn read_materials(data: &[u8], entry: TableEntry) -> Result<Vec<ModelMaterial>> {
    let mut c = table_cursor(data, entry, "materials", MATERIAL_RECORD_LEN)?;
    let mut materials = Vec::with_capacity(entry.count as usize);
    for _ in 0..entry.count {
        let name = c.read_fixed_string(MATERIAL_NAME_LEN)?;
        let kind_offset = c.position();
        let raw_kind = c.read_u8()?;
        let kind = MaterialKind::from_u8(raw_kind).ok_or(Error::InvalidValue {
            field: "material kind",
            value: raw_kind as u32,
            offset: kind_offset,
        })?;
        let slot = c.read_u8()?;
        let color_bytes = c.read_bytes(4)?;
        let color = [color_bytes[0], color_bytes[1], color_bytes[2], color_bytes[3]];
        let palette_index = c.read_u16()?;

        materials.push(ModelMaterial {
            name,
            kind,
            slot,
            color,
            palette_index,
            transparency: 0.0,
            self_illumination: 0.0,
        });
    }
    Ok(materials)
}

/// Pair the auxiliary table with the materials by index. The count must
/// match the material count exactly — a mismatched table could not be
/// re-serialized byte-identically.
fn apply_material_extras(
    data: &[u8],
    entry: TableEntry,
    materials: &mut [ModelMaterial],
) -> Result<()> {
    if entry.count as usize != materials.len() {
        return Err(Error::BadRange {
            table: "material_extras",
            start: 0,
            count: entry.count,
            len: materials.len(),
        });
    }
    let mut c = table_cursor(data, entry, "material_extras", MATERIAL_EXTRA_LEN)?;
    for material in materials {
        material.transparency = c.read_f32()?;
        material.self_illumination = c.read_f32()?;
    }
    Ok(())
}

fn read_vec3_table(data: &[u8], entry: TableEntry, table: &'static str) -> Result<Vec<Vec3>> {
    let mut c = table_cursor(data, entry, table, VEC3_LEN)?;
    let mut out = Vec::with_capacity(entry.count as usize);
    for _ in 0..entry.count {
        out.push(read_vec3(&mut c)?);
    }
    Ok(out)
}

fn read_uvs(data: &[u8], entry: TableEntry) -> Result<Vec<Vec2>> {
    let mut c = table_cursor(data, entry, "vertex_uvs", VEC2_LEN)?;
    let mut out = Vec::with_capacity(entry.count as usize);
    for _ in 0..entry.count {
        out.push(Vec2 {
            u: c.read_f32()?,
            v: c.read_f32()?,
        });
    }
    Ok(out)
}

fn read_vhots(data: &[u8], entry: TableEntry) -> Result<Vec<ModelVHot>> {
    let mut c = table_cursor(data, entry, "vhots", VHOT_RECORD_LEN)?;
    let mut out = Vec::with_capacity(entry.count as usize);
    for _ in 0..entry.count {
        out.push(ModelVHot {
            id: c.read_i32()?,
            position: read_vec3(&mut c)?,
        });
    }
    Ok(out)
}

/// Polygon records are variable-length: a fixed prefix carrying the
/// per-polygon vertex count, then that many index triples (pairs for flat
/// polygons). Index width is a property of the version, decided once.
fn read_polygons(
    data: &[u8],
    entry: TableEntry,
    version: FormatVersion,
) -> Result<Vec<ModelPolygon>> {
    // Every polygon occupies at least the prefix plus three flat vertex
    // pairs. Bounding the declared count against that floor up front keeps
    // a hostile header from reserving gigabytes before the first record
    // read fails.
    let min_record = POLYGON_PREFIX_LEN + 3 * 2 * version.index_width();
    entry.check_fixed("polygons", min_record, data.len())?;
    let mut c = Cursor::new(data);
    c.seek(entry.offset as usize);

    let mut polygons = Vec::with_capacity(entry.count as usize);
    for polygon in 0..entry.count as usize {
        let id = c.read_u16()?;
        let poly_data = c.read_u16()?;
        let kind_offset = c.position();
        let raw_kind = c.read_u8()?;
        let kind = PolygonKind::from_u8(raw_kind).ok_or(Error::InvalidValue {
            field: "polygon kind",
            value: raw_kind as u32,
            offset: kind_offset,
        })?;
        let flag_offset = c.position();
        let raw_flag = c.read_u8()?;
        let use_vertex_normals = match raw_flag {
            0 => false,
            1 => true,
            other => {
                return Err(Error::InvalidValue {
                    field: "vertex normal flag",
                    value: other as u32,
                    offset: flag_offset,
                })
            }
        };
        let normal_index = c.read_u16()?;
        let vertex_count = c.read_u8()? as usize;
        if vertex_count < 3 {
            return Err(Error::DegeneratePolygon {
                polygon,
                count: vertex_count,
            });
        }

        let mut vertex_indices = Vec::with_capacity(vertex_count);
        for _ in 0..vertex_count {
            let position_index = read_index(&mut c, version)?;
            let normal_index = read_index(&mut c, version)?;
            let uv_index = if kind == PolygonKind::Textured {
                read_index(&mut c, version)?
            } else {
                0
            };
            vertex_indices.push(VertexIndices {
                position_index,
                normal_index,
                uv_index,
            });
        }

        polygons.push(ModelPolygon {
            id,
            data: poly_data,
            kind,
            use_vertex_normals,
            normal_index,
            vertex_indices,
        });
    }
    Ok(polygons)
}

fn read_index(c: &mut Cursor, version: FormatVersion) -> Result<u32> {
    if version.wide_indices() {
        c.read_u32()
    } else {
        Ok(c.read_u16()? as u32)
    }
}

/// Bounds-check every cross-table index before the model escapes the codec.
/// Child/sibling/joint indices admit the -1 sentinel; everything else must
/// land inside its target table.
fn validate(model: &ModelFile) -> Result<()> {
    for polygon in &model.polygons {
        check_index(
            "face_normals",
            polygon.normal_index as i64,
            model.face_normals.len(),
        )?;
        for vi in &polygon.vertex_indices {
            check_index(
                "vertex_positions",
                vi.position_index as i64,
                model.vertex_positions.len(),
            )?;
            if polygon.use_vertex_normals {
                check_index(
                    "vertex_normals",
                    vi.normal_index as i64,
                    model.vertex_normals.len(),
                )?;
            }
            if polygon.kind == PolygonKind::Textured {
                check_index("vertex_uvs", vi.uv_index as i64, model.vertex_uvs.len())?;
            }
        }
    }

    let object_count = model.objects.len();
    for object in &model.objects {
        check_link("objects", object.child_object_index, object_count)?;
        check_link("objects", object.sibling_object_index, object_count)?;
        if object.joint_index < -1 {
            return Err(Error::BadIndex {
                table: "joints",
                index: object.joint_index as i64,
                len: 0,
            });
        }
        check_range(
            "vertex_positions",
            object.vertex_start,
            object.vertex_count,
            model.vertex_positions.len(),
        )?;
        check_range("vhots", object.vhot_start, object.vhot_count, model.vhots.len())?;
    }

    Ok(())
}

fn check_index(table: &'static str, index: i64, len: usize) -> Result<()> {
    if index < 0 || index as usize >= len {
        return Err(Error::BadIndex { table, index, len });
    }
    Ok(())
}

/// A child/sibling link: -1 or a valid position in the objects table.
fn check_link(table: &'static str, index: i32, len: usize) -> Result<()> {
    if index == -1 {
        return Ok(());
    }
    check_index(table, index as i64, len)
}

fn check_range(table: &'static str, start: u32, count: u32, len: usize) -> Result<()> {
    let end = start as u64 + count as u64;
    if end > len as u64 {
        return Err(Error::BadRange {
            table,
            start,
            count,
            len,
        });
    }
    Ok(())
}
