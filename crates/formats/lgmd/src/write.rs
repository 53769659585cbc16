//! Serializer: lays the tables out in the same relative order the reader
//! expects, recomputes offsets from cumulative sizes, and emits the header
//! with the final (offset, count) pairs. Lossless for any model the reader
//! produced; the only failure mode is a fixed-width contract violation
//! (an edited name that no longer fits its field, or indices that outgrew
//! the version's index width).

use crate::cursor::Writer;
use crate::error::{Error, Result};
use crate::header::{write_vec3, ModelHeader, TableEntry};
use crate::model::{
    ModelFile, ModelMaterial, ModelObject, ModelPolygon, PolygonKind, MATERIAL_NAME_LEN,
    OBJECT_NAME_LEN,
};
use crate::read::{
    MATERIAL_EXTRA_LEN, MATERIAL_RECORD_LEN, OBJECT_RECORD_LEN, POLYGON_PREFIX_LEN,
    VEC2_LEN, VEC3_LEN, VHOT_RECORD_LEN,
};
use crate::version::FormatVersion;

impl ModelFile {
    /// Serialize the model back to its on-disk form.
    pub fn write(&self) -> Result<Vec<u8>> {
        let version = self.version;
        let mut offset = ModelHeader::len(version);

        let mut place = |record_bytes: usize, count: usize| {
            let entry = TableEntry {
                offset: offset as u32,
                count: count as u32,
            };
            offset += record_bytes;
            entry
        };

        let objects = place(self.objects.len() * OBJECT_RECORD_LEN, self.objects.len());
        let materials = place(
            self.materials.len() * MATERIAL_RECORD_LEN,
            self.materials.len(),
        );
        let material_extras = version.has_material_extras().then(|| {
            place(
                self.materials.len() * MATERIAL_EXTRA_LEN,
                self.materials.len(),
            )
        });
        let vertex_positions = place(
            self.vertex_positions.len() * VEC3_LEN,
            self.vertex_positions.len(),
        );
        let vertex_normals = place(
            self.vertex_normals.len() * VEC3_LEN,
            self.vertex_normals.len(),
        );
        let vertex_uvs = place(self.vertex_uvs.len() * VEC2_LEN, self.vertex_uvs.len());
        let face_normals = place(self.face_normals.len() * VEC3_LEN, self.face_normals.len());
        let vhots = place(self.vhots.len() * VHOT_RECORD_LEN, self.vhots.len());
        let polygons = place(polygon_table_len(&self.polygons, version)?, self.polygons.len());

        let header = ModelHeader {
            version,
            name: self.name.clone(),
            radius: self.radius,
            min_bounds: self.min_bounds,
            max_bounds: self.max_bounds,
            center: self.center,
            objects,
            materials,
            material_extras,
            vertex_positions,
            vertex_normals,
            vertex_uvs,
            face_normals,
            vhots,
            polygons,
        };

        let mut w = Writer::with_capacity(offset);
        header.write(&mut w)?;

        for object in &self.objects {
            write_object(&mut w, object)?;
        }
        for material in &self.materials {
            write_material(&mut w, material)?;
        }
        if version.has_material_extras() {
            for material in &self.materials {
                w.write_f32(material.transparency);
                w.write_f32(material.self_illumination);
            }
        }
        for v in &self.vertex_positions {
            write_vec3(&mut w, *v);
        }
        for v in &self.vertex_normals {
            write_vec3(&mut w, *v);
        }
        for uv in &self.vertex_uvs {
            w.write_f32(uv.u);
            w.write_f32(uv.v);
        }
        for v in &self.face_normals {
            write_vec3(&mut w, *v);
        }
        for vhot in &self.vhots {
            w.write_i32(vhot.id);
            write_vec3(&mut w, vhot.position);
        }
        for (index, polygon) in self.polygons.iter().enumerate() {
            write_polygon(&mut w, index, polygon, version)?;
        }

        debug_assert_eq!(w.position(), offset);
        Ok(w.into_bytes())
    }
}

fn polygon_table_len(polygons: &[ModelPolygon], version: FormatVersion) -> Result<usize> {
    let iw = version.index_width();
    let mut len = 0;
    for (index, polygon) in polygons.iter().enumerate() {
        let vertex_count = polygon.vertex_indices.len();
        if vertex_count > u8::MAX as usize {
            return Err(Error::TooManyVertices {
                polygon: index,
                count: vertex_count,
            });
        }
        let per_vertex = match polygon.kind {
            PolygonKind::Textured => 3 * iw,
            PolygonKind::Flat => 2 * iw,
        };
        len += POLYGON_PREFIX_LEN + vertex_count * per_vertex;
    }
    Ok(len)
}

fn write_object(w: &mut Writer, object: &ModelObject) -> Result<()> {
    w.write_fixed_string(&object.name, OBJECT_NAME_LEN)?;
    w.write_u8(object.joint_type as u8);
    w.write_i32(object.joint_index);
    w.write_i32(object.child_object_index);
    w.write_i32(object.sibling_object_index);
    for cell in object.transform.0 {
        w.write_f32(cell);
    }
    w.write_u32(object.vertex_start);
    w.write_u32(object.vertex_count);
    w.write_u32(object.vhot_start);
    w.write_u32(object.vhot_count);
    Ok(())
}

fn write_material(w: &mut Writer, material: &ModelMaterial) -> Result<()> {
    w.write_fixed_string(&material.name, MATERIAL_NAME_LEN)?;
    w.write_u8(material.kind as u8);
    w.write_u8(material.slot);
    w.write_bytes(&material.color);
    w.write_u16(material.palette_index);
    Ok(())
}

fn write_polygon(
    w: &mut Writer,
    index: usize,
    polygon: &ModelPolygon,
    version: FormatVersion,
) -> Result<()> {
    w.write_u16(polygon.id);
    w.write_u16(polygon.data);
    w.write_u8(polygon.kind as u8);
    w.write_u8(polygon.use_vertex_normals as u8);
    w.write_u16(polygon.normal_index);
    let vertex_count = polygon.vertex_indices.len();
    if vertex_count > u8::MAX as usize {
        return Err(Error::TooManyVertices {
            polygon: index,
            count: vertex_count,
        });
    }
    w.write_u8(vertex_count as u8);

    for vi in &polygon.vertex_indices {
        write_index(w, vi.position_index, version)?;
        write_index(w, vi.normal_index, version)?;
        if polygon.kind == PolygonKind::Textured {
            write_index(w, vi.uv_index, version)?;
        }
    }
    Ok(())
}

fn write_index(w: &mut Writer, index: u32, version: FormatVersion) -> Result<()> {
    if version.wide_indices() {
        w.write_u32(index);
    } else {
        if index > u16::MAX as u32 {
            return Err(Error::IndexTooWide {
                index,
                version: version.0,
            });
        }
        w.write_u16(index as u16);
    }
    Ok(())
}
