use crate::cursor::{Cursor, Writer};
use crate::error::{Error, Result};
use crate::model::{Vec3, MODEL_NAME_LEN};
use crate::version::FormatVersion;

/// Magic bytes at the start of every model file.
pub const MODEL_MAGIC: [u8; 4] = *b"LGMD";

/// One (offset, count) pair from the header's table directory. `offset` is
/// an absolute file offset; `count` is the number of records in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TableEntry {
    pub offset: u32,
    pub count: u32,
}

impl TableEntry {
    /// Check that `count` fixed-size records fit inside `file_len`, failing
    /// with a structured error naming the table.
    pub fn check_fixed(&self, table: &'static str, record_size: usize, file_len: usize) -> Result<()> {
        let offset = self.offset as usize;
        let need = self.count as usize * record_size;
        if offset > file_len || need > file_len - offset {
            return Err(Error::TableOutOfBounds {
                table,
                offset,
                need,
                have: file_len.saturating_sub(offset),
            });
        }
        Ok(())
    }
}

/// The fixed header of a model file.
///
/// This is Layer 1: it knows table offsets and counts, but nothing about
/// record internals. The table directory's shape depends on the version:
/// the material-extras pair exists only at v4+.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelHeader {
    pub version: FormatVersion,
    pub name: String,
    pub radius: f32,
    pub min_bounds: Vec3,
    pub max_bounds: Vec3,
    pub center: Vec3,
    pub objects: TableEntry,
    pub materials: TableEntry,
    /// Present only when `version.has_material_extras()`.
    pub material_extras: Option<TableEntry>,
    pub vertex_positions: TableEntry,
    pub vertex_normals: TableEntry,
    pub vertex_uvs: TableEntry,
    pub face_normals: TableEntry,
    pub vhots: TableEntry,
    pub polygons: TableEntry,
}

impl ModelHeader {
    /// Total header length in bytes for a given version. The table data
    /// begins immediately after.
    pub fn len(version: FormatVersion) -> usize {
        // magic + version + name + radius + 3 × Vec3 + directory
        4 + 4 + MODEL_NAME_LEN + 4 + 36 + version.table_count() * 8
    }

    /// Parse the header from the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut c = Cursor::new(data);

        let magic = c.read_magic()?;
        if magic != MODEL_MAGIC {
            return Err(Error::InvalidMagic {
                expected: MODEL_MAGIC,
                found: magic,
            });
        }

        let version = FormatVersion(c.read_u32()?);
        if !version.is_supported() {
            return Err(Error::UnsupportedVersion { version: version.0 });
        }

        let name = c.read_fixed_string(MODEL_NAME_LEN)?;
        let radius = c.read_f32()?;
        let min_bounds = read_vec3(&mut c)?;
        let max_bounds = read_vec3(&mut c)?;
        let center = read_vec3(&mut c)?;

        let objects = read_entry(&mut c)?;
        let materials = read_entry(&mut c)?;
        let material_extras = if version.has_material_extras() {
            Some(read_entry(&mut c)?)
        } else {
            None
        };
        let vertex_positions = read_entry(&mut c)?;
        let vertex_normals = read_entry(&mut c)?;
        let vertex_uvs = read_entry(&mut c)?;
        let face_normals = read_entry(&mut c)?;
        let vhots = read_entry(&mut c)?;
        let polygons = read_entry(&mut c)?;

        Ok(Self {
            version,
            name,
            radius,
            min_bounds,
            max_bounds,
            center,
            objects,
            materials,
            material_extras,
            vertex_positions,
            vertex_normals,
            vertex_uvs,
            face_normals,
            vhots,
            polygons,
        })
    }

    /// Emit the header. Table entries must already hold final offsets.
    pub fn write(&self, w: &mut Writer) -> Result<()> {
        w.write_magic(&MODEL_MAGIC);
        w.write_u32(self.version.0);
        w.write_fixed_string(&self.name, MODEL_NAME_LEN)?;
        w.write_f32(self.radius);
        write_vec3(w, self.min_bounds);
        write_vec3(w, self.max_bounds);
        write_vec3(w, self.center);

        write_entry(w, self.objects);
        write_entry(w, self.materials);
        if let Some(extras) = self.material_extras {
            write_entry(w, extras);
        }
        write_entry(w, self.vertex_positions);
        write_entry(w, self.vertex_normals);
        write_entry(w, self.vertex_uvs);
        write_entry(w, self.face_normals);
        write_entry(w, self.vhots);
        write_entry(w, self.polygons);
        Ok(())
    }
}

pub(crate) fn read_vec3(c: &mut Cursor) -> Result<Vec3> {
    Ok(Vec3 {
        x: c.read_f32()?,
        y: c.read_f32()?,
        z: c.read_f32()?,
    })
}

pub(crate) fn write_vec3(w: &mut Writer, v: Vec3) {
    w.write_f32(v.x);
    w.write_f32(v.y);
    w.write_f32(v.z);
}

fn read_entry(c: &mut Cursor) -> Result<TableEntry> {
    Ok(TableEntry {
        offset: c.read_u32()?,
        count: c.read_u32()?,
    })
}

fn write_entry(w: &mut Writer, e: TableEntry) {
    w.write_u32(e.offset);
    w.write_u32(e.count);
}
