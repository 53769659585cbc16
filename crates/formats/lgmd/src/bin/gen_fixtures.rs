//! Fixture generator for lgmd tests.
//!
//! Writes small synthetic `.bin` model files into `tests/fixtures/`, one per
//! supported format version. Useful as reference inputs when inspecting the
//! layout with a hex editor or validating a third-party reader.
//!
//! ```
//! cargo run -p lgmd --bin gen_fixtures
//! ```

use lgmd::{
    FormatVersion, JointType, Mat4, MaterialKind, ModelFile, ModelMaterial, ModelObject,
    ModelPolygon, ModelVHot, PolygonKind, Vec2, Vec3, VertexIndices,
};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn main() -> std::io::Result<()> {
    std::fs::create_dir_all(FIXTURES_DIR)?;

    for version in [FormatVersion::V3, FormatVersion::V4, FormatVersion::V6] {
        let model = build_quad(version);
        let data = model.write().expect("fixture model must serialize");
        let name = format!("quad_v{version}.bin");
        std::fs::write(format!("{FIXTURES_DIR}/{name}"), &data)?;
        println!("wrote {name} ({} bytes)", data.len());
    }
    Ok(())
}

/// A single textured quad split into two triangles, one static object.
fn build_quad(version: FormatVersion) -> ModelFile {
    let triangle = |id: u16, a: u32, b: u32, c: u32| ModelPolygon {
        id,
        data: 0,
        kind: PolygonKind::Textured,
        use_vertex_normals: false,
        normal_index: id,
        vertex_indices: vec![
            VertexIndices { position_index: a, normal_index: a, uv_index: a },
            VertexIndices { position_index: b, normal_index: b, uv_index: b },
            VertexIndices { position_index: c, normal_index: c, uv_index: c },
        ],
    };

    ModelFile {
        name: "quad".to_string(),
        version,
        radius: 1.0,
        center: Vec3::new(0.5, 0.5, 0.0),
        min_bounds: Vec3::new(0.0, 0.0, 0.0),
        max_bounds: Vec3::new(1.0, 1.0, 0.0),
        vertex_positions: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        vertex_normals: vec![Vec3::new(0.0, 0.0, 1.0); 4],
        vertex_uvs: vec![
            Vec2 { u: 0.0, v: 0.0 },
            Vec2 { u: 1.0, v: 0.0 },
            Vec2 { u: 1.0, v: 1.0 },
            Vec2 { u: 0.0, v: 1.0 },
        ],
        face_normals: vec![Vec3::new(0.0, 0.0, 1.0); 2],
        polygons: vec![triangle(0, 0, 1, 2), triangle(1, 0, 2, 3)],
        objects: vec![ModelObject {
            name: "quad".to_string(),
            joint_type: JointType::Static,
            joint_index: -1,
            child_object_index: -1,
            sibling_object_index: -1,
            transform: Mat4::IDENTITY,
            vertex_start: 0,
            vertex_count: 4,
            vhot_start: 0,
            vhot_count: 1,
        }],
        vhots: vec![ModelVHot {
            id: 0,
            position: Vec3::new(0.5, 0.5, 0.1),
        }],
        materials: vec![ModelMaterial {
            name: "panel".to_string(),
            kind: MaterialKind::Texture,
            slot: 0,
            color: [0, 0, 0, 255],
            palette_index: 0,
            transparency: 0.0,
            self_illumination: 0.0,
        }],
    }
}
