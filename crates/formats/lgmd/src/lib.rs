//! Reader/writer for the Dark-engine LGMD `.bin` model format.
//!
//! Three-layer architecture:
//! - **Layer 1** (`header`): Fixed header + table directory — offsets and counts only
//! - **Layer 2** (`read`/`write`): Typed record codecs for the individual tables
//! - **Layer 3** (`model`): The in-memory `ModelFile` document with
//!   `parse`/`write` entry points and hierarchy helpers

pub mod cursor;
pub mod error;
pub mod header;
pub mod hierarchy;
pub mod model;
pub mod read;
pub mod version;
pub mod write;

pub use error::{Error, Result};
pub use header::{ModelHeader, TableEntry};
pub use model::{
    JointType, Mat4, MaterialKind, ModelFile, ModelMaterial, ModelObject, ModelPolygon,
    ModelVHot, PolygonKind, Vec2, Vec3, VertexIndices,
};
pub use version::FormatVersion;
