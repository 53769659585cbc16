use std::fs;
use std::io::Read;
use std::path::Path;

use lgmd::{FormatVersion, ModelFile, Vec3};
use modelforge_resources::{InstallContext, ResourceError, ResourceManager};
use tempfile::TempDir;

/// Serialized bytes of a minimal (empty-table) model, enough for the
/// resolver's load path to exercise the real codec.
fn model_bytes(name: &str) -> Vec<u8> {
    let model = ModelFile {
        name: name.to_string(),
        version: FormatVersion::V4,
        radius: 0.0,
        center: Vec3::default(),
        min_bounds: Vec3::default(),
        max_bounds: Vec3::default(),
        vertex_positions: Vec::new(),
        vertex_normals: Vec::new(),
        vertex_uvs: Vec::new(),
        face_normals: Vec::new(),
        polygons: Vec::new(),
        objects: Vec::new(),
        vhots: Vec::new(),
        materials: Vec::new(),
    };
    model.write().unwrap()
}

fn touch(path: &Path, contents: &[u8]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// Base install with two models and a texture, plus one FM overriding
/// `foo.bin` and adding `baz.bin`.
fn sample_install() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    touch(&root.join("obj/foo.bin"), &model_bytes("foo"));
    touch(&root.join("obj/bar.bin"), &model_bytes("bar"));
    touch(&root.join("obj/txt16/metal1.dds"), b"base texture");

    let fm = root.join("FMs/heist");
    touch(&fm.join("obj/foo.bin"), &model_bytes("fmfoo"));
    touch(&fm.join("obj/baz.bin"), &model_bytes("baz"));
    touch(&fm.join("obj/txt16/metal1.dds"), b"fm texture");

    fs::create_dir_all(root.join("FMs/abbey/obj")).unwrap();
    dir
}

#[test]
fn install_validity_is_computed_once() {
    let empty = tempfile::tempdir().unwrap();
    let context = InstallContext::new(empty.path());
    assert!(!context.valid());

    // Lookups against an invalid install miss without re-probing.
    let mut manager = ResourceManager::new();
    assert!(!manager.init(&context, ""));
    assert_eq!(manager.resolve("obj/foo.bin"), None);

    let install = sample_install();
    assert!(InstallContext::new(install.path()).valid());
}

#[test]
fn fms_are_enumerated_sorted() {
    let install = sample_install();
    let context = InstallContext::new(install.path());
    assert_eq!(context.fms(), ["abbey", "heist"]);
    assert!(context.has_fm("heist"));
    assert!(context.has_fm("HEIST"));
    assert!(!context.has_fm("manor"));
}

#[test]
fn unknown_campaign_fails_quietly() {
    let install = sample_install();
    let context = InstallContext::new(install.path());
    let mut manager = ResourceManager::new();
    assert!(!manager.init(&context, "manor"));
    // A failed switch leaves nothing resolvable, not a stale cache.
    assert_eq!(manager.resolve("obj/foo.bin"), None);
}

#[test]
fn overlay_wins_then_base_after_deactivation() {
    let install = sample_install();
    let context = InstallContext::new(install.path());
    let mut manager = ResourceManager::new();

    assert!(manager.init(&context, "heist"));
    let resolved = manager.resolve("obj/foo.bin").unwrap();
    assert!(resolved.starts_with(install.path().join("FMs")));

    // Deactivate the overlay: the same virtual path now resolves to base.
    assert!(manager.init(&context, ""));
    let resolved = manager.resolve("obj/foo.bin").unwrap();
    assert!(!resolved.starts_with(install.path().join("FMs")));
}

#[test]
fn listings_are_a_union() {
    let install = sample_install();
    let context = InstallContext::new(install.path());
    let mut manager = ResourceManager::new();

    manager.init(&context, "heist");
    let names: Vec<String> = manager.model_names().into_iter().collect();
    assert_eq!(names, ["bar", "baz", "foo"]);

    manager.init(&context, "");
    let names: Vec<String> = manager.model_names().into_iter().collect();
    assert_eq!(names, ["bar", "foo"]);
}

#[test]
fn paths_are_normalized_before_comparison() {
    let install = sample_install();
    let context = InstallContext::new(install.path());
    let mut manager = ResourceManager::new();
    manager.init(&context, "");

    assert!(manager.resolve("obj/foo.bin").is_some());
    assert!(manager.resolve("obj\\foo.bin").is_some());
    assert!(manager.resolve("OBJ/Foo.BIN").is_some());
    assert!(manager.resolve("/obj/foo.bin").is_some());
    assert!(manager.resolve("obj/missing.bin").is_none());
}

#[test]
fn texture_probe_is_extension_agnostic() {
    let install = sample_install();
    let context = InstallContext::new(install.path());
    let mut manager = ResourceManager::new();
    manager.init(&context, "");

    assert_eq!(
        manager.texture_path("metal1").as_deref(),
        Some("obj/txt16/metal1.dds")
    );
    assert_eq!(manager.texture_path("metal2"), None);
}

#[test]
fn texture_probe_is_overlay_aware() {
    let install = sample_install();
    let context = InstallContext::new(install.path());
    let mut manager = ResourceManager::new();
    manager.init(&context, "heist");

    let vpath = manager.texture_path("metal1").unwrap();
    let mut contents = String::new();
    manager
        .open(&vpath)
        .unwrap()
        .read_to_string(&mut contents)
        .unwrap();
    assert_eq!(contents, "fm texture");
}

#[test]
fn load_model_goes_through_the_codec() {
    let install = sample_install();
    let context = InstallContext::new(install.path());
    let mut manager = ResourceManager::new();

    manager.init(&context, "heist");
    assert_eq!(manager.load_model("foo").unwrap().name, "fmfoo");

    manager.init(&context, "");
    assert_eq!(manager.load_model("foo").unwrap().name, "foo");

    let err = manager.load_model("missing").unwrap_err();
    assert!(matches!(err, ResourceError::NotFound { .. }));
}

#[test]
fn corrupt_model_surfaces_a_parse_error() {
    let install = sample_install();
    touch(&install.path().join("obj/broken.bin"), b"not a model");
    let context = InstallContext::new(install.path());
    let mut manager = ResourceManager::new();
    manager.init(&context, "");

    let err = manager.load_model("broken").unwrap_err();
    assert!(matches!(err, ResourceError::Model(_)));
}
