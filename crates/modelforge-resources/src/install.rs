use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

/// Name of the per-install overlays directory.
pub const FMS_DIR: &str = "FMs";
/// Name of the object (model) directory every valid install must carry.
pub const OBJ_DIR: &str = "obj";

/// A validated view of a game install directory.
///
/// Validity is computed once at construction and never re-probed: a context
/// that was invalid at creation stays invalid, and all lookups against it
/// are treated as misses without touching the filesystem again.
#[derive(Debug, Clone)]
pub struct InstallContext {
    root: PathBuf,
    valid: bool,
    fms: Vec<String>,
}

impl InstallContext {
    /// Scan `root` once: the install is valid iff it is a directory holding
    /// an `obj` subdirectory (matched case-insensitively, since installs
    /// moved between filesystems disagree on casing). Fan missions are the
    /// subdirectories of `FMs/`, sorted; a missing `FMs/` just means none.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let valid = subdir_ci(&root, OBJ_DIR).is_some();
        if !valid {
            warn!(root = %root.display(), "install root has no obj directory");
        }

        let mut fms = Vec::new();
        if let Some(fms_dir) = subdir_ci(&root, FMS_DIR) {
            if let Ok(entries) = fs::read_dir(&fms_dir) {
                for entry in entries.flatten() {
                    if entry.path().is_dir() {
                        if let Some(name) = entry.file_name().to_str() {
                            fms.push(name.to_string());
                        }
                    }
                }
            }
        }
        fms.sort();

        Self { root, valid, fms }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn valid(&self) -> bool {
        self.valid
    }

    /// Available fan mission names, sorted.
    pub fn fms(&self) -> &[String] {
        &self.fms
    }

    pub fn has_fm(&self, name: &str) -> bool {
        self.fms.iter().any(|fm| fm.eq_ignore_ascii_case(name))
    }

    /// Root directory of the named fan mission, if it exists.
    pub fn fm_dir(&self, name: &str) -> Option<PathBuf> {
        let fm = self.fms.iter().find(|fm| fm.eq_ignore_ascii_case(name))?;
        let fms_dir = subdir_ci(&self.root, FMS_DIR)?;
        Some(fms_dir.join(fm))
    }
}

/// Find a direct subdirectory by case-insensitive name.
fn subdir_ci(dir: &Path, name: &str) -> Option<PathBuf> {
    for entry in fs::read_dir(dir).ok()?.flatten() {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        if entry
            .file_name()
            .to_str()
            .is_some_and(|f| f.eq_ignore_ascii_case(name))
        {
            return Some(path);
        }
    }
    None
}
