use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use lgmd::ModelFile;
use tracing::{debug, info, warn};

use crate::error::ResourceError;
use crate::install::{InstallContext, FMS_DIR};

/// Directories probed for model textures, in precedence order.
const TEXTURE_DIRS: [&str; 2] = ["obj/txt16", "obj/txt"];
/// Extensions probed for extension-less texture names, in precedence order.
const TEXTURE_EXTENSIONS: [&str; 6] = ["dds", "png", "tga", "pcx", "gif", "bmp"];

/// Maps virtual resource paths (e.g. `obj/crate.bin`) to concrete files
/// across the base install and the active fan mission overlay.
///
/// Directory listings are cached at initialisation / campaign-switch time;
/// lookups never touch the filesystem. Switching campaigns rebuilds the
/// cache, so a lookup always observes a whole overlay, never a half-switched
/// one. Single-threaded by design — campaign switches take `&mut self`.
#[derive(Debug, Default)]
pub struct ResourceManager {
    campaign: String,
    /// Normalized virtual path -> real file path. Overlay entries are
    /// inserted after base entries and override them.
    paths: HashMap<String, PathBuf>,
}

impl ResourceManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// (Re)build the path cache for `install` with the given active
    /// campaign (`""` = base install only).
    ///
    /// Returns false — leaving the manager empty — if the install is
    /// invalid or the campaign does not exist. Any listings cached for a
    /// previously active campaign are dropped either way.
    pub fn init(&mut self, install: &InstallContext, campaign: &str) -> bool {
        self.paths.clear();
        self.campaign.clear();

        if !install.valid() {
            warn!(root = %install.root().display(), "refusing to initialise from invalid install");
            return false;
        }
        let fm_dir = if campaign.is_empty() {
            None
        } else {
            match install.fm_dir(campaign) {
                Some(dir) => Some(dir),
                None => {
                    warn!(campaign, "campaign does not exist in this install");
                    return false;
                }
            }
        };

        collect_files(install.root(), install.root(), true, &mut self.paths);
        let base_count = self.paths.len();
        if let Some(fm_dir) = &fm_dir {
            collect_files(fm_dir, fm_dir, false, &mut self.paths);
        }
        self.campaign = campaign.to_string();

        info!(
            campaign,
            base = base_count,
            total = self.paths.len(),
            "resource cache built"
        );
        true
    }

    /// The active campaign name, empty when running off the base install.
    pub fn campaign(&self) -> &str {
        &self.campaign
    }

    /// Resolve a virtual path to a real file. The active overlay wins over
    /// the base install; `None` is the routine miss, not an error.
    pub fn resolve(&self, virtual_path: &str) -> Option<PathBuf> {
        self.paths.get(&normalize(virtual_path)).cloned()
    }

    /// Model names available under `obj/`, as filename stems. The listing
    /// is the union of base and overlay — an overlay overrides a base file
    /// on resolution but does not hide its name here.
    pub fn model_names(&self) -> BTreeSet<String> {
        self.paths
            .keys()
            .filter_map(|vpath| {
                let rest = vpath.strip_prefix("obj/")?;
                // Direct children only; textures live in obj/txt*/.
                if rest.contains('/') {
                    return None;
                }
                rest.strip_suffix(".bin").map(str::to_string)
            })
            .collect()
    }

    /// Resolve an extension-less texture name to a virtual path, probing
    /// the texture directories and supported extensions in fixed order.
    pub fn texture_path(&self, name: &str) -> Option<String> {
        for dir in TEXTURE_DIRS {
            for ext in TEXTURE_EXTENSIONS {
                let vpath = format!("{dir}/{name}.{ext}");
                if self.paths.contains_key(&normalize(&vpath)) {
                    return Some(vpath);
                }
            }
        }
        debug!(name, "no texture found in any probed extension");
        None
    }

    /// Open a resolved virtual path as a byte stream. The handle belongs to
    /// the caller (external image/model decoders consume it).
    pub fn open(&self, virtual_path: &str) -> Result<File, ResourceError> {
        let path = self.resolve(virtual_path).ok_or_else(|| ResourceError::NotFound {
            virtual_path: virtual_path.to_string(),
        })?;
        Ok(File::open(path)?)
    }

    /// Load and parse the named model from `obj/<name>.bin`.
    pub fn load_model(&self, name: &str) -> Result<ModelFile, ResourceError> {
        let vpath = format!("obj/{name}.bin");
        let path = self.resolve(&vpath).ok_or(ResourceError::NotFound {
            virtual_path: vpath,
        })?;
        let data = fs::read(path)?;
        Ok(ModelFile::parse(&data)?)
    }
}

/// Normalize a virtual path for comparison: backslashes become forward
/// slashes (the format and the filesystem disagree on convention), casing
/// is folded, and leading slashes are dropped.
fn normalize(virtual_path: &str) -> String {
    virtual_path
        .replace('\\', "/")
        .to_ascii_lowercase()
        .trim_start_matches('/')
        .to_string()
}

/// Recursively record every file under `dir`, keyed by its normalized path
/// relative to `root`. When walking the base install the `FMs` subtree is
/// skipped — overlay content only enters the cache via the active campaign.
fn collect_files(root: &Path, dir: &Path, skip_fms: bool, out: &mut HashMap<String, PathBuf>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            if skip_fms
                && path.parent() == Some(root)
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|f| f.eq_ignore_ascii_case(FMS_DIR))
            {
                continue;
            }
            collect_files(root, &path, skip_fms, out);
        } else if let Ok(rel) = path.strip_prefix(root) {
            if let Some(rel) = rel.to_str() {
                out.insert(normalize(rel), path);
            }
        }
    }
}
