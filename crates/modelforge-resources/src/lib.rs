//! Resource resolution for Dark-engine installs.
//!
//! A game install is a base directory tree plus zero or more "fan mission"
//! overlays under `FMs/`, each mirroring the base layout. Resolution prefers
//! the active overlay's files over the base install's; listings present the
//! union of both.

pub mod config;
pub mod error;
pub mod install;
pub mod manager;

pub use config::{EditorConfig, TextureMode, ViewportConfig};
pub use error::{ConfigError, ResourceError};
pub use install::InstallContext;
pub use manager::ResourceManager;
