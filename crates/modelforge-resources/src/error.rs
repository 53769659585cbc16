use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("install root is not a valid game install: {root}")]
    InvalidInstall { root: String },

    #[error("resource not found: {virtual_path}")]
    NotFound { virtual_path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("model parse error: {0}")]
    Model(#[from] lgmd::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),
}
