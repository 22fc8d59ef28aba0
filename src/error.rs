use std::path::PathBuf;

/// A segmentation mode request that names no known mode.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ModeError {
    #[error("unsupported segmentation mode {0:?}, supported modes are: part | object")]
    Unsupported(String),
}

/// Failures reported by a scene collaborator.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    #[error("scene is not available")]
    Unavailable,

    /// The part was destroyed between the scan and the write.
    #[error("renderable part {0} no longer exists")]
    StalePart(String),
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("palette_levels must be within 2..=256, got {0}")]
    InvalidLevels(usize),
}
