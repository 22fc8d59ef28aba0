//! Annotator settings, loaded from TOML.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::mode::Mode;
use crate::palette::{Color, DEFAULT_LEVELS};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnnotatorConfig {
    /// Channel levels per axis; the palette holds `palette_levels³` colors.
    pub palette_levels: usize,
    /// Color the mask renders backdrop and unannotated pixels with.
    pub background: Color,
    /// Never hand the background color to an annotated group.
    pub reserve_background: bool,
    /// Never hand out black, the RGB of a freshly created marker.
    pub reserve_black: bool,
    /// Mode active at startup.
    pub default_mode: Mode,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            palette_levels: DEFAULT_LEVELS,
            background: Color::WHITE,
            reserve_background: true,
            reserve_black: false,
            default_mode: Mode::PerPart,
        }
    }
}

impl AnnotatorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(2..=256).contains(&self.palette_levels) {
            return Err(ConfigError::InvalidLevels(self.palette_levels));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = AnnotatorConfig::from_toml_str("").unwrap();
        assert_eq!(config, AnnotatorConfig::default());
    }

    #[test]
    fn reads_all_fields() {
        let config = AnnotatorConfig::from_toml_str(
            r#"
            palette_levels = 8
            background = [0, 0, 0, 255]
            reserve_background = false
            reserve_black = true
            default_mode = "object"
            "#,
        )
        .unwrap();
        assert_eq!(config.palette_levels, 8);
        assert_eq!(config.background, Color::BLACK);
        assert!(!config.reserve_background);
        assert!(config.reserve_black);
        assert_eq!(config.default_mode, Mode::PerObjectHierarchy);
    }

    #[test]
    fn rejects_bad_levels() {
        assert!(matches!(
            AnnotatorConfig::from_toml_str("palette_levels = 1"),
            Err(ConfigError::InvalidLevels(1))
        ));
        assert!(matches!(
            AnnotatorConfig::from_toml_str("palette_levels = 300"),
            Err(ConfigError::InvalidLevels(300))
        ));
    }

    #[test]
    fn rejects_unknown_keys_and_modes() {
        assert!(matches!(
            AnnotatorConfig::from_toml_str("palete_levels = 8"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            AnnotatorConfig::from_toml_str(r#"default_mode = "actor""#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        assert!(matches!(
            AnnotatorConfig::load("/nonexistent/segmask.toml"),
            Err(ConfigError::Io { .. })
        ));
    }
}
