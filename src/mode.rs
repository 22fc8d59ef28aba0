use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::annotator::{AnnotationEngine, ColorTable};
use crate::error::ModeError;
use crate::scene::Scene;

/// Grouping policy deciding which renderable parts share a color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Every renderable part gets its own color.
    #[default]
    #[serde(rename = "part")]
    PerPart,
    /// All parts under one attachment root share the root's color.
    #[serde(rename = "object")]
    PerObjectHierarchy,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::PerPart, Mode::PerObjectHierarchy];

    /// Command-surface name of the mode.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::PerPart => "part",
            Mode::PerObjectHierarchy => "object",
        }
    }

    /// Run this mode's grouping over `scene` and return the resulting table.
    pub fn apply<'a>(
        self,
        engine: &'a mut AnnotationEngine,
        scene: &mut dyn Scene,
    ) -> &'a ColorTable {
        match self {
            Mode::PerPart => engine.annotate_per_part(scene),
            Mode::PerObjectHierarchy => engine.annotate_per_object_hierarchy(scene),
        }
        engine.colors()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive `part` / `object`.
impl FromStr for Mode {
    type Err = ModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Mode::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ModeError::Unsupported(s.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("part".parse(), Ok(Mode::PerPart));
        assert_eq!("OBJECT".parse(), Ok(Mode::PerObjectHierarchy));
        assert_eq!(" Object ".parse(), Ok(Mode::PerObjectHierarchy));
    }

    #[test]
    fn rejects_unknown_modes() {
        assert_eq!(
            "bogus".parse::<Mode>(),
            Err(ModeError::Unsupported("bogus".into()))
        );
        assert!("".parse::<Mode>().is_err());
        assert!("parts".parse::<Mode>().is_err());
    }

    #[test]
    fn round_trips_through_display() {
        for mode in Mode::ALL {
            assert_eq!(mode.to_string().parse(), Ok(mode));
        }
        assert_eq!(Mode::default(), Mode::PerPart);
    }
}
