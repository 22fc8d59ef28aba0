//! Deterministic annotation colors for segmentation masks.
//!
//! [`palette`] hands out maximally separated colors by index,
//! [`annotator`] groups renderable parts into color identities, and
//! [`controller`] switches between grouping modes and re-annotates the scene.

pub mod annotator;
pub mod components;
pub mod config;
pub mod controller;
pub mod error;
pub mod fsm;
pub mod mode;
pub mod palette;
pub mod scene;

pub use annotator::{Annotate, AnnotationEngine, ColorTable};
pub use config::AnnotatorConfig;
pub use controller::ModeController;
pub use error::{ConfigError, ModeError, SceneError};
pub use mode::Mode;
pub use palette::{Color, Palette};
pub use scene::{EntityView, PartId, PartView, RenderApply, Scene, SceneQuery};
