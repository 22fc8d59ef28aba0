//! Boundary between the annotation engine and whatever owns the scene.
//!
//! The engine never walks the scene itself: it asks a [`SceneQuery`] for a
//! snapshot of colorable entities and writes colors back through
//! [`RenderApply`]. [`world`] implements both for a `hecs::World`.

pub mod prefabs;
pub mod test_scene;
pub mod world;

use crate::error::SceneError;
use crate::palette::Color;

/// Opaque handle to a renderable part, stable for the part's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub u64);

/// Snapshot of one renderable part.
#[derive(Clone, Debug, PartialEq)]
pub struct PartView {
    pub id: PartId,
    pub name: String,
    /// Current marker color, `None` while the part is unmarked.
    pub marker: Option<Color>,
    /// Scene-declared backdrop (sky dome, walls behind the capture volume).
    pub background: bool,
}

/// Snapshot of one colorable entity.
#[derive(Clone, Debug, PartialEq)]
pub struct EntityView {
    pub name: String,
    /// Name of the entity this one is attached to.
    pub parent: Option<String>,
    pub parts: Vec<PartView>,
}

/// Table key of a part: `<entity>/<part>`.
pub fn part_key(entity: &str, part: &str) -> String {
    format!("{entity}/{part}")
}

/// Read side: enumerate the current forest of colorable entities.
pub trait SceneQuery {
    /// Entities in a stable order; annotation order follows it.
    fn snapshot(&self) -> Result<Vec<EntityView>, SceneError>;
}

/// Write side: attach, recolor and remove annotation markers.
pub trait RenderApply {
    /// Attach an unpainted marker to `part` unless it already has one.
    fn ensure_marker(&mut self, part: PartId) -> Result<(), SceneError>;

    /// Write `color` into the part's marker and flag it for redraw.
    fn set_marker_color(&mut self, part: PartId, color: Color) -> Result<(), SceneError>;

    /// Destroy the part's marker. `Ok(false)` if it had none.
    fn remove_marker(&mut self, part: PartId) -> Result<bool, SceneError>;
}

/// Everything the engine needs from a scene.
pub trait Scene: SceneQuery + RenderApply {}

impl<T: SceneQuery + RenderApply + ?Sized> Scene for T {}
