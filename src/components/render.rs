use hecs::Entity;

use crate::palette::Color;

/// Renderable parts owned by a colorable entity, in declaration order.
pub struct Parts(pub Vec<Entity>);

/// A renderable sub-part (mesh section) of a colorable entity.
pub struct MeshPart {
    pub name: String,
    pub owner: Entity,
}

/// Marker: part is backdrop and always renders with the background color.
pub struct Background;

/// Annotation color attached to a renderable part.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationMarker {
    pub color: Color,
    /// Set on every color write, cleared by `marker_redraw_system`.
    pub needs_redraw: bool,
}

impl AnnotationMarker {
    pub fn new() -> Self {
        Self {
            color: Color::TRANSPARENT,
            needs_redraw: true,
        }
    }
}

impl Default for AnnotationMarker {
    fn default() -> Self {
        Self::new()
    }
}
