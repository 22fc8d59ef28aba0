use glam::Vec4;
use hecs::{ComponentError, Entity, World};
use rayon::prelude::*;

use crate::components::{AnnotationMarker, Background, MeshPart, Name, Parent, Parts};
use crate::error::SceneError;
use crate::palette::Color;
use crate::scene::{EntityView, PartId, PartView, RenderApply, SceneQuery};

impl From<Entity> for PartId {
    fn from(entity: Entity) -> Self {
        PartId(entity.to_bits().get())
    }
}

fn part_entity(world: &World, part: PartId) -> Result<Entity, SceneError> {
    Entity::from_bits(part.0)
        .filter(|&e| world.get::<&MeshPart>(e).is_ok())
        .ok_or_else(|| SceneError::StalePart(format!("{part:?}")))
}

/// Colorable entities are everything carrying a [`Name`].
///
/// The scan sorts entities by id, then builds the views in parallel. hecs
/// recycles the ids of despawned entities, so this is spawn order only until
/// something is despawned. Each worker only reads; `collect` keeps the sorted
/// order so annotation stays reproducible.
impl SceneQuery for World {
    fn snapshot(&self) -> Result<Vec<EntityView>, SceneError> {
        let mut entities: Vec<Entity> = self.query::<&Name>().iter().map(|(e, _)| e).collect();
        entities.sort_by_key(|e| e.id());

        Ok(entities
            .par_iter()
            .filter_map(|&entity| entity_view(self, entity))
            .collect())
    }
}

fn entity_view(world: &World, entity: Entity) -> Option<EntityView> {
    let name = world.get::<&Name>(entity).ok()?.0.clone();

    let parent = world.get::<&Parent>(entity).ok().map(|p| p.0);
    let parent = parent.and_then(|p| match world.get::<&Name>(p) {
        Ok(parent_name) => Some(parent_name.0.clone()),
        Err(err) => {
            log::warn!("{name}: attachment parent is gone ({err}), treating as root");
            None
        }
    });

    let part_entities = world
        .get::<&Parts>(entity)
        .map(|parts| parts.0.clone())
        .unwrap_or_default();
    let parts = part_entities
        .into_iter()
        .filter_map(|part| match world.get::<&MeshPart>(part) {
            Ok(mesh) if mesh.owner == entity => Some(PartView {
                id: part.into(),
                name: mesh.name.clone(),
                marker: world.get::<&AnnotationMarker>(part).ok().map(|m| m.color),
                background: world.get::<&Background>(part).is_ok(),
            }),
            Ok(mesh) => {
                log::warn!("{name}: part {} belongs to {:?}, skipping", mesh.name, mesh.owner);
                None
            }
            Err(err) => {
                log::warn!("{name}: skipping invalid part {part:?} ({err})");
                None
            }
        })
        .collect();

    Some(EntityView {
        name,
        parent,
        parts,
    })
}

impl RenderApply for World {
    fn ensure_marker(&mut self, part: PartId) -> Result<(), SceneError> {
        let entity = part_entity(self, part)?;
        if self.get::<&AnnotationMarker>(entity).is_err() {
            self.insert_one(entity, AnnotationMarker::new())
                .map_err(|_| SceneError::StalePart(format!("{part:?}")))?;
        }
        Ok(())
    }

    fn set_marker_color(&mut self, part: PartId, color: Color) -> Result<(), SceneError> {
        let entity = part_entity(self, part)?;
        let mut marker = self
            .get::<&mut AnnotationMarker>(entity)
            .map_err(|_| SceneError::StalePart(format!("{part:?}")))?;
        marker.color = color;
        marker.needs_redraw = true;
        Ok(())
    }

    fn remove_marker(&mut self, part: PartId) -> Result<bool, SceneError> {
        let entity = part_entity(self, part)?;
        match self.remove_one::<AnnotationMarker>(entity) {
            Ok(_) => Ok(true),
            Err(ComponentError::MissingComponent(_)) => Ok(false),
            Err(_) => Err(SceneError::StalePart(format!("{part:?}"))),
        }
    }
}

/// Drains pending redraws: returns every marker written since the last call
/// with its shader tint, and clears the flags.
pub fn marker_redraw_system(world: &mut World) -> Vec<(Entity, Vec4)> {
    let mut dirty = Vec::new();
    for (entity, marker) in world.query_mut::<&mut AnnotationMarker>() {
        if marker.needs_redraw {
            marker.needs_redraw = false;
            dirty.push((entity, marker.color.to_vec4()));
        }
    }
    dirty.sort_by_key(|(e, _)| e.id());
    dirty
}
