use hecs::{Entity, NoSuchEntity, World};

use crate::components::{
    add_child, remove_child, Background, Children, MeshPart, Name, Parent, Parts,
};

/// Spawn a colorable entity with one renderable part per name in `parts`.
pub fn spawn_object(world: &mut World, name: &str, parts: &[&str]) -> Entity {
    let entity = world.spawn((Name(name.to_owned()),));
    let part_entities: Vec<Entity> = parts
        .iter()
        .map(|part| {
            world.spawn((MeshPart {
                name: (*part).to_owned(),
                owner: entity,
            },))
        })
        .collect();
    // Just spawned, cannot be missing.
    let _ = world.insert_one(entity, Parts(part_entities));
    entity
}

/// Spawn an object and attach it under `parent`.
pub fn spawn_attached(
    world: &mut World,
    name: &str,
    parts: &[&str],
    parent: Entity,
) -> Result<Entity, NoSuchEntity> {
    let entity = spawn_object(world, name, parts);
    add_child(world, parent, entity)?;
    Ok(entity)
}

/// Spawn a single-part backdrop object (sky dome, far walls).
pub fn spawn_backdrop(world: &mut World, name: &str) -> Entity {
    let entity = spawn_object(world, name, &["Mesh"]);
    let parts = world
        .get::<&Parts>(entity)
        .map(|p| p.0.clone())
        .unwrap_or_default();
    for part in parts {
        let _ = world.insert_one(part, Background);
    }
    entity
}

/// Remove an object and all of its parts. Objects attached to it become
/// roots.
pub fn despawn_object(world: &mut World, entity: Entity) -> Result<(), NoSuchEntity> {
    let children = world
        .get::<&Children>(entity)
        .map(|c| c.0.clone())
        .unwrap_or_default();
    for child in children {
        let _ = world.remove_one::<Parent>(child);
    }
    let parent = world.get::<&Parent>(entity).ok().map(|p| p.0);
    if let Some(parent) = parent {
        remove_child(world, parent, entity);
    }

    let parts = world
        .get::<&Parts>(entity)
        .map(|p| p.0.clone())
        .unwrap_or_default();
    for part in parts {
        let _ = world.despawn(part);
    }
    world.despawn(entity)
}

/// Renderable part entity called `part` on `entity`, if any.
pub fn find_part(world: &World, entity: Entity, part: &str) -> Option<Entity> {
    let parts = world.get::<&Parts>(entity).ok()?.0.clone();
    parts.into_iter().find(|&p| {
        world
            .get::<&MeshPart>(p)
            .map(|mesh| mesh.owner == entity && mesh.name == part)
            .unwrap_or(false)
    })
}

/// Colorable entity named `name`, if any.
pub fn find_object(world: &World, name: &str) -> Option<Entity> {
    world
        .query::<&Name>()
        .iter()
        .find(|(_, n)| n.0 == name)
        .map(|(e, _)| e)
}
