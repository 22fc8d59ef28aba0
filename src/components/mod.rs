mod render;

pub use render::{AnnotationMarker, Background, MeshPart, Parts};

use hecs::{Entity, NoSuchEntity, World};

/// Stable, scene-unique name of a colorable entity.
pub struct Name(pub String);

/// Points to the entity this one is attached to.
pub struct Parent(pub Entity);

/// Lists entities attached to this one.
pub struct Children(pub Vec<Entity>);

/// Attach `child` under `parent` in the attachment hierarchy.
pub fn add_child(world: &mut World, parent: Entity, child: Entity) -> Result<(), NoSuchEntity> {
    if !world.contains(child) {
        return Err(NoSuchEntity);
    }
    let attached = match world.get::<&mut Children>(parent) {
        Ok(mut children) => {
            if !children.0.contains(&child) {
                children.0.push(child);
            }
            true
        }
        Err(_) => false,
    };
    if !attached {
        world.insert_one(parent, Children(vec![child]))?;
    }

    world.insert_one(child, Parent(parent))
}

/// Detach `child` from `parent`; `child` becomes a root.
pub fn remove_child(world: &mut World, parent: Entity, child: Entity) {
    if let Ok(mut children) = world.get::<&mut Children>(parent) {
        children.0.retain(|&e| e != child);
    }
    let _ = world.remove_one::<Parent>(child);
}

/// Move `child` under `new_parent`, detaching it from its current parent.
pub fn reparent(world: &mut World, child: Entity, new_parent: Entity) -> Result<(), NoSuchEntity> {
    let old = world.get::<&Parent>(child).ok().map(|p| p.0);
    if let Some(old) = old {
        remove_child(world, old, child);
    }
    add_child(world, new_parent, child)
}
