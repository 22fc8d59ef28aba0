use hecs::{NoSuchEntity, World};

use crate::scene::prefabs::{spawn_attached, spawn_backdrop, spawn_object};

/// Build and populate the demo room: a sky backdrop, furniture with several
/// parts each, and a few props attached to furniture.
pub fn load_test_scene(world: &mut World) -> Result<(), NoSuchEntity> {
    spawn_backdrop(world, "SkySphere");
    spawn_object(world, "Floor", &["Tiles"]);

    let table = spawn_object(world, "Table", &["Top", "LegFL", "LegFR", "LegBL", "LegBR"]);
    let lamp = spawn_attached(world, "Lamp", &["Base", "Shade"], table)?;
    spawn_attached(world, "Bulb", &["Glass"], lamp)?;
    spawn_attached(world, "Mug", &["Body", "Handle"], table)?;

    let chair = spawn_object(world, "Chair", &["Seat", "Back", "Legs"]);
    spawn_attached(world, "Cushion", &["Fabric"], chair)?;

    spawn_object(world, "Bookshelf", &["Frame", "ShelfTop", "ShelfBottom"]);

    Ok(())
}
