use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use hecs::World;

use segmask::scene::prefabs::{find_object, spawn_attached, spawn_object};
use segmask::scene::test_scene::load_test_scene;
use segmask::scene::world::marker_redraw_system;
use segmask::{AnnotationEngine, AnnotatorConfig, ModeController};

#[derive(Parser)]
#[command(name = "segmask", about = "Annotation colors for segmentation masks")]
struct Args {
    /// TOML file with annotator settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Segmentation mode to switch to after the startup pass (part | object)
    #[arg(long)]
    mode: Option<String>,

    /// Spawn an extra object after annotation, as NAME or NAME:PARENT
    #[arg(long = "spawn", value_name = "NAME[:PARENT]")]
    spawn: Vec<String>,

    /// Renderable parts per spawned object
    #[arg(long, default_value_t = 1)]
    parts: usize,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => AnnotatorConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => AnnotatorConfig::default(),
    };

    let mut world = World::new();
    load_test_scene(&mut world).context("building demo scene")?;

    let engine = AnnotationEngine::from_config(&config);
    let mut controller = ModeController::with_mode(engine, config.default_mode);
    controller.reannotate(&mut world);

    if let Some(mode) = &args.mode {
        controller.set_mode(&mut world, mode)?;
    }

    let part_names: Vec<String> = (0..args.parts).map(|i| format!("Part{i}")).collect();
    let part_names: Vec<&str> = part_names.iter().map(String::as_str).collect();
    for request in &args.spawn {
        let (name, parent) = match request.split_once(':') {
            Some((name, parent)) => (name, Some(parent)),
            None => (request.as_str(), None),
        };
        if find_object(&world, name).is_some() {
            bail!("an object named {name:?} already exists");
        }
        match parent {
            Some(parent) => {
                let parent = find_object(&world, parent)
                    .with_context(|| format!("no object named {parent:?} to attach {name} to"))?;
                spawn_attached(&mut world, name, &part_names, parent)?;
            }
            None => {
                spawn_object(&mut world, name, &part_names);
            }
        }
        controller.on_entity_added(&mut world, name);
    }

    let redrawn = marker_redraw_system(&mut world);
    log::info!("{} markers queued for redraw", redrawn.len());

    println!("mode: {}", controller.mode());
    for (name, color) in controller.annotator().colors().sorted() {
        println!("{name:<24} {color}");
    }
    Ok(())
}
