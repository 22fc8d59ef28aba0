//! Grouping of renderable parts into color identities.
//!
//! The engine owns the [`ColorTable`] and the palette cursor. Every full pass
//! starts from palette index 0 after [`AnnotationEngine::clear_all`]; passes
//! without a clear reuse what the table already holds, so repeating one over
//! an unchanged scene changes nothing.

mod table;

pub use table::ColorTable;

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::config::AnnotatorConfig;
use crate::mode::Mode;
use crate::palette::{Color, Palette};
use crate::scene::{part_key, EntityView, PartView, Scene};

/// Clear / annotate operations the mode controller drives.
pub trait Annotate {
    fn clear_all(&mut self, scene: &mut dyn Scene);
    fn annotate(&mut self, scene: &mut dyn Scene, mode: Mode);
    fn on_entity_added(&mut self, scene: &mut dyn Scene, name: &str, mode: Mode);
}

pub struct AnnotationEngine {
    palette: Arc<Palette>,
    table: ColorTable,
    /// Hierarchy root name → group color, per-object mode only.
    root_colors: HashMap<String, Color>,
    next_index: usize,
    background: Color,
    reserve_background: bool,
    reserve_black: bool,
}

impl AnnotationEngine {
    /// Engine with a white, reserved background.
    pub fn new(palette: Arc<Palette>) -> Self {
        Self {
            palette,
            table: ColorTable::default(),
            root_colors: HashMap::new(),
            next_index: 0,
            background: Color::WHITE,
            reserve_background: true,
            reserve_black: false,
        }
    }

    pub fn from_config(config: &AnnotatorConfig) -> Self {
        Self::new(Arc::new(Palette::new(config.palette_levels)))
            .with_background(config.background, config.reserve_background)
            .with_reserved_black(config.reserve_black)
    }

    /// `reserve`: skip palette entries equal to `background` when handing out
    /// group colors.
    pub fn with_background(mut self, background: Color, reserve: bool) -> Self {
        self.background = background;
        self.reserve_background = reserve;
        self
    }

    /// Skip black when handing out group colors, so a part can never share
    /// the RGB of an unpainted marker.
    pub fn with_reserved_black(mut self, reserve: bool) -> Self {
        self.reserve_black = reserve;
        self
    }

    pub fn palette(&self) -> &Arc<Palette> {
        &self.palette
    }

    pub fn colors(&self) -> &ColorTable {
        &self.table
    }

    /// Color assigned to an entity name or a `<entity>/<part>` key.
    pub fn get_color(&self, name: &str) -> Option<Color> {
        self.table.get(name)
    }

    /// Palette index the next new group will start searching from.
    pub fn next_index(&self) -> usize {
        self.next_index
    }

    /// Destroy every marker in the scene and forget all assignments.
    pub fn clear_all(&mut self, scene: &mut dyn Scene) {
        let Some(entities) = scan(scene, "clear") else {
            return;
        };

        let mut removed = 0usize;
        for part in entities.iter().flat_map(|e| &e.parts) {
            if part.marker.is_none() {
                continue;
            }
            match scene.remove_marker(part.id) {
                Ok(true) => removed += 1,
                Ok(false) => {}
                Err(err) => log::warn!("{}: {err}, marker not removed", part.name),
            }
        }

        self.table.clear();
        self.root_colors.clear();
        self.next_index = 0;
        log::info!("cleared {removed} annotation markers");
    }

    /// Give every renderable part its own color.
    pub fn annotate_per_part(&mut self, scene: &mut dyn Scene) {
        let Some(entities) = scan(scene, "per-part") else {
            return;
        };

        let mut painted = 0usize;
        for entity in &entities {
            painted += self.color_parts_individually(scene, entity);
        }
        log::info!(
            "per-part annotation: {painted} parts painted, {} table entries",
            self.table.len()
        );
    }

    /// Give all parts under one hierarchy root the root's color. Roots get
    /// colors in the order they are first reached in the snapshot. Entities
    /// made only of backdrop parts take no group color.
    pub fn annotate_per_object_hierarchy(&mut self, scene: &mut dyn Scene) {
        let Some(entities) = scan(scene, "per-object") else {
            return;
        };

        let parents = parent_links(&entities);
        let mut roots: HashSet<&str> = HashSet::new();
        let mut painted = 0usize;
        for entity in &entities {
            if is_backdrop(entity) {
                self.paint_backdrop(scene, entity);
                continue;
            }
            let root = resolve_root(&parents, &entity.name);
            roots.insert(root);
            let color = self.root_color(root);
            painted += self.color_entity_as_group(scene, entity, color);
        }
        log::info!(
            "per-object annotation: {} root groups, {painted} parts painted",
            roots.len()
        );
    }

    /// Annotate one entity spawned after the last full pass, leaving every
    /// existing assignment alone.
    pub fn on_entity_added(&mut self, scene: &mut dyn Scene, name: &str, mode: Mode) {
        let Some(entities) = scan(scene, "entity-added") else {
            return;
        };
        let Some(entity) = entities.iter().find(|e| e.name == name) else {
            log::warn!("{name}: not found in scene, nothing to annotate");
            return;
        };

        let painted = match mode {
            Mode::PerPart => self.color_parts_individually(scene, entity),
            Mode::PerObjectHierarchy => {
                if self.table.contains(name) {
                    log::debug!("{name}: already annotated");
                    return;
                }
                if is_backdrop(entity) {
                    self.paint_backdrop(scene, entity);
                    return;
                }
                let parents = parent_links(&entities);
                let root = resolve_root(&parents, &entity.name);
                let color = self.root_color(root);
                self.color_entity_as_group(scene, entity, color)
            }
        };
        log::debug!("{name}: {painted} new parts annotated ({mode})");
    }

    /// The entity name itself maps to the color of its last colored part.
    fn color_parts_individually(&mut self, scene: &mut dyn Scene, entity: &EntityView) -> usize {
        let mut painted = 0;
        let mut last = None;
        for part in &entity.parts {
            let key = part_key(&entity.name, &part.name);
            if self.handle_background(scene, &key, part) {
                continue;
            }
            let color = match self.table.get(&key) {
                Some(color) if part.marker == Some(color) => {
                    last = Some(color);
                    continue;
                }
                Some(color) => color,
                None => self.next_color(),
            };
            if paint(scene, part, color) {
                self.table.insert(key, color);
                last = Some(color);
                painted += 1;
            }
        }
        if let Some(color) = last {
            self.table.insert(entity.name.clone(), color);
        }
        painted
    }

    fn color_entity_as_group(
        &mut self,
        scene: &mut dyn Scene,
        entity: &EntityView,
        color: Color,
    ) -> usize {
        self.table.insert(entity.name.clone(), color);

        let mut painted = 0;
        for part in &entity.parts {
            let key = part_key(&entity.name, &part.name);
            if self.handle_background(scene, &key, part) {
                continue;
            }
            if part.marker != Some(color) {
                if !paint(scene, part, color) {
                    continue;
                }
                painted += 1;
            }
            self.table.insert(key, color);
        }
        painted
    }

    fn root_color(&mut self, root: &str) -> Color {
        if let Some(&color) = self.root_colors.get(root) {
            return color;
        }
        let color = self.next_color();
        self.root_colors.insert(root.to_owned(), color);
        self.table.insert(root.to_owned(), color);
        color
    }

    fn paint_backdrop(&self, scene: &mut dyn Scene, entity: &EntityView) {
        for part in &entity.parts {
            if part.marker != Some(self.background) {
                paint(scene, part, self.background);
            }
        }
    }

    /// Backdrop parts get the background color and never enter the table.
    /// A part outside the table already showing the background color is
    /// left as is. Returns `true` if the part needs no further work.
    fn handle_background(&self, scene: &mut dyn Scene, key: &str, part: &PartView) -> bool {
        if part.background {
            if part.marker != Some(self.background) {
                paint(scene, part, self.background);
            }
            return true;
        }
        !self.table.contains(key) && part.marker == Some(self.background)
    }

    /// Next palette color, wrapping past the end of the palette.
    fn next_color(&mut self) -> Color {
        for _ in 0..self.palette.len() {
            let color = self.palette.color(self.next_index);
            self.next_index += 1;
            let reserved = (self.reserve_background && color == self.background)
                || (self.reserve_black && color == Color::BLACK);
            if !reserved {
                return color;
            }
        }
        // Only reachable with a palette made of nothing but reserved colors.
        self.palette.color(self.next_index)
    }
}

impl Annotate for AnnotationEngine {
    fn clear_all(&mut self, scene: &mut dyn Scene) {
        AnnotationEngine::clear_all(self, scene);
    }

    fn annotate(&mut self, scene: &mut dyn Scene, mode: Mode) {
        mode.apply(self, scene);
    }

    fn on_entity_added(&mut self, scene: &mut dyn Scene, name: &str, mode: Mode) {
        AnnotationEngine::on_entity_added(self, scene, name, mode);
    }
}

fn scan(scene: &dyn Scene, pass: &str) -> Option<Vec<EntityView>> {
    match scene.snapshot() {
        Ok(entities) => Some(entities),
        Err(err) => {
            log::warn!("{pass} pass skipped: {err}");
            None
        }
    }
}

fn paint(scene: &mut dyn Scene, part: &PartView, color: Color) -> bool {
    let result = scene
        .ensure_marker(part.id)
        .and_then(|()| scene.set_marker_color(part.id, color));
    match result {
        Ok(()) => true,
        Err(err) => {
            log::warn!("{}: {err}, skipping", part.name);
            false
        }
    }
}

/// Only backdrop parts: painted with the background, but never a group.
fn is_backdrop(entity: &EntityView) -> bool {
    !entity.parts.is_empty() && entity.parts.iter().all(|p| p.background)
}

fn parent_links(entities: &[EntityView]) -> HashMap<&str, Option<&str>> {
    entities
        .iter()
        .map(|e| (e.name.as_str(), e.parent.as_deref()))
        .collect()
}

/// Follow attachment links up to the top-most entity. A parent missing from
/// the snapshot or a cycle ends the walk at the last entity reached.
fn resolve_root<'a>(parents: &HashMap<&'a str, Option<&'a str>>, name: &'a str) -> &'a str {
    let mut current = name;
    let mut visited = HashSet::from([name]);
    while let Some(parent) = parents.get(current).copied().flatten() {
        if !parents.contains_key(parent) {
            log::warn!("{current}: parent {parent} is not in the scene, treating {current} as root");
            break;
        }
        if !visited.insert(parent) {
            log::warn!("attachment cycle through {parent}, treating {current} as root");
            break;
        }
        current = parent;
    }
    current
}
