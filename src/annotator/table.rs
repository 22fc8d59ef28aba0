use std::collections::{HashMap, HashSet};

use crate::palette::Color;

/// Name → annotation color. Only [`AnnotationEngine`](super::AnnotationEngine)
/// writes to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColorTable {
    colors: HashMap<String, Color>,
}

impl ColorTable {
    pub fn get(&self, name: &str) -> Option<Color> {
        self.colors.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.colors.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Color)> {
        self.colors.iter().map(|(name, &color)| (name.as_str(), color))
    }

    /// Entries sorted by name.
    pub fn sorted(&self) -> Vec<(&str, Color)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }

    /// Number of distinct colors in use.
    pub fn distinct_colors(&self) -> usize {
        self.colors.values().collect::<HashSet<_>>().len()
    }

    pub(crate) fn insert(&mut self, name: String, color: Color) {
        self.colors.insert(name, color);
    }

    pub(crate) fn clear(&mut self) {
        self.colors.clear();
    }
}
