//! Recently used stroke colors.

use crate::config::DEFAULT_COLOR_HISTORY;
use sketchboard_render::SerializableColor;
use std::collections::VecDeque;

/// Move-to-front list of recent colors, most recent first, no duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorHistory {
    colors: VecDeque<SerializableColor>,
    capacity: usize,
}

impl Default for ColorHistory {
    fn default() -> Self {
        Self::new(DEFAULT_COLOR_HISTORY)
    }
}

impl ColorHistory {
    /// Create an empty history. A capacity of zero is treated as one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            colors: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Record `color` as the most recent.
    ///
    /// A color already present moves to the front; a new color past capacity
    /// evicts the least recently used one.
    pub fn push(&mut self, color: SerializableColor) {
        if let Some(pos) = self.colors.iter().position(|&c| c == color) {
            self.colors.remove(pos);
        } else if self.colors.len() >= self.capacity {
            self.colors.pop_back();
        }
        self.colors.push_front(color);
    }

    pub fn get(&self, index: usize) -> Option<SerializableColor> {
        self.colors.get(index).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = SerializableColor> + '_ {
        self.colors.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
