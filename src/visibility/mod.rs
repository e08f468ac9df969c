//! # Visibility Module
//!
//! Field of view and the fog-of-war bookkeeping around it.
//!
//! The per-turn visible set is recomputed from scratch by [`compute_visibility`]; the
//! explored set only ever grows until the level is replaced.

pub mod fov;

pub use fov::*;

use crate::game::{Position, WorldGeometry};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Visible cells for this turn and everything seen on the current level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibilityMap {
    pub visible: HashSet<Position>,
    pub seen_by_level: HashSet<Position>,
}

impl VisibilityMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets everything, used on level transition.
    pub fn clear_for_level(&mut self) {
        self.visible.clear();
        self.seen_by_level.clear();
    }

    /// Replaces the visible set and folds it into the seen set.
    pub fn record(&mut self, visible: HashSet<Position>) {
        self.seen_by_level.extend(visible.iter().copied());
        self.visible = visible;
    }

    /// Recomputes the field of view from `player` and records it.
    pub fn update(&mut self, player: Position, world: &WorldGeometry, radius: i32) {
        let fresh = compute_visibility(player, world, radius);
        self.record(fresh.visible);
    }

    pub fn is_visible(&self, cell: Position) -> bool {
        self.visible.contains(&cell)
    }

    pub fn is_seen(&self, cell: Position) -> bool {
        self.seen_by_level.contains(&cell)
    }
}

/// What a renderer needs after a turn: cells lit now and cells remembered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisibilitySnapshot {
    pub visible: HashSet<Position>,
    pub explored: HashSet<Position>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Room, Size};

    #[test]
    fn test_seen_grows_and_clears() {
        let world = WorldGeometry::new(
            Size::new(30, 12),
            vec![
                Room::new(Position::new(0, 0), 8, 8),
                Room::new(Position::new(15, 0), 8, 8),
            ],
            Vec::new(),
        );
        let mut map = VisibilityMap::new();
        map.update(Position::new(3, 3), &world, 7);
        let first_room = map.seen_by_level.len();
        assert!(map.is_visible(Position::new(3, 3)));

        map.update(Position::new(18, 3), &world, 7);
        assert!(!map.is_visible(Position::new(3, 3)));
        assert!(map.is_seen(Position::new(3, 3)));
        assert!(map.seen_by_level.len() > first_room);

        map.clear_for_level();
        assert!(map.visible.is_empty());
        assert!(map.seen_by_level.is_empty());
    }
}
