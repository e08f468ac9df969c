//! # Grid Pathfinding
//!
//! Four-directional A* over the level canvas, used to route corridors between doors.

use crate::game::{Position, Size};
use ::pathfinding::prelude::astar;
use std::collections::HashSet;

/// Finds a shortest 4-directional path from `start` to `goal`.
///
/// Cells are passable when inside `bounds` and not in `blocked`. The start and goal are
/// always passable. The returned path excludes `start` and ends at `goal`; `None` means
/// the goal is unreachable.
///
/// # Examples
///
/// ```
/// use cavern::{route, Position, Size};
/// use std::collections::HashSet;
///
/// let path = route(Position::new(0, 0), Position::new(3, 0), Size::new(5, 5), &HashSet::new());
/// assert_eq!(path.map(|p| p.len()), Some(3));
/// ```
pub fn route(
    start: Position,
    goal: Position,
    bounds: Size,
    blocked: &HashSet<Position>,
) -> Option<Vec<Position>> {
    let passable = |pos: &Position| {
        *pos == start || *pos == goal || (bounds.contains(*pos) && !blocked.contains(pos))
    };

    let (path, _cost) = astar(
        &start,
        |pos| {
            pos.cardinal_adjacent_positions()
                .into_iter()
                .filter(|next| passable(next))
                .map(|next| (next, 1u32))
                .collect::<Vec<_>>()
        },
        |pos| pos.manhattan_distance(goal),
        |pos| *pos == goal,
    )?;

    Some(path.into_iter().skip(1).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_straight_line() {
        let path = route(
            Position::new(1, 1),
            Position::new(1, 4),
            Size::new(5, 6),
            &HashSet::new(),
        )
        .unwrap();
        assert_eq!(
            path,
            vec![Position::new(1, 2), Position::new(1, 3), Position::new(1, 4)]
        );
    }

    #[test]
    fn test_route_around_obstacle() {
        // Wall across x = 2 except for the bottom row
        let blocked: HashSet<Position> = (0..4).map(|y| Position::new(2, y)).collect();
        let path = route(
            Position::new(0, 0),
            Position::new(4, 0),
            Size::new(5, 5),
            &blocked,
        )
        .unwrap();
        assert_eq!(path.last(), Some(&Position::new(4, 0)));
        assert!(path.iter().all(|p| !blocked.contains(p)));
        // Shortest detour: down 4, across 4, up 4
        assert_eq!(path.len(), 12);
    }

    #[test]
    fn test_route_endpoints_ignore_blocked() {
        let blocked: HashSet<Position> = [Position::new(0, 0), Position::new(2, 0)].into();
        let path = route(
            Position::new(0, 0),
            Position::new(2, 0),
            Size::new(3, 1),
            &blocked,
        );
        assert_eq!(path, Some(vec![Position::new(1, 0), Position::new(2, 0)]));
    }

    #[test]
    fn test_route_unreachable() {
        let blocked: HashSet<Position> = (0..3).map(|y| Position::new(1, y)).collect();
        let path = route(
            Position::new(0, 0),
            Position::new(2, 2),
            Size::new(3, 3),
            &blocked,
        );
        assert!(path.is_none());
    }

    #[test]
    fn test_route_start_equals_goal() {
        let path = route(
            Position::new(1, 1),
            Position::new(1, 1),
            Size::new(3, 3),
            &HashSet::new(),
        );
        assert_eq!(path, Some(Vec::new()));
    }
}
