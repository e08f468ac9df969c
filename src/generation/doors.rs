//! # Door Factory
//!
//! Places a facing pair of doors for every graph edge.

use super::{DoorLink, LevelGenerationPlan};
use crate::game::{Position, Room};
use crate::utils::math::{clamp, intersection, union_span};
use std::ops::RangeInclusive;

/// Picks the door cells joining rooms `a` and `b`.
///
/// When the centers are further apart horizontally (ties included) the doors sit on the
/// facing vertical walls; otherwise on the facing horizontal walls. The shared
/// coordinate is the midpoint of both centers, clamped into the overlap of the two
/// interiors (or their combined span when they do not overlap) and then into each room's
/// own interior so neither door lands on a corner.
pub fn pick_door_pair(a: &Room, b: &Room) -> (Position, Position) {
    let ca = a.center();
    let cb = b.center();
    let dx = (cb.x - ca.x).abs();
    let dy = (cb.y - ca.y).abs();

    if dx >= dy {
        let (ya, yb) = (a.inner_y_range(), b.inner_y_range());
        let y = shared_coordinate((ca.y + cb.y) / 2, &ya, &yb);
        let (xa, xb) = if cb.x >= ca.x {
            (a.right(), b.left())
        } else {
            (a.left(), b.right())
        };
        (
            Position::new(xa, clamp(y, *ya.start(), *ya.end())),
            Position::new(xb, clamp(y, *yb.start(), *yb.end())),
        )
    } else {
        let (xa, xb) = (a.inner_x_range(), b.inner_x_range());
        let x = shared_coordinate((ca.x + cb.x) / 2, &xa, &xb);
        let (ya, yb) = if cb.y >= ca.y {
            (a.bottom(), b.top())
        } else {
            (a.top(), b.bottom())
        };
        (
            Position::new(clamp(x, *xa.start(), *xa.end()), ya),
            Position::new(clamp(x, *xb.start(), *xb.end()), yb),
        )
    }
}

fn shared_coordinate(base: i32, a: &RangeInclusive<i32>, b: &RangeInclusive<i32>) -> i32 {
    let range = intersection(a, b).unwrap_or_else(|| union_span(a, b));
    clamp(base, *range.start(), *range.end())
}

/// Stage: adds doors to both rooms of every edge and records the door links.
pub fn place_doors(mut plan: LevelGenerationPlan) -> LevelGenerationPlan {
    let mut links = Vec::with_capacity(plan.edges.len());
    for &(i, j) in &plan.edges {
        let (from, to) = pick_door_pair(&plan.rooms[i], &plan.rooms[j]);
        plan.rooms[i].add_door(from);
        plan.rooms[j].add_door(to);
        links.push(DoorLink { i, j, from, to });
    }
    log::debug!("Placed door pairs for {} edges", links.len());
    plan.door_links = links;
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Size;

    #[test]
    fn test_horizontal_pair_faces_each_other() {
        let a = Room::new(Position::new(0, 0), 8, 7);
        let b = Room::new(Position::new(20, 2), 8, 7);
        let (da, db) = pick_door_pair(&a, &b);
        assert_eq!(da.x, a.right());
        assert_eq!(db.x, b.left());
        assert_eq!(da.y, db.y);
        assert!(a.is_on_perimeter(da));
        assert!(b.is_on_perimeter(db));
    }

    #[test]
    fn test_horizontal_pair_mirrors_when_reversed() {
        let a = Room::new(Position::new(20, 2), 8, 7);
        let b = Room::new(Position::new(0, 0), 8, 7);
        let (da, db) = pick_door_pair(&a, &b);
        assert_eq!(da.x, a.left());
        assert_eq!(db.x, b.right());
    }

    #[test]
    fn test_vertical_pair_without_overlap_stays_off_corners() {
        let a = Room::new(Position::new(0, 0), 6, 6);
        let b = Room::new(Position::new(8, 30), 6, 6);
        let (da, db) = pick_door_pair(&a, &b);
        assert_eq!(da.y, a.bottom());
        assert_eq!(db.y, b.top());
        assert!(a.inner_x_range().contains(&da.x));
        assert!(b.inner_x_range().contains(&db.x));
    }

    #[test]
    fn test_place_doors_records_links() {
        let mut plan = LevelGenerationPlan::new(Size::new(80, 39), 1);
        plan.rooms = vec![
            Room::new(Position::new(0, 0), 8, 7),
            Room::new(Position::new(20, 0), 8, 7),
        ];
        plan.edges = vec![(0, 1)];
        let plan = place_doors(plan);
        assert_eq!(plan.door_links.len(), 1);
        let link = plan.door_links[0];
        assert!(plan.rooms[0].door_at(link.from).is_some());
        assert!(plan.rooms[1].door_at(link.to).is_some());
    }
}
