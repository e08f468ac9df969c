//! Ray-cast field of view.
//!
//! Two modes depending on where the player stands:
//!
//! - **Corridor**: four axis rays. Walls end a ray without being shown.
//! - **Room** (strictly inside an interior): Bresenham rays to every cell of the radius
//!   circle, with corner blocking, door slits and axis locks after a door. The player's
//!   room is then revealed in full.

use crate::game::{Position, Room, WallAxis, WorldGeometry};
use crate::utils::BresenhamLine;
use crate::visibility::VisibilityMap;
use std::collections::{HashMap, HashSet};

/// Computes the cells visible from `player` within `radius`.
///
/// The returned map's seen set equals its visible set; callers accumulate across turns.
///
/// # Examples
///
/// ```
/// use cavern::{compute_visibility, Position, Room, Size, WorldGeometry};
///
/// let world = WorldGeometry::new(
///     Size::new(20, 20),
///     vec![Room::new(Position::new(0, 0), 10, 10)],
///     Vec::new(),
/// );
/// let map = compute_visibility(Position::new(4, 4), &world, 7);
/// assert!(map.visible.contains(&Position::new(5, 4)));
/// assert!(map.visible.contains(&Position::new(0, 0)));
/// ```
pub fn compute_visibility(player: Position, world: &WorldGeometry, radius: i32) -> VisibilityMap {
    let mut visible = HashSet::new();
    visible.insert(player);

    match world.room_with_interior(player) {
        None => cast_corridor_rays(player, world, radius, &mut visible),
        Some(room) => {
            let doors = door_axes(world);
            cast_room_rays(player, world, radius, &doors, &mut visible);
            reveal_room(room, &mut visible);
        }
    }

    log::trace!("FOV from {} (r={}): {} cells", player, radius, visible.len());
    VisibilityMap {
        seen_by_level: visible.clone(),
        visible,
    }
}

fn cast_corridor_rays(
    player: Position,
    world: &WorldGeometry,
    radius: i32,
    visible: &mut HashSet<Position>,
) {
    for (dx, dy) in [(1, 0), (-1, 0), (0, 1), (0, -1)] {
        for step in 1..=radius {
            let cell = player.offset(dx * step, dy * step);
            if !world.in_bounds(cell) || world.is_wall(cell) {
                break;
            }
            visible.insert(cell);
            if world.is_opaque(cell) {
                break;
            }
        }
    }
}

/// Wall axis of every door on the level.
fn door_axes(world: &WorldGeometry) -> HashMap<Position, WallAxis> {
    let mut axes = HashMap::new();
    for room in &world.rooms {
        for door in &room.doors {
            if let Some(axis) = room.wall_axis(door.position) {
                axes.insert(door.position, axis);
            }
        }
    }
    axes
}

/// True if a diagonal step from `prev` to `next` squeezes past an opaque cell.
///
/// # Examples
///
/// ```
/// use cavern::{blocks_diagonal, Position, Room, Size, WorldGeometry};
///
/// // Wall ring of the small room covers (6,5) but not (6,6) or (5,6)
/// let world = WorldGeometry::new(Size::new(20, 20), vec![Room::new(Position::new(6, 3), 3, 3)], vec![]);
/// assert!(blocks_diagonal(Position::new(5, 5), Position::new(6, 6), &world));
/// assert!(!blocks_diagonal(Position::new(5, 5), Position::new(5, 6), &world));
/// ```
pub fn blocks_diagonal(prev: Position, next: Position, world: &WorldGeometry) -> bool {
    let diagonal = (next.x - prev.x).abs() == 1 && (next.y - prev.y).abs() == 1;
    diagonal
        && (world.is_opaque(Position::new(prev.x, next.y))
            || world.is_opaque(Position::new(next.x, prev.y)))
}

/// Next to a door, a ray may only run along that door's slit.
fn blocks_near_door(prev: Position, next: Position, doors: &HashMap<Position, WallAxis>) -> bool {
    prev.cardinal_adjacent_positions()
        .into_iter()
        .filter_map(|cell| doors.get(&cell).map(|&axis| (cell, axis)))
        .any(|(door, axis)| match axis {
            WallAxis::Vertical => next.y != door.y,
            WallAxis::Horizontal => next.x != door.x,
        })
}

#[derive(Debug, Clone, Copy, Default)]
struct AxisLock {
    x: Option<i32>,
    y: Option<i32>,
}

impl AxisLock {
    fn is_set(self) -> bool {
        self.x.is_some() || self.y.is_some()
    }

    fn through(door: Position, axis: WallAxis) -> Self {
        match axis {
            WallAxis::Vertical => Self {
                x: None,
                y: Some(door.y),
            },
            WallAxis::Horizontal => Self {
                x: Some(door.x),
                y: None,
            },
        }
    }

    fn allows(self, cell: Position) -> bool {
        self.x.map_or(true, |x| cell.x == x) && self.y.map_or(true, |y| cell.y == y)
    }
}

fn cast_room_rays(
    player: Position,
    world: &WorldGeometry,
    radius: i32,
    doors: &HashMap<Position, WallAxis>,
    visible: &mut HashSet<Position>,
) {
    let r2 = radius * radius;
    let min_x = (player.x - radius).max(0);
    let max_x = (player.x + radius).min(world.canvas.width - 1);
    let min_y = (player.y - radius).max(0);
    let max_y = (player.y + radius).min(world.canvas.height - 1);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let (dx, dy) = (x - player.x, y - player.y);
            if dx * dx + dy * dy > r2 {
                continue;
            }
            trace_ray(player, Position::new(x, y), world, doors, visible);
        }
    }
}

fn trace_ray(
    player: Position,
    target: Position,
    world: &WorldGeometry,
    doors: &HashMap<Position, WallAxis>,
    visible: &mut HashSet<Position>,
) {
    let mut prev = player;
    let mut lock = AxisLock::default();

    for cell in BresenhamLine::new(player, target).skip(1) {
        if blocks_diagonal(prev, cell, world) || blocks_near_door(prev, cell, doors) {
            break;
        }

        if let Some(&axis) = doors.get(&cell) {
            visible.insert(cell);
            if world.is_locked_door(cell) {
                break;
            }
            let entered_along_slit = match axis {
                WallAxis::Vertical => prev.y == cell.y,
                WallAxis::Horizontal => prev.x == cell.x,
            };
            if entered_along_slit {
                lock = AxisLock::through(cell, axis);
            }
        }

        if !lock.is_set() {
            if let Some(&axis) = doors.get(&prev) {
                lock = AxisLock::through(prev, axis);
            }
        }
        if !lock.allows(cell) {
            break;
        }

        visible.insert(cell);
        if world.is_opaque(cell) {
            break;
        }
        prev = cell;
    }
}

/// Walls, floor and doors of `room`.
fn reveal_room(room: &Room, visible: &mut HashSet<Position>) {
    visible.extend(room.wall_positions());
    if room.has_interior() {
        visible.extend(room.floor_positions());
    }
    visible.extend(room.doors.iter().map(|door| door.position));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CorridorPath, DoorKind, KeyColor, Size};

    /// Room spanning (0,0)-(10,8) with a door on its right wall at (10,4).
    fn room_with_east_door() -> WorldGeometry {
        let mut room = Room::new(Position::new(0, 0), 11, 9);
        room.add_door(Position::new(10, 4));
        let corridor = CorridorPath::new((11..=18).map(|x| Position::new(x, 4)).collect());
        WorldGeometry::new(Size::new(30, 12), vec![room], vec![corridor])
    }

    #[test]
    fn test_room_is_fully_revealed() {
        let world = room_with_east_door();
        let map = compute_visibility(Position::new(2, 2), &world, 3);
        for cell in world.rooms[0].wall_positions() {
            assert!(map.visible.contains(&cell), "wall {} hidden", cell);
        }
        assert!(map.visible.contains(&Position::new(9, 7)));
        assert_eq!(map.visible, map.seen_by_level);
    }

    #[test]
    fn test_sight_through_door_slit() {
        let world = room_with_east_door();
        let map = compute_visibility(Position::new(5, 4), &world, 7);
        assert!(map.visible.contains(&Position::new(11, 4)));
        assert!(map.visible.contains(&Position::new(12, 4)));
        // Off the slit row beyond the door
        assert!(!map.visible.contains(&Position::new(11, 3)));
        assert!(!map.visible.contains(&Position::new(11, 5)));
    }

    #[test]
    fn test_locked_door_is_seen_but_blocks() {
        let mut world = room_with_east_door();
        world.rooms[0].set_door_kind(Position::new(10, 4), DoorKind::Locked(KeyColor::Blue));
        let map = compute_visibility(Position::new(5, 4), &world, 7);
        assert!(map.visible.contains(&Position::new(10, 4)));
        assert!(!map.visible.contains(&Position::new(11, 4)));
    }

    #[test]
    fn test_corridor_rays_skip_walls() {
        let world = room_with_east_door();
        let map = compute_visibility(Position::new(14, 4), &world, 5);
        assert!(map.visible.contains(&Position::new(10, 4)));
        assert!(map.visible.contains(&Position::new(9, 4)));
        assert!(map.visible.contains(&Position::new(19, 4)));
        // Only straight rays in corridor mode
        assert!(!map.visible.contains(&Position::new(13, 3)));
        assert!(!map.visible.contains(&Position::new(10, 3)));
    }

    #[test]
    fn test_corridor_ray_stops_at_wall_without_recording() {
        let world = room_with_east_door();
        // Left of (11,2) is the room's right wall
        let map = compute_visibility(Position::new(11, 2), &world, 4);
        assert!(!map.visible.contains(&Position::new(10, 2)));
        assert!(map.visible.contains(&Position::new(11, 4)));
    }

    #[test]
    fn test_corridor_mode_radius_is_inclusive() {
        let world = WorldGeometry::new(Size::new(30, 12), Vec::new(), Vec::new());
        let map = compute_visibility(Position::new(10, 5), &world, 3);
        assert!(map.visible.contains(&Position::new(13, 5)));
        assert!(!map.visible.contains(&Position::new(14, 5)));
        assert_eq!(map.visible.len(), 13);
    }
}
