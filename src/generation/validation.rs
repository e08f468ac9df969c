//! # Environment Validation
//!
//! Consistency checks on finished level geometry, plus the snapping pass that repairs
//! corridors ending one cell short of a door.

use crate::game::{CorridorPath, Position, Room, WorldGeometry};
use crate::generation::RoomGraph;
use std::collections::HashSet;

/// Structural defect found in level geometry.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A door that is not on its room's wall ring
    #[error("door at {door} is not on the perimeter of room {room}")]
    DoorNotOnPerimeter { room: usize, door: Position },

    /// A corridor whose last tile is not a door
    #[error("corridor {corridor} does not end at a door (ends at {end:?})")]
    CorridorNotEndingAtDoor {
        corridor: usize,
        end: Option<Position>,
    },
}

/// True if `pos` lies on the wall ring of `room`.
pub fn is_on_perimeter(pos: Position, room: &Room) -> bool {
    room.is_on_perimeter(pos)
}

fn door_cells(rooms: &[Room]) -> HashSet<Position> {
    rooms
        .iter()
        .flat_map(|room| room.doors.iter().map(|door| door.position))
        .collect()
}

/// Every defect in the geometry, doors first.
pub fn violations(world: &WorldGeometry) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for (index, room) in world.rooms.iter().enumerate() {
        for door in &room.doors {
            if !is_on_perimeter(door.position, room) {
                errors.push(ValidationError::DoorNotOnPerimeter {
                    room: index,
                    door: door.position,
                });
            }
        }
    }

    let doors = door_cells(&world.rooms);
    for (index, corridor) in world.corridors.iter().enumerate() {
        match corridor.last() {
            Some(end) if doors.contains(&end) => {}
            end => errors.push(ValidationError::CorridorNotEndingAtDoor {
                corridor: index,
                end,
            }),
        }
    }
    errors
}

/// Fails with the first defect found.
///
/// # Examples
///
/// ```
/// use cavern::{validate, Size, WorldGeometry};
///
/// let world = WorldGeometry::new(Size::new(10, 10), Vec::new(), Vec::new());
/// assert!(validate(&world).is_ok());
/// ```
pub fn validate(world: &WorldGeometry) -> Result<(), ValidationError> {
    match violations(world).into_iter().next() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

/// Extends corridors that stop next to a door so they end on it.
pub fn snapped(rooms: &[Room], corridors: Vec<CorridorPath>) -> Vec<CorridorPath> {
    let doors = door_cells(rooms);
    corridors
        .into_iter()
        .map(|mut corridor| {
            let Some(end) = corridor.last() else {
                return corridor;
            };
            if doors.contains(&end) {
                return corridor;
            }
            if let Some(door) = end
                .cardinal_adjacent_positions()
                .into_iter()
                .find(|pos| doors.contains(pos))
            {
                log::debug!("Snapped corridor end {} onto door {}", end, door);
                corridor.tiles.push(door);
            }
            corridor
        })
        .collect()
}

/// Rooms that cannot be reached from `start` over `edges`.
pub fn unreachable_rooms(room_count: usize, edges: &[(usize, usize)], start: usize) -> Vec<usize> {
    RoomGraph::new(room_count, edges)
        .bfs_distances(start)
        .into_iter()
        .enumerate()
        .filter_map(|(room, distance)| distance.is_none().then_some(room))
        .collect()
}
