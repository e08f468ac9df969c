//! # Corridor Generator
//!
//! Routes a corridor between the doors of each link. Rooms and already built corridors
//! are impassable; door cells stay enterable.

use super::LevelGenerationPlan;
use crate::game::{CorridorPath, Position, Room, Size};
use crate::utils::pathfinding::route;
use std::collections::HashSet;

/// Cells a corridor may not cross: room walls, room interiors and built corridors,
/// minus every door.
pub fn build_blocked(rooms: &[Room], corridors: &[CorridorPath]) -> HashSet<Position> {
    let mut blocked = HashSet::new();
    for room in rooms {
        blocked.extend(room.wall_positions());
        blocked.extend(room.floor_positions());
    }
    for corridor in corridors {
        blocked.extend(corridor.tiles.iter().copied());
    }
    for room in rooms {
        for door in &room.doors {
            blocked.remove(&door.position);
        }
    }
    blocked
}

/// Routes a single corridor from `from` to `to`.
pub fn connect(
    from: Position,
    to: Position,
    canvas: Size,
    blocked: &HashSet<Position>,
) -> Option<CorridorPath> {
    route(from, to, canvas, blocked).map(CorridorPath::new)
}

/// Stage: routes every door link in order and records which edges got a corridor.
///
/// A successful route is blocked for all later ones. Unroutable links are logged and
/// simply left without a corridor.
pub fn route_corridors(mut plan: LevelGenerationPlan) -> LevelGenerationPlan {
    let mut blocked = build_blocked(&plan.rooms, &plan.corridors);
    let door_cells: HashSet<Position> = plan
        .rooms
        .iter()
        .flat_map(|room| room.doors.iter().map(|door| door.position))
        .collect();

    let mut connected = Vec::with_capacity(plan.door_links.len());
    for link in &plan.door_links {
        match connect(link.from, link.to, plan.canvas, &blocked) {
            Some(corridor) => {
                blocked.extend(
                    corridor
                        .tiles
                        .iter()
                        .filter(|tile| !door_cells.contains(tile))
                        .copied(),
                );
                log::trace!(
                    "Corridor {} -> {} with {} tiles",
                    link.i,
                    link.j,
                    corridor.tiles.len()
                );
                plan.corridors.push(corridor);
                connected.push((link.i, link.j));
            }
            None => {
                log::warn!(
                    "No corridor between rooms {} and {} ({} -> {})",
                    link.i,
                    link.j,
                    link.from,
                    link.to
                );
            }
        }
    }

    log::debug!(
        "Routed {} of {} corridors",
        connected.len(),
        plan.door_links.len()
    );
    plan.connected_edges = connected;
    plan
}
