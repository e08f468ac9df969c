//! # Progression
//!
//! Exit selection and lock-and-key gating along the start → exit path.
//!
//! Both stages work on the corridor-backed room graph, so a link whose corridor could
//! not be routed never counts as a way through the level.

use super::{DoorLink, LevelGenerationPlan, RoomGraph};
use crate::game::{DoorKind, Item, KeyColor, Placed, Position};
use crate::generation::placement::random_free_floor;
use crate::generation::validation::unreachable_rooms;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;

/// Undirected edge key with the smaller index first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(pub usize, pub usize);

impl EdgeKey {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }
}

/// Picks `k` elements evenly spread over `items`, keeping their order.
///
/// # Examples
///
/// ```
/// use cavern::pick_evenly;
///
/// assert_eq!(pick_evenly(&[1, 2, 3, 4, 5, 6, 7], 3), vec![1, 3, 5]);
/// assert_eq!(pick_evenly(&[1, 2], 3), vec![1, 2]);
/// ```
pub fn pick_evenly<T: Clone>(items: &[T], k: usize) -> Vec<T> {
    if k == 0 {
        return Vec::new();
    }
    if items.len() <= k {
        return items.to_vec();
    }
    (0..k).map(|i| items[i * items.len() / k].clone()).collect()
}

/// Stage: makes the room farthest from the start the exit and drops the exit marker.
pub fn select_exit(mut plan: LevelGenerationPlan, rng: &mut impl Rng) -> LevelGenerationPlan {
    if plan.edges.is_empty() {
        log::debug!("No room edges; leaving the exit unset");
        return plan;
    }

    let graph = plan.progression_graph();
    let unreachable = unreachable_rooms(plan.rooms.len(), &plan.connected_edges, plan.start_index);
    if !unreachable.is_empty() {
        log::warn!("Rooms unreachable from the start: {:?}", unreachable);
    }

    let mut exit = graph.farthest_from(plan.start_index);
    if exit == Some(plan.start_index) {
        // Every corridor out of the start failed; fall back to the planned graph
        log::warn!("Start room has no built corridors; choosing the exit on the planned graph");
        exit = RoomGraph::new(plan.rooms.len(), &plan.edges).farthest_from(plan.start_index);
    }
    let Some(exit) = exit else {
        return plan;
    };

    let position = random_free_floor(&plan, exit, rng).unwrap_or_else(|| plan.rooms[exit].center());
    let id = plan.actor_ids.allocate();
    plan.items.push(Placed::new(id, position, Item::exit()));
    plan.exit_index = Some(exit);
    log::debug!("Exit in room {} at {}", exit, position);
    plan
}

/// Room chosen to hold the key for the lock on `path[edge_pos] -> path[edge_pos + 1]`.
///
/// Candidates are the path rooms up to the edge's source, minus the source and the start.
/// Dead ends are preferred, then any candidate, then the source room itself.
fn choose_key_room(
    path: &[usize],
    edge_pos: usize,
    graph: &RoomGraph,
    start: usize,
    exit: usize,
    rng: &mut impl Rng,
) -> usize {
    let source = path[edge_pos];
    let prefix: Vec<usize> = path[..=edge_pos]
        .iter()
        .copied()
        .filter(|&room| room != source && room != start)
        .collect();
    let leaves: Vec<usize> = prefix
        .iter()
        .copied()
        .filter(|&room| graph.is_leaf(room, start, exit))
        .collect();

    leaves
        .choose(rng)
        .or_else(|| prefix.choose(rng))
        .copied()
        .unwrap_or(source)
}

/// Stage: locks up to `max_locks` edges on the start → exit path and hides their keys
/// earlier on the path.
///
/// The first path edge is never locked. A door cell shared by two links is left open,
/// since locking it would also gate the other link.
pub fn lock_and_key(
    mut plan: LevelGenerationPlan,
    max_locks: usize,
    rng: &mut impl Rng,
) -> LevelGenerationPlan {
    let Some(exit) = plan.exit_index else {
        return plan;
    };
    let start = plan.start_index;
    let graph = plan.progression_graph();
    let path = graph.path_between(start, exit);
    if path.len() < 2 {
        log::debug!("Start → exit path too short for locks");
        return plan;
    }

    let path_edges: Vec<(usize, usize)> = path.windows(2).map(|w| (w[0], w[1])).collect();
    let candidates = &path_edges[1..];
    if candidates.is_empty() {
        log::debug!("No lockable edges on the start → exit path");
        return plan;
    }

    let links: HashMap<EdgeKey, DoorLink> = plan
        .door_links
        .iter()
        .map(|link| (EdgeKey::new(link.i, link.j), *link))
        .collect();
    let mut door_uses: HashMap<Position, usize> = HashMap::new();
    for link in &plan.door_links {
        *door_uses.entry(link.from).or_default() += 1;
        *door_uses.entry(link.to).or_default() += 1;
    }

    let chosen = pick_evenly(candidates, max_locks.min(candidates.len()));
    for (index, &(a, b)) in chosen.iter().enumerate() {
        let color = KeyColor::cycled(index);
        let Some(link) = links.get(&EdgeKey::new(a, b)).copied() else {
            continue;
        };
        let (door_a, door_b) = if link.i == a {
            (link.from, link.to)
        } else {
            (link.to, link.from)
        };
        if door_uses.get(&door_a) != Some(&1) || door_uses.get(&door_b) != Some(&1) {
            log::debug!("Skipping lock on {}-{}: shared door cell", a, b);
            continue;
        }

        if plan.rooms[a].door_at(door_a).is_none() || plan.rooms[b].door_at(door_b).is_none() {
            continue;
        }
        plan.rooms[a].set_door_kind(door_a, DoorKind::Locked(color));
        plan.rooms[b].set_door_kind(door_b, DoorKind::Locked(color));

        let Some(edge_pos) = path_edges.iter().position(|&edge| edge == (a, b)) else {
            continue;
        };
        let key_room = choose_key_room(&path, edge_pos, &graph, start, exit, rng);
        let position = random_free_floor(&plan, key_room, rng)
            .unwrap_or_else(|| plan.rooms[key_room].center());
        let id = plan.actor_ids.allocate();
        plan.items.push(Placed::new(id, position, Item::key(color)));
        log::debug!(
            "Locked edge {}-{} with {} key in room {}",
            a,
            b,
            color,
            key_room
        );
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{ItemKind, Room, Size};
    use crate::generation::{connect_rooms, place_doors};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Nine rooms in a row so the MST is a simple chain 0-1-...-8.
    fn chain_plan() -> LevelGenerationPlan {
        let mut plan = LevelGenerationPlan::new(Size::new(120, 12), 1);
        plan.rooms = (0..9)
            .map(|i| Room::new(Position::new(1 + i * 13, 2), 8, 6))
            .collect();
        place_doors(connect_rooms(plan))
    }

    #[test]
    fn test_pick_evenly() {
        let items: Vec<usize> = (0..10).collect();
        assert_eq!(pick_evenly(&items, 3), vec![0, 3, 6]);
        assert_eq!(pick_evenly(&items, 0), Vec::<usize>::new());
        assert_eq!(pick_evenly(&items[..2], 5), vec![0, 1]);
    }

    #[test]
    fn test_edge_key_is_normalized() {
        assert_eq!(EdgeKey::new(4, 1), EdgeKey::new(1, 4));
    }

    #[test]
    fn test_exit_is_farthest_room() {
        let mut rng = StdRng::seed_from_u64(3);
        let plan = select_exit(chain_plan(), &mut rng);
        assert_eq!(plan.exit_index, Some(8));
        let exit_marker = plan
            .items
            .iter()
            .find(|item| item.model.kind == ItemKind::Exit)
            .unwrap();
        assert!(plan.rooms[8].contains_interior(exit_marker.position));
    }

    #[test]
    fn test_exit_noop_without_edges() {
        let mut plan = LevelGenerationPlan::new(Size::new(40, 20), 1);
        plan.rooms = vec![Room::new(Position::new(1, 1), 6, 6)];
        let mut rng = StdRng::seed_from_u64(3);
        let plan = select_exit(plan, &mut rng);
        assert_eq!(plan.exit_index, None);
        assert!(plan.items.is_empty());
    }

    #[test]
    fn test_locks_skip_first_edge_and_keys_come_first() {
        let mut rng = StdRng::seed_from_u64(11);
        let plan = select_exit(chain_plan(), &mut rng);
        let plan = lock_and_key(plan, 3, &mut rng);

        // Path edges 0-1 .. 7-8; candidates 1-2 .. 7-8 (7 edges) → picks 1-2, 3-4, 5-6
        let locked: Vec<(usize, KeyColor)> = plan
            .rooms
            .iter()
            .enumerate()
            .flat_map(|(i, room)| room.doors.iter().filter_map(move |d| d.lock_color().map(|c| (i, c))))
            .collect();
        assert!(plan.rooms[0].doors.iter().all(|d| !d.is_locked()));
        assert!(locked.contains(&(1, KeyColor::Red)));
        assert!(locked.contains(&(2, KeyColor::Red)));
        assert!(locked.contains(&(3, KeyColor::Blue)));
        assert!(locked.contains(&(4, KeyColor::Blue)));
        assert!(locked.contains(&(5, KeyColor::Yellow)));
        assert!(locked.contains(&(6, KeyColor::Yellow)));
        assert_eq!(locked.len(), 6);

        let key_room = |color: KeyColor| {
            let key = plan
                .items
                .iter()
                .find(|item| item.model.kind == ItemKind::Key(color))
                .unwrap();
            plan.rooms
                .iter()
                .position(|room| room.contains(key.position))
                .unwrap()
        };
        // The red lock sits on 1-2 and its source is room 1: no earlier candidate
        // than the source itself.
        assert_eq!(key_room(KeyColor::Red), 1);
        assert!(key_room(KeyColor::Blue) <= 3);
        assert!(key_room(KeyColor::Blue) >= 1);
        assert!(key_room(KeyColor::Yellow) <= 5);
        assert!(key_room(KeyColor::Yellow) >= 1);
    }

    #[test]
    fn test_short_path_has_no_locks() {
        let mut plan = LevelGenerationPlan::new(Size::new(40, 12), 1);
        plan.rooms = vec![
            Room::new(Position::new(1, 2), 8, 6),
            Room::new(Position::new(20, 2), 8, 6),
        ];
        let plan = place_doors(connect_rooms(plan));
        let mut rng = StdRng::seed_from_u64(5);
        let plan = lock_and_key(select_exit(plan, &mut rng), 3, &mut rng);
        assert!(plan.rooms.iter().all(|room| room.doors.iter().all(|d| !d.is_locked())));
        assert_eq!(plan.items.len(), 1);
    }
}
