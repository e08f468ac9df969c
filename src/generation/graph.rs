//! # Room Graph
//!
//! Minimum spanning tree over room centers and the breadth-first queries used by the
//! progression stages.

use super::LevelGenerationPlan;
use crate::game::Room;
use std::collections::VecDeque;

/// Disjoint-set forest with path compression and union by rank.
#[derive(Debug, Clone)]
pub struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    /// Representative of the set containing `x`.
    pub fn find(&mut self, x: usize) -> usize {
        let mut root = x;
        while self.parent[root] != root {
            root = self.parent[root];
        }
        let mut node = x;
        while self.parent[node] != root {
            let next = self.parent[node];
            self.parent[node] = root;
            node = next;
        }
        root
    }

    /// Merges the sets of `a` and `b`. Returns false if they were already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra == rb {
            return false;
        }
        match self.rank[ra].cmp(&self.rank[rb]) {
            std::cmp::Ordering::Less => self.parent[ra] = rb,
            std::cmp::Ordering::Greater => self.parent[rb] = ra,
            std::cmp::Ordering::Equal => {
                self.parent[rb] = ra;
                self.rank[ra] += 1;
            }
        }
        true
    }
}

/// Kruskal's minimum spanning tree over Manhattan distances between room centers.
///
/// Candidate edges are enumerated as `(i, j)` with `i < j` and stably sorted by weight,
/// so ties resolve in enumeration order.
pub fn minimum_spanning_edges(rooms: &[Room]) -> Vec<(usize, usize)> {
    let centers: Vec<_> = rooms.iter().map(Room::center).collect();
    let mut candidates = Vec::with_capacity(rooms.len() * rooms.len().saturating_sub(1) / 2);
    for i in 0..centers.len() {
        for j in (i + 1)..centers.len() {
            candidates.push((centers[i].manhattan_distance(centers[j]), i, j));
        }
    }
    candidates.sort_by_key(|&(weight, _, _)| weight);

    let target = rooms.len().saturating_sub(1);
    let mut sets = UnionFind::new(rooms.len());
    let mut edges = Vec::with_capacity(target);
    for (_, i, j) in candidates {
        if edges.len() == target {
            break;
        }
        if sets.union(i, j) {
            edges.push((i, j));
        }
    }
    edges
}

/// Undirected adjacency over room indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomGraph {
    adjacency: Vec<Vec<usize>>,
}

impl RoomGraph {
    pub fn new(room_count: usize, edges: &[(usize, usize)]) -> Self {
        let mut adjacency = vec![Vec::new(); room_count];
        for &(a, b) in edges {
            if a < room_count && b < room_count {
                adjacency[a].push(b);
                adjacency[b].push(a);
            }
        }
        Self { adjacency }
    }

    pub fn room_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn degree(&self, room: usize) -> usize {
        self.adjacency.get(room).map_or(0, Vec::len)
    }

    pub fn neighbors(&self, room: usize) -> &[usize] {
        self.adjacency.get(room).map_or(&[], Vec::as_slice)
    }

    /// Rooms reachable from `start` in BFS order, paired with their distance.
    pub fn bfs_order(&self, start: usize) -> Vec<(usize, usize)> {
        let mut distance = vec![None; self.room_count()];
        let mut order = Vec::new();
        let mut queue = VecDeque::new();
        if start >= self.room_count() {
            return order;
        }
        distance[start] = Some(0);
        queue.push_back(start);
        while let Some(room) = queue.pop_front() {
            let d = distance[room].unwrap_or(0);
            order.push((room, d));
            for &next in self.neighbors(room) {
                if distance[next].is_none() {
                    distance[next] = Some(d + 1);
                    queue.push_back(next);
                }
            }
        }
        order
    }

    /// BFS distance of every room from `start`; `None` for unreachable rooms.
    pub fn bfs_distances(&self, start: usize) -> Vec<Option<usize>> {
        let mut distances = vec![None; self.room_count()];
        for (room, d) in self.bfs_order(start) {
            distances[room] = Some(d);
        }
        distances
    }

    /// Farthest room from `start`; ties go to the first room reached in BFS order.
    pub fn farthest_from(&self, start: usize) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (room, d) in self.bfs_order(start) {
            if best.map_or(true, |(_, best_d)| d > best_d) {
                best = Some((room, d));
            }
        }
        best.map(|(room, _)| room)
    }

    /// Room sequence from `start` to `goal` via BFS parents, both ends included.
    /// Empty if `goal` is unreachable.
    pub fn path_between(&self, start: usize, goal: usize) -> Vec<usize> {
        let n = self.room_count();
        if start >= n || goal >= n {
            return Vec::new();
        }
        let mut parent = vec![None; n];
        parent[start] = Some(start);
        let mut queue = VecDeque::from([start]);
        while let Some(room) = queue.pop_front() {
            for &next in self.neighbors(room) {
                if parent[next].is_none() {
                    parent[next] = Some(room);
                    queue.push_back(next);
                }
            }
        }

        let mut path = Vec::new();
        let mut current = goal;
        loop {
            let Some(up) = parent[current] else {
                return Vec::new();
            };
            path.push(current);
            if up == current {
                break;
            }
            current = up;
        }
        path.reverse();
        path
    }

    /// Dead-end room: degree 1 and neither `start` nor `exit`.
    pub fn is_leaf(&self, room: usize, start: usize, exit: usize) -> bool {
        room != start && room != exit && self.degree(room) == 1
    }

    /// True if every room is reachable from room 0.
    pub fn is_connected(&self) -> bool {
        self.room_count() == 0 || self.bfs_order(0).len() == self.room_count()
    }
}

/// Stage: joins all rooms with a minimum spanning tree.
pub fn connect_rooms(mut plan: LevelGenerationPlan) -> LevelGenerationPlan {
    plan.edges = minimum_spanning_edges(&plan.rooms);
    plan.connected_edges = plan.edges.clone();
    log::debug!("Connected {} rooms with {} edges", plan.rooms.len(), plan.edges.len());
    plan
}
