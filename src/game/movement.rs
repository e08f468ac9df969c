//! # Enemy Movement
//!
//! Per-kind wandering patterns and the chase step used once the player is inside an
//! enemy's aggro radius.

use crate::game::{ActorId, EnemyKind, LevelState, Position};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// How an enemy wanders when it is not chasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementPattern {
    /// One cardinal step in a random direction
    RandomStep,
    /// Two cells along a cardinal direction
    DoubleStep,
    /// One diagonal step
    Diagonal,
    /// Never moves
    Stationary,
}

impl MovementPattern {
    pub fn for_kind(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Zombie | EnemyKind::Vampire | EnemyKind::Ghost => {
                MovementPattern::RandomStep
            }
            EnemyKind::Ogre => MovementPattern::DoubleStep,
            EnemyKind::SnakeMage => MovementPattern::Diagonal,
            EnemyKind::Mimic => MovementPattern::Stationary,
        }
    }

    /// Picks a random walkable destination for an enemy at `from`.
    pub fn next_move(
        self,
        state: &LevelState,
        from: Position,
        rng: &mut impl Rng,
    ) -> Option<Position> {
        let candidates: Vec<Position> = match self {
            MovementPattern::Stationary => return None,
            MovementPattern::RandomStep => from
                .cardinal_adjacent_positions()
                .into_iter()
                .filter(|&cell| is_position_walkable(state, cell))
                .collect(),
            MovementPattern::DoubleStep => [(2, 0), (-2, 0), (0, 2), (0, -2)]
                .into_iter()
                .filter(|&(dx, dy)| {
                    let middle = from.offset(dx / 2, dy / 2);
                    is_position_walkable(state, middle)
                        && is_position_walkable(state, from.offset(dx, dy))
                })
                .map(|(dx, dy)| from.offset(dx, dy))
                .collect(),
            MovementPattern::Diagonal => [(1, 1), (1, -1), (-1, 1), (-1, -1)]
                .into_iter()
                .map(|(dx, dy)| from.offset(dx, dy))
                .filter(|&cell| is_position_walkable(state, cell))
                .collect(),
        };
        candidates.choose(rng).copied()
    }
}

/// Terrain is walkable, no enemy stands there and it is not the player's cell.
pub fn is_position_walkable(state: &LevelState, cell: Position) -> bool {
    state.is_walkable_terrain(cell)
        && state.enemy_at(cell).is_none()
        && state.player.position != cell
}

/// One step from `from` towards `target`, major axis first.
pub fn chase_step(state: &LevelState, from: Position, target: Position) -> Option<Position> {
    let dx = target.x - from.x;
    let dy = target.y - from.y;
    let along_x = from.offset(dx.signum(), 0);
    let along_y = from.offset(0, dy.signum());

    let (primary, alternative) = if dx.abs() > dy.abs() {
        (along_x, (dy != 0).then_some(along_y))
    } else {
        (along_y, (dx != 0).then_some(along_x))
    };

    std::iter::once(primary)
        .chain(alternative)
        .find(|&cell| cell != from && is_position_walkable(state, cell))
}

/// Moves every enemy once. Returns the enemies standing next to the player.
pub fn process_enemy_turns(state: &mut LevelState, rng: &mut impl Rng) -> Vec<ActorId> {
    let mut engaged = Vec::new();
    for index in 0..state.enemies.len() {
        let enemy = &state.enemies[index];
        let from = enemy.position;
        let id = enemy.id;
        let radius = enemy.model.hostility.aggro_radius();
        let pattern = MovementPattern::for_kind(enemy.model.kind);
        let player = state.player.position;
        let distance = from.manhattan_distance(player);

        let destination = if radius > 0 && distance <= radius {
            if distance == 1 {
                engaged.push(id);
                None
            } else {
                chase_step(state, from, player)
            }
        } else {
            pattern.next_move(state, from, rng)
        };

        if let Some(to) = destination {
            let enemy = &mut state.enemies[index];
            enemy.model.last_position = Some(from);
            enemy.position = to;
            log::trace!("{} {} moved {} -> {}", enemy.model.name, id, from, to);
        }
    }
    engaged
}
