//! # Encounter Placement
//!
//! Depth-scaled enemy spawning. Every key room gets a guard, further enemies are rolled
//! per room, and a final top-up pass keeps sparse levels from staying empty.

use super::LevelGenerationPlan;
use crate::game::{Enemy, EnemyKind, ItemKind, Placed};
use crate::generation::placement::{random_free_floor, room_index_of};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;

/// Spawn weight of each enemy kind at `depth`.
pub fn enemy_weights(depth: u32) -> [(EnemyKind, f64); 6] {
    let d = f64::from(depth.saturating_sub(1));
    [
        (EnemyKind::Zombie, (0.55 - 0.03 * d).max(0.20)),
        (EnemyKind::Ghost, (0.20 + 0.02 * d).min(0.35)),
        (EnemyKind::Vampire, (0.15 + 0.03 * d).min(0.30)),
        (EnemyKind::Ogre, (0.10 + 0.03 * d).min(0.25)),
        (EnemyKind::SnakeMage, (0.10 + 0.03 * d).min(0.25)),
        (EnemyKind::Mimic, (0.10 + 0.03 * d).min(0.25)),
    ]
}

/// Draws an enemy from the depth table. Falls back to a zombie on rounding leftovers.
pub fn pick_enemy(depth: u32, rng: &mut impl Rng) -> Enemy {
    let table = enemy_weights(depth);
    let total: f64 = table.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen::<f64>() * total;
    for (kind, weight) in table {
        if roll < weight {
            return Enemy::of_kind(kind);
        }
        roll -= weight;
    }
    Enemy::of_kind(EnemyKind::Zombie)
}

/// Chance of an extra spawn per roll in a key room.
pub fn extra_spawn_chance(depth: u32) -> f64 {
    (0.15 + 0.07 * f64::from(depth.saturating_sub(1))).min(0.70)
}

/// Minimum enemy count the top-up pass aims for.
pub fn minimum_enemy_count(depth: u32, eligible_rooms: usize) -> usize {
    let wanted = (2 + depth as usize / 2).max(3);
    wanted.min((eligible_rooms * 2).max(1))
}

/// Rooms holding at least one key.
pub fn key_rooms(plan: &LevelGenerationPlan) -> BTreeSet<usize> {
    plan.items
        .iter()
        .filter(|item| matches!(item.model.kind, ItemKind::Key(_)))
        .filter_map(|item| room_index_of(plan, item.position))
        .collect()
}

fn spawn_in(plan: &mut LevelGenerationPlan, room: usize, rng: &mut impl Rng) -> bool {
    let Some(position) = random_free_floor(plan, room, rng) else {
        return false;
    };
    let enemy = pick_enemy(plan.depth, rng);
    let id = plan.actor_ids.allocate();
    log::trace!("Spawned {} {} in room {} at {}", enemy.name, id, room, position);
    plan.enemies.push(Placed::new(id, position, enemy));
    true
}

fn is_eligible(plan: &LevelGenerationPlan, room: usize) -> bool {
    room != plan.start_index && Some(room) != plan.exit_index
}

/// Stage: populates the level with enemies.
pub fn place_enemies(mut plan: LevelGenerationPlan, rng: &mut impl Rng) -> LevelGenerationPlan {
    if plan.rooms.is_empty() {
        return plan;
    }
    let guarded: Vec<usize> = key_rooms(&plan)
        .into_iter()
        .filter(|&room| is_eligible(&plan, room))
        .collect();

    for &room in &guarded {
        spawn_in(&mut plan, room, rng);
    }

    let chance = extra_spawn_chance(plan.depth);
    let rolls_per_key_room = if plan.depth >= 6 { 2 } else { 1 };
    for &room in &guarded {
        for _ in 0..rolls_per_key_room {
            if rng.gen::<f64>() < chance {
                spawn_in(&mut plan, room, rng);
            }
        }
    }

    let others: Vec<usize> = (0..plan.rooms.len())
        .filter(|&room| is_eligible(&plan, room) && !guarded.contains(&room))
        .collect();
    for room in others {
        if rng.gen::<f64>() < chance * 0.6 {
            spawn_in(&mut plan, room, rng);
        }
    }

    let plan = ensure_minimum_enemies(plan, rng);
    log::debug!("Placed {} enemies at depth {}", plan.enemies.len(), plan.depth);
    plan
}

/// Tops the enemy count up to [`minimum_enemy_count`] with a bounded number of attempts.
pub fn ensure_minimum_enemies(
    mut plan: LevelGenerationPlan,
    rng: &mut impl Rng,
) -> LevelGenerationPlan {
    let eligible: Vec<usize> = (0..plan.rooms.len())
        .filter(|&room| is_eligible(&plan, room))
        .collect();
    if eligible.is_empty() {
        return plan;
    }
    let target = minimum_enemy_count(plan.depth, eligible.len());
    if plan.enemies.len() >= target {
        return plan;
    }

    let need = target - plan.enemies.len();
    let mut bag: Vec<usize> = Vec::new();
    let mut added = 0;
    let mut attempts = 0;
    while added < need && attempts < need * 8 {
        attempts += 1;
        if bag.is_empty() {
            bag = eligible.clone();
            bag.shuffle(rng);
        }
        let room = bag.remove(0);
        if spawn_in(&mut plan, room, rng) {
            added += 1;
        }
    }
    if added < need {
        log::debug!("Enemy top-up stopped after {} attempts ({} of {})", attempts, added, need);
    }
    plan
}
