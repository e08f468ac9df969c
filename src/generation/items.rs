//! # Item Placement
//!
//! Weighted item drops that react to what the player already carries: low effective
//! health pushes food, hoarded scrolls push scrolls down, and at most one new weapon
//! type appears per level.

use super::LevelGenerationPlan;
use crate::game::{Character, Item, Placed};
use crate::generation::placement::random_free_floor;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Share of carried healing counted towards effective health.
const HEALING_USE_FACTOR: f64 = 0.6;

/// Chance that a treasure drop is a diamond rather than gold.
const DIAMOND_CHANCE: f64 = 0.1;

/// Drop category chosen by weighted sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropCategory {
    Food,
    Scroll,
    Weapon,
    Other,
}

/// Healing a carried item is expected to provide.
pub fn healing_value(item: &Item) -> i32 {
    match item.name.as_str() {
        Item::APPLE => 5,
        Item::BREAD => 12,
        Item::HEALING_POTION => 25,
        _ => 0,
    }
}

/// What the player is carrying, as far as drop weighting cares.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventorySummary {
    /// Food and healing potions
    pub food_count: usize,
    pub healing_potential: i32,
    pub scroll_count: usize,
    pub strength_scrolls: usize,
    pub weapon_names: HashSet<String>,
}

impl InventorySummary {
    pub fn of(player: &Character) -> Self {
        let mut summary = Self::default();
        for item in &player.inventory.items {
            if item.is_food() || item.name == Item::HEALING_POTION {
                summary.food_count += 1;
                summary.healing_potential += healing_value(item);
            } else if item.is_scroll() {
                summary.scroll_count += 1;
                if item.name == Item::SCROLL_OF_STRENGTH {
                    summary.strength_scrolls += 1;
                }
            } else if item.is_weapon() {
                summary.weapon_names.insert(item.name.clone());
            }
        }
        summary
    }
}

/// `(current health + 0.6 × carried healing) / max health`, capped at 1.
pub fn effective_hp(player: &Character, summary: &InventorySummary) -> f64 {
    let max = f64::from(player.max_health.max(1));
    let hp = f64::from(player.current_health) + HEALING_USE_FACTOR * f64::from(summary.healing_potential);
    (hp / max).min(1.0)
}

/// Per-drop state that changes the weights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropState {
    /// Index of this drop on the level
    pub drop_index: usize,
    pub scrolls_placed: usize,
    pub weapon_placed: bool,
    pub weapons_available: bool,
}

/// Category weights `[food, scroll, weapon, other]` for one drop, clamped at zero.
pub fn category_weights(eff_hp: f64, summary: &InventorySummary, state: DropState) -> [f64; 4] {
    let mut food: f64 = 0.30;
    let mut scroll: f64 = 0.25;
    let mut weapon: f64 = 0.20;
    let other: f64 = 0.25;

    if eff_hp < 0.5 {
        food += 0.30;
    }
    if eff_hp < 0.3 {
        food += 0.20;
    }
    if eff_hp > 0.8 && summary.food_count >= 3 {
        food -= 0.20;
    }
    if state.drop_index == 0 {
        food += 0.20;
    }

    if state.scrolls_placed >= 2 {
        scroll -= 0.15;
    }
    if summary.scroll_count >= 3 {
        scroll -= 0.15;
    }

    if summary.weapon_names.len() >= 2 {
        weapon -= 0.05;
    }

    if summary.strength_scrolls > 0 {
        weapon += 0.05;
        scroll -= 0.05;
    }

    // At most one weapon per level
    if state.weapon_placed || !state.weapons_available {
        weapon = 0.0;
    }

    [food.max(0.0), scroll.max(0.0), weapon.max(0.0), other.max(0.0)]
}

/// Cumulative draw over the weights; a zero total falls back to food.
pub fn pick_category(weights: [f64; 4], roll: f64) -> DropCategory {
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return DropCategory::Food;
    }
    let categories = [
        DropCategory::Food,
        DropCategory::Scroll,
        DropCategory::Weapon,
        DropCategory::Other,
    ];
    let mut t = roll * total;
    for (category, weight) in categories.into_iter().zip(weights) {
        if t < weight {
            return category;
        }
        t -= weight;
    }
    DropCategory::Food
}

fn food_pool() -> [Item; 3] {
    [Item::apple(), Item::bread(), Item::healing_potion()]
}

fn scroll_pool() -> [Item; 3] {
    [
        Item::scroll_of_health(),
        Item::scroll_of_dexterity(),
        Item::scroll_of_strength(),
    ]
}

/// Weapons the player does not carry yet.
pub fn available_weapons(summary: &InventorySummary) -> Vec<Item> {
    [Item::dagger(), Item::sword(), Item::battle_axe()]
        .into_iter()
        .filter(|weapon| !summary.weapon_names.contains(&weapon.name))
        .collect()
}

fn pick_from(pool: &[Item], rng: &mut impl Rng) -> Item {
    pool.choose(rng).cloned().unwrap_or_else(Item::apple)
}

/// Number of drops attempted for a level with `rooms` rooms.
pub fn drop_count_range(depth: u32, rooms: usize) -> (usize, usize) {
    let min = (2 + depth as usize / 2).min(5);
    let max = (rooms * 3 / 2).min(rooms * 2);
    (min, max.max(min))
}

/// Stage: scatters items over the rooms other than start and exit, one per room.
pub fn place_items(mut plan: LevelGenerationPlan, rng: &mut impl Rng) -> LevelGenerationPlan {
    let Some(player) = plan.player.as_ref().map(|placed| placed.model.clone()) else {
        log::warn!("Item placement needs a placed player; skipping");
        return plan;
    };
    if plan.rooms.is_empty() {
        return plan;
    }

    let summary = InventorySummary::of(&player);
    let eff_hp = effective_hp(&player, &summary);
    let weapons = available_weapons(&summary);

    let (min, max) = drop_count_range(plan.depth, plan.rooms.len());
    let count = rng.gen_range(min..=max);

    let mut rooms: Vec<usize> = (0..plan.rooms.len())
        .filter(|&room| room != plan.start_index && Some(room) != plan.exit_index)
        .collect();
    rooms.shuffle(rng);
    let mut rooms = rooms.into_iter();

    let mut state = DropState {
        weapons_available: !weapons.is_empty(),
        ..DropState::default()
    };
    let mut placed = 0;
    for drop_index in 0..count {
        let Some(room) = rooms.next() else {
            break;
        };
        let Some(position) = random_free_floor(&plan, room, rng) else {
            continue;
        };
        state.drop_index = drop_index;

        let weights = category_weights(eff_hp, &summary, state);
        let item = match pick_category(weights, rng.gen::<f64>()) {
            DropCategory::Food => pick_from(&food_pool(), rng),
            DropCategory::Scroll => pick_from(&scroll_pool(), rng),
            DropCategory::Weapon if !weapons.is_empty() => pick_from(&weapons, rng),
            DropCategory::Weapon => pick_from(&food_pool(), rng),
            DropCategory::Other => {
                if rng.gen_bool(DIAMOND_CHANCE) {
                    Item::diamond()
                } else {
                    Item::gold_coin()
                }
            }
        };

        if item.is_scroll() {
            state.scrolls_placed += 1;
        }
        if item.is_weapon() {
            state.weapon_placed = true;
        }
        let id = plan.actor_ids.allocate();
        log::trace!("Dropped {} {} in room {} at {}", item.name, id, room, position);
        plan.items.push(Placed::new(id, position, item));
        placed += 1;
    }

    log::debug!("Placed {} of {} planned items (eff hp {:.2})", placed, count, eff_hp);
    plan
}
