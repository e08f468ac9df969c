//! # Level State Module
//!
//! The playable snapshot of one level and the gameplay queries built on its geometry.
//!
//! A [`LevelState`] is produced by the level generator, mutated in place by movement,
//! pickups and combat, and replaced wholesale when the player takes the exit.

use crate::game::{
    ActorId, ActorIdAllocator, Character, Direction, Enemy, Item, ItemKind, KeyColor,
    MessageSink, Position, WorldGeometry,
};
use crate::visibility::{compute_visibility, VisibilitySnapshot};
use crate::CavernResult;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// A model standing somewhere on the level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placed<M> {
    pub id: ActorId,
    pub position: Position,
    pub model: M,
}

impl<M> Placed<M> {
    pub fn new(id: ActorId, position: Position, model: M) -> Self {
        Self {
            id,
            position,
            model,
        }
    }
}

pub type PlacedItem = Placed<Item>;
pub type PlacedEnemy = Placed<Enemy>;
pub type PlacedPlayer = Placed<Character>;

/// Player progress carried from one level to the next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    pub player: Character,
    /// Current dungeon depth, starting at 1
    pub depth: u32,
}

impl GameSession {
    /// Starts a session at depth 1.
    pub fn new(player: Character) -> Self {
        Self { player, depth: 1 }
    }

    pub fn at_depth(player: Character, depth: u32) -> Self {
        Self {
            player,
            depth: depth.max(1),
        }
    }
}

/// One-line status summary shown under the map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hud {
    pub depth: u32,
    pub health: i32,
    pub max_health: i32,
    pub dexterity: i32,
    pub strength: i32,
    pub gold: i32,
    pub weapon: Option<String>,
    pub keys: Vec<KeyColor>,
}

impl Hud {
    pub fn from_character(player: &Character, depth: u32) -> Self {
        let keys = KeyColor::PALETTE
            .into_iter()
            .filter(|&color| player.inventory.contains_key(color))
            .collect();
        Self {
            depth,
            health: player.current_health,
            max_health: player.max_health,
            dexterity: player.dexterity,
            strength: player.strength,
            gold: player.gold,
            weapon: player.current_weapon.as_ref().map(|weapon| weapon.name.clone()),
            keys,
        }
    }
}

impl std::fmt::Display for Hud {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Depth {} | HP {}/{} | DEX {} | STR {} | Gold {}",
            self.depth, self.health, self.max_health, self.dexterity, self.strength, self.gold
        )?;
        if let Some(weapon) = &self.weapon {
            write!(f, " | {}", weapon)?;
        }
        if !self.keys.is_empty() {
            let keys: Vec<&str> = self.keys.iter().map(|key| key.name()).collect();
            write!(f, " | Keys: {}", keys.join(", "))?;
        }
        Ok(())
    }
}

/// Result of a player move attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The player stepped onto the target cell
    Moved,
    /// Wall, locked door without key, or off the canvas
    Blocked,
    /// An enemy occupies the target cell; combat is up to the caller
    Engage(ActorId),
    /// The player stepped onto the exit
    ReachedExit,
}

/// The playable snapshot of a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelState {
    pub geometry: WorldGeometry,
    pub player: PlacedPlayer,
    pub enemies: Vec<PlacedEnemy>,
    pub hud: Hud,
    pub world_items: Vec<PlacedItem>,
    /// Cells seen so far on this level
    pub explored: HashSet<Position>,
    /// Allocator for actors spawned after generation
    pub actor_ids: ActorIdAllocator,
}

impl LevelState {
    /// Dungeon depth of this level.
    pub fn depth(&self) -> u32 {
        self.hud.depth
    }

    /// Checks whether the player could stand on `cell`, ignoring actors.
    ///
    /// Doors are walkable when open, or when locked and the player carries the matching
    /// key. Room interiors and corridor tiles are walkable; everything else is not.
    pub fn is_walkable_terrain(&self, cell: Position) -> bool {
        if !self.geometry.in_bounds(cell) {
            return false;
        }
        if let Some((_, door)) = self.geometry.door_at(cell) {
            return match door.lock_color() {
                None => true,
                Some(color) => self.player.model.inventory.contains_key(color),
            };
        }
        let on_floor = self
            .geometry
            .rooms
            .iter()
            .any(|room| room.has_interior() && room.contains_interior(cell));
        on_floor || self.geometry.is_corridor(cell)
    }

    pub fn enemy_at(&self, cell: Position) -> Option<&PlacedEnemy> {
        self.enemies.iter().find(|enemy| enemy.position == cell)
    }

    pub fn item_at(&self, cell: Position) -> Option<&PlacedItem> {
        self.world_items.iter().find(|item| item.position == cell)
    }

    /// Moves the player one step, handling blocking terrain, enemies and pickups.
    pub fn try_move_player(
        &mut self,
        direction: Direction,
        sink: &mut dyn MessageSink,
    ) -> MoveOutcome {
        let target = self.player.position + direction.to_delta();

        if !self.is_walkable_terrain(target) {
            match self.geometry.door_at(target).and_then(|(_, door)| door.lock_color()) {
                Some(color) => sink.log(format!("The door is locked. You need the {} key.", color)),
                None if !self.geometry.in_bounds(target) => {
                    sink.log("You cannot leave the map.".to_string())
                }
                None => {}
            }
            return MoveOutcome::Blocked;
        }

        if let Some(enemy) = self.enemy_at(target) {
            return MoveOutcome::Engage(enemy.id);
        }

        self.player.position = target;
        let outcome = self.pick_up_at(target, sink);
        self.refresh_hud();
        outcome
    }

    fn pick_up_at(&mut self, cell: Position, sink: &mut dyn MessageSink) -> MoveOutcome {
        let mut reached_exit = false;
        let mut picked = Vec::new();
        self.world_items.retain(|item| {
            if item.position != cell {
                return true;
            }
            if !item.model.kind.is_pickable() {
                reached_exit = true;
                return true;
            }
            picked.push(item.model.clone());
            false
        });

        for item in picked {
            match item.kind {
                ItemKind::Treasure => {
                    let amount = item.value.map_or(0, |(low, _)| low);
                    self.player.model.gold += amount;
                    sink.log(format!("You found {} ({} gold).", item.name, amount));
                }
                _ => {
                    sink.log(format!("You picked up {}.", item.name));
                    self.player.model.inventory.add(item);
                }
            }
        }

        if reached_exit {
            MoveOutcome::ReachedExit
        } else {
            MoveOutcome::Moved
        }
    }

    /// Removes a defeated enemy. Unknown ids are reported and change nothing.
    pub fn remove_enemy(&mut self, id: ActorId, sink: &mut dyn MessageSink) -> bool {
        match self.enemies.iter().position(|enemy| enemy.id == id) {
            Some(index) => {
                let enemy = self.enemies.remove(index);
                log::debug!("Removed {} {}", enemy.model.name, id);
                true
            }
            None => {
                sink.log(format!("No enemy {} on this level.", id));
                false
            }
        }
    }

    /// Recomputes the field of view and folds it into the explored set.
    pub fn refresh_visibility(&mut self, radius: i32) -> VisibilitySnapshot {
        let map = compute_visibility(self.player.position, &self.geometry, radius);
        self.explored.extend(map.visible.iter().copied());
        VisibilitySnapshot {
            visible: map.visible,
            explored: self.explored.clone(),
        }
    }

    /// Rebuilds the HUD from the current player stats.
    pub fn refresh_hud(&mut self) {
        self.hud = Hud::from_character(&self.player.model, self.hud.depth);
    }

    /// Saves the level state to JSON.
    pub fn save_to_json(&self) -> CavernResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Loads level state from JSON.
    pub fn load_from_json(json: &str) -> CavernResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> CavernResult<()> {
        std::fs::write(path, self.save_to_json()?)?;
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> CavernResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::load_from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CorridorPath, DoorKind, EnemyKind, MessageLog, Room, Size};

    /// Two rooms joined by a corridor; the right room's door is locked red.
    pub(crate) fn two_room_state() -> LevelState {
        let mut left = Room::new(Position::new(0, 0), 6, 5);
        left.add_door(Position::new(5, 2));
        let mut right = Room::new(Position::new(9, 0), 6, 5);
        right.add_door(Position::new(9, 2));
        right.set_door_kind(Position::new(9, 2), DoorKind::Locked(KeyColor::Red));
        let corridor = CorridorPath::new(vec![
            Position::new(6, 2),
            Position::new(7, 2),
            Position::new(8, 2),
            Position::new(9, 2),
        ]);
        let geometry = WorldGeometry::new(Size::new(20, 8), vec![left, right], vec![corridor]);

        let mut ids = ActorIdAllocator::new();
        let hero = Character::new("Hero");
        let hud = Hud::from_character(&hero, 1);
        LevelState {
            geometry,
            player: Placed::new(ids.allocate(), Position::new(2, 2), hero),
            enemies: Vec::new(),
            hud,
            world_items: Vec::new(),
            explored: HashSet::new(),
            actor_ids: ids,
        }
    }

    #[test]
    fn test_walkable_terrain() {
        let state = two_room_state();
        assert!(state.is_walkable_terrain(Position::new(2, 2))); // floor
        assert!(state.is_walkable_terrain(Position::new(5, 2))); // open door
        assert!(state.is_walkable_terrain(Position::new(7, 2))); // corridor
        assert!(!state.is_walkable_terrain(Position::new(5, 1))); // wall
        assert!(!state.is_walkable_terrain(Position::new(7, 5))); // rock
        assert!(!state.is_walkable_terrain(Position::new(-1, 2))); // off canvas
        assert!(!state.is_walkable_terrain(Position::new(9, 2))); // locked door
    }

    #[test]
    fn test_pickup_key_opens_door() {
        let mut state = two_room_state();
        let mut log = MessageLog::new();
        let id = state.actor_ids.allocate();
        state
            .world_items
            .push(Placed::new(id, Position::new(3, 2), Item::key(KeyColor::Red)));

        assert!(!state.is_walkable_terrain(Position::new(9, 2)));
        assert_eq!(state.try_move_player(Direction::East, &mut log), MoveOutcome::Moved);
        assert!(state.world_items.is_empty());
        assert!(state.is_walkable_terrain(Position::new(9, 2)));
        assert_eq!(state.hud.keys, vec![KeyColor::Red]);
        assert_eq!(log.last(), Some("You picked up Red Key."));
    }

    #[test]
    fn test_locked_door_blocks_with_message() {
        let mut state = two_room_state();
        state.player.position = Position::new(8, 2);
        let mut log = MessageLog::new();
        assert_eq!(state.try_move_player(Direction::East, &mut log), MoveOutcome::Blocked);
        assert_eq!(state.player.position, Position::new(8, 2));
        assert_eq!(log.last(), Some("The door is locked. You need the red key."));
    }

    #[test]
    fn test_treasure_becomes_gold() {
        let mut state = two_room_state();
        let id = state.actor_ids.allocate();
        state
            .world_items
            .push(Placed::new(id, Position::new(2, 3), Item::gold_coin()));
        let mut log = MessageLog::new();
        state.try_move_player(Direction::South, &mut log);
        assert_eq!(state.player.model.gold, 10);
        assert_eq!(state.hud.gold, 10);
        assert_eq!(state.player.model.inventory.len(), 1);
    }

    #[test]
    fn test_exit_stays_on_map() {
        let mut state = two_room_state();
        let id = state.actor_ids.allocate();
        state
            .world_items
            .push(Placed::new(id, Position::new(1, 2), Item::exit()));
        let outcome = state.try_move_player(Direction::West, &mut crate::game::NullSink);
        assert_eq!(outcome, MoveOutcome::ReachedExit);
        assert_eq!(state.world_items.len(), 1);
    }

    #[test]
    fn test_enemy_engagement_and_removal() {
        let mut state = two_room_state();
        let id = state.actor_ids.allocate();
        state
            .enemies
            .push(Placed::new(id, Position::new(2, 1), Enemy::of_kind(EnemyKind::Zombie)));
        let mut log = MessageLog::new();

        assert_eq!(state.enemy_at(Position::new(2, 1)).map(|e| e.id), Some(id));
        assert_eq!(state.try_move_player(Direction::North, &mut log), MoveOutcome::Engage(id));
        assert_eq!(state.player.position, Position::new(2, 2));

        assert!(state.remove_enemy(id, &mut log));
        assert!(state.enemies.is_empty());
        assert!(!state.remove_enemy(id, &mut log));
        assert_eq!(log.last(), Some(format!("No enemy {} on this level.", id).as_str()));
    }

    #[test]
    fn test_explored_accumulates() {
        let mut state = two_room_state();
        let first = state.refresh_visibility(7);
        assert!(first.visible.contains(&Position::new(2, 2)));
        let explored_before = first.explored.len();

        state.player.position = Position::new(7, 2);
        let second = state.refresh_visibility(7);
        assert!(second.explored.len() >= explored_before);
        assert!(first.visible.iter().all(|cell| second.explored.contains(cell)));
    }

    #[test]
    fn test_json_round_trip() {
        let mut state = two_room_state();
        state.refresh_visibility(5);
        let json = state.save_to_json().unwrap();
        let loaded = LevelState::load_from_json(&json).unwrap();
        assert_eq!(loaded, state);
    }
}
