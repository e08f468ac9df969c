//! # Entities
//!
//! Items, the player character and enemies.
//!
//! These are plain data models. Where they sit on the map is tracked separately by
//! [`Placed`](crate::Placed), so the same model can live in an inventory or on the floor.

use crate::config;
use crate::game::KeyColor;
use serde::{Deserialize, Serialize};

/// Category of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Food,
    Potion,
    Scroll,
    Weapon,
    Treasure,
    Key(KeyColor),
    Exit,
}

impl ItemKind {
    /// The exit marker stays on the map; everything else can be picked up.
    pub fn is_pickable(self) -> bool {
        !matches!(self, ItemKind::Exit)
    }
}

/// An item and the effects it grants when used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    pub name: String,
    /// Health restored on use
    pub health_boost: Option<i32>,
    /// Health granted for a limited time
    pub temporary_health_boost: Option<i32>,
    pub max_health_boost: Option<i32>,
    pub dexterity_boost: Option<i32>,
    pub strength_boost: Option<i32>,
    /// Inclusive gold range for treasure
    pub value: Option<(i32, i32)>,
    /// Inclusive damage range for weapons
    pub damage: Option<(i32, i32)>,
}

impl Item {
    pub const APPLE: &'static str = "Apple";
    pub const BREAD: &'static str = "Bread";
    pub const HEALING_POTION: &'static str = "Healing Potion";
    pub const SCROLL_OF_HEALTH: &'static str = "Scroll of Health";
    pub const SCROLL_OF_DEXTERITY: &'static str = "Scroll of Dexterity";
    pub const SCROLL_OF_STRENGTH: &'static str = "Scroll of Strength";
    pub const DAGGER: &'static str = "Dagger";
    pub const SWORD: &'static str = "Sword";
    pub const BATTLE_AXE: &'static str = "Battle Axe";
    pub const GOLD_COIN: &'static str = "Gold Coin";
    pub const DIAMOND: &'static str = "Diamond";
    pub const EXIT: &'static str = "Exit";

    fn bare(kind: ItemKind, name: &str) -> Self {
        Self {
            kind,
            name: name.to_string(),
            health_boost: None,
            temporary_health_boost: None,
            max_health_boost: None,
            dexterity_boost: None,
            strength_boost: None,
            value: None,
            damage: None,
        }
    }

    pub fn apple() -> Self {
        Self {
            health_boost: Some(5),
            ..Self::bare(ItemKind::Food, Self::APPLE)
        }
    }

    pub fn bread() -> Self {
        Self {
            health_boost: Some(10),
            ..Self::bare(ItemKind::Food, Self::BREAD)
        }
    }

    pub fn healing_potion() -> Self {
        Self {
            temporary_health_boost: Some(15),
            ..Self::bare(ItemKind::Potion, Self::HEALING_POTION)
        }
    }

    pub fn scroll_of_health() -> Self {
        Self {
            max_health_boost: Some(5),
            ..Self::bare(ItemKind::Scroll, Self::SCROLL_OF_HEALTH)
        }
    }

    pub fn scroll_of_dexterity() -> Self {
        Self {
            dexterity_boost: Some(2),
            ..Self::bare(ItemKind::Scroll, Self::SCROLL_OF_DEXTERITY)
        }
    }

    pub fn scroll_of_strength() -> Self {
        Self {
            strength_boost: Some(2),
            ..Self::bare(ItemKind::Scroll, Self::SCROLL_OF_STRENGTH)
        }
    }

    pub fn dagger() -> Self {
        Self {
            dexterity_boost: Some(1),
            strength_boost: Some(1),
            damage: Some((1, 4)),
            ..Self::bare(ItemKind::Weapon, Self::DAGGER)
        }
    }

    pub fn sword() -> Self {
        Self {
            strength_boost: Some(2),
            damage: Some((2, 6)),
            ..Self::bare(ItemKind::Weapon, Self::SWORD)
        }
    }

    pub fn battle_axe() -> Self {
        Self {
            dexterity_boost: Some(-1),
            strength_boost: Some(2),
            damage: Some((3, 8)),
            ..Self::bare(ItemKind::Weapon, Self::BATTLE_AXE)
        }
    }

    pub fn gold_coin() -> Self {
        Self {
            value: Some((10, 50)),
            ..Self::bare(ItemKind::Treasure, Self::GOLD_COIN)
        }
    }

    pub fn diamond() -> Self {
        Self {
            value: Some((100, 100)),
            ..Self::bare(ItemKind::Treasure, Self::DIAMOND)
        }
    }

    /// A key opening doors locked with `color`.
    pub fn key(color: KeyColor) -> Self {
        let name = match color {
            KeyColor::Red => "Red Key",
            KeyColor::Blue => "Blue Key",
            KeyColor::Yellow => "Yellow Key",
        };
        Self::bare(ItemKind::Key(color), name)
    }

    /// The level exit marker.
    pub fn exit() -> Self {
        Self::bare(ItemKind::Exit, Self::EXIT)
    }

    pub fn is_food(&self) -> bool {
        matches!(self.kind, ItemKind::Food)
    }

    pub fn is_scroll(&self) -> bool {
        matches!(self.kind, ItemKind::Scroll)
    }

    pub fn is_weapon(&self) -> bool {
        matches!(self.kind, ItemKind::Weapon)
    }

    pub fn is_exit(&self) -> bool {
        matches!(self.kind, ItemKind::Exit)
    }
}

/// Items carried by the player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub items: Vec<Item>,
}

impl Inventory {
    pub fn new(items: Vec<Item>) -> Self {
        Self { items }
    }

    pub fn add(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Removes and returns the item at `index`, if there is one.
    pub fn take(&mut self, index: usize) -> Option<Item> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// True if a key of the given colour is carried.
    pub fn contains_key(&self, color: KeyColor) -> bool {
        self.items.iter().any(|item| item.kind == ItemKind::Key(color))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The player character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub max_health: i32,
    pub current_health: i32,
    pub dexterity: i32,
    pub strength: i32,
    pub gold: i32,
    /// Equipped weapon, if any
    pub current_weapon: Option<Item>,
    pub inventory: Inventory,
}

impl Character {
    /// Creates a fresh character with the default stats and a single apple.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_health: config::DEFAULT_PLAYER_HEALTH,
            current_health: config::DEFAULT_PLAYER_HEALTH,
            dexterity: config::DEFAULT_PLAYER_DEXTERITY,
            strength: config::DEFAULT_PLAYER_STRENGTH,
            gold: 0,
            current_weapon: None,
            inventory: Inventory::new(vec![Item::apple()]),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }
}

/// The six enemy species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Zombie,
    Vampire,
    Ghost,
    Ogre,
    SnakeMage,
    Mimic,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 6] = [
        EnemyKind::Zombie,
        EnemyKind::Vampire,
        EnemyKind::Ghost,
        EnemyKind::Ogre,
        EnemyKind::SnakeMage,
        EnemyKind::Mimic,
    ];

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Zombie => "Zombie",
            EnemyKind::Vampire => "Vampire",
            EnemyKind::Ghost => "Ghost",
            EnemyKind::Ogre => "Ogre",
            EnemyKind::SnakeMage => "Snake Mage",
            EnemyKind::Mimic => "Mimic",
        }
    }
}

/// How eagerly an enemy notices and chases the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hostility {
    NoAggro,
    Passive,
    Hostile,
    Aggressive,
}

impl Hostility {
    /// Manhattan distance at which the enemy starts chasing.
    pub fn aggro_radius(self) -> u32 {
        match self {
            Hostility::NoAggro => 0,
            Hostility::Passive => 1,
            Hostility::Hostile => 3,
            Hostility::Aggressive => 5,
        }
    }
}

/// Special combat effects. Resolution lives with the battle system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpecialEffect {
    LifeDrain,
    Invisibility,
    Rest,
    Sleep,
}

/// An enemy and its combat stats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub name: String,
    pub max_health: i32,
    pub current_health: i32,
    pub dexterity: i32,
    pub strength: i32,
    /// Gold dropped on defeat
    pub gold: i32,
    pub hostility: Hostility,
    pub effects: Vec<SpecialEffect>,
    /// Mimics pose as items until engaged
    pub disguised: bool,
    pub last_position: Option<crate::Position>,
}

impl Enemy {
    /// Builds an enemy of `kind` with its base stats.
    pub fn of_kind(kind: EnemyKind) -> Self {
        let (health, dexterity, strength, gold, hostility, effects) = match kind {
            EnemyKind::Zombie => (15, 4, 6, 10, Hostility::Hostile, vec![]),
            EnemyKind::Vampire => (
                20,
                9,
                8,
                20,
                Hostility::Aggressive,
                vec![SpecialEffect::LifeDrain],
            ),
            EnemyKind::Ghost => (
                12,
                8,
                4,
                15,
                Hostility::Passive,
                vec![SpecialEffect::Invisibility],
            ),
            EnemyKind::Ogre => (40, 6, 12, 50, Hostility::Hostile, vec![SpecialEffect::Rest]),
            EnemyKind::SnakeMage => (
                16,
                12,
                5,
                40,
                Hostility::Hostile,
                vec![SpecialEffect::Sleep],
            ),
            EnemyKind::Mimic => (30, 10, 1, 40, Hostility::NoAggro, vec![]),
        };

        Self {
            kind,
            name: kind.name().to_string(),
            max_health: health,
            current_health: health,
            dexterity,
            strength,
            gold,
            hostility,
            effects,
            disguised: kind == EnemyKind::Mimic,
            last_position: None,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }
}
