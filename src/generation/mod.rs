//! # Generation Module
//!
//! Procedural level generation for Cavern.
//!
//! A level is built by threading a [`LevelGenerationPlan`] through a fixed sequence of
//! stages. Each stage is a plain function that takes the plan by value and returns the
//! updated plan:
//!
//! 1. rooms (one per sector of a 3×3 grid)
//! 2. graph (minimum spanning tree over room centers)
//! 3. doors (a facing door pair per graph edge)
//! 4. corridors (A* between door pairs)
//! 5. exit, locks and keys
//! 6. player, enemies and items
//!
//! The assembler then snaps and validates the geometry and produces a [`LevelState`].

pub mod corridors;
pub mod doors;
pub mod dungeon;
pub mod encounters;
pub mod graph;
pub mod items;
pub mod placement;
pub mod progression;
pub mod validation;

pub use corridors::*;
pub use doors::*;
pub use dungeon::*;
pub use encounters::*;
pub use graph::*;
pub use items::*;
pub use placement::*;
pub use progression::*;
pub use validation::*;

use crate::game::{
    ActorIdAllocator, CorridorPath, GameSession, PlacedEnemy, PlacedItem, PlacedPlayer,
    Position, Room, Size,
};
use crate::{config, CavernResult};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sizing rules for the rooms placed in each sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomFactoryConfig {
    /// Minimum room width, walls included
    pub min_width: i32,
    /// Minimum room height, walls included
    pub min_height: i32,
    /// Horizontal gap kept between a room and its sector edge
    pub sector_margin_x: i32,
    /// Vertical gap kept between a room and its sector edge
    pub sector_margin_y: i32,
}

impl Default for RoomFactoryConfig {
    fn default() -> Self {
        Self {
            min_width: 6,
            min_height: 5,
            sector_margin_x: 2,
            sector_margin_y: 1,
        }
    }
}

/// Configuration for procedural generation.
///
/// Controls the room layout and progression parameters. Loaded from JSON by the
/// binary when `--config` is given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Room sizing within sectors
    pub rooms: RoomFactoryConfig,
    /// Cells left empty around the 3×3 sector grid
    pub outer_margin: i32,
    /// Maximum number of locked edges on the start → exit path
    pub max_locks: usize,
    /// Field-of-view radius used by the level store
    pub fov_radius: i32,
}

impl GenerationConfig {
    /// Creates the standard generation configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use cavern::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(7);
    /// assert_eq!(config.seed, 7);
    /// assert!(config.rooms.min_width >= 3);
    /// assert!(config.max_locks <= 3);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rooms: RoomFactoryConfig::default(),
            outer_margin: 6,
            max_locks: config::MAX_LOCKS,
            fov_radius: config::DEFAULT_FOV_RADIUS,
        }
    }

    /// Creates a configuration for testing with smaller rooms.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            rooms: RoomFactoryConfig {
                min_width: 5,
                min_height: 4,
                ..RoomFactoryConfig::default()
            },
            ..Self::new(seed)
        }
    }

    /// Reads a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> CavernResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Creates a seeded random number generator from the config.
    pub fn create_rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.seed)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content for the given canvas and session.
    fn generate(&self, canvas: Size, session: &GameSession, rng: &mut StdRng) -> CavernResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T) -> CavernResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Concrete door pair joining rooms `i` and `j` of a graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorLink {
    pub i: usize,
    pub j: usize,
    /// Door on the perimeter of room `i`
    pub from: Position,
    /// Door on the perimeter of room `j`
    pub to: Position,
}

/// Blueprint threaded through the generation stages.
#[derive(Debug, Clone)]
pub struct LevelGenerationPlan {
    /// Playable canvas (one row already reserved for the HUD)
    pub canvas: Size,
    /// Dungeon depth, starting at 1
    pub depth: u32,
    /// Rooms in row-major sector order
    pub rooms: Vec<Room>,
    /// Room graph edges as index pairs
    pub edges: Vec<(usize, usize)>,
    pub door_links: Vec<DoorLink>,
    pub corridors: Vec<CorridorPath>,
    /// Edges whose corridor was actually built
    pub connected_edges: Vec<(usize, usize)>,
    pub start_index: usize,
    pub exit_index: Option<usize>,
    pub items: Vec<PlacedItem>,
    pub enemies: Vec<PlacedEnemy>,
    pub player: Option<PlacedPlayer>,
    pub actor_ids: ActorIdAllocator,
}

impl LevelGenerationPlan {
    /// Creates an empty plan for a canvas at the given depth.
    pub fn new(canvas: Size, depth: u32) -> Self {
        Self {
            canvas,
            depth,
            rooms: Vec::new(),
            edges: Vec::new(),
            door_links: Vec::new(),
            corridors: Vec::new(),
            connected_edges: Vec::new(),
            start_index: 0,
            exit_index: None,
            items: Vec::new(),
            enemies: Vec::new(),
            player: None,
            actor_ids: ActorIdAllocator::new(),
        }
    }

    /// Graph used by progression stages: corridor-backed edges once routing ran.
    pub fn progression_graph(&self) -> RoomGraph {
        RoomGraph::new(self.rooms.len(), &self.connected_edges)
    }

    /// True if an item or enemy already occupies `pos`.
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.items.iter().any(|item| item.position == pos)
            || self.enemies.iter().any(|enemy| enemy.position == pos)
    }
}
