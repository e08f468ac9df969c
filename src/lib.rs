//! # Cavern
//!
//! Procedural level generation and field-of-view core for a turn-based dungeon crawler.
//!
//! ## Architecture Overview
//!
//! The crate is split into a handful of modules that mirror the life of a level:
//!
//! - **Game**: the world model (rooms, doors, corridors), placed actors, the playable
//!   [`LevelState`] and the level store that replaces it between levels
//! - **Generation**: a pipeline of stages that each take a [`LevelGenerationPlan`] by value
//!   and hand back an updated one, finished off by the assembler
//! - **Visibility**: ray-cast field of view with corner blocking and door slits
//! - **Utils**: small math and grid pathfinding helpers shared by the other modules
//!
//! ## Determinism
//!
//! Every random choice is drawn from an injected [`rand::rngs::StdRng`], so a fixed seed
//! reproduces the same level.

pub mod game;
pub mod generation;
pub mod utils;
pub mod visibility;

pub use game::*;
pub use generation::*;
pub use utils::*;
pub use visibility::*;

/// Core error type for the Cavern engine.
#[derive(thiserror::Error, Debug)]
pub enum CavernError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    /// Level geometry failed a consistency check
    #[error("Invalid level geometry: {0}")]
    Validation(#[from] ValidationError),
}

/// Result type used throughout the Cavern codebase.
pub type CavernResult<T> = Result<T, CavernError>;

/// Version information for the crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Default canvas width in tiles
    pub const DEFAULT_CANVAS_WIDTH: i32 = 80;

    /// Default canvas height in tiles (one row is reserved for the HUD)
    pub const DEFAULT_CANVAS_HEIGHT: i32 = 40;

    /// Default field-of-view radius
    pub const DEFAULT_FOV_RADIUS: i32 = 7;

    /// Number of player-facing messages kept by a message log
    pub const MESSAGE_LOG_CAPACITY: usize = 50;

    /// Starting character health
    pub const DEFAULT_PLAYER_HEALTH: i32 = 30;

    /// Starting character dexterity
    pub const DEFAULT_PLAYER_DEXTERITY: i32 = 5;

    /// Starting character strength
    pub const DEFAULT_PLAYER_STRENGTH: i32 = 5;

    /// Maximum number of locked edges per level
    pub const MAX_LOCKS: usize = 3;
}
