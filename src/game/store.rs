//! # Level Store
//!
//! Owns the session, the current level and the generator between turns.

use crate::game::{GameSession, LevelState, Size};
use crate::generation::{GenerationConfig, Generator, LevelGenerator};
use crate::visibility::VisibilitySnapshot;
use crate::CavernResult;
use rand::rngs::StdRng;

/// Keeps the current [`LevelState`] and replaces it on level transitions.
#[derive(Debug)]
pub struct LevelStore {
    pub session: GameSession,
    pub state: LevelState,
    pub config: GenerationConfig,
    canvas: Size,
    generator: LevelGenerator,
    rng: StdRng,
}

impl LevelStore {
    /// Generates the first level for `session`.
    pub fn new(session: GameSession, canvas: Size, config: GenerationConfig) -> CavernResult<Self> {
        let generator = LevelGenerator::new(config.clone());
        let mut rng = config.create_rng();
        let state = generator.generate(canvas, &session, &mut rng)?;
        Ok(Self {
            session,
            state,
            config,
            canvas,
            generator,
            rng,
        })
    }

    /// Wraps a previously saved level. The session picks up its player and depth.
    pub fn from_saved(state: LevelState, canvas: Size, config: GenerationConfig) -> Self {
        let session = GameSession::at_depth(state.player.model.clone(), state.depth());
        let generator = LevelGenerator::new(config.clone());
        let rng = config.create_rng();
        Self {
            session,
            state,
            config,
            canvas,
            generator,
            rng,
        }
    }

    pub fn canvas(&self) -> Size {
        self.canvas
    }

    /// Regenerates the current depth from the session.
    pub fn start_game(&mut self) -> CavernResult<()> {
        self.state = self
            .generator
            .generate(self.canvas, &self.session, &mut self.rng)?;
        log::info!("Started game at depth {}", self.session.depth);
        Ok(())
    }

    /// Carries the player over and generates the next depth.
    ///
    /// The explored set starts empty on the new level.
    pub fn next_level(&mut self) -> CavernResult<()> {
        let mut session = self.session.clone();
        session.player = self.state.player.model.clone();
        session.depth += 1;

        let state = self.generator.generate(self.canvas, &session, &mut self.rng)?;
        self.session = session;
        self.state = state;
        log::info!("Descended to depth {}", self.session.depth);
        Ok(())
    }

    /// Recomputes the field of view with the configured radius.
    pub fn refresh_visibility(&mut self) -> VisibilitySnapshot {
        self.state.refresh_visibility(self.config.fov_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Character, Item};

    fn store(seed: u64) -> LevelStore {
        let session = GameSession::new(Character::new("Hero"));
        LevelStore::new(session, Size::new(80, 40), GenerationConfig::new(seed)).unwrap()
    }

    #[test]
    fn test_next_level_carries_player() {
        let mut store = store(3);
        store.state.player.model.gold = 42;
        store.state.player.model.inventory.add(Item::sword());
        store.refresh_visibility();
        assert!(!store.state.explored.is_empty());

        store.next_level().unwrap();
        assert_eq!(store.session.depth, 2);
        assert_eq!(store.state.depth(), 2);
        assert_eq!(store.state.player.model.gold, 42);
        assert_eq!(store.state.player.model.inventory.len(), 2);
        assert!(store.state.explored.is_empty());
    }

    #[test]
    fn test_refresh_visibility_accumulates() {
        let mut store = store(8);
        let first = store.refresh_visibility();
        assert!(first.visible.contains(&store.state.player.position));
        let again = store.refresh_visibility();
        assert!(first.explored.is_subset(&again.explored));
    }

    #[test]
    fn test_start_game_keeps_depth() {
        let mut store = store(11);
        store.start_game().unwrap();
        assert_eq!(store.state.depth(), 1);
        assert_eq!(store.state.geometry.rooms.len(), 9);
    }

    #[test]
    fn test_from_saved_restores_session() {
        let mut original = store(4);
        original.next_level().unwrap();
        let restored = LevelStore::from_saved(
            original.state.clone(),
            original.canvas(),
            original.config.clone(),
        );
        assert_eq!(restored.session.depth, 2);
        assert_eq!(restored.state, original.state);
    }
}
