//! # Dungeon Generation
//!
//! Room layout over a 3×3 sector grid and the [`LevelGenerator`] that runs the full
//! stage pipeline and assembles the playable [`LevelState`].
//!
//! The pipeline is fixed:
//! rooms → graph → doors → corridors → exit → locks → player → enemies → items → assembly.

use super::{
    connect_rooms, lock_and_key, place_doors, place_enemies, place_items, place_player,
    route_corridors, select_exit, snapped, violations, GenerationConfig, Generator,
    LevelGenerationPlan, RoomFactoryConfig,
};
use crate::game::{GameSession, Hud, LevelState, Position, Room, Size, WorldGeometry};
use crate::{CavernError, CavernResult};
use rand::rngs::StdRng;
use rand::Rng;
use std::collections::HashSet;

/// Inclusive cell bounds of one sector of the layout grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sector {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

/// Splits the canvas, minus `outer_margin` on every side, into 3×3 sectors.
///
/// Sectors come back row-major. The last column and row absorb the remainder.
///
/// # Examples
///
/// ```
/// use cavern::{sector_grid, Size};
///
/// let sectors = sector_grid(Size::new(80, 39), 6);
/// assert_eq!(sectors.len(), 9);
/// assert_eq!((sectors[0].x0, sectors[0].y0), (6, 6));
/// assert_eq!((sectors[8].x1, sectors[8].y1), (73, 32));
/// ```
pub fn sector_grid(canvas: Size, outer_margin: i32) -> Vec<Sector> {
    let inner_left = outer_margin;
    let inner_top = outer_margin;
    let inner_w = (canvas.width - 2 * outer_margin).max(1);
    let inner_h = (canvas.height - 2 * outer_margin).max(1);

    let (w3, h3) = (inner_w / 3, inner_h / 3);
    let cols = [inner_left, inner_left + w3, inner_left + 2 * w3, inner_left + inner_w];
    let rows = [inner_top, inner_top + h3, inner_top + 2 * h3, inner_top + inner_h];

    let mut sectors = Vec::with_capacity(9);
    for r in 0..3 {
        for c in 0..3 {
            sectors.push(Sector {
                x0: cols[c],
                y0: rows[r],
                x1: cols[c + 1] - 1,
                y1: rows[r + 1] - 1,
            });
        }
    }
    sectors
}

/// Builds one randomly sized room per sector.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomFactory {
    pub config: RoomFactoryConfig,
}

impl RoomFactory {
    pub fn new(config: RoomFactoryConfig) -> Self {
        Self { config }
    }

    /// A room inside the margin-adjusted sector, never smaller than the configured minimum.
    pub fn make_room(&self, sector: Sector, rng: &mut impl Rng) -> Room {
        let cfg = &self.config;
        let sx0 = sector.x0 + cfg.sector_margin_x;
        let sy0 = sector.y0 + cfg.sector_margin_y;
        let sx1 = sector.x1 - cfg.sector_margin_x;
        let sy1 = sector.y1 - cfg.sector_margin_y;

        let span_w = cfg.min_width.max(sx1 - sx0 + 1);
        let span_h = cfg.min_height.max(sy1 - sy0 + 1);
        let width = rng.gen_range(cfg.min_width..=span_w);
        let height = rng.gen_range(cfg.min_height..=span_h);
        let dx = rng.gen_range(0..=span_w - width);
        let dy = rng.gen_range(0..=span_h - height);

        Room::new(Position::new(sx0 + dx, sy0 + dy), width, height)
    }
}

/// Stage: fills the plan with nine rooms, start room first.
pub fn build_rooms(
    mut plan: LevelGenerationPlan,
    factory: &RoomFactory,
    outer_margin: i32,
    rng: &mut impl Rng,
) -> LevelGenerationPlan {
    plan.rooms = sector_grid(plan.canvas, outer_margin)
        .into_iter()
        .map(|sector| factory.make_room(sector, rng))
        .collect();
    plan.start_index = 0;
    log::debug!("Built {} rooms on {}x{}", plan.rooms.len(), plan.canvas.width, plan.canvas.height);
    plan
}

fn room_fits(canvas: Size, room: &Room) -> bool {
    canvas.contains(room.origin) && canvas.contains(Position::new(room.right(), room.bottom()))
}

/// Turns a finished plan into a playable level.
///
/// Corridors are snapped onto adjacent doors first. Remaining geometry defects are
/// logged and do not fail the level.
pub fn assemble(plan: LevelGenerationPlan, session: &GameSession) -> CavernResult<LevelState> {
    if plan.exit_index.is_none() {
        return Err(CavernError::InvalidState(
            "level plan has no exit room".to_string(),
        ));
    }
    let Some(player) = plan.player else {
        return Err(CavernError::InvalidState(
            "level plan has no placed player".to_string(),
        ));
    };

    let corridors = snapped(&plan.rooms, plan.corridors);
    let geometry = WorldGeometry::new(plan.canvas, plan.rooms, corridors);
    for defect in violations(&geometry) {
        log::warn!("Level geometry defect: {}", defect);
    }

    let hud = Hud::from_character(&player.model, session.depth);
    Ok(LevelState {
        geometry,
        player,
        enemies: plan.enemies,
        hud,
        world_items: plan.items,
        explored: HashSet::new(),
        actor_ids: plan.actor_ids,
    })
}

/// Runs the complete generation pipeline.
///
/// # Examples
///
/// ```
/// use cavern::{Character, GameSession, GenerationConfig, Generator, LevelGenerator, Size};
///
/// let config = GenerationConfig::new(7);
/// let generator = LevelGenerator::new(config.clone());
/// let session = GameSession::new(Character::new("Hero"));
/// let mut rng = config.create_rng();
/// let level = generator.generate(Size::new(80, 40), &session, &mut rng).unwrap();
/// assert_eq!(level.geometry.rooms.len(), 9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LevelGenerator {
    pub config: GenerationConfig,
}

impl LevelGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self { config }
    }
}

impl Generator<LevelState> for LevelGenerator {
    fn generate(
        &self,
        canvas: Size,
        session: &GameSession,
        rng: &mut StdRng,
    ) -> CavernResult<LevelState> {
        // One row is kept free for the HUD
        let world_canvas = Size::new(canvas.width, (canvas.height - 1).max(1));
        let factory = RoomFactory::new(self.config.rooms);

        let plan = LevelGenerationPlan::new(world_canvas, session.depth);
        let plan = build_rooms(plan, &factory, self.config.outer_margin, rng);
        if let Some(room) = plan.rooms.iter().find(|room| !room_fits(world_canvas, room)) {
            return Err(CavernError::GenerationFailed(format!(
                "canvas {}x{} too small: room at {} does not fit",
                canvas.width, canvas.height, room.origin
            )));
        }

        let plan = connect_rooms(plan);
        let plan = place_doors(plan);
        let plan = route_corridors(plan);
        let plan = select_exit(plan, rng);
        let plan = lock_and_key(plan, self.config.max_locks, rng);
        let plan = place_player(plan, session);
        let plan = place_enemies(plan, rng);
        let plan = place_items(plan, rng);
        let level = assemble(plan, session)?;

        if let Err(err) = self.validate(&level) {
            log::warn!("Generated level failed validation: {}", err);
        }
        log::debug!(
            "Generated depth {} level: {} corridors, {} enemies, {} items",
            session.depth,
            level.geometry.corridors.len(),
            level.enemies.len(),
            level.world_items.len()
        );
        Ok(level)
    }

    fn validate(&self, level: &LevelState) -> CavernResult<()> {
        super::validate(&level.geometry)?;
        if !level
            .world_items
            .iter()
            .any(|item| item.model.is_exit())
        {
            return Err(CavernError::InvalidState("level has no exit marker".to_string()));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "LevelGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Character;
    use rand::SeedableRng;

    fn session() -> GameSession {
        GameSession::new(Character::new("Hero"))
    }

    #[test]
    fn test_sector_grid_layout() {
        let sectors = sector_grid(Size::new(80, 39), 6);
        assert_eq!(sectors[0], Sector { x0: 6, y0: 6, x1: 27, y1: 14 });
        assert_eq!(sectors[1].x0, 28);
        assert_eq!(sectors[3].y0, 15);
        // Last column and row absorb the remainder
        assert_eq!(sectors[8], Sector { x0: 50, y0: 24, x1: 73, y1: 32 });
    }

    #[test]
    fn test_rooms_respect_sector_margins() {
        let factory = RoomFactory::default();
        let mut rng = StdRng::seed_from_u64(17);
        for sector in sector_grid(Size::new(80, 39), 6) {
            for _ in 0..20 {
                let room = factory.make_room(sector, &mut rng);
                assert!(room.width >= 6 && room.height >= 5);
                assert!(room.left() >= sector.x0 + 2);
                assert!(room.right() <= sector.x1 - 2);
                assert!(room.top() >= sector.y0 + 1);
                assert!(room.bottom() <= sector.y1 - 1);
            }
        }
    }

    #[test]
    fn test_generation_is_deterministic() {
        let generator = LevelGenerator::new(GenerationConfig::new(99));
        let a = generator
            .generate(Size::new(80, 40), &session(), &mut StdRng::seed_from_u64(99))
            .unwrap();
        let b = generator
            .generate(Size::new(80, 40), &session(), &mut StdRng::seed_from_u64(99))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_generated_level_shape() {
        let generator = LevelGenerator::new(GenerationConfig::new(5));
        let mut rng = StdRng::seed_from_u64(5);
        let level = generator.generate(Size::new(80, 40), &session(), &mut rng).unwrap();

        assert_eq!(level.geometry.canvas, Size::new(80, 39));
        assert_eq!(level.geometry.rooms.len(), 9);
        assert_eq!(level.depth(), 1);
        assert!(level.explored.is_empty());
        assert!(level.geometry.rooms[0].contains_interior(level.player.position));
        assert_eq!(
            level
                .world_items
                .iter()
                .filter(|item| item.model.is_exit())
                .count(),
            1
        );
        assert!(generator.validate(&level).is_ok());
    }

    #[test]
    fn test_tiny_canvas_fails() {
        let generator = LevelGenerator::default();
        let mut rng = StdRng::seed_from_u64(1);
        let result = generator.generate(Size::new(20, 10), &session(), &mut rng);
        assert!(matches!(result, Err(CavernError::GenerationFailed(_))));
    }

    #[test]
    fn test_assemble_requires_exit() {
        let mut plan = LevelGenerationPlan::new(Size::new(40, 20), 1);
        plan.rooms = vec![Room::new(Position::new(1, 1), 6, 6)];
        let plan = place_player(plan, &session());
        let result = assemble(plan, &session());
        assert!(matches!(result, Err(CavernError::InvalidState(_))));
    }
}
