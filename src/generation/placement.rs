//! # Room Placement Service
//!
//! Finding free floor cells inside rooms for items, enemies and the player.

use super::LevelGenerationPlan;
use crate::game::{GameSession, Placed, Position};
use rand::seq::SliceRandom;
use rand::Rng;

/// First floor cell of the room, in row-major order, not taken by an item or enemy.
pub fn first_free_floor(plan: &LevelGenerationPlan, room_index: usize) -> Option<Position> {
    plan.rooms
        .get(room_index)?
        .floor_positions()
        .into_iter()
        .find(|&pos| !plan.is_occupied(pos))
}

/// Uniformly random floor cell of the room not taken by an item or enemy.
pub fn random_free_floor(
    plan: &LevelGenerationPlan,
    room_index: usize,
    rng: &mut impl Rng,
) -> Option<Position> {
    let mut tiles = plan.rooms.get(room_index)?.floor_positions();
    tiles.shuffle(rng);
    tiles.into_iter().find(|&pos| !plan.is_occupied(pos))
}

/// Index of the room whose interior contains `pos`.
pub fn room_index_of(plan: &LevelGenerationPlan, pos: Position) -> Option<usize> {
    plan.rooms
        .iter()
        .position(|room| room.contains_interior(pos))
}

/// Stage: puts the session's character at the center of the start room.
pub fn place_player(mut plan: LevelGenerationPlan, session: &GameSession) -> LevelGenerationPlan {
    let Some(start) = plan.rooms.get(plan.start_index) else {
        log::warn!("No start room to place the player in");
        return plan;
    };
    let position = start.center();
    let id = plan.actor_ids.allocate();
    plan.player = Some(Placed::new(id, position, session.player.clone()));
    log::debug!("Placed player {} at {}", id, position);
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Character, Item, Room, Size};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn single_room_plan() -> LevelGenerationPlan {
        let mut plan = LevelGenerationPlan::new(Size::new(20, 20), 1);
        // 3 × 2 interior
        plan.rooms = vec![Room::new(Position::new(0, 0), 5, 4)];
        plan
    }

    #[test]
    fn test_first_free_floor_skips_occupied() {
        let mut plan = single_room_plan();
        assert_eq!(first_free_floor(&plan, 0), Some(Position::new(1, 1)));
        let id = plan.actor_ids.allocate();
        plan.items.push(Placed::new(id, Position::new(1, 1), Item::bread()));
        assert_eq!(first_free_floor(&plan, 0), Some(Position::new(2, 1)));
        assert_eq!(first_free_floor(&plan, 3), None);
    }

    #[test]
    fn test_random_free_floor_exhausts() {
        let mut plan = single_room_plan();
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..6 {
            let pos = random_free_floor(&plan, 0, &mut rng).unwrap();
            assert!(plan.rooms[0].contains_interior(pos));
            let id = plan.actor_ids.allocate();
            plan.items.push(Placed::new(id, pos, Item::apple()));
        }
        assert_eq!(random_free_floor(&plan, 0, &mut rng), None);
    }

    #[test]
    fn test_place_player_at_start_center() {
        let plan = single_room_plan();
        let session = GameSession::new(Character::new("Hero"));
        let plan = place_player(plan, &session);
        let player = plan.player.as_ref().unwrap();
        assert_eq!(player.position, plan.rooms[0].center());
        assert_eq!(room_index_of(&plan, player.position), Some(0));
    }
}
