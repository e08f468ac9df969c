//! Saving and loading generated levels.

use cavern::{
    Character, DoorKind, GameSession, GenerationConfig, Generator, LevelGenerator, LevelState,
    Size,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::tempdir;

fn level(seed: u64) -> LevelState {
    let generator = LevelGenerator::new(GenerationConfig::new(seed));
    let session = GameSession::new(Character::new("Hero"));
    let mut level = generator
        .generate(Size::new(80, 40), &session, &mut StdRng::seed_from_u64(seed))
        .unwrap();
    level.refresh_visibility(7);
    level
}

#[test]
fn test_json_round_trip_is_lossless() {
    let original = level(31);
    let json = original.save_to_json().unwrap();
    let loaded = LevelState::load_from_json(&json).unwrap();

    assert_eq!(loaded, original);
    assert_eq!(loaded.explored, original.explored);
    assert_eq!(loaded.player.id, original.player.id);
    let ids: Vec<_> = loaded.enemies.iter().map(|e| (e.id, e.position)).collect();
    let expected: Vec<_> = original.enemies.iter().map(|e| (e.id, e.position)).collect();
    assert_eq!(ids, expected);
}

#[test]
fn test_door_kinds_survive_round_trip() {
    let mut original = level(2);
    original.geometry.rooms[4].doors[0].kind = DoorKind::Locked(cavern::KeyColor::Blue);
    let loaded = LevelState::load_from_json(&original.save_to_json().unwrap()).unwrap();
    assert_eq!(
        loaded.geometry.rooms[4].doors[0].kind,
        DoorKind::Locked(cavern::KeyColor::Blue)
    );
}

#[test]
fn test_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("level.json");

    let original = level(77);
    original.save_to_file(&path).unwrap();
    assert!(path.exists());

    let loaded = LevelState::load_from_file(&path).unwrap();
    assert_eq!(loaded, original);
}

#[test]
fn test_loading_garbage_fails() {
    assert!(LevelState::load_from_json("{ not json").is_err());
    let dir = tempdir().unwrap();
    assert!(LevelState::load_from_file(dir.path().join("missing.json")).is_err());
}

#[test]
fn test_config_from_json_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.json");
    let config = GenerationConfig::for_testing(5);
    std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();
    assert_eq!(GenerationConfig::from_json_file(&path).unwrap(), config);
}
