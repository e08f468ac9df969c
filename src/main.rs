//! # Cavern Main Entry Point
//!
//! Generates (or loads) a level, computes the player's field of view and prints the
//! map as ASCII with fog over unexplored cells.

use cavern::{
    config, CavernResult, Character, DoorKind, EnemyKind, GameSession, GenerationConfig,
    ItemKind, KeyColor, LevelState, LevelStore, Position, Size, VisibilitySnapshot,
};
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments for the Cavern level generator.
#[derive(Parser, Debug)]
#[command(name = "cavern")]
#[command(about = "Procedural dungeon levels with ray-cast field of view")]
#[command(version)]
struct Args {
    /// Random seed for level generation (overrides the config file)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Dungeon depth to generate
    #[arg(short, long, default_value_t = 1)]
    depth: u32,

    /// Canvas width in cells
    #[arg(long, default_value_t = config::DEFAULT_CANVAS_WIDTH,
        value_parser = clap::value_parser!(i32).range(1..))]
    width: i32,

    /// Canvas height in cells, HUD row included
    #[arg(long, default_value_t = config::DEFAULT_CANVAS_HEIGHT,
        value_parser = clap::value_parser!(i32).range(1..))]
    height: i32,

    /// Generation config as JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the level state as JSON
    #[arg(long)]
    save: Option<PathBuf>,

    /// Load a saved level instead of generating one
    #[arg(long)]
    load: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> CavernResult<()> {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    log::info!("Starting Cavern v{}", cavern::VERSION);

    let mut generation = match &args.config {
        Some(path) => GenerationConfig::from_json_file(path)?,
        None => GenerationConfig::default(),
    };
    if let Some(seed) = args.seed {
        generation.seed = seed;
    }
    let canvas = Size::new(args.width, args.height);

    let mut store = match &args.load {
        Some(path) => {
            log::info!("Loading level from {}", path.display());
            LevelStore::from_saved(LevelState::load_from_file(path)?, canvas, generation)
        }
        None => {
            log::info!("Generating depth {} with seed {}", args.depth, generation.seed);
            let session = GameSession::at_depth(Character::new("Hero"), args.depth);
            LevelStore::new(session, canvas, generation)?
        }
    };

    let snapshot = store.refresh_visibility();
    println!("{}", render_map(&store.state, &snapshot));
    println!("{}", store.state.hud);
    print_summary(&store.state);

    if let Some(path) = &args.save {
        store.state.save_to_file(path)?;
        log::info!("Saved level to {}", path.display());
    }
    Ok(())
}

/// Uses `RUST_LOG` when set, otherwise the `--log-level` flag.
fn initialize_logging(log_level: &str) {
    let env = env_logger::Env::default().default_filter_or(log_level.to_lowercase());
    env_logger::Builder::from_env(env).format_target(false).init();
}

fn terrain_glyph(level: &LevelState, cell: Position) -> char {
    let world = &level.geometry;
    if let Some((_, door)) = world.door_at(cell) {
        return match door.kind {
            DoorKind::Open => '+',
            DoorKind::Locked(KeyColor::Red) => 'r',
            DoorKind::Locked(KeyColor::Blue) => 'b',
            DoorKind::Locked(KeyColor::Yellow) => 'y',
        };
    }
    if world.is_wall(cell) {
        '#'
    } else if world.room_with_interior(cell).is_some() {
        '.'
    } else if world.is_corridor(cell) {
        ':'
    } else {
        ' '
    }
}

fn enemy_glyph(kind: EnemyKind) -> char {
    match kind {
        EnemyKind::Zombie => 'Z',
        EnemyKind::Vampire => 'V',
        EnemyKind::Ghost => 'G',
        EnemyKind::Ogre => 'O',
        EnemyKind::SnakeMage => 'S',
        EnemyKind::Mimic => 'M',
    }
}

fn item_glyph(kind: ItemKind) -> char {
    match kind {
        ItemKind::Food => '%',
        ItemKind::Potion => '!',
        ItemKind::Scroll => '?',
        ItemKind::Weapon => ')',
        ItemKind::Treasure => '$',
        ItemKind::Key(_) => 'k',
        ItemKind::Exit => '>',
    }
}

/// Characters needed to draw `canvas`, one newline per row. Loaded levels may carry
/// a degenerate canvas, which draws as nothing.
fn map_capacity(canvas: Size) -> usize {
    let width = usize::try_from(canvas.width).unwrap_or(0);
    let height = usize::try_from(canvas.height).unwrap_or(0);
    (width + 1).saturating_mul(height)
}

/// Actors only show on visible cells; explored cells show terrain.
fn render_map(level: &LevelState, snapshot: &VisibilitySnapshot) -> String {
    let canvas = level.geometry.canvas;
    let mut out = String::with_capacity(map_capacity(canvas));
    for y in 0..canvas.height {
        for x in 0..canvas.width {
            let cell = Position::new(x, y);
            let glyph = if !snapshot.explored.contains(&cell) {
                ' '
            } else if !snapshot.visible.contains(&cell) {
                terrain_glyph(level, cell)
            } else if level.player.position == cell {
                '@'
            } else if let Some(enemy) = level.enemy_at(cell) {
                // Disguised mimics look like loot
                if enemy.model.disguised {
                    '$'
                } else {
                    enemy_glyph(enemy.model.kind)
                }
            } else if let Some(item) = level.item_at(cell) {
                item_glyph(item.model.kind)
            } else {
                terrain_glyph(level, cell)
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn print_summary(level: &LevelState) {
    let locked = level
        .geometry
        .rooms
        .iter()
        .flat_map(|room| room.doors.iter())
        .filter(|door| door.is_locked())
        .count();
    let keys = level
        .world_items
        .iter()
        .filter(|item| matches!(item.model.kind, ItemKind::Key(_)))
        .count();
    println!(
        "rooms: {}  corridors: {}  locked doors: {}  keys: {}  enemies: {}  items: {}",
        level.geometry.rooms.len(),
        level.geometry.corridors.len(),
        locked,
        keys,
        level.enemies.len(),
        level.world_items.len()
    );
}
