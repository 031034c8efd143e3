//! Headless симуляция SKIRMISH
//!
//! Запускает Bevy App без рендера: seeded арена, игрок со скриптованным input,
//! несколько патрулирующих врагов.
//!
//! Использование: `skirmish_simulation [config.toml] [ticks]`

use bevy::prelude::*;
use rand::Rng;
use std::path::PathBuf;
use std::process::ExitCode;

use skirmish_simulation::*;

const DEFAULT_TICKS: u32 = 1000;
const ARENA_HALF_SIZE: f32 = 150.0;
const ENEMY_COUNT: usize = 4;
const OBSTACLE_COUNT: usize = 6;

fn main() -> ExitCode {
    init_logger();

    let mut args = std::env::args().skip(1);
    let config = match args.next().map(PathBuf::from) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(err) => {
                log_error(&format!("Failed to load config {:?}: {}", path, err));
                return ExitCode::FAILURE;
            }
        },
        None => SimulationConfig::default(),
    };
    let ticks = args.next().and_then(|value| value.parse().ok()).unwrap_or(DEFAULT_TICKS);

    if let Some(level) = LogLevel::parse(&config.log_level) {
        set_log_level(level);
    }

    log_info(&format!("Starting SKIRMISH headless simulation (seed: {})", config.seed));

    let mut app = create_headless_app_with(config.seed, SimulationPlugin::from_config(&config));
    match config.item_catalog() {
        Ok(catalog) => {
            app.insert_resource(catalog);
        }
        Err(err) => {
            log_error(&format!("Invalid item catalog: {}", err));
            return ExitCode::FAILURE;
        }
    }

    let player = match populate_arena(&mut app, &config) {
        Ok(player) => player,
        Err(err) => {
            log_error(&format!("Arena setup failed: {}", err));
            return ExitCode::FAILURE;
        }
    };

    for tick in 0..ticks {
        drive_player(&mut app, player, tick);
        app.update();

        if tick % 100 == 0 {
            let alive = count_alive(&mut app);
            log_info(&format!("Tick {}: {} actors alive", tick, alive));
        }
    }

    let alive = count_alive(&mut app);
    let player_health = app.world().get::<Health>(player).map(|health| health.current);
    log_info(&format!(
        "Simulation complete: {} ticks, {} actors alive, player health {:?}",
        ticks, alive, player_health
    ));

    ExitCode::SUCCESS
}

/// Seeded арена: препятствия, игрок в центре, враги с маршрутами патруля
///
/// Экипировка резолвится через ItemCatalog resource (вставлен до вызова).
fn populate_arena(app: &mut App, config: &SimulationConfig) -> Result<Entity, SpawnError> {
    let world = app.world_mut();

    let layout = {
        let mut rng = world.resource_mut::<DeterministicRng>();
        ArenaLayout::generate(&mut rng.rng)
    };

    for (position, half_extents) in &layout.obstacles {
        world.spawn((
            Obstacle,
            Transform::from_translation(position.extend(0.0)),
            Collider::obstacle(*half_extents),
        ));
    }

    let catalog = world.resource::<ItemCatalog>().clone();
    let player = {
        let mut commands = world.commands();

        let player_spawn = PlayerSpawn {
            tuning: config.actor.clone(),
            ..PlayerSpawn::new(Vec2::ZERO).with_equipment(config.player_equipment.clone())
        };
        let player = spawn_player(&mut commands, &catalog, &player_spawn)?;

        for (position, waypoints) in layout.enemies {
            let enemy_spawn = EnemySpawn {
                tuning: config.actor.clone(),
                enemy: config.enemy.clone(),
                ..EnemySpawn::new(position, waypoints).with_equipment(config.enemy_equipment.clone())
            };
            spawn_enemy(&mut commands, &catalog, &enemy_spawn)?;
        }

        player
    };

    world.flush();
    Ok(player)
}

struct ArenaLayout {
    obstacles: Vec<(Vec2, Vec2)>,
    enemies: Vec<(Vec2, Vec<Vec2>)>,
}

impl ArenaLayout {
    fn generate(rng: &mut impl Rng) -> Self {
        let obstacles = (0..OBSTACLE_COUNT)
            .map(|_| {
                let position = random_point(rng, ARENA_HALF_SIZE * 0.8);
                let half_extents = Vec2::new(rng.gen_range(4.0..16.0), rng.gen_range(4.0..16.0));
                (position, half_extents)
            })
            .collect();

        let enemies = (0..ENEMY_COUNT)
            .map(|_| {
                let position = random_point(rng, ARENA_HALF_SIZE);
                let waypoint_count = rng.gen_range(2..=4);
                let waypoints = (0..waypoint_count).map(|_| random_point(rng, ARENA_HALF_SIZE)).collect();
                (position, waypoints)
            })
            .collect();

        Self { obstacles, enemies }
    }
}

fn random_point(rng: &mut impl Rng, half_size: f32) -> Vec2 {
    Vec2::new(
        rng.gen_range(-half_size..half_size),
        rng.gen_range(-half_size..half_size),
    )
}

/// Скриптованный input: игрок ходит по кругу и бьёт раз в секунду
fn drive_player(app: &mut App, player: Entity, tick: u32) {
    let Some(mut input) = app.world_mut().get_mut::<PlayerInput>(player) else {
        return;
    };

    let angle = tick as f32 * 0.01;
    input.axes = Vec2::new(angle.cos(), angle.sin());
    if tick % 60 == 0 {
        input.press_attack();
    }
}

fn count_alive(app: &mut App) -> usize {
    let world = app.world_mut();
    let mut query = world.query::<&Lifecycle>();
    query.iter(world).filter(|lifecycle| lifecycle.is_alive()).count()
}
