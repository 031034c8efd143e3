//! Общие helpers для integration тестов
//!
//! `create_headless_app` двигает время ровно на один fixed tick за `app.update()`.
//! Первый update только запускает часы (нулевая delta), поэтому `test_app`
//! делает его сразу — дальше один update = один simulation tick.

#![allow(dead_code)]

use bevy::prelude::*;
use skirmish_simulation::spawn::ActorBundle;
use skirmish_simulation::*;

pub const SEED: u64 = 42;

/// Записанные события (для проверок после тиков)
#[derive(Resource)]
pub struct Recorded<E: Event + Clone>(pub Vec<E>);

impl<E: Event + Clone> Default for Recorded<E> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

fn record_events<E: Event + Clone>(mut events: EventReader<E>, mut recorded: ResMut<Recorded<E>>) {
    recorded.0.extend(events.read().cloned());
}

/// Headless app с запущенными часами
pub fn test_app() -> App {
    test_app_with_seed(SEED)
}

pub fn test_app_with_seed(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.update();
    app
}

/// Начать запись событий типа E (в конце каждого tick)
pub fn record<E: Event + Clone>(app: &mut App) {
    app.init_resource::<Recorded<E>>()
        .add_systems(FixedUpdate, record_events::<E>.after(SimulationSet::Death));
}

pub fn recorded<E: Event + Clone>(app: &App) -> &[E] {
    &app.world().resource::<Recorded<E>>().0
}

pub fn tick(app: &mut App, count: usize) {
    for _ in 0..count {
        app.update();
    }
}

pub fn spawn_player_at(app: &mut App, position: Vec2) -> Entity {
    let bundle = PlayerSpawn::new(position).bundle().expect("valid player spawn");
    app.world_mut().spawn(bundle).id()
}

pub fn spawn_player_with(app: &mut App, spawn: PlayerSpawn) -> Entity {
    let bundle = spawn.bundle().expect("valid player spawn");
    app.world_mut().spawn(bundle).id()
}

pub fn spawn_enemy_with(app: &mut App, spawn: EnemySpawn) -> Entity {
    let bundle = spawn.bundle().expect("valid enemy spawn");
    app.world_mut().spawn(bundle).id()
}

/// Боевая "кукла": актор без AI и input (стоит на месте)
pub fn spawn_dummy(app: &mut App, faction: Faction, position: Vec2, max_health: u32, loadout: Loadout) -> Entity {
    let tuning = ActorTuning {
        max_health,
        ..ActorTuning::default()
    };
    let bundle = ActorBundle::new(faction, position, &tuning, loadout).expect("valid dummy");
    app.world_mut().spawn(bundle).id()
}

pub fn spawn_wall(app: &mut App, position: Vec2, half_extents: Vec2) -> Entity {
    app.world_mut()
        .spawn((
            Obstacle,
            Transform::from_translation(position.extend(0.0)),
            Collider::obstacle(half_extents),
        ))
        .id()
}

/// Нажать attack у игрока (обработается в следующем tick)
pub fn press_attack(app: &mut App, player: Entity) {
    app.world_mut()
        .get_mut::<PlayerInput>(player)
        .expect("player has input")
        .press_attack();
}

pub fn health_of(app: &App, entity: Entity) -> Option<u32> {
    app.world().get::<Health>(entity).map(|health| health.current)
}

pub fn is_removed(app: &App, entity: Entity) -> bool {
    app.world().get_entity(entity).is_err()
}
