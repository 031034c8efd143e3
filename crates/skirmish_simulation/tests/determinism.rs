//! Тесты детерминизма
//!
//! Одинаковый seed → идентичная арена и идентичный мир после N тиков
//! (движение, AI, combat, смерть и despawn).

mod common;

use bevy::prelude::*;
use rand::Rng;
use skirmish_simulation::*;

const ENEMY_COUNT: usize = 6;
const TICK_COUNT: usize = 900;

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;

    let first = run_simulation(SEED);
    let second = run_simulation(SEED);

    assert_eq!(
        first, second,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    let snapshots: Vec<_> = (0..3).map(|_| run_simulation(common::SEED)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(snapshots[0], *snapshot, "Прогон {} дал результат отличный от прогона 0", i);
    }
}

#[test]
fn test_different_seeds_different_arenas() {
    assert_ne!(run_simulation(1), run_simulation(2));
}

/// Seeded арена (игрок в центре, враги и стены из DeterministicRng),
/// скриптованный input, snapshot Transform + Health + AIState
fn run_simulation(seed: u64) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let mut app = common::test_app_with_seed(seed);

    let player = {
        let world = app.world_mut();
        let mut placements = Vec::new();
        {
            let mut rng = world.resource_mut::<DeterministicRng>();
            for _ in 0..ENEMY_COUNT {
                let position = Vec2::new(rng.rng.gen_range(-60.0..60.0), rng.rng.gen_range(-60.0..60.0));
                let waypoint = Vec2::new(rng.rng.gen_range(-60.0..60.0), rng.rng.gen_range(-60.0..60.0));
                placements.push((position, waypoint));
            }
        }

        for (index, (position, waypoint)) in placements.into_iter().enumerate() {
            if index % 2 == 0 {
                world.spawn((
                    Obstacle,
                    Transform::from_translation((waypoint * 0.5).extend(0.0)),
                    Collider::obstacle(Vec2::new(3.0, 8.0)),
                ));
            }
            let bundle = EnemySpawn::new(position, vec![waypoint, position])
                .bundle()
                .expect("valid enemy spawn");
            world.spawn(bundle);
        }

        let bundle = PlayerSpawn::new(Vec2::ZERO).bundle().expect("valid player spawn");
        world.spawn(bundle).id()
    };

    for tick in 0..TICK_COUNT {
        if let Some(mut input) = app.world_mut().get_mut::<PlayerInput>(player) {
            let angle = tick as f32 * 0.02;
            input.axes = Vec2::new(angle.cos(), angle.sin());
            if tick % 45 == 0 {
                input.press_attack();
            }
        }
        app.update();
    }

    let world = app.world_mut();
    (
        world_snapshot::<Transform>(world),
        world_snapshot::<Health>(world),
        world_snapshot::<AIState>(world),
    )
}
