//! Stuck recovery — cross-cutting таймер, независимо от состояния FSM
//!
//! Запускается после physics: смещение меряется по позиции после интеграции.

use bevy::prelude::*;

use crate::ai::events::{EnemyStuck, StuckRecovery};
use crate::ai::line_of_sight::has_los_to_point;
use crate::ai::{AIConfig, AIState, EnemyBrain, PatrolRoute};
use crate::combat::{enter_dying, DeathCause, EntityDied};
use crate::components::Lifecycle;
use crate::config::CombatTuning;
use crate::physics::{SpatialIndex, SpatialQuery};

/// Первый waypoint, видимый из `position`
pub fn first_visible_waypoint<S: SpatialQuery + ?Sized>(
    spatial: &S,
    position: Vec2,
    route: &PatrolRoute,
) -> Option<usize> {
    route
        .waypoints
        .iter()
        .position(|&waypoint| has_los_to_point(spatial, position, waypoint))
}

/// Обновить stuck таймер. true = застряли дольше stuck_duration.
///
/// Сдвинулись на stuck_displacement от last_position → сброс, новая точка отсчёта.
pub fn update_stuck_timer(brain: &mut EnemyBrain, position: Vec2, config: &AIConfig, delta: f32) -> bool {
    if position.distance(brain.last_position) < config.stuck_displacement {
        brain.stuck_timer += delta;
        brain.stuck_timer > config.stuck_duration
    } else {
        brain.stuck_timer = 0.0;
        brain.last_position = position;
        false
    }
}

/// Система: stuck detection + recovery
///
/// - Patrol: первый видимый waypoint, иначе телепорт на spawn
/// - Follow: unrecoverable → Dying
pub fn ai_stuck_recovery(
    mut enemies: Query<(
        Entity,
        &mut Transform,
        &AIState,
        &AIConfig,
        &PatrolRoute,
        &mut EnemyBrain,
        &mut Lifecycle,
    )>,
    spatial: Res<SpatialIndex>,
    tuning: Res<CombatTuning>,
    mut stuck_events: EventWriter<EnemyStuck>,
    mut died_events: EventWriter<EntityDied>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut transform, state, config, route, mut brain, mut lifecycle) in enemies.iter_mut() {
        if !lifecycle.is_alive() {
            continue;
        }

        let position = transform.translation.truncate();
        if !update_stuck_timer(&mut brain, position, config, delta) {
            continue;
        }

        brain.stuck_timer = 0.0;

        let recovery = match state {
            AIState::Patrol => match first_visible_waypoint(spatial.as_ref(), position, route) {
                Some(index) => {
                    brain.go_to_waypoint(route, index);
                    StuckRecovery::RetargetedWaypoint { index }
                }
                None => {
                    let spawn = brain.spawn_origin;
                    transform.translation.x = spawn.x;
                    transform.translation.y = spawn.y;
                    brain.last_position = spawn;
                    StuckRecovery::TeleportedToSpawn { position: spawn }
                }
            },
            AIState::Follow { .. } => {
                if enter_dying(&mut lifecycle, tuning.death_teardown_duration) {
                    died_events.write(EntityDied {
                        entity,
                        killer: None,
                        cause: DeathCause::Stuck,
                    });
                }
                StuckRecovery::SelfDestructed
            }
        };

        crate::log_warning(&format!("AI: {:?} stuck in {:?}, recovery: {:?}", entity, state, recovery));
        stuck_events.write(EnemyStuck { entity, recovery });
    }
}
