//! FSM AI system (patrol scan, follow tracking, charge → attack, move intent).

use bevy::prelude::*;

use crate::ai::events::AIStateChanged;
use crate::ai::line_of_sight::has_los_to_entity;
use crate::ai::{AIConfig, AIState, EnemyBrain, PatrolRoute};
use crate::combat::AttackIntent;
use crate::components::{Actor, Facing, Lifecycle, MoveIntent};
use crate::physics::{SpatialIndex, SpatialQuery, MASK_CHARACTERS};

/// Ближайший видимый враг в радиусе обнаружения
///
/// `candidate(entity)` возвращает позицию если entity — живой враг наблюдателя.
/// При равной дистанции выигрывает меньший Entity (детерминизм).
pub fn find_nearest_visible_hostile<S, F>(
    spatial: &S,
    observer: Entity,
    position: Vec2,
    detection_radius: f32,
    candidate: F,
) -> Option<(Entity, Vec2)>
where
    S: SpatialQuery + ?Sized,
    F: Fn(Entity) -> Option<Vec2>,
{
    spatial
        .overlap_circle(position, detection_radius, MASK_CHARACTERS)
        .into_iter()
        .filter(|&entity| entity != observer)
        .filter_map(|entity| candidate(entity).map(|target_position| (entity, target_position)))
        .filter(|&(entity, target_position)| has_los_to_entity(spatial, position, entity, target_position))
        .min_by(|(a, pa), (b, pb)| {
            pa.distance_squared(position)
                .total_cmp(&pb.distance_squared(position))
                .then_with(|| a.cmp(b))
        })
}

/// Итог одного Follow тика
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FollowStep {
    /// Цель не видна и последняя известная точка достигнута → Patrol
    pub lost_track: bool,
    /// Charge накоплен → атака в этом тике
    pub attack: bool,
}

/// Follow логика одного тика (без ECS)
///
/// - видим цель → target_point = позиция цели
/// - не видим и дошли до target_point → lost_track
/// - charge считается по реальной дистанции до цели даже в тике,
///   когда враг теряет след (атака ещё может случиться)
pub fn follow_step(
    brain: &mut EnemyBrain,
    config: &AIConfig,
    position: Vec2,
    target_position: Vec2,
    visible: bool,
    delta: f32,
) -> FollowStep {
    let lost_track = if visible {
        brain.target_point = target_position;
        false
    } else {
        brain.target_point.distance(position) < config.arrival_threshold
    };

    let attack = brain.update_charge(position.distance(target_position), config, delta);

    FollowStep { lost_track, attack }
}

/// Система: AI FSM
///
/// Patrol:
/// - дошли до waypoint'а → следующий по кругу
/// - ближайший видимый враг в detection_radius → Follow
///
/// Follow:
/// - цель пропала (despawned / умирает) → Patrol
/// - видим цель → target_point = позиция цели
/// - не видим и дошли до последней известной точки → Patrol
/// - charge → face + AttackIntent (и в тике перехода в Patrol тоже)
///
/// В конце MoveIntent = направление на target_point.
pub fn ai_fsm(
    mut enemies: Query<(
        Entity,
        &Transform,
        &Actor,
        &Lifecycle,
        &AIConfig,
        &PatrolRoute,
        &mut AIState,
        &mut EnemyBrain,
        &mut MoveIntent,
        &mut Facing,
    )>,
    targets: Query<(&Actor, &Lifecycle, &Transform)>,
    spatial: Res<SpatialIndex>,
    mut attack_intents: EventWriter<AttackIntent>,
    mut state_events: EventWriter<AIStateChanged>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, transform, actor, lifecycle, config, route, mut state, mut brain, mut intent, mut facing) in
        enemies.iter_mut()
    {
        if !lifecycle.is_alive() {
            intent.direction = Vec2::ZERO;
            continue;
        }

        let position = transform.translation.truncate();
        let previous = *state;

        match previous {
            AIState::Patrol => {
                if brain.target_point.distance(position) < config.arrival_threshold {
                    brain.advance_waypoint(route);
                }

                let spotted = find_nearest_visible_hostile(
                    spatial.as_ref(),
                    entity,
                    position,
                    config.detection_radius,
                    |candidate| {
                        let (other, other_lifecycle, other_transform) = targets.get(candidate).ok()?;
                        (actor.faction.is_hostile_to(other.faction) && other_lifecycle.is_alive())
                            .then(|| other_transform.translation.truncate())
                    },
                );

                if let Some((target, _)) = spotted {
                    *state = AIState::Follow { target };
                }
            }

            AIState::Follow { target } => {
                let target_position = targets
                    .get(target)
                    .ok()
                    .filter(|(_, other_lifecycle, _)| other_lifecycle.is_alive())
                    .map(|(_, _, other_transform)| other_transform.translation.truncate());

                match target_position {
                    None => {
                        *state = AIState::Patrol;
                    }
                    Some(target_position) => {
                        let visible = has_los_to_entity(spatial.as_ref(), position, target, target_position);
                        let step = follow_step(&mut brain, config, position, target_position, visible, delta);

                        if step.lost_track {
                            *state = AIState::Patrol;
                        }
                        if step.attack {
                            facing.direction = (target_position - position).normalize_or_zero();
                            attack_intents.write(AttackIntent { attacker: entity });
                            crate::log(&format!(
                                "🗡️ {:?} attacks {:?} (distance {:.1})",
                                entity,
                                target,
                                position.distance(target_position)
                            ));
                        }
                    }
                }
            }
        }

        if *state != previous {
            crate::log(&format!("AI: {:?} {:?} → {:?}", entity, previous, *state));
            state_events.write(AIStateChanged {
                entity,
                from: previous,
                to: *state,
            });
        }

        intent.direction = (brain.target_point - position).normalize_or_zero();
    }
}
