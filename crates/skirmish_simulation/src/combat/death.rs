//! Death transition: Alive → Dying → Removed
//!
//! - Alive → Dying: `enter_dying` (идемпотентно), collider выключается сразу
//! - Dying: teardown фиксированной длительности (визуал в presentation)
//! - Dying → Removed: despawn по завершении teardown

use bevy::prelude::*;

use crate::components::{Lifecycle, PhysicsBody};
use crate::physics::Collider;
use crate::presentation::{AnimationCue, AnimationTrigger};

/// Причина смерти
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    /// Здоровье закончилось
    Damage,
    /// AI застрял в Follow (unrecoverable)
    Stuck,
}

/// Событие: entity умер (вошёл в Dying)
#[derive(Event, Debug, Clone)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
    pub cause: DeathCause,
}

/// Событие: entity удалён из симуляции (teardown завершён)
#[derive(Event, Debug, Clone)]
pub struct EntityRemoved {
    pub entity: Entity,
}

/// Перевести в Dying. Возвращает false если уже умирает (no-op).
pub fn enter_dying(lifecycle: &mut Lifecycle, teardown_duration: f32) -> bool {
    if lifecycle.is_dying() {
        return false;
    }

    *lifecycle = Lifecycle::Dying {
        elapsed: 0.0,
        duration: teardown_duration.max(0.0),
    };
    true
}

/// Система: side effects смерти (EntityDied → collider off, stop, Death cue)
pub fn handle_entity_died(
    mut died_events: EventReader<EntityDied>,
    mut cues: EventWriter<AnimationCue>,
    mut bodies: Query<(Option<&mut Collider>, Option<&mut PhysicsBody>)>,
) {
    for event in died_events.read() {
        let Ok((collider, body)) = bodies.get_mut(event.entity) else {
            continue;
        };

        if let Some(mut collider) = collider {
            collider.enabled = false;
        }
        if let Some(mut body) = body {
            body.velocity = Vec2::ZERO;
        }

        cues.write(AnimationCue::new(event.entity, AnimationTrigger::Death));

        crate::log(&format!(
            "💀 Entity {:?} died ({:?}, killer: {:?})",
            event.entity, event.cause, event.killer
        ));
    }
}

/// Система: teardown (elapsed += dt), despawn по завершении
///
/// Запускается до handle_entity_died: умерший в этом тике начинает teardown со следующего.
pub fn advance_death_teardown(
    mut commands: Commands,
    mut removed_events: EventWriter<EntityRemoved>,
    mut query: Query<(Entity, &mut Lifecycle)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut lifecycle) in query.iter_mut() {
        let Lifecycle::Dying { elapsed, duration } = lifecycle.as_mut() else {
            continue;
        };

        *elapsed += delta;
        if *elapsed < *duration {
            continue;
        }

        crate::log(&format!("⚰️ Despawning entity {:?} (teardown complete)", entity));
        commands.entity(entity).despawn();
        removed_events.write(EntityRemoved { entity });
    }
}
