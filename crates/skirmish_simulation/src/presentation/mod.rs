//! Presentation sink — данные для рендера (анимации, спрайт)
//!
//! Симуляция ничего не рисует. Рендер читает:
//! - AnimationCue события (Attack / Hit / Death triggers)
//! - AnimationParams (continuous velocity_x / velocity_y / flip)
//! - SpriteState (мигание неуязвимости, death teardown)
//!
//! Системы работают в Update (render frame rate), не в FixedUpdate.

use bevy::prelude::*;

use crate::components::{Facing, Invulnerability, Lifecycle, Locomotion};
use crate::config::CombatTuning;

/// Trigger анимации
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationTrigger {
    Attack,
    Hit,
    Death,
}

/// Событие: запустить trigger анимации
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AnimationCue {
    pub entity: Entity,
    pub trigger: AnimationTrigger,
}

impl AnimationCue {
    pub fn new(entity: Entity, trigger: AnimationTrigger) -> Self {
        Self { entity, trigger }
    }
}

/// Continuous параметры аниматора
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct AnimationParams {
    /// |facing.x| когда идём, 0 в idle
    pub velocity_x: f32,
    /// facing.y когда идём, 0 в idle
    pub velocity_y: f32,
    /// Спрайт отражён (смотрит влево)
    pub flip_x: bool,
    /// Последний полученный trigger
    pub last_trigger: Option<AnimationTrigger>,
}

/// Состояние спрайта
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct SpriteState {
    pub visible: bool,
    pub rotation_degrees: f32,
    pub scale: f32,
    pub alpha: f32,
}

impl Default for SpriteState {
    fn default() -> Self {
        Self {
            visible: true,
            rotation_degrees: 0.0,
            scale: 1.0,
            alpha: 1.0,
        }
    }
}

/// Видимость во время неуязвимости: видим iff floor(remaining × rate) чётный
pub fn flicker_visible(remaining: f32, flicker_rate: f32) -> bool {
    if remaining <= 0.0 {
        return true;
    }
    ((remaining * flicker_rate).floor() as i64) % 2 == 0
}

/// Death teardown визуал для прогресса t ∈ [0, 1]
pub fn teardown_sprite(progress: f32, tuning: &CombatTuning) -> SpriteState {
    let t = progress.clamp(0.0, 1.0);
    SpriteState {
        visible: true,
        rotation_degrees: t * tuning.teardown_rotation_degrees,
        scale: 1.0 + t * tuning.teardown_scale_growth,
        alpha: 1.0 - t,
    }
}

/// Система: continuous параметры аниматора из facing/locomotion
///
/// Мёртвые не обновляются (последний кадр замирает).
pub fn update_animation_params(mut query: Query<(&Facing, &Locomotion, &Lifecycle, &mut AnimationParams)>) {
    for (facing, locomotion, lifecycle, mut params) in query.iter_mut() {
        if !lifecycle.is_alive() {
            continue;
        }

        if locomotion.moving {
            params.velocity_x = facing.direction.x.abs();
            params.velocity_y = facing.direction.y;
        } else {
            params.velocity_x = 0.0;
            params.velocity_y = 0.0;
        }

        if facing.direction.x != 0.0 {
            params.flip_x = facing.direction.x < 0.0;
        }
    }
}

/// Система: AnimationCue → last_trigger
pub fn record_animation_cues(mut cues: EventReader<AnimationCue>, mut query: Query<&mut AnimationParams>) {
    for cue in cues.read() {
        if let Ok(mut params) = query.get_mut(cue.entity) {
            params.last_trigger = Some(cue.trigger);
        }
    }
}

/// Система: мигание неуязвимости + death teardown
pub fn update_sprite_state(
    mut query: Query<(&Invulnerability, &Lifecycle, &mut SpriteState)>,
    tuning: Res<CombatTuning>,
) {
    for (invulnerability, lifecycle, mut sprite) in query.iter_mut() {
        *sprite = match lifecycle {
            Lifecycle::Alive => SpriteState {
                visible: flicker_visible(invulnerability.remaining, tuning.flicker_rate),
                ..SpriteState::default()
            },
            Lifecycle::Dying { .. } => teardown_sprite(lifecycle.teardown_progress(), &tuning),
        };
    }
}

/// Presentation Plugin
pub struct PresentationPlugin;

impl Plugin for PresentationPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AnimationCue>();

        app.add_systems(
            Update,
            (record_animation_cues, update_animation_params, update_sprite_state).chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flicker_pattern() {
        assert!(flicker_visible(0.0, 10.0));
        assert!(flicker_visible(0.05, 10.0)); // floor(0.5) = 0
        assert!(!flicker_visible(0.15, 10.0)); // floor(1.5) = 1
        assert!(flicker_visible(0.25, 10.0)); // floor(2.5) = 2
        assert!(!flicker_visible(0.95, 10.0)); // floor(9.5) = 9
    }

    #[test]
    fn test_teardown_sprite() {
        let tuning = CombatTuning::default();

        let start = teardown_sprite(0.0, &tuning);
        assert_eq!(start.rotation_degrees, 0.0);
        assert_eq!(start.scale, 1.0);
        assert_eq!(start.alpha, 1.0);

        let half = teardown_sprite(0.5, &tuning);
        assert_eq!(half.rotation_degrees, 200.0);
        assert_eq!(half.scale, 2.0);
        assert_eq!(half.alpha, 0.5);

        let end = teardown_sprite(1.5, &tuning); // Clamp
        assert_eq!(end.scale, 3.0);
        assert_eq!(end.alpha, 0.0);
    }
}
