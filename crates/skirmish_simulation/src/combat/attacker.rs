//! Attacker component — атака актора (swing → strike frame → sweep)
//!
//! Поток:
//! - AttackIntent (input/AI) → begin_attacks: Attack cue, stop, hold, pending strike
//! - tick_pending_strikes: через `strike_delay` → StrikeFrame
//! - resolve_strikes: attack sweep → HitLanded для каждой цели

use bevy::prelude::*;

use crate::combat::damage::{base_damage, HitLanded};
use crate::combat::hitbox::{perform_attack_sweep, HitVolumes};
use crate::components::{Actor, Facing, Lifecycle, Locomotion, PhysicsBody};
use crate::config::CombatTuning;
use crate::equipment::Loadout;
use crate::physics::SpatialIndex;
use crate::presentation::{AnimationCue, AnimationTrigger};

/// Attacker — компонент для акторов которые могут атаковать
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Attacker {
    /// Задержка от начала swing до удара (секунды, "attack frame" анимации)
    pub strike_delay: f32,

    /// Сколько осталось до удара (None = атаки нет)
    pub pending_strike: Option<f32>,
}

impl Attacker {
    pub fn new(strike_delay: f32) -> Self {
        Self {
            strike_delay,
            pending_strike: None,
        }
    }

    pub fn is_swinging(&self) -> bool {
        self.pending_strike.is_some()
    }

    /// Начать swing (повторная атака перезапускает таймер)
    pub fn start_swing(&mut self) {
        self.pending_strike = Some(self.strike_delay);
    }

    /// Продвинуть таймер. true = удар в этом тике.
    pub fn advance(&mut self, delta: f32) -> bool {
        let Some(remaining) = self.pending_strike else {
            return false;
        };

        if remaining <= 0.0 {
            self.pending_strike = None;
            return true;
        }

        let remaining = remaining - delta;
        if remaining <= 0.0 {
            self.pending_strike = None;
            true
        } else {
            self.pending_strike = Some(remaining);
            false
        }
    }
}

/// Событие: актор хочет атаковать (input или AI)
#[derive(Event, Debug, Clone)]
pub struct AttackIntent {
    pub attacker: Entity,
}

/// Событие: strike frame — момент удара
#[derive(Event, Debug, Clone)]
pub struct StrikeFrame {
    pub attacker: Entity,
}

/// Система: AttackIntent → начало атаки
///
/// Мёртвые не атакуют. Hold не мешает атаке (атака сама ставит hold заново).
pub fn begin_attacks(
    mut intents: EventReader<AttackIntent>,
    mut cues: EventWriter<AnimationCue>,
    mut attackers: Query<(&Lifecycle, &mut Attacker, &mut Locomotion, &mut PhysicsBody)>,
) {
    for intent in intents.read() {
        let Ok((lifecycle, mut attacker, mut locomotion, mut body)) = attackers.get_mut(intent.attacker) else {
            continue;
        };

        if !lifecycle.is_alive() {
            continue;
        }

        cues.write(AnimationCue::new(intent.attacker, AnimationTrigger::Attack));
        body.velocity = Vec2::ZERO;
        let hold_time = locomotion.attack_hold_time;
        locomotion.hold(hold_time);
        attacker.start_swing();
    }
}

/// System: таймеры pending strike → StrikeFrame
///
/// Умерший во время swing не бьёт.
pub fn tick_pending_strikes(
    mut strikes: EventWriter<StrikeFrame>,
    mut attackers: Query<(Entity, &Lifecycle, &mut Attacker)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, lifecycle, mut attacker) in attackers.iter_mut() {
        if !attacker.is_swinging() {
            continue;
        }

        if !lifecycle.is_alive() {
            attacker.pending_strike = None;
            continue;
        }

        if attacker.advance(delta) {
            strikes.write(StrikeFrame { attacker: entity });
        }
    }
}

/// Система: StrikeFrame → attack sweep → HitLanded
pub fn resolve_strikes(
    mut strikes: EventReader<StrikeFrame>,
    mut hits: EventWriter<HitLanded>,
    attackers: Query<(&Actor, &Lifecycle, &Transform, &Facing, &HitVolumes, Option<&Loadout>)>,
    targets: Query<(&Actor, &Lifecycle, &Transform)>,
    spatial: Res<SpatialIndex>,
    tuning: Res<CombatTuning>,
) {
    for strike in strikes.read() {
        let Ok((actor, lifecycle, transform, facing, volumes, loadout)) = attackers.get(strike.attacker) else {
            continue;
        };
        if !lifecycle.is_alive() {
            continue;
        }

        let origin = transform.translation.truncate();
        let result = perform_attack_sweep(
            spatial.as_ref(),
            strike.attacker,
            origin,
            facing.direction,
            volumes,
            tuning.hit_query_capacity,
            |entity| {
                let (target_actor, target_lifecycle, target_transform) = targets.get(entity).ok()?;
                (actor.faction.is_hostile_to(target_actor.faction) && target_lifecycle.is_alive())
                    .then(|| target_transform.translation.truncate())
            },
        );

        if result.truncated > 0 {
            crate::log_warning(&format!(
                "Attack sweep of {:?} hit query capacity ({}), dropped {} farthest targets",
                strike.attacker, tuning.hit_query_capacity, result.truncated
            ));
        }

        let damage = base_damage(loadout.and_then(Loadout::weapon), tuning.unarmed_damage);

        for (target, target_position) in result.targets {
            hits.write(HitLanded {
                attacker: strike.attacker,
                target,
                base_damage: damage,
                impact_direction: (origin - target_position).normalize_or_zero(),
            });
        }
    }
}
