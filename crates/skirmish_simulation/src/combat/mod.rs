//! Combat system module
//!
//! ECS ответственность:
//! - Game state: Health, Invulnerability, Lifecycle, Attacker
//! - Combat rules: amplification, mitigation, invulnerability window
//! - Hit detection: directional sweep по spatial index
//! - Events: AttackIntent → StrikeFrame → HitLanded → DamageDealt / EntityDied → EntityRemoved
//!
//! Рендер получает только AnimationCue (Attack / Hit / Death).

use bevy::prelude::*;

pub mod attacker;
pub mod damage;
pub mod death;
pub mod hitbox;

#[cfg(test)]
mod damage_tests;

// Re-export основных типов
pub use attacker::{begin_attacks, resolve_strikes, tick_pending_strikes, AttackIntent, Attacker, StrikeFrame};
pub use damage::{
    amplified_damage, apply_damage, apply_to_health, base_damage, effective_mitigation, mitigated_damage,
    resolve_damage, tick_invulnerability, DamageDealt, DamageOutcome, HitLanded,
};
pub use death::{
    advance_death_teardown, enter_dying, handle_entity_died, DeathCause, EntityDied, EntityRemoved,
};
pub use hitbox::{perform_attack_sweep, HitDirection, HitVolumes, SweepResult};

use crate::SimulationSet;

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. tick_invulnerability (Timers)
/// 2. begin_attacks — AttackIntent → swing (Attack)
/// 3. tick_pending_strikes → resolve_strikes — strike frame → sweep (Strike)
/// 4. apply_damage — HitLanded → Health (Damage)
/// 5. advance_death_teardown → handle_entity_died (Death)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<AttackIntent>()
            .add_event::<StrikeFrame>()
            .add_event::<HitLanded>()
            .add_event::<DamageDealt>()
            .add_event::<EntityDied>()
            .add_event::<EntityRemoved>();

        app.add_systems(FixedUpdate, tick_invulnerability.in_set(SimulationSet::Timers))
            .add_systems(FixedUpdate, begin_attacks.in_set(SimulationSet::Attack))
            .add_systems(
                FixedUpdate,
                (tick_pending_strikes, resolve_strikes)
                    .chain()
                    .in_set(SimulationSet::Strike),
            )
            .add_systems(FixedUpdate, apply_damage.in_set(SimulationSet::Damage))
            .add_systems(
                FixedUpdate,
                (
                    advance_death_teardown,
                    handle_entity_died, // После teardown: умерший в этом тике стартует со следующего
                )
                    .chain()
                    .in_set(SimulationSet::Death),
            );
    }
}
