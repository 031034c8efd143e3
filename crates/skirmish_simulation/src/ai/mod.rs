//! AI decision-making module
//!
//! Enemy FSM: Patrol / Follow, perception через detection radius + line of sight,
//! charge перед атакой, stuck recovery.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod line_of_sight;
pub mod systems;

// Re-export основных типов
pub use components::{AIConfig, AIState, EnemyBrain, PatrolRoute};
pub use events::{AIStateChanged, EnemyStuck, StuckRecovery};
pub use line_of_sight::{has_los_to_entity, has_los_to_point};
pub use systems::{ai_fsm, ai_stuck_recovery};

use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. ai_fsm — FSM + MoveIntent + AttackIntent (SimulationSet::Intent)
/// 2. ai_stuck_recovery — после physics (SimulationSet::Recovery)
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AIStateChanged>().add_event::<EnemyStuck>();

        app.add_systems(FixedUpdate, ai_fsm.in_set(SimulationSet::Intent))
            .add_systems(FixedUpdate, ai_stuck_recovery.in_set(SimulationSet::Recovery));
    }
}
