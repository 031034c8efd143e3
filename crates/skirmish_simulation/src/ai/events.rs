//! AI Events — переходы FSM и stuck recovery (для логов, UI, тестов)

use bevy::prelude::*;

use super::components::AIState;

/// Событие: враг сменил состояние FSM
#[derive(Event, Debug, Clone, PartialEq)]
pub struct AIStateChanged {
    pub entity: Entity,
    pub from: AIState,
    pub to: AIState,
}

/// Что сделал stuck recovery
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StuckRecovery {
    /// Patrol: перешли на видимый waypoint
    RetargetedWaypoint { index: usize },
    /// Patrol: видимых waypoint'ов нет — телепорт на spawn
    TeleportedToSpawn { position: Vec2 },
    /// Follow: unrecoverable — смерть
    SelfDestructed,
}

/// Событие: сработал stuck recovery
#[derive(Event, Debug, Clone, PartialEq)]
pub struct EnemyStuck {
    pub entity: Entity,
    pub recovery: StuckRecovery,
}
