//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: базовые характеристики (faction, health, invulnerability, lifecycle)
//! - movement: перемещение (MoveIntent, PhysicsBody, Facing, Locomotion)
//!
//! Остальные домены держат свои компоненты рядом с системами
//! (equipment::Loadout, combat::HitVolumes, ai::EnemyBrain, physics::Collider).

pub mod actor;
pub mod movement;

// Re-exports для удобного импорта
pub use actor::*;
pub use movement::*;
