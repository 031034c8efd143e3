//! Базовые компоненты акторов: Actor, Health, Invulnerability, Lifecycle

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Фракция актора — кто кого может бить
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Faction {
    #[default]
    Player,
    Enemy,
}

impl Faction {
    pub fn is_hostile_to(self, other: Faction) -> bool {
        self != other
    }
}

/// Актор (игрок или враг) — базовый компонент для живых существ
///
/// Автоматически добавляет Health, Invulnerability, Lifecycle через Required Components.
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(Health, Invulnerability, Lifecycle)]
pub struct Actor {
    pub faction: Faction,
}

impl Actor {
    pub fn new(faction: Faction) -> Self {
        Self { faction }
    }
}

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max, урон никогда не лечит
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }
}

/// Окно неуязвимости после полученного урона
///
/// Таймер монотонно убывает каждый тик и зажат снизу нулём.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Invulnerability {
    /// Сколько осталось (секунды), 0 = уязвим
    pub remaining: f32,
    /// Длительность окна (секунды)
    pub duration: f32,
}

impl Default for Invulnerability {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl Invulnerability {
    pub fn new(duration: f32) -> Self {
        Self { remaining: 0.0, duration }
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }

    pub fn trigger(&mut self) {
        self.remaining = self.duration;
    }

    pub fn clear(&mut self) {
        self.remaining = 0.0;
    }

    pub fn tick(&mut self, delta: f32) {
        if self.remaining > 0.0 {
            self.remaining = (self.remaining - delta).max(0.0);
        }
    }

    /// Игнорирует ли актор урон (мёртвые считаются неуязвимыми)
    pub fn blocks_damage(&self, lifecycle: &Lifecycle) -> bool {
        !lifecycle.is_alive() || self.is_active()
    }
}

/// Жизненный цикл: Alive → Dying → (despawn)
///
/// Переходы только вперёд, воскрешения нет.
/// Removed состояния нет в компоненте — entity просто деспавнится.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub enum Lifecycle {
    #[default]
    Alive,
    /// Death teardown: collider выключен, визуальный фидбек, потом despawn
    Dying {
        elapsed: f32,
        duration: f32,
    },
}

impl Lifecycle {
    pub fn is_alive(&self) -> bool {
        matches!(self, Lifecycle::Alive)
    }

    pub fn is_dying(&self) -> bool {
        matches!(self, Lifecycle::Dying { .. })
    }

    /// Прогресс teardown 0..=1 (0 для живых)
    pub fn teardown_progress(&self) -> f32 {
        match self {
            Lifecycle::Alive => 0.0,
            Lifecycle::Dying { elapsed, duration } => {
                if *duration <= 0.0 {
                    1.0
                } else {
                    (elapsed / duration).clamp(0.0, 1.0)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(3);
        assert_eq!(health.current, 3);

        health.take_damage(1);
        assert_eq!(health.current, 2);
        assert!(!health.is_depleted());

        health.take_damage(100); // Saturating sub
        assert_eq!(health.current, 0);
        assert!(health.is_depleted());
    }

    #[test]
    fn test_invulnerability_timer() {
        let mut invuln = Invulnerability::new(1.0);
        assert!(!invuln.is_active());

        invuln.trigger();
        assert!(invuln.is_active());

        invuln.tick(0.6);
        assert!(invuln.is_active());

        invuln.tick(0.6); // Clamp в ноль
        assert_eq!(invuln.remaining, 0.0);
        assert!(!invuln.is_active());
    }

    #[test]
    fn test_dead_blocks_damage() {
        let invuln = Invulnerability::new(1.0);
        assert!(!invuln.blocks_damage(&Lifecycle::Alive));
        assert!(invuln.blocks_damage(&Lifecycle::Dying { elapsed: 0.0, duration: 0.5 }));
    }

    #[test]
    fn test_teardown_progress() {
        assert_eq!(Lifecycle::Alive.teardown_progress(), 0.0);
        assert_eq!(Lifecycle::Dying { elapsed: 0.25, duration: 0.5 }.teardown_progress(), 0.5);
        assert_eq!(Lifecycle::Dying { elapsed: 0.9, duration: 0.5 }.teardown_progress(), 1.0);
        assert_eq!(Lifecycle::Dying { elapsed: 0.0, duration: 0.0 }.teardown_progress(), 1.0);
    }

    #[test]
    fn test_faction_hostility() {
        assert!(Faction::Player.is_hostile_to(Faction::Enemy));
        assert!(!Faction::Enemy.is_hostile_to(Faction::Enemy));
    }
}
