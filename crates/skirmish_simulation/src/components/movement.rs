//! Movement компоненты: намерение движения, скорость, направление взгляда, hold-таймер

use bevy::prelude::*;

/// Желаемое направление движения на этот тик
///
/// Пишут: player input system или AI. Читает: locomotion.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct MoveIntent {
    pub direction: Vec2,
}

/// Физическое тело (kinematic, velocity интегрируем сами)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PhysicsBody {
    pub velocity: Vec2,
}

/// Направление взгляда (continuous, в 4 стороны дискретизируется по запросу)
///
/// Zero = ещё никуда не смотрели.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct Facing {
    pub direction: Vec2,
}

/// Locomotion параметры + hold-таймер
///
/// Пока `hold_timer > 0` запросы на движение игнорируются
/// (recovery после атаки или попадания).
#[derive(Component, Debug, Clone, Copy)]
pub struct Locomotion {
    /// Скорость по осям (units/sec)
    pub speed: Vec2,
    pub attack_hold_time: f32,
    pub hit_hold_time: f32,
    /// Оставшееся время блокировки (секунды)
    pub hold_timer: f32,
    /// Двигаемся (для анимации); false = idle даже если физика ещё двигает
    pub moving: bool,
}

impl Default for Locomotion {
    fn default() -> Self {
        Self {
            speed: Vec2::splat(100.0),
            attack_hold_time: 0.5,
            hit_hold_time: 0.5,
            hold_timer: 0.0,
            moving: false,
        }
    }
}

impl Locomotion {
    pub fn is_held(&self) -> bool {
        self.hold_timer > 0.0
    }

    pub fn hold(&mut self, duration: f32) {
        self.hold_timer = duration;
    }

    pub fn tick(&mut self, delta: f32) {
        if self.hold_timer > 0.0 {
            self.hold_timer = (self.hold_timer - delta).max(0.0);
        }
    }
}
