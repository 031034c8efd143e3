//! Player control components
//!
//! Отмечает entity которым управляет игрок через input (в отличие от AI).

use bevy::prelude::*;

/// Marker component для player-controlled entity
///
/// Акторы БЕЗ этого компонента управляются AI systems.
/// Акторы С этим компонентом получают команды от input source.
///
/// # Архитектурная заметка
/// - AI systems используют `With<EnemyBrain>` (игрок мозга не имеет)
/// - Input systems используют `With<Player>` filter
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(PlayerInput)]
pub struct Player;

/// Состояние input source на текущий тик
///
/// Заполняется снаружи (клавиатура, геймпад, тест).
/// `attack_pressed` — edge trigger, сбрасывается после обработки.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// Directional axes, каждая ось в [-1, 1]
    pub axes: Vec2,
    pub attack_pressed: bool,
}

impl PlayerInput {
    pub fn new(axes: Vec2) -> Self {
        Self {
            axes: axes.clamp(Vec2::NEG_ONE, Vec2::ONE),
            attack_pressed: false,
        }
    }

    /// Нажать attack (обработается в следующем тике)
    pub fn press_attack(&mut self) {
        self.attack_pressed = true;
    }
}
