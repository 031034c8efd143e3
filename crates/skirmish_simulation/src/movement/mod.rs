//! Movement domain — locomotion общая для игрока и врагов
//!
//! Содержит:
//! - steer: MoveIntent → velocity + facing (с учётом hold-таймера и смерти)
//! - apply_move_intent / tick_hold_timers системы
//!
//! Кто пишет MoveIntent (input или AI) — locomotion не важно.

use bevy::prelude::*;

use crate::components::{Facing, Lifecycle, Locomotion, MoveIntent, PhysicsBody};
use crate::SimulationSet;


/// Минимальная длина направления, при которой считаем что актор "идёт"
pub const MOVE_THRESHOLD: f32 = 0.05;

/// Применить желаемое направление к одному актору
///
/// - hold-таймер активен или актор мёртв → запрос игнорируется (velocity не трогаем)
/// - иначе velocity = direction × speed (покомпонентно)
/// - |direction| > MOVE_THRESHOLD → обновляем facing и помечаем moving,
///   иначе idle
///
/// Возвращает true если запрос применён.
pub fn steer(
    direction: Vec2,
    lifecycle: &Lifecycle,
    locomotion: &mut Locomotion,
    body: &mut PhysicsBody,
    facing: &mut Facing,
) -> bool {
    if locomotion.is_held() || !lifecycle.is_alive() {
        return false;
    }

    body.velocity = direction * locomotion.speed;

    if direction.length() > MOVE_THRESHOLD {
        facing.direction = horizontal_biased_facing(direction);
        locomotion.moving = true;
    } else {
        locomotion.moving = false;
    }

    true
}

/// Facing с удвоенной горизонтальной компонентой
///
/// Анимации есть только для сторон, поэтому диагонали тянем к left/right.
pub fn horizontal_biased_facing(direction: Vec2) -> Vec2 {
    Vec2::new(direction.x * 2.0, direction.y).normalize_or_zero()
}

/// Система применения MoveIntent
pub fn apply_move_intent(
    mut query: Query<(&MoveIntent, &Lifecycle, &mut Locomotion, &mut PhysicsBody, &mut Facing)>,
) {
    for (intent, lifecycle, mut locomotion, mut body, mut facing) in query.iter_mut() {
        steer(intent.direction, lifecycle, &mut locomotion, &mut body, &mut facing);
    }
}

/// System: обновление hold-таймеров (монотонно вниз, clamp в 0)
pub fn tick_hold_timers(mut query: Query<&mut Locomotion>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut locomotion in query.iter_mut() {
        locomotion.tick(delta);
    }
}

/// Movement Plugin
///
/// - tick_hold_timers (SimulationSet::Timers)
/// - apply_move_intent (SimulationSet::Locomotion) — после input/AI и после атак,
///   чтобы hold от атаки этого же тика уже блокировал движение
pub struct MovementPlugin;

impl Plugin for MovementPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, tick_hold_timers.in_set(SimulationSet::Timers))
            .add_systems(FixedUpdate, apply_move_intent.in_set(SimulationSet::Locomotion));
    }
}
