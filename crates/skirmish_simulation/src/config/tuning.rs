//! Tunables для акторов, AI и combat
//!
//! Значения по умолчанию совпадают с геймдизайнерскими дефолтами префабов.
//! Все секции `#[serde(default)]` — в TOML можно указать только то, что меняется.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Параметры актора (игрок и враг), фиксируются при спавне
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorTuning {
    /// Скорость по осям (units/sec), direction × speed покомпонентно
    pub move_speed: [f32; 2],
    /// Блокировка движения после атаки (секунды)
    pub attack_hold_time: f32,
    /// Блокировка движения после попадания (секунды)
    pub hit_hold_time: f32,
    pub max_health: u32,
    /// Окно неуязвимости после полученного урона (секунды)
    pub invulnerability_duration: f32,
    /// Задержка между стартом атаки и кадром удара (секунды)
    pub strike_delay: f32,
    /// Радиус collider'а персонажа
    pub collider_radius: f32,
    /// Смещение центра hit volume от центра персонажа
    pub hit_reach: f32,
    /// Half extents hit volume: [вдоль направления удара, поперёк]
    pub hit_half_extents: [f32; 2],
}

impl Default for ActorTuning {
    fn default() -> Self {
        Self {
            move_speed: [100.0, 100.0],
            attack_hold_time: 0.5,
            hit_hold_time: 0.5,
            max_health: 3,
            invulnerability_duration: 1.0,
            strike_delay: 0.0,
            collider_radius: 4.0,
            hit_reach: 8.0,
            hit_half_extents: [6.0, 6.0],
        }
    }
}

impl ActorTuning {
    pub fn speed(&self) -> Vec2 {
        Vec2::from(self.move_speed)
    }
}

/// Параметры AI врага
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    /// Радиус обнаружения противников
    pub detection_radius: f32,
    /// Дистанция, с которой начинается накопление заряда атаки
    pub attack_distance: f32,
    /// Сколько копить заряд перед ударом (секунды)
    pub time_before_attack: f32,
    /// Порог "дошли до точки" (waypoint / last known position)
    pub arrival_threshold: f32,
    /// Смещение меньше этого за тик считается "стоим на месте"
    pub stuck_displacement: f32,
    /// Сколько можно стоять на месте до stuck recovery (секунды)
    pub stuck_duration: f32,
    /// Значение заряда сразу после удара (отрицательное = пауза до следующего)
    pub recharge_sentinel: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            detection_radius: 50.0,
            attack_distance: 10.0,
            time_before_attack: 0.5,
            arrival_threshold: 5.0,
            stuck_displacement: 1.0,
            stuck_duration: 5.0,
            recharge_sentinel: -1.0,
        }
    }
}

/// Глобальные combat параметры (Resource)
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Длительность death teardown (Dying → Removed), секунды
    pub death_teardown_duration: f32,
    /// Максимум целей за один attack sweep
    pub hit_query_capacity: usize,
    /// Урон без оружия
    pub unarmed_damage: u32,
    /// Поворот спрайта за весь teardown (градусы)
    pub teardown_rotation_degrees: f32,
    /// Прирост scale за весь teardown (1.0 → 1.0 + growth)
    pub teardown_scale_growth: f32,
    /// Частота мигания во время неуязвимости (переключений в секунду)
    pub flicker_rate: f32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            death_teardown_duration: 0.5,
            hit_query_capacity: 32,
            unarmed_damage: 1,
            teardown_rotation_degrees: 400.0,
            teardown_scale_growth: 2.0,
            flicker_rate: 10.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_tuning_defaults() {
        let tuning = ActorTuning::default();
        assert_eq!(tuning.speed(), Vec2::new(100.0, 100.0));
        assert_eq!(tuning.max_health, 3);
        assert_eq!(tuning.invulnerability_duration, 1.0);
        assert_eq!(tuning.attack_hold_time, 0.5);
    }

    #[test]
    fn test_enemy_tuning_defaults() {
        let tuning = EnemyTuning::default();
        assert_eq!(tuning.detection_radius, 50.0);
        assert_eq!(tuning.attack_distance, 10.0);
        assert_eq!(tuning.arrival_threshold, 5.0);
        assert_eq!(tuning.stuck_duration, 5.0);
        assert!(tuning.recharge_sentinel < 0.0);
    }

    #[test]
    fn test_combat_tuning_partial_toml() {
        let tuning: CombatTuning = toml::from_str("hit_query_capacity = 4").unwrap();
        assert_eq!(tuning.hit_query_capacity, 4);
        assert_eq!(tuning.death_teardown_duration, 0.5);
    }
}
