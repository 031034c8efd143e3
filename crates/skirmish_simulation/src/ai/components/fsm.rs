//! FSM AI components (state machine, config, patrol route, brain memory).

use bevy::prelude::*;

use crate::config::EnemyTuning;

/// AI FSM состояния
///
/// Смерть ортогональна (Lifecycle), stuck recovery — cross-cutting таймер.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AIState {
    /// Patrol — обход waypoint'ов по кругу, сканирование врагов
    #[default]
    Patrol,

    /// Follow — преследование замеченного врага
    Follow {
        /// Weak reference: entity может быть despawned в любой момент
        target: Entity,
    },
}

impl AIState {
    pub fn target(&self) -> Option<Entity> {
        match self {
            AIState::Patrol => None,
            AIState::Follow { target } => Some(*target),
        }
    }
}

/// Параметры AI
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct AIConfig {
    /// Радиус обнаружения врагов
    pub detection_radius: f32,
    /// Дистанция атаки (charge начинается ближе этой дистанции)
    pub attack_distance: f32,
    /// Charge до атаки (секунды)
    pub time_before_attack: f32,
    /// Waypoint / last known point считается достигнутым ближе этой дистанции
    pub arrival_threshold: f32,
    /// Смещение меньше этого считается "стоим на месте"
    pub stuck_displacement: f32,
    /// Сколько можно стоять до recovery (секунды)
    pub stuck_duration: f32,
    /// Значение charge таймера сразу после атаки
    pub recharge_sentinel: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self::from(&EnemyTuning::default())
    }
}

impl From<&EnemyTuning> for AIConfig {
    fn from(tuning: &EnemyTuning) -> Self {
        Self {
            detection_radius: tuning.detection_radius,
            attack_distance: tuning.attack_distance,
            time_before_attack: tuning.time_before_attack,
            arrival_threshold: tuning.arrival_threshold,
            stuck_displacement: tuning.stuck_displacement,
            stuck_duration: tuning.stuck_duration,
            recharge_sentinel: tuning.recharge_sentinel,
        }
    }
}

/// Маршрут патруля (непустой, проверяется при спавне)
#[derive(Component, Debug, Clone, PartialEq, Default)]
pub struct PatrolRoute {
    pub waypoints: Vec<Vec2>,
}

impl PatrolRoute {
    pub fn new(waypoints: Vec<Vec2>) -> Self {
        Self { waypoints }
    }

    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.waypoints.get(index).copied()
    }

    /// Следующий индекс по кругу
    pub fn next_index(&self, index: usize) -> usize {
        if self.waypoints.is_empty() {
            0
        } else {
            (index + 1) % self.waypoints.len()
        }
    }
}

/// Память врага: навигация, stuck detection, charge
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct EnemyBrain {
    /// Куда идём (waypoint или последняя известная позиция цели)
    pub target_point: Vec2,
    pub waypoint_index: usize,
    /// Сколько стоим на месте (секунды)
    pub stuck_timer: f32,
    /// Позиция, от которой меряется смещение
    pub last_position: Vec2,
    pub spawn_origin: Vec2,
    /// Charge до атаки; отрицательный = только что атаковали
    pub charge_timer: f32,
}

impl EnemyBrain {
    /// Начальное состояние: идём к первому waypoint'у
    pub fn new(spawn_origin: Vec2, route: &PatrolRoute) -> Self {
        Self {
            target_point: route.get(0).unwrap_or(spawn_origin),
            waypoint_index: 0,
            stuck_timer: 0.0,
            last_position: spawn_origin,
            spawn_origin,
            charge_timer: 0.0,
        }
    }

    /// Навигация на waypoint `index`
    pub fn go_to_waypoint(&mut self, route: &PatrolRoute, index: usize) {
        if let Some(point) = route.get(index) {
            self.waypoint_index = index;
            self.target_point = point;
        }
    }

    /// Навигация на следующий waypoint по кругу
    pub fn advance_waypoint(&mut self, route: &PatrolRoute) {
        let next = route.next_index(self.waypoint_index);
        self.go_to_waypoint(route, next);
    }

    /// Обновить charge. true = атаковать в этом тике.
    ///
    /// - ближе attack_distance: копим; превысили порог → атака, таймер = sentinel
    /// - дальше 2 × attack_distance: сброс в 0
    /// - между ними таймер замирает
    pub fn update_charge(&mut self, distance: f32, config: &AIConfig, delta: f32) -> bool {
        if distance < config.attack_distance {
            if self.charge_timer > config.time_before_attack {
                self.charge_timer = config.recharge_sentinel;
                return true;
            }
            self.charge_timer += delta;
        } else if distance > config.attack_distance * 2.0 {
            self.charge_timer = 0.0;
        }
        false
    }
}
