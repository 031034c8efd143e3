//! Spawn domain — валидация конфигурации и сборка entity
//!
//! Все конфигурационные пробелы ловятся здесь, до появления entity в мире:
//! после спавна системы считают tunables валидными.

use bevy::prelude::*;
use thiserror::Error;

use crate::ai::{AIConfig, AIState, EnemyBrain, PatrolRoute};
use crate::combat::{Attacker, HitVolumes};
use crate::components::{Actor, Facing, Faction, Health, Invulnerability, Lifecycle, Locomotion, MoveIntent, PhysicsBody};
use crate::config::{ActorTuning, EnemyTuning};
use crate::equipment::{EquipError, EquipmentIds, ItemCatalog, Loadout};
use crate::physics::Collider;
use crate::player::{Player, PlayerInput};
use crate::presentation::{AnimationParams, SpriteState};

/// Ошибки валидации спавна
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpawnError {
    #[error("equipment error: {0}")]
    Equipment(#[from] EquipError),
    #[error("max health must be positive")]
    InvalidHealth,
    #[error("armour mitigation {0} is outside [0, 1]")]
    InvalidMitigation(f32),
    #[error("move speed must be finite and non-negative, got {0:?}")]
    InvalidSpeed(Vec2),
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidTimer { name: &'static str, value: f32 },
    #[error("{name} must be finite and positive, got {value}")]
    InvalidDistance { name: &'static str, value: f32 },
    #[error("enemy patrol route has no waypoints")]
    NoWaypoints,
}

/// Общий набор компонентов актора (игрок и враг)
#[derive(Bundle)]
pub struct ActorBundle {
    pub actor: Actor,
    pub health: Health,
    pub invulnerability: Invulnerability,
    pub lifecycle: Lifecycle,
    pub transform: Transform,
    pub move_intent: MoveIntent,
    pub body: PhysicsBody,
    pub facing: Facing,
    pub locomotion: Locomotion,
    pub attacker: Attacker,
    pub hit_volumes: HitVolumes,
    pub loadout: Loadout,
    pub collider: Collider,
    pub animation: AnimationParams,
    pub sprite: SpriteState,
}

impl ActorBundle {
    /// Собрать актора после валидации tunables
    pub fn new(faction: Faction, position: Vec2, tuning: &ActorTuning, loadout: Loadout) -> Result<Self, SpawnError> {
        validate_actor(tuning, &loadout)?;

        Ok(Self {
            actor: Actor::new(faction),
            health: Health::new(tuning.max_health),
            invulnerability: Invulnerability::new(tuning.invulnerability_duration),
            lifecycle: Lifecycle::Alive,
            transform: Transform::from_translation(position.extend(0.0)),
            move_intent: MoveIntent::default(),
            body: PhysicsBody::default(),
            facing: Facing::default(),
            locomotion: Locomotion {
                speed: tuning.speed(),
                attack_hold_time: tuning.attack_hold_time,
                hit_hold_time: tuning.hit_hold_time,
                ..Locomotion::default()
            },
            attacker: Attacker::new(tuning.strike_delay),
            hit_volumes: HitVolumes::new(tuning.hit_reach, Vec2::from(tuning.hit_half_extents)),
            loadout,
            collider: Collider::character(tuning.collider_radius),
            animation: AnimationParams::default(),
            sprite: SpriteState::default(),
        })
    }
}

/// Описание спавна игрока
///
/// `equipment` id резолвятся через ItemCatalog и перекрывают слоты `loadout`.
#[derive(Debug, Clone, Default)]
pub struct PlayerSpawn {
    pub position: Vec2,
    pub tuning: ActorTuning,
    pub loadout: Loadout,
    pub equipment: EquipmentIds,
}

impl PlayerSpawn {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_loadout(mut self, loadout: Loadout) -> Self {
        self.loadout = loadout;
        self
    }

    pub fn with_equipment(mut self, equipment: EquipmentIds) -> Self {
        self.equipment = equipment;
        self
    }

    /// Без каталога: любой id в `equipment` → `SpawnError::Equipment`
    pub fn bundle(&self) -> Result<(ActorBundle, Player, PlayerInput), SpawnError> {
        self.bundle_from_catalog(&ItemCatalog::default())
    }

    pub fn bundle_from_catalog(&self, catalog: &ItemCatalog) -> Result<(ActorBundle, Player, PlayerInput), SpawnError> {
        let loadout = self.equipment.equip(catalog, &self.loadout)?;
        let actor = ActorBundle::new(Faction::Player, self.position, &self.tuning, loadout)?;
        Ok((actor, Player, PlayerInput::default()))
    }
}

/// Описание спавна врага
#[derive(Debug, Clone, Default)]
pub struct EnemySpawn {
    pub position: Vec2,
    pub tuning: ActorTuning,
    pub enemy: EnemyTuning,
    pub loadout: Loadout,
    pub equipment: EquipmentIds,
    pub waypoints: Vec<Vec2>,
}

impl EnemySpawn {
    pub fn new(position: Vec2, waypoints: Vec<Vec2>) -> Self {
        Self {
            position,
            waypoints,
            ..Self::default()
        }
    }

    pub fn with_loadout(mut self, loadout: Loadout) -> Self {
        self.loadout = loadout;
        self
    }

    pub fn with_equipment(mut self, equipment: EquipmentIds) -> Self {
        self.equipment = equipment;
        self
    }

    pub fn bundle(&self) -> Result<(ActorBundle, AIState, AIConfig, PatrolRoute, EnemyBrain), SpawnError> {
        self.bundle_from_catalog(&ItemCatalog::default())
    }

    pub fn bundle_from_catalog(
        &self,
        catalog: &ItemCatalog,
    ) -> Result<(ActorBundle, AIState, AIConfig, PatrolRoute, EnemyBrain), SpawnError> {
        validate_enemy(&self.enemy, &self.waypoints)?;

        let loadout = self.equipment.equip(catalog, &self.loadout)?;
        let actor = ActorBundle::new(Faction::Enemy, self.position, &self.tuning, loadout)?;
        let route = PatrolRoute::new(self.waypoints.clone());
        let brain = EnemyBrain::new(self.position, &route);

        Ok((actor, AIState::Patrol, AIConfig::from(&self.enemy), route, brain))
    }
}

/// Заспавнить игрока (экипировка из каталога)
pub fn spawn_player(commands: &mut Commands, catalog: &ItemCatalog, spawn: &PlayerSpawn) -> Result<Entity, SpawnError> {
    let bundle = spawn.bundle_from_catalog(catalog).inspect_err(|err| {
        crate::log_error(&format!("Player spawn at {:?} rejected: {}", spawn.position, err));
    })?;

    let entity = commands.spawn(bundle).id();
    crate::log_info(&format!("🎮 Player {:?} spawned at {:?}", entity, spawn.position));
    Ok(entity)
}

/// Заспавнить врага (экипировка из каталога)
pub fn spawn_enemy(commands: &mut Commands, catalog: &ItemCatalog, spawn: &EnemySpawn) -> Result<Entity, SpawnError> {
    let bundle = spawn.bundle_from_catalog(catalog).inspect_err(|err| {
        crate::log_error(&format!("Enemy spawn at {:?} rejected: {}", spawn.position, err));
    })?;

    let entity = commands.spawn(bundle).id();
    crate::log_info(&format!(
        "👹 Enemy {:?} spawned at {:?} ({} waypoints)",
        entity,
        spawn.position,
        spawn.waypoints.len()
    ));
    Ok(entity)
}

// ============================================================================
// Validation
// ============================================================================

fn validate_actor(tuning: &ActorTuning, loadout: &Loadout) -> Result<(), SpawnError> {
    if tuning.max_health == 0 {
        return Err(SpawnError::InvalidHealth);
    }

    let speed = tuning.speed();
    if !speed.is_finite() || speed.min_element() < 0.0 {
        return Err(SpawnError::InvalidSpeed(speed));
    }

    for (name, value) in [
        ("attack_hold_time", tuning.attack_hold_time),
        ("hit_hold_time", tuning.hit_hold_time),
        ("invulnerability_duration", tuning.invulnerability_duration),
        ("strike_delay", tuning.strike_delay),
    ] {
        check_timer(name, value)?;
    }

    for (name, value) in [
        ("collider_radius", tuning.collider_radius),
        ("hit_reach", tuning.hit_reach),
        ("hit_half_extents.x", tuning.hit_half_extents[0]),
        ("hit_half_extents.y", tuning.hit_half_extents[1]),
    ] {
        check_distance(name, value)?;
    }

    if let Some(armour) = loadout.armour() {
        if !armour.has_valid_mitigation() {
            return Err(SpawnError::InvalidMitigation(armour.mitigation));
        }
    }

    Ok(())
}

fn validate_enemy(tuning: &EnemyTuning, waypoints: &[Vec2]) -> Result<(), SpawnError> {
    if waypoints.is_empty() {
        return Err(SpawnError::NoWaypoints);
    }

    for (name, value) in [
        ("detection_radius", tuning.detection_radius),
        ("attack_distance", tuning.attack_distance),
        ("arrival_threshold", tuning.arrival_threshold),
        ("stuck_displacement", tuning.stuck_displacement),
    ] {
        check_distance(name, value)?;
    }

    for (name, value) in [
        ("time_before_attack", tuning.time_before_attack),
        ("stuck_duration", tuning.stuck_duration),
    ] {
        check_timer(name, value)?;
    }

    Ok(())
}

fn check_timer(name: &'static str, value: f32) -> Result<(), SpawnError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SpawnError::InvalidTimer { name, value })
    }
}

fn check_distance(name: &'static str, value: f32) -> Result<(), SpawnError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SpawnError::InvalidDistance { name, value })
    }
}
