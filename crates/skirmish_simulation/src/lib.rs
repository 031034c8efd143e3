//! SKIRMISH Simulation Core
//!
//! ECS-симуляция top-down action игры на Bevy 0.16 (headless)
//!
//! Ответственность ядра:
//! - combat rules (health, неуязвимость, броня/оружие, смерть)
//! - directional hit detection
//! - enemy AI (patrol / follow, line of sight, stuck recovery)
//! - locomotion (общая для игрока и врагов)
//!
//! Рендер, input polling, камера и ассеты — внешние слои:
//! они пишут PlayerInput / конфиг и читают AnimationCue / AnimationParams / SpriteState.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod equipment;
pub mod logger;
pub mod movement;
pub mod physics;
pub mod player;
pub mod presentation;
pub mod spawn;

// Re-export базовых компонентов для удобства
pub use ai::{AIConfig, AIPlugin, AIState, AIStateChanged, EnemyBrain, EnemyStuck, PatrolRoute, StuckRecovery};
pub use combat::{
    AttackIntent, Attacker, CombatPlugin, DamageDealt, DeathCause, EntityDied, EntityRemoved, HitDirection,
    HitLanded, HitVolumes,
};
pub use components::*;
pub use config::{ActorTuning, CombatTuning, ConfigError, EnemyTuning, SimulationConfig};
pub use equipment::{Armour, ArmourSetId, EquipError, EquipmentIds, ItemCatalog, Loadout, Weapon};
pub use logger::{log, log_error, log_info, log_warning, init_logger, set_log_level, LogLevel};
pub use movement::MovementPlugin;
pub use physics::{Collider, Obstacle, PhysicsPlugin, SpatialIndex, SpatialQuery};
pub use player::{Player, PlayerInput, PlayerPlugin};
pub use presentation::{AnimationCue, AnimationParams, AnimationTrigger, PresentationPlugin, SpriteState};
pub use spawn::{spawn_enemy, spawn_player, EnemySpawn, PlayerSpawn, SpawnError};

/// Частота simulation tick по умолчанию
pub const DEFAULT_TICK_RATE_HZ: f64 = 60.0;

/// Фазы simulation tick (FixedUpdate), выполняются строго по порядку
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Пересборка SpatialIndex
    Spatial,
    /// Hold / invulnerability таймеры
    Timers,
    /// Input и AI пишут MoveIntent / AttackIntent
    Intent,
    /// Начало атак (hold ставится до locomotion)
    Attack,
    /// MoveIntent → velocity
    Locomotion,
    /// Strike frame → attack sweep
    Strike,
    /// HitLanded → Health
    Damage,
    /// Интеграция и коллизии
    Physics,
    /// Stuck recovery (смотрит на позицию после physics)
    Recovery,
    /// Teardown и despawn
    Death,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin {
    pub tick_rate_hz: f64,
    pub combat: CombatTuning,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            combat: CombatTuning::default(),
        }
    }
}

impl SimulationPlugin {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            tick_rate_hz: config.tick_rate_hz,
            combat: config.combat.clone(),
        }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::Spatial,
                SimulationSet::Timers,
                SimulationSet::Intent,
                SimulationSet::Attack,
                SimulationSet::Locomotion,
                SimulationSet::Strike,
                SimulationSet::Damage,
                SimulationSet::Physics,
                SimulationSet::Recovery,
                SimulationSet::Death,
            )
                .chain(),
        );

        app
            // Fixed timestep для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(self.tick_rate_hz))
            .insert_resource(self.combat.clone())
            .init_resource::<ItemCatalog>()
            // Подсистемы
            .add_plugins((
                PhysicsPlugin,
                MovementPlugin,
                PlayerPlugin,
                AIPlugin,
                CombatPlugin,
                PresentationPlugin,
            ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Каждый `app.update()` продвигает виртуальное время ровно на один fixed tick,
/// поэтому результат не зависит от wall clock.
pub fn create_headless_app(seed: u64) -> App {
    create_headless_app_with(seed, SimulationPlugin::default())
}

/// То же, но с явным SimulationPlugin (tick rate, combat tuning)
pub fn create_headless_app_with(seed: u64, simulation: SimulationPlugin) -> App {
    init_logger();

    let tick = Duration::from_secs_f64(1.0 / simulation.tick_rate_hz);

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(simulation)
        .insert_resource(DeterministicRng::new(seed))
        .insert_resource(TimeUpdateStrategy::ManualDuration(tick));

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
