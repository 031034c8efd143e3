//! Configuration loading from TOML files
//!
//! Asset/config source для симуляции: tunables и каталог предметов.
//! Читается один раз при старте, дальше значения immutable.

mod tuning;

pub use tuning::{ActorTuning, CombatTuning, EnemyTuning};

use crate::equipment::{EquipError, EquipmentIds, Item, ItemCatalog};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid item catalog: {0}")]
    Catalog(#[from] EquipError),
    #[error("Configuration validation error: {0}")]
    Validation(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Полный конфиг симуляции
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Частота FixedUpdate (Hz)
    pub tick_rate_hz: f64,
    /// Seed для DeterministicRng
    pub seed: u64,
    /// Минимальный уровень логов ("debug" / "info" / "warning" / "error")
    pub log_level: String,
    pub actor: ActorTuning,
    pub enemy: EnemyTuning,
    pub combat: CombatTuning,
    pub items: Vec<Item>,
    /// Экипировка игрока (id из `items`)
    pub player_equipment: EquipmentIds,
    /// Экипировка всех врагов арены
    pub enemy_equipment: EquipmentIds,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60.0,
            seed: 42,
            log_level: "info".to_string(),
            actor: ActorTuning::default(),
            enemy: EnemyTuning::default(),
            combat: CombatTuning::default(),
            items: Vec::new(),
            player_equipment: EquipmentIds::default(),
            enemy_equipment: EquipmentIds::default(),
        }
    }
}

impl SimulationConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: Self = load_toml(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = parse_toml(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Глобальные проверки (per-actor tunables валидируются при спавне)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0) {
            return Err(ConfigError::Validation(format!(
                "tick_rate_hz must be positive, got {}",
                self.tick_rate_hz
            )));
        }
        if self.combat.hit_query_capacity == 0 {
            return Err(ConfigError::Validation(
                "combat.hit_query_capacity must be at least 1".to_string(),
            ));
        }
        if !(self.combat.death_teardown_duration >= 0.0) {
            return Err(ConfigError::Validation(format!(
                "combat.death_teardown_duration must be non-negative, got {}",
                self.combat.death_teardown_duration
            )));
        }
        if crate::logger::LogLevel::parse(&self.log_level).is_none() {
            return Err(ConfigError::Validation(format!(
                "unknown log_level '{}'",
                self.log_level
            )));
        }
        // Каталог проверяется построением, id экипировки — резолвом
        let catalog = self.item_catalog()?;
        self.player_equipment.resolve(&catalog)?;
        self.enemy_equipment.resolve(&catalog)?;
        Ok(())
    }

    pub fn item_catalog(&self) -> Result<ItemCatalog, ConfigError> {
        Ok(ItemCatalog::from_items(self.items.iter().cloned())?)
    }
}
