//! Equipment domain — данные предметов и экипировка акторов
//!
//! Содержит:
//! - Item / ItemKind / Weapon / Armour (immutable records)
//! - ItemCatalog (Resource, id → shared record)
//! - Loadout (Component: ссылки на надетое оружие и броню)
//! - EquipmentIds (id из конфига, резолвятся через каталог при спавне)
//!
//! Один и тот же Weapon/Armour может быть надет на многих акторов (shared `Arc`).
//! Отсутствие оружия или брони — нормальное состояние, не ошибка.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

pub mod items;

pub use items::{Armour, ArmourSetId, GearSlot, Item, ItemCategory, ItemKind, Weapon};

/// Ошибки экипировки (конфигурационные пробелы)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EquipError {
    #[error("unknown item id '{0}'")]
    UnknownItem(String),
    #[error("item '{id}' cannot be equipped in the {expected:?} slot")]
    WrongSlot { id: String, expected: GearSlot },
    #[error("duplicate item id '{0}'")]
    DuplicateItem(String),
    #[error("armour '{id}' has mitigation {mitigation} outside [0, 1]")]
    InvalidMitigation { id: String, mitigation: f32 },
}

/// Каталог предметов (asset source)
///
/// Weapon/Armour записи дополнительно индексируются отдельно,
/// чтобы Loadout держал `Arc<Weapon>` / `Arc<Armour>` напрямую.
#[derive(Resource, Debug, Default, Clone)]
pub struct ItemCatalog {
    items: HashMap<String, Arc<Item>>,
    weapons: HashMap<String, Arc<Weapon>>,
    armours: HashMap<String, Arc<Armour>>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Собрать каталог из списка (например, из TOML конфига)
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Result<Self, EquipError> {
        let mut catalog = Self::new();
        for item in items {
            catalog.insert(item)?;
        }
        Ok(catalog)
    }

    pub fn insert(&mut self, item: Item) -> Result<(), EquipError> {
        if self.items.contains_key(&item.id) {
            return Err(EquipError::DuplicateItem(item.id));
        }

        match &item.kind {
            ItemKind::Weapon(weapon) => {
                self.weapons.insert(item.id.clone(), Arc::new(weapon.clone()));
            }
            ItemKind::Armour(armour) => {
                if !armour.has_valid_mitigation() {
                    return Err(EquipError::InvalidMitigation {
                        id: item.id,
                        mitigation: armour.mitigation,
                    });
                }
                self.armours.insert(item.id.clone(), Arc::new(armour.clone()));
            }
            ItemKind::Generic | ItemKind::Gear { .. } => {}
        }

        self.items.insert(item.id.clone(), Arc::new(item));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Arc<Item>> {
        self.items.get(id)
    }

    pub fn weapon(&self, id: &str) -> Result<Arc<Weapon>, EquipError> {
        self.weapons.get(id).cloned().ok_or_else(|| self.slot_error(id, GearSlot::Weapon))
    }

    pub fn armour(&self, id: &str) -> Result<Arc<Armour>, EquipError> {
        self.armours.get(id).cloned().ok_or_else(|| self.slot_error(id, GearSlot::Armour))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn slot_error(&self, id: &str, expected: GearSlot) -> EquipError {
        if self.items.contains_key(id) {
            EquipError::WrongSlot { id: id.to_string(), expected }
        } else {
            EquipError::UnknownItem(id.to_string())
        }
    }
}

/// Экипировка актора: максимум одно оружие и одна броня
///
/// Ссылки shared и read-only для combat resolver.
#[derive(Component, Debug, Clone, Default)]
pub struct Loadout {
    pub weapon: Option<Arc<Weapon>>,
    pub armour: Option<Arc<Armour>>,
}

impl Loadout {
    pub fn new(weapon: Option<Arc<Weapon>>, armour: Option<Arc<Armour>>) -> Self {
        Self { weapon, armour }
    }

    /// Без оружия и брони
    pub fn empty() -> Self {
        Self::default()
    }

    /// Резолвит id из каталога. `None` id = пустой слот (валидно).
    pub fn from_catalog(
        catalog: &ItemCatalog,
        weapon_id: Option<&str>,
        armour_id: Option<&str>,
    ) -> Result<Self, EquipError> {
        let weapon = weapon_id.map(|id| catalog.weapon(id)).transpose()?;
        let armour = armour_id.map(|id| catalog.armour(id)).transpose()?;
        Ok(Self { weapon, armour })
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapon = Some(Arc::new(weapon));
        self
    }

    pub fn with_armour(mut self, armour: Armour) -> Self {
        self.armour = Some(Arc::new(armour));
        self
    }

    pub fn weapon(&self) -> Option<&Weapon> {
        self.weapon.as_deref()
    }

    pub fn armour(&self) -> Option<&Armour> {
        self.armour.as_deref()
    }

    /// Собственное оружие и броня из одного set'а
    pub fn wears_matching_set(&self) -> bool {
        match (self.weapon(), self.armour()) {
            (Some(weapon), Some(armour)) => weapon.armour_set.matches(armour.armour_set),
            _ => false,
        }
    }
}

/// Id оружия и брони из конфига (`[player_equipment]`, `[enemy_equipment]`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquipmentIds {
    pub weapon: Option<String>,
    pub armour: Option<String>,
}

impl EquipmentIds {
    pub fn new(weapon: Option<&str>, armour: Option<&str>) -> Self {
        Self {
            weapon: weapon.map(str::to_string),
            armour: armour.map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.weapon.is_none() && self.armour.is_none()
    }

    pub fn resolve(&self, catalog: &ItemCatalog) -> Result<Loadout, EquipError> {
        Loadout::from_catalog(catalog, self.weapon.as_deref(), self.armour.as_deref())
    }

    /// Слоты с id берутся из каталога, остальные из `base`
    pub fn equip(&self, catalog: &ItemCatalog, base: &Loadout) -> Result<Loadout, EquipError> {
        let resolved = self.resolve(catalog)?;
        Ok(Loadout {
            weapon: resolved.weapon.or_else(|| base.weapon.clone()),
            armour: resolved.armour.or_else(|| base.armour.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_catalog() -> ItemCatalog {
        ItemCatalog::from_items([
            Item::new("sword", ItemKind::Weapon(Weapon::new(2, ArmourSetId(1)))),
            Item::new("plate", ItemKind::Armour(Armour::new(0.5, ArmourSetId(1)))),
            Item::new("potion", ItemKind::Generic),
        ])
        .unwrap()
    }

    #[test]
    fn test_loadout_from_catalog() {
        let catalog = test_catalog();
        let loadout = Loadout::from_catalog(&catalog, Some("sword"), Some("plate")).unwrap();

        assert_eq!(loadout.weapon().map(|w| w.damage), Some(2));
        assert_eq!(loadout.armour().map(|a| a.mitigation), Some(0.5));
        assert!(loadout.wears_matching_set());
    }

    #[test]
    fn test_loadout_shares_records() {
        let catalog = test_catalog();
        let a = Loadout::from_catalog(&catalog, Some("sword"), None).unwrap();
        let b = Loadout::from_catalog(&catalog, Some("sword"), None).unwrap();

        let (Some(wa), Some(wb)) = (a.weapon.as_ref(), b.weapon.as_ref()) else {
            panic!("weapon должен быть экипирован");
        };
        assert!(Arc::ptr_eq(wa, wb));
    }

    #[test]
    fn test_loadout_empty_slots_are_valid() {
        let catalog = test_catalog();
        let loadout = Loadout::from_catalog(&catalog, None, None).unwrap();
        assert!(loadout.weapon().is_none());
        assert!(loadout.armour().is_none());
        assert!(!loadout.wears_matching_set());
    }

    #[test]
    fn test_loadout_errors() {
        let catalog = test_catalog();

        assert_eq!(
            Loadout::from_catalog(&catalog, Some("axe"), None).unwrap_err(),
            EquipError::UnknownItem("axe".to_string())
        );
        assert_eq!(
            Loadout::from_catalog(&catalog, Some("plate"), None).unwrap_err(),
            EquipError::WrongSlot { id: "plate".to_string(), expected: GearSlot::Weapon }
        );
        assert_eq!(
            Loadout::from_catalog(&catalog, None, Some("potion")).unwrap_err(),
            EquipError::WrongSlot { id: "potion".to_string(), expected: GearSlot::Armour }
        );
    }

    #[test]
    fn test_equipment_ids_fill_named_slots() {
        let catalog = test_catalog();
        let base = Loadout::empty().with_armour(Armour::new(0.25, ArmourSetId(7)));

        let ids = EquipmentIds::new(Some("sword"), None);
        let loadout = ids.equip(&catalog, &base).unwrap();

        assert_eq!(loadout.weapon().map(|w| w.damage), Some(2));
        assert_eq!(loadout.armour().map(|a| a.mitigation), Some(0.25));

        let missing = EquipmentIds::new(None, Some("helmet"));
        assert!(!missing.is_empty());
        assert_eq!(
            missing.equip(&catalog, &base).unwrap_err(),
            EquipError::UnknownItem("helmet".to_string())
        );
        assert!(EquipmentIds::default().is_empty());
    }

    #[test]
    fn test_catalog_rejects_invalid_records() {
        let duplicate = ItemCatalog::from_items([
            Item::new("sword", ItemKind::Generic),
            Item::new("sword", ItemKind::Generic),
        ]);
        assert_eq!(duplicate.unwrap_err(), EquipError::DuplicateItem("sword".to_string()));

        let broken = ItemCatalog::from_items([Item::new(
            "glass",
            ItemKind::Armour(Armour::new(1.5, ArmourSetId::NONE)),
        )]);
        assert!(matches!(broken, Err(EquipError::InvalidMitigation { .. })));
    }

    #[test]
    fn test_mismatched_set_is_not_matching() {
        let loadout = Loadout::empty()
            .with_weapon(Weapon::new(1, ArmourSetId(2)))
            .with_armour(Armour::new(0.5, ArmourSetId(3)));
        assert!(!loadout.wears_matching_set());

        let unset = Loadout::empty()
            .with_weapon(Weapon::new(1, ArmourSetId::NONE))
            .with_armour(Armour::new(0.5, ArmourSetId::NONE));
        assert!(!unset.wears_matching_set());
    }
}
