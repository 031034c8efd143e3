//! Item data records: Weapon, Armour и tagged ItemKind
//!
//! Immutable данные из asset/config source. Combat resolver только читает их.

use serde::{Deserialize, Serialize};

/// Идентификатор armour set'а (связывает оружие и броню)
///
/// `-1` — "не входит ни в какой set".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArmourSetId(pub i32);

impl ArmourSetId {
    pub const NONE: Self = Self(-1);

    pub fn is_none(self) -> bool {
        self == Self::NONE
    }

    /// Set совпадает И это реальный set (NONE никогда ни с чем не матчится)
    pub fn matches(self, other: ArmourSetId) -> bool {
        !self.is_none() && self == other
    }
}

impl Default for ArmourSetId {
    fn default() -> Self {
        Self::NONE
    }
}

/// Оружие
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub damage: u32,
    #[serde(default)]
    pub armour_set: ArmourSetId,
}

impl Weapon {
    pub fn new(damage: u32, armour_set: ArmourSetId) -> Self {
        Self { damage, armour_set }
    }
}

/// Броня
///
/// Инвариант: 0.0 ≤ mitigation ≤ 1.0 (проверяется при загрузке каталога)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Armour {
    pub mitigation: f32,
    #[serde(default)]
    pub armour_set: ArmourSetId,
}

impl Armour {
    pub fn new(mitigation: f32, armour_set: ArmourSetId) -> Self {
        Self { mitigation, armour_set }
    }

    pub fn has_valid_mitigation(&self) -> bool {
        (0.0..=1.0).contains(&self.mitigation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    #[default]
    Wearable,
    Potion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GearSlot {
    Weapon,
    Armour,
}

/// Вид предмета (вместо иерархии Item → Gear → Weapon)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemKind {
    /// Предмет без боевых свойств
    Generic,
    /// Экипировка без собственных статов (только слот и set)
    Gear {
        slot: GearSlot,
        #[serde(default)]
        armour_set: ArmourSetId,
    },
    Weapon(Weapon),
    Armour(Armour),
}

/// Предмет каталога
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: ItemCategory,
    #[serde(flatten)]
    pub kind: ItemKind,
}

impl Item {
    pub fn new(id: impl Into<String>, kind: ItemKind) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            category: ItemCategory::Wearable,
            kind,
        }
    }

    /// В какой слот надевается (None для Generic)
    pub fn gear_slot(&self) -> Option<GearSlot> {
        match &self.kind {
            ItemKind::Generic => None,
            ItemKind::Gear { slot, .. } => Some(*slot),
            ItemKind::Weapon(_) => Some(GearSlot::Weapon),
            ItemKind::Armour(_) => Some(GearSlot::Armour),
        }
    }

    pub fn armour_set(&self) -> ArmourSetId {
        match &self.kind {
            ItemKind::Generic => ArmourSetId::NONE,
            ItemKind::Gear { armour_set, .. } => *armour_set,
            ItemKind::Weapon(weapon) => weapon.armour_set,
            ItemKind::Armour(armour) => armour.armour_set,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_armour_set_matching() {
        assert!(ArmourSetId(3).matches(ArmourSetId(3)));
        assert!(!ArmourSetId(3).matches(ArmourSetId(4)));
        // -1 = "нет set'а", никогда не матчится, даже сам с собой
        assert!(!ArmourSetId::NONE.matches(ArmourSetId::NONE));
        assert_eq!(ArmourSetId::default(), ArmourSetId::NONE);
    }

    #[test]
    fn test_item_gear_slot() {
        let sword = Item::new("sword", ItemKind::Weapon(Weapon::new(2, ArmourSetId(1))));
        let plate = Item::new("plate", ItemKind::Armour(Armour::new(0.5, ArmourSetId(1))));
        let trinket = Item::new("trinket", ItemKind::Generic);

        assert_eq!(sword.gear_slot(), Some(GearSlot::Weapon));
        assert_eq!(plate.gear_slot(), Some(GearSlot::Armour));
        assert_eq!(trinket.gear_slot(), None);
        assert_eq!(sword.armour_set(), ArmourSetId(1));
        assert_eq!(trinket.armour_set(), ArmourSetId::NONE);
    }

    #[test]
    fn test_item_from_toml() {
        let item: Item = toml::from_str(
            r#"
            id = "rusty_sword"
            name = "Rusty Sword"
            kind = "weapon"
            damage = 2
            armour_set = 7
            "#,
        )
        .unwrap();

        assert_eq!(item.kind, ItemKind::Weapon(Weapon::new(2, ArmourSetId(7))));
        assert_eq!(item.category, ItemCategory::Wearable);
    }

    #[test]
    fn test_armour_mitigation_range() {
        assert!(Armour::new(0.0, ArmourSetId::NONE).has_valid_mitigation());
        assert!(Armour::new(1.0, ArmourSetId::NONE).has_valid_mitigation());
        assert!(!Armour::new(1.2, ArmourSetId::NONE).has_valid_mitigation());
        assert!(!Armour::new(-0.1, ArmourSetId::NONE).has_valid_mitigation());
    }
}
