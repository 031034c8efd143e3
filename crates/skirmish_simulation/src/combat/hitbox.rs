//! Directional hit detection
//!
//! Архитектура:
//! - у актора 4 hit volume (по одному на сторону света)
//! - facing дискретизируется в HitDirection (pure function)
//! - attack sweep: overlap query в выбранном volume по Character слою,
//!   фильтр враждебной фракции, сортировка по дистанции, capacity

use bevy::prelude::*;

use crate::physics::{SpatialQuery, MASK_CHARACTERS};

/// Facing короче этого (squared) → East по умолчанию
pub const FACING_EPSILON_SQUARED: f32 = 0.1;

/// Сторона удара (индексы совпадают с порядком hit volume)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitDirection {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl HitDirection {
    /// Дискретизация facing в 4 стороны
    ///
    /// |x| > |y| строго → East/West, иначе North/South.
    /// Почти нулевой вектор → East.
    pub fn from_facing(facing: Vec2) -> Self {
        if facing.length_squared() < FACING_EPSILON_SQUARED {
            return HitDirection::East;
        }

        if facing.x.abs() > facing.y.abs() {
            if facing.x > 0.0 {
                HitDirection::East
            } else {
                HitDirection::West
            }
        } else if facing.y > 0.0 {
            HitDirection::North
        } else {
            HitDirection::South
        }
    }

    pub fn unit(self) -> Vec2 {
        match self {
            HitDirection::North => Vec2::Y,
            HitDirection::East => Vec2::X,
            HitDirection::South => Vec2::NEG_Y,
            HitDirection::West => Vec2::NEG_X,
        }
    }
}

/// Hit volumes актора
///
/// Box смещён на `reach` в сторону удара. `half_extents` задан для East/West,
/// для North/South оси меняются местами.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HitVolumes {
    pub reach: f32,
    pub half_extents: Vec2,
}

impl Default for HitVolumes {
    fn default() -> Self {
        Self {
            reach: 8.0,
            half_extents: Vec2::splat(6.0),
        }
    }
}

impl HitVolumes {
    pub fn new(reach: f32, half_extents: Vec2) -> Self {
        Self { reach, half_extents }
    }

    /// World-space box для стороны
    pub fn volume(&self, origin: Vec2, direction: HitDirection) -> Rect {
        let center = origin + direction.unit() * self.reach;
        let half_extents = match direction {
            HitDirection::East | HitDirection::West => self.half_extents,
            HitDirection::North | HitDirection::South => {
                Vec2::new(self.half_extents.y, self.half_extents.x)
            }
        };
        Rect::from_center_half_size(center, half_extents)
    }
}

/// Результат attack sweep
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SweepResult {
    /// Цели (ближайшие первыми) с их позициями
    pub targets: Vec<(Entity, Vec2)>,
    /// Сколько целей отброшено из-за capacity
    pub truncated: usize,
}

/// Attack sweep
///
/// `hostile_position(entity)` возвращает позицию если entity — живой враг атакующего.
/// Результат детерминирован: сортировка по дистанции, при равенстве по Entity.
pub fn perform_attack_sweep<S, F>(
    spatial: &S,
    attacker: Entity,
    origin: Vec2,
    facing: Vec2,
    volumes: &HitVolumes,
    capacity: usize,
    hostile_position: F,
) -> SweepResult
where
    S: SpatialQuery + ?Sized,
    F: Fn(Entity) -> Option<Vec2>,
{
    let direction = HitDirection::from_facing(facing);
    let area = volumes.volume(origin, direction);

    let mut targets: Vec<(Entity, Vec2)> = spatial
        .overlap_rect(area, MASK_CHARACTERS)
        .into_iter()
        .filter(|&entity| entity != attacker)
        .filter_map(|entity| hostile_position(entity).map(|position| (entity, position)))
        .collect();

    targets.sort_by(|(a, pa), (b, pb)| {
        pa.distance_squared(origin)
            .total_cmp(&pb.distance_squared(origin))
            .then_with(|| a.cmp(b))
    });
    targets.dedup_by_key(|(entity, _)| *entity);

    let truncated = targets.len().saturating_sub(capacity);
    targets.truncate(capacity);

    SweepResult { targets, truncated }
}
