//! Line of sight checks (raycast по Default + Character слоям)
//!
//! Персонажи не блокируют обзор, любые другие collider'ы блокируют.

use bevy::prelude::*;

use crate::physics::{SpatialQuery, MASK_LINE_OF_SIGHT};

const MIN_RAY_LENGTH: f32 = 1e-4;

/// Видна ли точка из `from`
///
/// Все пересечения луча до точки должны принадлежать персонажам.
pub fn has_los_to_point<S: SpatialQuery + ?Sized>(spatial: &S, from: Vec2, to: Vec2) -> bool {
    let offset = to - from;
    let distance = offset.length();
    if distance < MIN_RAY_LENGTH {
        return true;
    }

    spatial
        .raycast_all(from, offset, distance, MASK_LINE_OF_SIGHT)
        .iter()
        .all(|hit| hit.character.is_some())
}

/// Виден ли конкретный персонаж `target` (его центр в `target_position`)
///
/// Идём по пересечениям от ближнего: препятствие → false, `target` → true.
/// Если луч так и не попал в `target` — не виден.
pub fn has_los_to_entity<S: SpatialQuery + ?Sized>(
    spatial: &S,
    from: Vec2,
    target: Entity,
    target_position: Vec2,
) -> bool {
    let offset = target_position - from;
    let distance = offset.length();
    if distance < MIN_RAY_LENGTH {
        return true;
    }

    for hit in spatial.raycast_all(from, offset, distance, MASK_LINE_OF_SIGHT) {
        match hit.character {
            None => return false,
            Some(character) if character == target => return true,
            Some(_) => {}
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{ColliderShape, SpatialIndex, LAYER_CHARACTER, LAYER_DEFAULT};

    const OBSERVER: u32 = 1;
    const TARGET: u32 = 2;
    const BYSTANDER: u32 = 3;
    const WALL: u32 = 4;

    fn character(index: &mut SpatialIndex, id: u32, position: Vec2) {
        index.insert(
            Entity::from_raw(id),
            position,
            ColliderShape::Circle { radius: 4.0 },
            LAYER_CHARACTER,
            true,
        );
    }

    fn wall(index: &mut SpatialIndex, position: Vec2) {
        index.insert(
            Entity::from_raw(WALL),
            position,
            ColliderShape::Rect { half_extents: Vec2::new(2.0, 20.0) },
            LAYER_DEFAULT,
            false,
        );
    }

    #[test]
    fn test_clear_los_through_characters() {
        let mut index = SpatialIndex::new();
        character(&mut index, OBSERVER, Vec2::ZERO);
        character(&mut index, BYSTANDER, Vec2::new(20.0, 0.0));
        character(&mut index, TARGET, Vec2::new(40.0, 0.0));

        let target = Entity::from_raw(TARGET);
        assert!(has_los_to_entity(&index, Vec2::ZERO, target, Vec2::new(40.0, 0.0)));
        assert!(has_los_to_point(&index, Vec2::ZERO, Vec2::new(40.0, 0.0)));
    }

    #[test]
    fn test_wall_blocks_los() {
        let mut index = SpatialIndex::new();
        character(&mut index, OBSERVER, Vec2::ZERO);
        character(&mut index, TARGET, Vec2::new(40.0, 0.0));
        wall(&mut index, Vec2::new(20.0, 0.0));

        let target = Entity::from_raw(TARGET);
        assert!(!has_los_to_entity(&index, Vec2::ZERO, target, Vec2::new(40.0, 0.0)));
        assert!(!has_los_to_point(&index, Vec2::ZERO, Vec2::new(40.0, 0.0)));

        // Стена сбоку не мешает
        assert!(has_los_to_point(&index, Vec2::ZERO, Vec2::new(0.0, 40.0)));
    }

    #[test]
    fn test_target_not_on_ray() {
        let mut index = SpatialIndex::new();
        character(&mut index, OBSERVER, Vec2::ZERO);
        character(&mut index, TARGET, Vec2::new(40.0, 30.0));

        // Цель не там, где мы думаем (позиция устарела) → не видна
        let target = Entity::from_raw(TARGET);
        assert!(!has_los_to_entity(&index, Vec2::ZERO, target, Vec2::new(40.0, -30.0)));
    }

    #[test]
    fn test_wall_behind_target_ignored() {
        let mut index = SpatialIndex::new();
        character(&mut index, OBSERVER, Vec2::ZERO);
        character(&mut index, TARGET, Vec2::new(20.0, 0.0));
        wall(&mut index, Vec2::new(40.0, 0.0));

        let target = Entity::from_raw(TARGET);
        assert!(has_los_to_entity(&index, Vec2::ZERO, target, Vec2::new(20.0, 0.0)));
    }
}
