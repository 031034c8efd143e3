//! Kinematic интеграция + простая коллизия (headless режим)
//!
//! Архитектура:
//! - velocity → Transform интегрируем сами (fixed timestep, детерминизм)
//! - персонажи выталкиваются из статичных препятствий (circle vs rect)
//! - персонажи мягко расталкивают друг друга
//!
//! Полноценный rigid-body solver — забота внешнего physics backend'а,
//! здесь только то, что нужно AI (stuck detection) и тестам.

use bevy::prelude::*;

use super::collider::{Collider, ColliderShape, Obstacle};
use super::spatial::{SpatialIndex, circle_overlaps_rect};
use crate::components::{Actor, PhysicsBody};

/// Система: пересборка SpatialIndex из enabled collider'ов
///
/// Запускается первой в тике — все запросы тика видят позиции на начало тика.
pub fn rebuild_spatial_index(
    mut index: ResMut<SpatialIndex>,
    colliders: Query<(Entity, &Transform, &Collider, Has<Actor>)>,
) {
    index.clear();

    for (entity, transform, collider, is_character) in colliders.iter() {
        if !collider.enabled {
            continue;
        }
        index.insert(
            entity,
            transform.translation.truncate(),
            collider.shape,
            collider.layer,
            is_character,
        );
    }
}

/// Система интеграции velocity → Transform
///
/// position += velocity * dt
pub fn integrate_velocity(
    mut query: Query<(&PhysicsBody, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (body, mut transform) in query.iter_mut() {
        transform.translation += (body.velocity * delta).extend(0.0);
    }
}

/// Система: выталкивание персонажей из препятствий
pub fn resolve_obstacle_penetration(
    mut characters: Query<(&mut Transform, &Collider), (With<Actor>, Without<Obstacle>)>,
    obstacles: Query<(&Transform, &Collider), With<Obstacle>>,
) {
    for (mut transform, collider) in characters.iter_mut() {
        let ColliderShape::Circle { radius } = collider.shape else {
            continue;
        };
        if !collider.enabled {
            continue;
        }

        let mut position = transform.translation.truncate();

        for (obstacle_transform, obstacle_collider) in obstacles.iter() {
            let ColliderShape::Rect { half_extents } = obstacle_collider.shape else {
                continue;
            };
            if !obstacle_collider.enabled {
                continue;
            }

            let rect = Rect::from_center_half_size(obstacle_transform.translation.truncate(), half_extents);
            position = push_circle_out_of_rect(position, radius, rect);
        }

        transform.translation.x = position.x;
        transform.translation.y = position.y;
    }
}

/// Система: мягкое расталкивание персонажей
///
/// Отталкивает персонажей друг от друга если collider'ы пересекаются.
/// Работает как замена физическим коллайдерам в headless режиме.
pub fn separate_characters(mut query: Query<(Entity, &mut Transform, &Collider), With<Actor>>) {
    const PUSH_STRENGTH: f32 = 0.5; // Доля перекрытия, убираемая за тик

    let bodies: Vec<(Entity, Vec2, f32)> = query
        .iter()
        .filter_map(|(entity, transform, collider)| match collider.shape {
            ColliderShape::Circle { radius } if collider.enabled => {
                Some((entity, transform.translation.truncate(), radius))
            }
            _ => None,
        })
        .collect();

    for (entity, mut transform, collider) in query.iter_mut() {
        let ColliderShape::Circle { radius } = collider.shape else {
            continue;
        };
        if !collider.enabled {
            continue;
        }

        let position = transform.translation.truncate();
        let mut push = Vec2::ZERO;

        for (other_entity, other_position, other_radius) in &bodies {
            if *other_entity == entity {
                continue;
            }

            let away = position - *other_position;
            let distance = away.length();
            let min_distance = radius + other_radius;

            if distance < min_distance && distance > 0.01 {
                push += away / distance * (min_distance - distance) * 0.5 * PUSH_STRENGTH;
            }
        }

        transform.translation += push.extend(0.0);
    }
}

/// Вытолкнуть круг из прямоугольника (минимальным смещением)
pub fn push_circle_out_of_rect(center: Vec2, radius: f32, rect: Rect) -> Vec2 {
    if !circle_overlaps_rect(center, radius, rect) {
        return center;
    }

    let closest = center.clamp(rect.min, rect.max);
    let offset = center - closest;
    let distance = offset.length();

    if distance > 1e-4 {
        // Центр снаружи, край круга внутри
        return closest + offset / distance * radius;
    }

    // Центр внутри прямоугольника — выходим через ближайшую сторону
    let to_left = center.x - rect.min.x;
    let to_right = rect.max.x - center.x;
    let to_bottom = center.y - rect.min.y;
    let to_top = rect.max.y - center.y;
    let nearest = to_left.min(to_right).min(to_bottom).min(to_top);

    if nearest == to_left {
        Vec2::new(rect.min.x - radius, center.y)
    } else if nearest == to_right {
        Vec2::new(rect.max.x + radius, center.y)
    } else if nearest == to_bottom {
        Vec2::new(center.x, rect.min.y - radius)
    } else {
        Vec2::new(center.x, rect.max.y + radius)
    }
}
