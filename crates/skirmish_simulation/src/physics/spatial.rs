//! Spatial queries: overlap и raycast по collider'ам
//!
//! Архитектура:
//! - `SpatialQuery` — узкий интерфейс, который нужен AI и combat
//!   (внешний physics backend может реализовать его сам)
//! - `SpatialIndex` — headless реализация: плоский список collider'ов,
//!   пересобирается в начале каждого тика из enabled `Collider` компонентов
//!
//! Все запросы синхронные, порядок результатов детерминирован.

use bevy::prelude::*;

use super::collider::{ColliderShape, CollisionMask};

const EPSILON: f32 = 1e-6;

/// Результат raycast'а
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Entity collider'а
    pub entity: Entity,
    /// Персонаж-владелец collider'а (None = препятствие)
    pub character: Option<Entity>,
    /// Дистанция от origin (0 если origin внутри collider'а)
    pub distance: f32,
    pub point: Vec2,
}

/// Интерфейс spatial запросов (physics collaborator)
pub trait SpatialQuery {
    /// Все collider'ы из `mask`, пересекающие прямоугольник
    fn overlap_rect(&self, area: Rect, mask: CollisionMask) -> Vec<Entity>;

    /// Все collider'ы из `mask`, пересекающие круг
    fn overlap_circle(&self, center: Vec2, radius: f32, mask: CollisionMask) -> Vec<Entity>;

    /// Все пересечения луча (direction нормализуется), отсортированы по дистанции
    fn raycast_all(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Vec<RayHit>;
}

#[derive(Debug, Clone, Copy)]
struct SpatialEntry {
    entity: Entity,
    character: Option<Entity>,
    position: Vec2,
    shape: ColliderShape,
    layer: CollisionMask,
}

/// Headless spatial index (Resource)
#[derive(Resource, Debug, Default, Clone)]
pub struct SpatialIndex {
    entries: Vec<SpatialEntry>,
}

impl SpatialIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Добавить collider. `is_character` — collider принадлежит персонажу.
    pub fn insert(
        &mut self,
        entity: Entity,
        position: Vec2,
        shape: ColliderShape,
        layer: CollisionMask,
        is_character: bool,
    ) {
        self.entries.push(SpatialEntry {
            entity,
            character: is_character.then_some(entity),
            position,
            shape,
            layer,
        });
    }

    fn in_mask<'a>(&'a self, mask: CollisionMask) -> impl Iterator<Item = &'a SpatialEntry> + 'a {
        self.entries.iter().filter(move |entry| entry.layer & mask != 0)
    }
}

impl SpatialQuery for SpatialIndex {
    fn overlap_rect(&self, area: Rect, mask: CollisionMask) -> Vec<Entity> {
        self.in_mask(mask)
            .filter(|entry| match entry.shape {
                ColliderShape::Circle { radius } => circle_overlaps_rect(entry.position, radius, area),
                ColliderShape::Rect { half_extents } => {
                    let other = Rect::from_center_half_size(entry.position, half_extents);
                    !area.intersect(other).is_empty()
                }
            })
            .map(|entry| entry.entity)
            .collect()
    }

    fn overlap_circle(&self, center: Vec2, radius: f32, mask: CollisionMask) -> Vec<Entity> {
        self.in_mask(mask)
            .filter(|entry| match entry.shape {
                ColliderShape::Circle { radius: other } => {
                    entry.position.distance_squared(center) <= (radius + other) * (radius + other)
                }
                ColliderShape::Rect { half_extents } => circle_overlaps_rect(
                    center,
                    radius,
                    Rect::from_center_half_size(entry.position, half_extents),
                ),
            })
            .map(|entry| entry.entity)
            .collect()
    }

    fn raycast_all(
        &self,
        origin: Vec2,
        direction: Vec2,
        max_distance: f32,
        mask: CollisionMask,
    ) -> Vec<RayHit> {
        let Some(dir) = direction.try_normalize() else {
            return Vec::new();
        };

        let mut hits: Vec<RayHit> = self
            .in_mask(mask)
            .filter_map(|entry| {
                let distance = match entry.shape {
                    ColliderShape::Circle { radius } => {
                        ray_circle(origin, dir, max_distance, entry.position, radius)
                    }
                    ColliderShape::Rect { half_extents } => ray_rect(
                        origin,
                        dir,
                        max_distance,
                        Rect::from_center_half_size(entry.position, half_extents),
                    ),
                }?;
                Some(RayHit {
                    entity: entry.entity,
                    character: entry.character,
                    distance,
                    point: origin + dir * distance,
                })
            })
            .collect();

        // Стабильная сортировка: при равной дистанции сохраняем порядок индекса
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

// ============================================================================
// Геометрия
// ============================================================================

/// Circle ∩ Rect (closest point test)
pub fn circle_overlaps_rect(center: Vec2, radius: f32, rect: Rect) -> bool {
    let closest = center.clamp(rect.min, rect.max);
    closest.distance_squared(center) <= radius * radius
}

/// Луч против круга. `dir` нормализован. Origin внутри круга → 0.
fn ray_circle(origin: Vec2, dir: Vec2, max_distance: f32, center: Vec2, radius: f32) -> Option<f32> {
    let m = origin - center;
    let c = m.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }

    let b = m.dot(dir);
    if b > 0.0 {
        // Origin снаружи и луч смотрит от круга
        return None;
    }

    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }

    let t = -b - discriminant.sqrt();
    (t <= max_distance).then_some(t.max(0.0))
}

/// Луч против AABB (slab method). Origin внутри → 0.
fn ray_rect(origin: Vec2, dir: Vec2, max_distance: f32, rect: Rect) -> Option<f32> {
    let mut t_min = 0.0_f32;
    let mut t_max = max_distance;

    for axis in 0..2 {
        let o = origin[axis];
        let d = dir[axis];
        let (lo, hi) = (rect.min[axis], rect.max[axis]);

        if d.abs() < EPSILON {
            if o < lo || o > hi {
                return None;
            }
            continue;
        }

        let t1 = (lo - o) / d;
        let t2 = (hi - o) / d;
        t_min = t_min.max(t1.min(t2));
        t_max = t_max.min(t1.max(t2));

        if t_min > t_max {
            return None;
        }
    }

    Some(t_min)
}
