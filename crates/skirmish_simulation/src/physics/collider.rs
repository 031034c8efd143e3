//! Collision Layers + Collider компонент
//!
//! ## Layers (битовая маска):
//! - Layer 1 (0b1 = 1): Default — статичные препятствия (стены, камни)
//! - Layer 2 (0b10 = 2): Character — игрок и враги
//!
//! Line-of-sight лучи идут по Default | Character:
//! персонажи луч НЕ блокируют, препятствия — блокируют.

use bevy::prelude::*;

pub type CollisionMask = u32;

// ============================================================================
// Layer Битовые Маски (на каком слое объект находится)
// ============================================================================

/// Layer 1: Default (препятствия)
pub const LAYER_DEFAULT: CollisionMask = 0b1; // 1

/// Layer 2: Character (игрок, враги)
pub const LAYER_CHARACTER: CollisionMask = 0b10; // 2

// ============================================================================
// Mask Битовые Маски (что ищем в запросах)
// ============================================================================

/// Mask: Raycast для LOS check (Default + Character)
pub const MASK_LINE_OF_SIGHT: CollisionMask = LAYER_DEFAULT | LAYER_CHARACTER;

/// Mask: hit volume / detection overlap (только персонажи)
pub const MASK_CHARACTERS: CollisionMask = LAYER_CHARACTER;

/// Форма collider'а (2D, центр = Transform.translation)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

/// Collider для spatial queries
///
/// `enabled = false` — entity выпадает из всех запросов
/// (мёртвые не блокируют LOS и по ним нельзя попасть).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub shape: ColliderShape,
    pub layer: CollisionMask,
    pub enabled: bool,
}

impl Collider {
    /// Collider персонажа (circle на Character слое)
    pub fn character(radius: f32) -> Self {
        Self {
            shape: ColliderShape::Circle { radius },
            layer: LAYER_CHARACTER,
            enabled: true,
        }
    }

    /// Статичное препятствие (rect на Default слое)
    pub fn obstacle(half_extents: Vec2) -> Self {
        Self {
            shape: ColliderShape::Rect { half_extents },
            layer: LAYER_DEFAULT,
            enabled: true,
        }
    }
}

/// Маркер статичного препятствия (не двигается, выталкивает персонажей)
#[derive(Component, Debug, Clone, Copy, Default)]
#[require(Transform)]
pub struct Obstacle;
