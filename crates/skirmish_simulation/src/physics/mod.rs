//! Physics module: collider'ы, spatial queries, kinematic интеграция
//!
//! Внешний physics backend (renderer-side) может заменить `SpatialIndex`
//! своей реализацией `SpatialQuery` — AI и combat зависят только от трейта.

use bevy::prelude::*;

pub mod collider;
pub mod movement;
pub mod spatial;

// Re-export основных типов
pub use collider::{
    Collider, ColliderShape, CollisionMask, Obstacle, LAYER_CHARACTER,
    LAYER_DEFAULT, MASK_CHARACTERS, MASK_LINE_OF_SIGHT,
};
pub use movement::{
    integrate_velocity, push_circle_out_of_rect, rebuild_spatial_index,
    resolve_obstacle_penetration, separate_characters,
};
pub use spatial::{RayHit, SpatialIndex, SpatialQuery};

use crate::SimulationSet;

/// Physics Plugin
///
/// Порядок выполнения (FixedUpdate):
/// 1. rebuild_spatial_index — в начале тика (SimulationSet::Spatial)
/// 2. integrate_velocity → resolve_obstacle_penetration → separate_characters (SimulationSet::Physics)
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SpatialIndex>();

        app.add_systems(FixedUpdate, rebuild_spatial_index.in_set(SimulationSet::Spatial));

        app.add_systems(
            FixedUpdate,
            (
                integrate_velocity,
                separate_characters,
                resolve_obstacle_penetration, // Последним: стены важнее соседей
            )
                .chain()
                .in_set(SimulationSet::Physics),
        );
    }
}
