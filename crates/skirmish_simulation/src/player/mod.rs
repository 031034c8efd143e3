//! Player domain — input → MoveIntent / AttackIntent

use bevy::prelude::*;

mod player;

pub use player::{Player, PlayerInput};

use crate::combat::AttackIntent;
use crate::components::{Lifecycle, MoveIntent};
use crate::SimulationSet;

/// Система: PlayerInput → MoveIntent + AttackIntent
///
/// Нажатие attack потребляется в том же тике (edge trigger).
pub fn player_control(
    mut players: Query<(Entity, &mut PlayerInput, &mut MoveIntent, &Lifecycle), With<Player>>,
    mut attack_intents: EventWriter<AttackIntent>,
) {
    for (entity, mut input, mut intent, lifecycle) in players.iter_mut() {
        let pressed = std::mem::take(&mut input.attack_pressed);

        if !lifecycle.is_alive() {
            intent.direction = Vec2::ZERO;
            continue;
        }

        intent.direction = input.axes.clamp(Vec2::NEG_ONE, Vec2::ONE);

        if pressed {
            attack_intents.write(AttackIntent { attacker: entity });
        }
    }
}

/// Player Plugin
pub struct PlayerPlugin;

impl Plugin for PlayerPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, player_control.in_set(SimulationSet::Intent));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_axes_clamped() {
        let input = PlayerInput::new(Vec2::new(3.0, -0.5));
        assert_eq!(input.axes, Vec2::new(1.0, -0.5));
        assert!(!input.attack_pressed);
    }
}
