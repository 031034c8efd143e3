//! Tests for damage resolution (pure functions).

use proptest::prelude::*;

use super::damage::*;
use crate::components::{Health, Invulnerability, Lifecycle};
use crate::equipment::{Armour, ArmourSetId, Loadout, Weapon};

fn sword(set: i32) -> Weapon {
    Weapon::new(4, ArmourSetId(set))
}

fn plate(mitigation: f32, set: i32) -> Armour {
    Armour::new(mitigation, ArmourSetId(set))
}

#[test]
fn test_three_unarmoured_hits_kill() {
    let mut health = Health::new(3);
    let mut invulnerability = Invulnerability::new(1.0);
    let lifecycle = Lifecycle::Alive;
    let weapon = Weapon::new(1, ArmourSetId::NONE);

    let mut outcomes = Vec::new();
    for _ in 0..3 {
        outcomes.push(apply_to_health(1, Some(&weapon), None, &mut health, &mut invulnerability, &lifecycle));
        invulnerability.tick(1.5); // Следующий удар — вне окна неуязвимости
    }

    assert_eq!(
        outcomes,
        vec![
            DamageOutcome::Wounded { damage: 1 },
            DamageOutcome::Wounded { damage: 1 },
            DamageOutcome::Killed { damage: 1 },
        ]
    );
    assert_eq!(health.current, 0);
}

#[test]
fn test_plain_mitigation() {
    // mitigation 0.5, без оружия: floor(4 × 0.5) = 2
    let defender = Loadout::empty().with_armour(plate(0.5, 1));
    assert_eq!(resolve_damage(4, None, Some(&defender)), 2);
}

#[test]
fn test_matching_set_mitigation() {
    // mitigation 0.5 × 1.5 = 0.75: floor(4 × 0.25) = 1
    let defender = Loadout::empty().with_armour(plate(0.5, 1)).with_weapon(sword(1));
    assert_eq!(effective_mitigation(Some(&defender)), 0.75);
    assert_eq!(resolve_damage(4, None, Some(&defender)), 1);
}

#[test]
fn test_matching_set_mitigation_clamped() {
    let defender = Loadout::empty().with_armour(plate(0.8, 2)).with_weapon(sword(2));
    assert_eq!(effective_mitigation(Some(&defender)), 1.0);
    assert_eq!(resolve_damage(10, None, Some(&defender)), 0);
}

#[test]
fn test_mismatched_own_weapon_keeps_plain_mitigation() {
    let defender = Loadout::empty().with_armour(plate(0.5, 1)).with_weapon(sword(3));
    assert_eq!(effective_mitigation(Some(&defender)), 0.5);
    assert_eq!(resolve_damage(4, None, Some(&defender)), 2);
}

#[test]
fn test_set_amplification() {
    let attacker_weapon = sword(1);
    let defender = Loadout::empty().with_armour(plate(0.0, 1));

    assert_eq!(amplified_damage(4, Some(&attacker_weapon), Some(&defender)), 8);
    assert_eq!(resolve_damage(4, Some(&attacker_weapon), Some(&defender)), 8);
}

#[test]
fn test_no_amplification_without_set() {
    let defender_none = Loadout::empty().with_armour(plate(0.0, -1));
    assert_eq!(amplified_damage(4, Some(&sword(-1)), Some(&defender_none)), 4);

    let defender_other = Loadout::empty().with_armour(plate(0.0, 2));
    assert_eq!(amplified_damage(4, Some(&sword(1)), Some(&defender_other)), 4);

    // Без брони у цели бонуса нет
    assert_eq!(amplified_damage(4, Some(&sword(1)), Some(&Loadout::empty())), 4);
    assert_eq!(amplified_damage(4, Some(&sword(1)), None), 4);
}

#[test]
fn test_amplification_then_mitigation() {
    // 4 × 2 = 8, mitigation 0.5 → 4
    let defender = Loadout::empty().with_armour(plate(0.5, 1));
    assert_eq!(resolve_damage(4, Some(&sword(1)), Some(&defender)), 4);
}

#[test]
fn test_invulnerability_window_discards_second_hit() {
    let mut health = Health::new(3);
    let mut invulnerability = Invulnerability::new(1.0);
    let lifecycle = Lifecycle::Alive;

    let first = apply_to_health(1, None, None, &mut health, &mut invulnerability, &lifecycle);
    invulnerability.tick(0.5);
    let second = apply_to_health(1, None, None, &mut health, &mut invulnerability, &lifecycle);

    assert_eq!(first, DamageOutcome::Wounded { damage: 1 });
    assert_eq!(second, DamageOutcome::Ignored);
    assert_eq!(health.current, 2);
}

#[test]
fn test_dead_defender_ignores_damage() {
    let mut health = Health::new(3);
    health.take_damage(3);
    let mut invulnerability = Invulnerability::new(1.0);
    let lifecycle = Lifecycle::Dying { elapsed: 0.1, duration: 0.5 };

    let outcome = apply_to_health(5, None, None, &mut health, &mut invulnerability, &lifecycle);
    assert_eq!(outcome, DamageOutcome::Ignored);
    assert_eq!(health.current, 0);
}

#[test]
fn test_killing_blow_does_not_grant_invulnerability() {
    let mut health = Health::new(1);
    let mut invulnerability = Invulnerability::new(1.0);

    let outcome = apply_to_health(1, None, None, &mut health, &mut invulnerability, &Lifecycle::Alive);
    assert_eq!(outcome, DamageOutcome::Killed { damage: 1 });
    assert!(!invulnerability.is_active());
}

#[test]
fn test_unarmed_base_damage() {
    assert_eq!(base_damage(None, 1), 1);
    assert_eq!(base_damage(Some(&sword(1)), 1), 4);
}

proptest! {
    #[test]
    fn prop_health_stays_in_range(
        max in 1u32..20,
        incoming in 0u32..50,
        mitigation in 0.0f32..=1.0,
        attacker_set in -1i32..3,
        armour_set in -1i32..3,
        own_set in -1i32..3,
    ) {
        let mut health = Health::new(max);
        let mut invulnerability = Invulnerability::new(1.0);
        let defender = Loadout::empty()
            .with_armour(plate(mitigation, armour_set))
            .with_weapon(sword(own_set));
        let weapon = sword(attacker_set);

        let before = health.current;
        apply_to_health(incoming, Some(&weapon), Some(&defender), &mut health, &mut invulnerability, &Lifecycle::Alive);

        prop_assert!(health.current <= health.max);
        prop_assert!(health.current <= before);
    }

    #[test]
    fn prop_mitigation_never_increases_damage(raw in 0u32..1000, mitigation in 0.0f32..=1.0, set in -1i32..3) {
        let defender = Loadout::empty().with_armour(plate(mitigation, set));
        prop_assert!(mitigated_damage(raw, Some(&defender)) <= raw);
    }
}
