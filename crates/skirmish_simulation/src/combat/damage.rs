//! Damage resolution: amplification, mitigation, invulnerability, hit reaction
//!
//! Формула (defender с бронёй):
//! - raw = base × 2, если weapon атакующего из того же сета что броня цели (сет != -1)
//! - mitigation = armour.mitigation, или clamp(mitigation × 1.5, 0, 1)
//!   если у цели собственное оружие из сета её брони
//! - final = floor(raw × (1 − mitigation))
//!
//! Без брони урон проходит как есть. Мёртвые и неуязвимые урон игнорируют.

use bevy::prelude::*;

use crate::combat::death::{enter_dying, DeathCause, EntityDied};
use crate::components::{Facing, Health, Invulnerability, Lifecycle, Locomotion, PhysicsBody};
use crate::config::CombatTuning;
use crate::equipment::{Loadout, Weapon};
use crate::presentation::{AnimationCue, AnimationTrigger};

/// Множитель урона при совпадении сета оружия и брони цели
pub const SET_AMPLIFICATION: u32 = 2;

/// Множитель mitigation для брони, надетой вместе с оружием того же сета
pub const SET_MITIGATION_FACTOR: f32 = 1.5;

// ============================================================================
// Events
// ============================================================================

/// Событие: удар дошёл до цели (результат attack sweep)
///
/// `base_damage` — до amplification/mitigation.
/// `impact_direction` — нормализованное направление от цели к атакующему.
#[derive(Event, Debug, Clone)]
pub struct HitLanded {
    pub attacker: Entity,
    pub target: Entity,
    pub base_damage: u32,
    pub impact_direction: Vec2,
}

/// Событие: урон нанесен
///
/// Генерируется после применения damage к Health.
/// Используется для UI, звуков, эффектов.
#[derive(Event, Debug, Clone)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub target_died: bool,
}

/// Итог применения урона
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Цель неуязвима или мертва — ничего не изменилось
    Ignored,
    /// Урон принят, цель жива (включилась неуязвимость)
    Wounded { damage: u32 },
    /// Урон принят, здоровье ≤ 0
    Killed { damage: u32 },
}

// ============================================================================
// Pure functions
// ============================================================================

/// Базовый урон атакующего: урон оружия или unarmed
pub fn base_damage(attacker_weapon: Option<&Weapon>, unarmed_damage: u32) -> u32 {
    attacker_weapon.map_or(unarmed_damage, |weapon| weapon.damage)
}

/// Amplification: ×2 если weapon атакующего из сета брони цели
pub fn amplified_damage(base: u32, attacker_weapon: Option<&Weapon>, defender: Option<&Loadout>) -> u32 {
    let defender_armour = defender.and_then(Loadout::armour);

    match (attacker_weapon, defender_armour) {
        (Some(weapon), Some(armour)) if weapon.armour_set.matches(armour.armour_set) => {
            base.saturating_mul(SET_AMPLIFICATION)
        }
        _ => base,
    }
}

/// Эффективная mitigation цели (0 без брони)
pub fn effective_mitigation(defender: Option<&Loadout>) -> f32 {
    let Some(loadout) = defender else {
        return 0.0;
    };
    let Some(armour) = loadout.armour() else {
        return 0.0;
    };

    if loadout.wears_matching_set() {
        (armour.mitigation * SET_MITIGATION_FACTOR).clamp(0.0, 1.0)
    } else {
        armour.mitigation
    }
}

/// floor(raw × (1 − mitigation))
pub fn mitigated_damage(raw: u32, defender: Option<&Loadout>) -> u32 {
    let mitigation = effective_mitigation(defender);
    if mitigation <= 0.0 {
        return raw;
    }

    (raw as f32 * (1.0 - mitigation)).floor().max(0.0) as u32
}

/// Полный расчёт: amplification → mitigation
pub fn resolve_damage(incoming: u32, attacker_weapon: Option<&Weapon>, defender: Option<&Loadout>) -> u32 {
    let raw = amplified_damage(incoming, attacker_weapon, defender);
    mitigated_damage(raw, defender)
}

/// Применить урон к состоянию цели
///
/// - неуязвим/мёртв → Ignored, ничего не меняется
/// - health ≤ 0 → Killed (переход в Dying делает вызывающий)
/// - иначе → Wounded, неуязвимость включена
pub fn apply_to_health(
    incoming: u32,
    attacker_weapon: Option<&Weapon>,
    defender: Option<&Loadout>,
    health: &mut Health,
    invulnerability: &mut Invulnerability,
    lifecycle: &Lifecycle,
) -> DamageOutcome {
    if invulnerability.blocks_damage(lifecycle) {
        return DamageOutcome::Ignored;
    }

    let damage = resolve_damage(incoming, attacker_weapon, defender);
    health.take_damage(damage);

    if health.is_depleted() {
        DamageOutcome::Killed { damage }
    } else {
        invulnerability.trigger();
        DamageOutcome::Wounded { damage }
    }
}

// ============================================================================
// Systems
// ============================================================================

/// Система: apply damage от HitLanded событий
///
/// 1. Читаем HitLanded
/// 2. Резолвим урон (weapon атакующего vs loadout цели)
/// 3. Hit reaction: cue, velocity = 0, hold, facing = impact
/// 4. Killed → Lifecycle::Dying + EntityDied
pub fn apply_damage(
    mut hits: EventReader<HitLanded>,
    mut damage_dealt_events: EventWriter<DamageDealt>,
    mut entity_died_events: EventWriter<EntityDied>,
    mut cues: EventWriter<AnimationCue>,
    mut targets: Query<(
        &mut Health,
        &mut Invulnerability,
        &mut Lifecycle,
        &mut Locomotion,
        &mut PhysicsBody,
        &mut Facing,
        Option<&Loadout>,
    )>,
    attackers: Query<&Loadout>,
    tuning: Res<CombatTuning>,
) {
    for hit in hits.read() {
        let Ok((mut health, mut invulnerability, mut lifecycle, mut locomotion, mut body, mut facing, loadout)) =
            targets.get_mut(hit.target)
        else {
            crate::log_warning(&format!("HitLanded: target {:?} is not a combatant", hit.target));
            continue;
        };

        let attacker_weapon = attackers.get(hit.attacker).ok().and_then(Loadout::weapon);

        let outcome = apply_to_health(
            hit.base_damage,
            attacker_weapon,
            loadout,
            &mut health,
            &mut invulnerability,
            &lifecycle,
        );

        let (damage, died) = match outcome {
            DamageOutcome::Ignored => continue,
            DamageOutcome::Wounded { damage } => (damage, false),
            DamageOutcome::Killed { damage } => (damage, true),
        };

        // Hit reaction (и на смертельном ударе тоже)
        facing.direction = hit.impact_direction;
        body.velocity = Vec2::ZERO;
        let hold_time = locomotion.hit_hold_time;
        locomotion.hold(hold_time);
        cues.write(AnimationCue::new(hit.target, AnimationTrigger::Hit));

        crate::log(&format!(
            "💥 {:?} hit {:?}: {} damage (base {}), health {}/{}",
            hit.attacker, hit.target, damage, hit.base_damage, health.current, health.max
        ));

        damage_dealt_events.write(DamageDealt {
            attacker: hit.attacker,
            target: hit.target,
            damage,
            target_died: died,
        });

        if died && enter_dying(&mut lifecycle, tuning.death_teardown_duration) {
            entity_died_events.write(EntityDied {
                entity: hit.target,
                killer: Some(hit.attacker),
                cause: DeathCause::Damage,
            });
        }
    }
}

/// System: обновление таймеров неуязвимости (монотонно вниз, clamp в 0)
pub fn tick_invulnerability(mut query: Query<&mut Invulnerability>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut invulnerability in query.iter_mut() {
        invulnerability.tick(delta);
    }
}
