//! Equipment integration test
//!
//! TOML конфиг → ItemCatalog → spawn_player / spawn_enemy → удар:
//! - id из `[player_equipment]` / `[enemy_equipment]` резолвятся при спавне
//! - weapon игрока из сета брони врага → урон ×2
//! - неизвестный id → SpawnError::Equipment, entity не появляется

mod common;

use bevy::prelude::*;
use common::*;
use skirmish_simulation::*;

const KNIGHT_CONFIG: &str = r#"
[actor]
max_health = 10

[[items]]
id = "knight_sword"
kind = "weapon"
damage = 2
armour_set = 1

[[items]]
id = "knight_plate"
kind = "armour"
mitigation = 0.0
armour_set = 1

[player_equipment]
weapon = "knight_sword"

[enemy_equipment]
armour = "knight_plate"
"#;

/// App с каталогом из конфига и запущенными часами
fn configured_app(config: &SimulationConfig) -> App {
    let mut app = create_headless_app_with(SEED, SimulationPlugin::from_config(config));
    app.insert_resource(config.item_catalog().expect("valid catalog"));
    app.update();
    app
}

/// Спавн через Commands (как headless binary), затем flush
fn spawn_through_commands(
    app: &mut App,
    player: &PlayerSpawn,
    enemy: &EnemySpawn,
) -> (Result<Entity, SpawnError>, Result<Entity, SpawnError>) {
    let world = app.world_mut();
    let catalog = world.resource::<ItemCatalog>().clone();

    let spawned = {
        let mut commands = world.commands();
        (
            spawn_player(&mut commands, &catalog, player),
            spawn_enemy(&mut commands, &catalog, enemy),
        )
    };

    world.flush();
    spawned
}

/// Test: sword и plate из одного сета (из TOML) → удар 2 × 2 = 4
#[test]
fn test_config_equipment_doubles_hit() {
    let config = SimulationConfig::parse(KNIGHT_CONFIG).expect("valid config");
    let mut app = configured_app(&config);
    record::<DamageDealt>(&mut app);

    let player_spawn = PlayerSpawn {
        tuning: config.actor.clone(),
        ..PlayerSpawn::new(Vec2::ZERO).with_equipment(config.player_equipment.clone())
    };
    // Waypoint на месте спавна: враг не уходит с линии удара
    let enemy_position = Vec2::new(10.0, 0.0);
    let enemy_spawn = EnemySpawn {
        tuning: config.actor.clone(),
        enemy: config.enemy.clone(),
        ..EnemySpawn::new(enemy_position, vec![enemy_position]).with_equipment(config.enemy_equipment.clone())
    };

    let (player, enemy) = spawn_through_commands(&mut app, &player_spawn, &enemy_spawn);
    let player = player.expect("player spawned");
    let enemy = enemy.expect("enemy spawned");

    let loadout = app.world().get::<Loadout>(enemy).expect("enemy loadout");
    assert_eq!(loadout.armour().map(|armour| armour.armour_set), Some(ArmourSetId(1)));

    press_attack(&mut app, player);
    tick(&mut app, 1);

    assert_eq!(health_of(&app, enemy), Some(6));
    let dealt = recorded::<DamageDealt>(&app);
    assert_eq!(dealt.len(), 1);
    assert_eq!(dealt[0].attacker, player);
    assert_eq!(dealt[0].damage, 4);
}

/// Test: id, которого нет в каталоге → ошибка спавна, entity не создан
#[test]
fn test_unknown_item_id_rejects_spawn() {
    let config = SimulationConfig::parse(KNIGHT_CONFIG).expect("valid config");
    let mut app = configured_app(&config);

    let player_spawn = PlayerSpawn::new(Vec2::ZERO).with_equipment(EquipmentIds::new(Some("great_axe"), None));
    let enemy_spawn = EnemySpawn::new(Vec2::new(10.0, 0.0), vec![Vec2::ZERO])
        .with_equipment(EquipmentIds::new(Some("knight_plate"), None));

    let (player, enemy) = spawn_through_commands(&mut app, &player_spawn, &enemy_spawn);

    assert_eq!(
        player.err(),
        Some(SpawnError::Equipment(EquipError::UnknownItem("great_axe".to_string())))
    );
    assert!(matches!(
        enemy.err(),
        Some(SpawnError::Equipment(EquipError::WrongSlot { .. }))
    ));

    let world = app.world_mut();
    let mut actors = world.query::<&Actor>();
    assert_eq!(actors.iter(world).count(), 0);
}
