//! Integration tests for the background atlas loader and instance seeding,
//! driving a real world, schedule, and loader thread.

use bevy_ecs::prelude::*;
use std::io::Write;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use spriteplay::components::instances::SpriteInstances;
use spriteplay::components::playback::Playback;
use spriteplay::components::sprite::Sprite;
use spriteplay::events::atlas::{AtlasCmd, AtlasMessage};
use spriteplay::resources::atlas::{Atlas, AtlasOptions};
use spriteplay::resources::atlasstore::AtlasStore;
use spriteplay::resources::loader::{AtlasBridge, setup_loader, shutdown_loader};
use spriteplay::resources::worldtime::WorldTime;
use spriteplay::systems::instancing::seed_sprite_instances;
use spriteplay::systems::loader::{poll_atlas_results, update_atlas_messages};

/// Everything the message queue delivered, across all ticks.
#[derive(Resource, Default)]
struct MessageLog(Vec<AtlasMessage>);

fn record_messages(mut reader: MessageReader<AtlasMessage>, mut log: ResMut<MessageLog>) {
    for msg in reader.read() {
        log.0.push(msg.clone());
    }
}

fn make_world() -> (World, Schedule) {
    let mut world = World::new();
    world.insert_resource(WorldTime::default());
    world.insert_resource(AtlasStore::new());
    world.insert_resource(MessageLog::default());
    setup_loader(&mut world);
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            poll_atlas_results,
            record_messages,
            update_atlas_messages,
            seed_sprite_instances,
        )
            .chain(),
    );
    (world, schedule)
}

/// Run the schedule until `done` holds or the timeout expires.
fn run_until(world: &mut World, schedule: &mut Schedule, done: impl Fn(&World) -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        schedule.run(world);
        world.clear_trackers();
        if done(world) {
            return true;
        }
        if Instant::now() > deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn write_temp_sheet(name: &str, json: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("spriteplay_{}_{}.json", std::process::id(), name));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(json.as_bytes()).unwrap();
    path
}

fn send_load(world: &World, key: &str, path: PathBuf, options: AtlasOptions) {
    world
        .resource::<AtlasBridge>()
        .tx_cmd
        .send(AtlasCmd::Load {
            key: key.to_string(),
            path,
            options,
        })
        .unwrap();
}

const SHEET_JSON: &str = r#"{
    "frames": {
        "walk_0": { "frame": { "x": 0,  "y": 0, "w": 32, "h": 32 } },
        "walk_1": { "frame": { "x": 32, "y": 0, "w": 32, "h": 32 } },
        "idle_0": { "frame": { "x": 64, "y": 0, "w": 32, "h": 32 } }
    },
    "meta": { "size": { "w": 96, "h": 32 } }
}"#;

#[test]
fn test_load_success_populates_store_and_notifies() {
    let (mut world, mut schedule) = make_world();
    let path = write_temp_sheet("ok", SHEET_JSON);

    let options = AtlasOptions {
        animation_names: vec!["walk".to_string(), "idle".to_string()],
        frame_name: None,
    };
    send_load(&world, "hero", path.clone(), options);

    let loaded = run_until(&mut world, &mut schedule, |world| {
        world.resource::<AtlasStore>().get("hero").is_some()
    });
    assert!(loaded, "atlas never arrived");

    let store = world.resource::<AtlasStore>();
    let atlas = store.get("hero").unwrap();
    assert_eq!(atlas.frame_count(Some("walk")), 2);
    assert_eq!(atlas.frame_count(Some("idle")), 1);

    // Run one more tick so the notification is observable via the reader.
    schedule.run(&mut world);
    let log = world.resource::<MessageLog>();
    assert!(log.0.contains(&AtlasMessage::Loaded {
        key: "hero".to_string()
    }));

    shutdown_loader(&mut world);
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_load_failure_reports_without_touching_store() {
    let (mut world, mut schedule) = make_world();

    send_load(
        &world,
        "ghost",
        PathBuf::from("/nonexistent/sheet.json"),
        AtlasOptions::default(),
    );

    let failed = run_until(&mut world, &mut schedule, |world| {
        world
            .resource::<MessageLog>()
            .0
            .iter()
            .any(|m| matches!(m, AtlasMessage::Failed { key, .. } if key == "ghost"))
    });
    assert!(failed, "failure was never reported");
    assert!(world.resource::<AtlasStore>().get("ghost").is_none());

    shutdown_loader(&mut world);
}

#[test]
fn test_malformed_sheet_is_a_failure_message() {
    let (mut world, mut schedule) = make_world();
    let path = write_temp_sheet("bad", "{ not json");

    send_load(&world, "bad", path.clone(), AtlasOptions::default());

    let failed = run_until(&mut world, &mut schedule, |world| {
        !world.resource::<MessageLog>().0.is_empty()
    });
    assert!(failed);
    match &world.resource::<MessageLog>().0[0] {
        AtlasMessage::Failed { key, error } => {
            assert_eq!(key, "bad");
            assert!(error.contains("invalid sheet document"));
        }
        other => panic!("expected failure, got {:?}", other),
    }

    shutdown_loader(&mut world);
    let _ = std::fs::remove_file(path);
}

#[test]
fn test_shutdown_joins_loader_thread() {
    let mut world = World::new();
    setup_loader(&mut world);
    shutdown_loader(&mut world);
    assert!(world.get_resource::<AtlasBridge>().is_none());
}

#[test]
fn test_instances_seed_once_atlas_is_available() {
    let (mut world, mut schedule) = make_world();
    let items = vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
    let entity = world
        .spawn((
            Playback::new("strip"),
            Sprite::default(),
            SpriteInstances::new(items),
        ))
        .id();

    // No atlas yet: nothing seeds.
    schedule.run(&mut world);
    assert!(!world.get::<SpriteInstances>(entity).unwrap().is_seeded());

    world
        .resource_mut::<AtlasStore>()
        .insert("strip", Atlas::from_grid(256.0, 64.0, 4));
    schedule.run(&mut world);

    let instances = world.get::<SpriteInstances>(entity).unwrap();
    assert!(instances.is_seeded());
    assert_eq!(instances.entries.len(), 3);
    for entry in &instances.entries {
        assert!(entry.frame < 4);
        assert!(entry.uv.repeat_x > 0.0);
    }
    assert_eq!(instances.entries[1].position, [1.0, 0.0, 0.0]);

    shutdown_loader(&mut world);
}

#[test]
fn test_instance_limit_caps_seeded_entries() {
    let (mut world, mut schedule) = make_world();
    world
        .resource_mut::<AtlasStore>()
        .insert("strip", Atlas::from_grid(256.0, 64.0, 4));
    let items = vec![[0.0; 3]; 10];
    let entity = world
        .spawn((
            Playback::new("strip"),
            Sprite::default(),
            SpriteInstances::new(items).with_limit(4),
        ))
        .id();

    schedule.run(&mut world);
    assert_eq!(world.get::<SpriteInstances>(entity).unwrap().entries.len(), 4);

    shutdown_loader(&mut world);
}
