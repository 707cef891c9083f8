mod common;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use cgmath::{Point3, Vector3};
use common::{colour_atlas, STONE};
use voxel_terrain::engine_state::{
    config::EngineConfig,
    rendering::meshing::MeshCommand,
    voxels::{block::BlockId, streaming::StreamingConfig},
    EngineState,
};

const DOWN: Vector3<f32> = Vector3::new(0.0, -1.0, 0.0);

fn flat_engine(dir: &Path) -> EngineState {
    let worldgen_path = dir.join("worldgen.json");
    fs::write(&worldgen_path, r#"{ "heightScale": 0, "border": 0, "layers": [] }"#).unwrap();

    let config = EngineConfig {
        worldgen_path,
        save_folder: dir.join("save"),
        seed: Some(42),
        streaming: StreamingConfig {
            view_distance: 1,
            max_cells: 100,
            cells_per_tick: 27,
            worker_count: 0,
        },
    };
    EngineState::new(config, Arc::new(colour_atlas())).unwrap()
}

fn settle(engine: &mut EngineState) {
    for _ in 0..60 {
        engine.tick(0.05).unwrap();
    }
}

#[test]
fn player_spawns_above_the_surface_and_lands() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = flat_engine(dir.path());
    assert_eq!(engine.seed(), 42);
    assert_eq!(engine.worldgen().height_scale, 0);
    assert_eq!(engine.player.position, Point3::new(0.0, 2.0, 0.0));

    settle(&mut engine);
    assert_eq!(engine.world.len(), 27);
    assert_eq!(engine.player.position.y, 1.0);
}

#[test]
fn player_breaks_the_block_underfoot() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = flat_engine(dir.path());
    settle(&mut engine);
    engine.take_mesh_commands();

    let target = engine.target_block(DOWN).unwrap();
    assert_eq!(target.block, Point3::new(0, 0, 0));

    assert_eq!(engine.break_block(DOWN).unwrap(), Some(Point3::new(0, 0, 0)));
    assert_eq!(engine.world.block_at_world(Point3::new(0, 0, 0)), Some(BlockId::AIR));
    assert!(engine
        .take_mesh_commands()
        .contains(&MeshCommand::Upload(Point3::new(0, 0, 0))));
}

#[test]
fn placing_inside_the_player_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = flat_engine(dir.path());
    settle(&mut engine);

    assert_eq!(engine.place_block(DOWN, STONE).unwrap(), None);
    assert_eq!(engine.world.block_at_world(Point3::new(0, 1, 0)), Some(BlockId::AIR));
}

#[test]
fn placing_against_a_distant_face_fills_the_neighbor() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = flat_engine(dir.path());
    settle(&mut engine);

    // eye at (0.4, 2.5, 0.4); aim at the top of block (3, 0, 0)
    let direction = Point3::new(3.5, 1.0, 0.5) - engine.player.eye_position();
    assert_eq!(engine.place_block(direction, STONE).unwrap(), Some(Point3::new(3, 1, 0)));
    assert_eq!(engine.world.block_at_world(Point3::new(3, 1, 0)), Some(STONE));
}

#[test]
fn saved_edits_come_back_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = flat_engine(dir.path());
    settle(&mut engine);
    engine.break_block(DOWN).unwrap();
    engine.save().unwrap();

    assert_eq!(engine.load_saved().unwrap(), 1);
    assert_eq!(engine.seed(), 42);
    assert_eq!(engine.world.len(), 1);
    assert_eq!(engine.world.block_at_world(Point3::new(0, 0, 0)), Some(BlockId::AIR));
}

#[test]
fn regenerating_releases_the_old_world() {
    let dir = tempfile::tempdir().unwrap();
    let mut engine = flat_engine(dir.path());
    settle(&mut engine);
    engine.take_mesh_commands();

    engine.regenerate();
    assert!(engine.world.is_empty());
    assert!(engine.world.edit_log().is_empty());

    let commands = engine.take_mesh_commands();
    assert_eq!(commands.len(), 27);
    assert!(commands
        .iter()
        .all(|command| matches!(command, MeshCommand::Release(_))));
}
