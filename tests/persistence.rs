mod common;

use std::fs;
use std::io::ErrorKind;

use cgmath::Point3;
use common::{flat_world, STONE};
use voxel_terrain::engine_state::{
    error::PersistenceError,
    voxels::{
        block::BlockId,
        storage::{apply_changes_to_world, load_changes, save_changes, WorldSave},
    },
};

#[test]
fn edits_survive_a_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let slot = WorldSave::new(dir.path().join("world"));

    let mut world = flat_world();
    world.add_chunk_at(Point3::new(0, 0, 0)).unwrap();
    world.add_chunk_at(Point3::new(-1, 0, 0)).unwrap();
    world.set_block_world(Point3::new(2, 1, 2), STONE).unwrap();
    world.set_block_world(Point3::new(-3, 0, 7), BlockId::AIR).unwrap();
    slot.save(&world).unwrap();

    assert_eq!(slot.load_seed().unwrap(), Some(world.generator().seed()));
    let changes = slot.load_changes().unwrap();
    assert_eq!(&changes, world.edit_log());

    let mut restored = flat_world();
    assert_eq!(apply_changes_to_world(&mut restored, changes).unwrap(), 2);
    assert_eq!(restored.block_at_world(Point3::new(2, 1, 2)), Some(STONE));
    assert_eq!(restored.block_at_world(Point3::new(-3, 0, 7)), Some(BlockId::AIR));
    assert_eq!(
        restored.get_chunk_at(Point3::new(0, 0, 0)).unwrap().mesh().index_count(),
        world.get_chunk_at(Point3::new(0, 0, 0)).unwrap().mesh().index_count()
    );
}

#[test]
fn identical_logs_produce_identical_files() {
    let dir = tempfile::tempdir().unwrap();
    let mut world = flat_world();
    for x in -2..=2 {
        world.add_chunk_at(Point3::new(x, 0, 0)).unwrap();
        world.set_block_world(Point3::new(x * 32 + 1, 1, 1), STONE).unwrap();
    }

    let first = dir.path().join("first.bin");
    let second = dir.path().join("second.bin");
    save_changes(&first, world.edit_log()).unwrap();
    save_changes(&second, world.edit_log()).unwrap();
    assert_eq!(fs::read(first).unwrap(), fs::read(second).unwrap());
}

#[test]
fn missing_edit_log_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let changes = load_changes(dir.path().join("chunks.bin")).unwrap();
    assert!(changes.is_empty());
}

#[test]
fn truncated_edit_log_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chunks.bin");

    let mut world = flat_world();
    world.add_chunk_at(Point3::new(0, 0, 0)).unwrap();
    world.set_block_world(Point3::new(0, 1, 0), STONE).unwrap();
    save_changes(&path, world.edit_log()).unwrap();

    let bytes = fs::read(&path).unwrap();
    fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();

    match load_changes(&path) {
        Err(PersistenceError::Io(err)) => assert_eq!(err.kind(), ErrorKind::UnexpectedEof),
        other => panic!("expected a truncation error, got {:?}", other.map(|log| log.len())),
    }
}
