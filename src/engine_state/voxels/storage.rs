//! # World Storage
//!
//! Save slots hold two files: the seed as plain text and the edit log as a binary
//! blob. Untouched terrain is reproduced from the seed, so only edited chunks are
//! written.
//!
//! ## Edit Log Format
//!
//! All integers are little-endian `i32`.
//!
//! ```text
//! count
//! repeated count times:
//!     cx cy cz            chunk coordinate
//!     dx dy dz            dimensions, always 32 32 32
//!     dx*dy*dz bytes      block ids, X outer, Y middle, Z inner
//! ```
//!
//! Entries are written sorted by chunk coordinate so an unchanged log produces an
//! identical file. A missing file reads as an empty log; a truncated one is an error.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use cgmath::Point3;
use log::info;

use crate::engine_state::error::{PersistenceError, TerrainError};

use super::block::BlockId;
use super::chunk::{CHUNK_DIMENSION, CHUNK_SIZE};
use super::world::{EditLog, World};

/// File name of the seed inside a save folder.
pub const SEED_FILE: &str = "seed.txt";
/// File name of the edit log inside a save folder.
pub const CHANGES_FILE: &str = "chunks.bin";

fn create_parent(path: &Path) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Writes the seed as decimal text, creating parent folders as needed.
pub fn save_seed(path: impl AsRef<Path>, seed: i32) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    create_parent(path)?;
    fs::write(path, seed.to_string())?;
    Ok(())
}

/// Reads a saved seed. `Ok(None)` if there is no seed file.
pub fn load_seed(path: impl AsRef<Path>) -> Result<Option<i32>, PersistenceError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    text.trim()
        .parse()
        .map(Some)
        .map_err(|_| PersistenceError::InvalidSeed(text))
}

fn write_i32<W: Write>(writer: &mut W, value: i32) -> Result<(), PersistenceError> {
    writer.write_all(&value.to_le_bytes())?;
    Ok(())
}

fn read_i32<R: Read>(reader: &mut R) -> Result<i32, PersistenceError> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    Ok(i32::from_le_bytes(bytes))
}

/// Serializes an edit log.
pub fn write_edit_log<W: Write>(writer: &mut W, log: &EditLog) -> Result<(), PersistenceError> {
    let mut entries: Vec<_> = log.iter().collect();
    entries.sort_by_key(|(position, _)| (position.x, position.y, position.z));

    write_i32(writer, entries.len() as i32)?;
    for (position, blocks) in entries {
        for coordinate in [position.x, position.y, position.z] {
            write_i32(writer, coordinate)?;
        }
        for _ in 0..3 {
            write_i32(writer, CHUNK_DIMENSION)?;
        }
        writer.write_all(bytemuck::cast_slice(blocks.as_slice()))?;
    }
    Ok(())
}

/// Deserializes an edit log.
///
/// # Errors
/// I/O errors (including `UnexpectedEof` on truncation), a negative entry count, or
/// an entry whose dimensions are not those of a chunk.
pub fn read_edit_log<R: Read>(reader: &mut R) -> Result<EditLog, PersistenceError> {
    let count = read_i32(reader)?;
    if count < 0 {
        return Err(PersistenceError::NegativeCount(count));
    }

    let mut log = EditLog::new();
    for _ in 0..count {
        let cell = [read_i32(reader)?, read_i32(reader)?, read_i32(reader)?];
        let dimensions = [read_i32(reader)?, read_i32(reader)?, read_i32(reader)?];
        if dimensions != [CHUNK_DIMENSION; 3] {
            return Err(PersistenceError::InvalidDimensions {
                cell,
                dimensions,
                expected: CHUNK_DIMENSION,
            });
        }

        let mut bytes = vec![0u8; CHUNK_SIZE as usize];
        reader.read_exact(&mut bytes)?;
        log.insert(
            Point3::new(cell[0], cell[1], cell[2]),
            bytes.into_iter().map(BlockId).collect(),
        );
    }
    Ok(log)
}

/// Writes the edit log to `path`, creating parent folders as needed.
pub fn save_changes(path: impl AsRef<Path>, log: &EditLog) -> Result<(), PersistenceError> {
    let path = path.as_ref();
    create_parent(path)?;
    let mut writer = BufWriter::new(File::create(path)?);
    write_edit_log(&mut writer, log)?;
    writer.flush()?;
    Ok(())
}

/// Reads the edit log at `path`. A missing file is an empty log.
pub fn load_changes(path: impl AsRef<Path>) -> Result<EditLog, PersistenceError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(EditLog::new()),
        Err(err) => return Err(err.into()),
    };
    read_edit_log(&mut BufReader::new(file))
}

/// Replays saved snapshots into the world.
///
/// # Returns
/// The number of chunks restored.
pub fn apply_changes_to_world(world: &mut World, log: EditLog) -> Result<usize, TerrainError> {
    let count = log.len();
    for (position, blocks) in log {
        world.apply_snapshot(position, blocks)?;
    }
    Ok(count)
}

/// A save slot folder holding `seed.txt` and `chunks.bin`.
#[derive(Debug, Clone)]
pub struct WorldSave {
    folder: PathBuf,
}

impl WorldSave {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        WorldSave {
            folder: folder.into(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn seed_path(&self) -> PathBuf {
        self.folder.join(SEED_FILE)
    }

    pub fn changes_path(&self) -> PathBuf {
        self.folder.join(CHANGES_FILE)
    }

    /// Saves the world's seed and edit log.
    pub fn save(&self, world: &World) -> Result<(), PersistenceError> {
        save_seed(self.seed_path(), world.generator().seed())?;
        save_changes(self.changes_path(), world.edit_log())?;
        info!(
            "Saved seed {} and {} edited chunk(s) to {}",
            world.generator().seed(),
            world.edit_log().len(),
            self.folder.display()
        );
        Ok(())
    }

    pub fn load_seed(&self) -> Result<Option<i32>, PersistenceError> {
        load_seed(self.seed_path())
    }

    pub fn load_changes(&self) -> Result<EditLog, PersistenceError> {
        let log = load_changes(self.changes_path())?;
        info!("Loaded {} edited chunk(s) from {}", log.len(), self.folder.display());
        Ok(log)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn snapshot(fill: u8) -> Vec<BlockId> {
        let mut blocks = vec![BlockId::AIR; CHUNK_SIZE as usize];
        blocks[0] = BlockId(fill);
        blocks[CHUNK_SIZE as usize - 1] = BlockId(fill);
        blocks
    }

    #[test]
    fn header_layout_is_little_endian() {
        let mut log = EditLog::new();
        log.insert(Point3::new(-1, 2, 3), snapshot(7));
        let mut bytes = Vec::new();
        write_edit_log(&mut bytes, &log).unwrap();

        assert_eq!(bytes.len(), 4 + 24 + CHUNK_SIZE as usize);
        assert_eq!(&bytes[0..4], &1i32.to_le_bytes());
        assert_eq!(&bytes[4..8], &(-1i32).to_le_bytes());
        assert_eq!(&bytes[16..20], &32i32.to_le_bytes());
        assert_eq!(bytes[28], 7);
    }

    #[test]
    fn entries_are_written_in_coordinate_order() {
        let mut log = EditLog::new();
        log.insert(Point3::new(5, 0, 0), snapshot(1));
        log.insert(Point3::new(-5, 0, 0), snapshot(2));
        let mut bytes = Vec::new();
        write_edit_log(&mut bytes, &log).unwrap();
        assert_eq!(&bytes[4..8], &(-5i32).to_le_bytes());
    }

    #[test]
    fn wrong_dimensions_are_rejected() {
        let mut bytes = Vec::new();
        for value in [1, 0, 0, 0, 16, 16, 16] {
            bytes.extend_from_slice(&i32::to_le_bytes(value));
        }
        let result = read_edit_log(&mut Cursor::new(bytes));
        assert!(matches!(
            result,
            Err(PersistenceError::InvalidDimensions { dimensions: [16, 16, 16], .. })
        ));
    }

    #[test]
    fn negative_count_is_rejected() {
        let bytes = (-3i32).to_le_bytes().to_vec();
        assert!(matches!(
            read_edit_log(&mut Cursor::new(bytes)),
            Err(PersistenceError::NegativeCount(-3))
        ));
    }

    #[test]
    fn seed_text_round_trips_and_missing_seed_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(SEED_FILE);
        assert_eq!(load_seed(&path).unwrap(), None);
        save_seed(&path, -4711).unwrap();
        assert_eq!(load_seed(&path).unwrap(), Some(-4711));

        fs::write(&path, "not a number").unwrap();
        assert!(matches!(load_seed(&path), Err(PersistenceError::InvalidSeed(_))));
    }
}
