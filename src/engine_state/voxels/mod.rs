//! # Voxel Terrain Core
//!
//! Representation, generation, editing and persistence of an unbounded block world.
//!
//! ## Architecture
//!
//! * **Block**: a one-byte material id, `0` being air
//! * **Chunk**: a 32x32x32 block array plus the mesh built from it
//! * **Generator**: the seeded noise function every untouched block comes from
//! * **World**: the single owner of all loaded chunks, the edit log and the mesh
//!   hand-off queue
//! * **Streaming**: loads chunks near the observer and evicts far ones
//! * **Storage**: seed and edit log on disk
//!
//! ## Data Flow
//!
//! 1. The streamer requests missing chunks; workers generate and mesh them in isolation
//! 2. The world publishes finished chunks and queues an upload for each
//! 3. Block edits go through the world, which re-meshes the owning chunk and every
//!    loaded neighbor whose faces or shading depend on the edited block
//! 4. Edited chunks are snapshotted into the edit log, which is what gets saved
//!
//! ## Thread Safety
//!
//! Only the thread that owns the [`world::World`] mutates chunks. Workers receive
//! shared handles to the generator and atlas, both immutable after start-up.

pub mod block;
pub mod block_source;
pub mod chunk;
pub mod edits;
pub mod generator;
pub mod position;
pub mod storage;
pub mod streaming;
pub mod tasks;
pub mod world;
