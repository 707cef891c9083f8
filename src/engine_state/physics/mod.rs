//! # Physics
//!
//! Spatial queries against the loaded chunks: axis-separated box collision for the
//! player body and grid-traversal raycasting for block picking. Both only read the
//! world, so they can run while a streaming batch is still in flight.

pub mod collision;
pub mod raycast;

pub use collision::Body;
pub use raycast::RaycastHit;
