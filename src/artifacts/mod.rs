//! Value types and collaborators used by the commands
//!
//! - `core`: Error taxonomy and the pager writer
//! - `objects`: Commit identifiers and commit metadata records
//! - `remote`: The object store seam and its directory, S3 and in-memory backends
//! - `sync`: Bounded transfer pool and per-object reports for push and pull
//! - `registry`: Repository registration with the hosting service

pub mod core;
pub mod objects;
pub mod registry;
pub mod remote;
pub mod sync;
