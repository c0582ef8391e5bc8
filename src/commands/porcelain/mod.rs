//! Porcelain commands (user-facing operations)
//!
//! ## Commands
//!
//! - `init`: Create the repository layout and register it with the hosting service
//! - `add`: Stage files for commit
//! - `commit`: Snapshot the staging area into a new commit
//! - `push`: Mirror local commits to the remote object store
//! - `pull`: Fetch remote commits that are missing locally
//! - `revert`: Restore the files of a past commit
//! - `log`: Show commit history

pub mod add;
pub mod commit;
pub mod init;
pub mod log;
pub mod pull;
pub mod push;
pub mod revert;
