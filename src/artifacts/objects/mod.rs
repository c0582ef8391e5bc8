//! Commit object types
//!
//! A commit is a directory of file copies plus a metadata record:
//!
//! - **CommitId**: random identifier naming the commit directory
//! - **CommitRecord**: the `commit.json` message and capture date

pub mod commit_id;
pub mod commit_record;
