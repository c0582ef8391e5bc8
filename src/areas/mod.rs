//! Core repository components
//!
//! This module contains the on-disk building blocks of a repository:
//!
//! - `layout`: The `.mygitorbit` directory structure and idempotent directory creation
//! - `config`: The `config.json` record naming the repository and its bucket
//! - `staging`: Staging area holding files pending commit
//! - `commits`: Read access to committed snapshots and their metadata
//! - `repository`: High-level repository handle coordinating the areas

pub mod commits;
pub mod config;
pub mod layout;
pub mod repository;
pub mod staging;
