//! Staging area
//!
//! Files are staged by copying their bytes into `.mygitorbit/staged/` under their
//! base name. The staging area is flat: staging `a/notes.txt` and `b/notes.txt`
//! leaves a single `notes.txt` holding the bytes of whichever was added last.
//! `commit.json` is reserved for commit metadata and cannot be staged.

use crate::areas::layout::{ensure_dir, list_file_names};
use crate::artifacts::core::error::{IoResultExt, OrbitError};
use crate::artifacts::objects::commit_record::COMMIT_RECORD_FILE;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct StagingArea {
    path: Box<Path>,
}

impl StagingArea {
    pub fn new(path: Box<Path>) -> Self {
        StagingArea { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy `source` into the staging area, replacing any staged file of the same name
    ///
    /// Returns the base name the file is staged under.
    pub fn stage(&self, source: &Path) -> Result<String, OrbitError> {
        if !source.exists() {
            return Err(OrbitError::FileNotFound {
                path: source.to_path_buf(),
            });
        }

        if !source.is_file() {
            return Err(OrbitError::io(
                source,
                io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
            ));
        }

        let file_name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                OrbitError::io(
                    source,
                    io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
                )
            })?;
        if file_name == COMMIT_RECORD_FILE {
            return Err(OrbitError::io(
                source,
                io::Error::new(io::ErrorKind::InvalidInput, "reserved file name"),
            ));
        }

        ensure_dir(&self.path)?;
        std::fs::copy(source, self.path.join(&file_name)).at_path(source)?;

        Ok(file_name)
    }

    /// Names of the files currently staged, sorted by name
    pub fn staged_files(&self) -> Result<Vec<String>, OrbitError> {
        list_file_names(&self.path)
    }

    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }

    /// Remove the given files from the staging area
    ///
    /// Files that are already gone are skipped.
    pub fn unstage(&self, file_names: &[String]) -> Result<(), OrbitError> {
        for file_name in file_names {
            let path = self.file_path(file_name);
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(OrbitError::io(path, e)),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::TempDir;
    use assert_fs::prelude::*;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn workdir() -> TempDir {
        TempDir::new().unwrap()
    }

    fn staging_in(workdir: &TempDir) -> StagingArea {
        StagingArea::new(workdir.path().join("staged").into_boxed_path())
    }

    #[rstest]
    fn staging_the_same_name_twice_keeps_the_last_copy(workdir: TempDir) {
        let staging = staging_in(&workdir);
        workdir.child("a").child("notes.txt").write_str("first").unwrap();
        workdir.child("b").child("notes.txt").write_str("second").unwrap();

        staging.stage(&workdir.path().join("a/notes.txt")).unwrap();
        let name = staging.stage(&workdir.path().join("b/notes.txt")).unwrap();

        assert_eq!(name, "notes.txt");
        assert_eq!(staging.staged_files().unwrap(), vec!["notes.txt"]);
        assert_eq!(
            std::fs::read_to_string(staging.file_path("notes.txt")).unwrap(),
            "second"
        );
    }

    #[rstest]
    fn missing_source_leaves_the_staging_area_untouched(workdir: TempDir) {
        let staging = staging_in(&workdir);

        let result = staging.stage(&workdir.path().join("missing.txt"));

        assert!(matches!(result, Err(OrbitError::FileNotFound { .. })));
        assert!(!staging.path().exists());
    }

    #[rstest]
    fn directories_cannot_be_staged(workdir: TempDir) {
        let staging = staging_in(&workdir);
        workdir.child("dir").create_dir_all().unwrap();

        let result = staging.stage(&workdir.path().join("dir"));

        assert!(matches!(result, Err(OrbitError::Io { .. })));
    }

    #[rstest]
    fn commit_metadata_name_is_reserved(workdir: TempDir) {
        let staging = staging_in(&workdir);
        workdir.child("commit.json").write_str("{}").unwrap();

        let result = staging.stage(&workdir.path().join("commit.json"));

        assert!(matches!(result, Err(OrbitError::Io { .. })));
        assert!(!staging.path().exists());
    }

    #[rstest]
    fn unstage_skips_files_that_are_gone(workdir: TempDir) {
        let staging = staging_in(&workdir);
        workdir.child("x.txt").write_str("x").unwrap();
        staging.stage(&workdir.path().join("x.txt")).unwrap();

        staging
            .unstage(&["x.txt".to_string(), "never-staged.txt".to_string()])
            .unwrap();

        assert!(staging.staged_files().unwrap().is_empty());
    }
}
