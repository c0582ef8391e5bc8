use crate::areas::repository::Repository;
use crate::artifacts::core::error::OrbitError;
use colored::Colorize;
use std::io::Write;

impl Repository {
    /// Stage one file, returning the name it is staged under
    pub fn stage_file(&self, path: &str) -> Result<String, OrbitError> {
        let source = self.resolve(path);
        let file_name = self.staging().stage(&source)?;

        tracing::debug!(source = %source.display(), %file_name, "file staged");
        Ok(file_name)
    }

    /// Stage every path independently
    ///
    /// A path that cannot be staged does not stop the others; the first failure is
    /// returned once all paths have been tried.
    pub fn add(&mut self, paths: &[String]) -> anyhow::Result<()> {
        let mut failures = Vec::new();

        for path in paths {
            match self.stage_file(path) {
                Ok(file_name) => {
                    writeln!(self.writer(), "File {} added to staging area.", file_name)?;
                }
                Err(e) => {
                    if paths.len() > 1 {
                        eprintln!("{} could not stage '{}': {}", "error:".red(), path, e);
                    }
                    failures.push(e);
                }
            }
        }

        let failed = failures.len();
        match failures.into_iter().next() {
            None => Ok(()),
            Some(first) if paths.len() == 1 => Err(first.into()),
            Some(first) => Err(anyhow::Error::new(first)
                .context(format!("{} of {} files could not be staged", failed, paths.len()))),
        }
    }
}
