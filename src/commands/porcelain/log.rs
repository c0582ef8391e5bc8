use crate::areas::commits::CommitSummary;
use crate::areas::repository::Repository;
use colored::Colorize;
use std::io::Write;

const NO_METADATA: &str = "(no metadata)";

#[derive(Debug, Clone, Copy, Default)]
pub struct LogOptions {
    pub oneline: bool,
    pub abbrev_commit: bool,
}

impl Repository {
    /// List local commits, newest first
    pub fn log(&self, opts: &LogOptions) -> anyhow::Result<()> {
        for (index, summary) in self.commits().history()?.iter().enumerate() {
            if opts.oneline {
                self.show_commit_oneline(summary, opts.abbrev_commit)?;
            } else {
                if index > 0 {
                    writeln!(self.writer())?;
                }
                self.show_commit_medium(summary, opts.abbrev_commit)?;
            }
        }

        Ok(())
    }

    fn show_commit_medium(
        &self,
        summary: &CommitSummary,
        abbrev_commit: bool,
    ) -> anyhow::Result<()> {
        writeln!(
            self.writer(),
            "{}",
            format!("commit {}", abbrev_commit_id(summary, abbrev_commit)).yellow()
        )?;

        match &summary.record {
            Some(record) => {
                writeln!(self.writer(), "Date:   {}", record.readable_date())?;
                writeln!(self.writer())?;
                for message_line in record.message().lines() {
                    writeln!(self.writer(), "    {}", message_line)?;
                }
            }
            None => writeln!(self.writer(), "    {}", NO_METADATA.dimmed())?,
        }

        Ok(())
    }

    fn show_commit_oneline(
        &self,
        summary: &CommitSummary,
        abbrev_commit: bool,
    ) -> anyhow::Result<()> {
        let message = match &summary.record {
            Some(record) => record.short_message().normal(),
            None => NO_METADATA.dimmed(),
        };
        writeln!(
            self.writer(),
            "{} {}",
            abbrev_commit_id(summary, abbrev_commit).yellow(),
            message
        )?;

        Ok(())
    }
}

fn abbrev_commit_id(summary: &CommitSummary, abbrev_commit: bool) -> String {
    if abbrev_commit {
        summary.id.to_short_id()
    } else {
        summary.id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::LogOptions;
    use crate::areas::repository::Repository;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn take(&self) -> String {
            String::from_utf8(std::mem::take(&mut *self.0.lock().unwrap())).unwrap()
        }
    }

    #[tokio::test]
    async fn oneline_log_lists_newest_first() {
        colored::control::set_override(false);
        let dir = TempDir::new().unwrap();
        let output = SharedBuffer::default();
        let mut repository =
            Repository::new(&dir.path().to_string_lossy(), Box::new(output.clone())).unwrap();
        let first = repository.commit("first", false).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = repository.commit("second\n\nbody", false).await.unwrap();
        output.take();

        repository
            .log(&LogOptions {
                oneline: true,
                abbrev_commit: false,
            })
            .unwrap();

        assert_eq!(
            output.take(),
            format!("{} second\n{} first\n", second, first)
        );
    }

    #[tokio::test]
    async fn commits_without_a_record_are_still_listed() {
        colored::control::set_override(false);
        let dir = TempDir::new().unwrap();
        let output = SharedBuffer::default();
        let mut repository =
            Repository::new(&dir.path().to_string_lossy(), Box::new(output.clone())).unwrap();
        let id = repository.commit("gone", false).await.unwrap();
        std::fs::remove_file(repository.commits().commit_path(&id).join("commit.json")).unwrap();
        output.take();

        repository.log(&LogOptions::default()).unwrap();

        assert_eq!(output.take(), format!("commit {}\n    (no metadata)\n", id));
    }
}
