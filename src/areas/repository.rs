use crate::areas::commits::CommitStore;
use crate::areas::config::RepoConfig;
use crate::areas::layout::Layout;
use crate::areas::staging::StagingArea;
use crate::artifacts::core::error::OrbitError;
use crate::artifacts::remote::settings::SyncSettings;
use std::cell::{RefCell, RefMut};
use std::path::{Path, PathBuf};

pub struct Repository {
    path: Box<Path>,
    writer: RefCell<Box<dyn std::io::Write>>,
    layout: Layout,
    staging: StagingArea,
    commits: CommitStore,
    settings: SyncSettings,
}

impl Repository {
    pub fn new(path: &str, writer: Box<dyn std::io::Write>) -> anyhow::Result<Self> {
        let path = Path::new(path);
        if !path.exists() {
            std::fs::create_dir_all(path)?;
        }
        let path = path.canonicalize()?;

        let layout = Layout::new(&path);
        let staging = StagingArea::new(layout.staging_path().into_boxed_path());
        let commits = CommitStore::new(layout.commits_path().into_boxed_path());

        Ok(Repository {
            path: path.into_boxed_path(),
            writer: RefCell::new(writer),
            layout,
            staging,
            commits,
            settings: SyncSettings::default(),
        })
    }

    pub fn with_settings(mut self, settings: SyncSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    pub fn commits(&self) -> &CommitStore {
        &self.commits
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Read `config.json`; a repository that was never initialized has no config
    pub fn config(&self) -> anyhow::Result<RepoConfig> {
        let path = self.layout.config_path();

        RepoConfig::load(&path)?.ok_or_else(|| {
            OrbitError::config_missing(format!(
                "{} not found; run `init --name <repoName>` first",
                path.display()
            ))
            .into()
        })
    }

    /// Resolve a user-supplied path against the repository root
    pub fn resolve(&self, path: &str) -> PathBuf {
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.path.join(path)
        }
    }
}
