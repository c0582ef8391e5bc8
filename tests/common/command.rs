use crate::common::commit_id_from;
use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::fixture::ChildPath;
use assert_fs::prelude::PathChild;
use rstest::fixture;
use std::path::Path;

pub const REPO_NAME: &str = "demo";

/// A working directory paired with the directory that stands in for the bucket
pub struct Workspace {
    pub repo: TempDir,
    pub remote: TempDir,
}

impl Workspace {
    pub fn path(&self) -> &Path {
        self.repo.path()
    }

    pub fn child(&self, path: &str) -> ChildPath {
        self.repo.child(path)
    }

    pub fn run(&self, args: &[&str]) -> Command {
        run_orbit_command(self.repo.path(), self.remote.path(), args)
    }

    /// Commit and return the new commit id
    pub fn commit(&self, message: &str) -> String {
        let output = self.run(&["commit", message]).output().expect("Failed to run commit");
        assert!(
            output.status.success(),
            "commit failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        commit_id_from(&output.stdout)
    }

    /// Run in another directory against the same remote
    pub fn run_in(&self, dir: &Path, args: &[&str]) -> Command {
        run_orbit_command(dir, self.remote.path(), args)
    }
}

#[fixture]
pub fn workspace() -> Workspace {
    Workspace {
        repo: TempDir::new().expect("Failed to create temp dir"),
        remote: TempDir::new().expect("Failed to create temp dir"),
    }
}

#[fixture]
pub fn init_workspace(workspace: Workspace) -> Workspace {
    workspace
        .run(&["init", "--name", REPO_NAME])
        .assert()
        .success();

    workspace
}

pub fn run_orbit_command(dir: &Path, remote: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("orbit").expect("Failed to find orbit binary");
    cmd.envs(vec![
        ("NO_PAGER", "1".to_string()),
        ("NO_COLOR", "1".to_string()),
        ("ORBIT_REGISTRY_URL", String::new()),
        ("ORBIT_REMOTE_DIR", remote.display().to_string()),
        ("ORBIT_LOG", "warn".to_string()),
    ]);
    cmd.env_remove("S3_BUCKET");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}
