use crate::common::command::{REPO_NAME, Workspace, init_workspace, run_orbit_command, workspace};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::Path;

mod common;

fn remote_object(workspace: &Workspace, commit_id: &str, file_name: &str) -> std::path::PathBuf {
    workspace
        .remote
        .path()
        .join(REPO_NAME)
        .join("commits")
        .join(commit_id)
        .join(file_name)
}

fn read_tree(root: &Path) -> Vec<(String, Vec<u8>)> {
    let mut entries = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            (
                entry
                    .path()
                    .strip_prefix(root)
                    .unwrap_or(entry.path())
                    .display()
                    .to_string(),
                std::fs::read(entry.path()).unwrap_or_default(),
            )
        })
        .collect::<Vec<_>>();
    entries.sort();
    entries
}

#[rstest]
fn push_mirrors_commits_under_the_repository_prefix(
    init_workspace: Workspace,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(init_workspace.path().join("foo.txt"), "hello")?;
    init_workspace.run(&["add", "foo.txt"]).assert().success();
    let commit_id = init_workspace.commit("first");

    init_workspace
        .run(&["push"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All commits for repo 'demo' pushed."));

    assert_eq!(
        std::fs::read_to_string(remote_object(&init_workspace, &commit_id, "foo.txt"))?,
        "hello"
    );
    let record: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(
        remote_object(&init_workspace, &commit_id, "commit.json"),
    )?)?;
    assert_eq!(record["message"], "first");

    Ok(())
}

#[rstest]
fn pushing_twice_is_idempotent(
    init_workspace: Workspace,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(init_workspace.path().join("a.txt"), "a")?;
    init_workspace.run(&["add", "a.txt"]).assert().success();
    init_workspace.commit("first");

    init_workspace.run(&["push"]).assert().success();
    let after_first = read_tree(init_workspace.remote.path());
    init_workspace.run(&["push"]).assert().success();

    assert_eq!(read_tree(init_workspace.remote.path()), after_first);

    Ok(())
}

#[rstest]
fn push_without_init_fails_and_uploads_nothing(workspace: Workspace) {
    workspace
        .run(&["push"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing configuration"));

    assert!(read_tree(workspace.remote.path()).is_empty());
}

#[rstest]
fn push_without_any_remote_is_a_config_error(init_workspace: Workspace) {
    run_orbit_command(init_workspace.path(), init_workspace.remote.path(), &["push"])
        .env_remove("ORBIT_REMOTE_DIR")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no remote bucket"));
}

#[rstest]
fn pull_fetches_commits_pushed_from_another_directory(
    init_workspace: Workspace,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(init_workspace.path().join("foo.txt"), "hello")?;
    init_workspace.run(&["add", "foo.txt"]).assert().success();
    let commit_id = init_workspace.commit("first");
    init_workspace.run(&["push"]).assert().success();

    let other = TempDir::new()?;
    init_workspace
        .run_in(other.path(), &["init", "--name", REPO_NAME])
        .assert()
        .success();
    init_workspace
        .run_in(other.path(), &["pull"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Pulled 2 objects (0 already present) for repo 'demo'.",
        ));

    let pulled = other
        .path()
        .join(".mygitorbit/commits")
        .join(&commit_id)
        .join("foo.txt");
    assert_eq!(std::fs::read_to_string(pulled)?, "hello");

    Ok(())
}

#[rstest]
fn pull_never_rewrites_or_removes_local_commits(
    init_workspace: Workspace,
) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::write(init_workspace.path().join("foo.txt"), "hello")?;
    init_workspace.run(&["add", "foo.txt"]).assert().success();
    let pushed = init_workspace.commit("pushed");
    init_workspace.run(&["push"]).assert().success();
    let local_only = init_workspace.commit("local only");

    let local_copy = init_workspace
        .path()
        .join(".mygitorbit/commits")
        .join(&pushed)
        .join("foo.txt");
    std::fs::write(&local_copy, "edited locally")?;

    init_workspace
        .run(&["pull"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(2 already present)"));

    assert_eq!(std::fs::read_to_string(&local_copy)?, "edited locally");
    assert!(
        init_workspace
            .path()
            .join(".mygitorbit/commits")
            .join(&local_only)
            .is_dir()
    );

    Ok(())
}
