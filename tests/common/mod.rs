#![allow(dead_code)]

pub mod command;
pub mod file;

/// Pull the commit id out of the line printed by `commit`
pub fn commit_id_from(stdout: &[u8]) -> String {
    let stdout = String::from_utf8_lossy(stdout);

    stdout
        .lines()
        .find_map(|line| line.strip_prefix("Commit created with id "))
        .and_then(|rest| rest.split_whitespace().next())
        .map(str::to_string)
        .unwrap_or_else(|| panic!("no commit id in output: {}", stdout))
}
