#![allow(clippy::unwrap_used)]
#![allow(missing_docs)]

use assert_cmd::cargo_bin_cmd;
use cinefind_db::{SearchHit, open_db, record_search};
use predicates::prelude::{PredicateBooleanExt, predicate};

#[test]
fn test_help_lists_subcommands() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("browse"))
        .stdout(predicate::str::contains("search"))
        .stdout(predicate::str::contains("trending"));
}

#[test]
fn test_search_help() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.args(["search", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--query"));
}

#[test]
fn test_search_requires_api_token() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.env_remove("TMDB_API_TOKEN")
        .arg("--dir")
        .arg(dir.path())
        .args(["search", "--query", "heat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TMDB_API_TOKEN"));
}

#[test]
fn test_search_rejects_invalid_base_url() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "[catalog]\nbase_url = \"not a url\"\n",
    )
    .unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.env("TMDB_API_TOKEN", "test-token")
        .arg("--dir")
        .arg(dir.path())
        .args(["search", "--query", "heat"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid catalog base_url"));
}

#[test]
fn test_trending_empty_store() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.env("RUST_LOG", "info")
        .arg("--dir")
        .arg(dir.path())
        .arg("trending")
        .assert()
        .success()
        .stdout(predicate::str::contains("No trending searches yet"));
}

#[test]
fn test_trending_lists_recorded_searches() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let dir_path = dir.path().to_path_buf();
    {
        let conn = open_db(Some(&dir_path)).unwrap();
        let heat = SearchHit {
            movie_id: 949,
            title: String::from("Heat"),
            poster_url: None,
        };
        let alien = SearchHit {
            movie_id: 348,
            title: String::from("Alien"),
            poster_url: None,
        };
        record_search(&conn, "heat", &heat).unwrap();
        record_search(&conn, "heat", &heat).unwrap();
        record_search(&conn, "alien", &alien).unwrap();
    }

    // Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.env("RUST_LOG", "info")
        .arg("--dir")
        .arg(&dir_path)
        .args(["trending", "--limit", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Heat"))
        .stdout(predicate::str::contains("Alien").not());
}

#[test]
fn test_trending_rejects_invalid_limit() {
    // Arrange & Act & Assert
    let mut cmd = cargo_bin_cmd!("cinefind");
    cmd.args(["trending", "--limit", "many"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--limit"));
}
