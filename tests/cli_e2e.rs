//! End-to-end tests for the chathisto binary.

#![cfg(feature = "cli")]

mod common;

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

use common::{page, text_message, two_fragment_export, write_files};

fn chathisto() -> Command {
    Command::cargo_bin("chathisto").unwrap()
}

#[test]
fn test_help() {
    chathisto()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--bins"))
        .stdout(predicate::str::contains("--utc-offset"))
        .stdout(predicate::str::contains("EXAMPLES"));
}

#[test]
fn test_version() {
    chathisto()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_renders_chart() {
    let dir = two_fragment_export();

    chathisto()
        .arg(dir.path())
        .args(["--bins", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 messages in 2 fragments"))
        .stdout(predicate::str::contains(
            "# messages from Jan 01, 2021 to Jan 01, 2021:\n3\n",
        ))
        .stdout(predicate::str::contains("Skipped 2 non-text entries"))
        .stdout(predicate::str::contains("█"))
        .stdout(predicate::str::contains("✅ Done!"));
}

#[test]
fn test_custom_date_format() {
    let dir = two_fragment_export();

    chathisto()
        .arg(dir.path())
        .args(["--date-format", "%Y-%m-%d %H:%M"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "# messages from 2021-01-01 10:00 to 2021-01-01 10:10:",
        ));
}

#[test]
fn test_no_chart() {
    let dir = two_fragment_export();

    chathisto()
        .arg(dir.path())
        .arg("--no-chart")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 messages"))
        .stdout(predicate::str::contains("# messages from").not());
}

#[test]
fn test_export_json() {
    let dir = two_fragment_export();
    let out = dir.path().join("bins.json");

    chathisto()
        .arg(dir.path())
        .args(["--bins", "3", "--no-chart", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("Writing JSON"));

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["total"], 3);
    assert_eq!(value["bins"].as_array().unwrap().len(), 3);
    assert_eq!(
        value["title"],
        "# messages from Jan 01, 2021 to Jan 01, 2021:\n3"
    );
}

#[test]
fn test_export_csv_and_jsonl() {
    let dir = two_fragment_export();
    let csv = dir.path().join("bins.csv");
    let jsonl = dir.path().join("bins.out");

    chathisto()
        .arg(dir.path())
        .args(["--bins", "4", "--no-chart", "-o"])
        .arg(&csv)
        .assert()
        .success();
    let content = fs::read_to_string(&csv).unwrap();
    assert!(content.starts_with("BinStart;BinEnd;Count;Density"));
    assert_eq!(content.lines().count(), 5);

    chathisto()
        .arg(dir.path())
        .args(["--bins", "4", "--no-chart", "-f", "ndjson", "-o"])
        .arg(&jsonl)
        .assert()
        .success()
        .stdout(predicate::str::contains("Writing JSONL"));
    assert_eq!(fs::read_to_string(&jsonl).unwrap().lines().count(), 4);
}

#[test]
fn test_empty_directory() {
    let dir = tempdir().unwrap();

    chathisto()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 0 messages in 0 fragments"))
        .stdout(predicate::str::contains("nothing to plot"))
        .stdout(predicate::str::contains("No messages found in"));
}

#[test]
fn test_malformed_timestamp_fails() {
    let dir = tempdir().unwrap();
    write_files(
        dir.path(),
        &[
            ("messages.html", page(&[text_message(1, "01.01.2021 10:00:00")])),
            ("messages2.html", page(&[text_message(2, "2021-01-01 10:00:00")])),
        ],
    );

    chathisto()
        .arg(dir.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error"))
        .stderr(predicate::str::contains("messages2.html"))
        .stderr(predicate::str::contains("DD.MM.YYYY HH:MM:SS"));
}

#[test]
fn test_missing_directory_fails() {
    let dir = tempdir().unwrap();

    chathisto()
        .arg(dir.path().join("ChatExport_missing"))
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Cannot list directory"))
        .stderr(predicate::str::contains("ChatExport_missing"));
}

#[test]
fn test_zero_bins_rejected() {
    let dir = two_fragment_export();

    chathisto()
        .arg(dir.path())
        .args(["--bins", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_huge_bin_count_rejected() {
    let dir = two_fragment_export();

    chathisto()
        .arg(dir.path())
        .args(["--bins", "18446744073709551615"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("exceeds the maximum"));
}

#[test]
fn test_bad_utc_offset_rejected() {
    let dir = two_fragment_export();

    chathisto()
        .arg(dir.path())
        .args(["--utc-offset", "two hours"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_utc_offset() {
    let dir = two_fragment_export();

    chathisto()
        .arg(dir.path())
        .args(["--utc-offset", "+02:00", "--no-chart"])
        .assert()
        .success()
        .stdout(predicate::str::contains("UTC+02:00"))
        .stdout(predicate::str::contains("2021-01-01 10:00:00 → 2021-01-01 10:10:00"));
}

#[test]
fn test_custom_prefix() {
    let dir = tempdir().unwrap();
    write_files(
        dir.path(),
        &[
            ("chat.htm", page(&[text_message(1, "01.01.2021 10:00:00")])),
            ("chat2.htm", page(&[text_message(2, "01.01.2021 11:00:00")])),
            ("messages.html", page(&[text_message(3, "01.01.2021 12:00:00")])),
        ],
    );

    chathisto()
        .arg(dir.path())
        .args(["--prefix", "chat", "--suffix", ".htm", "--no-chart"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 messages in 2 fragments"));
}
