use std::io::Write;

use assert_cmd::Command;
use tempfile::NamedTempFile;

fn document(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn resty_match() -> Command {
    let mut command = Command::cargo_bin("resty-match").unwrap();
    command.env_remove("RESTY_PARTIAL").env_remove("RESTY_LOG");
    command
}

#[test]
fn match_prints_ok() {
    let actual = document(r#"{"status": "up", "uptime": 12}"#);
    let expected = document(r#"{"status": "up"}"#);

    resty_match()
        .arg(actual.path())
        .arg(expected.path())
        .assert()
        .success()
        .stdout("ok\n")
        .stderr("");
}

#[test]
fn mismatch_exits_one_with_diagnostic() {
    let actual = document(r#"{"items": [{"id": 1}]}"#);
    let expected = document(r#"{"items": [{"id": 2}]}"#);

    resty_match()
        .arg(actual.path())
        .arg(expected.path())
        .assert()
        .code(1)
        .stdout("")
        .stderr("items: not all expected values were found, missing: {\"id\":2}\n");
}

#[test]
fn actual_document_from_stdin() {
    let expected = document("[1, 2]");

    resty_match()
        .arg("-")
        .arg(expected.path())
        .write_stdin("[3, 2, 1]")
        .assert()
        .success()
        .stdout("ok\n");
}

#[test]
fn partial_flag_and_env() {
    let actual = document("<p>hello world</p>");
    let expected = document("hello");

    resty_match()
        .arg("--partial")
        .arg(actual.path())
        .arg(expected.path())
        .assert()
        .success()
        .stdout("ok\n");

    resty_match()
        .env("RESTY_PARTIAL", "true")
        .arg(actual.path())
        .arg(expected.path())
        .assert()
        .success();

    resty_match()
        .arg(actual.path())
        .arg(expected.path())
        .assert()
        .code(1);
}
