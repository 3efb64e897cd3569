use assert_cmd::Command;

#[test]
fn help_lists_graceful_timeout() {
    let output = Command::cargo_bin("bookshelf")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--graceful-timeout"));
}

#[test]
fn malformed_graceful_timeout_fails() {
    Command::cargo_bin("bookshelf")
        .unwrap()
        .args(["--graceful-timeout", "fifteen"])
        .assert()
        .failure();
}
