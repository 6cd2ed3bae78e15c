use std::{
    fs,
    io::Write,
    path::Path,
    process::{Command, Output, Stdio},
};

fn run_wumpus(args: &[&str], dir: &Path, script: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_wumpus"))
        .current_dir(dir)
        .args(args)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to launch the wumpus binary");

    // A binary that fails at startup may close stdin before reading the script.
    let _ = child
        .stdin
        .take()
        .expect("piped stdin")
        .write_all(script.as_bytes());
    child.wait_with_output().expect("wumpus output")
}

#[test]
fn scripted_session_walks_the_menu() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("scores.txt"), "[Name]\nAda\n[Moves]\n7\n").expect("seed scores");

    let output = run_wumpus(
        &["--config", "absent.toml", "--scores", "scores.txt", "--seed", "3"],
        dir.path(),
        "4\n\n2\n4\n3\n",
    );
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.starts_with("Welcome to Hunt the Wumpus."));
    assert!(stdout.contains("Ada"));
    assert!(stdout.contains("Difficulty set to 4."));
    assert!(stdout.contains("You are in room"));
    assert!(stdout.trim_end().ends_with("Farewell, hunter."));
}

#[test]
fn broken_score_file_stops_startup() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("scores.txt"), "not a ledger\n").expect("seed scores");

    let output = run_wumpus(&["--config", "absent.toml", "--scores", "scores.txt"], dir.path(), "5\n");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load high scores"));
}

#[test]
fn empty_quiver_in_config_stops_startup() {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(dir.path().join("wumpus.toml"), "arrows = 0\n").expect("write config");

    let output = run_wumpus(&["--scores", "scores.txt"], dir.path(), "5\n");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("arrows must be at least 1"));
}
