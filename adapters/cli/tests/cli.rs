use std::{fs, process::Command};

fn chase() -> Command {
    Command::new(env!("CARGO_BIN_EXE_chase"))
}

#[test]
fn auto_player_clears_a_small_board() {
    let dir = std::env::temp_dir().join(format!("chase-cli-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("session.toml");
    fs::write(
        &path,
        r#"
layout = ["     ", "     ", "   . ", "     ", "     "]
adversaries = []

[player]
start = { x = 2, y = 2 }
auto = true
"#,
    )
    .expect("write session file");

    let output = chase()
        .args(["--config", path.to_str().expect("utf-8 path"), "--ticks", "10"])
        .output()
        .expect("failed to run chase binary");

    assert!(output.status.success(), "chase exited with {:?}", output.status);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("outcome=won tick=1 score=1 remaining=0"),
        "unexpected output: {stdout}"
    );
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn trace_prints_one_snapshot_per_tick() {
    let output = chase()
        .args(["--ticks", "3", "--trace"])
        .output()
        .expect("failed to run chase binary");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let snapshots = stdout
        .lines()
        .filter(|line| line.starts_with('{'))
        .count();
    assert_eq!(snapshots, 4, "setup snapshot plus three ticks: {stdout}");
}

#[test]
fn missing_session_file_is_reported() {
    let output = chase()
        .args(["--config", "/nonexistent/chase/session.toml"])
        .output()
        .expect("failed to run chase binary");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to read session file"), "{stderr}");
}
