use std::process::{Command, Output};

fn run_number_guess(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_number-guess"))
        .args(args)
        .output()
        .expect("Failed to execute number-guess")
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_single_worker_finds_17() {
    let output = run_number_guess(&["--target", "17", "--workers", "1"]);

    assert!(
        output.status.success(),
        "Command failed with status: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_lines(&output), vec!["Found it: 17".to_string()]);
}

#[test]
fn test_default_workers_report_found_once() {
    let output = run_number_guess(&["--target", "4096"]);

    assert_eq!(output.status.code(), Some(0));
    let found: Vec<_> = stdout_lines(&output)
        .into_iter()
        .filter(|line| line.starts_with("Found it"))
        .collect();
    assert_eq!(found, vec!["Found it: 4096".to_string()]);
}

#[test]
fn test_every_lane_width_finds_target() {
    for lanes in ["1", "2", "4", "8"] {
        let output = run_number_guess(&["--target", "99", "--lanes", lanes, "--portable"]);
        assert_eq!(output.status.code(), Some(0), "lanes = {}", lanes);
        assert!(
            stdout_lines(&output).contains(&"Found it: 99".to_string()),
            "lanes = {}",
            lanes
        );
    }
}

#[test]
fn test_target_in_last_block() {
    // Worker 3 of 4 starts at 3 * (i64::MAX / 4) and reaches this within a few steps.
    let value = 3 * (i64::MAX / 4) + 100;
    let target = value.to_string();
    let output = run_number_guess(&["--target", &target]);

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout_lines(&output), vec![format!("Found it: {}", value)]);
}

#[test]
fn test_invalid_lane_width_fails() {
    let output = run_number_guess(&["--lanes", "3", "--target", "17"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unsupported lane width 3"), "stderr: {}", stderr);
}

#[test]
fn test_invalid_target_fails() {
    let output = run_number_guess(&["--target", "0"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("outside the search domain"), "stderr: {}", stderr);
}
