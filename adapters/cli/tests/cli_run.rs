use std::process::Command;

fn schelling(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_schelling"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to launch schelling binary")
}

#[test]
fn seeded_run_ends_with_termination_line() {
    let output = schelling(&[
        "--height", "10", "--width", "10", "--population", "60", "--seed", "17", "--frames",
        "final",
    ]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf-8");
    assert_eq!(stdout.matches("Iteration: ").count(), 1);
    let last = stdout.lines().last().expect("output");
    assert!(last.starts_with("The simulation terminated in "));
    assert!(last.ends_with(" iteration(s)"));
}

#[test]
fn identical_seeds_print_identical_runs() {
    let args = [
        "--height", "12", "--width", "9", "--population", "70", "--fractions", "0.4,0.3,0.3",
        "--threshold", "0.6", "--seed", "2024",
    ];
    let first = schelling(&args);
    let second = schelling(&args);

    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn json_summary_is_machine_readable() {
    let output = schelling(&[
        "--height", "8", "--width", "8", "--population", "32", "--seed", "5", "--json",
    ]);

    assert!(output.status.success());
    let summary: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout holds a single JSON document");
    assert_eq!(summary["seed"], 5);
    assert_eq!(summary["population"], 32);
    assert_eq!(summary["report"]["occupied"], 32);
}

#[test]
fn overflowing_population_fails() {
    let output = schelling(&["--height", "2", "--width", "2", "--population", "4"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).expect("utf-8");
    assert!(stderr.contains("failed to place residents"));
}
