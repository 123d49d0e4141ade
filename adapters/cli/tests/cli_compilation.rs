use std::process::Command;

#[test]
fn schelling_binary_type_checks_cleanly() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "schelling"])
        .status()
        .expect("cargo should be available to the test harness");

    assert!(
        status.success(),
        "the simulation driver must type-check under the workspace lint gate"
    );
}
