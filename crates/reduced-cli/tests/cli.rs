//! End-to-end runs of the `reduced` binary.

use std::process::{Command, Output};

fn reduced(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_reduced"))
        .args(args)
        .env_remove("REDUCED_ITERATIONS")
        .env_remove("REDUCED_BACKEND")
        .env_remove("REDUCED_THREADS")
        .env("REDUCED_TRACING_DIRECTIVES", "off")
        .output()
        .expect("failed to spawn reduced")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn dot_reports_all_phases() {
    let output = reduced(&["dot", "4ki", "--backend", "serial", "--iterations", "3"]);
    assert_eq!(output.status.code(), Some(0));

    let text = stdout(&output);
    assert!(text.starts_with("Everything's Reduced (v0.1)"));
    assert!(text.contains("Unit of time: milliseconds"));
    assert!(text.contains("Problem size: 4096"));
    for phase in ["Constructor:", "Setup:", "Run:", "Verify:", "Teardown:", "Sustained GB/s:"] {
        assert!(text.contains(phase), "missing {phase} in\n{text}");
    }
    assert!(output.stderr.is_empty(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn matrix_benchmark_takes_two_sizes() {
    let output = reduced(&["matvec_inner_product", "32", "1k", "--iterations", "2", "--threads", "2"]);
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("Problem size: 32 x 1000"));
    assert!(text.contains("MatVec Inner Product"));
    assert!(text.contains("2 dedicated threads"));
}

#[test]
fn usage_errors_exit_one() {
    assert_eq!(reduced(&[]).status.code(), Some(1));
    assert_eq!(reduced(&["not_a_benchmark", "10"]).status.code(), Some(1));
    assert_eq!(reduced(&["dot"]).status.code(), Some(1));
    assert_eq!(reduced(&["dot", "0"]).status.code(), Some(1));
    assert_eq!(reduced(&["dot", "-5"]).status.code(), Some(1));
    assert_eq!(reduced(&["dot", "12q"]).status.code(), Some(1));
    assert_eq!(reduced(&["inf_norm", "10"]).status.code(), Some(1));
}

#[test]
fn unavailable_backend_exits_one() {
    let output = reduced(&["dot", "16", "--backend", "gpu"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unavailable"));
}

#[test]
fn unknown_benchmark_lists_valid_names() {
    let output = reduced(&["dott", "16"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid benchmark: dott"));
    assert!(stderr.contains("matvec_group"));
}

#[test]
fn json_output_is_a_single_record() {
    let output = reduced(&["histogram", "1000", "--backend", "serial", "--iterations", "2", "--json"]);
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(!text.contains("Everything's Reduced"));
    assert!(text.trim_start().starts_with('{'));
    assert!(text.contains("\"benchmark\": \"histogram\""));
    assert!(text.contains("\"sizes\": [\n    1000\n  ]"));
    assert!(text.contains("\"verified\": true"));
    assert!(text.contains("\"sustained_gbps\""));
}

#[test]
fn help_exits_zero() {
    assert_eq!(reduced(&["--help"]).status.code(), Some(0));
    assert_eq!(reduced(&["--version"]).status.code(), Some(0));
}
