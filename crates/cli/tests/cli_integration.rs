//! CLI integration tests for the `metricc` binary.
//!
//! Uses `assert_cmd` to spawn the binary and verify exit codes, stdout
//! content, and stderr content.
//!
//! All tests set `current_dir` to the workspace root so that relative
//! paths to conformance fixtures resolve correctly.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Locate the workspace root by walking up from CARGO_MANIFEST_DIR.
fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/cli -> workspace root is two levels up
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
        .to_path_buf()
}

/// Helper: create a Command for the `metricc` binary, rooted at workspace.
fn metricc() -> Command {
    let mut cmd = cargo_bin_cmd!("metricc");
    cmd.current_dir(workspace_root());
    cmd
}

const TEMPLATE: &str = "conformance/templates/metric.c";

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_builtin_table() {
    metricc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Compile metric descriptions into C"))
        .stdout(predicate::str::contains("available in decode routines"))
        .stdout(predicate::str::contains(
            "f_dt: number of times term occurs in current document",
        ));
}

#[test]
fn version_exits_0() {
    metricc()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("metricc"));
}

#[test]
fn short_version_flag_exits_0() {
    metricc()
        .arg("-v")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("metricc "));
}

#[test]
fn missing_arguments_exit_2_with_usage() {
    metricc()
        .args(["compile", "conformance/positive/bm25.metric"])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn unknown_option_exits_2() {
    metricc()
        .args(["compile", "--frobnicate", "a.metric", TEMPLATE])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty());
}

// ──────────────────────────────────────────────
// 2. compile
// ──────────────────────────────────────────────

#[test]
fn compile_cosine_exits_0() {
    metricc()
        .args(["compile", "conformance/positive/cosine.metric", TEMPLATE])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "/* cosine.c implements the cosine metric",
        ))
        .stdout(predicate::str::contains(
            " * conformance/positive/cosine.metric and conformance/templates/metric.c\n",
        ))
        .stdout(predicate::str::is_match(r"\n \* by \S*metricc(\.exe)? on ").unwrap())
        .stdout(predicate::str::contains("/* METRIC_NAME */ cosine ()"))
        .stdout(predicate::str::contains("#include \"metric.h\""));
}

#[test]
fn compile_scaled_parameter_substitutes_macros() {
    metricc()
        .args(["compile", "conformance/positive/scaled.metric", TEMPLATE])
        .assert()
        .success()
        .stdout(predicate::str::contains("    float s;\n"))
        .stdout(predicate::str::contains(
            "s = (opt->u.scaled.k1) * (acc->acc.weight);",
        ));
}

#[test]
fn compile_block_tree_propagation_is_accepted() {
    metricc()
        .args([
            "compile",
            "--propagation",
            "block-tree",
            "conformance/positive/dirichlet.metric",
            TEMPLATE,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("if (f_dt > 0) {"));
}

#[test]
fn compile_duplicate_builtin_exits_2() {
    metricc()
        .args([
            "compile",
            "conformance/negative/duplicate_builtin.metric",
            TEMPLATE,
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("duplicate_builtin.metric:2"))
        .stderr(predicate::str::contains("'f_t'"));
}

#[test]
fn compile_missing_terminator_exits_2() {
    metricc()
        .args([
            "compile",
            "conformance/negative/missing_terminator.metric",
            TEMPLATE,
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("missing_terminator.metric:2"))
        .stderr(predicate::str::contains("float s"));
}

#[test]
fn compile_negative_fixtures_exit_2() {
    let negative = workspace_root().join("conformance/negative");
    let mut count = 0;
    for entry in fs::read_dir(&negative).expect("negative fixtures") {
        let path = entry.expect("dir entry").path();
        if path.extension().and_then(|e| e.to_str()) != Some("metric") {
            continue;
        }
        count += 1;
        metricc()
            .arg("compile")
            .arg(&path)
            .arg(TEMPLATE)
            .assert()
            .code(2)
            .stdout(predicate::str::is_empty());
    }
    assert!(count >= 5, "expected negative fixtures, found {}", count);
}

#[test]
fn compile_nonexistent_description_exits_2() {
    metricc()
        .args(["compile", "nonexistent.metric", TEMPLATE])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("error opening file nonexistent.metric"));
}

#[test]
fn compile_nonexistent_template_exits_2() {
    metricc()
        .args([
            "compile",
            "conformance/positive/cosine.metric",
            "nonexistent.c",
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("error opening file nonexistent.c"));
}

#[test]
fn compile_template_without_header_exits_2() {
    let dir = TempDir::new().expect("temp dir");
    let template = dir.path().join("bare.c");
    fs::write(&template, "int x;\n").expect("write template");
    metricc()
        .arg("compile")
        .arg("conformance/positive/cosine.metric")
        .arg(&template)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid template"));
}

#[test]
fn compile_json_error_output() {
    let output = metricc()
        .args([
            "--output",
            "json",
            "compile",
            "conformance/negative/const_assign.metric",
            TEMPLATE,
        ])
        .assert()
        .code(2)
        .get_output()
        .stderr
        .clone();
    let err: serde_json::Value =
        serde_json::from_slice(&output).expect("stderr should be a JSON error object");
    assert_eq!(err["kind"]["kind"], "const_assignment");
    assert_eq!(err["kind"]["name"], "N");
    assert_eq!(err["line"], 2);
    assert_eq!(err["text"], "    N = 12;");
}

#[test]
fn compile_quiet_suppresses_errors() {
    metricc()
        .args([
            "--quiet",
            "compile",
            "conformance/negative/unexpected_line.metric",
            TEMPLATE,
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::is_empty());
}

#[test]
fn compile_description_from_temp_dir() {
    let dir = TempDir::new().expect("temp dir");
    let description = dir.path().join("Tf.metric");
    fs::write(
        &description,
        "decode() {\n    accumulator += f_dt;\n}\npost() {\n}\n",
    )
    .expect("write description");
    metricc()
        .arg("compile")
        .arg(&description)
        .arg(TEMPLATE)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("/* tf.c implements the Tf metric"))
        .stdout(predicate::str::contains("(acc->acc.weight) += f_dt;"))
        .stdout(predicate::str::contains("/* METRIC_DEPENDS_POST */ 0 ? post"));
}

// ──────────────────────────────────────────────
// 3. compile --debug
// ──────────────────────────────────────────────

#[test]
fn debug_text_dump_needs_no_template() {
    metricc()
        .args(["compile", "--debug", "conformance/positive/bm25.metric"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("comments\n"))
        .stdout(predicate::str::contains("\nparams\n"))
        .stdout(predicate::str::contains("\ndecode_used\n"))
        .stdout(predicate::str::contains("\npre\n"))
        .stdout(predicate::str::contains("METRIC_").not());
}

#[test]
fn debug_json_dump() {
    let output = metricc()
        .args([
            "--output",
            "json",
            "compile",
            "--debug",
            "conformance/positive/bm25.metric",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let dump: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert_eq!(dump["name"], "bm25");
    assert_eq!(dump["params"]["k1"]["macro"], "opt->u.bm25.k1");
    assert_eq!(dump["decode"]["decls"]["K"]["level"], 2);
    let pre = dump["prerequisites"].as_array().expect("prerequisites array");
    assert_eq!(pre.len(), 1);
    assert!(pre[0].as_str().unwrap().contains("DOCMAP_CACHE_BYTES"));
}

// ──────────────────────────────────────────────
// 4. builtins
// ──────────────────────────────────────────────

#[test]
fn builtins_lists_both_bodies() {
    metricc()
        .arg("builtins")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "these quantities are available in decode routines:",
        ))
        .stdout(predicate::str::contains(
            "these quantities are available in post routines:",
        ))
        .stdout(predicate::str::contains("    N: number of documents in the collection"));
}

#[test]
fn builtins_json_keeps_term_quantities_out_of_post() {
    let output = metricc()
        .args(["--output", "json", "builtins"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let table: serde_json::Value = serde_json::from_slice(&output).expect("valid JSON");
    assert!(table["decode"]["f_dt"].is_string());
    assert!(table["post"]["f_dt"].is_null());
    assert!(table["post"]["D_weight"].is_string());
}
