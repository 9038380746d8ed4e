//! Tests for the stratadoc binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use serde_json::{json, Value};
use tempfile::TempDir;

fn stratadoc(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_stratadoc"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run stratadoc")
}

fn write_sources(root: &Path) {
    fs::create_dir_all(root.join("src/geo")).unwrap();
    fs::write(
        root.join("src/geo/shapes.symbols.json"),
        r#"{ "meta": { "doc": "Shapes." },
             "publics": [ { "meta": { "name": "area", "type": "[Shape -> Float]" },
                            "value": { "kind": "function" } } ] }"#,
    )
    .unwrap();
    fs::write(
        root.join("src/geo/internal.symbols.json"),
        r#"{ "publics": [ { "meta": { "name": "helper" } } ] }"#,
    )
    .unwrap();
}

fn stdout_json(output: &Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is not JSON")
}

#[test]
fn extracts_default_source_path_to_stdout() {
    let tmp = TempDir::new().unwrap();
    write_sources(tmp.path());

    let output = stratadoc(tmp.path(), &["--exclude", "*.internal"]);
    assert!(output.status.success());
    assert_eq!(
        stdout_json(&output),
        json!([{
            "name": "geo.shapes",
            "doc": "Shapes.",
            "publics": [{ "name": "area", "type": "value" }]
        }])
    );
}

#[test]
fn type_sigs_flag_enables_checker() {
    let tmp = TempDir::new().unwrap();
    write_sources(tmp.path());

    let output = stratadoc(tmp.path(), &["--type-sigs", "--include", "geo.shapes"]);
    assert!(output.status.success());
    let value = stdout_json(&output);
    assert_eq!(value[0]["publics"][0]["type-sig"], json!("[Shape -> Float]"));
}

#[test]
fn config_file_sets_roots_and_output() {
    let tmp = TempDir::new().unwrap();
    write_sources(tmp.path());
    fs::write(
        tmp.path().join("stratadoc.toml"),
        "[extract]\nsource-paths = [\"src\"]\nexclude = [\"geo.shapes\"]\n\n[output]\npath = \"out/meta.json\"\npretty = true\n",
    )
    .unwrap();

    let output = stratadoc(tmp.path(), &[]);
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let written = fs::read_to_string(tmp.path().join("out/meta.json")).unwrap();
    let value: Value = serde_json::from_str(&written).unwrap();
    assert_eq!(value.as_array().map(Vec::len), Some(1));
    assert_eq!(value[0]["name"], json!("geo.internal"));
}

#[test]
fn strict_mode_fails_on_broken_module() {
    let tmp = TempDir::new().unwrap();
    write_sources(tmp.path());
    fs::write(tmp.path().join("src/broken.symbols.json"), "not json").unwrap();

    let lenient = stratadoc(tmp.path(), &["src"]);
    assert!(lenient.status.success());
    assert_eq!(stdout_json(&lenient).as_array().map(Vec::len), Some(2));

    let strict = stratadoc(tmp.path(), &["--strict", "src"]);
    assert!(!strict.status.success());
    let stderr = String::from_utf8_lossy(&strict.stderr);
    assert!(stderr.contains("broken"));
}

#[test]
fn missing_root_yields_empty_list() {
    let tmp = TempDir::new().unwrap();

    let output = stratadoc(tmp.path(), &["nowhere"]);
    assert!(output.status.success());
    assert_eq!(stdout_json(&output), json!([]));
}
