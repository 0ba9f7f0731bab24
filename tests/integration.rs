use predicates::prelude::*;
use std::io::Write;
use std::process::Command;
use tempfile::{NamedTempFile, TempDir};

fn cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_dtsdoc")));
    cmd.env_remove("DTSDOC_FORMAT").env_remove("DTSDOC_LOG");
    cmd
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
    String::from_utf8(assert.get_output().stdout.clone()).unwrap()
}

// -- stdin mode --

#[test]
fn stdin_mode_produces_declarations() {
    let input = std::fs::read_to_string(fixture_path("shapes.js")).unwrap();
    let expected = std::fs::read_to_string(fixture_path("shapes.expected.d.ts")).unwrap();

    let assert = cmd().write_stdin(input).assert().success();
    assert_eq!(stdout_of(&assert), expected);
}

#[test]
fn stdin_mode_class_syntax() {
    let input = std::fs::read_to_string(fixture_path("classes.js")).unwrap();
    let expected = std::fs::read_to_string(fixture_path("classes.expected.d.ts")).unwrap();

    let assert = cmd().write_stdin(input).assert().success();
    assert_eq!(stdout_of(&assert), expected);
}

#[test]
fn stdin_mode_single_function() {
    cmd()
        .write_stdin("/** @param {string} name @return {number} */ function f(name) {}")
        .assert()
        .success()
        .stdout("declare function f(name: string): number;\n");
}

#[test]
fn stdin_mode_enum() {
    cmd()
        .write_stdin("/** @enum */ var Color = { RED: 1, BLUE: 2 };")
        .assert()
        .success()
        .stdout("declare var Color: { RED: 1, BLUE: 2 };\ndeclare type ColorValue = 1|2;\n");
}

#[test]
fn stdin_mode_inline() {
    let input = std::fs::read_to_string(fixture_path("shapes.js")).unwrap();

    let assert = cmd().arg("--inline").write_stdin(input).assert().success();
    let output = stdout_of(&assert);
    assert!(output.contains("function Point(x/* : number*/, y/* : number*/) {\n"));
    assert!(output.contains("function (other/* : Point*/) {/* : number*/ \n"));
    assert!(output.contains("function (unit/* : geo.Unit*/, options/* : ?Object*/) {/* : string | number*/ \n"));
    assert!(output.contains("isPoint: function (value/* : any*/) {/* : boolean*/ \n"));
    assert!(output.contains("function helper(a) {\n"));
    // Enums are untouched.
    assert!(output.contains("geo.Unit = {\n  METRE: 'm',\n"));
}

#[test]
fn inline_preserves_undocumented_source() {
    let input = "function g(x){}\n\n// trailing\n";
    cmd()
        .arg("--inline")
        .write_stdin(input)
        .assert()
        .success()
        .stdout(input);
}

#[test]
fn undocumented_source_declares_nothing() {
    cmd().write_stdin("function g(x){}").assert().success().stdout("");
}

#[test]
fn json_format_dumps_tree() {
    let input = std::fs::read_to_string(fixture_path("shapes.js")).unwrap();

    let assert = cmd().args(["-f", "json"]).write_stdin(input).assert().success();
    let value: serde_json::Value = serde_json::from_str(&stdout_of(&assert)).unwrap();
    assert_eq!(value["Point"]["meta"]["kind"], "class");
    assert_eq!(value["Point"]["distance"]["meta"]["kind"], "method");
    assert_eq!(value["Point"]["distance"]["meta"]["returnType"], "number");
    assert_eq!(value["geo"]["Unit"]["meta"]["enumValues"][1], "'ft'");
    assert_eq!(value["util"]["isPoint"]["meta"]["params"][0], "value: any");
}

#[test]
fn format_from_environment() {
    cmd()
        .env("DTSDOC_FORMAT", "json")
        .write_stdin("var x = 1;")
        .assert()
        .success()
        .stdout("{}\n");
}

#[test]
fn unknown_format_fails() {
    cmd()
        .args(["-f", "yaml"])
        .write_stdin("var x = 1;")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format: yaml"));
}

// -- file mode --

#[test]
fn file_mode_creates_output() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("shapes.js"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("shapes.d.ts")).unwrap();
    let expected = std::fs::read_to_string(fixture_path("shapes.expected.d.ts")).unwrap();
    assert_eq!(output, expected);
}

#[test]
fn file_mode_multiple_files() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("shapes.js"))
        .arg(fixture_path("classes.js"))
        .assert()
        .success();

    assert!(dir.path().join("shapes.d.ts").exists());
    assert!(dir.path().join("classes.d.ts").exists());
}

#[test]
fn file_mode_glob() {
    let dir = TempDir::new().unwrap();
    let pattern = format!("{}/tests/fixtures/*.js", env!("CARGO_MANIFEST_DIR"));

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(&pattern)
        .assert()
        .success();

    assert!(dir.path().join("shapes.d.ts").exists());
    assert!(dir.path().join("classes.d.ts").exists());
}

#[test]
fn file_mode_directory() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(format!("{}/tests/fixtures", env!("CARGO_MANIFEST_DIR")))
        .assert()
        .success();

    assert!(dir.path().join("shapes.d.ts").exists());
    assert!(dir.path().join("classes.d.ts").exists());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
}

#[test]
fn file_mode_inline_keeps_extension() {
    let src_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let input = src_dir.path().join("lib.mjs");
    std::fs::write(&input, "/** @param {string} s */\nfunction up(s) { return s; }\n").unwrap();

    cmd()
        .args(["--inline", "-o", out_dir.path().to_str().unwrap()])
        .arg(&input)
        .assert()
        .success();

    let output = std::fs::read_to_string(out_dir.path().join("lib.mjs")).unwrap();
    assert_eq!(output, "/** @param {string} s */\nfunction up(s/* : string*/) { return s; }\n");
}

#[test]
fn file_mode_json_extension() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-f", "json", "-o", dir.path().to_str().unwrap()])
        .arg(fixture_path("classes.js"))
        .assert()
        .success();

    let output = std::fs::read_to_string(dir.path().join("classes.json")).unwrap();
    assert!(output.contains("\"kind\": \"class\""));
}

#[test]
fn file_mode_skips_undocumented_files() {
    let src_dir = TempDir::new().unwrap();
    let out_dir = TempDir::new().unwrap();
    let plain = src_dir.path().join("plain.js");
    std::fs::write(&plain, "function g(x) { return x; }\n").unwrap();

    cmd()
        .args(["-o", out_dir.path().to_str().unwrap()])
        .arg(&plain)
        .arg(fixture_path("classes.js"))
        .assert()
        .success();

    assert!(!out_dir.path().join("plain.d.ts").exists());
    assert!(out_dir.path().join("classes.d.ts").exists());
}

#[test]
fn file_mode_requires_output() {
    cmd()
        .arg(fixture_path("shapes.js"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output is required"));
}

#[test]
fn unmatched_glob_warns() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg("/nonexistent/*.js")
        .assert()
        .success()
        .stderr(predicate::str::contains("no files matched"));
}

// -- failures --

#[test]
fn unresolvable_name_fails_with_file_name() {
    let dir = TempDir::new().unwrap();
    let mut file: NamedTempFile = tempfile::Builder::new().suffix(".js").tempfile().unwrap();
    writeln!(file, "run(function () {{").unwrap();
    writeln!(file, "  /** @return {{number}} */").unwrap();
    writeln!(file, "  return function () {{}};").unwrap();
    writeln!(file, "}});").unwrap();

    cmd()
        .args(["-o", dir.path().to_str().unwrap()])
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to process"))
        .stderr(predicate::str::contains("cannot resolve a name for documented function_expression at line 3"));
}

#[test]
fn reserved_segment_fails() {
    cmd()
        .write_stdin("/** @return {string} */\napp.meta.version = function () {};")
        .assert()
        .failure()
        .stderr(predicate::str::contains("reserved segment `meta`"));
}

#[test]
fn verbose_logs_constructs() {
    cmd()
        .arg("-v")
        .write_stdin("/** @return {string} */\nfunction f() {}")
        .assert()
        .success()
        .stderr(predicate::str::contains("function"));
}
