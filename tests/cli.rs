use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::{TempDir, tempdir};

const MANIFEST: &str = r#"{
  "name": "demo-plugin",
  "description": "Demo plugin",
  "version": "1.0.0",
  "author": {"name": "Demo"},
  "keywords": ["demo"]
}"#;

/// Threshold overrides a developer shell may export.
const BUDGET_ENV: [&str; 5] = [
    "PLINT_BUDGET_METADATA_TARGET",
    "PLINT_BUDGET_METADATA_WARNING",
    "PLINT_BUDGET_BODY_TARGET",
    "PLINT_BUDGET_BODY_WARNING",
    "PLINT_BUDGET_BODY_CRITICAL",
];

/// Config home with no `plint/config.toml`, so no global layer loads.
fn empty_config_home() -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_TARGET_TMPDIR")).join("plint-cli-empty-home")
}

fn plint() -> Command {
    let mut cmd = Command::cargo_bin("plint").unwrap();
    let home = empty_config_home();
    cmd.env_remove("PLINT_CONFIG")
        .env("HOME", &home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("PLINT_TOKENIZER", "approximate")
        .env("RUST_LOG", "off");
    for key in BUDGET_ENV {
        cmd.env_remove(key);
    }
    cmd
}

fn write(dir: &TempDir, rel: &str, content: &str) {
    let path = dir.path().join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn clean_plugin() -> TempDir {
    let dir = tempdir().unwrap();
    write(&dir, ".claude-plugin/plugin.json", MANIFEST);
    write(&dir, "README.md", "# Demo\n");
    write(
        &dir,
        "skills/demo-skill/SKILL.md",
        "---\nname: demo-skill\ndescription: Use when validating demo plugins\n---\n\n# Demo\n\nParse the file.\n",
    );
    dir
}

fn sized_skill(dir: &TempDir, units: usize) {
    let body = "abcd".repeat(units);
    write(
        dir,
        "skills/demo-skill/SKILL.md",
        &format!("---\nname: demo-skill\ndescription: Use when validating demo plugins\n---\n{body}"),
    );
}

#[test]
fn test_cli_help() {
    plint()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("tokens"));
}

#[test]
fn test_cli_version() {
    plint()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_validate_clean_plugin_passes() {
    let dir = clean_plugin();
    plint()
        .arg("validate")
        .arg(dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("PLUGIN VALIDATION REPORT"))
        .stdout(predicate::str::contains("approximation"))
        .stdout(predicate::str::contains("Result: PASSED"));
}

#[test]
fn test_validate_missing_manifest_fails() {
    let dir = clean_plugin();
    std::fs::remove_file(dir.path().join(".claude-plugin/plugin.json")).unwrap();
    plint()
        .arg("validate")
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("[MUST]"))
        .stdout(predicate::str::contains("Result: FAILED"));
}

#[test]
fn test_validate_critical_budget_exit_code() {
    let dir = clean_plugin();
    sized_skill(&dir, 2501);
    plint()
        .args(["validate", "--check", "tokens"])
        .arg(dir.path())
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Token budget exceeded: 2501 tokens"));
}

#[test]
fn test_validate_warning_budget_still_passes() {
    let dir = clean_plugin();
    sized_skill(&dir, 801);
    plint()
        .args(["validate", "--check", "tokens"])
        .arg(dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("PASSED (with recommendations)"));
}

#[test]
fn test_validate_json_shape() {
    let dir = clean_plugin();
    write(&dir, "commands/run.md", "---\nallowed-tools: Bash\n---\nRun it.\n");

    let output = plint()
        .args(["--json", "validate"])
        .arg(dir.path())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["token_method"], "approximation (~4 chars/token)");
    let checks: Vec<_> = json["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["check"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(checks, ["structure", "manifest", "frontmatter", "tools", "tokens"]);
    assert_eq!(json["results"][2]["passed"], false);
    assert_eq!(json["summary"]["passed"], false);
    assert_eq!(json["summary"]["critical"], false);
    assert_eq!(json["summary"]["exit_code"], 1);
    assert!(json["summary"]["must"].as_u64().unwrap() >= 2);

    let issue = &json["results"][3]["issues"][0];
    assert_eq!(issue["severity"], "must");
    assert_eq!(issue["file"], "commands/run.md");
    assert_eq!(issue["line"], 2);
}

#[test]
fn test_validate_check_order_is_fixed() {
    let dir = clean_plugin();
    let output = plint()
        .args(["--json", "validate", "--check", "budget,structure"])
        .arg(dir.path())
        .output()
        .unwrap();
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    let results = json["results"].as_array().unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0]["check"], "structure");
    assert_eq!(results[1]["check"], "tokens");
}

#[test]
fn test_validate_unknown_check() {
    let dir = clean_plugin();
    plint()
        .args(["validate", "--check", "structure,spelling"])
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("spelling"))
        .stderr(predicate::str::contains("available"));
}

#[test]
fn test_validate_bad_paths() {
    let dir = tempdir().unwrap();
    plint()
        .arg("validate")
        .arg(dir.path().join("nope"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Plugin directory not found"));

    write(&dir, "file.txt", "x");
    plint()
        .arg("validate")
        .arg(dir.path().join("file.txt"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Path is not a directory"));
}

#[test]
fn test_json_error_object() {
    let dir = tempdir().unwrap();
    let output = plint()
        .args(["--json", "validate"])
        .arg(dir.path().join("nope"))
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["error"], true);
    assert_eq!(json["code"], "not_found");
}

#[test]
fn test_verbose_lists_passing_checks() {
    let dir = clean_plugin();
    plint()
        .args(["validate", "-v"])
        .arg(dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::contains("[OK] Passing Checks"))
        .stdout(predicate::str::contains("Token count OK"));
}

#[test]
fn test_tokens_single_file() {
    let dir = tempdir().unwrap();
    write(&dir, "notes.md", &"abcd".repeat(12));
    let output = plint()
        .args(["--json", "tokens"])
        .arg(dir.path().join("notes.md"))
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["tokens"], 12);
}

#[test]
fn test_tokens_warning_exit_code() {
    let dir = clean_plugin();
    sized_skill(&dir, 900);
    plint()
        .arg("tokens")
        .arg(dir.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Tier 2 (SKILL.md)"))
        .stdout(predicate::str::contains("WARNING"));
}

#[test]
fn test_tokens_no_skills() {
    let dir = tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("skills/empty")).unwrap();
    plint()
        .arg("tokens")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No skills found"));
}

#[test]
fn test_project_config_thresholds() {
    let dir = clean_plugin();
    write(
        &dir,
        ".plint.toml",
        "[budget]\nbody_target = 2\nbody_warning = 3\nbody_critical = 4\n",
    );
    plint()
        .args(["validate", "--check", "tokens"])
        .arg(dir.path())
        .assert()
        .code(2);
}

#[test]
fn test_invalid_config_fails() {
    let dir = clean_plugin();
    write(&dir, ".plint.toml", "[budget]\nbody_limit = 3\n");
    plint()
        .arg("validate")
        .arg(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("configuration error"));
}

#[cfg(target_os = "linux")]
#[test]
fn test_global_config_from_config_home() {
    let dir = clean_plugin();
    sized_skill(&dir, 600);
    let home = tempdir().unwrap();
    write(&home, "plint/config.toml", "[budget]\nbody_warning = 550\nbody_critical = 590\n");

    plint()
        .arg("validate")
        .arg(dir.path())
        .assert()
        .code(0);
    plint()
        .env("XDG_CONFIG_HOME", home.path())
        .arg("validate")
        .arg(dir.path())
        .assert()
        .code(2);
}

#[test]
fn test_budget_env_overrides() {
    let dir = clean_plugin();
    sized_skill(&dir, 600);

    plint()
        .env("PLINT_BUDGET_BODY_CRITICAL", "590")
        .env("PLINT_BUDGET_BODY_WARNING", "550")
        .arg("validate")
        .arg(dir.path())
        .assert()
        .code(2);
    plint().arg("validate").arg(dir.path()).assert().code(0);
}
