//! Temporary plugin trees and a runner for the `plint` binary.

use std::path::{Path, PathBuf};
use std::time::Instant;

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

pub const VALID_MANIFEST: &str = r#"{
  "name": "e2e-plugin",
  "description": "Plugin used by end-to-end tests",
  "version": "0.1.0",
  "author": {"name": "E2E"},
  "keywords": ["e2e"]
}"#;

/// Threshold overrides a developer shell may export.
const BUDGET_ENV: [&str; 5] = [
    "PLINT_BUDGET_METADATA_TARGET",
    "PLINT_BUDGET_METADATA_WARNING",
    "PLINT_BUDGET_BODY_TARGET",
    "PLINT_BUDGET_BODY_WARNING",
    "PLINT_BUDGET_BODY_CRITICAL",
];

/// Captured result of one `plint` invocation.
pub struct CommandOutput {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}):\n{}", self.stdout))
    }
}

pub struct E2EFixture {
    pub scenario: String,
    temp_dir: TempDir,
    root: PathBuf,
    started: Instant,
    step: usize,
}

impl E2EFixture {
    pub fn new(scenario: &str) -> Self {
        let temp_dir = TempDir::new().expect("create temp dir");
        let root = temp_dir.path().join("plugin");
        std::fs::create_dir_all(&root).expect("create plugin root");
        println!("[E2E] Scenario: {scenario} at {}", root.display());
        Self {
            scenario: scenario.to_string(),
            temp_dir,
            root,
            started: Instant::now(),
            step: 0,
        }
    }

    /// A plugin with a valid manifest and a README.
    pub fn plugin(scenario: &str) -> Self {
        let fixture = Self::new(scenario);
        fixture.write_manifest(VALID_MANIFEST);
        fixture.create_file("README.md", "# E2E plugin\n");
        fixture
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let path = self.root.join(relative_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dirs");
        }
        std::fs::write(&path, content).expect("write file");
        path
    }

    pub fn create_skill(&self, name: &str, content: &str) -> PathBuf {
        self.create_file(&format!("skills/{name}/SKILL.md"), content)
    }

    pub fn write_manifest(&self, json: &str) -> PathBuf {
        self.create_file(".claude-plugin/plugin.json", json)
    }

    pub fn log_step(&mut self, description: &str) {
        self.step += 1;
        println!(
            "[E2E] {} step {}: {description} (+{:?})",
            self.scenario,
            self.step,
            self.started.elapsed()
        );
    }

    /// Run `plint` with approximate counting and no ambient config.
    pub fn run_plint(&self, args: &[&str]) -> CommandOutput {
        let home = self.temp_dir.path().join("home");
        let mut cmd = Command::cargo_bin("plint").expect("plint binary");
        cmd.env_remove("PLINT_CONFIG")
            .env("HOME", &home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env("PLINT_TOKENIZER", "approximate")
            .env("RUST_LOG", "off");
        for key in BUDGET_ENV {
            cmd.env_remove(key);
        }
        let output = cmd.args(args).output().expect("run plint");

        let result = CommandOutput {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        println!("[E2E] plint {} -> {}", args.join(" "), result.exit_code);
        result
    }

    pub fn path_arg(&self, relative: &str) -> String {
        self.root.join(relative).display().to_string()
    }

    pub fn root_arg(&self) -> String {
        self.root.display().to_string()
    }

    pub fn assert_exit_code(&self, output: &CommandOutput, expected: i32, context: &str) {
        assert_eq!(
            output.exit_code, expected,
            "{context}: unexpected exit code\nstdout:\n{}\nstderr:\n{}",
            output.stdout, output.stderr
        );
    }

    pub fn assert_output_contains(&self, output: &CommandOutput, needle: &str) {
        assert!(
            output.stdout.contains(needle),
            "expected stdout to contain {needle:?}\nstdout:\n{}",
            output.stdout
        );
    }
}
