use std::path::PathBuf;

use tempfile::TempDir;

use crate::core::manifest::{MANIFEST_DIR, MANIFEST_FILE};

/// Manifest that passes every manifest rule.
pub const VALID_MANIFEST: &str = r#"{
  "name": "demo-plugin",
  "description": "Demo plugin for tests",
  "version": "1.0.0",
  "author": {"name": "Test Author"},
  "keywords": ["demo"]
}"#;

/// Bytes that do not decode as UTF-8, so reading them as text fails.
pub const INVALID_UTF8: &[u8] = b"\xff\xfe";

/// Test fixture providing an isolated plugin directory.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl Default for UnitTestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitTestFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();

        println!("[FIXTURE] Created temp directory: {data_path:?}");

        Self {
            temp_dir,
            data_path,
        }
    }

    /// A plugin with a valid manifest and a README.
    #[must_use]
    pub fn plugin() -> Self {
        let fixture = Self::new();
        let _ = fixture.write_manifest(VALID_MANIFEST);
        let _ = fixture.create_file("README.md", "# Demo\n");
        fixture
    }

    /// Create a test file with content.
    #[must_use]
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        println!(
            "[FIXTURE] Created file: {:?} ({} bytes)",
            full_path,
            content.len()
        );
        full_path
    }

    /// Create a file holding raw bytes.
    #[must_use]
    pub fn create_bytes(&self, relative_path: &str, bytes: &[u8]) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, bytes).expect("Failed to write file");
        println!("[FIXTURE] Created raw file: {full_path:?}");
        full_path
    }

    /// Create `skills/<name>/SKILL.md`.
    #[must_use]
    pub fn create_skill(&self, name: &str, content: &str) -> PathBuf {
        self.create_file(&format!("skills/{name}/SKILL.md"), content)
    }

    /// Write `.claude-plugin/plugin.json`.
    #[must_use]
    pub fn write_manifest(&self, json: &str) -> PathBuf {
        self.create_file(&format!("{MANIFEST_DIR}/{MANIFEST_FILE}"), json)
    }

    /// Create an empty directory.
    pub fn create_dir(&self, relative_path: &str) {
        std::fs::create_dir_all(self.data_path.join(relative_path))
            .expect("Failed to create dir");
    }
}

impl Drop for UnitTestFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.data_path);
    }
}
