//! Plugin manifest loading.

use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

/// Directory holding the manifest, relative to the plugin root.
pub const MANIFEST_DIR: &str = ".claude-plugin";

/// Manifest file name inside [`MANIFEST_DIR`].
pub const MANIFEST_FILE: &str = "plugin.json";

/// Label used for issues about the manifest.
pub const MANIFEST_LABEL: &str = ".claude-plugin/plugin.json";

#[must_use]
pub fn manifest_path(root: &Path) -> PathBuf {
    root.join(MANIFEST_DIR).join(MANIFEST_FILE)
}

/// Outcome of reading the manifest once for a run.
#[derive(Debug, Clone)]
pub enum ManifestSource {
    Missing,
    Unreadable(String),
    Invalid {
        message: String,
        line: usize,
        column: usize,
    },
    Loaded(PluginManifest),
}

impl ManifestSource {
    #[must_use]
    pub fn load(root: &Path) -> Self {
        let path = manifest_path(root);
        if !path.is_file() {
            debug!(path = %path.display(), "manifest missing");
            return Self::Missing;
        }
        match std::fs::read_to_string(&path) {
            Ok(raw) => Self::parse(raw),
            Err(err) => Self::Unreadable(err.to_string()),
        }
    }

    /// Parse manifest text; never fails, syntax errors become `Invalid`.
    #[must_use]
    pub fn parse(raw: String) -> Self {
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(fields)) => Self::Loaded(PluginManifest::from_fields(&fields, raw)),
            Ok(_) => Self::Invalid {
                message: "manifest root must be a JSON object".to_string(),
                line: 1,
                column: 1,
            },
            Err(err) => Self::Invalid {
                message: err.to_string(),
                line: err.line(),
                column: err.column(),
            },
        }
    }

    #[must_use]
    pub const fn manifest(&self) -> Option<&PluginManifest> {
        match self {
            Self::Loaded(manifest) => Some(manifest),
            _ => None,
        }
    }

    #[must_use]
    pub const fn exists(&self) -> bool {
        !matches!(self, Self::Missing)
    }
}

/// A manifest value expected to be a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScalarField {
    Text(String),
    /// Not a string; JSON text of the value
    Other(String),
}

impl ScalarField {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::Text(s.clone()),
            other => Self::Other(other.to_string()),
        }
    }

    /// The string value, `None` for any other JSON type.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Other(_) => None,
        }
    }

    /// The value as it appears in JSON.
    #[must_use]
    pub fn json(&self) -> String {
        match self {
            Self::Text(s) => format!("\"{s}\""),
            Self::Other(json) => json.clone(),
        }
    }
}

/// The `author` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorField {
    Object { name: Option<String> },
    /// Not an object; JSON text of the value
    Other(String),
}

/// The `commands` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandsField {
    Entries(Vec<CommandEntry>),
    /// Not an array; JSON text of the value
    NotArray(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandEntry {
    Path(String),
    /// Not a string; JSON text of the value
    NotString(String),
}

impl CommandEntry {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Path(s) | Self::NotString(s) => s,
        }
    }
}

/// Typed view of the manifest fields plint checks.
///
/// `name` and `version` keep non-string values as [`ScalarField::Other`],
/// so format rules report them rather than matching their JSON text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginManifest {
    pub name: Option<ScalarField>,
    pub description: Option<String>,
    pub author: Option<AuthorField>,
    pub version: Option<ScalarField>,
    pub keywords: Option<Vec<String>>,
    pub commands: Option<CommandsField>,
    raw: String,
}

impl PluginManifest {
    fn from_fields(fields: &Map<String, Value>, raw: String) -> Self {
        Self {
            name: fields.get("name").map(ScalarField::from_value),
            description: fields.get("description").map(scalar_text),
            author: fields.get("author").map(|value| match value {
                Value::Object(obj) => AuthorField::Object {
                    name: obj.get("name").filter(|v| !v.is_null()).map(scalar_text),
                },
                other => AuthorField::Other(other.to_string()),
            }),
            version: fields.get("version").map(ScalarField::from_value),
            keywords: fields.get("keywords").map(|value| match value {
                Value::Array(items) => items.iter().map(scalar_text).collect(),
                other => vec![scalar_text(other)],
            }),
            commands: fields.get("commands").map(|value| match value {
                Value::Array(items) => CommandsField::Entries(
                    items
                        .iter()
                        .map(|item| match item {
                            Value::String(s) => CommandEntry::Path(s.clone()),
                            other => CommandEntry::NotString(other.to_string()),
                        })
                        .collect(),
                ),
                other => CommandsField::NotArray(other.to_string()),
            }),
            raw,
        }
    }

    /// 1-indexed line of the first line mentioning `"key"`.
    #[must_use]
    pub fn key_line(&self, key: &str) -> Option<usize> {
        let needle = format!("\"{key}\"");
        self.raw
            .lines()
            .position(|line| line.contains(&needle))
            .map(|idx| idx + 1)
    }

    /// Declared command paths that are strings.
    #[must_use]
    pub fn command_paths(&self) -> Vec<&str> {
        match &self.commands {
            Some(CommandsField::Entries(entries)) => entries
                .iter()
                .filter_map(|e| match e {
                    CommandEntry::Path(p) => Some(p.as_str()),
                    CommandEntry::NotString(_) => None,
                })
                .collect(),
            _ => Vec::new(),
        }
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
