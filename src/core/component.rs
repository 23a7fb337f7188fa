//! Component discovery.
//!
//! A plugin keeps its components under fixed directories:
//! `commands/*.md`, `agents/*.md` and `skills/<name>/SKILL.md`.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{PlintError, Result};

/// Entry document every skill directory must contain.
pub const SKILL_ENTRY: &str = "SKILL.md";

/// Documentation file that never counts as a command or agent.
pub const README: &str = "README.md";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Command,
    Agent,
    Skill,
}

impl ComponentKind {
    pub const ALL: [Self; 3] = [Self::Command, Self::Agent, Self::Skill];

    /// Directory under the plugin root holding this kind.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Command => "commands",
            Self::Agent => "agents",
            Self::Skill => "skills",
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Command => write!(f, "command"),
            Self::Agent => write!(f, "agent"),
            Self::Skill => write!(f, "skill"),
        }
    }
}

/// A discovered component document.
#[derive(Debug, Clone)]
pub struct Component {
    pub kind: ComponentKind,
    pub path: PathBuf,
    /// Path relative to the plugin root, `/`-separated
    pub label: String,
    content: std::result::Result<String, String>,
}

impl Component {
    fn load(kind: ComponentKind, path: PathBuf, root: &Path) -> Self {
        let content = std::fs::read_to_string(&path).map_err(|err| err.to_string());
        if let Err(err) = &content {
            debug!(path = %path.display(), error = %err, "component unreadable");
        }
        Self {
            kind,
            label: relative_label(&path, root),
            path,
            content,
        }
    }

    /// Raw document text, or the read failure recorded at discovery.
    pub fn content(&self) -> Result<&str> {
        self.content
            .as_deref()
            .map_err(|message| PlintError::Read {
                path: self.path.clone(),
                message: message.clone(),
            })
    }

    /// Name used for naming rules: file stem, or directory name for skills.
    #[must_use]
    pub fn name(&self) -> &str {
        let source = match self.kind {
            ComponentKind::Skill => self.path.parent().and_then(Path::file_name),
            ComponentKind::Command | ComponentKind::Agent => self.path.file_stem(),
        };
        source.and_then(|s| s.to_str()).unwrap_or_default()
    }

    /// Skill directory (the entry document's parent) for skills.
    #[must_use]
    pub fn skill_dir(&self) -> Option<&Path> {
        match self.kind {
            ComponentKind::Skill => self.path.parent(),
            ComponentKind::Command | ComponentKind::Agent => None,
        }
    }
}

/// Every component of a plugin, read once per run.
#[derive(Debug, Clone, Default)]
pub struct ComponentSet {
    pub commands: Vec<Component>,
    pub agents: Vec<Component>,
    pub skills: Vec<Component>,
}

impl ComponentSet {
    /// Discover and read all components under `root`.
    #[must_use]
    pub fn discover(root: &Path) -> Self {
        let set = Self {
            commands: flat_documents(root, ComponentKind::Command),
            agents: flat_documents(root, ComponentKind::Agent),
            skills: skill_documents(root),
        };
        debug!(
            commands = set.commands.len(),
            agents = set.agents.len(),
            skills = set.skills.len(),
            "components discovered"
        );
        set
    }

    #[must_use]
    pub fn of_kind(&self, kind: ComponentKind) -> &[Component] {
        match kind {
            ComponentKind::Command => &self.commands,
            ComponentKind::Agent => &self.agents,
            ComponentKind::Skill => &self.skills,
        }
    }

    /// Commands, then agents, then skills.
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.commands
            .iter()
            .chain(self.agents.iter())
            .chain(self.skills.iter())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len() + self.agents.len() + self.skills.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Immediate child entries of `dir`, sorted by file name.
///
/// Symlinks are followed, so a linked document or skill directory is
/// discovered under its link name.
pub fn child_entries(dir: &Path) -> impl Iterator<Item = walkdir::DirEntry> {
    WalkDir::new(dir)
        .follow_links(true)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
}

/// Subdirectories of `skills/`, whether or not they hold an entry document.
#[must_use]
pub fn skill_dirs(root: &Path) -> Vec<PathBuf> {
    child_entries(&root.join(ComponentKind::Skill.dir_name()))
        .filter(|e| e.file_type().is_dir())
        .map(walkdir::DirEntry::into_path)
        .collect()
}

fn flat_documents(root: &Path, kind: ComponentKind) -> Vec<Component> {
    child_entries(&root.join(kind.dir_name()))
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
        .filter(|e| e.file_name() != README)
        .map(|e| Component::load(kind, e.into_path(), root))
        .collect()
}

fn skill_documents(root: &Path) -> Vec<Component> {
    skill_dirs(root)
        .into_iter()
        .map(|dir| dir.join(SKILL_ENTRY))
        .filter(|entry| entry.is_file())
        .map(|entry| Component::load(ComponentKind::Skill, entry, root))
        .collect()
}

/// Path relative to `root` with `/` separators; falls back to the full path.
#[must_use]
pub fn relative_label(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).map_or_else(
        |_| path.display().to_string(),
        |rel| {
            rel.components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        },
    )
}
