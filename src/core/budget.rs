//! Per-skill budget analysis.
//!
//! A skill is loaded in three tiers: the header description (metadata), the
//! entry document body, and reference documents pulled in on demand. Only
//! the first two are bounded; references and scripts are counted for
//! reporting.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use crate::config::BudgetConfig;
use crate::core::component::{SKILL_ENTRY, child_entries, relative_label};
use crate::core::frontmatter;
use crate::core::tokens::TokenCounter;

/// Directory of on-demand reference documents inside a skill.
pub const REFERENCES_DIR: &str = "references";

/// Directory of helper scripts inside a skill.
pub const SCRIPTS_DIR: &str = "scripts";

const SCRIPT_EXTENSIONS: [&str; 4] = ["py", "sh", "js", "ts"];

/// Reference volume below which a large body suggests more could move out.
pub const THIN_REFERENCES: usize = 500;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BudgetStatus {
    Ok,
    Warning,
    Critical,
}

impl BudgetStatus {
    #[must_use]
    pub const fn from_body(body: usize, limits: &BudgetConfig) -> Self {
        if body > limits.body_critical {
            Self::Critical
        } else if body > limits.body_warning {
            Self::Warning
        } else {
            Self::Ok
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileRole {
    Skill,
    Reference,
    Script,
}

impl std::fmt::Display for FileRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Skill => write!(f, "skill"),
            Self::Reference => write!(f, "reference"),
            Self::Script => write!(f, "script"),
        }
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct FileTokens {
    pub file: String,
    pub tokens: usize,
    #[serde(rename = "type")]
    pub role: FileRole,
}

/// Unit breakdown attached to budget issues.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
pub struct TokenDetails {
    pub frontmatter: usize,
    pub body: usize,
    pub refs: usize,
    pub scripts: usize,
    pub total: usize,
    pub files: Vec<FileTokens>,
}

impl TokenDetails {
    pub fn files_of(&self, role: FileRole) -> impl Iterator<Item = &FileTokens> {
        self.files.iter().filter(move |f| f.role == role)
    }
}

/// Analysis of one skill directory.
#[derive(Debug, Clone, Serialize)]
pub struct SkillBudget {
    pub name: String,
    pub path: PathBuf,
    pub status: BudgetStatus,
    #[serde(flatten)]
    pub details: TokenDetails,
    /// Files that could not be read, with the read error
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unreadable: Vec<(String, String)>,
}

impl SkillBudget {
    /// Analyze `skill_dir` given the already-read entry document.
    #[must_use]
    pub fn analyze(
        skill_dir: &Path,
        entry: &str,
        counter: &dyn TokenCounter,
        limits: &BudgetConfig,
    ) -> Self {
        let doc = frontmatter::parse(entry);
        let frontmatter = counter.count(doc.header.get("description").unwrap_or_default());
        let body = counter.count(&doc.body);

        let mut details = TokenDetails {
            frontmatter,
            body,
            files: vec![FileTokens {
                file: SKILL_ENTRY.to_string(),
                tokens: body,
                role: FileRole::Skill,
            }],
            ..TokenDetails::default()
        };
        let mut unreadable = Vec::new();

        for path in reference_files(skill_dir) {
            let label = relative_label(&path, skill_dir);
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    let tokens = counter.count(&text);
                    details.refs += tokens;
                    details.files.push(FileTokens {
                        file: label,
                        tokens,
                        role: FileRole::Reference,
                    });
                }
                Err(err) => unreadable.push((label, err.to_string())),
            }
        }

        for path in script_files(skill_dir) {
            let label = relative_label(&path, skill_dir);
            match std::fs::read_to_string(&path) {
                Ok(text) => {
                    let tokens = counter.count(&text);
                    details.scripts += tokens;
                    details.files.push(FileTokens {
                        file: label,
                        tokens,
                        role: FileRole::Script,
                    });
                }
                Err(err) => unreadable.push((label, err.to_string())),
            }
        }

        details.total = details.frontmatter + details.body + details.refs + details.scripts;

        Self {
            name: skill_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: skill_dir.to_path_buf(),
            status: BudgetStatus::from_body(body, limits),
            details,
            unreadable,
        }
    }

    #[must_use]
    pub const fn above_target(&self, limits: &BudgetConfig) -> bool {
        self.details.body > limits.body_target
    }

    /// Units by which the body exceeds its target.
    #[must_use]
    pub const fn excess(&self, limits: &BudgetConfig) -> usize {
        self.details.body.saturating_sub(limits.body_target)
    }

    /// Tier-by-tier notes for the standalone budget report.
    #[must_use]
    pub fn warnings(&self, limits: &BudgetConfig) -> Vec<String> {
        let d = &self.details;
        let mut out = Vec::new();

        if d.frontmatter > limits.metadata_warning {
            out.push(format!(
                "Tier 1 (Metadata): {} tokens exceeds ~{} budget",
                d.frontmatter, limits.metadata_target
            ));
        }

        match self.status {
            BudgetStatus::Critical => out.push(format!(
                "Tier 2 (SKILL.md): {} tokens critically exceeds {} limit - MUST refactor to references/",
                d.body, limits.body_critical
            )),
            BudgetStatus::Warning => out.push(format!(
                "Tier 2 (SKILL.md): {} tokens exceeds {} warning threshold - consider moving content to references/",
                d.body, limits.body_warning
            )),
            BudgetStatus::Ok if self.above_target(limits) => out.push(format!(
                "Tier 2 (SKILL.md): {} tokens above {} target (acceptable if content is critical)",
                d.body, limits.body_target
            )),
            BudgetStatus::Ok => {}
        }

        if d.refs > 0 && d.refs < THIN_REFERENCES && self.above_target(limits) {
            out.push(format!(
                "Tier 3 references thin: only {} tokens - consider moving more content from SKILL.md",
                d.refs
            ));
        }

        for (file, err) in &self.unreadable {
            out.push(format!("Cannot read {file}: {err}"));
        }

        out
    }
}

/// `references/**/*.md` plus sibling markdown documents, deduplicated by
/// resolved path.
fn reference_files(skill_dir: &Path) -> Vec<PathBuf> {
    let nested = WalkDir::new(skill_dir.join(REFERENCES_DIR))
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path);
    let siblings = child_entries(skill_dir)
        .filter(|e| e.file_type().is_file() && e.file_name() != SKILL_ENTRY)
        .map(walkdir::DirEntry::into_path);

    let mut seen = HashSet::new();
    nested
        .chain(siblings)
        .filter(|p| has_extension(p, &["md"]))
        .filter(|p| seen.insert(p.canonicalize().unwrap_or_else(|_| p.clone())))
        .collect()
}

fn script_files(skill_dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(skill_dir.join(SCRIPTS_DIR))
        .min_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|p| has_extension(p, &SCRIPT_EXTENSIONS))
        .collect()
}

fn has_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| allowed.contains(&ext))
}
