//! Issue types for plugin validation.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::core::budget::TokenDetails;
use crate::error::PlintError;

/// The five validation passes, in execution order.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckKind {
    /// Directory layout and naming
    Structure,
    /// `plugin.json` fields and declared commands
    Manifest,
    /// Header block fields per component kind
    Frontmatter,
    /// Prohibited tool-invocation phrasing
    Tools,
    /// Skill budget units
    Tokens,
}

impl CheckKind {
    pub const ALL: [Self; 5] = [
        Self::Structure,
        Self::Manifest,
        Self::Frontmatter,
        Self::Tools,
        Self::Tokens,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Structure => "structure",
            Self::Manifest => "manifest",
            Self::Frontmatter => "frontmatter",
            Self::Tools => "tools",
            Self::Tokens => "tokens",
        }
    }

    /// Parse a comma-separated selection; `all` selects every check.
    ///
    /// The result is always in execution order without duplicates.
    pub fn parse_list(list: &str) -> Result<Vec<Self>, PlintError> {
        if list.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::ALL.to_vec());
        }
        let mut selected = Vec::new();
        let mut unknown = Vec::new();
        for name in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match name.parse::<Self>() {
                Ok(kind) => selected.push(kind),
                Err(_) => unknown.push(name.to_string()),
            }
        }
        if !unknown.is_empty() {
            return Err(PlintError::NotFound(format!(
                "unknown checks: {} (available: {})",
                unknown.join(", "),
                Self::ALL.map(Self::name).join(", ")
            )));
        }
        if selected.is_empty() {
            return Err(PlintError::NotFound("no checks selected".to_string()));
        }
        selected.sort();
        selected.dedup();
        Ok(selected)
    }
}

impl FromStr for CheckKind {
    type Err = PlintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "structure" => Ok(Self::Structure),
            "manifest" => Ok(Self::Manifest),
            "frontmatter" | "header" => Ok(Self::Frontmatter),
            "tools" | "phrase" => Ok(Self::Tools),
            "tokens" | "budget" => Ok(Self::Tokens),
            other => Err(PlintError::NotFound(format!("unknown check: {other}"))),
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Severity tier, ordered by blocking force
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Passing detail, shown only in verbose mode
    Ok,
    /// Optional improvement
    May,
    /// Recommended fix, not blocking
    Should,
    /// Absolute requirement, blocks activation
    Must,
}

impl Severity {
    /// Tiers reported in output, most severe first.
    pub const REPORTED: [Self; 3] = [Self::Must, Self::Should, Self::May];
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ok => write!(f, "ok"),
            Self::May => write!(f, "may"),
            Self::Should => write!(f, "should"),
            Self::Must => write!(f, "must"),
        }
    }
}

/// A single finding from a check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    /// Check that produced this issue
    pub check: CheckKind,
    pub message: String,
    /// Path relative to the plugin root
    pub file: Option<String>,
    /// 1-indexed line in `file`
    pub line: Option<usize>,
    /// Source text that triggered the issue
    pub source: Option<String>,
    pub suggestion: Option<String>,
    pub details: Option<TokenDetails>,
}

impl Issue {
    /// New issue; the owning check is stamped when it is recorded.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            check: CheckKind::Structure,
            message: message.into(),
            file: None,
            line: None,
            source: None,
            suggestion: None,
            details: None,
        }
    }

    pub fn must(message: impl Into<String>) -> Self {
        Self::new(Severity::Must, message)
    }

    pub fn should(message: impl Into<String>) -> Self {
        Self::new(Severity::Should, message)
    }

    pub fn may(message: impl Into<String>) -> Self {
        Self::new(Severity::May, message)
    }

    pub fn ok(message: impl Into<String>) -> Self {
        Self::new(Severity::Ok, message)
    }

    #[must_use]
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Set the line; 0 means unknown and is ignored.
    #[must_use]
    pub const fn with_line(mut self, line: usize) -> Self {
        if line > 0 {
            self.line = Some(line);
        }
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    #[must_use]
    pub fn with_details(mut self, details: TokenDetails) -> Self {
        self.details = Some(details);
        self
    }

    /// `file:line`, `file`, or `(no file)`.
    #[must_use]
    pub fn location(&self) -> String {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => format!("{file}:{line}"),
            (Some(file), None) => file.clone(),
            (None, _) => "(no file)".to_string(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.check, self.message)?;
        if self.file.is_some() {
            write!(f, " at {}", self.location())?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (fix: {suggestion})")?;
        }
        Ok(())
    }
}
