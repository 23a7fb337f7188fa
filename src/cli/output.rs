use console::{StyledObject, style};
use serde::Serialize;

use crate::error::Result;
use crate::lint::Severity;

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)?;
    println!("{payload}");
    Ok(())
}

/// Line-oriented builder for human reports.
pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 14,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        let rule = "=".repeat(60);
        self.lines.push(rule.clone());
        self.lines.push(style(text).bold().to_string());
        self.lines.push(rule);
        self
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push("-".repeat(text.len().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        let label = format!("{key}:");
        self.lines.push(format!(
            "{} {value}",
            style(format!("{label:width$}", width = self.key_width)).dim()
        ));
        self
    }

    /// Indented `key: value` detail under a list item.
    pub fn detail(&mut self, key: &str, value: &str) -> &mut Self {
        self.lines.push(format!("  {} {value}", style(format!("{key}:")).dim()));
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.lines.push(format!("- {text}"));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

pub fn emit_human(layout: HumanLayout) {
    println!("{}", layout.build());
}

/// `[MUST]`, `[SHOULD]`... colored by severity.
#[must_use]
pub fn severity_label(severity: Severity) -> StyledObject<String> {
    let label = format!("[{}]", severity.to_string().to_uppercase());
    match severity {
        Severity::Must => style(label).red().bold(),
        Severity::Should => style(label).yellow().bold(),
        Severity::May => style(label).cyan(),
        Severity::Ok => style(label).green(),
    }
}
