//! Prohibited tool-invocation phrasing in component bodies.
//!
//! Component prose should describe the action ("Find files matching...")
//! rather than name the low-level tool that performs it. Fenced code blocks
//! are skipped.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::component::Component;
use crate::core::frontmatter::{self, ComponentHeader};
use crate::lint::config::ValidationContext;
use crate::lint::diagnostic::{CheckKind, Issue};
use crate::lint::engine::CheckResult;
use crate::lint::rule::Check;

static CORE_TOOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(use|call|using)\s+(the\s+)?`?(Read|Write|Glob|Grep|Edit)`?\s+tool\b")
        .expect("valid core tool regex")
});

static BASH_TOOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(use|call|using)\s+(the\s+)?`?Bash`?\s+tool\b").expect("valid bash tool regex")
});

static TASK_TOOL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(use|call)\s+(the\s+)?`?Task`?\s+tool\s+to\s+launch\s+[a-z-]+")
        .expect("valid task tool regex")
});

/// Capabilities that may be named explicitly; lines mentioning them are
/// never flagged.
pub const EXEMPT_TOOLS: [&str; 1] = ["AskUserQuestion"];

const FENCE: &str = "```";

pub struct ToolsCheck;

impl Check for ToolsCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Tools
    }

    fn description(&self) -> &str {
        "Explicit tool invocations in prose and unrestricted shell access"
    }

    fn run(&self, ctx: &ValidationContext<'_>) -> CheckResult {
        let mut result = CheckResult::new(self.kind(), ctx.verbose());
        for component in ctx.components.iter() {
            check_component(&mut result, component);
        }
        result
    }
}

fn check_component(result: &mut CheckResult, component: &Component) {
    let file = component.label.as_str();
    let content = match component.content() {
        Ok(content) => content,
        Err(err) => {
            result.push(
                Issue::must("Cannot read file")
                    .with_file(file)
                    .with_source(err.to_string()),
            );
            return;
        }
    };

    let doc = frontmatter::parse(content);
    for (line_no, line) in prose_lines(content, doc.header_end_line) {
        for issue in scan_line(line) {
            result.push(issue.with_file(file).with_line(line_no).with_source(line.trim()));
        }
    }

    let header = ComponentHeader::from_frontmatter(&doc.header);
    if let Some(field) = header.unrestricted_shell() {
        result.push(
            Issue::must("Unrestricted Bash in allowed-tools")
                .with_file(file)
                .with_line(field.line)
                .with_source(format!("allowed-tools: {}", field.value))
                .with_suggestion("Use filtered: Bash(git:*), Bash(npm:*)"),
        );
    }
}

/// Non-blank body lines outside fenced blocks, with document line numbers.
fn prose_lines(content: &str, header_end_line: usize) -> Vec<(usize, &str)> {
    let mut in_fence = false;
    let mut out = Vec::new();
    for (idx, line) in content.lines().enumerate().skip(header_end_line) {
        if line.trim_start().starts_with(FENCE) {
            in_fence = !in_fence;
            continue;
        }
        if in_fence || line.trim().is_empty() {
            continue;
        }
        out.push((idx + 1, line));
    }
    out
}

/// Issues for one prose line, without location.
fn scan_line(line: &str) -> Vec<Issue> {
    if EXEMPT_TOOLS.iter().any(|tool| line.contains(tool)) {
        return Vec::new();
    }

    let mut issues = Vec::new();
    if CORE_TOOL.is_match(line) {
        issues.push(
            Issue::should("Explicit core tool reference")
                .with_suggestion("Describe action directly: 'Find files...' not 'Use Glob tool...'"),
        );
    }
    if BASH_TOOL.is_match(line) && !line.contains("Bash(") && !line.contains("!`") {
        issues.push(
            Issue::should("Explicit Bash tool reference")
                .with_suggestion("Use: Run `command` or describe command directly"),
        );
    }
    if TASK_TOOL.is_match(line) {
        issues.push(
            Issue::should("Explicit Task tool reference")
                .with_suggestion("Use: Launch `agent-name` agent"),
        );
    }
    issues
}
