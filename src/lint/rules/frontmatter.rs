//! Header block fields, per component kind.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::component::{Component, ComponentKind};
use crate::core::frontmatter::{self, ComponentHeader, HeaderField, ParsedDocument};
use crate::lint::config::ValidationContext;
use crate::lint::diagnostic::{CheckKind, Issue};
use crate::lint::engine::CheckResult;
use crate::lint::rule::Check;

/// 3-50 characters, kebab-case, alphanumeric at both ends.
static AGENT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9-]{1,48}[a-z0-9]$").expect("valid agent name regex")
});

static SECOND_PERSON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bYou (should|must|can|need to)\b").expect("valid second-person regex")
});

pub const AGENT_MODELS: [&str; 4] = ["inherit", "sonnet", "opus", "haiku"];

pub const AGENT_COLORS: [&str; 6] = ["blue", "cyan", "green", "yellow", "magenta", "red"];

/// Minimum description length for skills, ignoring spaces.
const MIN_DESCRIPTION_CHARS: usize = 10;

pub struct FrontmatterCheck;

impl Check for FrontmatterCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Frontmatter
    }

    fn description(&self) -> &str {
        "Required header fields and their formats for each component kind"
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
    if doc.header.is_empty() {
        result.push(
            Issue::must("No YAML frontmatter found")
                .with_file(file)
                .with_line(1)
                .with_suggestion("Add frontmatter block: ---\\nname: ...\\ndescription: ...\\n---"),
        );
        return;
    }

    if let Some((idx, line)) = content
        .lines()
        .take(doc.header_end_line)
        .enumerate()
        .find(|(_, line)| line.contains('\t'))
    {
        result.push(
            Issue::must("Tab character in YAML frontmatter")
                .with_file(file)
                .with_line(idx + 1)
                .with_source(line)
                .with_suggestion("Replace tabs with spaces"),
        );
    }

    let header = ComponentHeader::from_frontmatter(&doc.header);
    match component.kind {
        ComponentKind::Command => check_command(result, file, &header),
        ComponentKind::Agent => check_agent(result, file, &header),
        ComponentKind::Skill => check_skill(result, file, &header, &doc),
    }
}

fn missing(result: &mut CheckResult, file: &str, key: &str, suggestion: &str) {
    result.push(
        Issue::must(format!("Missing '{key}' in frontmatter"))
            .with_file(file)
            .with_suggestion(suggestion),
    );
}

fn present(result: &mut CheckResult, file: &str, key: &str, field: &HeaderField) {
    result.push(
        Issue::ok(format!("{key}: \"{}\"", field.value))
            .with_file(file)
            .with_line(field.line),
    );
}

fn check_command(result: &mut CheckResult, file: &str, header: &ComponentHeader) {
    match &header.description {
        Some(field) => present(result, file, "description", field),
        None => missing(result, file, "description", "Add description: \"Short description\""),
    }

    if let Some(field) = header.unrestricted_shell() {
        result.push(
            Issue::must("Unrestricted Bash in allowed-tools")
                .with_file(file)
                .with_line(field.line)
                .with_source(format!("allowed-tools: {}", field.value))
                .with_suggestion("Use filtered Bash: Bash(git:*), Bash(npm:*)"),
        );
    }
}

fn check_agent(result: &mut CheckResult, file: &str, header: &ComponentHeader) {
    match &header.name {
        None => missing(
            result,
            file,
            "name",
            "Add name: agent-name (kebab-case, 3-50 chars)",
        ),
        Some(field) if AGENT_NAME.is_match(&field.value) => present(result, file, "name", field),
        Some(field) => result.push(
            Issue::must("Invalid agent name format")
                .with_file(file)
                .with_line(field.line)
                .with_source(format!("name: {}", field.value))
                .with_suggestion("Use 3-50 chars, kebab-case, no leading/trailing hyphens"),
        ),
    }

    if header.description.is_none() {
        missing(
            result,
            file,
            "description",
            "Add description with trigger conditions and <example> blocks",
        );
    }

    check_enum(result, file, "model", header.model.as_ref(), &AGENT_MODELS);
    check_enum(result, file, "color", header.color.as_ref(), &AGENT_COLORS);
}

fn check_enum(
    result: &mut CheckResult,
    file: &str,
    key: &str,
    field: Option<&HeaderField>,
    allowed: &[&str],
) {
    let Some(field) = field else {
        missing(
            result,
            file,
            key,
            &format!("Add {key}: {} (or {})", allowed[0], allowed[1..].join("|")),
        );
        return;
    };
    if allowed.contains(&field.value.as_str()) {
        present(result, file, key, field);
    } else {
        result.push(
            Issue::must(format!("Invalid {key} value"))
                .with_file(file)
                .with_line(field.line)
                .with_source(format!("{key}: {}", field.value))
                .with_suggestion(format!("Use: {}", allowed.join(", "))),
        );
    }
}

fn check_skill(result: &mut CheckResult, file: &str, header: &ComponentHeader, doc: &ParsedDocument) {
    match &header.name {
        Some(field) => present(result, file, "name", field),
        None => missing(result, file, "name", "Add name: skill-name (kebab-case)"),
    }

    match &header.description {
        None => missing(result, file, "description", "Add description with trigger phrases"),
        Some(field) if field.value.chars().filter(|c| *c != ' ').count() < MIN_DESCRIPTION_CHARS => {
            result.push(
                Issue::should("Description too short")
                    .with_file(file)
                    .with_line(field.line)
                    .with_source(format!("description: {}", field.value))
                    .with_suggestion("Add more detail about when this skill should be used"),
            );
        }
        Some(field) => present(result, file, "description", field),
    }

    for (idx, line) in doc.body.lines().enumerate() {
        if SECOND_PERSON.is_match(line) {
            result.push(
                Issue::should("Second-person voice in skill body")
                    .with_file(file)
                    .with_line(doc.document_line(idx + 1))
                    .with_source(line.trim())
                    .with_suggestion(
                        "Use imperative form: 'Parse the file...' instead of 'You should...'",
                    ),
            );
        }
    }
}
