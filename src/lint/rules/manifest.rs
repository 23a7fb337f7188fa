//! `plugin.json` fields, declared command paths and the user-invocable
//! cross-check.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::core::component::{ComponentKind, SKILL_ENTRY};
use crate::core::frontmatter::{self, ComponentHeader};
use crate::core::manifest::{
    AuthorField, CommandEntry, CommandsField, MANIFEST_LABEL, ManifestSource, PluginManifest,
};
use crate::lint::config::ValidationContext;
use crate::lint::diagnostic::{CheckKind, Issue};
use crate::lint::engine::CheckResult;
use crate::lint::rule::Check;

use super::structure::KEBAB_CASE;

static SEMVER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").expect("valid semver regex"));

/// `./segment/.../` with leading `./` and trailing `/`.
static COMMAND_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\./.*/$").expect("valid command path regex"));

pub struct ManifestCheck;

impl Check for ManifestCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Manifest
    }

    fn description(&self) -> &str {
        "plugin.json syntax, required fields and declared commands"
    }

    fn run(&self, ctx: &ValidationContext<'_>) -> CheckResult {
        let mut result = CheckResult::new(self.kind(), ctx.verbose());

        let manifest = match ctx.manifest {
            ManifestSource::Missing => {
                result.push(Issue::must("plugin.json not found").with_file(MANIFEST_LABEL));
                return result;
            }
            ManifestSource::Unreadable(err) => {
                result.push(
                    Issue::must("Cannot read file")
                        .with_file(MANIFEST_LABEL)
                        .with_source(err),
                );
                return result;
            }
            ManifestSource::Invalid {
                message,
                line,
                column,
            } => {
                result.push(
                    Issue::must("Invalid JSON syntax")
                        .with_file(MANIFEST_LABEL)
                        .with_line(*line)
                        .with_source(format!("{message} (column {column})"))
                        .with_suggestion("Fix JSON syntax error"),
                );
                return result;
            }
            ManifestSource::Loaded(manifest) => manifest,
        };

        check_name(&mut result, manifest);
        check_description(&mut result, manifest);
        check_author(&mut result, manifest);
        check_version(&mut result, manifest);
        check_keywords(&mut result, manifest);
        check_commands(&mut result, manifest, ctx);

        result
    }
}

fn field_issue(issue: Issue, manifest: &PluginManifest, key: &str) -> Issue {
    issue
        .with_file(MANIFEST_LABEL)
        .with_line(manifest.key_line(key).unwrap_or(0))
}

fn check_name(result: &mut CheckResult, manifest: &PluginManifest) {
    let Some(name) = &manifest.name else {
        result.push(
            Issue::must("Missing 'name' field")
                .with_file(MANIFEST_LABEL)
                .with_suggestion("Add \"name\": \"plugin-name\""),
        );
        return;
    };
    match name.as_text() {
        Some(text) if KEBAB_CASE.is_match(text) => {
            result.push(field_issue(Issue::ok(format!("name: {text}")), manifest, "name"));
        }
        _ => result.push(
            field_issue(Issue::should("Plugin name not kebab-case"), manifest, "name")
                .with_source(format!("\"name\": {}", name.json()))
                .with_suggestion("Use lowercase letters, numbers, hyphens only"),
        ),
    }
}

fn check_description(result: &mut CheckResult, manifest: &PluginManifest) {
    if manifest.description.is_some() {
        result.push(field_issue(Issue::ok("description present"), manifest, "description"));
    } else {
        result.push(
            Issue::should("Missing 'description' field")
                .with_file(MANIFEST_LABEL)
                .with_suggestion("Add \"description\": \"Brief plugin description\""),
        );
    }
}

fn check_author(result: &mut CheckResult, manifest: &PluginManifest) {
    match &manifest.author {
        None => result.push(
            Issue::must("Missing 'author' field")
                .with_file(MANIFEST_LABEL)
                .with_suggestion("Add \"author\": {\"name\": \"Your Name\"}"),
        ),
        Some(AuthorField::Object { name: Some(_) }) => {
            result.push(field_issue(Issue::ok("author.name present"), manifest, "author"));
        }
        Some(author) => {
            let shown = match author {
                AuthorField::Other(json) => json.clone(),
                AuthorField::Object { .. } => "{...}".to_string(),
            };
            result.push(
                field_issue(Issue::must("Missing 'author.name' field"), manifest, "author")
                    .with_source(format!("\"author\": {shown}"))
                    .with_suggestion("Use \"author\": {\"name\": \"Your Name\"}"),
            );
        }
    }
}

fn check_version(result: &mut CheckResult, manifest: &PluginManifest) {
    match &manifest.version {
        None => result.push(
            Issue::may("No 'version' field")
                .with_file(MANIFEST_LABEL)
                .with_suggestion("Add \"version\": \"1.0.0\" for release tracking"),
        ),
        Some(version) => match version.as_text() {
            Some(text) if SEMVER.is_match(text) => {
                result.push(field_issue(Issue::ok(format!("version: {text}")), manifest, "version"));
            }
            _ => result.push(
                field_issue(Issue::should("Version not semver format"), manifest, "version")
                    .with_source(format!("\"version\": {}", version.json()))
                    .with_suggestion("Use X.Y.Z format (e.g., 1.0.0)"),
            ),
        },
    }
}

fn check_keywords(result: &mut CheckResult, manifest: &PluginManifest) {
    if manifest.keywords.is_some() {
        result.push(field_issue(Issue::ok("keywords present"), manifest, "keywords"));
    } else {
        result.push(
            Issue::may("No 'keywords' field")
                .with_file(MANIFEST_LABEL)
                .with_suggestion("Add \"keywords\": [\"keyword1\", \"keyword2\"] for discoverability"),
        );
    }
}

fn check_commands(result: &mut CheckResult, manifest: &PluginManifest, ctx: &ValidationContext<'_>) {
    let entries = match &manifest.commands {
        None => return,
        Some(CommandsField::NotArray(json)) => {
            result.push(
                field_issue(Issue::must("'commands' must be an array"), manifest, "commands")
                    .with_source(format!("\"commands\": {json}"))
                    .with_suggestion("Use \"commands\": [\"./skills/name/\"]"),
            );
            return;
        }
        Some(CommandsField::Entries(entries)) if entries.is_empty() => {
            result.push(
                field_issue(Issue::must("'commands' array is empty"), manifest, "commands")
                    .with_suggestion("Add command paths or remove empty array"),
            );
            return;
        }
        Some(CommandsField::Entries(entries)) => entries,
    };

    for entry in entries {
        let path = match entry {
            CommandEntry::Path(path) if COMMAND_PATH.is_match(path) => path,
            other => {
                result.push(
                    field_issue(
                        Issue::must(format!("Invalid path format: {}", other.as_str())),
                        manifest,
                        "commands",
                    )
                    .with_source(format!("\"commands\": [..., {}, ...]", quoted(other)))
                    .with_suggestion("Use './path/' format with trailing slash"),
                );
                continue;
            }
        };

        let dir = ctx.root.join(path.trim_end_matches('/'));
        if !dir.is_dir() {
            result.push(
                field_issue(Issue::must("Command path not found"), manifest, "commands")
                    .with_source(format!("\"{path}\""))
                    .with_suggestion(format!("Create directory {path}")),
            );
        } else if !dir.join(SKILL_ENTRY).is_file() {
            result.push(
                Issue::must("Missing SKILL.md in command")
                    .with_file(path.trim_start_matches("./"))
                    .with_suggestion("Create SKILL.md with frontmatter"),
            );
        } else {
            result.push(field_issue(Issue::ok(format!("Verified: {path}")), manifest, "commands"));
        }
    }

    check_undeclared_skills(result, manifest, ctx);
}

/// Skills that declare themselves user-invocable must be listed in `commands`.
fn check_undeclared_skills(
    result: &mut CheckResult,
    manifest: &PluginManifest,
    ctx: &ValidationContext<'_>,
) {
    let declared: HashSet<&str> = manifest.command_paths().into_iter().collect();

    for skill in ctx.components.of_kind(ComponentKind::Skill) {
        let declared_path = format!("./{}/{}/", ComponentKind::Skill.dir_name(), skill.name());
        if declared.contains(declared_path.as_str()) {
            continue;
        }
        let content = match skill.content() {
            Ok(content) => content,
            Err(err) => {
                result.push(
                    Issue::must("Cannot read file")
                        .with_file(&skill.label)
                        .with_source(err.to_string()),
                );
                continue;
            }
        };
        let doc = frontmatter::parse(content);
        let header = ComponentHeader::from_frontmatter(&doc.header);
        if header.user_invocable == Some(true) {
            let line = doc.header.field("user-invocable").map_or(0, |f| f.line);
            result.push(
                Issue::must("Undeclared user-invocable skill")
                    .with_file(&skill.label)
                    .with_line(line)
                    .with_source(declared_path.clone())
                    .with_suggestion(format!(
                        "Add \"{declared_path}\" to \"commands\" array in plugin.json"
                    )),
            );
        }
    }
}

fn quoted(entry: &CommandEntry) -> String {
    match entry {
        CommandEntry::Path(path) => format!("\"{path}\""),
        CommandEntry::NotString(json) => json.clone(),
    }
}
