//! Directory layout and naming.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::component::{ComponentKind, README, SKILL_ENTRY, skill_dirs, relative_label};
use crate::core::manifest::{MANIFEST_DIR, MANIFEST_LABEL};
use crate::lint::config::ValidationContext;
use crate::lint::diagnostic::{CheckKind, Issue};
use crate::lint::engine::CheckResult;
use crate::lint::rule::Check;
use crate::utils::read_optional;

/// Lowercase alphanumerics joined by single hyphens.
pub static KEBAB_CASE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("valid kebab-case regex"));

/// A quoted absolute script path not starting with a variable expansion.
static ABSOLUTE_SCRIPT_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""/[^$].*\.(sh|py|js)""#).expect("valid script path regex"));

/// Config files that may reference scripts.
const SCRIPT_CONFIGS: [&str; 2] = ["hooks/hooks.json", ".mcp.json"];

const GENERIC_DIRS: [&str; 4] = ["utils", "misc", "temp", "helpers"];

pub struct StructureCheck;

impl Check for StructureCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Structure
    }

    fn description(&self) -> &str {
        "Manifest location, component naming and directory layout"
    }

    fn run(&self, ctx: &ValidationContext<'_>) -> CheckResult {
        let mut result = CheckResult::new(self.kind(), ctx.verbose());

        if !ctx.manifest.exists() {
            result.push(
                Issue::must("plugin.json not found in .claude-plugin/")
                    .with_suggestion("Create .claude-plugin/plugin.json with required fields"),
            );
            return result;
        }
        result.push(Issue::ok("plugin.json location correct").with_file(MANIFEST_LABEL));

        for kind in ComponentKind::ALL {
            let misplaced = ctx.root.join(MANIFEST_DIR).join(kind.dir_name());
            if misplaced.exists() {
                result.push(
                    Issue::must(format!("{}/ inside {MANIFEST_DIR}/", kind.dir_name()))
                        .with_file(relative_label(&misplaced, ctx.root))
                        .with_suggestion(format!("Move to plugin root: {}/", kind.dir_name())),
                );
            }
        }

        for component in ctx.components.iter() {
            let name = component.name();
            if !KEBAB_CASE.is_match(name) {
                result.push(
                    Issue::should(format!("{} name not kebab-case", component.kind))
                        .with_file(&component.label)
                        .with_source(name)
                        .with_suggestion("Use lowercase letters, numbers, hyphens only"),
                );
            }
        }

        for dir in skill_dirs(ctx.root) {
            if !dir.join(SKILL_ENTRY).is_file() {
                result.push(
                    Issue::must(format!("Missing {SKILL_ENTRY}"))
                        .with_file(format!("{}/", relative_label(&dir, ctx.root)))
                        .with_suggestion("Create SKILL.md with frontmatter and content"),
                );
            }
        }

        for config in SCRIPT_CONFIGS {
            match read_optional(ctx.root.join(config)) {
                Ok(Some(text)) => check_script_paths(&mut result, config, &text),
                Ok(None) => {}
                Err(err) => result.push(
                    Issue::must("Cannot read file")
                        .with_file(config)
                        .with_source(err.to_string()),
                ),
            }
        }

        for generic in GENERIC_DIRS {
            if ctx.root.join(generic).exists() {
                result.push(
                    Issue::should(format!("Generic directory name: {generic}/"))
                        .with_suggestion("Use descriptive names like 'scripts/', 'references/'"),
                );
            }
        }

        if !ctx.root.join(README).exists() {
            result.push(Issue::may("No README.md").with_suggestion("Add README.md for documentation"));
        }

        result
    }
}

fn check_script_paths(result: &mut CheckResult, file: &str, text: &str) {
    for (idx, line) in text.lines().enumerate() {
        if ABSOLUTE_SCRIPT_PATH.is_match(line) {
            result.push(
                Issue::should("Hardcoded absolute path")
                    .with_file(file)
                    .with_line(idx + 1)
                    .with_source(line.trim())
                    .with_suggestion("Use ${CLAUDE_PLUGIN_ROOT}/path/to/script"),
            );
        }
    }
}
