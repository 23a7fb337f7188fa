//! Skill budget units.

use crate::core::budget::{BudgetStatus, FileRole, SkillBudget};
use crate::core::component::{ComponentKind, skill_dirs};
use crate::lint::config::ValidationContext;
use crate::lint::diagnostic::{CheckKind, Issue};
use crate::lint::engine::CheckResult;
use crate::lint::rule::Check;

pub struct TokensCheck;

impl Check for TokensCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Tokens
    }

    fn description(&self) -> &str {
        "Skill metadata and body stay within their unit budgets"
    }

    fn run(&self, ctx: &ValidationContext<'_>) -> CheckResult {
        let mut result = CheckResult::new(self.kind(), ctx.verbose());
        let limits = &ctx.config.budget;

        if !ctx.root.join(ComponentKind::Skill.dir_name()).is_dir() {
            result.push(Issue::may("No skills/ directory"));
            return result;
        }
        let skills = ctx.components.of_kind(ComponentKind::Skill);
        if skills.is_empty() {
            let mut issue = Issue::may("No skills found");
            if !skill_dirs(ctx.root).is_empty() {
                issue = issue.with_suggestion("Add SKILL.md to each skill directory");
            }
            result.push(issue);
            return result;
        }

        for skill in skills {
            let file = skill.label.as_str();
            let entry = match skill.content() {
                Ok(entry) => entry,
                Err(err) => {
                    result.push(
                        Issue::must("Cannot read file")
                            .with_file(file)
                            .with_source(err.to_string()),
                    );
                    continue;
                }
            };
            let Some(dir) = skill.skill_dir() else {
                continue;
            };

            let budget = SkillBudget::analyze(dir, entry, ctx.counter, limits);
            let d = &budget.details;
            let excess = budget.excess(limits);

            let issue = match budget.status {
                BudgetStatus::Critical => {
                    result.mark_critical();
                    Issue::must(format!("Token budget exceeded: {} tokens", d.body))
                        .with_suggestion(format!("MUST move {excess}+ tokens to references/"))
                }
                BudgetStatus::Warning => Issue::should(format!("Token count high: {} tokens", d.body))
                    .with_suggestion(format!("Move {excess}+ tokens to references/")),
                BudgetStatus::Ok if budget.above_target(limits) => {
                    Issue::may(format!("Token count above target: {} tokens", d.body))
                        .with_suggestion(format!("Consider moving {excess} tokens to references/"))
                }
                BudgetStatus::Ok => Issue::ok(format!("Token count OK: {} tokens", d.body)),
            };
            result.push(issue.with_file(file).with_details(d.clone()));

            if d.frontmatter > limits.metadata_warning {
                result.push(
                    Issue::should(format!("Description too long: {} tokens", d.frontmatter))
                        .with_file(file)
                        .with_suggestion(format!(
                            "Keep the description near {} tokens",
                            limits.metadata_target
                        )),
                );
            }

            for (label, err) in &budget.unreadable {
                let path = format!("{}/{label}", file.trim_end_matches("/SKILL.md"));
                result.push(Issue::must("Cannot read file").with_file(path).with_source(err));
            }

            if ctx.verbose() {
                push_breakdown(&mut result, &budget, limits.metadata_target, limits.body_target);
            }
        }

        result
    }
}

fn push_breakdown(result: &mut CheckResult, budget: &SkillBudget, meta_target: usize, body_target: usize) {
    let d = &budget.details;
    let refs: Vec<_> = d.files_of(FileRole::Reference).collect();
    let scripts: Vec<_> = d.files_of(FileRole::Script).collect();

    result.push(Issue::ok(format!("  Frontmatter: {} tokens (target: ~{meta_target})", d.frontmatter)));
    result.push(Issue::ok(format!("  Body: {} tokens (target: ~{body_target})", d.body)));
    result.push(Issue::ok(format!("  References: {} tokens ({} files)", d.refs, refs.len())));
    for f in refs {
        result.push(Issue::ok(format!("    - {}: {} tokens", f.file, f.tokens)));
    }
    if !scripts.is_empty() {
        result.push(Issue::ok(format!("  Scripts: {} tokens ({} files)", d.scripts, scripts.len())));
        for f in scripts {
            result.push(Issue::ok(format!("    - {}: {} tokens", f.file, f.tokens)));
        }
    }
    result.push(Issue::ok(format!("  Total: {} tokens", d.total)));
}
