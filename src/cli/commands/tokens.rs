//! plint tokens - Standalone skill budget report

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use serde::Serialize;

use crate::app::AppContext;
use crate::cli::Cli;
use crate::cli::output::{HumanLayout, emit_human, emit_json};
use crate::config::BudgetConfig;
use crate::core::budget::{BudgetStatus, SkillBudget};
use crate::core::component::{ComponentKind, SKILL_ENTRY, skill_dirs};
use crate::error::{PlintError, Result};
use crate::utils::plural;

/// Reference volume of a skill that makes good use of progressive loading.
const TYPICAL_REFS: usize = 2000;

#[derive(Args, Debug)]
pub struct TokensArgs {
    /// Markdown file, skill directory, or plugin root
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

/// What the given path turned out to be.
#[derive(Debug, PartialEq, Eq)]
enum Target {
    File,
    Skill,
    Plugin(Vec<PathBuf>),
}

pub fn run(cli: &Cli, args: &TokensArgs) -> Result<u8> {
    let target = classify(&args.path)?;
    let ctx = AppContext::from_cli(cli, &args.path)?;

    let dirs = match target {
        Target::File => return count_file(&ctx, &args.path),
        Target::Skill => vec![args.path.clone()],
        Target::Plugin(dirs) => dirs,
    };

    let limits = &ctx.validation.budget;
    let budgets = dirs
        .iter()
        .map(|dir| analyze(dir, &ctx))
        .collect::<Result<Vec<_>>>()?;

    if ctx.json {
        emit_json(&budgets)?;
    } else {
        emit_human(render(&ctx, &budgets, limits));
    }

    Ok(exit_code(&budgets))
}

fn classify(path: &Path) -> Result<Target> {
    if !path.exists() {
        return Err(PlintError::NotFound(format!("Path not found: {}", path.display())));
    }
    if path.is_file() {
        return Ok(Target::File);
    }
    if path.join(SKILL_ENTRY).is_file() {
        return Ok(Target::Skill);
    }
    if path.join(ComponentKind::Skill.dir_name()).is_dir() {
        let dirs: Vec<_> = skill_dirs(path)
            .into_iter()
            .filter(|dir| dir.join(SKILL_ENTRY).is_file())
            .collect();
        if dirs.is_empty() {
            return Err(PlintError::NotFound(format!(
                "No skills found in {}",
                path.display()
            )));
        }
        return Ok(Target::Plugin(dirs));
    }
    Err(PlintError::InvalidPlugin(format!(
        "{} is not a skill directory or plugin",
        path.display()
    )))
}

fn analyze(dir: &Path, ctx: &AppContext) -> Result<SkillBudget> {
    let entry_path = dir.join(SKILL_ENTRY);
    let entry = std::fs::read_to_string(&entry_path).map_err(|err| PlintError::Read {
        path: entry_path,
        message: err.to_string(),
    })?;
    Ok(SkillBudget::analyze(
        dir,
        &entry,
        ctx.counter.as_ref(),
        &ctx.validation.budget,
    ))
}

#[derive(Serialize)]
struct FileCount<'a> {
    file: String,
    tokens: usize,
    method: &'a str,
}

fn count_file(ctx: &AppContext, path: &Path) -> Result<u8> {
    let text = std::fs::read_to_string(path).map_err(|err| PlintError::Read {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let count = FileCount {
        file: path.display().to_string(),
        tokens: ctx.counter.count(&text),
        method: ctx.token_method(),
    };

    if ctx.json {
        emit_json(&count)?;
    } else {
        let mut layout = HumanLayout::new();
        layout.kv("File", &count.file);
        layout.kv("Tokens", &count.tokens.to_string());
        layout.kv("Method", count.method);
        emit_human(layout);
    }
    Ok(0)
}

/// 2 when any skill is critical, 1 on any warning, else 0.
fn exit_code(budgets: &[SkillBudget]) -> u8 {
    match budgets.iter().map(|b| b.status).max() {
        Some(BudgetStatus::Critical) => 2,
        Some(BudgetStatus::Warning) => 1,
        _ => 0,
    }
}

fn render(ctx: &AppContext, budgets: &[SkillBudget], limits: &BudgetConfig) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout.title(&format!("Token Counter (method: {})", ctx.token_method()));

    for budget in budgets {
        render_skill(&mut layout, budget, limits, ctx.verbose());
    }

    let count = |status: BudgetStatus| budgets.iter().filter(|b| b.status == status).count();
    let above_target = budgets
        .iter()
        .filter(|b| b.status == BudgetStatus::Ok && b.above_target(limits))
        .count();

    layout.blank();
    layout.section("Token Budget Summary");
    layout.kv("Analyzed", &plural(budgets.len(), "skill"));
    layout.kv("Within target", &(count(BudgetStatus::Ok) - above_target).to_string());
    layout.kv("Above target", &above_target.to_string());
    layout.kv("Warnings", &count(BudgetStatus::Warning).to_string());
    layout.kv("Critical", &count(BudgetStatus::Critical).to_string());
    layout.blank();

    let result = match exit_code(budgets) {
        2 => style(format!(
            "Result: FAILED - SKILL.md above {} tokens must move content to references/",
            limits.body_critical
        ))
        .red()
        .bold(),
        1 => style(format!(
            "Result: ATTENTION - SKILL.md above {} tokens should be optimized",
            limits.body_warning
        ))
        .yellow()
        .bold(),
        _ if above_target > 0 => style(format!(
            "Result: PASSED - {} above the ~{} target",
            plural(above_target, "skill"),
            limits.body_target
        ))
        .green()
        .bold(),
        _ => style("Result: PASSED - all skills within targets".to_string())
            .green()
            .bold(),
    };
    layout.push_line(result.to_string());
    layout
}

fn render_skill(layout: &mut HumanLayout, budget: &SkillBudget, limits: &BudgetConfig, verbose: bool) {
    let d = &budget.details;
    let status = match budget.status {
        BudgetStatus::Ok => style("OK").green(),
        BudgetStatus::Warning => style("WARNING").yellow(),
        BudgetStatus::Critical => style("CRITICAL").red().bold(),
    };

    layout.blank();
    layout.push_line(format!("{} [{status}]", style(&budget.name).bold()));
    layout.detail("Path", &budget.path.display().to_string());
    layout.detail(
        "Tier 1 (Metadata)",
        &format!("{:>6} tokens (target: ~{})", d.frontmatter, limits.metadata_target),
    );
    layout.detail(
        "Tier 2 (SKILL.md)",
        &format!("{:>6} tokens (target: ~{})", d.body, limits.body_target),
    );
    layout.detail(
        "Tier 3 (References)",
        &format!("{:>6} tokens ({TYPICAL_REFS}+ typical)", d.refs),
    );
    if d.scripts > 0 {
        layout.detail("Scripts", &format!("{:>6} tokens", d.scripts));
    }
    layout.detail("Total", &format!("{:>6} tokens", d.total));

    let warnings = budget.warnings(limits);
    if !warnings.is_empty() {
        layout.push_line("  Issues:");
        for warning in warnings {
            layout.push_line(format!("    - {warning}"));
        }
    }

    if verbose {
        layout.push_line("  Files:");
        for file in &d.files {
            layout.push_line(format!("    - {}: {} tokens ({})", file.file, file.tokens, file.role));
        }
    }
}
