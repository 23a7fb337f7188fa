//! plint validate - Run the plugin checks and report the verdict

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use serde::Serialize;
use tracing::info;

use crate::app::{AppContext, require_dir};
use crate::cli::Cli;
use crate::cli::output::{HumanLayout, emit_human, emit_json, severity_label};
use crate::core::component::{ComponentKind, ComponentSet};
use crate::core::manifest::ManifestSource;
use crate::error::Result;
use crate::lint::{CheckKind, Issue, Report, Severity, ValidationContext, ValidationEngine, Verdict};
use crate::utils::truncate_excerpt;

/// Characters of source text shown per issue.
const EXCERPT_CHARS: usize = 80;

/// Reference volume suggested alongside budget details.
const REFS_HINT: usize = 2000;

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Plugin root directory
    #[arg(value_name = "PLUGIN_PATH")]
    pub plugin_path: PathBuf,

    /// Checks to run, comma-separated, or `all`
    #[arg(long, default_value = "all", value_name = "LIST")]
    pub check: String,
}

pub fn run(cli: &Cli, args: &ValidateArgs) -> Result<u8> {
    require_dir(&args.plugin_path, "Plugin directory")?;
    let kinds = CheckKind::parse_list(&args.check)?;
    let ctx = AppContext::from_cli(cli, &args.plugin_path)?;

    let root = ctx.target.as_path();
    let components = ComponentSet::discover(root);
    let manifest = ManifestSource::load(root);
    let engine = ValidationEngine::with_defaults(ctx.validation.clone()).select(&kinds);
    let vctx = ValidationContext::new(
        root,
        &components,
        &manifest,
        engine.config(),
        ctx.counter.as_ref(),
    );
    let report = engine.validate_with_context(&vctx);
    let verdict = report.verdict();
    info!(
        must = verdict.must,
        should = verdict.should,
        may = verdict.may,
        exit_code = verdict.exit_code(),
        "validation finished"
    );

    if ctx.json {
        emit_json(&JsonReport::new(root, ctx.token_method(), &report))?;
    } else {
        emit_human(render_report(&ctx, &kinds, &components, &report));
    }

    Ok(verdict.exit_code())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    plugin: String,
    token_method: &'static str,
    results: Vec<JsonCheck<'a>>,
    summary: JsonSummary,
}

#[derive(Serialize)]
struct JsonCheck<'a> {
    check: CheckKind,
    passed: bool,
    issues: Vec<&'a Issue>,
}

#[derive(Serialize)]
struct JsonSummary {
    #[serde(flatten)]
    verdict: Verdict,
    exit_code: u8,
}

impl<'a> JsonReport<'a> {
    fn new(root: &Path, token_method: &'static str, report: &'a Report) -> Self {
        let verdict = report.verdict();
        Self {
            plugin: root.display().to_string(),
            token_method,
            results: report
                .results
                .iter()
                .map(|r| JsonCheck {
                    check: r.check,
                    passed: r.passed,
                    issues: r.issues.iter().filter(|i| i.severity != Severity::Ok).collect(),
                })
                .collect(),
            summary: JsonSummary {
                exit_code: verdict.exit_code(),
                verdict,
            },
        }
    }
}

fn render_report(
    ctx: &AppContext,
    kinds: &[CheckKind],
    components: &ComponentSet,
    report: &Report,
) -> HumanLayout {
    let mut layout = HumanLayout::new();
    layout.title("PLUGIN VALIDATION REPORT");
    layout.kv("Target", &ctx.target.display().to_string());
    layout.kv(
        "Checks",
        &kinds.iter().map(|k| k.name()).collect::<Vec<_>>().join(", "),
    );
    layout.kv("Token method", ctx.token_method());
    layout.blank();
    layout.push_line("Components:");
    for kind in ComponentKind::ALL {
        let label = format!("{}:", capitalize(kind.dir_name()));
        layout.push_line(format!("  {label:<10}{}", components.of_kind(kind).len()));
    }

    for severity in Severity::REPORTED {
        render_group(&mut layout, report, severity, ctx);
    }
    if ctx.verbose() {
        render_group(&mut layout, report, Severity::Ok, ctx);
    }

    let verdict = report.verdict();
    layout.blank();
    layout.section("SUMMARY");
    layout.kv("MUST", &verdict.must.to_string());
    layout.kv("SHOULD", &verdict.should.to_string());
    layout.kv("MAY", &verdict.may.to_string());
    layout.blank();
    let result = if !verdict.passed {
        style("Result: FAILED").red().bold()
    } else if verdict.should > 0 {
        style("Result: PASSED (with recommendations)").yellow().bold()
    } else {
        style("Result: PASSED").green().bold()
    };
    layout.push_line(result.to_string());
    if verdict.critical {
        layout.push_line("Token budget critically exceeded.");
    }
    layout
}

fn render_group(layout: &mut HumanLayout, report: &Report, severity: Severity, ctx: &AppContext) {
    let issues: Vec<_> = report.issues(severity).collect();
    if issues.is_empty() {
        return;
    }

    layout.blank();
    layout.section(&format!(
        "[{}] {} ({})",
        severity.to_string().to_uppercase(),
        group_title(severity),
        issues.len()
    ));

    if severity == Severity::Ok {
        for issue in issues {
            layout.bullet(&issue.message);
        }
        return;
    }

    for issue in issues {
        layout.push_line(format!(
            "{} {}",
            severity_label(severity),
            style(issue.location()).bold()
        ));
        layout.detail("Issue", &issue.message);
        if let Some(source) = &issue.source {
            layout.detail("Source", &truncate_excerpt(source, EXCERPT_CHARS));
        }
        if let Some(d) = &issue.details {
            let limits = &ctx.validation.budget;
            layout.detail(
                "Tokens",
                &format!("frontmatter={}, body={}, refs={}", d.frontmatter, d.body, d.refs),
            );
            layout.detail(
                "Target",
                &format!(
                    "frontmatter~{}, body~{}, refs>={REFS_HINT}",
                    limits.metadata_target, limits.body_target
                ),
            );
        }
        if let Some(suggestion) = &issue.suggestion {
            layout.detail("Fix", suggestion);
        }
    }
}

const fn group_title(severity: Severity) -> &'static str {
    match severity {
        Severity::Must => "Critical Issues",
        Severity::Should => "Recommended Fixes",
        Severity::May => "Optional Improvements",
        Severity::Ok => "Passing Checks",
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
