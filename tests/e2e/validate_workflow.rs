//! E2E Scenario: Validate Workflow
//!
//! Runs `plint validate` against complete plugin trees:
//! - A plugin with every component kind passes cleanly
//! - Fixing reported issues moves the verdict from FAILED to PASSED
//! - Declared skill commands are cross-checked against user-invocable skills
//! - JSON output omits passing details even in verbose mode

use super::fixture::E2EFixture;

const COMMAND_REVIEW: &str = "---\ndescription: Review the current diff\nallowed-tools: Bash(git:*)\n---\n\nReview the staged changes and summarise risks.\n";

const AGENT_AUDITOR: &str = "---\nname: code-auditor\ndescription: Audits code for security issues\nmodel: sonnet\ncolor: red\n---\n\nInspect each changed file.\n";

const SKILL_RELEASE: &str = "---\nname: release-notes\ndescription: Use when drafting release notes from merged changes\n---\n\n# Release notes\n\nCollect merged changes and group them by area.\n\n```\nUse Read tool to read each file.\n```\n";

fn full_plugin(scenario: &str) -> E2EFixture {
    let fixture = E2EFixture::plugin(scenario);
    fixture.create_file("commands/review.md", COMMAND_REVIEW);
    fixture.create_file("agents/code-auditor.md", AGENT_AUDITOR);
    fixture.create_skill("release-notes", SKILL_RELEASE);
    fixture.create_file("skills/release-notes/references/format.md", "# Format\n\nSections and ordering.\n");
    fixture
}

#[test]
fn test_full_plugin_passes() {
    let mut fixture = full_plugin("full_plugin_passes");

    fixture.log_step("Validate every check");
    let output = fixture.run_plint(&["validate", &fixture.root_arg()]);
    fixture.assert_exit_code(&output, 0, "clean plugin");
    fixture.assert_output_contains(&output, "Commands: 1");
    fixture.assert_output_contains(&output, "Agents:   1");
    fixture.assert_output_contains(&output, "Skills:   1");
    fixture.assert_output_contains(&output, "Result: PASSED");
    assert!(!output.stdout.contains("[SHOULD]"), "no recommendations expected");

    fixture.log_step("Same run as JSON");
    let output = fixture.run_plint(&["--json", "validate", &fixture.root_arg()]);
    let json = output.json();
    assert_eq!(json["summary"]["must"], 0);
    assert_eq!(json["summary"]["should"], 0);
    assert_eq!(json["summary"]["exit_code"], 0);
    for result in json["results"].as_array().expect("results") {
        assert_eq!(result["passed"], true, "{} should pass", result["check"]);
    }
}

#[test]
fn test_fix_loop() {
    let mut fixture = full_plugin("fix_loop");

    fixture.log_step("Break the agent header");
    fixture.create_file(
        "agents/code-auditor.md",
        "---\nname: code-auditor\ndescription: Audits code\nmodel: haiku\ncolor: teal\n---\nBody\n",
    );
    let output = fixture.run_plint(&["--json", "validate", "--check", "frontmatter", &fixture.root_arg()]);
    fixture.assert_exit_code(&output, 1, "invalid color");
    let json = output.json();
    let issues = json["results"][0]["issues"].as_array().expect("issues");
    assert_eq!(issues.len(), 1);
    assert_eq!(issues[0]["message"], "Invalid color value");
    assert_eq!(issues[0]["file"], "agents/code-auditor.md");
    assert_eq!(issues[0]["line"], 5);

    fixture.log_step("Repair the color");
    fixture.create_file("agents/code-auditor.md", AGENT_AUDITOR);
    let output = fixture.run_plint(&["validate", "--check", "header", &fixture.root_arg()]);
    fixture.assert_exit_code(&output, 0, "repaired agent");
    assert!(output.success);
}

#[test]
fn test_declared_commands_cross_check() {
    let mut fixture = full_plugin("declared_commands");
    fixture.create_skill(
        "publish",
        "---\nname: publish\ndescription: Use when publishing a release\nuser-invocable: true\n---\n\nPublish the release.\n",
    );

    fixture.log_step("Declare only the release-notes skill");
    fixture.write_manifest(
        r#"{
  "name": "e2e-plugin",
  "description": "Plugin used by end-to-end tests",
  "version": "0.1.0",
  "author": {"name": "E2E"},
  "keywords": ["e2e"],
  "commands": ["./skills/release-notes/"]
}"#,
    );
    let output = fixture.run_plint(&["--json", "validate", "--check", "manifest", &fixture.root_arg()]);
    fixture.assert_exit_code(&output, 1, "undeclared skill");
    let json = output.json();
    let issue = &json["results"][0]["issues"][0];
    assert_eq!(issue["message"], "Undeclared user-invocable skill");
    assert_eq!(issue["file"], "skills/publish/SKILL.md");
    assert_eq!(issue["line"], 4);

    fixture.log_step("Without a commands list every skill is discovered");
    fixture.write_manifest(super::fixture::VALID_MANIFEST);
    let output = fixture.run_plint(&["validate", "--check", "manifest", &fixture.root_arg()]);
    fixture.assert_exit_code(&output, 0, "auto-discovered skills");
}

#[test]
fn test_verbose_json_omits_ok_issues() {
    let mut fixture = full_plugin("verbose_json");

    fixture.log_step("Verbose human report lists passing rules");
    let output = fixture.run_plint(&["validate", "-v", &fixture.root_arg()]);
    fixture.assert_output_contains(&output, "[OK] Passing Checks");
    fixture.assert_output_contains(&output, "plugin.json location correct");

    fixture.log_step("Verbose JSON keeps only findings");
    let output = fixture.run_plint(&["--json", "-v", "validate", &fixture.root_arg()]);
    let json = output.json();
    for result in json["results"].as_array().expect("results") {
        assert!(result["issues"].as_array().expect("issues").is_empty());
    }
    assert!(output.stderr.is_empty(), "unexpected stderr: {}", output.stderr);
}
