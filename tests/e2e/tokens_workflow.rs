//! E2E Scenario: Tokens Workflow
//!
//! Runs `plint tokens` on single files, single skills and whole plugins and
//! checks the tier report and exit code policy.

use super::fixture::E2EFixture;

fn sized(units: usize) -> String {
    format!(
        "---\nname: sized\ndescription: Use when measuring budgets\n---\n{}",
        "abcd".repeat(units)
    )
}

#[test]
fn test_single_skill_tiers() {
    let mut fixture = E2EFixture::plugin("single_skill_tiers");
    fixture.create_skill("sized", &sized(600));
    fixture.create_file("skills/sized/references/guide.md", &"x".repeat(400));
    fixture.create_file("skills/sized/scripts/run.sh", &"echo ".repeat(20));

    fixture.log_step("Analyze the skill directory");
    let output = fixture.run_plint(&["tokens", &fixture.path_arg("skills/sized")]);
    fixture.assert_exit_code(&output, 0, "above target only");
    fixture.assert_output_contains(&output, "Tier 1 (Metadata)");
    fixture.assert_output_contains(&output, "Tier 3 references thin: only 100 tokens");
    fixture.assert_output_contains(&output, "Result: PASSED - 1 skill above the ~500 target");

    fixture.log_step("Same analysis as JSON");
    let output = fixture.run_plint(&["--json", "tokens", &fixture.path_arg("skills/sized")]);
    let json = output.json();
    let skill = &json[0];
    assert_eq!(skill["name"], "sized");
    assert_eq!(skill["status"], "OK");
    assert_eq!(skill["body"], 600);
    assert_eq!(skill["refs"], 100);
    assert_eq!(skill["scripts"], 25);
    assert_eq!(skill["total"], skill["frontmatter"].as_u64().unwrap() + 725);
    let types: Vec<_> = skill["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["type"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(types, ["skill", "reference", "script"]);
}

#[test]
fn test_plugin_exit_codes() {
    let mut fixture = E2EFixture::plugin("plugin_exit_codes");
    fixture.create_skill("small", &sized(100));

    fixture.log_step("All skills within target");
    let output = fixture.run_plint(&["tokens", &fixture.root_arg()]);
    fixture.assert_exit_code(&output, 0, "small skill");
    fixture.assert_output_contains(&output, "Analyzed:");

    fixture.log_step("One skill over the warning threshold");
    fixture.create_skill("medium", &sized(801));
    let output = fixture.run_plint(&["tokens", &fixture.root_arg()]);
    fixture.assert_exit_code(&output, 1, "warning skill");

    fixture.log_step("One skill over the critical threshold");
    fixture.create_skill("large", &sized(2501));
    let output = fixture.run_plint(&["--json", "tokens", &fixture.root_arg()]);
    fixture.assert_exit_code(&output, 2, "critical skill");
    let names: Vec<_> = output
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["large", "medium", "small"]);
}

#[test]
fn test_not_a_plugin() {
    let mut fixture = E2EFixture::new("not_a_plugin");
    fixture.create_file("notes/readme.txt", "hello");

    fixture.log_step("Directory without skills");
    let output = fixture.run_plint(&["tokens", &fixture.root_arg()]);
    fixture.assert_exit_code(&output, 1, "not a plugin");
    assert!(!output.success);
    assert!(output.stderr.contains("is not a skill directory or plugin"));
}
