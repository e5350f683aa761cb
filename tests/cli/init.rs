use anyhow::{Context, Result};
use serde_json::Value;

use crate::CliTest;

/// Validates config file structure and default values.
fn assert_config_content(content: &str) -> Result<()> {
    let parsed: Value = serde_json::from_str(content).context("Config should be valid JSON")?;

    for field in ["sourceFile", "catalogRoot", "overridesRoot", "priority"] {
        assert!(
            parsed.get(field).is_some(),
            "Config should have '{}' field",
            field
        );
    }
    assert_eq!(
        parsed["priority"],
        serde_json::json!(["source", "official", "catalog", "override"])
    );
    assert!(
        content.contains("  "),
        "Config should use 2-space indentation"
    );

    Ok(())
}

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = test.command().arg("init").output()?;
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim_end(),
        "\u{2713} Created .catsyncrc.json"
    );

    assert!(test.root().join(".catsyncrc.json").exists());
    let content = test.read_file(".catsyncrc.json")?;
    assert_config_content(&content)?;

    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".catsyncrc.json", "{}")?;

    let output = test.command().arg("init").output()?;
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains(".catsyncrc.json already exists"));
    assert_eq!(test.read_file(".catsyncrc.json")?, "{}");

    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;

    test.command().arg("init").output()?;
    test.write_file(
        "strings.json",
        r#"{ "strings": [ { "kind": "Item", "id": 1, "field": "name", "text": "Potion" } ] }"#,
    )?;

    let output = test.sync_command().arg("--apply").output()?;
    assert!(
        output.status.success(),
        "Sync command should work with initialized config. stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(test.root().join("catalogs/template/item.pot").exists());

    Ok(())
}
