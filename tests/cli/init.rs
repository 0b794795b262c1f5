use anyhow::{Context, Result};
use serde_json::Value;

use crate::{CliTest, run};

#[test]
fn test_init_creates_config() -> Result<()> {
    let test = CliTest::new()?;

    let output = run({
        let mut cmd = test.command();
        cmd.arg("init");
        cmd
    })?;

    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("Created .quarryrc.json"));
    assert!(test.root().join(".quarryrc.json").exists());

    let content = test.read_file(".quarryrc.json")?;
    let parsed: Value = serde_json::from_str(&content).context("Config should be valid JSON")?;
    assert_eq!(parsed["includes"], serde_json::json!(["src"]));
    assert_eq!(parsed["staticQueryElements"], true);
    assert_eq!(parsed["frameworkPackage"], "gatsby");
    assert!(content.contains("  "), "Config should use 2-space indentation");
    Ok(())
}

#[test]
fn test_init_fails_if_exists() -> Result<()> {
    let test = CliTest::with_file(".quarryrc.json", "{}")?;

    let mut cmd = test.command();
    cmd.arg("init");
    let output = run(cmd)?;

    assert_eq!(output.code, Some(1));
    assert!(output.stderr.contains(".quarryrc.json already exists"));
    assert_eq!(test.read_file(".quarryrc.json")?, "{}");
    Ok(())
}

#[test]
fn test_init_config_is_immediately_usable() -> Result<()> {
    let test = CliTest::new()?;
    test.command().arg("init").output()?;
    test.write_file(
        "src/pages/index.js",
        "import { graphql } from \"gatsby\"\nexport const query = graphql`{ site { id } }`\n",
    )?;

    let output = run(test.extract_command())?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert!(output.stdout.contains("Extracted 1 query"));
    Ok(())
}
