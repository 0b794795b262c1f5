use anyhow::Result;
use serde_json::Value;

use crate::{CliTest, run};

const PAGE: &str = r#"import React from "react"
import { graphql } from "gatsby"

export default function Index({ data }) {
  return <h1>{data.site.siteMetadata.title}</h1>
}

export const query = graphql`
  query IndexQuery {
    site { siteMetadata { title } }
  }
`
"#;

const SEO: &str = r#"import { useStaticQuery, graphql } from "gatsby"

export const Head = () => null

export default function Seo() {
  const data = useStaticQuery(graphql`{ site { siteMetadata { description } } }`)
  return <meta name="description" content={data.site.siteMetadata.description} />
}
"#;

#[test]
fn test_extract_page_query() -> Result<()> {
    let test = CliTest::with_file("src/pages/index.js", PAGE)?;

    let output = run(test.extract_command())?;

    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);
    assert!(output.stdout.contains("page   IndexQuery  src/pages/index.js:8:30"));
    assert!(output.stdout.contains("Extracted 1 query from 1 of 1 file"));
    Ok(())
}

#[test]
fn test_extract_json() -> Result<()> {
    let test = CliTest::with_file("src/pages/index.js", PAGE)?;
    test.write_file("src/components/seo.js", SEO)?;
    test.write_file("src/components/button.js", "export const Button = () => null")?;

    let mut cmd = test.extract_command();
    cmd.arg("--json");
    let output = run(cmd)?;
    assert_eq!(output.code, Some(0), "stderr: {}", output.stderr);

    let json: Value = serde_json::from_str(&output.stdout)?;
    let fragments = json["fragments"].as_array().unwrap();
    assert_eq!(fragments.len(), 2);
    assert_eq!(json["filesScanned"], 3);

    let hook = fragments
        .iter()
        .find(|f| f["filePath"] == "src/components/seo.js")
        .unwrap();
    assert_eq!(hook["isHook"], true);
    assert_eq!(hook["isStaticQuery"], true);
    assert_eq!(hook["isAutoNamed"], true);

    let seo = &json["components"]["src/components/seo.js"];
    assert_eq!(seo["queryExtracted"], true);
    assert_eq!(seo["features"]["hasHeadExport"], true);
    assert_eq!(seo["features"]["hasServerDataExport"], false);

    // No markers, so the button was never parsed.
    assert!(json["components"].get("src/components/button.js").is_none());
    assert_eq!(json["diagnostics"].as_array().unwrap().len(), 0);
    Ok(())
}

#[test]
fn test_extract_reports_interpolation() -> Result<()> {
    let test = CliTest::with_file("src/pages/index.js", PAGE)?;
    test.write_file(
        "src/pages/bad.js",
        "import { graphql } from \"gatsby\"\nexport const query = graphql`{ site { ${field} } }`\n",
    )?;

    let output = run(test.extract_command())?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("error[85916]: string interpolation is not allowed"));
    assert!(output.stdout.contains("--> src/pages/bad.js:2:39"));
    assert!(output.stdout.contains("> 2 | export const query"));
    assert!(output.stdout.contains("1 problems (1 error, 0 warnings)"));
    assert!(output.stdout.contains("Extracted 1 query from 1 of 2 files"));
    Ok(())
}

#[test]
fn test_extract_config_export_must_be_async() -> Result<()> {
    let test = CliTest::with_file(
        "src/pages/deferred.js",
        "import { graphql } from \"gatsby\"\nexport function config() {\n  graphql`{ site { id } }`\n  return () => ({})\n}\n",
    )?;

    let output = run(test.extract_command())?;

    assert_eq!(output.code, Some(1));
    assert!(output.stdout.contains("error[85929]"));
    assert!(output.stdout.contains("--> src/pages/deferred.js:2:1"));
    Ok(())
}

#[test]
fn test_extract_ambient_tag_aborts() -> Result<()> {
    let test = CliTest::with_file(
        "src/pages/legacy.js",
        "export const query = graphql`{ site { id } }`\n",
    )?;

    let output = run(test.extract_command())?;

    assert_eq!(output.code, Some(2));
    assert!(output.stdout.contains("deprecated-ambient-tag"));
    assert!(output.stdout.contains("Extraction aborted by a fatal error"));
    Ok(())
}

#[test]
fn test_extract_unresolved_static_query_variable() -> Result<()> {
    let test = CliTest::with_file(
        "src/components/layout.js",
        "import { StaticQuery } from \"gatsby\"\nimport { layoutQuery } from \"./queries\"\nexport default () => <StaticQuery query={layoutQuery} render={() => null} />\n",
    )?;

    let output = run(test.extract_command())?;

    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("warning: We were unable to find the declaration of variable \"layoutQuery\""));
    assert!(output.stdout.contains("(0 errors, 1 warning)"));

    let mut cmd = test.extract_command();
    cmd.arg("--no-static-query-elements");
    let output = run(cmd)?;
    assert!(!output.stdout.contains("warning"));
    Ok(())
}

#[test]
fn test_extract_respects_config_file() -> Result<()> {
    let test = CliTest::with_file("app/pages/index.js", PAGE)?;
    test.write_file("src/pages/other.js", PAGE)?;
    test.write_file(".quarryrc.json", r#"{ "includes": ["app"] }"#)?;

    let output = run(test.extract_command())?;

    assert_eq!(output.code, Some(0));
    assert!(output.stdout.contains("app/pages/index.js"));
    assert!(!output.stdout.contains("src/pages/other.js"));
    Ok(())
}

#[test]
fn test_extract_invalid_config() -> Result<()> {
    let test = CliTest::with_file(".quarryrc.json", r#"{ "ignores": ["[invalid"] }"#)?;

    let output = run(test.extract_command())?;

    assert_eq!(output.code, Some(2));
    assert!(output.stderr.contains("Invalid glob pattern in 'ignores'"));
    Ok(())
}

#[test]
fn test_extract_skips_test_files() -> Result<()> {
    let test = CliTest::with_file("src/pages/index.js", PAGE)?;
    test.write_file("src/pages/index.test.js", PAGE)?;

    let output = run(test.extract_command())?;

    assert!(output.stdout.contains("Extracted 1 query from 1 of 1 file"));
    Ok(())
}

#[test]
fn test_extract_with_source_root() -> Result<()> {
    let test = CliTest::with_file("site/src/pages/index.js", PAGE)?;

    let mut cmd = test.extract_command();
    cmd.args(["--source-root", "site", "--json"]);
    let output = run(cmd)?;

    let json: Value = serde_json::from_str(&output.stdout)?;
    assert_eq!(json["fragments"][0]["name"], "IndexQuery");
    assert_eq!(json["fragments"][0]["filePath"], "site/src/pages/index.js");
    Ok(())
}
