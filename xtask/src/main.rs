//! Developer tasks (schema generation, fixture conformance, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use schemars::schema_for;
use std::fs;
use std::path::PathBuf;

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            // Fallback: assume we're in xtask dir or use current dir
            std::env::current_dir().expect("Cannot determine current directory")
        });

    // If we're in the xtask directory, go up one level
    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .expect("xtask has no parent")
            .to_path_buf()
    } else {
        manifest_dir
    }
}

/// Get the schemas directory path.
fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

/// Get the test fixtures directory path.
fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

/// Generate the audit report envelope schema.
fn generate_report_schema() -> schemars::Schema {
    schema_for!(imgward_types::AuditReport)
}

/// Generate the rules document schema.
fn generate_rules_schema() -> schemars::Schema {
    schema_for!(imgward_rules::RulesDoc)
}

/// List of schemas to generate.
fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "imgward.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "imgward.rules.v1.json",
            generate: generate_rules_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

/// Emit schemas to the schemas/ directory.
fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();

    // Ensure schemas directory exists
    if !dir.exists() {
        fs::create_dir_all(&dir).context("Failed to create schemas directory")?;
    }

    for spec in schema_specs() {
        let schema = (spec.generate)();
        let json = serialize_schema(&schema)?;
        let path = dir.join(spec.filename);

        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;

        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
/// Returns Ok(()) if all schemas match, Err otherwise.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut all_match = true;
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);

        if !path.exists() {
            missing.push(spec.filename);
            all_match = false;
            continue;
        }

        let schema = (spec.generate)();
        let expected = serialize_schema(&schema)?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        if expected != actual {
            mismatched.push(spec.filename);
            all_match = false;
        }
    }

    if all_match {
        println!("All schemas are up to date.");
        Ok(())
    } else {
        if !missing.is_empty() {
            eprintln!("Missing schemas:");
            for name in &missing {
                eprintln!("  - {}", name);
            }
        }
        if !mismatched.is_empty() {
            eprintln!("Schemas out of date:");
            for name in &mismatched {
                eprintln!("  - {}", name);
            }
        }
        eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
        bail!("Schema validation failed")
    }
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate fixture reports against the imgward.report.v1 schema");
    eprintln!("  explain-coverage  Validate all rule operators have explanations");
}

/// Validate imgward.report.v1 conformance.
///
/// This checks, for every `tests/fixtures/*/expected.report.json`:
/// 1. Schema validation against the generated report schema
/// 2. Tally hygiene: findings_total matches the findings array and the
///    severity counts add up
fn conform() -> anyhow::Result<()> {
    let schema = generate_report_schema();
    let schema_value = serde_json::to_value(&schema).context("Failed to serialize schema")?;

    // schemars emits 2020-12 schemas
    let compiled = jsonschema::draft202012::new(&schema_value)
        .map_err(|e| anyhow::anyhow!("Failed to compile schema: {}", e))?;

    println!("✓ imgward.report.v1 schema compiles");

    let fixtures = fixtures_dir();
    if !fixtures.exists() {
        bail!(
            "tests/fixtures/ not found at {}\n\n\
            Create audit fixtures first.",
            fixtures.display()
        );
    }

    let mut fixture_count = 0;
    let mut errors = Vec::new();

    for entry in fs::read_dir(&fixtures).context("Failed to read tests/fixtures/")? {
        let entry = entry?;
        let fixture_dir = entry.path();
        if !fixture_dir.is_dir() {
            continue;
        }

        let report_path = fixture_dir.join("expected.report.json");
        if !report_path.exists() {
            continue;
        }

        let fixture_name = fixture_dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let content = fs::read_to_string(&report_path)
            .with_context(|| format!("Failed to read {}", report_path.display()))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {} as JSON", fixture_name))?;

        // 1. Schema validation
        for err in compiled.iter_errors(&value) {
            errors.push(format!("{}: schema validation: {}", fixture_name, err));
        }

        // 2. Tally hygiene
        let findings_len = value
            .get("findings")
            .and_then(|v| v.as_array())
            .map(Vec::len)
            .unwrap_or_default() as u64;
        let findings_total = value
            .pointer("/data/findings_total")
            .and_then(|v| v.as_u64())
            .unwrap_or_default();
        if findings_total != findings_len {
            errors.push(format!(
                "{}: findings_total {} disagrees with {} findings",
                fixture_name, findings_total, findings_len
            ));
        }

        let counted: u64 = ["low", "medium", "high", "critical"]
            .iter()
            .filter_map(|s| {
                value
                    .pointer(&format!("/data/counts/{s}"))
                    .and_then(|v| v.as_u64())
            })
            .sum();
        if counted != findings_total {
            errors.push(format!(
                "{}: severity counts sum to {} but findings_total is {}",
                fixture_name, counted, findings_total
            ));
        }

        fixture_count += 1;
        println!("  ✓ {} validates", fixture_name);
    }

    if fixture_count == 0 {
        bail!("No fixture reports found in {}", fixtures.display());
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!(
        "\n✓ All {} fixture reports pass conformance checks!",
        fixture_count
    );
    Ok(())
}

/// Validate that every rule operator has an explanation and compiles.
fn explain_coverage() -> anyhow::Result<()> {
    let operators = imgward_types::all_operator_names();

    let mut errors = Vec::new();

    for name in operators {
        match imgward_types::lookup_explanation(name) {
            Some(exp) => {
                if exp.title.is_empty() {
                    errors.push(format!("Operator '{}' has empty title", name));
                }
                if exp.description.is_empty() {
                    errors.push(format!("Operator '{}' has empty description", name));
                }
                if exp.notes.is_empty() {
                    errors.push(format!("Operator '{}' has empty notes", name));
                }
                if exp.example.is_empty() {
                    errors.push(format!("Operator '{}' has empty example", name));
                }
            }
            None => {
                errors.push(format!("Operator '{}' has no explanation", name));
            }
        }

        // The registry and the engine must agree on the operator set.
        if imgward_engine::Op::parse(name).is_none() {
            errors.push(format!(
                "Operator '{}' is documented but the engine does not recognize it",
                name
            ));
        }
    }

    if errors.is_empty() {
        println!("✓ {} operators have explanations", operators.len());
        println!("✓ all documented operators compile in the engine");
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!(
            "Explain coverage validation failed with {} errors",
            errors.len()
        )
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            // List all schema IDs for reference
            for spec in schema_specs() {
                let name = spec.filename.trim_end_matches(".json");
                println!("{}", name);
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
