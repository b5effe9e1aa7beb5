//! Integration tests for the diagram and schema commands.

use jsonschema::Validator;
use serde_json::Value;
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

fn schema_diagram_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_schema-diagram"))
}

const SNAPSHOT: &str = r#"{
    "tables": [
        {"schema": "dbo", "name": "Users"},
        {"schema": "dbo", "name": "Orders"},
        {"schema": "dbo", "name": "OrderLines"},
        {"schema": "audit", "name": "Events"}
    ],
    "columns": [
        {"schema": "dbo", "table": "Users", "name": "Id", "data_type": "int", "is_primary_key": true},
        {"schema": "dbo", "table": "Users", "name": "Email", "data_type": "varchar", "max_length": 255},
        {"schema": "dbo", "table": "Orders", "name": "Id", "data_type": "int", "is_primary_key": true},
        {"schema": "dbo", "table": "Orders", "name": "UserId", "data_type": "int"},
        {"schema": "dbo", "table": "Orders", "name": "Total", "data_type": "decimal", "precision": 10, "scale": 2},
        {"schema": "dbo", "table": "OrderLines", "name": "OrderId", "data_type": "int", "is_primary_key": true},
        {"schema": "dbo", "table": "OrderLines", "name": "LineNo", "data_type": "int", "is_primary_key": true},
        {"schema": "audit", "table": "Events", "name": "Id", "data_type": "bigint", "is_primary_key": true}
    ],
    "foreign_keys": [
        {
            "constraint_name": "FK_Orders_Users",
            "child_schema": "dbo", "child_table": "Orders", "child_column": "UserId",
            "parent_schema": "dbo", "parent_table": "Users", "parent_column": "Id"
        },
        {
            "constraint_name": "FK_OrderLines_Orders",
            "child_schema": "dbo", "child_table": "OrderLines", "child_column": "OrderId",
            "parent_schema": "dbo", "parent_table": "Orders", "parent_column": "Id"
        }
    ]
}"#;

fn write_snapshot(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("Shop.json");
    fs::write(&path, content).unwrap();
    path
}

fn run(args: &[&str]) -> Output {
    schema_diagram_bin().args(args).output().unwrap()
}

#[test]
fn test_mermaid_to_file() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir, SNAPSHOT);
    let output = dir.path().join("schema.mmd");

    let result = run(&[
        "diagram",
        snapshot.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--server",
        "prod",
    ]);

    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Mermaid diagram saved to"));

    let content = fs::read_to_string(&output).unwrap();
    assert!(content.contains("title: 'Database Shop on prod'"));
    assert!(content.contains("erDiagram"));
    assert!(content.contains("varchar_255 Email"));
    assert!(content.contains("decimal_10_2 Total"));
    assert!(content.contains("int OrderId PK,FK"));
    assert!(content.contains("audit__Events {"));
    assert!(content.contains("Users ||--|{ Orders : \"FK_Orders_Users\""));
    assert!(content.contains("Orders ||--|{ OrderLines : \"FK_OrderLines_Orders\""));
}

#[test]
fn test_plantuml_detected_from_extension() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir, SNAPSHOT);
    let output = dir.path().join("out").join("schema.puml");

    let result = run(&[
        "diagram",
        snapshot.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
    ]);

    assert!(result.status.success());
    let content = fs::read_to_string(&output).unwrap();
    assert!(content.starts_with("@startuml"));
    assert!(content.contains("entity \"audit.Events\" as audit__Events {"));
    assert!(content.trim_end().ends_with("@enduml"));
}

#[test]
fn test_stdout_with_filters_and_compact() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir, SNAPSHOT);

    let result = run(&[
        "diagram",
        snapshot.to_str().unwrap(),
        "--exclude-schemas",
        "audit",
        "--compact",
    ]);

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("(excluding schemas audit)"));
    assert!(stdout.contains("_ UserId FK"));
    assert!(!stdout.contains("Email"));
    assert!(!stdout.contains("Events"));
    assert!(stdout.contains("Users ||--|{ Orders : \"FK_Orders_Users\""));
}

#[test]
fn test_max_tables_warning() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir, SNAPSHOT);

    let result = run(&["diagram", snapshot.to_str().unwrap(), "--max-tables", "2"]);

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("%% WARNING: Table limit of 2 reached"));
    assert!(stdout.contains("Orders {"));
    assert!(!stdout.contains("OrderLines {"));
    // FK to a table outside the cap is dropped
    assert!(!stdout.contains("FK_OrderLines_Orders"));
}

#[test]
fn test_wrong_extension_fails() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir, SNAPSHOT);
    let output = dir.path().join("schema.txt");

    let result = run(&[
        "diagram",
        snapshot.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--format",
        "mermaid",
    ]);

    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains(".mmd"));
    assert!(!output.exists());
}

#[test]
fn test_inconsistent_composite_key_fails() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(
        &dir,
        r#"{
            "tables": [{"schema": "dbo", "name": "P"}, {"schema": "dbo", "name": "C"}],
            "foreign_keys": [
                {
                    "constraint_name": "FK_C_P",
                    "child_schema": "dbo", "child_table": "C", "child_column": "A",
                    "parent_schema": "dbo", "parent_table": "P", "parent_column": "A",
                    "is_nullable": false
                },
                {
                    "constraint_name": "FK_C_P",
                    "child_schema": "dbo", "child_table": "C", "child_column": "B",
                    "parent_schema": "dbo", "parent_table": "P", "parent_column": "B",
                    "is_nullable": true
                }
            ]
        }"#,
    );

    let result = run(&["diagram", snapshot.to_str().unwrap()]);

    assert!(!result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("FK_C_P"));
    assert!(stderr.contains("nullability"));
}

#[test]
fn test_config_file_defaults() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir, SNAPSHOT);
    let config = dir.path().join("diagram.yaml");
    fs::write(
        &config,
        "server: cfg-server\ndatabase: CfgDb\nformat: plantuml\ninclude_tables: [\"Users\"]\n",
    )
    .unwrap();

    let result = run(&[
        "diagram",
        snapshot.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--server",
        "cli-server",
    ]);

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("title Database CfgDb on cli-server (tables Users)"));
    assert!(stdout.contains("entity \"Users\" as Users {"));
    assert!(!stdout.contains("Orders"));
}

#[test]
fn test_no_matching_tables() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir, SNAPSHOT);

    let result = run(&[
        "diagram",
        snapshot.to_str().unwrap(),
        "--include-schemas",
        "missing",
    ]);

    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("%% No tables found"));
}

#[test]
fn test_missing_snapshot_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.json");

    let result = run(&["diagram", missing.to_str().unwrap()]);

    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("nope.json"));
}

#[test]
fn test_json_summary_matches_schema() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir, SNAPSHOT);
    let output = dir.path().join("schema.mmd");

    let result = run(&[
        "diagram",
        snapshot.to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--json",
    ]);
    assert!(result.status.success());

    let summary: Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(summary["format"], "mermaid");
    assert_eq!(summary["statistics"]["tables"], 4);
    assert_eq!(summary["statistics"]["relationships"], 2);
    assert_eq!(summary["statistics"]["truncated"], false);

    let schema_out = run(&["schema", "diagram"]);
    assert!(schema_out.status.success());
    let schema: Value = serde_json::from_slice(&schema_out.stdout).unwrap();
    let validator = Validator::new(&schema).unwrap();
    assert!(validator.is_valid(&summary));
}

#[test]
fn test_snapshot_validates_against_exported_schema() {
    let schema_out = run(&["schema", "snapshot"]);
    assert!(schema_out.status.success());

    let schema: Value = serde_json::from_slice(&schema_out.stdout).unwrap();
    let validator = Validator::new(&schema).unwrap();
    let snapshot: Value = serde_json::from_str(SNAPSHOT).unwrap();

    assert!(validator.is_valid(&snapshot));
    assert!(!validator.is_valid(&serde_json::json!({"tables": [{"schema": "dbo"}]})));
}

#[test]
fn test_schema_list() {
    let result = run(&["schema", "--list"]);

    assert!(result.status.success());
    assert_eq!(String::from_utf8_lossy(&result.stdout), "diagram\nsnapshot\n");
}

#[test]
fn test_verbose_logs_relationship_cardinality() {
    let dir = TempDir::new().unwrap();
    let snapshot = write_snapshot(&dir, SNAPSHOT);

    let result = run(&["diagram", snapshot.to_str().unwrap(), "--verbose"]);

    assert!(result.status.success());
    let stderr = String::from_utf8_lossy(&result.stderr);
    assert!(stderr.contains("Users one-to-many Orders"));
    assert!(stderr.contains("Orders one-to-many OrderLines"));
    // logs never leak into the diagram itself
    assert!(!String::from_utf8_lossy(&result.stdout).contains("one-to-many"));
}
