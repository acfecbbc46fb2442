use pretty_assertions::assert_eq;
use querysmith::{generate, Config, DocumentKind, Schema};
use std::fs;
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join(name)
}

fn golden(name: &str) -> String {
    fs::read_to_string(fixture("documents").join(format!("{}.graphql", name))).unwrap()
}

#[test]
fn test_generate_from_config_file() {
    let config_path = fixture("querysmith.yml");
    let config = Config::load(&config_path).unwrap();
    assert_eq!(config.log_level, "warn");

    let schema = Schema::load(&config.schema_path(&config_path)).unwrap();
    let out = generate(&schema, &config).unwrap();

    let packages: Vec<(&str, &str)> =
        out.iter().map(|p| (p.name.as_str(), p.path.as_str())).collect();
    assert_eq!(packages, vec![("alerts", "pkg/alerts"), ("cloud", "pkg/cloud")]);

    let alerts = &out[0].documents;
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].name, "policy");
    assert_eq!(alerts[0].kind, DocumentKind::Query);
    assert_eq!(alerts[0].document, golden("policy"));
    let args: Vec<(&str, &str)> = alerts[0]
        .args
        .iter()
        .map(|a| (a.key.as_str(), a.value.as_str()))
        .collect();
    assert_eq!(args, vec![("id", "Int!"), ("policy_id", "ID!")]);
    let inputs: Vec<&str> = alerts[0].inputs.keys().map(String::as_str).collect();
    assert_eq!(inputs, vec!["account", "policy"]);

    assert_eq!(alerts[1].kind, DocumentKind::Mutation);
    assert_eq!(alerts[1].document, golden("alertsMutingRuleCreate"));

    let cloud = &out[1].documents;
    assert_eq!(cloud[0].document, golden("linkedAccounts"));
    assert!(cloud[0].inputs.is_empty());
    assert_eq!(cloud[1].document, golden("cloudRenameAccount"));
    let args: Vec<(&str, &str)> = cloud[1]
        .args
        .iter()
        .map(|a| (a.key.as_str(), a.value.as_str()))
        .collect();
    assert_eq!(args, vec![("accountId", "Int!"), ("accounts", "[CloudRenameAccountsInput!]!")]);
}

#[test]
fn test_generate_output_serializes_for_emitters() {
    let config_path = fixture("querysmith.yml");
    let config = Config::load(&config_path).unwrap();
    let schema = Schema::load(&config.schema_path(&config_path)).unwrap();
    let out = generate(&schema, &config).unwrap();

    let value = serde_json::to_value(&out).unwrap();
    assert_eq!(value[0]["documents"][0]["kind"], "query");
    assert_eq!(value[0]["documents"][1]["kind"], "mutation");
    assert!(value[0]["documents"][1].get("inputs").is_none());
    assert_eq!(value[1]["documents"][1]["args"][1]["value"], "[CloudRenameAccountsInput!]!");
}
