/*
 * properties.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * End-to-end behavior of merging, concatenation, substitution and includes.
 */

use hocon::{
    ConfigParser, ConfigTree, ConfigValue, Document, Error, MapEnvironment, MemoryLoader,
    SubstitutionError, parse_string,
};
use pretty_assertions::assert_eq;

fn parse_with_env(text: &str, env: MapEnvironment) -> hocon::Result<ConfigTree> {
    let value = ConfigParser::new()
        .with_loader(MemoryLoader::new())
        .with_environment(env)
        .parse_str(text)?;
    Ok(value.into_tree().expect("root should be an object"))
}

fn parse(text: &str) -> hocon::Result<ConfigTree> {
    parse_with_env(text, MapEnvironment::new())
}

fn ints(values: &[i64]) -> ConfigValue {
    ConfigValue::List(values.iter().map(|&n| ConfigValue::from(n)).collect())
}

#[test]
fn test_duplicate_object_keys_deep_merge() {
    let config = parse("a {x:1,y:2}\na {y:3,z:4}").unwrap();
    let a = config.get_tree("a").unwrap();
    assert_eq!(a.keys().collect::<Vec<_>>(), vec!["x", "y", "z"]);
    assert_eq!(config.get_int("a.x").unwrap(), 1);
    assert_eq!(config.get_int("a.y").unwrap(), 3);
    assert_eq!(config.get_int("a.z").unwrap(), 4);
}

#[test]
fn test_juxtaposed_objects_deep_merge() {
    let config = parse("v = {a:{x:1,y:2}} {a:{y:3,z:4}}").unwrap();
    assert_eq!(config.get_int("v.a.x").unwrap(), 1);
    assert_eq!(config.get_int("v.a.y").unwrap(), 3);
    assert_eq!(config.get_int("v.a.z").unwrap(), 4);
}

#[test]
fn test_juxtaposed_lists_concatenate() {
    let config = parse("k = [1,2] [3,4]").unwrap();
    assert_eq!(config.get("k").unwrap(), &ints(&[1, 2, 3, 4]));
}

#[test]
fn test_forward_reference() {
    let config = parse("{a: ${b}, b: 5}").unwrap();
    assert_eq!(config.get_int("a").unwrap(), 5);
    assert_eq!(config.get_int("b").unwrap(), 5);
}

#[test]
fn test_direct_cycle_names_both_paths() {
    let err = parse("{a: ${b}, b: ${a}}").unwrap_err();
    let Error::Substitution(SubstitutionError::Cycle { references }) = &err else {
        panic!("expected a cycle, got {err:?}");
    };
    let mut paths: Vec<&str> = references.iter().map(|r| r.path.as_str()).collect();
    paths.sort_unstable();
    assert_eq!(paths, vec!["a", "b"]);
    assert!(err.to_string().contains("Check for cycles"));
}

#[test]
fn test_cycle_reports_only_the_cyclic_remainder() {
    let err = parse("{a: ${b}, b: ${a}, c: ${d}, d: 1, e: ${c}}").unwrap_err();
    let Error::Substitution(SubstitutionError::Cycle { references }) = &err else {
        panic!("expected a cycle, got {err:?}");
    };
    let mut paths: Vec<&str> = references.iter().map(|r| r.path.as_str()).collect();
    paths.sort_unstable();
    assert_eq!(paths, vec!["a", "b"]);
}

#[test]
fn test_environment_fallback() {
    let env = MapEnvironment::new().with("APP_HOME", "/opt/app");
    let config = parse_with_env("home = ${APP_HOME}", env).unwrap();
    assert_eq!(config.get_string("home").unwrap(), "/opt/app");
}

#[test]
fn test_missing_everywhere_names_path_and_position() {
    let err = parse("a = 1\nb = ${nowhere}").unwrap_err();
    let Error::Substitution(SubstitutionError::Missing { reference }) = &err else {
        panic!("expected a missing substitution, got {err:?}");
    };
    assert_eq!(reference.path, "nowhere");
    assert_eq!((reference.position.line, reference.position.column), (2, 5));
    assert_eq!(
        err.to_string(),
        "Cannot resolve variable ${nowhere} (line: 2, col: 5) in <string>"
    );
}

#[test]
fn test_tree_value_shadows_environment() {
    let env = MapEnvironment::new().with("name", "from-env");
    let config = parse_with_env("name = from-doc\ncopy = ${name}", env).unwrap();
    assert_eq!(config.get_string("copy").unwrap(), "from-doc");
}

#[test]
fn test_string_concatenation_keeps_substitution_whitespace() {
    let cases = [
        (r#"{name: "x", full: ${name}" suffix"}"#, "x suffix"),
        (r#"{name: "x", full: ${name} " suffix"}"#, "x  suffix"),
        (r#"{name: "x", full: ${name}   "suffix"}"#, "x   suffix"),
    ];
    for (text, expected) in cases {
        let config = parse(text).unwrap();
        assert_eq!(config.get_string("full").unwrap(), expected, "{text}");
    }
}

#[test]
fn test_resolving_a_concrete_tree_is_a_no_op() {
    let mut parser = ConfigParser::new().with_loader(MemoryLoader::new());
    let document = parser
        .parse_document("a { b = [1, 2], c = \"x\" }\nd = 2.5")
        .unwrap();
    assert!(document.is_resolved());
    assert!(document.substitutions().is_empty());

    let before = document.root().clone();
    let after = document.resolve(&MapEnvironment::new()).unwrap();
    assert_eq!(after, before);

    let again = Document::from_value(after.clone())
        .resolve(&MapEnvironment::new())
        .unwrap();
    assert_eq!(again, after);
}

#[test]
fn test_include_keys_follow_merge_rules() {
    let loader = MemoryLoader::new().with_document("other", "{a:2, b:3}");
    let config = ConfigParser::new()
        .with_loader(loader)
        .parse_str(r#"{a:1, include "other"}"#)
        .unwrap();
    let config = config.as_tree().unwrap();
    assert_eq!(config.get_int("a").unwrap(), 2);
    assert_eq!(config.get_int("b").unwrap(), 3);
}

#[test]
fn test_parse_string_entry_point() {
    let config = parse_string("a.b.c = 1").unwrap();
    assert_eq!(config.get_int("a.b.c").unwrap(), 1);
}
