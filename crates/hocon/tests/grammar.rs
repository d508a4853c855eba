/*
 * grammar.rs
 * Copyright (c) 2025 Posit, PBC
 *
 * Tests for the document grammar: separators, comments, keys and scalar
 * forms.
 */

use hocon::{ConfigParser, ConfigTree, ConfigValue, Error, MemoryLoader, ParseOptions, ScalarValue};
use pretty_assertions::assert_eq;

fn parse_value(text: &str) -> hocon::Result<ConfigValue> {
    ConfigParser::new()
        .with_loader(MemoryLoader::new())
        .parse_str(text)
}

fn parse(text: &str) -> ConfigTree {
    parse_value(text)
        .unwrap()
        .into_tree()
        .expect("root should be an object")
}

fn syntax_error(text: &str) -> (String, usize, usize) {
    match parse_value(text) {
        Err(Error::Syntax {
            message, position, ..
        }) => (message, position.line, position.column),
        other => panic!("expected a syntax error for {text:?}, got {other:?}"),
    }
}

#[test]
fn test_comments_are_ignored() {
    let config = parse("# heading\na = 1 // trailing\n// full line\nb = two # note\n");
    assert_eq!(config.len(), 2);
    assert_eq!(config.get_int("a").unwrap(), 1);
    assert_eq!(config.get_string("b").unwrap(), "two");
}

#[test]
fn test_commas_and_newlines_separate_fields() {
    let config = parse("{ a = 1, b = 2\n c = 3, }");
    assert_eq!(config.keys().collect::<Vec<_>>(), vec!["a", "b", "c"]);
}

#[test]
fn test_crlf_line_endings() {
    let config = parse("a = 1\r\nb = two\r\n");
    assert_eq!(config.get_int("a").unwrap(), 1);
    assert_eq!(config.get_string("b").unwrap(), "two");
}

#[test]
fn test_byte_order_mark_is_skipped() {
    let config = parse("\u{feff}a = 1");
    assert_eq!(config.get_int("a").unwrap(), 1);
}

#[test]
fn test_key_paths_and_quoted_keys() {
    let config = parse("a.b.c = 1\n\"x.y\" = 2\nc.\"d e\" = 3\nkey-with_chars = 4");
    assert_eq!(config.get_int("a.b.c").unwrap(), 1);
    assert_eq!(config.get_int("\"x.y\"").unwrap(), 2);
    assert!(config.get_key("x").is_none());
    assert_eq!(config.get_int("c.\"d e\"").unwrap(), 3);
    assert_eq!(config.get_int("key-with_chars").unwrap(), 4);
}

#[test]
fn test_object_value_without_separator() {
    let config = parse("server { port = 80 }\nclient.retry { count = 3 }");
    assert_eq!(config.get_int("server.port").unwrap(), 80);
    assert_eq!(config.get_int("client.retry.count").unwrap(), 3);
}

#[test]
fn test_key_without_value_is_empty_string() {
    let config = parse("a =\nb = 1\nc :");
    assert_eq!(config.get_string("a").unwrap(), "");
    assert_eq!(config.get_string("c").unwrap(), "");
}

#[test]
fn test_numbers() {
    let config = parse(
        "i = 42\nneg = -7\nf = 3.14\nhalf = .5\nexp = 1e3\nsigned = 2E-2\nip = 10.0.0.1\nword = 3.14abc",
    );
    assert_eq!(config.get("i").unwrap(), &ConfigValue::from(42));
    assert_eq!(config.get("neg").unwrap(), &ConfigValue::from(-7));
    assert_eq!(config.get("f").unwrap(), &ConfigValue::from(3.14));
    assert_eq!(config.get("half").unwrap(), &ConfigValue::from(0.5));
    assert_eq!(config.get("exp").unwrap(), &ConfigValue::from(1000.0));
    assert_eq!(config.get("signed").unwrap(), &ConfigValue::from(0.02));
    assert_eq!(config.get("ip").unwrap(), &ConfigValue::from("10.0.0.1"));
    assert_eq!(config.get("word").unwrap(), &ConfigValue::from("3.14abc"));
}

#[test]
fn test_keywords_are_case_insensitive() {
    let config = parse("a = TRUE\nb = False\nc = NULL\nd = truely");
    assert!(config.get_bool("a").unwrap());
    assert!(!config.get_bool("b").unwrap());
    assert!(config.get("c").unwrap().is_null());
    assert_eq!(config.get_string("d").unwrap(), "truely");
}

#[test]
fn test_quoted_string_escapes() {
    let config = parse(r#"s = "tab\there \"quoted\" back\\slash \/ café""#);
    assert_eq!(
        config.get_string("s").unwrap(),
        "tab\there \"quoted\" back\\slash / café"
    );
}

#[test]
fn test_quoted_string_line_continuation() {
    let config = parse("s = \"one \\\ntwo\"");
    assert_eq!(config.get_string("s").unwrap(), "one two");
}

#[test]
fn test_multiline_string_is_raw() {
    let config = parse("text = \"\"\"line one\n  \"quoted\" line \\n two\"\"\"");
    assert_eq!(
        config.get_string("text").unwrap(),
        "line one\n  \"quoted\" line \\n two"
    );
}

#[test]
fn test_unquoted_strings() {
    let config = parse("a = hello world  \nb = some text, c = x");
    assert_eq!(config.get_string("a").unwrap(), "hello world");
    assert_eq!(config.get_string("b").unwrap(), "some text");
    assert_eq!(config.get_string("c").unwrap(), "x");
}

#[test]
fn test_unquoted_line_continuation() {
    let config = parse("a = one \\\n  two");
    assert_eq!(config.get_string("a").unwrap(), "one \n  two");
}

#[test]
fn test_mixed_scalar_concatenation() {
    let config = parse("a = 1 2 three\nb = \"x\" true \"y\"");
    assert_eq!(config.get_string("a").unwrap(), "1 2 three");
    assert_eq!(config.get_string("b").unwrap(), "xtrue y");
}

#[test]
fn test_lists() {
    let config = parse("a = [1, two, \"three\"]\nb = [\n  1\n  2\n]\nc = []\nd = [[1], [2, 3]]");
    assert_eq!(config.get_list("a").unwrap().len(), 3);
    assert_eq!(config.get_list("a").unwrap()[1], ConfigValue::from("two"));
    assert_eq!(config.get_list("b").unwrap().len(), 2);
    assert!(config.get_list("c").unwrap().is_empty());
    assert_eq!(config.get_list("d").unwrap()[1].as_list().unwrap().len(), 2);
}

#[test]
fn test_list_root() {
    let value = parse_value("[1, {a = 2}]").unwrap();
    let list = value.as_list().unwrap();
    assert_eq!(list[0], ConfigValue::Scalar(ScalarValue::Int(1)));
    assert_eq!(list[1].as_tree().unwrap().get_int("a").unwrap(), 2);
}

#[test]
fn test_include_prefix_is_an_ordinary_key() {
    let config = parse("include = yes\nincludes = 2");
    assert_eq!(config.get_string("include").unwrap(), "yes");
    assert_eq!(config.get_int("includes").unwrap(), 2);
}

#[test]
fn test_unclosed_list() {
    let (message, line, column) = syntax_error("a = [1, 2");
    assert!(message.contains("expected ']'"), "{message}");
    assert_eq!((line, column), (1, 10));
}

#[test]
fn test_unclosed_object() {
    let (message, line, _) = syntax_error("a {\n  b = 1\n");
    assert!(message.contains("expected '}'"), "{message}");
    assert_eq!(line, 3);
}

#[test]
fn test_key_without_separator() {
    let (message, line, column) = syntax_error("a = 1\nlonely");
    assert!(message.contains("after key"), "{message}");
    assert_eq!((line, column), (2, 7));
}

#[test]
fn test_unterminated_strings() {
    let (message, _, column) = syntax_error("a = \"open");
    assert!(message.contains("unterminated quoted string"), "{message}");
    assert_eq!(column, 5);

    let (message, _, _) = syntax_error("a = \"\"\"never closed");
    assert!(message.contains("multi-line"), "{message}");
}

#[test]
fn test_unterminated_substitution() {
    let (message, line, column) = syntax_error("a = ${b\nc = 1");
    assert!(message.contains("unterminated substitution"), "{message}");
    assert_eq!((line, column), (1, 5));
}

#[test]
fn test_concatenating_list_and_string_fails() {
    let err = parse_value("a = [1] text").unwrap_err();
    assert!(
        matches!(&err, Error::Concatenation { message, .. } if message.contains("a list")),
        "{err:?}"
    );
}

#[test]
fn test_nesting_up_to_the_default_limit_parses() {
    let depth = ParseOptions::default().max_nesting_depth;
    let text = format!("{}x = 1{}", "a {".repeat(depth), "}".repeat(depth));
    let config = parse(&text);
    assert_eq!(config.get_int(&format!("{}x", "a.".repeat(depth))).unwrap(), 1);

    let lists = format!("l = {}1{}", "[".repeat(depth), "]".repeat(depth));
    assert!(parse_value(&lists).is_ok());
}

#[test]
fn test_unicode_escapes_in_keys_and_substitutions() {
    let config = parse(r#""\u0041" = 1
"caf\u00e9".b = 2
s = "\u0041"
t = ${"\u0041"}"#);
    assert_eq!(config.keys().collect::<Vec<_>>(), vec!["A", "café", "s", "t"]);
    assert_eq!(config.get_int("café.b").unwrap(), 2);
    assert_eq!(config.get_string("s").unwrap(), "A");
    assert_eq!(config.get_int("t").unwrap(), 1);
}

#[test]
fn test_juxtaposed_objects_need_a_key() {
    let (message, line, column) = syntax_error("{a:{x:1,y:2}} {a:{y:3,z:4}}");
    assert!(message.contains("expected end of input"), "{message}");
    assert_eq!((line, column), (1, 15));

    let config = parse("v = {a:{x:1,y:2}} {a:{y:3,z:4}}");
    assert_eq!(config.get_int("v.a.x").unwrap(), 1);
    assert_eq!(config.get_int("v.a.y").unwrap(), 3);
}
