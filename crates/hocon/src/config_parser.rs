/*
 * config_parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Entry points: parse text, a file, or a URL.

use crate::document::Document;
use crate::env::{Environment, SystemEnvironment};
use crate::error::{Error, Result};
use crate::include::{DefaultLoader, IncludeBase, IncludeLoader, IncludeTarget};
use crate::options::ParseOptions;
use crate::parser::Session;
use crate::value::{ConfigTree, ConfigValue};
use hocon_source_map::SourceContext;
use std::path::Path;

/// Label used in diagnostics for text passed in directly.
const STRING_LABEL: &str = "<string>";

/// Parses documents with a configurable include loader and environment.
///
/// The parser keeps every text it has read (root documents and includes) in
/// a [`SourceContext`], so errors can be rendered with source snippets:
///
/// ```
/// use hocon::ConfigParser;
///
/// let mut parser = ConfigParser::new();
/// let err = parser.parse_str("a = [1, 2").unwrap_err();
/// let text = err.to_diagnostic().to_text(Some(parser.source_context()));
/// assert!(text.contains("[H-1-1]"));
/// ```
pub struct ConfigParser {
    options: ParseOptions,
    loader: Box<dyn IncludeLoader>,
    environment: Box<dyn Environment>,
    sources: SourceContext,
}

impl Default for ConfigParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigParser {
    /// A parser that reads includes from disk (and HTTP with the `http`
    /// feature) and falls back to the process environment.
    pub fn new() -> Self {
        ConfigParser {
            options: ParseOptions::default(),
            loader: Box::new(DefaultLoader::new()),
            environment: Box::new(SystemEnvironment),
            sources: SourceContext::new(),
        }
    }

    pub fn with_options(mut self, options: ParseOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_loader(mut self, loader: impl IncludeLoader + 'static) -> Self {
        self.loader = Box::new(loader);
        self
    }

    pub fn with_environment(mut self, environment: impl Environment + 'static) -> Self {
        self.environment = Box::new(environment);
        self
    }

    /// Every text read so far.
    pub fn source_context(&self) -> &SourceContext {
        &self.sources
    }

    /// Parse and resolve `text`. Relative includes resolve against the
    /// current directory.
    pub fn parse_str(&mut self, text: &str) -> Result<ConfigValue> {
        self.parse_str_with_base(text, None)
    }

    /// Parse and resolve `text`, resolving relative includes against `base`.
    pub fn parse_str_with_base(
        &mut self,
        text: &str,
        base: Option<IncludeBase>,
    ) -> Result<ConfigValue> {
        let document = self.parse_labeled(STRING_LABEL.to_string(), text, base)?;
        self.resolve(document)
    }

    /// Read, parse and resolve a file. Its directory is the base for its
    /// relative includes.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Result<ConfigValue> {
        let target = IncludeTarget::File(path.as_ref().display().to_string());
        self.parse_target(target)
    }

    /// Fetch, parse and resolve a URL. Its directory is the base for its
    /// relative includes.
    pub fn parse_url(&mut self, url: &str) -> Result<ConfigValue> {
        self.parse_target(IncludeTarget::Url(url.to_string()))
    }

    /// Parse `text` without resolving substitutions.
    pub fn parse_document(&mut self, text: &str) -> Result<Document> {
        self.parse_labeled(STRING_LABEL.to_string(), text, None)
    }

    fn parse_target(&mut self, target: IncludeTarget) -> Result<ConfigValue> {
        let fetched = self.loader.fetch(&target, None).map_err(|e| Error::Include {
            locator: target.locator().to_string(),
            reason: e.to_string(),
            position: None,
            source_info: None,
        })?;
        let document = self.parse_labeled(fetched.label, &fetched.text, fetched.base)?;
        self.resolve(document)
    }

    fn parse_labeled(
        &mut self,
        label: String,
        text: &str,
        base: Option<IncludeBase>,
    ) -> Result<Document> {
        let mut session = Session::new(&mut self.sources, self.loader.as_ref(), &self.options);
        let root = session.parse_source(label, text, base)?;
        Ok(session.into_document(root))
    }

    fn resolve(&self, document: Document) -> Result<ConfigValue> {
        document.resolve(self.environment.as_ref())
    }
}

fn root_tree(value: ConfigValue) -> Result<ConfigTree> {
    match value {
        ConfigValue::Tree(tree) => Ok(tree),
        other => Err(Error::Type {
            path: "<root>".to_string(),
            expected: "object",
            found: other.kind_name().to_string(),
        }),
    }
}

/// Parse and resolve a document whose root is an object.
///
/// ```
/// let config = hocon::parse_string(r#"
///     server {
///         host = localhost
///         port = 8080
///     }
///     url = "http://"${server.host}":"${server.port}
/// "#).unwrap();
///
/// assert_eq!(config.get_string("url").unwrap(), "http://localhost:8080");
/// ```
pub fn parse_string(text: &str) -> Result<ConfigTree> {
    root_tree(ConfigParser::new().parse_str(text)?)
}

/// Like [`parse_string`], for a file on disk.
pub fn parse_file(path: impl AsRef<Path>) -> Result<ConfigTree> {
    root_tree(ConfigParser::new().parse_file(path)?)
}

/// Like [`parse_string`], for a `file://`, `http://` or `https://` URL.
pub fn parse_url(url: &str) -> Result<ConfigTree> {
    root_tree(ConfigParser::new().parse_url(url)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnvironment;
    use crate::include::MemoryLoader;

    #[test]
    fn test_list_root_is_not_a_tree() {
        let value = ConfigParser::new().parse_str("[1, 2]").unwrap();
        assert_eq!(value.as_list().unwrap().len(), 2);
        assert!(matches!(
            parse_string("[1, 2]"),
            Err(Error::Type { expected: "object", .. })
        ));
    }

    #[test]
    fn test_parse_file_through_loader() {
        let loader = MemoryLoader::new().with_document("app.conf", "name = ${NAME}");
        let mut parser = ConfigParser::new()
            .with_loader(loader)
            .with_environment(MapEnvironment::new().with("NAME", "demo"));
        let value = parser.parse_file("app.conf").unwrap();
        assert_eq!(value.as_tree().unwrap().get_string("name").unwrap(), "demo");
        assert_eq!(parser.source_context().get_file(hocon_source_map::FileId(0)).unwrap().path, "app.conf");
    }

    #[test]
    fn test_missing_root_file() {
        let err = ConfigParser::new()
            .with_loader(MemoryLoader::new())
            .parse_file("nope.conf")
            .unwrap_err();
        match err {
            Error::Include {
                locator, position, ..
            } => {
                assert_eq!(locator, "nope.conf");
                assert!(position.is_none());
            }
            other => panic!("expected an include error, got {other:?}"),
        }
    }

    #[test]
    fn test_sources_accumulate_across_parses() {
        let mut parser = ConfigParser::new();
        parser.parse_str("a = 1").unwrap();
        parser.parse_str("b = 2").unwrap();
        assert_eq!(parser.source_context().len(), 2);
    }
}
