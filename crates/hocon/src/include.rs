/*
 * include.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Loading the documents named by `include` directives.
//!
//! The parser hands every directive to an [`IncludeLoader`] and parses the
//! returned text in place. Loaders also report the base the fetched
//! document's own relative includes should be resolved against.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// What an `include` directive points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeTarget {
    /// `include file("...")`, or a bare locator that is not a URL.
    File(String),
    /// `include url("...")`, or a bare locator starting with `http://`,
    /// `https://` or `file://`.
    Url(String),
}

impl IncludeTarget {
    /// Classify the locator of a bare `include "..."`.
    pub fn classify(locator: &str) -> Self {
        if ["http://", "https://", "file://"]
            .iter()
            .any(|scheme| locator.starts_with(scheme))
        {
            IncludeTarget::Url(locator.to_string())
        } else {
            IncludeTarget::File(locator.to_string())
        }
    }

    pub fn locator(&self) -> &str {
        match self {
            IncludeTarget::File(s) | IncludeTarget::Url(s) => s,
        }
    }
}

/// Where relative include targets are resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncludeBase {
    Dir(PathBuf),
    Url(Url),
}

/// A fetched document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched {
    pub text: String,
    /// Base for the document's own relative includes.
    pub base: Option<IncludeBase>,
    /// Name used in diagnostics (a path or URL).
    pub label: String,
}

/// Loads include targets.
///
/// Called synchronously, in document order. Any error aborts the parse.
pub trait IncludeLoader {
    fn fetch(&self, target: &IncludeTarget, base: Option<&IncludeBase>) -> io::Result<Fetched>;
}

impl<L: IncludeLoader + ?Sized> IncludeLoader for &L {
    fn fetch(&self, target: &IncludeTarget, base: Option<&IncludeBase>) -> io::Result<Fetched> {
        (**self).fetch(target, base)
    }
}

/// Loads from the filesystem, `file://` URLs and (with the `http` feature)
/// `http://`/`https://` URLs.
#[derive(Debug, Clone, Default)]
pub struct DefaultLoader {
    timeout: Option<Duration>,
}

impl DefaultLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timeout for network fetches. A timeout surfaces as a fetch failure.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn fetch_url(&self, url: Url) -> io::Result<Fetched> {
        match url.scheme() {
            "file" => {
                let path = url.to_file_path().map_err(|()| {
                    io::Error::new(
                        io::ErrorKind::InvalidInput,
                        format!("not a local file URL: {}", url),
                    )
                })?;
                fetch_file(path)
            }
            "http" | "https" => self.fetch_http(url),
            other => Err(io::Error::new(
                io::ErrorKind::Unsupported,
                format!("unsupported URL scheme '{}'", other),
            )),
        }
    }

    #[cfg(feature = "http")]
    fn fetch_http(&self, url: Url) -> io::Result<Fetched> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(io::Error::other)?;
        let response = client
            .get(url.clone())
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(io::Error::other)?;
        let text = response.text().map_err(io::Error::other)?;
        Ok(Fetched {
            text,
            base: url.join(".").ok().map(IncludeBase::Url),
            label: url.to_string(),
        })
    }

    #[cfg(not(feature = "http"))]
    fn fetch_http(&self, url: Url) -> io::Result<Fetched> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            format!("cannot fetch {}: built without the `http` feature", url),
        ))
    }
}

impl IncludeLoader for DefaultLoader {
    fn fetch(&self, target: &IncludeTarget, base: Option<&IncludeBase>) -> io::Result<Fetched> {
        tracing::debug!(locator = target.locator(), ?base, "fetching include");
        match target {
            IncludeTarget::Url(locator) => {
                let url = match base {
                    Some(IncludeBase::Url(base)) => base.join(locator),
                    _ => Url::parse(locator),
                }
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
                self.fetch_url(url)
            }
            IncludeTarget::File(locator) => match base {
                Some(IncludeBase::Url(base)) if Path::new(locator).is_relative() => {
                    let url = base
                        .join(locator)
                        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
                    self.fetch_url(url)
                }
                Some(IncludeBase::Dir(dir)) => fetch_file(dir.join(locator)),
                _ => fetch_file(PathBuf::from(locator)),
            },
        }
    }
}

fn fetch_file(path: PathBuf) -> io::Result<Fetched> {
    let text = std::fs::read_to_string(&path)
        .map_err(|e| io::Error::new(e.kind(), format!("{}: {}", path.display(), e)))?;
    Ok(Fetched {
        text,
        base: path.parent().map(|dir| IncludeBase::Dir(dir.to_path_buf())),
        label: path.display().to_string(),
    })
}

/// Serves documents from an in-memory map keyed by locator.
///
/// Useful for tests and for documents bundled into an application.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    documents: HashMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document under the exact locator used in `include` directives.
    pub fn add(&mut self, locator: impl Into<String>, text: impl Into<String>) -> &mut Self {
        self.documents.insert(locator.into(), text.into());
        self
    }

    /// Builder-style [`MemoryLoader::add`].
    pub fn with_document(mut self, locator: impl Into<String>, text: impl Into<String>) -> Self {
        self.add(locator, text);
        self
    }
}

impl IncludeLoader for MemoryLoader {
    fn fetch(&self, target: &IncludeTarget, _base: Option<&IncludeBase>) -> io::Result<Fetched> {
        let locator = target.locator();
        let text = self.documents.get(locator).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no document registered as '{}'", locator),
            )
        })?;
        Ok(Fetched {
            text: text.clone(),
            base: None,
            label: locator.to_string(),
        })
    }
}

/// Rejects every include.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLoader;

impl IncludeLoader for NullLoader {
    fn fetch(&self, target: &IncludeTarget, _base: Option<&IncludeBase>) -> io::Result<Fetched> {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("includes are disabled ('{}')", target.locator()),
        ))
    }
}
