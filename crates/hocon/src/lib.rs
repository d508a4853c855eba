/*
 * lib.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Parser and substitution resolver for HOCON configuration documents.
//!
//! Parsing happens in two phases. The parser turns text into a
//! [`Document`]: a tree of objects, lists and scalars where every value
//! that mentions a `${path}` substitution is left as a placeholder. The
//! resolver then fills the placeholders in, looking paths up in the tree
//! and falling back to environment variables.
//!
//! ```
//! let config = hocon::parse_string(r#"
//!     defaults { timeout = 30, retries = 3 }
//!     service = ${defaults}
//!     service-name = api
//!     greeting = "hello "${service-name}
//! "#).unwrap();
//!
//! assert_eq!(config.get_int("service.timeout").unwrap(), 30);
//! assert_eq!(config.get_string("greeting").unwrap(), "hello api");
//! ```
//!
//! Use [`ConfigParser`] to control where includes are loaded from and which
//! environment substitutions fall back to.

mod concat;
mod config_parser;
mod document;
mod env;
mod error;
mod include;
mod options;
mod parser;
mod path;
mod query;
mod resolver;
mod value;

pub use config_parser::{ConfigParser, parse_file, parse_string, parse_url};
pub use document::{Document, SubstitutionRef};
pub use env::{Environment, MapEnvironment, SystemEnvironment};
pub use error::{Error, Position, RefLocation, Result, SubstitutionError};
pub use include::{
    DefaultLoader, Fetched, IncludeBase, IncludeLoader, IncludeTarget, MemoryLoader, NullLoader,
};
pub use options::ParseOptions;
pub use path::{join_path, parse_path};
pub use value::{ConfigList, ConfigTree, ConfigValue, PendingId, ScalarValue};
