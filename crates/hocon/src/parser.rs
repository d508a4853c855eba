/*
 * parser.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Recursive-descent parser for HOCON text.
//!
//! The parser builds the value tree directly. Keys written twice are merged
//! as they are written, `include` directives are expanded in place, and
//! every `${...}` reference is recorded without being looked up. Values that
//! still contain references become [`ConfigValue::Pending`] placeholders
//! backed by a [`PendingConcat`].

use crate::concat::{self, PendingConcat, Token};
use crate::document::{Document, SubstitutionRef};
use crate::error::{Error, Position, Result};
use crate::include::{IncludeBase, IncludeLoader, IncludeTarget};
use crate::options::ParseOptions;
use crate::path::{decode_unicode_escape, parse_path, unescape_char};
use crate::value::{ConfigList, ConfigTree, ConfigValue, PendingId, ScalarValue};
use hocon_source_map::{FileId, SourceContext, SourceInfo};

/// State shared by the root document and everything it includes.
pub(crate) struct Session<'s> {
    sources: &'s mut SourceContext,
    loader: &'s dyn IncludeLoader,
    options: &'s ParseOptions,
    pendings: Vec<PendingConcat>,
    refs: Vec<SubstitutionRef>,
    include_depth: usize,
}

impl<'s> Session<'s> {
    pub(crate) fn new(
        sources: &'s mut SourceContext,
        loader: &'s dyn IncludeLoader,
        options: &'s ParseOptions,
    ) -> Self {
        Session {
            sources,
            loader,
            options,
            pendings: Vec::new(),
            refs: Vec::new(),
            include_depth: 0,
        }
    }

    /// Register `text` under `label` and parse it.
    pub(crate) fn parse_source(
        &mut self,
        label: String,
        text: &str,
        base: Option<IncludeBase>,
    ) -> Result<ConfigValue> {
        let file_id = self.sources.add_file(label.clone(), text.to_string());
        tracing::debug!(file = %label, include_depth = self.include_depth, "parsing");

        let mut parser = Parser {
            input: text,
            pos: 0,
            file_id,
            label,
            base,
            depth: 0,
            session: self,
        };
        let value = parser.parse_document()?;

        tracing::debug!(
            file = %parser.label,
            substitutions = parser.session.refs.len(),
            "parsed"
        );
        Ok(value)
    }

    pub(crate) fn into_document(self, root: ConfigValue) -> Document {
        Document {
            root,
            pendings: self.pendings,
            refs: self.refs,
        }
    }
}

/// A `${...}` seen while collecting one concatenation.
struct LocalRef {
    token_index: usize,
    path: String,
    segments: Vec<String>,
    whitespace: String,
    start: usize,
    end: usize,
}

struct Parser<'a, 'b, 's> {
    input: &'a str,
    pos: usize,
    file_id: FileId,
    label: String,
    base: Option<IncludeBase>,
    /// Current object/list nesting
    depth: usize,
    session: &'b mut Session<'s>,
}

impl<'a> Parser<'a, '_, '_> {
    // Helpers

    fn remaining(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek_char()?;
        self.advance(ch.len_utf8());
        Some(ch)
    }

    fn starts_with(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    fn eat_char(&mut self, ch: char) -> bool {
        if self.peek_char() == Some(ch) {
            self.advance(ch.len_utf8());
            true
        } else {
            false
        }
    }

    fn at_comment(&self) -> bool {
        self.starts_with("#") || self.starts_with("//")
    }

    fn at_newline(&self) -> bool {
        matches!(self.peek_char(), Some('\n' | '\r'))
    }

    fn source_info(&self, start: usize, end: usize) -> SourceInfo {
        self.session
            .sources
            .source_info(self.file_id, start, end)
            .unwrap_or_default()
    }

    fn position_at(&self, offset: usize) -> Position {
        let location = self
            .session
            .sources
            .location(self.file_id, offset)
            .unwrap_or_default();
        Position {
            file: self.label.clone(),
            line: location.line_number(),
            column: location.column_number(),
        }
    }

    fn error_at(&self, message: impl Into<String>, offset: usize) -> Error {
        Error::Syntax {
            message: message.into(),
            position: self.position_at(offset),
            source_info: self.source_info(offset, offset),
        }
    }

    /// Describe the next character for error messages.
    fn found(&self) -> String {
        match self.peek_char() {
            None => "end of input".to_string(),
            Some('\n' | '\r') => "newline".to_string(),
            Some(c) => format!("'{}'", c),
        }
    }

    fn enter(&mut self, start: usize) -> Result<()> {
        self.depth += 1;
        let max_depth = self.session.options.max_nesting_depth;
        if self.depth > max_depth {
            return Err(Error::NestingTooDeep {
                max_depth,
                position: self.position_at(start),
                source_info: self.source_info(start, start + 1),
            });
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // Whitespace & comments

    fn skip_inline_ws(&mut self) {
        while matches!(self.peek_char(), Some(' ' | '\t')) {
            self.advance(1);
        }
    }

    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == '\n' || ch == '\r' {
                break;
            }
            self.advance(ch.len_utf8());
        }
    }

    /// Skip whitespace, comments, newlines and commas between items.
    fn skip_separators(&mut self) {
        loop {
            self.skip_inline_ws();
            if self.at_comment() {
                self.skip_comment();
            } else if matches!(self.peek_char(), Some('\n' | '\r' | ',')) {
                self.advance(1);
            } else {
                break;
            }
        }
    }

    /// Length of a `\` + optional spaces + newline sequence at the cursor.
    fn line_continuation_len(&self) -> Option<usize> {
        continuation_len(self.remaining())
    }

    // Document structure

    fn parse_document(&mut self) -> Result<ConfigValue> {
        self.eat_char('\u{feff}');
        loop {
            self.skip_inline_ws();
            if self.at_comment() {
                self.skip_comment();
            } else if self.at_newline() {
                self.advance(1);
            } else {
                break;
            }
        }

        let value = match self.peek_char() {
            Some('[') => ConfigValue::List(self.parse_list()?),
            Some('{') => ConfigValue::Tree(self.parse_object()?),
            _ => ConfigValue::Tree(self.parse_object_body(None)?),
        };

        self.skip_separators();
        if self.pos < self.input.len() {
            return Err(self.error_at(
                format!("expected end of input, found {}", self.found()),
                self.pos,
            ));
        }
        Ok(value)
    }

    fn parse_object(&mut self) -> Result<ConfigTree> {
        let start = self.pos;
        self.advance(1); // {
        self.enter(start)?;
        let tree = self.parse_object_body(Some('}'))?;
        if !self.eat_char('}') {
            return Err(self.error_at(
                format!("expected '}}' to close the object, found {}", self.found()),
                self.pos,
            ));
        }
        self.leave();
        Ok(tree)
    }

    /// Fields up to `close` (not consumed), or to the end of input for the
    /// brace-less root object.
    fn parse_object_body(&mut self, close: Option<char>) -> Result<ConfigTree> {
        let mut tree = ConfigTree::new();
        loop {
            self.skip_separators();
            match self.peek_char() {
                None => break,
                Some(c) if Some(c) == close => break,
                _ => {}
            }

            if !self.parse_include(&mut tree)? {
                self.parse_field(&mut tree)?;
            }

            self.skip_inline_ws();
            let at_item_end = match self.peek_char() {
                None | Some('\n' | '\r' | ',') => true,
                Some(c) => Some(c) == close || self.at_comment(),
            };
            if !at_item_end {
                return Err(self.error_at(
                    format!("expected ',' or a newline after a field, found {}", self.found()),
                    self.pos,
                ));
            }
        }
        Ok(tree)
    }

    /// `key = value`, `key : value` or `key { ... }`.
    fn parse_field(&mut self, tree: &mut ConfigTree) -> Result<()> {
        let segments = self.parse_key()?;
        self.skip_inline_ws();

        let value = match self.peek_char() {
            Some('{') => self.parse_concatenation()?,
            Some('=' | ':') => {
                self.advance(1);
                self.skip_inline_ws();
                self.parse_concatenation()?
            }
            _ => {
                return Err(self.error_at(
                    format!("expected '=', ':' or '{{' after key, found {}", self.found()),
                    self.pos,
                ));
            }
        };

        // `key =` with nothing after it is the empty string
        let value = value.unwrap_or_else(|| ConfigValue::string(""));
        tree.put_segments(&segments, value, false);
        Ok(())
    }

    fn parse_key(&mut self) -> Result<Vec<String>> {
        let start = self.pos;
        loop {
            match self.peek_char() {
                Some('"') => {
                    self.parse_quoted_string()?;
                }
                Some(c) if is_key_char(c) => self.advance(c.len_utf8()),
                _ => break,
            }
        }

        let raw = self.input[start..self.pos].trim();
        if raw.is_empty() {
            return Err(self.error_at(format!("expected a key, found {}", self.found()), start));
        }
        parse_path(raw).map_err(|e| self.error_at(e.to_string(), start))
    }

    /// `include "x"`, `include url("x")` or `include file("x")`.
    ///
    /// Returns `false`, consuming nothing, if the cursor is not at an
    /// include directive.
    fn parse_include(&mut self, tree: &mut ConfigTree) -> Result<bool> {
        let rest = self.remaining();
        let is_keyword = rest
            .get(..7)
            .is_some_and(|word| word.eq_ignore_ascii_case("include"));
        if !is_keyword {
            return Ok(false);
        }
        let after = &rest[7..];
        let argument = after.trim_start_matches([' ', '\t']);
        let spaced = argument.len() < after.len();
        let is_directive = argument.starts_with('"')
            || (spaced && (argument.starts_with("url(") || argument.starts_with("file(")));
        if !is_directive {
            return Ok(false);
        }

        let start = self.pos;
        self.advance(7);
        self.skip_inline_ws();

        let target = if self.peek_char() == Some('"') {
            IncludeTarget::classify(&self.parse_quoted_string()?)
        } else {
            let is_url = self.starts_with("url(");
            self.advance(if is_url { 4 } else { 5 });
            self.skip_inline_ws();
            if self.peek_char() != Some('"') {
                return Err(self.error_at(
                    format!("expected a quoted include location, found {}", self.found()),
                    self.pos,
                ));
            }
            let locator = self.parse_quoted_string()?;
            self.skip_inline_ws();
            if !self.eat_char(')') {
                return Err(self.error_at(
                    format!("expected ')' after include location, found {}", self.found()),
                    self.pos,
                ));
            }
            if is_url {
                IncludeTarget::Url(locator)
            } else {
                IncludeTarget::File(locator)
            }
        };

        self.include(target, start, tree)?;
        Ok(true)
    }

    /// Fetch, parse and splice an included document into `tree`.
    fn include(&mut self, target: IncludeTarget, start: usize, tree: &mut ConfigTree) -> Result<()> {
        let position = self.position_at(start);
        let source_info = self.source_info(start, self.pos);
        let include_error = |reason: String| Error::Include {
            locator: target.locator().to_string(),
            reason,
            position: Some(position.clone()),
            source_info: Some(source_info),
        };

        let max_depth = self.session.options.max_include_depth;
        if self.session.include_depth >= max_depth {
            return Err(include_error(format!(
                "includes are nested deeper than {} levels",
                max_depth
            )));
        }

        let fetched = self
            .session
            .loader
            .fetch(&target, self.base.as_ref())
            .map_err(|e| include_error(e.to_string()))?;
        tracing::debug!(locator = target.locator(), label = %fetched.label, "including");

        self.session.include_depth += 1;
        let included = self
            .session
            .parse_source(fetched.label, &fetched.text, fetched.base);
        self.session.include_depth -= 1;

        match included? {
            ConfigValue::Tree(included) => {
                for (key, value) in included {
                    tree.merge_key(key, value, false);
                }
                Ok(())
            }
            other => Err(include_error(format!(
                "the included document is a {}, not an object",
                other.kind_name()
            ))),
        }
    }

    fn parse_list(&mut self) -> Result<ConfigList> {
        let start = self.pos;
        self.advance(1); // [
        self.enter(start)?;

        let mut items = Vec::new();
        loop {
            self.skip_separators();
            match self.peek_char() {
                None => {
                    return Err(self.error_at("expected ']' to close the list, found end of input", self.pos));
                }
                Some(']') => {
                    self.advance(1);
                    break;
                }
                _ => {}
            }

            match self.parse_concatenation()? {
                Some(item) => items.push(item),
                None => {
                    return Err(self.error_at(
                        format!("expected a list element or ']', found {}", self.found()),
                        self.pos,
                    ));
                }
            }

            self.skip_inline_ws();
            let at_item_end =
                matches!(self.peek_char(), None | Some(']' | ',' | '\n' | '\r')) || self.at_comment();
            if !at_item_end {
                return Err(self.error_at(
                    format!("expected ',', a newline or ']' after a list element, found {}", self.found()),
                    self.pos,
                ));
            }
        }

        self.leave();
        Ok(items)
    }

    // Values

    /// Collect every value token up to the end of the logical line.
    ///
    /// Returns `None` when there is no token at all. A run without
    /// substitutions is joined right away; otherwise the tokens are stored
    /// as a pending concatenation and a placeholder is returned.
    fn parse_concatenation(&mut self) -> Result<Option<ConfigValue>> {
        let start = self.pos;
        let mut tokens = Vec::new();
        let mut local_refs = Vec::new();

        loop {
            if let Some(len) = self.line_continuation_len() {
                self.advance(len);
                self.skip_inline_ws();
                continue;
            }
            if self.at_comment() || self.at_newline() {
                break;
            }

            let token = match self.peek_char() {
                None => break,
                Some('$') if self.starts_with("${") => {
                    self.parse_substitution(tokens.len(), &mut local_refs)?
                }
                Some('[') => Token::Value(ConfigValue::List(self.parse_list()?)),
                Some('{') => Token::Value(ConfigValue::Tree(self.parse_object()?)),
                _ => match self.parse_simple_value()? {
                    Some(token) => token,
                    None => break,
                },
            };
            tokens.push(token);
            self.skip_inline_ws();
        }

        if tokens.is_empty() {
            return Ok(None);
        }
        self.finish_concatenation(start, tokens, local_refs).map(Some)
    }

    /// Join the tokens of a concatenation, or store them as pending when
    /// they contain substitutions.
    ///
    /// Kept out of `parse_concatenation` so the recursive parse frames stay
    /// small.
    #[inline(never)]
    fn finish_concatenation(
        &mut self,
        start: usize,
        mut tokens: Vec<Token>,
        local_refs: Vec<LocalRef>,
    ) -> Result<ConfigValue> {
        let end = start + self.input[start..self.pos].trim_end().len();
        let source_info = self.source_info(start, end);
        let position = self.position_at(start);

        if local_refs.is_empty() {
            return concat::transform(tokens).map_err(|message| Error::Concatenation {
                    message,
                    position,
                    source_info,
                });
        }

        let pending = PendingId(self.session.pendings.len());
        for local in local_refs {
            let index = self.session.refs.len();
            tokens[local.token_index] = Token::Substitution(index);
            self.session.refs.push(SubstitutionRef {
                source_info: self.source_info(local.start, local.end),
                position: self.position_at(local.start),
                path: local.path,
                segments: local.segments,
                whitespace: local.whitespace,
                pending,
                index: local.token_index,
            });
        }
        self.session.pendings.push(PendingConcat {
            tokens,
            source_info,
            position,
        });
        Ok(ConfigValue::Pending(pending))
    }

    /// `${path}` plus the spaces and tabs that follow it.
    fn parse_substitution(&mut self, token_index: usize, refs: &mut Vec<LocalRef>) -> Result<Token> {
        let start = self.pos;
        self.advance(2);

        let body = self.remaining();
        let close = body
            .find(['}', '\n', '\r'])
            .filter(|&i| body[i..].starts_with('}'))
            .ok_or_else(|| self.error_at("unterminated substitution, expected '}'", start))?;
        let path = body[..close].trim();
        if path.is_empty() {
            return Err(self.error_at("empty substitution path", start));
        }
        let segments = parse_path(path).map_err(|e| self.error_at(e.to_string(), start))?;
        let path = path.to_string();
        self.advance(close + 1);
        let end = self.pos;

        let ws_start = self.pos;
        self.skip_inline_ws();
        let whitespace = self.input[ws_start..self.pos].to_string();

        refs.push(LocalRef {
            token_index,
            path,
            segments,
            whitespace,
            start,
            end,
        });
        Ok(Token::Substitution(refs.len() - 1))
    }

    /// Number, `true`/`false`/`null`, quoted strings, or unquoted text,
    /// tried in that order.
    fn parse_simple_value(&mut self) -> Result<Option<Token>> {
        let rest = self.remaining();

        if let Some((value, len)) = scan_number(rest) {
            self.advance(len);
            return Ok(Some(Token::Value(ConfigValue::Scalar(value))));
        }

        if let Some((value, len)) = scan_keyword(rest) {
            self.advance(len);
            return Ok(Some(Token::Value(ConfigValue::Scalar(value))));
        }

        if rest.starts_with("\"\"\"") {
            let start = self.pos;
            let Some(close) = rest[3..].find("\"\"\"") else {
                return Err(self.error_at("unterminated multi-line string, expected \"\"\"", start));
            };
            let text = rest[3..3 + close].to_string();
            self.advance(close + 6);
            return Ok(Some(Token::Value(ConfigValue::string(text))));
        }

        if rest.starts_with('"') {
            let text = self.parse_quoted_string()?;
            return Ok(Some(Token::Value(ConfigValue::string(text))));
        }

        Ok(self.parse_unquoted_string().map(Token::Unquoted))
    }

    /// A double-quoted string with backslash escapes. The cursor must be on
    /// the opening quote.
    fn parse_quoted_string(&mut self) -> Result<String> {
        let start = self.pos;
        self.advance(1);
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error_at("unterminated quoted string", start)),
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    None => return Err(self.error_at("unterminated quoted string", start)),
                    // backslash-newline continues the string on the next line
                    Some('\n') => {}
                    Some('\r') => {
                        self.eat_char('\n');
                    }
                    Some('u') => {
                        let escape_start = self.pos - 2;
                        let decoded = self
                            .remaining()
                            .get(..4)
                            .and_then(decode_unicode_escape)
                            .ok_or_else(|| self.error_at("invalid unicode escape", escape_start))?;
                        self.advance(4);
                        out.push(decoded);
                    }
                    Some(c) => out.push(unescape_char(c)),
                },
                Some(c) => out.push(c),
            }
        }
    }

    /// Unquoted text, up to the first `$` or the first point where only
    /// spaces separate it from a delimiter (`}` `]` `,` `#` `//` or a
    /// newline). Returns `None` if no such text starts at the cursor.
    fn parse_unquoted_string(&mut self) -> Option<String> {
        let rest = self.remaining();
        let mut i = 0;
        loop {
            if i > 0 && unquoted_ends_at(&rest[i..]) {
                break;
            }
            if let Some(len) = continuation_len(&rest[i..]) {
                i += len;
                continue;
            }
            match rest[i..].chars().next() {
                Some(c) if !is_unquoted_forbidden(c) => i += c.len_utf8(),
                _ => return None,
            }
        }
        self.advance(i);
        Some(unescape_unquoted(&rest[..i]))
    }
}

fn is_key_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '.' | '_' | '-' | ' ' | '\t')
}

fn is_unquoted_forbidden(c: char) -> bool {
    matches!(c, '[' | '{' | ']' | '}' | '#' | ',' | '=' | '$' | '\n')
}

/// Characters that keep a keyword from ending (`trueish` is not `true`).
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | '.')
}

/// Lookahead that ends numbers and unquoted strings: a `$`, or optional
/// spaces followed by a delimiter or the end of input.
fn value_ends_at(tail: &str, dollar: bool) -> bool {
    if dollar && tail.starts_with('$') {
        return true;
    }
    let t = tail.trim_start_matches([' ', '\t']);
    t.is_empty() || t.starts_with("//") || t.starts_with(['}', ']', ',', '#', '\n', '\r'])
}

fn unquoted_ends_at(tail: &str) -> bool {
    value_ends_at(tail, true)
}

fn continuation_len(tail: &str) -> Option<usize> {
    let after_slash = tail.strip_prefix('\\')?;
    let after_ws = after_slash.trim_start_matches([' ', '\t']);
    let newline = if after_ws.starts_with("\r\n") {
        2
    } else if after_ws.starts_with(['\n', '\r']) {
        1
    } else {
        return None;
    };
    Some(tail.len() - after_ws.len() + newline)
}

fn unescape_unquoted(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let tail = &raw[i..];
        if let Some(len) = continuation_len(tail) {
            out.push('\n');
            i += len;
            continue;
        }
        let mut chars = tail.chars();
        let Some(c) = chars.next() else { break };
        if c == '\\' {
            let replacement = match chars.next() {
                Some('n') => Some('\n'),
                Some('r') => Some('\r'),
                Some('t') => Some('\t'),
                Some(c @ ('=' | '#' | '!' | '"')) => Some(c),
                _ => None,
            };
            if let Some(replacement) = replacement {
                out.push(replacement);
                i += 2;
                continue;
            }
        }
        out.push(c);
        i += c.len_utf8();
    }
    out
}

/// `[+-]?(\d*\.\d+|\d+(\.\d+)?)([eE][+-]?\d+)?` followed by a value end.
fn scan_number(rest: &str) -> Option<(ScalarValue, usize)> {
    let bytes = rest.as_bytes();
    let digits_from = |from: usize| bytes[from..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_digits = digits_from(i);
    i += int_digits;

    let mut is_float = false;
    if bytes.get(i) == Some(&b'.') {
        let frac_digits = digits_from(i + 1);
        if frac_digits > 0 {
            i += 1 + frac_digits;
            is_float = true;
        }
    }
    if int_digits == 0 && !is_float {
        return None;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = digits_from(j);
        if exp_digits > 0 {
            i = j + exp_digits;
            is_float = true;
        }
    }

    if !value_ends_at(&rest[i..], true) {
        return None;
    }

    let text = &rest[..i];
    let value = if is_float {
        ScalarValue::Float(text.parse().ok()?)
    } else {
        match text.parse::<i64>() {
            Ok(n) => ScalarValue::Int(n),
            Err(_) => ScalarValue::Float(text.parse().ok()?),
        }
    };
    Some((value, i))
}

fn scan_keyword(rest: &str) -> Option<(ScalarValue, usize)> {
    let keywords = [
        ("true", ScalarValue::Bool(true)),
        ("false", ScalarValue::Bool(false)),
        ("null", ScalarValue::Null),
    ];
    for (word, value) in keywords {
        let matches = rest
            .get(..word.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(word));
        if matches && !rest[word.len()..].chars().next().is_some_and(is_word_char) {
            return Some((value, word.len()));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::include::MemoryLoader;
    use pretty_assertions::assert_eq;

    fn parse_with(loader: &dyn IncludeLoader, text: &str) -> Result<Document> {
        let mut sources = SourceContext::new();
        let options = ParseOptions::default();
        let mut session = Session::new(&mut sources, loader, &options);
        let root = session.parse_source("<test>".to_string(), text, None)?;
        Ok(session.into_document(root))
    }

    fn parse(text: &str) -> Result<Document> {
        parse_with(&MemoryLoader::new(), text)
    }

    fn tree(text: &str) -> ConfigTree {
        match parse(text).unwrap().root {
            ConfigValue::Tree(tree) => tree,
            other => panic!("expected an object, got {:?}", other),
        }
    }

    #[test]
    fn test_scan_number_needs_a_delimiter() {
        assert_eq!(scan_number("42"), Some((ScalarValue::Int(42), 2)));
        assert_eq!(scan_number("-3.5 }"), Some((ScalarValue::Float(-3.5), 4)));
        assert_eq!(scan_number(".5,"), Some((ScalarValue::Float(0.5), 2)));
        assert_eq!(scan_number("1e3\n"), Some((ScalarValue::Float(1000.0), 3)));
        assert_eq!(scan_number("7${x}"), Some((ScalarValue::Int(7), 1)));
        assert_eq!(scan_number("3.14abc"), None);
        assert_eq!(scan_number("10.0.0.1"), None);
        assert_eq!(scan_number("5 apples"), None);
        assert_eq!(scan_number("abc"), None);
    }

    #[test]
    fn test_scan_keyword() {
        assert_eq!(scan_keyword("TRUE"), Some((ScalarValue::Bool(true), 4)));
        assert_eq!(scan_keyword("false ,"), Some((ScalarValue::Bool(false), 5)));
        assert_eq!(scan_keyword("Null"), Some((ScalarValue::Null, 4)));
        assert_eq!(scan_keyword("trueish"), None);
    }

    #[test]
    fn test_continuation_and_unquoted_escapes() {
        assert_eq!(continuation_len("\\  \nrest"), Some(4));
        assert_eq!(continuation_len("\\\r\nrest"), Some(3));
        assert_eq!(continuation_len("\\n"), None);
        assert_eq!(unescape_unquoted(r"a\tb\=c\#d"), "a\tb=c#d");
        assert_eq!(unescape_unquoted("line1 \\\nline2"), "line1 \nline2");
        assert_eq!(unescape_unquoted(r"keep\x"), r"keep\x");
    }

    #[test]
    fn test_scalars() {
        let t = tree("i = 1\nf = 2.5\nb = TRUE\nn = null\ns = hello world\nq = \"a\\tb\"");
        assert_eq!(t.get("i").unwrap(), &ConfigValue::from(1));
        assert_eq!(t.get("f").unwrap(), &ConfigValue::from(2.5));
        assert_eq!(t.get("b").unwrap(), &ConfigValue::from(true));
        assert!(t.get("n").unwrap().is_null());
        assert_eq!(t.get("s").unwrap(), &ConfigValue::from("hello world"));
        assert_eq!(t.get("q").unwrap(), &ConfigValue::from("a\tb"));
    }

    #[test]
    fn test_separators_and_braces() {
        let t = tree("a : 1, b = 2\nc { d = 3 }");
        assert_eq!(t.get_int("a").unwrap(), 1);
        assert_eq!(t.get_int("b").unwrap(), 2);
        assert_eq!(t.get_int("c.d").unwrap(), 3);
    }

    #[test]
    fn test_substitutions_are_recorded_not_resolved() {
        let doc = parse("a = ${b}  x\nb = 1").unwrap();
        assert_eq!(doc.refs.len(), 1);
        let reference = &doc.refs[0];
        assert_eq!(reference.path(), "b");
        assert_eq!(reference.whitespace(), "  ");
        assert_eq!(reference.index, 0);
        assert_eq!(reference.position().line, 1);
        assert_eq!(reference.position().column, 5);
        assert!(doc.root.as_tree().unwrap().get("a").unwrap().is_pending());
        assert_eq!(doc.pendings[0].tokens.len(), 2);
    }

    #[test]
    fn test_syntax_error_position() {
        let err = parse("a = 1\nb = foo=bar").unwrap_err();
        match err {
            Error::Syntax { position, message, .. } => {
                assert_eq!((position.line, position.column), (2, 5));
                assert!(message.contains("'f'") || message.contains("'='"), "{message}");
            }
            other => panic!("expected a syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_include_splices_keys() {
        let loader = MemoryLoader::new().with_document("other", "a = 2\nb = 3");
        let doc = parse_with(&loader, "a = 1\ninclude \"other\"").unwrap();
        let t = doc.root.as_tree().unwrap();
        assert_eq!(t.get_int("a").unwrap(), 2);
        assert_eq!(t.get_int("b").unwrap(), 3);
    }

    #[test]
    fn test_include_keyword_as_key() {
        let t = tree("include = yes");
        assert_eq!(t.get_string("include").unwrap(), "yes");
    }

    #[test]
    fn test_nesting_limit() {
        let mut sources = SourceContext::new();
        let options = ParseOptions::default().with_max_nesting_depth(2);
        let loader = MemoryLoader::new();
        let mut session = Session::new(&mut sources, &loader, &options);
        let err = session
            .parse_source("<test>".to_string(), "a { b { c { d = 1 } } }", None)
            .unwrap_err();
        assert!(matches!(err, Error::NestingTooDeep { max_depth: 2, .. }));
    }

    fn nested_objects(depth: usize) -> String {
        format!("{}x = 1{}", "a {".repeat(depth), "}".repeat(depth))
    }

    #[test]
    fn test_default_nesting_limit_fits_the_stack() {
        let depth = ParseOptions::default().max_nesting_depth;
        let root = tree(&nested_objects(depth));
        let path = format!("{}x", "a.".repeat(depth));
        assert_eq!(root.get_int(&path).unwrap(), 1);
    }

    #[test]
    fn test_default_nesting_limit_is_enforced() {
        let options = ParseOptions::default();
        let mut sources = SourceContext::new();
        let loader = MemoryLoader::new();
        let mut session = Session::new(&mut sources, &loader, &options);
        let err = session
            .parse_source("<test>".to_string(), &nested_objects(options.max_nesting_depth + 1), None)
            .unwrap_err();
        assert!(matches!(err, Error::NestingTooDeep { max_depth, .. } if max_depth == options.max_nesting_depth));
    }

    #[test]
    fn test_unicode_escape_in_quoted_key() {
        let root = tree(r#""\u0041" = 1
s = "\u0041""#);
        assert_eq!(root.keys().collect::<Vec<_>>(), vec!["A", "s"]);
        assert_eq!(root.get_string("s").unwrap(), "A");
    }
}
