//! Key/value property files.
//!
//! Follows the conventional `.properties` syntax: `#` and `!` start comment
//! lines, keys end at the first unescaped `=`, `:` or whitespace, and a line
//! ending in an odd number of backslashes continues on the next line.

use std::collections::HashMap;

use crate::error::PropertiesError;

/// A flat string-to-string mapping.
///
/// Used both for per-controller configuration resources and for the
/// process-wide named properties handed to the
/// [`ControllerFactory`](crate::ControllerFactory).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Properties {
    entries: HashMap<String, String>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse property-file text.
    ///
    /// Later duplicates of a key replace earlier ones.
    pub fn parse(text: &str) -> Result<Self, PropertiesError> {
        let mut props = Self::new();
        for (line_no, logical) in logical_lines(text) {
            let (key, value) = split_entry(&logical, line_no)?;
            props.entries.insert(key, value);
        }
        Ok(props)
    }

    /// Build properties from launch arguments.
    ///
    /// Recognizes `--key=value` and `-Dkey=value`; everything else is ignored.
    /// A bare `--flag` maps to an empty string.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut props = Self::new();
        for arg in args {
            let arg = arg.as_ref();
            let body = if let Some(rest) = arg.strip_prefix("--") {
                rest
            } else if let Some(rest) = arg.strip_prefix("-D") {
                rest
            } else {
                continue;
            };
            if body.is_empty() {
                continue;
            }
            match body.split_once('=') {
                Some((key, value)) if !key.is_empty() => {
                    props.insert(key, value);
                }
                Some(_) => {}
                None => {
                    props.insert(body, "");
                }
            }
        }
        props
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Known keys, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Properties {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Join continuation lines and drop comments and blanks.
///
/// Yields the 1-based number of the first physical line of each entry.
fn logical_lines(text: &str) -> Vec<(usize, String)> {
    let mut out = Vec::new();
    let mut current: Option<(usize, String)> = None;

    for (idx, raw) in physical_lines(text).enumerate() {
        let line = raw.trim_start_matches([' ', '\t', '\u{c}']);

        let start = match current.take() {
            Some(partial) => partial,
            None => {
                if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                    continue;
                }
                (idx + 1, String::new())
            }
        };

        let (line_no, mut buf) = start;
        if ends_with_continuation(line) {
            buf.push_str(&line[..line.len() - 1]);
            current = Some((line_no, buf));
        } else {
            buf.push_str(line);
            out.push((line_no, buf));
        }
    }

    if let Some(partial) = current {
        out.push(partial);
    }
    out
}

/// Split on `\n`, `\r` or `\r\n`.
fn physical_lines(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = text;
    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }
        let Some(end) = rest.find(['\r', '\n']) else {
            return Some(std::mem::take(&mut rest));
        };
        let line = &rest[..end];
        let terminator = if rest[end..].starts_with("\r\n") { 2 } else { 1 };
        rest = &rest[end + terminator..];
        Some(line)
    })
}

fn ends_with_continuation(line: &str) -> bool {
    let trailing = line.bytes().rev().take_while(|b| *b == b'\\').count();
    trailing % 2 == 1
}

fn split_entry(line: &str, line_no: usize) -> Result<(String, String), PropertiesError> {
    let mut key_end = line.len();
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\u{c}' => {
                key_end = i;
                break;
            }
            _ => {}
        }
    }

    let key = unescape(&line[..key_end], line_no)?;

    let mut rest = line[key_end..].trim_start_matches([' ', '\t', '\u{c}']);
    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
        rest = stripped.trim_start_matches([' ', '\t', '\u{c}']);
    }
    let value = unescape(rest, line_no)?;

    Ok((key, value))
}

fn unescape(raw: &str, line_no: usize) -> Result<String, PropertiesError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{c}'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let code = (hex.len() == 4)
                    .then(|| u32::from_str_radix(&hex, 16).ok())
                    .flatten()
                    .ok_or(PropertiesError::MalformedEscape { line: line_no })?;
                // Lone surrogates have no char representation.
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}
