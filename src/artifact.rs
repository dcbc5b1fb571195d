//! Raw artifact deserialization for generated search indexes.
//!
//! A documentation generator emits the index as a JS loader call,
//! `Search.setIndex({...})`, whose payload is JSON except that the minifier
//! leaves identifier-shaped keys unquoted. This module extracts the payload,
//! re-quotes bare keys, and deserializes the result.

use crate::error::LoadError;
use serde::Deserialize;
use std::borrow::Cow;
use std::collections::HashMap;

/// The index object as serialized by the generator.
///
/// `docnames`, `filenames` and `titles` are parallel arrays; `terms` and
/// `titleterms` reference documents by index into `docnames`. Generation
/// metadata like `objects`/`objnames`/`objtypes` is accepted and ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct RawIndex {
    pub(crate) docnames: Vec<String>,
    #[serde(default)]
    pub(crate) filenames: Vec<String>,
    pub(crate) titles: Vec<String>,
    pub(crate) terms: HashMap<String, DocRefs>,
    #[serde(default)]
    pub(crate) titleterms: HashMap<String, DocRefs>,
    #[serde(default)]
    pub(crate) envversion: Option<serde_json::Value>,
}

/// Document reference list for one term.
///
/// The generator collapses single-document lists to a bare integer, and keeps
/// pruned terms around with an empty list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum DocRefs {
    One(usize),
    Many(Vec<usize>),
}

impl DocRefs {
    pub(crate) fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        let (one, many) = match self {
            Self::One(doc) => (Some(*doc), &[] as &[usize]),
            Self::Many(docs) => (None, docs.as_slice()),
        };
        one.into_iter().chain(many.iter().copied())
    }
}

/// Parses artifact text into a [`RawIndex`].
///
/// Accepts either a raw JSON object or the `Search.setIndex(...)` wrapper.
pub(crate) fn parse(text: &str) -> Result<RawIndex, LoadError> {
    let payload = extract_payload(text)?;
    let normalized = quote_bare_keys(payload);
    serde_json::from_str(&normalized).map_err(LoadError::from)
}

/// Strips the `Search.setIndex(...)` loader call, if present.
fn extract_payload(text: &str) -> Result<&str, LoadError> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') {
        return Ok(trimmed);
    }

    let rest = trimmed
        .strip_prefix("Search.setIndex(")
        .ok_or(LoadError::LoaderWrapper)?;
    let end = rest.rfind(')').ok_or(LoadError::LoaderWrapper)?;
    let payload = rest[..end].trim();
    if payload.starts_with('{') {
        Ok(payload)
    } else {
        Err(LoadError::LoaderWrapper)
    }
}

/// Quotes bare object keys so the payload becomes valid JSON.
///
/// A bare key is an identifier run sitting in key position (the previous
/// significant character is `{` or `,`) and followed by `:`. String contents
/// are tracked so `,` `{` `:` inside values are never misread as structure.
fn quote_bare_keys(payload: &str) -> Cow<'_, str> {
    let mut out = String::with_capacity(payload.len() + 64);
    let mut changed = false;
    let mut in_string = false;
    let mut escaped = false;
    // Last structural character seen outside strings; keys only follow these.
    let mut last_significant = '\0';

    let mut chars = payload.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                in_string = true;
                out.push(c);
            }
            c if is_ident_start(c) && matches!(last_significant, '{' | ',' | '\0') => {
                // Consume the identifier run and check for a trailing colon.
                let mut end = i + c.len_utf8();
                while let Some(&(j, n)) = chars.peek() {
                    if is_ident_continue(n) {
                        end = j + n.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let ident = &payload[i..end];
                let followed_by_colon =
                    matches!(chars.peek(), Some(&(_, n)) if n == ':' || n.is_whitespace());
                if followed_by_colon {
                    out.push('"');
                    out.push_str(ident);
                    out.push('"');
                    changed = true;
                } else {
                    out.push_str(ident);
                }
                last_significant = '"';
            }
            c => {
                if !c.is_whitespace() {
                    last_significant = c;
                }
                out.push(c);
            }
        }
    }

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(payload)
    }
}

const fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

const fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}
