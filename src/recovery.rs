//! Staged recovery of JSON from model completions.
//!
//! Completions are supposed to be JSON but routinely arrive wrapped in
//! markdown fences, with comments, trailing commas, bare keys or single
//! quotes. [`recover`] applies a fixed sequence of increasingly aggressive
//! rewrites, attempting a strict parse after each repair. Rewrites accumulate:
//! every stage works on the output of the previous one.

use crate::{Error, Result};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static FENCE_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_+\-]*").ok());

/// The parse attempt that produced a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairStage {
    /// Cleaned text parsed as-is.
    Cleaned,
    TrailingCommas,
    BareKeys,
    SingleQuotes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Recovered {
    pub value: Value,
    pub stage: RepairStage,
}

/// Recover a JSON value from arbitrary completion text.
///
/// All-or-nothing: either a complete value or [`Error::RecoveryFailed`]
/// carrying the final parser error.
pub fn recover_json(text: &str) -> Result<Value> {
    recover(text).map(|recovered| recovered.value)
}

/// Same as [`recover_json`], also reporting which attempt succeeded.
pub fn recover(text: &str) -> Result<Recovered> {
    let mut candidate = strip_fences(text);
    candidate = slice_to_boundaries(&candidate).to_string();
    candidate = strip_comment_lines(&candidate);
    candidate = normalize_quotes(&candidate);

    if let Ok(value) = serde_json::from_str(&candidate) {
        return Ok(stage_hit(value, RepairStage::Cleaned));
    }

    candidate = remove_trailing_commas(&candidate);
    if let Ok(value) = serde_json::from_str(&candidate) {
        return Ok(stage_hit(value, RepairStage::TrailingCommas));
    }

    candidate = quote_bare_keys(&candidate);
    if let Ok(value) = serde_json::from_str(&candidate) {
        return Ok(stage_hit(value, RepairStage::BareKeys));
    }

    candidate = convert_single_quotes(&candidate);
    match serde_json::from_str(&candidate) {
        Ok(value) => Ok(stage_hit(value, RepairStage::SingleQuotes)),
        Err(e) => {
            tracing::debug!("JSON recovery exhausted all stages: {}", e);
            Err(Error::RecoveryFailed(e.to_string()))
        }
    }
}

fn stage_hit(value: Value, stage: RepairStage) -> Recovered {
    tracing::debug!("Recovered JSON at stage {:?}", stage);
    Recovered { value, stage }
}

/// Remove opening (optionally language-tagged) and closing code fences anywhere.
fn strip_fences(text: &str) -> String {
    match FENCE_PATTERN.as_ref() {
        Some(re) => re.replace_all(text, "").into_owned(),
        None => text.to_string(),
    }
}

/// Slice from the first `{`/`[` to the last `}`/`]`, or keep everything.
fn slice_to_boundaries(text: &str) -> &str {
    let start = text.find(['{', '[']);
    let end = text.rfind(['}', ']']);
    match (start, end) {
        (Some(start), Some(end)) if start <= end => &text[start..=end],
        _ => text,
    }
}

fn strip_comment_lines(text: &str) -> String {
    text.lines()
        .filter(|line| {
            let trimmed = line.trim_start();
            !(trimmed.starts_with("//") || trimmed.starts_with('#'))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn normalize_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

/// Drop commas directly before a closing `}` or `]`, outside string literals.
fn remove_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (i, &c) in chars.iter().enumerate() {
        if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '"' | '\'' => {
                quote = Some(c);
                out.push(c);
            }
            ',' if closes_container(&chars[i + 1..]) => {}
            other => out.push(other),
        }
    }

    out
}

fn closes_container(rest: &[char]) -> bool {
    rest.iter()
        .find(|c| !c.is_whitespace())
        .is_some_and(|c| *c == '}' || *c == ']')
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Quote identifiers used as object keys.
///
/// Only text outside string literals (double or single quoted) is touched, so
/// prose such as `"note: rest"` inside a value survives untouched.
fn quote_bare_keys(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut prev = '\0';
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            prev = c;
            i += 1;
            continue;
        }

        if c == '"' || c == '\'' {
            quote = Some(c);
            out.push(c);
            prev = c;
            i += 1;
            continue;
        }

        let key_position = prev == '{' || prev == ',' || prev.is_whitespace();
        if key_position && is_ident_start(c) {
            let mut end = i + 1;
            while end < chars.len() && is_ident_continue(chars[end]) {
                end += 1;
            }
            let mut after = end;
            while after < chars.len() && chars[after].is_whitespace() {
                after += 1;
            }
            let ident: String = chars[i..end].iter().collect();
            if after < chars.len() && chars[after] == ':' {
                out.push('"');
                out.push_str(&ident);
                out.push('"');
            } else {
                out.push_str(&ident);
            }
            prev = chars[end - 1];
            i = end;
            continue;
        }

        out.push(c);
        prev = c;
        i += 1;
    }

    out
}

/// Rewrite `'...'` literals as double-quoted JSON strings.
///
/// Escaped single quotes become bare apostrophes, bare double quotes inside
/// get escaped, and other escapes pass through. Double-quoted strings are
/// copied verbatim.
fn convert_single_quotes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                out.push('"');
                let mut escaped = false;
                for inner in chars.by_ref() {
                    out.push(inner);
                    if escaped {
                        escaped = false;
                    } else if inner == '\\' {
                        escaped = true;
                    } else if inner == '"' {
                        break;
                    }
                }
            }
            '\'' => {
                out.push('"');
                while let Some(inner) = chars.next() {
                    match inner {
                        '\\' => match chars.next() {
                            Some('\'') => out.push('\''),
                            Some(next) => {
                                out.push('\\');
                                out.push(next);
                            }
                            None => out.push('\\'),
                        },
                        '"' => out.push_str("\\\""),
                        '\'' => {
                            out.push('"');
                            break;
                        }
                        other => out.push(other),
                    }
                }
            }
            other => out.push(other),
        }
    }

    out
}
