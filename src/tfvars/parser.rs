//! Layout-preserving parser for `.tfvars` files.
//!
//! Handles the subset these files use: `key = "string"` with escapes,
//! booleans, numbers, `#` and `//` comments, and list or object values
//! spanning several lines (kept verbatim). Every input line is retained
//! so rendering an unmodified document reproduces the input exactly.

use std::path::{Path, PathBuf};

use regex::Regex;

use crate::error::{BootstrapError, Result};

/// A parsed right-hand side.
#[derive(Debug, Clone, PartialEq)]
pub enum TfValue {
    /// Quoted string, unescaped
    String(String),
    /// `true` or `false`
    Bool(bool),
    /// Numeric literal as written
    Number(String),
    /// List, object or other expression, verbatim
    Raw(String),
}

impl TfValue {
    /// The value as a plain string, for display.
    pub fn display(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) | Self::Raw(n) => n.clone(),
        }
    }

    /// Source text for this value.
    pub fn to_literal(&self) -> String {
        match self {
            Self::String(s) => quote(s),
            Self::Bool(b) => b.to_string(),
            Self::Number(n) | Self::Raw(n) => n.clone(),
        }
    }
}

/// Quote and escape a string value.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// One assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Variable name
    pub key: String,
    /// Parsed value
    pub value: TfValue,
    prefix: String,
    suffix: String,
    dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
enum Line {
    Trivia(String),
    Entry { raw: String, entry: Entry },
}

/// A `.tfvars` file that can be edited without disturbing its layout.
#[derive(Debug, Clone, PartialEq)]
pub struct TfvarsDocument {
    path: PathBuf,
    lines: Vec<Line>,
    trailing_newline: bool,
}

impl TfvarsDocument {
    /// Parse `text`; `path` is used in error messages.
    pub fn parse(path: &Path, text: &str) -> Result<Self> {
        Parser::new(path, text)?.parse()
    }

    /// Read and parse a file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(path, &text)
    }

    /// File this document came from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Value of `key`.
    pub fn get(&self, key: &str) -> Option<&TfValue> {
        self.entries().find(|e| e.key == key).map(|e| &e.value)
    }

    /// All assignments in file order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.lines.iter().filter_map(|line| match line {
            Line::Entry { entry, .. } => Some(entry),
            Line::Trivia(_) => None,
        })
    }

    /// Set `key`, replacing the value in place or appending a new line.
    pub fn set(&mut self, key: &str, value: TfValue) {
        for line in &mut self.lines {
            if let Line::Entry { entry, .. } = line {
                if entry.key == key {
                    if entry.value != value {
                        entry.value = value;
                        entry.dirty = true;
                    }
                    return;
                }
            }
        }
        self.lines.push(Line::Entry {
            raw: String::new(),
            entry: Entry {
                key: key.to_string(),
                value,
                prefix: format!("{} = ", key),
                suffix: String::new(),
                dirty: true,
            },
        });
    }

    /// Set a string value.
    pub fn set_string(&mut self, key: &str, value: &str) {
        self.set(key, TfValue::String(value.to_string()));
    }

    /// Render the document. Untouched lines come back byte for byte.
    pub fn render(&self) -> String {
        let rendered: Vec<String> = self
            .lines
            .iter()
            .map(|line| match line {
                Line::Trivia(raw) => raw.clone(),
                Line::Entry { raw, entry } if !entry.dirty => raw.clone(),
                Line::Entry { entry, .. } => {
                    format!("{}{}{}", entry.prefix, entry.value.to_literal(), entry.suffix)
                }
            })
            .collect();
        let mut out = rendered.join("\n");
        if self.trailing_newline || self.lines.iter().any(is_appended) {
            out.push('\n');
        }
        out
    }

    /// Write the rendered document back to its path.
    pub fn save(&self) -> Result<()> {
        std::fs::write(&self.path, self.render())?;
        Ok(())
    }
}

fn is_appended(line: &Line) -> bool {
    matches!(line, Line::Entry { raw, .. } if raw.is_empty())
}

struct Parser<'t> {
    path: &'t Path,
    lines: Vec<&'t str>,
    trailing_newline: bool,
    assignment: Regex,
    number: Regex,
}

impl<'t> Parser<'t> {
    fn new(path: &'t Path, text: &'t str) -> Result<Self> {
        let trailing_newline = text.ends_with('\n');
        let body = text.strip_suffix('\n').unwrap_or(text);
        let lines = if text.is_empty() {
            Vec::new()
        } else {
            body.split('\n').collect()
        };
        Ok(Self {
            path,
            lines,
            trailing_newline,
            assignment: Regex::new(r"^(\s*([A-Za-z_][A-Za-z0-9_-]*)\s*=\s*)(.*)$")
                .map_err(anyhow::Error::from)?,
            number: Regex::new(r"^-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?$")
                .map_err(anyhow::Error::from)?,
        })
    }

    fn error(&self, line: usize, message: impl Into<String>) -> BootstrapError {
        BootstrapError::TfvarsParseError {
            path: self.path.to_path_buf(),
            line,
            message: message.into(),
        }
    }

    fn parse(self) -> Result<TfvarsDocument> {
        let mut lines = Vec::new();
        let mut seen = std::collections::HashSet::new();
        let mut index = 0;

        while index < self.lines.len() {
            let text = self.lines[index];
            let line_no = index + 1;
            let trimmed = text.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
                lines.push(Line::Trivia(text.to_string()));
                index += 1;
                continue;
            }

            let caps = self
                .assignment
                .captures(text)
                .ok_or_else(|| self.error(line_no, "expected `name = value`"))?;
            let prefix = caps[1].to_string();
            let key = caps[2].to_string();
            let rest = caps.get(3).map_or("", |m| m.as_str());

            if !seen.insert(key.clone()) {
                return Err(self.error(line_no, format!("duplicate variable '{}'", key)));
            }

            let (value, suffix, consumed) = self.parse_value(rest, index)?;
            let raw = self.lines[index..index + consumed].join("\n");
            lines.push(Line::Entry {
                raw,
                entry: Entry {
                    key,
                    value,
                    prefix,
                    suffix,
                    dirty: false,
                },
            });
            index += consumed;
        }

        Ok(TfvarsDocument {
            path: self.path.to_path_buf(),
            lines,
            trailing_newline: self.trailing_newline,
        })
    }

    /// Returns the value, the text after it, and how many lines it used.
    fn parse_value(&self, rest: &str, index: usize) -> Result<(TfValue, String, usize)> {
        let line_no = index + 1;
        if rest.starts_with('"') {
            let (value, end) = unquote(rest).ok_or_else(|| self.error(line_no, "unterminated string"))?;
            let suffix = self.check_suffix(&rest[end..], line_no)?;
            return Ok((TfValue::String(value), suffix, 1));
        }
        if rest.starts_with('[') || rest.starts_with('{') {
            return self.parse_block(rest, index);
        }

        let token_end = rest
            .find(|c: char| c.is_whitespace() || c == '#' || c == '/')
            .unwrap_or(rest.len());
        let token = &rest[..token_end];
        let suffix = self.check_suffix(&rest[token_end..], line_no)?;
        let value = match token {
            "true" => TfValue::Bool(true),
            "false" => TfValue::Bool(false),
            "" => return Err(self.error(line_no, "missing value")),
            t if self.number.is_match(t) => TfValue::Number(t.to_string()),
            t => return Err(self.error(line_no, format!("unsupported value '{}'", t))),
        };
        Ok((value, suffix, 1))
    }

    fn parse_block(&self, rest: &str, index: usize) -> Result<(TfValue, String, usize)> {
        let mut depth = 0i32;
        let mut in_string = false;
        let mut escaped = false;
        let mut text = String::new();

        for (offset, line) in self.lines[index..].iter().enumerate() {
            let segment = if offset == 0 { rest } else { line };
            if offset > 0 {
                text.push('\n');
            }
            for (pos, c) in segment.char_indices() {
                text.push(c);
                if in_string {
                    match (escaped, c) {
                        (true, _) => escaped = false,
                        (false, '\\') => escaped = true,
                        (false, '"') => in_string = false,
                        _ => {}
                    }
                    continue;
                }
                if c == '#' || segment[pos..].starts_with("//") {
                    text.push_str(&segment[pos + c.len_utf8()..]);
                    break;
                }
                match c {
                    '"' => in_string = true,
                    '[' | '{' => depth += 1,
                    ']' | '}' => {
                        depth -= 1;
                        if depth == 0 {
                            let after = &segment[pos + c.len_utf8()..];
                            let suffix = self.check_suffix(after, index + offset + 1)?;
                            return Ok((TfValue::Raw(text), suffix, offset + 1));
                        }
                    }
                    _ => {}
                }
            }
        }
        Err(self.error(index + 1, "unterminated list or object"))
    }

    /// Only whitespace and a comment may follow a value.
    fn check_suffix(&self, after: &str, line_no: usize) -> Result<String> {
        let trimmed = after.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
            Ok(after.to_string())
        } else {
            Err(self.error(line_no, format!("unexpected text after value: '{}'", trimmed)))
        }
    }
}

/// Parse a quoted string at the start of `text`; returns the unescaped
/// value and the byte offset just past the closing quote.
fn unquote(text: &str) -> Option<(String, usize)> {
    let mut value = String::new();
    let mut chars = text.char_indices().skip(1);
    while let Some((pos, c)) = chars.next() {
        match c {
            '"' => return Some((value, pos + 1)),
            '\\' => {
                let (_, next) = chars.next()?;
                value.push(match next {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                });
            }
            c => value.push(c),
        }
    }
    None
}
