//! Line-oriented reader for metric descriptions.
//!
//! Top level accepts blank lines, `#` comments, single-line
//! `parameter <decl>;` lines and the `decode() {` / `post() {` bodies.
//! Each body is a run of local declarations followed by statements, closed
//! by a line that is exactly `}`.

use crate::ast::{DeclExtras, Level, Section};
use crate::declaration::declare_with;
use crate::error::{Context, ParseError, ParseErrorKind};
use crate::namespace::{Scope, SymbolTables};

mod body;

// ──────────────────────────────────────────────
// Line cursor
// ──────────────────────────────────────────────

/// Cursor over the physical lines of a description, numbered from 1.
pub(crate) struct Lines<'a> {
    lines: Vec<&'a str>,
    pos: usize,
}

impl<'a> Lines<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Lines {
            lines: src.lines().collect(),
            pos: 0,
        }
    }

    pub(crate) fn next_line(&mut self) -> Option<(u32, &'a str)> {
        let line = *self.lines.get(self.pos)?;
        self.pos += 1;
        Some((self.pos as u32, line))
    }

    /// Number of the last line, used to tag end-of-file errors.
    pub(crate) fn last_line(&self) -> u32 {
        self.lines.len() as u32
    }
}

/// A line that is exactly `}` closes a body.
pub(crate) fn closes_body(line: &str) -> bool {
    line.trim_end() == "}"
}

// ──────────────────────────────────────────────
// Top level
// ──────────────────────────────────────────────

/// Read a whole description into `tables`. Returns the leading comment
/// lines (with the `#` removed), which document the metric.
pub fn parse_description(
    ctx: &Context,
    metric: &str,
    src: &str,
    tables: &mut SymbolTables,
) -> Result<Vec<String>, ParseError> {
    let mut lines = Lines::new(src);
    let mut comments: Vec<String> = Vec::new();

    while let Some((line_no, line)) = lines.next_line() {
        let trimmed = line.trim();
        let words: Vec<&str> = trimmed.split_whitespace().collect();

        if trimmed.is_empty() || trimmed.starts_with('#') {
            // only the unbroken run at the top of the file is kept
            if line_no as usize <= comments.len() + 1 {
                let text = trimmed
                    .strip_prefix('#')
                    .map(|c| c.trim_start().to_owned())
                    .unwrap_or_default();
                comments.push(text);
            }
        } else if words.len() > 1 && words[0] == "parameter" {
            let decl = trimmed.strip_prefix("parameter").unwrap_or(trimmed);
            declare_with(
                ctx,
                tables,
                &[
                    Scope::Params,
                    Scope::Body(Section::Post),
                    Scope::Body(Section::Decode),
                ],
                decl,
                i64::from(line_no),
                Level::Constant,
                |name| DeclExtras {
                    macro_text: Some(format!("opt->u.{}.{}", metric, name)),
                    doc: "metric parameter".to_owned(),
                    ..DeclExtras::default()
                },
            )?;
        } else if let Some(section) = body_header(&words) {
            let first = body::scan_declarations(ctx, &mut lines, tables, section)?;
            body::levelize(ctx, &mut lines, first, tables, section)?;
            log::debug!(
                "{} body: {} statement(s), {} quantities used",
                section,
                tables.body(section).statements.len(),
                tables.body(section).used.len()
            );
        } else {
            return Err(ctx.error(line_no, ParseErrorKind::UnexpectedLine, line));
        }
    }

    while comments.last().is_some_and(|c| c.is_empty()) {
        comments.pop();
    }

    Ok(comments)
}

fn body_header(words: &[&str]) -> Option<Section> {
    match words {
        ["decode()", "{"] => Some(Section::Decode),
        ["post()", "{"] => Some(Section::Post),
        _ => None,
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
