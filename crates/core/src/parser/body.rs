//! Function bodies: the local declaration scanner and the statement
//! levelizer.
//!
//! A statement's level is the highest level among the known quantities it
//! reads. Assignments also raise the level of their target, so later
//! statements reading it inherit the dependency.

use super::{closes_body, Lines};
use crate::ast::{DeclExtras, Level, Section, Statement};
use crate::declaration::declare;
use crate::error::{Context, ParseError, ParseErrorKind};
use crate::lexer::{is_type_qualifier, tokenize_significant, Token, ASSIGNMENT_OPS};
use crate::namespace::{Body, Scope, SymbolTables};

/// Declare every leading local declaration of a body. Returns the first
/// line that is not a declaration (possibly the closing `}`).
pub(crate) fn scan_declarations<'a>(
    ctx: &Context,
    lines: &mut Lines<'a>,
    tables: &mut SymbolTables,
    section: Section,
) -> Result<(u32, &'a str), ParseError> {
    while let Some((line_no, line)) = lines.next_line() {
        if closes_body(line) {
            return Ok((line_no, line));
        }
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let tokens = tokenize_significant(line);
        if !tokens.first().is_some_and(|t| is_type_qualifier(&t.text)) {
            return Ok((line_no, line));
        }
        declare(
            ctx,
            tables,
            &[Scope::Body(section)],
            line,
            i64::from(line_no),
            Level::PerDocument,
            DeclExtras {
                doc: "user declared quantity".to_owned(),
                ..DeclExtras::default()
            },
        )?;
    }

    Err(ctx.error(
        lines.last_line(),
        ParseErrorKind::UnexpectedEof {
            section: section.to_string(),
        },
        "",
    ))
}

/// Levelize statements from `first` up to the line closing the body.
pub(crate) fn levelize<'a>(
    ctx: &Context,
    lines: &mut Lines<'a>,
    first: (u32, &'a str),
    tables: &mut SymbolTables,
    section: Section,
) -> Result<(), ParseError> {
    let body = tables.body_mut(section);
    let mut current = Some(first);

    while let Some((line_no, line)) = current {
        if closes_body(line) {
            return Ok(());
        }
        levelize_statement(ctx, lines, line_no, line, body)?;
        current = lines.next_line();
    }

    Err(ctx.error(
        lines.last_line(),
        ParseErrorKind::UnexpectedEof {
            section: section.to_string(),
        },
        "",
    ))
}

fn levelize_statement(
    ctx: &Context,
    lines: &mut Lines<'_>,
    line_no: u32,
    line: &str,
    body: &mut Body,
) -> Result<(), ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(());
    }

    if let Some(comment) = trimmed.strip_prefix('#') {
        body.statements.push(Statement {
            line: line_no,
            level: Level::Constant,
            text: format!("/* {} */", comment.trim_start()),
        });
        return Ok(());
    }

    let mut tokens = tokenize_significant(line);
    let is_assignment = tokens.len() > 2
        && body.decls.contains(&tokens[0].text)
        && ASSIGNMENT_OPS.contains(&tokens[1].text.as_str());

    if !is_assignment {
        let level = operand_level(ctx, body, &tokens, line_no, line)?;
        body.statements.push(Statement {
            line: line_no,
            level,
            text: trimmed.to_owned(),
        });
        return Ok(());
    }

    // an assignment continues until its terminator
    let mut text = line.to_owned();
    while !tokens.last().is_some_and(Token::is_terminator) {
        let Some((_, next)) = lines.next_line() else {
            return Err(ctx.error(
                lines.last_line(),
                ParseErrorKind::UnexpectedEof {
                    section: body.section.to_string(),
                },
                &text,
            ));
        };
        tokens.extend(tokenize_significant(next));
        text = format!("{} {}", text.trim_end(), next);
    }

    let target = tokens[0].text.clone();
    if let Some(decl) = body.decls.get(&target) {
        if decl.is_builtin() && decl.is_const() {
            return Err(ctx.error(
                line_no,
                ParseErrorKind::ConstAssignment { name: target },
                &text,
            ));
        }
    }

    let level = operand_level(ctx, body, &tokens[2..], line_no, &text)?;
    body.used.record(&target);
    if let Some(decl) = body.decls.get_mut(&target) {
        if decl.raise_level(level) {
            log::trace!("'{}' raised to level {} at line {}", target, level, line_no);
        }
    }

    body.statements.push(Statement {
        line: line_no,
        level,
        text: text.trim().to_owned(),
    });
    Ok(())
}

/// Highest level among the known quantities in `tokens`, recording each of
/// them as used. Unknown identifiers do not contribute.
fn operand_level(
    ctx: &Context,
    body: &mut Body,
    tokens: &[Token],
    line_no: u32,
    text: &str,
) -> Result<Level, ParseError> {
    let mut level = Level::Constant;
    for tok in tokens {
        let Some(decl) = body.decls.get(&tok.text) else {
            continue;
        };
        if decl.level.is_write_only() {
            return Err(ctx.error(
                line_no,
                ParseErrorKind::AccumulatorRead {
                    name: tok.text.clone(),
                },
                text,
            ));
        }
        level = level.max(decl.level);
        body.used.record(&tok.text);
    }
    Ok(level)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
