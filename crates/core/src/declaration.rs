//! Single-line C declaration parser.
//!
//! A declaration is a run of type qualifiers, a name, an optional
//! initializer and a terminating `;`. The parsed record is inserted into
//! every target namespace at once; identifiers in the initializer are
//! recorded in the targets' used-sets.

use crate::ast::{DeclExtras, Declaration, Level};
use crate::error::{Context, ParseError, ParseErrorKind};
use crate::lexer::{is_type_qualifier, tokenize_significant, TokenClass};
use crate::namespace::{Scope, SymbolTables};

/// Parse `raw` and insert the declaration into every scope in `targets`.
/// Returns the declared name.
pub fn declare(
    ctx: &Context,
    tables: &mut SymbolTables,
    targets: &[Scope],
    raw: &str,
    line: i64,
    level: Level,
    extras: DeclExtras,
) -> Result<String, ParseError> {
    declare_with(ctx, tables, targets, raw, line, level, |_| extras)
}

/// Like [`declare`], but the metadata is computed from the parsed name.
/// Parameters use this to build their macro text.
pub fn declare_with<F>(
    ctx: &Context,
    tables: &mut SymbolTables,
    targets: &[Scope],
    raw: &str,
    line: i64,
    level: Level,
    extras: F,
) -> Result<String, ParseError>
where
    F: FnOnce(&str) -> DeclExtras,
{
    let err_line = u32::try_from(line).unwrap_or(0);
    let (text, comment) = strip_comment(ctx, raw, err_line)?;
    let text = text.trim_end();
    let tokens = tokenize_significant(text);

    let mut rest = &tokens[..];
    let mut ty = String::new();
    while let Some(first) = rest.first() {
        if !is_type_qualifier(&first.text) {
            break;
        }
        let takes_tag = first.is("struct") || first.is("union");
        push_word(&mut ty, &first.text);
        rest = &rest[1..];
        if takes_tag {
            if let Some(tag) = rest.first() {
                push_word(&mut ty, &tag.text);
                rest = &rest[1..];
            }
        }
    }

    let name = match rest.first() {
        Some(tok) if !tok.is_terminator() => tok.text.clone(),
        _ => {
            return Err(ctx.error(err_line, ParseErrorKind::UnparsableDeclaration, raw));
        }
    };

    for &scope in targets {
        if tables.namespace(scope).contains(&name) {
            return Err(ctx.error(
                err_line,
                ParseErrorKind::DuplicateDeclaration { name },
                raw,
            ));
        }
    }

    if !rest.last().is_some_and(|t| t.is_terminator()) {
        return Err(ctx.error(err_line, ParseErrorKind::MissingTerminator, raw));
    }
    let between = &rest[1..rest.len() - 1];

    // Slice the initializer out of the line rather than joining tokens, so
    // its spacing is kept as written.
    let initializer = between.first().and_then(|t| {
        let tail = &text[t.offset..];
        let init = tail[..tail.find(';').unwrap_or(tail.len())].trim();
        (!init.is_empty()).then(|| init.to_owned())
    });

    for tok in between.iter().filter(|t| t.class == TokenClass::Word) {
        let known = targets
            .iter()
            .any(|&scope| tables.namespace(scope).contains(&tok.text));
        if known {
            for &scope in targets {
                if let Some(used) = tables.used_mut(scope) {
                    used.record(&tok.text);
                }
            }
        }
    }

    let extras = extras(&name);
    let decl = Declaration {
        name: name.clone(),
        ty,
        initializer,
        line,
        level,
        macro_text: extras.macro_text.filter(|s| !s.is_empty()),
        fallback_init: extras.fallback_init.filter(|s| !s.is_empty()),
        prerequisite: extras.prerequisite.filter(|s| !s.is_empty()),
        contrib: extras.contrib.filter(|s| !s.is_empty()),
        contrib_deps: Vec::new(),
        contrib_home: None,
        comment,
        doc: extras.doc,
    };

    for &scope in targets {
        tables.namespace_mut(scope).insert(decl.clone());
    }

    // Contribution fallbacks are resolved against the first target only.
    if let (Some(&first), Some(contrib)) = (targets.first(), decl.contrib.as_deref()) {
        let deps: Vec<String> = tokenize_significant(contrib)
            .into_iter()
            .filter(|t| t.class == TokenClass::Word)
            .filter(|t| tables.namespace(first).contains(&t.text))
            .map(|t| t.text)
            .collect();
        let home = match first {
            Scope::Body(section) => Some(section),
            Scope::Params => None,
        };
        for &scope in targets {
            if let Some(d) = tables.namespace_mut(scope).get_mut(&name) {
                d.contrib_deps = deps.clone();
                d.contrib_home = home;
            }
        }
    }

    log::trace!(
        "declared '{}' ({}) at line {} level {} in {} namespace(s)",
        name,
        decl.ty,
        line,
        level,
        targets.len()
    );

    Ok(name)
}

fn push_word(ty: &mut String, word: &str) {
    if !ty.is_empty() {
        ty.push(' ');
    }
    ty.push_str(word);
}

/// Split a trailing `# ...` or `/* ... */` comment off a declaration line.
/// A `#` in the first column is not a comment marker here.
fn strip_comment(ctx: &Context, raw: &str, line: u32) -> Result<(String, String), ParseError> {
    let mut text = raw.to_owned();
    let mut comment = String::new();

    if let Some(pos) = text.find('#').filter(|&p| p > 0) {
        comment = text[pos + 1..].to_owned();
        text.truncate(pos);
    }

    if let Some(pos) = text.find("/*").filter(|&p| p > 0) {
        match text[pos + 2..].find("*/") {
            Some(rel) => {
                let end = pos + 2 + rel;
                comment = text[pos + 2..end].to_owned();
                text = format!("{}{}", &text[..pos], &text[end + 2..]);
            }
            None => {
                return Err(ctx.error(line, ParseErrorKind::UnterminatedComment, raw));
            }
        }
    }

    Ok((text, comment.trim().to_owned()))
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
