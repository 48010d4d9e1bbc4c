//! Rendering of declarations and statement lists into C text.
//!
//! Every name with a substitution is replaced token by token, so the same
//! statement can render against different maps (plain macros for the
//! per-document paths, contribution fallbacks for the contribution path).

use metricc_core::ast::Declaration;
use metricc_core::lexer::tokenize;
use metricc_core::{Body, Level};
use std::collections::BTreeMap;

/// Name to parenthesized replacement text.
pub type Substitutions = BTreeMap<String, String>;

fn substitution_map<F>(body: &Body, pick: F) -> Substitutions
where
    F: Fn(&Declaration) -> Option<&str>,
{
    body.decls
        .iter()
        .filter_map(|d| pick(d).map(|text| (d.name.clone(), format!("({})", text))))
        .collect()
}

/// Names with macro text.
pub fn macro_map(body: &Body) -> Substitutions {
    substitution_map(body, |d| d.macro_text.as_deref())
}

/// Like [`macro_map`], but a contribution fallback wins over the macro.
pub fn contrib_map(body: &Body) -> Substitutions {
    substitution_map(body, |d| d.contrib.as_deref().or(d.macro_text.as_deref()))
}

pub fn substitute(text: &str, map: &Substitutions) -> String {
    tokenize(text)
        .into_iter()
        .map(|t| match map.get(&t.text) {
            Some(replacement) => replacement.clone(),
            None => t.text,
        })
        .collect()
}

pub fn indent(text: &str, dent: usize) -> String {
    let pad = " ".repeat(dent);
    text.split('\n')
        .map(|line| format!("{}{}", pad, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Remove the whitespace prefix shared by every non-blank line.
pub fn dedent(text: &str) -> String {
    let common = text
        .split('\n')
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);
    text.split('\n')
        .map(|l| if l.trim().is_empty() { l } else { &l[common..] })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Whether a used declaration needs a line of its own. Quantities with
/// macro text are never declared; built-ins only when they have something
/// to initialise.
fn is_rendered(d: &Declaration) -> bool {
    d.macro_text.is_none()
        && (!d.is_builtin() || d.initializer.is_some() || d.fallback_init.is_some())
}

pub fn render_declaration(d: &Declaration, dent: usize, map: &Substitutions) -> String {
    let mut line = " ".repeat(dent);
    line.push_str(&d.ty);
    if !d.ty.ends_with('*') {
        line.push(' ');
    }
    line.push_str(&d.name);
    if let Some(init) = &d.initializer {
        line.push(' ');
        line.push_str(&substitute(init, map));
    }
    line.push(';');
    line
}

/// Used declarations of `body` in line order, then their fallback init
/// blocks.
pub fn render_declarations(body: &Body, dent: usize, map: &Substitutions, out: &mut String) {
    let used = body.used_declarations();
    for d in used.iter().copied().filter(|d| is_rendered(d)) {
        out.push_str(&render_declaration(d, dent, map));
        out.push('\n');
    }
    for init in used.iter().filter_map(|d| d.fallback_init.as_deref()) {
        out.push_str(&indent(&dedent(init), dent));
        out.push('\n');
    }
}

/// Statements of `body` at `level`, re-indented from `dent`: a line
/// closing a block dedents before it is printed, a line opening one
/// indents after.
pub fn render_statements(
    body: &Body,
    level: Level,
    dent: usize,
    map: &Substitutions,
    out: &mut String,
) {
    let mut dent = dent;
    for s in body.statements_at(level) {
        if s.closes_block() {
            dent = dent.saturating_sub(4);
        }
        out.push_str(&" ".repeat(dent));
        out.push_str(&substitute(&s.text, map));
        out.push('\n');
        if s.opens_block() {
            dent += 4;
        }
    }
}
