//! Template markers: `/* METRIC_<KIND> */` comments naming an insertion
//! point for generated code.

use metricc_core::lexer::{Token, TokenClass};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Name,
    DependsPost,
    Pre,
    Post,
    PostPerDoc,
    Decl,
    PerCall,
    PerDoc,
    Contrib,
}

impl Marker {
    pub const ALL: [Marker; 9] = [
        Marker::Name,
        Marker::DependsPost,
        Marker::Pre,
        Marker::Post,
        Marker::PostPerDoc,
        Marker::Decl,
        Marker::PerCall,
        Marker::PerDoc,
        Marker::Contrib,
    ];

    pub fn ident(self) -> &'static str {
        match self {
            Marker::Name => "METRIC_NAME",
            Marker::DependsPost => "METRIC_DEPENDS_POST",
            Marker::Pre => "METRIC_PRE",
            Marker::Post => "METRIC_POST",
            Marker::PostPerDoc => "METRIC_POST_PER_DOC",
            Marker::Decl => "METRIC_DECL",
            Marker::PerCall => "METRIC_PER_CALL",
            Marker::PerDoc => "METRIC_PER_DOC",
            Marker::Contrib => "METRIC_CONTRIB",
        }
    }

    pub fn from_ident(ident: &str) -> Option<Marker> {
        Marker::ALL.into_iter().find(|m| m.ident() == ident)
    }

    /// Inline markers expand to a value on the same line; the others end
    /// the line and emit whole lines of code.
    pub fn is_inline(self) -> bool {
        matches!(self, Marker::Name | Marker::DependsPost)
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/* {} */", self.ident())
    }
}

fn skip_space(tokens: &[Token], mut i: usize) -> usize {
    while tokens.get(i).is_some_and(|t| t.class == TokenClass::Space) {
        i += 1;
    }
    i
}

/// Match a marker at the start of `tokens`. Returns the marker and how many
/// tokens it spans.
pub fn match_marker(tokens: &[Token]) -> Option<(Marker, usize)> {
    if !tokens.first()?.is("/*") {
        return None;
    }
    let ident = skip_space(tokens, 1);
    let marker = Marker::from_ident(&tokens.get(ident)?.text)?;
    let close = skip_space(tokens, ident + 1);
    if !tokens.get(close)?.is("*/") {
        return None;
    }
    Some((marker, close + 1))
}
