//! Pre-declared quantities available to every metric. Their runtime values
//! come from the search engine the generated code links against.

use crate::ast::{DeclExtras, Level, Section, BUILTIN_LINE};
use crate::declaration::declare;
use crate::error::{Context, ParseError};
use crate::namespace::{Scope, SymbolTables};

/// Which bodies can see a built-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    DecodeOnly,
    Everywhere,
}

impl Availability {
    fn scopes(self) -> &'static [Scope] {
        match self {
            Availability::DecodeOnly => &[Scope::Body(Section::Decode)],
            Availability::Everywhere => {
                &[Scope::Body(Section::Decode), Scope::Body(Section::Post)]
            }
        }
    }
}

/// One entry of the built-in table.
#[derive(Debug, Clone, Copy)]
pub struct Builtin {
    pub decl: &'static str,
    pub level: Level,
    pub availability: Availability,
    pub macro_text: &'static str,
    pub fallback_init: &'static str,
    pub prerequisite: &'static str,
    pub contrib: &'static str,
    pub doc: &'static str,
}

const fn constant(decl: &'static str, macro_text: &'static str, doc: &'static str) -> Builtin {
    Builtin {
        decl,
        level: Level::Constant,
        availability: Availability::Everywhere,
        macro_text,
        fallback_init: "",
        prerequisite: "",
        contrib: "",
        doc,
    }
}

const fn average(decl: &'static str, fallback_init: &'static str, doc: &'static str) -> Builtin {
    Builtin {
        fallback_init,
        ..constant(decl, "", doc)
    }
}

const fn per_document(
    decl: &'static str,
    macro_text: &'static str,
    prerequisite: &'static str,
    contrib: &'static str,
    doc: &'static str,
) -> Builtin {
    Builtin {
        level: Level::PerDocument,
        prerequisite,
        contrib,
        ..constant(decl, macro_text, doc)
    }
}

pub const BUILTINS: &[Builtin] = &[
    Builtin {
        availability: Availability::DecodeOnly,
        ..constant(
            "const unsigned int f_t;",
            "query->term[qterm].f_t",
            "number of documents in collection term occurs in",
        )
    },
    Builtin {
        availability: Availability::DecodeOnly,
        ..constant(
            "const unsigned int F_t;",
            "query->term[qterm].F_t",
            "number of times term occurs in collection",
        )
    },
    Builtin {
        level: Level::PerTerm,
        availability: Availability::DecodeOnly,
        ..constant(
            "const unsigned int f_dt;",
            "",
            "number of times term occurs in current document",
        )
    },
    Builtin {
        level: Level::PerDocument,
        ..constant(
            "float accumulator;",
            "acc->acc.weight",
            "accumulated score of document",
        )
    },
    constant(
        "const unsigned int dterms = iobtree_size(idx->vocab);",
        "",
        "number of distinct terms in the collection",
    ),
    constant(
        "const double terms = ((double) UINT_MAX) * idx->stats.terms_high + idx->stats.terms_low;",
        "",
        "number of terms in the collection",
    ),
    constant(
        "const unsigned int N = docmap_entries(idx->map);",
        "",
        "number of documents in the collection",
    ),
    average(
        "double avg_D_bytes;",
        "if (docmap_avg_bytes(idx->map, &avg_D_bytes) != DOCMAP_OK) {\n    return SEARCH_EINVAL;\n}",
        "average bytes per document in the collection",
    ),
    average(
        "double avg_D_terms;",
        "if (docmap_avg_words(idx->map, &avg_D_terms) != DOCMAP_OK) {\n    return SEARCH_EINVAL;\n}",
        "average terms per document in the collection",
    ),
    average(
        "double avg_D_dterms;",
        "if (docmap_avg_distinct_words(idx->map, &avg_D_dterms) != DOCMAP_OK) {\n    return SEARCH_EINVAL;\n}",
        "average distinct terms per document in the collection",
    ),
    average(
        "double avg_D_weight;",
        "if (docmap_avg_weight(idx->map, &avg_D_weight) != DOCMAP_OK) {\n    return SEARCH_EINVAL;\n}",
        "average cosine weight per document in the collection",
    ),
    constant(
        "const unsigned int Q_terms = search_qterms(query);",
        "",
        "number of terms in the query",
    ),
    constant(
        "const unsigned int Q_dterms;",
        "query->terms",
        "number of distinct terms in the query",
    ),
    constant(
        "const float Q_weight = search_qweight(query);",
        "",
        "cosine weight of query",
    ),
    per_document(
        "const unsigned int D_bytes;",
        "docmap_get_bytes_cached(idx->map, acc->acc.docno)",
        "if (docmap_cache(idx->map, docmap_get_cache(idx->map) | DOCMAP_CACHE_BYTES) != DOCMAP_OK) return SEARCH_EINVAL;",
        "((float) avg_D_bytes)",
        "number of bytes in the current document",
    ),
    per_document(
        "const unsigned int D_terms;",
        "DOCMAP_GET_WORDS(idx->map, acc->acc.docno)",
        "if (docmap_cache(idx->map, docmap_get_cache(idx->map) | DOCMAP_CACHE_WORDS) != DOCMAP_OK) return SEARCH_EINVAL;",
        "((float) avg_D_terms)",
        "number of terms in the current document",
    ),
    per_document(
        "const unsigned int D_dterms;",
        "DOCMAP_GET_DISTINCT_WORDS(idx->map, acc->acc.docno)",
        "if (docmap_cache(idx->map, docmap_get_cache(idx->map) | DOCMAP_CACHE_DISTINCT_WORDS) != DOCMAP_OK) return SEARCH_EINVAL;",
        "((float) avg_D_dterms)",
        "number of distinct terms in the current document",
    ),
    per_document(
        "const float D_weight;",
        "DOCMAP_GET_WEIGHT(idx->map, acc->acc.docno)",
        "if (docmap_cache(idx->map, docmap_get_cache(idx->map) | DOCMAP_CACHE_WEIGHT) != DOCMAP_OK) return SEARCH_EINVAL;",
        "((float) avg_D_weight)",
        "cosine weight of the current document",
    ),
    constant(
        "const unsigned int f_qt;",
        "query->term[qterm].f_qt",
        "number of times the current term occurred in the query",
    ),
];

fn text(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_owned())
}

/// Declare every built-in into the body namespaces of `tables`.
pub fn register_builtins(ctx: &Context, tables: &mut SymbolTables) -> Result<(), ParseError> {
    for b in BUILTINS {
        declare(
            ctx,
            tables,
            b.availability.scopes(),
            b.decl,
            BUILTIN_LINE,
            b.level,
            DeclExtras {
                macro_text: text(b.macro_text),
                fallback_init: text(b.fallback_init),
                prerequisite: text(b.prerequisite),
                contrib: text(b.contrib),
                doc: b.doc.to_owned(),
            },
        )?;
    }
    log::debug!("registered {} built-in quantities", BUILTINS.len());
    Ok(())
}

impl SymbolTables {
    /// Fresh tables with every built-in already declared.
    pub fn with_builtins(ctx: &Context) -> Result<Self, ParseError> {
        let mut tables = SymbolTables::new();
        register_builtins(ctx, &mut tables)?;
        Ok(tables)
    }
}

/// `(name, description)` pairs of the built-ins visible in `section`,
/// sorted by name.
pub fn builtin_docs(section: Section) -> Result<Vec<(String, String)>, ParseError> {
    let tables = SymbolTables::with_builtins(&Context::new("<builtin>"))?;
    Ok(tables
        .body(section)
        .decls
        .iter()
        .map(|d| (d.name.clone(), d.doc.clone()))
        .collect())
}
