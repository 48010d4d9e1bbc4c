//! Compilation driver: description text to a fully levelled
//! [`CompiledMetric`].
//!
//! Steps run in a fixed order: built-ins are declared, the description is
//! read and levelized, both bodies are propagated, contribution fallback
//! dependencies are closed over and setup code is collected.

use crate::ast::Declaration;
use crate::error::{CompileError, Context, ParseError};
use crate::namespace::{Body, Namespace, SymbolTables};
use crate::parser::parse_description;
use crate::prereq::{close_contrib_deps, collect_prerequisites};
use crate::propagate::{propagate, PropagationStrategy};
use crate::source::{FileSystemProvider, SourceProvider};
use serde::Serialize;
use std::path::Path;

/// Knobs for one compilation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompileOptions {
    pub propagation: PropagationStrategy,
}

/// Everything the template weaver needs from a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompiledMetric {
    /// Base name, e.g. `bm25` for `metrics/bm25.metric`.
    pub name: String,
    /// Description path as given.
    pub source: String,
    pub comments: Vec<String>,
    pub params: Namespace,
    pub decode: Body,
    pub post: Body,
    pub prerequisites: Vec<String>,
}

impl CompiledMetric {
    /// Declared parameters in source order.
    pub fn parameters(&self) -> Vec<&Declaration> {
        let mut params: Vec<&Declaration> = self.params.iter().collect();
        params.sort_by_key(|d| d.line);
        params
    }
}

/// Metric name of a description path: the file name up to its first `.`.
pub fn metric_name(path: &Path) -> String {
    match path.file_name() {
        Some(file) => file
            .to_string_lossy()
            .split('.')
            .next()
            .unwrap_or_default()
            .to_owned(),
        None => path.display().to_string(),
    }
}

/// Compile description text already in memory. `file` only labels errors.
pub fn compile_source(
    file: &str,
    name: &str,
    src: &str,
    options: CompileOptions,
) -> Result<CompiledMetric, ParseError> {
    let ctx = Context::new(file);
    let mut tables = SymbolTables::with_builtins(&ctx)?;
    let comments = parse_description(&ctx, name, src, &mut tables)?;

    propagate(&mut tables.decode.statements, options.propagation);
    propagate(&mut tables.post.statements, options.propagation);
    close_contrib_deps(&mut tables);
    let prerequisites = collect_prerequisites(&tables);

    log::info!(
        "compiled metric '{}': {} parameter(s), {} decode and {} post statement(s)",
        name,
        tables.params.len(),
        tables.decode.statements.len(),
        tables.post.statements.len()
    );

    let SymbolTables {
        params,
        decode,
        post,
    } = tables;
    Ok(CompiledMetric {
        name: name.to_owned(),
        source: file.to_owned(),
        comments,
        params,
        decode,
        post,
        prerequisites,
    })
}

/// Compile the description at `path` from the filesystem.
pub fn compile(path: &Path, options: CompileOptions) -> Result<CompiledMetric, CompileError> {
    compile_with_provider(path, &FileSystemProvider, options)
}

pub fn compile_with_provider(
    path: &Path,
    provider: &dyn SourceProvider,
    options: CompileOptions,
) -> Result<CompiledMetric, CompileError> {
    let src = provider.read_source(path).map_err(|source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let file = path.display().to_string();
    Ok(compile_source(&file, &metric_name(path), &src, options)?)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
