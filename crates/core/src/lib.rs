#![allow(clippy::result_large_err)]
//! metricc-core: front end of the metric description compiler.
//!
//! Reads a `.metric` description (parameters plus `decode()` and `post()`
//! bodies written in a C subset), infers the loop level of every statement
//! and collects the setup code the generated C needs.
//!
//! # Public API
//!
//! - [`compile()`] / [`compile_source()`] -- run the whole front end
//! - [`CompiledMetric`] -- what the template weaver consumes
//! - [`ParseError`], [`CompileError`] -- fatal errors, first one wins
//! - [`Level`], [`Declaration`], [`Statement`] -- the levelled records

pub mod ast;
pub mod builtins;
pub mod compile;
pub mod declaration;
pub mod error;
pub mod lexer;
pub mod namespace;
pub mod parser;
pub mod prereq;
pub mod propagate;
pub mod source;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{Declaration, Level, Section, Statement};
pub use compile::{CompileOptions, CompiledMetric};
pub use error::{CompileError, ParseError, ParseErrorKind};
pub use namespace::{Body, Namespace, SymbolTables};
pub use propagate::PropagationStrategy;
pub use source::{FileSystemProvider, InMemoryProvider, SourceProvider};

// ── Convenience re-exports: entry points ─────────────────────────────

pub use builtins::builtin_docs;
pub use compile::{compile, compile_source, compile_with_provider, metric_name};
pub use lexer::tokenize;
