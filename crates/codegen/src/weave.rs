//! Template weaving.
//!
//! The template's first comment is replaced by a generated header. After
//! that every line is copied token by token, except that marker comments
//! are expanded in place. The marker comment itself stays in the output.

use crate::emit::{contrib_map, macro_map, render_declarations, render_statements};
use crate::error::CodegenError;
use crate::header::render_header;
use crate::marker::{match_marker, Marker};
use metricc_core::source::{FileSystemProvider, SourceProvider};
use metricc_core::{compile_with_provider, tokenize, CompileOptions, CompiledMetric, Level};
use std::path::Path;
use time::OffsetDateTime;

/// Everything the generated header names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaveConfig {
    pub metric_path: String,
    pub template_path: String,
    /// Program name recorded as the generator.
    pub tool: String,
    pub generated_at: OffsetDateTime,
}

impl WeaveConfig {
    /// Config stamped with the current time.
    pub fn now(metric_path: &Path, template_path: &Path, tool: &str) -> Self {
        WeaveConfig {
            metric_path: metric_path.display().to_string(),
            template_path: template_path.display().to_string(),
            tool: tool.to_owned(),
            generated_at: OffsetDateTime::now_utc(),
        }
    }
}

fn leading_width(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn expand(metric: &CompiledMetric, marker: Marker, dent: usize, out: &mut String) {
    out.push_str(&marker.to_string());
    if marker.is_inline() {
        out.push(' ');
        if marker == Marker::Name {
            out.push_str(&metric.name);
        } else {
            out.push_str(&metric.post.statements.len().to_string());
        }
        return;
    }
    out.push('\n');

    let (decode, post) = (&metric.decode, &metric.post);
    match marker {
        Marker::Pre => {
            for setup in &metric.prerequisites {
                out.push_str(&crate::emit::indent(setup, dent));
                out.push('\n');
            }
        }
        Marker::Post => {
            let map = macro_map(post);
            render_declarations(post, dent, &map, out);
            render_statements(post, Level::Constant, dent, &map, out);
        }
        Marker::PostPerDoc => {
            render_statements(post, Level::PerDocument, dent, &macro_map(post), out);
        }
        Marker::Decl => {
            render_declarations(decode, dent, &macro_map(decode), out);
        }
        Marker::PerCall => {
            render_statements(decode, Level::Constant, dent, &macro_map(decode), out);
        }
        Marker::PerDoc | Marker::Contrib => {
            let map = if marker == Marker::Contrib {
                contrib_map(decode)
            } else {
                macro_map(decode)
            };
            render_statements(decode, Level::PerDocument, dent, &map, out);
            render_statements(decode, Level::PerTerm, dent, &map, out);
        }
        Marker::Name | Marker::DependsPost => {}
    }
}

/// Weave `metric` into `template`, returning the complete C source.
pub fn weave(
    metric: &CompiledMetric,
    template: &str,
    config: &WeaveConfig,
) -> Result<String, CodegenError> {
    let mut lines = template.split_inclusive('\n');
    let mut header_line = 0;
    let found = lines.by_ref().any(|line| {
        header_line += 1;
        line.contains("*/")
    });
    if !found {
        return Err(CodegenError::InvalidTemplate(format!(
            "{}: no header comment closed by '*/'",
            config.template_path
        )));
    }

    let mut out = render_header(metric, config)?;
    for (n, line) in lines.enumerate() {
        let tokens = tokenize(line);
        let dent = leading_width(line);
        let mut i = 0;
        while i < tokens.len() {
            match match_marker(&tokens[i..]) {
                Some((marker, span)) => {
                    log::debug!(
                        "{}:{}: expanding {}",
                        config.template_path,
                        header_line + n + 1,
                        marker.ident()
                    );
                    expand(metric, marker, dent, &mut out);
                    i += span;
                }
                None => {
                    out.push_str(&tokens[i].text);
                    i += 1;
                }
            }
        }
    }
    Ok(out)
}

/// Compile the description and weave it into the template, reading both
/// through `provider`.
pub fn generate_with_provider(
    metric_path: &Path,
    template_path: &Path,
    provider: &dyn SourceProvider,
    options: CompileOptions,
    config: &WeaveConfig,
) -> Result<String, CodegenError> {
    let metric = compile_with_provider(metric_path, provider, options)?;
    let template = provider
        .read_source(template_path)
        .map_err(|source| CodegenError::Io {
            path: template_path.to_path_buf(),
            source,
        })?;
    weave(&metric, &template, config)
}

/// [`generate_with_provider`] over the filesystem.
pub fn generate(
    metric_path: &Path,
    template_path: &Path,
    options: CompileOptions,
    config: &WeaveConfig,
) -> Result<String, CodegenError> {
    generate_with_provider(metric_path, template_path, &FileSystemProvider, options, config)
}
