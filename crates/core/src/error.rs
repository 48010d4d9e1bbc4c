use serde::Serialize;
use std::path::PathBuf;

/// What went wrong while reading a metric description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseErrorKind {
    #[error("duplicate declaration of '{name}'")]
    DuplicateDeclaration { name: String },
    #[error("declaration without semi-colon ending")]
    MissingTerminator,
    #[error("error parsing declaration")]
    UnparsableDeclaration,
    #[error("multiline comment in declaration")]
    UnterminatedComment,
    #[error("unexpected line")]
    UnexpectedLine,
    #[error("unexpected EOF in {section}")]
    UnexpectedEof { section: String },
    #[error("accumulator '{name}' used as rvalue")]
    AccumulatorRead { name: String },
    #[error("assigning to const quantity '{name}'")]
    ConstAssignment { name: String },
}

/// A fatal error in a metric description, tagged with the file, the best
/// known line number and the offending text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{file}:{line}: {kind}: '{text}'")]
pub struct ParseError {
    pub file: String,
    pub line: u32,
    pub kind: ParseErrorKind,
    pub text: String,
}

impl ParseError {
    pub fn new(file: &str, line: u32, kind: ParseErrorKind, text: &str) -> Self {
        ParseError {
            file: file.to_owned(),
            line,
            kind,
            text: text.trim_end().to_owned(),
        }
    }

    /// Serialize to a flat JSON object; every field is always present.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "file":    self.file,
            "line":    self.line,
            "kind":    self.kind,
            "message": self.kind.to_string(),
            "text":    self.text,
        })
    }
}

/// Errors surfaced by a whole compilation run.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("error opening file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl CompileError {
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            CompileError::Io { path, source } => serde_json::json!({
                "file":    path.display().to_string(),
                "kind":    "io",
                "message": source.to_string(),
            }),
            CompileError::Parse(e) => e.to_json_value(),
        }
    }
}

/// Per-run compilation context threaded through every parsing call, so
/// errors deep in the parser can be tagged with the source file.
#[derive(Debug, Clone)]
pub struct Context {
    pub file: String,
}

impl Context {
    pub fn new(file: impl Into<String>) -> Self {
        Context { file: file.into() }
    }

    pub fn error(&self, line: u32, kind: ParseErrorKind, text: &str) -> ParseError {
        ParseError::new(&self.file, line, kind, text)
    }
}
