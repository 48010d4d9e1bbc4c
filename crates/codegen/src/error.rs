use metricc_core::CompileError;
use std::fmt;
use std::path::PathBuf;

/// Error type for template weaving.
#[derive(Debug)]
pub enum CodegenError {
    /// The template has no header comment to replace.
    InvalidTemplate(String),
    /// A description or template file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The description failed to compile.
    Compile(CompileError),
    /// Output text could not be produced.
    EmitError(String),
}

impl fmt::Display for CodegenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodegenError::InvalidTemplate(msg) => write!(f, "invalid template: {}", msg),
            CodegenError::Io { path, source } => {
                write!(f, "error opening file {}: {}", path.display(), source)
            }
            CodegenError::Compile(e) => write!(f, "{}", e),
            CodegenError::EmitError(msg) => write!(f, "emit error: {}", msg),
        }
    }
}

impl std::error::Error for CodegenError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodegenError::Compile(e) => Some(e),
            CodegenError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<CompileError> for CodegenError {
    fn from(e: CompileError) -> Self {
        CodegenError::Compile(e)
    }
}

impl From<time::error::Format> for CodegenError {
    fn from(e: time::error::Format) -> Self {
        CodegenError::EmitError(e.to_string())
    }
}

impl CodegenError {
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            CodegenError::Compile(e) => e.to_json_value(),
            CodegenError::Io { path, source } => serde_json::json!({
                "file":    path.display().to_string(),
                "kind":    "io",
                "message": source.to_string(),
            }),
            CodegenError::InvalidTemplate(msg) => serde_json::json!({
                "kind":    "invalid_template",
                "message": msg,
            }),
            CodegenError::EmitError(msg) => serde_json::json!({
                "kind":    "emit",
                "message": msg,
            }),
        }
    }
}
