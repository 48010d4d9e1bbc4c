//! metricc-codegen: weaves compiled metrics into a C template.
//!
//! The template carries `/* METRIC_* */` marker comments; each is expanded
//! with the declarations or statements of the matching level. See
//! [`marker::Marker`] for the full list.

pub mod emit;
pub mod error;
pub mod header;
pub mod marker;
pub mod weave;

pub use error::CodegenError;
pub use marker::Marker;
pub use weave::{generate, generate_with_provider, weave, WeaveConfig};
