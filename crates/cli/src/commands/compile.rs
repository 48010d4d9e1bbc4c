use std::path::Path;
use std::process;

use metricc_codegen::{generate, CodegenError, WeaveConfig};
use metricc_core::{compile, CompileOptions, PropagationStrategy};

use crate::{dump, report_error, report_json_error, OutputFormat, EXIT_FAILURE};

fn fail(err: &CodegenError, output: OutputFormat, quiet: bool) -> ! {
    report_json_error(&err.to_json_value(), &err.to_string(), output, quiet);
    process::exit(EXIT_FAILURE);
}

/// How this program was invoked, for the generated header.
fn tool_name(argv0: Option<String>) -> String {
    argv0
        .filter(|a| !a.is_empty())
        .unwrap_or_else(|| "metricc".to_owned())
}

pub(crate) fn cmd_compile(
    description: &Path,
    template: Option<&Path>,
    debug: bool,
    propagation: PropagationStrategy,
    output: OutputFormat,
    quiet: bool,
) {
    let options = CompileOptions { propagation };

    if debug {
        match compile(description, options) {
            Ok(metric) => match output {
                OutputFormat::Json => {
                    let pretty = serde_json::to_string_pretty(&metric)
                        .unwrap_or_else(|e| format!("serialization error: {}", e));
                    println!("{}", pretty);
                }
                OutputFormat::Text => print!("{}", dump::render_text(&metric)),
            },
            Err(e) => fail(&CodegenError::from(e), output, quiet),
        }
        return;
    }

    let Some(template) = template else {
        report_error("a template is required unless --debug is given", output, quiet);
        process::exit(EXIT_FAILURE);
    };

    let config = WeaveConfig::now(description, template, &tool_name(std::env::args().next()));
    match generate(description, template, options, &config) {
        Ok(code) => {
            log::info!(
                "generated {} bytes from {}",
                code.len(),
                description.display()
            );
            print!("{}", code);
        }
        Err(e) => fail(&e, output, quiet),
    }
}
