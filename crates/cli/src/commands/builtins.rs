use std::process;

use metricc_core::{builtin_docs, ParseError, Section};

use crate::{report_json_error, OutputFormat, EXIT_FAILURE};

/// Built-ins grouped by the body that can read them.
pub(crate) fn builtin_sections() -> Result<Vec<(Section, Vec<(String, String)>)>, ParseError> {
    [Section::Decode, Section::Post]
        .into_iter()
        .map(|section| Ok((section, builtin_docs(section)?)))
        .collect()
}

pub(crate) fn cmd_builtins(output: OutputFormat, quiet: bool) {
    let sections = match builtin_sections() {
        Ok(sections) => sections,
        Err(e) => {
            report_json_error(&e.to_json_value(), &e.to_string(), output, quiet);
            process::exit(EXIT_FAILURE);
        }
    };

    match output {
        OutputFormat::Json => {
            let value: serde_json::Map<String, serde_json::Value> = sections
                .into_iter()
                .map(|(section, docs)| {
                    let entries = docs
                        .into_iter()
                        .map(|(name, doc)| (name, serde_json::Value::String(doc)))
                        .collect::<serde_json::Map<_, _>>();
                    (section.to_string(), serde_json::Value::Object(entries))
                })
                .collect();
            let pretty = serde_json::to_string_pretty(&value)
                .unwrap_or_else(|e| format!("serialization error: {}", e));
            println!("{}", pretty);
        }
        OutputFormat::Text => {
            for (i, (section, docs)) in sections.iter().enumerate() {
                if i > 0 {
                    println!();
                }
                println!("these quantities are available in {} routines:", section);
                for (name, doc) in docs {
                    println!("    {}: {}", name, doc);
                }
            }
        }
    }
}
