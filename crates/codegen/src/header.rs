//! The comment block that replaces the template's own header.

use crate::error::CodegenError;
use crate::weave::WeaveConfig;
use metricc_core::CompiledMetric;
use time::macros::format_description;
use time::UtcOffset;

/// `Thu, 29 Jun 2006 04:12:41 GMT`
pub fn format_timestamp(config: &WeaveConfig) -> Result<String, CodegenError> {
    let format = format_description!(
        "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second]"
    );
    let stamp = config.generated_at.to_offset(UtcOffset::UTC).format(&format)?;
    Ok(format!("{} GMT", stamp))
}

pub fn render_header(metric: &CompiledMetric, config: &WeaveConfig) -> Result<String, CodegenError> {
    let stamp = format_timestamp(config)?;
    let name = &metric.name;
    let (metric_path, template_path) = (&config.metric_path, &config.template_path);

    let mut out = format!(
        "/* {lower}.c implements the {name} metric for the query\n \
         * subsystem.  This file was automatically generated from\n \
         * {metric_path} and {template_path}\n \
         * by {tool} on {stamp}.\n \
         *\n \
         * DO NOT MODIFY THIS FILE, as changes will be lost upon\n \
         * subsequent regeneration.\n \
         * Go modify {metric_path} or {template_path} instead.\n \
         *\n \
         * Comments from {name}.metric:\n \
         *\n",
        lower = name.to_lowercase(),
        tool = config.tool,
    );

    for comment in &metric.comments {
        out.push_str(format!(" * {}", comment).trim_end());
        out.push('\n');
    }
    if !metric.comments.is_empty() {
        out.push_str(" *\n");
    }
    out.push_str(" */\n\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use metricc_core::{compile_source, CompileOptions};
    use time::macros::datetime;

    fn config() -> WeaveConfig {
        WeaveConfig {
            metric_path: "src/Okapi.metric".into(),
            template_path: "src/metric.c".into(),
            tool: "metricc".into(),
            generated_at: datetime!(2006-06-29 04:12:41 UTC),
        }
    }

    #[test]
    fn timestamp_is_rfc1123_style_gmt() {
        assert_eq!(format_timestamp(&config()).unwrap(), "Thu, 29 Jun 2006 04:12:41 GMT");
    }

    #[test]
    fn non_utc_times_are_converted() {
        let mut c = config();
        c.generated_at = datetime!(2006-06-29 14:12:41 +10);
        assert_eq!(format_timestamp(&c).unwrap(), "Thu, 29 Jun 2006 04:12:41 GMT");
    }

    #[test]
    fn header_lists_sources_and_comments() {
        let src = "# Okapi BM25\n#\n# after Robertson\n";
        let m = compile_source("src/Okapi.metric", "Okapi", src, CompileOptions::default()).unwrap();
        let header = render_header(&m, &config()).unwrap();
        assert!(header.starts_with("/* okapi.c implements the Okapi metric"));
        assert!(header.contains(" * src/Okapi.metric and src/metric.c\n"));
        assert!(header.contains(" * by metricc on Thu, 29 Jun 2006 04:12:41 GMT.\n"));
        assert!(header.contains(" * Okapi BM25\n *\n * after Robertson\n *\n */\n\n"));
    }

    #[test]
    fn header_without_comments_closes_directly() {
        let m = compile_source("x.metric", "x", "", CompileOptions::default()).unwrap();
        let header = render_header(&m, &config()).unwrap();
        assert!(header.ends_with(" * Comments from x.metric:\n *\n */\n\n"));
    }
}
