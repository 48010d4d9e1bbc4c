//! Integration tests for the metric-to-C pipeline.
//!
//! These tests compile the conformance descriptions and weave them into the
//! shared template, checking the code that lands at each marker.

use metricc_codegen::{generate, weave, CodegenError, WeaveConfig};
use metricc_core::{compile, CompileOptions};
use std::fs;
use std::path::{Path, PathBuf};
use time::macros::datetime;

/// Locate the workspace root by walking up from CARGO_MANIFEST_DIR.
fn workspace_root() -> &'static Path {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/codegen -> workspace root is two levels up
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
}

fn fixture(kind: &str, name: &str) -> PathBuf {
    workspace_root().join("conformance").join(kind).join(name)
}

fn template() -> PathBuf {
    fixture("templates", "metric.c")
}

fn config(metric: &Path) -> WeaveConfig {
    WeaveConfig {
        metric_path: metric.display().to_string(),
        template_path: template().display().to_string(),
        tool: "metricc".to_string(),
        generated_at: datetime!(2006-06-29 04:12:41 UTC),
    }
}

fn generate_fixture(name: &str) -> String {
    let metric = fixture("positive", &format!("{}.metric", name));
    generate(&metric, &template(), CompileOptions::default(), &config(&metric))
        .unwrap_or_else(|e| panic!("generation of '{}' failed: {}", name, e))
}

/// Output after the generated header.
fn woven_body(out: &str) -> &str {
    let end = out.find(" */\n\n").expect("generated header");
    &out[end + " */\n\n".len()..]
}

#[test]
fn test_cosine_matches_reference_lines() {
    let out = generate_fixture("cosine");

    assert!(out.starts_with("/* cosine.c implements the cosine metric for the query\n"));
    assert!(out.contains(" * by metricc on Thu, 29 Jun 2006 04:12:41 GMT.\n"));
    assert!(out.contains(" * Comments from cosine.metric:\n *\n * Cosine of the angle"));
    assert!(out.contains(" * Best suited to queries that are themselves documents.\n *\n */\n\n"));

    assert!(out.contains(
        "    /* METRIC_PRE */\n    if (docmap_cache(idx->map, docmap_get_cache(idx->map) | DOCMAP_CACHE_WEIGHT) \
         != DOCMAP_OK) return SEARCH_EINVAL;\n\n    return SEARCH_OK;\n"
    ));
    assert!(out.contains(
        "    /* METRIC_POST */\n    const float Q_weight = search_qweight(query);\n\n\n    while (acc) {\n"
    ));
    assert!(out.contains(
        "        /* METRIC_POST_PER_DOC */\n        (acc->acc.weight) /= (float) \
         ((DOCMAP_GET_WEIGHT(idx->map, acc->acc.docno)) * Q_weight);\n\n        acc = acc->next;\n"
    ));
    assert!(out.contains(
        "            /* METRIC_PER_DOC */\n            (acc->acc.weight) += (1 + (float) \
         logf((query->term[qterm].f_qt))) * (1 + (float) logf(f_dt));\n\n"
    ));
    assert!(out.contains("    /* METRIC_DECL */\n\n\n    /* METRIC_PER_CALL */\n\n\n"));
    assert!(out.contains(
        "const struct search_metric * /* METRIC_NAME */ cosine () {\n    const static struct search_metric sm\n      \
         = {pre, /* METRIC_DEPENDS_POST */ 1 ? post : NULL, decode, threshold};\n"
    ));
}

#[test]
fn test_bm25_splits_work_across_loops() {
    let out = generate_fixture("bm25");

    let decl = "    /* METRIC_DECL */\n\
                \x20   const unsigned int N = docmap_entries(idx->map);\n\
                \x20   double avg_D_bytes;\n\
                \x20   float idf;\n\
                \x20   float qtw;\n\
                \x20   float K;\n\
                \x20   if (docmap_avg_bytes(idx->map, &avg_D_bytes) != DOCMAP_OK) {\n\
                \x20       return SEARCH_EINVAL;\n\
                \x20   }\n\n";
    assert!(out.contains(decl), "DECL block missing in:\n{}", out);

    let per_call = "    /* METRIC_PER_CALL */\n\
                    \x20   idf = logf((N - (query->term[qterm].f_t) + 0.5) / ((query->term[qterm].f_t) + 0.5));\n\
                    \x20   qtw = (((opt->u.bm25.k3) + 1) * (query->term[qterm].f_qt)) / ((opt->u.bm25.k3) + (query->term[qterm].f_qt));\n\
                    \x20   /* document length normalisation */\n\n";
    assert!(out.contains(per_call), "PER_CALL block missing in:\n{}", out);

    assert!(out.contains(
        "            K = (opt->u.bm25.k1) * ((1 - (opt->u.bm25.b)) + (opt->u.bm25.b) * \
         (docmap_get_bytes_cached(idx->map, acc->acc.docno)) / avg_D_bytes);\n            \
         (acc->acc.weight) += idf * qtw * (((opt->u.bm25.k1) + 1) * f_dt) / (K + f_dt);\n"
    ));
    assert!(out.contains(
        "    /* METRIC_CONTRIB */\n    K = (opt->u.bm25.k1) * ((1 - (opt->u.bm25.b)) + (opt->u.bm25.b) * \
         (((float) avg_D_bytes)) / avg_D_bytes);\n"
    ));
    assert!(out.contains("DOCMAP_CACHE_BYTES"));
    assert!(out.contains("{pre, /* METRIC_DEPENDS_POST */ 0 ? post : NULL"));
}

#[test]
fn test_dirichlet_block_follows_its_body() {
    let out = generate_fixture("dirichlet");
    assert!(out.contains(
        "            /* METRIC_PER_DOC */\n            if (f_dt > 0) {\n                \
         (acc->acc.weight) += (query->term[qterm].f_qt) * logf(1 + f_dt / ((opt->u.dirichlet.mu) * p_c));\n            \
         }\n\n"
    ));
    assert!(out.contains("    p_c = (float) (query->term[qterm].F_t) / terms;\n"));
    assert!(out.contains("    const double terms = ((double) UINT_MAX) * idx->stats.terms_high + idx->stats.terms_low;\n"));
    assert!(out.contains(
        "        norm = Q_terms * logf((opt->u.dirichlet.mu) / ((DOCMAP_GET_WORDS(idx->map, acc->acc.docno)) + (opt->u.dirichlet.mu)));\n"
    ));
    assert!(out.contains("{pre, /* METRIC_DEPENDS_POST */ 2 ? post : NULL"));
}

#[test]
fn test_scaled_parameter_reaches_post() {
    let out = generate_fixture("scaled");
    assert!(out.contains("    /* METRIC_POST */\n    float s;\n"));
    assert!(out.contains("        s = (opt->u.scaled.k1) * (acc->acc.weight);\n"));
}

#[test]
fn test_template_text_outside_markers_is_untouched() {
    let metric = compile(
        &fixture("positive", "cosine.metric"),
        CompileOptions::default(),
    )
    .expect("compile");
    let text = fs::read_to_string(template()).expect("template");
    let out = weave(&metric, &text, &config(Path::new("cosine.metric"))).expect("weave");

    let marker_free = |s: &str| {
        s.lines()
            .filter(|l| !l.contains("METRIC_"))
            .map(str::to_owned)
            .collect::<Vec<_>>()
    };
    let template_lines = marker_free(&text[text.find("*/\n").expect("header") + 3..]);
    let out_lines = marker_free(woven_body(&out));

    // every template line survives, in order
    let mut pos = 0;
    for line in &template_lines {
        let found = out_lines[pos..]
            .iter()
            .position(|l| l == line)
            .unwrap_or_else(|| panic!("template line '{}' lost", line));
        pos += found + 1;
    }
}

#[test]
fn test_negative_fixtures_fail_to_generate() {
    for name in [
        "duplicate_builtin",
        "missing_terminator",
        "unexpected_line",
        "unexpected_eof",
        "const_assign",
    ] {
        let metric = fixture("negative", &format!("{}.metric", name));
        let err = generate(&metric, &template(), CompileOptions::default(), &config(&metric))
            .expect_err(name);
        assert!(
            matches!(err, CodegenError::Compile(_)),
            "{} should be a compile error, got {}",
            name,
            err
        );
    }
}

#[test]
fn test_missing_template_is_io_error() {
    let metric = fixture("positive", "cosine.metric");
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("nope.c");
    let err = generate(&metric, &missing, CompileOptions::default(), &config(&metric))
        .expect_err("missing template");
    assert!(matches!(err, CodegenError::Io { .. }));
    assert!(err.to_string().starts_with("error opening file"));
    assert_eq!(err.to_json_value()["kind"], "io");

    let source = std::error::Error::source(&err).expect("io error kept as source");
    let io = source
        .downcast_ref::<std::io::Error>()
        .expect("source is the io::Error");
    assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
}
