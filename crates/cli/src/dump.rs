//! `compile --debug` in text form: labelled sections, one per piece of
//! compiler state.

use metricc_core::{Body, CompiledMetric, Declaration, Namespace};
use std::fmt::Write;

fn declaration(out: &mut String, d: &Declaration) {
    let _ = write!(out, "    {} {}", d.ty, d.name);
    if let Some(init) = &d.initializer {
        let _ = write!(out, " {}", init);
    }
    let _ = write!(out, "  [level {}", d.level);
    if d.is_builtin() {
        out.push_str(", built-in");
    } else {
        let _ = write!(out, ", line {}", d.line);
    }
    if let Some(m) = &d.macro_text {
        let _ = write!(out, ", macro {}", m);
    }
    out.push_str("]\n");
}

fn namespace(out: &mut String, title: &str, ns: &Namespace) {
    let _ = writeln!(out, "{}", title);
    for d in ns.iter() {
        declaration(out, d);
    }
    out.push('\n');
}

fn body(out: &mut String, b: &Body) {
    namespace(out, &format!("{}_decl", b.section), &b.decls);

    let _ = writeln!(out, "{}", b.section);
    for s in &b.statements {
        let _ = writeln!(out, "    {:>4} [{}] {}", s.line, s.level, s.text);
    }
    out.push('\n');

    let _ = writeln!(out, "{}_used", b.section);
    let used: Vec<&str> = b.used.iter().collect();
    let _ = writeln!(out, "    {}", used.join(", "));
    out.push('\n');
}

pub(crate) fn render_text(metric: &CompiledMetric) -> String {
    let mut out = String::new();

    out.push_str("comments\n");
    for c in &metric.comments {
        let _ = writeln!(out, "    {}", c);
    }
    out.push('\n');

    namespace(&mut out, "params", &metric.params);
    body(&mut out, &metric.decode);
    body(&mut out, &metric.post);

    out.push_str("pre\n");
    for p in &metric.prerequisites {
        let _ = writeln!(out, "    {}", p);
    }
    out
}
