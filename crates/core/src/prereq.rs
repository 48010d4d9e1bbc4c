//! Setup code inference.
//!
//! Quantities like `D_terms` are read from a cache that has to be switched
//! on before the first read. Each used quantity carrying such setup code
//! contributes it once per body that uses it.

use crate::namespace::{Body, SymbolTables};

/// Record the names read by contribution fallbacks of quantities used in
/// their home body, until nothing new is added.
pub fn close_contrib_deps(tables: &mut SymbolTables) {
    for body in [&mut tables.decode, &mut tables.post] {
        loop {
            let pending: Vec<String> = body
                .used_declarations()
                .into_iter()
                .filter(|d| d.contrib_home == Some(body.section))
                .flat_map(|d| d.contrib_deps.iter().cloned())
                .filter(|dep| !body.used.contains(dep))
                .collect();
            if pending.is_empty() {
                break;
            }
            for dep in &pending {
                log::trace!("{} body: '{}' read by a contribution fallback", body.section, dep);
                body.used.record(dep);
            }
        }
    }
}

fn body_prerequisites(body: &Body) -> impl Iterator<Item = &str> {
    body.decls
        .iter()
        .filter(|d| body.used.contains(&d.name))
        .filter_map(|d| d.prerequisite.as_deref())
}

/// Setup blocks for both bodies, post first. A quantity used in both bodies
/// appears twice.
pub fn collect_prerequisites(tables: &SymbolTables) -> Vec<String> {
    body_prerequisites(&tables.post)
        .chain(body_prerequisites(&tables.decode))
        .map(str::to_owned)
        .collect()
}
