//! Symbol tables: the parameter namespace, one namespace per function body,
//! and the used-sets that record which quantities a body references.

use crate::ast::{Declaration, Level, Section, Statement};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// Name to declaration map. Iteration is ordered by name so repeated runs
/// emit identical output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Namespace {
    decls: BTreeMap<String, Declaration>,
}

impl Namespace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Declaration> {
        self.decls.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Declaration> {
        self.decls.get_mut(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decls.contains_key(name)
    }

    /// Insert a declaration, replacing nothing: callers check for
    /// collisions first.
    pub(crate) fn insert(&mut self, decl: Declaration) {
        self.decls.insert(decl.name.clone(), decl);
    }

    pub fn level_of(&self, name: &str) -> Option<Level> {
        self.decls.get(name).map(|d| d.level)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.decls.values()
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }
}

/// Names referenced within one scope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UsedSet {
    names: BTreeSet<String>,
}

impl UsedSet {
    pub fn record(&mut self, name: &str) {
        if !self.names.contains(name) {
            self.names.insert(name.to_owned());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// One function body: its namespace, its used-set and its levelled
/// statements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Body {
    pub section: Section,
    pub decls: Namespace,
    pub used: UsedSet,
    pub statements: Vec<Statement>,
}

impl Body {
    pub fn new(section: Section) -> Self {
        Body {
            section,
            decls: Namespace::new(),
            used: UsedSet::default(),
            statements: Vec::new(),
        }
    }

    /// Declarations this body references, in source order; built-ins first.
    pub fn used_declarations(&self) -> Vec<&Declaration> {
        let mut decls: Vec<&Declaration> =
            self.used.iter().filter_map(|n| self.decls.get(n)).collect();
        decls.sort_by_key(|d| d.line);
        decls
    }

    pub fn statements_at(&self, level: Level) -> impl Iterator<Item = &Statement> {
        self.statements.iter().filter(move |s| s.level == level)
    }
}

/// A namespace a declaration can be inserted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Params,
    Body(Section),
}

/// Every namespace of one compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolTables {
    pub params: Namespace,
    pub decode: Body,
    pub post: Body,
}

impl Default for SymbolTables {
    fn default() -> Self {
        SymbolTables {
            params: Namespace::new(),
            decode: Body::new(Section::Decode),
            post: Body::new(Section::Post),
        }
    }
}

impl SymbolTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(&self, section: Section) -> &Body {
        match section {
            Section::Decode => &self.decode,
            Section::Post => &self.post,
        }
    }

    pub fn body_mut(&mut self, section: Section) -> &mut Body {
        match section {
            Section::Decode => &mut self.decode,
            Section::Post => &mut self.post,
        }
    }

    pub fn namespace(&self, scope: Scope) -> &Namespace {
        match scope {
            Scope::Params => &self.params,
            Scope::Body(section) => &self.body(section).decls,
        }
    }

    pub fn namespace_mut(&mut self, scope: Scope) -> &mut Namespace {
        match scope {
            Scope::Params => &mut self.params,
            Scope::Body(section) => &mut self.body_mut(section).decls,
        }
    }

    /// The used-set paired with `scope`; parameters have none.
    pub fn used_mut(&mut self, scope: Scope) -> Option<&mut UsedSet> {
        match scope {
            Scope::Params => None,
            Scope::Body(section) => Some(&mut self.body_mut(section).used),
        }
    }
}
