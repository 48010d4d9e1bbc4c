//! Records produced while reading a metric description.
//! Declarations and statements keep the raw C text they were written with;
//! nothing here is type checked.

use serde::{Serialize, Serializer};
use std::fmt;

/// Line number carried by built-in quantities, which have no source line.
pub const BUILTIN_LINE: i64 = -1;

/// Dependency tier of a quantity or statement: the narrowest loop scope in
/// which its value can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    /// Collection-wide constant, computed once per call.
    Constant = 1,
    /// Changes per document (outer loop).
    PerDocument = 2,
    /// Changes per term within a document (inner loop).
    PerTerm = 3,
    /// Reserved: per term offset.
    PerOffset = 4,
    /// Reserved: per term attribute.
    PerAttribute = 5,
    /// Write-only running total; never readable as an operand.
    Accumulator = 6,
}

impl Level {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(n: u8) -> Option<Level> {
        match n {
            1 => Some(Level::Constant),
            2 => Some(Level::PerDocument),
            3 => Some(Level::PerTerm),
            4 => Some(Level::PerOffset),
            5 => Some(Level::PerAttribute),
            6 => Some(Level::Accumulator),
            _ => None,
        }
    }

    pub fn is_write_only(self) -> bool {
        self == Level::Accumulator
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.as_u8())
    }
}

/// The function bodies a metric description defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Decode,
    Post,
}

impl Section {
    pub fn as_str(self) -> &'static str {
        match self {
            Section::Decode => "decode",
            Section::Post => "post",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional metadata attached to a declaration. Source declarations leave
/// everything at its default; built-ins and parameters fill in what they
/// need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclExtras {
    /// Native expression substituted (parenthesized) at every use site.
    pub macro_text: Option<String>,
    /// Side-effecting init code for quantities that cannot be initialised
    /// by plain assignment.
    pub fallback_init: Option<String>,
    /// Setup code that must run once before the quantity is first read.
    pub prerequisite: Option<String>,
    /// Collection-average substitute used when no document is at hand.
    pub contrib: Option<String>,
    pub doc: String,
}

/// One declared quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// Everything between the name and the terminating `;`, e.g. `= 1.2`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initializer: Option<String>,
    /// Source line, or [`BUILTIN_LINE`].
    pub line: i64,
    pub level: Level,
    #[serde(rename = "macro", skip_serializing_if = "Option::is_none")]
    pub macro_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_init: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prerequisite: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrib: Option<String>,
    /// Names the contribution fallback reads, resolved in the first
    /// namespace the declaration went into.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub contrib_deps: Vec<String>,
    /// Body whose used-set receives `contrib_deps` once this quantity is
    /// used there.
    #[serde(skip)]
    pub contrib_home: Option<Section>,
    /// Trailing comment stripped from the declaration line.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub doc: String,
}

impl Declaration {
    pub fn is_builtin(&self) -> bool {
        self.line == BUILTIN_LINE
    }

    pub fn is_const(&self) -> bool {
        self.ty.starts_with("const")
    }

    /// Raise the stored level; levels never decrease. Returns whether the
    /// level changed.
    pub fn raise_level(&mut self, level: Level) -> bool {
        if level > self.level {
            self.level = level;
            true
        } else {
            false
        }
    }
}

/// One statement of a function body, tagged with the level it runs at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statement {
    pub line: u32,
    pub level: Level,
    pub text: String,
}

impl Statement {
    /// Opens a block without closing it on the same line.
    pub fn opens_block(&self) -> bool {
        self.text.contains('{') && !self.text.contains('}')
    }

    /// Closes a block without opening one on the same line.
    pub fn closes_block(&self) -> bool {
        self.text.contains('}') && !self.text.contains('{')
    }
}
