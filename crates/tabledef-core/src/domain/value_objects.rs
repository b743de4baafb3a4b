//! Value objects shared across the domain.
//!
//! These are small, immutable types with no identity: the kind of file a
//! definition was read from, the structural kind of a parsed table, the
//! policy applied to foreign-key cycles, and the method/parameter
//! descriptors used for column types, fakers and relations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

// ============================================================================
// TableType
// ============================================================================

/// Which collection a definition file belongs to.
///
/// `Base` definitions live next to ordinary tables but are templates only:
/// they can be spliced into other tables, never instantiated directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableType {
    Table,
    Pivot,
    Base,
}

impl TableType {
    pub const ALL: [TableType; 3] = [Self::Table, Self::Pivot, Self::Base];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Pivot => "pivot",
            Self::Base => "base",
        }
    }

    /// The collection the file is physically stored in.
    ///
    /// Base definitions share storage with ordinary tables.
    pub const fn storage(self) -> TableType {
        match self {
            Self::Base | Self::Table => Self::Table,
            Self::Pivot => Self::Pivot,
        }
    }
}

impl fmt::Display for TableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TableType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "pivot" => Ok(Self::Pivot),
            "base" => Ok(Self::Base),
            _ => Err(DomainError::InvalidTableType(s.to_string())),
        }
    }
}

// ============================================================================
// TableKind
// ============================================================================

/// Structural variant of a parsed table, decided by its primary columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// A regular table with a single (usually auto-increment) key.
    Ordinary,
    /// A join table with exactly two primary columns.
    Pivot,
    /// A polymorphic join table with three or four primary columns.
    MorphPivot,
}

impl TableKind {
    /// Infer the pivot variant from the number of primary columns.
    pub fn for_pivot(primary_count: usize) -> Option<Self> {
        match primary_count {
            2 => Some(Self::Pivot),
            3 | 4 => Some(Self::MorphPivot),
            _ => None,
        }
    }

    pub const fn is_pivot(self) -> bool {
        matches!(self, Self::Pivot | Self::MorphPivot)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ordinary => "ordinary",
            Self::Pivot => "pivot",
            Self::MorphPivot => "morph-pivot",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CyclePolicy
// ============================================================================

/// What the linearizer does when foreign keys form a true cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePolicy {
    /// Fail with [`DomainError::CyclicDependency`].
    #[default]
    Reject,
    /// Drop the edge closing the cycle, log a warning, and keep going.
    Break,
}

impl fmt::Display for CyclePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reject => f.write_str("reject"),
            Self::Break => f.write_str("break"),
        }
    }
}

impl FromStr for CyclePolicy {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "break" => Ok(Self::Break),
            _ => Err(DomainError::InvalidCyclePolicy(s.to_string())),
        }
    }
}

// ============================================================================
// Param / MethodCall
// ============================================================================

/// A single argument of a method descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Param {
    Str(String),
    Bool(bool),
    Null,
    Int(i64),
    Float(f64),
    Array(Vec<Param>),
}

impl Param {
    /// The bare value, without quotes (used for identifiers such as table names).
    pub fn as_plain(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "'{s}'"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write_float(f, *x),
            Self::Array(items) => {
                f.write_str("[")?;
                write_params(f, items)?;
                f.write_str("]")
            }
        }
    }
}

/// Positional notation with at least one fractional digit, so the value
/// re-parses as a float (`1e20` would come back as a string).
fn write_float(f: &mut fmt::Formatter<'_>, x: f64) -> fmt::Result {
    if !x.is_finite() {
        return write!(f, "{x:?}");
    }
    let text = x.to_string();
    if text.contains('.') {
        f.write_str(&text)
    } else {
        write!(f, "{text}.0")
    }
}

fn write_params(f: &mut fmt::Formatter<'_>, params: &[Param]) -> fmt::Result {
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{param}")?;
    }
    Ok(())
}

/// `method(param, param, [nested])`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    pub params: Vec<Param>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, params: Vec<Param>) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }

    /// A call with no arguments.
    pub fn bare(method: impl Into<String>) -> Self {
        Self::new(method, Vec::new())
    }

    /// Render only the parameters starting at `skip`, the way column types
    /// are written (their first parameter is the implicit column name).
    pub fn render_from(&self, skip: usize) -> String {
        let rest = self.params.get(skip..).unwrap_or_default();
        if rest.is_empty() {
            return self.method.clone();
        }
        let rendered: Vec<String> = rest.iter().map(ToString::to_string).collect();
        format!("{}({})", self.method, rendered.join(", "))
    }
}

impl fmt::Display for MethodCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.method)?;
        f.write_str("(")?;
        write_params(f, &self.params)?;
        f.write_str(")")
    }
}
