//! Definition text parser.
//!
//! Parsing is split in two steps so that the domain never touches storage:
//!
//! 1. [`prepare`] turns raw file text into [`Sections`]
//! 2. [`assemble`] turns sections plus already-collected columns into a
//!    [`TableDefinition`]
//!
//! Collecting the columns sits in between and lives in the application
//! layer, because column inheritance has to read other definitions.

pub mod columns;
pub mod entries;
pub mod sections;
pub mod text;

use std::fmt;

use serde::Serialize;

use crate::domain::{
    entities::{Column, TableDefinition, table::upsert},
    error::DomainError,
    value_objects::TableType,
};

pub use columns::{ColumnEntry, Inheritance, InheritanceError, PRIMARY_TAG};
pub use sections::{Section, Sections};

pub const BASE_TAG: &str = "[*BASE*]";

/// A malformed entry that was skipped while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    pub table: String,
    pub section: Section,
    pub entry: String,
    pub reason: String,
}

impl ParseWarning {
    pub fn new(
        table: impl Into<String>,
        section: Section,
        entry: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            table: table.into(),
            section,
            entry: entry.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] skipped '{}': {}",
            self.table, self.section, self.entry, self.reason
        )
    }
}

/// Pre-process raw definition text and split it into sections.
///
/// Comments are removed before the base-tag check so a commented out
/// `[*BASE*]` has no effect.
pub fn prepare(raw: &str, table_type: TableType, name: &str) -> Result<Sections, DomainError> {
    let mut text = text::strip_comments(raw);
    if text.contains(BASE_TAG) {
        if table_type != TableType::Base {
            return Err(DomainError::BaseTable {
                table: name.to_string(),
            });
        }
        text = text.replace(BASE_TAG, "");
    }
    Ok(Sections::split(&text::remove_whitespace(&text)))
}

/// Table name declared by `NAME:`, or the requested name.
pub fn table_name<'a>(sections: &'a Sections, requested: &'a str) -> &'a str {
    sections.non_empty(Section::Name).unwrap_or(requested)
}

/// Columns gathered from a `COLUMNS:` body (inherited ones included).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSet {
    pub columns: Vec<Column>,
    pub primaries: Vec<Column>,
}

impl ColumnSet {
    pub fn push(&mut self, entry: ColumnEntry) {
        match entry {
            ColumnEntry::Empty => {}
            ColumnEntry::Regular(column) => upsert(&mut self.columns, column),
            ColumnEntry::Primary(column) => upsert(&mut self.primaries, column),
        }
    }

    /// Merge an inherited set; only its regular columns are taken.
    pub fn inherit(&mut self, parent: ColumnSet) {
        for column in parent.columns {
            self.push(ColumnEntry::Regular(column));
        }
    }
}

/// Build the definition from its sections and collected columns.
pub fn assemble(
    name: &str,
    table_type: TableType,
    sections: &Sections,
    columns: ColumnSet,
    warnings: &mut Vec<ParseWarning>,
) -> Result<TableDefinition, DomainError> {
    let mut builder = TableDefinition::builder(name)
        .table_type(table_type)
        .timestamps(entries::has_timestamps(sections.get(Section::HasTimestamps)))
        .record_count(entries::record_count(
            name,
            sections.get(Section::Records).unwrap_or_default(),
            warnings,
        ))
        .columns(columns.columns);

    if let Some(model) = sections.non_empty(Section::Model) {
        builder = builder.model_name(model);
    }
    for token in entries::excludes(sections.get(Section::Exclude).unwrap_or_default()) {
        builder = builder.exclude(token);
    }
    for primary in columns.primaries {
        builder = builder.primary(primary);
    }
    for key in entries::foreign_keys(name, sections.get(Section::ForeignKeys).unwrap_or_default(), warnings) {
        builder = builder.foreign_key(key);
    }
    for relation in entries::relations(name, sections.get(Section::Relations).unwrap_or_default(), warnings) {
        builder = builder.relation(relation);
    }
    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_tag_rejected_for_non_base_requests() {
        let raw = "[*BASE*] COLUMNS: id, id, false, null, id;";
        assert_eq!(
            prepare(raw, TableType::Table, "audit"),
            Err(DomainError::BaseTable {
                table: "audit".into()
            })
        );
        let sections = prepare(raw, TableType::Base, "audit").unwrap();
        assert_eq!(sections.get(Section::Columns), Some("id,id,false,null,id;"));
    }

    #[test]
    fn commented_base_tag_is_ignored() {
        let sections = prepare("/* [*BASE*] */ NAME: x COLUMNS: a", TableType::Table, "x").unwrap();
        assert_eq!(sections.get(Section::Name), Some("x"));
    }

    #[test]
    fn name_falls_back_to_requested() {
        let sections = Sections::split("COLUMNS:a");
        assert_eq!(table_name(&sections, "users"), "users");
        let sections = Sections::split("NAME:membersCOLUMNS:a");
        assert_eq!(table_name(&sections, "users"), "members");
    }

    #[test]
    fn inherit_skips_parent_primaries() {
        let mut parent = ColumnSet::default();
        parent.push(ColumnEntry::Primary(Column::new("key", "id")));
        parent.push(ColumnEntry::Regular(Column::new("created_by", "string")));

        let mut child = ColumnSet::default();
        child.inherit(parent);
        assert!(child.primaries.is_empty());
        assert_eq!(child.columns.len(), 1);
    }

    #[test]
    fn assemble_collects_sections() {
        let sections = Sections::split(
            "RECORDS:5HAS_TIMESTAMPS:falseEXCLUDE:fFOREIGN_KEYS:('user_id','id','users')COLUMNS:",
        );
        let mut columns = ColumnSet::default();
        columns.push(ColumnEntry::Regular(Column::new("id", "id")));
        let mut warnings = Vec::new();

        let table = assemble("posts", TableType::Table, &sections, columns, &mut warnings).unwrap();

        assert_eq!(table.record_count, 5);
        assert!(!table.has_timestamps);
        assert_eq!(table.excludes, vec!["f"]);
        assert_eq!(table.dependencies().collect::<Vec<_>>(), vec!["users"]);
        assert_eq!(table.model_name, "Post");
        assert!(warnings.is_empty());
    }
}
