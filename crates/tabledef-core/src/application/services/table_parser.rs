//! Request-scoped definition parser.
//!
//! Wraps the pure domain parser with I/O through a [`DefinitionSource`]:
//! reads files, memoizes their sections for the lifetime of one value,
//! splices inherited columns, and logs every skipped entry.

use std::collections::HashMap;

use tracing::{debug, instrument, trace, warn};

use crate::{
    application::ports::DefinitionSource,
    domain::{
        DomainError, ParseWarning, Section, Sections, TableDefinition, TableType,
        parser::{self, ColumnEntry, ColumnSet, Inheritance, InheritanceError, columns},
    },
    error::{TabledefError, TabledefResult},
};

pub struct TableParser<'s> {
    source: &'s dyn DefinitionSource,
    memo: HashMap<(TableType, String), Sections>,
    /// Files currently being parsed, outermost first.
    stack: Vec<String>,
    warnings: Vec<ParseWarning>,
}

impl<'s> TableParser<'s> {
    pub fn new(source: &'s dyn DefinitionSource) -> Self {
        Self {
            source,
            memo: HashMap::new(),
            stack: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Sections of a definition file, read at most once per parser.
    pub fn sections(&mut self, table_type: TableType, name: &str) -> TabledefResult<Sections> {
        let key = (table_type, name.to_string());
        if let Some(sections) = self.memo.get(&key) {
            trace!(table = name, %table_type, "sections served from memo");
            return Ok(sections.clone());
        }

        let raw = self
            .source
            .read(table_type, name)?
            .ok_or_else(|| DomainError::TableNotFound {
                table: name.to_string(),
                table_type: table_type.to_string(),
            })?;
        let sections = parser::prepare(&raw, table_type, name)?;
        if !sections.preamble().is_empty() {
            debug!(
                table = name,
                preamble = sections.preamble(),
                "Ignoring text before the first section marker"
            );
        }

        self.memo.insert(key, sections.clone());
        Ok(sections)
    }

    /// Parse one definition of a known type.
    #[instrument(level = "debug", skip(self))]
    pub fn parse(&mut self, table_type: TableType, name: &str) -> TabledefResult<TableDefinition> {
        let sections = self.sections(table_type, name)?;
        let table_name = parser::table_name(&sections, name).to_string();
        let body = sections
            .get(Section::Columns)
            .ok_or_else(|| DomainError::MissingColumns {
                table: table_name.clone(),
            })?;

        self.stack.push(name.to_string());
        let columns = self.collect_columns(&table_name, body, true);
        self.stack.pop();

        let mut warnings = Vec::new();
        let table = parser::assemble(&table_name, table_type, &sections, columns?, &mut warnings)?;
        for warning in warnings {
            self.warn(warning);
        }
        debug!(
            table = %table.name,
            kind = %table.kind,
            columns = table.columns.len(),
            foreign_keys = table.foreign_keys.len(),
            "Parsed definition"
        );
        Ok(table)
    }

    /// Parse a name as a table, falling back to a pivot.
    ///
    /// When neither exists but the table file is a base table, the base
    /// table error is reported.
    pub fn parse_any(&mut self, name: &str) -> TabledefResult<TableDefinition> {
        let as_table = match self.parse(TableType::Table, name) {
            Ok(table) => return Ok(table),
            Err(e) => e,
        };
        match &as_table {
            TabledefError::Domain(DomainError::TableNotFound { .. })
            | TabledefError::Domain(DomainError::BaseTable { .. }) => {}
            _ => return Err(as_table),
        }

        match self.parse(TableType::Pivot, name) {
            Ok(pivot) => Ok(pivot),
            Err(TabledefError::Domain(DomainError::TableNotFound { .. })) => match as_table {
                TabledefError::Domain(DomainError::BaseTable { .. }) => Err(as_table),
                _ => Err(DomainError::TableNotFound {
                    table: name.to_string(),
                    table_type: "table or pivot".to_string(),
                }
                .into()),
            },
            Err(e) => Err(e),
        }
    }

    pub fn warnings(&self) -> &[ParseWarning] {
        &self.warnings
    }

    pub fn into_warnings(self) -> Vec<ParseWarning> {
        self.warnings
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn collect_columns(
        &mut self,
        owner: &str,
        body: &str,
        include_primaries: bool,
    ) -> TabledefResult<ColumnSet> {
        let mut set = ColumnSet::default();
        for segment in body.split(';') {
            let rest = match columns::split_inheritance(segment) {
                Ok((Some(inheritance), rest)) => {
                    set.inherit(self.inherited_columns(&inheritance)?);
                    rest
                }
                Ok((None, rest)) => rest,
                Err(InheritanceError::Malformed(reason)) => {
                    self.warn(ParseWarning::new(owner, Section::Columns, segment, reason));
                    continue;
                }
                Err(InheritanceError::Domain(e)) => return Err(e.into()),
            };

            match columns::parse_entry(rest) {
                Ok(ColumnEntry::Primary(column)) if !include_primaries => {
                    trace!(table = owner, column = %column.name, "Inherited primary column dropped");
                }
                Ok(entry) => set.push(entry),
                Err(reason) => self.warn(ParseWarning::new(owner, Section::Columns, rest, reason)),
            }
        }
        Ok(set)
    }

    fn inherited_columns(&mut self, inheritance: &Inheritance) -> TabledefResult<ColumnSet> {
        if self.stack.contains(&inheritance.table) {
            let mut chain = self.stack.clone();
            chain.push(inheritance.table.clone());
            return Err(DomainError::CyclicInheritance { chain }.into());
        }

        let sections = self.sections(inheritance.table_type, &inheritance.table)?;
        let body = sections
            .get(Section::Columns)
            .ok_or_else(|| DomainError::MissingColumns {
                table: inheritance.table.clone(),
            })?;

        debug!(
            parent = %inheritance.table,
            parent_type = %inheritance.table_type,
            "Splicing inherited columns"
        );
        self.stack.push(inheritance.table.clone());
        let result = self.collect_columns(&inheritance.table, body, false);
        self.stack.pop();
        result
    }

    fn warn(&mut self, warning: ParseWarning) {
        warn!(
            table = %warning.table,
            section = %warning.section,
            entry = %warning.entry,
            "Skipping malformed entry: {}",
            warning.reason
        );
        self.warnings.push(warning);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockDefinitionSource;
    use crate::domain::TableKind;

    fn source(files: &'static [(TableType, &'static str, &'static str)]) -> MockDefinitionSource {
        let mut mock = MockDefinitionSource::new();
        mock.expect_read().returning(move |table_type, name| {
            Ok(files
                .iter()
                .find(|(t, n, _)| *t == table_type.storage() && *n == name)
                .map(|(_, _, text)| text.to_string()))
        });
        mock
    }

    #[test]
    fn sections_are_read_once() {
        let mut mock = MockDefinitionSource::new();
        mock.expect_read()
            .times(1)
            .returning(|_, _| Ok(Some("COLUMNS: id, null, false, null, id;".into())));

        let mut parser = TableParser::new(&mock);
        parser.parse(TableType::Table, "users").unwrap();
        parser.parse(TableType::Table, "users").unwrap();
    }

    #[test]
    fn missing_definition_is_not_found() {
        let mock = source(&[]);
        let mut parser = TableParser::new(&mock);
        let err = parser.parse(TableType::Table, "ghost").unwrap_err();
        assert!(matches!(
            err,
            TabledefError::Domain(DomainError::TableNotFound { .. })
        ));
    }

    #[test]
    fn missing_columns_section_is_an_error() {
        let mock = source(&[(TableType::Table, "t", "NAME: t RECORDS: 3")]);
        let mut parser = TableParser::new(&mock);
        assert!(matches!(
            parser.parse(TableType::Table, "t"),
            Err(TabledefError::Domain(DomainError::MissingColumns { .. }))
        ));
    }

    #[test]
    fn inherited_columns_come_first_and_skip_primaries() {
        let mock = source(&[
            (
                TableType::Table,
                "audit",
                "[*BASE*] COLUMNS: [*PRIMARY*]key, null, id; created_by, null, false, null, string;",
            ),
            (
                TableType::Table,
                "posts",
                "COLUMNS: id, null, false, null, id; [*audit,base*]title, title, true, null, string;",
            ),
        ]);
        let mut parser = TableParser::new(&mock);
        let table = parser.parse(TableType::Table, "posts").unwrap();

        let names: Vec<&str> = table.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "created_by", "title"]);
        assert!(table.primary_columns.is_empty());
    }

    #[test]
    fn child_overrides_inherited_column_in_place() {
        let mock = source(&[
            (
                TableType::Table,
                "stamps",
                "[*BASE*] COLUMNS: a, null, false, null, string; b, null, false, null, string;",
            ),
            (
                TableType::Table,
                "t",
                "COLUMNS: [*stamps,base*]; a, null, false, null, text;",
            ),
        ]);
        let mut parser = TableParser::new(&mock);
        let table = parser.parse(TableType::Table, "t").unwrap();
        assert_eq!(table.columns[0].name, "a");
        assert_eq!(table.columns[0].type_method(), "text");
        assert_eq!(table.columns[1].name, "b");
    }

    #[test]
    fn inheritance_cycle_is_detected() {
        let mock = source(&[
            (TableType::Table, "a", "[*BASE*] COLUMNS: [*b,base*];"),
            (TableType::Table, "b", "[*BASE*] COLUMNS: [*a,base*];"),
        ]);
        let mut parser = TableParser::new(&mock);
        let err = parser.parse(TableType::Base, "a").unwrap_err();
        assert_eq!(
            err,
            TabledefError::Domain(DomainError::CyclicInheritance {
                chain: vec!["a".into(), "b".into(), "a".into()]
            })
        );
    }

    #[test]
    fn malformed_columns_are_recorded_as_warnings() {
        let mock = source(&[(
            TableType::Table,
            "t",
            "COLUMNS: id, null, false, null, id; short, x;",
        )]);
        let mut parser = TableParser::new(&mock);
        let table = parser.parse(TableType::Table, "t").unwrap();
        assert_eq!(table.columns.len(), 1);
        assert_eq!(parser.warnings().len(), 1);
        assert_eq!(parser.warnings()[0].entry, "short,x");
    }

    #[test]
    fn parse_any_falls_back_to_pivot() {
        let mock = source(&[(
            TableType::Pivot,
            "role_user",
            "COLUMNS: [*PRIMARY*]role_id, null, foreignId; [*PRIMARY*]user_id, null, foreignId;",
        )]);
        let mut parser = TableParser::new(&mock);
        let table = parser.parse_any("role_user").unwrap();
        assert_eq!(table.kind, TableKind::Pivot);
    }

    #[test]
    fn parse_any_reports_base_table_without_pivot() {
        let mock = source(&[(TableType::Table, "audit", "[*BASE*] COLUMNS: a, null, false, null, string;")]);
        let mut parser = TableParser::new(&mock);
        assert!(matches!(
            parser.parse_any("audit"),
            Err(TabledefError::Domain(DomainError::BaseTable { .. }))
        ));
    }
}
