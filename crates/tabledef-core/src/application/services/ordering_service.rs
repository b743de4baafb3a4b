//! Ordering Service - dependency-safe table order.
//!
//! This service coordinates the ordering workflow:
//! 1. Parse every requested definition (skipping the ones that fail)
//! 2. Build the foreign-key dependency graph
//! 3. Linearize it under the configured cycle policy

use std::collections::HashSet;

use tracing::{debug, info, instrument, warn};

use crate::{
    application::{ports::DefinitionSource, services::table_parser::TableParser},
    domain::{
        BrokenEdge, CyclePolicy, DependencyGraph, DomainError, Linearized, ParseWarning,
        TableDefinition, TableType,
    },
    error::{TabledefError, TabledefResult},
};

/// A requested table that could not be included.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTable {
    pub name: String,
    pub error: TabledefError,
}

/// A foreign key whose target table was never part of the ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub table: String,
    pub references: String,
}

/// Result of one ordering run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderReport {
    /// Definitions, every one after all the tables it depends on.
    pub tables: Vec<TableDefinition>,
    pub skipped: Vec<SkippedTable>,
    pub warnings: Vec<ParseWarning>,
    pub broken_edges: Vec<BrokenEdge>,
    pub dangling: Vec<DanglingReference>,
}

impl OrderReport {
    pub fn names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }

    /// `true` when nothing was skipped, dropped or broken.
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.warnings.is_empty() && self.broken_edges.is_empty()
    }

    /// Append a later run (e.g. pivots after tables).
    pub fn merge(&mut self, other: OrderReport) {
        self.tables.extend(other.tables);
        self.skipped.extend(other.skipped);
        self.warnings.extend(other.warnings);
        self.broken_edges.extend(other.broken_edges);
        self.dangling.extend(other.dangling);
    }
}

/// Orders definitions read from a [`DefinitionSource`].
pub struct OrderingService {
    source: Box<dyn DefinitionSource>,
    cycle_policy: CyclePolicy,
}

impl OrderingService {
    pub fn new(source: Box<dyn DefinitionSource>) -> Self {
        Self {
            source,
            cycle_policy: CyclePolicy::default(),
        }
    }

    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.cycle_policy = policy;
        self
    }

    pub fn cycle_policy(&self) -> CyclePolicy {
        self.cycle_policy
    }

    pub fn source(&self) -> &dyn DefinitionSource {
        self.source.as_ref()
    }

    /// Order the named tables, looking each up as a table and then a pivot.
    pub fn order<S: AsRef<str>>(&self, names: &[S]) -> TabledefResult<OrderReport> {
        self.order_as(names, None)
    }

    /// Order the named tables read as `table_type` (or table-then-pivot
    /// when `None`).
    ///
    /// Tables that fail to parse are reported in [`OrderReport::skipped`];
    /// only a foreign-key cycle rejected by the policy fails the whole call.
    #[instrument(skip_all, fields(requested = names.len(), table_type = ?table_type))]
    pub fn order_as<S: AsRef<str>>(
        &self,
        names: &[S],
        table_type: Option<TableType>,
    ) -> TabledefResult<OrderReport> {
        let mut parser = TableParser::new(self.source.as_ref());
        let mut seen = HashSet::new();
        let mut tables = Vec::new();
        let mut skipped = Vec::new();

        for name in names {
            let name = name.as_ref();
            if !seen.insert(name) {
                debug!(table = name, "Ignoring duplicate request");
                continue;
            }
            let parsed = match table_type {
                Some(table_type) => parser.parse(table_type, name),
                None => parser.parse_any(name),
            };
            match parsed {
                Ok(table) => tables.push(table),
                Err(error) if error.is_skippable() => {
                    warn!(table = name, error = %error, "Skipping table");
                    skipped.push(SkippedTable {
                        name: name.to_string(),
                        error,
                    });
                }
                Err(error) => return Err(error),
            }
        }

        let graph = DependencyGraph::build(tables);
        let dangling: Vec<DanglingReference> = graph
            .dangling()
            .into_iter()
            .map(|(table, references)| {
                debug!(table, references, "Foreign key target is not part of this ordering");
                DanglingReference {
                    table: table.to_string(),
                    references: references.to_string(),
                }
            })
            .collect();
        debug!(nodes = graph.len(), roots = graph.roots().len(), "Dependency graph built");

        let Linearized {
            tables,
            broken_edges,
        } = graph.linearize(self.cycle_policy)?;
        for edge in &broken_edges {
            warn!(from = %edge.from, to = %edge.to, "Dropped foreign key edge to break a cycle");
        }

        info!(
            ordered = tables.len(),
            skipped = skipped.len(),
            "Ordering complete"
        );
        Ok(OrderReport {
            tables,
            skipped,
            warnings: parser.into_warnings(),
            broken_edges,
            dangling,
        })
    }

    /// Order every definition of `table_type` the source lists, minus
    /// `excludes`.
    ///
    /// Base tables share storage with ordinary tables and are left out
    /// silently.
    pub fn order_all(&self, table_type: TableType, excludes: &[String]) -> TabledefResult<OrderReport> {
        let names: Vec<String> = self
            .source
            .list(table_type)?
            .into_iter()
            .filter(|name| !excludes.contains(name))
            .collect();
        let mut report = self.order_as(&names, Some(table_type))?;
        report.skipped.retain(|skipped| {
            let is_base = matches!(
                skipped.error,
                TabledefError::Domain(DomainError::BaseTable { .. })
            );
            if is_base {
                debug!(table = %skipped.name, "Base table left out of listing");
            }
            !is_base
        });
        Ok(report)
    }

    /// A single definition; every error is returned as-is.
    #[instrument(skip(self))]
    pub fn describe(&self, table_type: TableType, name: &str) -> TabledefResult<TableDefinition> {
        TableParser::new(self.source.as_ref()).parse(table_type, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockDefinitionSource;

    const USERS: &str = "COLUMNS: id, null, false, null, id;";
    const POSTS: &str = "FOREIGN_KEYS: ('user_id','id','users') COLUMNS: id, null, false, null, id;";
    const COMMENTS: &str = "FOREIGN_KEYS: ('post_id','id','posts'), ('user_id','id','users')
                            COLUMNS: id, null, false, null, id;";

    fn service(files: &'static [(TableType, &'static str, &'static str)]) -> OrderingService {
        let mut mock = MockDefinitionSource::new();
        mock.expect_read().returning(move |table_type, name| {
            Ok(files
                .iter()
                .find(|(t, n, _)| *t == table_type.storage() && *n == name)
                .map(|(_, _, text)| text.to_string()))
        });
        mock.expect_list().returning(move |table_type| {
            Ok(files
                .iter()
                .filter(|(t, _, _)| *t == table_type.storage())
                .map(|(_, n, _)| n.to_string())
                .collect())
        });
        OrderingService::new(Box::new(mock))
    }

    const BLOG: &[(TableType, &str, &str)] = &[
        (TableType::Table, "users", USERS),
        (TableType::Table, "posts", POSTS),
        (TableType::Table, "comments", COMMENTS),
    ];

    #[test]
    fn orders_dependencies_first() {
        let report = service(BLOG).order(&["comments", "posts", "users"]).unwrap();
        assert_eq!(report.names(), vec!["users", "posts", "comments"]);
        assert!(report.is_clean());
    }

    #[test]
    fn duplicate_requests_are_ignored() {
        let report = service(BLOG).order(&["users", "users", "posts"]).unwrap();
        assert_eq!(report.names(), vec!["users", "posts"]);
    }

    #[test]
    fn missing_tables_are_skipped_not_fatal() {
        let report = service(BLOG).order(&["users", "ghost"]).unwrap();
        assert_eq!(report.names(), vec!["users"]);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].name, "ghost");
    }

    #[test]
    fn dangling_references_are_reported() {
        let report = service(BLOG).order(&["posts"]).unwrap();
        assert_eq!(report.names(), vec!["posts"]);
        assert_eq!(
            report.dangling,
            vec![DanglingReference {
                table: "posts".into(),
                references: "users".into()
            }]
        );
    }

    #[test]
    fn cycle_policy_decides_between_error_and_warning() {
        const CYCLE: &[(TableType, &str, &str)] = &[
            (TableType::Table, "a", "FOREIGN_KEYS: ('b_id','id','b') COLUMNS: id,null,false,null,id;"),
            (TableType::Table, "b", "FOREIGN_KEYS: ('a_id','id','a') COLUMNS: id,null,false,null,id;"),
        ];
        let err = service(CYCLE).order(&["a", "b"]).unwrap_err();
        assert!(!err.is_skippable());

        let report = service(CYCLE)
            .with_cycle_policy(CyclePolicy::Break)
            .order(&["a", "b"])
            .unwrap();
        assert_eq!(report.tables.len(), 2);
        assert_eq!(report.broken_edges.len(), 1);
    }

    #[test]
    fn order_all_leaves_out_base_tables_and_excludes() {
        const FILES: &[(TableType, &str, &str)] = &[
            (TableType::Table, "users", USERS),
            (TableType::Table, "posts", POSTS),
            (TableType::Table, "audit", "[*BASE*] COLUMNS: a, null, false, null, string;"),
        ];
        let report = service(FILES)
            .order_all(TableType::Table, &["posts".to_string()])
            .unwrap();
        assert_eq!(report.names(), vec!["users"]);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn describe_returns_errors_directly() {
        let err = service(BLOG).describe(TableType::Table, "ghost").unwrap_err();
        assert!(matches!(
            err,
            TabledefError::Domain(DomainError::TableNotFound { .. })
        ));
    }
}
