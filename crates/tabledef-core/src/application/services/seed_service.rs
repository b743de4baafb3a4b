//! Seeding: hand ordered definitions to a [`Seeder`] with a record count.

use tracing::{info, instrument};

use crate::{
    application::{
        ports::Seeder,
        services::ordering_service::{OrderReport, OrderingService},
    },
    domain::{TableDefinition, TableType},
    error::TabledefResult,
};

pub const DEFAULT_PIVOT_RECORDS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRequest {
    /// Tables to seed; empty means every listed definition.
    pub tables: Vec<String>,
    /// Restrict to one collection; `None` seeds tables, then pivots.
    pub table_type: Option<TableType>,
    pub excludes: Vec<String>,
    /// Count for ordinary tables, `0` uses each definition's `RECORDS:`.
    pub table_records: u32,
    /// Count for pivot tables, `0` uses each definition's `RECORDS:`.
    pub pivot_records: u32,
}

impl Default for SeedRequest {
    fn default() -> Self {
        Self {
            tables: Vec::new(),
            table_type: None,
            excludes: Vec::new(),
            table_records: 0,
            pivot_records: DEFAULT_PIVOT_RECORDS,
        }
    }
}

impl SeedRequest {
    pub fn record_count(&self, table: &TableDefinition) -> u32 {
        let requested = if table.is_pivot() {
            self.pivot_records
        } else {
            self.table_records
        };
        if requested == 0 { table.record_count } else { requested }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededTable {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedReport {
    pub seeded: Vec<SeededTable>,
    pub order: OrderReport,
}

pub struct SeedService {
    ordering: OrderingService,
}

impl SeedService {
    pub fn new(ordering: OrderingService) -> Self {
        Self { ordering }
    }

    #[instrument(skip_all, fields(tables = request.tables.len(), table_type = ?request.table_type))]
    pub fn seed(&self, request: &SeedRequest, seeder: &dyn Seeder) -> TabledefResult<SeedReport> {
        let mut report = SeedReport::default();

        if request.tables.is_empty() {
            let types = match request.table_type {
                Some(table_type) => vec![table_type],
                None => vec![TableType::Table, TableType::Pivot],
            };
            for table_type in types {
                let order = self.ordering.order_all(table_type, &request.excludes)?;
                self.seed_ordered(&order, request, seeder, &mut report)?;
                report.order.merge(order);
            }
        } else {
            let names: Vec<&String> = request
                .tables
                .iter()
                .filter(|name| !request.excludes.contains(name))
                .collect();
            let order = self.ordering.order_as(&names, request.table_type)?;
            self.seed_ordered(&order, request, seeder, &mut report)?;
            report.order = order;
        }

        info!(seeded = report.seeded.len(), "Seeding complete");
        Ok(report)
    }

    fn seed_ordered(
        &self,
        order: &OrderReport,
        request: &SeedRequest,
        seeder: &dyn Seeder,
        report: &mut SeedReport,
    ) -> TabledefResult<()> {
        for table in &order.tables {
            let count = request.record_count(table);
            seeder.seed(table, count)?;
            info!(table = %table.name, count, "Seeded");
            report.seeded.push(SeededTable {
                name: table.name.clone(),
                count,
            });
        }
        Ok(())
    }
}
