//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "order these tables" or "seed everything".

pub mod ordering_service;
pub mod plan_service;
pub mod seed_service;
pub mod table_parser;

pub use ordering_service::{DanglingReference, OrderReport, OrderingService, SkippedTable};
pub use plan_service::{PlanService, define_table};
pub use seed_service::{DEFAULT_PIVOT_RECORDS, SeedReport, SeedRequest, SeedService, SeededTable};
pub use table_parser::TableParser;
