//! Recording adapters for the schema and seeding ports.
//!
//! Instead of touching a database, these adapters capture every call as a
//! serializable plan that the CLI can print as text or JSON.

mod migration_plan;
mod seed_plan;

pub use migration_plan::{MigrationPlan, MigrationPlanRecorder, PlanStep, TablePlan};
pub use seed_plan::{FieldSource, SeedEntry, SeedField, SeedPlan, SeedPlanRecorder};
