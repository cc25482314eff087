//! Service layer for business logic
//!
//! HTTP handlers and the CLI both go through these services; none of them
//! touch the database directly.

pub mod admin;
pub mod allocation;
pub mod code_generator;
pub mod health;
pub mod redirect;
pub mod retention;

pub use admin::AdminService;
pub use allocation::{Allocation, AllocationService};
pub use code_generator::CodeGenerator;
pub use health::{AppStartTime, HealthReport, HealthService};
pub use redirect::RedirectService;
pub use retention::{RetentionSweeper, SweepReport};
