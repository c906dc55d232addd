//! Report core: grammar, parsing, scoring, the cycle store and the summary.

pub mod efficiency;
pub mod parser;
pub mod record;
pub mod service;
pub mod store;
pub mod summary;
pub mod validator;

pub use record::EmployeeRecord;
pub use service::{PublishOutcome, ReportService};
pub use store::ReportStore;
