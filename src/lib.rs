//! Branch report bot — collects daily employee reports over chat and
//! publishes a branch efficiency summary.

pub mod bot;
pub mod channels;
pub mod config;
pub mod error;
pub mod messages;
pub mod report;
pub mod scheduler;
