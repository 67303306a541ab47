//! Subsystem consistency validation.
//!
//! Loads a subsystem spreadsheet, reconciles every cell against the live
//! functional assignments of each genome, tallies the discrepancies per
//! column, and caches the resulting error count with a staleness policy.
//!
//! # Modules
//!
//! - [`cache`]: error-count cache artifact and the pure staleness policy
//! - [`config`]: validation thresholds
//! - [`error`]: CheckError enum
//! - [`layout`]: where subsystem files live in a core directory
//! - [`report`]: serializable views for presentation layers
//! - [`row`]: RowData, one genome's spreadsheet row
//! - [`spreadsheet`]: spreadsheet file parser
//! - [`subsystem`]: SubsystemData, the validation aggregate

pub mod cache;
pub mod config;
pub mod error;
pub mod layout;
pub mod report;
pub mod row;
pub mod spreadsheet;
pub mod subsystem;

pub use cache::{is_stale, CachedCount};
pub use config::ValidationConfig;
pub use error::CheckError;
pub use layout::{list_subsystems, CoreLayout};
pub use report::{ColumnReport, RowReport, SubsystemReport, SurveyReport};
pub use row::RowData;
pub use subsystem::{health_ratio, SubsystemData};
