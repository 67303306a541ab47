pub mod cell;
pub mod column;
pub mod error;
pub mod feature;
pub mod roles;
pub mod state;

// Re-export commonly used types
pub use cell::CellData;
pub use column::{BadRole, ColumnData};
pub use error::CoreError;
pub use feature::{FeatureId, DEFAULT_FEATURE_TYPE};
pub use roles::{function_matches, roles_of_function};
pub use state::{FeatureStatus, PegState};
