// Library interface for rosterboard
// This allows integration tests to access internal modules

pub mod api;
pub mod catalog;
pub mod errors;
pub mod ui;

// Re-export commonly used types
pub use api::{ActivitiesClient, ApiCommand, ApiEvent};
pub use catalog::{Activity, ActivityCatalog};
pub use errors::RosterboardError;
