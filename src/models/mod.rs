// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{FighterDetail, FighterSummary, RawPayload, Roster, RosterEntry, NOT_AVAILABLE};
pub use requests::FighterQuery;
pub use responses::{ErrorResponse, HealthResponse, RosterStatus};
