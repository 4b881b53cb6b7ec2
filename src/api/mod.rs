//! HTTP API module for the portage simulation engine.
//!
//! This module exposes the simulator to the input form: one endpoint runs a
//! simulation, two others evaluate or list the contribution table.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{EvaluationRequest, MileageClaim, SimulationRequest, TravelClaim};
pub use response::{
    ApiError, ApiErrorResponse, ContributionTableResponse, EvaluationResponse, SimulationResponse,
};
pub use state::AppState;
