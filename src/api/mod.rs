//! HTTP API module for the Payroll Deduction Engine.
//!
//! This module exposes the payroll calculation over REST: `POST /calculate`
//! for a salary breakdown and `GET /rate-table` for the active rates.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::CalculationRequest;
pub use response::{ApiError, ApiErrorResponse, CalculationResponse};
pub use state::AppState;
