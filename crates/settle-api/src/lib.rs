//! SettleSpace API crate - axum HTTP surface for the assistant.
//!
//! Exposes chat turns, stored history and welcome messages to the
//! marketplace front end, and the escalation mailbox (list, accept,
//! decline, live SSE stream) to the operator panel.

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{create_router, start_server};
pub use state::AppState;
