//! Web layer for the weather briefing dashboard.
//!
//! Provides the dashboard page, JSON endpoints for stations and weather, and
//! HTML fragments for the briefing and station lists.

mod dto;
mod routes;
mod state;
pub mod templates;


pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
pub use templates::*;
