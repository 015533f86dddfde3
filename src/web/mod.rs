pub mod admin;
pub mod api;
pub mod auth;
pub mod public;
pub mod responses;
pub mod router;
pub mod state;
pub mod templates;
pub mod uploads;

pub use state::AppState;
