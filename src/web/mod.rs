//! Web server module
//!
//! Serves the search form, the screened result list and the per-article
//! digest pages.

mod handlers;
mod routes;
mod state;
mod templates;

pub use routes::create_router;
pub use state::AppState;
pub use templates::Templates;
