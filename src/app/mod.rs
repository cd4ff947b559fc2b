//! HTTP surface: tenant rewrite middleware, handlers and the server wiring.

pub mod render;
pub mod rewrite;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{build_app, build_router, serve};
pub use state::AppState;
