#![doc = "The `taskvault` library crate."]
#![doc = ""]
#![doc = "Authentication (signup, login, logout and the per-request `Protect` gate),"]
#![doc = "owner-scoped task handling, the credential store abstraction and the central"]
#![doc = "error normalizer. The binary (`main.rs`) wires these into an actix-web server."]

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;

pub use app::create_app;
pub use error::AppError;
pub use state::AppState;
