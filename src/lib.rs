//! Rentals backend: CRUD over properties, tenants and leases.
//!
//! Requests arrive as [`event::ApiEvent`]s, either straight from a function
//! runtime or adapted from HTTP by [`app::create_router`], and are answered
//! by [`handler::Handler`].

pub mod app;
pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod event;
pub mod handler;
pub mod middleware;
pub mod routing;
pub mod telemetry;
