//! HTTP server for café workshop booking.
//!
//! Customers browse published workshops, register seats as guests, and cancel
//! with their registration number plus email. Administrators manage the
//! workshop lifecycle and registrations with a bearer token.
//!
//! # Layout
//!
//! - [`config`]: environment configuration
//! - [`auth`]: static admin token resolution
//! - [`api`]: request types and handlers
//! - [`server`]: shared state and router
//! - [`metrics`]: Prometheus business counters
//!
//! Every workflow runs through [`atelier_core::BookingService`]; the binary wires
//! it to `PostgreSQL`, tests wire it to the in-memory store.

pub mod api;
pub mod auth;
pub mod config;
pub mod metrics;
pub mod server;

pub use config::Config;
pub use server::{AppState, build_router};
