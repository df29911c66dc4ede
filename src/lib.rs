//! Appointment Booking Widget Service
//!
//! This library provides the state machine behind an appointment-booking
//! widget together with a Rust client for the external scheduling
//! services it talks to, and a web service exposing the widget's
//! operations to a thin front-end.
//!
//! # Modules
//!
//! - `client`: SchedulingClient for the availability and booking services
//! - `config`: environment-driven runtime configuration
//! - `models`: booking context and service payloads
//! - `services`: window computation, slot grouping, and the widget state machine
//! - `handlers`, `routes`: the HTTP surface
//!
//! # Flow
//!
//! A booking link carries the session context as query parameters. Once
//! validated, the widget fetches a two-week window of open slots from
//! the availability service, groups them by calendar day, and submits a
//! single confirmation request to the booking service when the user
//! confirms a slot.

pub mod client;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

#[cfg(test)]
pub mod client_mock;

#[cfg(test)]
mod tests;

// Re-export the main types for ease of use
pub use client::{SchedulingApi, SchedulingClient, TimeSlot};
pub use config::AppConfig;
pub use handlers::api::AppState;
pub use routes::create_router;
pub use services::widget::{BookingWidget, WidgetState};
