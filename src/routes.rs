use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::handlers::api::{
    availability, booking_context, confirm_booking, health_check, AppState,
};

pub fn create_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/booking/context", get(booking_context))
        .route("/api/booking/availability", get(availability))
        .route("/api/booking/confirm", post(confirm_booking))
        .with_state(app_state)
}
