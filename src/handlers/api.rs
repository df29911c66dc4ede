use axum::{
    extract::{Json as ExtractJson, Query, State},
    http::StatusCode,
    response::Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::client::SchedulingApi;
use crate::config::AppConfig;
use crate::models::booking::{
    AvailabilityQuery, AvailabilityView, BookingConfirmed, BookingSubmission, ContextResponse,
    DayView, ErrorBody, SlotView,
};
use crate::models::context::{default_start_date, BookingContext, ContextParams};
use crate::services::availability::{booking_window, group_slots_by_day, slot_time_label};
use crate::services::widget::{
    booking_error_message, booking_request, AVAILABILITY_ERROR_MESSAGE, INVALID_LINK_MESSAGE,
};

// AppState struct containing shared resources
pub struct AppState {
    pub client: Arc<dyn SchedulingApi>,
    pub config: AppConfig,
}

// Health check endpoint
pub async fn health_check() -> &'static str {
    "OK"
}

// Booking-link validation endpoint
pub async fn booking_context(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ContextParams>,
) -> Result<Json<ContextResponse>, (StatusCode, Json<ErrorBody>)> {
    match BookingContext::from_params(&params) {
        Ok(context) => {
            info!("Accepted booking link for calendar {}", context.calendar_id);

            let today = Utc::now()
                .with_timezone(&state.config.display_time_zone)
                .date_naive();

            Ok(Json(ContextResponse {
                default_date: default_start_date(today),
                context,
            }))
        }
        Err(err) => {
            warn!("Rejected booking link: {}", err);
            Err(invalid_link_response(&state))
        }
    }
}

// Availability endpoint: fetch and group open slots for the window
// starting at the requested date
pub async fn availability(
    State(state): State<Arc<AppState>>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityView>, (StatusCode, Json<ErrorBody>)> {
    info!(
        "Availability request for calendar {} starting {}",
        query.calendar_id, query.date
    );

    let tz = state.config.display_time_zone;
    let window = booking_window(query.date, tz, state.config.booking_window_days);

    match state
        .client
        .fetch_availability(&query.calendar_id, &window)
        .await
    {
        Ok(response) => {
            let slot_count = response.slots.len();
            info!("Returning {} slots for calendar {}", slot_count, query.calendar_id);

            let days = group_slots_by_day(&response.slots, tz)
                .into_iter()
                .map(|day| DayView {
                    label: day.label,
                    slots: day
                        .slots
                        .into_iter()
                        .map(|slot| {
                            let time_label = slot_time_label(&slot, tz)
                                .unwrap_or_else(|| slot.display.clone());
                            SlotView {
                                start: slot.start,
                                end: slot.end,
                                display: slot.display,
                                time_label,
                            }
                        })
                        .collect(),
                })
                .collect();

            Ok(Json(AvailabilityView { days, slot_count }))
        }
        Err(err) => {
            error!("Availability fetch failed: {}", err);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorBody {
                    message: AVAILABILITY_ERROR_MESSAGE.to_string(),
                    fallback_phone: None,
                }),
            ))
        }
    }
}

// Booking confirmation endpoint
pub async fn confirm_booking(
    State(state): State<Arc<AppState>>,
    ExtractJson(submission): ExtractJson<BookingSubmission>,
) -> Result<Json<BookingConfirmed>, (StatusCode, Json<ErrorBody>)> {
    info!(
        "Booking submission for calendar {} at {}",
        submission.calendar_id, submission.slot.start
    );

    let context = match submission.context() {
        Ok(context) => context,
        Err(err) => {
            warn!("Rejected booking submission: {}", err);
            return Err(invalid_link_response(&state));
        }
    };

    let request = booking_request(&context, &submission.slot);

    match state.client.book_appointment(&request).await {
        Ok(()) => {
            info!("Booking confirmed for {}", submission.slot.display);
            Ok(Json(BookingConfirmed {
                rep: context.rep,
                confirmed_time: submission.slot.display,
            }))
        }
        Err(err) => {
            error!("Booking submission failed: {}", err);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorBody {
                    message: booking_error_message(&state.config.fallback_phone),
                    fallback_phone: Some(state.config.fallback_phone.clone()),
                }),
            ))
        }
    }
}

fn invalid_link_response(state: &AppState) -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorBody {
            message: INVALID_LINK_MESSAGE.to_string(),
            fallback_phone: Some(state.config.fallback_phone.clone()),
        }),
    )
}
