use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::services::availability::BookingWindow;

/// A bookable interval as the availability service describes it.
///
/// `start` and `end` are carried as the exact strings the service sent:
/// the booking payload must echo them unmodified, so they are parsed
/// only where a calendar day or clock label is needed for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: String,
    pub end: String,
    pub display: String,
}

/// Availability response body: `{ "slots": [...] }`.
#[derive(Debug, Default, Deserialize)]
pub struct AvailabilityResponse {
    #[serde(default, deserialize_with = "lenient_slots")]
    pub slots: Vec<TimeSlot>,
}

// A `slots` value that is missing, null, not an array, or an array of
// the wrong shape means "no open slots", not a failed fetch.
fn lenient_slots<'de, D>(deserializer: D) -> Result<Vec<TimeSlot>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::Array(items) => {
            Ok(serde_json::from_value(Value::Array(items)).unwrap_or_default())
        }
        _ => Ok(Vec::new()),
    }
}

/// Confirmation payload the booking service expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub email: String,
    pub rep_name: String,
    pub calendar_id: String,
    pub slot_start: String,
    pub slot_end: String,
    pub location: String,
    pub phone: String,
    pub project_type: String,
    pub scheduled_by: String,
}

/// Errors from the scheduling-service pair.
#[derive(Debug, Error)]
pub enum SchedulingError {
    #[error("scheduling service responded with status {0}")]
    Status(StatusCode),
    #[error("request to scheduling service failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// The two operations the widget needs from the scheduling backend.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchedulingApi: Send + Sync {
    /// Fetch open slots for a calendar over the given window.
    async fn fetch_availability(
        &self,
        calendar_id: &str,
        window: &BookingWindow,
    ) -> Result<AvailabilityResponse, SchedulingError>;

    /// Submit a confirmation request. Any 2xx means booked.
    async fn book_appointment(&self, request: &BookingRequest) -> Result<(), SchedulingError>;
}

/// HTTP client for the availability and booking services.
pub struct SchedulingClient {
    http: Client,
    availability_url: String,
    booking_url: String,
}

impl SchedulingClient {
    /// Build a client from loaded configuration.
    pub fn new(config: &AppConfig) -> Self {
        Self::with_endpoints(config.availability_url.clone(), config.booking_url.clone())
    }

    /// Build a client against explicit endpoint URLs.
    pub fn with_endpoints(availability_url: String, booking_url: String) -> Self {
        Self {
            http: Client::new(),
            availability_url,
            booking_url,
        }
    }
}

#[async_trait]
impl SchedulingApi for SchedulingClient {
    async fn fetch_availability(
        &self,
        calendar_id: &str,
        window: &BookingWindow,
    ) -> Result<AvailabilityResponse, SchedulingError> {
        let start = window.start_param();
        let end = window.end_param();

        info!("Requesting availability for calendar {}", calendar_id);
        debug!("Availability window: {} - {}", start, end);

        let response = self
            .http
            .get(&self.availability_url)
            .query(&[
                ("calendarId", calendar_id),
                ("startDate", start.as_str()),
                ("endDate", end.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Availability service returned status {}", status);
            return Err(SchedulingError::Status(status));
        }

        let body = response.json::<AvailabilityResponse>().await?;
        info!("Availability service returned {} slots", body.slots.len());
        Ok(body)
    }

    async fn book_appointment(&self, request: &BookingRequest) -> Result<(), SchedulingError> {
        info!(
            "Submitting booking for calendar {} at {}",
            request.calendar_id, request.slot_start
        );

        let response = self
            .http
            .post(&self.booking_url)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Booking service returned status {}", status);
            return Err(SchedulingError::Status(status));
        }

        // Any 2xx confirms the booking; the response body is not consumed.
        info!("Booking confirmed by scheduling service");
        Ok(())
    }
}
