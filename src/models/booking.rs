use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::client::TimeSlot;
use crate::models::context::{BookingContext, ContextError, ContextParams};

/// Query for the availability endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityQuery {
    pub calendar_id: String,
    /// First day of the window, `YYYY-MM-DD`.
    pub date: NaiveDate,
}

/// One slot as the widget renders it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub start: String,
    pub end: String,
    pub display: String,
    /// Clock label for the slot button, e.g. "9:00 AM".
    pub time_label: String,
}

/// One day heading plus its slots, in arrival order.
#[derive(Debug, Serialize)]
pub struct DayView {
    pub label: String,
    pub slots: Vec<SlotView>,
}

/// Response body for the availability endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityView {
    pub days: Vec<DayView>,
    pub slot_count: usize,
}

/// Response for a validated booking link.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextResponse {
    pub context: BookingContext,
    pub default_date: NaiveDate,
}

/// Inbound body for the confirm endpoint: the session context plus the
/// slot the user picked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSubmission {
    pub email: String,
    pub rep: String,
    pub calendar_id: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub project_type: String,
    #[serde(default)]
    pub scheduled_by: String,
    #[serde(default)]
    pub zip: String,
    pub slot: TimeSlot,
}

impl BookingSubmission {
    /// Re-validate the context this submission claims to act under.
    pub fn context(&self) -> Result<BookingContext, ContextError> {
        BookingContext::from_params(&ContextParams {
            email: Some(self.email.clone()),
            rep: Some(self.rep.clone()),
            calendar_id: Some(self.calendar_id.clone()),
            location: Some(self.location.clone()),
            phone: Some(self.phone.clone()),
            project_type: Some(self.project_type.clone()),
            scheduled_by: Some(self.scheduled_by.clone()),
            zip: Some(self.zip.clone()),
        })
    }
}

/// Response for a confirmed booking.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingConfirmed {
    pub rep: String,
    /// The selected slot's display label, echoed verbatim.
    pub confirmed_time: String,
}

/// User-facing error body. `fallback_phone` rides along when phoning in
/// is the recovery path.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_phone: Option<String>,
}
