use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::{debug, error, info, warn};

use crate::client::{AvailabilityResponse, BookingRequest, SchedulingApi, SchedulingError, TimeSlot};
use crate::models::context::{default_start_date, BookingContext, ContextParams};
use crate::services::availability::{booking_window, group_slots_by_day, DaySlots};

/// Fixed copy shown when a booking link lacks required parameters.
pub const INVALID_LINK_MESSAGE: &str =
    "This booking link is missing required information. Please contact us directly.";

/// Fixed copy shown when the availability fetch fails.
pub const AVAILABILITY_ERROR_MESSAGE: &str = "Unable to load available times. Please try again.";

/// Copy shown when no slot in the window is open.
pub const NO_SLOTS_MESSAGE: &str = "No available times found. Please select a different date.";

/// Booking-failure copy; the caller supplies the fallback phone number.
pub fn booking_error_message(fallback_phone: &str) -> String {
    format!(
        "Unable to complete booking. Please try again or call {}.",
        fallback_phone
    )
}

/// View state of the booking widget.
///
/// `InvalidLink` and `Confirmed` are terminal. `Errored` is the
/// recoverable availability-failure state; a booking failure instead
/// returns to `SlotSelected` with an inline error, so the user can
/// retry without re-picking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetState {
    AwaitingContext,
    InvalidLink,
    LoadingAvailability,
    ShowingSlots,
    Errored,
    SlotSelected,
    Submitting,
    Confirmed,
}

/// Issued when an availability fetch starts. Outcomes are applied only
/// while their ticket is still current, so a slow response for an old
/// date can never overwrite newer slot data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
    pub issued_for: NaiveDate,
}

/// The appointment-booking widget: context, selected date, slot list,
/// and the state machine driving them. Owned exclusively by its caller;
/// network outcomes are fed back in through the `apply_*` methods.
pub struct BookingWidget {
    context: Option<BookingContext>,
    display_tz: Tz,
    fallback_phone: String,
    window_days: i64,
    state: WidgetState,
    selected_date: Option<NaiveDate>,
    slots: Vec<TimeSlot>,
    selected_slot: Option<TimeSlot>,
    error: Option<String>,
    confirmed_time: Option<String>,
    fetch_generation: u64,
}

impl BookingWidget {
    /// Fresh widget, waiting for link parameters.
    pub fn new(display_tz: Tz, fallback_phone: &str, window_days: i64) -> Self {
        Self {
            context: None,
            display_tz,
            fallback_phone: fallback_phone.to_string(),
            window_days,
            state: WidgetState::AwaitingContext,
            selected_date: None,
            slots: Vec::new(),
            selected_slot: None,
            error: None,
            confirmed_time: None,
            fetch_generation: 0,
        }
    }

    /// Read link parameters, once, at mount.
    ///
    /// A valid context moves the widget to loading with the date
    /// defaulted to tomorrow; an unusable link is terminal and nothing
    /// is ever fetched from it.
    pub fn activate(&mut self, params: &ContextParams, today: NaiveDate) {
        if self.state != WidgetState::AwaitingContext {
            return;
        }

        match BookingContext::from_params(params) {
            Ok(context) => {
                info!("Booking context accepted for calendar {}", context.calendar_id);
                self.selected_date = Some(default_start_date(today));
                self.context = Some(context);
                self.state = WidgetState::LoadingAvailability;
            }
            Err(err) => {
                warn!("Booking link rejected: {}", err);
                self.error = Some(INVALID_LINK_MESSAGE.to_string());
                self.state = WidgetState::InvalidLink;
            }
        }
    }

    /// Start an availability fetch for the currently selected date.
    ///
    /// Entering the loading state hides the slot list, clears any stale
    /// error, and discards the previous selection (a selection is never
    /// valid across a refetch).
    pub fn begin_availability_fetch(&mut self) -> Option<FetchTicket> {
        if self.context.is_none() {
            return None;
        }
        if matches!(
            self.state,
            WidgetState::InvalidLink | WidgetState::Submitting | WidgetState::Confirmed
        ) {
            return None;
        }
        let issued_for = self.selected_date?;

        self.fetch_generation += 1;
        self.state = WidgetState::LoadingAvailability;
        self.slots.clear();
        self.selected_slot = None;
        self.error = None;

        Some(FetchTicket {
            generation: self.fetch_generation,
            issued_for,
        })
    }

    /// Pick a new start date. The current selection is discarded and a
    /// fresh fetch is started for the new date.
    pub fn select_date(&mut self, date: NaiveDate) -> Option<FetchTicket> {
        if self.context.is_none()
            || matches!(
                self.state,
                WidgetState::InvalidLink | WidgetState::Submitting | WidgetState::Confirmed
            )
        {
            return None;
        }

        self.selected_date = Some(date);
        self.begin_availability_fetch()
    }

    /// Apply the outcome of an availability fetch.
    ///
    /// Outcomes for a superseded ticket are dropped. A success replaces
    /// the slot list wholesale; an empty list is informational, not an
    /// error.
    pub fn apply_availability(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<AvailabilityResponse, SchedulingError>,
    ) {
        if ticket.generation != self.fetch_generation
            || Some(ticket.issued_for) != self.selected_date
        {
            debug!("Dropping stale availability response for {}", ticket.issued_for);
            return;
        }
        if self.state != WidgetState::LoadingAvailability {
            return;
        }

        match outcome {
            Ok(response) => {
                info!(
                    "Loaded {} open slots from {}",
                    response.slots.len(),
                    ticket.issued_for
                );
                self.slots = response.slots;
                self.error = None;
                self.state = WidgetState::ShowingSlots;
            }
            Err(err) => {
                error!("Availability fetch failed: {}", err);
                self.slots.clear();
                self.selected_slot = None;
                self.error = Some(AVAILABILITY_ERROR_MESSAGE.to_string());
                self.state = WidgetState::Errored;
            }
        }
    }

    /// Select a slot from the visible list. Returns whether the
    /// selection was accepted.
    pub fn select_slot(&mut self, slot: &TimeSlot) -> bool {
        if !matches!(self.state, WidgetState::ShowingSlots | WidgetState::SlotSelected) {
            return false;
        }
        // Selection is only meaningful against the list on screen.
        if !self.slots.contains(slot) {
            return false;
        }

        self.selected_slot = Some(slot.clone());
        self.state = WidgetState::SlotSelected;
        true
    }

    /// Begin the confirmation request. Only available with a slot
    /// selected; yields the payload to send.
    pub fn begin_submission(&mut self) -> Option<BookingRequest> {
        if self.state != WidgetState::SlotSelected {
            return None;
        }
        let context = self.context.as_ref()?;
        let slot = self.selected_slot.as_ref()?;

        self.error = None;
        self.state = WidgetState::Submitting;
        Some(booking_request(context, slot))
    }

    /// Apply the booking outcome: success is terminal, failure returns
    /// to slot selection with the phone fallback shown.
    pub fn apply_submission(&mut self, outcome: Result<(), SchedulingError>) {
        if self.state != WidgetState::Submitting {
            return;
        }

        match outcome {
            Ok(()) => {
                let display_time = self
                    .selected_slot
                    .as_ref()
                    .map(|slot| slot.display.clone())
                    .unwrap_or_default();
                info!("Booking confirmed for {}", display_time);
                self.confirmed_time = Some(display_time);
                self.state = WidgetState::Confirmed;
            }
            Err(err) => {
                error!("Booking submission failed: {}", err);
                self.error = Some(booking_error_message(&self.fallback_phone));
                self.state = WidgetState::SlotSelected;
            }
        }
    }

    /// Fetch availability for the selected date through `client` and
    /// apply the outcome.
    pub async fn refresh_availability(&mut self, client: &dyn SchedulingApi) {
        let ticket = match self.begin_availability_fetch() {
            Some(ticket) => ticket,
            None => return,
        };
        let calendar_id = match self.context.as_ref() {
            Some(context) => context.calendar_id.clone(),
            None => return,
        };

        let window = booking_window(ticket.issued_for, self.display_tz, self.window_days);
        let outcome = client.fetch_availability(&calendar_id, &window).await;
        self.apply_availability(&ticket, outcome);
    }

    /// Submit the selected slot through `client` and apply the outcome.
    pub async fn submit(&mut self, client: &dyn SchedulingApi) {
        let request = match self.begin_submission() {
            Some(request) => request,
            None => return,
        };

        let outcome = client.book_appointment(&request).await;
        self.apply_submission(outcome);
    }

    pub fn state(&self) -> WidgetState {
        self.state
    }

    pub fn context(&self) -> Option<&BookingContext> {
        self.context.as_ref()
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    pub fn slots(&self) -> &[TimeSlot] {
        &self.slots
    }

    pub fn selected_slot(&self) -> Option<&TimeSlot> {
        self.selected_slot.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn confirmed_time(&self) -> Option<&str> {
        self.confirmed_time.as_deref()
    }

    /// Whether the confirm action is available.
    pub fn can_submit(&self) -> bool {
        self.state == WidgetState::SlotSelected
    }

    /// Grouped view of the current slot list.
    pub fn grouped_slots(&self) -> Vec<DaySlots> {
        group_slots_by_day(&self.slots, self.display_tz)
    }
}

/// Assemble the confirmation payload. The slot's instants pass through
/// exactly as the availability service sent them.
pub fn booking_request(context: &BookingContext, slot: &TimeSlot) -> BookingRequest {
    BookingRequest {
        email: context.email.clone(),
        rep_name: context.rep.clone(),
        calendar_id: context.calendar_id.clone(),
        slot_start: slot.start.clone(),
        slot_end: slot.end.clone(),
        location: context.location.clone(),
        phone: context.phone.clone(),
        project_type: context.project_type.clone(),
        scheduled_by: context.scheduled_by.clone(),
    }
}
