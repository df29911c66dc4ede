use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::client::{AvailabilityResponse, BookingRequest, MockSchedulingApi, TimeSlot};

/// In-memory availability fixtures backing the mock client: open slots
/// per calendar, plus a record of every booking that was submitted.
pub struct SlotFixtures {
    slots: Mutex<HashMap<String, Vec<TimeSlot>>>,
    bookings: Mutex<Vec<BookingRequest>>,
}

impl SlotFixtures {
    pub fn new() -> Self {
        let mut slots = HashMap::new();

        // A sample calendar with two mornings of availability
        slots.insert(
            "cal-sample".to_string(),
            vec![
                sample_slot(
                    "2026-08-14T13:00:00.000Z",
                    "2026-08-14T14:00:00.000Z",
                    "Friday, August 14 at 9:00 AM",
                ),
                sample_slot(
                    "2026-08-15T13:00:00.000Z",
                    "2026-08-15T14:00:00.000Z",
                    "Saturday, August 15 at 9:00 AM",
                ),
            ],
        );

        Self {
            slots: Mutex::new(slots),
            bookings: Mutex::new(Vec::new()),
        }
    }

    pub fn set_slots(&self, calendar_id: &str, slots: Vec<TimeSlot>) {
        let mut store = self.slots.lock().unwrap();
        store.insert(calendar_id.to_string(), slots);
    }

    pub fn slots_for(&self, calendar_id: &str) -> Vec<TimeSlot> {
        let store = self.slots.lock().unwrap();
        store.get(calendar_id).cloned().unwrap_or_default()
    }

    pub fn record_booking(&self, request: BookingRequest) {
        let mut bookings = self.bookings.lock().unwrap();
        bookings.push(request);
    }

    pub fn bookings(&self) -> Vec<BookingRequest> {
        let bookings = self.bookings.lock().unwrap();
        bookings.clone()
    }
}

pub fn sample_slot(start: &str, end: &str, display: &str) -> TimeSlot {
    TimeSlot {
        start: start.to_string(),
        end: end.to_string(),
        display: display.to_string(),
    }
}

/// Set up a mock client backed by a fixture store: availability reads
/// from it, every booking is recorded into it, and both always succeed.
pub fn setup_mock_client() -> (MockSchedulingApi, Arc<SlotFixtures>) {
    let fixtures = Arc::new(SlotFixtures::new());
    let mut mock_client = MockSchedulingApi::new();

    // Mock fetch_availability
    let store = Arc::clone(&fixtures);
    mock_client
        .expect_fetch_availability()
        .returning(move |calendar_id, _window| {
            Ok(AvailabilityResponse {
                slots: store.slots_for(calendar_id),
            })
        });

    // Mock book_appointment
    let store = Arc::clone(&fixtures);
    mock_client
        .expect_book_appointment()
        .returning(move |request| {
            store.record_booking(request.clone());
            Ok(())
        });

    (mock_client, fixtures)
}
