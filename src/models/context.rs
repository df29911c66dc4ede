use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Query parameters a booking link carries.
///
/// All eight are optional strings at the wire level; validation decides
/// whether the link is usable.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextParams {
    pub email: Option<String>,
    pub rep: Option<String>,
    pub calendar_id: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
    pub project_type: Option<String>,
    pub scheduled_by: Option<String>,
    pub zip: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ContextError {
    /// The link is unusable without an email, a rep, and a calendar id.
    #[error("booking link is missing required parameters")]
    MissingRequired,
}

/// Validated booking context, parsed once per session and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingContext {
    pub email: String,
    pub rep: String,
    pub calendar_id: String,
    pub location: String,
    pub phone: String,
    pub project_type: String,
    pub scheduled_by: String,
    pub zip: String,
}

impl BookingContext {
    /// Build a context from link parameters.
    ///
    /// `email`, `rep`, and `calendarId` must all be present and
    /// non-empty; the remaining parameters default to empty strings.
    pub fn from_params(params: &ContextParams) -> Result<Self, ContextError> {
        Ok(Self {
            email: required(&params.email)?,
            rep: required(&params.rep)?,
            calendar_id: required(&params.calendar_id)?,
            location: optional(&params.location),
            phone: optional(&params.phone),
            project_type: optional(&params.project_type),
            scheduled_by: optional(&params.scheduled_by),
            zip: optional(&params.zip),
        })
    }
}

fn required(value: &Option<String>) -> Result<String, ContextError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v.clone()),
        _ => Err(ContextError::MissingRequired),
    }
}

fn optional(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// The widget defaults its date picker to tomorrow.
pub fn default_start_date(today: NaiveDate) -> NaiveDate {
    today + Duration::days(1)
}

#[cfg(test)]
mod context_tests {
    use super::*;

    fn full_params() -> ContextParams {
        ContextParams {
            email: Some("pat@example.com".to_string()),
            rep: Some("Alice Moreno".to_string()),
            calendar_id: Some("cal-alice".to_string()),
            location: Some("12 Oak St, Rahway NJ".to_string()),
            phone: Some("555-0140".to_string()),
            project_type: Some("Siding".to_string()),
            scheduled_by: Some("Dana".to_string()),
            zip: Some("07065".to_string()),
        }
    }

    #[test]
    fn test_full_params_accepted() {
        let context = BookingContext::from_params(&full_params()).unwrap();
        assert_eq!(context.email, "pat@example.com");
        assert_eq!(context.rep, "Alice Moreno");
        assert_eq!(context.calendar_id, "cal-alice");
        assert_eq!(context.zip, "07065");
    }

    #[test]
    fn test_optional_params_default_to_empty() {
        let params = ContextParams {
            email: Some("pat@example.com".to_string()),
            rep: Some("Alice Moreno".to_string()),
            calendar_id: Some("cal-alice".to_string()),
            ..Default::default()
        };

        let context = BookingContext::from_params(&params).unwrap();
        assert_eq!(context.location, "");
        assert_eq!(context.phone, "");
        assert_eq!(context.project_type, "");
        assert_eq!(context.scheduled_by, "");
        assert_eq!(context.zip, "");
    }

    #[test]
    fn test_each_required_param_enforced() {
        for missing in ["email", "rep", "calendarId"] {
            let mut params = full_params();
            match missing {
                "email" => params.email = None,
                "rep" => params.rep = None,
                _ => params.calendar_id = None,
            }
            assert_eq!(
                BookingContext::from_params(&params),
                Err(ContextError::MissingRequired),
                "expected rejection when {} is missing",
                missing
            );
        }
    }

    #[test]
    fn test_blank_required_param_rejected() {
        let mut params = full_params();
        params.rep = Some("   ".to_string());
        assert!(BookingContext::from_params(&params).is_err());

        let mut params = full_params();
        params.email = Some(String::new());
        assert!(BookingContext::from_params(&params).is_err());
    }

    #[test]
    fn test_default_start_date_is_tomorrow() {
        let today = NaiveDate::from_ymd_opt(2026, 8, 8).unwrap();
        assert_eq!(
            default_start_date(today),
            NaiveDate::from_ymd_opt(2026, 8, 9).unwrap()
        );

        // Month rollover
        let today = NaiveDate::from_ymd_opt(2026, 8, 31).unwrap();
        assert_eq!(
            default_start_date(today),
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
        );
    }
}
