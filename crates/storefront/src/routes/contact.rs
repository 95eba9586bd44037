//! Contact and consultation form handlers.
//!
//! Submissions are validated and logged. Nothing is delivered anywhere.

use std::fmt;
use std::str::FromStr;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::{NaiveDate, Utc};
use luxe_core::Email;
use serde::Deserialize;
use tracing::instrument;

use super::{PageShell, Visitor, non_blank};
use crate::error::Result;
use crate::filters;
use crate::flash::Notice;

const CONTACT_SUCCESS: &str = "Thank you for your message! We'll get back to you soon.";
const CONSULTATION_SUCCESS: &str = "Thank you for booking your consultation. We'll contact you shortly to confirm your appointment details.";

/// Longest accepted free-text message.
const MAX_MESSAGE_LENGTH: usize = 5000;

// =============================================================================
// Contact
// =============================================================================

/// Contact form data. Missing fields arrive empty and fail validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// A validated contact message.
#[derive(Debug)]
pub struct ContactMessage {
    pub name: String,
    pub email: Email,
    pub subject: String,
    pub message: String,
}

impl ContactForm {
    /// Check every field, collecting all problems.
    ///
    /// # Errors
    ///
    /// Returns one message per invalid field.
    pub fn validate(&self) -> std::result::Result<ContactMessage, Vec<String>> {
        let mut errors = Vec::new();

        let name = required(&self.name, "Name", &mut errors);
        let email = valid_email(&self.email, &mut errors);
        let subject = required(&self.subject, "Subject", &mut errors);
        let message = required(&self.message, "Message", &mut errors);
        if message.len() > MAX_MESSAGE_LENGTH {
            errors.push(format!("Message must be at most {MAX_MESSAGE_LENGTH} characters"));
        }

        match email {
            Some(email) if errors.is_empty() => Ok(ContactMessage {
                name: name.to_string(),
                email,
                subject: subject.to_string(),
                message: message.to_string(),
            }),
            _ => Err(errors),
        }
    }
}

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/contact.html")]
pub struct ContactTemplate {
    pub shell: PageShell,
    pub form: ContactForm,
    pub errors: Vec<String>,
}

/// Display the contact form.
#[instrument(skip(visitor), fields(client = %visitor.client.0))]
pub async fn contact_page(visitor: Visitor) -> Result<ContactTemplate> {
    Ok(ContactTemplate {
        shell: visitor.shell("contact").await,
        form: ContactForm::default(),
        errors: Vec::new(),
    })
}

/// Handle a contact submission.
///
/// Invalid input re-renders the form with 400 and the submitted values.
#[instrument(skip(visitor, form), fields(client = %visitor.client.0))]
pub async fn submit_contact(visitor: Visitor, Form(form): Form<ContactForm>) -> Result<Response> {
    match form.validate() {
        Ok(message) => {
            tracing::info!(
                name = %message.name,
                email = %message.email,
                subject = %message.subject,
                length = message.message.len(),
                "Contact message received"
            );
            visitor.notify(Notice::success(CONTACT_SUCCESS)).await?;
            Ok(Redirect::to("/contact").into_response())
        }
        Err(errors) => {
            tracing::debug!(?errors, "Contact form rejected");
            let page = ContactTemplate {
                shell: visitor.shell("contact").await,
                form,
                errors,
            };
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
    }
}

// =============================================================================
// Consultation
// =============================================================================

/// Kinds of consultation offered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsultationType {
    Styling,
    Occasion,
    Audit,
    Custom,
}

impl ConsultationType {
    /// Every type, in display order.
    pub const ALL: [Self; 4] = [Self::Styling, Self::Occasion, Self::Audit, Self::Custom];

    /// Form value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Styling => "styling",
            Self::Occasion => "occasion",
            Self::Audit => "audit",
            Self::Custom => "custom",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Styling => "Personal Styling",
            Self::Occasion => "Special Occasion",
            Self::Audit => "Wardrobe Audit",
            Self::Custom => "Custom Design Consultation",
        }
    }
}

impl FromStr for ConsultationType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown consultation type `{s}`"))
    }
}

impl fmt::Display for ConsultationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Bookable start times as (form value, label).
pub const TIME_SLOTS: &[(&str, &str)] = &[
    ("09:00", "9:00 AM"),
    ("11:00", "11:00 AM"),
    ("14:00", "2:00 PM"),
    ("16:00", "4:00 PM"),
];

/// Consultation form data. Missing fields arrive empty and fail validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ConsultationForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub consultation_type: String,
    pub preferred_date: String,
    pub preferred_time: String,
    pub message: String,
}

/// A validated booking request.
#[derive(Debug)]
pub struct ConsultationRequest {
    pub name: String,
    pub email: Email,
    pub phone: Option<String>,
    pub kind: ConsultationType,
    pub date: NaiveDate,
    pub time: &'static str,
    pub message: Option<String>,
}

impl ConsultationForm {
    /// Check every field against `today`, collecting all problems.
    ///
    /// # Errors
    ///
    /// Returns one message per invalid field.
    pub fn validate(
        &self,
        today: NaiveDate,
    ) -> std::result::Result<ConsultationRequest, Vec<String>> {
        let mut errors = Vec::new();

        let name = required(&self.name, "Name", &mut errors);
        let email = valid_email(&self.email, &mut errors);

        let kind = self.consultation_type.trim().parse::<ConsultationType>();
        if kind.is_err() {
            errors.push("Please choose a consultation type".to_string());
        }

        let date = NaiveDate::parse_from_str(self.preferred_date.trim(), "%Y-%m-%d");
        match date {
            Ok(date) if date < today => {
                errors.push("Preferred date cannot be in the past".to_string());
            }
            Ok(_) => {}
            Err(_) => errors.push("Please choose a preferred date".to_string()),
        }

        let time = TIME_SLOTS
            .iter()
            .find(|(value, _)| *value == self.preferred_time.trim())
            .map(|(value, _)| *value);
        if time.is_none() {
            errors.push("Please choose a preferred time".to_string());
        }

        let message = non_blank(Some(self.message.as_str()));
        if message.is_some_and(|m| m.len() > MAX_MESSAGE_LENGTH) {
            errors.push(format!("Message must be at most {MAX_MESSAGE_LENGTH} characters"));
        }

        match (email, kind, date, time) {
            (Some(email), Ok(kind), Ok(date), Some(time)) if errors.is_empty() => {
                Ok(ConsultationRequest {
                    name: name.to_string(),
                    email,
                    phone: non_blank(Some(self.phone.as_str())).map(str::to_string),
                    kind,
                    date,
                    time,
                    message: message.map(str::to_string),
                })
            }
            _ => Err(errors),
        }
    }
}

/// Consultation booking page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/consultation.html")]
pub struct ConsultationTemplate {
    pub shell: PageShell,
    pub form: ConsultationForm,
    pub errors: Vec<String>,
    pub types: [ConsultationType; 4],
    pub slots: &'static [(&'static str, &'static str)],
    /// Earliest selectable date, `YYYY-MM-DD`.
    pub min_date: String,
}

impl ConsultationTemplate {
    fn new(
        shell: PageShell,
        form: ConsultationForm,
        errors: Vec<String>,
        today: NaiveDate,
    ) -> Self {
        Self {
            shell,
            form,
            errors,
            types: ConsultationType::ALL,
            slots: TIME_SLOTS,
            min_date: today.format("%Y-%m-%d").to_string(),
        }
    }

    /// Returns true if `value` was the submitted consultation type.
    #[must_use]
    pub fn type_selected(&self, value: &str) -> bool {
        self.form.consultation_type == value
    }

    /// Returns true if `value` was the submitted time slot.
    #[must_use]
    pub fn time_selected(&self, value: &str) -> bool {
        self.form.preferred_time == value
    }
}

/// Display the consultation booking form.
#[instrument(skip(visitor), fields(client = %visitor.client.0))]
pub async fn consultation_page(visitor: Visitor) -> Result<ConsultationTemplate> {
    let today = Utc::now().date_naive();
    Ok(ConsultationTemplate::new(
        visitor.shell("consultation").await,
        ConsultationForm::default(),
        Vec::new(),
        today,
    ))
}

/// Handle a consultation booking.
///
/// Invalid input re-renders the form with 400 and the submitted values.
#[instrument(skip(visitor, form), fields(client = %visitor.client.0))]
pub async fn book_consultation(
    visitor: Visitor,
    Form(form): Form<ConsultationForm>,
) -> Result<Response> {
    let today = Utc::now().date_naive();

    match form.validate(today) {
        Ok(booking) => {
            tracing::info!(
                name = %booking.name,
                email = %booking.email,
                kind = booking.kind.as_str(),
                date = %booking.date,
                time = booking.time,
                has_phone = booking.phone.is_some(),
                "Consultation booked"
            );
            visitor.notify(Notice::success(CONSULTATION_SUCCESS)).await?;
            Ok(Redirect::to("/consultation").into_response())
        }
        Err(errors) => {
            tracing::debug!(?errors, "Consultation form rejected");
            let page = ConsultationTemplate::new(
                visitor.shell("consultation").await,
                form,
                errors,
                today,
            );
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
    }
}

// =============================================================================
// Validation Helpers
// =============================================================================

/// Trimmed value of a required field, recording an error if blank.
fn required<'a>(value: &'a str, label: &str, errors: &mut Vec<String>) -> &'a str {
    let value = value.trim();
    if value.is_empty() {
        errors.push(format!("{label} is required"));
    }
    value
}

fn valid_email(raw: &str, errors: &mut Vec<String>) -> Option<Email> {
    if raw.trim().is_empty() {
        errors.push("Email is required".to_string());
        return None;
    }
    Email::parse(raw)
        .map_err(|_| errors.push("Please enter a valid email address".to_string()))
        .ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn contact() -> ContactForm {
        ContactForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            subject: "Sizing".to_string(),
            message: "Does the gown run small?".to_string(),
        }
    }

    fn booking() -> ConsultationForm {
        ConsultationForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: String::new(),
            consultation_type: "occasion".to_string(),
            preferred_date: "2030-06-01".to_string(),
            preferred_time: "14:00".to_string(),
            message: "  ".to_string(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 5, 1).unwrap()
    }

    #[test]
    fn test_contact_valid() {
        let message = contact().validate().unwrap();
        assert_eq!(message.email.as_str(), "ada@example.com");
        assert_eq!(message.subject, "Sizing");
    }

    #[test]
    fn test_contact_collects_every_error() {
        let errors = ContactForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&"Name is required".to_string()));
        assert!(errors.contains(&"Email is required".to_string()));
    }

    #[test]
    fn test_contact_rejects_bad_email() {
        let form = ContactForm {
            email: "not-an-email".to_string(),
            ..contact()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            vec!["Please enter a valid email address".to_string()]
        );
    }

    #[test]
    fn test_consultation_valid() {
        let request = booking().validate(today()).unwrap();
        assert_eq!(request.kind, ConsultationType::Occasion);
        assert_eq!(request.time, "14:00");
        assert!(request.phone.is_none());
        assert!(request.message.is_none());
    }

    #[test]
    fn test_consultation_rejects_past_date() {
        let form = ConsultationForm {
            preferred_date: "2030-04-30".to_string(),
            ..booking()
        };
        let errors = form.validate(today()).unwrap_err();
        assert_eq!(errors, vec!["Preferred date cannot be in the past".to_string()]);

        let same_day = ConsultationForm {
            preferred_date: "2030-05-01".to_string(),
            ..booking()
        };
        assert!(same_day.validate(today()).is_ok());
    }

    #[test]
    fn test_consultation_rejects_unknown_slot_and_type() {
        let form = ConsultationForm {
            consultation_type: "brunch".to_string(),
            preferred_time: "10:00".to_string(),
            ..booking()
        };
        assert_eq!(form.validate(today()).unwrap_err().len(), 2);
    }

    #[test]
    fn test_consultation_type_parse() {
        for kind in ConsultationType::ALL {
            assert_eq!(kind.as_str().parse::<ConsultationType>().unwrap(), kind);
        }
        assert!("Styling".parse::<ConsultationType>().is_err());
    }
}
