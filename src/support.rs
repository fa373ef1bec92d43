// 💬 Contact Support - appointment-related support requests
//
// Captures a topic and a message, validates it, and hands back a ticket.
// Nothing is sent anywhere; the dialog closes through the caller's callback.

use crate::notify::{Notifier, Toast};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SUPPORT_HOURS: &str =
    "Support hours: Monday to Friday, 9am to 5pm. We typically respond within 24 hours.";

pub const EMPTY_MESSAGE_ERROR: &str = "Please enter a message";

pub const SENT_CONFIRMATION: &str =
    "Your message has been sent to support. We'll get back to you shortly.";

/// Appointment ids are shown truncated to this many characters
const APPOINTMENT_REF_LEN: usize = 8;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SupportError {
    #[error("Please enter a message")]
    EmptyMessage,
}

// ============================================================================
// TOPIC
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportTopic {
    #[default]
    Question,
    Billing,
    Technical,
    Reschedule,
    Cancellation,
    Other,
}

impl SupportTopic {
    pub const ALL: [SupportTopic; 6] = [
        SupportTopic::Question,
        SupportTopic::Billing,
        SupportTopic::Technical,
        SupportTopic::Reschedule,
        SupportTopic::Cancellation,
        SupportTopic::Other,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SupportTopic::Question => "General Question",
            SupportTopic::Billing => "Billing Issue",
            SupportTopic::Technical => "Technical Problem",
            SupportTopic::Reschedule => "Reschedule Help",
            SupportTopic::Cancellation => "Cancellation",
            SupportTopic::Other => "Other",
        }
    }

    pub fn next(&self) -> Self {
        let pos = Self::ALL.iter().position(|t| t == self).unwrap_or(0);
        Self::ALL[(pos + 1) % Self::ALL.len()]
    }
}

// ============================================================================
// REQUEST / TICKET
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportRequest {
    #[serde(default)]
    pub appointment_id: Option<String>,

    #[serde(default)]
    pub topic: SupportTopic,

    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub id: String,
    pub appointment_id: Option<String>,
    pub topic: SupportTopic,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl SupportRequest {
    pub fn for_appointment(appointment_id: &str) -> Self {
        SupportRequest {
            appointment_id: Some(appointment_id.to_string()),
            ..Self::default()
        }
    }

    /// First 8 characters of the appointment id, if there is one
    pub fn appointment_reference(&self) -> Option<String> {
        self.appointment_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .map(|id| id.chars().take(APPOINTMENT_REF_LEN).collect())
    }

    pub fn reference_notice(&self) -> Option<String> {
        self.appointment_reference()
            .map(|r| format!("This conversation will reference appointment #{}", r))
    }

    /// Build a ticket, rejecting whitespace-only messages
    pub fn validate(&self) -> Result<SupportTicket, SupportError> {
        if self.message.trim().is_empty() {
            return Err(SupportError::EmptyMessage);
        }

        Ok(SupportTicket {
            id: uuid::Uuid::new_v4().to_string(),
            appointment_id: self.appointment_id.clone(),
            topic: self.topic,
            message: self.message.clone(),
            created_at: Utc::now(),
        })
    }

    /// Dialog submit: toast the outcome, close only on success.
    pub fn submit<N, F>(&self, notifier: &mut N, on_close: F) -> Result<SupportTicket, SupportError>
    where
        N: Notifier + ?Sized,
        F: FnOnce(),
    {
        match self.validate() {
            Ok(ticket) => {
                tracing::info!(
                    ticket = %ticket.id,
                    topic = ?ticket.topic,
                    appointment = ?ticket.appointment_id,
                    "Support request captured"
                );
                notifier.notify(Toast::success(SENT_CONFIRMATION));
                on_close();
                Ok(ticket)
            }
            Err(err) => {
                notifier.notify(Toast::error(EMPTY_MESSAGE_ERROR));
                Err(err)
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::{ToastLevel, ToastLog};

    #[test]
    fn test_blank_message_keeps_dialog_open() {
        let request = SupportRequest {
            message: "   \n\t".to_string(),
            ..SupportRequest::default()
        };
        let mut toasts = ToastLog::new();
        let mut closed = false;

        let result = request.submit(&mut toasts, || closed = true);

        assert_eq!(result, Err(SupportError::EmptyMessage));
        assert!(!closed);
        let toast = toasts.latest().unwrap();
        assert_eq!(toast.level, ToastLevel::Error);
        assert_eq!(toast.message, EMPTY_MESSAGE_ERROR);
    }

    #[test]
    fn test_valid_message_sends_and_closes() {
        let request = SupportRequest {
            appointment_id: Some("a1b2c3d4-e5f6-7890".to_string()),
            topic: SupportTopic::Reschedule,
            message: "Can I move this to Friday?".to_string(),
        };
        let mut toasts = ToastLog::new();
        let mut closed = false;

        let ticket = request.submit(&mut toasts, || closed = true).unwrap();

        assert!(closed);
        assert_eq!(ticket.topic, SupportTopic::Reschedule);
        assert!(uuid::Uuid::parse_str(&ticket.id).is_ok());
        assert_eq!(toasts.latest().unwrap().message, SENT_CONFIRMATION);
        assert_eq!(toasts.latest().unwrap().level, ToastLevel::Success);
    }

    #[test]
    fn test_appointment_reference_truncates() {
        let request = SupportRequest::for_appointment("a1b2c3d4-e5f6-7890");
        assert_eq!(request.appointment_reference().as_deref(), Some("a1b2c3d4"));
        assert_eq!(
            request.reference_notice().as_deref(),
            Some("This conversation will reference appointment #a1b2c3d4")
        );

        let short = SupportRequest::for_appointment("42");
        assert_eq!(short.appointment_reference().as_deref(), Some("42"));

        assert_eq!(SupportRequest::default().reference_notice(), None);
        assert_eq!(SupportRequest::for_appointment("").appointment_reference(), None);
    }

    #[test]
    fn test_topic_defaults_and_cycles() {
        assert_eq!(SupportTopic::default(), SupportTopic::Question);
        assert_eq!(SupportTopic::Question.next(), SupportTopic::Billing);
        assert_eq!(SupportTopic::Other.next(), SupportTopic::Question);
        assert_eq!(SupportTopic::Technical.label(), "Technical Problem");
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: SupportRequest =
            serde_json::from_str(r#"{"topic": "billing", "message": "Charged twice"}"#).unwrap();
        assert_eq!(request.topic, SupportTopic::Billing);
        assert_eq!(request.appointment_id, None);
    }
}
