//! Appointment-booking agent.
//!
//! The voice agent in the room drives a [`BookingSession`] through tool
//! calls. Each tool records its input, moves the session to the next
//! [`BookingState`] and answers with the instruction the model follows next.
//! Speech, language model and audio stay with the hosted platform.

pub mod notify;

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, TimeZone};
use log::{info, warn};
use serde_derive::{Deserialize, Serialize};
use uuid::Uuid;

pub use notify::{Confirmation, Notifier, SmtpNotifier, notifier_from_config};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingState {
    Discovery,
    CollectInfo,
    Scheduling,
    Confirmation,
    Terminal,
}

impl fmt::Display for BookingState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BookingState::Discovery => "DISCOVERY",
            BookingState::CollectInfo => "COLLECT_INFO",
            BookingState::Scheduling => "SCHEDULING",
            BookingState::Confirmation => "CONFIRMATION",
            BookingState::Terminal => "TERMINAL",
        };
        f.write_str(name)
    }
}

/// System prompt for the booking agent, anchored to `now` so the model can
/// resolve relative dates like "next Tuesday".
pub fn agent_instructions<Tz>(now: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let now = now.format("%A, %B %d, %Y at %I:%M %p");
    format!(
        "You are an Appointment Assistant following a strict state machine.
1. Wait for intent -> Call start_booking.
2. Ask Name/Email -> Call save_contact_details.
    - The email and name MUST be spelt out clearly FOR better accuracy.
    - Confirm the details back to the user before proceeding.
3. Ask Time -> Call save_time.
    - If the user says tomorrow, next Monday, etc., convert to exact date/time.
    - CURRENT DATE/TIME: {now} (Use this to calculate relative dates like 'next Tuesday, tomorrow').
    - Confirm the time back to the user before proceeding.
4. Confirm -> Call finalize_booking.
If user says NO at step 4, go back to step 3."
    )
}

/// A tool invocation as the language model emits it, e.g.
/// `{"tool":"save_time","arguments":{"time":"Friday 9 AM"}}`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "tool", content = "arguments", rename_all = "snake_case")]
pub enum ToolCall {
    StartBooking,
    SaveContactDetails { name: String, email: String },
    SaveTime { time: String },
    FinalizeBooking { confirmed: bool },
}

/// Per-room booking conversation.
pub struct BookingSession {
    id: Uuid,
    room: String,
    state: BookingState,
    name: Option<String>,
    email: Option<String>,
    time: Option<String>,
    notifier: Arc<dyn Notifier>,
}

impl BookingSession {
    pub fn new(room: impl Into<String>, notifier: Arc<dyn Notifier>) -> Self {
        let session = Self {
            id: Uuid::new_v4(),
            room: room.into(),
            state: BookingState::Discovery,
            name: None,
            email: None,
            time: None,
            notifier,
        };
        info!("Session {} started for Room: {}", session.id, session.room);
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> BookingState {
        self.state
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn time(&self) -> Option<&str> {
        self.time.as_deref()
    }

    fn transition(&mut self, to: BookingState) {
        info!("[{}] TRANSITION: {} -> {}", self.id, self.state, to);
        self.state = to;
    }

    /// The user wants to book.
    pub fn start_booking(&mut self) -> String {
        self.transition(BookingState::CollectInfo);
        "Intent received. Now ask for their Name and Email.".to_string()
    }

    pub fn save_contact_details(&mut self, name: impl Into<String>, email: impl Into<String>) -> String {
        self.name = Some(name.into());
        self.email = Some(email.into());
        self.transition(BookingState::Scheduling);
        "Contact saved. Now ask for the preferred Date and Time.".to_string()
    }

    pub fn save_time(&mut self, time: impl Into<String>) -> String {
        let time = time.into();
        let reply = format!(
            "Time saved: {}. Now read ALL details back and ask 'Is this correct?'",
            time
        );
        self.time = Some(time);
        self.transition(BookingState::Confirmation);
        reply
    }

    /// Confirmed bookings send the confirmation and end the conversation;
    /// a declined one goes back to scheduling.
    pub async fn finalize_booking(&mut self, confirmed: bool) -> String {
        if !confirmed {
            info!("[{}] FALLBACK: {} -> {}", self.id, self.state, BookingState::Scheduling);
            self.state = BookingState::Scheduling;
            return "User declined. Apologize and ask for the correct Date/Time again.".to_string();
        }

        self.send_confirmation().await;
        self.transition(BookingState::Terminal);
        "Booking Confirmed. Email sent. Say goodbye.".to_string()
    }

    /// Route a tool call to its handler and return the reply for the model.
    pub async fn dispatch(&mut self, call: ToolCall) -> String {
        match call {
            ToolCall::StartBooking => self.start_booking(),
            ToolCall::SaveContactDetails { name, email } => self.save_contact_details(name, email),
            ToolCall::SaveTime { time } => self.save_time(time),
            ToolCall::FinalizeBooking { confirmed } => self.finalize_booking(confirmed).await,
        }
    }

    /// Returns whether the confirmation went out. Failures never reach the
    /// conversation.
    async fn send_confirmation(&self) -> bool {
        let Some(email) = self.email.as_deref() else {
            warn!("[{}] no email collected, skipping confirmation", self.id);
            return false;
        };

        let confirmation = Confirmation::compose(
            email,
            self.name.as_deref().unwrap_or_default(),
            self.time.as_deref().unwrap_or_default(),
        );

        match self.notifier.send(&confirmation).await {
            Ok(()) => true,
            Err(e) => {
                warn!("[{}] Email Failed: {}", self.id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Result;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Outbox {
        sent: Mutex<Vec<Confirmation>>,
        fail: bool,
    }

    #[async_trait]
    impl Notifier for Outbox {
        async fn send(&self, confirmation: &Confirmation) -> Result<()> {
            if self.fail {
                return Err("smtp unavailable".into());
            }
            self.sent.lock().unwrap().push(confirmation.clone());
            Ok(())
        }
    }

    fn session(outbox: Arc<Outbox>) -> BookingSession {
        let _ = env_logger::builder().is_test(true).try_init();
        BookingSession::new("test-room-22", outbox)
    }

    #[tokio::test]
    async fn happy_path_reaches_terminal_and_sends_mail() {
        let outbox = Arc::new(Outbox::default());
        let mut booking = session(outbox.clone());
        assert_eq!(booking.state(), BookingState::Discovery);

        booking.start_booking();
        assert_eq!(booking.state(), BookingState::CollectInfo);

        booking.save_contact_details("Ada", "ada@example.com");
        assert_eq!(booking.state(), BookingState::Scheduling);

        let reply = booking.save_time("Tuesday at 3 PM");
        assert!(reply.starts_with("Time saved: Tuesday at 3 PM."));
        assert_eq!(booking.state(), BookingState::Confirmation);

        let reply = booking.finalize_booking(true).await;
        assert_eq!(reply, "Booking Confirmed. Email sent. Say goodbye.");
        assert_eq!(booking.state(), BookingState::Terminal);

        let sent = outbox.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ada@example.com");
        assert!(sent[0].body.contains("Hello Ada,"));
        assert!(sent[0].body.contains("Tuesday at 3 PM"));
    }

    #[tokio::test]
    async fn declining_falls_back_to_scheduling() {
        let outbox = Arc::new(Outbox::default());
        let mut booking = session(outbox.clone());
        booking.start_booking();
        booking.save_contact_details("Ada", "ada@example.com");
        booking.save_time("tomorrow noon");

        let reply = booking.finalize_booking(false).await;
        assert!(reply.starts_with("User declined."));
        assert_eq!(booking.state(), BookingState::Scheduling);
        assert!(outbox.sent.lock().unwrap().is_empty());

        booking.save_time("Friday 9 AM");
        assert_eq!(booking.time(), Some("Friday 9 AM"));
        assert_eq!(booking.state(), BookingState::Confirmation);
    }

    #[tokio::test]
    async fn mail_failure_still_terminates() {
        let outbox = Arc::new(Outbox {
            fail: true,
            ..Outbox::default()
        });
        let mut booking = session(outbox);
        booking.save_contact_details("Ada", "ada@example.com");
        booking.save_time("Friday 9 AM");
        booking.finalize_booking(true).await;
        assert_eq!(booking.state(), BookingState::Terminal);
    }

    #[tokio::test]
    async fn dispatch_routes_json_tool_calls() {
        let outbox = Arc::new(Outbox::default());
        let mut booking = session(outbox.clone());
        let calls = [
            r#"{"tool":"start_booking"}"#,
            r#"{"tool":"save_contact_details","arguments":{"name":"Ada","email":"ada@example.com"}}"#,
            r#"{"tool":"save_time","arguments":{"time":"Friday 9 AM"}}"#,
            r#"{"tool":"finalize_booking","arguments":{"confirmed":true}}"#,
        ];

        let mut replies = Vec::new();
        for raw in calls {
            let call: ToolCall = serde_json::from_str(raw).unwrap();
            replies.push(booking.dispatch(call).await);
        }

        assert_eq!(replies[0], "Intent received. Now ask for their Name and Email.");
        assert_eq!(booking.name(), Some("Ada"));
        assert_eq!(booking.email(), Some("ada@example.com"));
        assert_eq!(booking.state(), BookingState::Terminal);
        assert_eq!(outbox.sent.lock().unwrap().len(), 1);
    }

    #[test]
    fn unknown_tool_is_rejected() {
        assert!(serde_json::from_str::<ToolCall>(r#"{"tool":"cancel_everything"}"#).is_err());
    }

    #[test]
    fn instructions_embed_the_current_date() {
        let now = Utc.with_ymd_and_hms(2026, 10, 18, 14, 5, 0).unwrap();
        let prompt = agent_instructions(&now);
        assert!(prompt.contains("CURRENT DATE/TIME: Sunday, October 18, 2026 at 02:05 PM"));
    }

    #[test]
    fn states_serialize_in_upper_snake_case() {
        assert_eq!(
            serde_json::to_string(&BookingState::CollectInfo).unwrap(),
            "\"COLLECT_INFO\""
        );
        assert_eq!(BookingState::CollectInfo.to_string(), "COLLECT_INFO");
    }
}
