//! Email notifications
//!
//! Sends are fire-and-forget: each email is dispatched on its own task and a
//! failure is only logged.

mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::booking::Booking;
use crate::Result;

pub use smtp::SmtpMailer;

/// Display name every email is sent from
pub const SENDER_NAME: &str = "Stay Vista";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
}

impl Email {
    pub fn welcome(to: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: "Welcome to Stay Vista".to_string(),
            html: "<p>Hope you will find your destination.</p>".to_string(),
        }
    }

    pub fn booking_confirmed(booking: &Booking) -> Self {
        Self {
            to: booking.guest.email.clone(),
            subject: "Booking Successful".to_string(),
            html: format!(
                "<p>You have successfully booked {} through Stay Vista.</p><p>Transaction Id: {}</p>",
                escape_html(&booking.details.title),
                escape_html(&booking.transaction_id)
            ),
        }
    }

    pub fn room_booked(booking: &Booking) -> Self {
        let guest = booking
            .guest
            .name
            .as_deref()
            .unwrap_or(booking.guest.email.as_str());
        Self {
            to: booking.host.email.clone(),
            subject: "Your room got booked".to_string(),
            html: format!(
                "<p>{} has been booked.</p><p>Get ready to welcome {}.</p>",
                escape_html(&booking.details.title),
                escape_html(guest)
            ),
        }
    }
}

/// Escape text interpolated into an HTML body
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<()>;

    /// Check that the relay accepts connections
    async fn verify(&self) -> Result<()> {
        Ok(())
    }
}

/// Mailer that only logs, used when no relay is configured
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<()> {
        info!(to = %email.to, subject = %email.subject, "Email relay not configured, skipping send");
        Ok(())
    }
}

/// Dispatches emails without blocking the caller
#[derive(Clone)]
pub struct Notifier {
    mailer: Arc<dyn Mailer>,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    pub fn log_only() -> Self {
        Self::new(Arc::new(LogMailer))
    }

    /// Send `email` on a detached task
    pub fn dispatch(&self, email: Email) -> JoinHandle<()> {
        let mailer = Arc::clone(&self.mailer);
        tokio::spawn(async move {
            match mailer.send(&email).await {
                Ok(()) => info!(to = %email.to, subject = %email.subject, "Email sent"),
                Err(err) => warn!(to = %email.to, subject = %email.subject, "Email failed: {}", err),
            }
        })
    }

    /// Notify guest and host about a confirmed booking
    pub fn booking_confirmed(&self, booking: &Booking) {
        self.dispatch(Email::booking_confirmed(booking));
        self.dispatch(Email::room_booked(booking));
    }

    /// Verify the relay connection, logging the outcome
    pub async fn verify(&self) {
        match self.mailer.verify().await {
            Ok(()) => info!("Email relay is ready to take messages"),
            Err(err) => warn!("Email relay verification failed: {}", err),
        }
    }
}
