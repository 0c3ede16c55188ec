use async_trait::async_trait;
use serde::Serialize;
use tripdesk_config::EmailSettings;
use tripdesk_db::models::{Booking, OfferType};

use super::NotifyError;

#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError>;
}

/// Transactional email over the provider's HTTP API, bearer-key auth.
pub struct HttpEmailClient {
    client: reqwest::Client,
    settings: EmailSettings,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
}

impl HttpEmailClient {
    pub fn new(settings: EmailSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            settings,
        }
    }
}

#[async_trait]
impl EmailSender for HttpEmailClient {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        self.client
            .post(&self.settings.endpoint)
            .bearer_auth(&self.settings.api_key)
            .json(&SendRequest {
                from: &self.settings.from,
                to: &message.to,
                subject: &message.subject,
                html: &message.html,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Server-side booking confirmation rendering.
pub fn booking_confirmation(booking: &Booking, base_url: &str) -> EmailMessage {
    let type_label = match booking.booking_type {
        OfferType::Hotel => "Hotel stay",
        OfferType::Flight => "Flight",
        OfferType::Transport => "Transport",
        OfferType::Activity => "Activity",
        OfferType::Package => "Travel package",
    };

    let mut details = format!(
        "<p><strong>{}</strong> &mdash; {}</p>\
         <p>Passengers: {}</p>\
         <p>Total: {:.2} {}</p>",
        booking.offer_name,
        type_label,
        booking.passengers.len(),
        booking.pricing.total,
        booking.pricing.currency,
    );
    if let Some(destination) = &booking.destination {
        details.push_str(&format!("<p>Destination: {destination}</p>"));
    }
    if let (Some(check_in), Some(check_out)) = (&booking.check_in, &booking.check_out) {
        details.push_str(&format!(
            "<p>Check-in: {check_in} &middot; Check-out: {check_out}</p>"
        ));
    }

    EmailMessage {
        to: booking.contact.email.clone(),
        subject: format!("Booking {} confirmed", booking.booking_number),
        html: format!(
            "<h2>Thank you, {}!</h2>\
             <p>Your booking <strong>{}</strong> is confirmed.</p>\
             {}\
             <p><a href=\"{}/bookings/{}\">View your booking</a></p>",
            booking.contact.name, booking.booking_number, details, base_url, booking.booking_number,
        ),
    }
}
