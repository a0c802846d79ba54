//! Booking confirmation mail.
//!
//! Dispatch is best-effort and fire-and-forget: the booking response never
//! waits for (or surfaces) the outcome. Failures are logged and swallowed.
//! Missing mail configuration or a missing customer address silently skips
//! the send.

use std::sync::Arc;

use engine::BookingWithSpace;
use serde::Serialize;

use crate::{CredentialCipher, user};

#[derive(Clone, Debug)]
pub struct MailSettings {
    /// HTTP mail relay accepting `{from, password, to, subject, text}`.
    pub relay_url: String,
}

/// Mail client submitting messages to an HTTP relay with the owner's own
/// outbound credentials.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    relay_url: String,
}

#[derive(Serialize)]
struct MailRequest<'a> {
    from: &'a str,
    password: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

impl HttpMailer {
    #[must_use]
    pub fn new(settings: MailSettings) -> Self {
        Self {
            client: reqwest::Client::new(),
            relay_url: settings.relay_url,
        }
    }

    async fn send(
        &self,
        from: &str,
        password: &str,
        to: &str,
        subject: &str,
        text: &str,
    ) -> Result<(), reqwest::Error> {
        self.client
            .post(&self.relay_url)
            .json(&MailRequest {
                from,
                password,
                to,
                subject,
                text,
            })
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Builds the confirmation subject and body for one or more items.
fn compose_confirmation(
    venue: &str,
    customer_name: &str,
    items: &[BookingWithSpace],
    total_amount: f64,
) -> (String, String) {
    let subject = format!("Booking Confirmed: {venue}");

    let details = items
        .iter()
        .map(|item| {
            let space_name = item
                .space
                .as_ref()
                .map_or("Turf", |space| space.name.as_str());
            format!(
                "Space: {space_name}\nDate: {}\nSlots: {}\n",
                item.booking.date, item.booking.slots
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let body = format!(
        "Hello {customer_name},\n\n\
         Your booking at {venue} is confirmed!\n\n\
         {details}\n\
         Total Amount: {total_amount}\n\n\
         Thank you!\n"
    );
    (subject, body)
}

/// Spawns a detached task that decrypts the owner's mail credentials and
/// sends the confirmation. At-most-once, best-effort; the caller gets no
/// signal back.
pub(crate) fn dispatch_confirmation(
    mailer: Option<Arc<HttpMailer>>,
    cipher: Arc<CredentialCipher>,
    owner: user::Model,
    items: Vec<BookingWithSpace>,
    total_amount: f64,
) {
    let Some(mailer) = mailer else { return };
    let Some(to) = items
        .first()
        .and_then(|item| item.booking.customer.email.clone())
    else {
        return;
    };
    let (Some(from), Some(encrypted)) = (owner.mail_address, owner.mail_password_enc) else {
        return;
    };
    let customer_name = match items.first() {
        Some(item) => item.booking.customer.name.clone(),
        None => return,
    };
    let venue = owner.venue_name.unwrap_or_else(|| owner.username.clone());

    tokio::spawn(async move {
        let Some(password) = cipher.decrypt(&encrypted) else {
            tracing::warn!("mail credentials for {} did not decrypt", owner.username);
            return;
        };
        let (subject, body) = compose_confirmation(&venue, &customer_name, &items, total_amount);
        if let Err(err) = mailer.send(&from, &password, &to, &subject, &body).await {
            tracing::warn!("confirmation mail to {to} failed: {err}");
        }
    });
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use engine::{Booking, Customer, PaymentMode, SlotSet, SpaceDisplay};

    use super::*;

    fn item(space: Option<&str>) -> BookingWithSpace {
        let booking = Booking::new(
            "alice",
            "space-1",
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            SlotSet::new(vec!["06:00-07:00".to_string(), "07:00-08:00".to_string()]).unwrap(),
            Customer {
                name: "Ravi".to_string(),
                mobile: "9999999999".to_string(),
                email: Some("ravi@example.com".to_string()),
            },
            1000.0,
            0.0,
            500.0,
            PaymentMode::Cash,
            "g1".to_string(),
        )
        .unwrap();
        BookingWithSpace {
            booking,
            space: space.map(|name| SpaceDisplay {
                id: "space-1".to_string(),
                name: name.to_string(),
                price_per_hour: 1000.0,
            }),
        }
    }

    #[test]
    fn subject_names_the_venue() {
        let (subject, _) = compose_confirmation("Arena 5", "Ravi", &[item(Some("Turf A"))], 1000.0);
        assert_eq!(subject, "Booking Confirmed: Arena 5");
    }

    #[test]
    fn body_lists_every_item_and_the_total() {
        let (_, body) = compose_confirmation(
            "Arena 5",
            "Ravi",
            &[item(Some("Turf A")), item(Some("Turf B"))],
            2000.0,
        );
        assert!(body.contains("Hello Ravi,"));
        assert!(body.contains("Space: Turf A"));
        assert!(body.contains("Space: Turf B"));
        assert!(body.contains("Date: 2026-03-01"));
        assert!(body.contains("Slots: 06:00-07:00, 07:00-08:00"));
        assert!(body.contains("Total Amount: 2000"));
    }

    #[test]
    fn missing_space_falls_back_to_generic_name() {
        let (_, body) = compose_confirmation("Arena 5", "Ravi", &[item(None)], 1000.0);
        assert!(body.contains("Space: Turf"));
    }
}
