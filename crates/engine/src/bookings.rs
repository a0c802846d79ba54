//! Booking primitives.
//!
//! A `Booking` claims a set of slot labels on one space for one calendar day
//! and carries the financial record for that claim. Bookings are never
//! deleted; cancellation flips the status and records a refund.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine, payment::PaymentMode, slots::SlotSet, spaces::SpaceDisplay,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Booked,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Booked => "Booked",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl TryFrom<&str> for BookingStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "Booked" => Ok(Self::Booked),
            "Cancelled" => Ok(Self::Cancelled),
            other => Err(EngineError::Validation(format!(
                "invalid booking status: {other}"
            ))),
        }
    }
}

/// Who the booking is for. The customer is not a user account.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub mobile: String,
    pub email: Option<String>,
}

impl Customer {
    fn validate(&self) -> ResultEngine<()> {
        if self.name.trim().is_empty() {
            return Err(EngineError::Validation(
                "customer name is required".to_string(),
            ));
        }
        if self.mobile.trim().is_empty() {
            return Err(EngineError::Validation(
                "customer mobile is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: String,
    pub space_id: String,
    pub date: NaiveDate,
    pub slots: SlotSet,
    pub customer: Customer,
    /// Gross amount for this booking.
    pub total_amount: f64,
    pub discount: f64,
    pub paid_amount: f64,
    pub payment_mode: PaymentMode,
    pub status: BookingStatus,
    pub refund_amount: f64,
    /// Correlates bookings created together in one batch.
    pub group_id: String,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: &str,
        space_id: &str,
        date: NaiveDate,
        slots: SlotSet,
        customer: Customer,
        total_amount: f64,
        discount: f64,
        paid_amount: f64,
        payment_mode: PaymentMode,
        group_id: String,
    ) -> ResultEngine<Self> {
        if slots.is_empty() {
            return Err(EngineError::Validation(
                "a booking needs at least one slot".to_string(),
            ));
        }
        customer.validate()?;
        for (label, value) in [
            ("totalAmount", total_amount),
            ("discount", discount),
            ("paidAmount", paid_amount),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::Validation(format!(
                    "{label} must be a non-negative number"
                )));
            }
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            space_id: space_id.to_string(),
            date,
            slots,
            customer,
            total_amount,
            discount,
            paid_amount,
            payment_mode,
            status: BookingStatus::Booked,
            refund_amount: 0.0,
            group_id,
            created_at: Utc::now(),
        })
    }

    /// Net collected: paid amount minus refund.
    #[must_use]
    pub fn net_paid(&self) -> f64 {
        self.paid_amount - self.refund_amount
    }
}

/// A booking with its space's display data resolved (the space may have been
/// deleted since; dangling references are tolerated).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingWithSpace {
    pub booking: Booking,
    pub space: Option<SpaceDisplay>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bookings")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub space_id: String,
    /// ISO date (`YYYY-MM-DD`); sorts lexicographically in date order.
    pub date: String,
    /// JSON array of slot labels.
    pub slots: String,
    pub customer_name: String,
    pub customer_mobile: String,
    pub customer_email: Option<String>,
    pub total_amount: f64,
    pub discount: f64,
    pub paid_amount: f64,
    /// Legacy string form, see [`PaymentMode::parse_legacy`].
    pub payment_mode: String,
    pub status: String,
    pub refund_amount: f64,
    pub group_id: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::spaces::Entity",
        from = "Column::SpaceId",
        to = "super::spaces::Column::Id"
    )]
    Space,
}

impl Related<super::spaces::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Space.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

impl From<&Booking> for ActiveModel {
    fn from(booking: &Booking) -> Self {
        Self {
            id: ActiveValue::Set(booking.id.to_string()),
            user_id: ActiveValue::Set(booking.user_id.clone()),
            space_id: ActiveValue::Set(booking.space_id.clone()),
            date: ActiveValue::Set(booking.date.format(DATE_FORMAT).to_string()),
            slots: ActiveValue::Set(booking.slots.to_json()),
            customer_name: ActiveValue::Set(booking.customer.name.clone()),
            customer_mobile: ActiveValue::Set(booking.customer.mobile.clone()),
            customer_email: ActiveValue::Set(booking.customer.email.clone()),
            total_amount: ActiveValue::Set(booking.total_amount),
            discount: ActiveValue::Set(booking.discount),
            paid_amount: ActiveValue::Set(booking.paid_amount),
            payment_mode: ActiveValue::Set(booking.payment_mode.legacy()),
            status: ActiveValue::Set(booking.status.as_str().to_string()),
            refund_amount: ActiveValue::Set(booking.refund_amount),
            group_id: ActiveValue::Set(booking.group_id.clone()),
            created_at: ActiveValue::Set(booking.created_at),
        }
    }
}

impl TryFrom<Model> for Booking {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("booking not exists".to_string()))?,
            user_id: model.user_id,
            space_id: model.space_id,
            date: NaiveDate::parse_from_str(&model.date, DATE_FORMAT)
                .map_err(|_| EngineError::Validation(format!("invalid date: {}", model.date)))?,
            slots: SlotSet::from_json(&model.slots)?,
            customer: Customer {
                name: model.customer_name,
                mobile: model.customer_mobile,
                email: model.customer_email,
            },
            total_amount: model.total_amount,
            discount: model.discount,
            paid_amount: model.paid_amount,
            payment_mode: PaymentMode::parse_legacy(&model.payment_mode),
            status: BookingStatus::try_from(model.status.as_str())?,
            refund_amount: model.refund_amount,
            group_id: model.group_id,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(labels: &[&str]) -> SlotSet {
        SlotSet::new(labels.iter().map(|s| ToString::to_string(s))).unwrap()
    }

    fn customer() -> Customer {
        Customer {
            name: "Ravi".to_string(),
            mobile: "9999999999".to_string(),
            email: None,
        }
    }

    #[test]
    fn new_booking_starts_booked_without_refund() {
        let booking = Booking::new(
            "alice",
            "space-1",
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            slots(&["06:00-07:00"]),
            customer(),
            1000.0,
            0.0,
            500.0,
            PaymentMode::Cash,
            "g1".to_string(),
        )
        .unwrap();
        assert_eq!(booking.status, BookingStatus::Booked);
        assert_eq!(booking.refund_amount, 0.0);
        assert_eq!(booking.net_paid(), 500.0);
    }

    #[test]
    fn empty_slot_set_is_rejected() {
        let err = Booking::new(
            "alice",
            "space-1",
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            SlotSet::default(),
            customer(),
            1000.0,
            0.0,
            0.0,
            PaymentMode::Cash,
            "g1".to_string(),
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn model_round_trip_preserves_payment_mode() {
        let booking = Booking::new(
            "alice",
            "space-1",
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            slots(&["06:00-07:00", "07:00-08:00"]),
            customer(),
            1000.0,
            100.0,
            500.0,
            PaymentMode::Split(vec![("Cash".to_string(), 300.0), ("UPI".to_string(), 200.0)]),
            "g1".to_string(),
        )
        .unwrap();

        let model = Model {
            id: booking.id.to_string(),
            user_id: booking.user_id.clone(),
            space_id: booking.space_id.clone(),
            date: booking.date.format(DATE_FORMAT).to_string(),
            slots: booking.slots.to_json(),
            customer_name: booking.customer.name.clone(),
            customer_mobile: booking.customer.mobile.clone(),
            customer_email: None,
            total_amount: booking.total_amount,
            discount: booking.discount,
            paid_amount: booking.paid_amount,
            payment_mode: booking.payment_mode.legacy(),
            status: booking.status.as_str().to_string(),
            refund_amount: booking.refund_amount,
            group_id: booking.group_id.clone(),
            created_at: booking.created_at,
        };
        let parsed = Booking::try_from(model).unwrap();
        assert_eq!(parsed, booking);
    }
}
