use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Payment methods accepted over the wire.
///
/// `Split` requests must also supply `payment_details` with the per-method
/// breakdown; views render the stored legacy string instead.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Cash,
    #[serde(rename = "UPI")]
    Upi,
    Card,
    Split,
}

/// One entry of a split-payment breakdown. Order is meaningful: the
/// synthesized descriptor joins entries in the order supplied.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaymentPart {
    pub method: String,
    pub amount: f64,
}

pub mod booking {
    use super::*;

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CustomerInfo {
        pub customer_name: String,
        pub customer_mobile: String,
        pub customer_email: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BookingNew {
        pub space: String,
        /// ISO date (`YYYY-MM-DD`).
        pub date: NaiveDate,
        pub slots: Vec<String>,
        #[serde(flatten)]
        pub customer: CustomerInfo,
        pub total_amount: f64,
        pub discount: Option<f64>,
        pub paid_amount: Option<f64>,
        pub payment_mode: Option<PaymentMethod>,
        pub payment_details: Option<Vec<PaymentPart>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BatchItem {
        pub space: String,
        pub date: NaiveDate,
        pub slots: Vec<String>,
        /// Gross amount for this item.
        pub amount: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BookingBatchNew {
        pub items: Vec<BatchItem>,
        #[serde(flatten)]
        pub customer: CustomerInfo,
        /// Batch gross total; used in the confirmation mail. Falls back to
        /// the sum of item amounts when absent.
        pub total_amount: Option<f64>,
        pub discount: Option<f64>,
        pub paid_amount: Option<f64>,
        pub payment_mode: Option<PaymentMethod>,
        pub payment_details: Option<Vec<PaymentPart>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BookingCancel {
        pub refund_amount: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PaymentSettle {
        pub amount: f64,
        pub payment_mode: Option<PaymentMethod>,
        pub payment_details: Option<Vec<PaymentPart>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BookingListQuery {
        pub date: Option<NaiveDate>,
    }

    /// Space display data resolved onto a booking view; `None` when the
    /// referenced space no longer exists.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SpaceRef {
        pub id: String,
        pub name: String,
        pub price_per_hour: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BookingView {
        pub id: Uuid,
        pub space: Option<SpaceRef>,
        pub space_id: String,
        pub date: NaiveDate,
        pub slots: Vec<String>,
        #[serde(flatten)]
        pub customer: CustomerInfo,
        pub total_amount: f64,
        pub discount: f64,
        pub paid_amount: f64,
        /// Legacy string form, e.g. `"Cash"` or `"Split (Cash: 300, UPI: 200)"`.
        pub payment_mode: String,
        pub status: String,
        pub refund_amount: f64,
        pub group_id: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod space {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SpaceNew {
        pub name: String,
        pub price_per_hour: f64,
        /// Slot label -> price, overriding the hourly default.
        pub custom_rates: Option<BTreeMap<String, f64>>,
    }

    /// Sparse update: absent fields keep their stored value. A present zero
    /// price is applied.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SpacePatch {
        pub name: Option<String>,
        pub price_per_hour: Option<f64>,
        pub custom_rates: Option<BTreeMap<String, f64>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SpaceView {
        pub id: String,
        pub name: String,
        pub price_per_hour: f64,
        pub custom_rates: BTreeMap<String, f64>,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseNew {
        pub title: String,
        pub amount: f64,
        pub category: String,
        pub date: NaiveDate,
        /// `Cash` or `UPI`; defaults to `Cash`.
        pub payment_mode: Option<PaymentMethod>,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseView {
        pub id: Uuid,
        pub title: String,
        pub amount: f64,
        pub category: String,
        pub date: NaiveDate,
        pub payment_mode: String,
        pub note: Option<String>,
        pub created_at: DateTime<Utc>,
    }
}

pub mod stats {
    use super::*;
    use crate::{booking::BookingView, expense::ExpenseView};

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StatsQuery {
        pub start_date: Option<NaiveDate>,
        pub end_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BookingTotals {
        pub total_bookings: u64,
        pub gross_booking_amount: f64,
        pub total_discount: f64,
        pub total_paid: f64,
        pub cash_collection: f64,
        pub upi_collection: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ExpenseTotals {
        pub total_expenses: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct FinancialTotals {
        pub outstanding: f64,
        pub net_balance: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RawData {
        pub bookings: Vec<BookingView>,
        pub expenses: Vec<ExpenseView>,
    }

    /// The stats report: aggregates plus raw records for drill-down.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StatsResponse {
        pub bookings: BookingTotals,
        pub expenses: ExpenseTotals,
        pub financials: FinancialTotals,
        pub raw_data: RawData,
    }
}
