//! Report aggregation over bookings and expenses.
//!
//! All bookings in range contribute regardless of status; cancelled bookings
//! stay in the gross/discount/paid sums (their refunds already reduce the
//! net-paid figure). Collection buckets are attributed by payment mode; for
//! split payments the literal sub-amounts of the stored breakdown are used,
//! which can diverge from net-paid when a refund exists on a split booking.

use serde::{Deserialize, Serialize};

use crate::{
    bookings::BookingWithSpace,
    expenses::Expense,
    payment::PaymentMode,
};

/// Aggregates plus the raw matching records for client-side drill-down.
///
/// Monetary aggregates are rounded to 2 decimals for presentation; the raw
/// records keep their stored values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatsReport {
    pub total_bookings: u64,
    pub gross_booking_amount: f64,
    pub total_discount: f64,
    /// Net collected after refunds.
    pub total_paid: f64,
    pub cash_collection: f64,
    pub upi_collection: f64,
    pub total_expenses: f64,
    /// `gross_booking_amount - total_paid`.
    pub outstanding: f64,
    /// `total_paid - total_expenses`.
    pub net_balance: f64,
    pub bookings: Vec<BookingWithSpace>,
    pub expenses: Vec<Expense>,
}

/// Rounds to 2 decimal places, half away from zero.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub(crate) fn aggregate(bookings: Vec<BookingWithSpace>, expenses: Vec<Expense>) -> StatsReport {
    let mut gross = 0.0;
    let mut discount = 0.0;
    let mut paid = 0.0;
    let mut cash = 0.0;
    let mut upi = 0.0;

    for entry in &bookings {
        let booking = &entry.booking;
        gross += booking.total_amount;
        discount += booking.discount;

        let net_paid = booking.net_paid();
        paid += net_paid;

        match &booking.payment_mode {
            PaymentMode::Cash => cash += net_paid,
            PaymentMode::Upi => upi += net_paid,
            PaymentMode::Split(_) => {
                if let Some(amount) = booking.payment_mode.split_amount("Cash") {
                    cash += amount;
                }
                if let Some(amount) = booking.payment_mode.split_amount("UPI") {
                    upi += amount;
                }
            }
            PaymentMode::Card | PaymentMode::Other(_) => {}
        }
    }

    let total_expenses: f64 = expenses.iter().map(|e| e.amount).sum();
    let outstanding = gross - paid;
    let net_balance = paid - total_expenses;

    StatsReport {
        total_bookings: bookings.len() as u64,
        gross_booking_amount: round2(gross),
        total_discount: round2(discount),
        total_paid: round2(paid),
        cash_collection: round2(cash),
        upi_collection: round2(upi),
        total_expenses: round2(total_expenses),
        outstanding: round2(outstanding),
        net_balance: round2(net_balance),
        bookings,
        expenses,
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::{
        bookings::{Booking, Customer},
        slots::SlotSet,
    };

    fn booking(total: f64, discount: f64, paid: f64, mode: PaymentMode) -> BookingWithSpace {
        let booking = Booking::new(
            "alice",
            "space-1",
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            SlotSet::new(vec!["06:00-07:00".to_string()]).unwrap(),
            Customer {
                name: "Ravi".to_string(),
                mobile: "9999999999".to_string(),
                email: None,
            },
            total,
            discount,
            paid,
            mode,
            "g1".to_string(),
        )
        .unwrap();
        BookingWithSpace {
            booking,
            space: None,
        }
    }

    fn expense(amount: f64) -> Expense {
        Expense::new(
            "alice",
            "Water".to_string(),
            amount,
            "Maintenance".to_string(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            PaymentMode::Cash,
            None,
        )
        .unwrap()
    }

    #[test]
    fn single_cash_booking_and_expense() {
        let report = aggregate(
            vec![booking(1000.0, 100.0, 900.0, PaymentMode::Cash)],
            vec![expense(200.0)],
        );
        assert_eq!(report.total_bookings, 1);
        assert_eq!(report.gross_booking_amount, 1000.0);
        assert_eq!(report.total_paid, 900.0);
        assert_eq!(report.cash_collection, 900.0);
        assert_eq!(report.upi_collection, 0.0);
        assert_eq!(report.total_expenses, 200.0);
        assert_eq!(report.outstanding, 100.0);
        assert_eq!(report.net_balance, 700.0);
    }

    #[test]
    fn split_attribution_uses_stored_breakdown() {
        let mut entry = booking(
            600.0,
            0.0,
            500.0,
            PaymentMode::parse_legacy("Split (Cash: 300, UPI: 200)"),
        );
        // A refund lowers net-paid but not the split sub-amounts.
        entry.booking.refund_amount = 100.0;
        let report = aggregate(vec![entry], vec![]);
        assert_eq!(report.total_paid, 400.0);
        assert_eq!(report.cash_collection, 300.0);
        assert_eq!(report.upi_collection, 200.0);
    }

    #[test]
    fn cancelled_bookings_still_count() {
        let mut entry = booking(1000.0, 0.0, 500.0, PaymentMode::Cash);
        entry.booking.status = crate::bookings::BookingStatus::Cancelled;
        entry.booking.refund_amount = 500.0;
        let report = aggregate(vec![entry], vec![]);
        assert_eq!(report.total_bookings, 1);
        assert_eq!(report.gross_booking_amount, 1000.0);
        assert_eq!(report.total_paid, 0.0);
    }

    #[test]
    fn card_and_unknown_modes_hit_no_bucket() {
        let report = aggregate(
            vec![
                booking(100.0, 0.0, 100.0, PaymentMode::Card),
                booking(100.0, 0.0, 100.0, PaymentMode::Other("Cheque".to_string())),
            ],
            vec![],
        );
        assert_eq!(report.total_paid, 200.0);
        assert_eq!(report.cash_collection, 0.0);
        assert_eq!(report.upi_collection, 0.0);
    }

    #[test]
    fn presentation_rounding_only() {
        let report = aggregate(
            vec![
                booking(0.1, 0.0, 0.1, PaymentMode::Cash),
                booking(0.2, 0.0, 0.2, PaymentMode::Cash),
            ],
            vec![],
        );
        assert_eq!(report.total_paid, 0.3);
        assert_eq!(report.cash_collection, 0.3);
        // Raw records keep their stored values.
        assert_eq!(report.bookings[0].booking.paid_amount, 0.1);
    }
}
