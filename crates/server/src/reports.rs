//! Reports API endpoints

use api_types::stats::{
    BookingTotals, ExpenseTotals, FinancialTotals, RawData, StatsQuery, StatsResponse,
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use crate::{ServerError, bookings, expenses, server::ServerState, user};

pub async fn stats(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, ServerError> {
    // The range applies only when both bounds are given; a lone bound is
    // ignored and the report covers everything.
    let range = match (query.start_date, query.end_date) {
        (Some(from), Some(to)) => Some((from, to)),
        _ => None,
    };

    let report = state.engine.compute_stats(&user.username, range).await?;

    Ok(Json(StatsResponse {
        bookings: BookingTotals {
            total_bookings: report.total_bookings,
            gross_booking_amount: report.gross_booking_amount,
            total_discount: report.total_discount,
            total_paid: report.total_paid,
            cash_collection: report.cash_collection,
            upi_collection: report.upi_collection,
        },
        expenses: ExpenseTotals {
            total_expenses: report.total_expenses,
        },
        financials: FinancialTotals {
            outstanding: report.outstanding,
            net_balance: report.net_balance,
        },
        raw_data: RawData {
            bookings: report.bookings.into_iter().map(bookings::map_view).collect(),
            expenses: report.expenses.into_iter().map(expenses::map_view).collect(),
        },
    }))
}
