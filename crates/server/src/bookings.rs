//! Bookings API endpoints

use api_types::{
    PaymentMethod, PaymentPart,
    booking::{
        BookingBatchNew, BookingCancel, BookingListQuery, BookingNew, BookingView, CustomerInfo,
        PaymentSettle, SpaceRef,
    },
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{Booking, BookingWithSpace, Customer, PaymentMode, SlotSet};
use uuid::Uuid;

use crate::{ServerError, notify, server::ServerState, user};

/// Resolves the wire payment mode. `Split` requires the per-method
/// breakdown; the other modes ignore it.
pub(crate) fn resolve_payment_mode(
    mode: Option<PaymentMethod>,
    details: Option<Vec<PaymentPart>>,
) -> Result<PaymentMode, ServerError> {
    match mode.unwrap_or(PaymentMethod::Cash) {
        PaymentMethod::Cash => Ok(PaymentMode::Cash),
        PaymentMethod::Upi => Ok(PaymentMode::Upi),
        PaymentMethod::Card => Ok(PaymentMode::Card),
        PaymentMethod::Split => {
            let parts = details.filter(|parts| !parts.is_empty()).ok_or_else(|| {
                ServerError::Generic(
                    "paymentDetails is required for split payments".to_string(),
                )
            })?;
            Ok(PaymentMode::Split(
                parts.into_iter().map(|p| (p.method, p.amount)).collect(),
            ))
        }
    }
}

fn map_customer(customer: CustomerInfo) -> Customer {
    Customer {
        name: customer.customer_name,
        mobile: customer.customer_mobile,
        email: customer
            .customer_email
            .filter(|email| !email.trim().is_empty()),
    }
}

pub(crate) fn map_view(enriched: BookingWithSpace) -> BookingView {
    let BookingWithSpace { booking, space } = enriched;
    view_parts(booking, space.map(|s| SpaceRef {
        id: s.id,
        name: s.name,
        price_per_hour: s.price_per_hour,
    }))
}

fn view_parts(booking: Booking, space: Option<SpaceRef>) -> BookingView {
    BookingView {
        id: booking.id,
        space,
        space_id: booking.space_id,
        date: booking.date,
        slots: booking.slots.into(),
        customer: CustomerInfo {
            customer_name: booking.customer.name,
            customer_mobile: booking.customer.mobile,
            customer_email: booking.customer.email,
        },
        total_amount: booking.total_amount,
        discount: booking.discount,
        paid_amount: booking.paid_amount,
        payment_mode: booking.payment_mode.legacy(),
        status: booking.status.as_str().to_string(),
        refund_amount: booking.refund_amount,
        group_id: booking.group_id,
        created_at: booking.created_at,
    }
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BookingNew>,
) -> Result<(StatusCode, Json<BookingView>), ServerError> {
    let payment_mode = resolve_payment_mode(payload.payment_mode, payload.payment_details)?;
    let slots = SlotSet::new(payload.slots)?;

    let created = state
        .engine
        .create_booking(engine::NewBooking {
            user_id: user.username.clone(),
            space_id: payload.space,
            date: payload.date,
            slots,
            customer: map_customer(payload.customer),
            total_amount: payload.total_amount,
            discount: payload.discount.unwrap_or(0.0),
            paid_amount: payload.paid_amount.unwrap_or(0.0),
            payment_mode,
        })
        .await?;

    let total = created.booking.total_amount;
    notify::dispatch_confirmation(
        state.mailer.clone(),
        state.cipher.clone(),
        user,
        vec![created.clone()],
        total,
    );

    Ok((StatusCode::CREATED, Json(map_view(created))))
}

pub async fn create_batch(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BookingBatchNew>,
) -> Result<(StatusCode, Json<Vec<BookingView>>), ServerError> {
    let payment_mode = resolve_payment_mode(payload.payment_mode, payload.payment_details)?;

    let mut items = Vec::with_capacity(payload.items.len());
    for item in payload.items {
        items.push(engine::BatchItem {
            space_id: item.space,
            date: item.date,
            slots: SlotSet::new(item.slots)?,
            amount: item.amount,
        });
    }
    let gross_total = payload
        .total_amount
        .unwrap_or_else(|| items.iter().map(|item| item.amount).sum());

    let created = state
        .engine
        .create_booking_batch(engine::NewBookingBatch {
            user_id: user.username.clone(),
            items,
            customer: map_customer(payload.customer),
            discount: payload.discount.unwrap_or(0.0),
            paid_amount: payload.paid_amount.unwrap_or(0.0),
            payment_mode,
        })
        .await?;

    notify::dispatch_confirmation(
        state.mailer.clone(),
        state.cipher.clone(),
        user,
        created.clone(),
        gross_total,
    );

    Ok((
        StatusCode::CREATED,
        Json(created.into_iter().map(map_view).collect()),
    ))
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<BookingView>>, ServerError> {
    let bookings = state.engine.list_bookings(&user.username, query.date).await?;
    Ok(Json(bookings.into_iter().map(map_view).collect()))
}

pub async fn get(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>, ServerError> {
    let booking = state.engine.booking(&user.username, id).await?;
    Ok(Json(map_view(booking)))
}

pub async fn cancel(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BookingCancel>,
) -> Result<Json<BookingView>, ServerError> {
    state
        .engine
        .cancel_booking(&user.username, id, payload.refund_amount)
        .await?;

    let cancelled = state.engine.booking(&user.username, id).await?;
    Ok(Json(map_view(cancelled)))
}

pub async fn settle(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<PaymentSettle>,
) -> Result<Json<BookingView>, ServerError> {
    let payment_mode = match payload.payment_mode {
        Some(mode) => Some(resolve_payment_mode(Some(mode), payload.payment_details)?),
        None => None,
    };

    state
        .engine
        .settle_payment(&user.username, id, payload.amount, payment_mode)
        .await?;

    let settled = state.engine.booking(&user.username, id).await?;
    Ok(Json(map_view(settled)))
}
