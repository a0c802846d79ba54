use chrono::NaiveDate;
use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

pub use allocation::{Share, allocate};
pub use bookings::{Booking, BookingStatus, BookingWithSpace, Customer};
pub use error::EngineError;
pub use expenses::Expense;
pub use payment::PaymentMode;
pub use slots::SlotSet;
pub use spaces::{Space, SpaceDisplay, SpaceUpdate};
pub use stats::StatsReport;

mod allocation;
mod bookings;
mod error;
mod expenses;
mod payment;
mod slots;
mod spaces;
mod stats;

use bookings::DATE_FORMAT;

type ResultEngine<T> = Result<T, EngineError>;

/// A new single booking request.
#[derive(Clone, Debug)]
pub struct NewBooking {
    pub user_id: String,
    pub space_id: String,
    pub date: NaiveDate,
    pub slots: SlotSet,
    pub customer: Customer,
    pub total_amount: f64,
    pub discount: f64,
    pub paid_amount: f64,
    pub payment_mode: PaymentMode,
}

/// One item of a batch booking request.
#[derive(Clone, Debug)]
pub struct BatchItem {
    pub space_id: String,
    pub date: NaiveDate,
    pub slots: SlotSet,
    /// Gross amount for this item; drives the proportional allocation.
    pub amount: f64,
}

/// A batch booking request: several items booked together under one
/// financial transaction. Discount and paid amount are batch-level and get
/// allocated per item.
#[derive(Clone, Debug)]
pub struct NewBookingBatch {
    pub user_id: String,
    pub items: Vec<BatchItem>,
    pub customer: Customer,
    pub discount: f64,
    pub paid_amount: f64,
    pub payment_mode: PaymentMode,
}

/// A new expense record.
#[derive(Clone, Debug)]
pub struct NewExpense {
    pub user_id: String,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    pub payment_mode: PaymentMode,
    pub note: Option<String>,
}

/// The booking engine. Owns the database connection; all reads and writes go
/// through it.
///
/// Single-record operations authorise by owner. A record that does not exist
/// and a record owned by someone else both come back as
/// [`EngineError::KeyNotFound`].
#[derive(Clone, Debug)]
pub struct Engine {
    database: DatabaseConnection,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Returns the slot labels of `requested` already claimed by an active
    /// booking on `space_id`/`date`, or `None` when there is no overlap.
    ///
    /// Only bookings with status `Booked` count; cancelled bookings free
    /// their slots. An empty `requested` set never conflicts. `excluding`
    /// skips one booking id, for checks against a booking's own claim.
    pub async fn find_conflict(
        &self,
        space_id: &str,
        date: NaiveDate,
        requested: &SlotSet,
        excluding: Option<Uuid>,
    ) -> ResultEngine<Option<SlotSet>> {
        if requested.is_empty() {
            return Ok(None);
        }

        let active = bookings::Entity::find()
            .filter(bookings::Column::SpaceId.eq(space_id))
            .filter(bookings::Column::Date.eq(date.format(DATE_FORMAT).to_string()))
            .filter(bookings::Column::Status.eq(BookingStatus::Booked.as_str()))
            .all(&self.database)
            .await?;

        let excluding = excluding.map(|id| id.to_string());
        let mut overlap = SlotSet::default();
        for model in active {
            if excluding.as_deref() == Some(model.id.as_str()) {
                continue;
            }
            let claimed = SlotSet::from_json(&model.slots)?;
            overlap.extend(&requested.intersection(&claimed));
        }

        Ok((!overlap.is_empty()).then_some(overlap))
    }

    /// Creates one booking after a conflict check.
    ///
    /// The returned booking carries the space's display data. Notification
    /// is the caller's concern; the engine only persists.
    pub async fn create_booking(&self, new: NewBooking) -> ResultEngine<BookingWithSpace> {
        let booking = Booking::new(
            &new.user_id,
            &new.space_id,
            new.date,
            new.slots,
            new.customer,
            new.total_amount,
            new.discount,
            new.paid_amount,
            new.payment_mode,
            Uuid::new_v4().to_string(),
        )?;

        if let Some(overlap) = self
            .find_conflict(&booking.space_id, booking.date, &booking.slots, None)
            .await?
        {
            return Err(EngineError::Conflict {
                space_id: booking.space_id,
                date: booking.date,
                slots: overlap,
            });
        }

        bookings::ActiveModel::from(&booking)
            .insert(&self.database)
            .await?;

        let space = self.space_display(&booking.space_id).await?;
        Ok(BookingWithSpace { booking, space })
    }

    /// Creates a batch of bookings sharing one group id, all-or-nothing.
    ///
    /// Every item is conflict-checked before anything is written, both
    /// against persisted bookings and against earlier items of the same
    /// batch; the writes themselves run in one database transaction.
    /// Batch-level discount and paid amount are allocated per item
    /// proportionally to the item amounts (see [`allocate`]).
    pub async fn create_booking_batch(
        &self,
        new: NewBookingBatch,
    ) -> ResultEngine<Vec<BookingWithSpace>> {
        if new.items.is_empty() {
            return Err(EngineError::Validation(
                "batch must contain at least one item".to_string(),
            ));
        }

        let mut accepted: Vec<(&str, NaiveDate, &SlotSet)> = Vec::new();
        for item in &new.items {
            if item.slots.is_empty() {
                return Err(EngineError::Validation(
                    "a booking needs at least one slot".to_string(),
                ));
            }

            // Items of one batch can collide with each other, not only with
            // persisted bookings.
            let mut overlap = SlotSet::default();
            for (space_id, date, slots) in &accepted {
                if *space_id == item.space_id && *date == item.date {
                    overlap.extend(&item.slots.intersection(slots));
                }
            }
            if let Some(claimed) = self
                .find_conflict(&item.space_id, item.date, &item.slots, None)
                .await?
            {
                overlap.extend(&claimed);
            }
            if !overlap.is_empty() {
                return Err(EngineError::Conflict {
                    space_id: item.space_id.clone(),
                    date: item.date,
                    slots: overlap,
                });
            }
            accepted.push((&item.space_id, item.date, &item.slots));
        }

        let amounts: Vec<f64> = new.items.iter().map(|item| item.amount).collect();
        let shares = allocate(&amounts, new.discount, new.paid_amount);
        let group_id = Uuid::new_v4().to_string();

        let mut created = Vec::with_capacity(new.items.len());
        for (item, share) in new.items.into_iter().zip(shares) {
            created.push(Booking::new(
                &new.user_id,
                &item.space_id,
                item.date,
                item.slots,
                new.customer.clone(),
                item.amount,
                share.discount,
                share.paid,
                new.payment_mode.clone(),
                group_id.clone(),
            )?);
        }

        let db_tx = self.database.begin().await?;
        for booking in &created {
            bookings::ActiveModel::from(booking).insert(&db_tx).await?;
        }
        db_tx.commit().await?;

        let mut out = Vec::with_capacity(created.len());
        for booking in created {
            let space = self.space_display(&booking.space_id).await?;
            out.push(BookingWithSpace { booking, space });
        }
        Ok(out)
    }

    /// Returns one booking by id, enriched with space display data.
    pub async fn booking(&self, user_id: &str, booking_id: Uuid) -> ResultEngine<BookingWithSpace> {
        let (model, space_model) = bookings::Entity::find_by_id(booking_id.to_string())
            .find_also_related(spaces::Entity)
            .one(&self.database)
            .await?
            .filter(|(model, _)| model.user_id == user_id)
            .ok_or_else(|| EngineError::KeyNotFound("booking not exists".to_string()))?;

        with_space(model, space_model)
    }

    /// Lists the caller's bookings, optionally for one date.
    pub async fn list_bookings(
        &self,
        user_id: &str,
        date: Option<NaiveDate>,
    ) -> ResultEngine<Vec<BookingWithSpace>> {
        let mut query = bookings::Entity::find()
            .filter(bookings::Column::UserId.eq(user_id))
            .find_also_related(spaces::Entity);
        if let Some(date) = date {
            query = query.filter(bookings::Column::Date.eq(date.format(DATE_FORMAT).to_string()));
        }

        let rows = query.all(&self.database).await?;
        rows.into_iter()
            .map(|(model, space_model)| with_space(model, space_model))
            .collect()
    }

    /// Cancels a booking and records the refund (0 when unspecified).
    ///
    /// Cancelling an already-cancelled booking is permitted and re-sets the
    /// refund amount.
    pub async fn cancel_booking(
        &self,
        user_id: &str,
        booking_id: Uuid,
        refund_amount: Option<f64>,
    ) -> ResultEngine<Booking> {
        let refund = refund_amount.unwrap_or(0.0);
        if !refund.is_finite() || refund < 0.0 {
            return Err(EngineError::Validation(
                "refundAmount must be a non-negative number".to_string(),
            ));
        }

        let model = self.owned_booking(user_id, booking_id).await?;
        let update = bookings::ActiveModel {
            id: ActiveValue::Set(model.id.clone()),
            status: ActiveValue::Set(BookingStatus::Cancelled.as_str().to_string()),
            refund_amount: ActiveValue::Set(refund),
            ..Default::default()
        };
        let updated = update.update(&self.database).await?;
        Booking::try_from(updated)
    }

    /// Adds a payment to a booking; the amount accumulates, it never
    /// replaces. A supplied mode overwrites the stored one. Overpayment is
    /// allowed; reporting surfaces it as negative outstanding.
    pub async fn settle_payment(
        &self,
        user_id: &str,
        booking_id: Uuid,
        amount: f64,
        payment_mode: Option<PaymentMode>,
    ) -> ResultEngine<Booking> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(EngineError::Validation(
                "settlement amount must be positive".to_string(),
            ));
        }

        let model = self.owned_booking(user_id, booking_id).await?;
        let mut update = bookings::ActiveModel {
            id: ActiveValue::Set(model.id.clone()),
            paid_amount: ActiveValue::Set(model.paid_amount + amount),
            ..Default::default()
        };
        if let Some(mode) = payment_mode {
            update.payment_mode = ActiveValue::Set(mode.legacy());
        }
        let updated = update.update(&self.database).await?;
        Booking::try_from(updated)
    }

    /// Adds a new space owned by the user.
    pub async fn new_space(
        &self,
        user_id: &str,
        name: String,
        price_per_hour: f64,
        custom_rates: std::collections::BTreeMap<String, f64>,
    ) -> ResultEngine<Space> {
        let space = Space::new(user_id, name, price_per_hour, custom_rates)?;
        spaces::ActiveModel::from(&space)
            .insert(&self.database)
            .await?;
        Ok(space)
    }

    /// Lists the caller's spaces.
    pub async fn spaces(&self, user_id: &str) -> ResultEngine<Vec<Space>> {
        let models = spaces::Entity::find()
            .filter(spaces::Column::UserId.eq(user_id))
            .all(&self.database)
            .await?;
        models.into_iter().map(Space::try_from).collect()
    }

    /// Applies sparse overrides to a space; unset fields keep their value.
    pub async fn update_space(
        &self,
        user_id: &str,
        space_id: &str,
        update: SpaceUpdate,
    ) -> ResultEngine<Space> {
        let current = self.owned_space(user_id, space_id).await?;
        let merged = current.merged(update)?;
        spaces::ActiveModel::from(&merged)
            .update(&self.database)
            .await?;
        Ok(merged)
    }

    /// Deletes a space. Bookings referencing it are kept; they render
    /// without space display data from then on.
    pub async fn delete_space(&self, user_id: &str, space_id: &str) -> ResultEngine<()> {
        let space = self.owned_space(user_id, space_id).await?;
        spaces::Entity::delete_by_id(space.id)
            .exec(&self.database)
            .await?;
        Ok(())
    }

    /// Records a new expense.
    pub async fn new_expense(&self, new: NewExpense) -> ResultEngine<Expense> {
        let expense = Expense::new(
            &new.user_id,
            new.title,
            new.amount,
            new.category,
            new.date,
            new.payment_mode,
            new.note,
        )?;
        expenses::ActiveModel::from(&expense)
            .insert(&self.database)
            .await?;
        Ok(expense)
    }

    /// Lists the caller's expenses, newest date first.
    pub async fn expenses(&self, user_id: &str) -> ResultEngine<Vec<Expense>> {
        let models = expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user_id))
            .order_by_desc(expenses::Column::Date)
            .all(&self.database)
            .await?;
        models.into_iter().map(Expense::try_from).collect()
    }

    /// Aggregates the caller's bookings and expenses into a report,
    /// optionally restricted to a closed date interval (inclusive on both
    /// ends). Raw matching records ride along for drill-down, sorted by
    /// date ascending.
    pub async fn compute_stats(
        &self,
        user_id: &str,
        range: Option<(NaiveDate, NaiveDate)>,
    ) -> ResultEngine<StatsReport> {
        let range_strings = range.map(|(from, to)| {
            (
                from.format(DATE_FORMAT).to_string(),
                to.format(DATE_FORMAT).to_string(),
            )
        });

        let mut booking_query = bookings::Entity::find()
            .filter(bookings::Column::UserId.eq(user_id))
            .order_by_asc(bookings::Column::Date)
            .find_also_related(spaces::Entity);
        let mut expense_query = expenses::Entity::find()
            .filter(expenses::Column::UserId.eq(user_id))
            .order_by_asc(expenses::Column::Date);
        if let Some((from, to)) = &range_strings {
            booking_query = booking_query
                .filter(bookings::Column::Date.gte(from.clone()))
                .filter(bookings::Column::Date.lte(to.clone()));
            expense_query = expense_query
                .filter(expenses::Column::Date.gte(from.clone()))
                .filter(expenses::Column::Date.lte(to.clone()));
        }

        let booking_rows = booking_query.all(&self.database).await?;
        let expense_models = expense_query.all(&self.database).await?;

        let bookings = booking_rows
            .into_iter()
            .map(|(model, space_model)| with_space(model, space_model))
            .collect::<ResultEngine<Vec<_>>>()?;
        let expenses = expense_models
            .into_iter()
            .map(Expense::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok(stats::aggregate(bookings, expenses))
    }

    async fn owned_booking(
        &self,
        user_id: &str,
        booking_id: Uuid,
    ) -> ResultEngine<bookings::Model> {
        bookings::Entity::find_by_id(booking_id.to_string())
            .one(&self.database)
            .await?
            .filter(|model| model.user_id == user_id)
            .ok_or_else(|| EngineError::KeyNotFound("booking not exists".to_string()))
    }

    async fn owned_space(&self, user_id: &str, space_id: &str) -> ResultEngine<Space> {
        let model = spaces::Entity::find_by_id(space_id)
            .one(&self.database)
            .await?
            .filter(|model| model.user_id == user_id)
            .ok_or_else(|| EngineError::KeyNotFound("space not exists".to_string()))?;
        Space::try_from(model)
    }

    async fn space_display(&self, space_id: &str) -> ResultEngine<Option<SpaceDisplay>> {
        let model = spaces::Entity::find_by_id(space_id)
            .one(&self.database)
            .await?;
        Ok(model
            .map(Space::try_from)
            .transpose()?
            .map(|space| space.display()))
    }
}

fn with_space(
    model: bookings::Model,
    space_model: Option<spaces::Model>,
) -> ResultEngine<BookingWithSpace> {
    Ok(BookingWithSpace {
        booking: Booking::try_from(model)?,
        space: space_model
            .map(Space::try_from)
            .transpose()?
            .map(|space| space.display()),
    })
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
        }
    }
}
