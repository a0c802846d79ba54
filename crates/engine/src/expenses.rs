//! Expense records, independent of bookings. Only the report aggregation
//! reads them back.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, bookings::DATE_FORMAT, payment::PaymentMode};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub user_id: String,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    /// Expenses are settled in a single method, `Cash` or `UPI`.
    pub payment_mode: PaymentMode,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Expense {
    pub fn new(
        user_id: &str,
        title: String,
        amount: f64,
        category: String,
        date: NaiveDate,
        payment_mode: PaymentMode,
        note: Option<String>,
    ) -> ResultEngine<Self> {
        if title.trim().is_empty() {
            return Err(EngineError::Validation(
                "expense title is required".to_string(),
            ));
        }
        if category.trim().is_empty() {
            return Err(EngineError::Validation(
                "expense category is required".to_string(),
            ));
        }
        if !amount.is_finite() || amount < 0.0 {
            return Err(EngineError::Validation(
                "amount must be a non-negative number".to_string(),
            ));
        }
        if !matches!(payment_mode, PaymentMode::Cash | PaymentMode::Upi) {
            return Err(EngineError::Validation(
                "expense payment mode must be Cash or UPI".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            title,
            amount,
            category,
            date,
            payment_mode,
            note,
            created_at: Utc::now(),
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub amount: f64,
    pub category: String,
    pub date: String,
    pub payment_mode: String,
    pub note: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            user_id: ActiveValue::Set(expense.user_id.clone()),
            title: ActiveValue::Set(expense.title.clone()),
            amount: ActiveValue::Set(expense.amount),
            category: ActiveValue::Set(expense.category.clone()),
            date: ActiveValue::Set(expense.date.format(DATE_FORMAT).to_string()),
            payment_mode: ActiveValue::Set(expense.payment_mode.legacy()),
            note: ActiveValue::Set(expense.note.clone()),
            created_at: ActiveValue::Set(expense.created_at),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("expense not exists".to_string()))?,
            user_id: model.user_id,
            title: model.title,
            amount: model.amount,
            category: model.category,
            date: NaiveDate::parse_from_str(&model.date, DATE_FORMAT)
                .map_err(|_| EngineError::Validation(format!("invalid date: {}", model.date)))?,
            payment_mode: PaymentMode::parse_legacy(&model.payment_mode),
            note: model.note,
            created_at: model.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_mode_is_rejected_for_expenses() {
        let err = Expense::new(
            "alice",
            "Water".to_string(),
            200.0,
            "Maintenance".to_string(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            PaymentMode::Split(vec![("Cash".to_string(), 200.0)]),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }

    #[test]
    fn upi_expense_is_accepted() {
        let expense = Expense::new(
            "alice",
            "Nets".to_string(),
            450.5,
            "Equipment".to_string(),
            NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            PaymentMode::Upi,
            Some("replacement".to_string()),
        )
        .unwrap();
        assert_eq!(expense.payment_mode, PaymentMode::Upi);
    }
}
