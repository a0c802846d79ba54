//! The module contains the error the engine can throw.
//!
//! The errors are:
//!
//! - [`Validation`] thrown on malformed business input (empty batch, blank slot labels).
//! - [`Conflict`] thrown when a requested slot is already booked.
//! - [`KeyNotFound`] thrown when an item is not found or not owned by the caller.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`Conflict`]: EngineError::Conflict
//!  [`KeyNotFound`]: EngineError::KeyNotFound
use chrono::NaiveDate;
use sea_orm::DbErr;
use thiserror::Error;

use crate::slots::SlotSet;

/// Engine custom errors.
///
/// A missing record and a record owned by another user both map to
/// [`EngineError::KeyNotFound`] so callers cannot probe for other users' data.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Slot conflict for space {space_id} on {date}: {slots}")]
    Conflict {
        space_id: String,
        date: NaiveDate,
        slots: SlotSet,
    },
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (
                Self::Conflict {
                    space_id: a_space,
                    date: a_date,
                    slots: a_slots,
                },
                Self::Conflict {
                    space_id: b_space,
                    date: b_date,
                    slots: b_slots,
                },
            ) => a_space == b_space && a_date == b_date && a_slots == b_slots,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
