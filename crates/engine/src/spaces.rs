//! A `Space` is a bookable physical resource (a turf, a court) owned by one
//! user account. Each space has a default hourly price and an optional
//! per-slot custom rate map.

use std::collections::BTreeMap;

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Space {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub price_per_hour: f64,
    /// Slot label -> price, overriding `price_per_hour` for that slot.
    pub custom_rates: BTreeMap<String, f64>,
}

/// Display fields of a space, resolved onto bookings for presentation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpaceDisplay {
    pub id: String,
    pub name: String,
    pub price_per_hour: f64,
}

/// Sparse overrides for [`Space`] updates.
///
/// `None` means "keep the existing value". A supplied zero price is applied;
/// absence and zero are distinct on purpose.
#[derive(Clone, Debug, Default)]
pub struct SpaceUpdate {
    pub name: Option<String>,
    pub price_per_hour: Option<f64>,
    pub custom_rates: Option<BTreeMap<String, f64>>,
}

impl Space {
    pub fn new(
        user_id: &str,
        name: String,
        price_per_hour: f64,
        custom_rates: BTreeMap<String, f64>,
    ) -> ResultEngine<Self> {
        if name.trim().is_empty() {
            return Err(EngineError::Validation("space name is required".to_string()));
        }
        if !price_per_hour.is_finite() || price_per_hour < 0.0 {
            return Err(EngineError::Validation(
                "price_per_hour must be a non-negative number".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name,
            price_per_hour,
            custom_rates,
        })
    }

    /// Price for one slot: the custom rate when present, the default otherwise.
    #[must_use]
    pub fn rate_for(&self, slot: &str) -> f64 {
        self.custom_rates
            .get(slot)
            .copied()
            .unwrap_or(self.price_per_hour)
    }

    /// Applies sparse overrides field by field, keeping unset fields.
    pub fn merged(&self, update: SpaceUpdate) -> ResultEngine<Self> {
        let name = match update.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => self.name.clone(),
        };
        let price_per_hour = match update.price_per_hour {
            Some(price) => {
                if !price.is_finite() || price < 0.0 {
                    return Err(EngineError::Validation(
                        "price_per_hour must be a non-negative number".to_string(),
                    ));
                }
                price
            }
            None => self.price_per_hour,
        };
        Ok(Self {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            name,
            price_per_hour,
            custom_rates: update.custom_rates.unwrap_or_else(|| self.custom_rates.clone()),
        })
    }

    #[must_use]
    pub fn display(&self) -> SpaceDisplay {
        SpaceDisplay {
            id: self.id.clone(),
            name: self.name.clone(),
            price_per_hour: self.price_per_hour,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "spaces")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub price_per_hour: f64,
    pub custom_rates: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bookings::Entity")]
    Bookings,
}

impl Related<super::bookings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bookings.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Space> for ActiveModel {
    fn from(space: &Space) -> Self {
        Self {
            id: ActiveValue::Set(space.id.clone()),
            user_id: ActiveValue::Set(space.user_id.clone()),
            name: ActiveValue::Set(space.name.clone()),
            price_per_hour: ActiveValue::Set(space.price_per_hour),
            custom_rates: ActiveValue::Set(
                serde_json::to_string(&space.custom_rates).unwrap_or_else(|_| String::from("{}")),
            ),
        }
    }
}

impl TryFrom<Model> for Space {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let custom_rates: BTreeMap<String, f64> = serde_json::from_str(&model.custom_rates)
            .map_err(|err| EngineError::Validation(format!("invalid custom rates: {err}")))?;
        Ok(Self {
            id: model.id,
            user_id: model.user_id,
            name: model.name,
            price_per_hour: model.price_per_hour,
            custom_rates,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn space() -> Space {
        let mut rates = BTreeMap::new();
        rates.insert("06:00-07:00".to_string(), 1500.0);
        Space::new("alice", "Main Turf".to_string(), 1000.0, rates).unwrap()
    }

    #[test]
    fn custom_rate_overrides_default() {
        let space = space();
        assert_eq!(space.rate_for("06:00-07:00"), 1500.0);
        assert_eq!(space.rate_for("07:00-08:00"), 1000.0);
    }

    #[test]
    fn merged_keeps_unset_fields() {
        let space = space();
        let merged = space.merged(SpaceUpdate::default()).unwrap();
        assert_eq!(merged, space);
    }

    #[test]
    fn merged_applies_zero_price_when_supplied() {
        let space = space();
        let merged = space
            .merged(SpaceUpdate {
                price_per_hour: Some(0.0),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(merged.price_per_hour, 0.0);
        assert_eq!(merged.name, space.name);
    }

    #[test]
    fn blank_name_is_rejected() {
        let err = Space::new("alice", " ".to_string(), 100.0, BTreeMap::new()).unwrap_err();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}
