//! Slot primitives.
//!
//! A slot is a string label for a fixed time range on one calendar day
//! (e.g. `"06:00-07:00"`). Slots are compared by exact label equality; no
//! time arithmetic is performed, so `"06:00-08:00"` and `"07:00-08:00"` do
//! not overlap as far as the engine is concerned.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// An ordered, deduplicated set of slot labels.
///
/// Order is the order the labels were supplied in; duplicates are dropped,
/// keeping the first occurrence. The set may be empty (an empty set never
/// conflicts with anything), but blank labels are rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct SlotSet(Vec<String>);

impl SlotSet {
    pub fn new<I>(labels: I) -> ResultEngine<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut out: Vec<String> = Vec::new();
        for label in labels {
            let label = label.trim().to_string();
            if label.is_empty() {
                return Err(EngineError::Validation("blank slot label".to_string()));
            }
            if !out.contains(&label) {
                out.push(label);
            }
        }
        Ok(Self(out))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, label: &str) -> bool {
        self.0.iter().any(|l| l == label)
    }

    /// Labels present in both sets, in `self`'s order.
    #[must_use]
    pub fn intersection(&self, other: &SlotSet) -> SlotSet {
        SlotSet(
            self.0
                .iter()
                .filter(|label| other.contains(label))
                .cloned()
                .collect(),
        )
    }

    /// Extends `self` with labels from `other`, skipping ones already present.
    pub fn extend(&mut self, other: &SlotSet) {
        for label in &other.0 {
            if !self.contains(label) {
                self.0.push(label.clone());
            }
        }
    }

    /// Serializes the set as a JSON array for the storage boundary.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.0).unwrap_or_else(|_| String::from("[]"))
    }

    /// Parses the JSON array form stored in the database.
    pub fn from_json(raw: &str) -> ResultEngine<Self> {
        let labels: Vec<String> = serde_json::from_str(raw)
            .map_err(|err| EngineError::Validation(format!("invalid slot set: {err}")))?;
        Self::new(labels)
    }
}

impl TryFrom<Vec<String>> for SlotSet {
    type Error = EngineError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        Self::new(labels)
    }
}

impl From<SlotSet> for Vec<String> {
    fn from(slots: SlotSet) -> Self {
        slots.0
    }
}

impl fmt::Display for SlotSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}
