//! Payment mode primitives.
//!
//! Stored records keep the legacy string forms (`"Cash"`, `"UPI"`, `"Card"`,
//! `"Split (Cash: 300, UPI: 200)"`). Internally the engine works with a
//! tagged [`PaymentMode`] and converts at the storage boundary.

use serde::{Deserialize, Serialize};

/// How a payment was (or will be) collected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMode {
    Cash,
    Upi,
    Card,
    /// Payment covered by more than one method. The breakdown keeps the
    /// supplied order; it is batch-level, not per item.
    Split(Vec<(String, f64)>),
    /// Passthrough for legacy rows with a mode string the engine does not
    /// recognise. Report attribution ignores these.
    Other(String),
}

impl Default for PaymentMode {
    fn default() -> Self {
        Self::Cash
    }
}

impl PaymentMode {
    /// Renders the legacy string form used in stored records.
    ///
    /// Split breakdowns drop non-positive entries, e.g.
    /// `Split([("Cash", 300.0), ("UPI", 0.0)])` becomes `"Split (Cash: 300)"`.
    #[must_use]
    pub fn legacy(&self) -> String {
        match self {
            Self::Cash => "Cash".to_string(),
            Self::Upi => "UPI".to_string(),
            Self::Card => "Card".to_string(),
            Self::Split(breakdown) => {
                let details = breakdown
                    .iter()
                    .filter(|(_, amount)| *amount > 0.0)
                    .map(|(method, amount)| format!("{method}: {amount}"))
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("Split ({details})")
            }
            Self::Other(raw) => raw.clone(),
        }
    }

    /// Parses the legacy string form of stored records.
    ///
    /// Anything starting with `"Split"` is scanned for `method: amount`
    /// pairs; entries that do not parse as a number are skipped. Unknown
    /// plain strings come back as [`PaymentMode::Other`].
    #[must_use]
    pub fn parse_legacy(raw: &str) -> Self {
        match raw.trim() {
            "Cash" => Self::Cash,
            "UPI" => Self::Upi,
            "Card" => Self::Card,
            trimmed if trimmed.starts_with("Split") => {
                let inner = trimmed
                    .trim_start_matches("Split")
                    .trim()
                    .trim_start_matches('(')
                    .trim_end_matches(')');
                let breakdown = inner
                    .split(',')
                    .filter_map(|pair| {
                        let (method, amount) = pair.split_once(':')?;
                        let amount: f64 = amount.trim().parse().ok()?;
                        Some((method.trim().to_string(), amount))
                    })
                    .collect();
                Self::Split(breakdown)
            }
            other => Self::Other(other.to_string()),
        }
    }

    /// Amount attributed to `method` inside a split breakdown.
    ///
    /// Returns `None` for non-split modes. Methods compare case-sensitively,
    /// matching the stored form (`"Cash"`, `"UPI"`).
    #[must_use]
    pub fn split_amount(&self, method: &str) -> Option<f64> {
        match self {
            Self::Split(breakdown) => breakdown
                .iter()
                .find(|(m, _)| m == method)
                .map(|(_, amount)| *amount),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_modes_round_trip() {
        for (mode, raw) in [
            (PaymentMode::Cash, "Cash"),
            (PaymentMode::Upi, "UPI"),
            (PaymentMode::Card, "Card"),
        ] {
            assert_eq!(mode.legacy(), raw);
            assert_eq!(PaymentMode::parse_legacy(raw), mode);
        }
    }

    #[test]
    fn split_renders_positive_entries_in_order() {
        let mode = PaymentMode::Split(vec![
            ("Cash".to_string(), 300.0),
            ("UPI".to_string(), 200.0),
            ("Card".to_string(), 0.0),
        ]);
        assert_eq!(mode.legacy(), "Split (Cash: 300, UPI: 200)");
    }

    #[test]
    fn split_renders_fractional_amounts() {
        let mode = PaymentMode::Split(vec![("Cash".to_string(), 300.5)]);
        assert_eq!(mode.legacy(), "Split (Cash: 300.5)");
    }

    #[test]
    fn parse_split_extracts_sub_amounts() {
        let mode = PaymentMode::parse_legacy("Split (Cash: 300, UPI: 200)");
        assert_eq!(mode.split_amount("Cash"), Some(300.0));
        assert_eq!(mode.split_amount("UPI"), Some(200.0));
        assert_eq!(mode.split_amount("Card"), None);
    }

    #[test]
    fn parse_split_skips_garbage_entries() {
        let mode = PaymentMode::parse_legacy("Split (Cash: 300, UPI: lots)");
        assert_eq!(mode.split_amount("Cash"), Some(300.0));
        assert_eq!(mode.split_amount("UPI"), None);
    }

    #[test]
    fn unknown_mode_is_kept_verbatim() {
        let mode = PaymentMode::parse_legacy("Cheque");
        assert_eq!(mode, PaymentMode::Other("Cheque".to_string()));
        assert_eq!(mode.legacy(), "Cheque");
    }
}
