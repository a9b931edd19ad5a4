//! Weighing ticket data models.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One of the three weight measurements printed on a weighing ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightRole {
    /// Vehicle plus cargo (총중량).
    Gross,
    /// Empty vehicle (공차중량).
    Tare,
    /// Cargo only (실중량).
    Net,
}

impl WeightRole {
    /// All roles in ticket order.
    pub const ALL: [WeightRole; 3] = [WeightRole::Gross, WeightRole::Tare, WeightRole::Net];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            WeightRole::Gross => "gross",
            WeightRole::Tare => "tare",
            WeightRole::Net => "net",
        }
    }
}

impl fmt::Display for WeightRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The three weight fields as they move through the extraction stages.
///
/// Every stage takes a `Weights` and returns a new one; a field, once set,
/// is never overwritten by a later stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weights {
    pub gross: Option<u32>,
    pub tare: Option<u32>,
    pub net: Option<u32>,
}

impl Weights {
    pub fn new(gross: Option<u32>, tare: Option<u32>, net: Option<u32>) -> Self {
        Self { gross, tare, net }
    }

    /// Get the value for a role.
    pub fn get(&self, role: WeightRole) -> Option<u32> {
        match role {
            WeightRole::Gross => self.gross,
            WeightRole::Tare => self.tare,
            WeightRole::Net => self.net,
        }
    }

    /// Set a role only if it is still empty.
    pub fn with(mut self, role: WeightRole, value: u32) -> Self {
        let slot = match role {
            WeightRole::Gross => &mut self.gross,
            WeightRole::Tare => &mut self.tare,
            WeightRole::Net => &mut self.net,
        };
        if slot.is_none() {
            *slot = Some(value);
        }
        self
    }

    /// Fill empty roles from `other`.
    pub fn merge(self, other: Weights) -> Self {
        WeightRole::ALL.iter().fold(self, |acc, &role| match other.get(role) {
            Some(value) => acc.with(role, value),
            None => acc,
        })
    }

    /// True when all three roles are set.
    pub fn is_complete(&self) -> bool {
        self.gross.is_some() && self.tare.is_some() && self.net.is_some()
    }

    /// Roles that are still empty.
    pub fn missing(&self) -> Vec<WeightRole> {
        WeightRole::ALL
            .into_iter()
            .filter(|role| self.get(*role).is_none())
            .collect()
    }

    /// Whether `gross == tare + net`; `None` unless all three are set.
    pub fn is_consistent(&self) -> Option<bool> {
        match (self.gross, self.tare, self.net) {
            (Some(g), Some(t), Some(n)) => Some(t.checked_add(n) == Some(g)),
            _ => None,
        }
    }

    /// The values that are set, in gross/tare/net order.
    pub fn known_values(&self) -> impl Iterator<Item = u32> {
        [self.gross, self.tare, self.net].into_iter().flatten()
    }
}

/// Structured result for one weighing ticket.
///
/// Field names serialize in camelCase and absent values are written as
/// `null`; downstream consumers rely on this exact shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeighingRecord {
    /// `YYYY-MM-DD` or `YYYY-MM-DD H:MM[:SS]`, verbatim from the ticket.
    pub weighing_date: Option<String>,

    /// Plate or fleet number.
    pub vehicle_number: Option<String>,

    pub gross_weight_kg: Option<u32>,
    pub tare_weight_kg: Option<u32>,
    pub net_weight_kg: Option<u32>,
}

impl WeighingRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// The weight fields.
    pub fn weights(&self) -> Weights {
        Weights::new(self.gross_weight_kg, self.tare_weight_kg, self.net_weight_kg)
    }

    /// Replace the weight fields.
    pub fn with_weights(mut self, weights: Weights) -> Self {
        self.gross_weight_kg = weights.gross;
        self.tare_weight_kg = weights.tare;
        self.net_weight_kg = weights.net;
        self
    }

    /// Parse the weighing date; a date without a time maps to midnight.
    pub fn weighing_datetime(&self) -> Option<NaiveDateTime> {
        let raw = self.weighing_date.as_deref()?.trim();

        for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(dt);
            }
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
    }

    /// True when no field at all was extracted.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_with_never_overwrites() {
        let w = Weights::default()
            .with(WeightRole::Gross, 12480)
            .with(WeightRole::Gross, 99);
        assert_eq!(w.gross, Some(12480));
        assert_eq!(w.missing(), vec![WeightRole::Tare, WeightRole::Net]);
    }

    #[test]
    fn test_merge_fills_only_gaps() {
        let labeled = Weights::new(Some(12480), None, None);
        let resolved = Weights::new(Some(1), Some(7470), Some(5010));
        assert_eq!(
            labeled.merge(resolved),
            Weights::new(Some(12480), Some(7470), Some(5010))
        );
    }

    #[test]
    fn test_is_consistent() {
        assert_eq!(Weights::new(Some(12480), Some(7470), Some(5010)).is_consistent(), Some(true));
        assert_eq!(Weights::new(Some(12480), Some(7470), Some(5000)).is_consistent(), Some(false));
        assert_eq!(Weights::new(Some(12480), None, Some(5010)).is_consistent(), None);
    }

    #[test]
    fn test_record_serializes_nulls_in_camel_case() {
        let record = WeighingRecord {
            vehicle_number: Some("80구8713".to_string()),
            gross_weight_kg: Some(12480),
            ..Default::default()
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "weighingDate": null,
                "vehicleNumber": "80구8713",
                "grossWeightKg": 12480,
                "tareWeightKg": null,
                "netWeightKg": null
            })
        );
    }

    #[test]
    fn test_weighing_datetime() {
        let mut record = WeighingRecord::new();
        record.weighing_date = Some("2026-02-02 05:37:55".to_string());
        assert_eq!(
            record.weighing_datetime(),
            NaiveDate::from_ymd_opt(2026, 2, 2).unwrap().and_hms_opt(5, 37, 55)
        );

        record.weighing_date = Some("2026-02-01".to_string());
        assert_eq!(
            record.weighing_datetime(),
            NaiveDate::from_ymd_opt(2026, 2, 1).unwrap().and_hms_opt(0, 0, 0)
        );

        record.weighing_date = Some("2026-13-45".to_string());
        assert_eq!(record.weighing_datetime(), None);
    }
}
