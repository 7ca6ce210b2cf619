//! Inventory data model
//!
//! Every query maps its output onto these types before rendering.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Identifier column
pub const ID: &str = "ID";
/// Item name column
pub const NAME: &str = "Name";
/// Item type column
pub const TYPE: &str = "Type";
/// Item condition column
pub const CONDITION: &str = "Condition";
/// Item amount column
pub const AMOUNT: &str = "Amount";

/// Bucket used for records without a `Condition` column
pub const UNKNOWN: &str = "Unknown";

/// One row of the source file, keyed by column name in header order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    /// Build a record from `(column, value)` pairs.
    ///
    /// A repeated column keeps its first position and takes the last value.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields: Vec<(String, String)> = Vec::new();
        for (column, value) in pairs {
            let column = column.into();
            let value = value.into();
            match fields.iter_mut().find(|(c, _)| *c == column) {
                Some(slot) => slot.1 = value,
                None => fields.push((column, value)),
            }
        }
        Self { fields }
    }

    /// Cell value for `column`, if the row had one
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    /// Cell value for `column`, or `default` when the row is missing it
    pub fn get_or<'a>(&'a self, column: &str, default: &'a str) -> &'a str {
        self.get(column).unwrap_or(default)
    }

    /// Column names present on this record, in header order
    #[allow(dead_code)]
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(c, _)| c.as_str())
    }

    /// `(column, value)` pairs in header order
    #[allow(dead_code)]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(c, v)| (c.as_str(), v.as_str()))
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (column, value) in &self.fields {
            map.serialize_entry(column, value)?;
        }
        map.end()
    }
}

/// How condition percentages are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    /// Keep the raw `count / total * 100` value
    #[default]
    Exact,
    /// Round half away from zero to this many decimal places
    Decimals(u32),
}

impl Rounding {
    pub fn apply(self, value: f64) -> f64 {
        match self {
            Rounding::Exact => value,
            Rounding::Decimals(places) => {
                // f64 has no meaningful digits past ~15 places
                let factor = 10f64.powi(places.min(15) as i32);
                (value * factor).round() / factor
            }
        }
    }
}

/// Share of one condition value within a set of records
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ConditionShare {
    pub condition: String,
    pub count: usize,
    pub percent: f64,
}

/// Condition distribution, in first-seen order of each condition
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ConditionBreakdown {
    /// Number of records the percentages are relative to
    pub total: usize,
    pub shares: Vec<ConditionShare>,
}

impl ConditionBreakdown {
    /// Percentage for `condition`, if any record carried it
    pub fn get(&self, condition: &str) -> Option<f64> {
        self.shares
            .iter()
            .find(|s| s.condition == condition)
            .map(|s| s.percent)
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Sum of all percentages (100 for a non-empty exact breakdown)
    #[allow(dead_code)]
    pub fn total_percent(&self) -> f64 {
        self.shares.iter().map(|s| s.percent).sum()
    }
}

/// One line of the inventory overview
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OverviewLine {
    pub name: String,
    pub condition: String,
    pub amount: String,
    /// Whole-table share of this line's condition
    pub percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axe() -> Record {
        Record::from_pairs([
            (ID, "1"),
            (NAME, "Axe"),
            (TYPE, "Weapon"),
            (CONDITION, "Good"),
            (AMOUNT, "1"),
        ])
    }

    #[test]
    fn test_record_get() {
        let record = axe();
        assert_eq!(record.get(NAME), Some("Axe"));
        assert_eq!(record.get("Weight"), None);
        assert_eq!(record.len(), 5);
        assert!(!record.is_empty());
    }

    #[test]
    fn test_record_get_or_missing() {
        let record = Record::from_pairs([(ID, "7")]);
        assert_eq!(record.get_or(NAME, ""), "");
        assert_eq!(record.get_or(CONDITION, UNKNOWN), "Unknown");
        assert_eq!(record.get_or(ID, ""), "7");
    }

    #[test]
    fn test_record_keeps_column_order() {
        let record = axe();
        let columns: Vec<_> = record.columns().collect();
        assert_eq!(columns, vec!["ID", "Name", "Type", "Condition", "Amount"]);
    }

    #[test]
    fn test_record_duplicate_column_takes_last_value() {
        let record = Record::from_pairs([("A", "1"), ("B", "2"), ("A", "3")]);
        let pairs: Vec<_> = record.iter().collect();
        assert_eq!(pairs, vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn test_record_serialization_order() {
        let json = serde_json::to_string(&axe()).unwrap();
        assert_eq!(
            json,
            r#"{"ID":"1","Name":"Axe","Type":"Weapon","Condition":"Good","Amount":"1"}"#
        );
    }

    #[test]
    fn test_rounding_exact() {
        assert_eq!(Rounding::Exact.apply(100.0 / 3.0), 100.0 / 3.0);
    }

    #[test]
    fn test_rounding_two_decimals() {
        assert_eq!(Rounding::Decimals(2).apply(100.0 / 3.0), 33.33);
        assert_eq!(Rounding::Decimals(2).apply(200.0 / 3.0), 66.67);
        assert_eq!(Rounding::Decimals(0).apply(12.5), 13.0);
    }

    #[test]
    fn test_rounding_default() {
        assert_eq!(Rounding::default(), Rounding::Exact);
    }

    #[test]
    fn test_breakdown_lookup() {
        let breakdown = ConditionBreakdown {
            total: 4,
            shares: vec![
                ConditionShare {
                    condition: "Good".to_string(),
                    count: 3,
                    percent: 75.0,
                },
                ConditionShare {
                    condition: "Rotten".to_string(),
                    count: 1,
                    percent: 25.0,
                },
            ],
        };
        assert_eq!(breakdown.get("Good"), Some(75.0));
        assert_eq!(breakdown.get("Broken"), None);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown.total_percent(), 100.0);
    }

    #[test]
    fn test_breakdown_default_is_empty() {
        let breakdown = ConditionBreakdown::default();
        assert!(breakdown.is_empty());
        assert_eq!(breakdown.total, 0);
    }
}
