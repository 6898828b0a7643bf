//! Store-level query model.
//!
//! A [`StoreQuery`] is the predicate the adapter executes against one
//! collection: a conjunction of exact-match constraints on `data` fields
//! plus an optional inclusive date range over the composed observation
//! date. The HTTP filter layer builds these; keeping the type free of SQL
//! makes the builder pure and unit-testable.

use serde_json::{Map, Value};

/// Inclusive range over the composed date `year * 10000 + month * 100 + day`.
/// Either bound may stand alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<i32>,
    pub end: Option<i32>,
}

impl DateRange {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// Conjunction predicate against one collection's records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreQuery {
    /// Exact-match constraints on fields under `data`, combined by AND.
    /// Executed as a single JSONB containment check.
    pub equals: Map<String, Value>,
    /// Optional composed-date range constraint.
    pub date_range: Option<DateRange>,
}

impl StoreQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an exact-match constraint on a `data` field.
    pub fn eq(&mut self, field: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.equals.insert(field.into(), value.into());
        self
    }

    /// True when the query matches every record in the collection.
    pub fn is_unconstrained(&self) -> bool {
        self.equals.is_empty() && self.date_range.map_or(true, |r| r.is_empty())
    }
}

/// Compose a date into the sortable `YYYYMMDD`-style integer used by the
/// range predicate.
pub fn compose_date(year: i32, month: u32, day: u32) -> i32 {
    year * 10_000 + month as i32 * 100 + day as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_query_is_unconstrained() {
        assert!(StoreQuery::new().is_unconstrained());
        let with_empty_range = StoreQuery {
            date_range: Some(DateRange {
                start: None,
                end: None,
            }),
            ..Default::default()
        };
        assert!(with_empty_range.is_unconstrained());
    }

    #[test]
    fn test_eq_accumulates_constraints() {
        let mut query = StoreQuery::new();
        StoreQuery::eq(StoreQuery::eq(&mut query, "station_id", "34504"), "hour", 18);
        assert!(!query.is_unconstrained());
        assert_eq!(query.equals.get("station_id"), Some(&json!("34504")));
        assert_eq!(query.equals.get("hour"), Some(&json!(18)));
    }

    #[test]
    fn test_compose_date() {
        assert_eq!(compose_date(2024, 9, 1), 20240901);
        assert_eq!(compose_date(2024, 12, 31), 20241231);
    }
}
