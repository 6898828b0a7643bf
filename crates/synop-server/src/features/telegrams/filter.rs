//! Filter query builder.
//!
//! Translates a partial [`TelegramFilter`] into a [`FilterPlan`]: which
//! collections to query, the store-level conjunction predicate, and the
//! response projection. Pure; the fan-out executor lives in
//! `queries::filter_telegrams`.

use serde_json::{Number, Value};
use tracing::warn;

use super::types::TelegramFilter;
use crate::store::query::{compose_date, DateRange, StoreQuery};

/// Which collections a filter targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetCollections {
    /// Exactly the named country's collection.
    One(String),
    /// Every registered collection (full fan-out).
    All,
}

/// Executable form of a filter request.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPlan {
    pub target: TargetCollections,
    pub query: StoreQuery,
    pub projection: Option<Vec<String>>,
}

/// Build the plan for a filter request.
///
/// Absent criteria are omitted from the conjunction. An unparseable date
/// drops that criterion with a warning rather than failing the request;
/// the result set is then broader than the caller may expect, which the
/// log line makes visible.
pub fn build_plan(filter: &TelegramFilter) -> FilterPlan {
    let target = match &filter.country_code {
        Some(code) => TargetCollections::One(code.clone()),
        None => TargetCollections::All,
    };

    let mut query = StoreQuery::new();

    if let Some(ref station_id) = filter.station_id {
        StoreQuery::eq(&mut query, "station_id", station_id.clone());
    }

    if let Some(ref date) = filter.date {
        match parse_date(date) {
            Some((year, month, day)) => {
                StoreQuery::eq(&mut query, "year", year);
                StoreQuery::eq(&mut query, "month", month);
                StoreQuery::eq(&mut query, "day", day);
            }
            None => warn!(date = %date, "Unparseable filter date, dropping date criterion"),
        }
    }

    let range = DateRange {
        start: range_bound(filter.date_start.as_deref(), "date_start"),
        end: range_bound(filter.date_end.as_deref(), "date_end"),
    };
    if !range.is_empty() {
        query.date_range = Some(range);
    }

    if let Some(hour) = filter.hour {
        StoreQuery::eq(&mut query, "hour", hour);
    }

    let float_criteria = [
        ("temperature", filter.temperature),
        ("dew_point_temperature", filter.dew_point_temperature),
        ("relative_humidity", filter.relative_humidity),
        ("wind_dir", filter.wind_dir),
        ("wind_speed", filter.wind_speed),
        ("pressure", filter.pressure),
        ("sea_level_pressure", filter.sea_level_pressure),
        ("maximum_temperature", filter.maximum_temperature),
        ("minimum_temperature", filter.minimum_temperature),
        ("precipitation_s1", filter.precipitation_s1),
        ("precipitation_s3", filter.precipitation_s3),
        ("pressure_tendency", filter.pressure_tendency),
        ("sunshine", filter.sunshine),
    ];
    for (field, criterion) in float_criteria {
        if let Some(value) = criterion {
            eq_float(&mut query, field, value);
        }
    }

    let text_criteria = [
        ("present_weather", &filter.present_weather),
        ("past_weather_1", &filter.past_weather_1),
        ("past_weather_2", &filter.past_weather_2),
        ("ground_state_snow", &filter.ground_state_snow),
        ("ground_state", &filter.ground_state),
    ];
    for (field, criterion) in text_criteria {
        if let Some(value) = criterion {
            StoreQuery::eq(&mut query, field, value.clone());
        }
    }

    FilterPlan {
        target,
        query,
        projection: filter.fields_to_return.clone(),
    }
}

fn eq_float(query: &mut StoreQuery, field: &str, value: f64) {
    match Number::from_f64(value) {
        Some(n) => {
            query.eq(field, Value::Number(n));
        }
        None => warn!(field, "Non-finite filter value, dropping criterion"),
    }
}

/// Parse the first 8 characters of a `YYYYMMDD` date string. Returns
/// `None` when they are not all digits (the criterion is then dropped).
fn parse_date(date: &str) -> Option<(i64, i64, i64)> {
    let digits = date.get(0..8)?;
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let year = digits[0..4].parse().ok()?;
    let month = digits[4..6].parse().ok()?;
    let day = digits[6..8].parse().ok()?;
    Some((year, month, day))
}

fn range_bound(date: Option<&str>, criterion: &str) -> Option<i32> {
    let date = date?;
    match parse_date(date) {
        Some((year, month, day)) => Some(compose_date(year as i32, month as u32, day as u32)),
        None => {
            warn!(criterion, date = %date, "Unparseable range bound, dropping it");
            None
        }
    }
}
