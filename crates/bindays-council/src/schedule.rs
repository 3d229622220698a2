use bindays_model::CollectionSchedule;
use chrono::NaiveDate;
use serde_json::Value;

use crate::types::{CollectionsResponse, StreamDate};

/// Parse a `YYYY-MM-DD` collection date.
///
/// `"unknown"` (any case), blank, or unparsable values give `None`. A
/// trailing time part (`2024-03-05T00:00:00`) is ignored: collections are
/// whole days.
pub fn parse_iso_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("unknown") {
        return None;
    }

    let day = match raw.split_once('T') {
        Some((day, _time)) => day,
        None => raw,
    };
    match NaiveDate::parse_from_str(day, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            tracing::warn!(value = %raw, error = %e, "Ignoring unparsable collection date");
            None
        }
    }
}

fn stream_date(stream: Option<&StreamDate>, name: &str) -> Option<NaiveDate> {
    match stream?.iso.as_ref()? {
        Value::String(s) => parse_iso_date(Some(s)),
        Value::Null => None,
        other => {
            tracing::warn!(stream = name, value = %other, "Collection date is not a string");
            None
        }
    }
}

/// Map the upstream response onto the three waste streams.
pub fn map_schedule(response: &CollectionsResponse) -> CollectionSchedule {
    CollectionSchedule {
        general_waste: stream_date(response.rubbish.as_ref(), "rubbish"),
        recycling: stream_date(response.recycling.as_ref(), "recycling"),
        food_waste: stream_date(response.food.as_ref(), "food"),
    }
}
