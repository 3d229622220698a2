use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The waste streams the council reports collection dates for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WasteStream {
    GeneralWaste,
    Recycling,
    FoodWaste,
}

impl WasteStream {
    /// Dashboard listing order.
    pub const ALL: [WasteStream; 3] = [
        WasteStream::FoodWaste,
        WasteStream::Recycling,
        WasteStream::GeneralWaste,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            WasteStream::GeneralWaste => "Rubbish",
            WasteStream::Recycling => "Recycling",
            WasteStream::FoodWaste => "Food Waste",
        }
    }
}

impl fmt::Display for WasteStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Next known collection date per waste stream for one address.
///
/// Dates are calendar days, i.e. local midnight of the collection day.
/// `None` means the council did not return a usable date.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CollectionSchedule {
    pub general_waste: Option<NaiveDate>,
    pub recycling: Option<NaiveDate>,
    pub food_waste: Option<NaiveDate>,
}

/// One stream with a known date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionEntry {
    pub stream: WasteStream,
    pub date: NaiveDate,
}

impl CollectionSchedule {
    pub fn date_for(&self, stream: WasteStream) -> Option<NaiveDate> {
        match stream {
            WasteStream::GeneralWaste => self.general_waste,
            WasteStream::Recycling => self.recycling,
            WasteStream::FoodWaste => self.food_waste,
        }
    }

    /// Streams with a known date, earliest first.
    ///
    /// Ties keep dashboard order (food, recycling, rubbish).
    pub fn entries(&self) -> Vec<CollectionEntry> {
        let mut entries: Vec<CollectionEntry> = WasteStream::ALL
            .iter()
            .filter_map(|&stream| {
                self.date_for(stream)
                    .map(|date| CollectionEntry { stream, date })
            })
            .collect();
        entries.sort_by_key(|e| e.date);
        entries
    }

    /// The collection to headline on the dashboard.
    ///
    /// First entry on or after `today`; if every known date is already past,
    /// the earliest known one. `None` when no dates are known at all.
    pub fn next_collection(&self, today: NaiveDate) -> Option<CollectionEntry> {
        let entries = self.entries();
        entries
            .iter()
            .find(|e| e.date >= today)
            .or_else(|| entries.first())
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.general_waste.is_none() && self.recycling.is_none() && self.food_waste.is_none()
    }
}

/// How far away a collection date is from today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelativeDay {
    Past,
    Today,
    Tomorrow,
    InDays(i64),
}

impl RelativeDay {
    pub fn between(date: NaiveDate, today: NaiveDate) -> Self {
        match (date - today).num_days() {
            d if d < 0 => RelativeDay::Past,
            0 => RelativeDay::Today,
            1 => RelativeDay::Tomorrow,
            d => RelativeDay::InDays(d),
        }
    }
}

impl fmt::Display for RelativeDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativeDay::Past => f.write_str("Past"),
            RelativeDay::Today => f.write_str("Today"),
            RelativeDay::Tomorrow => f.write_str("Tomorrow"),
            RelativeDay::InDays(n) => write!(f, "In {n} days"),
        }
    }
}

/// Long-form date for the dashboard, e.g. "Tuesday, 5 March".
pub fn format_collection_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%A, %-d %B").to_string(),
        None => "Not scheduled".to_string(),
    }
}

/// Hours offered when choosing a reminder time (08:00 to 21:00).
pub const SUGGESTED_REMINDER_HOURS: std::ops::RangeInclusive<u8> = 8..=21;

/// When to remind about a collection: the evening (or whatever hour the
/// user picked) of the day before.
pub fn reminder_at(collection: NaiveDate, hour: u8) -> Option<NaiveDateTime> {
    collection.pred_opt()?.and_hms_opt(u32::from(hour), 0, 0)
}
