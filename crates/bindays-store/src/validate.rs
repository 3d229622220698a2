// Shape validation for a persisted preferences blob.
//
// Each field is checked on its own so one bad value never costs the user
// the rest of their saved state. Whatever cannot be used is dropped, a
// default takes its place, and a `LoadIssue` records what happened.

use bindays_model::{
    FavouriteAddress, PreferenceState, DEFAULT_NOTIFICATION_HOUR, MAX_NOTIFICATION_HOUR,
};
use serde_json::{Map, Value};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadIssue {
    #[error("preferences file is not valid JSON ({0}), starting fresh")]
    Corrupt(String),

    #[error("preferences file is not a JSON object, starting fresh")]
    NotAnObject,

    #[error("discarded unreadable selected address")]
    InvalidSelection,

    #[error("favourites is not a list, discarded")]
    FavouritesNotAList,

    #[error("discarded unreadable favourite at position {0}")]
    InvalidFavourite(usize),

    #[error("discarded duplicate favourite {0}")]
    DuplicateFavourite(String),

    #[error("notification hour {0} is not an hour of the day, using default")]
    InvalidHour(String),

    #[error("notifications flag {0} is not true/false, using default")]
    InvalidEnabledFlag(String),

    #[error("selected address {0} was missing from favourites, added it")]
    SelectionNotFavourite(String),
}

/// Parse and validate raw file contents.
pub fn validate_contents(contents: &str) -> (PreferenceState, Vec<LoadIssue>) {
    match serde_json::from_str::<Value>(contents) {
        Ok(value) => validate_value(&value),
        Err(e) => (PreferenceState::default(), vec![LoadIssue::Corrupt(e.to_string())]),
    }
}

/// Validate an already-parsed JSON value field by field.
pub fn validate_value(value: &Value) -> (PreferenceState, Vec<LoadIssue>) {
    let mut issues = Vec::new();
    let Some(obj) = value.as_object() else {
        return (PreferenceState::default(), vec![LoadIssue::NotAnObject]);
    };

    let mut state = PreferenceState {
        selected_address: selected_address(obj, &mut issues),
        favourites: favourites(obj, &mut issues),
        notification_hour: notification_hour(obj, &mut issues),
        notifications_enabled: notifications_enabled(obj, &mut issues),
    };

    // The selection always lives in the favourites list too. An incomplete
    // selection is left for the dashboard to clear, not favourited.
    if let Some(selected) = &state.selected_address {
        if selected.is_complete() && state.favourite(&selected.uprn).is_none() {
            issues.push(LoadIssue::SelectionNotFavourite(selected.uprn.clone()));
            state.favourites.push(selected.clone());
        }
    }

    (state, issues)
}

fn selected_address(obj: &Map<String, Value>, issues: &mut Vec<LoadIssue>) -> Option<FavouriteAddress> {
    match obj.get("selectedAddress") {
        None | Some(Value::Null) => None,
        Some(v) => match serde_json::from_value::<FavouriteAddress>(v.clone()) {
            Ok(address) => Some(address),
            Err(_) => {
                issues.push(LoadIssue::InvalidSelection);
                None
            }
        },
    }
}

fn favourites(obj: &Map<String, Value>, issues: &mut Vec<LoadIssue>) -> Vec<FavouriteAddress> {
    let items = match obj.get("favourites") {
        None | Some(Value::Null) => return Vec::new(),
        Some(Value::Array(items)) => items,
        Some(_) => {
            issues.push(LoadIssue::FavouritesNotAList);
            return Vec::new();
        }
    };

    let mut seen = HashSet::new();
    let mut favourites = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match serde_json::from_value::<FavouriteAddress>(item.clone()) {
            // Without both identifiers it can never be looked up or selected
            Ok(address) if !address.is_complete() => {
                issues.push(LoadIssue::InvalidFavourite(index))
            }
            Ok(address) if seen.insert(address.uprn.clone()) => favourites.push(address),
            Ok(address) => issues.push(LoadIssue::DuplicateFavourite(address.uprn)),
            Err(_) => issues.push(LoadIssue::InvalidFavourite(index)),
        }
    }
    favourites
}

fn notification_hour(obj: &Map<String, Value>, issues: &mut Vec<LoadIssue>) -> u8 {
    let Some(raw) = obj.get("notificationHour") else {
        return DEFAULT_NOTIFICATION_HOUR;
    };

    // Earlier versions saved the hour as a string.
    let hour = match raw {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    match hour {
        Some(h) if h <= u64::from(MAX_NOTIFICATION_HOUR) => h as u8,
        _ => {
            issues.push(LoadIssue::InvalidHour(raw.to_string()));
            DEFAULT_NOTIFICATION_HOUR
        }
    }
}

fn notifications_enabled(obj: &Map<String, Value>, issues: &mut Vec<LoadIssue>) -> bool {
    match obj.get("notificationsEnabled") {
        None => true,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) if s.trim() == "true" => true,
        Some(Value::String(s)) if s.trim() == "false" => false,
        Some(other) => {
            issues.push(LoadIssue::InvalidEnabledFlag(other.to_string()));
            true
        }
    }
}
