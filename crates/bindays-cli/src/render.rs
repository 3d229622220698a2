// Plain-text screens for the terminal: address list, dashboard, favourites,
// settings. Pure functions of their inputs so they can be tested without a
// network or a preferences file.

use bindays_format::{format_display_address, format_postcode};
use bindays_model::{
    format_collection_date, reminder_at, CollectionSchedule, FavouriteAddress, PreferenceState,
    RawAddress, RelativeDay,
};
use chrono::NaiveDate;
use std::fmt::Write;

/// Display label for a stored address.
pub fn address_label(address: &FavouriteAddress) -> String {
    format_display_address(Some(&address.text), Some(&address.postcode))
}

/// Numbered candidate list shown after a postcode search.
pub fn address_list(postcode: &str, addresses: &[RawAddress]) -> String {
    let postcode = format_postcode(postcode);
    if addresses.is_empty() {
        return format!(
            "No addresses found for postcode {postcode}. Please check and try again.\n"
        );
    }

    let mut out = format!("Addresses for {postcode}:\n");
    for (i, raw) in addresses.iter().enumerate() {
        let label = format_display_address(Some(&raw.text), Some(&postcode));
        let _ = writeln!(out, "{:>3}. {label}  [UPRN {}]", i + 1, raw.uprn);
    }
    out.push_str("\nPick one with: bindays select <POSTCODE> --index <N>\n");
    out
}

pub fn dashboard(
    address: &FavouriteAddress,
    schedule: &CollectionSchedule,
    today: NaiveDate,
    prefs: &PreferenceState,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", address_label(address));
    let _ = writeln!(out, "{}\n", format_postcode(&address.postcode));

    let entries = schedule.entries();
    let Some(next) = schedule.next_collection(today) else {
        out.push_str("No upcoming collections!\n");
        out.push_str("You're all caught up for the near future. Check back later for updates.\n");
        return out;
    };

    let _ = writeln!(out, "Next collection: {}", next.stream);
    let _ = writeln!(
        out,
        "  {} ({})\n",
        format_collection_date(Some(next.date)),
        RelativeDay::between(next.date, today)
    );

    for entry in &entries {
        let _ = writeln!(
            out,
            "  {:<11} {:<22} {}",
            entry.stream.display_name(),
            format_collection_date(Some(entry.date)),
            RelativeDay::between(entry.date, today)
        );
    }

    out.push('\n');
    if !prefs.notifications_enabled {
        out.push_str("Reminders are off.\n");
    } else if let Some(at) = reminder_at(next.date, prefs.notification_hour)
        .filter(|at| at.date() >= today)
    {
        let _ = writeln!(
            out,
            "Reminder: {} at {}",
            format_collection_date(Some(at.date())),
            at.format("%H:%M")
        );
    }
    out
}

pub fn favourites(state: &PreferenceState) -> String {
    if state.favourites.is_empty() {
        return "No favourites saved yet. Search with: bindays lookup <POSTCODE>\n".to_string();
    }

    let mut out = String::from("Favourites:\n");
    for fav in &state.favourites {
        let marker = if state.is_selected(&fav.uprn) { '*' } else { ' ' };
        let _ = writeln!(
            out,
            " {marker} {}, {}  [UPRN {}]",
            address_label(fav),
            format_postcode(&fav.postcode),
            fav.uprn
        );
    }
    out
}

pub fn settings(state: &PreferenceState) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Notifications: {}",
        if state.notifications_enabled { "on" } else { "off" }
    );
    let _ = writeln!(
        out,
        "Reminder time: {:02}:00 (day before collection)",
        state.notification_hour
    );
    match &state.selected_address {
        Some(selected) => {
            let _ = writeln!(out, "Address: {}", address_label(selected));
        }
        None => out.push_str("Address: none selected\n"),
    }
    out
}
