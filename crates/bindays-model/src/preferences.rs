use serde::{Deserialize, Serialize};

use crate::address::FavouriteAddress;

pub const DEFAULT_NOTIFICATION_HOUR: u8 = 18;
pub const MAX_NOTIFICATION_HOUR: u8 = 23;

/// Everything the app persists between runs, as one JSON blob.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceState {
    /// The address the dashboard shows. Always also present in `favourites`.
    pub selected_address: Option<FavouriteAddress>,
    pub favourites: Vec<FavouriteAddress>,
    /// Hour of day (0-23) for the day-before reminder.
    pub notification_hour: u8,
    pub notifications_enabled: bool,
}

impl Default for PreferenceState {
    fn default() -> Self {
        Self {
            selected_address: None,
            favourites: Vec::new(),
            notification_hour: DEFAULT_NOTIFICATION_HOUR,
            notifications_enabled: true,
        }
    }
}

impl PreferenceState {
    pub fn favourite(&self, uprn: &str) -> Option<&FavouriteAddress> {
        self.favourites.iter().find(|f| f.uprn == uprn)
    }

    pub fn is_selected(&self, uprn: &str) -> bool {
        self.selected_address
            .as_ref()
            .is_some_and(|s| s.uprn == uprn)
    }
}
