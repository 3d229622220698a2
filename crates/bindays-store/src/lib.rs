//! Persistent user preferences: the selected address, favourites, and
//! reminder settings, kept as one small JSON file.
//!
//! A [`PreferenceStore`] starts out in the loading phase. Until
//! [`PreferenceStore::load`] has finished, every read and write returns
//! [`StoreError::NotLoaded`], so nothing can act on (or overwrite) saved
//! state before it is known.

use bindays_model::{FavouriteAddress, PreferenceState, MAX_NOTIFICATION_HOUR};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub mod validate;

pub use validate::LoadIssue;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("preferences have not finished loading")]
    NotLoaded,

    #[error("notification hour must be between 0 and 23, got {0}")]
    InvalidHour(u8),

    #[error("address {0} is missing its UPRN or postcode")]
    IncompleteAddress(String),

    #[error("failed to read preferences from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write preferences to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Loaded,
}

/// File-backed preference store.
///
/// Writes are synchronous and rewrite the whole file; the last write wins.
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    phase: LoadPhase,
    state: PreferenceState,
    issues: Vec<LoadIssue>,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            phase: LoadPhase::Loading,
            state: PreferenceState::default(),
            issues: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn phase(&self) -> LoadPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == LoadPhase::Loading
    }

    /// Read and validate the preferences file.
    ///
    /// A missing file means a first run and yields defaults. Unusable
    /// contents are discarded piecemeal (see [`validate`]) and the cleaned
    /// state is written back. Only I/O failures other than "not found"
    /// are errors; the store then stays in the loading phase.
    pub async fn load(&mut self) -> Result<&[LoadIssue], StoreError> {
        let (state, issues) = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => validate::validate_contents(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "No saved preferences, using defaults");
                (PreferenceState::default(), Vec::new())
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        for issue in &issues {
            tracing::warn!(path = %self.path.display(), "{issue}");
        }

        self.state = state;
        self.issues = issues;
        self.phase = LoadPhase::Loaded;

        if !self.issues.is_empty() {
            self.persist()?;
        }

        tracing::debug!(
            path = %self.path.display(),
            favourites = self.state.favourites.len(),
            selected = self.state.selected_address.is_some(),
            "Loaded preferences"
        );
        Ok(&self.issues)
    }

    /// Problems found (and repaired) during the last load.
    pub fn load_issues(&self) -> &[LoadIssue] {
        &self.issues
    }

    pub fn state(&self) -> Result<&PreferenceState, StoreError> {
        match self.phase {
            LoadPhase::Loaded => Ok(&self.state),
            LoadPhase::Loading => Err(StoreError::NotLoaded),
        }
    }

    pub fn selected_address(&self) -> Result<Option<&FavouriteAddress>, StoreError> {
        Ok(self.state()?.selected_address.as_ref())
    }

    pub fn favourites(&self) -> Result<&[FavouriteAddress], StoreError> {
        Ok(&self.state()?.favourites)
    }

    pub fn notification_hour(&self) -> Result<u8, StoreError> {
        Ok(self.state()?.notification_hour)
    }

    pub fn notifications_enabled(&self) -> Result<bool, StoreError> {
        Ok(self.state()?.notifications_enabled)
    }

    /// Make `address` the active address, favouriting it if needed.
    pub fn select_address(&mut self, address: FavouriteAddress) -> Result<(), StoreError> {
        self.state()?;
        if !address.is_complete() {
            return Err(StoreError::IncompleteAddress(address.text));
        }

        if self.state.favourite(&address.uprn).is_none() {
            self.state.favourites.push(address.clone());
        }
        tracing::info!(uprn = %address.uprn, postcode = %address.postcode, "Selected address");
        self.state.selected_address = Some(address);
        self.persist()
    }

    pub fn clear_selection(&mut self) -> Result<(), StoreError> {
        self.state()?;
        self.state.selected_address = None;
        self.persist()
    }

    /// Add a favourite. Returns `false` if one with the same UPRN exists.
    pub fn add_favourite(&mut self, address: FavouriteAddress) -> Result<bool, StoreError> {
        if self.state()?.favourite(&address.uprn).is_some() {
            return Ok(false);
        }
        self.state.favourites.push(address);
        self.persist()?;
        Ok(true)
    }

    /// Remove a favourite by UPRN, clearing the selection if it pointed
    /// at the removed address. Returns `false` if nothing matched.
    pub fn remove_favourite(&mut self, uprn: &str) -> Result<bool, StoreError> {
        let before = self.state()?.favourites.len();
        self.state.favourites.retain(|f| f.uprn != uprn);
        if self.state.favourites.len() == before {
            return Ok(false);
        }

        if self.state.is_selected(uprn) {
            tracing::info!(uprn = %uprn, "Removed favourite was selected, clearing selection");
            self.state.selected_address = None;
        }
        self.persist()?;
        Ok(true)
    }

    pub fn set_notification_hour(&mut self, hour: u8) -> Result<(), StoreError> {
        self.state()?;
        if hour > MAX_NOTIFICATION_HOUR {
            return Err(StoreError::InvalidHour(hour));
        }
        self.state.notification_hour = hour;
        self.persist()
    }

    pub fn set_notifications_enabled(&mut self, enabled: bool) -> Result<(), StoreError> {
        self.state()?;
        self.state.notifications_enabled = enabled;
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(&self.state)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        std::fs::write(&self.path, json).map_err(|source| StoreError::Write {
            path: self.path.clone(),
            source,
        })?;
        tracing::debug!(path = %self.path.display(), "Saved preferences");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fav(uprn: &str) -> FavouriteAddress {
        FavouriteAddress::new(uprn, format!("{uprn} HILL HEAD, PENRYN"), "TR108JT")
    }

    async fn loaded(dir: &TempDir) -> PreferenceStore {
        let mut store = PreferenceStore::new(dir.path().join("bindays.json"));
        store.load().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_reads_and_writes_blocked_until_loaded() {
        let dir = TempDir::new().unwrap();
        let mut store = PreferenceStore::new(dir.path().join("bindays.json"));

        assert!(store.is_loading());
        assert!(matches!(store.selected_address(), Err(StoreError::NotLoaded)));
        assert!(matches!(store.favourites(), Err(StoreError::NotLoaded)));
        assert!(matches!(store.set_notification_hour(9), Err(StoreError::NotLoaded)));
        assert!(!dir.path().join("bindays.json").exists());

        store.load().await.unwrap();
        assert_eq!(store.phase(), LoadPhase::Loaded);
        assert_eq!(store.notification_hour().unwrap(), 18);
        assert!(store.notifications_enabled().unwrap());
        assert!(store.selected_address().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_selection_is_favourited_and_persisted() {
        let dir = TempDir::new().unwrap();
        let mut store = loaded(&dir).await;
        store.select_address(fav("100040012457")).unwrap();
        store.set_notification_hour(20).unwrap();
        store.set_notifications_enabled(false).unwrap();

        let reopened = loaded(&dir).await;
        assert!(reopened.load_issues().is_empty());
        assert_eq!(reopened.selected_address().unwrap().unwrap().uprn, "100040012457");
        assert_eq!(reopened.favourites().unwrap().len(), 1);
        assert_eq!(reopened.notification_hour().unwrap(), 20);
        assert!(!reopened.notifications_enabled().unwrap());
    }

    #[tokio::test]
    async fn test_favourites_dedup_by_uprn() {
        let dir = TempDir::new().unwrap();
        let mut store = loaded(&dir).await;
        assert!(store.add_favourite(fav("1")).unwrap());
        assert!(!store.add_favourite(fav("1")).unwrap());
        store.select_address(fav("1")).unwrap();
        assert_eq!(store.favourites().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_removing_selected_favourite_clears_selection() {
        let dir = TempDir::new().unwrap();
        let mut store = loaded(&dir).await;
        store.add_favourite(fav("1")).unwrap();
        store.select_address(fav("2")).unwrap();

        assert!(store.remove_favourite("1").unwrap());
        assert_eq!(store.selected_address().unwrap().unwrap().uprn, "2");

        assert!(store.remove_favourite("2").unwrap());
        assert!(store.selected_address().unwrap().is_none());
        assert!(!store.remove_favourite("2").unwrap());
    }

    #[tokio::test]
    async fn test_hour_range_enforced() {
        let dir = TempDir::new().unwrap();
        let mut store = loaded(&dir).await;
        store.set_notification_hour(0).unwrap();
        store.set_notification_hour(23).unwrap();
        assert!(matches!(store.set_notification_hour(24), Err(StoreError::InvalidHour(24))));
        assert_eq!(store.notification_hour().unwrap(), 23);
    }

    #[tokio::test]
    async fn test_incomplete_address_not_selectable() {
        let dir = TempDir::new().unwrap();
        let mut store = loaded(&dir).await;
        let incomplete = FavouriteAddress::new("1", "HILL HEAD", "");
        assert!(matches!(
            store.select_address(incomplete),
            Err(StoreError::IncompleteAddress(_))
        ));
        assert!(store.favourites().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_repaired_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bindays.json");
        std::fs::write(&path, "{ definitely not json").unwrap();

        let mut store = PreferenceStore::new(&path);
        let issues = store.load().await.unwrap().to_vec();
        assert!(matches!(issues.as_slice(), [LoadIssue::Corrupt(_)]));
        assert_eq!(store.state().unwrap(), &PreferenceState::default());

        let rewritten: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(rewritten["notificationHour"], 18);
    }

    #[tokio::test]
    async fn test_store_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.json");
        let mut store = PreferenceStore::new(&path);
        store.load().await.unwrap();
        store.clear_selection().unwrap();
        assert!(path.exists());
    }
}
