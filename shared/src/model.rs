use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

use crate::capabilities::{decode_or_default, SnapshotError, SnapshotImage, StorageKey, StoredValue};
use crate::catalog::{self, camping_type_label, CampingType, ChecklistCategory};
use crate::checklist::CompletionMarks;
use crate::config::PlannerConfig;
use crate::event::DraftEdit;
use crate::library::{push_unique, ChecklistLibrary};

/// Joins start and end dates in the archived `dates` string.
pub const DATE_SEPARATOR: &str = " to ";
pub const UNTITLED_TRIP: &str = "Untitled Trip";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CoordinateError {
    #[error("coordinates must be finite")]
    NonFinite,
    #[error("latitude {0} out of range [-90, 90]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} out of range [-180, 180]")]
    LongitudeOutOfRange(f64),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TripError {
    #[error("trip index {index} out of range (archive has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("{category} position {position} out of range (list has {len})")]
    PositionOutOfRange {
        category: ChecklistCategory,
        position: usize,
        len: usize,
    },

    #[error("unknown subpack: {0}")]
    UnknownSubpack(String),

    #[error("no trip is being edited")]
    NotEditing,

    #[error("a trip is already being edited")]
    EditInProgress,

    #[error("draft is read-only while the save completes")]
    SaveInProgress,

    #[error("no save is waiting for a snapshot")]
    NoSaveInFlight,

    #[error("no trip is being viewed")]
    NotViewing,

    #[error("item is not part of the viewed trip: {item}")]
    NotOnTrip { item: String },

    #[error("a delete is already waiting for confirmation")]
    DeletePending,

    #[error("no delete of trip {index} is waiting for confirmation")]
    NoDeletePending { index: usize },
}

/// A map point, serialized the way the map widget reports it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lng: f64,
}

impl LatLon {
    pub fn new(lat: f64, lng: f64) -> Result<Self, CoordinateError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(CoordinateError::NonFinite);
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(CoordinateError::LatitudeOutOfRange(lat));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(CoordinateError::LongitudeOutOfRange(lng));
        }
        Ok(Self { lat, lng })
    }
}

/// Map snapshot stored with a trip, as a `data:` URL.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MapImage(String);

impl MapImage {
    pub fn from_snapshot(image: &SnapshotImage, max_bytes: usize) -> Result<Self, SnapshotError> {
        if image.bytes.is_empty() {
            return Err(SnapshotError::Empty);
        }
        if image.bytes.len() > max_bytes {
            return Err(SnapshotError::TooLarge {
                size: image.bytes.len(),
                max: max_bytes,
            });
        }
        let format = image::guess_format(&image.bytes).map_err(|e| {
            SnapshotError::UnsupportedImage {
                reason: e.to_string(),
            }
        })?;
        Ok(Self(format!(
            "data:{};base64,{}",
            format.to_mime_type(),
            STANDARD.encode(&image.bytes)
        )))
    }

    #[must_use]
    pub fn as_data_url(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        let rest = self.0.strip_prefix("data:")?;
        rest.split_once(';').map(|(mime, _)| mime)
    }
}

impl fmt::Debug for MapImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapImage")
            .field("mime_type", &self.mime_type())
            .field("len", &self.0.len())
            .finish()
    }
}

/// In-progress form state for one trip.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripDraft {
    pub location_name: String,
    pub distance: String,
    pub camping_type: Option<CampingType>,
    pub party: String,
    pub start_date: String,
    pub end_date: String,
    pub map_location: Option<LatLon>,
    pub emergency_contact: String,
    pub emergency_acknowledged: bool,
    pub gear: Vec<String>,
    pub chores: Vec<String>,
    pub downloads: Vec<String>,
}

impl TripDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn from_trip(trip: &Trip) -> Self {
        let (start_date, end_date) = trip.date_range();
        Self {
            location_name: trip.location_name.clone(),
            distance: trip.distance.clone(),
            camping_type: trip.camping_type,
            party: trip.party.clone(),
            start_date,
            end_date,
            map_location: trip.map_location,
            emergency_contact: trip.emergency_contact.clone(),
            emergency_acknowledged: trip.emergency_acknowledged,
            gear: trip.gear.clone(),
            chores: trip.chores.clone(),
            downloads: trip.downloads.clone(),
        }
    }

    #[must_use]
    pub fn items(&self, category: ChecklistCategory) -> &[String] {
        match category {
            ChecklistCategory::Gear => &self.gear,
            ChecklistCategory::Chore => &self.chores,
            ChecklistCategory::Download => &self.downloads,
        }
    }

    fn items_mut(&mut self, category: ChecklistCategory) -> &mut Vec<String> {
        match category {
            ChecklistCategory::Gear => &mut self.gear,
            ChecklistCategory::Chore => &mut self.chores,
            ChecklistCategory::Download => &mut self.downloads,
        }
    }

    /// Trimmed, de-duplicated insert. Returns `true` if the list changed.
    pub fn add_item(&mut self, category: ChecklistCategory, item: &str) -> bool {
        push_unique(self.items_mut(category), item)
    }

    /// Removes whatever sits at `position`, regardless of its content.
    pub fn remove_item(
        &mut self,
        category: ChecklistCategory,
        position: usize,
    ) -> Result<String, TripError> {
        let items = self.items_mut(category);
        if position >= items.len() {
            return Err(TripError::PositionOutOfRange {
                category,
                position,
                len: items.len(),
            });
        }
        Ok(items.remove(position))
    }

    /// Appends the pack's items not already selected, in pack order.
    /// Returns how many were added.
    pub fn add_subpack(&mut self, name: &str) -> Result<usize, TripError> {
        let pack = catalog::subpack(name)
            .ok_or_else(|| TripError::UnknownSubpack(name.to_string()))?;
        Ok(pack
            .items
            .iter()
            .filter(|item| push_unique(&mut self.gear, item))
            .count())
    }

    pub fn apply(&mut self, edit: DraftEdit) {
        match edit {
            DraftEdit::LocationName(value) => self.location_name = value,
            DraftEdit::Distance(value) => self.distance = value,
            DraftEdit::CampingType(value) => self.camping_type = value,
            DraftEdit::Party(value) => self.party = value,
            DraftEdit::StartDate(value) => self.start_date = value,
            DraftEdit::EndDate(value) => self.end_date = value,
            DraftEdit::EmergencyContact(value) => self.emergency_contact = value,
            DraftEdit::EmergencyAcknowledged(value) => self.emergency_acknowledged = value,
        }
    }
}

/// An archived trip. Built once from a draft at save time and never mutated.
///
/// Field names on the wire match the archive format written by earlier
/// versions of the planner.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Trip {
    #[serde(rename = "where")]
    pub location_name: String,
    pub distance: String,
    #[serde(rename = "type", with = "camping_type_label")]
    pub camping_type: Option<CampingType>,
    #[serde(rename = "who")]
    pub party: String,
    pub dates: String,
    pub map_location: Option<LatLon>,
    pub gear: Vec<String>,
    pub chores: Vec<String>,
    pub downloads: Vec<String>,
    pub emergency_contact: String,
    #[serde(rename = "emergencyTold")]
    pub emergency_acknowledged: bool,
    pub map_image: Option<MapImage>,
}

impl Trip {
    #[must_use]
    pub fn from_draft(draft: &TripDraft, map_image: Option<MapImage>) -> Self {
        Self {
            location_name: draft.location_name.clone(),
            distance: draft.distance.clone(),
            camping_type: draft.camping_type,
            party: draft.party.clone(),
            dates: format!("{}{DATE_SEPARATOR}{}", draft.start_date, draft.end_date),
            map_location: draft.map_location,
            gear: draft.gear.clone(),
            chores: draft.chores.clone(),
            downloads: draft.downloads.clone(),
            emergency_contact: draft.emergency_contact.clone(),
            emergency_acknowledged: draft.emergency_acknowledged,
            map_image,
        }
    }

    /// Splits `dates` at the first separator; both halves are empty when
    /// the separator is missing.
    #[must_use]
    pub fn date_range(&self) -> (String, String) {
        self.dates
            .split_once(DATE_SEPARATOR)
            .map(|(start, end)| (start.to_string(), end.to_string()))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn title(&self) -> &str {
        if self.location_name.trim().is_empty() {
            UNTITLED_TRIP
        } else {
            &self.location_name
        }
    }
}

// Redact debug output: emergency contact and the snapshot payload stay out of logs.
impl fmt::Debug for Trip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trip")
            .field("location_name", &self.location_name)
            .field("dates", &self.dates)
            .field("camping_type", &self.camping_type)
            .field("map_location", &self.map_location)
            .field("gear", &self.gear.len())
            .field("chores", &self.chores.len())
            .field("downloads", &self.downloads.len())
            .field("emergency_contact_present", &!self.emergency_contact.is_empty())
            .field("emergency_acknowledged", &self.emergency_acknowledged)
            .field("map_image_present", &self.map_image.is_some())
            .finish_non_exhaustive()
    }
}

/// Saved trips in save order, addressed by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TripArchive(Vec<Trip>);

impl TripArchive {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trip> {
        self.0.iter()
    }

    fn check(&self, index: usize) -> Result<(), TripError> {
        if index < self.0.len() {
            Ok(())
        } else {
            Err(TripError::IndexOutOfRange {
                index,
                len: self.0.len(),
            })
        }
    }

    pub fn get(&self, index: usize) -> Result<&Trip, TripError> {
        self.check(index)?;
        Ok(&self.0[index])
    }

    /// Appends and returns the new trip's index.
    pub fn push(&mut self, trip: Trip) -> usize {
        self.0.push(trip);
        self.0.len() - 1
    }

    pub fn replace(&mut self, index: usize, trip: Trip) -> Result<Trip, TripError> {
        self.check(index)?;
        Ok(std::mem::replace(&mut self.0[index], trip))
    }

    /// Drops the trip's map image. Returns `true` if it had one.
    pub fn strip_map_image(&mut self, index: usize) -> bool {
        self.0
            .get_mut(index)
            .and_then(|trip| trip.map_image.take())
            .is_some()
    }

    pub fn remove(&mut self, index: usize) -> Result<Trip, TripError> {
        self.check(index)?;
        Ok(self.0.remove(index))
    }
}

impl From<Vec<Trip>> for TripArchive {
    fn from(trips: Vec<Trip>) -> Self {
        Self(trips)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    pub draft: TripDraft,
    /// `None` for a new trip, otherwise the archive position being replaced.
    pub editing_index: Option<usize>,
    /// Set while waiting for the map snapshot; the draft is frozen meanwhile.
    pub saving: bool,
}

impl EditSession {
    fn new(draft: TripDraft, editing_index: Option<usize>) -> Self {
        Self {
            draft,
            editing_index,
            saving: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewSession {
    pub trip: Trip,
    pub index: usize,
    pub marks: CompletionMarks,
}

impl ViewSession {
    fn new(trip: Trip, index: usize) -> Self {
        Self {
            trip,
            index,
            marks: CompletionMarks::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Screen {
    /// Waiting for persisted state.
    #[default]
    Loading,
    Home,
    Editing(EditSession),
    Viewing(ViewSession),
}

#[derive(Debug, Clone, Default)]
pub struct Hydration {
    loaded: HashSet<StorageKey>,
}

impl Hydration {
    #[must_use]
    pub fn is_loaded(&self, key: StorageKey) -> bool {
        self.loaded.contains(&key)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        StorageKey::ALL.iter().all(|key| self.loaded.contains(key))
    }
}

#[derive(Debug, Default)]
pub struct Model {
    pub config: PlannerConfig,
    pub library: ChecklistLibrary,
    pub archive: TripArchive,
    pub screen: Screen,
    pub hydration: Hydration,
    /// Archive position the open delete prompt was raised for.
    pub pending_delete: Option<usize>,
}

impl Model {
    /// Applies one persisted value. Returns `true` when this completed startup.
    pub fn hydrate(&mut self, key: StorageKey, stored: StoredValue) -> bool {
        if self.hydration.is_loaded(key) {
            debug!(%key, "ignoring repeated load");
            return false;
        }
        match key {
            StorageKey::TripArchive => {
                self.archive = decode_or_default(key, stored);
            }
            StorageKey::UserGearLibrary => {
                self.library
                    .restore(ChecklistCategory::Gear, decode_or_default(key, stored));
            }
            StorageKey::UserChoreLibrary => {
                self.library
                    .restore(ChecklistCategory::Chore, decode_or_default(key, stored));
            }
            StorageKey::UserDownloadLibrary => {
                self.library
                    .restore(ChecklistCategory::Download, decode_or_default(key, stored));
            }
        }
        self.hydration.loaded.insert(key);

        if self.hydration.is_complete() && self.screen == Screen::Loading {
            info!(trips = self.archive.len(), "planner state restored");
            self.screen = Screen::Home;
            return true;
        }
        false
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.screen == Screen::Loading
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        matches!(self.screen, Screen::Editing(_))
    }

    fn ensure_not_editing(&self) -> Result<(), TripError> {
        if self.is_editing() {
            return Err(TripError::EditInProgress);
        }
        Ok(())
    }

    pub fn start_new(&mut self) -> Result<(), TripError> {
        self.ensure_not_editing()?;
        self.screen = Screen::Editing(EditSession::new(TripDraft::new(), None));
        Ok(())
    }

    pub fn start_edit(&mut self, index: usize) -> Result<(), TripError> {
        self.ensure_not_editing()?;
        let draft = TripDraft::from_trip(self.archive.get(index)?);
        self.screen = Screen::Editing(EditSession::new(draft, Some(index)));
        Ok(())
    }

    pub fn view_trip(&mut self, index: usize) -> Result<(), TripError> {
        self.ensure_not_editing()?;
        let trip = self.archive.get(index)?.clone();
        self.screen = Screen::Viewing(ViewSession::new(trip, index));
        Ok(())
    }

    /// Re-opens the trip on screen for editing.
    pub fn edit_viewed(&mut self) -> Result<(), TripError> {
        let index = self.viewed_index().ok_or(TripError::NotViewing)?;
        self.start_edit(index)
    }

    /// Leaves the current screen. Cancelling an edit discards the draft.
    pub fn go_home(&mut self) -> Result<(), TripError> {
        if let Screen::Editing(session) = &self.screen {
            if session.saving {
                return Err(TripError::SaveInProgress);
            }
        }
        self.screen = Screen::Home;
        Ok(())
    }

    #[must_use]
    pub fn viewed_index(&self) -> Option<usize> {
        match &self.screen {
            Screen::Viewing(session) => Some(session.index),
            _ => None,
        }
    }

    /// The draft, if there is one and it is not frozen by a pending save.
    pub fn editable_session(&mut self) -> Result<&mut EditSession, TripError> {
        match &mut self.screen {
            Screen::Editing(session) if session.saving => Err(TripError::SaveInProgress),
            Screen::Editing(session) => Ok(session),
            _ => Err(TripError::NotEditing),
        }
    }

    pub fn edit_draft(&mut self, edit: DraftEdit) -> Result<(), TripError> {
        self.editable_session()?.draft.apply(edit);
        Ok(())
    }

    pub fn set_map_location(&mut self, location: Option<LatLon>) -> Result<(), TripError> {
        self.editable_session()?.draft.map_location = location;
        Ok(())
    }

    pub fn add_to_draft(
        &mut self,
        category: ChecklistCategory,
        item: &str,
    ) -> Result<bool, TripError> {
        Ok(self.editable_session()?.draft.add_item(category, item))
    }

    /// Adds a typed-in entry to the draft and, if asked, to the user library.
    /// Returns `true` when the library changed.
    pub fn add_custom(
        &mut self,
        category: ChecklistCategory,
        item: &str,
        remember: bool,
    ) -> Result<bool, TripError> {
        self.editable_session()?.draft.add_item(category, item);
        Ok(remember && self.library.remember(category, item))
    }

    pub fn remove_from_draft(
        &mut self,
        category: ChecklistCategory,
        position: usize,
    ) -> Result<String, TripError> {
        self.editable_session()?.draft.remove_item(category, position)
    }

    pub fn add_subpack(&mut self, name: &str) -> Result<usize, TripError> {
        self.editable_session()?.draft.add_subpack(name)
    }

    /// Copies the draft entry at `position` into the user library.
    /// Returns `true` when the library changed.
    pub fn remember_draft_item(
        &mut self,
        category: ChecklistCategory,
        position: usize,
    ) -> Result<bool, TripError> {
        let items = self.editable_session()?.draft.items(category);
        let item = items
            .get(position)
            .cloned()
            .ok_or(TripError::PositionOutOfRange {
                category,
                position,
                len: items.len(),
            })?;
        Ok(self.library.remember(category, &item))
    }

    /// Freezes the draft until [`Model::finish_save`] runs.
    pub fn begin_save(&mut self) -> Result<(), TripError> {
        self.editable_session()?.saving = true;
        Ok(())
    }

    /// Builds the trip, stores it, and switches to viewing it.
    /// Returns the trip's archive index.
    pub fn finish_save(&mut self, map_image: Option<MapImage>) -> Result<usize, TripError> {
        let session = match &self.screen {
            Screen::Editing(session) if session.saving => session,
            _ => return Err(TripError::NoSaveInFlight),
        };
        let trip = Trip::from_draft(&session.draft, map_image);

        let index = match session.editing_index {
            Some(index) if index < self.archive.len() => {
                self.archive.replace(index, trip.clone())?;
                index
            }
            Some(index) => {
                debug!(index, "edited trip no longer in archive, appending");
                self.archive.push(trip.clone())
            }
            None => self.archive.push(trip.clone()),
        };

        self.screen = Screen::Viewing(ViewSession::new(trip, index));
        Ok(index)
    }

    /// Removes the map image of the trip at `index`, in the archive and on
    /// screen. Returns `true` if there was an image to drop.
    pub fn drop_map_image(&mut self, index: usize) -> bool {
        if !self.archive.strip_map_image(index) {
            return false;
        }
        if let Screen::Viewing(session) = &mut self.screen {
            if session.index == index {
                session.trip.map_image = None;
            }
        }
        true
    }

    /// Records that a delete prompt is open for `index`. Only one prompt may
    /// be open at a time.
    pub fn request_delete(&mut self, index: usize) -> Result<(), TripError> {
        self.ensure_not_editing()?;
        if self.pending_delete.is_some() {
            return Err(TripError::DeletePending);
        }
        self.archive.get(index)?;
        self.pending_delete = Some(index);
        Ok(())
    }

    /// Closes the open prompt for `index`. Returns the removed trip, or
    /// `None` when the user declined.
    pub fn resolve_delete(
        &mut self,
        index: usize,
        confirmed: bool,
    ) -> Result<Option<Trip>, TripError> {
        if self.pending_delete != Some(index) {
            return Err(TripError::NoDeletePending { index });
        }
        self.pending_delete = None;
        if confirmed {
            self.delete_trip(index).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Removes a trip by position. A viewed trip at that position sends the
    /// screen home; a viewed trip after it keeps pointing at itself.
    pub fn delete_trip(&mut self, index: usize) -> Result<Trip, TripError> {
        self.ensure_not_editing()?;
        let removed = self.archive.remove(index)?;

        if let Screen::Viewing(session) = &mut self.screen {
            if session.index == index {
                self.screen = Screen::Home;
            } else if session.index > index {
                session.index -= 1;
            }
        }
        Ok(removed)
    }

    fn viewing_session(&mut self) -> Result<&mut ViewSession, TripError> {
        match &mut self.screen {
            Screen::Viewing(session) => Ok(session),
            _ => Err(TripError::NotViewing),
        }
    }

    /// Returns the item's new packed state.
    pub fn toggle_packed(&mut self, item: &str) -> Result<bool, TripError> {
        let session = self.viewing_session()?;
        if !session.trip.gear.iter().any(|gear| gear == item) {
            return Err(TripError::NotOnTrip {
                item: item.to_string(),
            });
        }
        Ok(session.marks.toggle_packed(item))
    }

    /// Returns the chore's new done state.
    pub fn toggle_chore_done(&mut self, item: &str) -> Result<bool, TripError> {
        let session = self.viewing_session()?;
        if !session.trip.chores.iter().any(|chore| chore == item) {
            return Err(TripError::NotOnTrip {
                item: item.to_string(),
            });
        }
        Ok(session.marks.toggle_done(item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 12] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13];

    fn ready_model() -> Model {
        let mut model = Model::default();
        for key in StorageKey::ALL {
            model.hydrate(key, Ok(None));
        }
        model
    }

    fn sample_draft() -> TripDraft {
        TripDraft {
            location_name: "Uinta Highline".into(),
            distance: "12 mi".into(),
            camping_type: Some(CampingType::Backpacking),
            party: "Me and Rhea".into(),
            start_date: "2026-07-01".into(),
            end_date: "2026-07-04".into(),
            map_location: Some(LatLon::new(40.7, -110.4).unwrap()),
            emergency_contact: "Sam 555-0100".into(),
            emergency_acknowledged: true,
            gear: vec!["Tent".into(), "Thermals".into()],
            chores: vec!["Dishes".into()],
            downloads: vec!["Offline Map".into()],
        }
    }

    fn save(model: &mut Model, draft: TripDraft) -> usize {
        model.editable_session().unwrap().draft = draft;
        model.begin_save().unwrap();
        model.finish_save(None).unwrap()
    }

    mod coordinate_tests {
        use super::*;

        #[test]
        fn test_valid_coordinates() {
            assert!(LatLon::new(0.0, 0.0).is_ok());
            assert!(LatLon::new(90.0, 180.0).is_ok());
            assert!(LatLon::new(-90.0, -180.0).is_ok());
        }

        #[test]
        fn test_invalid_coordinates() {
            assert_eq!(
                LatLon::new(91.0, 0.0),
                Err(CoordinateError::LatitudeOutOfRange(91.0))
            );
            assert_eq!(
                LatLon::new(0.0, -181.0),
                Err(CoordinateError::LongitudeOutOfRange(-181.0))
            );
            assert_eq!(LatLon::new(f64::NAN, 0.0), Err(CoordinateError::NonFinite));
            assert_eq!(
                LatLon::new(0.0, f64::INFINITY),
                Err(CoordinateError::NonFinite)
            );
        }
    }

    mod draft_tests {
        use super::*;

        #[test]
        fn test_selecting_same_item_twice_keeps_one() {
            let mut draft = TripDraft::new();
            assert!(draft.add_item(ChecklistCategory::Gear, "Tent"));
            assert!(!draft.add_item(ChecklistCategory::Gear, "Tent"));
            assert_eq!(draft.gear, vec!["Tent"]);
        }

        #[test]
        fn test_blank_items_are_ignored() {
            let mut draft = TripDraft::new();
            assert!(!draft.add_item(ChecklistCategory::Chore, "   "));
            assert!(!draft.add_item(ChecklistCategory::Download, ""));
            assert!(draft.chores.is_empty());
            assert!(draft.downloads.is_empty());
        }

        #[test]
        fn test_add_snow_pack_preserves_order() {
            let mut draft = TripDraft::new();
            draft.add_item(ChecklistCategory::Gear, "Tent");

            assert_eq!(draft.add_subpack("Snow Pack"), Ok(8));
            assert_eq!(
                draft.gear,
                vec![
                    "Tent",
                    "Snow traction",
                    "Snow gloves",
                    "Snow shovel",
                    "Sunglasses",
                    "Wool socks extra",
                    "Rain coat",
                    "Gators",
                    "Waterproof shoes",
                ]
            );
        }

        #[test]
        fn test_add_subpack_skips_present_items() {
            let mut draft = TripDraft::new();
            draft.add_subpack("Snow Pack").unwrap();
            assert_eq!(draft.add_subpack("Hot Weather"), Ok(5));
            assert_eq!(draft.add_subpack("Hot Weather"), Ok(0));
            assert_eq!(
                draft.gear.iter().filter(|g| *g == "Sunglasses").count(),
                1
            );
        }

        #[test]
        fn test_unknown_subpack_is_rejected() {
            let mut draft = TripDraft::new();
            assert_eq!(
                draft.add_subpack("Moon Pack"),
                Err(TripError::UnknownSubpack("Moon Pack".into()))
            );
            assert!(draft.gear.is_empty());
        }

        #[test]
        fn test_remove_by_position() {
            let mut draft = TripDraft::new();
            draft.add_item(ChecklistCategory::Chore, "Dishes");
            draft.add_item(ChecklistCategory::Chore, "Trash");

            assert_eq!(
                draft.remove_item(ChecklistCategory::Chore, 5),
                Err(TripError::PositionOutOfRange {
                    category: ChecklistCategory::Chore,
                    position: 5,
                    len: 2
                })
            );
            assert_eq!(draft.remove_item(ChecklistCategory::Chore, 0), Ok("Dishes".into()));
            assert_eq!(draft.chores, vec!["Trash"]);
        }

        #[test]
        fn test_apply_edits() {
            let mut draft = TripDraft::new();
            draft.apply(DraftEdit::LocationName("Moab".into()));
            draft.apply(DraftEdit::CampingType(Some(CampingType::Car)));
            draft.apply(DraftEdit::EmergencyAcknowledged(true));
            assert_eq!(draft.location_name, "Moab");
            assert_eq!(draft.camping_type, Some(CampingType::Car));
            assert!(draft.emergency_acknowledged);
        }
    }

    mod trip_tests {
        use super::*;

        #[test]
        fn test_dates_join_and_split() {
            let trip = Trip::from_draft(&sample_draft(), None);
            assert_eq!(trip.dates, "2026-07-01 to 2026-07-04");
            assert_eq!(
                trip.date_range(),
                ("2026-07-01".to_string(), "2026-07-04".to_string())
            );
        }

        #[test]
        fn test_dates_without_separator_split_empty() {
            let trip = Trip {
                dates: "sometime in July".into(),
                ..Trip::default()
            };
            assert_eq!(trip.date_range(), (String::new(), String::new()));
        }

        #[test]
        fn test_empty_dates_round_trip() {
            let trip = Trip::from_draft(&TripDraft::new(), None);
            assert_eq!(trip.dates, " to ");
            assert_eq!(trip.date_range(), (String::new(), String::new()));
        }

        #[test]
        fn test_title_falls_back() {
            assert_eq!(Trip::default().title(), UNTITLED_TRIP);
            assert_eq!(Trip::from_draft(&sample_draft(), None).title(), "Uinta Highline");
        }

        #[test]
        fn test_archive_json_shape() {
            let trip = Trip::from_draft(&sample_draft(), None);
            let json = serde_json::to_value(&trip).unwrap();
            assert_eq!(json["where"], "Uinta Highline");
            assert_eq!(json["who"], "Me and Rhea");
            assert_eq!(json["type"], "Backpacking - can't make trip back to car");
            assert_eq!(json["dates"], "2026-07-01 to 2026-07-04");
            assert_eq!(json["mapLocation"]["lng"], -110.4);
            assert_eq!(json["emergencyContact"], "Sam 555-0100");
            assert_eq!(json["emergencyTold"], true);
            assert!(json["mapImage"].is_null());
        }

        #[test]
        fn test_legacy_trip_decodes_with_defaults() {
            let json = r#"{
                "where": "Zion",
                "type": "",
                "dates": "a to b",
                "gear": ["Tent"],
                "mapImage": "data:image/png;base64,AAAA"
            }"#;
            let trip: Trip = serde_json::from_str(json).unwrap();
            assert_eq!(trip.location_name, "Zion");
            assert_eq!(trip.camping_type, None);
            assert!(trip.chores.is_empty());
            assert!(!trip.emergency_acknowledged);
            assert_eq!(
                trip.map_image.as_ref().and_then(MapImage::mime_type),
                Some("image/png")
            );
        }

        #[test]
        fn test_unknown_camping_type_decodes_unselected() {
            let trip: Trip = serde_json::from_str(r#"{"type":"Glamping"}"#).unwrap();
            assert_eq!(trip.camping_type, None);
        }

        #[test]
        fn test_debug_redacts_contact_and_image() {
            let trip = Trip::from_draft(&sample_draft(), None);
            let debug = format!("{trip:?}");
            assert!(!debug.contains("555-0100"));
            assert!(debug.contains("emergency_contact_present: true"));
        }
    }

    mod map_image_tests {
        use super::*;

        #[test]
        fn test_png_snapshot_becomes_data_url() {
            let image = SnapshotImage {
                bytes: PNG_MAGIC.to_vec(),
            };
            let map_image = MapImage::from_snapshot(&image, 1024).unwrap();
            assert!(map_image.as_data_url().starts_with("data:image/png;base64,"));
            assert_eq!(map_image.mime_type(), Some("image/png"));
        }

        #[test]
        fn test_rejects_non_image_bytes() {
            let image = SnapshotImage {
                bytes: b"definitely not an image".to_vec(),
            };
            assert!(matches!(
                MapImage::from_snapshot(&image, 1024),
                Err(SnapshotError::UnsupportedImage { .. })
            ));
        }

        #[test]
        fn test_rejects_empty_and_oversized() {
            let empty = SnapshotImage { bytes: Vec::new() };
            assert_eq!(MapImage::from_snapshot(&empty, 1024), Err(SnapshotError::Empty));

            let image = SnapshotImage {
                bytes: PNG_MAGIC.to_vec(),
            };
            assert_eq!(
                MapImage::from_snapshot(&image, 4),
                Err(SnapshotError::TooLarge { size: 12, max: 4 })
            );
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[test]
        fn test_hydration_moves_to_home() {
            let mut model = Model::default();
            assert!(model.is_loading());
            assert!(!model.hydrate(StorageKey::TripArchive, Ok(None)));
            assert!(!model.hydrate(StorageKey::UserGearLibrary, Ok(None)));
            assert!(!model.hydrate(StorageKey::UserChoreLibrary, Ok(None)));
            assert!(model.hydrate(StorageKey::UserDownloadLibrary, Ok(None)));
            assert_eq!(model.screen, Screen::Home);
        }

        #[test]
        fn test_malformed_gear_library_falls_back_to_builtins() {
            let mut model = Model::default();
            model.hydrate(StorageKey::UserGearLibrary, Ok(Some(b"[oops".to_vec())));
            assert!(model.library.user_items(ChecklistCategory::Gear).is_empty());
            assert_eq!(
                model.library.catalog(ChecklistCategory::Gear),
                ChecklistLibrary::new().catalog(ChecklistCategory::Gear)
            );
        }

        #[test]
        fn test_save_new_then_edit_round_trips() {
            let mut model = ready_model();
            model.start_new().unwrap();
            let index = save(&mut model, sample_draft());
            assert_eq!(index, 0);
            assert_eq!(model.viewed_index(), Some(0));

            model.go_home().unwrap();
            model.start_edit(0).unwrap();
            let Screen::Editing(session) = &model.screen else {
                panic!("expected editing screen");
            };
            assert_eq!(session.editing_index, Some(0));
            assert_eq!(session.draft, sample_draft());
        }

        #[test]
        fn test_save_edit_replaces_in_place() {
            let mut model = ready_model();
            for name in ["A", "B", "C"] {
                model.start_new().unwrap();
                let mut draft = sample_draft();
                draft.location_name = name.into();
                save(&mut model, draft);
            }

            model.start_edit(1).unwrap();
            model
                .edit_draft(DraftEdit::LocationName("B2".into()))
                .unwrap();
            model.begin_save().unwrap();
            assert_eq!(model.finish_save(None), Ok(1));

            let names: Vec<_> = model.archive.iter().map(|t| t.location_name.as_str()).collect();
            assert_eq!(names, vec!["A", "B2", "C"]);
        }

        #[test]
        fn test_start_edit_out_of_range_is_rejected() {
            let mut model = ready_model();
            assert_eq!(
                model.start_edit(3),
                Err(TripError::IndexOutOfRange { index: 3, len: 0 })
            );
            assert_eq!(model.screen, Screen::Home);
        }

        #[test]
        fn test_draft_is_frozen_while_saving() {
            let mut model = ready_model();
            model.start_new().unwrap();
            model.begin_save().unwrap();

            assert_eq!(
                model.add_to_draft(ChecklistCategory::Gear, "Tent"),
                Err(TripError::SaveInProgress)
            );
            assert_eq!(model.go_home(), Err(TripError::SaveInProgress));
            assert_eq!(model.begin_save(), Err(TripError::SaveInProgress));
        }

        #[test]
        fn test_finish_save_requires_pending_save() {
            let mut model = ready_model();
            assert_eq!(model.finish_save(None), Err(TripError::NoSaveInFlight));
            model.start_new().unwrap();
            assert_eq!(model.finish_save(None), Err(TripError::NoSaveInFlight));
        }

        #[test]
        fn test_save_clears_completion_marks() {
            let mut model = ready_model();
            model.start_new().unwrap();
            save(&mut model, sample_draft());
            assert_eq!(model.toggle_packed("Tent"), Ok(true));

            model.edit_viewed().unwrap();
            model.begin_save().unwrap();
            model.finish_save(None).unwrap();

            let Screen::Viewing(session) = &model.screen else {
                panic!("expected viewing screen");
            };
            assert!(!session.marks.is_packed("Tent"));
        }

        #[test]
        fn test_add_custom_remembers_on_request() {
            let mut model = ready_model();
            model.start_new().unwrap();

            assert_eq!(model.add_custom(ChecklistCategory::Gear, " Kayak ", false), Ok(false));
            assert_eq!(model.add_custom(ChecklistCategory::Gear, "Paddle", true), Ok(true));

            let Screen::Editing(session) = &model.screen else {
                panic!("expected editing screen");
            };
            assert_eq!(session.draft.gear, vec!["Kayak", "Paddle"]);
            assert_eq!(model.library.user_items(ChecklistCategory::Gear), ["Paddle"]);
        }

        #[test]
        fn test_remember_draft_item_by_position() {
            let mut model = ready_model();
            model.start_new().unwrap();
            model.add_to_draft(ChecklistCategory::Gear, "Camp stove").unwrap();

            assert_eq!(model.remember_draft_item(ChecklistCategory::Gear, 0), Ok(true));
            assert_eq!(model.remember_draft_item(ChecklistCategory::Gear, 0), Ok(false));
            assert!(matches!(
                model.remember_draft_item(ChecklistCategory::Gear, 1),
                Err(TripError::PositionOutOfRange { .. })
            ));
        }

        #[test]
        fn test_delete_keeps_earlier_positions() {
            let mut model = ready_model();
            for name in ["A", "B", "C"] {
                model.start_new().unwrap();
                let mut draft = sample_draft();
                draft.location_name = name.into();
                save(&mut model, draft);
            }
            model.go_home().unwrap();

            assert_eq!(model.delete_trip(2).map(|t| t.location_name), Ok("C".into()));
            assert_eq!(model.archive.len(), 2);
            assert_eq!(model.archive.get(0).unwrap().location_name, "A");
            assert_eq!(model.archive.get(1).unwrap().location_name, "B");
        }

        #[test]
        fn test_delete_viewed_trip_returns_home() {
            let mut model = ready_model();
            model.start_new().unwrap();
            save(&mut model, sample_draft());
            assert_eq!(model.viewed_index(), Some(0));

            model.delete_trip(0).unwrap();
            assert_eq!(model.screen, Screen::Home);
        }

        #[test]
        fn test_delete_earlier_trip_shifts_viewed_index() {
            let mut model = ready_model();
            for _ in 0..2 {
                model.start_new().unwrap();
                save(&mut model, sample_draft());
            }
            assert_eq!(model.viewed_index(), Some(1));

            model.delete_trip(0).unwrap();
            assert_eq!(model.viewed_index(), Some(0));
        }

        #[test]
        fn test_second_delete_prompt_is_refused() {
            let mut model = ready_model();
            model.archive = TripArchive::from(vec![Trip::default(), Trip::default()]);

            assert_eq!(model.request_delete(0), Ok(()));
            assert_eq!(model.request_delete(0), Err(TripError::DeletePending));
            assert_eq!(model.resolve_delete(0, true).map(|t| t.is_some()), Ok(true));
            assert_eq!(
                model.resolve_delete(0, true),
                Err(TripError::NoDeletePending { index: 0 })
            );
            assert_eq!(model.archive.len(), 1);
        }

        #[test]
        fn test_declined_delete_closes_prompt() {
            let mut model = ready_model();
            model.archive = TripArchive::from(vec![Trip::default()]);

            model.request_delete(0).unwrap();
            assert_eq!(model.resolve_delete(0, false), Ok(None));
            assert_eq!(model.pending_delete, None);
            assert_eq!(model.request_delete(0), Ok(()));
        }

        #[test]
        fn test_delete_prompt_requires_valid_index() {
            let mut model = ready_model();
            assert_eq!(
                model.request_delete(0),
                Err(TripError::IndexOutOfRange { index: 0, len: 0 })
            );
            assert_eq!(model.pending_delete, None);
        }

        #[test]
        fn test_drop_map_image_updates_viewed_trip() {
            let mut model = ready_model();
            model.start_new().unwrap();
            model.begin_save().unwrap();
            let image = MapImage::from_snapshot(
                &SnapshotImage {
                    bytes: PNG_MAGIC.to_vec(),
                },
                1024,
            )
            .unwrap();
            let index = model.finish_save(Some(image)).unwrap();

            assert!(model.drop_map_image(index));
            assert!(!model.drop_map_image(index));
            assert!(model.archive.get(index).unwrap().map_image.is_none());
            let Screen::Viewing(session) = &model.screen else {
                panic!("expected viewing screen");
            };
            assert!(session.trip.map_image.is_none());
        }

        #[test]
        fn test_toggle_requires_item_on_trip() {
            let mut model = ready_model();
            model.start_new().unwrap();
            save(&mut model, sample_draft());

            assert_eq!(model.toggle_chore_done("Dishes"), Ok(true));
            assert_eq!(model.toggle_chore_done("Dishes"), Ok(false));
            assert!(matches!(
                model.toggle_packed("Kayak"),
                Err(TripError::NotOnTrip { .. })
            ));
        }
    }
}
