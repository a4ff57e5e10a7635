use serde::{Deserialize, Serialize};

use crate::catalog::{CampingType, ChecklistCategory, SUBPACKS};
use crate::checklist::{group_gear, CompletionMarks};
use crate::config::PlannerConfig;
use crate::library::ChecklistLibrary;
use crate::model::{EditSession, LatLon, Model, Screen, TripArchive, ViewSession};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TripSummary {
    pub index: usize,
    pub title: String,
    pub dates: String,
}

/// User-added entries only, for the "Manage Libraries" panel.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct LibraryView {
    pub category: ChecklistCategory,
    pub items: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MapView {
    pub center: LatLon,
    pub zoom: f64,
    pub marker: Option<LatLon>,
    /// Element handle the shell renders the map into and snapshots on save.
    pub region: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DraftListView {
    pub category: ChecklistCategory,
    pub selected: Vec<String>,
    pub catalog: Vec<String>,
    pub remember_by_default: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DraftView {
    pub location_name: String,
    pub distance: String,
    pub camping_type: Option<String>,
    pub party: String,
    pub start_date: String,
    pub end_date: String,
    pub emergency_contact: String,
    pub emergency_acknowledged: bool,
    pub lists: Vec<DraftListView>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChecklistItemView {
    pub label: String,
    pub checked: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct GearGroupView {
    pub title: String,
    pub items: Vec<ChecklistItemView>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TripView {
    pub index: usize,
    pub title: String,
    pub location_name: String,
    pub distance: String,
    pub camping_type: Option<String>,
    pub party: String,
    pub dates: String,
    pub map_location: Option<LatLon>,
    pub emergency_contact: String,
    pub emergency_acknowledged: bool,
    pub gear_groups: Vec<GearGroupView>,
    pub chores: Vec<ChecklistItemView>,
    pub downloads: Vec<String>,
    pub map_image: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewState {
    Loading,
    Home {
        trips: Vec<TripSummary>,
        libraries: Vec<LibraryView>,
    },
    Editing {
        is_new: bool,
        is_saving: bool,
        draft: DraftView,
        camping_types: Vec<String>,
        subpacks: Vec<String>,
        map: MapView,
    },
    Viewing {
        trip: TripView,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ViewModel {
    pub state: ViewState,
    pub trip_count: usize,
}

impl From<&Model> for ViewModel {
    fn from(model: &Model) -> Self {
        let state = match &model.screen {
            Screen::Loading => ViewState::Loading,
            Screen::Home => ViewState::Home {
                trips: trip_summaries(&model.archive),
                libraries: library_views(&model.library),
            },
            Screen::Editing(session) => editing_state(session, &model.library, &model.config),
            Screen::Viewing(session) => ViewState::Viewing {
                trip: trip_view(session),
            },
        };

        ViewModel {
            state,
            trip_count: model.archive.len(),
        }
    }
}

fn trip_summaries(archive: &TripArchive) -> Vec<TripSummary> {
    archive
        .iter()
        .enumerate()
        .map(|(index, trip)| TripSummary {
            index,
            title: trip.title().to_string(),
            dates: trip.dates.clone(),
        })
        .collect()
}

fn library_views(library: &ChecklistLibrary) -> Vec<LibraryView> {
    ChecklistCategory::ALL
        .into_iter()
        .map(|category| LibraryView {
            category,
            items: library.user_items(category).to_vec(),
        })
        .collect()
}

fn editing_state(
    session: &EditSession,
    library: &ChecklistLibrary,
    config: &PlannerConfig,
) -> ViewState {
    let draft = &session.draft;
    let lists = ChecklistCategory::ALL
        .into_iter()
        .map(|category| DraftListView {
            category,
            selected: draft.items(category).to_vec(),
            catalog: library.catalog(category),
            remember_by_default: config.remember_by_default.for_category(category),
        })
        .collect();

    ViewState::Editing {
        is_new: session.editing_index.is_none(),
        is_saving: session.saving,
        draft: DraftView {
            location_name: draft.location_name.clone(),
            distance: draft.distance.clone(),
            camping_type: draft.camping_type.map(|t| t.label().to_string()),
            party: draft.party.clone(),
            start_date: draft.start_date.clone(),
            end_date: draft.end_date.clone(),
            emergency_contact: draft.emergency_contact.clone(),
            emergency_acknowledged: draft.emergency_acknowledged,
            lists,
        },
        camping_types: CampingType::ALL
            .iter()
            .map(|t| t.label().to_string())
            .collect(),
        subpacks: SUBPACKS.iter().map(|pack| pack.name.to_string()).collect(),
        map: MapView {
            center: config.map_center,
            zoom: config.map_zoom,
            marker: draft.map_location,
            region: config.map_region.clone(),
        },
    }
}

fn checked_items<'a>(
    items: impl IntoIterator<Item = &'a String>,
    is_checked: impl Fn(&str) -> bool,
) -> Vec<ChecklistItemView> {
    items
        .into_iter()
        .map(|label| ChecklistItemView {
            checked: is_checked(label),
            label: label.clone(),
        })
        .collect()
}

fn trip_view(session: &ViewSession) -> TripView {
    let trip = &session.trip;
    let marks: &CompletionMarks = &session.marks;

    TripView {
        index: session.index,
        title: trip.title().to_string(),
        location_name: trip.location_name.clone(),
        distance: trip.distance.clone(),
        camping_type: trip.camping_type.map(|t| t.label().to_string()),
        party: trip.party.clone(),
        dates: trip.dates.clone(),
        map_location: trip.map_location,
        emergency_contact: trip.emergency_contact.clone(),
        emergency_acknowledged: trip.emergency_acknowledged,
        gear_groups: group_gear(&trip.gear)
            .into_iter()
            .map(|group| GearGroupView {
                items: checked_items(&group.items, |item| marks.is_packed(item)),
                title: group.title,
            })
            .collect(),
        chores: checked_items(&trip.chores, |item| marks.is_done(item)),
        downloads: trip.downloads.clone(),
        map_image: trip
            .map_image
            .as_ref()
            .map(|image| image.as_data_url().to_string()),
    }
}
