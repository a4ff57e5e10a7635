use serde::{Deserialize, Serialize};

use crate::capabilities::{SnapshotResult, StorageKey, StoredValue};
use crate::catalog::{CampingType, ChecklistCategory};
use crate::config::PlannerConfig;

/// A single form-field change on the draft.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum DraftEdit {
    LocationName(String),
    Distance(String),
    CampingType(Option<CampingType>),
    Party(String),
    StartDate(String),
    EndDate(String),
    EmergencyContact(String),
    EmergencyAcknowledged(bool),
}

// --- Event enum: shell-facing variants first, capability responses last ---

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub enum Event {
    // Lifecycle
    Started,
    Configure(Box<PlannerConfig>),

    // Navigation
    NewTrip,
    EditTrip {
        index: usize,
    },
    ViewTrip {
        index: usize,
    },
    EditViewedTrip,
    GoHome,
    Cancel,

    // Draft editing
    UpdateDraft(DraftEdit),
    MapClicked {
        lat: f64,
        lng: f64,
    },
    ClearMapLocation,
    SelectItem {
        category: ChecklistCategory,
        item: String,
    },
    AddCustomItem {
        category: ChecklistCategory,
        item: String,
        remember: bool,
    },
    RemoveItem {
        category: ChecklistCategory,
        position: usize,
    },
    RememberDraftItem {
        category: ChecklistCategory,
        position: usize,
    },
    AddSubpack {
        name: String,
    },
    Save,

    // Library management
    ForgetLibraryItem {
        category: ChecklistCategory,
        item: String,
    },

    // Viewing
    TogglePacked {
        item: String,
    },
    ToggleChoreDone {
        item: String,
    },
    DeleteTrip {
        index: usize,
    },

    // Capability responses (boxed where large)
    #[serde(skip)]
    StorageLoaded {
        key: StorageKey,
        value: StoredValue,
    },
    #[serde(skip)]
    StorageWritten {
        key: StorageKey,
        error: Option<String>,
    },
    #[serde(skip)]
    SnapshotCaptured(Box<SnapshotResult>),
    #[serde(skip)]
    DeleteConfirmed {
        index: usize,
        confirmed: bool,
    },
}

impl Event {
    /// Variant name for logs; payloads may hold personal data or image bytes.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Started => "Started",
            Self::Configure(_) => "Configure",
            Self::NewTrip => "NewTrip",
            Self::EditTrip { .. } => "EditTrip",
            Self::ViewTrip { .. } => "ViewTrip",
            Self::EditViewedTrip => "EditViewedTrip",
            Self::GoHome => "GoHome",
            Self::Cancel => "Cancel",
            Self::UpdateDraft(_) => "UpdateDraft",
            Self::MapClicked { .. } => "MapClicked",
            Self::ClearMapLocation => "ClearMapLocation",
            Self::SelectItem { .. } => "SelectItem",
            Self::AddCustomItem { .. } => "AddCustomItem",
            Self::RemoveItem { .. } => "RemoveItem",
            Self::RememberDraftItem { .. } => "RememberDraftItem",
            Self::AddSubpack { .. } => "AddSubpack",
            Self::Save => "Save",
            Self::ForgetLibraryItem { .. } => "ForgetLibraryItem",
            Self::TogglePacked { .. } => "TogglePacked",
            Self::ToggleChoreDone { .. } => "ToggleChoreDone",
            Self::DeleteTrip { .. } => "DeleteTrip",
            Self::StorageLoaded { .. } => "StorageLoaded",
            Self::StorageWritten { .. } => "StorageWritten",
            Self::SnapshotCaptured(_) => "SnapshotCaptured",
            Self::DeleteConfirmed { .. } => "DeleteConfirmed",
        }
    }

    /// Events handled before persisted state has finished loading.
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(
            self,
            Self::Started
                | Self::Configure(_)
                | Self::StorageLoaded { .. }
                | Self::StorageWritten { .. }
        )
    }
}
