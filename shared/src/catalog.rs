//! Built-in reference data: camping types, gear, subpacks, chores, downloads.
//!
//! Everything here is fixed at compile time. User additions live in
//! [`crate::library::ChecklistLibrary`] and are never mixed into these tables.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::capabilities::StorageKey;

/// The three user-extendable checklist kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistCategory {
    Gear,
    Chore,
    Download,
}

impl ChecklistCategory {
    pub const ALL: [ChecklistCategory; 3] = [Self::Gear, Self::Chore, Self::Download];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Gear => "Gear",
            Self::Chore => "Chores",
            Self::Download => "Downloads",
        }
    }

    /// Built-in entries in catalog order. For gear this is the base list
    /// followed by every subpack item in declaration order (duplicates included).
    pub fn builtins(self) -> impl Iterator<Item = &'static str> {
        let (head, packs): (&'static [&'static str], &'static [Subpack]) = match self {
            Self::Gear => (BASE_GEAR, SUBPACKS),
            Self::Chore => (DEFAULT_CHORES, &[]),
            Self::Download => (DEFAULT_DOWNLOADS, &[]),
        };
        head.iter()
            .copied()
            .chain(packs.iter().flat_map(|pack| pack.items.iter().copied()))
    }

    #[must_use]
    pub fn is_builtin(self, item: &str) -> bool {
        self.builtins().any(|builtin| builtin == item)
    }

    #[must_use]
    pub fn storage_key(self) -> StorageKey {
        match self {
            Self::Gear => StorageKey::UserGearLibrary,
            Self::Chore => StorageKey::UserChoreLibrary,
            Self::Download => StorageKey::UserDownloadLibrary,
        }
    }
}

impl fmt::Display for ChecklistCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Wire form is the full label, the string stored in the trip archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CampingType {
    Car,
    Campsite,
    ShortCar,
    LongCar,
    Backpacking,
    Bikepacking,
    Basecamping,
}

impl CampingType {
    pub const ALL: [CampingType; 7] = [
        Self::Car,
        Self::Campsite,
        Self::ShortCar,
        Self::LongCar,
        Self::Backpacking,
        Self::Bikepacking,
        Self::Basecamping,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Car => "Car Camping - inside of car, or car is part of campsite",
            Self::Campsite => "Campsite Camping - at improved primitive campsite",
            Self::ShortCar => {
                "Short car camping - can make trips to car from camp \
                 (under 200 yards, car is not part of campsite)"
            }
            Self::LongCar => {
                "Long car camping - can carry things in hands to set up camp \
                 (1 trip, ~ under .5 mile)"
            }
            Self::Backpacking => "Backpacking - can't make trip back to car",
            Self::Bikepacking => "Bikepacking - using bike for extra gear",
            Self::Basecamping => {
                "Basecamping - car camping one day into backpacking the next (2 nights min)"
            }
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }
}

impl fmt::Display for CampingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for CampingType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for CampingType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Self::from_label(&label)
            .ok_or_else(|| de::Error::custom(format!("unknown camping type: {label}")))
    }
}

/// Wire form for an optional camping type: the label, or `""` when unselected.
/// Unknown labels read back as unselected.
pub(crate) mod camping_type_label {
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::warn;

    use super::CampingType;

    pub fn serialize<S: Serializer>(
        value: &Option<CampingType>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(value.map_or("", CampingType::label))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<CampingType>, D::Error> {
        let label = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        let parsed = CampingType::from_label(&label);
        if parsed.is_none() && !label.is_empty() {
            warn!(label = %label, "unknown camping type, treating as unselected");
        }
        Ok(parsed)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subpack {
    pub name: &'static str,
    pub items: &'static [&'static str],
}

#[must_use]
pub fn subpack(name: &str) -> Option<&'static Subpack> {
    SUBPACKS.iter().find(|pack| pack.name == name)
}

pub const BASE_GEAR: &[&str] = &[
    "Tent",
    "Sleeping Bag",
    "Sleeping Pad",
    "Backpack",
    "Headlamp",
    "Water Filter",
    "Double sleeping monarch chair",
    "Foil bag for food",
    "Dog food",
    "Hellcat 9mm",
];

pub const SUBPACKS: &[Subpack] = &[
    Subpack {
        name: "Cold Weather",
        items: &[
            "Thermals",
            "Down puff jacket",
            "Klymit tent",
            "Orange bag",
            "Mid layer",
            "Down quilt",
            "Pan cookset",
            "Folding table",
            "Pump/lantern",
            "Ankle gaiters",
            "Wind breaker",
            "Sleeping bag rec bag",
            "Power bank",
            "Brio coat",
            "Water bladder",
            "Trowel",
            "Hygiene bag",
            "Drone for car",
            "Balaclava",
            "Gloves",
            "Toe warmers",
            "Rheas coat",
            "Wool socks",
        ],
    },
    Subpack {
        name: "Snow Pack",
        items: &[
            "Snow traction",
            "Snow gloves",
            "Snow shovel",
            "Sunglasses",
            "Wool socks extra",
            "Rain coat",
            "Gators",
            "Waterproof shoes",
        ],
    },
    Subpack {
        name: "Hot Weather",
        items: &[
            "Sunscreen",
            "Hat",
            "Sunglasses",
            "Bug spray",
            "Extra water",
            "Cooling towel for Rhea",
        ],
    },
    Subpack {
        name: "Water Rec",
        items: &["Dry bag", "Grass", "Gloves", "Genius pipe", "Life jackets", "Torch"],
    },
    Subpack {
        name: "Bike Pack",
        items: &["Sugar", "Helmet", "Caffeine", "Rhea water"],
    },
];

pub const DEFAULT_CHORES: &[&str] = &[
    "Dishes",
    "Laundry",
    "Cooking",
    "Floors",
    "Bathroom",
    "Trash",
    "Yardwork",
    "Feed pets",
];

pub const DEFAULT_DOWNLOADS: &[&str] = &["Offline Map", "Book", "Movie", "Music"];
