mod confirm;
mod kv;
mod snapshot;

pub use self::confirm::{Confirm, ConfirmOperation};
pub use self::kv::{
    decode, decode_or_default, encode, StorageError, StorageKey, StoredValue, MAX_VALUE_SIZE,
};
pub use self::snapshot::{
    Snapshot, SnapshotError, SnapshotImage, SnapshotOperation, SnapshotResult,
    DEFAULT_MAX_SNAPSHOT_BYTES,
};

// Crux's built-in Render capability covers view refreshes as-is.
pub use crux_core::render::Render;
pub use crux_kv::KeyValue;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub render: Render<Event>,
    pub key_value: KeyValue<Event>,
    pub snapshot: Snapshot<Event>,
    pub confirm: Confirm<Event>,
}
