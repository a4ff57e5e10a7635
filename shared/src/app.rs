use tracing::{debug, error, info, instrument, warn};

use crate::capabilities::{encode, Capabilities, SnapshotResult, StorageError, StorageKey};
use crate::catalog::ChecklistCategory;
use crate::event::Event;
use crate::model::{LatLon, MapImage, Model, TripError};
use crate::view::ViewModel;

pub const DELETE_PROMPT: &str = "Delete this trip? This cannot be undone.";

#[derive(Default)]
pub struct App;

impl App {
    /// Writes the whole archive back to storage.
    #[instrument(skip_all, fields(trips = model.archive.len()))]
    pub fn persist_archive(model: &Model, caps: &Capabilities) {
        Self::write(StorageKey::TripArchive, &model.archive, caps);
    }

    /// Writes the archive after a save. When the archive no longer fits in
    /// one stored value, the saved trip loses its map image, the same outcome
    /// as a failed capture.
    #[instrument(skip(model, caps), fields(trips = model.archive.len()))]
    fn persist_saved_trip(index: usize, model: &mut Model, caps: &Capabilities) {
        let key = StorageKey::TripArchive;
        let mut encoded = encode(key, &model.archive);
        if let Err(StorageError::ValueTooLarge { size, max, .. }) = encoded {
            if model.drop_map_image(index) {
                warn!(size, max, "archive over storage limit, saving trip without map image");
                encoded = encode(key, &model.archive);
            }
        }
        match encoded {
            Ok(bytes) => Self::store(key, bytes, caps),
            Err(e) => error!(error = %e, "not persisted"),
        }
    }

    /// Writes one category of the user library back to storage.
    #[instrument(skip(model, caps))]
    pub fn persist_library(category: ChecklistCategory, model: &Model, caps: &Capabilities) {
        Self::write(category.storage_key(), model.library.user_items(category), caps);
    }

    fn write<T: serde::Serialize + ?Sized>(key: StorageKey, value: &T, caps: &Capabilities) {
        match encode(key, value) {
            Ok(bytes) => Self::store(key, bytes, caps),
            Err(e) => error!(error = %e, "not persisted"),
        }
    }

    fn store(key: StorageKey, bytes: Vec<u8>, caps: &Capabilities) {
        debug!(%key, bytes = bytes.len(), "writing");
        caps.key_value
            .set(key.as_str().to_string(), bytes, move |result| {
                Event::StorageWritten {
                    key,
                    error: result.err().map(|e| e.to_string()),
                }
            });
    }

    fn load_all(caps: &Capabilities) {
        for key in StorageKey::ALL {
            caps.key_value.get(key.as_str().to_string(), move |result| {
                Event::StorageLoaded {
                    key,
                    value: result.map_err(|e| e.to_string()),
                }
            });
        }
    }

    /// Logs a rejected operation. Every domain error here leaves state untouched.
    fn rejected(event: &'static str, e: &TripError) {
        warn!(event, error = %e, "ignored");
    }

    #[instrument(skip_all)]
    fn finish_save(result: SnapshotResult, model: &mut Model, caps: &Capabilities) {
        let max_bytes = model.config.max_snapshot_bytes;
        let map_image = match result.and_then(|image| MapImage::from_snapshot(&image, max_bytes)) {
            Ok(image) => Some(image),
            Err(e) => {
                error!(error = %e, "map snapshot failed, saving without image");
                None
            }
        };

        match model.finish_save(map_image) {
            Ok(index) => {
                info!(index, "trip saved");
                Self::persist_saved_trip(index, model, caps);
            }
            Err(e) => Self::rejected("SnapshotCaptured", &e),
        }
    }

    fn delete_resolved(index: usize, confirmed: bool, model: &mut Model, caps: &Capabilities) {
        match model.resolve_delete(index, confirmed) {
            Ok(Some(trip)) => {
                info!(index, title = trip.title(), "trip deleted");
                Self::persist_archive(model, caps);
                caps.render.render();
            }
            Ok(None) => debug!(index, "delete declined"),
            Err(e) => Self::rejected("DeleteConfirmed", &e),
        }
    }
}

impl crux_core::App for App {
    type Event = Event;
    type Model = Model;
    type ViewModel = ViewModel;
    type Capabilities = Capabilities;

    #[allow(clippy::too_many_lines)]
    fn update(&self, event: Event, model: &mut Model, caps: &Capabilities) {
        let event_name = event.name();

        if model.is_loading() && !event.is_lifecycle() {
            debug!(event = event_name, "still loading, ignoring");
            return;
        }

        match event {
            Event::Started => {
                info!("loading planner state");
                Self::load_all(caps);
                caps.render.render();
            }

            Event::Configure(config) => match config.validate() {
                Ok(()) => {
                    model.config = *config;
                    caps.render.render();
                }
                Err(e) => warn!(error = %e, "rejecting configuration"),
            },

            Event::StorageLoaded { key, value } => {
                if model.hydrate(key, value) {
                    caps.render.render();
                }
            }

            Event::StorageWritten { key, error } => match error {
                Some(message) => error!(%key, error = %message, "write failed"),
                None => debug!(%key, "written"),
            },

            Event::NewTrip => match model.start_new() {
                Ok(()) => caps.render.render(),
                Err(e) => Self::rejected(event_name, &e),
            },

            Event::EditTrip { index } => match model.start_edit(index) {
                Ok(()) => caps.render.render(),
                Err(e) => Self::rejected(event_name, &e),
            },

            Event::ViewTrip { index } => match model.view_trip(index) {
                Ok(()) => caps.render.render(),
                Err(e) => Self::rejected(event_name, &e),
            },

            Event::EditViewedTrip => match model.edit_viewed() {
                Ok(()) => caps.render.render(),
                Err(e) => Self::rejected(event_name, &e),
            },

            Event::GoHome | Event::Cancel => match model.go_home() {
                Ok(()) => caps.render.render(),
                Err(e) => Self::rejected(event_name, &e),
            },

            Event::UpdateDraft(edit) => match model.edit_draft(edit) {
                Ok(()) => caps.render.render(),
                Err(e) => Self::rejected(event_name, &e),
            },

            Event::MapClicked { lat, lng } => match LatLon::new(lat, lng) {
                Ok(point) => match model.set_map_location(Some(point)) {
                    Ok(()) => caps.render.render(),
                    Err(e) => Self::rejected(event_name, &e),
                },
                Err(e) => warn!(error = %e, "ignoring map click"),
            },

            Event::ClearMapLocation => match model.set_map_location(None) {
                Ok(()) => caps.render.render(),
                Err(e) => Self::rejected(event_name, &e),
            },

            Event::SelectItem { category, item } => match model.add_to_draft(category, &item) {
                Ok(true) => caps.render.render(),
                Ok(false) => debug!(%category, "already selected or blank"),
                Err(e) => Self::rejected(event_name, &e),
            },

            Event::AddCustomItem {
                category,
                item,
                remember,
            } => match model.add_custom(category, &item, remember) {
                Ok(remembered) => {
                    if remembered {
                        Self::persist_library(category, model, caps);
                    }
                    caps.render.render();
                }
                Err(e) => Self::rejected(event_name, &e),
            },

            Event::RemoveItem { category, position } => {
                match model.remove_from_draft(category, position) {
                    Ok(_) => caps.render.render(),
                    Err(e) => Self::rejected(event_name, &e),
                }
            }

            Event::RememberDraftItem { category, position } => {
                match model.remember_draft_item(category, position) {
                    Ok(true) => {
                        Self::persist_library(category, model, caps);
                        caps.render.render();
                    }
                    Ok(false) => debug!(%category, "already in library"),
                    Err(e) => Self::rejected(event_name, &e),
                }
            }

            Event::AddSubpack { name } => match model.add_subpack(&name) {
                Ok(added) => {
                    debug!(subpack = %name, added, "subpack added");
                    caps.render.render();
                }
                Err(e) => Self::rejected(event_name, &e),
            },

            Event::Save => match model.begin_save() {
                Ok(()) => {
                    debug!(region = %model.config.map_region, "capturing map");
                    caps.snapshot
                        .capture_map(model.config.map_region.clone(), |result| {
                            Event::SnapshotCaptured(Box::new(result))
                        });
                    caps.render.render();
                }
                Err(e) => Self::rejected(event_name, &e),
            },

            Event::SnapshotCaptured(result) => {
                Self::finish_save(*result, model, caps);
                caps.render.render();
            }

            Event::ForgetLibraryItem { category, item } => {
                if model.library.forget(category, &item) {
                    Self::persist_library(category, model, caps);
                    caps.render.render();
                } else {
                    debug!(%category, "not a user library entry");
                }
            }

            Event::TogglePacked { item } => match model.toggle_packed(&item) {
                Ok(_) => caps.render.render(),
                Err(e) => Self::rejected(event_name, &e),
            },

            Event::ToggleChoreDone { item } => match model.toggle_chore_done(&item) {
                Ok(_) => caps.render.render(),
                Err(e) => Self::rejected(event_name, &e),
            },

            Event::DeleteTrip { index } => match model.request_delete(index) {
                Ok(()) => {
                    caps.confirm.ask(DELETE_PROMPT, move |confirmed| {
                        Event::DeleteConfirmed { index, confirmed }
                    });
                }
                Err(e) => Self::rejected(event_name, &e),
            },

            Event::DeleteConfirmed { index, confirmed } => {
                Self::delete_resolved(index, confirmed, model, caps);
            }
        }
    }

    fn view(&self, model: &Model) -> ViewModel {
        ViewModel::from(model)
    }
}
