use crux_core::capability::{CapabilityContext, Operation};
use crux_core::macros::Capability;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::kv::MAX_VALUE_SIZE;

/// Room left in a stored archive value for trip fields and JSON framing.
pub const SNAPSHOT_HEADROOM: usize = 64 * 1024;

/// Largest raw snapshot whose base64 form still fits in one stored value.
pub const DEFAULT_MAX_SNAPSHOT_BYTES: usize = MAX_VALUE_SIZE / 4 * 3 - SNAPSHOT_HEADROOM;

/// Asks the shell to render the on-screen map region into an image.
#[derive(Capability)]
pub struct Snapshot<Ev> {
    context: CapabilityContext<SnapshotOperation, Ev>,
}

impl<Ev> Snapshot<Ev>
where
    Ev: 'static,
{
    pub fn new(context: CapabilityContext<SnapshotOperation, Ev>) -> Self {
        Self { context }
    }

    /// Single attempt; the shell answers once with an image or an error.
    pub fn capture_map<F>(&self, region: impl Into<String>, make_event: F)
    where
        F: FnOnce(SnapshotResult) -> Ev + Send + 'static,
    {
        let context = self.context.clone();
        let operation = SnapshotOperation::CaptureMap {
            region: region.into(),
        };
        self.context.spawn(async move {
            let result = context.request_from_shell(operation).await;
            context.update_app(make_event(result));
        });
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum SnapshotOperation {
    /// `region` is the shell's handle for the rendered map element.
    CaptureMap { region: String },
}

impl Operation for SnapshotOperation {
    type Output = SnapshotResult;
}

/// Encoded image bytes as produced by the shell (PNG from the web shell).
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotImage {
    #[serde(with = "serde_bytes")]
    pub bytes: Vec<u8>,
}

// Keep image payloads out of logs.
impl std::fmt::Debug for SnapshotImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotImage")
            .field("len", &self.bytes.len())
            .finish()
    }
}

#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("map region not found: {region}")]
    RegionNotFound { region: String },

    #[error("snapshot capture failed: {reason}")]
    CaptureFailed { reason: String },

    #[error("snapshot is empty")]
    Empty,

    #[error("snapshot too large: {size} bytes exceeds maximum of {max} bytes")]
    TooLarge { size: usize, max: usize },

    #[error("snapshot is not a recognized image: {reason}")]
    UnsupportedImage { reason: String },
}

pub type SnapshotResult = Result<SnapshotImage, SnapshotError>;
