//! Versioned, serializable form of a [`TouchState`].
//!
//! Items, the parent measurement and the item configuration round-trip
//! through JSON. Live gesture state and the viewport transform are not part
//! of a snapshot.

#[cfg(test)]
#[path = "snapshot_test.rs"]
mod snapshot_test;

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::consts::SNAPSHOT_VERSION;
use crate::error::TouchError;
use crate::geometry::Size;
use crate::state::{TouchState, TransformRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchSnapshot {
    pub version: u32,
    #[serde(default)]
    pub parent_size: Size,
    #[serde(default)]
    pub init_content_size: Size,
    pub zoom_range: RangeInclusive<f64>,
    #[serde(default)]
    pub items: Vec<TransformRecord>,
}

impl TouchSnapshot {
    /// Capture `state` at the current schema version.
    #[must_use]
    pub fn from_state(state: &TouchState) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            parent_size: state.parent_size(),
            init_content_size: state.init_content_size(),
            zoom_range: state.zoom_range(),
            items: state.items().to_vec(),
        }
    }

    /// # Errors
    ///
    /// `Snapshot` if serialization fails.
    pub fn to_json(&self) -> Result<String, TouchError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a snapshot and check its version.
    ///
    /// # Errors
    ///
    /// `Snapshot` for malformed input, `UnsupportedSnapshotVersion` for a
    /// schema this build does not know.
    pub fn from_json(json: &str) -> Result<Self, TouchError> {
        let snapshot: Self = serde_json::from_str(json)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(TouchError::UnsupportedSnapshotVersion(snapshot.version));
        }
        Ok(snapshot)
    }

    /// Rebuild a [`TouchState`] from this snapshot.
    ///
    /// # Errors
    ///
    /// `UnsupportedSnapshotVersion`, `InvalidZoomRange`, and the key checks
    /// of [`TouchState::restore_list`].
    pub fn into_state(self) -> Result<TouchState, TouchError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(TouchError::UnsupportedSnapshotVersion(self.version));
        }
        let mut state = TouchState::new(self.init_content_size, self.zoom_range)?;
        state.update_parent_size(self.parent_size);
        state.restore_list(self.items)?;
        Ok(state)
    }
}
