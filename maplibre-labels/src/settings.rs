//! Settings for the labeling subsystem

use std::{ops::RangeInclusive, time::Duration};

use serde::{Deserialize, Serialize};

use crate::coords::TILE_SIZE;

/// Provides configuration for the [`LabelWorker`](crate::worker::LabelWorker) and the
/// [`LabelLayerBuilder`](crate::builder::LabelLayerBuilder).
///
/// Every field has a default, so partial configuration files deserialize fine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSettings {
    /// How long the worker waits after the first relabel request before it builds. Requests which
    /// arrive in the meantime are absorbed by the same build.
    pub debounce: Duration,
    /// Edge length of a tile in pixels.
    pub tile_size: f64,
    /// Smallest accepted `tile zoom - viewport zoom`.
    pub min_zoom_delta: i32,
    /// Largest accepted `tile zoom - viewport zoom`.
    pub max_zoom_delta: i32,
    /// Name of the worker thread.
    pub thread_name: String,
}

impl LabelSettings {
    pub fn zoom_window(&self) -> RangeInclusive<i32> {
        self.min_zoom_delta..=self.max_zoom_delta
    }
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(300),
            tile_size: TILE_SIZE,
            min_zoom_delta: -2,
            max_zoom_delta: 1,
            thread_name: "labeling".to_string(),
        }
    }
}
