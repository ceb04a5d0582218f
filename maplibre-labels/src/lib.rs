//! # maplibre-labels
//!
//! Asynchronous label placement for tiled map renderers.
//!
//! The visible tiles carry candidate labels in tile-local coordinates. A dedicated worker thread
//! moves them into a common frame which is anchored at the tile under the viewport, orients line
//! labels so that they read upright for the current rotation and prepares the draw resources of
//! the resulting text layer. Finished layers are handed to the render loop without ever blocking
//! it, and the layer which gets replaced is handed back to be reused for the next build.
//!
//! ### Example
//!
//! ```no_run
//! use maplibre_labels::{
//!     headless::{HeadlessEnvironment, RedrawCounter, SharedTileSource, SharedViewport},
//!     kernel::KernelBuilder,
//!     overlay::TextOverlay,
//!     settings::LabelSettings,
//! };
//!
//! let kernel = KernelBuilder::<HeadlessEnvironment>::new()
//!     .with_tile_source(SharedTileSource::default())
//!     .with_viewport(SharedViewport::default())
//!     .with_redraw_trigger(RedrawCounter::default())
//!     .build()
//!     .unwrap();
//!
//! let mut overlay = TextOverlay::new(kernel, &LabelSettings::default()).unwrap();
//!
//! // Whenever the camera moved or tiles were loaded:
//! overlay.notify_viewport_or_tiles_changed(true, false).unwrap();
//!
//! // Once per frame:
//! if overlay.on_frame_update().unwrap() {
//!     // draw overlay.layer() at overlay.pose()
//! }
//! ```

pub mod builder;
pub mod coords;
pub mod environment;
pub mod error;
pub mod geometry;
pub mod handoff;
pub mod headless;
pub mod kernel;
pub mod overlay;
pub mod schedule;
pub mod settings;
pub mod text;
pub mod tile;
pub mod util;
pub mod view_state;
pub mod worker;

pub use environment::{LabelEnvironment, RedrawTrigger};
pub use error::Error;
pub use overlay::TextOverlay;
