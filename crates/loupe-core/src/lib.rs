//! Loupe Core
//!
//! Pure shared logic for the loupe inspector: key-state tracking and mode
//! resolution, box geometry and viewport-safe placement, source-window
//! math, and configuration types.
//!
//! Nothing in this crate touches the DOM or the filesystem, so it builds
//! and tests natively. The WASM overlay and the bridge server both depend
//! on it.

pub mod config;
pub mod geometry;
pub mod keys;
pub mod source;

pub use config::{InspectorConfig, PathType, SendType};
pub use geometry::{BoxEdges, BoxMetrics, Horizon, Placement, Position, Rect, Vertical};
pub use keys::{
    InteractionMode, KeyCombo, KeyState, ModeConfig, TrackAction, default_mode, resolve_mode,
};
pub use source::{ElementInfo, SourceContext, SourceInfo, context_window};
