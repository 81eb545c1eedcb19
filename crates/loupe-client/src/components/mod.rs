//! Overlay presentation components. All state lives in the engine; these
//! only render snapshots.

mod cover;
mod layer_panel;
mod toast;
mod tooltip;

pub use cover::Cover;
pub use layer_panel::LayerPanel;
pub use toast::ToastView;
pub use tooltip::Tooltip;
