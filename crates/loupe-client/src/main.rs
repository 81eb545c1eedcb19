//! Loupe Client
//!
//! Browser-resident inspector overlay. Injected into the host page, it
//! tracks keyboard modifiers, follows the pointer to the hovered element,
//! and dispatches copy / locate / target actions against the bridge
//! server.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Layer};
use tracing_web::MakeWebConsoleWriter;

use loupe_core::InspectorConfig;

use crate::app::{App, AppProps};

mod app;
mod components;
mod dispatch;
mod engine;
mod fetcher;
mod tracker;
mod tree;

/// DOM id of the injected overlay container.
const CONTAINER_ID: &str = "loupe-overlay-root";

fn main() {
    console_error_panic_hook::set_once();

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .without_time()
        .with_writer(MakeWebConsoleWriter::new())
        .with_filter(EnvFilter::new("info"));
    tracing_subscriber::registry().with(fmt_layer).init();

    let config = read_config();
    if !config.hide_console {
        tracing::info!(
            "[loupe] hold \"{}\" and hover an element to inspect; right-click opens the layer panel",
            config.hot_keys
        );
    }

    let Some(root) = mount_point() else {
        tracing::error!("[loupe] no document body to mount into");
        return;
    };
    yew::Renderer::<App>::with_root_and_props(root, AppProps { config }).render();
}

/// Overlay configuration injected by the build plugin as a
/// `window.__LOUPE_CONFIG__` object; defaults apply otherwise.
fn read_config() -> InspectorConfig {
    let Some(window) = web_sys::window() else {
        return InspectorConfig::default();
    };
    js_sys::Reflect::get(&window, &"__LOUPE_CONFIG__".into())
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
        .and_then(|value| serde_wasm_bindgen::from_value(value).ok())
        .unwrap_or_default()
}

/// Creates (or reuses) the overlay container appended to `<body>`.
fn mount_point() -> Option<web_sys::Element> {
    let document = web_sys::window()?.document()?;
    if let Ok(Some(existing)) = document.query_selector(&format!("#{CONTAINER_ID}")) {
        return Some(existing);
    }
    let container = document.create_element("div").ok()?;
    container.set_id(CONTAINER_ID);
    document.body()?.append_child(&container).ok()?;
    Some(container)
}
