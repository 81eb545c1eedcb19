//! Terminal actions: copy to clipboard, locate/target requests to the
//! bridge server.

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{HtmlDocument, HtmlImageElement, HtmlTextAreaElement};

use gloo::net::http::Request;

use loupe_core::config::format_copy_text;
use loupe_core::{ElementInfo, InspectorConfig, SendType};

/// Inspect-request URL against the bridge server's negotiated port.
pub fn build_target_url(config: &InspectorConfig, info: &ElementInfo) -> String {
    format!(
        "{}/?file={}&line={}&column={}",
        config.server_url(),
        urlencoding::encode(&info.source.path),
        info.source.line,
        info.source.column
    )
}

/// Copies the formatted source location. Tries the async clipboard API
/// first and falls back to a hidden-textarea `execCommand` copy when the
/// API is unavailable or rejects; `on_result` reports the combined
/// outcome. Never contacts the bridge server.
pub fn copy_source(
    config: &InspectorConfig,
    info: &ElementInfo,
    on_result: impl FnOnce(bool) + 'static,
) {
    let text = format_copy_text(&config.copy_format, info);
    let Some(window) = web_sys::window() else {
        on_result(false);
        return;
    };

    let clipboard = window.navigator().clipboard();
    let clipboard_value: &wasm_bindgen::JsValue = clipboard.as_ref();
    if clipboard_value.is_undefined() {
        // Restricted context; the clipboard API does not exist.
        on_result(fallback_copy(&text));
        return;
    }

    spawn_local(async move {
        match JsFuture::from(clipboard.write_text(&text)).await {
            Ok(_) => on_result(true),
            Err(_) => on_result(fallback_copy(&text)),
        }
    });
}

/// Hidden-selection copy for contexts where the clipboard API is blocked.
fn fallback_copy(text: &str) -> bool {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return false;
    };
    let Some(body) = document.body() else {
        return false;
    };
    let Ok(textarea) = document
        .create_element("textarea")
        .map(|el| el.unchecked_into::<HtmlTextAreaElement>())
    else {
        return false;
    };

    textarea.set_value(text);
    let style = textarea.style();
    let _ = style.set_property("position", "fixed");
    let _ = style.set_property("opacity", "0");
    if body.append_child(&textarea).is_err() {
        return false;
    }
    textarea.select();
    let copied = document
        .dyn_ref::<HtmlDocument>()
        .and_then(|doc| doc.exec_command("copy").ok())
        .unwrap_or(false);
    textarea.remove();
    copied
}

/// Sends a locate/target request. The server launches the editor on its
/// own; the client only confirms the request was accepted, so an `Ok`
/// response body is ignored and only transport failures are surfaced via
/// `on_error`.
pub fn send_inspect_request(
    config: &InspectorConfig,
    info: &ElementInfo,
    on_error: impl FnOnce(String) + 'static,
) {
    let url = build_target_url(config, info);
    match config.send_type {
        SendType::Xhr => send_xhr(url, on_error),
        SendType::Img => send_img(&url),
    }
}

fn send_xhr(url: String, on_error: impl FnOnce(String) + 'static) {
    spawn_local(async move {
        match Request::get(&url).send().await {
            Ok(response) if response.ok() => {}
            Ok(response) => {
                let detail = response
                    .text()
                    .await
                    .unwrap_or_else(|_| response.status_text());
                on_error(detail);
            }
            Err(err) => on_error(err.to_string()),
        }
    });
}

/// Fire-and-forget pixel beacon; no response, no error reporting.
fn send_img(url: &str) {
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    if let Ok(img) = document
        .create_element("img")
        .map(|el| el.unchecked_into::<HtmlImageElement>())
    {
        img.set_src(url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loupe_core::SourceInfo;

    #[test]
    fn test_target_url_encodes_path() {
        let info = ElementInfo {
            source: SourceInfo {
                name: "App".into(),
                path: "src/pages/a b.tsx".into(),
                line: 4,
                column: 7,
            },
            width: 0.0,
            height: 0.0,
            text_content: None,
        };
        let url = build_target_url(&InspectorConfig::default(), &info);
        assert_eq!(
            url,
            "http://localhost:5678/?file=src%2Fpages%2Fa%20b.tsx&line=4&column=7"
        );
    }
}
