//! Pointer-side DOM resolution: hit testing, source-attribute parsing and
//! box-metric extraction.
//!
//! Build tooling injects a `data-loupe-source` attribute of the form
//! `path:line:column:name` on every rendered element it knows the origin
//! of. Wrapper components additionally carry `data-loupe-wrapper`; for
//! those the true originating file is the nested marker inside.

use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use loupe_core::{BoxEdges, BoxMetrics, ElementInfo, Rect, SourceInfo};

pub const SOURCE_ATTR: &str = "data-loupe-source";
pub const WRAPPER_ATTR: &str = "data-loupe-wrapper";

/// Longest element text carried into the tooltip.
const MAX_TEXT_LEN: usize = 40;

/// Topmost element at viewport coordinates, per normal hit-test z-order.
/// The overlay itself is `pointer-events: none`, so it never wins.
pub fn element_at(x: f64, y: f64) -> Option<Element> {
    web_sys::window()?
        .document()?
        .element_from_point(x as f32, y as f32)
}

/// True when `candidate` is the element already being tracked.
pub fn is_same_position_node(tracked: &Element, candidate: &Element) -> bool {
    tracked.is_same_node(Some(candidate))
}

/// Parses a `path:line:column[:name]` marker. The path may itself contain
/// colons (Windows drives), so numeric fields are taken from the right.
pub fn parse_source_attr(value: &str) -> Option<SourceInfo> {
    let parts: Vec<&str> = value.split(':').collect();
    if parts.len() < 3 {
        return None;
    }
    let (name, rest) = if parts.len() >= 4 && parts[parts.len() - 1].parse::<u32>().is_err() {
        (parts[parts.len() - 1].to_string(), &parts[..parts.len() - 1])
    } else {
        (String::new(), &parts[..])
    };
    if rest.len() < 3 {
        return None;
    }
    let column: u32 = rest[rest.len() - 1].parse().ok()?;
    let line: u32 = rest[rest.len() - 2].parse().ok()?;
    let path = rest[..rest.len() - 2].join(":");
    if path.is_empty() {
        return None;
    }
    Some(SourceInfo { name, path, line, column })
}

/// Resolves the source location for a hovered element by walking up the
/// ancestor chain to the nearest marker carrier. Returns the carrier
/// element together with its parsed location; `None` means the hover is
/// inert.
pub fn resolve_source_info(start: &Element) -> Option<(HtmlElement, SourceInfo)> {
    let mut current = Some(start.clone());
    while let Some(element) = current {
        if let Some(info) = source_info_of(&element) {
            let html = element.dyn_into::<HtmlElement>().ok()?;
            return Some((html, info));
        }
        current = element.parent_element();
    }
    None
}

/// Source info carried directly on `element`, if any. Wrapper markers are
/// chased into their nested marker so the reported file is the true origin
/// of the wrapped content rather than the wrapper itself.
pub fn source_info_of(element: &Element) -> Option<SourceInfo> {
    let mut value = element.get_attribute(SOURCE_ATTR)?;
    if element.has_attribute(WRAPPER_ATTR)
        && let Some(nested) = nested_marker(element)
    {
        value = nested;
    }
    let mut info = parse_source_attr(&value)?;
    if info.name.is_empty() {
        info.name = element.tag_name().to_lowercase();
    }
    Some(info)
}

fn nested_marker(element: &Element) -> Option<String> {
    element
        .query_selector(&format!("[{SOURCE_ATTR}]"))
        .ok()
        .flatten()
        .and_then(|nested| nested.get_attribute(SOURCE_ATTR))
}

/// Border-box rect plus padding/border/margin read from computed style.
pub fn box_metrics(element: &HtmlElement) -> BoxMetrics {
    let rect = element.get_bounding_client_rect();
    BoxMetrics {
        rect: Rect {
            top: rect.top(),
            right: rect.right(),
            bottom: rect.bottom(),
            left: rect.left(),
            width: rect.width(),
            height: rect.height(),
        },
        padding: edges(element, "padding", ""),
        border: edges(element, "border", "-width"),
        margin: edges(element, "margin", ""),
    }
}

fn edges(element: &HtmlElement, prefix: &str, suffix: &str) -> BoxEdges {
    BoxEdges {
        top: style_px(element, &format!("{prefix}-top{suffix}")),
        right: style_px(element, &format!("{prefix}-right{suffix}")),
        bottom: style_px(element, &format!("{prefix}-bottom{suffix}")),
        left: style_px(element, &format!("{prefix}-left{suffix}")),
    }
}

fn style_px(element: &HtmlElement, property: &str) -> f64 {
    web_sys::window()
        .and_then(|window| window.get_computed_style(element).ok().flatten())
        .and_then(|style| style.get_property_value(property).ok())
        .and_then(|value| value.trim_end_matches("px").parse().ok())
        .unwrap_or(0.0)
}

/// Snapshot of the hovered element for the tooltip.
pub fn element_info(element: &HtmlElement, source: SourceInfo) -> ElementInfo {
    let rect = element.get_bounding_client_rect();
    ElementInfo {
        source,
        width: rect.width(),
        height: rect.height(),
        text_content: element_text(element),
    }
}

fn element_text(element: &HtmlElement) -> Option<String> {
    let text = element.inner_text();
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return None;
    }
    let truncated: String = collapsed.chars().take(MAX_TEXT_LEN).collect();
    Some(if truncated.len() < collapsed.len() {
        format!("{truncated}…")
    } else {
        truncated
    })
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_wrapper_marker_chases_nested() {
        let document = web_sys::window().unwrap().document().unwrap();
        let wrapper = document.create_element("div").unwrap();
        wrapper
            .set_attribute(SOURCE_ATTR, "src/Wrapper.tsx:1:1:Wrapper")
            .unwrap();
        wrapper.set_attribute(WRAPPER_ATTR, "").unwrap();
        let inner = document.create_element("span").unwrap();
        inner
            .set_attribute(SOURCE_ATTR, "src/Inner.tsx:5:2:Inner")
            .unwrap();
        wrapper.append_child(&inner).unwrap();

        let info = source_info_of(&wrapper).unwrap();
        assert_eq!(info.path, "src/Inner.tsx");
        assert_eq!(info.line, 5);
    }

    #[wasm_bindgen_test]
    fn test_unmarked_element_is_inert() {
        let document = web_sys::window().unwrap().document().unwrap();
        let plain = document.create_element("div").unwrap();
        assert!(source_info_of(&plain).is_none());
    }

    #[wasm_bindgen_test]
    fn test_same_element_hover_short_circuits() {
        let document = web_sys::window().unwrap().document().unwrap();
        let tracked = document.create_element("div").unwrap();
        let other = document.create_element("div").unwrap();
        assert!(is_same_position_node(&tracked, &tracked));
        assert!(!is_same_position_node(&tracked, &other));
    }
}
