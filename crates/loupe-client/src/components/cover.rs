//! Highlight cover over the hovered element: margin box behind, border
//! box on top.

use yew::prelude::*;

use loupe_core::{BoxMetrics, Rect};

const MARGIN_FILL: &str = "rgba(246, 178, 107, 0.25)";
const CONTENT_FILL: &str = "rgba(66, 184, 131, 0.25)";
const CONTENT_OUTLINE: &str = "1px solid rgba(66, 184, 131, 0.9)";

#[derive(Properties, PartialEq)]
pub struct CoverProps {
    pub metrics: BoxMetrics,
}

#[function_component(Cover)]
pub fn cover(props: &CoverProps) -> Html {
    let margin = props.metrics.margin_rect();
    let rect = props.metrics.rect;
    html! {
        <>
            <div style={box_style(margin, MARGIN_FILL, None)} />
            <div style={box_style(rect, CONTENT_FILL, Some(CONTENT_OUTLINE))} />
        </>
    }
}

fn box_style(rect: Rect, fill: &str, outline: Option<&str>) -> String {
    let mut style = format!(
        "position:fixed;top:{}px;left:{}px;width:{}px;height:{}px;background:{fill};pointer-events:none;box-sizing:border-box;",
        rect.top, rect.left, rect.width, rect.height
    );
    if let Some(outline) = outline {
        style.push_str(&format!("outline:{outline};"));
    }
    style
}
