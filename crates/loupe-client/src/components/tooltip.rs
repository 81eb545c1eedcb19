//! Info tooltip next to the hovered element: component name, size,
//! source location and the optional source-line preview.

use yew::prelude::*;

use loupe_core::geometry::Position;
use loupe_core::{ElementInfo, InteractionMode};

use crate::engine::Preview;

#[derive(Properties, PartialEq)]
pub struct TooltipProps {
    pub info: ElementInfo,
    pub position: Position,
    pub below: bool,
    pub preview: Option<Preview>,
    pub mode: Option<InteractionMode>,
}

fn mode_label(mode: InteractionMode) -> &'static str {
    match mode {
        InteractionMode::Copy => "copy",
        InteractionMode::Locate => "locate",
        InteractionMode::Target => "target",
    }
}

fn mode_color(mode: InteractionMode) -> &'static str {
    match mode {
        InteractionMode::Copy => "#f6b26b",
        InteractionMode::Locate => "#42b983",
        InteractionMode::Target => "#6b9ef6",
    }
}

#[function_component(Tooltip)]
pub fn tooltip(props: &TooltipProps) -> Html {
    let accent = props.mode.map_or("#42b983", mode_color);
    let style = format!(
        "position:fixed;{}max-width:340px;max-height:200px;overflow:hidden;\
         background:#1e1e1e;color:#d4d4d4;font:12px/1.5 monospace;padding:6px 8px;\
         border-radius:4px;border-left:3px solid {accent};pointer-events:none;",
        props.position.to_style()
    );

    html! {
        <div class={classes!("loupe-tooltip", props.below.then_some("loupe-tooltip-below"))} {style}>
            <div>
                if let Some(mode) = props.mode {
                    <span style={format!("color:{accent};margin-right:6px;")}>
                        { mode_label(mode) }
                    </span>
                }
                <span style="color:#9cdcfe;">{ format!("<{}>", props.info.source.name) }</span>
                <span style="margin-left:6px;color:#808080;">
                    { format!("{:.0} × {:.0}", props.info.width, props.info.height) }
                </span>
            </div>
            <div style="color:#ce9178;">
                { format!(
                    "{}:{}:{}",
                    props.info.source.path, props.info.source.line, props.info.source.column
                ) }
            </div>
            if let Some(text) = &props.info.text_content {
                <div style="color:#6a9955;">{ text.clone() }</div>
            }
            if let Some(preview) = &props.preview {
                <pre style="margin:4px 0 0;border-top:1px solid #333;padding-top:4px;">
                    { for preview.lines.iter().enumerate().map(|(offset, line)| {
                        let number = preview.start_line + offset;
                        let highlight = number == preview.target_line;
                        let row_style = if highlight {
                            "background:rgba(66,184,131,0.2);display:block;"
                        } else {
                            "display:block;"
                        };
                        html! {
                            <span style={row_style}>
                                { format!("{number:>4} {line}") }
                            </span>
                        }
                    }) }
                </pre>
            }
        </div>
    }
}
