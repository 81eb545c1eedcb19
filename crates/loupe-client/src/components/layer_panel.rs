//! Layer panel: the ancestor-chain tree opened on context-menu or
//! long-press, draggable by its title bar.

use std::rc::Rc;

use yew::prelude::*;

use crate::engine::PanelView;
use crate::tree::TreeNode;

#[derive(Properties, PartialEq)]
pub struct LayerPanelProps {
    pub view: PanelView,
    pub on_close: Callback<()>,
    pub on_select: Callback<Rc<TreeNode>>,
    pub on_hover: Callback<(Rc<TreeNode>, f64, f64)>,
    pub on_leave: Callback<()>,
    pub on_drag_start: Callback<(f64, f64)>,
}

#[function_component(LayerPanel)]
pub fn layer_panel(props: &LayerPanelProps) -> Html {
    let style = format!(
        "position:fixed;{}width:360px;max-height:420px;overflow:auto;\
         background:#1e1e1e;color:#d4d4d4;font:12px/1.6 monospace;\
         border:1px solid #333;border-radius:4px;pointer-events:auto;\
         {}",
        props.view.position.to_style(),
        if props.view.dragging { "user-select:none;" } else { "" }
    );

    let ondragbar = {
        let on_drag_start = props.on_drag_start.clone();
        Callback::from(move |event: MouseEvent| {
            event.prevent_default();
            on_drag_start.emit((f64::from(event.client_x()), f64::from(event.client_y())));
        })
    };
    let onclose = {
        let on_close = props.on_close.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            on_close.emit(());
        })
    };

    html! {
        <div class="loupe-layer-panel" {style}>
            <div
                class="loupe-layer-title"
                style="display:flex;justify-content:space-between;padding:4px 8px;\
                       background:#2d2d2d;cursor:move;"
                onmousedown={ondragbar}
            >
                <span>{ "layers" }</span>
                <span style="cursor:pointer;" onclick={onclose}>{ "✕" }</span>
            </div>
            <div style="padding:4px 0;">
                { render_node(&props.view.root, props) }
            </div>
            if let Some(active) = &props.view.active {
                <div
                    class="loupe-layer-tooltip"
                    style={format!(
                        "position:fixed;{}background:#2d2d2d;color:#ce9178;\
                         padding:2px 6px;border-radius:3px;pointer-events:none;",
                        active.position.to_style()
                    )}
                >
                    { active.content.clone() }
                </div>
            }
        </div>
    }
}

fn render_node(node: &Rc<TreeNode>, props: &LayerPanelProps) -> Html {
    let onclick = {
        let on_select = props.on_select.clone();
        let node = node.clone();
        Callback::from(move |event: MouseEvent| {
            event.stop_propagation();
            on_select.emit(node.clone());
        })
    };
    let onmouseenter = {
        let on_hover = props.on_hover.clone();
        let node = node.clone();
        Callback::from(move |event: MouseEvent| {
            on_hover.emit((
                node.clone(),
                f64::from(event.client_x()),
                f64::from(event.client_y()),
            ));
        })
    };
    let onmouseleave = {
        let on_leave = props.on_leave.clone();
        Callback::from(move |_: MouseEvent| on_leave.emit(()))
    };

    let file = node
        .info
        .source
        .path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string();

    html! {
        <div style={format!("padding-left:{}px;", 12 * node.depth)}>
            <div
                class="loupe-layer-node"
                style="cursor:pointer;padding:1px 8px;"
                {onclick}
                {onmouseenter}
                {onmouseleave}
            >
                <span style="color:#9cdcfe;">{ format!("<{}>", node.info.source.name) }</span>
                <span style="margin-left:6px;color:#808080;">
                    { format!("{file}:{}", node.info.source.line) }
                </span>
            </div>
            { for node.children.iter().map(|child| render_node(child, props)) }
        </div>
    }
}
