//! Overlay root component: owns the engine, wires document listeners and
//! renders whatever the latest snapshot says.

use std::rc::Rc;

use yew::prelude::*;

use loupe_core::InspectorConfig;

use crate::components::{Cover, LayerPanel, ToastView, Tooltip};
use crate::engine::{self, Engine, OverlaySnapshot};
use crate::tree::TreeNode;

#[derive(Properties, PartialEq)]
pub struct AppProps {
    pub config: InspectorConfig,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let snapshot = use_state(OverlaySnapshot::default);

    let engine = {
        let snapshot = snapshot.clone();
        let config = props.config.clone();
        use_mut_ref(move || {
            let publish = snapshot.clone();
            Engine::new(config, Rc::new(move |snap| publish.set(snap)))
        })
    };

    {
        let engine = engine.clone();
        use_effect_with((), move |_| {
            let listeners = engine::attach_listeners(&engine);
            move || drop(listeners)
        });
    }

    let on_close = {
        let engine = engine.clone();
        Callback::from(move |()| engine::close_panel(&engine))
    };
    let on_select = {
        let engine = engine.clone();
        Callback::from(move |node: Rc<TreeNode>| engine::on_tree_select(&engine, &node))
    };
    let on_hover = {
        let engine = engine.clone();
        Callback::from(move |(node, x, y): (Rc<TreeNode>, f64, f64)| {
            engine::on_tree_hover(&engine, &node, x, y);
        })
    };
    let on_leave = {
        let engine = engine.clone();
        Callback::from(move |()| engine::on_tree_leave(&engine))
    };
    let on_drag_start = {
        let engine = engine.clone();
        Callback::from(move |(x, y): (f64, f64)| engine::on_drag_start(&engine, x, y))
    };

    // The container itself never intercepts pointer events; interactive
    // children (the panel) opt back in.
    html! {
        <div
            class="loupe-overlay"
            style="position:fixed;inset:0;pointer-events:none;z-index:2147483647;"
        >
            if let Some(cover) = &snapshot.cover {
                <Cover metrics={cover.metrics} />
                <Tooltip
                    info={cover.info.clone()}
                    position={cover.tooltip_position.clone()}
                    below={cover.tooltip_below}
                    preview={cover.preview.clone()}
                    mode={snapshot.mode}
                />
            }
            if let Some(panel) = &snapshot.panel {
                <LayerPanel
                    view={panel.clone()}
                    on_close={on_close}
                    on_select={on_select}
                    on_hover={on_hover}
                    on_leave={on_leave}
                    on_drag_start={on_drag_start}
                />
            }
            if let Some(toast) = &snapshot.toast {
                <ToastView toast={toast.clone()} />
            }
        </div>
    }
}
