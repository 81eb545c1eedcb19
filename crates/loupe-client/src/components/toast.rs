//! Transient success/error notification.

use yew::prelude::*;

use crate::engine::Toast;

#[derive(Properties, PartialEq)]
pub struct ToastProps {
    pub toast: Toast,
}

#[function_component(ToastView)]
pub fn toast_view(props: &ToastProps) -> Html {
    let background = if props.toast.success { "#2d6a4f" } else { "#9b2226" };
    let style = format!(
        "position:fixed;top:16px;left:50%;transform:translateX(-50%);\
         background:{background};color:#fff;font:12px/1.4 sans-serif;\
         padding:6px 12px;border-radius:4px;pointer-events:none;"
    );
    html! {
        <div class="loupe-toast" {style}>{ props.toast.message.clone() }</div>
    }
}
