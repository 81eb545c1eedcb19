//! The inspector engine: a browser-resident state machine driven entirely
//! by document-level events.
//!
//! Key events feed a [`KeyState`] whose resolved mode gates everything
//! else; pointer moves resolve the hovered element; click / context-menu
//! dispatch the terminal action. The engine owns all mutable state behind
//! an `Rc<RefCell<_>>` handle and publishes immutable
//! [`OverlaySnapshot`]s for rendering.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, KeyboardEvent, MouseEvent, PointerEvent};

use loupe_core::geometry::{self, Position, Vertical};
use loupe_core::{
    BoxMetrics, ElementInfo, InspectorConfig, InteractionMode, KeyState, ModeConfig, default_mode,
    resolve_mode,
};

use crate::dispatch;
use crate::fetcher::SourceContextFetcher;
use crate::tracker;
use crate::tree::{self, TreeNode};

/// Assumed tooltip dimensions for placement math; the rendered tooltip is
/// capped to these via max-width/max-height.
const TOOLTIP_SIZE: (f64, f64) = (340.0, 200.0);
/// Layer-panel dimensions used for anchoring and drag clamping.
const PANEL_SIZE: (f64, f64) = (360.0, 420.0);
const TOAST_MS: u32 = 2500;
const LONG_PRESS_MS: u32 = 500;

pub type EngineHandle = Rc<RefCell<Engine>>;

/// Transient notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub success: bool,
}

/// Source-line preview shown inside the tooltip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub lines: Vec<String>,
    pub start_line: usize,
    pub target_line: usize,
}

/// Highlight + tooltip state for the currently hovered element.
#[derive(Clone, PartialEq)]
pub struct CoverView {
    pub metrics: BoxMetrics,
    pub info: ElementInfo,
    pub tooltip_position: Position,
    pub tooltip_below: bool,
    pub preview: Option<Preview>,
}

/// Per-node tooltip inside the layer panel. Derived, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveNode {
    pub content: String,
    pub position: Position,
    pub below: bool,
}

/// Layer-panel state handed to the renderer.
#[derive(Clone, PartialEq)]
pub struct PanelView {
    pub root: Rc<TreeNode>,
    pub position: Position,
    pub active: Option<ActiveNode>,
    pub dragging: bool,
}

/// Everything the overlay renders, published after each state change.
#[derive(Clone, PartialEq, Default)]
pub struct OverlaySnapshot {
    pub mode: Option<InteractionMode>,
    pub cover: Option<CoverView>,
    pub panel: Option<PanelView>,
    pub toast: Option<Toast>,
}

struct Hovered {
    /// Topmost element from the last hit test, for the same-node skip.
    hit: Element,
    /// Marker carrier (the hit element or its nearest marked ancestor).
    element: HtmlElement,
    info: ElementInfo,
    metrics: BoxMetrics,
}

#[derive(Clone, Copy)]
struct Drag {
    base: (f64, f64),
    start_offset: (f64, f64),
}

struct PanelState {
    root: Rc<TreeNode>,
    /// Session-local position, kept across drags while the panel is open.
    offset: (f64, f64),
    drag: Option<Drag>,
    active: Option<ActiveNode>,
}

pub struct Engine {
    config: InspectorConfig,
    mode_config: ModeConfig,
    keys: KeyState,
    mode: Option<InteractionMode>,
    hovered: Option<Hovered>,
    preview: Option<Preview>,
    panel: Option<PanelState>,
    toast: Option<Toast>,
    toast_timer: Option<Timeout>,
    long_press: Option<Timeout>,
    pointer: (f64, f64),
    fetcher: SourceContextFetcher,
    prev_user_select: Option<String>,
    emit: Rc<dyn Fn(OverlaySnapshot)>,
}

impl Engine {
    pub fn new(config: InspectorConfig, emit: Rc<dyn Fn(OverlaySnapshot)>) -> Engine {
        let mode_config = config.mode_config();
        let fetcher = SourceContextFetcher::new(config.server_url());
        Engine {
            config,
            mode_config,
            keys: KeyState::new(),
            mode: None,
            hovered: None,
            preview: None,
            panel: None,
            toast: None,
            toast_timer: None,
            long_press: None,
            pointer: (0.0, 0.0),
            fetcher,
            prev_user_select: None,
            emit,
        }
    }

    fn emit(&self) {
        (self.emit)(self.snapshot());
    }

    fn snapshot(&self) -> OverlaySnapshot {
        let viewport = viewport();
        let cover = self.hovered.as_ref().map(|hovered| {
            let (placement, tooltip_position) =
                geometry::position_for(hovered.metrics.rect, TOOLTIP_SIZE, viewport);
            CoverView {
                metrics: hovered.metrics,
                info: hovered.info.clone(),
                tooltip_position,
                tooltip_below: placement.vertical == Vertical::Below,
                preview: self.preview.clone(),
            }
        });
        let panel = self.panel.as_ref().map(|panel| PanelView {
            root: Rc::clone(&panel.root),
            position: geometry::anchor_panel(panel.offset.0, panel.offset.1, PANEL_SIZE, viewport),
            active: panel.active.clone(),
            dragging: panel.drag.is_some(),
        });
        OverlaySnapshot {
            mode: self.mode,
            cover,
            panel,
            toast: self.toast.clone(),
        }
    }

    fn recompute_mode(&mut self) {
        let mode = resolve_mode(&self.keys, &self.mode_config);
        if mode == self.mode {
            return;
        }
        let was_active = self.mode.is_some();
        self.mode = mode;
        match (was_active, self.mode.is_some()) {
            (false, true) => self.enter_tracking(),
            (true, false) => self.exit_tracking(),
            _ => {}
        }
        self.emit();
    }

    fn enter_tracking(&mut self) {
        if let Some(body) = body() {
            let style = body.style();
            self.prev_user_select = style.get_property_value("user-select").ok();
            let _ = style.set_property("user-select", "none");
            let _ = style.set_property("cursor", "crosshair");
        }
    }

    /// Mode dropped to none: clear the hover and abort any preview fetch.
    /// An open layer panel stays up for browsing; only blur/Escape or its
    /// close button dismiss it.
    fn exit_tracking(&mut self) {
        self.hovered = None;
        self.preview = None;
        self.fetcher.cancel();
        self.cancel_long_press();
        if let Some(body) = body() {
            let style = body.style();
            match self.prev_user_select.take() {
                Some(value) if !value.is_empty() => {
                    let _ = style.set_property("user-select", &value);
                }
                _ => {
                    let _ = style.remove_property("user-select");
                }
            }
            let _ = style.remove_property("cursor");
        }
    }

    fn clear_hover(&mut self) {
        self.hovered = None;
        self.preview = None;
        self.fetcher.cancel();
    }

    fn cancel_long_press(&mut self) {
        if let Some(timer) = self.long_press.take() {
            timer.cancel();
        }
    }

    fn open_panel_at(&mut self, x: f64, y: f64) {
        let Some(hovered) = &self.hovered else {
            return;
        };
        // Element gone between hover and trigger: abort silently.
        let Some(root) = tree::build_node_tree(&hovered.element) else {
            return;
        };
        let offset = geometry::clamp_drag((x, y), (0.0, 0.0), PANEL_SIZE, viewport());
        self.panel = Some(PanelState {
            root,
            offset,
            drag: None,
            active: None,
        });
        self.emit();
    }
}

/// Wires the engine to document/window events. Dropping the returned
/// listeners detaches everything.
pub fn attach_listeners(handle: &EngineHandle) -> Vec<EventListener> {
    let Some(window) = web_sys::window() else {
        return Vec::new();
    };
    let Some(document) = window.document() else {
        return Vec::new();
    };

    // Capture phase so the page's own handlers never see intercepted
    // clicks; prevent-default must stay enabled for that to work.
    let capture = || {
        let mut options = EventListenerOptions::enable_prevent_default();
        options.phase = EventListenerPhase::Capture;
        options
    };

    let mut listeners = Vec::new();

    {
        let handle = handle.clone();
        listeners.push(EventListener::new(&document, "keydown", move |event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                on_key_down(&handle, event);
            }
        }));
    }
    {
        let handle = handle.clone();
        listeners.push(EventListener::new(&document, "keyup", move |event| {
            if let Some(event) = event.dyn_ref::<KeyboardEvent>() {
                on_key_up(&handle, event);
            }
        }));
    }
    {
        let handle = handle.clone();
        listeners.push(EventListener::new(&window, "blur", move |_| {
            cancel(&handle);
        }));
    }
    {
        let handle = handle.clone();
        listeners.push(EventListener::new(&document, "mousemove", move |event| {
            if let Some(event) = event.dyn_ref::<MouseEvent>() {
                on_pointer_move(&handle, f64::from(event.client_x()), f64::from(event.client_y()));
            }
        }));
    }
    {
        let handle = handle.clone();
        listeners.push(EventListener::new_with_options(
            &document,
            "click",
            capture(),
            move |event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    on_click(&handle, event);
                }
            },
        ));
    }
    {
        let handle = handle.clone();
        listeners.push(EventListener::new_with_options(
            &document,
            "contextmenu",
            capture(),
            move |event| {
                if let Some(event) = event.dyn_ref::<MouseEvent>() {
                    on_context_menu(&handle, event);
                }
            },
        ));
    }
    {
        let handle = handle.clone();
        listeners.push(EventListener::new(&document, "pointerdown", move |event| {
            if let Some(event) = event.dyn_ref::<PointerEvent>() {
                on_pointer_down(&handle, event);
            }
        }));
    }
    {
        let handle = handle.clone();
        listeners.push(EventListener::new(&document, "pointerup", move |_| {
            on_pointer_up(&handle);
        }));
    }

    listeners
}

pub fn on_key_down(handle: &EngineHandle, event: &KeyboardEvent) {
    let key = event.key();
    if key == "Escape" {
        cancel(handle);
        return;
    }
    let mut engine = handle.borrow_mut();
    engine.keys.down(&key);
    engine.recompute_mode();
}

pub fn on_key_up(handle: &EngineHandle, event: &KeyboardEvent) {
    let mut engine = handle.borrow_mut();
    // Always remove, matching or not: no stuck keys.
    engine.keys.up(&event.key());
    engine.recompute_mode();
}

/// Window blur or Escape: tracking off, panel closed.
pub fn cancel(handle: &EngineHandle) {
    let mut engine = handle.borrow_mut();
    engine.keys.clear();
    engine.panel = None;
    engine.recompute_mode();
    engine.emit();
}

pub fn on_pointer_move(handle: &EngineHandle, x: f64, y: f64) {
    let hover_changed = {
        let mut engine = handle.borrow_mut();
        engine.pointer = (x, y);
        engine.cancel_long_press();

        // An active drag owns the pointer.
        let mut dragged = false;
        if let Some(panel) = &mut engine.panel
            && let Some(drag) = panel.drag
        {
            let delta = (x - drag.base.0, y - drag.base.1);
            panel.offset = geometry::clamp_drag(drag.start_offset, delta, PANEL_SIZE, viewport());
            dragged = true;
        }
        if dragged {
            engine.emit();
            return;
        }

        if engine.mode.is_none() {
            return;
        }

        let Some(element) = tracker::element_at(x, y) else {
            engine.clear_hover();
            engine.emit();
            return;
        };
        // Unchanged topmost element: skip recomputation.
        if let Some(hovered) = &engine.hovered
            && tracker::is_same_position_node(&hovered.hit, &element)
        {
            return;
        }

        match tracker::resolve_source_info(&element) {
            Some((carrier, source)) => {
                let metrics = tracker::box_metrics(&carrier);
                let info = tracker::element_info(&carrier, source);
                engine.hovered = Some(Hovered {
                    hit: element,
                    element: carrier,
                    info,
                    metrics,
                });
                engine.preview = None;
                engine.emit();
                true
            }
            None => {
                // No discoverable source location: inert hover.
                engine.clear_hover();
                engine.emit();
                false
            }
        }
    };

    if hover_changed {
        maybe_fetch_preview(handle);
    }
}

/// Starts (or restarts) the cancellable source-context fetch for the
/// current hover. A newer hover aborts the predecessor, so the preview
/// can never be stale.
fn maybe_fetch_preview(handle: &EngineHandle) {
    let (file, line) = {
        let engine = handle.borrow();
        if !engine.config.show_source_context {
            return;
        }
        let Some(hovered) = &engine.hovered else {
            return;
        };
        (hovered.info.source.path.clone(), hovered.info.source.line)
    };

    let done = handle.clone();
    handle
        .borrow_mut()
        .fetcher
        .fetch(&file, line, move |generation, context| {
            let mut engine = done.borrow_mut();
            if !engine.fetcher.is_current(generation) {
                return;
            }
            engine.preview = context.map(|ctx| Preview {
                lines: ctx.lines,
                start_line: ctx.start_line,
                target_line: line as usize,
            });
            engine.emit();
        });
}

pub fn on_click(handle: &EngineHandle, event: &MouseEvent) {
    let (mode, info, config) = {
        let engine = handle.borrow();
        let Some(mode) = engine.mode else {
            return;
        };
        let Some(hovered) = &engine.hovered else {
            return;
        };
        if !hovered.element.is_connected() {
            return;
        }
        (mode, hovered.info.clone(), engine.config.clone())
    };
    event.prevent_default();
    event.stop_propagation();
    trigger(handle, mode, &info, &config);
}

pub fn on_context_menu(handle: &EngineHandle, event: &MouseEvent) {
    let mut engine = handle.borrow_mut();
    if engine.mode.is_none() || engine.hovered.is_none() {
        return;
    }
    event.prevent_default();
    event.stop_propagation();
    engine.open_panel_at(f64::from(event.client_x()), f64::from(event.client_y()));
}

/// Touch long-press opens the layer panel, mirroring context-menu.
pub fn on_pointer_down(handle: &EngineHandle, event: &PointerEvent) {
    if event.pointer_type() != "touch" {
        return;
    }
    let press = handle.clone();
    let mut engine = handle.borrow_mut();
    if engine.mode.is_none() || engine.hovered.is_none() {
        return;
    }
    engine.long_press = Some(Timeout::new(LONG_PRESS_MS, move || {
        let mut engine = press.borrow_mut();
        engine.long_press = None;
        let (x, y) = engine.pointer;
        engine.open_panel_at(x, y);
    }));
}

pub fn on_pointer_up(handle: &EngineHandle) {
    let mut engine = handle.borrow_mut();
    engine.cancel_long_press();
    // Releasing the mouse ends a panel drag, keeping the new position for
    // the rest of the session.
    let mut ended = false;
    if let Some(panel) = &mut engine.panel
        && panel.drag.take().is_some()
    {
        ended = true;
    }
    if ended {
        engine.emit();
    }
}

/// Drag start from the panel title bar.
pub fn on_drag_start(handle: &EngineHandle, x: f64, y: f64) {
    let mut engine = handle.borrow_mut();
    let mut started = false;
    if let Some(panel) = &mut engine.panel {
        panel.drag = Some(Drag {
            base: (x, y),
            start_offset: panel.offset,
        });
        started = true;
    }
    if started {
        engine.emit();
    }
}

pub fn close_panel(handle: &EngineHandle) {
    let mut engine = handle.borrow_mut();
    engine.panel = None;
    engine.emit();
}

/// Action on a layer-panel node: same dispatch as a page click, against
/// that node's recorded location.
pub fn on_tree_select(handle: &EngineHandle, node: &Rc<TreeNode>) {
    let (mode, config) = {
        let engine = handle.borrow();
        let Some(mode) = engine.mode.or_else(|| default_mode(&engine.mode_config)) else {
            return;
        };
        (mode, engine.config.clone())
    };
    if !node.element.is_connected() {
        return;
    }
    trigger(handle, mode, &node.info, &config);
    close_panel(handle);
}

/// Hovering a panel row re-highlights that element in the page and shows
/// the full location in a per-node tooltip.
pub fn on_tree_hover(handle: &EngineHandle, node: &Rc<TreeNode>, x: f64, y: f64) {
    let mut engine = handle.borrow_mut();
    if !node.element.is_connected() {
        return;
    }
    let metrics = tracker::box_metrics(&node.element);
    engine.hovered = Some(Hovered {
        hit: node.element.clone().into(),
        element: node.element.clone(),
        info: node.info.clone(),
        metrics,
    });
    engine.preview = None;
    let below = y + 48.0 < viewport().1;
    if let Some(panel) = &mut engine.panel {
        panel.active = Some(ActiveNode {
            content: node.info.path_with_position(),
            position: Position {
                top: Some(format!("{}px", if below { y + 16.0 } else { y - 40.0 })),
                left: Some(format!("{x}px")),
                ..Position::default()
            },
            below,
        });
    }
    engine.emit();
}

pub fn on_tree_leave(handle: &EngineHandle) {
    let mut engine = handle.borrow_mut();
    if let Some(panel) = &mut engine.panel {
        panel.active = None;
    }
    engine.emit();
}

fn trigger(
    handle: &EngineHandle,
    mode: InteractionMode,
    info: &ElementInfo,
    config: &InspectorConfig,
) {
    match mode {
        InteractionMode::Copy => {
            let toast = handle.clone();
            dispatch::copy_source(config, info, move |copied| {
                if copied {
                    show_toast(&toast, "copied to clipboard", true);
                } else {
                    show_toast(&toast, "copy failed", false);
                }
            });
        }
        InteractionMode::Locate | InteractionMode::Target => {
            let toast = handle.clone();
            dispatch::send_inspect_request(config, info, move |err| {
                tracing::warn!("[loupe] inspect request failed: {err}");
                show_toast(&toast, "could not reach the loupe bridge server", false);
            });
        }
    }
}

pub fn show_toast(handle: &EngineHandle, message: impl Into<String>, success: bool) {
    let mut engine = handle.borrow_mut();
    engine.toast = Some(Toast {
        message: message.into(),
        success,
    });
    let timer = handle.clone();
    // Replacing the previous Timeout cancels it on drop.
    engine.toast_timer = Some(Timeout::new(TOAST_MS, move || {
        let mut engine = timer.borrow_mut();
        engine.toast = None;
        engine.toast_timer = None;
        engine.emit();
    }));
    engine.emit();
}

fn viewport() -> (f64, f64) {
    web_sys::window().map_or((0.0, 0.0), |window| {
        (
            window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
            window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0),
        )
    })
}

fn body() -> Option<web_sys::HtmlElement> {
    web_sys::window()?.document()?.body()
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use loupe_core::SourceInfo;
    use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

    wasm_bindgen_test_configure!(run_in_browser);

    fn engine_handle() -> EngineHandle {
        Rc::new(RefCell::new(Engine::new(
            InspectorConfig::default(),
            Rc::new(|_| {}),
        )))
    }

    fn panel_state() -> PanelState {
        let document = web_sys::window().unwrap().document().unwrap();
        let element = document
            .create_element("div")
            .unwrap()
            .unchecked_into::<HtmlElement>();
        let root = Rc::new(TreeNode {
            info: ElementInfo {
                source: SourceInfo {
                    name: "App".into(),
                    path: "src/App.vue".into(),
                    line: 1,
                    column: 1,
                },
                width: 0.0,
                height: 0.0,
                text_content: None,
            },
            depth: 0,
            children: Vec::new(),
            element,
        });
        PanelState {
            root,
            offset: (0.0, 0.0),
            drag: None,
            active: None,
        }
    }

    #[wasm_bindgen_test]
    fn test_panel_stays_open_after_hotkey_release() {
        let handle = engine_handle();
        {
            let mut engine = handle.borrow_mut();
            engine.keys.down("shift");
            engine.keys.down("alt");
            engine.recompute_mode();
            assert!(engine.mode.is_some());
            engine.panel = Some(panel_state());

            engine.keys.up("alt");
            engine.recompute_mode();
            assert_eq!(engine.mode, None);
            // Released keys leave the panel up for browsing.
            assert!(engine.panel.is_some());
        }

        cancel(&handle);
        assert!(handle.borrow().panel.is_none());
    }

    #[wasm_bindgen_test]
    fn test_copy_outcome_drives_toast() {
        let handle = engine_handle();
        show_toast(&handle, "copied to clipboard", true);
        let engine = handle.borrow();
        let toast = engine.toast.as_ref().unwrap();
        assert!(toast.success);
        assert_eq!(toast.message, "copied to clipboard");
    }
}
