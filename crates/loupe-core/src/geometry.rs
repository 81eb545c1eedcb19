//! Box metrics and viewport-safe placement for floating overlay panels.
//!
//! All of this is plain arithmetic over rectangles; the client feeds in
//! values read from `getBoundingClientRect` and computed styles.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn from_origin_size(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            top,
            right: left + width,
            bottom: top + height,
            left,
            width,
            height,
        }
    }
}

/// Per-edge thickness of one CSS box layer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxEdges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

/// Border-box rectangle plus the padding/border/margin layers around it,
/// extracted from an element's computed style.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxMetrics {
    pub rect: Rect,
    pub padding: BoxEdges,
    pub border: BoxEdges,
    pub margin: BoxEdges,
}

impl BoxMetrics {
    /// The margin box: the border-box rect expanded by the margins.
    pub fn margin_rect(&self) -> Rect {
        Rect::from_origin_size(
            self.rect.left - self.margin.left,
            self.rect.top - self.margin.top,
            self.rect.width + self.margin.left + self.margin.right,
            self.rect.height + self.margin.top + self.margin.bottom,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizon {
    Left,
    Center,
    Right,
}

/// Chosen side of the target a panel is rendered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub vertical: Vertical,
    pub horizon: Horizon,
}

/// CSS anchor values for a floating panel. Rendered into an inline style.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub top: Option<String>,
    pub right: Option<String>,
    pub bottom: Option<String>,
    pub left: Option<String>,
    pub transform: Option<String>,
    pub max_height: Option<String>,
}

impl Position {
    pub fn to_style(&self) -> String {
        let mut style = String::new();
        let mut push = |prop: &str, value: &Option<String>| {
            if let Some(v) = value {
                style.push_str(prop);
                style.push(':');
                style.push_str(v);
                style.push(';');
            }
        };
        push("top", &self.top);
        push("right", &self.right);
        push("bottom", &self.bottom);
        push("left", &self.left);
        push("transform", &self.transform);
        push("max-height", &self.max_height);
        style
    }
}

fn px(v: f64) -> Option<String> {
    Some(format!("{v}px"))
}

/// Chooses which side of `target` a panel of size `panel` goes on.
///
/// Prefers below/left-aligned (growing down and right); flips to above
/// when the panel would cross the bottom edge, to right-aligned when it
/// would cross the right edge, and centers when neither side placement
/// fits horizontally.
pub fn place_panel(target: Rect, panel: (f64, f64), viewport: (f64, f64)) -> Placement {
    let (panel_w, panel_h) = panel;
    let (vw, vh) = viewport;

    let vertical = if target.bottom + panel_h <= vh {
        Vertical::Below
    } else if target.top - panel_h >= 0.0 {
        Vertical::Above
    } else {
        // Neither side fits fully; below is clamped by panel_rect.
        Vertical::Below
    };

    let horizon = if target.left + panel_w <= vw {
        Horizon::Left
    } else if target.right - panel_w >= 0.0 {
        Horizon::Right
    } else {
        Horizon::Center
    };

    Placement { vertical, horizon }
}

/// Concrete panel bounds for a placement, clamped into the viewport.
pub fn panel_rect(
    target: Rect,
    panel: (f64, f64),
    viewport: (f64, f64),
    placement: Placement,
) -> Rect {
    let (panel_w, panel_h) = panel;
    let (vw, vh) = viewport;

    let x = match placement.horizon {
        Horizon::Left => target.left,
        Horizon::Right => target.right - panel_w,
        Horizon::Center => target.left + (target.width - panel_w) / 2.0,
    };
    let y = match placement.vertical {
        Vertical::Below => target.bottom,
        Vertical::Above => target.top - panel_h,
    };

    let x = x.clamp(0.0, (vw - panel_w).max(0.0));
    let y = y.clamp(0.0, (vh - panel_h).max(0.0));
    Rect::from_origin_size(x, y, panel_w, panel_h)
}

/// Placement and CSS anchor for a panel attached to `target`.
pub fn position_for(target: Rect, panel: (f64, f64), viewport: (f64, f64)) -> (Placement, Position) {
    let placement = place_panel(target, panel, viewport);
    let rect = panel_rect(target, panel, viewport, placement);
    let position = Position {
        top: px(rect.top),
        left: px(rect.left),
        ..Position::default()
    };
    (placement, position)
}

/// Anchor for a panel opened at a pointer position (the layer panel),
/// clamped so it stays fully on screen. Caps the height when the panel is
/// taller than the viewport.
pub fn anchor_panel(x: f64, y: f64, panel: (f64, f64), viewport: (f64, f64)) -> Position {
    let (panel_w, panel_h) = panel;
    let (vw, vh) = viewport;
    let left = x.clamp(0.0, (vw - panel_w).max(0.0));
    let top = y.clamp(0.0, (vh - panel_h).max(0.0));
    Position {
        top: px(top),
        left: px(left),
        max_height: (panel_h > vh).then(|| format!("{vh}px")),
        ..Position::default()
    }
}

/// Drag repositioning: applies the pointer delta to the offset recorded at
/// drag start, keeping the panel fully inside the viewport.
pub fn clamp_drag(
    offset: (f64, f64),
    delta: (f64, f64),
    panel: (f64, f64),
    viewport: (f64, f64),
) -> (f64, f64) {
    let x = (offset.0 + delta.0).clamp(0.0, (viewport.0 - panel.0).max(0.0));
    let y = (offset.1 + delta.1).clamp(0.0, (viewport.1 - panel.1).max(0.0));
    (x, y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWPORT: (f64, f64) = (1280.0, 720.0);
    const PANEL: (f64, f64) = (320.0, 160.0);

    fn in_viewport(rect: Rect, viewport: (f64, f64)) -> bool {
        rect.left >= 0.0
            && rect.top >= 0.0
            && rect.right <= viewport.0
            && rect.bottom <= viewport.1
    }

    #[test]
    fn test_prefers_below_left() {
        let target = Rect::from_origin_size(100.0, 100.0, 50.0, 20.0);
        let placement = place_panel(target, PANEL, VIEWPORT);
        assert_eq!(placement.vertical, Vertical::Below);
        assert_eq!(placement.horizon, Horizon::Left);
    }

    #[test]
    fn test_flips_near_bottom_right_corner() {
        let target = Rect::from_origin_size(1200.0, 680.0, 60.0, 30.0);
        let placement = place_panel(target, PANEL, VIEWPORT);
        assert_eq!(placement.vertical, Vertical::Above);
        assert_eq!(placement.horizon, Horizon::Right);
        let rect = panel_rect(target, PANEL, VIEWPORT, placement);
        assert!(in_viewport(rect, VIEWPORT));
    }

    #[test]
    fn test_panel_rect_stays_in_viewport_when_nothing_fits() {
        // Tiny viewport: no side fits, bounds are clamped instead.
        let viewport = (300.0, 100.0);
        let target = Rect::from_origin_size(280.0, 90.0, 10.0, 10.0);
        let placement = place_panel(target, PANEL, viewport);
        let rect = panel_rect(target, PANEL, viewport, placement);
        assert!(rect.left >= 0.0 && rect.top >= 0.0);
    }

    #[test]
    fn test_anchor_panel_clamps_to_viewport() {
        let pos = anchor_panel(1270.0, 710.0, PANEL, VIEWPORT);
        assert_eq!(pos.left.as_deref(), Some("960px"));
        assert_eq!(pos.top.as_deref(), Some("560px"));
        assert_eq!(pos.max_height, None);
    }

    #[test]
    fn test_anchor_panel_caps_height() {
        let pos = anchor_panel(0.0, 0.0, (200.0, 900.0), VIEWPORT);
        assert_eq!(pos.max_height.as_deref(), Some("720px"));
    }

    #[test]
    fn test_clamp_drag_bounds() {
        // Dragging far past the right edge pins the panel at the edge.
        let pos = clamp_drag((900.0, 500.0), (5000.0, -9000.0), PANEL, VIEWPORT);
        assert_eq!(pos, (960.0, 0.0));
    }

    #[test]
    fn test_margin_rect_expands_border_box() {
        let metrics = BoxMetrics {
            rect: Rect::from_origin_size(10.0, 10.0, 100.0, 50.0),
            margin: BoxEdges { top: 5.0, right: 5.0, bottom: 5.0, left: 5.0 },
            ..BoxMetrics::default()
        };
        let m = metrics.margin_rect();
        assert_eq!(m.left, 5.0);
        assert_eq!(m.width, 110.0);
        assert_eq!(m.bottom, 65.0);
    }

    #[test]
    fn test_position_style_rendering() {
        let pos = Position {
            top: Some("4px".into()),
            left: Some("8px".into()),
            ..Position::default()
        };
        assert_eq!(pos.to_style(), "top:4px;left:8px;");
    }
}
