//! Ancestor-chain tree for the layer panel.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::HtmlElement;

use loupe_core::ElementInfo;

use crate::tracker;

/// One node of the layer panel's ancestor chain.
///
/// `element` is a lookup handle into the live DOM used for re-highlighting
/// on hover; the tree only lives while the panel is open, so it never
/// keeps nodes alive beyond that.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub info: ElementInfo,
    pub depth: usize,
    /// Populated only along the single active path: each node has at most
    /// one child, the next element down toward the clicked one.
    pub children: Vec<Rc<TreeNode>>,
    pub element: HtmlElement,
}

/// Builds the chain from the clicked element up to the tracked root,
/// keeping only elements that carry their own source marker. Returns the
/// rootmost node, or `None` when the element left the document or no
/// ancestor carries a marker.
pub fn build_node_tree(start: &HtmlElement) -> Option<Rc<TreeNode>> {
    if !start.is_connected() {
        return None;
    }

    // Bottom-up chain, clicked element first.
    let mut chain: Vec<(HtmlElement, ElementInfo)> = Vec::new();
    let mut current: Option<web_sys::Element> = Some(start.clone().into());
    while let Some(element) = current {
        if let Some(source) = tracker::source_info_of(&element)
            && let Some(html) = element.dyn_ref::<HtmlElement>()
        {
            chain.push((html.clone(), tracker::element_info(html, source)));
        }
        current = element.parent_element();
    }
    if chain.is_empty() {
        return None;
    }

    // Fold into a single-path tree, deepest node innermost.
    let total = chain.len();
    let mut child: Option<Rc<TreeNode>> = None;
    for (offset, (element, info)) in chain.into_iter().enumerate() {
        child = Some(Rc::new(TreeNode {
            info,
            depth: total - 1 - offset,
            children: child.into_iter().collect(),
            element,
        }));
    }
    child
}
