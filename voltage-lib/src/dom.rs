//! DOM boundary used by the adapters.

use std::rc::Rc;

use crate::errors::VoltageError;
use crate::Result;

/// Click handler attached to an adapter-created element.
pub type ClickHandler = Rc<dyn Fn()>;

/// The slice of the document API the adapters need.
///
/// `Node` is whatever handle the document hands out for elements; it must be
/// cheap to clone.
pub trait Dom {
    type Node: Clone + 'static;

    /// First element matching `selector` (`document.querySelector`).
    fn query_selector(&self, selector: &str) -> Option<Self::Node>;

    /// Whether `node` is an element that can host a widget.
    fn is_container(&self, node: &Self::Node) -> bool;

    /// Root for page-wide overlays (`document.body`).
    fn overlay_root(&self) -> Result<Self::Node>;

    /// Whether an element with this `id` exists in the document.
    fn contains_id(&self, id: &str) -> bool;

    /// Append a `<style id=..>` block to the document head.
    fn install_style(&self, id: &str, css: &str) -> Result<()>;

    /// Create a detached element.
    fn create_element(&self, tag: &str, class: &str, inner_html: &str) -> Result<Self::Node>;

    /// First descendant of `root` matching `selector`.
    fn query_within(&self, root: &Self::Node, selector: &str) -> Option<Self::Node>;

    /// Replace the text content of `node`.
    fn set_text(&self, node: &Self::Node, text: &str);

    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<()>;

    fn remove_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<()>;

    /// Register a click listener on `node` for the node's lifetime.
    fn on_click(&self, node: &Self::Node, handler: ClickHandler) -> Result<()>;
}

/// Where to mount a widget.
#[derive(Clone, Debug)]
pub enum MountTarget<N> {
    /// CSS selector, resolved to its first match.
    Selector(String),
    /// Already resolved element.
    Element(N),
}

impl<N> From<&str> for MountTarget<N> {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl<N> From<String> for MountTarget<N> {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl<N> MountTarget<N> {
    /// Resolve to a container element.
    pub fn resolve<D>(self, dom: &D) -> Result<N>
    where
        D: Dom<Node = N>,
        N: Clone + 'static,
    {
        match self {
            Self::Selector(selector) => {
                let node = dom
                    .query_selector(&selector)
                    .ok_or_else(|| VoltageError::TargetNotFound(selector.clone()))?;
                if !dom.is_container(&node) {
                    return Err(VoltageError::InvalidTarget(selector));
                }
                Ok(node)
            }
            Self::Element(node) => {
                if !dom.is_container(&node) {
                    return Err(VoltageError::InvalidTarget("element".to_string()));
                }
                Ok(node)
            }
        }
    }
}
