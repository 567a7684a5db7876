//! In-memory document for exercising adapters without a browser.
//!
//! Selectors support `#id`, `.class` and bare tag names. Markup passed to
//! `create_element` is scanned for opening tags only: every tag becomes a
//! direct child of the created element, which is enough to locate labelled
//! parts of adapter-created controls.

use std::cell::RefCell;

use crate::dom::{ClickHandler, Dom};
use crate::errors::VoltageError;
use crate::Result;

/// Handle to a node of a [`MemoryDom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Tags that are not HTML elements and cannot host a widget.
const NON_HTML_TAGS: &[&str] = &["#text", "svg", "path"];

#[derive(Default)]
struct NodeData {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    text: String,
    inner_html: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    click_handlers: Vec<ClickHandler>,
}

/// An in-memory document with a `<head>` and a `<body>`.
pub struct MemoryDom {
    nodes: RefCell<Vec<NodeData>>,
    head: NodeId,
    body: NodeId,
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDom {
    pub fn new() -> Self {
        let mut nodes = vec![NodeData {
            tag: "html".into(),
            ..NodeData::default()
        }];
        let root = NodeId(0);
        for tag in ["head", "body"] {
            let id = NodeId(nodes.len());
            nodes.push(NodeData {
                tag: tag.into(),
                parent: Some(root),
                ..NodeData::default()
            });
            nodes[0].children.push(id);
        }
        Self {
            nodes: RefCell::new(nodes),
            head: NodeId(1),
            body: NodeId(2),
        }
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Append a `<div id=..>` to `parent`.
    pub fn append_div(&self, parent: NodeId, id: &str) -> NodeId {
        self.append_element(parent, "div", id)
    }

    /// Append a `<tag id=..>` to `parent`.
    pub fn append_element(&self, parent: NodeId, tag: &str, id: &str) -> NodeId {
        let node = self.alloc(tag, Some(id.to_string()), Vec::new(), "");
        self.link(parent, node);
        node
    }

    /// Append a text node to `parent`.
    pub fn append_text(&self, parent: NodeId, text: &str) -> NodeId {
        let node = self.alloc("#text", None, Vec::new(), "");
        self.nodes.borrow_mut()[node.0].text = text.to_string();
        self.link(parent, node);
        node
    }

    pub fn tag(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].tag.clone()
    }

    pub fn text(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].text.clone()
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        self.nodes.borrow()[node.0].inner_html.clone()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes.borrow()[node.0].children.clone()
    }

    /// Attached nodes carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        self.walk(NodeId(0), &mut |node, data| {
            if data.classes.iter().any(|c| c == class) {
                found.push(node);
            }
        });
        found
    }

    /// Number of attached elements with this `id`.
    pub fn count_id(&self, id: &str) -> usize {
        let mut count = 0;
        self.walk(NodeId(0), &mut |_, data| {
            if data.id.as_deref() == Some(id) {
                count += 1;
            }
        });
        count
    }

    /// Simulate a user click on `node`.
    pub fn click(&self, node: NodeId) {
        let handlers = self.nodes.borrow()[node.0].click_handlers.clone();
        for handler in handlers {
            handler();
        }
    }

    fn alloc(&self, tag: &str, id: Option<String>, classes: Vec<String>, html: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        let node = NodeId(nodes.len());
        nodes.push(NodeData {
            tag: tag.to_string(),
            id,
            classes,
            inner_html: html.to_string(),
            ..NodeData::default()
        });
        node
    }

    fn link(&self, parent: NodeId, child: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        nodes[child.0].parent = Some(parent);
        nodes[parent.0].children.push(child);
    }

    fn walk(&self, from: NodeId, visit: &mut dyn FnMut(NodeId, &NodeData)) {
        let nodes = self.nodes.borrow();
        let mut stack = vec![from];
        while let Some(node) = stack.pop() {
            let data = &nodes[node.0];
            visit(node, data);
            stack.extend(data.children.iter().rev().copied());
        }
    }

    fn matches(data: &NodeData, selector: &str) -> bool {
        if let Some(id) = selector.strip_prefix('#') {
            data.id.as_deref() == Some(id)
        } else if let Some(class) = selector.strip_prefix('.') {
            data.classes.iter().any(|c| c == class)
        } else {
            data.tag == selector
        }
    }

    fn find_first(&self, root: NodeId, selector: &str, include_root: bool) -> Option<NodeId> {
        let mut found = None;
        self.walk(root, &mut |node, data| {
            if found.is_none() && (include_root || node != root) && Self::matches(data, selector) {
                found = Some(node);
            }
        });
        found
    }
}

/// Opening tags of `html` as `(tag, id, classes)`.
fn scan_tags(html: &str) -> Vec<(String, Option<String>, Vec<String>)> {
    let mut tags = Vec::new();
    for chunk in html.split('<').skip(1) {
        if chunk.starts_with('/') {
            continue;
        }
        let head = chunk.split('>').next().unwrap_or_default();
        let name: String = head
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        if name.is_empty() {
            continue;
        }
        let attr = |key: &str| {
            let needle = format!("{key}=\"");
            head.find(&needle).map(|start| {
                let rest = &head[start + needle.len()..];
                rest.split('"').next().unwrap_or_default().to_string()
            })
        };
        let classes = attr("class")
            .map(|c| c.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default();
        tags.push((name, attr("id"), classes));
    }
    tags
}

impl Dom for MemoryDom {
    type Node = NodeId;

    fn query_selector(&self, selector: &str) -> Option<NodeId> {
        self.find_first(NodeId(0), selector, true)
    }

    fn is_container(&self, node: &NodeId) -> bool {
        let nodes = self.nodes.borrow();
        nodes
            .get(node.0)
            .is_some_and(|data| !NON_HTML_TAGS.contains(&data.tag.as_str()))
    }

    fn overlay_root(&self) -> Result<NodeId> {
        Ok(self.body)
    }

    fn contains_id(&self, id: &str) -> bool {
        self.count_id(id) > 0
    }

    fn install_style(&self, id: &str, css: &str) -> Result<()> {
        let node = self.alloc("style", Some(id.to_string()), Vec::new(), "");
        self.nodes.borrow_mut()[node.0].text = css.to_string();
        self.link(self.head, node);
        Ok(())
    }

    fn create_element(&self, tag: &str, class: &str, inner_html: &str) -> Result<NodeId> {
        if tag.is_empty() {
            return Err(VoltageError::Dom("empty tag name".into()));
        }
        let classes = class.split_whitespace().map(str::to_string).collect();
        let node = self.alloc(tag, None, classes, inner_html);
        for (child_tag, id, classes) in scan_tags(inner_html) {
            let child = self.alloc(&child_tag, id, classes, "");
            self.link(node, child);
        }
        Ok(node)
    }

    fn query_within(&self, root: &NodeId, selector: &str) -> Option<NodeId> {
        self.find_first(*root, selector, false)
    }

    fn set_text(&self, node: &NodeId, text: &str) {
        self.nodes.borrow_mut()[node.0].text = text.to_string();
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<()> {
        if self.parent(*child).is_some() {
            return Err(VoltageError::Dom("node is already attached".into()));
        }
        self.link(*parent, *child);
        Ok(())
    }

    fn remove_child(&self, parent: &NodeId, child: &NodeId) -> Result<()> {
        let mut nodes = self.nodes.borrow_mut();
        let siblings = &mut nodes[parent.0].children;
        let index = siblings
            .iter()
            .position(|c| c == child)
            .ok_or_else(|| VoltageError::Dom("node is not a child of parent".into()))?;
        siblings.remove(index);
        nodes[child.0].parent = None;
        Ok(())
    }

    fn on_click(&self, node: &NodeId, handler: ClickHandler) -> Result<()> {
        self.nodes.borrow_mut()[node.0].click_handlers.push(handler);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selectors() {
        let dom = MemoryDom::new();
        let container = dom.append_div(dom.body(), "container");
        assert_eq!(dom.query_selector("#container"), Some(container));
        assert_eq!(dom.query_selector("body"), Some(dom.body()));
        assert_eq!(dom.query_selector("#missing"), None);
    }

    #[test]
    fn test_markup_children_are_queryable() {
        let dom = MemoryDom::new();
        let button = dom
            .create_element(
                "button",
                "trigger",
                r#"<svg class="icon"><path d="M0"/></svg><span class="label"></span>"#,
            )
            .unwrap();
        let label = dom.query_within(&button, ".label").unwrap();
        assert_eq!(dom.tag(label), "span");
        assert!(!dom.is_container(&dom.query_within(&button, ".icon").unwrap()));

        // Detached until appended.
        assert!(dom.query_selector(".trigger").is_none());
        dom.append_child(&dom.body(), &button).unwrap();
        assert_eq!(dom.find_by_class("trigger"), vec![button]);
    }

    #[test]
    fn test_remove_child() {
        let dom = MemoryDom::new();
        let container = dom.append_div(dom.body(), "c");
        let child = dom.create_element("p", "", "").unwrap();
        dom.append_child(&container, &child).unwrap();
        dom.remove_child(&container, &child).unwrap();
        assert!(dom.children(container).is_empty());
        assert!(dom.remove_child(&container, &child).is_err());
    }

    #[test]
    fn test_text_nodes_are_not_containers() {
        let dom = MemoryDom::new();
        let text = dom.append_text(dom.body(), "hello");
        assert!(!dom.is_container(&text));
        assert!(dom.is_container(&dom.body()));
    }
}
