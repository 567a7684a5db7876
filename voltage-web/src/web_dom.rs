//! Browser document access through `web-sys`.

use voltage_lib::dom::{ClickHandler, Dom};
use voltage_lib::VoltageError;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, HtmlElement};

type Result<T> = std::result::Result<T, VoltageError>;

fn dom_error(context: &str, err: JsValue) -> VoltageError {
    VoltageError::Dom(format!("{context}: {}", crate::utils::describe_js(&err)))
}

/// The page's document.
#[derive(Clone, Debug, Default)]
pub struct WebDom;

impl WebDom {
    pub fn new() -> Self {
        Self
    }

    fn document(&self) -> Result<Document> {
        web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| VoltageError::Dom("no document".into()))
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn query_selector(&self, selector: &str) -> Option<Element> {
        // Invalid selectors throw; treat them as matching nothing.
        self.document().ok()?.query_selector(selector).ok().flatten()
    }

    fn is_container(&self, node: &Element) -> bool {
        node.dyn_ref::<HtmlElement>().is_some()
    }

    fn overlay_root(&self) -> Result<Element> {
        let body = self
            .document()?
            .body()
            .ok_or_else(|| VoltageError::Dom("document has no body".into()))?;
        Ok(body.into())
    }

    fn contains_id(&self, id: &str) -> bool {
        self.document()
            .map(|doc| doc.get_element_by_id(id).is_some())
            .unwrap_or(false)
    }

    fn install_style(&self, id: &str, css: &str) -> Result<()> {
        let document = self.document()?;
        let head = document
            .head()
            .ok_or_else(|| VoltageError::Dom("document has no head".into()))?;
        let style = document
            .create_element("style")
            .map_err(|e| dom_error("create style", e))?;
        style.set_id(id);
        style.set_text_content(Some(css));
        head.append_child(&style)
            .map_err(|e| dom_error("append style", e))?;
        Ok(())
    }

    fn create_element(&self, tag: &str, class: &str, inner_html: &str) -> Result<Element> {
        let element = self
            .document()?
            .create_element(tag)
            .map_err(|e| dom_error("create element", e))?;
        element.set_class_name(class);
        element.set_inner_html(inner_html);
        Ok(element)
    }

    fn query_within(&self, root: &Element, selector: &str) -> Option<Element> {
        root.query_selector(selector).ok().flatten()
    }

    fn set_text(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<()> {
        parent
            .append_child(child)
            .map_err(|e| dom_error("append child", e))?;
        Ok(())
    }

    fn remove_child(&self, parent: &Element, child: &Element) -> Result<()> {
        parent
            .remove_child(child)
            .map_err(|e| dom_error("remove child", e))?;
        Ok(())
    }

    fn on_click(&self, node: &Element, handler: ClickHandler) -> Result<()> {
        let onclick = Closure::wrap(Box::new(move |_e: Event| {
            handler();
        }) as Box<dyn FnMut(Event)>);
        node.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())
            .map_err(|e| dom_error("add click listener", e))?;
        // Leaked on purpose. Handlers only hold a weak widget reference.
        onclick.forget();
        Ok(())
    }
}
