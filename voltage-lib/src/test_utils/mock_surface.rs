//! Scriptable payment surface and loader.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use async_trait::async_trait;

use super::memory_dom::NodeId;
use crate::errors::VoltageError;
use crate::options::SurfaceProps;
use crate::surface::{PaymentSurface, SurfaceEvent, SurfaceEventKind, SurfaceListener, SurfaceLoader};
use crate::types::PaymentVariant;
use crate::Result;

#[derive(Default)]
struct SurfaceInner {
    props: RefCell<Vec<SurfaceProps>>,
    listeners: RefCell<HashMap<SurfaceEventKind, Vec<SurfaceListener>>>,
    destroyed: Cell<bool>,
    open_calls: Cell<u32>,
    close_calls: Cell<u32>,
    toggle_calls: Cell<u32>,
    expanded: Cell<bool>,
}

/// A surface that records every call and lets tests raise events.
///
/// Clones share state, so a test can keep a handle while the adapter owns
/// another.
#[derive(Clone)]
pub struct MockSurface {
    variant: PaymentVariant,
    target: NodeId,
    inner: Rc<SurfaceInner>,
}

impl MockSurface {
    fn new(variant: PaymentVariant, target: NodeId, props: SurfaceProps) -> Self {
        let inner = SurfaceInner::default();
        inner.props.borrow_mut().push(props);
        Self {
            variant,
            target,
            inner: Rc::new(inner),
        }
    }

    pub fn variant(&self) -> PaymentVariant {
        self.variant
    }

    /// Node the surface was constructed at.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Latest props: construction props, then every `set_props`.
    pub fn props(&self) -> SurfaceProps {
        self.inner
            .props
            .borrow()
            .last()
            .cloned()
            .expect("constructed with props")
    }

    /// Number of prop sets received, including construction.
    pub fn props_updates(&self) -> usize {
        self.inner.props.borrow().len()
    }

    pub fn listener_count(&self, kind: SurfaceEventKind) -> usize {
        self.inner
            .listeners
            .borrow()
            .get(&kind)
            .map_or(0, Vec::len)
    }

    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.get()
    }

    pub fn open_calls(&self) -> u32 {
        self.inner.open_calls.get()
    }

    pub fn close_calls(&self) -> u32 {
        self.inner.close_calls.get()
    }

    pub fn toggle_calls(&self) -> u32 {
        self.inner.toggle_calls.get()
    }

    /// Raise an event to every listener registered for its kind.
    pub fn emit(&self, event: SurfaceEvent) {
        let listeners = self
            .inner
            .listeners
            .borrow()
            .get(&event.kind())
            .cloned()
            .unwrap_or_default();
        for listener in listeners {
            listener(event.clone());
        }
    }
}

impl PaymentSurface for MockSurface {
    fn set_props(&self, props: &SurfaceProps) -> Result<()> {
        if self.inner.destroyed.get() {
            return Err(VoltageError::SurfaceLoad("surface destroyed".into()));
        }
        self.inner.props.borrow_mut().push(props.clone());
        Ok(())
    }

    fn on(&self, kind: SurfaceEventKind, listener: SurfaceListener) {
        self.inner
            .listeners
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(listener);
    }

    fn destroy(&self) {
        self.inner.destroyed.set(true);
        self.inner.listeners.borrow_mut().clear();
    }

    fn open(&self) {
        self.inner.open_calls.set(self.inner.open_calls.get() + 1);
    }

    fn close(&self) {
        self.inner.close_calls.set(self.inner.close_calls.get() + 1);
    }

    /// Flips the expanded flag and reports it like the button surface does.
    fn toggle_payment(&self) {
        self.inner.toggle_calls.set(self.inner.toggle_calls.get() + 1);
        let expanded = !self.inner.expanded.get();
        self.inner.expanded.set(expanded);
        self.emit(if expanded {
            SurfaceEvent::ButtonActivated
        } else {
            SurfaceEvent::ButtonDeactivated
        });
    }
}

/// Loader handing out [`MockSurface`]s and remembering each one.
#[derive(Default)]
pub struct MockLoader {
    surfaces: RefCell<Vec<MockSurface>>,
    fail_next: RefCell<Option<String>>,
}

impl MockLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next load fail with `SurfaceLoad(reason)`.
    pub fn fail_next(&self, reason: impl Into<String>) {
        *self.fail_next.borrow_mut() = Some(reason.into());
    }

    /// Number of surfaces constructed so far.
    pub fn load_count(&self) -> usize {
        self.surfaces.borrow().len()
    }

    /// Most recently constructed surface.
    pub fn last_surface(&self) -> Option<MockSurface> {
        self.surfaces.borrow().last().cloned()
    }

    pub fn surfaces(&self) -> Vec<MockSurface> {
        self.surfaces.borrow().clone()
    }
}

#[async_trait(?Send)]
impl SurfaceLoader<NodeId> for MockLoader {
    type Surface = MockSurface;

    async fn load(
        &self,
        variant: PaymentVariant,
        target: &NodeId,
        props: &SurfaceProps,
    ) -> Result<MockSurface> {
        if let Some(reason) = self.fail_next.borrow_mut().take() {
            return Err(VoltageError::SurfaceLoad(reason));
        }
        let surface = MockSurface::new(variant, *target, props.clone());
        self.surfaces.borrow_mut().push(surface.clone());
        Ok(surface)
    }
}
