//! Widget factory.

use std::rc::Rc;

use async_trait::async_trait;

use crate::adapters::{ButtonAdapter, InlineAdapter, ModalAdapter};
use crate::component::PaymentComponent;
use crate::dom::{Dom, MountTarget};
use crate::errors::VoltageError;
use crate::options::{PaymentOptions, PaymentOptionsPatch};
use crate::surface::SurfaceLoader;
use crate::types::{PaymentData, PaymentStatus, PaymentVariant};
use crate::Result;

/// The document and surface loader widgets are built against.
pub struct Host<D, L> {
    pub dom: Rc<D>,
    pub loader: Rc<L>,
}

impl<D, L> Host<D, L> {
    pub fn new(dom: D, loader: L) -> Self {
        Self {
            dom: Rc::new(dom),
            loader: Rc::new(loader),
        }
    }
}

impl<D, L> Clone for Host<D, L> {
    fn clone(&self) -> Self {
        Self {
            dom: self.dom.clone(),
            loader: self.loader.clone(),
        }
    }
}

/// A payment widget of any variant.
pub enum PaymentWidget<D, L>
where
    D: Dom + 'static,
    L: SurfaceLoader<D::Node>,
{
    Inline(InlineAdapter<D, L>),
    Modal(ModalAdapter<D, L>),
    Button(ButtonAdapter<D, L>),
}

impl<D, L> PaymentWidget<D, L>
where
    D: Dom + 'static,
    L: SurfaceLoader<D::Node>,
{
    pub fn as_inline(&self) -> Option<&InlineAdapter<D, L>> {
        match self {
            Self::Inline(adapter) => Some(adapter),
            _ => None,
        }
    }

    pub fn as_modal(&self) -> Option<&ModalAdapter<D, L>> {
        match self {
            Self::Modal(adapter) => Some(adapter),
            _ => None,
        }
    }

    pub fn as_button(&self) -> Option<&ButtonAdapter<D, L>> {
        match self {
            Self::Button(adapter) => Some(adapter),
            _ => None,
        }
    }

    fn component(&self) -> &dyn PaymentComponent<Node = D::Node> {
        match self {
            Self::Inline(adapter) => adapter,
            Self::Modal(adapter) => adapter,
            Self::Button(adapter) => adapter,
        }
    }
}

#[async_trait(?Send)]
impl<D, L> PaymentComponent for PaymentWidget<D, L>
where
    D: Dom + 'static,
    L: SurfaceLoader<D::Node>,
{
    type Node = D::Node;

    async fn mount(&self, target: MountTarget<D::Node>) -> Result<()> {
        self.component().mount(target).await
    }

    fn unmount(&self) {
        self.component().unmount();
    }

    fn update_options(&self, patch: PaymentOptionsPatch) -> Result<()> {
        self.component().update_options(patch)
    }

    fn status(&self) -> PaymentStatus {
        self.component().status()
    }

    fn payment_data(&self) -> Option<PaymentData> {
        self.component().payment_data()
    }

    fn variant(&self) -> PaymentVariant {
        self.component().variant()
    }

    fn is_mounted(&self) -> bool {
        self.component().is_mounted()
    }
}

/// Entry point for building payment widgets.
pub struct VoltagePayments;

impl VoltagePayments {
    /// Library version, for diagnostics.
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");

    pub fn version() -> &'static str {
        Self::VERSION
    }

    /// Build the adapter for `options.variant` (inline when unset).
    ///
    /// Nothing is attached to the document until `mount` is called.
    pub fn create<D, L>(options: PaymentOptions, host: &Host<D, L>) -> PaymentWidget<D, L>
    where
        D: Dom + 'static,
        L: SurfaceLoader<D::Node>,
    {
        let dom = host.dom.clone();
        let loader = host.loader.clone();
        match options.resolved_variant() {
            PaymentVariant::Inline => PaymentWidget::Inline(InlineAdapter::new(options, dom, loader)),
            PaymentVariant::Modal => PaymentWidget::Modal(ModalAdapter::new(options, dom, loader)),
            PaymentVariant::Button => PaymentWidget::Button(ButtonAdapter::new(options, dom, loader)),
        }
    }

    /// Build a widget from options given as JSON, e.g. a parsed embed config.
    ///
    /// Fails with `UnsupportedVariant` when `variant` is present but is not
    /// one of the known names, including non-string values.
    pub fn create_from_json<D, L>(
        options: serde_json::Value,
        host: &Host<D, L>,
    ) -> Result<PaymentWidget<D, L>>
    where
        D: Dom + 'static,
        L: SurfaceLoader<D::Node>,
    {
        match options.get("variant") {
            None | Some(serde_json::Value::Null) => {}
            Some(serde_json::Value::String(variant)) => {
                variant.parse::<PaymentVariant>()?;
            }
            Some(other) => return Err(VoltageError::UnsupportedVariant(other.to_string())),
        }
        let options: PaymentOptions = serde_json::from_value(options)?;
        Ok(Self::create(options, host))
    }
}
