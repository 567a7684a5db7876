//! Lifecycle adapters, one per widget variant.

mod binding;
mod button;
mod inline;
mod modal;

pub use binding::Phase;
pub use button::ButtonAdapter;
pub use inline::InlineAdapter;
pub use modal::{
    trigger_label, ModalAdapter, DEFAULT_TRIGGER_LABEL, TRIGGER_CLASS, TRIGGER_TEXT_SELECTOR,
};
