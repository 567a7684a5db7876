//! Test utilities for payment widgets.
//!
//! - [`MemoryDom`]: an in-memory document implementing [`Dom`](crate::Dom)
//! - [`MockSurface`] / [`MockLoader`]: a surface whose events tests raise
//!   by hand
//! - fixtures for payment snapshots and a ready-made host
//!
//! ```rust,ignore
//! use voltage_lib::test_utils::{test_host, MemoryDom};
//!
//! let host = test_host();
//! let container = host.dom.append_div(host.dom.body(), "checkout");
//! ```

mod fixtures;
mod memory_dom;
mod mock_surface;

pub use fixtures::{payment, test_host, TestHost};
pub use memory_dom::{MemoryDom, NodeId};
pub use mock_surface::{MockLoader, MockSurface};
