//! Test fixtures.

use super::memory_dom::MemoryDom;
use super::mock_surface::MockLoader;
use crate::factory::Host;
use crate::types::{PaymentData, PaymentStatus};

/// Host backed by the in-memory document and the mock loader.
pub type TestHost = Host<MemoryDom, MockLoader>;

/// A host whose body already contains `<div id="container">`.
pub fn test_host() -> TestHost {
    let host = Host::new(MemoryDom::new(), MockLoader::new());
    host.dom.append_div(host.dom.body(), "container");
    host
}

/// Payment snapshot with a BOLT11 request and a fixed amount.
pub fn payment(id: &str, status: PaymentStatus) -> PaymentData {
    PaymentData::new(id, status)
        .with_payment_request(format!("lnbc1500n1{id}"))
        .with_amount(150_000)
}
